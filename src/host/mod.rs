//! Native Host Relay
//!
//! The process the browser launches for `com.aynary.dictionary`. It reads
//! framed requests from stdin and forwards lookups to the dictionary app.
//! A failed forward ends the relay with an error, so the browser side sees an
//! abnormal exit and takes its fallback path.

pub mod dbus;

pub use dbus::DbusDictionary;

use crate::ipc::{read_message, write_message, HostReply};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Largest request accepted from the browser
pub const HOST_REQUEST_LIMIT: usize = 64 * 1024;

/// The dictionary application as seen from the relay
#[async_trait]
pub trait DictionaryService: Send + Sync {
    async fn lookup_and_show(&self, word: &str) -> Result<()>;
}

/// Serve requests until the browser closes the pipe.
///
/// Returns how many replies were written.
pub async fn serve<R, W>(
    reader: &mut R,
    writer: &mut W,
    service: &dyn DictionaryService,
) -> Result<usize>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut replies = 0;
    while let Some(message) = read_message(reader, HOST_REQUEST_LIMIT).await? {
        if let Some(reply) = handle_message(&message, service).await? {
            write_message(writer, &reply).await?;
            replies += 1;
        }
    }
    debug!("Browser closed stdin after {} replies", replies);
    Ok(replies)
}

/// Handle one request. `Ok(None)` means the request is ignored.
pub async fn handle_message(
    message: &Value,
    service: &dyn DictionaryService,
) -> Result<Option<HostReply>> {
    let Some(action) = message.get("action").and_then(Value::as_str) else {
        debug!("Ignoring message without action: {}", message);
        return Ok(None);
    };

    match action {
        "lookup" => {
            let Some(word) = message.get("word").and_then(Value::as_str) else {
                debug!("Ignoring lookup without word");
                return Ok(None);
            };

            service
                .lookup_and_show(word)
                .await
                .with_context(|| format!("LookupAndShow failed for '{}'", word))?;
            info!("📖 Forwarded '{}' to dictionary", word);
            Ok(Some(HostReply::looked_up(word)))
        }
        other => {
            warn!("⚠️ Unknown action '{}'", other);
            Ok(Some(HostReply::failure("Unknown action")))
        }
    }
}
