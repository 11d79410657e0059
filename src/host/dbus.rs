//! D-Bus client for the Aynary dictionary app
//!
//! Uses zbus for async D-Bus communication with the running dictionary.

use super::DictionaryService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use zbus::{proxy, Connection};

/// Matches the dictionary app's own method-call timeout
const CALL_TIMEOUT: Duration = Duration::from_millis(5000);

/// D-Bus proxy for the dictionary service
#[proxy(
    interface = "com.aynary.Dictionary",
    default_service = "com.aynary.Dictionary",
    default_path = "/com/aynary/Dictionary"
)]
trait Dictionary {
    /// Look up a word and bring the window forward
    fn lookup_and_show(&self, word: &str) -> zbus::Result<()>;
}

/// Dictionary reached over the session bus. Connects on first use.
#[derive(Default)]
pub struct DbusDictionary {
    proxy: OnceCell<DictionaryProxy<'static>>,
}

impl DbusDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    async fn proxy(&self) -> Result<&DictionaryProxy<'static>> {
        self.proxy
            .get_or_try_init(|| async {
                let connection = Connection::session()
                    .await
                    .context("Failed to connect to the session bus")?;
                let proxy = DictionaryProxy::new(&connection).await?;
                info!("🔌 Connected to com.aynary.Dictionary");
                Ok::<_, anyhow::Error>(proxy)
            })
            .await
    }
}

#[async_trait]
impl DictionaryService for DbusDictionary {
    async fn lookup_and_show(&self, word: &str) -> Result<()> {
        let proxy = self.proxy().await?;
        debug!("LookupAndShow({})", word);

        tokio::time::timeout(CALL_TIMEOUT, proxy.lookup_and_show(word))
            .await
            .context("Dictionary did not answer in time")??;
        Ok(())
    }
}
