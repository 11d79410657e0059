//! Process-backed channel
//!
//! Spawns the host executable named by its manifest and speaks framed JSON
//! over its stdin/stdout, the way a browser runs a native messaging host.

use super::channel::{ChannelConnector, NativePort, PortEvent};
use super::manifest::{self, default_manifest_dirs};
use super::HostId;
use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::ipc::{read_message, write_message, LookupRequest, MAX_INBOUND_MESSAGE};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Connects by launching the registered native host process
#[derive(Debug, Clone)]
pub struct ProcessConnector {
    search_dirs: Vec<PathBuf>,
    host_args: Vec<String>,
}

impl ProcessConnector {
    pub fn new(search_dirs: Vec<PathBuf>, host_args: Vec<String>) -> Self {
        Self {
            search_dirs,
            host_args,
        }
    }

    /// Configured manifest dirs first, then the browser defaults
    pub fn from_config(config: &Config) -> Self {
        let mut search_dirs = config.manifest_dirs.clone();
        search_dirs.extend(default_manifest_dirs());
        Self::new(search_dirs, config.host_args.clone())
    }
}

#[async_trait]
impl ChannelConnector for ProcessConnector {
    async fn connect(&self, host: &HostId) -> BridgeResult<Box<dyn NativePort>> {
        let manifest = manifest::resolve(host.as_str(), &self.search_dirs)?;

        let mut child = Command::new(&manifest.path)
            .args(&self.host_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BridgeError::HostNotFound(format!("failed to start {:?}: {}", manifest.path, e))
            })?;

        info!("🔌 Started native host {} ({:?})", host, manifest.path);

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Communication("host stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Communication("host stdout unavailable".to_string()))?;

        let stdin = Arc::new(Mutex::new(Some(stdin)));
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(pump_events(child, stdout, stdin.clone(), tx));

        Ok(Box::new(ProcessPort { stdin, events: rx }))
    }
}

/// The pump closes `stdin` once the host closes stdout
type SharedStdin = Arc<Mutex<Option<ChildStdin>>>;

struct ProcessPort {
    stdin: SharedStdin,
    events: mpsc::Receiver<PortEvent>,
}

#[async_trait]
impl NativePort for ProcessPort {
    async fn post_message(&mut self, request: &LookupRequest) -> BridgeResult<()> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard
            .as_mut()
            .ok_or_else(|| BridgeError::Communication("port already closed".to_string()))?;

        if let Err(e) = write_message(stdin, request).await {
            *guard = None;
            return Err(BridgeError::Communication(e.to_string()));
        }
        debug!("Posted lookup '{}' to native host", request.word());
        Ok(())
    }

    async fn next_event(&mut self) -> PortEvent {
        self.events
            .recv()
            .await
            .unwrap_or(PortEvent::Disconnect(None))
    }
}

enum Read {
    Frame(Value),
    Eof,
    Failed(BridgeError),
    Abandoned,
}

/// Forward host output as port events until the host is gone.
///
/// Kills the host if the port is dropped first. When the host closes stdout,
/// its stdin is closed too so a host draining stdin can exit.
async fn pump_events(
    mut child: Child,
    mut stdout: ChildStdout,
    stdin: SharedStdin,
    tx: mpsc::Sender<PortEvent>,
) {
    loop {
        let read = tokio::select! {
            _ = tx.closed() => Read::Abandoned,
            frame = read_message(&mut stdout, MAX_INBOUND_MESSAGE) => match frame {
                Ok(Some(message)) => Read::Frame(message),
                Ok(None) => Read::Eof,
                Err(e) => Read::Failed(e),
            },
        };

        match read {
            Read::Frame(message) => {
                if tx.send(PortEvent::Message(message)).await.is_err() {
                    let _ = child.kill().await;
                    return;
                }
            }
            Read::Eof => {
                debug!("Native host closed stdout");
                stdin.lock().await.take();
                break;
            }
            Read::Failed(e) => {
                warn!("⚠️ Bad frame from native host: {}", e);
                let _ = child.kill().await;
                let _ = tx
                    .send(PortEvent::Disconnect(Some(BridgeError::Communication(
                        e.to_string(),
                    ))))
                    .await;
                return;
            }
            Read::Abandoned => {
                debug!("Port dropped, stopping native host");
                let _ = child.kill().await;
                return;
            }
        }
    }

    let status = tokio::select! {
        _ = tx.closed() => None,
        status = child.wait() => Some(status),
    };

    let event = match status {
        None => {
            let _ = child.kill().await;
            return;
        }
        Some(Ok(status)) if status.success() => {
            debug!("Native host exited cleanly");
            PortEvent::Disconnect(None)
        }
        Some(Ok(status)) => {
            warn!("⚠️ Native host exited with {}", status);
            PortEvent::Disconnect(Some(BridgeError::HostExited(status.code())))
        }
        Some(Err(e)) => PortEvent::Disconnect(Some(BridgeError::Communication(e.to_string()))),
    };
    let _ = tx.send(event).await;
}
