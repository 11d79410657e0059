//! Selection Retrieval
//!
//! Pull path for triggers that do not carry the selected text themselves,
//! e.g. a keyboard shortcut. The page side answers `getSelection` either
//! immediately or later through a deferred reply.

use crate::ipc::{SelectionRequest, SelectionResponse};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Anything that can report the user's current selection
#[async_trait]
pub trait SelectionProvider: Send + Sync {
    /// Current selection; empty when nothing is selected
    async fn get_selection(&self) -> Result<String>;
}

/// A responder's answer to `getSelection`
#[derive(Debug)]
pub enum SelectionReply {
    /// Answered synchronously
    Ready(SelectionResponse),
    /// Answer will arrive on the paired sender
    Deferred(oneshot::Receiver<SelectionResponse>),
}

impl SelectionReply {
    /// Create a deferred reply and the sender that completes it
    pub fn deferred() -> (oneshot::Sender<SelectionResponse>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, SelectionReply::Deferred(rx))
    }

    pub async fn resolve(self) -> Result<SelectionResponse> {
        match self {
            SelectionReply::Ready(response) => Ok(response),
            SelectionReply::Deferred(rx) => rx
                .await
                .map_err(|_| anyhow!("Selection responder dropped its deferred reply")),
        }
    }
}

/// Page-context side of the `getSelection` contract
pub trait SelectionResponder: Send + Sync {
    /// `None` for requests other than `getSelection`
    fn respond(&self, request: &SelectionRequest) -> Option<SelectionReply>;
}

/// Pulls the selection by sending `getSelection` to a responder
pub struct ResponderSelectionProvider<R> {
    responder: R,
}

impl<R: SelectionResponder> ResponderSelectionProvider<R> {
    pub fn new(responder: R) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl<R: SelectionResponder> SelectionProvider for ResponderSelectionProvider<R> {
    async fn get_selection(&self) -> Result<String> {
        let reply = self
            .responder
            .respond(&SelectionRequest::get_selection())
            .ok_or_else(|| anyhow!("Page context did not answer getSelection"))?;
        Ok(reply.resolve().await?.selection)
    }
}

/// Reads the desktop selection by running a command (default: `xclip -o`)
#[derive(Debug, Clone)]
pub struct CommandSelectionProvider {
    program: String,
    args: Vec<String>,
}

impl CommandSelectionProvider {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("Selection command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl SelectionProvider for CommandSelectionProvider {
    async fn get_selection(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .with_context(|| format!("Failed to run selection command '{}'", self.program))?;

        if !output.status.success() {
            // xclip exits non-zero when nothing is selected
            warn!(
                "⚠️ Selection command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(String::new());
        }

        let selection = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Selection via {}: {:?}", self.program, selection);
        Ok(selection)
    }
}
