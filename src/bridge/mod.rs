//! Native Bridge
//!
//! Delivers one lookup request per dispatch over a fresh channel to the native
//! host and reports how the channel ended.

pub mod channel;
pub mod manifest;
pub mod process;

pub use channel::{ChannelConnector, NativePort, PortEvent};
pub use process::ProcessConnector;

use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::ipc::LookupRequest;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Validated native host identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostId(String);

impl HostId {
    pub fn new(name: &str) -> BridgeResult<Self> {
        manifest::validate_host_name(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of one channel. `Open` is the only non-terminal state after
/// connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Unopened,
    Open,
    Responded,
    Errored,
    ClosedClean,
}

impl ChannelState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ChannelState::Responded | ChannelState::Errored | ChannelState::ClosedClean
        )
    }
}

/// How a dispatch ended
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The host answered; payload is passed through untouched
    Delivered(Value),
    /// The host closed without error and without answering
    ClosedClean,
    /// The channel could not be opened or closed abnormally
    Failed(BridgeError),
}

impl DispatchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, DispatchOutcome::Failed(_))
    }

    /// Terminal channel state this outcome corresponds to
    pub fn state(&self) -> ChannelState {
        match self {
            DispatchOutcome::Delivered(_) => ChannelState::Responded,
            DispatchOutcome::ClosedClean => ChannelState::ClosedClean,
            DispatchOutcome::Failed(_) => ChannelState::Errored,
        }
    }
}

/// One connection attempt. Created per dispatch and never reused.
struct BridgeChannel {
    host: HostId,
    state: ChannelState,
    last_error: Option<String>,
}

impl BridgeChannel {
    fn new(host: HostId) -> Self {
        Self {
            host,
            state: ChannelState::Unopened,
            last_error: None,
        }
    }

    /// Terminal states are final; later transitions are dropped
    fn transition(&mut self, next: ChannelState) {
        if self.state.is_terminal() {
            warn!(
                "Channel to {} already {:?}, ignoring {:?}",
                self.host, self.state, next
            );
            return;
        }
        debug!("Channel to {}: {:?} -> {:?}", self.host, self.state, next);
        self.state = next;
    }

    fn close(&mut self, outcome: &DispatchOutcome) {
        if let DispatchOutcome::Failed(e) = outcome {
            self.last_error = Some(match e.detail() {
                Some(detail) => format!("{} ({})", e, detail),
                None => e.to_string(),
            });
        }
        self.transition(outcome.state());
    }
}

/// Sends lookup requests to the native host
#[derive(Clone)]
pub struct NativeBridge {
    host: HostId,
    connector: Arc<dyn ChannelConnector>,
    response_timeout: Option<Duration>,
}

impl NativeBridge {
    pub fn new(
        host: HostId,
        connector: Arc<dyn ChannelConnector>,
        response_timeout: Option<Duration>,
    ) -> Self {
        Self {
            host,
            connector,
            response_timeout,
        }
    }

    /// Bridge backed by the registered host process
    pub fn from_config(config: &Config) -> BridgeResult<Self> {
        let host = HostId::new(&config.host_name)?;
        let connector = Arc::new(ProcessConnector::from_config(config));
        Ok(Self::new(host, connector, config.response_timeout()))
    }

    pub fn host(&self) -> &HostId {
        &self.host
    }

    /// Deliver `request` over a new channel and wait for the first response
    /// or disconnect.
    pub async fn dispatch(&self, request: &LookupRequest) -> DispatchOutcome {
        let mut channel = BridgeChannel::new(self.host.clone());
        let outcome = self.exchange(&mut channel, request).await;
        channel.close(&outcome);

        match &outcome {
            DispatchOutcome::Delivered(response) => {
                info!("📖 Response from native host: {}", response);
            }
            DispatchOutcome::ClosedClean => {
                debug!("Native host closed without a response");
            }
            DispatchOutcome::Failed(_) => {
                error!(
                    "❌ Native messaging error: {}",
                    channel.last_error.as_deref().unwrap_or("unknown")
                );
            }
        }
        outcome
    }

    async fn exchange(
        &self,
        channel: &mut BridgeChannel,
        request: &LookupRequest,
    ) -> DispatchOutcome {
        let mut port = match self.connector.connect(&self.host).await {
            Ok(port) => port,
            Err(e) => return DispatchOutcome::Failed(e),
        };
        channel.transition(ChannelState::Open);

        if let Err(e) = port.post_message(request).await {
            warn!("⚠️ Could not post lookup to {}: {}", self.host, e);
            return DispatchOutcome::Failed(e);
        }

        let wait = async {
            match port.next_event().await {
                PortEvent::Message(response) => DispatchOutcome::Delivered(response),
                PortEvent::Disconnect(Some(e)) => DispatchOutcome::Failed(e),
                PortEvent::Disconnect(None) => DispatchOutcome::ClosedClean,
            }
        };

        match self.response_timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .unwrap_or_else(|_| DispatchOutcome::Failed(BridgeError::Timeout(limit))),
            None => wait.await,
        }
    }
}
