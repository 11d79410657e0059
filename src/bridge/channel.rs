//! Channel abstraction
//!
//! A port is one open, message-oriented connection to a native host. The
//! bridge only talks to these traits, so tests can script host behavior.

use crate::error::{BridgeError, BridgeResult};
use crate::ipc::LookupRequest;
use async_trait::async_trait;
use serde_json::Value;

use super::HostId;

/// Something that happened on an open port
#[derive(Debug)]
pub enum PortEvent {
    /// One message from the host; opaque to the bridge
    Message(Value),
    /// The host closed the port. `Some` means it closed abnormally.
    Disconnect(Option<BridgeError>),
}

/// An open connection to a native host
#[async_trait]
pub trait NativePort: Send {
    /// Send one request to the host
    async fn post_message(&mut self, request: &LookupRequest) -> BridgeResult<()>;

    /// Wait for the next event. Once the host is gone this keeps returning
    /// `Disconnect(None)`.
    async fn next_event(&mut self) -> PortEvent;
}

/// Opens ports to native hosts
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    async fn connect(&self, host: &HostId) -> BridgeResult<Box<dyn NativePort>>;
}
