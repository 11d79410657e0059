//! Scripted Native Host for Testing
//!
//! Decides how each channel ends based on the word posted to it, and records
//! every connect and request.

use async_trait::async_trait;
use aynary_bridge::bridge::{ChannelConnector, HostId, NativePort, PortEvent};
use aynary_bridge::error::{BridgeError, BridgeResult};
use aynary_bridge::ipc::LookupRequest;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the host behaves once it has received a request
#[derive(Debug, Clone)]
pub enum HostScript {
    /// Reply with a message
    Respond(Value),
    /// Exit with a non-zero status
    Crash,
    /// Exit cleanly without replying
    CleanExit,
    /// Never reply, never exit
    Silent,
    /// Wait, then behave as the inner script
    After(Duration, Box<HostScript>),
}

impl HostScript {
    pub fn ok_reply(word: &str) -> Self {
        HostScript::Respond(serde_json::json!({"success": true, "word": word}))
    }
}

/// Fake native host reachable through the `ChannelConnector` seam
pub struct MockHost {
    scripts: Arc<HashMap<String, HostScript>>,
    default_script: HostScript,
    unreachable: bool,
    connects: AtomicUsize,
    posted: Arc<Mutex<Vec<Value>>>,
}

impl MockHost {
    pub fn new(default_script: HostScript) -> Self {
        Self {
            scripts: Arc::new(HashMap::new()),
            default_script,
            unreachable: false,
            connects: AtomicUsize::new(0),
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every connect fails as if the host were not registered
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new(HostScript::CleanExit)
        }
    }

    /// Use `script` for requests carrying `word`
    pub fn with_script(mut self, word: &str, script: HostScript) -> Self {
        Arc::make_mut(&mut self.scripts).insert(word.to_string(), script);
        self
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Requests as they went over the wire
    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelConnector for MockHost {
    async fn connect(&self, host: &HostId) -> BridgeResult<Box<dyn NativePort>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(BridgeError::HostNotFound(host.to_string()));
        }
        Ok(Box::new(MockPort {
            scripts: self.scripts.clone(),
            default_script: self.default_script.clone(),
            posted: self.posted.clone(),
            script: None,
        }))
    }
}

struct MockPort {
    scripts: Arc<HashMap<String, HostScript>>,
    default_script: HostScript,
    posted: Arc<Mutex<Vec<Value>>>,
    script: Option<HostScript>,
}

#[async_trait]
impl NativePort for MockPort {
    async fn post_message(&mut self, request: &LookupRequest) -> BridgeResult<()> {
        self.posted
            .lock()
            .unwrap()
            .push(serde_json::to_value(request)?);
        self.script = Some(
            self.scripts
                .get(request.word())
                .cloned()
                .unwrap_or_else(|| self.default_script.clone()),
        );
        Ok(())
    }

    async fn next_event(&mut self) -> PortEvent {
        let mut script = match self.script.take() {
            Some(script) => script,
            None => return PortEvent::Disconnect(None),
        };
        loop {
            match script {
                HostScript::Respond(value) => return PortEvent::Message(value),
                HostScript::Crash => {
                    return PortEvent::Disconnect(Some(BridgeError::HostExited(Some(1))))
                }
                HostScript::CleanExit => return PortEvent::Disconnect(None),
                HostScript::Silent => return std::future::pending::<PortEvent>().await,
                HostScript::After(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    script = *inner;
                }
            }
        }
    }
}
