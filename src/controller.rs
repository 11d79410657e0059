//! Dispatch Controller
//!
//! Turns a trigger into a lookup: normalize, dispatch on a spawned task, and
//! open the fallback target if the channel fails. Triggers never block; the
//! returned join handle is the only way to observe an outcome.

use crate::bridge::{DispatchOutcome, NativeBridge};
use crate::config::Config;
use crate::core::normalize;
use crate::error::BridgeResult;
use crate::fallback::{FallbackTarget, SystemOpener, TargetOpener};
use crate::ipc::LookupRequest;
use crate::menu::MenuClick;
use crate::selection::SelectionProvider;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What happened to one trigger
#[derive(Debug)]
pub struct DispatchReport {
    pub word: String,
    pub outcome: DispatchOutcome,
    /// Set only when the channel failed
    pub fallback: Option<FallbackTarget>,
}

pub struct DispatchController {
    bridge: NativeBridge,
    opener: Arc<dyn TargetOpener>,
    fallback_scheme: String,
}

impl DispatchController {
    pub fn new(
        bridge: NativeBridge,
        opener: Arc<dyn TargetOpener>,
        fallback_scheme: &str,
    ) -> Self {
        Self {
            bridge,
            opener,
            fallback_scheme: fallback_scheme.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> BridgeResult<Self> {
        config.validate()?;
        let bridge = NativeBridge::from_config(config)?;
        let opener = Arc::new(SystemOpener::new(&config.open_command));
        Ok(Self::new(bridge, opener, &config.fallback_scheme))
    }

    /// Handle selected text pushed by a trigger.
    ///
    /// Returns `None` when the text holds no word; nothing is dispatched then.
    /// Must be called from within a tokio runtime.
    pub fn on_trigger(&self, selection_text: &str) -> Option<JoinHandle<DispatchReport>> {
        let request = prepare(selection_text)?;
        let task = self.task();
        Some(tokio::spawn(async move { task.run(request).await }))
    }

    /// Handle a context-menu click; other items and empty selections are ignored
    pub fn on_menu_click(&self, click: &MenuClick) -> Option<JoinHandle<DispatchReport>> {
        match click.define_selection() {
            Some(text) => self.on_trigger(text),
            None => {
                debug!("Ignoring menu click on '{}'", click.menu_item_id);
                None
            }
        }
    }

    /// Pull the selection from `provider`, then dispatch it.
    ///
    /// Resolves to `None` if the selection could not be read or held no word.
    pub fn on_shortcut(
        &self,
        provider: Arc<dyn SelectionProvider>,
    ) -> JoinHandle<Option<DispatchReport>> {
        let task = self.task();
        tokio::spawn(async move {
            let selection = match provider.get_selection().await {
                Ok(selection) => selection,
                Err(e) => {
                    warn!("⚠️ Could not read selection: {}", e);
                    return None;
                }
            };
            let request = prepare(&selection)?;
            Some(task.run(request).await)
        })
    }

    fn task(&self) -> DispatchTask {
        DispatchTask {
            bridge: self.bridge.clone(),
            opener: self.opener.clone(),
            fallback_scheme: self.fallback_scheme.clone(),
        }
    }
}

fn prepare(selection_text: &str) -> Option<LookupRequest> {
    match normalize(selection_text) {
        Ok(request) => Some(request),
        Err(rejected) => {
            debug!("Dropping selection {:?}: {}", selection_text, rejected);
            None
        }
    }
}

/// Everything one spawned dispatch needs, detached from the controller
struct DispatchTask {
    bridge: NativeBridge,
    opener: Arc<dyn TargetOpener>,
    fallback_scheme: String,
}

impl DispatchTask {
    async fn run(self, request: LookupRequest) -> DispatchReport {
        info!("🔎 Looking up '{}' via {}", request.word(), self.bridge.host());
        let outcome = self.bridge.dispatch(&request).await;

        let fallback = outcome.is_failed().then(|| {
            let target = FallbackTarget::new(&self.fallback_scheme, request.word());
            info!("↪️ Falling back to {}", target);
            if let Err(e) = self.opener.open(&target) {
                warn!("⚠️ Fallback open failed: {}", e);
            }
            target
        });

        DispatchReport {
            word: request.word().to_string(),
            outcome,
            fallback,
        }
    }
}
