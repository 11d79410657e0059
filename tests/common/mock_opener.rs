//! Mock fallback opener that records every target it is asked to open

use anyhow::Result;
use aynary_bridge::fallback::{FallbackTarget, TargetOpener};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockOpener {
    opened: Mutex<Vec<String>>,
    /// Simulate a missing open command
    pub should_fail: bool,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl TargetOpener for MockOpener {
    fn open(&self, target: &FallbackTarget) -> Result<()> {
        self.opened.lock().unwrap().push(target.to_string());
        if self.should_fail {
            return Err(anyhow::anyhow!("Mock opener failure"));
        }
        Ok(())
    }
}
