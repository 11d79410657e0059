#![allow(dead_code)]

pub mod mock_host;
pub mod mock_opener;

use aynary_bridge::bridge::{HostId, NativeBridge};
use aynary_bridge::controller::DispatchController;
use mock_host::MockHost;
use mock_opener::MockOpener;
use std::sync::Arc;
use std::time::Duration;

pub const HOST_NAME: &str = "com.aynary.dictionary";

/// Controller wired to fakes, with handles to inspect them
pub struct TestContext {
    pub host: Arc<MockHost>,
    pub opener: Arc<MockOpener>,
    pub controller: DispatchController,
}

impl TestContext {
    pub fn new(host: MockHost) -> Self {
        Self::with_opener(host, MockOpener::new())
    }

    pub fn with_opener(host: MockHost, opener: MockOpener) -> Self {
        let host = Arc::new(host);
        let opener = Arc::new(opener);
        let bridge = NativeBridge::new(
            HostId::new(HOST_NAME).expect("valid host name"),
            host.clone(),
            Some(Duration::from_millis(200)),
        );
        let controller = DispatchController::new(bridge, opener.clone(), "aynary");

        Self {
            host,
            opener,
            controller,
        }
    }
}
