//! Context Menu Registration
//!
//! The platform shim calls [`initialize`] once at startup; clicks come back as
//! [`MenuClick`] values for the dispatch controller.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MENU_ITEM_ID: &str = "define-with-aynary";
pub const MENU_ITEM_TITLE: &str = "Define with Aynary";

/// Where a menu item is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Selection,
}

/// A menu entry as handed to the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl MenuItem {
    /// The single "Define with Aynary" entry
    pub fn define() -> Self {
        Self {
            id: MENU_ITEM_ID.to_string(),
            title: MENU_ITEM_TITLE.to_string(),
            contexts: vec![MenuContext::Selection],
        }
    }
}

/// Click reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuClick {
    pub menu_item_id: String,
    #[serde(default)]
    pub selection_text: Option<String>,
}

impl MenuClick {
    /// Selected text when this click is for our item and carries a selection
    pub fn define_selection(&self) -> Option<&str> {
        if self.menu_item_id != MENU_ITEM_ID {
            return None;
        }
        self.selection_text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Platform capability to register menu entries
pub trait MenuRegistry {
    fn register(&mut self, item: MenuItem) -> Result<()>;
}

/// Register the menu entry. Call once at startup.
pub fn initialize(registry: &mut dyn MenuRegistry) -> Result<()> {
    let item = MenuItem::define();
    info!("📋 Registering menu item '{}'", item.title);
    registry.register(item)
}
