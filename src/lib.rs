//! Aynary Bridge Library
//!
//! Selection dispatch between the browser and the Aynary dictionary: text
//! normalization, the native messaging bridge with its fallback, and the
//! native host relay.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod fallback;
pub mod host;
pub mod ipc;
pub mod menu;
pub mod selection;
