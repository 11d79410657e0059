//! Core processing modules
//!
//! Pure text handling shared by every trigger path.

pub mod text_normalizer;

pub use text_normalizer::{normalize, Rejected};
