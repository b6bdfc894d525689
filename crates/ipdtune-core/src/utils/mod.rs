//! Utility functions for display formatting.

pub mod format;

pub use format::{format_one_decimal, format_whole};
