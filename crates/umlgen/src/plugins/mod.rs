//! Plugin implementations for different diagram types
//!
//! Each plugin implements the core traits for its diagram type.

pub mod class;

pub use class::*;
