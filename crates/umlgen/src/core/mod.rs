//! Core abstractions for diagram building
//!
//! Shared pieces every diagram plugin builds on: type descriptors supplied by
//! an introspector or a JSON manifest, member filters, name and link
//! resolution, the database and renderer traits, errors and logging.

mod database;
mod descriptor;
mod error;
mod filter;
pub mod logging;
mod manifest;
mod renderer;
mod resolver;
mod types;

pub use database::*;
pub use descriptor::*;
pub use error::*;
pub use filter::*;
pub use logging::*;
pub use manifest::*;
pub use renderer::*;
pub use resolver::*;
pub use types::*;
