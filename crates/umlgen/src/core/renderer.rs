//! Core renderer trait
//!
//! A renderer serializes a database into text. It depends on nothing but
//! the database it is given.

use anyhow::Result;

use super::Database;

/// Serializes a diagram database
pub trait Renderer<D: Database> {
    /// Render the database; the same database always yields the same text
    fn render(&self, database: &D) -> Result<String>;

    /// Short name of the output notation
    fn name(&self) -> &'static str;
}
