//! Core database trait for diagram data storage
//!
//! A database holds the canonical intermediate representation of one
//! diagram: its nodes (type blocks) and edges (associations). It is built
//! once per diagram and only read afterwards.

use anyhow::Result;

/// Core trait for diagram databases
///
/// The associated types let each diagram kind define its own node and edge
/// structures.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node, failing on invalid node data
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge, failing on invalid edge data
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by its display name
    fn get_node(&self, name: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in canonical order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
