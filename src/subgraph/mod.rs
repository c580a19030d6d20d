//! Subgraph module - indexing service client and wire shapes

pub mod client;
pub mod messages;
pub mod queries;

pub use client::SubgraphClient;
