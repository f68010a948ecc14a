//! lw-feed
//!
//! Upstream feed clients for the regulator's attention and disposition lists,
//! plus the minguo date normalization both of them depend on.
//!
//! This crate does **not** write to the database; callers (daemon pipeline,
//! CLI) fetch records and hand them to lw-db ingestion.

pub mod attention;
pub mod disposition;
pub mod minguo;

pub use attention::{AttentionFeed, AttentionRecord};
pub use disposition::{DispositionFeed, DispositionRecord};
