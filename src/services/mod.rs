//! Pure local-side services: enumeration, key mapping, MIME lookup.
//!
//! None of these touch the network.

pub mod content_type;
pub mod keys;
pub mod tree;

pub use keys::{object_key, plan_uploads};
pub use tree::LocalTree;
