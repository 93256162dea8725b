//! Optimized collection types for Motley.
//!
//! Registries and recycle pools are keyed by small integers and `TypeId`s,
//! so the AHash-backed maps are used everywhere instead of SipHash.

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
