//! Canonical serialization and content hashing.
//!
//! Nothing in this module knows about graphs or searches.

pub mod canon;
pub mod hash;
pub mod hash_domain;
