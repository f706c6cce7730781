//! Canonical hashing of structured values, used to give colors to nodes.

pub mod canonical;

pub use canonical::{canonical_hash, Value, DIGEST_LEN};
