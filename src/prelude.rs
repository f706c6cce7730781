//! To ease access to most frequently items
//!

pub use crate::error::GeowlError;

pub use crate::hashing::{canonical_hash, Value};

pub use crate::geometry::{get_invariants, GeometricGraph, Invariants};

pub use crate::gwl::*;
