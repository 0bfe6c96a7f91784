//! # Utilities Module
//!
//! Movement primitives over a generated level's walkable map.

pub mod navigation;

pub use navigation::*;
