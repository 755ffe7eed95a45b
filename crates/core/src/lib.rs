//! Domain logic for the catalens image catalog.
//!
//! Pure functions and types only -- no database, network, or filesystem
//! access. The api crate wires these into the upload pipeline.

pub mod description;
pub mod error;
pub mod hashing;
pub mod types;
