//! Types library for the time-locked bond
//!
//! Shared primitives used by the bond contract and the local devnet:
//! identities and the time arithmetic the lock is defined in.
//!
//! # Modules
//! - `ids`: 20-byte identities (`Address`) and deterministic derivation
//! - `time`: Unix-second timestamps, the fixed lock duration, formatting
//! - `errors`: Parse errors for the types above

// Public modules
pub mod ids;
pub mod time;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::time::*;
    pub use crate::errors::*;
}
