//! Credential wrappers for the configured upstream key and the keys it mints.

pub mod secret;

pub use secret::*;
