//! Session payloads sent upstream and the credentials extracted from their responses.
//!
//! [`SessionConfig`] describes the realtime session the browser will join (model, persona,
//! voice, modalities, and tool declarations). [`EphemeralCredential`] is the only thing the
//! broker keeps from the upstream answer; it is handed to the caller and dropped.

pub mod config;
pub mod credential;

pub use config::*;
pub use credential::*;
