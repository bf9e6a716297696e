//! Tiny session broker that mints ephemeral OpenAI Realtime keys for browser clients without
//! exposing the server-side API credential.
//!
//! The crate wires four pieces together: a validated [`config::Config`], a
//! [`http::CredentialService`] that talks to the upstream API, the [`broker::Broker`] that turns
//! upstream responses into [`session::EphemeralCredential`] values, and the axum [`server`] that
//! exposes `GET /` and `POST /session`.

#![deny(clippy::all, missing_docs)]

pub mod auth;
pub mod broker;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod server;
pub mod session;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
