//! Async Seaplane platform client - cached bearer tokens, renew-once retries, and cursor
//! pagination for locks, key-value metadata, restrictions, and formations.
//!
//! Every resource call flows through a single [`executor::RequestExecutor`], which resolves a
//! bearer token from the [`auth::TokenProvider`], executes the call, and transparently renews
//! the token once when the platform answers `401`. List endpoints share the
//! [`page::PageCursor`] protocol so single pages and exhaustive listings behave identically
//! across resources.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod encoding;
pub mod error;
pub mod executor;
pub mod http;
pub mod obs;
pub mod page;

pub use client::Client;
pub use config::Configuration;
pub use error::{Error, Result};

mod _prelude {
	pub use std::{
		collections::BTreeSet,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
