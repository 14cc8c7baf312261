//! PAM API interaction module
//!
//! This module provides the REST client runtime that every resource and data
//! source delegates to: transport, status classification, retries, named
//! locks and the per-cycle cache.
//!
//! # Module Structure
//!
//! - [`client`] - Main client combining the pieces below
//! - [`http`] - Transport trait, request/response types, reqwest implementation
//! - [`classify`] - `(status, body)` to outcome mapping
//! - [`error`] - Error taxonomy and the remote error document
//! - [`retry`] - Fixed-interval retry policy
//! - [`locks`] - Named locks for mutating calls
//! - [`cache`] - Per-cycle cache for read-only fan-out calls
//!
//! # Example
//!
//! ```ignore
//! use pam_provider::pam::{ClientOptions, PamClient};
//!
//! async fn example() -> Result<(), pam_provider::pam::ApiError> {
//!     let client = PamClient::new(ClientOptions::new("https://acme.example.com", "token"))?;
//!     let apps = client.get_applications().await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod classify;
pub mod client;
pub mod error;
pub mod http;
pub mod locks;
pub mod retry;

pub use client::{encode, ClientOptions, PamClient, DEFAULT_HOST_AGENT};
pub use error::{ApiError, ApiResult, RemoteErrorBody};
pub use http::{ApiRequest, RawResponse, RequestBody, Transport};
pub use locks::names as lock_names;
pub use retry::RetryPolicy;
