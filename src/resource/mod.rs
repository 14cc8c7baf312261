//! Provider layer
//!
//! Maps the orchestrator's create/read/update/delete/import lifecycle onto the
//! typed operations in [`crate::api`].
//!
//! # Architecture
//!
//! - [`data`] - Loosely typed attribute map with typed accessors
//! - [`diag`] - Diagnostics returned alongside the state
//! - [`lifecycle`] - `Resource` and `DataSource` traits
//! - [`registry`] - Type name to implementation lookup
//! - [`dispatch`] - Runs an operation and folds errors into diagnostics
//!
//! # Example
//!
//! ```ignore
//! use pam_provider::resource::{dispatch, Operation, ResourceData};
//!
//! async fn refresh(client: &PamClient) {
//!     let outcome = dispatch::run_resource(client, "tag", Operation::Read, ResourceData::with_id("T1")).await;
//!     assert!(!outcome.has_error());
//! }
//! ```

pub mod data;
pub mod data_sources;
pub mod diag;
pub mod dispatch;
pub mod labels;
pub mod lifecycle;
mod registry;
pub mod resources;

pub use data::ResourceData;
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use dispatch::{apply, read_data_source, run_resource, Operation, Outcome};
pub use lifecycle::{DataSource, Resource};
pub use registry::*;
