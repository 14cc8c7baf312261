//! REST client runtime and provider layer for a hosted privileged access
//! management (PAM) service.
//!
//! - [`pam`] - HTTP transport, status classification, retry, locks, cache
//! - [`api`] - Typed operations per resource family
//! - [`model`] - Wire types
//! - [`resource`] - Resources, data sources and the dispatcher
//! - [`config`] - Provider configuration

pub mod api;
pub mod config;
pub mod ids;
pub mod model;
pub mod pam;
pub mod resource;

/// Version injected at compile time via PAM_PROVIDER_VERSION (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PAM_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
