//! Typed PAM operations
//!
//! Each file adds an `impl PamClient` block for one resource family. URL
//! templates, HTTP verbs and lock names live here; transport concerns stay in
//! [`crate::pam`].

pub mod advanced_settings;
pub mod applications;
pub mod constraints;
pub mod environments;
pub mod identity;
pub mod integrations;
pub mod policy_admin;
pub mod profile_policies;
pub mod profiles;
pub mod resource_manager;
pub mod templates;

pub use advanced_settings::{parse_target, split_policy_id};
pub use constraints::PermissionRef;
pub use environments::EntityKind;
pub use resource_manager::latest_version;
