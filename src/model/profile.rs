//! Profiles and the records hanging off them

use super::policy::Members;
use serde::{Deserialize, Serialize};

/// Association type for an environment leaf
pub const ASSOCIATION_ENVIRONMENT: &str = "Environment";
/// Association type for an environment group
pub const ASSOCIATION_ENVIRONMENT_GROUP: &str = "EnvironmentGroup";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pap_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_container_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Milliseconds
    pub expiration_duration: i64,
    #[serde(default)]
    pub extendable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_prior_to_expiration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAssociation {
    #[serde(rename = "type")]
    pub association_type: String,
    pub value: String,
}

/// A user assigned to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIdentity {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A user tag assigned to a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTag {
    pub user_tag_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePermission {
    pub name: String,
    #[serde(rename = "type")]
    pub permission_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionOp {
    Add,
    Remove,
}

/// Body of `POST /paps/{profile}/permissions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePermissionRequest {
    pub op: PermissionOp,
    pub permission: ProfilePermission,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `Identity` or `Static`
    pub attribute_type: String,
    pub mapping_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_schema_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value: Option<String>,
    #[serde(default)]
    pub transitive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAdditionalSettings {
    #[serde(default)]
    pub use_app_credential_type: bool,
    #[serde(default)]
    pub console_access: bool,
    #[serde(default)]
    pub programmatic_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id_for_service_account: Option<String>,
}

/// A policy scoped to one profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub consumer: String,
    #[serde(default)]
    pub access_type: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub members: Members,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<ProfileAssociation>,
}
