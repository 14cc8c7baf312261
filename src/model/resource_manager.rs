//! Resource manager: resource types, resources, labels, permissions,
//! policies, profiles and response templates

use super::policy::{Members, NamedRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label name → ordered values
pub type LabelAssignments = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeParameter {
    pub param_name: String,
    #[serde(default)]
    pub param_type: String,
    #[serde(default)]
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ResourceTypeParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// An instance of a resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub resource_type: ResourceTypeRef,
    #[serde(default)]
    pub parameter_values: BTreeMap<String, String>,
    #[serde(default)]
    pub resource_labels: LabelAssignments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub label_color: String,
    #[serde(default)]
    pub values: Vec<LabelValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerPool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    pub name: String,
}

/// Versioned resource-type permission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub resource_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub checkin_time_limit: i64,
    #[serde(default)]
    pub checkout_time_limit: i64,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub show_orig_creds: bool,
    #[serde(default)]
    pub checkin_code: String,
    #[serde(default)]
    pub checkout_code: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub response_templates: Vec<String>,
}

/// Version alias resolved against the version list
pub const VERSION_LATEST: &str = "latest";
/// Version alias meaning "whatever is stored for the permission right now"
pub const VERSION_LOCAL: &str = "local";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
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
    pub permissions: Vec<NamedRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<NamedRef>,
    #[serde(default)]
    pub resource_labels: LabelAssignments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManagerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Milliseconds
    #[serde(default)]
    pub expiration_duration: i64,
    #[serde(default)]
    pub delegation_enabled: bool,
}

/// `GET|PATCH /resource-manager/profiles/{id}/associations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResourceAssociations {
    #[serde(default)]
    pub resource_labels: LabelAssignments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionVariable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_system_level_variable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManagerProfilePermission {
    pub permission_id: String,
    #[serde(default)]
    pub permission_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub variables: Vec<PermissionVariable>,
}

/// Body of `PATCH /resource-manager/profiles/{id}/permissions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePermissionsUpdate {
    #[serde(default)]
    pub permissions_to_add: Vec<ResourceManagerProfilePermission>,
    #[serde(default)]
    pub permissions_to_remove: Vec<ResourceManagerProfilePermission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManagerProfilePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
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
    #[serde(default)]
    pub resource_labels: LabelAssignments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_console_access_enabled: bool,
    #[serde(default)]
    pub show_on_ui: bool,
    #[serde(default)]
    pub template_data: String,
}
