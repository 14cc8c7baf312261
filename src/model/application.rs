//! Applications and their environment tree

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_app_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_app_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// Name/value pair used by application and environment properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Body of a properties PATCH
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypes {
    pub property_types: Vec<Property>,
}

/// Tree node under an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Leaf under an environment group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
}

/// `GET /apps/{app}/root-environment-group`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootEnvironmentGroup {
    #[serde(default)]
    pub environment_groups: Vec<EnvironmentGroup>,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl RootEnvironmentGroup {
    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn group(&self, id: &str) -> Option<&EnvironmentGroup> {
        self.environment_groups.iter().find(|g| g.id.as_deref() == Some(id))
    }

    /// Environment by id, falling back to a case-insensitive name match
    pub fn find_environment(&self, id_or_name: &str) -> Option<&Environment> {
        self.environment(id_or_name)
            .or_else(|| self.environments.iter().find(|e| e.name.eq_ignore_ascii_case(id_or_name)))
    }

    /// Group by id, falling back to a case-insensitive name match
    pub fn find_group(&self, id_or_name: &str) -> Option<&EnvironmentGroup> {
        self.group(id_or_name)
            .or_else(|| self.environment_groups.iter().find(|g| g.name.eq_ignore_ascii_case(id_or_name)))
    }
}
