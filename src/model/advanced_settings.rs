//! Advanced settings: justification, ITSM and IM integrations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an advanced-settings bundle is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsTarget {
    Application,
    Profile,
    ProfilePolicy,
    ResourceManagerProfile,
    ResourceManagerProfilePolicy,
}

impl SettingsTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::Profile => "PROFILE",
            Self::ProfilePolicy => "PROFILE_POLICY",
            Self::ResourceManagerProfile => "RESOURCE_MANAGER_PROFILE",
            Self::ResourceManagerProfilePolicy => "RESOURCE_MANAGER_PROFILE_POLICY",
        }
    }

    /// Policy targets are addressed by a composite profile/policy id
    pub fn is_policy(&self) -> bool {
        matches!(self, Self::ProfilePolicy | Self::ResourceManagerProfilePolicy)
    }
}

impl fmt::Display for SettingsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "APPLICATION" => Ok(Self::Application),
            "PROFILE" => Ok(Self::Profile),
            "PROFILE_POLICY" => Ok(Self::ProfilePolicy),
            "RESOURCE_MANAGER_PROFILE" => Ok(Self::ResourceManagerProfile),
            "RESOURCE_MANAGER_PROFILE_POLICY" => Ok(Self::ResourceManagerProfilePolicy),
            other => Err(format!("resource type {} not supported", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    #[serde(default)]
    pub settings: Vec<Setting>,
}

/// Fields shared by every setting kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingEntry<V> {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub is_inherited: bool,
    pub value: V,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "settingsType")]
pub enum Setting {
    #[serde(rename = "JUSTIFICATION")]
    Justification(SettingEntry<JustificationValue>),
    #[serde(rename = "ITSM")]
    Itsm(SettingEntry<ItsmValue>),
    #[serde(rename = "IM")]
    Im(SettingEntry<ImValue>),
}

impl Setting {
    pub fn kind(&self) -> SettingKind {
        match self {
            Setting::Justification(_) => SettingKind::Justification,
            Setting::Itsm(_) => SettingKind::Itsm,
            Setting::Im(_) => SettingKind::Im,
        }
    }

    pub fn is_inherited(&self) -> bool {
        match self {
            Setting::Justification(e) => e.is_inherited,
            Setting::Itsm(e) => e.is_inherited,
            Setting::Im(e) => e.is_inherited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SettingKind {
    Justification,
    Itsm,
    Im,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Justification => "JUSTIFICATION",
            Self::Itsm => "ITSM",
            Self::Im => "IM",
        }
    }
}

impl FromStr for SettingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JUSTIFICATION" => Ok(Self::Justification),
            "ITSM" => Ok(Self::Itsm),
            "IM" => Ok(Self::Im),
            other => Err(format!("unknown setting type {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JustificationValue {
    #[serde(default)]
    pub is_justification_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification_regex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItsmValue {
    #[serde(default)]
    pub connection_id: String,
    #[serde(default)]
    pub connection_type: String,
    #[serde(default)]
    pub is_itsm_enabled: bool,
    #[serde(default)]
    pub itsm_filter_criteria: Vec<ItsmFilterCriteria>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItsmFilterCriteria {
    pub supported_ticket_type: String,
    /// Free-form filter document
    #[serde(default)]
    pub filter: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImValue {
    #[serde(default)]
    pub connection_id: String,
    #[serde(default)]
    pub connection_type: String,
    #[serde(default)]
    pub is_auto_approval_enabled: bool,
    #[serde(default)]
    pub escalation_policies: Vec<String>,
}
