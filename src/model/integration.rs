//! ITSM / IM connections and escalation policies

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub connection_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    pub id: String,
    pub name: String,
}

/// One page of `GET /im-manager/escalation-policies`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicyPage {
    #[serde(default)]
    pub more: bool,
    #[serde(default)]
    pub policies: Vec<EscalationPolicy>,
}
