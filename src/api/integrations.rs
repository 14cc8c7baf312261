//! ITSM and IM integrations: connections and escalation policies

use crate::model::{Connection, EscalationPolicy, EscalationPolicyPage, SettingKind};
use crate::pam::{encode, ApiError, ApiResult, PamClient};

impl PamClient {
    /// Connections for one setting type (`ITSM` or `IM`)
    ///
    /// Both kinds live under `itsm-manager/connections`; entries tagged with
    /// another setting type are dropped.
    pub async fn get_connections(&self, kind: SettingKind) -> ApiResult<Vec<Connection>> {
        if kind == SettingKind::Justification {
            return Err(ApiError::validation(format!(
                "setting type {} has no connections",
                kind.as_str()
            )));
        }
        let url = self.api_url(&format!("itsm-manager/connections?settingType={}", kind.as_str()));
        let connections: Vec<Connection> = self.get_list(&url).await?;
        Ok(connections
            .into_iter()
            .filter(|c| c.connection_type.is_empty() || c.connection_type.eq_ignore_ascii_case(kind.as_str()))
            .collect())
    }

    pub async fn get_connection_by_name(&self, kind: SettingKind, name: &str) -> ApiResult<Connection> {
        let connections = self.get_connections(kind).await?;
        if let Some(found) = connections.iter().find(|c| c.name.eq_ignore_ascii_case(name)) {
            return Ok(found.clone());
        }
        let known: Vec<&str> = connections.iter().map(|c| c.name.as_str()).collect();
        Err(ApiError::NoMatch(format!(
            "{} connection {:?} not found, try with one of: {}",
            kind.as_str(),
            name,
            known.join(", ")
        )))
    }

    /// Walk the paged escalation-policy search until a name matches or the
    /// remote reports no more pages
    pub async fn find_escalation_policy(&self, connection_id: &str, name: &str) -> ApiResult<EscalationPolicy> {
        let mut seen: Vec<String> = Vec::new();
        let mut page = 0u32;
        loop {
            let url = self.api_url(&format!(
                "im-manager/escalation-policies?page={}&connectionId={}&name={}",
                page,
                encode(connection_id),
                encode(name)
            ));
            let result: EscalationPolicyPage = self.get_json(&url).await?;
            tracing::debug!(page, policies = result.policies.len(), more = result.more, "escalation policy page");

            for policy in result.policies {
                if policy.name.eq_ignore_ascii_case(name) {
                    return Ok(policy);
                }
                seen.push(policy.name);
            }
            if !result.more {
                break;
            }
            page += 1;
        }

        Err(ApiError::NoMatch(format!(
            "escalation policy {:?} not found, try with one of: {}",
            name,
            seen.join(",")
        )))
    }
}
