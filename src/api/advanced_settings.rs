//! Advanced settings multiplex
//!
//! One bundle shape, five attachment points. Application and resource
//! manager profile bundles are created with POST and replaced with PUT,
//! profile bundles are always PUT, and the two policy targets are PATCHed
//! onto the policy itself, addressed by a composite profile/policy id.

use crate::ids::{self, CompositeId};
use crate::model::{AdvancedSettings, SettingsTarget};
use crate::pam::{lock_names, ApiError, ApiResult, PamClient};
use reqwest::Method;

/// Parse a target name, rejecting unknown ones before any request is made
pub fn parse_target(name: &str) -> ApiResult<SettingsTarget> {
    name.parse::<SettingsTarget>().map_err(ApiError::Validation)
}

fn policy_template(target: SettingsTarget) -> Option<CompositeId> {
    match target {
        SettingsTarget::ProfilePolicy => Some(ids::PROFILE_POLICY),
        SettingsTarget::ResourceManagerProfilePolicy => Some(ids::RESOURCE_MANAGER_PROFILE_POLICY),
        _ => None,
    }
}

/// Split a policy-target id into `(profile_id, policy_id)`
pub fn split_policy_id(target: SettingsTarget, id: &str) -> ApiResult<(String, String)> {
    let template = policy_template(target)
        .ok_or_else(|| ApiError::validation(format!("{} is not a policy target", target)))?;
    let [profile, policy] = template.parse_n::<2>(id).map_err(|_| {
        ApiError::validation(format!(
            "advanced settings for {} need the profile id embedded in {:?}, expected {}",
            target,
            id,
            template.template()
        ))
    })?;
    Ok((profile, policy))
}

impl PamClient {
    fn settings_url(&self, target: SettingsTarget, entity_id: &str) -> ApiResult<String> {
        if entity_id.trim().is_empty() {
            return Err(ApiError::validation(format!("advanced settings for {} need an id", target)));
        }
        Ok(match target {
            SettingsTarget::Application => self.api_url(&format!("apps/{}/advanced-settings", entity_id)),
            SettingsTarget::Profile => self.api_url(&format!("paps/{}/advanced-settings", entity_id)),
            SettingsTarget::ResourceManagerProfile => {
                self.api_url(&format!("resource-manager/profile/{}/advanced-settings", entity_id))
            },
            SettingsTarget::ProfilePolicy => {
                let (profile, policy) = split_policy_id(target, entity_id)?;
                self.api_url(&format!("paps/{}/policies/{}", profile, policy))
            },
            SettingsTarget::ResourceManagerProfilePolicy => {
                let (profile, policy) = split_policy_id(target, entity_id)?;
                self.api_url(&format!("resource-manager/profiles/{}/policies/{}", profile, policy))
            },
        })
    }

    /// Read the bundle attached to `entity_id`. Policy targets read the policy
    /// document and keep its `settings` member.
    pub async fn get_advanced_settings(&self, target: SettingsTarget, entity_id: &str) -> ApiResult<AdvancedSettings> {
        let url = self.settings_url(target, entity_id)?;
        self.get_json(&url).await
    }

    /// Write a bundle, choosing the verb from the target and whether one
    /// already exists
    pub async fn save_advanced_settings(
        &self,
        target: SettingsTarget,
        entity_id: &str,
        settings: &AdvancedSettings,
        update: bool,
    ) -> ApiResult<AdvancedSettings> {
        let url = self.settings_url(target, entity_id)?;
        let method = match (target, update) {
            (SettingsTarget::Application | SettingsTarget::ResourceManagerProfile, false) => Method::POST,
            (SettingsTarget::Application | SettingsTarget::ResourceManagerProfile, true) => Method::PUT,
            (SettingsTarget::Profile, _) => Method::PUT,
            (SettingsTarget::ProfilePolicy | SettingsTarget::ResourceManagerProfilePolicy, _) => Method::PATCH,
        };
        tracing::debug!(settings_target = %target, %method, "saving advanced settings");
        self.mutate(method, &url, settings, lock_names::ADVANCED_SETTING).await
    }

    /// There is no DELETE; an empty bundle replaces the current one
    pub async fn delete_advanced_settings(&self, target: SettingsTarget, entity_id: &str) -> ApiResult<()> {
        self.save_advanced_settings(target, entity_id, &AdvancedSettings::default(), true)
            .await
            .map(|_| ())
    }
}
