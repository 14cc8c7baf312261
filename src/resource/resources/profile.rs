use super::assigned_id;
use crate::ids::{self, CompositeId};
use crate::model::profile::{ASSOCIATION_ENVIRONMENT, ASSOCIATION_ENVIRONMENT_GROUP};
use crate::model::{Members, Profile, ProfileAdditionalSettings, ProfileAssociation, ProfilePolicy, RootEnvironmentGroup};
use crate::pam::{ApiError, ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// Associations as written in the state: `[{type, value}]`, where value is
/// an environment (group) id or name
fn associations(data: &ResourceData) -> ApiResult<Vec<ProfileAssociation>> {
    data.get_object_list("associations")
        .iter()
        .map(|block| {
            Ok(ProfileAssociation {
                association_type: block.get_str("type")?.to_string(),
                value: block.get_str("value")?.to_string(),
            })
        })
        .collect()
}

/// Check every association against the application's environment tree and
/// replace names with ids
pub(crate) fn resolve_associations(
    tree: &RootEnvironmentGroup,
    associations: Vec<ProfileAssociation>,
) -> ApiResult<Vec<ProfileAssociation>> {
    associations
        .into_iter()
        .map(|assoc| {
            let id = if assoc.association_type.eq_ignore_ascii_case(ASSOCIATION_ENVIRONMENT) {
                tree.find_environment(&assoc.value).and_then(|e| e.id.clone())
            } else if assoc.association_type.eq_ignore_ascii_case(ASSOCIATION_ENVIRONMENT_GROUP) {
                tree.find_group(&assoc.value).and_then(|g| g.id.clone())
            } else {
                return Err(ApiError::validation(format!(
                    "association type {} must be {} or {}",
                    assoc.association_type, ASSOCIATION_ENVIRONMENT, ASSOCIATION_ENVIRONMENT_GROUP
                )));
            };
            let value = id.ok_or_else(|| {
                ApiError::validation(format!(
                    "{} {} does not exist in the application",
                    assoc.association_type, assoc.value
                ))
            })?;
            Ok(ProfileAssociation {
                association_type: assoc.association_type,
                value,
            })
        })
        .collect()
}

fn association_blocks(associations: &[ProfileAssociation]) -> Vec<serde_json::Value> {
    associations
        .iter()
        .map(|a| serde_json::json!({"type": a.association_type, "value": a.value}))
        .collect()
}

/// `profile`: keyed `apps/{app}/paps/{profile}`
pub struct ProfileResource;

impl ProfileResource {
    fn profile(data: &ResourceData) -> ApiResult<Profile> {
        Ok(Profile {
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            expiration_duration: data
                .get_i64("expiration_duration")
                .ok_or_else(|| ApiError::validation("missing required attribute expiration_duration"))?,
            extendable: data.get_bool("extendable"),
            notification_prior_to_expiration: data.get_i64("notification_prior_to_expiration"),
            extension_duration: data.get_i64("extension_duration"),
            extension_limit: data.get_i64("extension_limit"),
            destination_url: data.get_string("destination_url"),
            ..Default::default()
        })
    }

    /// Replace the remote associations with the configured ones; an empty
    /// list clears them
    async fn save_associations(client: &PamClient, app_id: &str, profile_id: &str, data: &ResourceData) -> ApiResult<()> {
        let wanted = associations(data)?;
        let resolved = if wanted.is_empty() {
            Vec::new()
        } else {
            let tree = client.get_application_root_environment_group(app_id).await?;
            resolve_associations(&tree, wanted)?
        };
        client.save_profile_associations(profile_id, &resolved).await
    }
}

#[async_trait]
impl Resource for ProfileResource {
    fn type_name(&self) -> &'static str {
        "profile"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let app_id = data.get_str("app_id")?.to_string();
        let profile = Self::profile(data)?;
        // fail on bad associations before creating anything
        let has_associations = !associations(data)?.is_empty();
        if has_associations {
            let tree = client.get_application_root_environment_group(&app_id).await?;
            resolve_associations(&tree, associations(data)?)?;
        }

        let created = client.create_profile(&app_id, &profile).await?;
        let profile_id = assigned_id(created.pap_id, "profile")?;
        data.set_id(ids::PROFILE.format(&[app_id.as_str(), profile_id.as_str()])?);
        if has_associations {
            Self::save_associations(client, &app_id, &profile_id, data).await?;
        }
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [app_id, profile_id] = ids::PROFILE.parse_n::<2>(data.require_id()?)?;
        let (profile, scopes) = futures::try_join!(
            client.get_profile(&profile_id),
            client.get_profile_associations(&profile_id)
        )?;

        data.set("app_id", &app_id)?;
        data.set("name", &profile.name)?;
        data.set("description", &profile.description)?;
        data.set("expiration_duration", profile.expiration_duration)?;
        data.set("extendable", profile.extendable)?;
        data.set("notification_prior_to_expiration", profile.notification_prior_to_expiration)?;
        data.set("extension_duration", profile.extension_duration)?;
        data.set("extension_limit", profile.extension_limit)?;
        data.set("destination_url", &profile.destination_url)?;
        data.set("status", &profile.status)?;
        data.set("associations", association_blocks(&scopes))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [app_id, profile_id] = ids::PROFILE.parse_n::<2>(data.require_id()?)?;
        client.update_profile(&profile_id, &Self::profile(data)?).await?;
        Self::save_associations(client, &app_id, &profile_id, data).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [app_id, profile_id] = ids::PROFILE.parse_n::<2>(data.require_id()?)?;
        client.delete_profile(&app_id, &profile_id).await
    }
}

/// `profile_additional_settings`: keyed by the profile id; always exists, so
/// create and update are the same PATCH and delete restores the defaults
pub struct ProfileAdditionalSettingsResource;

impl ProfileAdditionalSettingsResource {
    fn settings(data: &ResourceData) -> ProfileAdditionalSettings {
        ProfileAdditionalSettings {
            use_app_credential_type: data.get_bool("use_app_credential_type"),
            console_access: data.get_bool("console_access"),
            programmatic_access: data.get_bool("programmatic_access"),
            project_id_for_service_account: data.get_string("project_id_for_service_account"),
        }
    }
}

#[async_trait]
impl Resource for ProfileAdditionalSettingsResource {
    fn type_name(&self) -> &'static str {
        "profile_additional_settings"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        client
            .update_profile_additional_settings(&profile_id, &Self::settings(data))
            .await?;
        data.set_id(profile_id);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.require_id()?.to_string();
        let settings = client.get_profile_additional_settings(&profile_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("use_app_credential_type", settings.use_app_credential_type)?;
        data.set("console_access", settings.console_access)?;
        data.set("programmatic_access", settings.programmatic_access)?;
        data.set("project_id_for_service_account", settings.project_id_for_service_account)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_profile_additional_settings(data.require_id()?, &Self::settings(data))
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client
            .update_profile_additional_settings(data.require_id()?, &ProfileAdditionalSettings::default())
            .await
            .map(|_| ())
    }
}

/// `profile_policy`: keyed `paps/{profile}/policies/{policy}`
pub struct ProfilePolicyResource;

impl ProfilePolicyResource {
    fn policy(data: &ResourceData) -> ApiResult<ProfilePolicy> {
        Ok(ProfilePolicy {
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            consumer: data.get_string("consumer").unwrap_or_default(),
            access_type: data.get_string("access_type").unwrap_or_default(),
            is_active: data.get_bool("is_active"),
            is_draft: data.get_bool("is_draft"),
            members: data.get_as::<Members>("members")?.unwrap_or_default(),
            condition: data.get_string("condition"),
            associations: associations(data)?,
            ..Default::default()
        })
    }
}

#[async_trait]
impl Resource for ProfilePolicyResource {
    fn type_name(&self) -> &'static str {
        "profile_policy"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE_POLICY)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let created = client.create_profile_policy(&profile_id, &Self::policy(data)?).await?;
        let policy_id = assigned_id(created.policy_id, "profile policy")?;
        data.set_id(ids::PROFILE_POLICY.format(&[profile_id.as_str(), policy_id.as_str()])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        let policy = client.get_profile_policy(&profile_id, &policy_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("name", &policy.name)?;
        data.set("description", &policy.description)?;
        data.set("consumer", &policy.consumer)?;
        data.set("access_type", &policy.access_type)?;
        data.set("is_active", policy.is_active)?;
        data.set("is_draft", policy.is_draft)?;
        data.set("is_read_only", policy.is_read_only)?;
        data.set("members", &policy.members)?;
        data.set("condition", &policy.condition)?;
        data.set("associations", association_blocks(&policy.associations))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        client
            .update_profile_policy(&profile_id, &policy_id, &Self::policy(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        client.delete_profile_policy(&profile_id, &policy_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Environment, EnvironmentGroup};

    fn tree() -> RootEnvironmentGroup {
        RootEnvironmentGroup {
            environment_groups: vec![EnvironmentGroup {
                id: Some("G1".into()),
                name: "prod".into(),
                ..Default::default()
            }],
            environments: vec![Environment {
                id: Some("E1".into()),
                name: "dev".into(),
                ..Default::default()
            }],
        }
    }

    fn assoc(kind: &str, value: &str) -> ProfileAssociation {
        ProfileAssociation {
            association_type: kind.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_associations_resolve_names_to_ids() {
        let resolved = resolve_associations(
            &tree(),
            vec![assoc("Environment", "DEV"), assoc("EnvironmentGroup", "G1")],
        )
        .unwrap();
        assert_eq!(resolved[0].value, "E1");
        assert_eq!(resolved[1].value, "G1");
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let err = resolve_associations(&tree(), vec![assoc("Environment", "staging")]).unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_unknown_association_type_is_rejected() {
        assert!(resolve_associations(&tree(), vec![assoc("Cluster", "E1")]).is_err());
    }
}
