use crate::api::parse_target;
use crate::model::{AdvancedSettings, Setting, SettingsTarget};
use crate::pam::{ApiError, ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `advanced_settings`: keyed `{TARGET}:{entity id}`, e.g.
/// `PROFILE_POLICY:paps/P1/policies/POL1`
pub struct AdvancedSettingsResource;

const ID_SEPARATOR: char = ':';

fn split_id(id: &str) -> ApiResult<(SettingsTarget, &str)> {
    let (target, entity) = id.split_once(ID_SEPARATOR).ok_or_else(|| {
        ApiError::validation(format!(
            "invalid identifier {:?}, expected <resource type>{}<entity id>",
            id, ID_SEPARATOR
        ))
    })?;
    Ok((parse_target(target)?, entity))
}

fn settings(data: &ResourceData) -> ApiResult<AdvancedSettings> {
    Ok(AdvancedSettings {
        settings: data.get_as::<Vec<Setting>>("settings")?.unwrap_or_default(),
    })
}

#[async_trait]
impl Resource for AdvancedSettingsResource {
    fn type_name(&self) -> &'static str {
        "advanced_settings"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let target = parse_target(data.get_str("resource_type")?)?;
        let entity_id = data.get_str("resource_id")?.to_string();
        client
            .save_advanced_settings(target, &entity_id, &settings(data)?, false)
            .await?;
        data.set_id(format!("{}{}{}", target, ID_SEPARATOR, entity_id));
        self.read(client, data).await
    }

    /// Inherited settings belong to the parent and are left out of the state
    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let (target, entity_id) = split_id(data.require_id()?)?;
        let entity_id = entity_id.to_string();
        let current = client.get_advanced_settings(target, &entity_id).await?;
        let own: Vec<Setting> = current.settings.into_iter().filter(|s| !s.is_inherited()).collect();
        data.set("resource_type", target.as_str())?;
        data.set("resource_id", &entity_id)?;
        data.set("settings", own)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let (target, entity_id) = split_id(data.require_id()?)?;
        client
            .save_advanced_settings(target, entity_id, &settings(data)?, true)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let (target, entity_id) = split_id(data.require_id()?)?;
        client.delete_advanced_settings(target, entity_id).await
    }

    async fn import(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        split_id(data.require_id()?)?;
        self.read(client, data).await
    }
}
