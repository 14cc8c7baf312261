use super::assigned_id;
use crate::api::EntityKind;
use crate::ids::{self, CompositeId};
use crate::model::{Environment, EnvironmentGroup};
use crate::pam::{ApiError, ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `entity_environment` and `entity_group`: nodes of an application's
/// environment tree, keyed `apps/{app}/root-environment-group/{kind}/{id}`
pub struct EntityResource {
    kind: EntityKind,
}

impl EntityResource {
    pub fn environments() -> Self {
        Self {
            kind: EntityKind::Environment,
        }
    }

    pub fn groups() -> Self {
        Self { kind: EntityKind::Group }
    }

    fn format(&self) -> CompositeId {
        match self.kind {
            EntityKind::Environment => ids::ENTITY_ENVIRONMENT,
            EntityKind::Group => ids::ENTITY_GROUP,
        }
    }

    fn environment(data: &ResourceData) -> ApiResult<Environment> {
        Ok(Environment {
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            parent_group_id: data.get_string("parent_group_id"),
            ..Default::default()
        })
    }

    fn group(data: &ResourceData) -> ApiResult<EnvironmentGroup> {
        Ok(EnvironmentGroup {
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            parent_id: data.get_string("parent_group_id"),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Resource for EntityResource {
    fn type_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Environment => "entity_environment",
            EntityKind::Group => "entity_group",
        }
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(self.format())
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let app_id = data.get_str("app_id")?.to_string();
        let entity_id = match self.kind {
            EntityKind::Environment => {
                let created = client.create_environment(&app_id, &Self::environment(data)?).await?;
                assigned_id(created.id, "environment")?
            },
            EntityKind::Group => {
                let created = client.create_environment_group(&app_id, &Self::group(data)?).await?;
                assigned_id(created.id, "environment group")?
            },
        };
        data.set_id(self.format().format(&[app_id.as_str(), entity_id.as_str()])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [app_id, entity_id] = self.format().parse_n::<2>(data.require_id()?)?;
        let tree = client.get_application_root_environment_group(&app_id).await?;
        data.set("app_id", &app_id)?;
        match self.kind {
            EntityKind::Environment => {
                let env = tree.environment(&entity_id).ok_or(ApiError::NotFound)?;
                data.set("name", &env.name)?;
                data.set("description", &env.description)?;
                data.set("parent_group_id", &env.parent_group_id)?;
            },
            EntityKind::Group => {
                let group = tree.group(&entity_id).ok_or(ApiError::NotFound)?;
                data.set("name", &group.name)?;
                data.set("description", &group.description)?;
                data.set("parent_group_id", &group.parent_id)?;
            },
        }
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [app_id, entity_id] = self.format().parse_n::<2>(data.require_id()?)?;
        match self.kind {
            EntityKind::Environment => {
                client
                    .update_environment(&app_id, &entity_id, &Self::environment(data)?)
                    .await?;
            },
            EntityKind::Group => {
                client
                    .update_environment_group(&app_id, &entity_id, &Self::group(data)?)
                    .await?;
            },
        }
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [app_id, entity_id] = self.format().parse_n::<2>(data.require_id()?)?;
        client.delete_entity(&app_id, self.kind, &entity_id).await
    }
}
