//! Application environment tree
//!
//! The root environment group is read through the per-cycle cache because
//! every profile association check walks it. Mutations scope their lock to
//! the application id and drop the cached tree for that application.

use crate::model::{Environment, EnvironmentGroup, RootEnvironmentGroup};
use crate::pam::{ApiResult, PamClient};
use reqwest::Method;
use std::sync::Arc;

/// Which node kind an entity id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Environment,
    Group,
}

impl EntityKind {
    fn patch_segment(&self) -> &'static str {
        match self {
            EntityKind::Environment => "environments",
            EntityKind::Group => "groups",
        }
    }

    fn delete_segment(&self) -> &'static str {
        match self {
            EntityKind::Environment => "environments",
            EntityKind::Group => "environment-groups",
        }
    }
}

impl PamClient {
    /// Cached `GET /apps/{app}/root-environment-group`
    pub async fn get_application_root_environment_group(&self, app_id: &str) -> ApiResult<Arc<RootEnvironmentGroup>> {
        self.get_cached(&self.root_group_url(app_id)).await
    }

    /// `POST /apps/{app}/root-environment-group/environments`
    pub async fn create_environment(&self, app_id: &str, environment: &Environment) -> ApiResult<Environment> {
        let url = self.host_url(&format!("apps/{}/root-environment-group/environments", app_id));
        let created = self.mutate(Method::POST, &url, environment, app_id).await?;
        self.cache().invalidate(&self.root_group_url(app_id));
        Ok(created)
    }

    /// `POST /apps/{app}/root-environment-group/groups`
    pub async fn create_environment_group(&self, app_id: &str, group: &EnvironmentGroup) -> ApiResult<EnvironmentGroup> {
        let url = self.host_url(&format!("apps/{}/root-environment-group/groups", app_id));
        let created = self.mutate(Method::POST, &url, group, app_id).await?;
        self.cache().invalidate(&self.root_group_url(app_id));
        Ok(created)
    }

    /// `PATCH /apps/{app}/root-environment-group/environments/{id}`
    pub async fn update_environment(&self, app_id: &str, id: &str, environment: &Environment) -> ApiResult<Environment> {
        let url = self.entity_url(app_id, EntityKind::Environment, id);
        let updated = self.mutate(Method::PATCH, &url, environment, app_id).await?;
        self.cache().invalidate(&self.root_group_url(app_id));
        Ok(updated)
    }

    /// `PATCH /apps/{app}/root-environment-group/groups/{id}`
    pub async fn update_environment_group(&self, app_id: &str, id: &str, group: &EnvironmentGroup) -> ApiResult<EnvironmentGroup> {
        let url = self.entity_url(app_id, EntityKind::Group, id);
        let updated = self.mutate(Method::PATCH, &url, group, app_id).await?;
        self.cache().invalidate(&self.root_group_url(app_id));
        Ok(updated)
    }

    /// `DELETE /apps/{app}/{environments|environment-groups}/{id}`
    pub async fn delete_entity(&self, app_id: &str, kind: EntityKind, id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("apps/{}/{}/{}", app_id, kind.delete_segment(), id));
        self.delete(&url, app_id).await?;
        self.cache().invalidate(&self.root_group_url(app_id));
        Ok(())
    }

    fn root_group_url(&self, app_id: &str) -> String {
        self.host_url(&format!("apps/{}/root-environment-group", app_id))
    }

    fn entity_url(&self, app_id: &str, kind: EntityKind, id: &str) -> String {
        self.host_url(&format!(
            "apps/{}/root-environment-group/{}/{}",
            app_id,
            kind.patch_segment(),
            id
        ))
    }
}
