//! Read-only lookups by name

use super::data::ResourceData;
use super::lifecycle::DataSource;
use crate::api::PermissionRef;
use crate::model::SettingKind;
use crate::pam::{ApiError, ApiResult, PamClient};
use async_trait::async_trait;
use std::str::FromStr;

/// Every data source the provider serves
pub fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(ApplicationLookup),
        Box::new(IdentityProviderLookup),
        Box::new(ConnectionLookup),
        Box::new(EscalationPolicyLookup),
        Box::new(SupportedConstraintsLookup),
        Box::new(ResourceTypeLookup),
    ]
}

/// `application`: by display name
pub struct ApplicationLookup;

#[async_trait]
impl DataSource for ApplicationLookup {
    fn type_name(&self) -> &'static str {
        "application"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let application = client.get_application_by_name(data.get_str("name")?).await?;
        let id = application
            .app_container_id
            .ok_or_else(|| ApiError::validation("application has no container id"))?;
        data.set_id(id);
        data.set("catalog_app_id", application.catalog_app_id)?;
        data.set("catalog_app_name", application.catalog_app_name)?;
        data.set("status", application.status)?;
        Ok(())
    }
}

/// `identity_provider`: by name
pub struct IdentityProviderLookup;

#[async_trait]
impl DataSource for IdentityProviderLookup {
    fn type_name(&self) -> &'static str {
        "identity_provider"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let provider = client
            .get_identity_provider_by_name(data.get_str("name")?)
            .await?;
        data.set_id(provider.id);
        data.set("type", provider.provider_type)?;
        data.set("description", provider.description)?;
        Ok(())
    }
}

/// `connection`: an ITSM or IM connection, by setting type and name
pub struct ConnectionLookup;

#[async_trait]
impl DataSource for ConnectionLookup {
    fn type_name(&self) -> &'static str {
        "connection"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let kind = SettingKind::from_str(data.get_str("setting_type")?).map_err(ApiError::Validation)?;
        let connection = client
            .get_connection_by_name(kind, data.get_str("name")?)
            .await?;
        data.set_id(connection.id);
        data.set("type", connection.connection_type)?;
        Ok(())
    }
}

/// `escalation_policy`: paged search under an IM connection
pub struct EscalationPolicyLookup;

#[async_trait]
impl DataSource for EscalationPolicyLookup {
    fn type_name(&self) -> &'static str {
        "escalation_policy"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let policy = client
            .find_escalation_policy(data.get_str("connection_id")?, data.get_str("name")?)
            .await?;
        data.set_id(policy.id);
        Ok(())
    }
}

/// `supported_constraints`: constraint types a profile permission accepts
pub struct SupportedConstraintsLookup;

#[async_trait]
impl DataSource for SupportedConstraintsLookup {
    fn type_name(&self) -> &'static str {
        "supported_constraints"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let name = data.get_str("permission_name")?.to_string();
        let permission_type = data.get_str("permission_type")?.to_string();
        let permission = PermissionRef {
            profile_id: &profile_id,
            name: &name,
            permission_type: &permission_type,
        };
        let types = client.get_supported_constraint_types(&permission).await?;
        data.set_id(format!("{}/{}/{}", profile_id, name, permission_type));
        data.set("constraint_types", types)?;
        Ok(())
    }
}

/// `resource_manager_resource_type`: by name
pub struct ResourceTypeLookup;

#[async_trait]
impl DataSource for ResourceTypeLookup {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_type"
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let resource_type = client
            .get_resource_type_by_name(data.get_str("name")?)
            .await?;
        let id = resource_type
            .resource_type_id
            .ok_or_else(|| ApiError::validation("resource type has no id"))?;
        data.set_id(id);
        data.set("description", resource_type.description)?;
        Ok(())
    }
}
