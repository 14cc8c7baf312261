//! Resource manager profiles and what hangs off them

use super::assigned_id;
use crate::ids::{self, CompositeId};
use crate::model::resource_manager::VERSION_LATEST;
use crate::model::{
    Members, PermissionVariable, ProfilePermissionsUpdate, ProfileResourceAssociations, ResourceManagerProfile,
    ResourceManagerProfilePermission, ResourceManagerProfilePolicy,
};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::labels::{flatten_labels, split_labels};
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `resource_manager_profile`: labels are saved through the associations
/// endpoint after the profile itself
pub struct RmProfileResource;

impl RmProfileResource {
    fn profile(data: &ResourceData) -> ApiResult<ResourceManagerProfile> {
        Ok(ResourceManagerProfile {
            profile_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            expiration_duration: data.get_i64("expiration_duration").unwrap_or_default(),
            delegation_enabled: data.get_bool("delegation_enabled"),
        })
    }

    fn associations(data: &ResourceData) -> ProfileResourceAssociations {
        ProfileResourceAssociations {
            resource_labels: split_labels(&data.get_str_map("labels")),
        }
    }
}

#[async_trait]
impl Resource for RmProfileResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_profile"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_rm_profile(&Self::profile(data)?).await?;
        let id = assigned_id(created.profile_id, "resource manager profile")?;
        client
            .update_rm_profile_associations(&id, &Self::associations(data))
            .await?;
        data.set_id(id);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let id = data.require_id()?.to_string();
        let (profile, associations) = futures::try_join!(
            client.get_rm_profile(&id),
            client.get_rm_profile_associations(&id)
        )?;
        data.set("name", &profile.name)?;
        data.set("description", &profile.description)?;
        data.set("expiration_duration", profile.expiration_duration)?;
        data.set("delegation_enabled", profile.delegation_enabled)?;
        data.set("labels", flatten_labels(&associations.resource_labels))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let id = data.require_id()?.to_string();
        client.update_rm_profile(&id, &Self::profile(data)?).await?;
        client
            .update_rm_profile_associations(&id, &Self::associations(data))
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_rm_profile(data.require_id()?).await
    }
}

/// `resource_manager_profile_permission`: keyed
/// `resource-manager/profile/{profile}/permissions/{permission}`
pub struct RmProfilePermissionResource;

impl RmProfilePermissionResource {
    async fn assignment(
        client: &PamClient,
        permission_id: &str,
        data: &ResourceData,
    ) -> ApiResult<ResourceManagerProfilePermission> {
        let wanted = data.get_string("version").unwrap_or_else(|| VERSION_LATEST.to_string());
        let version = client
            .resolve_resource_permission_version(permission_id, &wanted)
            .await?;
        let variables = data
            .get_str_map("variables")
            .into_iter()
            .map(|(name, value)| PermissionVariable {
                name,
                value,
                is_system_level_variable: false,
            })
            .collect();
        Ok(ResourceManagerProfilePermission {
            permission_id: permission_id.to_string(),
            permission_name: data.get_string("permission_name").unwrap_or_default(),
            version,
            variables,
        })
    }

    fn removal(permission_id: &str) -> ResourceManagerProfilePermission {
        ResourceManagerProfilePermission {
            permission_id: permission_id.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Resource for RmProfilePermissionResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_profile_permission"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::RESOURCE_MANAGER_PROFILE_PERMISSION)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let permission_id = data.get_str("permission_id")?.to_string();
        let update = ProfilePermissionsUpdate {
            permissions_to_add: vec![Self::assignment(client, &permission_id, data).await?],
            permissions_to_remove: Vec::new(),
        };
        client.update_rm_profile_permissions(&profile_id, &update).await?;
        data.set_id(ids::RESOURCE_MANAGER_PROFILE_PERMISSION.format(&[&profile_id, &permission_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, permission_id] = ids::RESOURCE_MANAGER_PROFILE_PERMISSION.parse_n::<2>(data.require_id()?)?;
        let assigned = client
            .get_rm_profile_permission(&profile_id, &permission_id)
            .await?;
        let variables: std::collections::BTreeMap<String, String> = assigned
            .variables
            .into_iter()
            .filter(|v| !v.is_system_level_variable)
            .map(|v| (v.name, v.value))
            .collect();
        data.set("profile_id", &profile_id)?;
        data.set("permission_id", &assigned.permission_id)?;
        data.set("permission_name", &assigned.permission_name)?;
        data.set("resolved_version", &assigned.version)?;
        data.set("variables", variables)?;
        Ok(())
    }

    /// Swap the assignment in a single PATCH
    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, permission_id] = ids::RESOURCE_MANAGER_PROFILE_PERMISSION.parse_n::<2>(data.require_id()?)?;
        let update = ProfilePermissionsUpdate {
            permissions_to_add: vec![Self::assignment(client, &permission_id, data).await?],
            permissions_to_remove: vec![Self::removal(&permission_id)],
        };
        client.update_rm_profile_permissions(&profile_id, &update).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, permission_id] = ids::RESOURCE_MANAGER_PROFILE_PERMISSION.parse_n::<2>(data.require_id()?)?;
        let update = ProfilePermissionsUpdate {
            permissions_to_add: Vec::new(),
            permissions_to_remove: vec![Self::removal(&permission_id)],
        };
        client.update_rm_profile_permissions(&profile_id, &update).await
    }
}

/// `resource_manager_profile_policy`: keyed
/// `resource-manager/profile/{profile}/policies/{policy}`
pub struct RmProfilePolicyResource;

impl RmProfilePolicyResource {
    fn policy(data: &ResourceData, profile_id: &str) -> ApiResult<ResourceManagerProfilePolicy> {
        Ok(ResourceManagerProfilePolicy {
            policy_id: None,
            profile_id: Some(profile_id.to_string()),
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            access_type: data.get_string("access_type").unwrap_or_default(),
            is_active: data.get_bool("is_active"),
            is_draft: data.get_bool("is_draft"),
            is_read_only: false,
            members: data.get_as::<Members>("members")?.unwrap_or_default(),
            condition: data.get_string("condition"),
            resource_labels: split_labels(&data.get_str_map("labels")),
        })
    }
}

#[async_trait]
impl Resource for RmProfilePolicyResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_profile_policy"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::RESOURCE_MANAGER_PROFILE_POLICY)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let created = client
            .create_rm_profile_policy(&profile_id, &Self::policy(data, &profile_id)?)
            .await?;
        let policy_id = assigned_id(created.policy_id, "resource manager profile policy")?;
        data.set_id(ids::RESOURCE_MANAGER_PROFILE_POLICY.format(&[&profile_id, &policy_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::RESOURCE_MANAGER_PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        let policy = client.get_rm_profile_policy(&profile_id, &policy_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("policy_id", &policy_id)?;
        data.set("name", &policy.name)?;
        data.set("description", &policy.description)?;
        data.set("access_type", &policy.access_type)?;
        data.set("is_active", policy.is_active)?;
        data.set("is_draft", policy.is_draft)?;
        data.set("is_read_only", policy.is_read_only)?;
        data.set("members", &policy.members)?;
        data.set("condition", &policy.condition)?;
        data.set("labels", flatten_labels(&policy.resource_labels))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::RESOURCE_MANAGER_PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        client
            .update_rm_profile_policy(&profile_id, &policy_id, &Self::policy(data, &profile_id)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, policy_id] = ids::RESOURCE_MANAGER_PROFILE_POLICY.parse_n::<2>(data.require_id()?)?;
        client.delete_rm_profile_policy(&profile_id, &policy_id).await
    }
}
