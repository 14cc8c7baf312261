use super::{assigned_id, named_refs, ref_names};
use crate::model::{Members, Permission, Policy, Role};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `policy`: a global access policy
pub struct PolicyResource;

impl PolicyResource {
    fn policy(data: &ResourceData) -> ApiResult<Policy> {
        Ok(Policy {
            policy_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            consumer: data.get_string("consumer").unwrap_or_default(),
            access_type: data.get_string("access_type").unwrap_or_default(),
            is_active: data.get_bool("is_active"),
            is_draft: data.get_bool("is_draft"),
            is_read_only: false,
            members: data.get_as::<Members>("members")?.unwrap_or_default(),
            condition: data.get_string("condition"),
            permissions: named_refs(data.get_str_list("permissions")),
            roles: named_refs(data.get_str_list("roles")),
        })
    }
}

#[async_trait]
impl Resource for PolicyResource {
    fn type_name(&self) -> &'static str {
        "policy"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_policy(&Self::policy(data)?).await?;
        data.set_id(assigned_id(created.policy_id, "policy")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let policy = client.get_policy(data.require_id()?).await?;
        data.set("name", &policy.name)?;
        data.set("description", &policy.description)?;
        data.set("consumer", &policy.consumer)?;
        data.set("access_type", &policy.access_type)?;
        data.set("is_active", policy.is_active)?;
        data.set("is_draft", policy.is_draft)?;
        data.set("is_read_only", policy.is_read_only)?;
        data.set("members", &policy.members)?;
        data.set("condition", &policy.condition)?;
        data.set("permissions", ref_names(&policy.permissions))?;
        data.set("roles", ref_names(&policy.roles))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client.update_policy(data.require_id()?, &Self::policy(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_policy(data.require_id()?).await
    }
}

/// `role`: a named bundle of permissions
pub struct RoleResource;

impl RoleResource {
    fn role(data: &ResourceData) -> ApiResult<Role> {
        Ok(Role {
            role_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            permissions: named_refs(data.get_str_list("permissions")),
        })
    }
}

#[async_trait]
impl Resource for RoleResource {
    fn type_name(&self) -> &'static str {
        "role"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_role(&Self::role(data)?).await?;
        data.set_id(assigned_id(created.role_id, "role")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let role = client.get_role(data.require_id()?).await?;
        data.set("name", &role.name)?;
        data.set("description", &role.description)?;
        data.set("permissions", ref_names(&role.permissions))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client.update_role(data.require_id()?, &Self::role(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_role(data.require_id()?).await
    }
}

/// `permission`: consumer + actions + resources
pub struct PermissionResource;

impl PermissionResource {
    fn permission(data: &ResourceData) -> ApiResult<Permission> {
        Ok(Permission {
            permission_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            consumer: data.get_str("consumer")?.to_string(),
            resources: data.get_str_list("resources"),
            actions: data.get_str_list("actions"),
        })
    }
}

#[async_trait]
impl Resource for PermissionResource {
    fn type_name(&self) -> &'static str {
        "permission"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_permission(&Self::permission(data)?).await?;
        data.set_id(assigned_id(created.permission_id, "permission")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let permission = client.get_permission(data.require_id()?).await?;
        data.set("name", &permission.name)?;
        data.set("description", &permission.description)?;
        data.set("consumer", &permission.consumer)?;
        data.set("resources", &permission.resources)?;
        data.set("actions", &permission.actions)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_permission(data.require_id()?, &Self::permission(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_permission(data.require_id()?).await
    }
}
