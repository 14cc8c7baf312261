//! Resource manager resources

use super::{assigned_id, named_refs, ref_names};
use crate::ids::{self, CompositeId};
use crate::model::resource_manager::{VERSION_LATEST, VERSION_LOCAL};
use crate::model::{
    LabelValue, Members, Resource as ServerAccessResource, ResourceLabel, ResourcePermission, ResourcePolicy,
    ResourceType, ResourceTypeParameter, ResourceTypeRef, ResponseTemplate,
};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::labels::{flatten_labels, split_labels};
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

// =============================================================================
// Resource types
// =============================================================================

/// `resource_manager_resource_type`
pub struct ResourceTypeResource;

impl ResourceTypeResource {
    fn resource_type(data: &ResourceData) -> ApiResult<ResourceType> {
        let parameters = data
            .get_object_list("parameters")
            .iter()
            .map(|p| {
                Ok(ResourceTypeParameter {
                    param_name: p.get_str("param_name")?.to_string(),
                    param_type: p.get_string("param_type").unwrap_or_default(),
                    is_mandatory: p.get_bool("is_mandatory"),
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(ResourceType {
            resource_type_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            parameters,
        })
    }

    async fn sync_icon(client: &PamClient, id: &str, data: &ResourceData) -> ApiResult<()> {
        match data.get_string("icon") {
            Some(svg) => client.upload_resource_type_icon(id, &svg).await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Resource for ResourceTypeResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_type"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_resource_type(&Self::resource_type(data)?).await?;
        let id = assigned_id(created.resource_type_id, "resource type")?;
        data.set_id(id.clone());
        Self::sync_icon(client, &id, data).await?;
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let resource_type = client.get_resource_type(data.require_id()?).await?;
        let parameters: Vec<serde_json::Value> = resource_type
            .parameters
            .iter()
            .map(|p| {
                serde_json::json!({
                    "param_name": p.param_name,
                    "param_type": p.param_type,
                    "is_mandatory": p.is_mandatory,
                })
            })
            .collect();
        data.set("name", &resource_type.name)?;
        data.set("description", &resource_type.description)?;
        data.set("parameters", parameters)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let id = data.require_id()?.to_string();
        let mut resource_type = Self::resource_type(data)?;
        resource_type.resource_type_id = Some(id.clone());
        client.update_resource_type(&id, &resource_type).await?;
        match data.get_string("icon") {
            Some(svg) => client.upload_resource_type_icon(&id, &svg).await?,
            None => client.delete_resource_type_icon(&id).await?,
        }
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_resource_type(data.require_id()?).await
    }
}

// =============================================================================
// Resource type permissions
// =============================================================================

/// `resource_manager_resource_type_permission`: versioned; `version` may be
/// `latest` or `local`
pub struct ResourceTypePermissionResource;

impl ResourceTypePermissionResource {
    fn permission(data: &ResourceData) -> ApiResult<ResourcePermission> {
        Ok(ResourcePermission {
            permission_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            resource_type_id: data.get_str("resource_type_id")?.to_string(),
            version: None,
            checkin_time_limit: data.get_i64("checkin_time_limit").unwrap_or_default(),
            checkout_time_limit: data.get_i64("checkout_time_limit").unwrap_or_default(),
            is_draft: data.get_bool("is_draft"),
            show_orig_creds: data.get_bool("show_orig_creds"),
            checkin_code: data.get_string("checkin_code").unwrap_or_default(),
            checkout_code: data.get_string("checkout_code").unwrap_or_default(),
            variables: data.get_str_list("variables"),
            response_templates: data.get_str_list("response_templates"),
        })
    }
}

#[async_trait]
impl Resource for ResourceTypePermissionResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_type_permission"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_resource_permission(&Self::permission(data)?).await?;
        data.set_id(assigned_id(created.permission_id, "resource type permission")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let id = data.require_id()?.to_string();
        let wanted = data.get_string("version").unwrap_or_else(|| VERSION_LOCAL.to_string());
        let permission = client.get_resource_permission(&id).await?;
        let resolved = client.resolve_resource_permission_version(&id, &wanted).await?;

        data.set("name", &permission.name)?;
        data.set("description", &permission.description)?;
        data.set("resource_type_id", &permission.resource_type_id)?;
        data.set("checkin_time_limit", permission.checkin_time_limit)?;
        data.set("checkout_time_limit", permission.checkout_time_limit)?;
        data.set("is_draft", permission.is_draft)?;
        data.set("show_orig_creds", permission.show_orig_creds)?;
        data.set("checkin_code", &permission.checkin_code)?;
        data.set("checkout_code", &permission.checkout_code)?;
        data.set("variables", &permission.variables)?;
        data.set("response_templates", &permission.response_templates)?;
        if wanted != VERSION_LATEST && wanted != VERSION_LOCAL {
            data.set("version", &resolved)?;
        }
        data.set("resolved_version", &resolved)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_resource_permission(data.require_id()?, &Self::permission(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_resource_permission(data.require_id()?).await
    }
}

// =============================================================================
// Server access resources
// =============================================================================

/// `resource_manager_resource`: labels are `name -> "v1,v2"` in the state
pub struct ServerResource;

impl ServerResource {
    fn resource(data: &ResourceData) -> ApiResult<ServerAccessResource> {
        Ok(ServerAccessResource {
            resource_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            resource_type: ResourceTypeRef {
                id: data.get_string("resource_type_id"),
                name: data.get_string("resource_type_name").unwrap_or_default(),
            },
            parameter_values: data.get_str_map("parameter_values"),
            resource_labels: split_labels(&data.get_str_map("labels")),
        })
    }
}

#[async_trait]
impl Resource for ServerResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_resource(&Self::resource(data)?).await?;
        data.set_id(assigned_id(created.resource_id, "resource")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let resource = client.get_resource(data.require_id()?).await?;
        data.set("name", &resource.name)?;
        data.set("description", &resource.description)?;
        data.set("resource_type_id", &resource.resource_type.id)?;
        data.set("resource_type_name", &resource.resource_type.name)?;
        data.set("parameter_values", &resource.parameter_values)?;
        data.set("labels", flatten_labels(&resource.resource_labels))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client.update_resource(data.require_id()?, &Self::resource(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_resource(data.require_id()?).await
    }
}

/// `resource_manager_resource_broker_pools`: keyed
/// `resource-manager/resources/{resource}/broker-pools`
pub struct BrokerPoolsResource;

#[async_trait]
impl Resource for BrokerPoolsResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_broker_pools"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::BROKER_POOLS)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let resource = data.get_str("resource")?.to_string();
        client
            .set_broker_pools(&resource, &data.get_str_list("pools"))
            .await?;
        data.set_id(ids::BROKER_POOLS.format(&[&resource])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [resource] = ids::BROKER_POOLS.parse_n::<1>(data.require_id()?)?;
        let pools = client.get_broker_pools(&resource).await?;
        let names: Vec<String> = pools.into_iter().map(|p| p.name).collect();
        data.set("resource", &resource)?;
        data.set("pools", names)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [resource] = ids::BROKER_POOLS.parse_n::<1>(data.require_id()?)?;
        client
            .set_broker_pools(&resource, &data.get_str_list("pools"))
            .await?;
        self.read(client, data).await
    }

    /// Posting an empty list detaches every pool
    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [resource] = ids::BROKER_POOLS.parse_n::<1>(data.require_id()?)?;
        client.set_broker_pools(&resource, &[]).await
    }
}

// =============================================================================
// Labels
// =============================================================================

/// `resource_manager_resource_label`
pub struct ResourceLabelResource;

impl ResourceLabelResource {
    fn label(data: &ResourceData) -> ApiResult<ResourceLabel> {
        let values = data
            .get_str_list("values")
            .into_iter()
            .map(|name| LabelValue {
                value_id: None,
                name,
                description: String::new(),
            })
            .collect();
        Ok(ResourceLabel {
            label_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            label_color: data.get_string("label_color").unwrap_or_default(),
            values,
        })
    }
}

#[async_trait]
impl Resource for ResourceLabelResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_label"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_resource_label(&Self::label(data)?).await?;
        data.set_id(assigned_id(created.label_id, "label")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let label = client.get_resource_label(data.require_id()?).await?;
        let values: Vec<String> = label.values.into_iter().map(|v| v.name).collect();
        data.set("name", &label.name)?;
        data.set("description", &label.description)?;
        data.set("label_color", &label.label_color)?;
        data.set("values", values)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_resource_label(data.require_id()?, &Self::label(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_resource_label(data.require_id()?).await
    }
}

// =============================================================================
// Response templates
// =============================================================================

/// `resource_manager_response_template`
pub struct ResponseTemplateResource;

impl ResponseTemplateResource {
    fn template(data: &ResourceData) -> ApiResult<ResponseTemplate> {
        Ok(ResponseTemplate {
            template_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            is_console_access_enabled: data.get_bool("is_console_access_enabled"),
            show_on_ui: data.get_bool("show_on_ui"),
            template_data: data.get_string("template_data").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Resource for ResponseTemplateResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_response_template"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_response_template(&Self::template(data)?).await?;
        data.set_id(assigned_id(created.template_id, "response template")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let template = client.get_response_template(data.require_id()?).await?;
        data.set("name", &template.name)?;
        data.set("description", &template.description)?;
        data.set("is_console_access_enabled", template.is_console_access_enabled)?;
        data.set("show_on_ui", template.show_on_ui)?;
        data.set("template_data", &template.template_data)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_response_template(data.require_id()?, &Self::template(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_response_template(data.require_id()?).await
    }
}

// =============================================================================
// Resource policies
// =============================================================================

/// `resource_manager_resource_policy`
pub struct ResourcePolicyResource;

impl ResourcePolicyResource {
    fn policy(data: &ResourceData) -> ApiResult<ResourcePolicy> {
        Ok(ResourcePolicy {
            policy_id: None,
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            access_type: data.get_string("access_type").unwrap_or_default(),
            is_active: data.get_bool("is_active"),
            is_draft: data.get_bool("is_draft"),
            is_read_only: false,
            members: data.get_as::<Members>("members")?.unwrap_or_default(),
            condition: data.get_string("condition"),
            permissions: named_refs(data.get_str_list("permissions")),
            roles: named_refs(data.get_str_list("roles")),
            resource_labels: split_labels(&data.get_str_map("labels")),
        })
    }
}

#[async_trait]
impl Resource for ResourcePolicyResource {
    fn type_name(&self) -> &'static str {
        "resource_manager_resource_policy"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_resource_policy(&Self::policy(data)?).await?;
        data.set_id(assigned_id(created.policy_id, "resource policy")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let policy = client.get_resource_policy(data.require_id()?).await?;
        data.set("name", &policy.name)?;
        data.set("description", &policy.description)?;
        data.set("access_type", &policy.access_type)?;
        data.set("is_active", policy.is_active)?;
        data.set("is_draft", policy.is_draft)?;
        data.set("is_read_only", policy.is_read_only)?;
        data.set("members", &policy.members)?;
        data.set("condition", &policy.condition)?;
        data.set("permissions", ref_names(&policy.permissions))?;
        data.set("roles", ref_names(&policy.roles))?;
        data.set("labels", flatten_labels(&policy.resource_labels))?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client
            .update_resource_policy(data.require_id()?, &Self::policy(data)?)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_resource_policy(data.require_id()?).await
    }
}
