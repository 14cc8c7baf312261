//! Records attached to a profile: permissions, identities, tags and
//! session attributes

use super::{assigned_id, require_same_key};
use crate::ids::{self, CompositeId};
use crate::model::{PermissionOp, ProfilePermission, SessionAttribute};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `profile_permission`: keyed `paps/{profile}/permissions/{name}/{type}`
pub struct ProfilePermissionResource;

impl ProfilePermissionResource {
    fn permission(name: &str, permission_type: &str, data: &ResourceData) -> ProfilePermission {
        ProfilePermission {
            name: name.to_string(),
            permission_type: permission_type.to_string(),
            app_name: data.get_string("app_name"),
        }
    }
}

#[async_trait]
impl Resource for ProfilePermissionResource {
    fn type_name(&self) -> &'static str {
        "profile_permission"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE_PERMISSION)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let name = data.get_str("name")?.to_string();
        let permission_type = data.get_str("type")?.to_string();
        let permission = Self::permission(&name, &permission_type, data);
        client
            .update_profile_permission(&profile_id, PermissionOp::Add, &permission)
            .await?;
        data.set_id(ids::PROFILE_PERMISSION.format(&[&profile_id, &name, &permission_type])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, name, permission_type] = ids::PROFILE_PERMISSION.parse_n::<3>(data.require_id()?)?;
        let permission = client
            .get_profile_permission(&profile_id, &name, &permission_type)
            .await?;
        data.set("profile_id", &profile_id)?;
        data.set("name", &permission.name)?;
        data.set("type", &permission.permission_type)?;
        data.set("app_name", &permission.app_name)?;
        Ok(())
    }

    /// Re-adding is idempotent; only `app_name` may change in place
    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, name, permission_type] = ids::PROFILE_PERMISSION.parse_n::<3>(data.require_id()?)?;
        require_same_key(
            self.type_name(),
            data,
            &[("profile_id", profile_id.as_str()), ("name", name.as_str()), ("type", permission_type.as_str())],
        )?;
        let permission = Self::permission(&name, &permission_type, data);
        client
            .update_profile_permission(&profile_id, PermissionOp::Add, &permission)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, name, permission_type] = ids::PROFILE_PERMISSION.parse_n::<3>(data.require_id()?)?;
        let permission = Self::permission(&name, &permission_type, data);
        client
            .update_profile_permission(&profile_id, PermissionOp::Remove, &permission)
            .await
    }
}

/// `profile_identity`: keyed `paps/{profile}/users/{user}`
pub struct ProfileIdentityResource;

#[async_trait]
impl Resource for ProfileIdentityResource {
    fn type_name(&self) -> &'static str {
        "profile_identity"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE_IDENTITY)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let user_id = data.get_str("user_id")?.to_string();
        client.create_profile_identity(&profile_id, &user_id).await?;
        data.set_id(ids::PROFILE_IDENTITY.format(&[&profile_id, &user_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, user_id] = ids::PROFILE_IDENTITY.parse_n::<2>(data.require_id()?)?;
        let identity = client.get_profile_identity(&profile_id, &user_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("user_id", &identity.user_id)?;
        data.set("username", &identity.username)?;
        Ok(())
    }

    /// Nothing to change in place: both attributes form the id
    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, user_id] = ids::PROFILE_IDENTITY.parse_n::<2>(data.require_id()?)?;
        require_same_key(
            self.type_name(),
            data,
            &[("profile_id", profile_id.as_str()), ("user_id", user_id.as_str())],
        )?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, user_id] = ids::PROFILE_IDENTITY.parse_n::<2>(data.require_id()?)?;
        client.delete_profile_identity(&profile_id, &user_id).await
    }
}

/// `profile_tag`: keyed `paps/{profile}/user-tags/{tag}`
pub struct ProfileTagResource;

#[async_trait]
impl Resource for ProfileTagResource {
    fn type_name(&self) -> &'static str {
        "profile_tag"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE_TAG)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let tag_id = data.get_str("tag_id")?.to_string();
        client.create_profile_tag(&profile_id, &tag_id).await?;
        data.set_id(ids::PROFILE_TAG.format(&[&profile_id, &tag_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, tag_id] = ids::PROFILE_TAG.parse_n::<2>(data.require_id()?)?;
        let tag = client.get_profile_tag(&profile_id, &tag_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("tag_id", &tag.user_tag_id)?;
        data.set("name", &tag.name)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, tag_id] = ids::PROFILE_TAG.parse_n::<2>(data.require_id()?)?;
        require_same_key(
            self.type_name(),
            data,
            &[("profile_id", profile_id.as_str()), ("tag_id", tag_id.as_str())],
        )?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, tag_id] = ids::PROFILE_TAG.parse_n::<2>(data.require_id()?)?;
        client.delete_profile_tag(&profile_id, &tag_id).await
    }
}

/// `profile_session_attribute`: keyed `paps/{profile}/session-attributes/{id}`
pub struct SessionAttributeResource;

impl SessionAttributeResource {
    fn attribute(data: &ResourceData) -> ApiResult<SessionAttribute> {
        Ok(SessionAttribute {
            id: None,
            attribute_type: data.get_str("attribute_type")?.to_string(),
            mapping_name: data.get_str("mapping_name")?.to_string(),
            attribute_schema_id: data.get_string("attribute_schema_id"),
            attribute_value: data.get_string("attribute_value"),
            transitive: data.get_bool("transitive"),
        })
    }
}

#[async_trait]
impl Resource for SessionAttributeResource {
    fn type_name(&self) -> &'static str {
        "profile_session_attribute"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::PROFILE_SESSION_ATTRIBUTE)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let profile_id = data.get_str("profile_id")?.to_string();
        let created = client
            .create_session_attribute(&profile_id, &Self::attribute(data)?)
            .await?;
        let attribute_id = assigned_id(created.id, "session attribute")?;
        data.set_id(ids::PROFILE_SESSION_ATTRIBUTE.format(&[&profile_id, &attribute_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, attribute_id] = ids::PROFILE_SESSION_ATTRIBUTE.parse_n::<2>(data.require_id()?)?;
        let attribute = client.get_session_attribute(&profile_id, &attribute_id).await?;
        data.set("profile_id", &profile_id)?;
        data.set("attribute_type", &attribute.attribute_type)?;
        data.set("mapping_name", &attribute.mapping_name)?;
        data.set("attribute_schema_id", &attribute.attribute_schema_id)?;
        data.set("attribute_value", &attribute.attribute_value)?;
        data.set("transitive", attribute.transitive)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [profile_id, attribute_id] = ids::PROFILE_SESSION_ATTRIBUTE.parse_n::<2>(data.require_id()?)?;
        let mut attribute = Self::attribute(data)?;
        attribute.id = Some(attribute_id.clone());
        client
            .update_session_attribute(&profile_id, &attribute_id, &attribute)
            .await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [profile_id, attribute_id] = ids::PROFILE_SESSION_ATTRIBUTE.parse_n::<2>(data.require_id()?)?;
        client.delete_session_attribute(&profile_id, &attribute_id).await
    }
}
