use super::{assigned_id, require_same_key};
use crate::ids::{self, CompositeId};
use crate::model::{IdentityProviderRef, Tag, TagIdentityProvider};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `tag`: a user group backed by an identity provider
pub struct TagResource;

impl TagResource {
    fn tag(data: &ResourceData) -> ApiResult<Tag> {
        let providers = data
            .get_string("identity_provider_id")
            .map(|id| {
                vec![TagIdentityProvider {
                    identity_provider: IdentityProviderRef { id, name: None },
                }]
            })
            .unwrap_or_default();
        Ok(Tag {
            name: data.get_str("name")?.to_string(),
            description: data.get_string("description").unwrap_or_default(),
            user_tag_identity_providers: providers,
            ..Default::default()
        })
    }
}

#[async_trait]
impl Resource for TagResource {
    fn type_name(&self) -> &'static str {
        "tag"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let created = client.create_tag(&Self::tag(data)?).await?;
        data.set_id(assigned_id(created.user_tag_id, "tag")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let tag = client.get_tag(data.require_id()?).await?;
        data.set("name", &tag.name)?;
        data.set("description", &tag.description)?;
        data.set("status", &tag.status)?;
        data.set("identity_provider_id", tag.identity_provider_id())?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        client.update_tag(data.require_id()?, &Self::tag(data)?).await?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_tag(data.require_id()?).await
    }
}

/// `tag_member`: keyed `user-tags/{tag}/users/{user}`; attach and detach only
pub struct TagMemberResource;

#[async_trait]
impl Resource for TagMemberResource {
    fn type_name(&self) -> &'static str {
        "tag_member"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::TAG_MEMBER)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let tag_id = data.get_str("tag_id")?.to_string();
        let user_id = data.get_str("user_id")?.to_string();
        client.attach_tag_member(&tag_id, &user_id).await?;
        data.set_id(ids::TAG_MEMBER.format(&[&tag_id, &user_id])?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [tag_id, user_id] = ids::TAG_MEMBER.parse_n::<2>(data.require_id()?)?;
        let user = client.get_tag_member(&tag_id, &user_id).await?;
        data.set("tag_id", &tag_id)?;
        data.set("user_id", &user.user_id)?;
        data.set("username", &user.username)?;
        Ok(())
    }

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let [tag_id, user_id] = ids::TAG_MEMBER.parse_n::<2>(data.require_id()?)?;
        require_same_key(
            self.type_name(),
            data,
            &[("tag_id", tag_id.as_str()), ("user_id", user_id.as_str())],
        )?;
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let [tag_id, user_id] = ids::TAG_MEMBER.parse_n::<2>(data.require_id()?)?;
        client.detach_tag_member(&tag_id, &user_id).await
    }
}
