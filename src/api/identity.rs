//! Users, user attributes, identity providers and user tags

use crate::model::{IdentityProvider, Tag, User, UserAttribute};
use crate::pam::{encode, lock_names, ApiError, ApiResult, PamClient};
use reqwest::Method;

impl PamClient {
    // =========================================================================
    // Users
    // =========================================================================

    /// `GET /users[?filter=...]`
    pub async fn get_users(&self, filter: Option<&str>) -> ApiResult<Vec<User>> {
        let url = match filter {
            Some(f) => self.host_url(&format!("users?filter={}", encode(f))),
            None => self.host_url("users"),
        };
        self.get_list(&url).await
    }

    pub async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        self.get_json(&self.host_url(&format!("users/{}", user_id))).await
    }

    /// Filtered list, then an exact case-insensitive username match
    pub async fn get_user_by_name(&self, username: &str) -> ApiResult<User> {
        self.get_users(Some(username))
            .await?
            .into_iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .ok_or(ApiError::NotFound)
    }

    /// `GET /users/attributes?filter=...`
    pub async fn get_user_attributes(&self, filter: &str) -> ApiResult<Vec<UserAttribute>> {
        self.get_list(&self.host_url(&format!("users/attributes?filter={}", encode(filter))))
            .await
    }

    pub async fn get_user_attribute(&self, id: &str) -> ApiResult<UserAttribute> {
        self.get_json(&self.host_url(&format!("users/attributes/{}", id))).await
    }

    // =========================================================================
    // Identity providers
    // =========================================================================

    pub async fn get_identity_providers(&self) -> ApiResult<Vec<IdentityProvider>> {
        self.get_list(&self.host_url("identity-providers")).await
    }

    /// `GET /identity-providers?metadata=false&name=...`, first case-insensitive match
    pub async fn get_identity_provider_by_name(&self, name: &str) -> ApiResult<IdentityProvider> {
        let url = self.host_url(&format!("identity-providers?metadata=false&name={}", encode(name)));
        self.get_list::<IdentityProvider>(&url)
            .await?
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or(ApiError::NotFound)
    }

    pub async fn get_identity_provider(&self, id: &str) -> ApiResult<IdentityProvider> {
        self.get_json(&self.host_url(&format!("identity-providers/{}", id))).await
    }

    // =========================================================================
    // Tags
    // =========================================================================

    pub async fn get_tag(&self, tag_id: &str) -> ApiResult<Tag> {
        self.get_json(&self.host_url(&format!("user-tags/{}", tag_id))).await
    }

    pub async fn get_tags(&self) -> ApiResult<Vec<Tag>> {
        self.get_list(&self.host_url("user-tags")).await
    }

    pub async fn create_tag(&self, tag: &Tag) -> ApiResult<Tag> {
        self.mutate(Method::POST, &self.host_url("user-tags"), tag, lock_names::TAG)
            .await
    }

    pub async fn update_tag(&self, tag_id: &str, tag: &Tag) -> ApiResult<Tag> {
        let url = self.host_url(&format!("user-tags/{}", tag_id));
        self.mutate(Method::PATCH, &url, tag, lock_names::TAG).await
    }

    pub async fn delete_tag(&self, tag_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("user-tags/{}", tag_id));
        self.delete(&url, lock_names::TAG).await
    }

    // =========================================================================
    // Tag members
    // =========================================================================

    /// `GET /user-tags/{tag}/users?filter=assigned`
    pub async fn get_tag_members(&self, tag_id: &str) -> ApiResult<Vec<User>> {
        self.get_list(&self.host_url(&format!("user-tags/{}/users?filter=assigned", tag_id)))
            .await
    }

    pub async fn get_tag_member(&self, tag_id: &str, user_id: &str) -> ApiResult<User> {
        self.get_tag_members(tag_id)
            .await?
            .into_iter()
            .find(|u| u.user_id == user_id)
            .ok_or(ApiError::NotFound)
    }

    /// `POST /user-tags/{tag}/users/{user}`
    pub async fn attach_tag_member(&self, tag_id: &str, user_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("user-tags/{}/users/{}", tag_id, user_id));
        self.send_unit::<()>(Method::POST, &url, None, Some(lock_names::TAG)).await
    }

    /// `DELETE /user-tags/{tag}/users/{user}`
    pub async fn detach_tag_member(&self, tag_id: &str, user_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("user-tags/{}/users/{}", tag_id, user_id));
        self.delete(&url, lock_names::TAG).await
    }
}
