//! Profiles and their associations, identities, tags, permissions,
//! session attributes and additional settings

use crate::model::{
    PermissionOp, Profile, ProfileAdditionalSettings, ProfileAssociation, ProfileIdentity, ProfilePermission,
    ProfilePermissionRequest, ProfileTag, SessionAttribute,
};
use crate::pam::{lock_names, ApiError, ApiResult, PamClient};
use reqwest::Method;

impl PamClient {
    // =========================================================================
    // Profiles
    // =========================================================================

    /// `GET /apps/{app}/paps`
    pub async fn get_profiles(&self, app_id: &str) -> ApiResult<Vec<Profile>> {
        self.get_list(&self.api_url(&format!("apps/{}/paps", app_id))).await
    }

    /// List the application's profiles and match the name case-insensitively
    pub async fn get_profile_by_name(&self, app_id: &str, name: &str) -> ApiResult<Profile> {
        self.get_profiles(app_id)
            .await?
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or(ApiError::NotFound)
    }

    /// `GET /paps/{profile}`
    pub async fn get_profile(&self, profile_id: &str) -> ApiResult<Profile> {
        self.get_json(&self.api_url(&format!("paps/{}", profile_id))).await
    }

    /// `POST /apps/{app}/paps`
    pub async fn create_profile(&self, app_id: &str, profile: &Profile) -> ApiResult<Profile> {
        let url = self.api_url(&format!("apps/{}/paps", app_id));
        self.mutate(Method::POST, &url, profile, lock_names::PROFILE).await
    }

    /// `PATCH /paps/{profile}`
    pub async fn update_profile(&self, profile_id: &str, profile: &Profile) -> ApiResult<Profile> {
        let url = self.api_url(&format!("paps/{}", profile_id));
        self.mutate(Method::PATCH, &url, profile, lock_names::PROFILE).await
    }

    /// `DELETE /apps/{app}/paps/{profile}`
    pub async fn delete_profile(&self, app_id: &str, profile_id: &str) -> ApiResult<()> {
        let url = self.api_url(&format!("apps/{}/paps/{}", app_id, profile_id));
        self.delete(&url, lock_names::PROFILE).await
    }

    // =========================================================================
    // Associations (scopes)
    // =========================================================================

    /// `GET /paps/{profile}/scopes`
    pub async fn get_profile_associations(&self, profile_id: &str) -> ApiResult<Vec<ProfileAssociation>> {
        self.get_list(&self.api_url(&format!("paps/{}/scopes", profile_id))).await
    }

    /// Replace the profile's associations wholesale (`POST /paps/{profile}/scopes`)
    pub async fn save_profile_associations(&self, profile_id: &str, associations: &[ProfileAssociation]) -> ApiResult<()> {
        let url = self.api_url(&format!("paps/{}/scopes", profile_id));
        self.send_unit(Method::POST, &url, Some(associations), Some(profile_id)).await
    }

    // =========================================================================
    // Identities
    // =========================================================================

    /// `GET /paps/{profile}/users?filter=assigned`
    pub async fn get_profile_identities(&self, profile_id: &str) -> ApiResult<Vec<ProfileIdentity>> {
        self.get_list(&self.host_url(&format!("paps/{}/users?filter=assigned", profile_id)))
            .await
    }

    /// There is no single-record endpoint; list and filter by user id
    pub async fn get_profile_identity(&self, profile_id: &str, user_id: &str) -> ApiResult<ProfileIdentity> {
        self.get_profile_identities(profile_id)
            .await?
            .into_iter()
            .find(|i| i.user_id == user_id)
            .ok_or(ApiError::NotFound)
    }

    /// `POST /paps/{profile}/users/{user}`
    pub async fn create_profile_identity(&self, profile_id: &str, user_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("paps/{}/users/{}", profile_id, user_id));
        self.send_unit::<()>(Method::POST, &url, None, Some(profile_id)).await
    }

    /// `DELETE /paps/{profile}/users/{user}`
    pub async fn delete_profile_identity(&self, profile_id: &str, user_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("paps/{}/users/{}", profile_id, user_id));
        self.delete(&url, profile_id).await
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// `GET /paps/{profile}/user-tags?filter=assigned`
    pub async fn get_profile_tags(&self, profile_id: &str) -> ApiResult<Vec<ProfileTag>> {
        self.get_list(&self.host_url(&format!("paps/{}/user-tags?filter=assigned", profile_id)))
            .await
    }

    // TODO: switch to a by-id request once /paps/{profile}/user-tags/{tag} supports GET
    pub async fn get_profile_tag(&self, profile_id: &str, tag_id: &str) -> ApiResult<ProfileTag> {
        self.get_profile_tags(profile_id)
            .await?
            .into_iter()
            .find(|t| t.user_tag_id == tag_id)
            .ok_or(ApiError::NotFound)
    }

    /// `POST /paps/{profile}/user-tags/{tag}`
    pub async fn create_profile_tag(&self, profile_id: &str, tag_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("paps/{}/user-tags/{}", profile_id, tag_id));
        self.send_unit::<()>(Method::POST, &url, None, Some(profile_id)).await
    }

    /// `DELETE /paps/{profile}/user-tags/{tag}`
    pub async fn delete_profile_tag(&self, profile_id: &str, tag_id: &str) -> ApiResult<()> {
        let url = self.host_url(&format!("paps/{}/user-tags/{}", profile_id, tag_id));
        self.delete(&url, profile_id).await
    }

    // =========================================================================
    // Permissions
    // =========================================================================

    /// `GET /paps/{profile}/permissions?filter=assigned`
    pub async fn get_profile_permissions(&self, profile_id: &str) -> ApiResult<Vec<ProfilePermission>> {
        self.get_list(&self.api_url(&format!("paps/{}/permissions?filter=assigned", profile_id)))
            .await
    }

    /// Assigned permission matched by name and type
    pub async fn get_profile_permission(&self, profile_id: &str, name: &str, permission_type: &str) -> ApiResult<ProfilePermission> {
        self.get_profile_permissions(profile_id)
            .await?
            .into_iter()
            .find(|p| p.name == name && p.permission_type.eq_ignore_ascii_case(permission_type))
            .ok_or(ApiError::NotFound)
    }

    /// `POST /paps/{profile}/permissions` with `{op, permission}`
    pub async fn update_profile_permission(&self, profile_id: &str, op: PermissionOp, permission: &ProfilePermission) -> ApiResult<()> {
        let url = self.api_url(&format!("paps/{}/permissions", profile_id));
        let body = ProfilePermissionRequest {
            op,
            permission: permission.clone(),
        };
        self.send_unit(Method::POST, &url, Some(&body), Some(profile_id)).await
    }

    // =========================================================================
    // Session attributes
    // =========================================================================

    /// `GET /paps/{profile}/session-attributes`
    pub async fn get_session_attributes(&self, profile_id: &str) -> ApiResult<Vec<SessionAttribute>> {
        self.get_list(&self.api_url(&format!("paps/{}/session-attributes", profile_id)))
            .await
    }

    pub async fn get_session_attribute(&self, profile_id: &str, attribute_id: &str) -> ApiResult<SessionAttribute> {
        self.get_session_attributes(profile_id)
            .await?
            .into_iter()
            .find(|a| a.id.as_deref() == Some(attribute_id))
            .ok_or(ApiError::NotFound)
    }

    /// `POST /paps/{profile}/session-attributes`
    pub async fn create_session_attribute(&self, profile_id: &str, attribute: &SessionAttribute) -> ApiResult<SessionAttribute> {
        let url = self.api_url(&format!("paps/{}/session-attributes", profile_id));
        self.mutate(Method::POST, &url, attribute, profile_id).await
    }

    /// `PUT /paps/{profile}/session-attributes/{id}`
    pub async fn update_session_attribute(&self, profile_id: &str, attribute_id: &str, attribute: &SessionAttribute) -> ApiResult<SessionAttribute> {
        let url = self.api_url(&format!("paps/{}/session-attributes/{}", profile_id, attribute_id));
        self.mutate(Method::PUT, &url, attribute, profile_id).await
    }

    /// `DELETE /paps/{profile}/session-attributes/{id}`
    pub async fn delete_session_attribute(&self, profile_id: &str, attribute_id: &str) -> ApiResult<()> {
        let url = self.api_url(&format!("paps/{}/session-attributes/{}", profile_id, attribute_id));
        self.delete(&url, profile_id).await
    }

    // =========================================================================
    // Additional settings
    // =========================================================================

    /// `GET /paps/{profile}/additional-settings`
    pub async fn get_profile_additional_settings(&self, profile_id: &str) -> ApiResult<ProfileAdditionalSettings> {
        self.get_json(&self.api_url(&format!("paps/{}/additional-settings", profile_id)))
            .await
    }

    /// `PATCH /paps/{profile}/additional-settings?propertiesOnly=true`
    pub async fn update_profile_additional_settings(&self, profile_id: &str, settings: &ProfileAdditionalSettings) -> ApiResult<ProfileAdditionalSettings> {
        let url = self.api_url(&format!("paps/{}/additional-settings?propertiesOnly=true", profile_id));
        self.mutate(Method::PATCH, &url, settings, profile_id).await
    }
}
