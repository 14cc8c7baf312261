//! Resource manager API
//!
//! Resource types, resources and their broker pools, labels, versioned
//! permissions, resource policies, resource manager profiles (with their
//! associations, permissions and policies) and response templates.

use crate::model::resource_manager::{VERSION_LATEST, VERSION_LOCAL};
use crate::model::{
    BrokerPool, ProfilePermissionsUpdate, ProfileResourceAssociations, Resource, ResourceLabel,
    ResourceManagerProfile, ResourceManagerProfilePermission, ResourceManagerProfilePolicy, ResourcePermission,
    ResourcePolicy, ResourceType, ResponseTemplate,
};
use crate::pam::http::XML_CONTENT_TYPE;
use crate::pam::{encode, lock_names, ApiError, ApiResult, PamClient, RequestBody};
use reqwest::Method;
use std::cmp::Ordering;

/// Compare two version strings numerically when both parse, lexically otherwise
fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Highest version in `versions`, if any carries one
pub fn latest_version(versions: &[ResourcePermission]) -> Option<&ResourcePermission> {
    versions
        .iter()
        .filter(|p| p.version.is_some())
        .max_by(|a, b| compare_versions(a.version.as_deref().unwrap_or(""), b.version.as_deref().unwrap_or("")))
}

impl PamClient {
    fn rm_url(&self, path: &str) -> String {
        self.api_url(&format!("resource-manager/{}", path))
    }

    // =========================================================================
    // Resource types
    // =========================================================================

    pub async fn get_resource_types(&self) -> ApiResult<Vec<ResourceType>> {
        self.get_list(&self.rm_url("resource-types")).await
    }

    pub async fn get_resource_type(&self, id: &str) -> ApiResult<ResourceType> {
        self.get_json(&self.rm_url(&format!("resource-types/{}", id))).await
    }

    pub async fn get_resource_type_by_name(&self, name: &str) -> ApiResult<ResourceType> {
        self.get_resource_types()
            .await?
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or(ApiError::NotFound)
    }

    pub async fn create_resource_type(&self, resource_type: &ResourceType) -> ApiResult<ResourceType> {
        self.mutate(Method::POST, &self.rm_url("resource-types"), resource_type, lock_names::RESOURCE_TYPE)
            .await
    }

    /// Wholesale replace (`PUT`)
    pub async fn update_resource_type(&self, id: &str, resource_type: &ResourceType) -> ApiResult<ResourceType> {
        let url = self.rm_url(&format!("resource-types/{}", id));
        self.mutate(Method::PUT, &url, resource_type, lock_names::RESOURCE_TYPE).await
    }

    pub async fn delete_resource_type(&self, id: &str) -> ApiResult<()> {
        self.delete(&self.rm_url(&format!("resource-types/{}", id)), lock_names::RESOURCE_TYPE)
            .await
    }

    /// `PUT /resource-manager/resource-types/{id}/icon-data` with an SVG body
    pub async fn upload_resource_type_icon(&self, id: &str, svg: &str) -> ApiResult<()> {
        let url = self.rm_url(&format!("resource-types/{}/icon-data", id));
        let body = RequestBody::Raw {
            content_type: XML_CONTENT_TYPE.to_string(),
            bytes: svg.as_bytes().to_vec(),
        };
        self.send_body(Method::PUT, &url, body, Some(lock_names::RESOURCE_TYPE))
            .await
            .map(|_| ())
    }

    pub async fn delete_resource_type_icon(&self, id: &str) -> ApiResult<()> {
        let url = self.rm_url(&format!("resource-types/{}/icon-data", id));
        let body = RequestBody::Raw {
            content_type: XML_CONTENT_TYPE.to_string(),
            bytes: Vec::new(),
        };
        self.send_body(Method::DELETE, &url, body, Some(lock_names::RESOURCE_TYPE))
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Resources (server access)
    // =========================================================================

    pub async fn get_resource(&self, id: &str) -> ApiResult<Resource> {
        self.get_json(&self.rm_url(&format!("resources/{}", id))).await
    }

    pub async fn create_resource(&self, resource: &Resource) -> ApiResult<Resource> {
        self.mutate(Method::POST, &self.rm_url("resources"), resource, lock_names::SERVER_ACCESS)
            .await
    }

    pub async fn update_resource(&self, id: &str, resource: &Resource) -> ApiResult<Resource> {
        let url = self.rm_url(&format!("resources/{}", id));
        self.mutate(Method::PUT, &url, resource, lock_names::SERVER_ACCESS).await
    }

    pub async fn delete_resource(&self, id: &str) -> ApiResult<()> {
        self.delete(&self.rm_url(&format!("resources/{}", id)), lock_names::SERVER_ACCESS)
            .await
    }

    /// `GET /resource-manager/resources/{name}/broker-pools`
    pub async fn get_broker_pools(&self, resource: &str) -> ApiResult<Vec<BrokerPool>> {
        self.get_list(&self.rm_url(&format!("resources/{}/broker-pools", encode(resource))))
            .await
    }

    /// Replace the pool membership; an empty slice detaches every pool
    pub async fn set_broker_pools(&self, resource: &str, pools: &[String]) -> ApiResult<()> {
        let url = self.rm_url(&format!("resources/{}/broker-pools", encode(resource)));
        self.send_unit(Method::POST, &url, Some(pools), Some(lock_names::SERVER_ACCESS))
            .await
    }

    // =========================================================================
    // Labels
    // =========================================================================

    pub async fn get_resource_label(&self, id: &str) -> ApiResult<ResourceLabel> {
        self.get_json(&self.rm_url(&format!("labels/{}", id))).await
    }

    pub async fn create_resource_label(&self, label: &ResourceLabel) -> ApiResult<ResourceLabel> {
        self.mutate(Method::POST, &self.rm_url("labels"), label, lock_names::RESOURCE_LABEL)
            .await
    }

    pub async fn update_resource_label(&self, id: &str, label: &ResourceLabel) -> ApiResult<ResourceLabel> {
        let url = self.rm_url(&format!("labels/{}", id));
        self.mutate(Method::PATCH, &url, label, lock_names::RESOURCE_LABEL).await
    }

    pub async fn delete_resource_label(&self, id: &str) -> ApiResult<()> {
        self.delete(&self.rm_url(&format!("labels/{}", id)), lock_names::RESOURCE_LABEL)
            .await
    }

    // =========================================================================
    // Resource type permissions
    // =========================================================================

    pub async fn get_resource_permission(&self, id: &str) -> ApiResult<ResourcePermission> {
        self.get_json(&self.rm_url(&format!("permissions/{}", id))).await
    }

    /// `GET /resource-manager/permissions/{id}/versions`
    pub async fn get_resource_permission_versions(&self, id: &str) -> ApiResult<Vec<ResourcePermission>> {
        self.get_list(&self.rm_url(&format!("permissions/{}/versions", id))).await
    }

    /// Resolve a version alias (`latest`, `local`) or pass a concrete version through
    pub async fn resolve_resource_permission_version(&self, id: &str, version: &str) -> ApiResult<String> {
        match version {
            VERSION_LATEST => {
                let versions = self.get_resource_permission_versions(id).await?;
                latest_version(&versions)
                    .and_then(|p| p.version.clone())
                    .ok_or(ApiError::NotFound)
            },
            VERSION_LOCAL => self
                .get_resource_permission(id)
                .await?
                .version
                .ok_or(ApiError::NotFound),
            concrete => Ok(concrete.to_string()),
        }
    }

    pub async fn create_resource_permission(&self, permission: &ResourcePermission) -> ApiResult<ResourcePermission> {
        self.mutate(
            Method::POST,
            &self.rm_url("permissions"),
            permission,
            lock_names::RESOURCE_TYPE_PERMISSIONS,
        )
        .await
    }

    pub async fn update_resource_permission(&self, id: &str, permission: &ResourcePermission) -> ApiResult<ResourcePermission> {
        let url = self.rm_url(&format!("permissions/{}", id));
        self.mutate(Method::PATCH, &url, permission, lock_names::RESOURCE_TYPE_PERMISSIONS)
            .await
    }

    pub async fn delete_resource_permission(&self, id: &str) -> ApiResult<()> {
        self.delete(
            &self.rm_url(&format!("permissions/{}", id)),
            lock_names::RESOURCE_TYPE_PERMISSIONS,
        )
        .await
    }

    // =========================================================================
    // Resource policies
    // =========================================================================

    pub async fn get_resource_policy(&self, id: &str) -> ApiResult<ResourcePolicy> {
        self.get_json(&self.rm_url(&format!("policies/{}", id))).await
    }

    pub async fn create_resource_policy(&self, policy: &ResourcePolicy) -> ApiResult<ResourcePolicy> {
        self.mutate(
            Method::POST,
            &self.rm_url("policies"),
            policy,
            lock_names::RESOURCE_MANAGER_RESOURCE_POLICY,
        )
        .await
    }

    pub async fn update_resource_policy(&self, id: &str, policy: &ResourcePolicy) -> ApiResult<ResourcePolicy> {
        let url = self.rm_url(&format!("policies/{}", id));
        self.mutate(Method::PATCH, &url, policy, lock_names::RESOURCE_MANAGER_RESOURCE_POLICY)
            .await
    }

    pub async fn delete_resource_policy(&self, id: &str) -> ApiResult<()> {
        self.delete(
            &self.rm_url(&format!("policies/{}", id)),
            lock_names::RESOURCE_MANAGER_RESOURCE_POLICY,
        )
        .await
    }

    // =========================================================================
    // Resource manager profiles
    // =========================================================================

    pub async fn get_rm_profile(&self, id: &str) -> ApiResult<ResourceManagerProfile> {
        self.get_json(&self.rm_url(&format!("profiles/{}", id))).await
    }

    pub async fn create_rm_profile(&self, profile: &ResourceManagerProfile) -> ApiResult<ResourceManagerProfile> {
        self.mutate(
            Method::POST,
            &self.rm_url("profiles"),
            profile,
            lock_names::RESOURCE_MANAGER_PROFILE,
        )
        .await
    }

    pub async fn update_rm_profile(&self, id: &str, profile: &ResourceManagerProfile) -> ApiResult<ResourceManagerProfile> {
        let url = self.rm_url(&format!("profiles/{}", id));
        self.mutate(Method::PATCH, &url, profile, lock_names::RESOURCE_MANAGER_PROFILE)
            .await
    }

    pub async fn delete_rm_profile(&self, id: &str) -> ApiResult<()> {
        self.delete(
            &self.rm_url(&format!("profiles/{}", id)),
            lock_names::RESOURCE_MANAGER_PROFILE,
        )
        .await
    }

    pub async fn get_rm_profile_associations(&self, id: &str) -> ApiResult<ProfileResourceAssociations> {
        self.get_json(&self.rm_url(&format!("profiles/{}/associations", id))).await
    }

    pub async fn update_rm_profile_associations(
        &self,
        id: &str,
        associations: &ProfileResourceAssociations,
    ) -> ApiResult<ProfileResourceAssociations> {
        let url = self.rm_url(&format!("profiles/{}/associations", id));
        self.mutate(Method::PATCH, &url, associations, lock_names::RESOURCE_MANAGER_PROFILE)
            .await
    }

    pub async fn get_rm_profile_permissions(&self, id: &str) -> ApiResult<Vec<ResourceManagerProfilePermission>> {
        self.get_list(&self.rm_url(&format!("profiles/{}/permissions", id))).await
    }

    pub async fn get_rm_profile_permission(&self, profile_id: &str, permission_id: &str) -> ApiResult<ResourceManagerProfilePermission> {
        self.get_rm_profile_permissions(profile_id)
            .await?
            .into_iter()
            .find(|p| p.permission_id == permission_id)
            .ok_or(ApiError::NotFound)
    }

    /// `PATCH /resource-manager/profiles/{id}/permissions` with add/remove lists
    pub async fn update_rm_profile_permissions(&self, id: &str, update: &ProfilePermissionsUpdate) -> ApiResult<()> {
        let url = self.rm_url(&format!("profiles/{}/permissions", id));
        self.send_unit(
            Method::PATCH,
            &url,
            Some(update),
            Some(lock_names::RESOURCE_MANAGER_PROFILE_PERMISSION),
        )
        .await
    }

    pub async fn get_rm_profile_policies(&self, profile_id: &str) -> ApiResult<Vec<ResourceManagerProfilePolicy>> {
        self.get_list(&self.rm_url(&format!("profiles/{}/policies", profile_id)))
            .await
    }

    pub async fn get_rm_profile_policy(&self, profile_id: &str, policy_id: &str) -> ApiResult<ResourceManagerProfilePolicy> {
        self.get_json(&self.rm_url(&format!("profiles/{}/policies/{}", profile_id, policy_id)))
            .await
    }

    pub async fn create_rm_profile_policy(
        &self,
        profile_id: &str,
        policy: &ResourceManagerProfilePolicy,
    ) -> ApiResult<ResourceManagerProfilePolicy> {
        let url = self.rm_url(&format!("profiles/{}/policies", profile_id));
        self.mutate(Method::POST, &url, policy, lock_names::RESOURCE_MANAGER_PROFILE_POLICY)
            .await
    }

    pub async fn update_rm_profile_policy(
        &self,
        profile_id: &str,
        policy_id: &str,
        policy: &ResourceManagerProfilePolicy,
    ) -> ApiResult<ResourceManagerProfilePolicy> {
        let url = self.rm_url(&format!("profiles/{}/policies/{}", profile_id, policy_id));
        self.mutate(Method::PATCH, &url, policy, lock_names::RESOURCE_MANAGER_PROFILE_POLICY)
            .await
    }

    pub async fn delete_rm_profile_policy(&self, profile_id: &str, policy_id: &str) -> ApiResult<()> {
        let url = self.rm_url(&format!("profiles/{}/policies/{}", profile_id, policy_id));
        self.delete(&url, lock_names::RESOURCE_MANAGER_PROFILE_POLICY).await
    }

    // =========================================================================
    // Response templates
    // =========================================================================

    pub async fn get_response_template(&self, id: &str) -> ApiResult<ResponseTemplate> {
        self.get_json(&self.rm_url(&format!("response-templates/{}", id))).await
    }

    pub async fn create_response_template(&self, template: &ResponseTemplate) -> ApiResult<ResponseTemplate> {
        self.mutate(
            Method::POST,
            &self.rm_url("response-templates"),
            template,
            lock_names::RESPONSE_TEMPLATE,
        )
        .await
    }

    pub async fn update_response_template(&self, id: &str, template: &ResponseTemplate) -> ApiResult<ResponseTemplate> {
        let url = self.rm_url(&format!("response-templates/{}", id));
        self.mutate(Method::PUT, &url, template, lock_names::RESPONSE_TEMPLATE).await
    }

    pub async fn delete_response_template(&self, id: &str) -> ApiResult<()> {
        self.delete(
            &self.rm_url(&format!("response-templates/{}", id)),
            lock_names::RESPONSE_TEMPLATE,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(v: &str) -> ResourcePermission {
        ResourcePermission {
            name: "p".into(),
            resource_type_id: "t".into(),
            version: Some(v.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_latest_version_is_numeric() {
        let versions = vec![version("2"), version("10"), version("9")];
        assert_eq!(latest_version(&versions).unwrap().version.as_deref(), Some("10"));
    }

    #[test]
    fn test_latest_version_empty() {
        assert!(latest_version(&[]).is_none());
    }
}
