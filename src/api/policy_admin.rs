//! Global policy administration: policies, roles and permissions
//!
//! All three share the `/v1/policy-admin/{kind}` layout and differ only in
//! the lock they serialize on.

use crate::model::{Permission, Policy, Role};
use crate::pam::{encode, lock_names, ApiResult, PamClient};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminKind {
    Policies,
    Roles,
    Permissions,
}

impl AdminKind {
    fn segment(&self) -> &'static str {
        match self {
            AdminKind::Policies => "policies",
            AdminKind::Roles => "roles",
            AdminKind::Permissions => "permissions",
        }
    }

    fn lock(&self) -> &'static str {
        match self {
            AdminKind::Policies => lock_names::POLICY,
            AdminKind::Roles => lock_names::ROLE,
            AdminKind::Permissions => lock_names::PERMISSIONS,
        }
    }
}

impl PamClient {
    fn admin_url(&self, kind: AdminKind, key: Option<&str>) -> String {
        match key {
            Some(key) => self.api_url(&format!(
                "v1/policy-admin/{}/{}?compactResponse=true",
                kind.segment(),
                encode(key)
            )),
            None => self.api_url(&format!("v1/policy-admin/{}", kind.segment())),
        }
    }

    async fn admin_get<T: DeserializeOwned>(&self, kind: AdminKind, key: &str) -> ApiResult<T> {
        self.get_json(&self.admin_url(kind, Some(key))).await
    }

    async fn admin_create<T>(&self, kind: AdminKind, body: &T) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.mutate(Method::POST, &self.admin_url(kind, None), body, kind.lock()).await
    }

    async fn admin_update<T>(&self, kind: AdminKind, id: &str, body: &T) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let url = self.api_url(&format!("v1/policy-admin/{}/{}", kind.segment(), encode(id)));
        self.mutate(Method::PATCH, &url, body, kind.lock()).await
    }

    async fn admin_delete(&self, kind: AdminKind, id: &str) -> ApiResult<()> {
        let url = self.api_url(&format!("v1/policy-admin/{}/{}", kind.segment(), encode(id)));
        self.delete(&url, kind.lock()).await
    }

    // Policies

    pub async fn get_policy(&self, id: &str) -> ApiResult<Policy> {
        self.admin_get(AdminKind::Policies, id).await
    }

    /// The remote resolves names on the same path as ids
    pub async fn get_policy_by_name(&self, name: &str) -> ApiResult<Policy> {
        self.admin_get(AdminKind::Policies, name).await
    }

    pub async fn create_policy(&self, policy: &Policy) -> ApiResult<Policy> {
        self.admin_create(AdminKind::Policies, policy).await
    }

    pub async fn update_policy(&self, id: &str, policy: &Policy) -> ApiResult<Policy> {
        self.admin_update(AdminKind::Policies, id, policy).await
    }

    pub async fn delete_policy(&self, id: &str) -> ApiResult<()> {
        self.admin_delete(AdminKind::Policies, id).await
    }

    // Roles

    pub async fn get_role(&self, id: &str) -> ApiResult<Role> {
        self.admin_get(AdminKind::Roles, id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> ApiResult<Role> {
        self.admin_get(AdminKind::Roles, name).await
    }

    pub async fn create_role(&self, role: &Role) -> ApiResult<Role> {
        self.admin_create(AdminKind::Roles, role).await
    }

    pub async fn update_role(&self, id: &str, role: &Role) -> ApiResult<Role> {
        self.admin_update(AdminKind::Roles, id, role).await
    }

    pub async fn delete_role(&self, id: &str) -> ApiResult<()> {
        self.admin_delete(AdminKind::Roles, id).await
    }

    // Permissions

    pub async fn get_permission(&self, id: &str) -> ApiResult<Permission> {
        self.admin_get(AdminKind::Permissions, id).await
    }

    pub async fn get_permission_by_name(&self, name: &str) -> ApiResult<Permission> {
        self.admin_get(AdminKind::Permissions, name).await
    }

    pub async fn create_permission(&self, permission: &Permission) -> ApiResult<Permission> {
        self.admin_create(AdminKind::Permissions, permission).await
    }

    pub async fn update_permission(&self, id: &str, permission: &Permission) -> ApiResult<Permission> {
        self.admin_update(AdminKind::Permissions, id, permission).await
    }

    pub async fn delete_permission(&self, id: &str) -> ApiResult<()> {
        self.admin_delete(AdminKind::Permissions, id).await
    }
}
