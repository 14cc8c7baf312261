//! Policies scoped to a single profile

use crate::model::ProfilePolicy;
use crate::pam::{encode, ApiResult, PamClient};
use reqwest::Method;

impl PamClient {
    /// `GET /paps/{profile}/policies`
    pub async fn get_profile_policies(&self, profile_id: &str) -> ApiResult<Vec<ProfilePolicy>> {
        self.get_list(&self.api_url(&format!("paps/{}/policies", profile_id))).await
    }

    /// `GET /paps/{profile}/policies/{name-or-id}?compactResponse=true`
    pub async fn get_profile_policy(&self, profile_id: &str, policy: &str) -> ApiResult<ProfilePolicy> {
        let url = self.api_url(&format!(
            "paps/{}/policies/{}?compactResponse=true",
            profile_id,
            encode(policy)
        ));
        self.get_json(&url).await
    }

    /// `POST /paps/{profile}/policies`
    pub async fn create_profile_policy(&self, profile_id: &str, policy: &ProfilePolicy) -> ApiResult<ProfilePolicy> {
        let url = self.api_url(&format!("paps/{}/policies", profile_id));
        self.mutate(Method::POST, &url, policy, profile_id).await
    }

    /// `PATCH /paps/{profile}/policies/{policy}`
    pub async fn update_profile_policy(&self, profile_id: &str, policy_id: &str, policy: &ProfilePolicy) -> ApiResult<ProfilePolicy> {
        let url = self.api_url(&format!("paps/{}/policies/{}", profile_id, policy_id));
        self.mutate(Method::PATCH, &url, policy, profile_id).await
    }

    /// `DELETE /paps/{profile}/policies/{policy}`
    pub async fn delete_profile_policy(&self, profile_id: &str, policy_id: &str) -> ApiResult<()> {
        let url = self.api_url(&format!("paps/{}/policies/{}", profile_id, policy_id));
        self.delete(&url, profile_id).await
    }
}
