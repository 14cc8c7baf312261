//! Applications

use crate::model::{Application, PropertyTypes};
use crate::pam::{encode, lock_names, ApiError, ApiResult, PamClient};
use reqwest::Method;

impl PamClient {
    /// `GET /apps`
    pub async fn get_applications(&self) -> ApiResult<Vec<Application>> {
        self.get_list(&self.host_url("apps")).await
    }

    /// `GET /apps/{app}`
    pub async fn get_application(&self, app_id: &str) -> ApiResult<Application> {
        self.get_json(&self.host_url(&format!("apps/{}", app_id))).await
    }

    /// Case-insensitive lookup through `GET /apps?metadata=false&name=`
    pub async fn get_application_by_name(&self, name: &str) -> ApiResult<Application> {
        let url = self.host_url(&format!("apps?metadata=false&name={}", encode(name)));
        let apps: Vec<Application> = self.get_list(&url).await?;
        apps.into_iter()
            .find(|a| {
                a.catalog_app_display_name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .ok_or(ApiError::NotFound)
    }

    /// `POST /apps`
    pub async fn create_application(&self, application: &Application) -> ApiResult<Application> {
        self.mutate(Method::POST, &self.host_url("apps"), application, lock_names::APPLICATION)
            .await
    }

    /// `PATCH /apps/{app}/environments/{env}/properties`
    pub async fn patch_environment_properties(&self, app_id: &str, environment_id: &str, properties: &PropertyTypes) -> ApiResult<PropertyTypes> {
        let url = self.host_url(&format!("apps/{}/environments/{}/properties", app_id, environment_id));
        self.mutate(Method::PATCH, &url, properties, app_id).await
    }

    /// `DELETE /apps/{app}`
    pub async fn delete_application(&self, app_id: &str) -> ApiResult<()> {
        self.delete(&self.host_url(&format!("apps/{}", app_id)), lock_names::APPLICATION)
            .await
    }
}
