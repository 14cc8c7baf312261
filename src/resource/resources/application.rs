use super::assigned_id;
use crate::model::{Application, Property, PropertyTypes};
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// `application`: a catalog application instance
pub struct ApplicationResource;

fn properties(data: &ResourceData) -> Vec<Property> {
    data.get_str_map("properties")
        .into_iter()
        .map(|(name, value)| Property { name, value })
        .collect()
}

#[async_trait]
impl Resource for ApplicationResource {
    fn type_name(&self) -> &'static str {
        "application"
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let application = Application {
            catalog_app_id: data.get_i64("catalog_app_id"),
            catalog_app_display_name: Some(data.get_str("name")?.to_string()),
            properties: properties(data),
            ..Default::default()
        };
        let created = client.create_application(&application).await?;
        data.set_id(assigned_id(created.app_container_id, "application")?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let application = client.get_application(data.require_id()?).await?;
        if let Some(name) = application.catalog_app_display_name {
            data.set("name", name)?;
        }
        data.set("catalog_app_id", application.catalog_app_id)?;
        data.set("catalog_app_name", application.catalog_app_name)?;
        data.set("status", application.status)?;
        if !application.properties.is_empty() {
            let props: BTreeMap<String, String> = application
                .properties
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect();
            data.set("properties", props)?;
        }
        Ok(())
    }

    /// Only environment properties are mutable
    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        if let Some(environment_id) = data.get_string("environment_id") {
            let body = PropertyTypes {
                property_types: properties(data),
            };
            client
                .patch_environment_properties(data.require_id()?, &environment_id, &body)
                .await?;
        }
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        client.delete_application(data.require_id()?).await
    }
}
