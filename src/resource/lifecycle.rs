//! Lifecycle traits implemented by every resource and data source

use super::data::ResourceData;
use crate::ids::CompositeId;
use crate::pam::{ApiResult, PamClient};
use async_trait::async_trait;

/// A managed object with create/read/update/delete semantics
///
/// `create` and `update` leave the refreshed state in `data`. `read` returns
/// [`crate::pam::ApiError::NotFound`] when the object vanished out of band;
/// the dispatcher turns that into an empty state.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Shape of the identifier, when it is a composite
    fn id_format(&self) -> Option<CompositeId> {
        None
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()>;

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()>;

    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()>;

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()>;

    /// Validate the identifier shape, then read
    async fn import(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        if let Some(format) = self.id_format() {
            format.parse(data.require_id()?)?;
        }
        self.read(client, data).await
    }
}

/// A read-only lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()>;
}
