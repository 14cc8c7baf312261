//! Custom application template upload

use crate::pam::{lock_names, ApiResult, PamClient, RequestBody};
use reqwest::Method;

/// Multipart field the remote reads the template from
pub const TEMPLATE_FIELD: &str = "templateFile";

impl PamClient {
    /// `POST /generic-apps/templates` as multipart; 200, 202 and 204 all succeed
    pub async fn upload_custom_template(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<()> {
        let body = RequestBody::Multipart {
            field: TEMPLATE_FIELD.to_string(),
            file_name: file_name.to_string(),
            bytes: contents,
        };
        self.send_body(
            Method::POST,
            &self.api_url("generic-apps/templates"),
            body,
            Some(lock_names::APPLICATION),
        )
        .await
        .map(|_| ())
    }
}
