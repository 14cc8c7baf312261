//! Constraints on profile permissions

use crate::model::{Constraint, ConstraintOperation, ConstraintResult};
use crate::pam::{encode, lock_names, ApiError, ApiResult, PamClient};
use reqwest::Method;

/// Permission a constraint hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionRef<'a> {
    pub profile_id: &'a str,
    pub name: &'a str,
    pub permission_type: &'a str,
}

impl PamClient {
    fn permission_url(&self, permission: &PermissionRef<'_>, rest: &str) -> String {
        self.api_url(&format!(
            "paps/{}/permissions/{}/{}/{}",
            permission.profile_id,
            encode(permission.name),
            encode(permission.permission_type),
            rest
        ))
    }

    /// `GET .../supported-constraint-types`
    pub async fn get_supported_constraint_types(&self, permission: &PermissionRef<'_>) -> ApiResult<Vec<String>> {
        self.get_list(&self.permission_url(permission, "supported-constraint-types"))
            .await
    }

    /// `GET .../constraints/{constraintType}`
    pub async fn get_constraints(&self, permission: &PermissionRef<'_>, constraint_type: &str) -> ApiResult<ConstraintResult> {
        let url = self.permission_url(permission, &format!("constraints/{}", encode(constraint_type)));
        self.get_json(&url).await
    }

    /// One constraint matched by name (value form) or title (condition form)
    pub async fn get_constraint(&self, permission: &PermissionRef<'_>, constraint_type: &str, key: &str) -> ApiResult<Constraint> {
        self.get_constraints(permission, constraint_type)
            .await?
            .result
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or(ApiError::NotFound)
    }

    /// `PUT .../constraints/{constraintType}?operation=add|remove`; 204 is success
    pub async fn update_constraint(&self, permission: &PermissionRef<'_>, constraint_type: &str, operation: ConstraintOperation, constraint: &Constraint) -> ApiResult<()> {
        let url = self.permission_url(
            permission,
            &format!("constraints/{}?operation={}", encode(constraint_type), operation.as_str()),
        );
        self.send_unit(Method::PUT, &url, Some(constraint), Some(lock_names::CONSTRAINT))
            .await
    }

    pub async fn add_constraint(&self, permission: &PermissionRef<'_>, constraint_type: &str, constraint: &Constraint) -> ApiResult<()> {
        self.update_constraint(permission, constraint_type, ConstraintOperation::Add, constraint)
            .await
    }

    pub async fn remove_constraint(&self, permission: &PermissionRef<'_>, constraint_type: &str, constraint: &Constraint) -> ApiResult<()> {
        self.update_constraint(permission, constraint_type, ConstraintOperation::Remove, constraint)
            .await
    }
}
