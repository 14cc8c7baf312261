//! Resource implementations, one file per family

mod advanced_settings;
mod application;
mod constraint;
mod environment;
mod identity;
mod policy_admin;
mod profile;
mod profile_links;
mod resource_manager;
mod rm_profile;

use super::data::ResourceData;
use super::lifecycle::Resource;
use crate::model::NamedRef;
use crate::pam::{ApiError, ApiResult};

pub use advanced_settings::AdvancedSettingsResource;
pub use application::ApplicationResource;
pub use constraint::ConstraintResource;
pub use environment::EntityResource;
pub use identity::{TagMemberResource, TagResource};
pub use policy_admin::{PermissionResource, PolicyResource, RoleResource};
pub use profile::{ProfileAdditionalSettingsResource, ProfilePolicyResource, ProfileResource};
pub use profile_links::{ProfileIdentityResource, ProfilePermissionResource, ProfileTagResource, SessionAttributeResource};
pub use resource_manager::{
    BrokerPoolsResource, ResourceLabelResource, ResourcePolicyResource, ResourceTypePermissionResource,
    ResourceTypeResource, ResponseTemplateResource, ServerResource,
};
pub use rm_profile::{RmProfilePermissionResource, RmProfilePolicyResource, RmProfileResource};

/// Every resource the provider serves
pub fn all() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(ApplicationResource),
        Box::new(EntityResource::groups()),
        Box::new(EntityResource::environments()),
        Box::new(ProfileResource),
        Box::new(ProfilePermissionResource),
        Box::new(ProfileIdentityResource),
        Box::new(ProfileTagResource),
        Box::new(SessionAttributeResource),
        Box::new(ProfileAdditionalSettingsResource),
        Box::new(ProfilePolicyResource),
        Box::new(ConstraintResource),
        Box::new(PolicyResource),
        Box::new(RoleResource),
        Box::new(PermissionResource),
        Box::new(TagResource),
        Box::new(TagMemberResource),
        Box::new(AdvancedSettingsResource),
        Box::new(ResourceTypeResource),
        Box::new(ResourceTypePermissionResource),
        Box::new(ServerResource),
        Box::new(ResourceLabelResource),
        Box::new(BrokerPoolsResource),
        Box::new(ResponseTemplateResource),
        Box::new(ResourcePolicyResource),
        Box::new(RmProfileResource),
        Box::new(RmProfilePermissionResource),
        Box::new(RmProfilePolicyResource),
    ]
}

/// The id the remote assigned on create
fn assigned_id(id: Option<String>, what: &str) -> ApiResult<String> {
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation(format!("service returned no id for the new {}", what)))
}

/// Reject an update that changes an attribute baked into the id
///
/// Absent attributes are taken as unchanged.
fn require_same_key(type_name: &str, data: &ResourceData, keys: &[(&str, &str)]) -> ApiResult<()> {
    for (attribute, current) in keys {
        if let Some(wanted) = data.get_string(attribute) {
            if wanted != *current {
                return Err(ApiError::validation(format!(
                    "{}: changing {} from {} to {} requires replacement",
                    type_name, attribute, current, wanted
                )));
            }
        }
    }
    Ok(())
}

fn named_refs(names: Vec<String>) -> Vec<NamedRef> {
    names.into_iter().map(NamedRef::named).collect()
}

fn ref_names(refs: &[NamedRef]) -> Vec<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}
