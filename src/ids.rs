//! Composite identifiers
//!
//! Several resources are keyed by slash-delimited composites such as
//! `paps/{profile}/policies/{policy}`. All of them are parsed and emitted
//! through [`CompositeId`] so the shape is validated in one place.

use crate::pam::{ApiError, ApiResult};

/// A template of literal segments and named placeholders, e.g.
/// `paps/{profile}/policies/{policy}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeId {
    template: &'static str,
}

pub const PROFILE: CompositeId = CompositeId::new("apps/{app}/paps/{profile}");
pub const PROFILE_POLICY: CompositeId = CompositeId::new("paps/{profile}/policies/{policy}");
pub const PROFILE_PERMISSION: CompositeId = CompositeId::new("paps/{profile}/permissions/{name}/{type}");
pub const CONSTRAINT: CompositeId =
    CompositeId::new("paps/{profile}/permissions/{name}/{type}/constraints/{constraint_type}/{value}");
pub const PROFILE_IDENTITY: CompositeId = CompositeId::new("paps/{profile}/users/{user}");
pub const PROFILE_TAG: CompositeId = CompositeId::new("paps/{profile}/user-tags/{tag}");
pub const PROFILE_SESSION_ATTRIBUTE: CompositeId = CompositeId::new("paps/{profile}/session-attributes/{attribute}");
pub const ENTITY_ENVIRONMENT: CompositeId = CompositeId::new("apps/{app}/root-environment-group/environments/{entity}");
pub const ENTITY_GROUP: CompositeId = CompositeId::new("apps/{app}/root-environment-group/groups/{entity}");
pub const TAG_MEMBER: CompositeId = CompositeId::new("user-tags/{tag}/users/{user}");
pub const RESOURCE_MANAGER_PROFILE_POLICY: CompositeId =
    CompositeId::new("resource-manager/profile/{profile}/policies/{policy}");
pub const RESOURCE_MANAGER_PROFILE_PERMISSION: CompositeId =
    CompositeId::new("resource-manager/profile/{profile}/permissions/{permission}");
pub const BROKER_POOLS: CompositeId = CompositeId::new("resource-manager/resources/{resource}/broker-pools");

impl CompositeId {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Substitute `values` into the placeholders, in order
    pub fn format<S: AsRef<str>>(&self, values: &[S]) -> ApiResult<String> {
        let placeholders = self.placeholder_count();
        if values.len() != placeholders {
            return Err(ApiError::validation(format!(
                "identifier {} needs {} values, got {}",
                self.template,
                placeholders,
                values.len()
            )));
        }
        let mut values = values.iter();
        let mut out = Vec::new();
        for segment in self.template.split('/') {
            if is_placeholder(segment) {
                let value = values.next().map(|v| v.as_ref()).unwrap_or_default();
                if value.is_empty() || value.contains('/') {
                    return Err(ApiError::validation(format!(
                        "invalid value {:?} for {} in {}",
                        value, segment, self.template
                    )));
                }
                out.push(value.to_string());
            } else {
                out.push(segment.to_string());
            }
        }
        Ok(out.join("/"))
    }

    /// Split `id` into its placeholder values, in order
    pub fn parse(&self, id: &str) -> ApiResult<Vec<String>> {
        let parts: Vec<&str> = id.trim_matches('/').split('/').collect();
        let template: Vec<&str> = self.template.split('/').collect();
        if parts.len() != template.len() {
            return Err(self.shape_error(id));
        }
        let mut values = Vec::new();
        for (part, expected) in parts.iter().zip(template.iter()) {
            if is_placeholder(expected) {
                if part.is_empty() {
                    return Err(self.shape_error(id));
                }
                values.push(part.to_string());
            } else if part != expected {
                return Err(self.shape_error(id));
            }
        }
        Ok(values)
    }

    /// Parse and return exactly `N` values
    pub fn parse_n<const N: usize>(&self, id: &str) -> ApiResult<[String; N]> {
        let values = self.parse(id)?;
        values.try_into().map_err(|_| self.shape_error(id))
    }

    pub fn matches(&self, id: &str) -> bool {
        self.parse(id).is_ok()
    }

    fn placeholder_count(&self) -> usize {
        self.template.split('/').filter(|s| is_placeholder(s)).count()
    }

    fn shape_error(&self, id: &str) -> ApiError {
        ApiError::validation(format!("invalid identifier {:?}, expected {}", id, self.template))
    }
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}
