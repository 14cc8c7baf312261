//! Request and response bodies exchanged with the PAM service
//!
//! Pure data carriers. Field names are camelCase on the wire; ids assigned by
//! the remote are optional so the same struct serves create and read.

pub mod advanced_settings;
pub mod application;
pub mod constraint;
pub mod identity;
pub mod integration;
pub mod policy;
pub mod profile;
pub mod resource_manager;

pub use advanced_settings::{
    AdvancedSettings, ImValue, ItsmFilterCriteria, ItsmValue, JustificationValue, Setting, SettingEntry,
    SettingKind, SettingsTarget,
};
pub use application::{Application, Environment, EnvironmentGroup, Property, PropertyTypes, RootEnvironmentGroup};
pub use constraint::{
    ConditionConstraint, Constraint, ConstraintKind, ConstraintOperation, ConstraintResult, ValueConstraint,
};
pub use identity::{IdentityProvider, IdentityProviderRef, Tag, TagIdentityProvider, User, UserAttribute};
pub use integration::{Connection, EscalationPolicy, EscalationPolicyPage};
pub use policy::{Members, NamedRef, Permission, Policy, Role};
pub use profile::{
    PermissionOp, Profile, ProfileAdditionalSettings, ProfileAssociation, ProfileIdentity, ProfilePermission,
    ProfilePermissionRequest, ProfilePolicy, ProfileTag, SessionAttribute,
};
pub use resource_manager::{
    BrokerPool, LabelAssignments, LabelValue, PermissionVariable, ProfilePermissionsUpdate,
    ProfileResourceAssociations, Resource, ResourceLabel, ResourceManagerProfile, ResourceManagerProfilePermission,
    ResourceManagerProfilePolicy, ResourcePermission, ResourcePolicy, ResourceType, ResourceTypeParameter,
    ResourceTypeRef, ResponseTemplate,
};
