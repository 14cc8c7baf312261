use crate::api::PermissionRef;
use crate::ids::{self, CompositeId};
use crate::model::Constraint;
use crate::pam::{ApiResult, PamClient};
use crate::resource::data::ResourceData;
use crate::resource::lifecycle::Resource;
use async_trait::async_trait;

/// `constraint`: keyed
/// `paps/{profile}/permissions/{name}/{type}/constraints/{constraint_type}/{value}`
///
/// `value` is the constraint name, or the title when `constraint_type` is
/// `condition`.
pub struct ConstraintResource;

struct ConstraintKey {
    profile_id: String,
    permission_name: String,
    permission_type: String,
    constraint_type: String,
    value: String,
}

impl ConstraintKey {
    fn parse(id: &str) -> ApiResult<Self> {
        let [profile_id, permission_name, permission_type, constraint_type, value] = ids::CONSTRAINT.parse_n::<5>(id)?;
        Ok(Self {
            profile_id,
            permission_name,
            permission_type,
            constraint_type,
            value,
        })
    }

    fn from_data(data: &ResourceData) -> ApiResult<Self> {
        Ok(Self {
            profile_id: data.get_str("profile_id")?.to_string(),
            permission_name: data.get_str("permission_name")?.to_string(),
            permission_type: data.get_str("permission_type")?.to_string(),
            constraint_type: data.get_str("constraint_type")?.to_string(),
            value: data.get_str("value")?.to_string(),
        })
    }

    fn id(&self) -> ApiResult<String> {
        ids::CONSTRAINT.format(&[
            &self.profile_id,
            &self.permission_name,
            &self.permission_type,
            &self.constraint_type,
            &self.value,
        ])
    }

    fn permission(&self) -> PermissionRef<'_> {
        PermissionRef {
            profile_id: &self.profile_id,
            name: &self.permission_name,
            permission_type: &self.permission_type,
        }
    }

    fn constraint(&self, data: &ResourceData) -> Constraint {
        Constraint::for_type(
            &self.constraint_type,
            &self.value,
            &data.get_string("description").unwrap_or_default(),
            &data.get_string("expression").unwrap_or_default(),
        )
    }
}

#[async_trait]
impl Resource for ConstraintResource {
    fn type_name(&self) -> &'static str {
        "constraint"
    }

    fn id_format(&self) -> Option<CompositeId> {
        Some(ids::CONSTRAINT)
    }

    async fn create(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let key = ConstraintKey::from_data(data)?;
        client
            .add_constraint(&key.permission(), &key.constraint_type, &key.constraint(data))
            .await?;
        data.set_id(key.id()?);
        self.read(client, data).await
    }

    async fn read(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let key = ConstraintKey::parse(data.require_id()?)?;
        let constraint = client
            .get_constraint(&key.permission(), &key.constraint_type, &key.value)
            .await?;
        data.set("profile_id", &key.profile_id)?;
        data.set("permission_name", &key.permission_name)?;
        data.set("permission_type", &key.permission_type)?;
        data.set("constraint_type", &key.constraint_type)?;
        data.set("value", constraint.key())?;
        if let Constraint::Condition(condition) = &constraint {
            data.set("description", &condition.description)?;
            data.set("expression", &condition.expression)?;
        }
        Ok(())
    }

    /// Add the new constraint, then drop the old one, so a failed add leaves
    /// the permission as it was
    ///
    /// With an unchanged key only a condition has anything to send: its
    /// description and expression are re-posted under the same title.
    async fn update(&self, client: &PamClient, data: &mut ResourceData) -> ApiResult<()> {
        let old = ConstraintKey::parse(data.require_id()?)?;
        let new = ConstraintKey::from_data(data)?;
        let new_constraint = new.constraint(data);

        if new.id()? == old.id()? {
            if matches!(new_constraint, Constraint::Condition(_)) {
                client
                    .add_constraint(&new.permission(), &new.constraint_type, &new_constraint)
                    .await?;
            }
            return self.read(client, data).await;
        }

        client
            .add_constraint(&new.permission(), &new.constraint_type, &new_constraint)
            .await?;
        client
            .remove_constraint(&old.permission(), &old.constraint_type, &old.constraint(data))
            .await?;
        data.set_id(new.id()?);
        self.read(client, data).await
    }

    async fn delete(&self, client: &PamClient, data: &ResourceData) -> ApiResult<()> {
        let key = ConstraintKey::parse(data.require_id()?)?;
        client
            .remove_constraint(&key.permission(), &key.constraint_type, &key.constraint(data))
            .await
    }
}
