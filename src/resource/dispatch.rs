//! Dispatch
//!
//! Runs a lifecycle operation by type name and folds the result into a
//! `(state, diagnostics)` pair for the orchestrator.

use super::data::ResourceData;
use super::diag::Diagnostics;
use super::registry::{get_data_source, get_resource};
use crate::pam::{ApiError, PamClient};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        })
    }
}

/// Result of one dispatched operation
///
/// `state` is `None` after a delete and when a read finds the object gone.
#[derive(Debug, Default)]
pub struct Outcome {
    pub state: Option<ResourceData>,
    pub diagnostics: Diagnostics,
}

impl Outcome {
    fn state(data: ResourceData) -> Self {
        Self {
            state: Some(data),
            diagnostics: Diagnostics::new(),
        }
    }

    fn empty() -> Self {
        Self::default()
    }

    fn failed(err: &ApiError) -> Self {
        Self {
            state: None,
            diagnostics: Diagnostics::from_error(err),
        }
    }

    fn partial(data: ResourceData, err: &ApiError) -> Self {
        Self {
            state: Some(data),
            diagnostics: Diagnostics::from_error(err),
        }
    }

    fn unknown(kind: &str, type_name: &str) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(
            format!("Unknown {} type", kind),
            format!("no {} is registered as {:?}", kind, type_name),
        );
        Self { state: None, diagnostics }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Run `operation` against the resource registered as `type_name`
pub async fn run_resource(client: &PamClient, type_name: &str, operation: Operation, mut data: ResourceData) -> Outcome {
    let Some(resource) = get_resource(type_name) else {
        return Outcome::unknown("resource", type_name);
    };

    tracing::debug!("dispatch: type={}, operation={}, id={:?}", type_name, operation, data.id());

    let result = match operation {
        Operation::Create => resource.create(client, &mut data).await,
        Operation::Read => resource.read(client, &mut data).await,
        Operation::Update => resource.update(client, &mut data).await,
        Operation::Import => resource.import(client, &mut data).await,
        Operation::Delete => resource.delete(client, &data).await,
    };

    match (operation, result) {
        (Operation::Delete, Ok(())) => Outcome::empty(),
        (_, Ok(())) => Outcome::state(data),
        (Operation::Read, Err(ApiError::NotFound)) => {
            tracing::info!("{} {:?} no longer exists, dropping from state", type_name, data.id());
            Outcome::empty()
        },
        (Operation::Delete, Err(ApiError::NotFound | ApiError::NoContent)) => Outcome::empty(),
        // the remote object exists once an id is assigned; keep tracking it
        (Operation::Create, Err(err)) if data.id().is_some() => {
            tracing::error!("{} {} failed after creating {:?}: {}", operation, type_name, data.id(), err);
            Outcome::partial(data, &err)
        },
        (_, Err(err)) => {
            tracing::error!("{} {} failed: {}", operation, type_name, err);
            Outcome::failed(&err)
        },
    }
}

/// Create when the state carries no id, update otherwise
pub async fn apply(client: &PamClient, type_name: &str, data: ResourceData) -> Outcome {
    let operation = if data.id().is_some() {
        Operation::Update
    } else {
        Operation::Create
    };
    run_resource(client, type_name, operation, data).await
}

/// Run the data source registered as `type_name`
pub async fn read_data_source(client: &PamClient, type_name: &str, mut data: ResourceData) -> Outcome {
    let Some(source) = get_data_source(type_name) else {
        return Outcome::unknown("data source", type_name);
    };

    tracing::debug!("dispatch: data source={}", type_name);

    match source.read(client, &mut data).await {
        Ok(()) => Outcome::state(data),
        Err(err) => {
            tracing::error!("data source {} failed: {}", type_name, err);
            Outcome::failed(&err)
        },
    }
}
