//! Creation use-case: create, full update and partial update.
//!
//! # Invariants
//! - No two active examples share a name; an example never collides with
//!   its own name, and a deactivated example is not checked at all.
//! - Partial updates only touch properties from `ExampleProperty`.
//! - Rejected requests leave the store untouched.

use super::{require_existing, UseCaseError, UseCaseResult};
use crate::dataservice::ExampleDataService;
use crate::model::example::{Example, ExampleId, ExamplePatch};
use log::{info, warn};
use serde_json::{Map, Value};

/// Create/update entry points over a data service.
#[derive(Debug, Clone)]
pub struct ExampleCreationUseCase<D: ExampleDataService> {
    data: D,
}

impl<D: ExampleDataService> ExampleCreationUseCase<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }

    /// Creates a new example and returns it with its store-assigned id.
    ///
    /// # Errors
    /// - `DuplicateName` when an active example already owns the name.
    /// - `Validation` when the example is malformed.
    pub fn create(&self, example: &Example) -> UseCaseResult<Example> {
        example.validate()?;
        self.ensure_name_available(&example.name, None)?;

        let created = self.data.create(example)?;
        info!(
            "event=example_create module=usecase status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces the mutable fields of an existing example.
    ///
    /// # Errors
    /// - `NotExists` when `example.id` is unknown.
    /// - `DuplicateName` when the example is active and another active
    ///   example owns the target name.
    pub fn update(&self, example: &Example) -> UseCaseResult<Example> {
        let current = require_existing(&self.data, example.id)?;
        example.validate()?;
        if current.is_active() {
            self.ensure_name_available(&example.name, Some(example.id))?;
        }

        let updated = self.data.update(example)?;
        info!(
            "event=example_update module=usecase status=ok id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Applies a property map to an existing example and returns the
    /// refreshed record.
    ///
    /// # Errors
    /// - `NotExists` when `id` is unknown.
    /// - `InvalidProperty` when a key is outside the allow-list or a value
    ///   has the wrong type.
    /// - `DuplicateName` when `name` is set and owned by another example.
    pub fn update_partial(
        &self,
        id: ExampleId,
        properties: &Map<String, Value>,
    ) -> UseCaseResult<Example> {
        let current = require_existing(&self.data, id)?;
        let patch = ExamplePatch::from_properties(properties).inspect_err(|err| {
            warn!("event=example_patch module=usecase status=rejected id={id} reason={err}");
        })?;
        self.apply_patch(&current, &patch)
    }

    /// Typed variant of `update_partial` for callers that already hold a
    /// validated patch.
    pub fn update_with_patch(&self, id: ExampleId, patch: &ExamplePatch) -> UseCaseResult<Example> {
        let current = require_existing(&self.data, id)?;
        self.apply_patch(&current, patch)
    }

    fn apply_patch(&self, current: &Example, patch: &ExamplePatch) -> UseCaseResult<Example> {
        let id = current.id;
        patch.validate()?;
        match &patch.name {
            Some(name) if current.is_active() => self.ensure_name_available(name, Some(id))?,
            _ => {}
        }

        if !patch.is_empty() {
            self.data.update_properties(id, patch)?;
        }
        let refreshed = self.data.find_by_id(id)?.ok_or_else(|| {
            UseCaseError::Message(format!("example {id} vanished after partial update"))
        })?;

        let properties = patch
            .properties()
            .iter()
            .map(|property| property.key())
            .collect::<Vec<_>>()
            .join(",");
        info!("event=example_patch module=usecase status=ok id={id} properties={properties}");
        Ok(refreshed)
    }

    fn ensure_name_available(&self, name: &str, owner: Option<ExampleId>) -> UseCaseResult<()> {
        match self.data.find_by_name(name)? {
            Some(existing) if Some(existing.id) != owner => {
                warn!(
                    "event=example_name_check module=usecase status=rejected existing_id={}",
                    existing.id
                );
                Err(UseCaseError::DuplicateName(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}
