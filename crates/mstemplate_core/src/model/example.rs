//! Example domain model.
//!
//! # Responsibility
//! - Define the `Example` record and its lifecycle helpers.
//! - Define the allow-list of updatable properties and the typed patch
//!   built from untyped property maps.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `name` is never blank.
//! - `deactivated_at.is_some()` is the source of truth for inactive state.
//! - Only `name` and `useful` can change after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Store-assigned identifier of an `Example`.
pub type ExampleId = i64;

/// Canonical example record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Zero until the store assigns an identifier.
    pub id: ExampleId,
    pub name: String,
    /// Boolean flag carried by every example.
    pub useful: bool,
    pub created_at: DateTime<Utc>,
    /// Set when the record is logically deleted.
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Example {
    /// Creates an unsaved example. The store assigns `id` on creation.
    pub fn new(name: impl Into<String>, useful: bool, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            useful,
            created_at,
            deactivated_at: None,
        }
    }

    /// Returns whether this example has not been logically deleted.
    pub fn is_active(&self) -> bool {
        self.deactivated_at.is_none()
    }

    /// Marks this example as logically deleted at `at`.
    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.deactivated_at = Some(at);
    }

    /// Applies the set fields of `patch` in place.
    pub fn apply(&mut self, patch: &ExamplePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(useful) = patch.useful {
            self.useful = useful;
        }
    }

    /// Validates write-time invariants.
    ///
    /// # Errors
    /// - Returns `BlankName` when `name` is empty after trimming.
    pub fn validate(&self) -> Result<(), ExampleValidationError> {
        validate_name(&self.name)
    }
}

/// Validation failures for example writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExampleValidationError {
    #[error("example name must not be blank")]
    BlankName,
}

/// Closed set of properties that may be changed by a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleProperty {
    Name,
    Useful,
}

impl ExampleProperty {
    /// Every updatable property, in column order.
    pub const ALL: [ExampleProperty; 2] = [ExampleProperty::Name, ExampleProperty::Useful];

    /// Wire key used in property maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Useful => "useful",
        }
    }

    /// Resolves a wire key against the allow-list.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|property| property.key() == key)
    }
}

/// Rejected entry of an untyped property map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("property {0} does not exist or cannot be updated")]
    Unknown(String),
    #[error("property {key} expects a {expected} value")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

/// Typed partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePatch {
    pub name: Option<String>,
    pub useful: Option<bool>,
}

impl ExamplePatch {
    /// Builds a patch from a JSON property map, checking every key against
    /// `ExampleProperty` and every value against the property type.
    ///
    /// # Errors
    /// - `PropertyError::Unknown` for keys outside the allow-list.
    /// - `PropertyError::WrongType` for values of the wrong JSON type.
    pub fn from_properties(properties: &Map<String, Value>) -> Result<Self, PropertyError> {
        let mut patch = Self::default();
        for (key, value) in properties {
            let property = ExampleProperty::from_key(key)
                .ok_or_else(|| PropertyError::Unknown(key.clone()))?;
            match property {
                ExampleProperty::Name => {
                    let name = value.as_str().ok_or(PropertyError::WrongType {
                        key: property.key(),
                        expected: "string",
                    })?;
                    patch.name = Some(name.to_string());
                }
                ExampleProperty::Useful => {
                    let useful = value.as_bool().ok_or(PropertyError::WrongType {
                        key: property.key(),
                        expected: "boolean",
                    })?;
                    patch.useful = Some(useful);
                }
            }
        }
        Ok(patch)
    }

    /// Returns whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.useful.is_none()
    }

    /// Properties set on this patch, in column order.
    pub fn properties(&self) -> Vec<ExampleProperty> {
        let mut set = Vec::with_capacity(ExampleProperty::ALL.len());
        if self.name.is_some() {
            set.push(ExampleProperty::Name);
        }
        if self.useful.is_some() {
            set.push(ExampleProperty::Useful);
        }
        set
    }

    /// Validates the fields this patch sets.
    pub fn validate(&self) -> Result<(), ExampleValidationError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ExampleValidationError> {
    if name.trim().is_empty() {
        return Err(ExampleValidationError::BlankName);
    }
    Ok(())
}
