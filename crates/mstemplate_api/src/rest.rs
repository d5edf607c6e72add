//! REST adapter over the example use-cases.
//!
//! # Responsibility
//! - Translate resource-oriented calls into use-case invocations.
//! - Map results and errors to `Response` envelopes.
//!
//! # Invariants
//! - The adapter holds no per-request state.
//! - Every failure produces an error body stamped by the injected clock.
//! - A full update of an unknown id creates a new example instead.

use crate::response::{ExamplePayload, Response, ResponseBody};
use http::StatusCode;
use log::{debug, warn};
use mstemplate_core::{
    Clock, Example, ExampleCreationUseCase, ExampleDataService, ExampleId, ExampleReadUseCase,
    ExampleRemovalUseCase, UseCaseError,
};
use serde_json::{Map, Value};

/// Resource-level entry points for `/examples`.
#[derive(Debug)]
pub struct ExampleRestApi<D: ExampleDataService, C: Clock> {
    creation: ExampleCreationUseCase<D>,
    read: ExampleReadUseCase<D>,
    removal: ExampleRemovalUseCase<D>,
    clock: C,
}

impl<D: ExampleDataService + Clone, C: Clock> ExampleRestApi<D, C> {
    /// Wires all three use-cases against one data service handle.
    pub fn new(data: D, clock: C) -> Self {
        Self::from_use_cases(
            ExampleCreationUseCase::new(data.clone()),
            ExampleReadUseCase::new(data.clone()),
            ExampleRemovalUseCase::new(data),
            clock,
        )
    }
}

impl<D: ExampleDataService, C: Clock> ExampleRestApi<D, C> {
    pub fn from_use_cases(
        creation: ExampleCreationUseCase<D>,
        read: ExampleReadUseCase<D>,
        removal: ExampleRemovalUseCase<D>,
        clock: C,
    ) -> Self {
        Self {
            creation,
            read,
            removal,
            clock,
        }
    }

    /// `GET /examples`: every example, active or not.
    pub fn get(&self) -> Response {
        match self.read.list_all() {
            Ok(examples) => Response::ok(ResponseBody::Examples(examples)),
            Err(err) => self.failure("get", &err),
        }
    }

    /// `GET /examples?active=true`
    pub fn get_active(&self) -> Response {
        match self.read.list_active() {
            Ok(examples) => Response::ok(ResponseBody::Examples(examples)),
            Err(err) => self.failure("get_active", &err),
        }
    }

    /// `GET /examples/{id}`; an unknown id answers 404.
    pub fn get_by_id(&self, id: ExampleId) -> Response {
        match self.read.get_by_id(id) {
            Ok(Some(example)) => Response::ok(ResponseBody::Example(example)),
            Ok(None) => self.failure("get_by_id", &UseCaseError::NotExists(id)),
            Err(err) => self.failure("get_by_id", &err),
        }
    }

    /// `POST /examples`: 201 with the new id.
    pub fn create(&self, payload: &ExamplePayload) -> Response {
        let example = Example::new(payload.name.clone(), payload.useful, self.clock.now());
        match self.creation.create(&example) {
            Ok(created) => {
                debug!("event=rest_create module=api status=ok id={}", created.id);
                Response::created(created.id)
            }
            Err(err) => self.failure("create", &err),
        }
    }

    /// `PUT /examples/{id}`: 204, or 201 when `id` is unknown and the
    /// payload was created as a new example under a store-assigned id.
    pub fn update(&self, id: ExampleId, payload: &ExamplePayload) -> Response {
        let mut example = Example::new(payload.name.clone(), payload.useful, self.clock.now());
        example.id = id;
        match self.creation.update(&example) {
            Ok(_) => Response::no_content(),
            Err(UseCaseError::NotExists(_)) => {
                debug!("event=rest_update module=api status=fallback_create requested_id={id}");
                self.create(payload)
            }
            Err(err) => self.failure("update", &err),
        }
    }

    /// `PATCH /examples/{id}` with a property map.
    pub fn partial_update(&self, id: ExampleId, properties: &Map<String, Value>) -> Response {
        match self.creation.update_partial(id, properties) {
            Ok(_) => Response::no_content(),
            Err(err) => self.failure("partial_update", &err),
        }
    }

    /// `DELETE /examples/{id}`: physical removal.
    pub fn delete(&self, id: ExampleId) -> Response {
        match self.removal.delete_permanently(id) {
            Ok(()) => Response::no_content(),
            Err(err) => self.failure("delete", &err),
        }
    }

    /// `POST /examples/{id}/deactivation`: logical removal stamped now.
    pub fn deactivate(&self, id: ExampleId) -> Response {
        match self.removal.deactivate_logically(id, self.clock.now()) {
            Ok(()) => Response::no_content(),
            Err(err) => self.failure("deactivate", &err),
        }
    }

    fn failure(&self, operation: &str, err: &UseCaseError) -> Response {
        let response = Response::from_error(err, self.clock.now());
        if response.status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!(
                "event=rest_{} module=api status=error code={} error={}",
                operation,
                response.status.as_u16(),
                err
            );
        } else {
            debug!(
                "event=rest_{} module=api status=rejected code={} error={}",
                operation,
                response.status.as_u16(),
                err
            );
        }
        response
    }
}
