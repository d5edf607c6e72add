//! Response envelopes and error-to-status mapping.
//!
//! # Invariants
//! - Error bodies always carry the same code as the envelope status.
//! - Status mapping walks the whole error chain: a missing record wins
//!   over a store failure, which wins over any other use-case error.

use chrono::{DateTime, Utc};
use http::StatusCode;
use mstemplate_core::{DataServiceError, Example, ExampleId, UseCaseError};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;

/// Collection path of the example resource.
pub const EXAMPLES_PATH: &str = "/examples";

/// Request body for create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePayload {
    pub name: String,
    #[serde(default)]
    pub useful: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Examples(Vec<Example>),
    Example(Example),
    Error(ErrorBody),
}

/// Transport-neutral response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(rename = "statusCode", serialize_with = "serialize_status")]
    pub status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,
    /// Identifier of the resource created by this call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<ExampleId>,
}

impl Response {
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
            created_id: None,
        }
    }

    pub fn created(id: ExampleId) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: None,
            created_id: Some(id),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
            created_id: None,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            status,
            body: Some(ResponseBody::Error(ErrorBody {
                code: status.as_u16(),
                message: message.into(),
                time,
            })),
            created_id: None,
        }
    }

    /// Builds the error envelope for a failed use-case call.
    pub fn from_error(err: &UseCaseError, time: DateTime<Utc>) -> Self {
        Self::error(status_for_error(err), err.to_string(), time)
    }

    /// Location of the created resource, e.g. `/examples/7`.
    pub fn location(&self) -> Option<String> {
        self.created_id.map(|id| format!("{EXAMPLES_PATH}/{id}"))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Maps an error chain to an HTTP status.
///
/// `NotExists` anywhere in the chain yields 404, a data service error 500,
/// anything else 400.
pub fn status_for_error(err: &(dyn Error + 'static)) -> StatusCode {
    let mut store_failure = false;
    let mut current = Some(err);
    while let Some(cause) = current {
        if matches!(
            cause.downcast_ref::<UseCaseError>(),
            Some(UseCaseError::NotExists(_))
        ) {
            return StatusCode::NOT_FOUND;
        }
        match cause.downcast_ref::<DataServiceError>() {
            Some(DataServiceError::NotFound(_)) => return StatusCode::NOT_FOUND,
            Some(_) => store_failure = true,
            None => {}
        }
        current = cause.source();
    }

    if store_failure {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}
