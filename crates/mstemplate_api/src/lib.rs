//! REST-facing adapter for the example service.
//!
//! # Responsibility
//! - Expose resource-level operations over the core use-cases.
//! - Keep status-code semantics out of the core crate.
//!
//! The adapter is transport-neutral: any HTTP framework can bind its
//! handlers to these calls and write the returned envelopes out.

pub mod response;
pub mod rest;

pub use response::{
    status_for_error, ErrorBody, ExamplePayload, Response, ResponseBody, EXAMPLES_PATH,
};
pub use rest::ExampleRestApi;
