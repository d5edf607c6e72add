//! Domain model for the example service.
//!
//! # Responsibility
//! - Define the canonical `Example` record shared by every layer.
//! - Define the typed patch used for partial updates.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `ExampleId`.
//! - Logical deletion is represented by `deactivated_at`, not by removal.

pub mod example;
