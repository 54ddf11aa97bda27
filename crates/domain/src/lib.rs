//! Domain layer for the Transloc client
//!
//! Contains the value objects shared by the request builder and the
//! response payloads: the agency selection and opaque identifiers.
//! This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
