//! Wire types shared by the uplink crates.
//!
//! Covers the GraphQL envelope spoken with the authorization backend and
//! the presigned-POST authorization handed to the storage transfer.

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{Operation, canonical_field_name};
pub use envelope::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use types::{FormField, SignedReadLink, UploadAuthorization};
