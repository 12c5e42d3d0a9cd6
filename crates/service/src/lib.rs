//! Service layer providing the post store operations on top of models.
//! - Owns the in-memory collection and its locking discipline.
//! - Reuses entity and sort-parameter definitions in the `models` crate.
//! - Provides clear error types mapped to HTTP statuses by the server.

pub mod errors;
pub mod posts;
