//! Notes CRUD endpoints.

pub mod error;
pub mod notes;

pub use error::ApiError;
