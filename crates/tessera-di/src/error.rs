//! Container error types
//!
//! The container has exactly one failure mode of its own: the requested
//! (descriptor type, key) pair is not registered. Panics raised by user
//! factories are not caught and unwind through `get` unchanged.

use crate::key::ServiceKey;

/// Errors that can occur during dependency injection operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DIError {
    #[error("Service not found: {service_type} (key {key})")]
    ServiceNotFound { service_type: String, key: usize },
}

impl DIError {
    /// Build a `ServiceNotFound` for the given key
    pub fn not_found(key: &ServiceKey) -> Self {
        DIError::ServiceNotFound {
            service_type: key.type_name().to_string(),
            key: key.key(),
        }
    }
}

pub type DIResult<T> = Result<T, DIError>;

/// Return type of [`ServiceScope::get`](crate::ServiceScope::get) and the
/// `for_each` family.
///
/// Without the `panic-on-missing` feature this is a [`DIResult`] the caller
/// must inspect.
#[cfg(not(feature = "panic-on-missing"))]
pub type Resolution<T> = DIResult<T>;

/// Return type of [`ServiceScope::get`](crate::ServiceScope::get) and the
/// `for_each` family.
///
/// With `panic-on-missing` the value is returned directly and a missing
/// service panics with the [`DIError`] as payload.
#[cfg(feature = "panic-on-missing")]
pub type Resolution<T> = T;

#[cfg(not(feature = "panic-on-missing"))]
pub(crate) fn settle<T>(result: DIResult<T>) -> Resolution<T> {
    result
}

#[cfg(feature = "panic-on-missing")]
pub(crate) fn settle<T>(result: DIResult<T>) -> Resolution<T> {
    match result {
        Ok(value) => value,
        Err(err) => std::panic::panic_any(err),
    }
}
