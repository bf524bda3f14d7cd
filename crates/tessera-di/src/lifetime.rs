//! Service lifetime management
//!
//! A descriptor picks its lifetime statically through one of the marker
//! types [`Transient`], [`Scoped`] or [`Singleton`]. The marker decides both
//! where an instance is cached and what type a resolution hands out.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::ServiceDescriptor;
use crate::error::DIResult;
use crate::instance::ServiceRef;
use crate::key::ServiceKey;
use crate::scope::ServiceScope;

/// Service lifetime, as reported by introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLifetime {
    /// Created once and shared by every scope of a provider
    Singleton,
    /// Created each time it's requested
    Transient,
    /// Created once per scope
    Scoped,
}

impl fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceLifetime::Singleton => "singleton",
            ServiceLifetime::Transient => "transient",
            ServiceLifetime::Scoped => "scoped",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Transient {}
    impl Sealed for super::Scoped {}
    impl Sealed for super::Singleton {}
}

/// Per-lifetime resolution strategy
pub trait Lifetime: sealed::Sealed + 'static {
    const KIND: ServiceLifetime;

    /// What a resolution hands out for a descriptor producing `V`
    type Output<V: 'static>;

    fn resolve<D>(
        descriptor: &D,
        key: ServiceKey,
        scope: &ServiceScope<'_>,
    ) -> DIResult<Self::Output<D::Value>>
    where
        D: ServiceDescriptor<Lifetime = Self>;
}

/// Built on every request; the caller owns the value
#[derive(Debug, Clone, Copy, Default)]
pub struct Transient;

/// Built once per scope and cached in the scope's own store
#[derive(Debug, Clone, Copy, Default)]
pub struct Scoped;

/// Built once per provider and cached in the shared singleton store
#[derive(Debug, Clone, Copy, Default)]
pub struct Singleton;

impl Lifetime for Transient {
    const KIND: ServiceLifetime = ServiceLifetime::Transient;

    type Output<V: 'static> = V;

    fn resolve<D>(
        descriptor: &D,
        _key: ServiceKey,
        scope: &ServiceScope<'_>,
    ) -> DIResult<Self::Output<D::Value>>
    where
        D: ServiceDescriptor<Lifetime = Self>,
    {
        descriptor.load(scope)
    }
}

impl Lifetime for Scoped {
    const KIND: ServiceLifetime = ServiceLifetime::Scoped;

    type Output<V: 'static> = ServiceRef<V>;

    fn resolve<D>(
        descriptor: &D,
        key: ServiceKey,
        scope: &ServiceScope<'_>,
    ) -> DIResult<Self::Output<D::Value>>
    where
        D: ServiceDescriptor<Lifetime = Self>,
    {
        scope.resolve_cached(scope.scoped_store(), key, descriptor)
    }
}

impl Lifetime for Singleton {
    const KIND: ServiceLifetime = ServiceLifetime::Singleton;

    type Output<V: 'static> = ServiceRef<V>;

    fn resolve<D>(
        descriptor: &D,
        key: ServiceKey,
        scope: &ServiceScope<'_>,
    ) -> DIResult<Self::Output<D::Value>>
    where
        D: ServiceDescriptor<Lifetime = Self>,
    {
        scope.resolve_cached(scope.singleton_store(), key, descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_kinds() {
        assert_eq!(Transient::KIND, ServiceLifetime::Transient);
        assert_eq!(Scoped::KIND, ServiceLifetime::Scoped);
        assert_eq!(Singleton::KIND, ServiceLifetime::Singleton);
    }

    #[test]
    fn test_lifetime_serializes_lowercase() {
        let json = serde_json::to_string(&ServiceLifetime::Singleton).unwrap();
        assert_eq!(json, "\"singleton\"");
        assert_eq!(ServiceLifetime::Scoped.to_string(), "scoped");
    }
}
