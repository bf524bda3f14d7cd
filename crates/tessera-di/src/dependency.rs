//! Declared constructor dependencies
//!
//! A descriptor lists its dependencies as a tuple of [`Injectable`] request
//! types, e.g. `(LoggerService, ConfigService)`. Before the factory body
//! runs, every element is resolved through the active scope, left to right,
//! and the results are passed to the factory as a tuple.

use crate::descriptor::{Injectable, Resolved as ResolvedService};
use crate::error::DIResult;
use crate::key::ServiceKey;
use crate::scope::ServiceScope;

/// An ordered, statically known dependency list
pub trait Dependencies: 'static {
    /// Tuple of resolved dependencies handed to the factory
    type Resolved;

    /// Keys of the declared dependencies, in declaration order
    fn keys() -> Vec<ServiceKey>;

    fn resolve(scope: &ServiceScope<'_>) -> DIResult<Self::Resolved>;
}

impl Dependencies for () {
    type Resolved = ();

    fn keys() -> Vec<ServiceKey> {
        Vec::new()
    }

    fn resolve(_scope: &ServiceScope<'_>) -> DIResult<()> {
        Ok(())
    }
}

macro_rules! impl_dependencies {
    ($($dep:ident),+) => {
        impl<$($dep: Injectable),+> Dependencies for ($($dep,)+) {
            type Resolved = ($(ResolvedService<$dep>,)+);

            fn keys() -> Vec<ServiceKey> {
                vec![$(ServiceKey::of::<<$dep as Injectable>::Descriptor>(<$dep as Injectable>::KEY)),+]
            }

            fn resolve(scope: &ServiceScope<'_>) -> DIResult<Self::Resolved> {
                Ok(($(scope.try_get::<$dep>()?,)+))
            }
        }
    };
}

impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);
