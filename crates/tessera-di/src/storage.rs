//! Descriptor storage
//!
//! The storage maps every registered (descriptor type, key) pair to its
//! descriptor. It is filled by a [`ServiceCollection`](crate::ServiceCollection)
//! and frozen once a provider is built from it.

use std::any::Any;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::descriptor::{Output, ServiceDescriptor};
use crate::error::{DIError, DIResult};
use crate::key::ServiceKey;
use crate::lifetime::{Lifetime, ServiceLifetime};
use crate::ownership::OwnershipShape;
use crate::scope::ServiceScope;

/// Object safe view of a descriptor
pub(crate) trait ErasedDescriptor: 'static {
    fn lifetime(&self) -> ServiceLifetime;

    fn shape(&self) -> OwnershipShape;

    fn dependencies(&self) -> Vec<ServiceKey>;

    fn as_any(&self) -> &dyn Any;
}

impl<D: ServiceDescriptor> ErasedDescriptor for D {
    fn lifetime(&self) -> ServiceLifetime {
        <D::Lifetime as Lifetime>::KIND
    }

    fn shape(&self) -> OwnershipShape {
        D::SHAPE
    }

    fn dependencies(&self) -> Vec<ServiceKey> {
        ServiceDescriptor::dependencies(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Introspection record for one registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorInfo {
    pub service: ServiceKey,
    pub lifetime: ServiceLifetime,
    pub shape: OwnershipShape,
    pub dependencies: Vec<ServiceKey>,
}

/// Ordered map of registered descriptors
#[derive(Default)]
pub struct ServiceStorage {
    services: BTreeMap<ServiceKey, Box<dyn ErasedDescriptor>>,
}

impl ServiceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor` under `key`, replacing any previous entry
    pub fn add_service<D: ServiceDescriptor>(&mut self, descriptor: D, key: usize) {
        let service = ServiceKey::of::<D>(key);
        if self.services.insert(service, Box::new(descriptor)).is_some() {
            debug!("Replaced service registration: {}", service);
        } else {
            debug!("Registered service: {}", service);
        }
    }

    /// Insert `descriptor` under `key` unless the key is taken.
    ///
    /// Returns whether the descriptor was inserted.
    pub fn emplace_service<D: ServiceDescriptor>(&mut self, descriptor: D, key: usize) -> bool {
        let service = ServiceKey::of::<D>(key);
        match self.services.entry(service) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Box::new(descriptor));
                debug!("Registered service: {}", service);
                true
            }
        }
    }

    pub fn has_service<D: ServiceDescriptor>(&self, key: usize) -> bool {
        self.services.contains_key(&ServiceKey::of::<D>(key))
    }

    /// Registrations of `D` under exactly `key`: 0 or 1
    pub fn count<D: ServiceDescriptor>(&self, key: usize) -> usize {
        usize::from(self.has_service::<D>(key))
    }

    /// Registrations of `D` under any key
    pub fn count_all<D: ServiceDescriptor>(&self) -> usize {
        self.services.range(ServiceKey::range_of::<D>()).count()
    }

    pub fn descriptor<D: ServiceDescriptor>(&self, key: usize) -> Option<&D> {
        self.services
            .get(&ServiceKey::of::<D>(key))
            .and_then(|descriptor| descriptor.as_any().downcast_ref::<D>())
    }

    /// Resolve the registration of `D` under `key` through `scope`
    pub fn resolve<D: ServiceDescriptor>(
        &self,
        scope: &ServiceScope<'_>,
        key: usize,
    ) -> DIResult<Output<D>> {
        let service = ServiceKey::of::<D>(key);
        let descriptor = self
            .descriptor::<D>(key)
            .ok_or_else(|| DIError::not_found(&service))?;

        if scope.config().trace_resolutions {
            trace!(
                "Resolving {} service: {}",
                <D::Lifetime as Lifetime>::KIND,
                service
            );
        }

        <D::Lifetime as Lifetime>::resolve(descriptor, service, scope)
    }

    /// Resolve the registration of `D` under `key` and pass it to `visitor`.
    ///
    /// Does nothing when the key is not registered.
    pub fn for_each<D, F>(&self, visitor: F, scope: &ServiceScope<'_>, key: usize) -> DIResult<()>
    where
        D: ServiceDescriptor,
        F: FnOnce(Output<D>),
    {
        if self.has_service::<D>(key) {
            visitor(self.resolve::<D>(scope, key)?);
        }
        Ok(())
    }

    /// Resolve every registration of `D`, in ascending key order, and pass
    /// each to `visitor`
    pub fn for_each_all<D, F>(&self, mut visitor: F, scope: &ServiceScope<'_>) -> DIResult<()>
    where
        D: ServiceDescriptor,
        F: FnMut(Output<D>),
    {
        let keys: Vec<usize> = self
            .services
            .range(ServiceKey::range_of::<D>())
            .map(|(service, _)| service.key())
            .collect();

        for key in keys {
            visitor(self.resolve::<D>(scope, key)?);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> + '_ {
        self.services.keys()
    }

    /// Introspection records for every registration, in key order
    pub fn describe(&self) -> Vec<DescriptorInfo> {
        self.services
            .iter()
            .map(|(service, descriptor)| DescriptorInfo {
                service: *service,
                lifetime: descriptor.lifetime(),
                shape: descriptor.shape(),
                dependencies: descriptor.dependencies(),
            })
            .collect()
    }

    /// Declared dependency keys that have no registration
    pub fn missing_dependencies(&self) -> Vec<ServiceKey> {
        let mut missing = Vec::new();
        for descriptor in self.services.values() {
            for dependency in descriptor.dependencies() {
                if !self.services.contains_key(&dependency) && !missing.contains(&dependency) {
                    missing.push(dependency);
                }
            }
        }
        missing
    }
}

impl fmt::Debug for ServiceStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceStorage")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Injected, LocalDescriptor};
    use crate::lifetime::{Singleton, Transient};

    type Number = LocalDescriptor<u32, Transient>;
    type Named = LocalDescriptor<String, Singleton, (Injected<Number>,)>;

    fn number(value: u32) -> Number {
        Number::new(move |()| value)
    }

    #[test]
    fn test_add_and_query() {
        let mut storage = ServiceStorage::new();
        assert!(storage.is_empty());

        storage.add_service(number(1), 0);
        storage.add_service(number(2), 5);

        assert!(storage.has_service::<Number>(0));
        assert!(storage.has_service::<Number>(5));
        assert!(!storage.has_service::<Number>(1));
        assert_eq!(storage.count::<Number>(5), 1);
        assert_eq!(storage.count::<Number>(3), 0);
        assert_eq!(storage.count_all::<Number>(), 2);
        assert_eq!(storage.count_all::<Named>(), 0);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_add_replaces_existing_entry() {
        let mut storage = ServiceStorage::new();
        storage.add_service(number(1), 0);
        storage.add_service(number(2), 0);
        assert_eq!(storage.count_all::<Number>(), 1);
    }

    #[test]
    fn test_emplace_only_inserts_once() {
        let mut storage = ServiceStorage::new();
        assert!(storage.emplace_service(number(1), 0));
        assert!(!storage.emplace_service(number(2), 0));
        assert!(storage.emplace_service(number(3), 1));
        assert_eq!(storage.count_all::<Number>(), 2);
    }

    #[test]
    fn test_describe_and_missing_dependencies() {
        let mut storage = ServiceStorage::new();
        storage.add_service(Named::new(|(n,)| n.to_string()), 0);

        let missing = storage.missing_dependencies();
        assert_eq!(missing, vec![ServiceKey::of::<Number>(0)]);

        storage.add_service(number(7), 0);
        assert!(storage.missing_dependencies().is_empty());

        let info = storage
            .describe()
            .into_iter()
            .find(|info| info.service.is_of::<Named>())
            .unwrap();
        assert_eq!(info.lifetime, ServiceLifetime::Singleton);
        assert_eq!(info.shape, OwnershipShape::ByValue);
        assert_eq!(info.dependencies, vec![ServiceKey::of::<Number>(0)]);
    }
}
