//! Service provider
//!
//! The provider freezes a [`ServiceCollection`] and exclusively owns the
//! registrations and the singleton store. Scopes created with
//! [`ServiceProvider::create_scope`] borrow both and keep their own scoped
//! instances. The provider also resolves directly, acting as the root scope.

use std::cell::RefCell;
use std::fmt;

use tracing::{info, warn};

use crate::collection::ServiceCollection;
use crate::config::ContainerConfig;
use crate::descriptor::{Injectable, Output, Resolved, ServiceDescriptor};
use crate::error::{DIError, DIResult, Resolution};
use crate::instance::InstanceStore;
use crate::scope::ServiceScope;
use crate::storage::{DescriptorInfo, ServiceStorage};

/// Root of a resolution graph
pub struct ServiceProvider {
    // Field order is teardown order: root scoped instances, then singletons.
    scoped: RefCell<InstanceStore>,
    singletons: RefCell<InstanceStore>,
    storage: ServiceStorage,
    config: ContainerConfig,
}

impl ServiceProvider {
    /// Build a provider with the default configuration
    pub fn new(collection: ServiceCollection) -> Self {
        Self::build(collection, ContainerConfig::default())
    }

    /// Build a provider with `config`.
    ///
    /// With `validate_on_build` set, fails with `ServiceNotFound` for the
    /// first declared dependency that has no registration.
    pub fn with_config(collection: ServiceCollection, config: ContainerConfig) -> DIResult<Self> {
        if config.validate_on_build {
            if let Some(missing) = collection.storage().missing_dependencies().first() {
                warn!("Unregistered dependency: {}", missing);
                return Err(DIError::not_found(missing));
            }
        }
        Ok(Self::build(collection, config))
    }

    fn build(collection: ServiceCollection, config: ContainerConfig) -> Self {
        let storage = collection.into_storage();
        info!("Built service provider with {} services", storage.len());

        Self {
            scoped: RefCell::new(InstanceStore::new()),
            singletons: RefCell::new(InstanceStore::new()),
            storage,
            config,
        }
    }

    /// New scope sharing this provider's registrations and singletons
    pub fn create_scope(&self) -> ServiceScope<'_> {
        ServiceScope::new(&self.storage, &self.singletons, self.config)
    }

    /// View of the provider as a scope; its scoped instances live as long as
    /// the provider
    pub fn root_scope(&self) -> ServiceScope<'_> {
        ServiceScope::root(&self.scoped, &self.storage, &self.singletons, self.config)
    }

    pub fn descriptors(&self) -> Vec<DescriptorInfo> {
        self.storage.describe()
    }

    /// See [`ServiceScope::get`]
    pub fn get<I: Injectable>(&self) -> Resolution<Resolved<I>> {
        self.root_scope().get::<I>()
    }

    pub fn try_get<I: Injectable>(&self) -> DIResult<Resolved<I>> {
        self.root_scope().try_get::<I>()
    }

    pub fn get_keyed<D: ServiceDescriptor>(&self, key: usize) -> DIResult<Output<D>> {
        self.root_scope().get_keyed::<D>(key)
    }

    pub fn has<I: Injectable>(&self) -> bool {
        self.storage.has_service::<I::Descriptor>(I::KEY)
    }

    pub fn count<I: Injectable>(&self) -> usize {
        self.storage.count::<I::Descriptor>(I::KEY)
    }

    pub fn count_all<I: Injectable>(&self) -> usize {
        self.storage.count_all::<I::Descriptor>()
    }

    pub fn for_each<I, F>(&self, visitor: F) -> Resolution<()>
    where
        I: Injectable,
        F: FnOnce(Resolved<I>),
    {
        self.root_scope().for_each::<I, F>(visitor)
    }

    pub fn try_for_each<I, F>(&self, visitor: F) -> DIResult<()>
    where
        I: Injectable,
        F: FnOnce(Resolved<I>),
    {
        self.root_scope().try_for_each::<I, F>(visitor)
    }

    pub fn for_each_all<I, F>(&self, visitor: F) -> Resolution<()>
    where
        I: Injectable,
        F: FnMut(Resolved<I>),
    {
        self.root_scope().for_each_all::<I, F>(visitor)
    }

    pub fn try_for_each_all<I, F>(&self, visitor: F) -> DIResult<()>
    where
        I: Injectable,
        F: FnMut(Resolved<I>),
    {
        self.root_scope().try_for_each_all::<I, F>(visitor)
    }

    /// Scoped instances created through the root scope
    pub fn scoped_instance_count(&self) -> usize {
        self.scoped.borrow().len()
    }

    pub fn singleton_instance_count(&self) -> usize {
        self.singletons.borrow().len()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.storage.len())
            .field("scoped_instances", &self.scoped_instance_count())
            .field("singleton_instances", &self.singleton_instance_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Injected, LocalDescriptor};
    use crate::instance::ServiceRef;
    use crate::key::ServiceKey;
    use crate::lifetime::{Scoped, Singleton};
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    type TrackedDescriptor = LocalDescriptor<DropCounter, Singleton>;
    type Tracked = Injected<TrackedDescriptor>;

    type RootDescriptor = LocalDescriptor<u32, Singleton>;
    type PerScopeDescriptor = LocalDescriptor<String, Scoped, (Root,)>;
    type Root = Injected<RootDescriptor>;
    type PerScope = Injected<PerScopeDescriptor>;

    fn per_scope() -> PerScopeDescriptor {
        PerScopeDescriptor::new(|(root,)| root.to_string())
    }

    fn collection() -> ServiceCollection {
        let mut services = ServiceCollection::new();
        services
            .add_injected::<Root>(RootDescriptor::new(|()| 7))
            .add_injected::<PerScope>(per_scope());
        services
    }

    #[test]
    fn test_scopes_share_singletons() {
        let provider = ServiceProvider::new(collection());
        let first = provider.create_scope();
        let second = provider.create_scope();

        let a = first.try_get::<Root>().unwrap();
        let b = second.try_get::<Root>().unwrap();
        assert!(ServiceRef::ptr_eq(&a, &b));
        assert_eq!(provider.singleton_instance_count(), 1);
    }

    #[test]
    fn test_scopes_keep_their_own_scoped_instances() {
        let provider = ServiceProvider::new(collection());
        let first = provider.create_scope();
        let second = provider.create_scope();

        let a = first.try_get::<PerScope>().unwrap();
        let again = first.try_get::<PerScope>().unwrap();
        let b = second.try_get::<PerScope>().unwrap();

        assert!(ServiceRef::ptr_eq(&a, &again));
        assert!(!ServiceRef::ptr_eq(&a, &b));
        assert_eq!(first.scoped_instance_count(), 1);
        assert_eq!(provider.scoped_instance_count(), 0);
    }

    #[test]
    fn test_validation_reports_missing_dependency() {
        let mut services = ServiceCollection::new();
        services.add_injected::<PerScope>(per_scope());

        let config = ContainerConfig::default().with_validation(true);
        let err = ServiceProvider::with_config(services, config).unwrap_err();
        assert_eq!(err, DIError::not_found(&ServiceKey::of::<RootDescriptor>(0)));
    }

    #[test]
    fn test_without_validation_build_succeeds() {
        let mut services = ServiceCollection::new();
        services.add_injected::<PerScope>(per_scope());

        let provider = ServiceProvider::with_config(services, ContainerConfig::default()).unwrap();
        assert!(provider.try_get::<PerScope>().is_err());
        assert_eq!(provider.descriptors().len(), 1);
    }

    #[test]
    fn test_root_scope_caches_in_provider() {
        let provider = ServiceProvider::new(collection());

        let a = provider.try_get::<PerScope>().unwrap();
        let b = provider.root_scope().try_get::<PerScope>().unwrap();
        assert!(ServiceRef::ptr_eq(&a, &b));
        assert_eq!(provider.scoped_instance_count(), 1);
        assert_eq!(provider.root_scope().scoped_instance_count(), 1);
    }

    #[test]
    fn test_dropping_provider_releases_singletons() {
        let drops = Rc::new(Cell::new(0));
        let counter = Rc::clone(&drops);

        let mut services = ServiceCollection::new();
        services.add_injected::<Tracked>(TrackedDescriptor::new(move |()| {
            DropCounter(Rc::clone(&counter))
        }));

        let provider = ServiceProvider::new(services);
        {
            let scope = provider.create_scope();
            scope.try_get::<Tracked>().unwrap();
        }
        assert_eq!(drops.get(), 0);
        assert_eq!(provider.singleton_instance_count(), 1);

        drop(provider);
        assert_eq!(drops.get(), 1);
    }
}
