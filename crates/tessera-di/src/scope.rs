//! Resolution scopes
//!
//! A [`ServiceScope`] resolves services against the frozen storage of the
//! provider that created it. Scoped instances live in the scope's own store.
//! Singletons live in the provider's store, which every scope borrows, so a
//! scope cannot outlive its provider:
//!
//! ```compile_fail
//! use tessera_di::{ServiceCollection, ServiceProvider};
//!
//! let scope = {
//!     let provider = ServiceProvider::new(ServiceCollection::new());
//!     provider.create_scope()
//! };
//! ```

use std::cell::RefCell;
use std::fmt;

use tracing::debug;

use crate::config::ContainerConfig;
use crate::descriptor::{Injectable, Output, Resolved, ServiceDescriptor};
use crate::error::{settle, DIResult, Resolution};
use crate::instance::{InstanceStore, ServiceRef};
use crate::key::ServiceKey;
use crate::storage::ServiceStorage;

enum ScopedStore<'p> {
    Owned(RefCell<InstanceStore>),
    /// The provider's own scoped store, used by its root scope
    Root(&'p RefCell<InstanceStore>),
}

/// A resolution context with its own scoped instances, borrowing the
/// registrations and singletons of provider `'p`
pub struct ServiceScope<'p> {
    scoped: ScopedStore<'p>,
    storage: &'p ServiceStorage,
    singletons: &'p RefCell<InstanceStore>,
    config: ContainerConfig,
}

impl<'p> ServiceScope<'p> {
    pub(crate) fn new(
        storage: &'p ServiceStorage,
        singletons: &'p RefCell<InstanceStore>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            scoped: ScopedStore::Owned(RefCell::new(InstanceStore::new())),
            storage,
            singletons,
            config,
        }
    }

    pub(crate) fn root(
        scoped: &'p RefCell<InstanceStore>,
        storage: &'p ServiceStorage,
        singletons: &'p RefCell<InstanceStore>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            scoped: ScopedStore::Root(scoped),
            storage,
            singletons,
            config,
        }
    }

    /// Resolve service `I`.
    ///
    /// Transient services are built fresh and handed over. Scoped and
    /// singleton services are built on first request and cached; later
    /// requests return a handle to the same instance.
    pub fn get<I: Injectable>(&self) -> Resolution<Resolved<I>> {
        settle(self.try_get::<I>())
    }

    /// Resolve service `I`, reporting absence as an error regardless of the
    /// `panic-on-missing` feature
    pub fn try_get<I: Injectable>(&self) -> DIResult<Resolved<I>> {
        self.storage.resolve::<I::Descriptor>(self, I::KEY)
    }

    /// Resolve the registration of `D` under a key chosen at runtime
    pub fn get_keyed<D: ServiceDescriptor>(&self, key: usize) -> DIResult<Output<D>> {
        self.storage.resolve::<D>(self, key)
    }

    pub fn has<I: Injectable>(&self) -> bool {
        self.storage.has_service::<I::Descriptor>(I::KEY)
    }

    pub fn count<I: Injectable>(&self) -> usize {
        self.storage.count::<I::Descriptor>(I::KEY)
    }

    /// Registrations of `I`'s descriptor type under any key
    pub fn count_all<I: Injectable>(&self) -> usize {
        self.storage.count_all::<I::Descriptor>()
    }

    /// Resolve `I` and pass it to `visitor`; does nothing if `I` is not
    /// registered
    pub fn for_each<I, F>(&self, visitor: F) -> Resolution<()>
    where
        I: Injectable,
        F: FnOnce(Resolved<I>),
    {
        settle(self.try_for_each::<I, F>(visitor))
    }

    pub fn try_for_each<I, F>(&self, visitor: F) -> DIResult<()>
    where
        I: Injectable,
        F: FnOnce(Resolved<I>),
    {
        self.storage
            .for_each::<I::Descriptor, F>(visitor, self, I::KEY)
    }

    /// Resolve every registration of `I`'s descriptor type in ascending key
    /// order and pass each to `visitor`
    pub fn for_each_all<I, F>(&self, visitor: F) -> Resolution<()>
    where
        I: Injectable,
        F: FnMut(Resolved<I>),
    {
        settle(self.try_for_each_all::<I, F>(visitor))
    }

    pub fn try_for_each_all<I, F>(&self, visitor: F) -> DIResult<()>
    where
        I: Injectable,
        F: FnMut(Resolved<I>),
    {
        self.storage.for_each_all::<I::Descriptor, F>(visitor, self)
    }

    /// Scoped instances created so far in this scope
    pub fn scoped_instance_count(&self) -> usize {
        self.scoped_store().borrow().len()
    }

    /// Singleton instances created so far by any scope of the provider
    pub fn singleton_instance_count(&self) -> usize {
        self.singletons.borrow().len()
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub(crate) fn scoped_store(&self) -> &RefCell<InstanceStore> {
        match &self.scoped {
            ScopedStore::Owned(store) => store,
            ScopedStore::Root(store) => store,
        }
    }

    pub(crate) fn singleton_store(&self) -> &RefCell<InstanceStore> {
        self.singletons
    }

    /// Cached instance of `descriptor` in `store`, building it on first use.
    ///
    /// No borrow of `store` is held while the factory runs, so the factory
    /// may resolve further services from the same store.
    pub(crate) fn resolve_cached<D: ServiceDescriptor>(
        &self,
        store: &RefCell<InstanceStore>,
        key: ServiceKey,
        descriptor: &D,
    ) -> DIResult<ServiceRef<D::Value>> {
        let cached = store.borrow().find::<D::Value>(&key);
        if let Some(instance) = cached {
            return Ok(instance);
        }

        let value = descriptor.load(self)?;
        debug!("Created service instance: {}", key);
        Ok(store.borrow_mut().emplace(key, value))
    }
}

impl fmt::Debug for ServiceScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("services", &self.storage.len())
            .field("scoped_instances", &self.scoped_instance_count())
            .field("singleton_instances", &self.singleton_instance_count())
            .field("config", &self.config)
            .finish()
    }
}
