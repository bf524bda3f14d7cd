//! Service registration
//!
//! A [`ServiceCollection`] gathers descriptors before any service is built.
//! It never constructs anything; resolution starts once the collection is
//! turned into a [`ServiceProvider`](crate::ServiceProvider).

use crate::descriptor::{Injectable, ServiceDescriptor};
use crate::key::ServiceKey;
use crate::module::ServiceModule;
use crate::storage::{DescriptorInfo, ServiceStorage};

/// Build-time registry of service descriptors
#[derive(Debug, Default)]
pub struct ServiceCollection {
    storage: ServiceStorage,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under the default key, replacing any previous
    /// registration of the same descriptor type and key
    pub fn add<D: ServiceDescriptor>(&mut self, descriptor: D) -> &mut Self {
        self.add_keyed(descriptor, ServiceKey::DEFAULT_KEY)
    }

    pub fn add_keyed<D: ServiceDescriptor>(&mut self, descriptor: D, key: usize) -> &mut Self {
        self.storage.add_service(descriptor, key);
        self
    }

    /// Register `descriptor` under request `I`'s key
    pub fn add_injected<I: Injectable>(&mut self, descriptor: I::Descriptor) -> &mut Self {
        self.add_keyed(descriptor, I::KEY)
    }

    /// Register the default descriptor of request `I`
    pub fn add_default<I: Injectable>(&mut self) -> &mut Self
    where
        I::Descriptor: Default,
    {
        self.add_injected::<I>(Default::default())
    }

    /// Register `descriptor` under the default key unless that key is taken.
    ///
    /// Returns whether the descriptor was inserted.
    pub fn emplace<D: ServiceDescriptor>(&mut self, descriptor: D) -> bool {
        self.emplace_keyed(descriptor, ServiceKey::DEFAULT_KEY)
    }

    pub fn emplace_keyed<D: ServiceDescriptor>(&mut self, descriptor: D, key: usize) -> bool {
        self.storage.emplace_service(descriptor, key)
    }

    pub fn emplace_injected<I: Injectable>(&mut self, descriptor: I::Descriptor) -> bool {
        self.emplace_keyed(descriptor, I::KEY)
    }

    pub fn emplace_default<I: Injectable>(&mut self) -> bool
    where
        I::Descriptor: Default,
    {
        self.emplace_injected::<I>(Default::default())
    }

    pub fn has<I: Injectable>(&self) -> bool {
        self.storage.has_service::<I::Descriptor>(I::KEY)
    }

    pub fn has_keyed<D: ServiceDescriptor>(&self, key: usize) -> bool {
        self.storage.has_service::<D>(key)
    }

    /// Registrations of `I`'s descriptor type under any key
    pub fn count_all<I: Injectable>(&self) -> usize {
        self.storage.count_all::<I::Descriptor>()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn descriptors(&self) -> Vec<DescriptorInfo> {
        self.storage.describe()
    }

    /// Run `module`'s registrations against this collection
    pub fn apply(&mut self, module: &dyn ServiceModule) -> &mut Self {
        module.register(self);
        self
    }

    pub(crate) fn storage(&self) -> &ServiceStorage {
        &self.storage
    }

    pub(crate) fn into_storage(self) -> ServiceStorage {
        self.storage
    }
}
