//! Inversion-of-control container for Tessera
//!
//! Services are registered as descriptors in a [`ServiceCollection`], the
//! collection is frozen into a [`ServiceProvider`], and services are resolved
//! from the provider or from scopes it creates. Each descriptor fixes, in its
//! type, the lifetime of its instances ([`Transient`], [`Scoped`],
//! [`Singleton`]), their ownership shape and the services its factory
//! depends on.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_di::{Injected, LocalDescriptor, ServiceCollection, ServiceProvider, Singleton};
//!
//! type PortDescriptor = LocalDescriptor<u16, Singleton>;
//! type Port = Injected<PortDescriptor>;
//!
//! let mut services = ServiceCollection::new();
//! services.add_injected::<Port>(PortDescriptor::new(|()| 8080));
//!
//! let provider = ServiceProvider::new(services);
//! let port = provider.try_get::<Port>().unwrap();
//! assert_eq!(*port, 8080);
//! ```
//!
//! ## Error signaling
//!
//! [`ServiceScope::get`] returns a [`DIResult`] by default. With the
//! `panic-on-missing` feature it returns the value directly and panics with
//! the [`DIError`] as payload when the service is not registered.
//! [`ServiceScope::try_get`] always returns a [`DIResult`].

pub mod collection;
pub mod config;
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod ownership;
pub mod provider;
pub mod scope;
pub mod storage;

pub use collection::ServiceCollection;
pub use config::ContainerConfig;
pub use dependency::Dependencies;
pub use descriptor::{
    Constructible, Descriptor, ExternalDescriptor, ExternalMutDescriptor, Injectable, Injected,
    LocalDescriptor, Output, Resolved, ServiceDescriptor, SharedDescriptor, UniqueDescriptor,
};
pub use error::{DIError, DIResult, Resolution};
pub use instance::{InstanceStore, ServiceRef};
pub use key::ServiceKey;
pub use lifetime::{Lifetime, Scoped, ServiceLifetime, Singleton, Transient};
pub use module::{ModuleRegistry, ServiceModule};
pub use ownership::{
    ExternalMut, ExternalRef, Implements, Local, Managed, Owning, Ownership, OwnershipShape, Shared,
    Unique,
};
pub use provider::ServiceProvider;
pub use scope::ServiceScope;
pub use storage::{DescriptorInfo, ServiceStorage};
