//! Service modules
//!
//! A module bundles the registrations of one feature area so an application
//! can assemble its collection from independent parts.
//!
//! ```rust
//! use tessera_di::{
//!     Injected, LocalDescriptor, ModuleRegistry, ServiceCollection, ServiceModule, Singleton,
//! };
//!
//! type GreetingDescriptor = LocalDescriptor<String, Singleton>;
//! type Greeting = Injected<GreetingDescriptor>;
//!
//! struct GreetingModule;
//!
//! impl ServiceModule for GreetingModule {
//!     fn name(&self) -> &'static str {
//!         "greeting"
//!     }
//!
//!     fn register(&self, services: &mut ServiceCollection) {
//!         services.add_injected::<Greeting>(GreetingDescriptor::new(|()| "hello".to_string()));
//!     }
//! }
//!
//! let mut registry = ModuleRegistry::new();
//! registry.add(GreetingModule);
//!
//! let mut services = ServiceCollection::new();
//! registry.register_all(&mut services);
//! assert!(services.has::<Greeting>());
//! ```

use tracing::{debug, info};

use crate::collection::ServiceCollection;

/// A named bundle of registrations
pub trait ServiceModule {
    fn name(&self) -> &'static str;

    /// Lower values are registered first. Default is 100.
    fn priority(&self) -> u32 {
        100
    }

    fn register(&self, services: &mut ServiceCollection);
}

/// Collects modules and applies them in priority order
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn ServiceModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: ServiceModule + 'static>(&mut self, module: M) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn add_boxed(&mut self, module: Box<dyn ServiceModule>) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Apply every module to `services`.
    ///
    /// Modules with equal priority keep the order they were added in, so a
    /// later module can override an earlier module's registration.
    pub fn register_all(&self, services: &mut ServiceCollection) {
        let mut sorted: Vec<_> = self.modules.iter().collect();
        sorted.sort_by_key(|m| m.priority());

        for module in &sorted {
            debug!(
                "Registering module '{}' (priority: {})",
                module.name(),
                module.priority()
            );
            module.register(services);
        }

        info!(
            "Registered {} modules, {} services",
            sorted.len(),
            services.len()
        );
    }
}
