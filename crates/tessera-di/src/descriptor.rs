//! Service descriptors
//!
//! A descriptor is a factory capsule: it knows how to build one value, which
//! lifetime caches it, which ownership shape the value has, and which other
//! services must be resolved first. All of that is encoded in the descriptor
//! type, so the construction strategy is chosen statically per registration.
//!
//! ```rust
//! use tessera_di::{
//!     Constructible, Injected, LocalDescriptor, ServiceCollection, ServiceProvider,
//!     ServiceRef, Scoped, Singleton,
//! };
//!
//! struct Logger;
//!
//! impl Constructible for Logger {
//!     type Dependencies = ();
//!
//!     fn construct(_deps: (), _args: ()) -> Self {
//!         Logger
//!     }
//! }
//!
//! type LoggerService = Injected<LocalDescriptor<Logger, Singleton>>;
//!
//! struct Handler {
//!     logger: ServiceRef<Logger>,
//! }
//!
//! impl Constructible for Handler {
//!     type Dependencies = (LoggerService,);
//!
//!     fn construct((logger,): (ServiceRef<Logger>,), _args: ()) -> Self {
//!         Handler { logger }
//!     }
//! }
//!
//! type HandlerService = Injected<LocalDescriptor<Handler, Scoped, (LoggerService,)>>;
//!
//! let mut services = ServiceCollection::new();
//! services.add_default::<LoggerService>().add_default::<HandlerService>();
//!
//! let provider = ServiceProvider::new(services);
//! let scope = provider.create_scope();
//! let handler = scope.try_get::<HandlerService>().unwrap();
//! let logger = provider.try_get::<LoggerService>().unwrap();
//! assert!(ServiceRef::ptr_eq(&handler.logger, &logger));
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::dependency::Dependencies;
use crate::error::DIResult;
use crate::key::ServiceKey;
use crate::lifetime::{Lifetime, Singleton};
use crate::ownership::{
    ExternalMut, ExternalRef, Implements, Local, Managed, Owning, Ownership, OwnershipShape, Shared,
    Unique,
};
use crate::scope::ServiceScope;

/// A factory capsule held by the storage
pub trait ServiceDescriptor: 'static {
    /// Value produced by the factory
    type Value: 'static;

    type Lifetime: Lifetime;

    const SHAPE: OwnershipShape;

    /// Resolve the declared dependencies through `scope`, then run the factory
    fn load(&self, scope: &ServiceScope<'_>) -> DIResult<Self::Value>;

    /// Declared dependency keys, in declaration order
    fn dependencies(&self) -> Vec<ServiceKey>;
}

/// A service request: which descriptor type, under which disambiguator
pub trait Injectable: 'static {
    type Descriptor: ServiceDescriptor;

    const KEY: usize = ServiceKey::DEFAULT_KEY;
}

/// Stock [`Injectable`] for a descriptor type and a key
pub struct Injected<D, const KEY: usize = 0>(PhantomData<fn() -> D>);

impl<D: ServiceDescriptor, const KEY: usize> Injectable for Injected<D, KEY> {
    type Descriptor = D;

    const KEY: usize = KEY;
}

/// What resolving descriptor `D` hands out
pub type Output<D> = <<D as ServiceDescriptor>::Lifetime as Lifetime>::Output<
    <D as ServiceDescriptor>::Value,
>;

/// What resolving request `I` hands out
pub type Resolved<I> = Output<<I as Injectable>::Descriptor>;

/// Constructor signature of a service type.
///
/// `Args` are user-supplied construction arguments appended after the
/// resolved dependencies.
pub trait Constructible<Args = ()>: Sized + 'static {
    type Dependencies: Dependencies;

    fn construct(deps: <Self::Dependencies as Dependencies>::Resolved, args: Args) -> Self;
}

/// The descriptor, parameterized by ownership strategy `O`, lifetime `L` and
/// dependency tuple `D`
pub struct Descriptor<O: Ownership, L: Lifetime, D: Dependencies = ()> {
    factory: Box<dyn Fn(D::Resolved) -> O::Value>,
    _marker: PhantomData<fn() -> (O, L)>,
}

pub type UniqueDescriptor<T, L, D = ()> = Descriptor<Unique<T>, L, D>;
pub type SharedDescriptor<T, L, D = ()> = Descriptor<Shared<T>, L, D>;
pub type LocalDescriptor<T, L, D = ()> = Descriptor<Local<T>, L, D>;
pub type ExternalDescriptor<T> = Descriptor<ExternalRef<T>, Singleton>;
pub type ExternalMutDescriptor<T> = Descriptor<ExternalMut<T>, Singleton>;

impl<O: Ownership, L: Lifetime, D: Dependencies> Descriptor<O, L, D> {
    fn from_factory<F>(factory: F) -> Self
    where
        F: Fn(D::Resolved) -> O::Value + 'static,
    {
        Self {
            factory: Box::new(factory),
            _marker: PhantomData,
        }
    }
}

impl<O: Managed, L: Lifetime, D: Dependencies> Descriptor<O, L, D> {
    /// Descriptor backed by an explicit factory over the resolved dependencies.
    ///
    /// External shapes have no factory; they are registered through
    /// `external` and always live as singletons.
    ///
    /// ```compile_fail
    /// use tessera_di::{Descriptor, ExternalRef, Transient};
    ///
    /// static PORT: u16 = 8080;
    /// let _ = Descriptor::<ExternalRef<u16>, Transient>::new(|()| &PORT);
    /// ```
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(D::Resolved) -> O::Value + 'static,
    {
        Self::from_factory(factory)
    }
}

impl<O, L, D> Descriptor<O, L, D>
where
    O: Owning,
    O::Target: Sized,
    L: Lifetime,
    D: Dependencies,
{
    /// Build the target through its [`Constructible`] impl with `args`
    pub fn in_place<A>(args: A) -> Self
    where
        O::Target: Constructible<A, Dependencies = D>,
        A: Clone + 'static,
    {
        Self::new(move |deps| {
            O::wrap(<O::Target as Constructible<A>>::construct(
                deps,
                args.clone(),
            ))
        })
    }

    /// Build the target through its argument-free [`Constructible`] impl
    pub fn construct() -> Self
    where
        O::Target: Constructible<(), Dependencies = D>,
    {
        Self::in_place(())
    }
}

impl<O, L, D> Default for Descriptor<O, L, D>
where
    O: Owning,
    O::Target: Sized + Constructible<(), Dependencies = D>,
    L: Lifetime,
    D: Dependencies,
{
    fn default() -> Self {
        Self::construct()
    }
}

impl<A: ?Sized + 'static, L: Lifetime, D: Dependencies> Descriptor<Unique<A>, L, D> {
    /// Expose abstract `A` backed by the concrete `C`'s constructor and
    /// dependency list
    pub fn bind<C>() -> Self
    where
        C: Constructible<(), Dependencies = D> + Implements<A>,
    {
        Self::bind_with::<C, ()>(())
    }

    pub fn bind_with<C, Args>(args: Args) -> Self
    where
        C: Constructible<Args, Dependencies = D> + Implements<A>,
        Args: Clone + 'static,
    {
        Self::new(move |deps| {
            <C as Implements<A>>::upcast_box(Box::new(C::construct(deps, args.clone())))
        })
    }
}

impl<A: ?Sized + 'static, L: Lifetime, D: Dependencies> Descriptor<Shared<A>, L, D> {
    /// Expose abstract `A` backed by the concrete `C`'s constructor and
    /// dependency list
    pub fn bind<C>() -> Self
    where
        C: Constructible<(), Dependencies = D> + Implements<A>,
    {
        Self::bind_with::<C, ()>(())
    }

    pub fn bind_with<C, Args>(args: Args) -> Self
    where
        C: Constructible<Args, Dependencies = D> + Implements<A>,
        Args: Clone + 'static,
    {
        Self::new(move |deps| {
            <C as Implements<A>>::upcast_rc(std::rc::Rc::new(C::construct(deps, args.clone())))
        })
    }
}

impl<T: ?Sized + 'static> Descriptor<ExternalRef<T>, Singleton> {
    /// Hand out an object the caller owns; never constructed or dropped here
    pub fn external(reference: &'static T) -> Self {
        Self::from_factory(move |()| reference)
    }
}

impl<T: 'static> Descriptor<ExternalMut<T>, Singleton> {
    /// Hand out a mutable object the caller owns; never constructed or
    /// dropped here
    pub fn external(cell: &'static std::cell::RefCell<T>) -> Self {
        Self::from_factory(move |()| cell)
    }
}

impl<O: Ownership, L: Lifetime, D: Dependencies> ServiceDescriptor for Descriptor<O, L, D> {
    type Value = O::Value;
    type Lifetime = L;

    const SHAPE: OwnershipShape = O::SHAPE;

    fn load(&self, scope: &ServiceScope<'_>) -> DIResult<O::Value> {
        let deps = D::resolve(scope)?;
        Ok((self.factory)(deps))
    }

    fn dependencies(&self) -> Vec<ServiceKey> {
        D::keys()
    }
}

impl<O: Ownership, L: Lifetime, D: Dependencies> fmt::Debug for Descriptor<O, L, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("target", &std::any::type_name::<O::Target>())
            .field("shape", &O::SHAPE)
            .field("lifetime", &L::KIND)
            .field("dependencies", &D::keys())
            .finish()
    }
}
