//! Ownership shapes of resolved values
//!
//! The ownership strategy is part of a descriptor's type. It fixes the
//! value the factory yields:
//!
//! | Strategy           | Shape                    | Value                  |
//! |--------------------|--------------------------|------------------------|
//! | [`Unique<T>`]      | exclusive                | `Box<T>`               |
//! | [`Shared<T>`]      | shared                   | `Rc<T>`                |
//! | [`Local<T>`]       | by-value                 | `T`                    |
//! | [`ExternalRef<T>`] | const external reference | `&'static T`           |
//! | [`ExternalMut<T>`] | external reference       | `&'static RefCell<T>`  |
//!
//! External shapes wrap an object the caller already owns. The container
//! never constructs or drops it.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Ownership shape, as reported by introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipShape {
    Exclusive,
    Shared,
    ByValue,
    ExternalReference,
    ConstExternalReference,
}

mod sealed {
    pub trait Sealed {}

    impl<T: ?Sized> Sealed for super::Unique<T> {}
    impl<T: ?Sized> Sealed for super::Shared<T> {}
    impl<T> Sealed for super::Local<T> {}
    impl<T: ?Sized + 'static> Sealed for super::ExternalRef<T> {}
    impl<T> Sealed for super::ExternalMut<T> {}
}

/// Maps a service target type to the value a factory produces
pub trait Ownership: sealed::Sealed + 'static {
    type Target: ?Sized + 'static;
    type Value: 'static;

    const SHAPE: OwnershipShape;
}

/// Shapes whose values the container produces through a factory.
///
/// External shapes are not `Managed`: their only source is the caller's
/// object, registered as a singleton.
pub trait Managed: Ownership {}

/// Shapes the container can build from a constructed target
pub trait Owning: Managed {
    fn wrap(target: Self::Target) -> Self::Value
    where
        Self::Target: Sized;
}

/// Uniquely owned value, usually a trait object
pub struct Unique<T: ?Sized>(PhantomData<fn() -> Box<T>>);

/// Reference counted value
pub struct Shared<T: ?Sized>(PhantomData<fn() -> Rc<T>>);

/// Value stored inline
pub struct Local<T>(PhantomData<fn() -> T>);

/// Borrowed, caller-owned value handed out as `&'static T`
pub struct ExternalRef<T: ?Sized + 'static>(PhantomData<fn() -> &'static T>);

/// Borrowed, caller-owned value handed out as `&'static RefCell<T>`
pub struct ExternalMut<T>(PhantomData<fn() -> T>);

impl<T: ?Sized + 'static> Ownership for Unique<T> {
    type Target = T;
    type Value = Box<T>;

    const SHAPE: OwnershipShape = OwnershipShape::Exclusive;
}

impl<T: ?Sized + 'static> Managed for Unique<T> {}

impl<T: 'static> Owning for Unique<T> {
    fn wrap(target: T) -> Box<T> {
        Box::new(target)
    }
}

impl<T: ?Sized + 'static> Ownership for Shared<T> {
    type Target = T;
    type Value = Rc<T>;

    const SHAPE: OwnershipShape = OwnershipShape::Shared;
}

impl<T: ?Sized + 'static> Managed for Shared<T> {}

impl<T: 'static> Owning for Shared<T> {
    fn wrap(target: T) -> Rc<T> {
        Rc::new(target)
    }
}

impl<T: 'static> Ownership for Local<T> {
    type Target = T;
    type Value = T;

    const SHAPE: OwnershipShape = OwnershipShape::ByValue;
}

impl<T: 'static> Managed for Local<T> {}

impl<T: 'static> Owning for Local<T> {
    fn wrap(target: T) -> T {
        target
    }
}

impl<T: ?Sized + 'static> Ownership for ExternalRef<T> {
    type Target = T;
    type Value = &'static T;

    const SHAPE: OwnershipShape = OwnershipShape::ConstExternalReference;
}

impl<T: 'static> Ownership for ExternalMut<T> {
    type Target = T;
    type Value = &'static RefCell<T>;

    const SHAPE: OwnershipShape = OwnershipShape::ExternalReference;
}

/// Concrete type `Self` may stand in for the abstract type `A`.
///
/// Every sized type implements this for itself. Use [`implements!`] to
/// declare a concrete type as an implementation of a trait object.
///
/// [`implements!`]: crate::implements
pub trait Implements<A: ?Sized> {
    fn upcast_box(self: Box<Self>) -> Box<A>;

    fn upcast_rc(self: Rc<Self>) -> Rc<A>;
}

impl<T> Implements<T> for T {
    fn upcast_box(self: Box<Self>) -> Box<T> {
        self
    }

    fn upcast_rc(self: Rc<Self>) -> Rc<T> {
        self
    }
}

/// Declare that a concrete type implements one or more trait objects.
///
/// ```rust
/// use tessera_di::implements;
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// implements!(English => dyn Greeter);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($abstract:ty),+ $(,)?) => {
        $(
            impl $crate::ownership::Implements<$abstract> for $concrete {
                fn upcast_box(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<$abstract> {
                    self
                }

                fn upcast_rc(self: ::std::rc::Rc<Self>) -> ::std::rc::Rc<$abstract> {
                    self
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape {
        fn area(&self) -> u32;
    }

    struct Square(u32);

    impl Shape for Square {
        fn area(&self) -> u32 {
            self.0 * self.0
        }
    }

    crate::implements!(Square => dyn Shape);

    #[test]
    fn test_shapes() {
        assert_eq!(<Unique<dyn Shape>>::SHAPE, OwnershipShape::Exclusive);
        assert_eq!(<Shared<u8>>::SHAPE, OwnershipShape::Shared);
        assert_eq!(<Local<u8>>::SHAPE, OwnershipShape::ByValue);
        assert_eq!(<ExternalRef<str>>::SHAPE, OwnershipShape::ConstExternalReference);
        assert_eq!(<ExternalMut<u8>>::SHAPE, OwnershipShape::ExternalReference);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(*<Unique<u8>>::wrap(3), 3);
        assert_eq!(*<Shared<u8>>::wrap(4), 4);
        assert_eq!(<Local<u8>>::wrap(5), 5);
    }

    #[test]
    fn test_upcast_to_trait_object() {
        let boxed: Box<dyn Shape> = <Square as Implements<dyn Shape>>::upcast_box(Box::new(Square(3)));
        assert_eq!(boxed.area(), 9);

        let shared: Rc<dyn Shape> = <Square as Implements<dyn Shape>>::upcast_rc(Rc::new(Square(2)));
        assert_eq!(shared.area(), 4);
    }
}
