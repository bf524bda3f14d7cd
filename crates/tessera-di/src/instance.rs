//! Cached service instances

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use tracing::trace;

use crate::key::ServiceKey;

/// Handle to a cached scoped or singleton instance.
///
/// Handles are cheap to clone. Every handle to the same cached instance
/// points at the same object for as long as the owning store lives.
pub struct ServiceRef<V: ?Sized>(Rc<V>);

impl<V: ?Sized> ServiceRef<V> {
    /// Whether both handles point at the same cached instance
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    pub fn as_ptr(this: &Self) -> *const V {
        Rc::as_ptr(&this.0)
    }

    pub fn get(&self) -> &V {
        &self.0
    }
}

impl<V: ?Sized> Clone for ServiceRef<V> {
    fn clone(&self) -> Self {
        ServiceRef(Rc::clone(&self.0))
    }
}

impl<V: ?Sized> Deref for ServiceRef<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.0
    }
}

impl<V: ?Sized + fmt::Debug> fmt::Debug for ServiceRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceRef").field(&&*self.0).finish()
    }
}

struct Instance {
    key: ServiceKey,
    value: Rc<dyn Any>,
}

/// Owning store of created instances.
///
/// Instances are kept in creation order and dropped in reverse creation
/// order when the store is dropped, so a service created from its
/// dependencies is torn down before them.
#[derive(Default)]
pub struct InstanceStore {
    instances: Vec<Instance>,
    index: BTreeMap<ServiceKey, usize>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance for `key`, if one of type `V` exists
    pub fn find<V: 'static>(&self, key: &ServiceKey) -> Option<ServiceRef<V>> {
        let position = *self.index.get(key)?;
        let value = Rc::clone(&self.instances[position].value);
        value.downcast::<V>().ok().map(ServiceRef)
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Take ownership of `value` under `key` and return a handle to it.
    ///
    /// If `key` already holds an instance of type `V`, that instance wins
    /// and `value` is dropped.
    pub fn emplace<V: 'static>(&mut self, key: ServiceKey, value: V) -> ServiceRef<V> {
        if let Some(existing) = self.find::<V>(&key) {
            return existing;
        }

        let value: Rc<V> = Rc::new(value);
        self.index.insert(key, self.instances.len());
        self.instances.push(Instance {
            key,
            value: Rc::clone(&value) as Rc<dyn Any>,
        });
        ServiceRef(value)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Keys in creation order
    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> + '_ {
        self.instances.iter().map(|instance| &instance.key)
    }
}

impl Drop for InstanceStore {
    fn drop(&mut self) {
        self.index.clear();
        while let Some(instance) = self.instances.pop() {
            trace!(service = %instance.key, "Releasing instance");
            drop(instance);
        }
    }
}

impl fmt::Debug for InstanceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceStore")
            .field("instances", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Tracked {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    struct Slot;

    #[test]
    fn test_find_returns_same_instance() {
        let mut store = InstanceStore::new();
        let key = ServiceKey::of::<Slot>(0);
        let created = store.emplace(key, 42u32);

        let found = store.find::<u32>(&key).unwrap();
        assert!(ServiceRef::ptr_eq(&created, &found));
        assert_eq!(*found, 42);
        assert!(store.contains(&key));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_with_wrong_type_misses() {
        let mut store = InstanceStore::new();
        let key = ServiceKey::of::<Slot>(0);
        store.emplace(key, 1u8);

        assert!(store.find::<u16>(&key).is_none());
        assert!(store.find::<u8>(&ServiceKey::of::<Slot>(1)).is_none());
    }

    #[test]
    fn test_emplace_keeps_existing_instance() {
        let mut store = InstanceStore::new();
        let key = ServiceKey::of::<Slot>(0);
        let first = store.emplace(key, String::from("first"));
        let second = store.emplace(key, String::from("second"));

        assert!(ServiceRef::ptr_eq(&first, &second));
        assert_eq!(&*second, "first");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_drop_in_reverse_creation_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut store = InstanceStore::new();
            for (key, name) in ["a", "b", "c"].into_iter().enumerate() {
                store.emplace(
                    ServiceKey::of::<Slot>(key),
                    Tracked {
                        name,
                        log: Rc::clone(&log),
                    },
                );
            }
            assert!(log.borrow().is_empty());
        }
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
    }
}
