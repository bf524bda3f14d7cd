//! Registration identity

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Identity of one registration: a descriptor type plus an integer
/// disambiguator.
///
/// Equality, hashing and ordering only look at the type id and the
/// disambiguator. The type name is carried for diagnostics. Keys of one type
/// sort by ascending disambiguator, so every registration of a type forms a
/// contiguous range in an ordered map.
#[derive(Clone, Copy)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
    key: usize,
}

impl ServiceKey {
    /// Disambiguator used when none is given
    pub const DEFAULT_KEY: usize = 0;

    pub fn of<D: 'static>(key: usize) -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            type_name: std::any::type_name::<D>(),
            key,
        }
    }

    /// Inclusive range covering every disambiguator of `D`
    pub fn range_of<D: 'static>() -> RangeInclusive<Self> {
        Self::of::<D>(usize::MIN)..=Self::of::<D>(usize::MAX)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn key(&self) -> usize {
        self.key
    }

    pub fn is_of<D: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.key == other.key
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.key.hash(state);
    }
}

impl PartialOrd for ServiceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id
            .cmp(&other.type_id)
            .then(self.key.cmp(&other.key))
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({}#{})", self.type_name, self.key)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.key)
    }
}

impl Serialize for ServiceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ServiceKey", 2)?;
        state.serialize_field("service_type", self.type_name)?;
        state.serialize_field("key", &self.key)?;
        state.end()
    }
}
