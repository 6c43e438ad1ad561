//! Interned source identifiers
//!
//! Large deployments load many flows that point at the same few property
//! files, so the same identifier strings show up over and over. Every
//! [`SourceId`] is created through a process-wide pool, which hands out a
//! shared allocation for equal strings.
//!
//! Sharing is only a memory optimization. Identifiers compare, order, and hash
//! by value, so two `SourceId`s built from equal strings are always equal
//! whether or not they share storage.
//!
//! The pool never outlives its users: dropping the last `SourceId` for a
//! string removes that string from the pool.

use std::{
    borrow::Borrow,
    collections::HashSet,
    fmt,
    ops::Deref,
    sync::{Arc, Mutex, MutexGuard},
};

use lazy_static::lazy_static;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

lazy_static! {
    static ref POOL: Mutex<HashSet<Arc<str>>> = Mutex::new(HashSet::new());
    // Placeholder swapped into a dropping `SourceId` so its handle can be released under the lock.
    static ref RELEASED: Arc<str> = Arc::from("");
}

// The pool is a plain set, so a panic while it was held can't leave it inconsistent.
fn pool() -> MutexGuard<'static, HashSet<Arc<str>>> {
    POOL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn intern(value: &str) -> Arc<str> {
    let mut pool = pool();
    if let Some(existing) = pool.get(value) {
        return Arc::clone(existing);
    }
    let shared: Arc<str> = Arc::from(value);
    pool.insert(Arc::clone(&shared));
    shared
}

/// Number of distinct identifiers currently held by the pool
pub fn pool_len() -> usize {
    pool().len()
}

#[cfg(test)]
pub(crate) fn contains(value: &str) -> bool {
    pool().contains(value)
}

/// An immutable, interned identifier naming where a property set originates
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(Arc<str>);

impl SourceId {
    pub fn new(value: &str) -> Self {
        Self(intern(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both identifiers share the same allocation
    pub fn ptr_eq(&self, other: &SourceId) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Drop for SourceId {
    fn drop(&mut self) {
        let mut pool = pool();
        let handle = std::mem::replace(&mut self.0, Arc::clone(&RELEASED));
        // A count of two is this handle plus the pool's: no other SourceId is
        // left to clone from, and the pool only hands out copies under the lock.
        if Arc::strong_count(&handle) == 2 {
            pool.remove(&*handle);
        }
        drop(handle);
    }
}

impl Deref for SourceId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Hash and Eq both delegate to the string contents.
impl Borrow<str> for SourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&String> for SourceId {
    fn from(value: &String) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl PartialEq<str> for SourceId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SourceId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for SourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(SourceId::from(value))
    }
}
