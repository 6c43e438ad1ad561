use std::collections::{BTreeMap, BTreeSet};

use typed_builder::TypedBuilder;

use crate::{intern::SourceId, store::PropertyStore};

/// An in-memory property set with an optional parent
///
/// Lookups through [`Props::get`] fall back to the parent chain, so a child
/// set only needs to hold the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Props {
    #[builder(setter(into))]
    source: SourceId,

    #[builder(default, setter(transform = |parent: Props| Some(Box::new(parent))))]
    parent: Option<Box<Props>>,

    #[builder(default)]
    values: BTreeMap<String, String>,
}

impl Props {
    pub fn new(source: impl Into<SourceId>) -> Self {
        Props::builder().source(source).build()
    }

    pub fn with_parent(source: impl Into<SourceId>, parent: Props) -> Self {
        Props::builder().source(source).parent(parent).build()
    }

    pub fn parent_props(&self) -> Option<&Props> {
        self.parent.as_deref()
    }

    /// Look up a value, walking up the parent chain until it's found
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut current = Some(self);
        while let Some(props) = current {
            if let Some(value) = props.values.get(key) {
                return Some(value.as_str());
            }
            current = props.parent_props();
        }
        None
    }

    /// Look up a value set on this level only
    pub fn get_local(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value on this level, returning the value it replaced
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Keys set on this level, in sorted order
    pub fn local_keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Every key visible from this level, including inherited ones
    pub fn key_set(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        let mut current = Some(self);
        while let Some(props) = current {
            keys.extend(props.local_keys());
            current = props.parent_props();
        }
        keys
    }
}

impl PropertyStore for Props {
    fn source(&self) -> &str {
        &self.source
    }

    fn parent(&self) -> Option<&dyn PropertyStore> {
        self.parent
            .as_deref()
            .map(|parent| parent as &dyn PropertyStore)
    }

    fn source_id(&self) -> SourceId {
        self.source.clone()
    }
}
