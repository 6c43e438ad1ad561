//! Property stores
//!
//! A property store holds the resolved key/value configuration of one
//! property set, along with a link to the set it inherits from. Flow
//! provenance records only ever read a store's identifiers through the
//! [`PropertyStore`] trait; [`Props`] is the in-memory store used by tooling
//! and tests.

mod props;

use dyn_clone::DynClone;

use crate::intern::SourceId;

pub use props::Props;

/// The contract a loaded property set exposes to provenance records
pub trait PropertyStore: std::fmt::Debug + Send + Sync + DynClone {
    /// Identifier of the document this store's own properties came from
    fn source(&self) -> &str;

    /// The store this one inherits from, if it isn't root-level
    fn parent(&self) -> Option<&dyn PropertyStore>;

    /// The source identifier as an interned [`SourceId`]
    fn source_id(&self) -> SourceId {
        SourceId::new(self.source())
    }
}

dyn_clone::clone_trait_object!(PropertyStore);
