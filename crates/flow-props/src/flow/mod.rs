//! Flow property provenance
//!
//! A flow definition carries one [`FlowProps`] record per property set it
//! loads. Each record names the set's own source and the source it inherits
//! from. The records serialize to a small key-value shape
//! ([`FlowPropsRecord`]) that's embedded in flow documents as a list under
//! the `"props"` key ([`FlowPropsSet`]).

mod props;
mod record;
mod set;

pub use props::FlowProps;
pub use record::{FlowPropsRecord, INHERITS_KEY, SOURCE_KEY};
pub use set::{FlowPropsSet, PROPS_KEY};
