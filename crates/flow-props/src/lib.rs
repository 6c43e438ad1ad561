//! Provenance tracking for flow property sets
//!
//! Every flow definition may declare its own configuration properties and
//! inherit from a parent property set. This crate records *where* those
//! properties came from and *what* they inherit from, independent of the
//! property values themselves. It includes:
//!
//! - [`FlowProps`], the provenance record for one property set
//! - [`PropertyStore`], the contract a loaded property set exposes, and
//!   [`Props`], an in-memory implementation of it
//! - [`FlowPropsSet`], the list of records embedded in a flow document
//! - [`SourceId`], interned source identifiers
//!
//! # Example
//!
//! ```
//! use flow_props::FlowProps;
//!
//! let props = FlowProps::new(Some("flowA.job"), Some("common.properties"));
//! let record = props.to_record();
//! assert_eq!(record["inherits"], "common.properties");
//!
//! let restored = FlowProps::from_map(&record);
//! assert_eq!(restored.source(), Some("flowA.job"));
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod error;
pub mod flow;
pub mod intern;
pub mod store;

pub use error::{FlowPropsError, Result};
pub use flow::{FlowProps, FlowPropsRecord, FlowPropsSet};
pub use intern::SourceId;
pub use store::{PropertyStore, Props};

/// Initialize the tracing subscriber for standalone logging to the terminal.
///
/// Output goes to stderr, with the level controlled by the `RUST_LOG`
/// environment variable (defaults to `info`).
///
/// Applications that already install a `log` backend don't need this: the
/// `log` feature on `tracing` forwards every event from this crate as a `log`
/// record when no subscriber is set.
///
/// ```ignore
/// // RUST_LOG=flow_props=trace shows every adoption
/// flow_props::init_tracing();
/// ```
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
