//! Extract visual styling from Power BI report definitions.
//!
//! A PBIP report stores each visual's formatting as an object set buried in a
//! string-encoded configuration blob. This crate turns those object sets into
//! theme fragments, the shape Power BI theme files use for `visualStyles`:
//!
//! ```text
//! report.json                          theme_<page>_<n>_<type>.json
//! └── sections[]                       {"visualStyles": {
//!     └── visualContainers[]              "<type>": {
//!         └── config (string)               "*": {
//!             └── singleVisual                "<group>": [{<property>: <value>}, ...]
//!                 ├── visualType           }}}}
//!                 └── objects
//! ```
//!
//! # Pieces
//!
//! - [`value`]: turns literal expression nodes (`{"expr": {"Literal": {"Value": "12D"}}}`)
//!   into native JSON values through an ordered rule chain.
//! - [`selector`]: decides whether a property item applies to the whole visual.
//! - [`projector`]: filters, flattens and deduplicates one visual's object set.
//! - [`report`]: the input document model and per-container iteration.
//! - [`export`]: runs the projector over a whole report and writes the results.
//!
//! # Quick Start
//!
//! ```
//! use pbip_theme::project;
//! use serde_json::json;
//!
//! let objects = json!({
//!     "background": [{"properties": {
//!         "color": {"expr": {"Literal": {"Value": "'#FFFFFF'"}}}
//!     }}]
//! });
//!
//! let projection = project("card", objects.as_object().unwrap());
//! assert_eq!(
//!     serde_json::to_value(&projection.theme).unwrap(),
//!     json!({"visualStyles": {"card": {"*": {"background": [{"color": "#FFFFFF"}]}}}})
//! );
//! ```
//!
//! # Failure Model
//!
//! Coercion and projection never fail: unparseable literals stay strings,
//! scoped or malformed items are dropped. Only reading the report and writing
//! output return [`ThemeError`].

mod error;
pub mod export;
pub mod naming;
pub mod projector;
pub mod report;
pub mod selector;
pub mod value;

// Re-export public API
pub use error::{Result, ThemeError};
pub use export::{export_report, write_artifacts, ExportArtifact, ExportOptions, ExportSummary};
pub use naming::{sanitize, OutputNames};
pub use projector::{
    project, Projection, PropertySet, StyleGroup, ThemeDocument, ThemeFragment, ThemeProjector,
    VISUAL_STYLES_KEY, VISUAL_WIDE_BUCKET,
};
pub use report::{Report, SkipReason, SkippedVisual, VisualEntry, VisualOutcome};
pub use selector::SelectorScope;
pub use value::{coerce, LiteralRule, ValueCoercer};
