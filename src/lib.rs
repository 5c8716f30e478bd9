//! Parse, reconcile and re-render `GNF_Protein_box` infoboxes.
//!
//! A page is parsed into a [`ProteinBox`] holding every schema field,
//! merged with freshly fetched data by [`reconcile`], and written back with
//! [`render`] in the template's canonical layout. [`sync::Updater`] strings the
//! steps together over pluggable page, gene and image sources.
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod schema;
pub mod sync;
pub mod wikitext;

pub use error::{FieldError, ParseError};
pub use model::{default_field_map, FieldValue, OntologyTerm, ProteinBox, RejectPolicy};
pub use reconcile::{reconcile, ChangeLog, FieldChange, Reconciliation};
pub use render::{render, render_as};
pub use wikitext::{parse, parse_with, ParseOptions};
