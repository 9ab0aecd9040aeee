//! Theme Fields
//!
//! YAML custom-field schemas for theme templates: validation, template
//! classification, and typed persistence.
//!
//! ## Features
//!
//! - **Schema Validation**: structural checks over YAML field schemas with
//!   fail-fast, admin-renderable messages
//! - **Template Classification**: one shared pattern table classifies theme
//!   files into templates (post-bindable) and partials (shared/listing
//!   contexts), with an in-file `@ycf` marker escape hatch
//! - **Template Resolution**: maps a post to the theme file that governs it
//! - **Typed Stores**: schema text, per-post values, and data objects behind
//!   narrow, swappable persistence interfaces
//! - **Envelopes**: versioned JSON export/import of persisted data
//!
//! ## Architecture
//!
//! ```text
//! yaml text ──► validate ──► FieldSchema (typed tree)
//!                  │
//!                  └─ patterns ◄── scanner ──► ThemeIndex ──► ScanCache
//!                                                 ▲
//! theme root ─────────────────────────────────────┘
//!
//! store (KeyValueStore / TransientStore)
//!   ├── SchemaStore      schema text per template + global
//!   ├── ValueStore       per-post field values
//!   └── DataObjectStore  named entry collections
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod patterns;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod store;
pub mod validate;

pub use cache::ScanCache;
pub use config::FieldsConfig;
pub use error::{FieldsError, Result};
pub use export::{Envelope, ExportKind};
pub use patterns::PatternTable;
pub use resolver::{Post, TemplateResolver};
pub use scanner::{FileDescriptor, RegisteredTemplate, ThemeFile, ThemeIndex, ThemeScanner};
pub use schema::{Field, FieldKind, FieldSchema};
pub use store::{
    DataObject, DataObjectStore, FileStore, KeyValueStore, MemoryStore, SchemaStore,
    TransientStore, ValueStore,
};
pub use validate::{parse_schema, validate, ValidationOutcome};
