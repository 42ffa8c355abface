//! metricate-core: imperial to SI conversion inside free text
//!
//! This crate finds quantities written in imperial or US customary units
//! ("10 feet and 4 inches", "6 pounds, 2.1 ounces") and rewrites them in SI,
//! keeping as many significant figures as the original literal carried.
//! It has no UI dependencies and can back a CLI, a chat bot or a filter.
//!
//! # Example
//!
//! ```
//! use metricate_core::Engine;
//!
//! let engine = Engine::new();
//!
//! // Single units
//! let out = engine.process("I am 6 feet tall", &["en-US"]).unwrap();
//! assert_eq!(out.as_deref(), Some("I am 2 m tall"));
//!
//! // Chained units combine before converting
//! let out = engine.process("10 feet and 4 inches", &["en-US"]).unwrap();
//! assert_eq!(out.as_deref(), Some("3.15 m"));
//!
//! // Nothing to convert
//! assert_eq!(engine.process("no units here", &["en-US"]).unwrap(), None);
//! ```

pub mod compromise;
pub mod config;
pub mod convert;
pub mod document;
mod error;
pub mod format;
pub mod registry;
pub mod types;

pub use compromise::compromise;
pub use config::{Definitions, MultipleDef, UnitDef, UnitTypeDef};
pub use convert::{process, Engine};
pub use document::{Document, Replacement};
pub use error::{Error, Result};
pub use format::{NumberFormat, NumberStyle, DEFAULT_LOCALE};
pub use registry::{Registry, SuperunitEdge};
pub use types::{Precision, PrecisionNumber, Unit, UnitType};
