//! Filter and search engine for a catalog of pickup stores.
//!
//! The engine narrows a catalog with a typo-tolerant free-text query plus
//! categorical and numeric filters. See [`filter::FilterEngine`].

pub mod catalog;
pub mod chips;
pub mod config;
pub mod error;
pub mod filter;
pub mod search;
pub mod suggest;
pub mod taxonomy;

pub use catalog::Record;
pub use error::{Error, Result};
pub use filter::{Field, FieldUpdate, FilterEngine, FilterState, SetField};
pub use search::{is_loose_match, normalize};
