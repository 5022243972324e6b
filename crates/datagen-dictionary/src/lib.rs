//! Named token pools for the scalar-datagen field generators.
//!
//! Categorical and varchar generators draw their values from dictionaries
//! registered here by name. A dictionary is an inline list, a file read on
//! first use, or a builtin generator from the catalog in [`builtins`].
//!
//! # Example
//!
//! ```rust
//! use datagen_dictionary::DictionaryRegistry;
//!
//! let registry = DictionaryRegistry::new();
//! registry.register_inline("colors", vec!["red".into(), "green".into(), "blue".into()]);
//!
//! // Seed 0 keeps the natural order
//! let natural = registry.get("colors", 0).unwrap();
//! assert_eq!(natural[0], "red");
//!
//! // Any other seed gives a deterministic, cached shuffle
//! let shuffled = registry.get("colors", 42).unwrap();
//! assert_eq!(shuffled, registry.get("colors", 42).unwrap());
//! ```

pub mod builtins;
pub mod error;
pub mod registry;
pub mod source;

// Re-exports for convenience
pub use error::DictionaryError;
pub use registry::DictionaryRegistry;
pub use source::{read_lines, BuiltinGenerator, Dictionary, DEFAULT_BUILTIN_COUNT};
