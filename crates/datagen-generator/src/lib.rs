//! Seeded field generators for synthetic column data.
//!
//! A [`FieldConfig`](datagen_core::FieldConfig) is turned into a
//! [`FieldGenerator`] by [`create_generator`], which validates the
//! configuration and resolves any dictionaries through a
//! [`DictionaryRegistry`](datagen_dictionary::DictionaryRegistry). Every
//! generator draws from a caller-owned [`RandomContext`], so one context
//! shared across fields reproduces the same columns for the same seed.
//!
//! # Architecture
//!
//! ```text
//! DataConfig (YAML)
//!        │
//!        ▼
//! ┌──────────────────┐      ┌────────────────────┐
//! │ DatasetGenerator │─────▶│ DictionaryRegistry │
//! └────────┬─────────┘      └────────────────────┘
//!          │ create_generator (one per field)
//!          ▼
//!   Box<dyn FieldGenerator> ──generate(rows, &mut RandomContext)──▶ Column
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{DataType, FieldConfig, GeneratorConfig, NumericConfig, Distribution};
//! use datagen_dictionary::DictionaryRegistry;
//! use datagen_generator::{create_generator, RandomContext};
//!
//! let field = FieldConfig::new(
//!     "id",
//!     DataType::Int64,
//!     GeneratorConfig::Numeric(
//!         NumericConfig::new(0.0, 9.0).with_distribution(Distribution::Sequential),
//!     ),
//! );
//!
//! let registry = DictionaryRegistry::new();
//! let mut generator = create_generator(&field, &registry).unwrap();
//! let column = generator.generate(12, &mut RandomContext::new(42)).unwrap();
//! assert_eq!(column.len(), 12);
//! ```
//!
//! # Generators
//!
//! - `categorical` - Values from a dictionary or inline list with duplication skew
//! - `numeric` - Uniform, normal, zipf, sequential or histogram numbers
//! - `timestamp` - Epoch integers with weighted hotspot windows
//! - `varchar` - Random token text, templates, corpus lines, UUIDs or timestamps
//! - `array` - Variable-length arrays of any non-array element kind
//! - `boolean` - Booleans with a configurable true ratio

pub mod dataset;
pub mod error;
pub mod factory;
pub mod generators;
pub mod random;

// Re-exports for convenience
pub use dataset::DatasetGenerator;
pub use error::{ErrorKind, GeneratorError};
pub use factory::{create_generator, validate_config};
pub use generators::FieldGenerator;
pub use random::RandomContext;
