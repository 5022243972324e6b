//! Core types for the scalar-datagen framework.
//!
//! This crate provides the foundational types shared by the dictionary
//! registry, the field generators and the command-line front end:
//!
//! - [`DataType`] - Declared value type of a generated column
//! - [`FieldConfig`] - Per-field generator configuration (a tagged union by kind)
//! - [`DataConfig`] - A full dataset description loaded from YAML
//! - [`Column`] / [`ColumnData`] - The typed column contract produced by generators
//! - [`ScalarValue`] - A single cell value, used where elements are handled generically
//!
//! # Architecture
//!
//! ```text
//! datagen-core (this crate)
//!    │
//!    ├─── datagen-dictionary  (named token pools, depends on datagen-core for configs)
//!    │
//!    └─── datagen-generator   (RandomContext, field generators, factory)
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{DataConfig, GeneratorConfig};
//!
//! let config = DataConfig::from_yaml(r#"
//! name: orders
//! rows: 1000
//! seed: 7
//! fields:
//!   - name: status
//!     type: varchar
//!     generator:
//!       type: categorical
//!       values:
//!         inline: ["new", "paid", "shipped"]
//!       duplication_ratios: [0.5]
//! "#).unwrap();
//!
//! assert_eq!(config.fields.len(), 1);
//! assert!(matches!(config.fields[0].generator, GeneratorConfig::Categorical(_)));
//! ```

pub mod column;
pub mod config;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use column::{Column, ColumnData, ColumnSet};
pub use config::{
    ArrayConfig, BooleanConfig, BucketConfig, CategoricalConfig, ContainsRule, DataConfig,
    DataConfigError, DictionaryConfig, Distribution, FieldConfig, GeneratorConfig, HotspotConfig,
    JsonConfig, KeywordConfig, LengthConfig, NumericConfig, NumericRange, OutlierConfig, PoolSource,
    TimeRange, TimestampConfig, TimestampFormat, TokenCountConfig, ValuePool, VarcharConfig,
    VarcharMode,
};
pub use types::DataType;
pub use values::ScalarValue;
