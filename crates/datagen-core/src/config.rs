//! Configuration definitions for the scalar-datagen framework.
//!
//! This module defines the field and dataset configuration consumed by the
//! field generators.
//!
//! ## Type Hierarchy
//!
//! - `DataConfig` - A dataset: row count, seed, named dictionaries and fields
//! - `FieldConfig` - One column: name, declared type, nullability, generator
//! - `GeneratorConfig` - Tagged union of the seven generator kinds
//!
//! The generators never parse configuration text themselves; they receive
//! the structures defined here, typically deserialized from YAML with
//! [`DataConfig::from_yaml`] or [`DataConfig::from_file`].

use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Error Types
// ============================================================================

/// Error type for loading dataset configuration.
#[derive(Debug, thiserror::Error)]
pub enum DataConfigError {
    /// Error reading configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

// ============================================================================
// Shared Building Blocks
// ============================================================================

/// Sampling distribution shared by numeric fields, token counts and array
/// lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Every value equally likely
    #[default]
    Uniform,

    /// Gaussian centered on the middle of the range, clamped into it
    Normal,

    /// Rank-biased toward the low end of the range
    Zipf,

    /// Repeating ascending run over the range
    Sequential,

    /// Weighted sub-ranges
    #[serde(alias = "custom_histogram")]
    CustomHist,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uniform => "uniform",
            Self::Normal => "normal",
            Self::Zipf => "zipf",
            Self::Sequential => "sequential",
            Self::CustomHist => "custom_hist",
        };
        f.write_str(name)
    }
}

/// A pool of candidate values: a named dictionary or an inline list.
///
/// ```yaml
/// values:
///   dictionary: city_names
/// values:
///   inline: ["A", "B", "C"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuePool {
    /// Name of a dictionary in the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<String>,

    /// Literal values
    #[serde(default, rename = "inline", skip_serializing_if = "Vec::is_empty")]
    pub inline_items: Vec<String>,
}

/// Where a [`ValuePool`] takes its values from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolSource<'a> {
    /// Look up a registered dictionary
    Dictionary(&'a str),
    /// Use the inline list
    Inline(&'a [String]),
    /// Nothing configured
    Empty,
}

impl ValuePool {
    /// Pool backed by a named dictionary.
    pub fn dictionary(name: impl Into<String>) -> Self {
        Self {
            dictionary: Some(name.into()),
            inline_items: Vec::new(),
        }
    }

    /// Pool backed by literal values.
    pub fn inline<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Self {
            dictionary: None,
            inline_items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the configured source. A dictionary reference wins over
    /// inline values.
    pub fn source(&self) -> PoolSource<'_> {
        match &self.dictionary {
            Some(name) if !name.is_empty() => PoolSource::Dictionary(name),
            _ if !self.inline_items.is_empty() => PoolSource::Inline(&self.inline_items),
            _ => PoolSource::Empty,
        }
    }
}

/// Inclusive epoch range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// First value (inclusive)
    pub start: i64,
    /// Last value (inclusive)
    pub end: i64,
}

impl TimeRange {
    /// Create a new range.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

// ============================================================================
// Categorical
// ============================================================================

/// Values drawn from a finite labeled pool with a controllable skew.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalConfig {
    /// Candidate values
    #[serde(default)]
    pub values: ValuePool,

    /// Probability mass of the first K values; the rest share the remainder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplication_ratios: Vec<f64>,

    /// Truncate string values to this many bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Keep only the first N pool entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick: Option<usize>,

    /// Keep N pool entries chosen at random (once per generator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_pick: Option<usize>,
}

// ============================================================================
// Numeric
// ============================================================================

/// Required global domain of a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (inclusive)
    pub max: f64,
}

impl NumericRange {
    /// Create a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A weighted sub-range used by the custom histogram distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Relative weight
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Minimum value (inclusive)
    pub min: f64,
    /// Maximum value (inclusive)
    pub max: f64,
}

/// Outlier injection rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierConfig {
    /// Per-row replacement probability
    #[serde(default)]
    pub ratio: f64,
    /// Replacement values, allowed outside the range
    #[serde(default)]
    pub values: Vec<f64>,
}

fn default_step() -> u64 {
    1
}

/// Scalar numeric columns.
///
/// - `range` is the global domain for uniform, normal and zipf sampling.
/// - `buckets` are only read by the custom histogram distribution.
/// - `precision` (float/double) is applied before `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericConfig {
    /// Global domain
    pub range: NumericRange,

    /// Sampling strategy
    #[serde(default)]
    pub distribution: Distribution,

    /// Increment of the sequential distribution
    #[serde(default = "default_step")]
    pub step: u64,

    /// Weighted sub-ranges for the custom histogram distribution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<BucketConfig>,

    /// Outlier injection
    #[serde(default)]
    pub outliers: OutlierConfig,

    /// Decimal digits kept for float/double values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl NumericConfig {
    /// Uniform sampling over `[min, max]`.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            range: NumericRange::new(min, max),
            distribution: Distribution::Uniform,
            step: 1,
            buckets: Vec::new(),
            outliers: OutlierConfig::default(),
            precision: None,
        }
    }

    /// Replace the distribution.
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }
}

// ============================================================================
// Timestamp
// ============================================================================

/// A sub-range sampled with elevated probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotspotConfig {
    /// Hotspot window
    pub window: TimeRange,
    /// Share of rows drawn from this window
    pub weight: f64,
}

/// Epoch-like integer columns with optional clustering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampConfig {
    /// Overall range
    pub range: TimeRange,

    /// Hotspot windows; total weight must not exceed 1.0
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotspots: Vec<HotspotConfig>,

    /// Symmetric perturbation, clamped back into the range
    #[serde(default)]
    pub jitter: i64,
}

// ============================================================================
// Varchar
// ============================================================================

/// Number of tokens per generated string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenCountConfig {
    /// Fewest tokens
    pub min: usize,
    /// Most tokens
    pub max: usize,
    /// Only uniform is supported when `min != max`
    #[serde(default)]
    pub distribution: Distribution,
}

impl Default for TokenCountConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            distribution: Distribution::Uniform,
        }
    }
}

/// A token injected with its own frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Token to insert
    pub token: String,
    /// Per-row insertion probability
    #[serde(default)]
    pub frequency: f64,
}

/// Rendering of the timestamp string mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// Decimal epoch value
    #[default]
    Unix,
    /// `YYYY-MM-DDTHH:MM:SSZ`, reading the epoch value as milliseconds
    Iso8601,
}

/// How strings are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VarcharMode {
    /// Concatenate random tokens, then inject keywords and phrases
    Random {
        /// Token pool; falls back to a built-in stop-word list
        #[serde(default)]
        values: ValuePool,
        /// Tokens per string
        #[serde(default)]
        token_count: TokenCountConfig,
        /// Keywords injected independently
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        keywords: Vec<KeywordConfig>,
        /// Phrases injected with 50% probability each
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        phrase_sets: Vec<Vec<String>>,
    },

    /// Substitute `{name}` placeholders from named pools
    Template {
        /// Template string
        template: String,
        /// Pools by placeholder name
        #[serde(default)]
        pools: BTreeMap<String, Vec<String>>,
    },

    /// Sample whole lines of a corpus file
    Corpus {
        /// Newline-delimited candidate lines
        corpus_file: PathBuf,
    },

    /// One random v4 UUID per row
    Uuid {
        /// Keep only this many leading characters
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uuid_length: Option<usize>,
    },

    /// A random epoch value rendered as text
    Timestamp {
        /// Sampled range
        range: TimeRange,
        /// Symmetric perturbation (not clamped)
        #[serde(default)]
        jitter: i64,
        /// Rendering
        #[serde(default)]
        format: TimestampFormat,
    },
}

impl VarcharMode {
    /// Mode name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random { .. } => "random",
            Self::Template { .. } => "template",
            Self::Corpus { .. } => "corpus",
            Self::Uuid { .. } => "uuid",
            Self::Timestamp { .. } => "timestamp",
        }
    }
}

/// Free-text or structured string columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarcharConfig {
    /// Hard truncation in bytes, applied last
    pub max_length: usize,

    /// Generation mode and its parameters
    #[serde(flatten)]
    pub mode: VarcharMode,
}

// ============================================================================
// Array
// ============================================================================

/// Per-row array length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthConfig {
    /// Shortest array
    pub min: usize,
    /// Longest array
    pub max: usize,
    /// Center of the normal distribution (defaults to the midpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Uniform, zipf or normal
    #[serde(default)]
    pub distribution: Distribution,
}

fn default_probability() -> f64 {
    1.0
}

/// Forces values into or out of generated arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainsRule {
    /// Values forced to be present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Values forced to be absent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Per-row probability of applying each half of the rule
    #[serde(default = "default_probability")]
    pub probability: f64,
}

/// Variable-length sequences of a nested element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayConfig {
    /// Element generator; any kind except another array
    pub element: Box<FieldConfig>,

    /// Per-row length
    pub length: LengthConfig,

    /// Hard ceiling on array length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<usize>,

    /// Containment rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<ContainsRule>,

    /// De-duplicate elements within each row
    #[serde(default)]
    pub unique: bool,
}

// ============================================================================
// Boolean
// ============================================================================

/// Bernoulli-sampled booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanConfig {
    /// Probability of `true`; 0.5 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_ratio: Option<f64>,
}

impl BooleanConfig {
    /// Effective probability of `true`.
    pub fn true_probability(&self) -> f64 {
        self.true_ratio.unwrap_or(0.5)
    }
}

// ============================================================================
// JSON
// ============================================================================

/// JSON documents drawn from a candidate pool.
///
/// Candidates come from `values`; with no source configured a small set of
/// built-in documents is used. Selection follows the categorical rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonConfig {
    /// Candidate documents
    #[serde(default)]
    pub values: ValuePool,

    /// Probability mass of the first K documents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplication_ratios: Vec<f64>,

    /// Keep only the first N candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick: Option<usize>,

    /// Keep N candidates chosen at random
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_pick: Option<usize>,
}

// ============================================================================
// Field
// ============================================================================

/// Generator configuration for a field.
///
/// This enum selects the generator kind; the `type` key in YAML is the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Values from a finite pool
    Categorical(CategoricalConfig),

    /// Scalar numbers
    Numeric(NumericConfig),

    /// Epoch integers
    Timestamp(TimestampConfig),

    /// Strings
    #[serde(alias = "text")]
    Varchar(VarcharConfig),

    /// Arrays of a nested element
    Array(ArrayConfig),

    /// Booleans
    Boolean(BooleanConfig),

    /// JSON documents
    Json(JsonConfig),
}

impl GeneratorConfig {
    /// Kind name as used in configuration files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Categorical(_) => "categorical",
            Self::Numeric(_) => "numeric",
            Self::Timestamp(_) => "timestamp",
            Self::Varchar(_) => "varchar",
            Self::Array(_) => "array",
            Self::Boolean(_) => "boolean",
            Self::Json(_) => "json",
        }
    }
}

/// One generated column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name, unique within a dataset (may be omitted for array elements)
    #[serde(default)]
    pub name: String,

    /// Declared value type
    #[serde(rename = "type")]
    pub field_type: DataType,

    /// Generator configuration for this field
    pub generator: GeneratorConfig,

    /// Whether this field may contain nulls
    #[serde(default)]
    pub nullable: bool,

    /// Share of null rows, requires `nullable`
    #[serde(default)]
    pub null_ratio: f64,
}

impl FieldConfig {
    /// Create a non-nullable field.
    pub fn new(name: impl Into<String>, field_type: DataType, generator: GeneratorConfig) -> Self {
        Self {
            name: name.into(),
            field_type,
            generator,
            nullable: false,
            null_ratio: 0.0,
        }
    }

    /// Mark the field nullable with the given null ratio.
    pub fn with_nulls(mut self, null_ratio: f64) -> Self {
        self.nullable = true;
        self.null_ratio = null_ratio;
        self
    }

    /// Whether generated columns carry a validity mask.
    pub fn emits_validity(&self) -> bool {
        self.nullable && self.null_ratio > 0.0
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// A named dictionary declared by a dataset.
///
/// Exactly one of `items`, `items_file` or `builtin` is expected:
/// ```yaml
/// dictionaries:
///   cities_small:
///     items: ["Beijing", "Shanghai", "Shenzhen"]
///   tags:
///     items_file: datasets/tags.txt
///   ids:
///     builtin: uuid_v4_lower
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Literal entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,

    /// Newline-delimited file, relative paths resolved by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_file: Option<PathBuf>,

    /// Name of a built-in generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin: Option<String>,
}

fn default_rows() -> usize {
    10_000
}

fn default_seed() -> u64 {
    42
}

/// Full dataset description.
///
/// It is loaded from a YAML file and drives the dataset generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset name
    #[serde(default)]
    pub name: String,

    /// Default number of rows
    #[serde(default = "default_rows", alias = "segment_size")]
    pub rows: usize,

    /// Seed of the shared random context
    #[serde(default = "default_seed", alias = "segment_seed")]
    pub seed: u64,

    /// Dictionaries registered before any generator is built
    #[serde(default, alias = "global_dictionaries")]
    pub dictionaries: BTreeMap<String, DictionaryConfig>,

    /// Field definitions
    pub fields: Vec<FieldConfig>,
}

impl DataConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DataConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
