//! Varchar value generator.
//!
//! Supports five modes:
//!
//! - `random` - Random tokens joined by spaces, plus keyword and phrase injection
//! - `template` - `{name}` placeholders filled from named pools
//! - `corpus` - Whole lines sampled from a file
//! - `uuid` - One random v4 UUID per row
//! - `timestamp` - A random epoch value rendered as text
//!
//! Every value is truncated to `max_length` bytes as the last step.

use super::{apply_nulls, require_type, truncate_utf8, FieldGenerator};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use chrono::DateTime;
use datagen_core::{
    Column, ColumnData, DataType, Distribution, FieldConfig, PoolSource, TimeRange,
    TimestampFormat, VarcharConfig, VarcharMode,
};
use datagen_dictionary::{read_lines, DictionaryRegistry};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Token pool used when the random mode names no pool.
pub const DEFAULT_TOKENS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during",
];

const PLACEHOLDER_PATTERN: &str = r"\{(\w+)\}";

/// Validate a varchar configuration without loading files or dictionaries.
pub fn validate(field: &FieldConfig, config: &VarcharConfig) -> Result<(), GeneratorError> {
    require_type(field, "varchar", &[DataType::VarChar])?;
    let name = field.name.as_str();

    if config.max_length == 0 {
        return Err(GeneratorError::config(name, "max_length must be positive"));
    }

    match &config.mode {
        VarcharMode::Random {
            token_count,
            keywords,
            phrase_sets,
            ..
        } => {
            if token_count.min > token_count.max {
                return Err(GeneratorError::config(
                    name,
                    format!(
                        "token_count.min {} > token_count.max {}",
                        token_count.min, token_count.max
                    ),
                ));
            }
            if token_count.min != token_count.max
                && token_count.distribution != Distribution::Uniform
            {
                return Err(GeneratorError::config(
                    name,
                    format!(
                        "token_count supports only the uniform distribution, got {}",
                        token_count.distribution
                    ),
                ));
            }
            for keyword in keywords {
                if !(0.0..=1.0).contains(&keyword.frequency) {
                    return Err(GeneratorError::config(
                        name,
                        format!(
                            "keyword '{}' frequency {} must be within [0, 1]",
                            keyword.token, keyword.frequency
                        ),
                    ));
                }
            }
            if let Some(i) = phrase_sets.iter().position(Vec::is_empty) {
                return Err(GeneratorError::config(
                    name,
                    format!("phrase_sets[{i}] is empty"),
                ));
            }
        }
        VarcharMode::Template { template, pools } => {
            parse_template(field, template, pools)?;
        }
        VarcharMode::Corpus { corpus_file } => {
            if corpus_file.as_os_str().is_empty() {
                return Err(GeneratorError::config(name, "corpus mode requires corpus_file"));
            }
        }
        VarcharMode::Uuid { uuid_length } => {
            if *uuid_length == Some(0) {
                return Err(GeneratorError::config(name, "uuid_length must be positive"));
            }
        }
        VarcharMode::Timestamp { range, jitter, .. } => {
            if range.start > range.end {
                return Err(GeneratorError::config(
                    name,
                    format!("range.start {} > range.end {}", range.start, range.end),
                ));
            }
            if *jitter < 0 {
                return Err(GeneratorError::config(name, "jitter must not be negative"));
            }
        }
    }
    Ok(())
}

/// A parsed template piece.
#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Placeholder(Arc<Vec<String>>),
}

/// Split a template into literals and placeholder pools.
///
/// Every placeholder needs a non-empty pool without empty entries.
fn parse_template(
    field: &FieldConfig,
    template: &str,
    pools: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<Segment>, GeneratorError> {
    let name = field.name.as_str();
    if template.is_empty() {
        return Err(GeneratorError::config(name, "template mode requires a template"));
    }

    let pattern = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| GeneratorError::config(name, format!("invalid placeholder pattern: {e}")))?;

    let mut resolved: BTreeMap<&str, Arc<Vec<String>>> = BTreeMap::new();
    let mut segments = Vec::new();
    let mut last = 0;

    for captures in pattern.captures_iter(template) {
        let (Some(whole), Some(placeholder)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let placeholder = placeholder.as_str();

        let pool = match resolved.get(placeholder) {
            Some(pool) => Arc::clone(pool),
            None => {
                let items = pools.get(placeholder).ok_or_else(|| {
                    GeneratorError::config(
                        name,
                        format!("template placeholder '{placeholder}' has no pool"),
                    )
                })?;
                if items.is_empty() {
                    return Err(GeneratorError::config(
                        name,
                        format!("pool for placeholder '{placeholder}' is empty"),
                    ));
                }
                if let Some(i) = items.iter().position(String::is_empty) {
                    return Err(GeneratorError::config(
                        name,
                        format!("pool for placeholder '{placeholder}' has an empty entry at index {i}"),
                    ));
                }
                let pool = Arc::new(items.clone());
                resolved.insert(placeholder, Arc::clone(&pool));
                pool
            }
        };

        if whole.start() > last {
            segments.push(Segment::Literal(template[last..whole.start()].to_string()));
        }
        segments.push(Segment::Placeholder(pool));
        last = whole.end();
    }

    if last < template.len() {
        segments.push(Segment::Literal(template[last..].to_string()));
    }
    Ok(segments)
}

/// Mode state resolved at construction.
enum Source {
    Random {
        tokens: Arc<Vec<String>>,
        min_tokens: usize,
        max_tokens: usize,
        keywords: Vec<(String, f64)>,
        phrases: Vec<String>,
    },
    Template(Vec<Segment>),
    Corpus(Vec<String>),
    Uuid(usize),
    Timestamp {
        range: TimeRange,
        jitter: i64,
        format: TimestampFormat,
    },
}

/// Generator for varchar columns.
pub struct VarcharGenerator {
    field: FieldConfig,
    max_length: usize,
    source: Source,
}

impl VarcharGenerator {
    /// Validate the configuration and load pools, dictionaries and corpora.
    pub fn new(
        field: &FieldConfig,
        config: &VarcharConfig,
        registry: &DictionaryRegistry,
    ) -> Result<Self, GeneratorError> {
        validate(field, config)?;
        let name = field.name.as_str();

        let source = match &config.mode {
            VarcharMode::Random {
                values,
                token_count,
                keywords,
                phrase_sets,
            } => {
                let tokens = match values.source() {
                    PoolSource::Dictionary(dictionary) => registry.get(dictionary, 0)?,
                    PoolSource::Inline(items) => Arc::new(items.to_vec()),
                    PoolSource::Empty => {
                        Arc::new(DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect())
                    }
                };
                if tokens.is_empty() {
                    return Err(GeneratorError::config(name, "token pool is empty"));
                }
                Source::Random {
                    tokens,
                    min_tokens: token_count.min,
                    max_tokens: token_count.max,
                    keywords: keywords
                        .iter()
                        .map(|k| (k.token.clone(), k.frequency))
                        .collect(),
                    phrases: phrase_sets.iter().map(|set| set.join(" ")).collect(),
                }
            }
            VarcharMode::Template { template, pools } => {
                Source::Template(parse_template(field, template, pools)?)
            }
            VarcharMode::Corpus { corpus_file } => {
                let lines = read_lines(corpus_file)?;
                if lines.is_empty() {
                    return Err(GeneratorError::config(
                        name,
                        format!("corpus file {} is empty", corpus_file.display()),
                    ));
                }
                debug!(
                    "Loaded {} corpus lines for field '{name}' from {}",
                    lines.len(),
                    corpus_file.display()
                );
                Source::Corpus(lines)
            }
            VarcharMode::Uuid { uuid_length } => Source::Uuid(uuid_length.unwrap_or(36)),
            VarcharMode::Timestamp {
                range,
                jitter,
                format,
            } => Source::Timestamp {
                range: *range,
                jitter: *jitter,
                format: *format,
            },
        };

        Ok(Self {
            field: field.clone(),
            max_length: config.max_length,
            source,
        })
    }

    fn next_value(&self, ctx: &mut RandomContext) -> Result<String, GeneratorError> {
        let value = match &self.source {
            Source::Random {
                tokens,
                min_tokens,
                max_tokens,
                keywords,
                phrases,
            } => {
                let count = ctx.uniform_int(*min_tokens as i64, *max_tokens as i64) as usize;
                let mut text = String::new();
                for i in 0..count {
                    if i > 0 {
                        text.push(' ');
                    }
                    text.push_str(&tokens[ctx.uniform_index(tokens.len())]);
                }
                for (token, frequency) in keywords {
                    if ctx.bernoulli(*frequency) {
                        insert_at_word_boundary(&mut text, token, ctx);
                    }
                }
                for phrase in phrases {
                    if ctx.bernoulli(0.5) {
                        insert_at_word_boundary(&mut text, phrase, ctx);
                    }
                }
                text
            }
            Source::Template(segments) => {
                let mut text = String::new();
                for segment in segments {
                    match segment {
                        Segment::Literal(literal) => text.push_str(literal),
                        Segment::Placeholder(pool) => {
                            text.push_str(&pool[ctx.uniform_index(pool.len())])
                        }
                    }
                }
                text
            }
            Source::Corpus(lines) => lines[ctx.uniform_index(lines.len())].clone(),
            Source::Uuid(length) => {
                let mut bytes = [0u8; 16];
                ctx.fill_bytes(&mut bytes);
                let mut text = uuid::Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .hyphenated()
                    .to_string();
                text.truncate(*length);
                text
            }
            Source::Timestamp {
                range,
                jitter,
                format,
            } => {
                let mut ts = ctx.uniform_int(range.start, range.end);
                if *jitter > 0 {
                    ts = ts.saturating_add(ctx.uniform_int(-jitter, *jitter));
                }
                match format {
                    TimestampFormat::Unix => ts.to_string(),
                    TimestampFormat::Iso8601 => format_iso8601(ts).ok_or_else(|| {
                        GeneratorError::logic(
                            &self.field.name,
                            format!("timestamp {ts} is out of the representable range"),
                        )
                    })?,
                }
            }
        };
        Ok(value)
    }
}

/// Render epoch milliseconds as `YYYY-MM-DDTHH:MM:SSZ`.
fn format_iso8601(epoch_millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Insert `token` after the word at a random position, keeping single spaces
/// around it.
fn insert_at_word_boundary(text: &mut String, token: &str, ctx: &mut RandomContext) {
    let start = ctx.uniform_index(text.len() + 1);
    let pos = text.as_bytes()[start..]
        .iter()
        .position(|b| *b == b' ')
        .map_or(text.len(), |offset| start + offset);

    let mut insert = String::with_capacity(token.len() + 2);
    if pos > 0 && text.as_bytes()[pos - 1] != b' ' {
        insert.push(' ');
    }
    insert.push_str(token);
    if pos < text.len() && text.as_bytes()[pos] != b' ' {
        insert.push(' ');
    }
    text.insert_str(pos, &insert);
}

impl FieldGenerator for VarcharGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let mut values = Vec::with_capacity(rows);
        for _ in 0..rows {
            let mut value = self.next_value(ctx)?;
            truncate_utf8(&mut value, self.max_length);
            values.push(value);
        }
        let validity = apply_nulls(&self.field, &mut values, ctx);

        Ok(Column::new(self.field.name.clone(), ColumnData::VarChar(values)).with_validity(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use datagen_core::{GeneratorConfig, KeywordConfig, TokenCountConfig, ValuePool};
    use std::io::Write;

    fn build(config: VarcharConfig) -> Result<VarcharGenerator, GeneratorError> {
        let field = FieldConfig::new("v", DataType::VarChar, GeneratorConfig::Varchar(config.clone()));
        VarcharGenerator::new(&field, &config, &DictionaryRegistry::new())
    }

    fn generate(generator: &mut VarcharGenerator, rows: usize, seed: u64) -> Vec<String> {
        match generator.generate(rows, &mut RandomContext::new(seed)).unwrap().data {
            ColumnData::VarChar(values) => values,
            other => panic!("Expected varchar column, got {other:?}"),
        }
    }

    fn random_mode(min: usize, max: usize) -> VarcharMode {
        VarcharMode::Random {
            values: ValuePool::default(),
            token_count: TokenCountConfig {
                min,
                max,
                distribution: Distribution::Uniform,
            },
            keywords: Vec::new(),
            phrase_sets: Vec::new(),
        }
    }

    fn template(template: &str, pools: &[(&str, &[&str])]) -> VarcharConfig {
        VarcharConfig {
            max_length: 256,
            mode: VarcharMode::Template {
                template: template.to_string(),
                pools: pools
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                    .collect(),
            },
        }
    }

    #[test]
    fn test_random_mode_default_pool() {
        let mut generator = build(VarcharConfig {
            max_length: 1000,
            mode: random_mode(3, 3),
        })
        .unwrap();

        for value in generate(&mut generator, 100, 1) {
            let tokens: Vec<&str> = value.split(' ').collect();
            assert_eq!(tokens.len(), 3);
            assert!(tokens.iter().all(|t| DEFAULT_TOKENS.contains(t)));
        }
    }

    #[test]
    fn test_random_mode_rejects_non_uniform_counts() {
        let mut mode = random_mode(1, 5);
        if let VarcharMode::Random { token_count, .. } = &mut mode {
            token_count.distribution = Distribution::Zipf;
        }
        let err = build(VarcharConfig { max_length: 10, mode }).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_keyword_always_injected_with_spacing() {
        let mut mode = random_mode(4, 4);
        if let VarcharMode::Random { keywords, .. } = &mut mode {
            keywords.push(KeywordConfig {
                token: "NEEDLE".to_string(),
                frequency: 1.0,
            });
        }
        let mut generator = build(VarcharConfig {
            max_length: 1000,
            mode,
        })
        .unwrap();

        for value in generate(&mut generator, 200, 2) {
            let tokens: Vec<&str> = value.split(' ').collect();
            assert_eq!(tokens.len(), 5, "bad spacing in {value:?}");
            assert_eq!(tokens.iter().filter(|t| **t == "NEEDLE").count(), 1);
        }
    }

    #[test]
    fn test_insert_into_empty_text() {
        let mut ctx = RandomContext::new(1);
        let mut text = String::new();
        insert_at_word_boundary(&mut text, "solo", &mut ctx);
        assert_eq!(text, "solo");
    }

    #[test]
    fn test_template_substitution() {
        let mut generator = build(template("{a}-{b}", &[("a", &["x"]), ("b", &["y", "z"])])).unwrap();
        let pattern = Regex::new("^x-(y|z)$").unwrap();
        for value in generate(&mut generator, 200, 3) {
            assert!(pattern.is_match(&value), "{value}");
        }
    }

    #[test]
    fn test_template_repeated_placeholder_draws_independently() {
        let numbers: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = numbers.iter().map(String::as_str).collect();
        let mut generator = build(template("{n}/{n}", &[("n", &refs)])).unwrap();

        let values = generate(&mut generator, 200, 4);
        assert!(values.iter().any(|v| {
            let (left, right) = v.split_once('/').unwrap();
            left != right
        }));
    }

    #[test]
    fn test_template_output_not_rescanned() {
        let mut generator = build(template("{a}", &[("a", &["{a}"])])).unwrap();
        assert_eq!(generate(&mut generator, 3, 5), vec!["{a}"; 3]);
    }

    #[test]
    fn test_template_validation() {
        assert!(build(template("{missing}", &[])).is_err());
        assert!(build(template("{a}", &[("a", &[])])).is_err());
        assert!(build(template("{a}", &[("a", &["ok", ""])])).is_err());
        assert!(build(template("", &[])).is_err());
    }

    #[test]
    fn test_corpus_mode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment\nfirst line\n\nsecond line").unwrap();

        let mut generator = build(VarcharConfig {
            max_length: 100,
            mode: VarcharMode::Corpus {
                corpus_file: file.path().to_path_buf(),
            },
        })
        .unwrap();
        for value in generate(&mut generator, 50, 6) {
            assert!(value == "first line" || value == "second line");
        }
    }

    #[test]
    fn test_corpus_errors() {
        let missing = build(VarcharConfig {
            max_length: 100,
            mode: VarcharMode::Corpus {
                corpus_file: "/nonexistent/corpus.txt".into(),
            },
        });
        assert_eq!(missing.err().unwrap().kind(), ErrorKind::Resource);

        let file = tempfile::NamedTempFile::new().unwrap();
        let empty = build(VarcharConfig {
            max_length: 100,
            mode: VarcharMode::Corpus {
                corpus_file: file.path().to_path_buf(),
            },
        });
        assert_eq!(empty.err().unwrap().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_uuid_mode() {
        let mut generator = build(VarcharConfig {
            max_length: 64,
            mode: VarcharMode::Uuid { uuid_length: None },
        })
        .unwrap();
        for value in generate(&mut generator, 20, 7) {
            let parsed = uuid::Uuid::parse_str(&value).unwrap();
            assert_eq!(parsed.get_version_num(), 4);
        }

        let mut short = build(VarcharConfig {
            max_length: 64,
            mode: VarcharMode::Uuid {
                uuid_length: Some(8),
            },
        })
        .unwrap();
        assert!(generate(&mut short, 20, 7).iter().all(|v| v.len() == 8));
    }

    #[test]
    fn test_timestamp_mode() {
        let mut unix = build(VarcharConfig {
            max_length: 64,
            mode: VarcharMode::Timestamp {
                range: TimeRange::new(100, 200),
                jitter: 0,
                format: TimestampFormat::Unix,
            },
        })
        .unwrap();
        for value in generate(&mut unix, 50, 8) {
            let ts: i64 = value.parse().unwrap();
            assert!((100..=200).contains(&ts));
        }

        let mut iso = build(VarcharConfig {
            max_length: 64,
            mode: VarcharMode::Timestamp {
                range: TimeRange::new(1_700_000_000_000, 1_700_000_000_000),
                jitter: 0,
                format: TimestampFormat::Iso8601,
            },
        })
        .unwrap();
        assert_eq!(generate(&mut iso, 1, 8), vec!["2023-11-14T22:13:20Z"]);
    }

    #[test]
    fn test_max_length_truncation() {
        let mut config = template("{a}", &[("a", &["héllo wörld"])]);
        config.max_length = 2;
        let mut generator = build(config).unwrap();
        // 'é' spans bytes 1..3, so a 2-byte cut keeps only "h"
        assert_eq!(generate(&mut generator, 1, 9), vec!["h"]);
    }

    #[test]
    fn test_deterministic() {
        let config = VarcharConfig {
            max_length: 100,
            mode: random_mode(1, 6),
        };
        let mut a = build(config.clone()).unwrap();
        let mut b = build(config).unwrap();
        assert_eq!(generate(&mut a, 100, 42), generate(&mut b, 100, 42));
    }
}
