//! Whole-dataset generation from a [`DataConfig`].

use crate::error::GeneratorError;
use crate::factory::create_generator;
use crate::generators::FieldGenerator;
use crate::random::RandomContext;
use datagen_core::{ColumnSet, DataConfig, FieldConfig, GeneratorConfig, VarcharMode};
use datagen_dictionary::DictionaryRegistry;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Builds one generator per field and assembles their columns.
///
/// Every call to [`generate`](Self::generate) starts a fresh
/// [`RandomContext`] from the dataset seed, so repeated calls with the same
/// row count return identical column sets.
pub struct DatasetGenerator {
    name: String,
    seed: u64,
    default_rows: usize,
    generators: Vec<Box<dyn FieldGenerator>>,
}

impl DatasetGenerator {
    /// Register the dataset's dictionaries and build every field generator.
    ///
    /// Relative `items_file` and `corpus_file` paths are resolved against
    /// `base_dir`.
    pub fn new(
        config: &DataConfig,
        registry: &DictionaryRegistry,
        base_dir: &Path,
    ) -> Result<Self, GeneratorError> {
        check_field_names(config)?;

        for (name, dictionary) in &config.dictionaries {
            registry.register_config(name, dictionary, base_dir)?;
            debug!("Registered dictionary '{name}'");
        }

        let generators = config
            .fields
            .iter()
            .map(|field| create_generator(&resolve_paths(field, base_dir), registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: config.name.clone(),
            seed: config.seed,
            default_rows: config.rows,
            generators,
        })
    }

    /// Row count declared by the configuration.
    pub fn default_rows(&self) -> usize {
        self.default_rows
    }

    /// Seed of the shared random context.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `rows` rows for every field, in declaration order.
    pub fn generate(&mut self, rows: usize) -> Result<ColumnSet, GeneratorError> {
        info!(
            "Generating dataset '{}': {} fields x {} rows (seed {})",
            self.name,
            self.generators.len(),
            rows,
            self.seed
        );

        let mut ctx = RandomContext::new(self.seed);
        let mut columns = Vec::with_capacity(self.generators.len());
        for generator in &mut self.generators {
            let column = generator.generate(rows, &mut ctx)?;
            debug!(
                "Generated column '{}' with {} nulls",
                column.name,
                column.null_count()
            );
            columns.push(column);
        }

        info!("Finished dataset '{}'", self.name);
        Ok(ColumnSet {
            row_count: rows,
            columns,
        })
    }
}

fn check_field_names(config: &DataConfig) -> Result<(), GeneratorError> {
    let mut seen = HashSet::new();
    for field in &config.fields {
        if field.name.is_empty() {
            return Err(GeneratorError::config("", "field name must not be empty"));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(GeneratorError::config(&field.name, "duplicate field name"));
        }
    }
    Ok(())
}

/// Copy of `field` with relative corpus paths joined onto `base_dir`.
fn resolve_paths(field: &FieldConfig, base_dir: &Path) -> FieldConfig {
    let mut field = field.clone();
    match &mut field.generator {
        GeneratorConfig::Varchar(config) => {
            if let VarcharMode::Corpus { corpus_file } = &mut config.mode {
                if corpus_file.is_relative() {
                    *corpus_file = base_dir.join(&*corpus_file);
                }
            }
        }
        GeneratorConfig::Array(config) => {
            config.element = Box::new(resolve_paths(&config.element, base_dir));
        }
        _ => {}
    }
    field
}
