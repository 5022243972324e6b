//! Dictionary registry.

use crate::builtins;
use crate::error::DictionaryError;
use crate::source::{BuiltinGenerator, Dictionary};
use datagen_core::DictionaryConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Default)]
struct RegistryState {
    dictionaries: HashMap<String, Arc<Dictionary>>,
    shuffled: HashMap<(String, u64), Arc<Vec<String>>>,
}

impl RegistryState {
    fn insert(&mut self, name: &str, dictionary: Dictionary) {
        debug!("Registering {} dictionary '{name}'", dictionary.kind());
        self.dictionaries
            .insert(name.to_string(), Arc::new(dictionary));
        self.shuffled.retain(|(cached, _), _| cached != name);
    }
}

/// Name-keyed collection of token dictionaries.
///
/// The registry is constructed explicitly and passed by reference to the
/// generator factory. Reads may happen concurrently; registration takes the
/// write lock. Shuffled views are cached per `(name, seed)` and dropped when
/// the name is registered again.
#[derive(Default)]
pub struct DictionaryRegistry {
    state: RwLock<RegistryState>,
}

impl DictionaryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the whole builtin catalog under its own names.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        {
            let mut state = registry.write_state();
            for name in builtins::BUILTIN_NAMES {
                if let Some(generator) = builtins::lookup(name) {
                    state.insert(name, Dictionary::builtin(generator));
                }
            }
        }
        registry
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register literal entries.
    pub fn register_inline(&self, name: &str, items: Vec<String>) {
        self.write_state().insert(name, Dictionary::inline(items));
    }

    /// Register a newline-delimited file, read on first access.
    pub fn register_file(&self, name: &str, path: impl Into<PathBuf>) {
        self.write_state().insert(name, Dictionary::file(path));
    }

    /// Register a builtin generator, materialized on first access.
    pub fn register_builtin(&self, name: &str, generator: BuiltinGenerator) {
        self.write_state().insert(name, Dictionary::builtin(generator));
    }

    /// Register a catalog builtin (for example `uuid_v4_lower`) under `name`.
    pub fn register_builtin_named(&self, name: &str, builtin: &str) -> Result<(), DictionaryError> {
        let generator = builtins::lookup(builtin)
            .ok_or_else(|| DictionaryError::UnknownBuiltin(builtin.to_string()))?;
        self.register_builtin(name, generator);
        Ok(())
    }

    /// Register a dictionary declared in a dataset configuration.
    ///
    /// Inline items take precedence over `items_file`, which takes precedence
    /// over `builtin`. Relative file paths are resolved against `base_dir`.
    pub fn register_config(
        &self,
        name: &str,
        config: &DictionaryConfig,
        base_dir: &Path,
    ) -> Result<(), DictionaryError> {
        if !config.items.is_empty() {
            self.register_inline(name, config.items.clone());
        } else if let Some(path) = &config.items_file {
            self.register_file(name, base_dir.join(path));
        } else if let Some(builtin) = &config.builtin {
            self.register_builtin_named(name, builtin)?;
        } else {
            return Err(DictionaryError::EmptyDefinition(name.to_string()));
        }
        Ok(())
    }

    /// Whether a dictionary is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.read_state().dictionaries.contains_key(name)
    }

    /// Remove every dictionary and cached shuffle.
    pub fn clear(&self) {
        let mut state = self.write_state();
        state.dictionaries.clear();
        state.shuffled.clear();
    }

    /// Entries of `name`.
    ///
    /// A seed of 0 returns the natural order. Any other seed returns a
    /// deterministic shuffle, cached under `(name, seed)`.
    pub fn get(&self, name: &str, seed: u64) -> Result<Arc<Vec<String>>, DictionaryError> {
        let key = (name.to_string(), seed);
        let dictionary = {
            let state = self.read_state();
            if let Some(cached) = state.shuffled.get(&key) {
                debug!("Shuffle cache hit for dictionary '{name}' (seed {seed})");
                return Ok(Arc::clone(cached));
            }
            state
                .dictionaries
                .get(name)
                .cloned()
                .ok_or_else(|| DictionaryError::NotFound(name.to_string()))?
        };

        // File reads happen outside the registry lock
        let items = dictionary.items()?;
        if seed == 0 {
            return Ok(items);
        }

        debug!("Shuffle cache miss for dictionary '{name}' (seed {seed})");
        let mut shuffled = items.as_ref().clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
        let shuffled = Arc::new(shuffled);

        let mut state = self.write_state();
        let unchanged = state
            .dictionaries
            .get(name)
            .is_some_and(|current| Arc::ptr_eq(current, &dictionary));
        if !unchanged {
            return Ok(shuffled);
        }
        Ok(Arc::clone(state.shuffled.entry(key).or_insert(shuffled)))
    }
}

impl std::fmt::Debug for DictionaryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("DictionaryRegistry")
            .field("dictionaries", &state.dictionaries.len())
            .field("cached_shuffles", &state.shuffled.len())
            .finish()
    }
}
