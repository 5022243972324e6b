//! Dictionary sources.
//!
//! A dictionary is one of three things: an inline list, a newline-delimited
//! file loaded on first use, or a builtin generator materialized on first use.
//! Entries never change once loaded.

use crate::error::DictionaryError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::debug;

/// Builtin generator: `(count, seed) -> entries`. Must be pure.
pub type BuiltinGenerator = Arc<dyn Fn(usize, u64) -> Vec<String> + Send + Sync>;

/// Number of entries materialized for a builtin dictionary.
pub const DEFAULT_BUILTIN_COUNT: usize = 10_000;

/// Read a newline-delimited list.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn read_lines(path: &Path) -> Result<Vec<String>, DictionaryError> {
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// A registered dictionary.
pub enum Dictionary {
    /// Literal entries
    Inline(Arc<Vec<String>>),

    /// Entries read from a file on first access
    File(FileDictionary),

    /// Entries produced by a builtin generator on first access
    Builtin(BuiltinDictionary),
}

impl Dictionary {
    /// Inline dictionary from literal entries.
    pub fn inline(items: Vec<String>) -> Self {
        Self::Inline(Arc::new(items))
    }

    /// File dictionary; nothing is read until [`Dictionary::items`] is called.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileDictionary::new(path))
    }

    /// Builtin dictionary with the default entry count.
    pub fn builtin(generator: BuiltinGenerator) -> Self {
        Self::Builtin(BuiltinDictionary::new(generator, DEFAULT_BUILTIN_COUNT))
    }

    /// Entries in natural order.
    pub fn items(&self) -> Result<Arc<Vec<String>>, DictionaryError> {
        match self {
            Self::Inline(items) => Ok(Arc::clone(items)),
            Self::File(file) => file.items(),
            Self::Builtin(builtin) => Ok(builtin.items()),
        }
    }

    /// Source kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inline(_) => "inline",
            Self::File(_) => "file",
            Self::Builtin(_) => "builtin",
        }
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(items) => f.debug_tuple("Inline").field(&items.len()).finish(),
            Self::File(file) => f.debug_tuple("File").field(&file.path).finish(),
            Self::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.count).finish(),
        }
    }
}

/// Lazily loaded file dictionary.
///
/// Concurrent first access reads the file once: the fast path checks the
/// loaded entries, the slow path re-checks under the load lock.
pub struct FileDictionary {
    path: PathBuf,
    items: OnceLock<Arc<Vec<String>>>,
    load_lock: Mutex<()>,
}

impl FileDictionary {
    /// Create an unloaded file dictionary.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    fn items(&self) -> Result<Arc<Vec<String>>, DictionaryError> {
        if let Some(items) = self.items.get() {
            return Ok(Arc::clone(items));
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(items) = self.items.get() {
            return Ok(Arc::clone(items));
        }

        let items = Arc::new(read_lines(&self.path)?);
        debug!(
            "Loaded {} entries from dictionary file {}",
            items.len(),
            self.path.display()
        );
        Ok(Arc::clone(self.items.get_or_init(|| items)))
    }
}

/// Builtin dictionary, materialized once with seed 0.
pub struct BuiltinDictionary {
    generator: BuiltinGenerator,
    count: usize,
    items: OnceLock<Arc<Vec<String>>>,
}

impl BuiltinDictionary {
    /// Create a builtin dictionary producing `count` entries.
    pub fn new(generator: BuiltinGenerator, count: usize) -> Self {
        Self {
            generator,
            count,
            items: OnceLock::new(),
        }
    }

    fn items(&self) -> Arc<Vec<String>> {
        Arc::clone(
            self.items
                .get_or_init(|| Arc::new((self.generator)(self.count, 0))),
        )
    }
}
