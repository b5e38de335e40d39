use serde::Deserialize;

/// What the compilation cache key covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// Property name, operator and id of each top-level condition only.
    ///
    /// Rule sets that differ just in operands, bounds, connectors or nested
    /// conditions share one cached predicate.
    Structural,
    /// Everything that affects the compiled predicate, nested conditions
    /// included.
    #[default]
    Content,
}

/// Compiler configuration. Every field has a default, so a partial JSON
/// document is enough.
///
/// ```
/// use predicata::{CacheKeyMode, CompilerOptions};
///
/// let options = CompilerOptions::default().cache_key(CacheKeyMode::Structural);
/// assert_eq!(options.cache_key, CacheKeyMode::Structural);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub cache_key: CacheKeyMode,
    /// `chrono` format strings tried in order for date/time operands, after
    /// RFC 3339.
    pub date_formats: Vec<String>,
    pub initial_capacity: usize,
}

pub(crate) const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y",
];

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            cache_key: CacheKeyMode::default(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| (*f).to_owned()).collect(),
            initial_capacity: 64,
        }
    }
}

impl CompilerOptions {
    #[must_use]
    pub fn cache_key(mut self, mode: CacheKeyMode) -> Self {
        self.cache_key = mode;
        self
    }

    #[must_use]
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
