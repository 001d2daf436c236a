//! Page generation settings.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Placeholder replaced by the page name in config file patterns.
pub const NAME_PLACEHOLDER: &str = "[name]";

/// A per-page setting: one value for every page, or computed from the page name.
pub enum Selector<T> {
    Literal(T),
    Resolver(Box<dyn Fn(&str) -> T>),
}

impl<T> Selector<T> {
    pub fn resolver(f: impl Fn(&str) -> T + 'static) -> Self {
        Selector::Resolver(Box::new(f))
    }
}

impl<T: Clone> Selector<T> {
    /// Value of this setting for `page`.
    pub fn resolve(&self, page: &str) -> T {
        match self {
            Selector::Literal(value) => value.clone(),
            Selector::Resolver(f) => f(page),
        }
    }
}

impl<T> From<T> for Selector<T> {
    fn from(value: T) -> Self {
        Selector::Literal(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Selector::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Build a selector from a config string, resolving per page when the
/// string contains [`NAME_PLACEHOLDER`].
fn pattern<T: From<String> + 'static>(value: String) -> Selector<T> {
    if value.contains(NAME_PLACEHOLDER) {
        Selector::resolver(move |page| T::from(value.replace(NAME_PLACEHOLDER, page)))
    } else {
        Selector::Literal(T::from(value))
    }
}

/// Extraction of code shared by every page into one chunk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedChunkConfig {
    /// Name of the shared chunk; every page requires it.
    pub name: String,
    /// Extra options handed to the host's extraction pass as-is.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl SharedChunkConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
        }
    }
}

/// How pages found under a root directory are turned into entries and documents.
#[derive(Debug, Default)]
pub struct PagesConfig {
    /// HTML template per page; `None` uses the built-in skeleton.
    pub template: Option<Selector<PathBuf>>,
    /// Entry module per page; `None` uses the page directory itself.
    pub entry: Option<Selector<String>>,
    /// Output file name without `.html`; `None` uses the page name.
    pub filename: Option<Selector<String>>,
    /// Directory names that are not pages.
    pub exclude: Vec<String>,
    /// Modules placed before every page's entry.
    pub pre_entries: Vec<String>,
    /// Modules placed after every page's entry.
    pub post_entries: Vec<String>,
    pub shared_chunk: Option<SharedChunkConfig>,
    /// Public path for assets referenced from extracted stylesheets.
    pub style_public_path: Option<String>,
    /// Emit `pagemap.json` mapping page names to their URLs.
    pub page_map: bool,
}

/// JSON form of [`PagesConfig`].
///
/// Template, entry and filename are strings; `[name]` in them is replaced
/// with each page's name:
///
/// ```json
/// {
///   "template": "src/pages/[name]/index.html",
///   "exclude": ["components"],
///   "shared_chunk": { "name": "common" },
///   "page_map": true
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfigFile {
    pub template: Option<String>,
    pub entry: Option<String>,
    pub filename: Option<String>,
    pub exclude: Vec<String>,
    pub pre_entries: Vec<String>,
    pub post_entries: Vec<String>,
    pub shared_chunk: Option<SharedChunkConfig>,
    pub style_public_path: Option<String>,
    pub page_map: bool,
}

impl PagesConfigFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn into_config(self) -> PagesConfig {
        PagesConfig {
            template: self.template.map(pattern),
            entry: self.entry.map(pattern),
            filename: self.filename.map(pattern),
            exclude: self.exclude,
            pre_entries: self.pre_entries,
            post_entries: self.post_entries,
            shared_chunk: self.shared_chunk,
            style_public_path: self.style_public_path,
            page_map: self.page_map,
        }
    }
}
