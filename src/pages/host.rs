//! Interface to the host build tool.
//!
//! The host drives three phases: it constructs a
//! [`PageGenerator`](super::PageGenerator), calls `register` once at setup,
//! renders each requested page at emit time, and calls `finalize` to collect
//! extra outputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Signals the host provides about the current build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Production builds emit compact HTML.
    pub production: bool,
    /// Styles are extracted to standalone files rather than inlined.
    pub styles_extracted: bool,
    /// Base URL that output files are served from.
    pub public_path: String,
}

/// One generated HTML document the host should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRequest {
    pub page: String,
    /// Output file name, including `.html`.
    pub filename: String,
    /// Template path; `None` for the built-in skeleton.
    pub template: Option<PathBuf>,
    /// Chunks the document must reference, in load order.
    pub chunks: Vec<String>,
}

/// A shared-chunk extraction pass over the page chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedChunkPass {
    pub name: String,
    pub chunks: Vec<String>,
    pub options: Map<String, Value>,
}

impl SharedChunkPass {
    /// User options merged with `name` and `chunks`, which take precedence.
    pub fn to_options(&self) -> Map<String, Value> {
        let mut options = self.options.clone();
        options.insert("name".to_string(), Value::from(self.name.clone()));
        options.insert("chunks".to_string(), Value::from(self.chunks.clone()));
        options
    }
}

/// Registration points of the host build tool.
pub trait BuildHost {
    /// Register a compiled entry under `name`.
    fn add_entry(&mut self, name: &str, modules: Vec<String>);

    /// Request a generated HTML document.
    fn request_html(&mut self, request: HtmlRequest);

    fn add_shared_chunk_pass(&mut self, pass: SharedChunkPass);

    /// Public path for assets referenced from extracted stylesheets.
    fn set_style_public_path(&mut self, _path: &str) {}
}

/// Extra files added to the build output, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetOutputs {
    assets: BTreeMap<String, Vec<u8>>,
}

impl AssetOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.assets.insert(name.into(), contents.into());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.assets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Write every asset below `dir`, creating directories as needed.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        for (name, contents) in &self.assets {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)?;
        }
        Ok(())
    }
}

/// A host that records every registration, for static builds and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub entries: BTreeMap<String, Vec<String>>,
    pub html: Vec<HtmlRequest>,
    pub shared_chunks: Vec<SharedChunkPass>,
    pub style_public_path: Option<String>,
}

impl BuildHost for RecordingHost {
    fn add_entry(&mut self, name: &str, modules: Vec<String>) {
        self.entries.insert(name.to_string(), modules);
    }

    fn request_html(&mut self, request: HtmlRequest) {
        self.html.push(request);
    }

    fn add_shared_chunk_pass(&mut self, pass: SharedChunkPass) {
        self.shared_chunks.push(pass);
    }

    fn set_style_public_path(&mut self, path: &str) {
        self.style_public_path = Some(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_shared_pass_options_are_merged() {
        let mut options = Map::new();
        options.insert("minChunks".to_string(), json!(2));
        options.insert("chunks".to_string(), json!(["stale"]));

        let pass = SharedChunkPass {
            name: "common".to_string(),
            chunks: vec!["about".to_string(), "home".to_string()],
            options,
        };

        assert_eq!(
            Value::Object(pass.to_options()),
            json!({ "name": "common", "chunks": ["about", "home"], "minChunks": 2 })
        );
    }

    #[test]
    fn test_build_options_defaults() {
        let options: BuildOptions = serde_json::from_str(r#"{ "production": true }"#).unwrap();
        assert!(options.production);
        assert!(!options.styles_extracted);
        assert_eq!(options.public_path, "");
    }

    #[test]
    fn test_assets_write_to_nested_paths() {
        let dir = TempDir::new().unwrap();
        let mut assets = AssetOutputs::new();
        assets.insert("pagemap.json", "{}");
        assets.insert("admin/index.html", b"<html></html>".to_vec());

        assets.write_to(dir.path()).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("pagemap.json")).unwrap(), "{}");
        assert!(dir.path().join("admin/index.html").is_file());
        assert_eq!(assets.len(), 2);
        assert_eq!(assets.get("pagemap.json"), Some(&b"{}"[..]));
    }
}
