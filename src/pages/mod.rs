//! Multi-page discovery and HTML generation.
//!
//! Every immediate subdirectory of a root directory is a page. Each page gets
//! an entry registered with the host and one generated HTML document that
//! references the page's chunk.

mod config;
mod host;

pub use config::{NAME_PLACEHOLDER, PagesConfig, PagesConfigFile, Selector, SharedChunkConfig};
pub use host::{
    AssetOutputs, BuildHost, BuildOptions, HtmlRequest, RecordingHost, SharedChunkPass,
};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::{DocumentCache, OutputMode};
use crate::error::{Error, Result};
use crate::util::join_url;

/// Name of the optional page name to URL map.
pub const PAGE_MAP_FILE: &str = "pagemap.json";

/// A discovered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Directory name, unique among pages.
    pub name: String,
    /// Template path; `None` for the built-in skeleton.
    pub template: Option<PathBuf>,
    /// Entry module of the page.
    pub entry: String,
    /// Output file name without `.html`.
    pub filename: String,
}

impl PageEntry {
    /// Generated document name.
    pub fn output_file(&self) -> String {
        format!("{}.html", self.filename)
    }
}

/// Discovers pages, registers them with the host and renders their HTML.
#[derive(Debug)]
pub struct PageGenerator {
    root: PathBuf,
    pages: Vec<PageEntry>,
    pre_entries: Vec<String>,
    post_entries: Vec<String>,
    shared_chunk: Option<SharedChunkConfig>,
    style_public_path: Option<String>,
    page_map: bool,
    cache: DocumentCache,
}

impl PageGenerator {
    /// Scan `root` for page directories and resolve each page's settings.
    pub fn new(root: impl Into<PathBuf>, config: PagesConfig) -> Result<Self> {
        let root = root.into();
        let names = discover_pages(&root, &config.exclude)?;

        if let Some(shared) = &config.shared_chunk {
            if shared.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "shared chunk name must not be empty".to_string(),
                ));
            }
            if names.contains(&shared.name) {
                return Err(Error::InvalidConfig(format!(
                    "shared chunk {:?} has the same name as a page",
                    shared.name
                )));
            }
        }

        let mut outputs: HashMap<String, String> = HashMap::new();
        let mut pages = Vec::with_capacity(names.len());
        for name in names {
            let page = PageEntry {
                template: config.template.as_ref().map(|t| t.resolve(&name)),
                entry: match &config.entry {
                    Some(entry) => entry.resolve(&name),
                    None => default_entry(&root, &name),
                },
                filename: config
                    .filename
                    .as_ref()
                    .map_or_else(|| name.clone(), |f| f.resolve(&name)),
                name,
            };

            if let Some(first) = outputs.insert(page.filename.clone(), page.name.clone()) {
                return Err(Error::DuplicateOutput {
                    filename: page.output_file(),
                    first,
                    second: page.name,
                });
            }
            pages.push(page);
        }

        info!(root = %root.display(), pages = pages.len(), "discovered pages");

        Ok(Self {
            root,
            pages,
            pre_entries: config.pre_entries,
            post_entries: config.post_entries,
            shared_chunk: config.shared_chunk,
            style_public_path: config.style_public_path,
            page_map: config.page_map,
            cache: DocumentCache::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovered pages, sorted by name.
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    /// Register entries, HTML documents and the shared-chunk pass with the host.
    ///
    /// Templates are parsed here so a missing template fails the build at
    /// setup rather than at emit time.
    pub fn register<H: BuildHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        for page in &self.pages {
            let mut modules =
                Vec::with_capacity(self.pre_entries.len() + 1 + self.post_entries.len());
            modules.extend(self.pre_entries.iter().cloned());
            modules.push(page.entry.clone());
            modules.extend(self.post_entries.iter().cloned());
            debug!(page = %page.name, ?modules, "registering entry");
            host.add_entry(&page.name, modules);

            self.cache.document(page.template.as_deref())?;

            let mut chunks = Vec::with_capacity(2);
            if let Some(shared) = &self.shared_chunk {
                chunks.push(shared.name.clone());
            }
            chunks.push(page.name.clone());

            host.request_html(HtmlRequest {
                page: page.name.clone(),
                filename: page.output_file(),
                template: page.template.clone(),
                chunks,
            });
        }

        if let Some(shared) = &self.shared_chunk {
            if self.pages.is_empty() {
                warn!(chunk = %shared.name, "no pages found, skipping shared chunk");
            } else {
                host.add_shared_chunk_pass(SharedChunkPass {
                    name: shared.name.clone(),
                    chunks: self.pages.iter().map(|p| p.name.clone()).collect(),
                    options: shared.options.clone(),
                });
            }
        }

        if let Some(path) = &self.style_public_path {
            host.set_style_public_path(path);
        }

        Ok(())
    }

    /// Generate the final HTML of a requested document.
    ///
    /// `required` is the host's final list of chunks the page must load.
    pub fn render_page<S: AsRef<str>>(
        &mut self,
        request: &HtmlRequest,
        required: &[S],
        options: &BuildOptions,
    ) -> Result<String> {
        let mut document = self.cache.document(request.template.as_deref())?;
        document.ensure_requires(required, options.styles_extracted)?;
        let html = document.serialize(OutputMode::for_build(options.production))?;

        debug!(page = %request.page, file = %request.filename, bytes = html.len(), "rendered page");
        Ok(html)
    }

    /// Add `pagemap.json` to the outputs when page map emission is enabled.
    pub fn finalize(&self, options: &BuildOptions, assets: &mut AssetOutputs) -> Result<()> {
        if !self.page_map {
            return Ok(());
        }

        let map = self.page_map(&options.public_path);
        assets.insert(PAGE_MAP_FILE, serde_json::to_vec(&map)?);
        info!(pages = map.len(), "wrote {PAGE_MAP_FILE}");
        Ok(())
    }

    /// Final URL of each page's document.
    pub fn page_map(&self, public_path: &str) -> BTreeMap<String, String> {
        self.pages
            .iter()
            .map(|page| (page.name.clone(), join_url(public_path, &page.output_file())))
            .collect()
    }
}

/// The page directory itself, as a directory module.
fn default_entry(root: &Path, name: &str) -> String {
    format!("{}/", root.join(name).display())
}

/// Names of the visible subdirectories of `root` not listed in `exclude`.
fn discover_pages(root: &Path, exclude: &[String]) -> Result<Vec<String>> {
    let scan_error = |source| Error::PageScan {
        root: root.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        if !entry.path().is_dir() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping page with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') || exclude.contains(&name) {
            debug!(page = %name, "skipping directory");
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
