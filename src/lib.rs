//! # multipage
//!
//! Multi-page application support for JavaScript bundlers: discover one page
//! per directory and generate each page's HTML from a template, with the
//! page's script and stylesheet chunks injected.
//!
//! ## Features
//!
//! - Page discovery from the subdirectories of a root directory
//! - Per-page template, entry and output name, fixed or computed from the page name
//! - `<!--SCRIPT-->` and `<!--STYLE-->` injection markers, with body/head fallbacks
//! - Chunks a template already references are never injected twice
//! - Compact output for production builds, line-per-tag output otherwise
//! - Templates are parsed once and cloned for every page that uses them
//! - Optional `pagemap.json` mapping page names to their URLs
//!
//! ## Quick Start
//!
//! ```no_run
//! use multipage::{BuildOptions, PageGenerator, PagesConfig, RecordingHost};
//!
//! let mut generator = PageGenerator::new("src/pages", PagesConfig::default()).unwrap();
//!
//! // Setup: register one entry and one HTML document per page
//! let mut host = RecordingHost::default();
//! generator.register(&mut host).unwrap();
//!
//! // Emit: render each document with the chunks it requires
//! let options = BuildOptions { production: true, ..Default::default() };
//! for request in &host.html {
//!     let html = generator.render_page(request, &request.chunks, &options).unwrap();
//!     println!("{}: {} bytes", request.filename, html.len());
//! }
//! ```
//!
//! ## Working with Documents
//!
//! ```
//! use multipage::{Document, OutputMode, Template};
//!
//! let template = r#"<html><head><!--STYLE--></head>
//! <body><script src="vendor.js"></script><!--SCRIPT--></body></html>"#;
//!
//! let mut doc = Document::parse(template, Template::Default);
//! doc.ensure_requires(&["vendor", "app"], true).unwrap();
//!
//! let html = doc.serialize(OutputMode::Compact).unwrap();
//! assert!(html.contains(r#"<link rel="stylesheet" href="app">"#));
//! assert!(html.contains(r#"<script src="vendor.js"></script><script src="app"></script>"#));
//! ```

pub mod document;
pub mod dom;
pub mod error;
pub mod pages;
pub mod resource;
pub(crate) mod util;

pub use document::{DEFAULT_TEMPLATE, Document, DocumentCache, OutputMode, Template};
pub use error::{Error, Result};
pub use pages::{
    AssetOutputs, BuildHost, BuildOptions, HtmlRequest, PAGE_MAP_FILE, PageEntry, PageGenerator,
    PagesConfig, PagesConfigFile, RecordingHost, Selector, SharedChunkConfig, SharedChunkPass,
};
pub use resource::{Marker, Resource, ResourceKind};
