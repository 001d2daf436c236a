//! Parsed HTML templates and resource reconciliation.
//!
//! A [`Document`] is parsed once from a template, scanned for the scripts,
//! stylesheets and injection markers directly under `<head>` and `<body>`,
//! and then reconciled against the chunks a page requires:
//!
//! ```
//! use multipage::{Document, OutputMode};
//!
//! let mut doc = Document::default_skeleton();
//! doc.ensure_requires(&["app"], false).unwrap();
//!
//! let html = doc.serialize(OutputMode::Compact).unwrap();
//! assert!(html.contains(r#"<script src="app"></script></body>"#));
//! ```

mod cache;
mod format;

pub use cache::DocumentCache;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use html5ever::{QualName, local_name, ns};
use tracing::{debug, warn};

use crate::dom::{self, Attribute, Dom, NodeId};
use crate::error::{Error, Result};
use crate::resource::{Marker, Resource};
use crate::util::decode_text;

/// Skeleton used when a page has no template of its own.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html><html><head><meta charset="UTF-8"></head><body><!--SCRIPT--></body></html>"#;

/// Where a document's markup comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Template {
    /// The built-in [`DEFAULT_TEMPLATE`].
    Default,
    /// Absolute path of a template file.
    File(PathBuf),
}

impl Template {
    /// Resolve an optional template path to an absolute template identity.
    ///
    /// Fails when the path does not exist: once a template is named it must
    /// be readable.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Template::Default),
            Some(path) => fs::canonicalize(path)
                .map(Template::File)
                .map_err(|source| Error::Template {
                    path: path.to_path_buf(),
                    source,
                }),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Default => f.write_str("<default>"),
            Template::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output formatting applied by [`Document::serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Minified: no whitespace-only text, no comments except conditional ones.
    Compact,
    /// Every head/body child on its own line.
    Pretty,
}

impl OutputMode {
    /// Compact for production builds, pretty otherwise.
    pub fn for_build(production: bool) -> Self {
        if production {
            OutputMode::Compact
        } else {
            OutputMode::Pretty
        }
    }
}

/// A parsed template with its head/body anchors and scanned resources.
///
/// Cloning copies the whole node tree, so clones can be reconciled
/// independently of each other and of the document they came from.
#[derive(Debug, Clone)]
pub struct Document {
    template: Template,
    dom: Dom,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    scripts: Vec<Resource>,
    styles: Vec<Resource>,
    script_marker: Option<NodeId>,
    style_marker: Option<NodeId>,
}

impl Document {
    /// Read and parse a template.
    pub fn load(template: &Template) -> Result<Self> {
        match template {
            Template::Default => Ok(Self::default_skeleton()),
            Template::File(path) => {
                let bytes = fs::read(path).map_err(|source| Error::Template {
                    path: path.clone(),
                    source,
                })?;
                debug!(template = %path.display(), bytes = bytes.len(), "parsing template");
                Ok(Self::parse(&decode_text(&bytes), template.clone()))
            }
        }
    }

    /// Document built from [`DEFAULT_TEMPLATE`].
    pub fn default_skeleton() -> Self {
        Self::parse(DEFAULT_TEMPLATE, Template::Default)
    }

    /// Parse markup and scan its head and body.
    pub fn parse(markup: &str, template: Template) -> Self {
        let dom = dom::parse_html(markup);
        let html = dom.child_element(dom.document(), "html");
        let (head, body) = locate_anchors(&dom, html);

        let mut document = Self {
            template,
            dom,
            html,
            head,
            body,
            scripts: Vec::new(),
            styles: Vec::new(),
            script_marker: None,
            style_marker: None,
        };

        for anchor in [head, body].into_iter().flatten() {
            let children: Vec<NodeId> = document.dom.children(anchor).collect();
            for child in children {
                let resource = Resource::classify(&document.dom, child);
                document.record(resource);
            }
        }

        document
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    /// Scripts under head and body, in document order of discovery.
    pub fn scripts(&self) -> &[Resource] {
        &self.scripts
    }

    pub fn styles(&self) -> &[Resource] {
        &self.styles
    }

    /// Node of the injection marker of the given kind, while it is unconsumed.
    pub fn marker(&self, marker: Marker) -> Option<NodeId> {
        match marker {
            Marker::Script => self.script_marker,
            Marker::Style => self.style_marker,
        }
    }

    /// Make sure every required chunk is referenced by the document.
    ///
    /// Missing scripts replace the `<!--SCRIPT-->` marker or are appended to
    /// body. When `styles_extracted` is set, missing stylesheets replace the
    /// `<!--STYLE-->` marker or are appended to head. Chunks already present
    /// are never injected again, so repeated calls are idempotent.
    pub fn ensure_requires<S: AsRef<str>>(
        &mut self,
        required: &[S],
        styles_extracted: bool,
    ) -> Result<()> {
        self.inject(Marker::Script, required)?;
        if styles_extracted {
            self.inject(Marker::Style, required)?;
        }
        Ok(())
    }

    /// Format head and body for `mode` and write the document out.
    ///
    /// Compact mode also drops blank text between `</head>` and `<body>`.
    pub fn serialize(mut self, mode: OutputMode) -> Result<String> {
        if let (OutputMode::Compact, Some(html)) = (mode, self.html) {
            format::strip_blank_text(&mut self.dom, html);
        }
        for anchor in [self.head, self.body].into_iter().flatten() {
            match mode {
                OutputMode::Compact => format::compact(&mut self.dom, anchor),
                OutputMode::Pretty => format::pretty(&mut self.dom, anchor),
            }
        }
        dom::to_html(&self.dom)
    }

    fn record(&mut self, resource: Resource) {
        if resource.is_script() {
            self.scripts.push(resource);
        } else if resource.is_style() {
            self.styles.push(resource);
        } else if let Some(marker) = resource.marker() {
            let slot = match marker {
                Marker::Script => &mut self.script_marker,
                Marker::Style => &mut self.style_marker,
            };
            if slot.replace(resource.node()).is_some() {
                warn!(
                    template = %self.template,
                    "duplicate <!--{}--> marker, using the last one",
                    marker.payload()
                );
            }
        }
    }

    fn inject<S: AsRef<str>>(&mut self, marker: Marker, required: &[S]) -> Result<()> {
        let existing = match marker {
            Marker::Script => &self.scripts,
            Marker::Style => &self.styles,
        };
        let mut present: HashSet<String> = existing
            .iter()
            .filter_map(Resource::chunk_name)
            .map(str::to_string)
            .collect();
        let left_over: Vec<&str> = required
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| present.insert(name.to_string()))
            .collect();

        if left_over.is_empty() {
            return Ok(());
        }

        let placement = match self.marker(marker) {
            Some(placeholder) => Placement::Replace(placeholder),
            None => Placement::Append(self.fallback_anchor(marker)?),
        };

        let nodes: Vec<NodeId> = left_over
            .iter()
            .map(|url| self.create_resource_node(marker, url))
            .collect();

        match placement {
            Placement::Replace(placeholder) => {
                for &node in &nodes {
                    self.dom.insert_before(placeholder, node);
                }
                self.dom.detach(placeholder);
                match marker {
                    Marker::Script => self.script_marker = None,
                    Marker::Style => self.style_marker = None,
                }
            }
            Placement::Append(anchor) => {
                for &node in &nodes {
                    self.dom.append(anchor, node);
                }
            }
        }

        debug!(
            template = %self.template,
            chunks = ?left_over,
            at_marker = matches!(placement, Placement::Replace(_)),
            "injected {}",
            match marker {
                Marker::Script => "scripts",
                Marker::Style => "stylesheets",
            }
        );

        for (node, name) in nodes.into_iter().zip(left_over) {
            self.record(Resource::injected(node, marker, name));
        }
        Ok(())
    }

    /// Body for scripts, head for stylesheets.
    fn fallback_anchor(&self, marker: Marker) -> Result<NodeId> {
        let (anchor, tag) = match marker {
            Marker::Script => (self.body, "body"),
            Marker::Style => (self.head, "head"),
        };
        anchor.ok_or_else(|| Error::MissingAnchor {
            anchor: tag,
            template: self.template.to_string(),
        })
    }

    fn create_resource_node(&mut self, marker: Marker, url: &str) -> NodeId {
        let attr = |name, value: &str| Attribute {
            name: QualName::new(None, ns!(), name),
            value: value.to_string(),
        };
        match marker {
            Marker::Script => self.dom.create_element(
                QualName::new(None, ns!(html), local_name!("script")),
                vec![attr(local_name!("src"), url)],
            ),
            Marker::Style => self.dom.create_element(
                QualName::new(None, ns!(html), local_name!("link")),
                vec![
                    attr(local_name!("rel"), "stylesheet"),
                    attr(local_name!("href"), url),
                ],
            ),
        }
    }
}

/// Where injected nodes go.
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// In place of an injection marker, which is then removed.
    Replace(NodeId),
    /// At the end of an anchor's children.
    Append(NodeId),
}

/// Find `<head>` and `<body>` among the document's children or the children
/// of its `<html>` element.
fn locate_anchors(dom: &Dom, html: Option<NodeId>) -> (Option<NodeId>, Option<NodeId>) {
    let root = dom.document();

    let mut head = None;
    let mut body = None;
    for parent in std::iter::once(root).chain(html) {
        for child in dom.children(parent) {
            if head.is_none() && dom.is_element(child, "head") {
                head = Some(child);
            } else if body.is_none() && dom.is_element(child, "body") {
                body = Some(child);
            }
        }
    }
    (head, body)
}
