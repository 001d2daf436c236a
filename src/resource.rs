//! Classification of head/body children into script, style and comment resources.

use crate::dom::{Dom, NodeId};
use crate::util::chunk_name;

/// Comment payload marking where missing scripts are injected.
pub const SCRIPT_MARKER: &str = "SCRIPT";
/// Comment payload marking where missing stylesheets are injected.
pub const STYLE_MARKER: &str = "STYLE";

/// What a head/body child represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// `<script>`; `chunk` is `None` for inline scripts.
    Script { chunk: Option<String> },
    /// `<link rel="stylesheet">` or `<style>`; `chunk` is `None` for inline styles.
    Style { chunk: Option<String> },
    /// Comment with its trimmed payload.
    Comment(String),
    Other,
}

/// Kind of injection point a reserved comment marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Script,
    Style,
}

impl Marker {
    pub fn payload(self) -> &'static str {
        match self {
            Marker::Script => SCRIPT_MARKER,
            Marker::Style => STYLE_MARKER,
        }
    }
}

/// A classified node of a document.
///
/// A resource does not own its node: it refers to it by [`NodeId`], which
/// stays valid in every structural clone of the owning [`Dom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    node: NodeId,
    kind: ResourceKind,
}

impl Resource {
    /// Classify a node.
    pub fn classify(dom: &Dom, node: NodeId) -> Self {
        let kind = if dom.is_element(node, "script") {
            ResourceKind::Script {
                chunk: dom.attr(node, "src").map(|src| chunk_name(src).to_string()),
            }
        } else if dom.is_element(node, "link") && is_stylesheet(dom.attr(node, "rel")) {
            ResourceKind::Style {
                chunk: dom.attr(node, "href").map(|href| chunk_name(href).to_string()),
            }
        } else if dom.is_element(node, "style") {
            ResourceKind::Style { chunk: None }
        } else if let Some(text) = dom.comment(node) {
            ResourceKind::Comment(text.trim().to_string())
        } else {
            ResourceKind::Other
        };

        Self { node, kind }
    }

    /// Resource for a node injected for the required chunk `name`.
    ///
    /// The chunk is the name itself; its URL is not re-derived, so dotted
    /// names keep their full spelling.
    pub(crate) fn injected(node: NodeId, marker: Marker, name: &str) -> Self {
        let chunk = Some(name.to_string());
        let kind = match marker {
            Marker::Script => ResourceKind::Script { chunk },
            Marker::Style => ResourceKind::Style { chunk },
        };
        Self { node, kind }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    /// Chunk name of an external script or stylesheet.
    pub fn chunk_name(&self) -> Option<&str> {
        match &self.kind {
            ResourceKind::Script { chunk } | ResourceKind::Style { chunk } => chunk.as_deref(),
            _ => None,
        }
    }

    /// Injection marker this comment stands for, if any.
    pub fn marker(&self) -> Option<Marker> {
        match &self.kind {
            ResourceKind::Comment(text) if text == SCRIPT_MARKER => Some(Marker::Script),
            ResourceKind::Comment(text) if text == STYLE_MARKER => Some(Marker::Style),
            _ => None,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self.kind, ResourceKind::Script { .. })
    }

    pub fn is_style(&self) -> bool {
        matches!(self.kind, ResourceKind::Style { .. })
    }
}

/// `rel` is a space separated, case-insensitive token list.
fn is_stylesheet(rel: Option<&str>) -> bool {
    rel.is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}
