//! Typed HTML tree for templates.
//!
//! Templates are parsed with html5ever into an arena of tagged nodes
//! (element, text, comment, doctype) and written back out with html5ever's
//! serializer.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, ChildrenIter, Dom, Node, NodeData, NodeId};
pub use serialize::SerializableNode;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::TendrilSink;

use crate::error::Result;
use tree_sink::DomSink;

/// Parse a full HTML document into a [`Dom`].
///
/// Parsing never fails: malformed markup is repaired the way browsers do,
/// so `html`, `head` and `body` are implied when a template omits them.
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// Serialize the whole document to an HTML string.
pub fn to_html(dom: &Dom) -> Result<String> {
    let mut out = Vec::new();
    let root = SerializableNode::new(dom, dom.document());
    serialize(&mut out, &root, SerializeOpts::default())?;
    Ok(String::from_utf8(out)?)
}
