//! HTML serialization of the arena DOM through html5ever's serializer.

use std::io;

use html5ever::serialize::{Serialize, Serializer, TraversalScope};

use super::arena::{Dom, NodeData, NodeId};

/// A node of a [`Dom`] that html5ever can serialize.
pub struct SerializableNode<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => serialize_node(self.dom, self.id, serializer),
            TraversalScope::ChildrenOnly(_) => {
                for child in self.dom.children(self.id) {
                    serialize_node(self.dom, child, serializer)?;
                }
                Ok(())
            }
        }
    }
}

fn serialize_node<S: Serializer>(dom: &Dom, id: NodeId, serializer: &mut S) -> io::Result<()> {
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_node(dom, child, serializer)?;
            }
        }
        NodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
        NodeData::Element { name, attrs } => {
            serializer.start_elem(
                name.clone(),
                attrs.iter().map(|a| (&a.name, a.value.as_str())),
            )?;
            for child in dom.children(id) {
                serialize_node(dom, child, serializer)?;
            }
            serializer.end_elem(name.clone())?;
        }
        NodeData::Text(text) => serializer.write_text(text)?,
        NodeData::Comment(text) => serializer.write_comment(text)?,
    }

    Ok(())
}
