//! Parse-once cache of scanned template documents.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::{Document, Template};
use crate::error::Result;

/// Scanned prototype documents keyed by template identity.
///
/// Callers always receive a clone, never the prototype itself, so pages
/// generated from the same template never share tree nodes.
#[derive(Debug, Default)]
pub struct DocumentCache {
    prototypes: HashMap<Template, Document>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ready document for `template`, or the default skeleton for `None`.
    pub fn document(&mut self, template: Option<&Path>) -> Result<Document> {
        let key = Template::resolve(template)?;

        if let Some(prototype) = self.prototypes.get(&key) {
            debug!(template = %key, "template cache hit");
            return Ok(prototype.clone());
        }

        let document = Document::load(&key)?;
        self.prototypes.insert(key, document.clone());
        Ok(document)
    }

    /// Number of cached templates.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn clear(&mut self) {
        self.prototypes.clear();
    }
}
