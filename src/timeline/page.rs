//! Document pages and the page-source capability.

use serde::{Deserialize, Serialize};

/// A document page the annotations are drawn over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Background reference (image path, PDF page label) passed to surfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Page {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            width: 0.0,
            height: 0.0,
            background: None,
        }
    }
}

/// Lookup of document pages by index.
///
/// This is the only thing the replay engine needs from the document store.
pub trait PageSource {
    fn page(&self, index: usize) -> Option<Page>;
}

impl PageSource for [Page] {
    fn page(&self, index: usize) -> Option<Page> {
        self.iter().find(|p| p.index == index).cloned()
    }
}

impl PageSource for Vec<Page> {
    fn page(&self, index: usize) -> Option<Page> {
        self.as_slice().page(index)
    }
}
