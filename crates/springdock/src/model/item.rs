//! Dock items: apps and single-level folders.

use serde::{Deserialize, Serialize};

/// Variant tag of a [`DockItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    App,
    Folder,
}

/// A node in the two-level dock tree.
///
/// `items` is only present on folders and only ever holds apps; no operation
/// in this crate constructs a nested folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Opaque image reference (data URL or remote URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<DockItem>>,
}

impl DockItem {
    /// Create an app item.
    pub fn app(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            icon: None,
            kind: ItemKind::App,
            items: None,
        }
    }

    /// Create a folder holding `items`.
    pub fn folder(id: impl Into<String>, name: impl Into<String>, items: Vec<DockItem>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            icon: None,
            kind: ItemKind::Folder,
            items: Some(items),
        }
    }

    /// Set the navigation url.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }

    pub fn is_app(&self) -> bool {
        self.kind == ItemKind::App
    }

    /// Folder contents; empty for apps.
    pub fn children(&self) -> &[DockItem] {
        self.items.as_deref().unwrap_or(&[])
    }

    /// Mutable folder contents, or `None` for apps.
    pub fn children_mut(&mut self) -> Option<&mut Vec<DockItem>> {
        if self.is_folder() {
            Some(self.items.get_or_insert_with(Vec::new))
        } else {
            None
        }
    }

    /// Number of items in a folder (0 for apps).
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Whether `self` may be merged onto `target` during a drag.
    ///
    /// Apps merge onto apps (creating a folder) and drop into folders; a
    /// folder only merges into another folder by flattening. Nothing merges
    /// with itself.
    pub fn can_merge_onto(&self, target: &DockItem) -> bool {
        if self.id == target.id {
            return false;
        }
        match (self.kind, target.kind) {
            (ItemKind::App, _) => true,
            (ItemKind::Folder, ItemKind::Folder) => true,
            (ItemKind::Folder, ItemKind::App) => false,
        }
    }
}
