//! Dock contents and the structural mutations drag commits resolve to.
//!
//! [`DockModel`] plays the collaborator role: the drag machines only describe
//! what should happen (a new order, a merge target, a drag-out position) and
//! the model applies it, re-checking the folder invariants after every change.

pub mod item;
pub mod list;
pub mod store;

pub use item::{DockItem, ItemKind};
pub use list::{FolderChange, final_index, is_noop_slot, normalize_folders, reorder};
pub use store::{KeyValueStore, MemoryStore};

use crate::error::{DockError, DockResult};

/// Where an item lives in the dock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLocation {
    /// Top-level dock position.
    Dock(usize),
    /// Inside the folder at dock position `folder`, at `index`.
    Folder { folder: usize, index: usize },
}

/// Owner of the dock item tree.
#[derive(Debug, Clone, Default)]
pub struct DockModel {
    items: Vec<DockItem>,
    next_folder_seq: u64,
}

impl DockModel {
    /// Create a model, normalizing folders on the way in.
    pub fn new(mut items: Vec<DockItem>) -> Self {
        let changes = normalize_folders(&mut items);
        if !changes.is_empty() {
            tracing::warn!(count = changes.len(), "normalized invalid folders on load");
        }
        Self {
            items,
            next_folder_seq: 1,
        }
    }

    /// Top-level items in dock order.
    pub fn items(&self) -> &[DockItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DockItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-level item at `index`.
    pub fn item_at(&self, index: usize) -> DockResult<&DockItem> {
        self.items.get(index).ok_or(DockError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Locate an item anywhere in the tree.
    pub fn position_of(&self, id: &str) -> Option<ItemLocation> {
        for (dock_index, item) in self.items.iter().enumerate() {
            if item.id == id {
                return Some(ItemLocation::Dock(dock_index));
            }
            if let Some(index) = item.children().iter().position(|c| c.id == id) {
                return Some(ItemLocation::Folder {
                    folder: dock_index,
                    index,
                });
            }
        }
        None
    }

    /// Find an item anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&DockItem> {
        match self.position_of(id)? {
            ItemLocation::Dock(index) => self.items.get(index),
            ItemLocation::Folder { folder, index } => self.items[folder].children().get(index),
        }
    }

    /// Look up a top-level folder.
    pub fn folder(&self, id: &str) -> DockResult<&DockItem> {
        let item = self
            .items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| DockError::ItemNotFound(id.to_string()))?;
        if item.is_folder() {
            Ok(item)
        } else {
            Err(DockError::NotAFolder(id.to_string()))
        }
    }

    /// Replace the top-level list (reorder commit).
    pub fn set_items(&mut self, items: Vec<DockItem>) -> Vec<FolderChange> {
        self.items = items;
        normalize_folders(&mut self.items)
    }

    /// Replace a folder's contents (folder reorder commit).
    pub fn set_folder_items(
        &mut self,
        folder_id: &str,
        items: Vec<DockItem>,
    ) -> DockResult<Vec<FolderChange>> {
        let index = self.folder_index(folder_id)?;
        if let Some(nested) = items.iter().find(|item| item.is_folder()) {
            return Err(DockError::NestedFolder(nested.id.clone()));
        }
        self.items[index].items = Some(items);
        Ok(normalize_folders(&mut self.items))
    }

    /// Drop `item_id` into the folder `folder_id`.
    ///
    /// An app is appended. A folder is flattened: its items are appended and
    /// the emptied source folder disappears.
    pub fn drop_into_folder(
        &mut self,
        item_id: &str,
        folder_id: &str,
    ) -> DockResult<Vec<FolderChange>> {
        if item_id == folder_id {
            return Err(DockError::SelfMerge(item_id.to_string()));
        }
        self.folder_index(folder_id)?;
        let item = self.take_item(item_id)?;
        let index = self.folder_index(folder_id)?;

        let children = self.items[index]
            .children_mut()
            .ok_or_else(|| DockError::NotAFolder(folder_id.to_string()))?;
        if item.is_folder() {
            tracing::debug!(source = %item.id, target = folder_id, "flattening folder into folder");
            children.extend(item.items.unwrap_or_default());
        } else {
            children.push(item);
        }
        Ok(normalize_folders(&mut self.items))
    }

    /// Merge app `item_id` onto app `target_id`, creating a folder in the
    /// target's place holding `[target, item]`.
    ///
    /// Returns the new folder's id.
    pub fn merge_into_app(
        &mut self,
        item_id: &str,
        target_id: &str,
    ) -> DockResult<(String, Vec<FolderChange>)> {
        if item_id == target_id {
            return Err(DockError::SelfMerge(item_id.to_string()));
        }
        let source = self
            .find(item_id)
            .ok_or_else(|| DockError::ItemNotFound(item_id.to_string()))?;
        if source.is_folder() {
            return Err(DockError::NestedFolder(item_id.to_string()));
        }
        match self.top_level_index(target_id) {
            Some(index) if self.items[index].is_folder() => {
                return Err(DockError::NestedFolder(target_id.to_string()));
            }
            Some(_) => {}
            None => return Err(DockError::ItemNotFound(target_id.to_string())),
        }

        let item = self.take_item(item_id)?;
        let index = self
            .top_level_index(target_id)
            .ok_or_else(|| DockError::ItemNotFound(target_id.to_string()))?;

        let folder_id = self.next_folder_id();
        let target = std::mem::replace(
            &mut self.items[index],
            DockItem::folder(folder_id.clone(), "Folder", Vec::new()),
        );
        self.items[index].items = Some(vec![target, item]);
        tracing::debug!(folder = %folder_id, "created folder from merge");

        let changes = normalize_folders(&mut self.items);
        Ok((folder_id, changes))
    }

    /// Move an item out of a folder onto the dock at insertion slot `dock_slot`.
    pub fn move_out_of_folder(
        &mut self,
        folder_id: &str,
        item_id: &str,
        dock_slot: usize,
    ) -> DockResult<Vec<FolderChange>> {
        let folder_index = self.folder_index(folder_id)?;
        let children = self.items[folder_index]
            .children_mut()
            .ok_or_else(|| DockError::NotAFolder(folder_id.to_string()))?;
        let child_index = children
            .iter()
            .position(|c| c.id == item_id)
            .ok_or_else(|| DockError::ItemNotFound(item_id.to_string()))?;
        let item = children.remove(child_index);

        let slot = dock_slot.min(self.items.len());
        self.items.insert(slot, item);
        Ok(normalize_folders(&mut self.items))
    }

    /// Move a dock item into a folder at insertion slot `slot` (append when `None`).
    pub fn move_into_folder(
        &mut self,
        item_id: &str,
        folder_id: &str,
        slot: Option<usize>,
    ) -> DockResult<Vec<FolderChange>> {
        if item_id == folder_id {
            return Err(DockError::SelfMerge(item_id.to_string()));
        }
        self.folder_index(folder_id)?;
        match self.find(item_id) {
            Some(item) if item.is_folder() => {
                return Err(DockError::NestedFolder(item_id.to_string()));
            }
            Some(_) => {}
            None => return Err(DockError::ItemNotFound(item_id.to_string())),
        }

        let item = self.take_item(item_id)?;
        let index = self.folder_index(folder_id)?;
        let children = self.items[index]
            .children_mut()
            .ok_or_else(|| DockError::NotAFolder(folder_id.to_string()))?;
        let slot = slot.unwrap_or(children.len()).min(children.len());
        children.insert(slot, item);
        Ok(normalize_folders(&mut self.items))
    }

    /// Delete an item from the dock or from inside a folder.
    pub fn remove_item(&mut self, id: &str) -> DockResult<(DockItem, Vec<FolderChange>)> {
        let item = self.take_item(id)?;
        let changes = normalize_folders(&mut self.items);
        Ok((item, changes))
    }

    /// Rename a folder.
    pub fn rename_folder(&mut self, id: &str, name: impl Into<String>) -> DockResult<()> {
        let index = self.folder_index(id)?;
        self.items[index].name = name.into();
        Ok(())
    }

    /// Load dock contents persisted under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> DockResult<Option<Self>> {
        let Some(raw) = store.get(key) else {
            return Ok(None);
        };
        let items: Vec<DockItem> = serde_json::from_str(&raw)?;
        Ok(Some(Self::new(items)))
    }

    /// Persist dock contents under `key`.
    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> DockResult<()> {
        let raw = serde_json::to_string(&self.items)?;
        store.set(key, raw);
        Ok(())
    }

    fn top_level_index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn folder_index(&self, id: &str) -> DockResult<usize> {
        let index = self
            .top_level_index(id)
            .ok_or_else(|| DockError::ItemNotFound(id.to_string()))?;
        if self.items[index].is_folder() {
            Ok(index)
        } else {
            Err(DockError::NotAFolder(id.to_string()))
        }
    }

    /// Detach an item from wherever it lives, without normalizing.
    fn take_item(&mut self, id: &str) -> DockResult<DockItem> {
        match self.position_of(id) {
            Some(ItemLocation::Dock(index)) => Ok(self.items.remove(index)),
            Some(ItemLocation::Folder { folder, index }) => {
                let folder = &mut self.items[folder];
                let folder_id = folder.id.clone();
                folder
                    .children_mut()
                    .map(|children| children.remove(index))
                    .ok_or(DockError::NotAFolder(folder_id))
            }
            None => Err(DockError::ItemNotFound(id.to_string())),
        }
    }

    fn next_folder_id(&mut self) -> String {
        loop {
            let candidate = format!("folder-{}", self.next_folder_seq);
            self.next_folder_seq += 1;
            if self.position_of(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
