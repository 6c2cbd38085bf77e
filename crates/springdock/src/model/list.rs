//! Pure list helpers shared by the drag machine and the model.

use super::item::DockItem;

/// Structural change made by [`normalize_folders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderChange {
    /// The folder had no items left and was deleted.
    Removed { folder_id: String },
    /// The folder had a single item left and was replaced by it in place.
    Dissolved { folder_id: String, into: String },
}

impl FolderChange {
    /// Id of the folder that no longer exists.
    pub fn folder_id(&self) -> &str {
        match self {
            FolderChange::Removed { folder_id } | FolderChange::Dissolved { folder_id, .. } => {
                folder_id
            }
        }
    }
}

/// Final resting index of an item moved from `from` into insertion slot `slot`.
///
/// Slots are the gaps between items (`0..=len`); removing the item first
/// shifts every later slot down by one.
pub fn final_index(from: usize, slot: usize) -> usize {
    if slot > from { slot - 1 } else { slot }
}

/// Whether dropping the item at `from` into `slot` leaves the list unchanged.
pub fn is_noop_slot(from: usize, slot: usize) -> bool {
    slot == from || slot == from + 1
}

/// Move the item at `from` into insertion slot `slot`.
///
/// `slot` is clamped to the list length. Out-of-range sources return an
/// unchanged copy.
pub fn reorder<T: Clone>(items: &[T], from: usize, slot: usize) -> Vec<T> {
    let mut result = items.to_vec();
    if from >= result.len() {
        return result;
    }
    let slot = slot.min(result.len());
    let moved = result.remove(from);
    result.insert(final_index(from, slot), moved);
    result
}

/// Enforce the folder invariants on a top-level list, in place.
///
/// - a folder with no items is removed;
/// - a folder with exactly one item is replaced by that item at the same position;
/// - folders found inside folders are flattened into their parent.
///
/// Returns the changes made, in list order.
pub fn normalize_folders(items: &mut Vec<DockItem>) -> Vec<FolderChange> {
    let mut changes = Vec::new();
    let mut index = 0;
    while index < items.len() {
        if !items[index].is_folder() {
            index += 1;
            continue;
        }

        if let Some(children) = items[index].children_mut()
            && children.iter().any(DockItem::is_folder)
        {
            let flattened = std::mem::take(children)
                .into_iter()
                .flat_map(|child| {
                    if child.is_folder() {
                        child.items.unwrap_or_default()
                    } else {
                        vec![child]
                    }
                })
                .collect();
            *children = flattened;
        }

        match items[index].child_count() {
            0 => {
                let folder = items.remove(index);
                tracing::debug!(folder = %folder.id, "removed empty folder");
                changes.push(FolderChange::Removed {
                    folder_id: folder.id,
                });
            }
            1 => {
                let folder_id = items[index].id.clone();
                let survivor = items[index]
                    .items
                    .take()
                    .and_then(|mut children| children.pop());
                if let Some(survivor) = survivor {
                    tracing::debug!(folder = %folder_id, item = %survivor.id, "dissolved single-item folder");
                    changes.push(FolderChange::Dissolved {
                        folder_id,
                        into: survivor.id.clone(),
                    });
                    items[index] = survivor;
                }
                index += 1;
            }
            _ => index += 1,
        }
    }
    changes
}
