//! Cross-container coordination between the dock and an open folder view.
//!
//! [`DockCoordinator`] owns the item tree, one [`DragMachine`] per container
//! and the [`SharedDragState`] the two machines communicate through. Pointer
//! events go to whichever machine owns the gesture; region detection decides
//! whether the other container shows a placeholder for it. Commits reach the
//! model only after the owning machine has reset, and every model change is
//! followed by a check that the open folder still exists.

use std::collections::VecDeque;
use std::time::Instant;

use springdock_core::math::Vec2;
use springdock_input::{PointerEvent, PointerState, TimedPointerEvent};

use crate::callbacks::DragCallbacks;
use crate::config::DragConfig;
use crate::drag::{
    DetachedHandle, DragEnv, DragMachine, PendingAction, PositionHandle, Region, ReleaseHints,
    detect_region,
};
use crate::error::DockResult;
use crate::layout::{LayoutSnapshot, LayoutSource, linear_insert_index, point_in_rect};
use crate::model::{DockItem, DockModel, FolderChange, KeyValueStore};

/// State both containers read and write during a cross-container drag.
///
/// The folder writes the placeholder fields while it previews a dock drag;
/// the dock reads them on release to decide whether the drop belongs to the
/// folder. Only the coordinator mutates this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedDragState {
    /// The open folder currently shows a placeholder for a dock drag.
    pub folder_placeholder_active: bool,
    pub folder_placeholder_index: Option<usize>,
    /// Folder a dock drag last dwelled open.
    pub hovered_folder_id: Option<String>,
    pub open_folder_id: Option<String>,
    /// A drag is in progress in either container.
    pub drag_active: bool,
}

/// Notification for the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum DockEvent {
    /// The item tree changed; persist and re-render.
    ItemsChanged,
    FolderOpened { folder_id: String },
    FolderClosed { folder_id: String },
    /// An app was activated (clicked outside a drag).
    Clicked { item: DockItem },
    DragActiveChanged { active: bool },
}

/// Rendering-layer handles for one event.
pub struct DockSurfaces<'a> {
    pub dock: &'a dyn LayoutSource,
    /// Layout of the open folder view, if one is mounted.
    pub folder: Option<&'a dyn LayoutSource>,
    pub ghost: &'a mut dyn PositionHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Dock,
    Folder,
}

/// Callback payloads queued while a machine runs, applied once it returns.
#[derive(Debug, Clone, PartialEq)]
enum Commit {
    DragStart,
    DragEnd,
    Click(DockItem),
    Reorder(Vec<DockItem>),
    DropToFolder { item: DockItem, folder: DockItem },
    MergeFolder { item: DockItem, target: DockItem },
    DragToOpenFolder(DockItem),
    DragOut { item: DockItem, position: Vec2 },
    HoverOpenFolder { folder: DockItem },
}

#[derive(Debug, Default)]
struct CommitSink(Vec<Commit>);

impl DragCallbacks for CommitSink {
    fn on_drag_start(&mut self, _item: &DockItem) {
        self.0.push(Commit::DragStart);
    }

    fn on_drag_end(&mut self) {
        self.0.push(Commit::DragEnd);
    }

    fn on_click(&mut self, item: &DockItem) {
        self.0.push(Commit::Click(item.clone()));
    }

    fn on_reorder(&mut self, new_list: Vec<DockItem>) {
        self.0.push(Commit::Reorder(new_list));
    }

    fn on_drop_to_folder(&mut self, item: &DockItem, folder: &DockItem) {
        self.0.push(Commit::DropToFolder {
            item: item.clone(),
            folder: folder.clone(),
        });
    }

    fn on_merge_folder(&mut self, item: &DockItem, target: &DockItem) {
        self.0.push(Commit::MergeFolder {
            item: item.clone(),
            target: target.clone(),
        });
    }

    fn on_drag_to_open_folder(&mut self, item: &DockItem) {
        self.0.push(Commit::DragToOpenFolder(item.clone()));
    }

    fn on_drag_out(&mut self, item: &DockItem, position: Vec2) {
        self.0.push(Commit::DragOut {
            item: item.clone(),
            position,
        });
    }

    fn on_hover_open_folder(&mut self, _item: &DockItem, folder: &DockItem) {
        self.0.push(Commit::HoverOpenFolder {
            folder: folder.clone(),
        });
    }
}

fn folder_items<'a>(model: &'a DockModel, shared: &SharedDragState) -> &'a [DockItem] {
    shared
        .open_folder_id
        .as_deref()
        .and_then(|id| model.folder(id).ok())
        .map(DockItem::children)
        .unwrap_or(&[])
}

fn hit_test(layout: &dyn LayoutSource, point: Vec2, count: usize) -> Option<(usize, Vec2)> {
    layout
        .item_rects()
        .iter()
        .take(count)
        .enumerate()
        .find(|(_, rect)| point_in_rect(point, rect, 0.0))
        .map(|(index, rect)| (index, rect.origin()))
}

/// Owner of the dock tree and both drag machines.
#[derive(Debug)]
pub struct DockCoordinator {
    config: DragConfig,
    model: DockModel,
    dock: DragMachine,
    folder: DragMachine,
    shared: SharedDragState,
    edit_mode: bool,
    pointer: PointerState,
    /// Press outside edit mode, resolved to a click on release.
    pending_click: Option<(Origin, usize)>,
    /// Folder slot captured when a dock drag was released into the folder.
    folder_drop_slot: Option<usize>,
    /// Dock slot captured when a folder drag-out was released.
    drag_out_slot: Option<usize>,
    events: VecDeque<DockEvent>,
}

impl DockCoordinator {
    pub fn new(model: DockModel, config: DragConfig) -> Self {
        Self {
            dock: DragMachine::dock(config.clone()),
            folder: DragMachine::folder(config.clone()),
            config,
            model,
            shared: SharedDragState::default(),
            edit_mode: false,
            pointer: PointerState::new(),
            pending_click: None,
            folder_drop_slot: None,
            drag_out_slot: None,
            events: VecDeque::new(),
        }
    }

    pub fn model(&self) -> &DockModel {
        &self.model
    }

    pub fn shared(&self) -> &SharedDragState {
        &self.shared
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn dock_machine(&self) -> &DragMachine {
        &self.dock
    }

    pub fn folder_machine(&self) -> &DragMachine {
        &self.folder
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Enable or disable dragging. Leaving edit mode cancels any gesture.
    pub fn set_edit_mode(&mut self, enabled: bool, ghost: &mut dyn PositionHandle) {
        if self.edit_mode == enabled {
            return;
        }
        tracing::debug!(enabled, "edit mode changed");
        self.edit_mode = enabled;
        if !enabled {
            self.cancel_all(ghost);
        }
    }

    /// Next queued event.
    pub fn poll_event(&mut self) -> Option<DockEvent> {
        self.events.pop_front()
    }

    pub fn drain_events(&mut self) -> Vec<DockEvent> {
        self.events.drain(..).collect()
    }

    pub fn open_folder_id(&self) -> Option<&str> {
        self.shared.open_folder_id.as_deref()
    }

    /// Items of the open folder, empty when none is open.
    pub fn open_folder_items(&self) -> &[DockItem] {
        folder_items(&self.model, &self.shared)
    }

    /// Open the folder view for `folder_id`.
    pub fn open_folder(&mut self, folder_id: &str) -> DockResult<()> {
        self.model.folder(folder_id)?;
        if self.shared.open_folder_id.as_deref() == Some(folder_id) {
            return Ok(());
        }
        self.close_folder();
        tracing::debug!(folder = folder_id, "folder opened");
        self.shared.open_folder_id = Some(folder_id.to_string());
        self.events.push_back(DockEvent::FolderOpened {
            folder_id: folder_id.to_string(),
        });
        Ok(())
    }

    /// Close the folder view, if open.
    pub fn close_folder(&mut self) {
        let Some(folder_id) = self.shared.open_folder_id.take() else {
            return;
        };
        if self.folder.is_busy() {
            tracing::warn!(folder = %folder_id, "closing folder during a folder drag");
            let mut sink = CommitSink::default();
            {
                let mut ghost = DetachedHandle;
                let mut env = DragEnv::new(&NoLayout, &mut ghost, &mut sink);
                self.folder.cancel(&mut env);
            }
            self.apply(Origin::Folder, sink);
        }
        self.folder = DragMachine::folder(self.config.clone());
        self.dock.clear_external();
        self.shared.folder_placeholder_active = false;
        self.shared.folder_placeholder_index = None;
        self.folder_drop_slot = None;
        self.drag_out_slot = None;
        tracing::debug!(folder = %folder_id, "folder closed");
        self.events.push_back(DockEvent::FolderClosed { folder_id });
    }

    /// Squeeze offset for dock item `index`.
    pub fn dock_displacement(&self, index: usize) -> Vec2 {
        self.dock.displacement(index)
    }

    /// Squeeze offset for open-folder item `index`.
    pub fn folder_displacement(&self, index: usize) -> Vec2 {
        self.folder.displacement(index)
    }

    /// Delete an item from the dock or a folder.
    pub fn remove_item(&mut self, id: &str) -> DockResult<DockItem> {
        let (item, changes) = self.model.remove_item(id)?;
        self.after_mutation(&changes);
        Ok(item)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> DockResult<()> {
        self.model.rename_folder(id, name)?;
        self.events.push_back(DockEvent::ItemsChanged);
        Ok(())
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> DockResult<()> {
        self.model.save(store, key)
    }

    /// Route one pointer event.
    pub fn handle_pointer(&mut self, event: TimedPointerEvent, surfaces: &mut DockSurfaces<'_>) {
        self.pointer.handle(&event);
        let now = event.at;
        match event.event {
            PointerEvent::Down { position, .. } if event.event.is_primary() => {
                self.pointer_down(position, surfaces);
            }
            PointerEvent::Move { position } => self.pointer_move(position, now, surfaces),
            PointerEvent::Up { position, .. } if event.event.is_primary() => {
                self.pointer_up(position, now, surfaces);
            }
            PointerEvent::Cancel => self.cancel_all(surfaces.ghost),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }

    /// Re-evaluate dwell timers while the pointer rests.
    pub fn tick(&mut self, now: Instant, surfaces: &mut DockSurfaces<'_>) {
        let mut sink = CommitSink::default();
        if self.dock.is_dragging() {
            let mut env = DragEnv::new(surfaces.dock, &mut *surfaces.ghost, &mut sink);
            self.dock.tick(now, self.model.items(), &mut env);
            self.apply(Origin::Dock, sink);
        } else if self.folder.is_dragging()
            && let Some(layout) = surfaces.folder
        {
            let items = folder_items(&self.model, &self.shared);
            let mut env = DragEnv::new(layout, &mut *surfaces.ghost, &mut sink);
            self.folder.tick(now, items, &mut env);
            self.apply(Origin::Folder, sink);
        }
    }

    /// Advance any return flight. Returns `true` while frames are needed.
    pub fn animation_frame(&mut self, now: Instant, surfaces: &mut DockSurfaces<'_>) -> bool {
        let mut sink = CommitSink::default();
        let (origin, running) = if self.folder.is_busy() {
            let layout = surfaces.folder.unwrap_or(surfaces.dock);
            let mut env = DragEnv::new(layout, &mut *surfaces.ghost, &mut sink);
            (Origin::Folder, self.folder.animation_frame(now, &mut env))
        } else {
            let mut env = DragEnv::new(surfaces.dock, &mut *surfaces.ghost, &mut sink);
            (Origin::Dock, self.dock.animation_frame(now, &mut env))
        };
        self.apply(origin, sink);
        running
    }

    /// The renderer's ghost transition finished.
    pub fn transition_end(&mut self, surfaces: &mut DockSurfaces<'_>) {
        let mut sink = CommitSink::default();
        let origin = if self.folder.is_busy() {
            let layout = surfaces.folder.unwrap_or(surfaces.dock);
            let mut env = DragEnv::new(layout, &mut *surfaces.ghost, &mut sink);
            self.folder.transition_end(&mut env);
            Origin::Folder
        } else {
            let mut env = DragEnv::new(surfaces.dock, &mut *surfaces.ghost, &mut sink);
            self.dock.transition_end(&mut env);
            Origin::Dock
        };
        self.apply(origin, sink);
    }

    fn pointer_down(&mut self, position: Vec2, surfaces: &mut DockSurfaces<'_>) {
        if self.dock.is_busy() || self.folder.is_busy() {
            return;
        }

        let folder_hit = surfaces.folder.and_then(|layout| {
            let count = folder_items(&self.model, &self.shared).len();
            hit_test(layout, position, count)
        });
        let (origin, index, item_origin) = match folder_hit {
            Some((index, origin)) => (Origin::Folder, index, origin),
            None => match hit_test(surfaces.dock, position, self.model.len()) {
                Some((index, origin)) => (Origin::Dock, index, origin),
                None => return,
            },
        };

        if !self.edit_mode {
            self.pending_click = Some((origin, index));
            return;
        }
        match origin {
            Origin::Dock => {
                self.dock
                    .press(self.model.items(), index, position, item_origin);
            }
            Origin::Folder => {
                let items = folder_items(&self.model, &self.shared);
                self.folder.press(items, index, position, item_origin);
            }
        }
    }

    fn pointer_move(&mut self, position: Vec2, now: Instant, surfaces: &mut DockSurfaces<'_>) {
        if self.dock.is_busy() {
            self.dock_drag_move(position, now, surfaces);
        } else if self.folder.is_busy() {
            self.folder_drag_move(position, now, surfaces);
        }
    }

    fn dock_drag_move(&mut self, position: Vec2, now: Instant, surfaces: &mut DockSurfaces<'_>) {
        let dragged_is_folder = self
            .dock
            .session()
            .is_some_and(|session| session.item.is_folder());
        let folder_rect = surfaces.folder.and_then(|layout| layout.container_rect());
        let region = detect_region(
            position,
            surfaces.dock.container_rect().as_ref(),
            folder_rect.as_ref(),
            dragged_is_folder,
            self.config.region_buffer,
        );
        let over_folder_view = folder_rect.is_some_and(|rect| rect.contains(position));
        let suppressed = region == Region::Folder || (dragged_is_folder && over_folder_view);

        let mut sink = CommitSink::default();
        {
            let mut env = DragEnv::new(surfaces.dock, &mut *surfaces.ghost, &mut sink);
            self.dock
                .pointer_move(position, now, self.model.items(), suppressed, &mut env);
        }
        self.apply(Origin::Dock, sink);

        let folder_layout = surfaces.folder;
        match folder_layout {
            Some(layout) if region == Region::Folder && self.dock.is_dragging() => {
                let items = folder_items(&self.model, &self.shared);
                let slot = self.folder.preview_external(position, items, layout);
                self.shared.folder_placeholder_active = slot.is_some();
                self.shared.folder_placeholder_index = slot;
            }
            _ => self.clear_folder_placeholder(),
        }
    }

    fn folder_drag_move(&mut self, position: Vec2, now: Instant, surfaces: &mut DockSurfaces<'_>) {
        let Some(layout) = surfaces.folder else {
            tracing::warn!("folder layout unavailable mid-drag, cancelling");
            self.cancel_all(surfaces.ghost);
            return;
        };

        let mut sink = CommitSink::default();
        {
            let items = folder_items(&self.model, &self.shared);
            let mut env = DragEnv::new(layout, &mut *surfaces.ghost, &mut sink);
            self.folder.pointer_move(position, now, items, false, &mut env);
        }
        self.apply(Origin::Folder, sink);

        let dragging_out = matches!(
            self.folder.pending_action(),
            Some(PendingAction::DragOut { .. })
        );
        let over_dock = detect_region(
            position,
            surfaces.dock.container_rect().as_ref(),
            None,
            false,
            self.config.region_buffer,
        ) == Region::Dock;
        if dragging_out && over_dock {
            self.dock
                .preview_external(position, self.model.items(), surfaces.dock);
        } else {
            self.dock.clear_external();
        }
    }

    fn pointer_up(&mut self, position: Vec2, now: Instant, surfaces: &mut DockSurfaces<'_>) {
        if let Some((origin, index)) = self.pending_click.take() {
            let item = match origin {
                Origin::Dock => self.model.item_at(index).ok(),
                Origin::Folder => folder_items(&self.model, &self.shared).get(index),
            }
            .cloned();
            match item {
                Some(item) => self.activate(item),
                None => tracing::warn!(index, "clicked item vanished before release"),
            }
            return;
        }

        if self.dock.is_busy() {
            let mut hints = ReleaseHints::default();
            if self.shared.folder_placeholder_active {
                let slot = self.shared.folder_placeholder_index;
                hints.open_folder_target = Some(
                    slot.zip(surfaces.folder)
                        .and_then(|(slot, layout)| layout.slot_rect(slot))
                        .map(|rect| rect.origin())
                        .unwrap_or(position),
                );
                self.folder_drop_slot = slot;
            }
            let mut sink = CommitSink::default();
            {
                let mut env = DragEnv::new(surfaces.dock, &mut *surfaces.ghost, &mut sink);
                self.dock
                    .release(position, now, self.model.items(), hints, &mut env);
            }
            self.apply(Origin::Dock, sink);
        } else if self.folder.is_busy() {
            let Some(layout) = surfaces.folder else {
                self.cancel_all(surfaces.ghost);
                return;
            };
            let mut hints = ReleaseHints::default();
            if matches!(
                self.folder.pending_action(),
                Some(PendingAction::DragOut { .. })
            ) {
                let slot = self.dock.external_slot().unwrap_or_else(|| {
                    let snapshot = LayoutSnapshot::capture(
                        surfaces.dock,
                        self.model.items().iter().map(|i| i.id.as_str()),
                    );
                    linear_insert_index(position.x, &snapshot, snapshot.len())
                });
                hints.drag_out_target = surfaces.dock.slot_rect(slot).map(|rect| rect.origin());
                self.drag_out_slot = Some(slot);
            }
            let mut sink = CommitSink::default();
            {
                let items = folder_items(&self.model, &self.shared);
                let mut env = DragEnv::new(layout, &mut *surfaces.ghost, &mut sink);
                self.folder.release(position, now, items, hints, &mut env);
            }
            self.apply(Origin::Folder, sink);
        }
    }

    fn cancel_all(&mut self, ghost: &mut dyn PositionHandle) {
        self.pending_click = None;
        let mut sink = CommitSink::default();
        {
            let mut env = DragEnv::new(&NoLayout, &mut *ghost, &mut sink);
            self.dock.cancel(&mut env);
            self.folder.cancel(&mut env);
        }
        self.dock.clear_external();
        self.clear_folder_placeholder();
        self.apply(Origin::Dock, sink);
    }

    fn clear_folder_placeholder(&mut self) {
        self.folder.clear_external();
        self.shared.folder_placeholder_active = false;
        self.shared.folder_placeholder_index = None;
    }

    /// Click outside a drag: folders open, apps are reported.
    fn activate(&mut self, item: DockItem) {
        if item.is_folder() {
            if let Err(err) = self.open_folder(&item.id) {
                tracing::warn!(folder = %item.id, %err, "cannot open clicked folder");
            }
        } else {
            self.events.push_back(DockEvent::Clicked { item });
        }
    }

    fn apply(&mut self, origin: Origin, sink: CommitSink) {
        for commit in sink.0 {
            self.apply_commit(origin, commit);
        }
    }

    fn apply_commit(&mut self, origin: Origin, commit: Commit) {
        let result = match commit {
            Commit::DragStart => {
                self.set_drag_active(true);
                return;
            }
            Commit::DragEnd => {
                self.set_drag_active(false);
                self.dock.clear_external();
                self.clear_folder_placeholder();
                self.folder_drop_slot = None;
                self.drag_out_slot = None;
                return;
            }
            Commit::Click(item) => {
                self.activate(item);
                return;
            }
            Commit::HoverOpenFolder { folder } => {
                self.shared.hovered_folder_id = Some(folder.id.clone());
                if let Err(err) = self.open_folder(&folder.id) {
                    tracing::warn!(folder = %folder.id, %err, "cannot open hovered folder");
                }
                return;
            }
            Commit::Reorder(list) => match origin {
                Origin::Dock => Ok(self.model.set_items(list)),
                Origin::Folder => match self.shared.open_folder_id.clone() {
                    Some(folder_id) => self.model.set_folder_items(&folder_id, list),
                    None => {
                        tracing::warn!("folder reorder with no open folder, dropped");
                        return;
                    }
                },
            },
            Commit::DropToFolder { item, folder } => {
                self.model.drop_into_folder(&item.id, &folder.id)
            }
            Commit::MergeFolder { item, target } => self
                .model
                .merge_into_app(&item.id, &target.id)
                .map(|(_, changes)| changes),
            Commit::DragToOpenFolder(item) => match self.shared.open_folder_id.clone() {
                Some(folder_id) => {
                    let slot = self.folder_drop_slot.take();
                    self.model.move_into_folder(&item.id, &folder_id, slot)
                }
                None => {
                    tracing::warn!(item = %item.id, "drop into folder after it closed, dropped");
                    return;
                }
            },
            Commit::DragOut { item, position } => match self.shared.open_folder_id.clone() {
                Some(folder_id) => {
                    let slot = self.drag_out_slot.take().unwrap_or(self.model.len());
                    tracing::debug!(item = %item.id, x = position.x, y = position.y, slot, "drag-out");
                    self.model.move_out_of_folder(&folder_id, &item.id, slot)
                }
                None => {
                    tracing::warn!(item = %item.id, "drag-out with no open folder, dropped");
                    return;
                }
            },
        };

        match result {
            Ok(changes) => self.after_mutation(&changes),
            Err(err) => tracing::warn!(%err, "commit rejected by model"),
        }
    }

    fn set_drag_active(&mut self, active: bool) {
        if self.shared.drag_active != active {
            self.shared.drag_active = active;
            self.events.push_back(DockEvent::DragActiveChanged { active });
        }
    }

    /// Report the change and close the folder view if its folder is gone.
    fn after_mutation(&mut self, changes: &[FolderChange]) {
        self.events.push_back(DockEvent::ItemsChanged);
        let Some(open) = self.shared.open_folder_id.clone() else {
            return;
        };
        let vanished = changes.iter().any(|c| c.folder_id() == open);
        if vanished || self.model.folder(&open).is_err() {
            tracing::debug!(folder = %open, "open folder dissolved");
            self.close_folder();
        }
    }
}

/// Layout with nothing in it, for cancellations that need no geometry.
struct NoLayout;

impl LayoutSource for NoLayout {
    fn container_rect(&self) -> Option<springdock_core::geometry::Rect> {
        None
    }

    fn item_rects(&self) -> Vec<springdock_core::geometry::Rect> {
        Vec::new()
    }
}
