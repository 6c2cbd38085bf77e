//! The drag-session state machine shared by the dock and folder containers.
//!
//! A [`DragMachine`] runs `idle → pressed → dragging → animating return →
//! idle` for one container. While dragging it keeps exactly one of a
//! placeholder slot, a pre-merge target or an armed drag-out, recomputed on
//! every pointer move against the snapshot captured when the drag started.
//! A release resolves that into a [`PendingAction`] and a landing position;
//! the action is only handed to [`DragCallbacks`] once the ghost lands, and
//! always after the machine is back to idle.

use std::time::Instant;

use springdock_core::math::Vec2;
use springdock_core::profiling::profile_function;

use super::animation::{PositionHandle, ReturnFlight};
use super::dwell::DwellTracker;
use super::session::{DragPhase, DragSession, PendingAction};
use crate::callbacks::DragCallbacks;
use crate::config::{ContainerCaps, DragConfig};
use crate::layout::{
    GridStrategy, HorizontalStrategy, LayoutSnapshot, LayoutSource, LayoutStrategy, closest_item,
    point_in_rect,
};
use crate::model::{DockItem, final_index, is_noop_slot, reorder};

/// Cell pitch assumed until a snapshot provides real metrics.
const DEFAULT_CELL_PITCH: f32 = 64.0;

/// Collaborators a machine talks to while handling one event.
pub struct DragEnv<'a> {
    /// Live layout of the machine's own container.
    pub layout: &'a dyn LayoutSource,
    pub ghost: &'a mut dyn PositionHandle,
    pub callbacks: &'a mut dyn DragCallbacks,
}

impl<'a> DragEnv<'a> {
    pub fn new(
        layout: &'a dyn LayoutSource,
        ghost: &'a mut dyn PositionHandle,
        callbacks: &'a mut dyn DragCallbacks,
    ) -> Self {
        Self {
            layout,
            ghost,
            callbacks,
        }
    }
}

/// Release-time overrides supplied by whoever coordinates containers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReleaseHints {
    /// Another container shows a placeholder for this drag; land there and
    /// commit [`PendingAction::DragToOpenFolder`].
    pub open_folder_target: Option<Vec2>,
    /// Landing spot for an armed drag-out.
    pub drag_out_target: Option<Vec2>,
}

/// How a release was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No gesture in progress.
    Ignored,
    /// Below the movement threshold; `on_click` fired.
    Click,
    /// Nothing to drop onto; the session ended without animation.
    Cancelled,
    /// The return flight started.
    Animating,
}

/// Placeholder shown for a drag owned by another container.
#[derive(Debug, Clone)]
struct ExternalPreview {
    snapshot: LayoutSnapshot,
    slot: Option<usize>,
}

/// Neighbor within merge distance that the dragged item may merge onto.
struct MergeCandidate<'a> {
    index: usize,
    item: &'a DockItem,
}

fn merge_candidate<'a>(
    session: &DragSession,
    snapshot: &LayoutSnapshot,
    items: &'a [DockItem],
    max_distance: f32,
) -> Option<MergeCandidate<'a>> {
    let hit = closest_item(session.pointer_position, snapshot, session.original_index)?;
    if hit.distance >= max_distance {
        return None;
    }
    let entry = snapshot.entry(hit.index)?;
    let item = items.iter().find(|item| item.id == entry.id)?;
    session.item.can_merge_onto(item).then_some(MergeCandidate {
        index: hit.index,
        item,
    })
}

/// Drag lifecycle for one container.
#[derive(Debug)]
pub struct DragMachine {
    name: &'static str,
    caps: ContainerCaps,
    config: DragConfig,
    bounds_buffer: f32,
    strategy: Box<dyn LayoutStrategy>,
    phase: DragPhase,
    session: Option<DragSession>,
    snapshot: Option<LayoutSnapshot>,
    dwell: DwellTracker,
    flight: Option<ReturnFlight>,
    last_frame: Option<Instant>,
    external: Option<ExternalPreview>,
}

impl DragMachine {
    pub fn new(
        name: &'static str,
        caps: ContainerCaps,
        strategy: Box<dyn LayoutStrategy>,
        config: DragConfig,
    ) -> Self {
        let bounds_buffer = if caps.contains(ContainerCaps::DRAG_OUT) {
            config.folder_buffer
        } else {
            config.dock_buffer
        };
        Self {
            name,
            caps,
            config,
            bounds_buffer,
            strategy,
            phase: DragPhase::Idle,
            session: None,
            snapshot: None,
            dwell: DwellTracker::new(),
            flight: None,
            last_frame: None,
            external: None,
        }
    }

    /// Machine for the horizontal dock row.
    pub fn dock(config: DragConfig) -> Self {
        Self::new(
            "dock",
            ContainerCaps::DOCK,
            Box::new(HorizontalStrategy::new(DEFAULT_CELL_PITCH)),
            config,
        )
    }

    /// Machine for an open folder grid.
    pub fn folder(config: DragConfig) -> Self {
        let strategy = GridStrategy::new(
            config.folder_columns,
            Vec2::splat(DEFAULT_CELL_PITCH),
            config.grid_insert_bias,
        );
        Self::new("folder", ContainerCaps::FOLDER, Box::new(strategy), config)
    }

    /// Override the buffer around the container's bounds.
    pub fn with_bounds_buffer(mut self, buffer: f32) -> Self {
        self.bounds_buffer = buffer;
        self
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn caps(&self) -> ContainerCaps {
        self.caps
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Whether a gesture (pressed, dragging or landing) is in progress.
    pub fn is_busy(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    pub fn placeholder_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.placeholder_index)
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.session.as_ref().map(|s| &s.pending_action)
    }

    /// Begin a gesture on `items[index]`.
    ///
    /// `item_origin` is the item's top-left in viewport coordinates. Returns
    /// `false` when a gesture is already running or the index is unknown.
    pub fn press(
        &mut self,
        items: &[DockItem],
        index: usize,
        pointer: Vec2,
        item_origin: Vec2,
    ) -> bool {
        if self.phase != DragPhase::Idle {
            tracing::debug!(container = self.name, phase = ?self.phase, "press ignored, machine busy");
            return false;
        }
        let Some(item) = items.get(index) else {
            tracing::warn!(container = self.name, index, len = items.len(), "press on unknown index");
            return false;
        };
        self.external = None;
        self.session = Some(DragSession::new(item.clone(), Some(index), pointer, item_origin));
        self.phase = DragPhase::Pressed;
        tracing::debug!(container = self.name, item = %item.id, index, "pressed");
        true
    }

    /// Feed a pointer move.
    ///
    /// `suppressed` means another container claims the pointer (or the
    /// pointer is somewhere this item may not go); all targets are cleared.
    pub fn pointer_move(
        &mut self,
        pointer: Vec2,
        now: Instant,
        items: &[DockItem],
        suppressed: bool,
        env: &mut DragEnv<'_>,
    ) -> DragPhase {
        profile_function!();
        let Some(session) = self.session.as_mut() else {
            return self.phase;
        };
        match self.phase {
            DragPhase::Pressed => {
                session.pointer_position = pointer;
                if !session.exceeds_threshold(self.config.drag_threshold) {
                    return self.phase;
                }
                self.begin_drag(items, env);
            }
            DragPhase::Dragging => session.pointer_position = pointer,
            DragPhase::Idle | DragPhase::AnimatingReturn => return self.phase,
        }

        if let Some(session) = self.session.as_mut() {
            session.suppressed = suppressed;
            env.ghost.set_position(session.ghost_position());
        }
        self.update_targets(now, items, env);
        self.phase
    }

    /// Re-evaluate dwell timers without pointer movement.
    pub fn tick(&mut self, now: Instant, items: &[DockItem], env: &mut DragEnv<'_>) {
        if self.phase == DragPhase::Dragging {
            self.update_targets(now, items, env);
        }
    }

    /// Feed a pointer release.
    pub fn release(
        &mut self,
        pointer: Vec2,
        now: Instant,
        items: &[DockItem],
        hints: ReleaseHints,
        env: &mut DragEnv<'_>,
    ) -> ReleaseOutcome {
        match self.phase {
            DragPhase::Pressed => {
                let session = self.session.take();
                self.reset();
                if let Some(session) = session {
                    tracing::debug!(container = self.name, item = %session.item.id, "click");
                    env.callbacks.on_click(&session.item);
                }
                return ReleaseOutcome::Click;
            }
            DragPhase::Dragging => {}
            DragPhase::Idle | DragPhase::AnimatingReturn => return ReleaseOutcome::Ignored,
        }

        let Some(session) = self.session.as_mut() else {
            self.reset();
            return ReleaseOutcome::Ignored;
        };
        session.pointer_position = pointer;
        let ghost = session.ghost_position();
        let snapshot = self.snapshot.as_ref();

        let resolved = if let Some(target) = hints.open_folder_target {
            Some((PendingAction::DragToOpenFolder, target))
        } else if let Some(index) = session.merge_target
            && let Some(entry) = snapshot.and_then(|s| s.entry(index))
            && let Some(target) = items.iter().find(|item| item.id == entry.id)
        {
            let action = if target.is_folder() {
                PendingAction::DropToFolder {
                    target: target.clone(),
                }
            } else {
                PendingAction::MergeIntoApp {
                    target: target.clone(),
                }
            };
            Some((action, entry.rect.origin()))
        } else if matches!(session.pending_action, PendingAction::DragOut { .. }) {
            Some((
                PendingAction::DragOut { position: pointer },
                hints.drag_out_target.unwrap_or(ghost),
            ))
        } else if let Some(slot) = session.placeholder_index
            && let Some(original) = session.original_index
        {
            let landing = final_index(original, slot);
            let target = env
                .layout
                .slot_rect(landing)
                .or_else(|| snapshot.and_then(|s| s.entry(landing)).map(|e| e.rect))
                .map(|rect| rect.origin())
                .unwrap_or(ghost);
            let action = if is_noop_slot(original, slot) || original >= items.len() {
                PendingAction::None
            } else {
                PendingAction::Reorder {
                    new_list: reorder(items, original, slot),
                }
            };
            Some((action, target))
        } else {
            None
        };

        let Some((action, target)) = resolved else {
            tracing::debug!(container = self.name, "release with nothing to drop onto, cancelling");
            self.reset();
            env.callbacks.on_drag_end();
            return ReleaseOutcome::Cancelled;
        };

        tracing::debug!(
            container = self.name,
            item = %session.item.id,
            action = action.label(),
            x = target.x,
            y = target.y,
            "release resolved"
        );
        session.pending_action = action;
        session.target_position = Some(target);
        self.flight = Some(ReturnFlight::new(ghost, target, &self.config, now));
        self.last_frame = Some(now);
        self.phase = DragPhase::AnimatingReturn;
        ReleaseOutcome::Animating
    }

    /// Advance the return flight by one animation frame.
    ///
    /// Returns `true` while more frames are needed.
    pub fn animation_frame(&mut self, now: Instant, env: &mut DragEnv<'_>) -> bool {
        if self.phase != DragPhase::AnimatingReturn {
            return false;
        }
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        let Some(flight) = self.flight.as_mut() else {
            self.complete(env);
            return false;
        };
        let position = flight.step(dt);
        env.ghost.set_position(position);
        if flight.is_settled() || flight.timed_out(now) {
            if !flight.is_settled() {
                tracing::debug!(container = self.name, "return flight timed out");
            }
            self.complete(env);
            return false;
        }
        true
    }

    /// The renderer reports that the ghost's transition finished.
    pub fn transition_end(&mut self, env: &mut DragEnv<'_>) {
        if self.phase == DragPhase::AnimatingReturn {
            self.complete(env);
        }
    }

    /// Abort the gesture without committing anything.
    pub fn cancel(&mut self, env: &mut DragEnv<'_>) {
        let notify = matches!(
            self.phase,
            DragPhase::Dragging | DragPhase::AnimatingReturn
        );
        if self.phase != DragPhase::Idle {
            tracing::debug!(container = self.name, phase = ?self.phase, "gesture cancelled");
        }
        self.reset();
        if notify {
            env.callbacks.on_drag_end();
        }
    }

    /// Show a placeholder for an item dragged in from another container.
    ///
    /// The layout is frozen on the first call and reused until
    /// [`clear_external`](Self::clear_external). Ignored while this machine
    /// runs its own gesture.
    pub fn preview_external(
        &mut self,
        pointer: Vec2,
        items: &[DockItem],
        layout: &dyn LayoutSource,
    ) -> Option<usize> {
        if self.phase != DragPhase::Idle {
            return None;
        }
        if self.external.is_none() {
            let snapshot = LayoutSnapshot::capture(layout, items.iter().map(|i| i.id.as_str()));
            self.strategy.calibrate(&snapshot);
            self.external = Some(ExternalPreview {
                snapshot,
                slot: None,
            });
        }
        let preview = self.external.as_mut()?;
        let slot = self.strategy.insert_index(pointer, &preview.snapshot);
        if preview.slot != Some(slot) {
            tracing::trace!(container = self.name, slot, "external placeholder moved");
        }
        preview.slot = Some(slot);
        Some(slot)
    }

    pub fn external_slot(&self) -> Option<usize> {
        self.external.as_ref().and_then(|p| p.slot)
    }

    pub fn clear_external(&mut self) {
        self.external = None;
    }

    /// Squeeze offset for the resting item at `index`.
    pub fn displacement(&self, index: usize) -> Vec2 {
        match (&self.session, &self.external) {
            (Some(session), _)
                if matches!(
                    self.phase,
                    DragPhase::Dragging | DragPhase::AnimatingReturn
                ) =>
            {
                self.strategy.displacement(
                    index,
                    session.placeholder_index,
                    session.original_index,
                    true,
                )
            }
            (_, Some(preview)) => self.strategy.displacement(index, preview.slot, None, true),
            _ => Vec2::ZERO,
        }
    }

    /// Squeeze offsets for the first `count` items.
    pub fn displacements(&self, count: usize) -> Vec<Vec2> {
        (0..count).map(|index| self.displacement(index)).collect()
    }

    fn begin_drag(&mut self, items: &[DockItem], env: &mut DragEnv<'_>) {
        let snapshot = LayoutSnapshot::capture(env.layout, items.iter().map(|i| i.id.as_str()));
        self.strategy.calibrate(&snapshot);
        self.snapshot = Some(snapshot);
        self.dwell.clear();
        self.phase = DragPhase::Dragging;
        if let Some(session) = &self.session {
            tracing::debug!(container = self.name, item = %session.item.id, "drag started");
            env.callbacks.on_drag_start(&session.item);
        }
    }

    fn update_targets(&mut self, now: Instant, items: &[DockItem], env: &mut DragEnv<'_>) {
        let (Some(session), Some(snapshot)) = (self.session.as_mut(), self.snapshot.as_ref()) else {
            return;
        };

        if session.suppressed {
            session.clear_targets();
            self.dwell.clear();
            return;
        }

        let pointer = session.pointer_position;
        let bounds = env
            .layout
            .container_rect()
            .or_else(|| snapshot.container().copied());
        if let Some(bounds) = bounds
            && !point_in_rect(pointer, &bounds, self.bounds_buffer)
        {
            let armed = matches!(session.pending_action, PendingAction::DragOut { .. });
            session.clear_targets();
            self.dwell.clear();
            if self.caps.contains(ContainerCaps::DRAG_OUT) {
                if !armed {
                    tracing::debug!(container = self.name, "drag-out armed");
                }
                session.pending_action = PendingAction::DragOut { position: pointer };
            }
            return;
        }
        if matches!(session.pending_action, PendingAction::DragOut { .. }) {
            tracing::debug!(container = self.name, "drag-out disarmed");
            session.pending_action = PendingAction::None;
        }

        let candidate = if self
            .caps
            .intersects(ContainerCaps::MERGE | ContainerCaps::HOVER_OPEN)
        {
            merge_candidate(session, snapshot, items, self.config.merge_distance)
        } else {
            None
        };

        if let Some(candidate) = candidate {
            let elapsed = self.dwell.observe(candidate.index, now);
            if session.merge_target.is_some_and(|t| t != candidate.index) {
                session.merge_target = None;
            }

            if self.caps.contains(ContainerCaps::HOVER_OPEN)
                && candidate.item.is_folder()
                && !session.item.is_folder()
                && elapsed > self.config.hover_open_delay()
            {
                if session.hover_opened.as_deref() != Some(candidate.item.id.as_str()) {
                    session.hover_opened = Some(candidate.item.id.clone());
                    session.clear_targets();
                    tracing::debug!(
                        container = self.name,
                        folder = %candidate.item.id,
                        "dwell opened folder"
                    );
                    env.callbacks
                        .on_hover_open_folder(&session.item, candidate.item);
                }
                return;
            }

            if self.caps.contains(ContainerCaps::MERGE)
                && elapsed > self.config.pre_merge_delay()
                && session.merge_target.is_none()
            {
                tracing::debug!(
                    container = self.name,
                    target = %candidate.item.id,
                    "pre-merge"
                );
                session.merge_target = Some(candidate.index);
                session.placeholder_index = None;
            }
            return;
        }

        self.dwell.clear();
        session.merge_target = None;
        session.hover_opened = None;
        let slot = self.strategy.insert_index(pointer, snapshot);
        if session.placeholder_index != Some(slot) {
            tracing::trace!(container = self.name, slot, "placeholder moved");
        }
        session.placeholder_index = Some(slot);
    }

    fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.session = None;
        self.snapshot = None;
        self.dwell.clear();
        self.flight = None;
        self.last_frame = None;
    }

    /// Land the flight: reset to idle, then commit.
    fn complete(&mut self, env: &mut DragEnv<'_>) {
        let session = self.session.take();
        let landing = self.flight.take().map(|mut flight| flight.finish());
        self.reset();

        let Some(session) = session else {
            return;
        };
        if let Some(position) = landing.or(session.target_position) {
            env.ghost.set_position(position);
        }
        tracing::debug!(
            container = self.name,
            item = %session.item.id,
            action = session.pending_action.label(),
            "committing"
        );

        let item = &session.item;
        match session.pending_action {
            PendingAction::Reorder { new_list } => env.callbacks.on_reorder(new_list),
            PendingAction::DropToFolder { target } => env.callbacks.on_drop_to_folder(item, &target),
            PendingAction::MergeIntoApp { target } => env.callbacks.on_merge_folder(item, &target),
            PendingAction::DragOut { position } => env.callbacks.on_drag_out(item, position),
            PendingAction::DragToOpenFolder => env.callbacks.on_drag_to_open_folder(item),
            PendingAction::None => {}
        }
        env.callbacks.on_drag_end();
    }
}
