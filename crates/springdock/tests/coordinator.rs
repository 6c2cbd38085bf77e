//! Dock and folder view coordination, driven by pointer events.

use std::time::{Duration, Instant};

use springdock::{
    DockCoordinator, DockEvent, DockItem, DockModel, DockSurfaces, DragConfig, LayoutSource,
    MemoryStore,
};
use springdock_core::math::Vec2;
use springdock_input::{PointerButton, PointerEvent, TimedPointerEvent};
use springdock_test_utils::{FixedLayout, RecordingGhost, apps, ids};

/// Dock row at y = 500 (centers x = 25, 85, 145, ...) and a folder grid at
/// (100, 100) whose container spans (100, 100) to (210, 200).
struct Harness {
    dock: DockCoordinator,
    dock_layout: FixedLayout,
    folder_layout: Option<FixedLayout>,
    ghost: RecordingGhost,
    now: Instant,
}

impl Harness {
    fn new(items: Vec<DockItem>) -> Self {
        let model = DockModel::new(items);
        let dock_layout = FixedLayout::row(model.len(), Vec2::new(0.0, 500.0), 50.0, 10.0);
        Self {
            dock: DockCoordinator::new(model, DragConfig::default()),
            dock_layout,
            folder_layout: None,
            ghost: RecordingGhost::new(),
            now: Instant::now(),
        }
    }

    fn editing(mut self) -> Self {
        self.dock.set_edit_mode(true, &mut self.ghost);
        self
    }

    /// Open `folder_id` and mount a grid for its items.
    fn open(&mut self, folder_id: &str) {
        self.dock.open_folder(folder_id).expect("folder exists");
        self.remount();
    }

    /// Re-derive both layouts from the model, as a renderer would.
    fn remount(&mut self) {
        self.dock_layout = FixedLayout::row(
            self.dock.model().len(),
            Vec2::new(0.0, 500.0),
            50.0,
            10.0,
        );
        self.folder_layout = self.dock.open_folder_id().map(|_| {
            let count = self.dock.open_folder_items().len();
            FixedLayout::grid(count, 4, Vec2::new(100.0, 100.0), 50.0, 10.0)
        });
    }

    fn send(&mut self, event: PointerEvent) {
        let mut surfaces = DockSurfaces {
            dock: &self.dock_layout,
            folder: self.folder_layout.as_ref().map(|l| l as &dyn LayoutSource),
            ghost: &mut self.ghost,
        };
        self.dock
            .handle_pointer(TimedPointerEvent::new(event, self.now), &mut surfaces);
    }

    fn down(&mut self, position: Vec2) {
        self.send(PointerEvent::Down {
            position,
            button: PointerButton::Primary,
        });
    }

    fn move_to(&mut self, position: Vec2) {
        self.send(PointerEvent::Move { position });
    }

    fn up(&mut self, position: Vec2) {
        self.send(PointerEvent::Up {
            position,
            button: PointerButton::Primary,
        });
    }

    fn wait(&mut self, millis: u64) {
        self.now += Duration::from_millis(millis);
        let mut surfaces = DockSurfaces {
            dock: &self.dock_layout,
            folder: self.folder_layout.as_ref().map(|l| l as &dyn LayoutSource),
            ghost: &mut self.ghost,
        };
        self.dock.tick(self.now, &mut surfaces);
    }

    /// Run animation frames until the return flight lands.
    fn settle(&mut self) {
        for _ in 0..200 {
            self.now += Duration::from_millis(16);
            let mut surfaces = DockSurfaces {
                dock: &self.dock_layout,
                folder: self.folder_layout.as_ref().map(|l| l as &dyn LayoutSource),
                ghost: &mut self.ghost,
            };
            if !self.dock.animation_frame(self.now, &mut surfaces) {
                break;
            }
        }
    }

    fn top_ids(&self) -> Vec<String> {
        ids(self.dock.model().items())
    }

    fn folder_ids(&self, folder_id: &str) -> Vec<String> {
        self.dock
            .model()
            .folder(folder_id)
            .map(|folder| ids(folder.children()))
            .unwrap_or_default()
    }
}

fn dock_with_folder() -> Vec<DockItem> {
    vec![
        DockItem::app("A", "A"),
        DockItem::folder("F", "Folder", apps(&["P", "Q"])),
        DockItem::app("B", "B"),
    ]
}

#[test]
fn test_reorder_through_pointer_events() {
    let mut h = Harness::new(apps(&["A", "B", "C", "D"])).editing();
    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(175.0, 525.0));
    assert_eq!(h.dock.dock_machine().placeholder_index(), Some(3));
    assert_eq!(h.dock.dock_displacement(1), Vec2::new(-60.0, 0.0));
    assert!(h.dock.shared().drag_active);

    h.up(Vec2::new(175.0, 525.0));
    // Committed only after landing.
    assert_eq!(h.top_ids(), ["A", "B", "C", "D"]);
    h.settle();
    assert_eq!(h.top_ids(), ["B", "C", "A", "D"]);

    let events = h.dock.drain_events();
    assert_eq!(
        events,
        vec![
            DockEvent::DragActiveChanged { active: true },
            DockEvent::ItemsChanged,
            DockEvent::DragActiveChanged { active: false },
        ]
    );
    assert!(!h.dock.shared().drag_active);
}

#[test]
fn test_drag_out_dissolves_single_item_folder() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");
    h.dock.drain_events();

    // P sits in the folder's first cell.
    h.down(Vec2::new(125.0, 125.0));
    h.move_to(Vec2::new(125.0, 150.0));
    assert!(h.dock.folder_machine().is_dragging());

    // Past the folder's buffered bounds and over the dock.
    let release = Vec2::new(125.0, 480.0);
    h.move_to(release);
    assert_eq!(h.dock.dock_machine().external_slot(), Some(2));
    assert_eq!(h.dock.dock_displacement(2), Vec2::new(60.0, 0.0));

    h.up(release);
    h.settle();

    assert_eq!(h.top_ids(), ["A", "Q", "P", "B"]);
    assert!(h.dock.model().find("F").is_none());
    assert_eq!(h.dock.open_folder_id(), None);
    let events = h.dock.drain_events();
    assert!(events.contains(&DockEvent::ItemsChanged));
    assert!(events.contains(&DockEvent::FolderClosed {
        folder_id: "F".into()
    }));
    assert_eq!(
        events.last(),
        Some(&DockEvent::DragActiveChanged { active: false })
    );
}

#[test]
fn test_drag_into_open_folder() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");

    h.down(Vec2::new(25.0, 525.0));
    // P's center in the folder grid.
    h.move_to(Vec2::new(125.0, 125.0));
    let shared = h.dock.shared();
    assert!(shared.folder_placeholder_active);
    assert_eq!(shared.folder_placeholder_index, Some(0));
    assert_eq!(h.dock.dock_machine().placeholder_index(), None);
    assert_eq!(h.dock.folder_displacement(0), Vec2::new(60.0, 0.0));

    h.up(Vec2::new(125.0, 125.0));
    h.settle();

    assert_eq!(h.top_ids(), ["F", "B"]);
    assert_eq!(h.folder_ids("F"), ["A", "P", "Q"]);
    assert_eq!(h.dock.open_folder_id(), Some("F"));
    assert!(!h.dock.shared().folder_placeholder_active);
    assert_eq!(h.dock.shared().folder_placeholder_index, None);
}

#[test]
fn test_leaving_folder_view_clears_its_placeholder() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");

    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(125.0, 125.0));
    assert!(h.dock.shared().folder_placeholder_active);

    h.move_to(Vec2::new(175.0, 525.0));
    assert!(!h.dock.shared().folder_placeholder_active);
    assert_eq!(h.dock.folder_displacement(0), Vec2::ZERO);
    assert_eq!(h.dock.dock_machine().placeholder_index(), Some(3));
}

#[test]
fn test_dragged_folder_ignores_folder_view() {
    let mut h = Harness::new(vec![
        DockItem::folder("G", "Games", apps(&["X", "Y"])),
        DockItem::folder("F", "Folder", apps(&["P", "Q"])),
        DockItem::app("B", "B"),
    ])
    .editing();
    h.open("F");

    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(125.0, 125.0));
    assert!(h.dock.dock_machine().is_dragging());
    assert!(!h.dock.shared().folder_placeholder_active);
    assert_eq!(h.dock.dock_machine().placeholder_index(), None);
}

#[test]
fn test_dwell_drops_app_into_folder() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.down(Vec2::new(145.0, 525.0));
    h.move_to(Vec2::new(115.0, 525.0));
    h.move_to(Vec2::new(85.0, 525.0));
    h.wait(301);
    assert_eq!(
        h.dock.dock_machine().session().and_then(|s| s.merge_target),
        Some(1)
    );

    h.up(Vec2::new(85.0, 525.0));
    h.settle();
    assert_eq!(h.top_ids(), ["A", "F"]);
    assert_eq!(h.folder_ids("F"), ["P", "Q", "B"]);
}

#[test]
fn test_dwell_merges_two_apps_into_new_folder() {
    let mut h = Harness::new(apps(&["X", "Y", "Z"])).editing();
    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(55.0, 525.0));
    h.move_to(Vec2::new(85.0, 525.0));
    h.wait(200);
    h.wait(200);

    h.up(Vec2::new(85.0, 525.0));
    h.settle();

    let items = h.dock.model().items();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_folder());
    assert_eq!(ids(items[0].children()), ["Y", "X"]);
    assert_eq!(items[1].id, "Z");
}

#[test]
fn test_hover_opens_folder_while_dragging() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(85.0, 525.0));
    h.wait(400);
    assert_eq!(h.dock.open_folder_id(), None);
    h.wait(101);

    assert_eq!(h.dock.open_folder_id(), Some("F"));
    assert_eq!(h.dock.shared().hovered_folder_id.as_deref(), Some("F"));
    assert!(h.dock.drain_events().contains(&DockEvent::FolderOpened {
        folder_id: "F".into()
    }));

    // The folder view mounts; carry on into it and drop.
    h.remount();
    h.move_to(Vec2::new(200.0, 125.0));
    assert_eq!(h.dock.shared().folder_placeholder_index, Some(2));
    h.up(Vec2::new(200.0, 125.0));
    h.settle();
    assert_eq!(h.folder_ids("F"), ["P", "Q", "A"]);
}

#[test]
fn test_clicks_outside_edit_mode() {
    let mut h = Harness::new(dock_with_folder());
    assert!(!h.dock.edit_mode());

    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(200.0, 525.0));
    assert!(!h.dock.dock_machine().is_busy());
    h.up(Vec2::new(200.0, 525.0));
    assert_eq!(
        h.dock.poll_event(),
        Some(DockEvent::Clicked {
            item: DockItem::app("A", "A")
        })
    );

    h.down(Vec2::new(85.0, 525.0));
    h.up(Vec2::new(85.0, 525.0));
    assert_eq!(h.dock.open_folder_id(), Some("F"));
    assert_eq!(
        h.dock.poll_event(),
        Some(DockEvent::FolderOpened {
            folder_id: "F".into()
        })
    );
    assert_eq!(h.dock.poll_event(), None);
}

#[test]
fn test_click_in_edit_mode_reports_app() {
    let mut h = Harness::new(apps(&["A", "B"])).editing();
    h.down(Vec2::new(85.0, 525.0));
    h.move_to(Vec2::new(88.0, 527.0));
    h.up(Vec2::new(88.0, 527.0));
    assert_eq!(
        h.dock.drain_events(),
        vec![DockEvent::Clicked {
            item: DockItem::app("B", "B")
        }]
    );
    assert_eq!(h.top_ids(), ["A", "B"]);
}

#[test]
fn test_leaving_edit_mode_cancels_drag() {
    let mut h = Harness::new(apps(&["A", "B", "C"])).editing();
    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(175.0, 525.0));
    assert!(h.dock.shared().drag_active);

    h.dock.set_edit_mode(false, &mut h.ghost);
    assert!(!h.dock.dock_machine().is_busy());
    assert!(!h.dock.shared().drag_active);
    assert_eq!(h.top_ids(), ["A", "B", "C"]);

    // The release that follows is ignored.
    h.up(Vec2::new(175.0, 525.0));
    h.settle();
    assert_eq!(h.top_ids(), ["A", "B", "C"]);
}

#[test]
fn test_pointer_cancel_aborts_without_commit() {
    let mut h = Harness::new(apps(&["A", "B", "C"])).editing();
    h.down(Vec2::new(25.0, 525.0));
    h.move_to(Vec2::new(175.0, 525.0));
    h.send(PointerEvent::Cancel);

    assert!(!h.dock.dock_machine().is_busy());
    assert_eq!(h.top_ids(), ["A", "B", "C"]);
    assert_eq!(
        h.dock.drain_events(),
        vec![
            DockEvent::DragActiveChanged { active: true },
            DockEvent::DragActiveChanged { active: false },
        ]
    );
}

#[test]
fn test_secondary_button_is_ignored() {
    let mut h = Harness::new(apps(&["A", "B"])).editing();
    h.send(PointerEvent::Down {
        position: Vec2::new(25.0, 525.0),
        button: PointerButton::Secondary,
    });
    h.move_to(Vec2::new(175.0, 525.0));
    assert!(!h.dock.dock_machine().is_busy());
}

#[test]
fn test_remove_item_closes_dissolved_folder() {
    let mut h = Harness::new(dock_with_folder());
    h.open("F");
    h.dock.drain_events();

    let removed = h.dock.remove_item("P").expect("item exists");
    assert_eq!(removed.id, "P");
    assert_eq!(h.top_ids(), ["A", "Q", "B"]);
    assert_eq!(h.dock.open_folder_id(), None);
    assert_eq!(
        h.dock.drain_events(),
        vec![
            DockEvent::ItemsChanged,
            DockEvent::FolderClosed {
                folder_id: "F".into()
            },
        ]
    );
}

#[test]
fn test_save_and_reload() {
    let mut h = Harness::new(dock_with_folder());
    h.dock.rename_folder("F", "Work").expect("folder exists");

    let mut store = MemoryStore::default();
    h.dock.save(&mut store, "dock").expect("saved");
    let loaded = DockModel::load(&store, "dock")
        .expect("valid json")
        .expect("key present");
    assert_eq!(loaded.items(), h.dock.model().items());
    assert_eq!(loaded.folder("F").map(|f| f.name.as_str()).ok(), Some("Work"));
}

#[test]
fn test_open_folder_rejects_apps() {
    let mut h = Harness::new(dock_with_folder());
    assert!(h.dock.open_folder("A").is_err());
    assert!(h.dock.open_folder("missing").is_err());
    assert_eq!(h.dock.open_folder_id(), None);
    assert!(h.dock.drain_events().is_empty());
}

#[test]
fn test_folder_unmounted_mid_drag_cancels() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");
    h.down(Vec2::new(125.0, 125.0));
    h.move_to(Vec2::new(125.0, 150.0));
    assert!(h.dock.folder_machine().is_dragging());

    h.folder_layout = None;
    h.move_to(Vec2::new(125.0, 160.0));
    assert!(!h.dock.folder_machine().is_busy());
    assert!(!h.dock.shared().drag_active);
    assert_eq!(h.top_ids(), ["A", "F", "B"]);
    assert_eq!(h.folder_ids("F"), ["P", "Q"]);
}

#[test]
fn test_closing_folder_mid_drag_ends_the_gesture() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");
    h.down(Vec2::new(125.0, 125.0));
    h.move_to(Vec2::new(125.0, 150.0));
    assert!(h.dock.shared().drag_active);
    h.dock.drain_events();

    h.dock.close_folder();
    assert!(!h.dock.folder_machine().is_busy());
    assert!(!h.dock.shared().drag_active);
    assert_eq!(
        h.dock.drain_events(),
        vec![
            DockEvent::DragActiveChanged { active: false },
            DockEvent::FolderClosed {
                folder_id: "F".into()
            },
        ]
    );

    h.up(Vec2::new(125.0, 150.0));
    assert_eq!(h.top_ids(), ["A", "F", "B"]);
    assert_eq!(h.folder_ids("F"), ["P", "Q"]);
    assert!(h.dock.drain_events().is_empty());
}

#[test]
fn test_removing_sibling_mid_drag_dissolves_and_ends_gesture() {
    let mut h = Harness::new(dock_with_folder()).editing();
    h.open("F");
    h.down(Vec2::new(125.0, 125.0));
    h.move_to(Vec2::new(125.0, 150.0));
    h.dock.drain_events();

    h.dock.remove_item("Q").expect("item exists");
    assert_eq!(h.top_ids(), ["A", "P", "B"]);
    assert_eq!(h.dock.open_folder_id(), None);
    assert!(!h.dock.shared().drag_active);
    assert_eq!(
        h.dock.drain_events(),
        vec![
            DockEvent::ItemsChanged,
            DockEvent::DragActiveChanged { active: false },
            DockEvent::FolderClosed {
                folder_id: "F".into()
            },
        ]
    );

    h.up(Vec2::new(125.0, 150.0));
    assert_eq!(h.top_ids(), ["A", "P", "B"]);
}
