//! Translation of pointer and key streams into scene actions.
//!
//! The controller owns only transient state: the current [`InteractionMode`],
//! draft positions for the items being dragged, alignment guides, the open
//! edit session and double-activation tracking. All committed changes go
//! through [`SceneStore::dispatch`].

use crate::edit::EditSession;
use crate::geometry::{
    CellRect, DEFAULT_CELL_SIZE, clamp_axis_fractional, clamp_rect, local_to_cells, pixels_to_cells,
};
use crate::guides::{GuideSettings, Guides, compute_guides};
use crate::input::{
    ActivationTracker, DOUBLE_ACTIVATION_MS, Key, Modifiers, PointerEvent, PointerTarget,
    ResizeHandle,
};
use crate::scene::{Action, ItemId, ItemRef, PlacedItem, SceneStore};
use kurbo::{Point, Rect, Vec2};

/// Default diagonal in pixels a marquee must exceed before it selects.
pub const MARQUEE_THRESHOLD: f64 = 5.0;

/// Interaction tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub cell_size: f64,
    pub double_activation_ms: u64,
    pub marquee_threshold: f64,
    pub guides: GuideSettings,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            double_activation_ms: DOUBLE_ACTIVATION_MS,
            marquee_threshold: MARQUEE_THRESHOLD,
            guides: GuideSettings::default(),
        }
    }
}

/// Live position of a dragged item, in fractional cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draft {
    pub id: ItemId,
    pub position: Point,
}

/// Start state of one dragged item.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragStart {
    id: ItemId,
    rect: CellRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pointer_id: u64,
    item: ItemRef,
    origin: Point,
    starts: Vec<DragStart>,
    /// Whole-cell delta from the last pointer position.
    delta: (i32, i32),
}

impl DragState {
    pub fn item(&self) -> ItemRef {
        self.item
    }

    pub fn is_group(&self) -> bool {
        self.starts.len() > 1
    }

    pub fn delta(&self) -> (i32, i32) {
        self.delta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pointer_id: u64,
    zone: ItemId,
    handle: ResizeHandle,
    origin: Point,
    start_size: (i32, i32),
}

impl ResizeState {
    pub fn zone(&self) -> ItemId {
        self.zone
    }

    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeState {
    pointer_id: u64,
    origin: Point,
    current: Point,
    active: bool,
    /// Marquee rectangle in cells.
    rect: Rect,
}

impl MarqueeState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    Marqueeing(MarqueeState),
}

impl InteractionMode {
    fn pointer_id(&self) -> Option<u64> {
        match self {
            InteractionMode::Idle => None,
            InteractionMode::Dragging(s) => Some(s.pointer_id),
            InteractionMode::Resizing(s) => Some(s.pointer_id),
            InteractionMode::Marqueeing(s) => Some(s.pointer_id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }
}

/// Pointer and keyboard state machine for one canvas.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    settings: InteractionSettings,
    mode: InteractionMode,
    activation: ActivationTracker,
    edit: Option<EditSession>,
    drafts: Vec<Draft>,
    guides: Guides,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            settings,
            mode: InteractionMode::Idle,
            activation: ActivationTracker::new(settings.double_activation_ms),
            edit: None,
            drafts: Vec::new(),
            guides: Guides::default(),
        }
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.drafts
    }

    pub fn guides(&self) -> &Guides {
        &self.guides
    }

    /// Marquee rectangle in cells once it has passed the threshold.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.mode {
            InteractionMode::Marqueeing(state) if state.active => Some(state.rect),
            _ => None,
        }
    }

    /// Feed a pointer event. `zoom` is the viewport zoom at the time of the event.
    pub fn handle_pointer(&mut self, store: &mut SceneStore, event: PointerEvent, zoom: f64) {
        match event {
            PointerEvent::Down {
                pointer_id,
                position,
                target,
                modifiers,
                timestamp_ms,
            } => self.pointer_down(
                store,
                pointer_id,
                position,
                target,
                modifiers,
                timestamp_ms,
                zoom,
            ),
            PointerEvent::Move {
                pointer_id,
                position,
            } => self.pointer_move(store, pointer_id, position, zoom),
            PointerEvent::Up {
                pointer_id,
                position,
            } => self.pointer_up(store, pointer_id, position, zoom),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn pointer_down(
        &mut self,
        store: &mut SceneStore,
        pointer_id: u64,
        position: Point,
        target: PointerTarget,
        modifiers: Modifiers,
        timestamp_ms: u64,
        zoom: f64,
    ) {
        if !self.mode.is_idle() {
            log::trace!("Ignoring pointer {} while captured", pointer_id);
            return;
        }
        // Pressing anywhere blurs the edit field
        self.commit_edit(store);

        match target {
            PointerTarget::Canvas => {
                let cell = local_to_cells(position, self.settings.cell_size, zoom);
                self.mode = InteractionMode::Marqueeing(MarqueeState {
                    pointer_id,
                    origin: position,
                    current: position,
                    active: false,
                    rect: Rect::from_points(cell, cell),
                });
            }
            PointerTarget::ZoneHandle(zone, handle) => {
                let Some(size) = store.scene().zone(zone).map(PlacedItem::size) else {
                    return;
                };
                self.mode = InteractionMode::Resizing(ResizeState {
                    pointer_id,
                    zone,
                    handle,
                    origin: position,
                    start_size: size,
                });
            }
            PointerTarget::Item(item) => {
                let id = item.id();
                if !store.scene().contains(id) {
                    return;
                }
                if self.activation.activate(id, timestamp_ms) {
                    self.edit = EditSession::begin(store.scene(), item);
                    log::debug!("Editing {:?}", item);
                    return;
                }

                if modifiers.command() {
                    store.dispatch(Action::ToggleSelect { id, multi: true });
                } else if !store.selection().contains(id) {
                    store.dispatch(Action::ToggleSelect { id, multi: false });
                }
                self.begin_drag(store, pointer_id, item, position);
            }
        }
    }

    fn begin_drag(&mut self, store: &SceneStore, pointer_id: u64, item: ItemRef, origin: Point) {
        let scene = store.scene();
        let selection = store.selection();
        let id = item.id();

        let starts: Vec<DragStart> = if item.is_table() && selection.is_multi_with(id) {
            scene
                .tables
                .iter()
                .filter(|t| selection.contains(t.id))
                .map(|t| DragStart {
                    id: t.id,
                    rect: t.rect(),
                })
                .collect()
        } else {
            scene
                .item_rect(id)
                .map(|rect| DragStart { id, rect })
                .into_iter()
                .collect()
        };

        self.drafts = starts
            .iter()
            .map(|s| Draft {
                id: s.id,
                position: Point::new(s.rect.x as f64, s.rect.y as f64),
            })
            .collect();
        self.guides = Guides::default();
        self.mode = InteractionMode::Dragging(DragState {
            pointer_id,
            item,
            origin,
            starts,
            delta: (0, 0),
        });
    }

    fn pointer_move(&mut self, store: &mut SceneStore, pointer_id: u64, position: Point, zoom: f64) {
        if self.mode.pointer_id() != Some(pointer_id) {
            return;
        }
        let cell_size = self.settings.cell_size;
        match &mut self.mode {
            InteractionMode::Idle => {}
            InteractionMode::Dragging(state) => {
                let offset = position - state.origin;
                let delta = Vec2::new(
                    pixels_to_cells(offset.x, cell_size, zoom),
                    pixels_to_cells(offset.y, cell_size, zoom),
                );
                state.delta = (delta.x.round() as i32, delta.y.round() as i32);

                let scene = store.scene();
                self.drafts = draft_positions(&state.starts, delta, scene.grid_cols, scene.grid_rows);

                self.guides = match (state.item, state.starts.as_slice()) {
                    (ItemRef::Table(id), [start]) => {
                        let (x, y) = clamp_rect(
                            scene.grid_cols,
                            scene.grid_rows,
                            start.rect.x.saturating_add(state.delta.0) as f64,
                            start.rect.y.saturating_add(state.delta.1) as f64,
                            start.rect.w,
                            start.rect.h,
                        );
                        let rect = CellRect::new(x, y, start.rect.w, start.rect.h);
                        compute_guides(scene, rect, &[id], &self.settings.guides)
                    }
                    _ => Guides::default(),
                };
            }
            InteractionMode::Resizing(state) => {
                let action = resize_action(state, position, cell_size, zoom);
                store.dispatch(action);
            }
            InteractionMode::Marqueeing(state) => {
                state.current = position;
                let diagonal = (state.current - state.origin).hypot();
                if diagonal > self.settings.marquee_threshold {
                    state.active = true;
                }
                state.rect = Rect::from_points(
                    local_to_cells(state.origin, cell_size, zoom),
                    local_to_cells(state.current, cell_size, zoom),
                );
                if state.active {
                    let ids = store.scene().items_touching(state.rect);
                    store.dispatch(Action::SelectMultiple { ids });
                }
            }
        }
    }

    fn pointer_up(&mut self, store: &mut SceneStore, pointer_id: u64, position: Point, zoom: f64) {
        if self.mode.pointer_id() != Some(pointer_id) {
            return;
        }
        // Final position counts as a move
        self.pointer_move(store, pointer_id, position, zoom);

        match std::mem::take(&mut self.mode) {
            InteractionMode::Dragging(state) => {
                if state.delta != (0, 0) {
                    if let Some(action) = commit_action(&state) {
                        store.dispatch(action);
                    }
                }
                self.drafts.clear();
                self.guides = Guides::default();
            }
            InteractionMode::Marqueeing(state) => {
                if !state.active {
                    store.dispatch(Action::ClearSelection);
                }
            }
            InteractionMode::Resizing(_) | InteractionMode::Idle => {}
        }
        self.sync(store);
    }

    /// Feed a key press. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, store: &mut SceneStore, key: &Key) -> bool {
        match key {
            Key::Escape if self.edit.is_some() => {
                self.cancel_edit();
                true
            }
            Key::Enter if self.edit.is_some() => {
                self.commit_edit(store);
                true
            }
            Key::Delete | Key::Backspace => {
                if self.edit.is_some() || store.selection().is_empty() {
                    return false;
                }
                store.dispatch(Action::RemoveSelected);
                self.sync(store);
                true
            }
            _ => false,
        }
    }

    /// Replace the edit buffer of the open session.
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.edit.as_mut() {
            edit.set_text(text);
        }
    }

    /// Close the open edit session, applying its value if valid.
    pub fn commit_edit(&mut self, store: &mut SceneStore) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        if !edit.is_live(store.scene()) {
            return;
        }
        if let Some(action) = edit.commit() {
            store.dispatch(action);
        }
    }

    /// Close the open edit session without applying it.
    pub fn cancel_edit(&mut self) {
        if self.edit.take().is_some() {
            log::debug!("Edit cancelled");
        }
    }

    /// Drop state that refers to items no longer in the scene.
    pub fn sync(&mut self, store: &SceneStore) {
        let scene = store.scene();
        if self.edit.as_ref().is_some_and(|e| !e.is_live(scene)) {
            log::debug!("Closing edit session, target removed");
            self.edit = None;
        }
        let stale = match &self.mode {
            InteractionMode::Dragging(state) => !scene.contains(state.item.id()),
            InteractionMode::Resizing(state) => scene.zone(state.zone).is_none(),
            _ => false,
        };
        if stale {
            self.mode = InteractionMode::Idle;
            self.drafts.clear();
            self.guides = Guides::default();
        }
    }
}

/// Fractional ghost positions. A group is clamped as one rectangle.
fn draft_positions(starts: &[DragStart], delta: Vec2, cols: i32, rows: i32) -> Vec<Draft> {
    let Some(bounds) = starts.iter().map(|s| s.rect).reduce(|a, b| a.union(b)) else {
        return Vec::new();
    };
    let dx = clamp_axis_fractional(bounds.x as f64 + delta.x, cols, bounds.w) - bounds.x as f64;
    let dy = clamp_axis_fractional(bounds.y as f64 + delta.y, rows, bounds.h) - bounds.y as f64;
    starts
        .iter()
        .map(|s| Draft {
            id: s.id,
            position: Point::new(s.rect.x as f64 + dx, s.rect.y as f64 + dy),
        })
        .collect()
}

fn resize_action(state: &ResizeState, position: Point, cell_size: f64, zoom: f64) -> Action {
    let offset = position - state.origin;
    let (resize_x, resize_y) = state.handle.axes();
    let (mut width, mut height) = state.start_size;
    if resize_x {
        let cells = pixels_to_cells(offset.x, cell_size, zoom).round() as i32;
        width = width.saturating_add(cells);
    }
    if resize_y {
        let cells = pixels_to_cells(offset.y, cell_size, zoom).round() as i32;
        height = height.saturating_add(cells);
    }
    Action::ResizeZone {
        id: state.zone,
        width,
        height,
    }
}

fn commit_action(state: &DragState) -> Option<Action> {
    let start = state.starts.iter().find(|s| s.id == state.item.id())?;
    let x = start.rect.x.saturating_add(state.delta.0);
    let y = start.rect.y.saturating_add(state.delta.1);
    Some(match state.item {
        ItemRef::Table(id) => Action::MoveTable { id, x, y },
        ItemRef::Zone(id) => Action::MoveZone { id, x, y },
        ItemRef::Label(id) => Action::MoveLabel { id, x, y },
    })
}
