//! Owner of the current scene and selection.

use super::reducer::apply_in_place;
use super::{Action, Scene, ScenePatch, Selection};
use crate::snapshot::SceneDocument;
use chrono::{DateTime, Utc};

/// Holds the current scene and selection and applies actions to them.
///
/// Readers get immutable snapshots; the only way to change state is
/// [`SceneStore::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    scene: Scene,
    selection: Selection,
}

impl SceneStore {
    /// Create a store with an empty default-sized scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an empty scene of the given grid size.
    pub fn with_grid(grid_cols: i32, grid_rows: i32) -> Self {
        Self::with_scene(Scene::new(grid_cols, grid_rows))
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            selection: Selection::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Apply an action to the current state.
    pub fn dispatch(&mut self, action: Action) {
        let name = action.name();
        log::trace!("dispatch {:?}", action);
        apply_in_place(&mut self.scene, &mut self.selection, action);
        log::debug!(
            "{}: {} item(s), {} selected",
            name,
            self.scene.len(),
            self.selection.len()
        );
    }

    /// Replace the scene with persisted data.
    pub fn hydrate(&mut self, patch: ScenePatch) {
        self.dispatch(Action::Hydrate(patch));
    }

    /// Build the persisted document for the current scene.
    pub fn export_document(&self, cell_size: f64, now: DateTime<Utc>) -> SceneDocument {
        SceneDocument::from_scene(&self.scene, cell_size, now)
    }
}
