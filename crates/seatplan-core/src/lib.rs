//! Seatplan Core Library
//!
//! Platform-agnostic core of the grid seating layout editor: scene model and
//! reducer, pointer interaction, alignment guides, viewport math and the
//! persisted layout format.

pub mod config;
pub mod edit;
pub mod geometry;
pub mod guides;
pub mod input;
pub mod interaction;
pub mod scene;
pub mod snapshot;
pub mod storage;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use edit::{EditSession, EditTarget};
pub use geometry::{CellRect, Orientation, TableKind, clamp_rect, footprint};
pub use guides::{Guide, GuideAnchor, GuideAxis, Guides, compute_guides};
pub use input::{Key, Modifiers, PointerEvent, PointerTarget, ResizeHandle, WheelEvent};
pub use interaction::{Draft, InteractionController, InteractionMode};
pub use scene::{
    Action, ItemId, ItemRef, Label, Scene, ScenePatch, SceneStore, Selection, Table, TableConfig,
    Zone, apply,
};
pub use snapshot::{ExportBundle, SceneDocument, SnapshotError, parse_layout};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use viewport::{ViewMode, Viewport};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
