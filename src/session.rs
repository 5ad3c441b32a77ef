//! Session state and the per-frame controller.
//!
//! All mutable viewing state (both cameras, the active mode, the focus
//! slot, the current map) lives in one owned `SessionState` that each step
//! borrows mutably, so the controller can be driven by synthetic event
//! sequences in tests. Event handling returns a `StepAction` for anything
//! with side effects (quit, regenerate, save, export); the frontend
//! executes those so the controller itself stays pure.

use crate::camera::{screen_to_world, Camera, ViewMode, Viewport};
use crate::selection::Selection;
use crate::settlement::SettlementId;
use crate::worldmap::WorldMap;

/// A discrete input event, already translated from the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / hard quit.
    Quit,
    /// Escape: leaves overview mode, or exits to the menu from detail.
    ExitView,
    /// Toggle between detail and overview cameras.
    ToggleOverview,
    /// Left click at a screen pixel.
    Click { px: usize, py: usize },
    /// Request a fresh map (detail mode only).
    Regenerate,
    /// Save the current map (detail mode only).
    Save,
    /// Export the map as a PNG image.
    Export,
}

/// Continuous directional key state, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Side effects requested by event handling, executed by the frontend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAction {
    None,
    Quit,
    ExitToMenu,
    Regenerate,
    Save,
    Export,
}

/// Snapshot handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderState {
    pub mode: ViewMode,
    pub detail_camera: Camera,
    pub overview_camera: Camera,
    pub selection: Selection,
    /// Settlement under the viewport-center player marker, if any.
    pub status: Option<SettlementId>,
}

pub struct SessionState {
    pub map: WorldMap,
    pub mode: ViewMode,
    pub detail_camera: Camera,
    pub overview_camera: Camera,
    pub selection: Selection,
}

impl SessionState {
    pub fn new(map: WorldMap) -> Self {
        Self {
            map,
            mode: ViewMode::Detail,
            detail_camera: Camera::default(),
            overview_camera: Camera::default(),
            selection: Selection::None,
        }
    }

    fn map_width(&self) -> i32 {
        self.map.width as i32
    }

    fn map_height(&self) -> i32 {
        self.map.height as i32
    }

    /// Swap in a freshly generated or loaded map. The old map and its
    /// settlement identities are gone, so the focus clears and both
    /// cameras re-clamp against the new bounds.
    pub fn replace_map(&mut self, map: WorldMap) {
        self.map = map;
        self.selection.clear();
        self.detail_camera.clamp(
            self.map_width(),
            self.map_height(),
            Viewport::of(ViewMode::Detail),
        );
        self.overview_camera.clamp(
            self.map_width(),
            self.map_height(),
            Viewport::of(ViewMode::Overview),
        );
    }

    /// Handle one discrete event. Effectful requests come back as the
    /// returned action.
    pub fn handle_event(&mut self, event: InputEvent) -> StepAction {
        match event {
            InputEvent::Quit => StepAction::Quit,

            InputEvent::ExitView => {
                if self.mode == ViewMode::Overview {
                    self.mode = ViewMode::Detail;
                    StepAction::None
                } else {
                    StepAction::ExitToMenu
                }
            }

            InputEvent::ToggleOverview => {
                if self.mode == ViewMode::Detail {
                    // Center the overview on the detail camera's center so
                    // the switch feels continuous.
                    let (cx, cy) = self.detail_camera.center(Viewport::of(ViewMode::Detail));
                    self.overview_camera = Camera::centered_on(
                        cx,
                        cy,
                        self.map_width(),
                        self.map_height(),
                        Viewport::of(ViewMode::Overview),
                    );
                    self.mode = ViewMode::Overview;
                } else {
                    self.mode = ViewMode::Detail;
                }
                StepAction::None
            }

            InputEvent::Click { px, py } => {
                self.handle_click(px, py);
                StepAction::None
            }

            InputEvent::Regenerate => {
                if self.mode == ViewMode::Detail {
                    StepAction::Regenerate
                } else {
                    StepAction::None
                }
            }

            InputEvent::Save => {
                if self.mode == ViewMode::Detail {
                    StepAction::Save
                } else {
                    StepAction::None
                }
            }

            InputEvent::Export => StepAction::Export,
        }
    }

    fn handle_click(&mut self, px: usize, py: usize) {
        match self.mode {
            ViewMode::Overview => {
                // Zoom to the clicked location: clamp the resolved tile,
                // recenter the detail camera on it, drop back to detail.
                let (tx, ty) = screen_to_world(ViewMode::Overview, self.overview_camera, px, py);
                let tx = tx.clamp(0, self.map_width() - 1);
                let ty = ty.clamp(0, self.map_height() - 1);
                self.detail_camera = Camera::centered_on(
                    tx,
                    ty,
                    self.map_width(),
                    self.map_height(),
                    Viewport::of(ViewMode::Detail),
                );
                self.mode = ViewMode::Detail;
            }
            ViewMode::Detail => {
                let (tx, ty) = screen_to_world(ViewMode::Detail, self.detail_camera, px, py);
                let tx = tx.clamp(0, self.map_width() - 1);
                let ty = ty.clamp(0, self.map_height() - 1);
                let target = self.map.settlement_at(tx, ty).map(|s| (s.kind, s.id));
                self.selection.tap(target);
            }
        }
    }

    /// Apply held directional keys to the active mode's camera at that
    /// mode's scroll speed.
    pub fn apply_movement(&mut self, input: MoveInput) {
        let speed = self.mode.scroll_speed();
        let dx = (input.right as i32 - input.left as i32) * speed;
        let dy = (input.down as i32 - input.up as i32) * speed;
        if dx == 0 && dy == 0 {
            return;
        }
        let view = Viewport::of(self.mode);
        let (w, h) = (self.map_width(), self.map_height());
        match self.mode {
            ViewMode::Detail => self.detail_camera.move_by(dx, dy, w, h, view),
            ViewMode::Overview => self.overview_camera.move_by(dx, dy, w, h, view),
        }
    }

    /// Settlement under the detail viewport's center (the player marker).
    pub fn status_settlement(&self) -> Option<SettlementId> {
        let (cx, cy) = self.detail_camera.center(Viewport::of(ViewMode::Detail));
        self.map.settlement_at(cx, cy).map(|s| s.id)
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            mode: self.mode,
            detail_camera: self.detail_camera,
            overview_camera: self.overview_camera,
            selection: self.selection,
            status: self.status_settlement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::settlement::{Settlement, SettlementId, SettlementKind};
    use crate::terrain::TerrainType;
    use crate::tilemap::Tilemap;

    fn test_map() -> WorldMap {
        let tiles = Tilemap::new_with(4000, 1000, TerrainType::Grassland);
        let settlements = vec![
            Settlement {
                id: SettlementId(0),
                kind: SettlementKind::Village,
                x: 10,
                y: 10,
                name: "Aelrin".to_string(),
                liege: Some(SettlementId(1)),
            },
            Settlement {
                id: SettlementId(1),
                kind: SettlementKind::Town,
                x: 20,
                y: 10,
                name: "Taerloch".to_string(),
                liege: None,
            },
        ];
        WorldMap::new(tiles, settlements, Some(5), "test".to_string())
    }

    fn session() -> SessionState {
        SessionState::new(test_map())
    }

    #[test]
    fn test_quit_event_requests_quit() {
        let mut s = session();
        assert_eq!(s.handle_event(InputEvent::Quit), StepAction::Quit);
    }

    #[test]
    fn test_escape_leaves_overview_before_menu() {
        let mut s = session();
        s.handle_event(InputEvent::ToggleOverview);
        assert_eq!(s.mode, ViewMode::Overview);
        assert_eq!(s.handle_event(InputEvent::ExitView), StepAction::None);
        assert_eq!(s.mode, ViewMode::Detail);
        assert_eq!(s.handle_event(InputEvent::ExitView), StepAction::ExitToMenu);
    }

    #[test]
    fn test_overview_entry_centers_on_detail_center() {
        let mut s = session();
        s.detail_camera = Camera { x: 2000, y: 500 };
        s.handle_event(InputEvent::ToggleOverview);

        let detail_center = s.detail_camera.center(Viewport::of(ViewMode::Detail));
        let overview_center = s.overview_camera.center(Viewport::of(ViewMode::Overview));
        assert_eq!(overview_center, detail_center);
    }

    #[test]
    fn test_mode_switch_preserves_each_cameras_position() {
        let mut s = session();
        s.detail_camera = Camera { x: 300, y: 200 };
        s.handle_event(InputEvent::ToggleOverview);
        s.apply_movement(MoveInput {
            right: true,
            ..MoveInput::default()
        });
        let moved_overview = s.overview_camera;
        s.handle_event(InputEvent::ToggleOverview);
        assert_eq!(s.mode, ViewMode::Detail);
        assert_eq!(s.detail_camera, Camera { x: 300, y: 200 });
        assert_eq!(s.overview_camera, moved_overview);
    }

    #[test]
    fn test_overview_click_zooms_to_tile() {
        let mut s = session();
        s.handle_event(InputEvent::ToggleOverview);
        s.overview_camera = Camera { x: 50, y: 20 };

        s.handle_event(InputEvent::Click { px: 100, py: 100 });

        assert_eq!(s.mode, ViewMode::Detail);
        let center = s.detail_camera.center(Viewport::of(ViewMode::Detail));
        assert_eq!(center, (150, 120));
    }

    #[test]
    fn test_detail_click_selects_and_toggles_settlement() {
        let mut s = session();
        // Village at (10, 10) with camera at origin: pixel center of that
        // tile is (10*32+16, 10*32+16).
        let (px, py) = (10 * 32 + 16, 10 * 32 + 16);
        s.handle_event(InputEvent::Click { px, py });
        assert_eq!(s.selection, Selection::Village(SettlementId(0)));

        // Same tile again toggles off.
        s.handle_event(InputEvent::Click { px, py });
        assert_eq!(s.selection, Selection::None);
    }

    #[test]
    fn test_detail_click_cross_category_exclusivity() {
        let mut s = session();
        s.handle_event(InputEvent::Click {
            px: 10 * 32,
            py: 10 * 32,
        });
        assert_eq!(s.selection, Selection::Village(SettlementId(0)));

        s.handle_event(InputEvent::Click {
            px: 20 * 32,
            py: 10 * 32,
        });
        assert_eq!(s.selection, Selection::Town(SettlementId(1)));
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut s = session();
        s.handle_event(InputEvent::Click {
            px: 10 * 32,
            py: 10 * 32,
        });
        assert_ne!(s.selection, Selection::None);
        s.handle_event(InputEvent::Click { px: 0, py: 0 });
        assert_eq!(s.selection, Selection::None);
    }

    #[test]
    fn test_movement_respects_mode_speed_and_clamping() {
        let mut s = session();
        s.apply_movement(MoveInput {
            right: true,
            down: true,
            ..MoveInput::default()
        });
        assert_eq!(s.detail_camera, Camera { x: 2, y: 2 });

        s.handle_event(InputEvent::ToggleOverview);
        let before = s.overview_camera;
        s.apply_movement(MoveInput {
            right: true,
            ..MoveInput::default()
        });
        assert_eq!(s.overview_camera.x, before.x + 10);

        // Pushing left forever pins at 0.
        for _ in 0..1000 {
            s.apply_movement(MoveInput {
                left: true,
                up: true,
                ..MoveInput::default()
            });
        }
        assert_eq!(s.overview_camera, Camera { x: 0, y: 0 });
    }

    #[test]
    fn test_regenerate_and_save_only_in_detail_mode() {
        let mut s = session();
        assert_eq!(s.handle_event(InputEvent::Regenerate), StepAction::Regenerate);
        assert_eq!(s.handle_event(InputEvent::Save), StepAction::Save);

        s.handle_event(InputEvent::ToggleOverview);
        assert_eq!(s.handle_event(InputEvent::Regenerate), StepAction::None);
        assert_eq!(s.handle_event(InputEvent::Save), StepAction::None);
    }

    #[test]
    fn test_replace_map_resets_selection_and_clamps_cameras() {
        let mut s = session();
        s.handle_event(InputEvent::Click {
            px: 10 * 32,
            py: 10 * 32,
        });
        assert_ne!(s.selection, Selection::None);
        s.detail_camera = Camera { x: 3968, y: 976 };

        // New, much smaller map: selection clears and cameras re-clamp.
        let tiles = Tilemap::new_with(100, 50, TerrainType::Grassland);
        s.replace_map(WorldMap::new(tiles, Vec::new(), None, "next".to_string()));

        assert_eq!(s.selection, Selection::None);
        let view = Viewport::of(ViewMode::Detail);
        assert!(s.detail_camera.x <= 100 - view.width);
        assert!(s.detail_camera.y <= 50 - view.height);
        assert!(s.detail_camera.x >= 0 && s.detail_camera.y >= 0);
    }

    #[test]
    fn test_status_settlement_at_viewport_center() {
        let mut s = session();
        assert_eq!(s.status_settlement(), None);

        // Center the detail camera on the town at (20, 10).
        s.detail_camera = Camera::centered_on(
            20,
            10,
            4000,
            1000,
            Viewport::of(ViewMode::Detail),
        );
        assert_eq!(s.status_settlement(), Some(SettlementId(1)));

        let render = s.render_state();
        assert_eq!(render.status, Some(SettlementId(1)));
        assert_eq!(render.mode, ViewMode::Detail);
    }

    #[test]
    fn test_click_at_screen_edges_resolves_in_bounds() {
        let mut s = session();
        s.handle_event(InputEvent::ToggleOverview);
        s.overview_camera = Camera { x: 4000 - 1024, y: 1000 - 768 };
        // Bottom-right pixel resolves to the last tile, clamped.
        s.handle_event(InputEvent::Click {
            px: SCREEN_WIDTH - 1,
            py: SCREEN_HEIGHT - 1,
        });
        assert_eq!(s.mode, ViewMode::Detail);
        let view = Viewport::of(ViewMode::Detail);
        assert_eq!(s.detail_camera.x, 4000 - view.width);
        assert_eq!(s.detail_camera.y, 1000 - view.height);
    }
}
