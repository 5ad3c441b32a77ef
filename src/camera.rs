//! Dual-mode camera model and screen/world coordinate transforms.
//!
//! Two independent cameras exist, one per view mode, so switching modes
//! preserves each mode's last position. All movement is clamped so the
//! viewport never leaves the map; when the map is smaller than the
//! viewport the origin pins to 0.

/// Screen size in pixels.
pub const SCREEN_WIDTH: usize = 1024;
pub const SCREEN_HEIGHT: usize = 768;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Close-up view for normal play.
    Detail,
    /// Zoomed-out view for whole-map navigation.
    Overview,
}

impl ViewMode {
    /// Pixels per tile in this mode.
    pub fn tile_pixels(&self) -> usize {
        match self {
            ViewMode::Detail => 32,
            ViewMode::Overview => 1,
        }
    }

    /// Camera scroll speed in tiles per frame of held input.
    pub fn scroll_speed(&self) -> i32 {
        match self {
            ViewMode::Detail => 2,
            ViewMode::Overview => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Detail => "Detail",
            ViewMode::Overview => "Overview",
        }
    }
}

/// Viewport size in tiles, derived from the screen size and the mode's
/// tile scale (floor division).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn of(mode: ViewMode) -> Self {
        Self::for_screen(mode, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn for_screen(mode: ViewMode, screen_width: usize, screen_height: usize) -> Self {
        let t = mode.tile_pixels();
        Self {
            width: (screen_width / t) as i32,
            height: (screen_height / t) as i32,
        }
    }
}

/// Camera origin in world-tile coordinates (top-left of the viewport).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
}

fn clamp_axis(v: i32, map_dim: i32, view_dim: i32) -> i32 {
    // Viewport larger than the map pins the origin to 0.
    v.clamp(0, (map_dim - view_dim).max(0))
}

impl Camera {
    /// Move by (dx, dy) tiles, then clamp both axes into the map.
    pub fn move_by(&mut self, dx: i32, dy: i32, map_width: i32, map_height: i32, view: Viewport) {
        self.x = clamp_axis(self.x + dx, map_width, view.width);
        self.y = clamp_axis(self.y + dy, map_height, view.height);
    }

    /// Re-clamp in place, e.g. after the map is replaced.
    pub fn clamp(&mut self, map_width: i32, map_height: i32, view: Viewport) {
        self.move_by(0, 0, map_width, map_height, view);
    }

    /// A camera whose viewport is centered on the given world point,
    /// clamped into the map. Used when entering overview mode (centered on
    /// the detail camera's center) and when zooming to a clicked tile.
    pub fn centered_on(
        tile_x: i32,
        tile_y: i32,
        map_width: i32,
        map_height: i32,
        view: Viewport,
    ) -> Camera {
        let mut camera = Camera {
            x: tile_x - view.width / 2,
            y: tile_y - view.height / 2,
        };
        camera.clamp(map_width, map_height, view);
        camera
    }

    /// World-tile coordinate at the center of this camera's viewport.
    pub fn center(&self, view: Viewport) -> (i32, i32) {
        (self.x + view.width / 2, self.y + view.height / 2)
    }
}

/// Convert a screen pixel to the world tile under it. Floor division; the
/// result is unclamped, so callers must clamp before indexing into the map.
pub fn screen_to_world(mode: ViewMode, camera: Camera, px: usize, py: usize) -> (i32, i32) {
    let t = mode.tile_pixels() as i32;
    (px as i32 / t + camera.x, py as i32 / t + camera.y)
}

/// Convert a world tile to the screen pixel of its top-left corner. May be
/// off-screen (negative or past the screen edge); callers clip.
pub fn world_to_screen(mode: ViewMode, camera: Camera, tile_x: i32, tile_y: i32) -> (i32, i32) {
    let t = mode.tile_pixels() as i32;
    ((tile_x - camera.x) * t, (tile_y - camera.y) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_W: i32 = 4000;
    const MAP_H: i32 = 1000;

    #[test]
    fn test_detail_viewport_is_32x24() {
        let view = Viewport::of(ViewMode::Detail);
        assert_eq!(view.width, 32);
        assert_eq!(view.height, 24);
    }

    #[test]
    fn test_move_clamps_at_right_edge() {
        // Origin already past the limit: any rightward move stays pinned
        // at map_width - viewport_width.
        let view = Viewport::of(ViewMode::Detail);
        let mut camera = Camera { x: 3990, y: 0 };
        camera.move_by(2, 0, MAP_W, MAP_H, view);
        assert_eq!(camera.x, MAP_W - view.width);
        assert_eq!(camera.x, 3968);
    }

    #[test]
    fn test_move_clamps_at_origin() {
        let view = Viewport::of(ViewMode::Detail);
        let mut camera = Camera { x: 1, y: 0 };
        camera.move_by(-5, -5, MAP_W, MAP_H, view);
        assert_eq!(camera, Camera { x: 0, y: 0 });
    }

    #[test]
    fn test_clamp_invariant_over_random_walk() {
        let view = Viewport::of(ViewMode::Overview);
        let mut camera = Camera::default();
        let steps = [
            (500, 300),
            (-10000, 40),
            (4000, -4000),
            (7, 7),
            (-3, 9000),
        ];
        for (dx, dy) in steps {
            camera.move_by(dx, dy, MAP_W, MAP_H, view);
            assert!(camera.x >= 0 && camera.x <= MAP_W - view.width);
            assert!(camera.y >= 0 && camera.y <= MAP_H - view.height);
        }
    }

    #[test]
    fn test_map_smaller_than_viewport_pins_origin() {
        // 512x256 map under a 1024x768 overview viewport.
        let view = Viewport::of(ViewMode::Overview);
        let mut camera = Camera { x: 100, y: 100 };
        camera.move_by(50, 50, 512, 256, view);
        assert_eq!(camera, Camera { x: 0, y: 0 });
    }

    #[test]
    fn test_screen_to_world_floor_division() {
        let camera = Camera { x: 10, y: 20 };
        // Pixel (31, 31) is still tile (0, 0) of the viewport at 32px.
        assert_eq!(screen_to_world(ViewMode::Detail, camera, 31, 31), (10, 20));
        assert_eq!(screen_to_world(ViewMode::Detail, camera, 32, 63), (11, 21));
    }

    #[test]
    fn test_overview_click_example() {
        // Click at pixel (100, 100), overview origin (50, 20), 1px tiles
        // resolves to world tile (150, 120).
        let camera = Camera { x: 50, y: 20 };
        assert_eq!(
            screen_to_world(ViewMode::Overview, camera, 100, 100),
            (150, 120)
        );
    }

    #[test]
    fn test_world_screen_roundtrip_at_tile_corner() {
        let camera = Camera { x: 7, y: 3 };
        for mode in [ViewMode::Detail, ViewMode::Overview] {
            let (px, py) = world_to_screen(mode, camera, 15, 9);
            assert_eq!(
                screen_to_world(mode, camera, px as usize, py as usize),
                (15, 9)
            );
        }
    }

    #[test]
    fn test_world_to_screen_may_be_offscreen() {
        let camera = Camera { x: 100, y: 100 };
        let (px, py) = world_to_screen(ViewMode::Detail, camera, 50, 50);
        assert!(px < 0 && py < 0);
    }

    #[test]
    fn test_centered_on_clamps() {
        let view = Viewport::of(ViewMode::Detail);
        // Center of viewport lands on the requested tile when unclamped.
        let camera = Camera::centered_on(150, 120, MAP_W, MAP_H, view);
        assert_eq!(camera.center(view), (150, 120));
        // Near the corner the camera clamps instead.
        let camera = Camera::centered_on(2, 2, MAP_W, MAP_H, view);
        assert_eq!(camera, Camera { x: 0, y: 0 });
        let camera = Camera::centered_on(MAP_W - 1, MAP_H - 1, MAP_W, MAP_H, view);
        assert_eq!(camera.x, MAP_W - view.width);
        assert_eq!(camera.y, MAP_H - view.height);
    }

    #[test]
    fn test_overview_recenter_preserves_detail_center() {
        // Entering overview centers the overview viewport on the detail
        // camera's center point.
        let detail_view = Viewport::of(ViewMode::Detail);
        let overview_view = Viewport::of(ViewMode::Overview);
        let detail = Camera { x: 2000, y: 500 };
        let (cx, cy) = detail.center(detail_view);
        let overview = Camera::centered_on(cx, cy, MAP_W, MAP_H, overview_view);
        assert_eq!(overview.center(overview_view), (cx, cy));
    }
}
