//! Pixel-buffer rendering of the map views.
//!
//! Draws into a `u32` 0RGB framebuffer the window blits each frame. The
//! detail view draws 32px tiles with settlement markers and selection
//! overlays; the overview view draws one pixel per tile with the detail
//! viewport indicated by a clipped yellow rectangle.

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::camera::{world_to_screen, Camera, ViewMode, Viewport, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::session::RenderState;
use crate::settlement::Settlement;
use crate::worldmap::WorldMap;

const BACKGROUND: u32 = rgb(8, 8, 16);
const SELECTION_COLOR: u32 = rgb(255, 255, 0);
const LINK_COLOR: u32 = rgb(235, 235, 235);
const MARKER_BORDER: u32 = rgb(20, 20, 20);
const INDICATOR_COLOR: u32 = rgb(255, 255, 0);
const PROGRESS_FILL: u32 = rgb(120, 200, 120);
const PROGRESS_FRAME: u32 = rgb(220, 220, 220);

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

fn put_pixel(buffer: &mut [u32], x: i32, y: i32, color: u32) {
    if x >= 0 && y >= 0 && (x as usize) < SCREEN_WIDTH && (y as usize) < SCREEN_HEIGHT {
        buffer[y as usize * SCREEN_WIDTH + x as usize] = color;
    }
}

fn fill_rect(buffer: &mut [u32], x: i32, y: i32, w: i32, h: i32, color: u32) {
    for py in y..y + h {
        for px in x..x + w {
            put_pixel(buffer, px, py, color);
        }
    }
}

fn draw_rect_outline(buffer: &mut [u32], x: i32, y: i32, w: i32, h: i32, color: u32) {
    for px in x..x + w {
        put_pixel(buffer, px, y, color);
        put_pixel(buffer, px, y + h - 1, color);
    }
    for py in y..y + h {
        put_pixel(buffer, x, py, color);
        put_pixel(buffer, x + w - 1, py, color);
    }
}

fn draw_line(buffer: &mut [u32], x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    // Bresenham
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        put_pixel(buffer, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Render one frame of the active view into the buffer.
pub fn render_frame(map: &WorldMap, state: &RenderState, buffer: &mut [u32]) {
    buffer.fill(BACKGROUND);
    match state.mode {
        ViewMode::Detail => render_detail(map, state, buffer),
        ViewMode::Overview => render_overview(map, state, buffer),
    }
}

fn render_detail(map: &WorldMap, state: &RenderState, buffer: &mut [u32]) {
    let camera = state.detail_camera;
    let view = Viewport::of(ViewMode::Detail);
    let t = ViewMode::Detail.tile_pixels() as i32;

    for ty in 0..view.height {
        for tx in 0..view.width {
            let wx = camera.x + tx;
            let wy = camera.y + ty;
            if !map.tiles.in_bounds(wx, wy) {
                continue;
            }
            let (r, g, b) = map.tiles.get(wx as usize, wy as usize).color();
            fill_rect(buffer, tx * t, ty * t, t, t, rgb(r, g, b));
        }
    }

    for s in &map.settlements {
        let (sx, sy) = world_to_screen(ViewMode::Detail, camera, s.x, s.y);
        if sx < -t || sy < -t || sx >= SCREEN_WIDTH as i32 || sy >= SCREEN_HEIGHT as i32 {
            continue;
        }
        let (r, g, b) = s.kind.color();
        fill_rect(buffer, sx + 7, sy + 7, t - 14, t - 14, MARKER_BORDER);
        fill_rect(buffer, sx + 8, sy + 8, t - 16, t - 16, rgb(r, g, b));
    }

    if let Some(id) = state.selection.focused() {
        if let Some(focused) = map.settlement(id) {
            draw_connections(map, focused, camera, buffer);
            let (sx, sy) = world_to_screen(ViewMode::Detail, camera, focused.x, focused.y);
            draw_rect_outline(buffer, sx, sy, t, t, SELECTION_COLOR);
            draw_rect_outline(buffer, sx + 1, sy + 1, t - 2, t - 2, SELECTION_COLOR);
        }
    }

    // Player marker at the viewport center.
    let (mx, my) = (SCREEN_WIDTH as i32 / 2, SCREEN_HEIGHT as i32 / 2);
    draw_line(buffer, mx - 6, my, mx + 6, my, LINK_COLOR);
    draw_line(buffer, mx, my - 6, mx, my + 6, LINK_COLOR);

    // Status banner when the player marker stands on a settlement.
    if let Some(id) = state.status {
        if let Some(s) = map.settlement(id) {
            let (r, g, b) = s.kind.color();
            let h = 8;
            fill_rect(
                buffer,
                0,
                SCREEN_HEIGHT as i32 - h,
                SCREEN_WIDTH as i32,
                h,
                rgb(r, g, b),
            );
        }
    }
}

/// Lines from the focused settlement to its liege and its vassals.
fn draw_connections(map: &WorldMap, focused: &Settlement, camera: Camera, buffer: &mut [u32]) {
    let t = ViewMode::Detail.tile_pixels() as i32;
    let (fx, fy) = world_to_screen(ViewMode::Detail, camera, focused.x, focused.y);
    let (fx, fy) = (fx + t / 2, fy + t / 2);

    let mut link = |other: &Settlement| {
        let (ox, oy) = world_to_screen(ViewMode::Detail, camera, other.x, other.y);
        draw_line(buffer, fx, fy, ox + t / 2, oy + t / 2, LINK_COLOR);
    };

    if let Some(liege) = focused.liege.and_then(|id| map.settlement(id)) {
        link(liege);
    }
    for vassal in map.vassals_of(focused.id) {
        link(vassal);
    }
}

fn render_overview(map: &WorldMap, state: &RenderState, buffer: &mut [u32]) {
    let camera = state.overview_camera;

    for py in 0..SCREEN_HEIGHT {
        for px in 0..SCREEN_WIDTH {
            let wx = camera.x + px as i32;
            let wy = camera.y + py as i32;
            if !map.tiles.in_bounds(wx, wy) {
                continue;
            }
            let (r, g, b) = map.tiles.get(wx as usize, wy as usize).color();
            buffer[py * SCREEN_WIDTH + px] = rgb(r, g, b);
        }
    }

    for s in &map.settlements {
        let (sx, sy) = world_to_screen(ViewMode::Overview, camera, s.x, s.y);
        let (r, g, b) = s.kind.color();
        fill_rect(buffer, sx - 1, sy - 1, 3, 3, rgb(r, g, b));
    }

    // Indicator for where the detail viewport sits; clipped, not skipped,
    // when partially off-screen.
    let detail_view = Viewport::of(ViewMode::Detail);
    let (ix, iy) = world_to_screen(
        ViewMode::Overview,
        camera,
        state.detail_camera.x,
        state.detail_camera.y,
    );
    draw_rect_outline(buffer, ix, iy, detail_view.width, detail_view.height, INDICATOR_COLOR);
    draw_rect_outline(
        buffer,
        ix - 1,
        iy - 1,
        detail_view.width + 2,
        detail_view.height + 2,
        INDICATOR_COLOR,
    );
}

/// Progress screen shown while generation runs: a centered bar over a
/// cleared background.
pub fn render_progress(buffer: &mut [u32], fraction: f32) {
    buffer.fill(BACKGROUND);
    let bar_w = 600;
    let bar_h = 26;
    let x = (SCREEN_WIDTH as i32 - bar_w) / 2;
    let y = (SCREEN_HEIGHT as i32 - bar_h) / 2;
    draw_rect_outline(buffer, x, y, bar_w, bar_h, PROGRESS_FRAME);
    let fill = ((bar_w - 4) as f32 * fraction.clamp(0.0, 1.0)) as i32;
    fill_rect(buffer, x + 2, y + 2, fill, bar_h - 4, PROGRESS_FILL);
}

/// Export the whole map as a PNG, one pixel per tile, settlements
/// overdrawn in their kind colors.
pub fn export_png(map: &WorldMap, filename: &str) -> Result<(), Box<dyn Error>> {
    let mut img: RgbImage = ImageBuffer::new(map.width as u32, map.height as u32);
    for (x, y, t) in map.tiles.iter() {
        let (r, g, b) = t.color();
        img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
    }
    for s in &map.settlements {
        let (r, g, b) = s.kind.color();
        img.put_pixel(s.x as u32, s.y as u32, Rgb([r, g, b]));
    }
    img.save(filename)?;
    Ok(())
}
