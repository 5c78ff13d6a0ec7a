/// Map grid system.
///
/// The background image is split into a fixed 10x10 grid. Nothing about the
/// grid is stored: every cell dimension is derived from the bitmap size, so a
/// cell is always one tenth of the image on each axis.
use crate::models::CellPosition;

// Grid dimensions
pub const GRID_COLS: usize = 10;
pub const GRID_ROWS: usize = 10;

/// Width and height of one cell in bitmap pixels.
pub fn cell_size(bitmap_w: f64, bitmap_h: f64) -> (f64, f64) {
    (bitmap_w / GRID_COLS as f64, bitmap_h / GRID_ROWS as f64)
}

/// Centre of a cell in bitmap pixels.
///
/// Positions are not validated; a cell outside 0..10 yields a centre outside
/// the bitmap, which simply renders off-canvas.
pub fn cell_center(bitmap_w: f64, bitmap_h: f64, pos: CellPosition) -> (f64, f64) {
    let (cw, ch) = cell_size(bitmap_w, bitmap_h);
    (
        pos.col as f64 * cw + cw / 2.0,
        pos.row as f64 * ch + ch / 2.0,
    )
}

/// Get the pixel X position for a grid column line (0-based line index, 0..=10).
pub fn grid_col_px(bitmap_w: f64, col: usize) -> f64 {
    col as f64 * (bitmap_w / GRID_COLS as f64)
}

/// Get the pixel Y position for a grid row line (0-based line index, 0..=10).
pub fn grid_row_px(bitmap_h: f64, row: usize) -> f64 {
    row as f64 * (bitmap_h / GRID_ROWS as f64)
}

/// Cell containing a bitmap pixel, or `None` when the pixel is off the image.
pub fn cell_at(bitmap_w: f64, bitmap_h: f64, px_x: f64, px_y: f64) -> Option<CellPosition> {
    if bitmap_w <= 0.0 || bitmap_h <= 0.0 {
        return None;
    }
    if px_x < 0.0 || px_y < 0.0 || px_x >= bitmap_w || px_y >= bitmap_h {
        return None;
    }
    let (cw, ch) = cell_size(bitmap_w, bitmap_h);
    let col = ((px_x / cw) as usize).min(GRID_COLS - 1);
    let row = ((px_y / ch) as usize).min(GRID_ROWS - 1);
    Some(CellPosition::new(col as i32, row as i32))
}
