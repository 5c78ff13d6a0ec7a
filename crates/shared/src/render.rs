//! Map drawing, expressed against an abstract [`Canvas`].
//!
//! Hosts implement `Canvas` for whatever surface they own (SVG string, GPU
//! texture, test recorder). After the view transform is applied every draw
//! call is in bitmap pixel space, so grid and markers pan and zoom with the
//! image.

use crate::grid;
use crate::models::{CellPosition, PlayerAppearance, PlayerShape, Rgb};
use crate::transform::ViewTransform;
use crate::viewport::Bitmap;

pub const ERROR_TEXT: &str = "Error: Mapa no encontrado";
pub const ERROR_BACKGROUND: Rgb = Rgb::RED;
pub const ERROR_TEXT_COLOR: Rgb = Rgb::WHITE;
pub const ERROR_TEXT_SIZE: f64 = 32.0;
const ERROR_TEXT_POS: (f64, f64) = (50.0, 50.0);

pub const GRID_STROKE: Stroke = Stroke {
    color: Rgb::GRAY,
    width: 2.0,
};

/// The remote player is always a red circle.
pub const REMOTE_PLAYER_COLOR: Rgb = Rgb::RED;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
}

/// A 2D drawing surface with a save/restore transform stack.
///
/// `scale` and `translate` compose onto the current transform the same way
/// they do on an HTML canvas: later calls act in the already-transformed space.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn scale(&mut self, s: f64);
    fn translate(&mut self, dx: f64, dy: f64);

    /// Fill the whole surface, ignoring the current transform.
    fn fill(&mut self, color: Rgb);
    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgb);
    fn image(&mut self, bitmap: &Bitmap, x: f64, y: f64);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke);
    fn rect(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: Rgb);
    fn circle(&mut self, center: (f64, f64), radius: f64, color: Rgb);
    fn polygon(&mut self, points: &[(f64, f64)], color: Rgb);
}

/// Everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub background: Option<&'a Bitmap>,
    pub transform: &'a ViewTransform,
    pub appearance: PlayerAppearance,
    pub local: Option<CellPosition>,
    pub remote: Option<CellPosition>,
}

pub fn render_map<C: Canvas + ?Sized>(canvas: &mut C, scene: &Scene<'_>) {
    let Some(bitmap) = scene.background else {
        render_error(canvas);
        return;
    };

    let s = scene.transform.scale();
    let (ox, oy) = scene.transform.offset();

    canvas.save();
    canvas.scale(s);
    canvas.translate(ox / s, oy / s);

    canvas.image(bitmap, 0.0, 0.0);

    let (w, h) = (f64::from(bitmap.width), f64::from(bitmap.height));
    draw_grid(canvas, w, h);

    if let Some(pos) = scene.local {
        draw_local_player(canvas, w, h, pos, scene.appearance);
    }
    if let Some(pos) = scene.remote {
        draw_remote_player(canvas, w, h, pos);
    }

    canvas.restore();
}

fn render_error<C: Canvas + ?Sized>(canvas: &mut C) {
    canvas.fill(ERROR_BACKGROUND);
    canvas.text(
        ERROR_TEXT,
        ERROR_TEXT_POS.0,
        ERROR_TEXT_POS.1,
        ERROR_TEXT_SIZE,
        ERROR_TEXT_COLOR,
    );
}

fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C, w: f64, h: f64) {
    for i in 0..=grid::GRID_COLS {
        let x = grid::grid_col_px(w, i);
        canvas.line((x, 0.0), (x, h), GRID_STROKE);
    }
    for i in 0..=grid::GRID_ROWS {
        let y = grid::grid_row_px(h, i);
        canvas.line((0.0, y), (w, y), GRID_STROKE);
    }
}

fn draw_local_player<C: Canvas + ?Sized>(
    canvas: &mut C,
    w: f64,
    h: f64,
    pos: CellPosition,
    appearance: PlayerAppearance,
) {
    let (cw, ch) = grid::cell_size(w, h);
    let (x, y) = grid::cell_center(w, h, pos);
    let color = appearance.color.rgb();
    match appearance.shape {
        PlayerShape::Triangle => {
            let size = cw / 2.0;
            canvas.polygon(&[(x, y - size), (x - size, y + size), (x + size, y + size)], color);
        }
        PlayerShape::Circle => canvas.circle((x, y), cw / 4.0, color),
        PlayerShape::Square => {
            canvas.rect(x - cw / 4.0, y - ch / 4.0, x + cw / 4.0, y + ch / 4.0, color)
        }
    }
}

fn draw_remote_player<C: Canvas + ?Sized>(canvas: &mut C, w: f64, h: f64, pos: CellPosition) {
    let (cw, _) = grid::cell_size(w, h);
    canvas.circle(grid::cell_center(w, h, pos), cw / 4.0, REMOTE_PLAYER_COLOR);
}
