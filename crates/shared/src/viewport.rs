//! The scrollable, zoomable map view.
//!
//! `MapViewport` owns the transform, the background bitmap and the two
//! player markers. The host framework drives it: it forwards pointer events
//! to [`MapViewport::on_touch`], reports layout with
//! [`MapViewport::set_viewport_size`], and calls [`MapViewport::draw`] when
//! [`MapViewport::take_redraw`] says a frame is pending.

use crate::gesture::{Gesture, GestureDetector, PointerEvent};
use crate::models::{CellPosition, PlayerAppearance};
use crate::prefs::{self, PreferenceBag};
use crate::render::{self, Canvas, Scene};
use crate::transform::{Size, ViewTransform};

/// A decoded background image. `source` is whatever the host's canvas needs
/// to locate the pixels (a URL, a file path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl Bitmap {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Bitmap {
            source: source.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode asset: {0}")]
    Decode(String),
    #[error("asset i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves the bundled background image.
pub trait AssetProvider {
    fn load_background(&self) -> Result<Bitmap, AssetError>;
}

#[derive(Debug)]
pub struct MapViewport {
    background: Option<Bitmap>,
    transform: ViewTransform,
    viewport: Size,
    appearance: PlayerAppearance,
    local_player: Option<CellPosition>,
    remote_player: Option<CellPosition>,
    gestures: GestureDetector,
    needs_redraw: bool,
}

impl MapViewport {
    /// Load the background and the player appearance.
    ///
    /// A failed image load is logged and leaves the view in its error state
    /// for good; it is never returned to the caller.
    pub fn new<A, P>(assets: &A, preferences: &P, viewport: Size) -> Self
    where
        A: AssetProvider + ?Sized,
        P: PreferenceBag + ?Sized,
    {
        let background = match assets.load_background() {
            Ok(bitmap) => {
                tracing::info!(
                    source = %bitmap.source,
                    width = bitmap.width,
                    height = bitmap.height,
                    "Loaded map background"
                );
                Some(bitmap)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Map background unavailable, showing placeholder");
                None
            }
        };
        let appearance = prefs::load_appearance(preferences);

        let mut view = MapViewport {
            background,
            transform: ViewTransform::default(),
            viewport,
            appearance,
            local_player: None,
            remote_player: None,
            gestures: GestureDetector::default(),
            needs_redraw: true,
        };
        view.clamp();
        view
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn background(&self) -> Option<&Bitmap> {
        self.background.as_ref()
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    pub fn offset(&self) -> (f64, f64) {
        self.transform.offset()
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn appearance(&self) -> PlayerAppearance {
        self.appearance
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn local_player_position(&self) -> Option<CellPosition> {
        self.local_player
    }

    pub fn remote_player_position(&self) -> Option<CellPosition> {
        self.remote_player
    }

    fn content_size(&self) -> Option<Size> {
        self.background.as_ref().map(Bitmap::size)
    }

    fn clamp(&mut self) {
        let content = self.content_size();
        self.transform.clamp(content, self.viewport);
    }

    fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Whether a draw is pending. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn set_local_player_position(&mut self, pos: Option<CellPosition>) {
        self.local_player = pos;
        self.invalidate();
    }

    pub fn set_remote_player_position(&mut self, pos: Option<CellPosition>) {
        self.remote_player = pos;
        self.invalidate();
    }

    pub fn set_scale(&mut self, factor: f64) {
        let content = self.content_size();
        self.transform.set_scale(factor, content, self.viewport);
        self.invalidate();
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        if self.viewport == size {
            return;
        }
        self.viewport = size;
        self.clamp();
        self.invalidate();
    }

    /// Pan by a scroll distance in screen pixels (previous minus current).
    pub fn drag(&mut self, dx: f64, dy: f64) {
        let content = self.content_size();
        self.transform.drag(dx, dy, content, self.viewport);
        self.invalidate();
    }

    /// Zoom by an incremental factor about a screen-space focal point.
    pub fn pinch(&mut self, factor: f64, focus: (f64, f64)) {
        let content = self.content_size();
        self.transform.pinch(factor, focus, content, self.viewport);
        self.invalidate();
    }

    /// Feed one pointer event from the host. Returns whether it was consumed.
    pub fn on_touch(&mut self, event: PointerEvent) -> bool {
        let outcome = self.gestures.handle(event);
        match outcome.gesture {
            Some(Gesture::Pinch { scale, focus }) => self.pinch(scale, focus),
            Some(Gesture::Drag { dx, dy }) => self.drag(dx, dy),
            None => {}
        }
        outcome.consumed
    }

    /// Cell under a screen point, for hosts that place markers by tapping.
    pub fn cell_at_screen(&self, x: f64, y: f64) -> Option<CellPosition> {
        let bitmap = self.background.as_ref()?;
        let (bx, by) = self.transform.screen_to_bitmap(x, y);
        crate::grid::cell_at(f64::from(bitmap.width), f64::from(bitmap.height), bx, by)
    }

    /// Render the current state without touching the redraw flag.
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let scene = Scene {
            background: self.background.as_ref(),
            transform: &self.transform,
            appearance: self.appearance,
            local: self.local_player,
            remote: self.remote_player,
        };
        render::render_map(canvas, &scene);
    }

    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        self.paint(canvas);
        self.needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerColor, PlayerShape, Rgb};
    use crate::prefs::{MemoryPreferences, COLOR_KEY, SHAPE_KEY};
    use crate::render::testing::{DrawOp, RecordingCanvas};
    use crate::transform::{MAX_SCALE, MIN_SCALE};

    struct StaticAssets(Option<Bitmap>);

    impl AssetProvider for StaticAssets {
        fn load_background(&self) -> Result<Bitmap, AssetError> {
            self.0
                .clone()
                .ok_or_else(|| AssetError::NotFound("escom_mapa.png".to_string()))
        }
    }

    fn map_1000() -> StaticAssets {
        StaticAssets(Some(Bitmap::new("escom_mapa.png", 1000, 1000)))
    }

    fn viewport(assets: &StaticAssets) -> MapViewport {
        MapViewport::new(assets, &MemoryPreferences::default(), Size::new(500.0, 500.0))
    }

    #[test]
    fn test_missing_background_renders_placeholder() {
        let mut view = viewport(&StaticAssets(None));
        assert!(!view.has_background());
        view.set_local_player_position(Some(CellPosition::new(1, 1)));
        let mut canvas = RecordingCanvas::default();
        view.draw(&mut canvas);
        assert_eq!(canvas.ops[0], DrawOp::Fill(Rgb::RED));
        assert_eq!(canvas.ops.len(), 2);
    }

    #[test]
    fn test_missing_background_skips_clamping() {
        let mut view = viewport(&StaticAssets(None));
        view.drag(-100.0, -100.0);
        assert_eq!(view.offset(), (100.0, 100.0));
    }

    #[test]
    fn test_drag_scenario() {
        let mut view = viewport(&map_1000());
        view.drag(100.0, 0.0);
        assert!((view.offset().0 - -100.0).abs() < 1e-9);
        view.drag(1000.0, 0.0);
        assert!((view.offset().0 - -500.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_scale_clamps() {
        let mut view = viewport(&map_1000());
        view.set_scale(10.0);
        assert!((view.scale() - MAX_SCALE).abs() < 1e-9);
        view.set_scale(0.01);
        assert!((view.scale() - MIN_SCALE).abs() < 1e-9);
    }

    #[test]
    fn test_set_scale_reclamps_offset() {
        let mut view = viewport(&map_1000());
        view.set_scale(3.0);
        view.drag(3000.0, 3000.0);
        assert!((view.offset().0 - -1000.0).abs() < 1e-9);
        view.set_scale(1.0);
        assert!((view.offset().0 - -500.0).abs() < 1e-9);
        assert!((view.offset().1 - -500.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_setters_invalidate() {
        let mut view = viewport(&map_1000());
        let mut canvas = RecordingCanvas::default();
        view.draw(&mut canvas);
        assert!(!view.take_redraw());
        view.set_remote_player_position(Some(CellPosition::new(3, 3)));
        assert!(view.take_redraw());
        assert!(!view.take_redraw());
        view.set_local_player_position(None);
        assert!(view.take_redraw());
    }

    #[test]
    fn test_clearing_position_removes_marker() {
        let mut view = viewport(&map_1000());
        view.set_remote_player_position(Some(CellPosition::new(3, 3)));
        view.set_remote_player_position(None);
        let mut canvas = RecordingCanvas::default();
        view.draw(&mut canvas);
        assert_eq!(canvas.count(|op| matches!(op, DrawOp::Circle(..))), 0);
    }

    #[test]
    fn test_appearance_from_preferences() {
        let mut bag = MemoryPreferences::default();
        bag.put_all(&[(COLOR_KEY, "Rojo"), (SHAPE_KEY, "Triángulo")]).unwrap();
        let view = MapViewport::new(&map_1000(), &bag, Size::new(500.0, 500.0));
        assert_eq!(view.appearance().color, PlayerColor::Red);
        assert_eq!(view.appearance().shape, PlayerShape::Triangle);
    }

    #[test]
    fn test_appearance_defaults_without_preferences() {
        let mut view = viewport(&map_1000());
        view.set_local_player_position(Some(CellPosition::new(0, 0)));
        let mut canvas = RecordingCanvas::default();
        view.draw(&mut canvas);
        assert!(canvas.ops.contains(&DrawOp::Rect(25.0, 25.0, 75.0, 75.0, Rgb::BLUE)));
    }

    #[test]
    fn test_touch_drag_moves_offset() {
        let mut view = viewport(&map_1000());
        assert!(view.on_touch(PointerEvent::Down { id: 0, x: 300.0, y: 300.0 }));
        assert!(view.on_touch(PointerEvent::Move { id: 0, x: 200.0, y: 250.0 }));
        assert!((view.offset().0 - -100.0).abs() < 1e-9);
        assert!((view.offset().1 - -50.0).abs() < 1e-9);
        assert!(view.on_touch(PointerEvent::Up { id: 0 }));
    }

    #[test]
    fn test_touch_pinch_zooms() {
        let mut view = viewport(&map_1000());
        view.on_touch(PointerEvent::Down { id: 0, x: 200.0, y: 250.0 });
        view.on_touch(PointerEvent::Down { id: 1, x: 300.0, y: 250.0 });
        view.on_touch(PointerEvent::Move { id: 1, x: 350.0, y: 250.0 });
        // span 100 -> 150
        assert!((view.scale() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_touch_unknown_pointer_not_consumed() {
        let mut view = viewport(&map_1000());
        assert!(!view.on_touch(PointerEvent::Move { id: 4, x: 1.0, y: 1.0 }));
    }

    #[test]
    fn test_resize_reclamps() {
        let mut view = viewport(&map_1000());
        view.drag(500.0, 500.0);
        view.take_redraw();
        view.set_viewport_size(Size::new(800.0, 800.0));
        assert!((view.offset().0 - -200.0).abs() < 1e-9);
        assert!(view.take_redraw());
    }

    #[test]
    fn test_cell_at_screen() {
        let mut view = viewport(&map_1000());
        view.set_scale(2.0);
        view.drag(200.0, 0.0);
        // offset (-100, 0) at scale 2: screen (150, 150) is bitmap (125, 75)
        assert_eq!(view.cell_at_screen(150.0, 150.0), Some(CellPosition::new(1, 0)));
        assert_eq!(viewport(&StaticAssets(None)).cell_at_screen(1.0, 1.0), None);
    }
}
