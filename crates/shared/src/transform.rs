//! Pan / zoom transform for the map viewport.
//!
//! A bitmap point `p` lands on screen at `p * scale + offset`. The offset is
//! kept inside the range where the scaled bitmap covers the whole viewport.

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;

/// Width/height pair, in screen pixels for viewports and bitmap pixels for content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    offset_x: f64,
    offset_y: f64,
    scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

/// Clamp one axis of the offset.
///
/// When the scaled content is at least as long as the viewport the offset
/// stays in `[-(content * scale - viewport), 0]`. A shorter axis has no valid
/// range, so the content is centred on it instead.
pub fn clamp_axis(offset: f64, content_len: f64, scale: f64, viewport_len: f64) -> f64 {
    let scaled = content_len * scale;
    if scaled >= viewport_len {
        offset.clamp(-(scaled - viewport_len), 0.0)
    } else {
        (viewport_len - scaled) / 2.0
    }
}

impl ViewTransform {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Keep the offset inside the bitmap bounds. No-op without a bitmap.
    pub fn clamp(&mut self, content: Option<Size>, viewport: Size) {
        let Some(content) = content else { return };
        self.offset_x = clamp_axis(self.offset_x, content.width, self.scale, viewport.width);
        self.offset_y = clamp_axis(self.offset_y, content.height, self.scale, viewport.height);
    }

    /// Set an absolute zoom level, clamped to `[MIN_SCALE, MAX_SCALE]`.
    /// NaN is ignored.
    pub fn set_scale(&mut self, factor: f64, content: Option<Size>, viewport: Size) {
        if factor.is_nan() {
            return;
        }
        self.scale = factor.clamp(MIN_SCALE, MAX_SCALE);
        self.clamp(content, viewport);
    }

    /// Apply a scroll distance (previous minus current pointer position, in
    /// screen pixels). The distance is divided by the zoom level.
    /// Non-finite distances are ignored.
    pub fn drag(&mut self, dx: f64, dy: f64, content: Option<Size>, viewport: Size) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.offset_x -= dx / self.scale;
        self.offset_y -= dy / self.scale;
        self.clamp(content, viewport);
    }

    /// Apply an incremental pinch factor about a screen focal point.
    ///
    /// The focal correction uses the unclamped `factor`, so at the zoom limits
    /// the focal point drifts slightly.
    pub fn pinch(&mut self, factor: f64, focus: (f64, f64), content: Option<Size>, viewport: Size) {
        if !factor.is_finite() || factor <= 0.0 || !focus.0.is_finite() || !focus.1.is_finite() {
            return;
        }
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset_x += (focus.0 - self.offset_x) * (1.0 - factor);
        self.offset_y += (focus.1 - self.offset_y) * (1.0 - factor);
        self.clamp(content, viewport);
    }

    /// Undo the transform: screen pixels to bitmap pixels.
    pub fn screen_to_bitmap(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: Option<Size> = Some(Size::new(1000.0, 1000.0));
    const VIEW: Size = Size::new(500.0, 500.0);

    #[test]
    fn test_default_is_identity() {
        let t = ViewTransform::default();
        assert!((t.scale() - 1.0).abs() < 1e-9);
        assert_eq!(t.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_set_scale_clamps_to_bounds() {
        let mut t = ViewTransform::default();
        for (input, expected) in [(0.1, 0.5), (0.5, 0.5), (1.7, 1.7), (3.0, 3.0), (9.0, 3.0), (-2.0, 0.5)] {
            t.set_scale(input, MAP, VIEW);
            assert!((t.scale() - expected).abs() < 1e-9, "input {input}");
        }
    }

    #[test]
    fn test_set_scale_infinite_and_nan() {
        let mut t = ViewTransform::default();
        t.set_scale(f64::INFINITY, MAP, VIEW);
        assert!((t.scale() - MAX_SCALE).abs() < 1e-9);
        t.set_scale(f64::NAN, MAP, VIEW);
        assert!((t.scale() - MAX_SCALE).abs() < 1e-9);
    }

    #[test]
    fn test_drag_scenario() {
        let mut t = ViewTransform::default();
        t.drag(100.0, 0.0, MAP, VIEW);
        assert!((t.offset().0 - -100.0).abs() < 1e-9);
        t.drag(1000.0, 0.0, MAP, VIEW);
        assert!((t.offset().0 - -500.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_divides_by_scale() {
        let mut t = ViewTransform::default();
        t.set_scale(2.0, MAP, VIEW);
        t.drag(100.0, 50.0, MAP, VIEW);
        assert!((t.offset().0 - -50.0).abs() < 1e-9);
        assert!((t.offset().1 - -25.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_cannot_go_positive() {
        let mut t = ViewTransform::default();
        t.drag(-300.0, -300.0, MAP, VIEW);
        assert_eq!(t.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_without_bitmap_is_noop() {
        let mut t = ViewTransform::default();
        t.drag(-300.0, 5000.0, None, VIEW);
        assert!((t.offset().0 - 300.0).abs() < 1e-9);
        assert!((t.offset().1 - -5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_keeps_focus_stationary() {
        let mut t = ViewTransform::default();
        t.drag(200.0, 200.0, MAP, VIEW);
        let focus = (250.0, 250.0);
        let before = t.screen_to_bitmap(focus.0, focus.1);
        t.pinch(1.5, focus, MAP, VIEW);
        let after = t.screen_to_bitmap(focus.0, focus.1);
        assert!((t.scale() - 1.5).abs() < 1e-9);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_clamps_scale_but_not_correction() {
        let mut t = ViewTransform::default();
        t.set_scale(2.5, MAP, VIEW);
        t.drag(1000.0, 1000.0, MAP, VIEW);
        let (ox, _) = t.offset();
        t.pinch(2.0, (100.0, 100.0), MAP, VIEW);
        assert!((t.scale() - MAX_SCALE).abs() < 1e-9);
        // Correction applied with the raw factor 2.0: offset += (100 - ox) * -1.
        let expected = (ox - (100.0 - ox)).clamp(-(1000.0 * MAX_SCALE - 500.0), 0.0);
        assert!((t.offset().0 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_ignores_invalid_factor() {
        let mut t = ViewTransform::default();
        t.pinch(0.0, (10.0, 10.0), MAP, VIEW);
        t.pinch(f64::NAN, (10.0, 10.0), MAP, VIEW);
        assert_eq!(t, ViewTransform::default());
    }

    #[test]
    fn test_drag_ignores_nan() {
        let mut t = ViewTransform::default();
        t.drag(f64::NAN, 0.0, MAP, VIEW);
        t.drag(0.0, f64::INFINITY, MAP, VIEW);
        assert_eq!(t, ViewTransform::default());
        t.drag(100.0, 0.0, MAP, VIEW);
        assert!((t.offset().0 - -100.0).abs() < 1e-9);
        assert!(t.offset().1.is_finite());
    }

    #[test]
    fn test_pinch_ignores_nan_focus() {
        let mut t = ViewTransform::default();
        t.pinch(1.2, (f64::NAN, 10.0), MAP, VIEW);
        t.pinch(1.2, (10.0, f64::NEG_INFINITY), MAP, VIEW);
        assert_eq!(t, ViewTransform::default());
        t.pinch(1.2, (10.0, 10.0), MAP, VIEW);
        assert!(t.offset().0.is_finite() && t.offset().1.is_finite());
        assert!((t.scale() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_offset_stays_in_bounds_after_gesture_sequence() {
        let mut t = ViewTransform::default();
        let ops: [(f64, f64, f64); 6] = [
            (350.0, -20.0, 1.3),
            (-90.0, 800.0, 0.7),
            (40.0, 40.0, 2.9),
            (-1200.0, 15.0, 1.1),
            (600.0, 600.0, 0.95),
            (-5.0, -5.0, 1.6),
        ];
        for (dx, dy, factor) in ops {
            t.drag(dx, dy, MAP, VIEW);
            t.pinch(factor, (dx.abs() % 500.0, dy.abs() % 500.0), MAP, VIEW);
            let s = t.scale();
            assert!((MIN_SCALE..=MAX_SCALE).contains(&s));
            let (ox, oy) = t.offset();
            if 1000.0 * s >= 500.0 {
                let min = -(1000.0 * s - 500.0);
                assert!(ox >= min - 1e-9 && ox <= 1e-9, "ox {ox} at scale {s}");
                assert!(oy >= min - 1e-9 && oy <= 1e-9, "oy {oy} at scale {s}");
            }
        }
    }

    #[test]
    fn test_small_bitmap_is_centred() {
        let mut t = ViewTransform::default();
        let small = Some(Size::new(400.0, 1000.0));
        t.set_scale(1.0, small, VIEW);
        let (ox, oy) = t.offset();
        assert!((ox - 50.0).abs() < 1e-9);
        assert!((oy - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_down_bitmap_is_centred_on_both_axes() {
        let mut t = ViewTransform::default();
        t.set_scale(0.4, MAP, VIEW);
        let (ox, oy) = t.offset();
        // 0.4 clamps to 0.5: 500px of content in a 500px viewport.
        assert!((ox - 0.0).abs() < 1e-9);
        assert!((oy - 0.0).abs() < 1e-9);

        let mut t = ViewTransform::default();
        t.set_scale(0.5, MAP, Size::new(800.0, 600.0));
        let (ox, oy) = t.offset();
        assert!((ox - 150.0).abs() < 1e-9);
        assert!((oy - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_to_bitmap() {
        let mut t = ViewTransform::default();
        t.set_scale(2.0, MAP, VIEW);
        t.drag(200.0, 100.0, MAP, VIEW);
        // offset = (-100, -50)
        let (x, y) = t.screen_to_bitmap(100.0, 50.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }
}
