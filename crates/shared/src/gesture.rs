//! Touch gesture classification.
//!
//! The host feeds raw pointer events in screen pixels; the detector reports
//! either a pinch (two or more pointers) or a drag (one pointer, past the
//! touch slop, never while pinching).

use std::collections::BTreeMap;

/// Movement below this is treated as a tap rather than a drag.
pub const TOUCH_SLOP: f64 = 8.0;

/// Spans shorter than this are too noisy to derive a zoom factor from.
const MIN_PINCH_SPAN: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { id: u64, x: f64, y: f64 },
    Move { id: u64, x: f64, y: f64 },
    Up { id: u64 },
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Scroll distance since the previous sample: previous minus current.
    Drag { dx: f64, dy: f64 },
    /// Incremental span ratio since the previous sample, about `focus`.
    Pinch { scale: f64, focus: (f64, f64) },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchOutcome {
    pub consumed: bool,
    pub gesture: Option<Gesture>,
}

impl TouchOutcome {
    fn consumed(gesture: Option<Gesture>) -> Self {
        TouchOutcome { consumed: true, gesture }
    }

    fn ignored() -> Self {
        TouchOutcome::default()
    }
}

#[derive(Debug, Default)]
pub struct GestureDetector {
    pointers: BTreeMap<u64, (f64, f64)>,
    pinching: bool,
    last_span: Option<f64>,
    down_pos: Option<(f64, f64)>,
    last_pos: (f64, f64),
    scrolling: bool,
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

impl GestureDetector {
    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    fn centroid(&self) -> (f64, f64) {
        let n = self.pointers.len().max(1) as f64;
        let (sx, sy) = self
            .pointers
            .values()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
        (sx / n, sy / n)
    }

    /// Twice the mean distance of the pointers from their centroid. For two
    /// pointers this is the distance between them.
    fn span(&self) -> f64 {
        let c = self.centroid();
        let n = self.pointers.len().max(1) as f64;
        let total: f64 = self.pointers.values().map(|p| point_distance(*p, c)).sum();
        2.0 * total / n
    }

    /// Start single-pointer tracking from `pos`; the slop applies again.
    fn anchor(&mut self, pos: (f64, f64)) {
        self.down_pos = Some(pos);
        self.last_pos = pos;
        self.scrolling = false;
    }

    pub fn handle(&mut self, event: PointerEvent) -> TouchOutcome {
        match event {
            PointerEvent::Down { id, x, y } => {
                self.pointers.insert(id, (x, y));
                if self.pointers.len() >= 2 {
                    self.pinching = true;
                    self.last_span = Some(self.span());
                    self.down_pos = None;
                    self.scrolling = false;
                } else {
                    self.anchor((x, y));
                }
                TouchOutcome::consumed(None)
            }
            PointerEvent::Move { id, x, y } => {
                let Some(pos) = self.pointers.get_mut(&id) else {
                    return TouchOutcome::ignored();
                };
                *pos = (x, y);
                TouchOutcome::consumed(self.pinch_sample().or_else(|| self.drag_sample((x, y))))
            }
            PointerEvent::Up { id } => {
                if self.pointers.remove(&id).is_none() {
                    return TouchOutcome::ignored();
                }
                match self.pointers.len() {
                    0 => self.reset(),
                    1 => {
                        self.pinching = false;
                        self.last_span = None;
                        if let Some(&pos) = self.pointers.values().next() {
                            self.anchor(pos);
                        }
                    }
                    _ => self.last_span = Some(self.span()),
                }
                TouchOutcome::consumed(None)
            }
            PointerEvent::Cancel => {
                let had_pointers = !self.pointers.is_empty();
                self.reset();
                TouchOutcome { consumed: had_pointers, gesture: None }
            }
        }
    }

    fn pinch_sample(&mut self) -> Option<Gesture> {
        if !self.pinching || self.pointers.len() < 2 {
            return None;
        }
        let span = self.span();
        let prev = self.last_span.replace(span)?;
        if prev < MIN_PINCH_SPAN || span < MIN_PINCH_SPAN {
            return None;
        }
        let gesture = Gesture::Pinch {
            scale: span / prev,
            focus: self.centroid(),
        };
        tracing::trace!(?gesture, "pinch");
        Some(gesture)
    }

    fn drag_sample(&mut self, cur: (f64, f64)) -> Option<Gesture> {
        if self.pinching || self.pointers.len() != 1 {
            return None;
        }
        if !self.scrolling {
            let start = self.down_pos?;
            if point_distance(start, cur) <= TOUCH_SLOP {
                return None;
            }
            self.scrolling = true;
        }
        let gesture = Gesture::Drag {
            dx: self.last_pos.0 - cur.0,
            dy: self.last_pos.1 - cur.1,
        };
        self.last_pos = cur;
        tracing::trace!(?gesture, "drag");
        Some(gesture)
    }

    fn reset(&mut self) {
        *self = GestureDetector::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: u64, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down { id, x, y }
    }

    fn mv(id: u64, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move { id, x, y }
    }

    #[test]
    fn test_small_move_is_not_a_drag() {
        let mut d = GestureDetector::default();
        assert!(d.handle(down(1, 100.0, 100.0)).consumed);
        let out = d.handle(mv(1, 104.0, 103.0));
        assert!(out.consumed);
        assert_eq!(out.gesture, None);
    }

    #[test]
    fn test_drag_past_slop_reports_full_distance() {
        let mut d = GestureDetector::default();
        d.handle(down(1, 100.0, 100.0));
        d.handle(mv(1, 104.0, 100.0));
        let out = d.handle(mv(1, 80.0, 100.0));
        assert_eq!(out.gesture, Some(Gesture::Drag { dx: 20.0, dy: 0.0 }));
        let out = d.handle(mv(1, 70.0, 90.0));
        assert_eq!(out.gesture, Some(Gesture::Drag { dx: 10.0, dy: 10.0 }));
    }

    #[test]
    fn test_two_pointers_pinch() {
        let mut d = GestureDetector::default();
        d.handle(down(1, 100.0, 100.0));
        d.handle(down(2, 200.0, 100.0));
        assert!(d.is_pinching());
        let out = d.handle(mv(2, 300.0, 100.0));
        match out.gesture {
            Some(Gesture::Pinch { scale, focus }) => {
                assert!((scale - 2.0).abs() < 1e-9);
                assert!((focus.0 - 200.0).abs() < 1e-9);
                assert!((focus.1 - 100.0).abs() < 1e-9);
            }
            other => panic!("expected pinch, got {other:?}"),
        }
    }

    #[test]
    fn test_no_drag_while_pinching() {
        let mut d = GestureDetector::default();
        d.handle(down(1, 100.0, 100.0));
        d.handle(down(2, 200.0, 100.0));
        // Moving both fingers together keeps the span: pinch of 1.0, never a drag.
        let out = d.handle(mv(1, 150.0, 100.0));
        assert!(!matches!(out.gesture, Some(Gesture::Drag { .. })));
    }

    #[test]
    fn test_lifting_to_one_finger_reanchors() {
        let mut d = GestureDetector::default();
        d.handle(down(1, 100.0, 100.0));
        d.handle(down(2, 200.0, 100.0));
        d.handle(PointerEvent::Up { id: 2 });
        assert!(!d.is_pinching());
        assert_eq!(d.active_pointers(), 1);
        // Within slop of the remaining finger: nothing.
        assert_eq!(d.handle(mv(1, 105.0, 100.0)).gesture, None);
        let out = d.handle(mv(1, 130.0, 100.0));
        assert_eq!(out.gesture, Some(Gesture::Drag { dx: -30.0, dy: 0.0 }));
    }

    #[test]
    fn test_unknown_pointer_not_consumed() {
        let mut d = GestureDetector::default();
        assert!(!d.handle(mv(9, 1.0, 1.0)).consumed);
        assert!(!d.handle(PointerEvent::Up { id: 9 }).consumed);
        assert!(!d.handle(PointerEvent::Cancel).consumed);
    }

    #[test]
    fn test_cancel_resets() {
        let mut d = GestureDetector::default();
        d.handle(down(1, 0.0, 0.0));
        d.handle(down(2, 50.0, 0.0));
        assert!(d.handle(PointerEvent::Cancel).consumed);
        assert!(!d.is_pinching());
        assert_eq!(d.active_pointers(), 0);
    }
}
