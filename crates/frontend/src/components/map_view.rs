use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use escom_shared::gesture::{PointerEvent, TOUCH_SLOP};
use escom_shared::models::CellPosition;
use escom_shared::svg::SvgCanvas;
use escom_shared::transform::Size;
use escom_shared::viewport::{AssetError, AssetProvider, Bitmap, MapViewport};
use wasm_bindgen::JsCast;

use crate::coords;
use crate::storage::LocalStoragePreferences;

const MAP_IMAGE: Asset = asset!("/assets/escom_mapa.png");
const MAP_IMAGE_ID: &str = "escom-map-image";

/// Mouse input is fed to the gesture detector as one extra pointer.
const MOUSE_POINTER_ID: u64 = u64::MAX;

/// Wheel notches zoom by this factor, centred on the cursor.
const ZOOM_STEP: f64 = 1.1;

/// Natural size reported by the browser once the `<img>` settles.
/// `size` is `None` when the load failed.
struct LoadedImage {
    url: String,
    size: Option<(u32, u32)>,
}

impl AssetProvider for LoadedImage {
    fn load_background(&self) -> Result<Bitmap, AssetError> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => Ok(Bitmap::new(self.url.clone(), w, h)),
            Some(_) => Err(AssetError::Decode(format!("{} has no pixels", self.url))),
            None => Err(AssetError::NotFound(self.url.clone())),
        }
    }
}

fn image_natural_size() -> Option<(u32, u32)> {
    let document = web_sys::window()?.document()?;
    let img = document
        .get_element_by_id(MAP_IMAGE_ID)?
        .dyn_into::<web_sys::HtmlImageElement>()
        .ok()?;
    Some((img.natural_width(), img.natural_height()))
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn wheel_zoom_factor(delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        ZOOM_STEP
    } else {
        1.0 / ZOOM_STEP
    }
}

/// A press and release this close together is a tap.
fn is_tap(down: (f64, f64), up: (f64, f64)) -> bool {
    let dx = down.0 - up.0;
    let dy = down.1 - up.1;
    (dx * dx + dy * dy).sqrt() <= TOUCH_SLOP
}

/// Follows one press from any pointer source and reports its release
/// position when it stayed within the touch slop. A second pointer going
/// down (pinch) spoils the tap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TapTracker {
    press: Option<(u64, (f64, f64))>,
    pointers: usize,
}

impl TapTracker {
    fn down(&mut self, id: u64, pos: (f64, f64)) {
        self.pointers += 1;
        self.press = if self.pointers == 1 { Some((id, pos)) } else { None };
    }

    fn moved(&mut self, id: u64, pos: (f64, f64)) {
        if let Some((pressed, start)) = self.press {
            if pressed == id && !is_tap(start, pos) {
                self.press = None;
            }
        }
    }

    /// Returns the tap position if this release completes a tap.
    fn up(&mut self, id: u64, pos: (f64, f64)) -> Option<(f64, f64)> {
        self.pointers = self.pointers.saturating_sub(1);
        match self.press {
            Some((pressed, start)) if pressed == id => {
                self.press = None;
                is_tap(start, pos).then_some(pos)
            }
            _ => None,
        }
    }

    fn cancel(&mut self) {
        *self = TapTracker::default();
    }
}

/// Whether a fresh container measurement differs from the viewport's size.
fn needs_resize(view: Option<&MapViewport>, measured: Size) -> bool {
    view.is_some_and(|view| view.viewport_size() != measured)
}

fn paint_svg(view: &MapViewport) -> String {
    let size = view.viewport_size();
    let mut canvas = SvgCanvas::new(size.width, size.height);
    view.paint(&mut canvas);
    canvas.finish()
}

#[component]
pub fn MapView(
    local_player: Signal<Option<CellPosition>>,
    remote_player: Signal<Option<CellPosition>>,
) -> Element {
    // Mutable binding for tap placement (Signal is Copy)
    let mut local_player = local_player;

    let mut viewport = use_signal(|| None::<MapViewport>);
    let mut tap = use_signal(TapTracker::default);

    // Build the viewport once the browser has settled the image either way.
    let mut attach = move |size: Option<(u32, u32)>| {
        let prefs = LocalStoragePreferences::open();
        let image = LoadedImage {
            url: MAP_IMAGE.to_string(),
            size,
        };
        let mut view = MapViewport::new(&image, &prefs, coords::container_size());
        view.set_local_player_position(*local_player.peek());
        view.set_remote_player_position(*remote_player.peek());
        viewport.set(Some(view));
    };

    let mut dispatch = move |event: PointerEvent| {
        if let Some(view) = viewport.write().as_mut() {
            view.on_touch(event);
        }
    };

    // Re-measure the container; only writes when the layout actually changed.
    let mut sync_size = move || {
        let size = coords::container_size();
        if needs_resize(viewport.peek().as_ref(), size) {
            if let Some(view) = viewport.write().as_mut() {
                view.set_viewport_size(size);
            }
        }
    };

    let mut place_local = move |pos: Option<(f64, f64)>| {
        let Some((x, y)) = pos else { return };
        let cell = viewport.read().as_ref().and_then(|v| v.cell_at_screen(x, y));
        if cell.is_some() {
            local_player.set(cell);
        }
    };

    // Push externally supplied positions into the viewport.
    use_effect(move || {
        let local = *local_player.read();
        let remote = *remote_player.read();
        if viewport.peek().is_none() {
            return;
        }
        if let Some(view) = viewport.write().as_mut() {
            view.set_local_player_position(local);
            view.set_remote_player_position(remote);
        }
    });

    let svg_html = use_memo(move || {
        viewport
            .read()
            .as_ref()
            .map(paint_svg)
            .unwrap_or_default()
    });

    rsx! {
        div {
            id: coords::MAP_CONTAINER_ID,
            class: "map-container",

            onmounted: move |_| sync_size(),
            onresize: move |_| sync_size(),

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let factor = wheel_zoom_factor(wheel_delta_y(evt.data().delta()));
                let client = evt.data().client_coordinates();
                let focus = coords::to_container(client.x, client.y);
                if let Some(view) = viewport.write().as_mut() {
                    view.pinch(factor, focus);
                }
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                sync_size();
                let client = evt.client_coordinates();
                let (x, y) = coords::to_container(client.x, client.y);
                tap.write().down(MOUSE_POINTER_ID, (x, y));
                dispatch(PointerEvent::Down { id: MOUSE_POINTER_ID, x, y });
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let (x, y) = coords::to_container(client.x, client.y);
                tap.write().moved(MOUSE_POINTER_ID, (x, y));
                dispatch(PointerEvent::Move { id: MOUSE_POINTER_ID, x, y });
            },

            onmouseup: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let (x, y) = coords::to_container(client.x, client.y);
                dispatch(PointerEvent::Up { id: MOUSE_POINTER_ID });
                let tapped = tap.write().up(MOUSE_POINTER_ID, (x, y));
                place_local(tapped);
            },

            onmouseleave: move |_| {
                tap.write().cancel();
                dispatch(PointerEvent::Cancel);
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                sync_size();
                for t in evt.data().touches_changed() {
                    let id = t.identifier() as u64;
                    let client = t.client_coordinates();
                    let (x, y) = coords::to_container(client.x, client.y);
                    tap.write().down(id, (x, y));
                    dispatch(PointerEvent::Down { id, x, y });
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                for t in evt.data().touches_changed() {
                    let id = t.identifier() as u64;
                    let client = t.client_coordinates();
                    let (x, y) = coords::to_container(client.x, client.y);
                    tap.write().moved(id, (x, y));
                    dispatch(PointerEvent::Move { id, x, y });
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                for t in evt.data().touches_changed() {
                    let id = t.identifier() as u64;
                    let client = t.client_coordinates();
                    let (x, y) = coords::to_container(client.x, client.y);
                    dispatch(PointerEvent::Up { id });
                    let tapped = tap.write().up(id, (x, y));
                    place_local(tapped);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                tap.write().cancel();
                dispatch(PointerEvent::Cancel);
            },

            div {
                class: "map-canvas",
                dangerous_inner_html: "{svg_html}",
            }

            // Hidden; only measured. The pixels are drawn through the SVG.
            img {
                id: MAP_IMAGE_ID,
                src: MAP_IMAGE,
                style: "display:none;",
                onload: move |_| attach(image_natural_size()),
                onerror: move |_| {
                    tracing::warn!(url = %MAP_IMAGE, "Map image failed to load");
                    attach(None)
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escom_shared::prefs::MemoryPreferences;

    const URL: &str = "/assets/escom_mapa.png";

    fn loaded(size: Option<(u32, u32)>) -> LoadedImage {
        LoadedImage {
            url: URL.to_string(),
            size,
        }
    }

    #[test]
    fn test_loaded_image_provider() {
        let bitmap = loaded(Some((1200, 1600))).load_background().unwrap();
        assert_eq!(bitmap, Bitmap::new(URL, 1200, 1600));
    }

    #[test]
    fn test_failed_image_provider() {
        assert!(matches!(
            loaded(None).load_background(),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            loaded(Some((0, 0))).load_background(),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn test_wheel_zoom_direction() {
        assert!((wheel_zoom_factor(-3.0) - ZOOM_STEP).abs() < 1e-9);
        assert!((wheel_zoom_factor(3.0) - 1.0 / ZOOM_STEP).abs() < 1e-9);
    }

    #[test]
    fn test_is_tap() {
        assert!(is_tap((10.0, 10.0), (14.0, 13.0)));
        assert!(!is_tap((10.0, 10.0), (30.0, 10.0)));
    }

    #[test]
    fn test_needs_resize_only_on_layout_change() {
        let prefs = MemoryPreferences::default();
        let mut view = MapViewport::new(&loaded(Some((1200, 1600))), &prefs, Size::new(360.0, 640.0));
        assert!(!needs_resize(None, Size::new(800.0, 600.0)));
        assert!(!needs_resize(Some(&view), Size::new(360.0, 640.0)));
        assert!(needs_resize(Some(&view), Size::new(800.0, 600.0)));

        view.set_viewport_size(Size::new(800.0, 600.0));
        assert!(!needs_resize(Some(&view), Size::new(800.0, 600.0)));
    }

    #[test]
    fn test_touch_tap_reports_release_position() {
        let mut tap = TapTracker::default();
        tap.down(3, (100.0, 100.0));
        tap.moved(3, (103.0, 102.0));
        assert_eq!(tap.up(3, (104.0, 102.0)), Some((104.0, 102.0)));
        assert_eq!(tap, TapTracker::default());
    }

    #[test]
    fn test_mouse_tap_reports_release_position() {
        let mut tap = TapTracker::default();
        tap.down(MOUSE_POINTER_ID, (20.0, 20.0));
        assert_eq!(tap.up(MOUSE_POINTER_ID, (20.0, 21.0)), Some((20.0, 21.0)));
    }

    #[test]
    fn test_drag_is_not_a_tap() {
        let mut tap = TapTracker::default();
        tap.down(1, (100.0, 100.0));
        tap.moved(1, (140.0, 100.0));
        // Coming back near the start does not revive the tap.
        tap.moved(1, (101.0, 100.0));
        assert_eq!(tap.up(1, (101.0, 100.0)), None);
    }

    #[test]
    fn test_second_finger_spoils_tap() {
        let mut tap = TapTracker::default();
        tap.down(1, (100.0, 100.0));
        tap.down(2, (200.0, 200.0));
        assert_eq!(tap.up(2, (200.0, 200.0)), None);
        assert_eq!(tap.up(1, (100.0, 100.0)), None);

        // All fingers lifted: the next press counts again.
        tap.down(4, (50.0, 50.0));
        assert_eq!(tap.up(4, (50.0, 50.0)), Some((50.0, 50.0)));
    }

    #[test]
    fn test_cancel_forgets_press() {
        let mut tap = TapTracker::default();
        tap.down(1, (10.0, 10.0));
        tap.cancel();
        assert_eq!(tap.up(1, (10.0, 10.0)), None);
    }
}
