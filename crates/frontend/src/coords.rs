use escom_shared::transform::Size;

pub const MAP_CONTAINER_ID: &str = "escom-map-container";

/// Used until the container has been laid out.
pub const FALLBACK_VIEWPORT: Size = Size::new(360.0, 640.0);

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Pick the measured container size, or the fallback when it has no area yet.
pub fn usable_size(width: f64, height: f64) -> Size {
    if width > 0.0 && height > 0.0 {
        Size::new(width, height)
    } else {
        FALLBACK_VIEWPORT
    }
}

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Current container size in screen pixels.
pub fn container_size() -> Size {
    match container_rect() {
        Some(rect) => usable_size(rect.width(), rect.height()),
        None => FALLBACK_VIEWPORT,
    }
}

/// Client coordinates to container coordinates, using the live layout.
pub fn to_container(client_x: f64, client_y: f64) -> (f64, f64) {
    match container_rect() {
        Some(rect) => client_to_container(client_x, client_y, rect.left(), rect.top()),
        None => (client_x, client_y),
    }
}
