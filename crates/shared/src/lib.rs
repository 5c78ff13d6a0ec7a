pub mod gesture;
pub mod grid;
pub mod models;
pub mod prefs;
pub mod render;
pub mod settings;
pub mod svg;
pub mod transform;
pub mod viewport;
