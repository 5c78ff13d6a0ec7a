pub mod map;
pub mod settings;
