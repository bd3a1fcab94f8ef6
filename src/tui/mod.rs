pub mod canvas;
pub mod input;
pub mod render;
pub mod settings;
pub mod viewport;
