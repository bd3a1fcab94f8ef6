pub mod config;
pub mod mindmap;
