pub mod batch;
pub mod check;
pub mod config;
pub mod extract;
pub mod presets;
pub mod sources;
