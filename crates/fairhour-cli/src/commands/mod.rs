pub mod config;
pub mod heatmap;
pub mod holidays;
pub mod suggest;
