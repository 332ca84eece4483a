pub mod alphabet;
pub mod cache;
pub mod grid;
pub mod raster;
