pub mod loader;
pub mod resize;
pub mod threshold;
