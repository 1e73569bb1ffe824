mod core;
mod loader;

pub use core::TaskEngine;
