pub mod surface;
pub mod traits;

// Data source implementations
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod http;
