pub mod descriptors;
pub mod shared;
pub mod upstream;

// Re-export the main types for easy access
pub use descriptors::*;
pub use shared::*;
pub use upstream::*;
