pub mod fallback;
pub mod visit;
