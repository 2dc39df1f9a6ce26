pub mod spy;
pub mod tracker;
