pub mod media;
pub mod placement;
