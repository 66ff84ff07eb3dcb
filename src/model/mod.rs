pub mod lift;
pub mod profile;
