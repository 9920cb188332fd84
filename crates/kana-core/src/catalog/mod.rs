pub mod mapping;
pub mod sets;
