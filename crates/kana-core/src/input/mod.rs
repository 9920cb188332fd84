pub mod events;
pub mod viewport;
