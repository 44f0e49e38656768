pub mod duration;
pub mod event;
pub mod pitch;
