pub mod common;
pub mod ecs;
pub mod irap;
