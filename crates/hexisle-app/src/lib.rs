//! The `hexisle` application: startup sequence, window and orbit camera.

pub mod game_loop;
pub mod input;
pub mod startup;
pub mod window;

pub use window::{AppError, IslandApp, run};
