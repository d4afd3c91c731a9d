//! Data models for the reservation system.
//!
//! Field names serialize in camelCase to match what browser clients send and expect.

mod reservation;
mod room;

pub use reservation::*;
pub use room::*;
