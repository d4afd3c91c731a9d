//! Client-side reservation tooling.
//!
//! The HTTP client, the list store built on it, the reservation form, and
//! helpers for laying reservations out on a calendar.

mod api;
mod form;
mod schedule;
mod store;

pub use api::*;
pub use form::*;
pub use schedule::*;
pub use store::*;
