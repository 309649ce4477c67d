//! Background Tasks Module
//!
//! Optional periodic maintenance for callers who want bounded memory
//! without relying on lazy expiry.

mod sweep;

pub use sweep::spawn_sweep_task;
