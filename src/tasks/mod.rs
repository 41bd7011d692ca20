//! Background Tasks Module
//!
//! Contains the periodic task facility the cache engine runs its sweeps on.
//!
//! # Tasks
//! - Reaper: invokes a callback on a fixed interval until stopped

mod reaper;

pub use reaper::Reaper;
