//! Chime Core - Core types and utilities shared by the Chime crates
//!
//! This crate provides the foundational pieces the sound player is built on:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for object positioning
//! - Game time with pause and time-scale support
//! - One-shot and repeating timers on a scaled or real-time clock

pub mod time;
pub mod timer;
pub mod types;

pub use glam::{Quat, Vec3};
pub use time::{GameTime, TimeConfig};
pub use timer::{Clock, TimerHandle, TimerMode, TimerQueue};
pub use types::Transform;
