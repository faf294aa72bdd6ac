//! Platform abstraction layer
//!
//! Browser/native-neutral pieces the frame loop is built from:
//! - Polled input state (keyboard and pointer)
//! - Real-time scheduling (one-shot timers, the HUD interval, fixed timestep)

pub mod input;
pub mod timers;

pub use input::{InputState, Key};
pub use timers::{FixedTimestep, Interval, Scheduler, TaskId};
