//! Playback session control.
//!
//! `TransportDriver` owns the `SessionState` and exactly one engine voice at
//! a time. The engine reports natural end-of-track on its own thread; the
//! driver only applies that report from `pump`, on the thread that owns the
//! session, so readers never race with the engine.

mod engine;
mod error;
mod player;
mod sampler;
mod types;

pub use engine::*;
pub use error::*;
pub use player::TransportDriver;
pub use sampler::Sampler;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
