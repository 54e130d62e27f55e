//! Playback coordination.
//!
//! A single coordinator thread owns the decoder handle and the queue. The UI
//! talks to it with [`PlayerCmd`]s and observes it through a shared
//! [`PlaybackSnapshot`] plus a channel of [`Notice`]s.

mod coordinator;
mod decoder;
mod player;
mod queue;
mod sink;
mod thread;
mod timer;
mod types;

pub use coordinator::Coordinator;
pub use decoder::{Decoder, DecoderEvent, DecoderFactory};
pub use player::Player;
pub use queue::Queue;
pub use sink::{RodioDecoder, RodioFactory};
pub use timer::PositionTimer;
pub use types::*;
