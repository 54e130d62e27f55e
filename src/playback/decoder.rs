//! The media-decoding collaborator.
//!
//! The coordinator only ever talks to a decoder through this trait, so the
//! rodio backend and the scripted test decoder are interchangeable.

use std::path::Path;

use crate::error::PlayerError;

/// Asynchronous notifications raised by a decoder handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    /// Preparation finished; duration and seeking are now available.
    Prepared,
    /// The source played to its end.
    Completed,
    /// Runtime failure. The handle must be released afterwards.
    Error { what: i32, extra: i32 },
}

/// A single decode session.
pub trait Decoder {
    fn set_source(&mut self, source: &Path) -> Result<(), PlayerError>;

    /// Request preparation. Completion is reported through
    /// [`DecoderEvent::Prepared`] or [`DecoderEvent::Error`].
    fn prepare_async(&mut self) -> Result<(), PlayerError>;

    fn start(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Drop the source and return to the unconfigured state.
    fn reset(&mut self);
    /// Free every resource held by the handle. It is unusable afterwards.
    fn release(&mut self);

    fn seek(&mut self, position_ms: u64) -> Result<(), PlayerError>;

    fn is_playing(&self) -> bool;
    fn current_position_ms(&self) -> u64;
    /// Total duration in milliseconds, 0 when unknown.
    fn duration_ms(&self) -> u64;

    /// Take the next pending event, if any.
    fn poll_event(&mut self) -> Option<DecoderEvent>;
}

/// Opens decoder handles for the coordinator.
pub trait DecoderFactory {
    type Decoder: Decoder;

    fn open(&mut self) -> Result<Self::Decoder, PlayerError>;
}
