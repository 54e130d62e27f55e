//! Cursor-addressed playback queue.
//!
//! The cursor always wraps modulo the queue length; on an empty queue every
//! movement is a no-op.

use crate::library::{Track, TrackId};

#[derive(Debug, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: usize,
}

impl Queue {
    /// Replace the queue wholesale and move the cursor back to the start.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Point the cursor at `index` if it is in range.
    pub fn seek_to(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.tracks.len();
        self.current()
    }

    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.current()
    }
}
