//! Per-guild play queue: an ordered list of tracks, a cursor pointing at
//! the entry being played, and a loop mode. Pure data structure — no I/O.
//! Each queue is owned exclusively by its guild's playback engine.

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::commands::music::audio_sources::track::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Off,
    /// Replay the current entry.
    Track,
    /// Wrap back to the first entry after the last.
    Queue,
}

impl std::fmt::Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopMode::Off => write!(f, "off"),
            LoopMode::Track => write!(f, "track"),
            LoopMode::Queue => write!(f, "queue"),
        }
    }
}

/// The cursor distinguishes "nothing selected yet" from "advanced past the
/// end", so an exhausted queue keeps refusing to advance instead of
/// restarting from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Cursor {
    #[default]
    Unset,
    At(usize),
    Exhausted,
}

#[derive(Debug, Default)]
pub struct PlaybackQueue {
    items: Vec<Track>,
    cursor: Cursor,
    loop_mode: LoopMode,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track to the end of the queue.
    pub fn push(&mut self, track: Track) {
        self.items.push(track);
    }

    /// The track under the cursor, if any.
    pub fn current(&self) -> Option<&Track> {
        match self.cursor {
            Cursor::At(index) => self.items.get(index),
            _ => None,
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut Track> {
        match self.cursor {
            Cursor::At(index) => self.items.get_mut(index),
            _ => None,
        }
    }

    /// Move the cursor to the next entry according to the loop mode.
    /// Returns `true` when a track is selected afterwards.
    pub fn advance(&mut self) -> bool {
        match self.loop_mode {
            // Replay the same position.
            LoopMode::Track => self.current().is_some(),
            LoopMode::Queue => {
                if self.items.is_empty() {
                    return false;
                }
                let next = match self.cursor {
                    Cursor::At(index) if index + 1 < self.items.len() => index + 1,
                    _ => 0,
                };
                self.cursor = Cursor::At(next);
                true
            }
            LoopMode::Off => {
                let next = match self.cursor {
                    Cursor::Unset => 0,
                    Cursor::At(index) => index + 1,
                    Cursor::Exhausted => return false,
                };
                if next < self.items.len() {
                    self.cursor = Cursor::At(next);
                    true
                } else {
                    self.cursor = Cursor::Exhausted;
                    false
                }
            }
        }
    }

    /// Point the cursor at a specific entry.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.cursor = Cursor::At(index);
            true
        } else {
            false
        }
    }

    /// Point the cursor at the most recently pushed entry.
    pub fn select_last(&mut self) -> bool {
        if self.items.is_empty() {
            false
        } else {
            self.cursor = Cursor::At(self.items.len() - 1);
            true
        }
    }

    /// Randomly permute the whole list (Fisher–Yates). The cursor keeps its
    /// index, not its track: whatever lands on the current position becomes
    /// the current track. Deliberate — shuffle reshuffles everything.
    pub fn shuffle(&mut self) {
        self.items.shuffle(&mut thread_rng());
    }

    /// Remove the entry at `index`. The current entry cannot be removed;
    /// the cursor is adjusted when an earlier entry disappears.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.items.len() {
            return None;
        }
        if let Cursor::At(current) = self.cursor {
            if current == index {
                return None;
            }
            if index < current {
                self.cursor = Cursor::At(current - 1);
            }
        }
        Some(self.items.remove(index))
    }

    /// Empty the queue and reset cursor and loop mode.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = Cursor::Unset;
        self.loop_mode = LoopMode::Off;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Track] {
        &self.items
    }

    /// Index of the current entry, for display.
    pub fn position(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(index) if index < self.items.len() => Some(index),
            _ => None,
        }
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }
}
