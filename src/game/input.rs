//! Input Intents and Recording
//!
//! The simulation consumes a small struct of boolean intents per tick and
//! never sees raw key codes. Inputs can be recorded delta-compressed and
//! replayed tick-by-tick.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::position::Position;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Intents captured for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Jump
    pub up: bool,
    /// Move down one row
    pub down: bool,
    /// Move left one column
    pub left: bool,
    /// Move right one column
    pub right: bool,
    /// Confirm (menus only; the simulation ignores it)
    pub confirm: bool,
}

impl InputFrame {
    /// No intent at all.
    pub const IDLE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        confirm: false,
    };

    /// Holding right.
    pub const fn right() -> Self {
        Self { right: true, ..Self::IDLE }
    }

    /// Holding left.
    pub const fn left() -> Self {
        Self { left: true, ..Self::IDLE }
    }

    /// Pressing jump.
    pub const fn jump() -> Self {
        Self { up: true, ..Self::IDLE }
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    /// Translate into simulation intents.
    ///
    /// `down` sets the vertical component; `left` wins over `right`.
    /// `up` only requests a jump.
    pub fn intent(&self) -> Intent {
        let mut direction = Position::ZERO;
        if self.down {
            direction.y = 1;
        }
        if self.right {
            direction.x = 1;
        }
        if self.left {
            direction.x = -1;
        }
        Intent {
            direction,
            jump: self.up,
        }
    }
}

/// Simulation-level intent derived from an [`InputFrame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    /// Displacement requested for this tick
    pub direction: Position,
    /// Start a jump if grounded
    pub jump: bool,
}

/// Supplier of one [`InputFrame`] per tick.
pub trait InputSource {
    /// Intents for the next tick.
    fn poll(&mut self) -> InputFrame;
}

/// Input source playing back a fixed script, then repeating its last frame.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    cursor: usize,
}

impl ScriptedInput {
    /// Create a scripted source.
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Source that holds the same frame forever.
    pub fn constant(frame: InputFrame) -> Self {
        Self::new(vec![frame])
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        let frame = self
            .frames
            .get(self.cursor)
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or_default();
        self.cursor = self.cursor.saturating_add(1);
        frame
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// Recording encode/decode errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Serialisation failed.
    #[error("Failed to encode recording: {0}")]
    Encode(#[source] bincode::Error),

    /// Bytes are not a recording.
    #[error("Failed to decode recording: {0}")]
    Decode(#[source] bincode::Error),
}

/// Input state starting at a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

/// Input recording for one play-through of one level.
///
/// Only ticks where the input changed are stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Level the recording was made on
    pub level_index: usize,

    /// First tick (the first simulated tick is 1)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Delta-compressed input data
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording for a level.
    pub fn new(level_index: usize) -> Self {
        Self {
            level_index,
            start_tick: 1,
            end_tick: 0,
            deltas: Vec::new(),
            last_frame: InputFrame::IDLE,
        }
    }

    /// Record input for a tick. Only stores it if it changed.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Input in effect at `tick`.
    pub fn frame_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::IDLE
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// All deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of ticks covered.
    pub fn tick_count(&self) -> u32 {
        self.end_tick.saturating_add(1).saturating_sub(self.start_tick)
    }

    /// Iterate `(tick, frame)` for every recorded tick.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::IDLE,
        }
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        bincode::serialize(self).map_err(ReplayError::Encode)
    }

    /// Decode from bincode, ready to keep recording.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ReplayError> {
        let mut recording: Self = bincode::deserialize(data).map_err(ReplayError::Decode)?;
        recording.last_frame = recording
            .deltas
            .last()
            .map(|delta| delta.frame)
            .unwrap_or_default();
        Ok(recording)
    }
}

/// Iterator replaying a recording tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl Iterator for ReplayIterator<'_> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.recording.end_tick {
            return None;
        }

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
