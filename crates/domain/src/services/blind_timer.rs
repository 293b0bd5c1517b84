//! Tournament blind timer.
//!
//! A deterministic state machine driven by an external one-second tick.
//! Nothing here owns a clock or a task; callers decide when a second has
//! passed. Timer state is never persisted.

use thiserror::Error;

use crate::models::blind_preset::{validate_levels, BlindLevel, BlindLevelError};

/// Where the timer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// One second elapsed within the current level.
    Tick,
    /// The current level ran out and the timer moved to this level index.
    LevelChanged(usize),
    /// The last level ran out.
    Finished,
    /// The timer was not running; nothing happened.
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("Level navigation is not allowed while the timer is running")]
    RunningLocked,

    #[error("Level index {0} is out of range")]
    LevelOutOfRange(usize),
}

/// The blind timer state machine.
#[derive(Debug, Clone)]
pub struct BlindTimer {
    levels: Vec<BlindLevel>,
    state: TimerState,
    level_index: usize,
    remaining_secs: u32,
}

impl BlindTimer {
    /// Builds an idle timer positioned at the first level's full duration.
    pub fn new(levels: Vec<BlindLevel>) -> Result<Self, BlindLevelError> {
        validate_levels(&levels)?;
        let remaining_secs = levels[0].duration_secs();
        Ok(Self {
            levels,
            state: TimerState::Idle,
            level_index: 0,
            remaining_secs,
        })
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn current_level(&self) -> &BlindLevel {
        &self.levels[self.level_index]
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Starts from Idle, or resumes from Paused. No-op once Finished.
    pub fn start(&mut self) {
        if matches!(self.state, TimerState::Idle | TimerState::Paused) {
            self.state = TimerState::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
        }
    }

    /// Back to Idle at the first level's full duration.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.level_index = 0;
        self.remaining_secs = self.levels[0].duration_secs();
    }

    /// Advances one second. Only a Running timer moves; at the end of a level
    /// the timer jumps to the next level's full duration, or finishes after
    /// the last one.
    pub fn tick(&mut self) -> TickEvent {
        if self.state != TimerState::Running {
            return TickEvent::Ignored;
        }

        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return TickEvent::Tick;
        }

        if self.level_index + 1 < self.levels.len() {
            self.level_index += 1;
            self.remaining_secs = self.levels[self.level_index].duration_secs();
            TickEvent::LevelChanged(self.level_index)
        } else {
            self.remaining_secs = 0;
            self.state = TimerState::Finished;
            TickEvent::Finished
        }
    }

    /// Jumps to an arbitrary level at its full duration. Rejected while
    /// Running; a Finished timer becomes Paused so it can resume.
    pub fn go_to_level(&mut self, index: usize) -> Result<(), TimerError> {
        if self.state == TimerState::Running {
            return Err(TimerError::RunningLocked);
        }
        if index >= self.levels.len() {
            return Err(TimerError::LevelOutOfRange(index));
        }
        self.level_index = index;
        self.remaining_secs = self.levels[index].duration_secs();
        if self.state == TimerState::Finished {
            self.state = TimerState::Paused;
        }
        Ok(())
    }

    pub fn next_level(&mut self) -> Result<(), TimerError> {
        self.go_to_level(self.level_index + 1)
    }

    pub fn prev_level(&mut self) -> Result<(), TimerError> {
        if self.level_index == 0 {
            return Err(TimerError::LevelOutOfRange(0));
        }
        self.go_to_level(self.level_index - 1)
    }
}
