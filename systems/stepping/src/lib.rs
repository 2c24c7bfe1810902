#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stepping controller that drives the simulation engine from player controls
//! and timer ticks.
//!
//! The controller never owns a clock. Every transition cancels the active
//! timer by bumping a generation counter and hands back at most one
//! [`TimerRequest`]; the adapter arms a timer and later feeds the token back
//! through [`Stepper::tick`]. Tokens from an older generation are ignored, so
//! at most one timer is ever live.

use std::time::Duration;

use spacecells_core::{Command, Status};

/// Moves issued per tick by the batch cadence.
pub const BATCH_MOVES: u32 = 10;

/// Auto-advance speed selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// Advance one move after the single-step delay, then pause.
    SingleStep,
    /// One move per slow interval.
    Slow,
    /// One move per fast interval.
    Fast,
    /// One move per tick with no delay.
    Fastest,
    /// [`BATCH_MOVES`] moves per tick with no delay.
    Batch,
}

impl Cadence {
    /// Number of engine moves issued per tick.
    #[must_use]
    pub const fn moves_per_tick(self) -> u32 {
        match self {
            Self::Batch => BATCH_MOVES,
            _ => 1,
        }
    }
}

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Board reset; editing is allowed.
    Stopped,
    /// Simulation halted mid-run.
    Paused,
    /// Simulation auto-advancing at the cadence.
    Running(Cadence),
}

/// Timer intervals for each cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delays {
    /// Wait before the first tick after leaving Stopped.
    pub initial: Duration,
    /// Wait before the move of [`Cadence::SingleStep`].
    pub single_step: Duration,
    /// Interval of [`Cadence::Slow`].
    pub slow: Duration,
    /// Interval of [`Cadence::Fast`].
    pub fast: Duration,
    /// Interval of [`Cadence::Fastest`].
    pub fastest: Duration,
    /// Interval of [`Cadence::Batch`].
    pub batch: Duration,
}

impl Delays {
    /// Interval between ticks while running at `cadence`.
    #[must_use]
    pub const fn interval(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::SingleStep => self.single_step,
            Cadence::Fastest => self.fastest,
            Cadence::Slow => self.slow,
            Cadence::Fast => self.fast,
            Cadence::Batch => self.batch,
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(200),
            single_step: Duration::from_millis(200),
            slow: Duration::from_millis(1000),
            fast: Duration::from_millis(100),
            fastest: Duration::ZERO,
            batch: Duration::ZERO,
        }
    }
}

/// Identifies the timer generation a tick belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Request for the adapter to arm a one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerRequest {
    /// Token to pass back to [`Stepper::tick`] when the timer fires.
    pub token: TimerToken,
    /// Delay before the timer fires.
    pub delay: Duration,
}

/// Player controls understood by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// Start or resume auto-advance at the cadence.
    Run(Cadence),
    /// Halt auto-advance, keeping the simulation state.
    Pause,
    /// Reset and re-validate the board.
    Stop,
}

/// Runtime fault reported by the engine for a single move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFault {
    message: String,
}

impl StepFault {
    /// Wraps the engine's description of the fault.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Engine-provided description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StepFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Engine operations the controller needs.
pub trait StepTarget {
    /// Advances the simulation by one move.
    ///
    /// A fault does not halt auto-advance by itself; the controller keeps
    /// going while [`StepTarget::status`] stays running.
    fn advance(&mut self) -> Result<(), StepFault>;

    /// Current engine status.
    fn status(&mut self) -> Status;

    /// Resets the simulation to its initial state and re-validates the board.
    fn reset_and_validate(&mut self);
}

/// Stepping controller state machine.
#[derive(Clone, Debug)]
pub struct Stepper {
    state: RunState,
    generation: u64,
    plays_enabled: bool,
    delays: Delays,
    last_fault: Option<StepFault>,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(Delays::default())
    }
}

impl Stepper {
    /// Creates a stopped controller with play controls disabled until the
    /// first validation.
    #[must_use]
    pub const fn new(delays: Delays) -> Self {
        Self {
            state: RunState::Stopped,
            generation: 0,
            plays_enabled: false,
            delays,
            last_fault: None,
        }
    }

    /// Current controller state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Whether editing interactions are accepted.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self.state, RunState::Stopped)
    }

    /// Whether the last validation found a runnable board.
    #[must_use]
    pub const fn plays_enabled(&self) -> bool {
        self.plays_enabled
    }

    /// Timer intervals in use.
    #[must_use]
    pub const fn delays(&self) -> Delays {
        self.delays
    }

    /// Most recent per-move fault since the last stop.
    #[must_use]
    pub const fn last_fault(&self) -> Option<&StepFault> {
        self.last_fault.as_ref()
    }

    /// Records the validity of a freshly built board.
    pub fn refresh_validity(&mut self, status: Status) {
        self.plays_enabled = status != Status::Invalid;
    }

    /// Applies a player control, returning the timer to arm, if any.
    ///
    /// Every accepted transition clears the in-progress selection.
    pub fn control<T>(
        &mut self,
        control: Control,
        target: &mut T,
        out: &mut Vec<Command>,
    ) -> Option<TimerRequest>
    where
        T: StepTarget + ?Sized,
    {
        match control {
            Control::Stop => {
                self.transition(RunState::Stopped, out);
                self.last_fault = None;
                target.reset_and_validate();
                self.refresh_validity(target.status());
                None
            }
            Control::Pause => {
                if matches!(self.state, RunState::Running(_)) {
                    self.transition(RunState::Paused, out);
                }
                None
            }
            Control::Run(cadence) => {
                if !self.plays_enabled {
                    return None;
                }
                let from_stop = self.is_stopped();
                self.transition(RunState::Running(cadence), out);
                let delay = if from_stop && cadence != Cadence::SingleStep {
                    self.delays.initial
                } else {
                    self.delays.interval(cadence)
                };
                Some(self.request(delay))
            }
        }
    }

    /// Handles a fired timer.
    ///
    /// Stale tokens and ticks outside Running are ignored. Otherwise the
    /// cadence's moves are issued, checking status after each; a status
    /// other than running pauses the controller and skips the rest. A
    /// single step always pauses after its move.
    pub fn tick<T>(
        &mut self,
        token: TimerToken,
        target: &mut T,
        out: &mut Vec<Command>,
    ) -> Option<TimerRequest>
    where
        T: StepTarget + ?Sized,
    {
        if token.0 != self.generation {
            return None;
        }
        let RunState::Running(cadence) = self.state else {
            return None;
        };

        let running = self.advance(target, cadence.moves_per_tick());
        if running && cadence != Cadence::SingleStep {
            Some(self.request(self.delays.interval(cadence)))
        } else {
            self.transition(RunState::Paused, out);
            None
        }
    }

    /// Issues up to `moves` advances, returning whether the engine is still running.
    fn advance<T>(&mut self, target: &mut T, moves: u32) -> bool
    where
        T: StepTarget + ?Sized,
    {
        for _ in 0..moves {
            if let Err(fault) = target.advance() {
                self.last_fault = Some(fault);
            }
            if target.status() != Status::Running {
                return false;
            }
        }
        true
    }

    fn transition(&mut self, next: RunState, out: &mut Vec<Command>) {
        self.generation = self.generation.wrapping_add(1);
        self.state = next;
        out.push(Command::ClearSelection);
    }

    fn request(&self, delay: Duration) -> TimerRequest {
        TimerRequest {
            token: TimerToken(self.generation),
            delay,
        }
    }
}
