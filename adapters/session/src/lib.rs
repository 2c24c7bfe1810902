#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Editing session that wires the world, the pure systems and the engine.
//!
//! Every interaction flows through the same loop as the systems elsewhere in
//! the workspace: the editor or stepper emits commands, the world applies
//! them and reports events, and an event that changes the submission runs the
//! commit pipeline. The pipeline serializes the board, records history,
//! persists the text, rebuilds the engine board and refreshes the readouts.

mod config;
mod envelope;
mod store;

use spacecells_core::{Command, Event, ParseError, Terrain};
use spacecells_engine::{BoardLoader, EngineContext, EngineError, LevelReadout, RunReadout};
use spacecells_system_editor::{Editor, Interaction};
use spacecells_system_history::History;
use spacecells_system_stepping::{Control, Stepper, TimerRequest, TimerToken};
use spacecells_world::{self as world, query, World};
use tracing::{debug, info, warn};

pub use config::{ConfigError, DelayConfig, EditorConfig};
pub use envelope::{Envelope, ImportError, LINE_HEADER};
pub use store::{FileStore, MemoryStore, StoreError, SubmissionStore};

/// Errors surfaced to the player. None of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Submission text could not be parsed; the board is unchanged.
    #[error("submission rejected: {0}")]
    Parse(#[from] ParseError),
    /// The engine could not build or answer for the board.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// An exported submission could not be imported.
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Saved submissions could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The operation needs a loaded level.
    #[error("no level is loaded")]
    NoLevel,
}

/// Claim on a pending level fetch. Only the most recent ticket may apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelTicket {
    generation: u64,
    number: u32,
}

impl LevelTicket {
    /// Level the ticket was issued for.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

/// Level content delivered by a fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSource {
    /// Position of the level in the level list.
    pub number: u32,
    /// Display name of the level.
    pub name: String,
    /// Engine level text.
    pub text: String,
}

#[derive(Debug)]
struct ActiveLevel {
    source: LevelSource,
    readout: LevelReadout,
}

/// A single player's editing session.
#[derive(Debug)]
pub struct Session<L, S> {
    world: World,
    editor: Editor,
    history: History,
    stepper: Stepper,
    engine: EngineContext<L>,
    store: S,
    level: Option<ActiveLevel>,
    run: Option<RunReadout>,
    generation: u64,
}

impl<L, S> Session<L, S>
where
    L: BoardLoader,
    S: SubmissionStore,
{
    /// Creates a session showing an empty board of the configured size.
    #[must_use]
    pub fn new(config: &EditorConfig, loader: L, store: S) -> Self {
        let world = World::with_terrain(Terrain::open(config.default_dimensions()));
        let history = History::new(query::submission_text(&world), config.history_depth);
        Self {
            world,
            editor: Editor::new(),
            history,
            stepper: Stepper::new(config.delays.into()),
            engine: EngineContext::new(loader),
            store,
            level: None,
            run: None,
            generation: 0,
        }
    }

    /// Starts a level switch. Tickets issued earlier become stale.
    pub fn request_level(&mut self, number: u32) -> LevelTicket {
        self.generation = self.generation.wrapping_add(1);
        debug!(level = number, generation = self.generation, "level requested");
        LevelTicket {
            generation: self.generation,
            number,
        }
    }

    /// Installs a fetched level, restoring its saved submission.
    ///
    /// Returns `false` without touching the session when the ticket is
    /// stale or does not match the delivered level.
    pub fn enter_level(
        &mut self,
        ticket: LevelTicket,
        source: LevelSource,
    ) -> Result<bool, SessionError> {
        if ticket.generation != self.generation || ticket.number != source.number {
            debug!(level = source.number, "discarding stale level fetch");
            return Ok(false);
        }

        let _ = self.engine.load(&source.text, "")?;
        let readout = self.engine.level_readout()?;
        let _ = self.apply(Command::ConfigureLevel {
            terrain: readout.terrain(),
        });
        self.editor.reset();

        if let Some(saved) = self.store.load(source.number)? {
            let events = self.apply(Command::LoadSubmission { text: saved });
            for event in &events {
                match event {
                    Event::SubmissionRejected { error } => {
                        warn!(level = source.number, %error, "saved submission ignored");
                    }
                    Event::SubmissionLoaded { discarded, .. } if *discarded > 0 => {
                        warn!(level = source.number, discarded, "saved symbols dropped");
                    }
                    _ => {}
                }
            }
        }

        let text = query::submission_text(&self.world);
        self.history.reset(text.clone());
        info!(level = source.number, name = %source.name, "level entered");
        self.level = Some(ActiveLevel { source, readout });
        self.rebuild(&text)?;
        let _ = self.control(Control::Stop);
        Ok(true)
    }

    /// Feeds a pointer interaction through the editor. Edits are ignored
    /// unless the stepper is stopped.
    pub fn interact(&mut self, interaction: Interaction) -> Result<(), SessionError> {
        let mut commands = Vec::new();
        self.editor.handle(
            interaction,
            &self.world,
            self.stepper.is_stopped(),
            &mut commands,
        );
        let events = self.apply_all(commands);
        self.editor.observe(&events);
        if events.iter().any(Event::changes_submission) {
            let _ = self.commit()?;
        }
        Ok(())
    }

    /// Replaces the board with submission text typed or pasted by the player.
    ///
    /// Returns `false` when editing is currently disabled.
    pub fn load_submission_text(&mut self, text: &str) -> Result<bool, SessionError> {
        if !self.stepper.is_stopped() {
            return Ok(false);
        }
        self.replace_board(text)?;
        let _ = self.commit()?;
        Ok(true)
    }

    /// Steps back one history entry. Returns `false` when nothing changed.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        if !self.stepper.is_stopped() {
            return Ok(false);
        }
        let Some(text) = self.history.undo().map(str::to_owned) else {
            return Ok(false);
        };
        self.replace_board(&text)?;
        self.persist(&text)?;
        Ok(true)
    }

    /// Re-applies the most recently undone entry.
    pub fn redo(&mut self) -> Result<bool, SessionError> {
        if !self.stepper.is_stopped() {
            return Ok(false);
        }
        let Some(text) = self.history.redo().map(str::to_owned) else {
            return Ok(false);
        };
        self.replace_board(&text)?;
        self.persist(&text)?;
        Ok(true)
    }

    /// Packs the current submission for export.
    pub fn export(&self) -> Result<Envelope, SessionError> {
        let level = self.level.as_ref().ok_or(SessionError::NoLevel)?;
        Ok(Envelope {
            level_number: level.source.number,
            level_name: level.source.name.clone(),
            submission_text: self.history.current().to_owned(),
        })
    }

    /// Imports an envelope in JSON or clipboard-line form.
    ///
    /// Envelopes for another level are rejected without changing the board.
    pub fn import(&mut self, text: &str) -> Result<bool, SessionError> {
        let level = self.level.as_ref().ok_or(SessionError::NoLevel)?;
        let envelope = Envelope::decode(text).and_then(|envelope| {
            envelope.check_level(&level.source.name)?;
            Ok(envelope)
        });
        match envelope {
            Ok(envelope) => self.load_submission_text(&envelope.submission_text),
            Err(error) => {
                warn!(%error, "import rejected");
                Err(error.into())
            }
        }
    }

    /// Applies a stepping control, returning the timer to arm.
    pub fn control(&mut self, control: Control) -> Option<TimerRequest> {
        let mut commands = Vec::new();
        let timer = self.stepper.control(control, &mut self.engine, &mut commands);
        let _ = self.apply_all(commands);
        self.capture_run();
        timer
    }

    /// Handles a fired timer, returning the next timer to arm.
    pub fn tick(&mut self, token: TimerToken) -> Option<TimerRequest> {
        let mut commands = Vec::new();
        let timer = self.stepper.tick(token, &mut self.engine, &mut commands);
        let _ = self.apply_all(commands);
        self.capture_run();
        timer
    }

    /// Board state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Editor interaction state.
    #[must_use]
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Undo history of the current level.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Stepping controller.
    #[must_use]
    pub const fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Engine owner.
    #[must_use]
    pub const fn engine(&self) -> &EngineContext<L> {
        &self.engine
    }

    /// Saved submissions.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Number and name of the loaded level.
    #[must_use]
    pub fn level(&self) -> Option<(u32, &str)> {
        self.level
            .as_ref()
            .map(|level| (level.source.number, level.source.name.as_str()))
    }

    /// Level description captured when the level was entered.
    #[must_use]
    pub fn level_readout(&self) -> Option<&LevelReadout> {
        self.level.as_ref().map(|level| &level.readout)
    }

    /// Simulation state captured after the last engine change.
    #[must_use]
    pub const fn run_readout(&self) -> Option<&RunReadout> {
        self.run.as_ref()
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn apply_all(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    fn replace_board(&mut self, text: &str) -> Result<(), SessionError> {
        let events = self.apply(Command::LoadSubmission {
            text: text.to_owned(),
        });
        self.editor.observe(&events);
        for event in events {
            match event {
                Event::SubmissionRejected { error } => {
                    warn!(%error, "submission text rejected");
                    return Err(error.into());
                }
                Event::SubmissionLoaded { symbols, discarded } => {
                    debug!(symbols, discarded, "submission text loaded");
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Records the serialized board and, when it changed, persists it.
    fn commit(&mut self) -> Result<bool, SessionError> {
        let text = query::submission_text(&self.world);
        if !self.history.record(text.clone()) {
            return Ok(false);
        }
        self.persist(&text)?;
        Ok(true)
    }

    /// Rebuilds the engine board and saves the text.
    ///
    /// The engine always follows the world; a store failure is reported only
    /// after the rebuild.
    fn persist(&mut self, text: &str) -> Result<(), SessionError> {
        let Some(number) = self.level.as_ref().map(|level| level.source.number) else {
            return Ok(());
        };
        self.rebuild(text)?;
        if let Err(error) = self.store.save(number, text) {
            warn!(level = number, %error, "submission could not be saved");
            return Err(error.into());
        }
        info!(level = number, "submission committed");
        Ok(())
    }

    fn rebuild(&mut self, text: &str) -> Result<(), SessionError> {
        let Some(level) = &self.level else {
            return Ok(());
        };
        let _ = self.engine.load(&level.source.text, text)?;
        let status = self.engine.revalidate()?;
        self.stepper.refresh_validity(status);
        self.capture_run();
        Ok(())
    }

    fn capture_run(&mut self) {
        if self.engine.is_loaded() {
            self.run = self.engine.run_readout().ok();
        }
    }
}
