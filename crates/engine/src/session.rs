//! The play loop.
//!
//! [`SessionController`] owns the grid engine, the undo history, the board
//! view and its two collaborators: an [`LedMatrix`] to draw on and an
//! [`EventSource`] to read the joystick (or tilt) from. It runs games back to
//! back until the input source closes.

use std::time::Duration;

use anyhow::Result;

use crate::core::{GameError, GridConfig, GridEngine, SimpleRng, UndoHistory};
use crate::decoder::ActionDecoder;
use crate::input::{EventSource, Polled};
use crate::term::palette::tile_colour;
use crate::term::LedMatrix;
use crate::types::{
    Direction, PlayerAction, Tile, DEFAULT_UNDO_SIZE, FADE_STEPS, FRAME_MS, JOYSTICK_HOLD_MS,
    WINNING_TILE,
};
use crate::view::BoardView;

/// Frames to hold the flashed screen before the dot fade at game over (one second).
const GAME_OVER_PAUSE_FRAMES: u32 = 60;

/// Session parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub grid: GridConfig,
    pub undo_size: usize,
    pub hold_time: Duration,
    pub frame_delay: Duration,
    pub fade_steps: u32,
}

impl SessionConfig {
    pub fn new(seed: u32) -> Self {
        Self {
            grid: GridConfig::new(seed),
            ..Self::default()
        }
    }

    /// No animation delays; frames are still rendered.
    pub fn instant(mut self) -> Self {
        self.frame_delay = Duration::ZERO;
        self
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup. Missing or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parse<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        let mut grid = defaults.grid.clone();
        if let Some(seed) = parse(lookup("TILT2048_SEED")) {
            grid.seed = seed;
        }
        if let Some(size) = parse::<usize>(lookup("TILT2048_SIZE")).filter(|s| *s >= 1) {
            grid.size = size;
        }
        if let Some(count) = parse(lookup("TILT2048_INITIAL_TILES")) {
            grid.initial_tiles = count;
        }

        Self {
            grid,
            undo_size: parse(lookup("TILT2048_UNDO")).unwrap_or(defaults.undo_size),
            hold_time: parse::<u64>(lookup("TILT2048_HOLD_MS"))
                .map(Duration::from_millis)
                .unwrap_or(defaults.hold_time),
            frame_delay: parse::<u64>(lookup("TILT2048_FRAME_MS"))
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_delay),
            fade_steps: defaults.fade_steps,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            undo_size: DEFAULT_UNDO_SIZE,
            hold_time: Duration::from_millis(JOYSTICK_HOLD_MS as u64),
            frame_delay: Duration::from_millis(FRAME_MS as u64),
            fade_steps: FADE_STEPS,
        }
    }
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved { gained: u32 },
    Undone,
    BrightnessToggled,
    /// The action was refused; the screen flashed once.
    Rejected(GameError),
}

/// Final result of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub best_tile: Tile,
    pub won: bool,
}

impl GameSummary {
    /// Text for the LED matrix.
    pub fn message(&self) -> String {
        format!(
            "{}Best tile: {}  Score: {}",
            if self.won { "You won!  " } else { "" },
            self.best_tile,
            self.score
        )
    }

    /// Text for the status line.
    pub fn status(&self) -> String {
        format!(
            "{} Highest tile: {} Final score: {}",
            if self.won { "You won!" } else { "Game over!" },
            self.best_tile,
            self.score
        )
    }
}

pub struct SessionController<M: LedMatrix, S: EventSource> {
    config: SessionConfig,
    engine: GridEngine,
    history: UndoHistory,
    decoder: ActionDecoder,
    view: BoardView,
    matrix: M,
    input: S,
    seeds: SimpleRng,
    games_finished: u32,
}

impl<M: LedMatrix, S: EventSource> SessionController<M, S> {
    pub fn new(config: SessionConfig, matrix: M, input: S) -> Result<Self> {
        let engine = GridEngine::new(config.grid.clone())?;
        let seed = config.grid.seed;
        Ok(Self {
            engine,
            history: UndoHistory::new(config.undo_size),
            decoder: ActionDecoder::new(config.hold_time),
            view: BoardView::new(config.frame_delay, config.fade_steps, seed),
            matrix,
            input,
            seeds: SimpleRng::new(seed),
            games_finished: 0,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn matrix(&self) -> &M {
        &self.matrix
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    pub fn games_finished(&self) -> u32 {
        self.games_finished
    }

    pub fn into_parts(self) -> (M, S) {
        (self.matrix, self.input)
    }

    /// Reset the board with the next seed and clear the undo history.
    pub fn new_game(&mut self) -> Result<()> {
        let seed = self.seeds.next_u32();
        self.engine = GridEngine::new(GridConfig {
            seed,
            ..self.config.grid.clone()
        })?;
        self.history.clear();
        self.decoder.reset();
        tracing::info!(seed, "new game");
        self.show_score()
    }

    /// Play until the input source closes. Returns the number of finished games.
    pub fn run(&mut self) -> Result<u32> {
        tracing::info!(
            size = self.engine.size(),
            seed = self.config.grid.seed,
            undo = self.config.undo_size,
            "session started"
        );
        self.show_score()?;
        loop {
            self.show_board()?;
            while self.engine.has_moves() {
                let Some(action) = self.get_input()? else {
                    return Ok(self.games_finished);
                };
                self.do_action(action)?;
            }
            self.game_over()?;
            // Wait for any input before starting over.
            if self.get_input()?.is_none() {
                return Ok(self.games_finished);
            }
            self.new_game()?;
        }
    }

    /// Wait for the next complete player action.
    ///
    /// Events queued before the call are discarded first. While waiting, the
    /// palette keeps ticking. Returns `None` once the input source is closed.
    pub fn get_input(&mut self) -> Result<Option<PlayerAction>> {
        let stale = self.input.get_events();
        if !stale.is_empty() {
            tracing::trace!(count = stale.len(), "discarded stale input");
        }
        self.decoder.reset();

        let tick = self.view.frame_delay().max(Duration::from_millis(FRAME_MS as u64));
        loop {
            match self.input.poll_event(tick) {
                Polled::Event(event) => {
                    if let Some(action) = self.decoder.feed(event) {
                        tracing::debug!(action = action.as_str(), "input");
                        return Ok(Some(action));
                    }
                }
                Polled::Timeout => self.view.tick(&mut self.matrix)?,
                Polled::Closed => {
                    tracing::info!("input closed");
                    return Ok(None);
                }
            }
        }
    }

    pub fn do_action(&mut self, action: PlayerAction) -> Result<ActionOutcome> {
        let outcome = match action {
            PlayerAction::Move(direction) => self.player_move(direction)?,
            PlayerAction::Undo => self.undo()?,
            PlayerAction::Brightness => self.toggle_brightness()?,
        };
        if let ActionOutcome::Rejected(err) = &outcome {
            tracing::debug!(action = action.as_str(), reason = %err, "action rejected");
        }
        Ok(outcome)
    }

    /// Shift, merge and shift again with animation; place a tile if anything moved.
    pub fn player_move(&mut self, direction: Direction) -> Result<ActionOutcome> {
        let undo_state = self.engine.get_state();
        let original = self.engine.tiles();

        self.view.animate_shift(&mut self.matrix, direction)?;
        self.engine.shift(direction);

        let unmerged = self.engine.tiles();
        let gained = self.engine.merge(direction);
        let merged = self.engine.tiles();
        if unmerged != merged {
            self.view.animate_changed(&mut self.matrix, &unmerged, &merged)?;
        }
        if gained > 0 {
            self.show_score()?;
        }

        self.view.animate_shift(&mut self.matrix, direction)?;
        self.engine.shift(direction);

        if self.engine.tiles() == original {
            self.view.flash(&mut self.matrix, 1)?;
            return Ok(ActionOutcome::Rejected(GameError::IneffectiveMove));
        }

        self.history.push(undo_state);
        self.engine.place_tile();
        self.show_board()?;
        Ok(ActionOutcome::Moved { gained })
    }

    pub fn undo(&mut self) -> Result<ActionOutcome> {
        match self.history.pop() {
            Ok(snapshot) => {
                self.engine.set_state(snapshot);
                tracing::info!(score = self.engine.score(), "undo");
                self.show_score()?;
                self.show_board()?;
                Ok(ActionOutcome::Undone)
            }
            Err(err) => {
                self.view.flash(&mut self.matrix, 1)?;
                Ok(ActionOutcome::Rejected(err))
            }
        }
    }

    pub fn toggle_brightness(&mut self) -> Result<ActionOutcome> {
        let low_light = !self.matrix.low_light();
        self.matrix.set_low_light(low_light)?;
        tracing::debug!(low_light, "brightness toggled");
        Ok(ActionOutcome::BrightnessToggled)
    }

    pub fn summary(&self) -> GameSummary {
        let best_tile = self.engine.best_tile();
        GameSummary {
            score: self.engine.score(),
            best_tile,
            won: best_tile >= WINNING_TILE,
        }
    }

    /// End-of-game animation and messages.
    pub fn game_over(&mut self) -> Result<GameSummary> {
        self.view.flash(&mut self.matrix, 2)?;
        self.view.wait_frames(GAME_OVER_PAUSE_FRAMES);
        self.view.fade_dots(&mut self.matrix)?;

        let summary = self.summary();
        self.games_finished += 1;
        tracing::info!(
            score = summary.score,
            best_tile = summary.best_tile,
            won = summary.won,
            "game over"
        );
        self.matrix.show_status(&summary.status())?;
        self.matrix
            .show_message(&summary.message(), tile_colour(summary.best_tile))?;

        self.show_board()?;
        Ok(summary)
    }

    fn show_board(&mut self) -> Result<()> {
        let tiles = self.engine.tiles();
        self.view.show_board(&mut self.matrix, &tiles)
    }

    fn show_score(&mut self) -> Result<()> {
        self.matrix
            .show_status(&format!("Score: {}", self.engine.score()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;
    use crate::input::EventQueue;
    use crate::term::MemoryMatrix;
    use crate::types::{InputEvent, StickDirection};

    fn session(rows: &[[Tile; 4]]) -> SessionController<MemoryMatrix, EventQueue> {
        let mut s = SessionController::new(
            SessionConfig::new(11).instant(),
            MemoryMatrix::new(),
            EventQueue::new(),
        )
        .unwrap();
        s.engine = GridEngine::from_grid(Grid::from_rows(rows).unwrap(), 11);
        s
    }

    #[test]
    fn test_config_lookup_keeps_defaults_for_bad_values() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("TILT2048_SEED", " 42 "),
            ("TILT2048_SIZE", "0"),
            ("TILT2048_UNDO", "many"),
            ("TILT2048_HOLD_MS", "750"),
            ("TILT2048_FRAME_MS", "-5"),
        ]
        .into_iter()
        .collect();
        let config = SessionConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        let defaults = SessionConfig::default();

        assert_eq!(config.grid.seed, 42);
        assert_eq!(config.grid.size, defaults.grid.size);
        assert_eq!(config.grid.initial_tiles, defaults.grid.initial_tiles);
        assert_eq!(config.undo_size, defaults.undo_size);
        assert_eq!(config.hold_time, Duration::from_millis(750));
        assert_eq!(config.frame_delay, defaults.frame_delay);
    }

    #[test]
    fn test_effective_move_pushes_history_and_spawns() {
        let mut s = session(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = s.player_move(Direction::Left).unwrap();
        assert_eq!(outcome, ActionOutcome::Moved { gained: 4 });
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.engine().score(), 4);
        assert_eq!(s.engine().tiles().cells().iter().filter(|t| **t != 0).count(), 2);
        assert_eq!(s.matrix().last_status(), Some("Score: 4"));
    }

    #[test]
    fn test_ineffective_move_is_rejected() {
        let mut s = session(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = s.engine().tiles();
        let outcome = s.player_move(Direction::Left).unwrap();
        assert_eq!(outcome, ActionOutcome::Rejected(GameError::IneffectiveMove));
        assert!(s.history().is_empty());
        assert_eq!(s.engine().tiles(), before);
    }

    #[test]
    fn test_undo_restores_and_rejects_when_empty() {
        let mut s = session(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(
            s.undo().unwrap(),
            ActionOutcome::Rejected(GameError::EmptyHistory)
        );
        let before = s.engine().tiles();
        s.player_move(Direction::Right).unwrap();
        assert_eq!(s.undo().unwrap(), ActionOutcome::Undone);
        assert_eq!(s.engine().tiles(), before);
        assert_eq!(s.engine().score(), 0);
    }

    #[test]
    fn test_brightness_toggles_low_light() {
        let mut s = session(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(
            s.do_action(PlayerAction::Brightness).unwrap(),
            ActionOutcome::BrightnessToggled
        );
        assert!(s.matrix().low_light());
        s.toggle_brightness().unwrap();
        assert!(!s.matrix().low_light());
    }

    #[test]
    fn test_get_input_purges_stale_events() {
        let mut s = session(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let queue = s.input_mut().clone();
        queue.push(InputEvent::pressed(StickDirection::Left));
        queue.close();
        assert_eq!(s.get_input().unwrap(), None);
    }

    #[test]
    fn test_game_over_summary() {
        let mut s = session(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2048, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!s.engine().has_moves());
        let summary = s.game_over().unwrap();
        assert!(summary.won);
        assert_eq!(summary.best_tile, 2048);
        assert_eq!(s.games_finished(), 1);
        assert_eq!(
            s.matrix().messages().last().map(|(m, _)| m.as_str()),
            Some("You won!  Best tile: 2048  Score: 0")
        );
    }
}
