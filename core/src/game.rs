use core::fmt;
use core::time::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No cell was revealed or flagged yet
    #[default]
    NotStarted,
    InProgress,
    /// Every safe cell was revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A board played from the first move to a win or a loss.
pub struct Game {
    board: Board,
    state: GameState,
    unflagged_mines: isize,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    observers: Vec<Box<dyn Observer>>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let (width, height) = config.size;
        Ok(Self::from_board(Board::new(width, height, config.mines)?))
    }

    pub fn from_board(board: Board) -> Self {
        let unflagged_mines = (board.mines() as isize) - (board.flagged_count() as isize);
        Self {
            board,
            state: Default::default(),
            unflagged_mines,
            started_at: None,
            ended_at: None,
            observers: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn has_started(&self) -> bool {
        !self.state.is_initial()
    }

    pub fn has_ended(&self) -> bool {
        self.state.is_final()
    }

    pub fn dimensions(&self) -> Size {
        self.board.dimensions()
    }

    pub fn has_mine_revealed(&self) -> bool {
        self.board.has_mine_revealed()
    }

    pub fn is_completed(&self) -> bool {
        self.board.is_completed()
    }

    pub fn is_mined(&self) -> bool {
        self.board.is_mined()
    }

    /// Mines left to flag, negative when more cells are flagged than there are mines.
    pub fn unflagged_mines(&self) -> isize {
        self.unflagged_mines
    }

    /// Player-safe view of one cell, see [`CellView`].
    pub fn cell_at(&self, position: Position) -> Result<CellView> {
        let cell = self.board.cell_at(position)?;
        Ok(CellView::from_cell(cell, self.has_ended()))
    }

    pub fn view(&self) -> BoardView {
        BoardView::from_game(self)
    }

    pub fn add_observer(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Hands a fresh view to every observer, in the order they were added.
    pub fn notify_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for observer in &mut self.observers {
            observer.update(&view);
        }
    }

    pub fn place_mines(&mut self, excluded: impl IntoIterator<Item = Position>) -> Result<()> {
        self.check_not_ended()?;
        self.board.place_mines(excluded)
    }

    pub fn place_mines_with<R: Rng + ?Sized>(
        &mut self,
        excluded: impl IntoIterator<Item = Position>,
        rng: &mut R,
    ) -> Result<()> {
        self.check_not_ended()?;
        self.board.place_mines_with(excluded, rng)
    }

    fn check_not_ended(&self) -> Result<()> {
        if self.has_ended() {
            Err(GameError::CellsAlreadyRevealed)
        } else {
            Ok(())
        }
    }

    /// First-click friendly reveal: mines are placed around `position` before it is revealed.
    pub fn open(&mut self, position: Position) -> Result<RevealOutcome> {
        self.open_with(position, &mut rand::rng())
    }

    pub fn open_with<R: Rng + ?Sized>(
        &mut self,
        position: Position,
        rng: &mut R,
    ) -> Result<RevealOutcome> {
        let position = self.board.validate_position(position)?;

        if !self.board.is_mined() && !self.has_ended() {
            let excluded = self.opening_exclusion(position)?;
            self.board.place_mines_with(excluded, rng)?;
        }

        self.reveal_cell_at(position)
    }

    /// Cells kept free of mines on a first move, shrunk when the board is too crowded for it.
    fn opening_exclusion(&self, position: Position) -> Result<Vec<Position>> {
        let free_cells = self.board.total_cells() - self.board.mines();
        let zone = self.board.opening_exclusion(position)?;

        Ok(if zone.len() <= free_cells as usize {
            zone.into_iter().collect()
        } else if free_cells >= 1 {
            log::warn!("Cannot keep the opening area clear, only keeping {} safe", position);
            vec![position]
        } else {
            log::warn!("Board is full of mines, first move can't be safe");
            Vec::new()
        })
    }

    pub fn reveal_cell_at(&mut self, position: Position) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let position = self.board.validate_position(position)?;
        if self.has_ended() || !self.board.reveal_cell_at(position)? {
            return Ok(NoChange);
        }

        self.mark_started();
        let outcome = if self.board.has_mine_revealed() {
            self.end_game(false);
            HitMine
        } else if self.board.is_completed() {
            self.end_game(true);
            Won
        } else {
            Revealed
        };

        self.notify_observers();
        Ok(outcome)
    }

    pub fn flag_cell_at(&mut self, position: Position) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let position = self.board.validate_position(position)?;
        if self.has_ended() || !self.board.flag_cell_at(position)? {
            return Ok(NoChange);
        }

        self.mark_started();
        let outcome = if self.board.cell_at(position)?.is_flagged() {
            self.unflagged_mines -= 1;
            Flagged
        } else {
            self.unflagged_mines += 1;
            Unflagged
        };

        self.notify_observers();
        Ok(outcome)
    }

    /// Time spent playing, ticking while in progress and frozen once the game ended.
    pub fn elapsed(&self) -> Option<Duration> {
        let started_at = self.started_at?;
        let until = self.ended_at.unwrap_or_else(Instant::now);
        Some(until.duration_since(started_at))
    }

    /// Whole seconds played, -1 if the game has not started.
    pub fn game_time(&self) -> i64 {
        self.elapsed()
            .map_or(-1, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
            self.started_at = Some(Instant::now());
            log::debug!("Game started");
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_final() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
        self.ended_at = Some(Instant::now());
        log::debug!("Game ended: {:?} after {}s", self.state, self.game_time());
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("state", &self.state)
            .field("unflagged_mines", &self.unflagged_mines)
            .field("started_at", &self.started_at)
            .field("ended_at", &self.ended_at)
            .field("observers", &self.observers.len())
            .finish()
    }
}
