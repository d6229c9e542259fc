//! The controller facade puts all pieces together: it owns the single
//! mutable slot holding the current [`GamePlayState`], translates UI events
//! into [`Action`]s, runs them through the reducer and notifies an optional
//! listener on every replacement.

use anyhow::{bail, ensure};

use crate::chess::core::{Piece, Player, Promotion, Square};
use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::game::reducer::{reduce, Action};
use crate::game::state::{GameMetaInfo, GamePlayState, PromotionState, Visualisation};

/// Observer invoked with every replacement state. Its presence is what makes
/// a controller "interactive": promotion flows prompt through the UI instead
/// of defaulting to a queen.
pub type StateListener = Box<dyn FnMut(&GamePlayState)>;

/// Seeds an initial position or history (e.g. a puzzle or opening setup) by
/// calling the controller's public operations once at construction.
pub trait Preset {
    #[allow(missing_docs)]
    fn apply(&self, controller: &mut GameController);
}

/// Drives the game-state machine. One logical writer: all transitions go
/// through [`reduce`] and replace the internally held aggregate.
pub struct GameController {
    state: GamePlayState,
    listener: Option<StateListener>,
    /// In single-player mode, the only color whose turn accepts clicks.
    start_color: Option<Player>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    /// A headless controller over a fresh game. Without a listener attached
    /// it resolves promotions to a queen without prompting (preview mode).
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GamePlayState::default(),
            listener: None,
            start_color: None,
        }
    }

    /// Attaches the state listener, making the controller interactive.
    #[must_use]
    pub fn with_listener(mut self, listener: StateListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Restricts click handling to `player`'s turns (single-player mode).
    #[must_use]
    pub fn with_start_color(mut self, player: Player) -> Self {
        self.start_color = Some(player);
        self
    }

    /// Lets `preset` seed the initial position/history.
    #[must_use]
    pub fn with_preset(mut self, preset: &dyn Preset) -> Self {
        self.reset();
        preset.apply(&mut self);
        self
    }

    /// The currently observed aggregate.
    #[must_use]
    pub const fn state(&self) -> &GamePlayState {
        &self.state
    }

    /// Replaces the held aggregate wholesale (e.g. with an imported game)
    /// and notifies the listener.
    pub fn set_state(&mut self, state: GamePlayState) {
        self.state = state;
        if let Some(listener) = &mut self.listener {
            listener(&self.state);
        }
    }

    /// The snapshot under the history cursor.
    #[must_use]
    pub fn snapshot(&self) -> &Position {
        self.state.game_state.current()
    }

    /// The player who makes the next move.
    #[must_use]
    pub fn to_move(&self) -> Player {
        self.snapshot().side_to_move()
    }

    /// Total board lookup on the current snapshot.
    #[must_use]
    pub fn square(&self, square: Square) -> Option<Piece> {
        self.snapshot().at(square)
    }

    fn dispatch(&mut self, action: Action) {
        let next = reduce(&self.state, &action);
        self.set_state(next);
    }

    /// Handles a click on `square`, advancing the selection/move state
    /// machine. Clicks that do not correspond to a transition (empty squares,
    /// finished games, the opponent's turn in single-player mode) are
    /// silently ignored.
    pub fn on_click(&mut self, square: Square) {
        if self.snapshot().resolution().is_terminal() {
            log::debug!("click on {square} ignored: the game is over");
            return;
        }
        if let Some(color) = self.start_color {
            if self.to_move() != color {
                log::debug!("click on {square} ignored: waiting for {color}'s opponent");
                return;
            }
        }
        if self.has_own_piece(square) {
            self.dispatch(Action::ToggleSelectPosition(square));
        } else if self.can_move_to(square) {
            let from = self
                .state
                .ui_state
                .selected
                .expect("a highlighted target implies a selection");
            if let Err(error) = self.apply_move(from, square) {
                log::warn!("click on {square} rejected: {error}");
            }
        } else {
            log::debug!("click on {square} ignored: not a piece or highlighted target");
        }
    }

    fn has_own_piece(&self, square: Square) -> bool {
        self.square(square)
            .is_some_and(|piece| piece.owner == self.to_move())
    }

    fn can_move_to(&self, square: Square) -> bool {
        self.state
            .ui_state
            .target_squares()
            .any(|target| target == square)
    }

    /// Resolves and applies the legal move between two squares. A promoting
    /// destination may instead transition the promotion sub-state-machine and
    /// apply nothing yet.
    ///
    /// # Errors
    ///
    /// Fails when no legal move connects `from` to `to`; the caller corrects
    /// or ignores the input.
    pub fn apply_move(&mut self, from: Square, to: Square) -> anyhow::Result<()> {
        if let Some(mv) = self.find_move(from, to)? {
            self.apply_board_move(&mv);
        }
        Ok(())
    }

    /// Applies an already resolved move. The move must be legal in the
    /// current snapshot.
    pub fn apply_board_move(&mut self, mv: &Move) {
        log::debug!("applying {mv}");
        self.dispatch(Action::ApplyMove(*mv));
    }

    /// Picks the unique legal move ending on `to`, or routes a multi-candidate
    /// promotion through the promotion sub-state-machine.
    ///
    /// More than one candidate that is not a pure promotion fan-out signals a
    /// defect in move generation; that is a fatal internal invariant
    /// violation, never a user error.
    fn find_move(&mut self, from: Square, to: Square) -> anyhow::Result<Option<Move>> {
        let candidates: Vec<Move> = self
            .snapshot()
            .legal_moves_from(from)
            .into_iter()
            .filter(|mv| mv.to == to)
            .collect();
        match candidates.as_slice() {
            [] => bail!("no legal moves exist between {from} and {to}"),
            [only] => Ok(Some(*only)),
            moves if moves.iter().all(|mv| mv.promotion().is_some()) => {
                Ok(self.handle_promotion(to, moves))
            },
            moves => unreachable!(
                "ambiguous move resolution between {from} and {to}: {moves:?}"
            ),
        }
    }

    fn handle_promotion(&mut self, at: Square, candidates: &[Move]) -> Option<Move> {
        let mut promotion_state = self.state.promotion_state;
        // Operator-free resolution: with nobody listening there is no dialog
        // to answer, so headless controllers promote to a queen.
        if self.listener.is_none() && promotion_state == PromotionState::None {
            promotion_state = PromotionState::ContinueWith(Promotion::Queen);
        }
        match promotion_state {
            PromotionState::None => {
                self.dispatch(Action::RequestPromotion(at));
                None
            },
            PromotionState::Await(_) => {
                unreachable!("the move finder can not re-enter an awaiting promotion")
            },
            PromotionState::ContinueWith(promotion) => candidates
                .iter()
                .copied()
                .find(|mv| mv.promotion() == Some(promotion)),
        }
    }

    /// Completes the two-step promotion interaction with the chosen piece
    /// kind and re-runs the destination click.
    ///
    /// # Panics
    ///
    /// Calling this while no promotion is awaiting selection is a programming
    /// error in the driving layer.
    pub fn on_promotion_piece_selected(&mut self, promotion: Promotion) {
        let PromotionState::Await(at) = self.state.promotion_state else {
            panic!(
                "promotion piece selected while none is awaited: {:?}",
                self.state.promotion_state
            );
        };
        self.dispatch(Action::PromoteTo(promotion));
        self.on_click(at);
    }

    /// Selects the active visualisation overlay.
    pub fn set_visualisation(&mut self, visualisation: Visualisation) {
        self.dispatch(Action::SetVisualisation(visualisation));
    }

    /// Moves the history cursor one snapshot forward; no-op at the newest.
    pub fn step_forward(&mut self) {
        self.dispatch(Action::StepForward);
    }

    /// Moves the history cursor one snapshot backward; no-op at the start.
    pub fn step_backward(&mut self) {
        self.dispatch(Action::StepBackward);
    }

    /// Places the history cursor on `index`.
    ///
    /// # Errors
    ///
    /// Fails when `index` is outside the history.
    pub fn go_to_move(&mut self, index: usize) -> anyhow::Result<()> {
        let len = self.state.game_state.len();
        ensure!(index < len, "history index {index} out of range 0..{len}");
        self.dispatch(Action::GoToMove(index));
        Ok(())
    }

    /// Starts over from the standard starting position.
    pub fn reset(&mut self) {
        self.reset_to(Position::default(), GameMetaInfo::with_defaults());
    }

    /// Replaces the entire history with `snapshot` and `meta`.
    pub fn reset_to(&mut self, snapshot: Position, meta: GameMetaInfo) {
        self.dispatch(Action::ResetTo { snapshot, meta });
    }
}
