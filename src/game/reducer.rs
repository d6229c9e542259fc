//! The pure transition function of the state machine: `(state, action) ->
//! state`. No action mutates shared state in place; the reducer clones the
//! aggregate and returns a replacement value for the host's single slot.

use serde::{Deserialize, Serialize};

use crate::chess::core::{Player, Promotion, Square};
use crate::chess::moves::Move;
use crate::chess::position::{Position, Resolution};
use crate::game::state::{
    GameMetaInfo,
    GamePlayState,
    PromotionState,
    UiState,
    Visualisation,
};

/// The closed set of state transitions. Everything the controller surface
/// does is expressed as one of these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Replaces the entire history with a single snapshot and fresh metadata.
    ResetTo {
        #[allow(missing_docs)]
        snapshot: Position,
        #[allow(missing_docs)]
        meta: GameMetaInfo,
    },
    /// Selects the piece on the square, caching its legal moves. Re-selecting
    /// the already selected square keeps the selection.
    ToggleSelectPosition(Square),
    /// Appends the snapshot produced by the (already validated) move,
    /// truncating any abandoned redo branch.
    ApplyMove(Move),
    /// A promoting destination was clicked: await the piece choice.
    RequestPromotion(Square),
    /// The promotion piece was chosen.
    PromoteTo(Promotion),
    #[allow(missing_docs)]
    SetVisualisation(Visualisation),
    #[allow(missing_docs)]
    StepForward,
    #[allow(missing_docs)]
    StepBackward,
    /// Places the history cursor on the given snapshot index.
    GoToMove(usize),
}

/// Produces the successor state. Pure: the input state is never modified and
/// feeding the same state and action always yields the same result.
#[must_use]
pub fn reduce(state: &GamePlayState, action: &Action) -> GamePlayState {
    let mut next = state.clone();
    match action {
        Action::ResetTo { snapshot, meta } => {
            next = GamePlayState::new(snapshot.clone(), meta.clone());
        },
        Action::ToggleSelectPosition(square) => select(&mut next, *square),
        Action::ApplyMove(mv) => apply_move(&mut next, mv),
        Action::RequestPromotion(at) => {
            next.promotion_state = PromotionState::Await(*at);
            next.ui_state.show_promotion_dialog = true;
        },
        Action::PromoteTo(promotion) => {
            next.promotion_state = PromotionState::ContinueWith(*promotion);
            next.ui_state.show_promotion_dialog = false;
        },
        Action::SetVisualisation(visualisation) => next.visualisation = *visualisation,
        Action::StepForward => {
            next.game_state.step_forward();
            next.ui_state = UiState::default();
        },
        Action::StepBackward => {
            next.game_state.step_backward();
            next.ui_state = UiState::default();
        },
        Action::GoToMove(index) => {
            next.game_state.go_to(*index);
            next.ui_state = UiState::default();
        },
    }
    next
}

fn select(state: &mut GamePlayState, square: Square) {
    if state.ui_state.selected == Some(square) {
        // Re-selecting is idle for identical input.
        return;
    }
    state.ui_state.selected = Some(square);
    state.ui_state.possible_moves = state.game_state.current().legal_moves_from(square);
}

fn apply_move(state: &mut GamePlayState, mv: &Move) {
    let next_snapshot = state.game_state.current().make_move(mv);
    if let Some((result, termination)) = outcome(next_snapshot.resolution()) {
        state.game_state.meta.result = Some(result.to_string());
        state.game_state.meta.termination = Some(termination);
    }
    state.game_state.add(next_snapshot);
    state.ui_state = UiState::default();
    state.promotion_state = PromotionState::None;
}

/// PGN-style result tag and a human-readable termination for a terminal
/// resolution.
fn outcome(resolution: Resolution) -> Option<(&'static str, String)> {
    match resolution {
        Resolution::InProgress => None,
        Resolution::Checkmate {
            winner: Player::White,
        } => Some(("1-0", resolution.to_string())),
        Resolution::Checkmate {
            winner: Player::Black,
        } => Some(("0-1", resolution.to_string())),
        Resolution::Stalemate | Resolution::Draw { .. } => {
            Some(("1/2-1/2", resolution.to_string()))
        },
    }
}
