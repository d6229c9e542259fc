//! State aggregates observed by the presentation layer. All of them are
//! plain immutable values: the reducer builds a new aggregate for every
//! transition, so hosts detect changes by equality instead of dirty flags.

use serde::{Deserialize, Serialize};

use crate::chess::core::{Promotion, Square};
use crate::chess::moves::{target_squares, Move};
use crate::chess::position::Position;

/// Game-level metadata independent of board state, following the PGN tag
/// conventions. Created with defaults at reset and replaced wholesale by
/// collaborators (e.g. a preset).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetaInfo {
    #[allow(missing_docs)]
    pub white: String,
    #[allow(missing_docs)]
    pub black: String,
    /// "1-0", "0-1" or "1/2-1/2" once the game is decided.
    pub result: Option<String>,
    /// Human-readable reason the game ended.
    pub termination: Option<String>,
    /// Date tag in the PGN "YYYY.MM.DD" format.
    pub date: String,
}

impl GameMetaInfo {
    /// Placeholder players and today's date.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            white: "White".to_string(),
            black: "Black".to_string(),
            result: None,
            termination: None,
            date: chrono::Utc::now().format("%Y.%m.%d").to_string(),
        }
    }
}

impl Default for GameMetaInfo {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Ordered, append-only sequence of position snapshots with a cursor,
/// supporting undo/redo-style navigation.
///
/// Invariant: the history is never empty and
/// `current_index < snapshots.len()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[allow(missing_docs)]
    pub meta: GameMetaInfo,
    snapshots: Vec<Position>,
    current_index: usize,
}

impl GameState {
    /// A single-snapshot history starting at `initial`.
    #[must_use]
    pub fn new(initial: Position, meta: GameMetaInfo) -> Self {
        Self {
            meta,
            snapshots: vec![initial],
            current_index: 0,
        }
    }

    /// The snapshot under the cursor: the one displayed and acted upon.
    #[must_use]
    pub fn current(&self) -> &Position {
        &self.snapshots[self.current_index]
    }

    /// The snapshot immediately preceding the cursor, used to render the move
    /// that just happened. `None` at the start of the history.
    #[must_use]
    pub fn last_active(&self) -> Option<&Position> {
        match self.current_index {
            0 => None,
            index => Some(&self.snapshots[index - 1]),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of snapshots in the history; at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Histories always hold at least the initial snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn can_step_forward(&self) -> bool {
        self.current_index + 1 < self.snapshots.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn can_step_backward(&self) -> bool {
        self.current_index > 0
    }

    /// Moves the cursor one snapshot forward; no-op at the newest snapshot.
    pub(crate) fn step_forward(&mut self) {
        if self.can_step_forward() {
            self.current_index += 1;
        }
    }

    /// Moves the cursor one snapshot backward; no-op at the start.
    pub(crate) fn step_backward(&mut self) {
        if self.can_step_backward() {
            self.current_index -= 1;
        }
    }

    /// Places the cursor on `index`; no-op when out of range (the controller
    /// rejects such indices before dispatching).
    pub(crate) fn go_to(&mut self, index: usize) {
        if index < self.snapshots.len() {
            self.current_index = index;
        }
    }

    /// Appends a snapshot after the cursor and moves the cursor onto it.
    ///
    /// Appending while the cursor is rewound discards the abandoned redo
    /// branch: a new move starts a new line.
    pub(crate) fn add(&mut self, snapshot: Position) {
        self.snapshots.truncate(self.current_index + 1);
        self.snapshots.push(snapshot);
        self.current_index += 1;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Position::default(), GameMetaInfo::with_defaults())
    }
}

/// Transient selection state. Recomputed on every selection change and reset
/// by history mutation or navigation; never persisted across resets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    /// The square whose piece is currently selected.
    pub selected: Option<Square>,
    /// Legal moves of the selected piece, cached for destination lookups and
    /// highlighting.
    pub possible_moves: Vec<Move>,
    /// Whether the promotion-piece picker should be shown.
    pub show_promotion_dialog: bool,
}

impl UiState {
    /// Destination squares to highlight for the current selection.
    pub fn target_squares(&self) -> impl Iterator<Item = Square> + '_ {
        target_squares(&self.possible_moves)
    }
}

/// Sub-state-machine gating the two-step "choose destination, then choose
/// promotion piece" interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromotionState {
    /// No promotion in flight.
    #[default]
    None,
    /// A promoting destination was clicked; the UI must ask which piece to
    /// promote to.
    Await(Square),
    /// The piece kind was chosen; the move finder resolves the click with it.
    ContinueWith(Promotion),
}

/// Overlay-dataset selector forwarded to the presentation layer. The core
/// only stores the active choice; producing the overlay is the host's
/// concern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visualisation {
    #[allow(missing_docs)]
    #[default]
    None,
    /// Squares the opponent currently attacks.
    Threats,
    /// Relative material balance.
    Material,
}

/// The full aggregate exposed to the UI layer: game history, transient
/// selection, the promotion sub-state and the active visualisation.
///
/// This is the single externally observed value; every action produces a
/// brand-new `GamePlayState`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamePlayState {
    #[allow(missing_docs)]
    pub game_state: GameState,
    #[allow(missing_docs)]
    pub ui_state: UiState,
    #[allow(missing_docs)]
    pub promotion_state: PromotionState,
    #[allow(missing_docs)]
    pub visualisation: Visualisation,
}

impl GamePlayState {
    /// A fresh aggregate over a single-snapshot history.
    #[must_use]
    pub fn new(initial: Position, meta: GameMetaInfo) -> Self {
        Self {
            game_state: GameState::new(initial, meta),
            ..Self::default()
        }
    }

    /// The snapshot under the history cursor.
    #[must_use]
    pub fn snapshot(&self) -> &Position {
        self.game_state.current()
    }
}
