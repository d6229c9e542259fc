//! Text-notation collaborator boundary. The core never serializes game
//! histories itself: hosts plug in an implementation (typically PGN) and the
//! state machine only depends on these signatures.

use crate::game::state::GameState;

/// Serializes a game history to and from a standard notation text.
///
/// Implementations are pure functions of their input: no side effects, no
/// hidden state, `import(export(state))` round-trips.
pub trait Notation {
    /// Renders the whole history as notation text.
    fn export(&self, game_state: &GameState) -> String;

    /// Parses notation text into a history.
    ///
    /// # Errors
    ///
    /// Fails when the text is not valid notation or describes illegal moves.
    fn import(&self, text: &str) -> anyhow::Result<GameState>;
}
