//! The game-state machine a user interface drives: snapshot history with an
//! undo/redo cursor, a closed action set with a pure reducer, and a
//! controller facade translating clicks into actions.

pub mod controller;
pub mod notation;
pub mod reducer;
pub mod state;
