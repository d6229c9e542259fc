//! Interactive stdin driver for the game-state machine: a minimal host that
//! plays the role of the UI layer. Commands are line-based:
//!
//! - `click e2` — send a click to the selection/move state machine
//! - `move e2e4` — apply a move directly (promotions: `move e7e8` then
//!   `promote q` when prompted)
//! - `promote q|r|b|n` — answer the promotion prompt
//! - `undo` / `redo` / `goto N` — navigate the history
//! - `position <fen>` — restart from a FEN position
//! - `d` — draw the current board
//! - `quit`

use std::io::{self, BufRead};

use tabia::chess::core::{Promotion, Square};
use tabia::chess::position::Position;
use tabia::game::controller::GameController;
use tabia::game::state::{GameMetaInfo, PromotionState};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut controller = GameController::new().with_listener(Box::new(|state| {
        let snapshot = state.game_state.current();
        println!("{}", snapshot.board());
        if let PromotionState::Await(at) = state.promotion_state {
            println!("promotion on {at}: answer with `promote q|r|b|n`");
        }
        if snapshot.resolution().is_terminal() {
            println!("game over: {}", snapshot.resolution());
        }
    }));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Err(error) = execute(&mut controller, line.trim()) {
            println!("error: {error}");
        }
        if line.trim() == "quit" {
            break;
        }
    }
    Ok(())
}

fn execute(controller: &mut GameController, line: &str) -> anyhow::Result<()> {
    match line.split_once(' ') {
        Some(("click", square)) => controller.on_click(Square::try_from(square)?),
        Some(("move", uci)) => {
            let (from, to) = parse_uci(uci)?;
            // Select first so a promotion prompt can re-run the destination
            // click once the piece is chosen.
            controller.on_click(from);
            controller.apply_move(from, to)?;
        },
        Some(("promote", symbol)) => {
            let promotion = match symbol.chars().next() {
                Some(symbol) => Promotion::try_from(symbol)?,
                None => anyhow::bail!("promote expects one of q, r, b, n"),
            };
            if matches!(
                controller.state().promotion_state,
                PromotionState::Await(_)
            ) {
                controller.on_promotion_piece_selected(promotion);
            } else {
                println!("no promotion is awaiting selection");
            }
        },
        Some(("goto", index)) => controller.go_to_move(index.parse()?)?,
        Some(("position", fen)) => {
            controller.reset_to(Position::from_fen(fen)?, GameMetaInfo::with_defaults());
        },
        None if line == "undo" => controller.step_backward(),
        None if line == "redo" => controller.step_forward(),
        None if line == "d" => println!("{}", controller.snapshot().board()),
        None if line == "reset" => controller.reset(),
        None if line == "quit" || line.is_empty() => {},
        _ => println!("unknown command: {line}"),
    }
    Ok(())
}

fn parse_uci(uci: &str) -> anyhow::Result<(Square, Square)> {
    if uci.len() != 4 {
        anyhow::bail!("moves are 4 characters (e.g. e2e4), got '{uci}'");
    }
    Ok((
        Square::try_from(&uci[..2])?,
        Square::try_from(&uci[2..])?,
    ))
}
