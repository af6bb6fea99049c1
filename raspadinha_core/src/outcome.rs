use crate::symbols::CellSymbol;
use serde::{Deserialize, Serialize};

/// Decision for one round. `prize_value` is zero on a loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    is_win: bool,
    prize_value: f64,
}

impl RoundOutcome {
    pub fn win(prize_value: f64) -> Self {
        Self {
            is_win: true,
            prize_value,
        }
    }

    pub fn loss() -> Self {
        Self {
            is_win: false,
            prize_value: 0.0,
        }
    }

    pub fn is_win(&self) -> bool {
        self.is_win
    }

    pub fn prize_value(&self) -> f64 {
        self.prize_value
    }

    /// Symbol that must appear exactly at the match threshold.
    pub fn winning_symbol(&self) -> Option<CellSymbol> {
        self.is_win.then(|| CellSymbol::for_prize(self.prize_value))
    }
}
