use crate::outcome::RoundOutcome;
use crate::symbols::CellSymbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Ways a grid can misrepresent its round.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridViolation {
    #[error("winning symbol {symbol} appears {count} times, expected {expected}")]
    WinningCount {
        symbol: CellSymbol,
        count: usize,
        expected: usize,
    },
    #[error("symbol {symbol} reaches {count} copies alongside the winner")]
    SecondMatch { symbol: CellSymbol, count: usize },
    #[error("losing grid shows {count} copies of {symbol}")]
    AccidentalMatch { symbol: CellSymbol, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<CellSymbol>,
}

impl Grid {
    pub fn new(cells: Vec<CellSymbol>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellSymbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn counts(&self) -> BTreeMap<&CellSymbol, usize> {
        let mut counts = BTreeMap::new();
        for sym in &self.cells {
            *counts.entry(sym).or_insert(0) += 1;
        }
        counts
    }

    pub fn max_repeat(&self) -> usize {
        self.counts().values().copied().max().unwrap_or(0)
    }

    /// The symbol shown at least `threshold` times, if any.
    pub fn winning_symbol(&self, threshold: usize) -> Option<&CellSymbol> {
        self.counts()
            .into_iter()
            .find(|(_, n)| *n >= threshold)
            .map(|(sym, _)| sym)
    }

    pub fn positions_of(&self, symbol: &CellSymbol) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| *s == symbol)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.cells.iter().map(CellSymbol::label).collect()
    }

    /// Checks that the grid presents `outcome` and nothing else: a win
    /// shows its prize tag exactly `threshold` times with every other
    /// symbol below it, a loss keeps every symbol below it.
    pub fn check_outcome(
        &self,
        outcome: &RoundOutcome,
        threshold: usize,
    ) -> Result<(), GridViolation> {
        let counts = self.counts();
        let winner = outcome.winning_symbol();
        if let Some(symbol) = &winner {
            let count = counts.get(symbol).copied().unwrap_or(0);
            if count != threshold {
                return Err(GridViolation::WinningCount {
                    symbol: symbol.clone(),
                    count,
                    expected: threshold,
                });
            }
        }
        for (symbol, count) in counts {
            if Some(symbol) == winner.as_ref() || count < threshold {
                continue;
            }
            return Err(match winner {
                Some(_) => GridViolation::SecondMatch {
                    symbol: symbol.clone(),
                    count,
                },
                None => GridViolation::AccidentalMatch {
                    symbol: symbol.clone(),
                    count,
                },
            });
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let labels: Vec<String> = chunk.iter().map(|s| format!("{s:>9}")).collect();
            f.write_str(&labels.join(" "))?;
        }
        Ok(())
    }
}
