use serde::{Deserialize, Serialize};
use std::fmt;

/// Token shown in a grid cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellSymbol {
    /// Currency-tagged symbol, stored in cents so tags compare exactly.
    Prize { cents: u64 },
    /// Non-winning artwork.
    Decorative(String),
}

impl CellSymbol {
    pub fn for_prize(value: f64) -> Self {
        CellSymbol::Prize {
            cents: (value * 100.0).round() as u64,
        }
    }

    pub fn decorative(name: impl Into<String>) -> Self {
        CellSymbol::Decorative(name.into())
    }

    pub fn is_prize(&self) -> bool {
        matches!(self, CellSymbol::Prize { .. })
    }

    /// Prize value in currency units, `None` for decorative symbols.
    pub fn prize_value(&self) -> Option<f64> {
        match self {
            CellSymbol::Prize { cents } => Some(*cents as f64 / 100.0),
            CellSymbol::Decorative(_) => None,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // whole amounts render as "R$10", fractional as "R$0,50"
            CellSymbol::Prize { cents } if cents % 100 == 0 => write!(f, "R${}", cents / 100),
            CellSymbol::Prize { cents } => write!(f, "R${},{:02}", cents / 100, cents % 100),
            CellSymbol::Decorative(name) => f.write_str(name),
        }
    }
}

/// Decorative set used by the built-in game presets.
pub fn default_decorative() -> Vec<String> {
    ["Trevo", "Ferradura", "Estrela", "Diamante", "Sino", "Cereja"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prize_tags() {
        assert_eq!(CellSymbol::for_prize(10.0).to_string(), "R$10");
        assert_eq!(CellSymbol::for_prize(0.5).to_string(), "R$0,50");
        assert_eq!(CellSymbol::for_prize(2.25).to_string(), "R$2,25");
        assert_eq!(CellSymbol::decorative("Trevo").to_string(), "Trevo");
    }

    #[test]
    fn test_prize_equality_by_tag() {
        assert_eq!(CellSymbol::for_prize(0.1 + 0.2), CellSymbol::for_prize(0.3));
        assert_eq!(CellSymbol::for_prize(5.0).prize_value(), Some(5.0));
        assert_eq!(CellSymbol::decorative("Sino").prize_value(), None);
    }
}
