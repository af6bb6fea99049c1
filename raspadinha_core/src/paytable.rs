use crate::error::{GameError, GameResult};
use crate::symbols::CellSymbol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub value: f64,  // currency units
    pub weight: f64, // relative share, conventionally percentage points
}

impl PrizeTier {
    pub fn new(value: f64, weight: f64) -> Self {
        Self { value, weight }
    }

    pub fn symbol(&self) -> CellSymbol {
        CellSymbol::for_prize(self.value)
    }
}

/// Result of a cumulative walk over the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPick {
    pub index: usize,
    pub value: f64,
    /// The draw overshot the cumulative sum and the last live tier was used.
    pub fell_back: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable(pub Vec<PrizeTier>);

impl PrizeTable {
    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|t| t.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.0.is_empty() {
            return Err(GameError::invalid("prize table is empty"));
        }
        for (i, tier) in self.0.iter().enumerate() {
            if !tier.value.is_finite() || tier.value <= 0.0 {
                return Err(GameError::invalid(format!(
                    "prize tier {i} has non-positive value {}",
                    tier.value
                )));
            }
            let cents = tier.value * 100.0;
            if cents.round() < 1.0 || cents >= u64::MAX as f64 {
                return Err(GameError::invalid(format!(
                    "prize tier {i} value {} has no cent tag",
                    tier.value
                )));
            }
            if (cents - cents.round()).abs() > 1e-6 * cents.max(1.0) {
                return Err(GameError::invalid(format!(
                    "prize tier {i} value {} is not a whole number of cents",
                    tier.value
                )));
            }
            if !tier.weight.is_finite() || tier.weight < 0.0 {
                return Err(GameError::invalid(format!(
                    "prize tier {i} has invalid weight {}",
                    tier.weight
                )));
            }
        }
        if self.total_weight() <= 0.0 {
            return Err(GameError::invalid("prize table weights sum to zero"));
        }
        Ok(())
    }

    /// Inverse-CDF lookup: `draw` is expected in `[0, total_weight)`.
    ///
    /// Walks tiers in table order and returns the first whose cumulative
    /// weight reaches `draw`. Zero-weight tiers never pay. When rounding
    /// leaves the draw above the final cumulative sum the last tier with a
    /// positive weight is returned rather than the table's last entry, so a
    /// trailing zero-weight tier can never be paid through the fallback.
    /// Returns `None` only for a table with no positive weight, which
    /// `validate` rejects.
    pub fn select(&self, draw: f64) -> Option<TierPick> {
        let mut cumulative = 0.0;
        let mut last_live = None;
        for (index, tier) in self.0.iter().enumerate() {
            if tier.weight <= 0.0 {
                continue;
            }
            cumulative += tier.weight;
            last_live = Some(index);
            if cumulative >= draw {
                return Some(TierPick {
                    index,
                    value: tier.value,
                    fell_back: false,
                });
            }
        }
        last_live.map(|index| TierPick {
            index,
            value: self.0[index].value,
            fell_back: true,
        })
    }

    /// Distinct prize symbols in table order.
    pub fn symbols(&self) -> Vec<CellSymbol> {
        let mut out: Vec<CellSymbol> = Vec::with_capacity(self.0.len());
        for tier in &self.0 {
            let sym = tier.symbol();
            if !out.contains(&sym) {
                out.push(sym);
            }
        }
        out
    }

    /// Share of the total weight carried by each tier.
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total_weight();
        self.0
            .iter()
            .map(|t| if total > 0.0 { t.weight / total } else { 0.0 })
            .collect()
    }

    /// Expected prize paid per winning round.
    pub fn mean_prize(&self) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        self.0.iter().map(|t| t.value * t.weight).sum::<f64>() / total
    }

    /// Standard payout table.
    pub fn regular() -> Self {
        Self(vec![
            PrizeTier::new(0.5, 35.0),
            PrizeTier::new(1.0, 25.0),
            PrizeTier::new(2.0, 18.0),
            PrizeTier::new(5.0, 12.0),
            PrizeTier::new(10.0, 6.0),
            PrizeTier::new(20.0, 3.0),
            PrizeTier::new(50.0, 0.8),
            PrizeTier::new(100.0, 0.2),
        ])
    }

    /// High-payout table for promotional accounts.
    pub fn promotional() -> Self {
        Self(vec![
            PrizeTier::new(2.0, 20.0),
            PrizeTier::new(5.0, 25.0),
            PrizeTier::new(10.0, 25.0),
            PrizeTier::new(20.0, 15.0),
            PrizeTier::new(50.0, 10.0),
            PrizeTier::new(100.0, 4.0),
            PrizeTier::new(500.0, 1.0),
        ])
    }
}
