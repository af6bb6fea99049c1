//! Game configuration: payout tables, grid shape and per-segment variants.

use crate::error::{GameError, GameResult};
use crate::paytable::PrizeTable;
use crate::symbols::{default_decorative, CellSymbol};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CELL_COUNT: usize = 9;
pub const DEFAULT_MATCH_THRESHOLD: usize = 3;

fn default_cell_count() -> usize {
    DEFAULT_CELL_COUNT
}

fn default_match_threshold() -> usize {
    DEFAULT_MATCH_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Probability in `[0, 1]` that a round wins anything at all.
    pub win_frequency: f64,
    pub prize_table: PrizeTable,
    #[serde(default = "default_cell_count")]
    pub cell_count: usize,
    #[serde(default = "default_match_threshold")]
    pub symbols_per_winning_match: usize,
}

impl GameConfig {
    pub fn new(win_frequency: f64, prize_table: PrizeTable) -> Self {
        Self {
            win_frequency,
            prize_table,
            cell_count: DEFAULT_CELL_COUNT,
            symbols_per_winning_match: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(0.0..=1.0).contains(&self.win_frequency) {
            return Err(GameError::invalid(format!(
                "win frequency {} is outside [0, 1]",
                self.win_frequency
            )));
        }
        if self.symbols_per_winning_match < 2 {
            return Err(GameError::invalid(format!(
                "match threshold {} leaves no room for non-winning repeats",
                self.symbols_per_winning_match
            )));
        }
        if self.cell_count < self.symbols_per_winning_match {
            return Err(GameError::invalid(format!(
                "{} cells cannot hold a {}-symbol match",
                self.cell_count, self.symbols_per_winning_match
            )));
        }
        self.prize_table.validate()
    }

    /// Most times any symbol may repeat without forming a match.
    pub fn repetition_cap(&self) -> usize {
        self.symbols_per_winning_match.saturating_sub(1)
    }

    /// Fewest distinct symbols that can fill the grid under the cap.
    pub fn min_distinct_symbols(&self) -> usize {
        let cap = self.repetition_cap().max(1);
        self.cell_count.div_ceil(cap)
    }

    /// Every symbol a grid may show: prize tags in table order, then the
    /// decorative set, without duplicates.
    pub fn symbol_pool(&self, decorative: &[CellSymbol]) -> Vec<CellSymbol> {
        let mut pool = self.prize_table.symbols();
        for sym in decorative {
            if !pool.contains(sym) {
                pool.push(sym.clone());
            }
        }
        pool
    }
}

/// One playable variant: payout configuration plus its decorative artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSetup {
    pub config: GameConfig,
    #[serde(default = "default_decorative")]
    pub decorative: Vec<String>,
}

impl GameSetup {
    pub fn new(config: GameConfig, decorative: Vec<String>) -> Self {
        Self { config, decorative }
    }

    pub fn decorative_symbols(&self) -> Vec<CellSymbol> {
        self.decorative
            .iter()
            .map(|name| CellSymbol::decorative(name.as_str()))
            .collect()
    }

    pub fn validate(&self) -> GameResult<()> {
        self.config.validate()?;
        let pool = self.config.symbol_pool(&self.decorative_symbols());
        let needed = self.config.min_distinct_symbols();
        if pool.len() < needed {
            return Err(GameError::invalid(format!(
                "{} distinct symbols cannot fill {} cells, need at least {needed}",
                pool.len(),
                self.config.cell_count
            )));
        }
        Ok(())
    }

    pub fn regular() -> Self {
        Self::new(
            GameConfig::new(0.30, PrizeTable::regular()),
            default_decorative(),
        )
    }

    pub fn promotional() -> Self {
        Self::new(
            GameConfig::new(0.65, PrizeTable::promotional()),
            default_decorative(),
        )
    }
}

/// Player segment, supplied by the backend alongside the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    #[default]
    Regular,
    Promotional,
}

impl Segment {
    /// Maps a backend `user_type` field. Unknown or missing types play the
    /// regular table.
    pub fn from_user_type(user_type: Option<&str>) -> Self {
        user_type
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Regular => "regular",
            Segment::Promotional => "promotional",
        }
    }
}

impl FromStr for Segment {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" | "standard" | "user" => Ok(Segment::Regular),
            "promotional" | "blogger" | "influencer" => Ok(Segment::Promotional),
            other => Err(GameError::invalid(format!("unknown segment {other:?}"))),
        }
    }
}

/// Versioned set of game variants, one per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCatalog {
    #[serde(default)]
    pub version: u32,
    pub regular: GameSetup,
    pub promotional: GameSetup,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self {
            version: 1,
            regular: GameSetup::regular(),
            promotional: GameSetup::promotional(),
        }
    }
}

impl GameCatalog {
    pub fn select(&self, segment: Segment) -> &GameSetup {
        match segment {
            Segment::Regular => &self.regular,
            Segment::Promotional => &self.promotional,
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        for segment in [Segment::Regular, Segment::Promotional] {
            self.select(segment).validate().map_err(|e| match e {
                GameError::InvalidConfiguration(reason) => GameError::invalid(format!(
                    "{} game: {reason}",
                    segment.as_str()
                )),
            })?;
        }
        Ok(())
    }

    /// Parses and validates a JSON catalog.
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let catalog: GameCatalog = serde_json::from_str(json)
            .map_err(|e| GameError::invalid(format!("malformed catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GameError::invalid(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> String {
        // plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::PrizeTier;

    #[test]
    fn test_default_catalog_is_valid() {
        assert!(GameCatalog::default().validate().is_ok());
    }

    #[test]
    fn test_min_distinct_symbols() {
        let cfg = GameConfig::new(0.5, PrizeTable::regular());
        assert_eq!(cfg.repetition_cap(), 2);
        assert_eq!(cfg.min_distinct_symbols(), 5);
    }

    #[test]
    fn test_validate_rejects_bad_frequency() {
        let mut cfg = GameConfig::new(1.5, PrizeTable::regular());
        assert!(cfg.validate().is_err());
        cfg.win_frequency = f64::NAN;
        assert!(cfg.validate().is_err());
        cfg.win_frequency = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_setup_rejects_small_symbol_pool() {
        let cfg = GameConfig::new(0.5, PrizeTable(vec![PrizeTier::new(10.0, 100.0)]));
        let setup = GameSetup::new(cfg, vec!["Trevo".into(), "Sino".into()]);
        assert!(matches!(
            setup.validate(),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_symbol_pool_dedupes() {
        let cfg = GameConfig::new(
            0.5,
            PrizeTable(vec![PrizeTier::new(10.0, 1.0), PrizeTier::new(10.0, 2.0)]),
        );
        let pool = cfg.symbol_pool(&[
            CellSymbol::decorative("Sino"),
            CellSymbol::decorative("Sino"),
        ]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_segment_from_user_type() {
        assert_eq!(Segment::from_user_type(Some("blogger")), Segment::Promotional);
        assert_eq!(Segment::from_user_type(Some(" Influencer ")), Segment::Promotional);
        assert_eq!(Segment::from_user_type(Some("vip")), Segment::Regular);
        assert_eq!(Segment::from_user_type(None), Segment::Regular);
    }

    #[test]
    fn test_catalog_json_round_trip_defaults() {
        let json = r#"{
            "regular": { "config": { "win_frequency": 0.2, "prize_table": [{"value": 1, "weight": 10}] } },
            "promotional": { "config": { "win_frequency": 0.6, "prize_table": [{"value": 5, "weight": 10}] } }
        }"#;
        let catalog = GameCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.regular.config.cell_count, 9);
        assert_eq!(catalog.regular.config.symbols_per_winning_match, 3);
        assert_eq!(catalog.promotional.decorative, default_decorative());
    }

    #[test]
    fn test_catalog_rejects_zero_weights() {
        let json = r#"{
            "regular": { "config": { "win_frequency": 0.2, "prize_table": [{"value": 1, "weight": 0}] } },
            "promotional": { "config": { "win_frequency": 0.6, "prize_table": [{"value": 5, "weight": 10}] } }
        }"#;
        let err = GameCatalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("regular game"));
    }
}
