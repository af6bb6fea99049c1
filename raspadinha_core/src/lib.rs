//! Round engine for scratch-card games: weighted prize resolution and
//! 3-of-a-kind grid composition over a caller-owned random source.

pub mod composer;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod outcome;
pub mod paytable;
pub mod resolver;
pub mod rng;
pub mod symbols;

pub use crate::composer::compose_grid;
pub use crate::config::{GameCatalog, GameConfig, GameSetup, Segment};
pub use crate::engine::{play_round, play_with_seeds, simulate, verify_round, Round, SimulationReport};
pub use crate::error::{GameError, GameResult};
pub use crate::grid::{Grid, GridViolation};
pub use crate::outcome::RoundOutcome;
pub use crate::paytable::{PrizeTable, PrizeTier, TierPick};
pub use crate::resolver::resolve_round;
pub use crate::rng::{derive_hash_hex, ProvablyFairRng};
pub use crate::symbols::{default_decorative, CellSymbol};
