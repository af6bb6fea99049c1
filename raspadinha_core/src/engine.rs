use crate::{
    composer::compose_grid,
    config::{GameConfig, GameSetup},
    error::GameResult,
    grid::Grid,
    outcome::RoundOutcome,
    resolver::resolve_round,
    rng::ProvablyFairRng,
    symbols::CellSymbol,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A resolved round and the grid that presents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub outcome: RoundOutcome,
    pub grid: Grid,
}

/// Resolves the outcome, then lays out a grid consistent with it.
pub fn play_round<R: Rng + ?Sized>(rng: &mut R, setup: &GameSetup) -> GameResult<Round> {
    let outcome = resolve_round(rng, &setup.config)?;
    let grid = compose_grid(rng, &outcome, &setup.config, &setup.decorative_symbols())?;
    Ok(Round { outcome, grid })
}

/// Convenience: play a round on a fresh provably-fair stream.
pub fn play_with_seeds(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    setup: &GameSetup,
) -> GameResult<Round> {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    play_round(&mut rng, setup)
}

/// Replays a round from its revealed seeds and compares the grid labels.
pub fn verify_round(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    setup: &GameSetup,
    expected_labels: &[String],
) -> GameResult<bool> {
    let round = play_with_seeds(server_seed, client_seed, nonce, setup)?;
    Ok(round.grid.labels() == expected_labels)
}

/// Aggregate statistics over many simulated rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds: u64,
    pub wins: u64,
    pub total_paid: f64,
    /// Wins per prize tier, in table order.
    pub tier_hits: Vec<u64>,
    /// Configured share of wins per tier.
    pub expected_shares: Vec<f64>,
    pub win_frequency: f64,
    /// Grids that failed the match audit. Always zero for a sound composer.
    pub grid_violations: u64,
}

impl SimulationReport {
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f64 / self.rounds as f64
        }
    }

    pub fn observed_shares(&self) -> Vec<f64> {
        self.tier_hits
            .iter()
            .map(|&h| if self.wins == 0 { 0.0 } else { h as f64 / self.wins as f64 })
            .collect()
    }

    /// Average prize paid per round.
    pub fn mean_payout(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_paid / self.rounds as f64
        }
    }
}

/// Plays `rounds` rounds and tallies outcomes against the configuration.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
    decorative: &[CellSymbol],
    rounds: u64,
) -> GameResult<SimulationReport> {
    config.validate()?;
    let mut report = SimulationReport {
        rounds,
        wins: 0,
        total_paid: 0.0,
        tier_hits: vec![0; config.prize_table.len()],
        expected_shares: config.prize_table.shares(),
        win_frequency: config.win_frequency,
        grid_violations: 0,
    };
    let tier_symbols: Vec<CellSymbol> = config.prize_table.0.iter().map(|t| t.symbol()).collect();

    for _ in 0..rounds {
        let outcome = resolve_round(rng, config)?;
        let grid = compose_grid(rng, &outcome, config, decorative)?;
        if grid
            .check_outcome(&outcome, config.symbols_per_winning_match)
            .is_err()
        {
            report.grid_violations += 1;
        }
        if let Some(symbol) = outcome.winning_symbol() {
            report.wins += 1;
            report.total_paid += outcome.prize_value();
            if let Some(i) = tier_symbols.iter().position(|s| *s == symbol) {
                report.tier_hits[i] += 1;
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_deterministic() {
        let setup = GameSetup::regular();
        let out1 = play_with_seeds("server", "client", 1, &setup).unwrap();
        let out2 = play_with_seeds("server", "client", 1, &setup).unwrap();
        assert_eq!(out1, out2);
    }

    #[test]
    fn test_verify_round() {
        let setup = GameSetup::promotional();
        let round = play_with_seeds("server", "client", 9, &setup).unwrap();
        let labels = round.grid.labels();
        assert!(verify_round("server", "client", 9, &setup, &labels).unwrap());
        let mut tampered = labels.clone();
        tampered[0] = "Coringa".to_string();
        assert!(!verify_round("server", "client", 9, &setup, &tampered).unwrap());
    }
}
