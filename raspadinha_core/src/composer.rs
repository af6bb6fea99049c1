//! Lays out the scratch grid for a resolved round.
//!
//! A win shows its prize tag exactly at the match threshold and keeps every
//! other symbol below it. A loss keeps every symbol below the threshold.
//! Placement is always a uniform permutation, so the winning cells carry no
//! positional bias.

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::grid::Grid;
use crate::outcome::RoundOutcome;
use crate::symbols::CellSymbol;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use tracing::debug;

pub fn compose_grid<R: Rng + ?Sized>(
    rng: &mut R,
    outcome: &RoundOutcome,
    config: &GameConfig,
    decorative: &[CellSymbol],
) -> GameResult<Grid> {
    config.validate()?;
    let pool = config.symbol_pool(decorative);
    let needed = config.min_distinct_symbols();
    if pool.len() < needed {
        return Err(GameError::invalid(format!(
            "{} distinct symbols cannot fill {} cells, need at least {needed}",
            pool.len(),
            config.cell_count
        )));
    }

    let cells = match outcome.winning_symbol() {
        Some(winner) => {
            if !outcome.prize_value().is_finite()
                || outcome.prize_value() <= 0.0
                || winner == (CellSymbol::Prize { cents: 0 })
            {
                return Err(GameError::invalid(format!(
                    "winning outcome carries prize {}",
                    outcome.prize_value()
                )));
            }
            winning_cells(rng, &winner, &pool, config)?
        }
        None => losing_cells(rng, &pool, config)?,
    };
    Ok(Grid::new(cells))
}

fn winning_cells<R: Rng + ?Sized>(
    rng: &mut R,
    winner: &CellSymbol,
    pool: &[CellSymbol],
    config: &GameConfig,
) -> GameResult<Vec<CellSymbol>> {
    let threshold = config.symbols_per_winning_match;
    let cap = config.repetition_cap();
    let free = config.cell_count - threshold;

    let mut filler: Vec<CellSymbol> = pool
        .iter()
        .filter(|s| *s != winner)
        .flat_map(|s| std::iter::repeat(s.clone()).take(cap))
        .collect();
    if filler.len() < free {
        return Err(GameError::invalid(format!(
            "only {} filler symbols for {free} non-winning cells",
            filler.len()
        )));
    }
    filler.shuffle(rng);
    let mut filler = filler.into_iter();

    let mut cells: Vec<Option<CellSymbol>> = vec![None; config.cell_count];
    for pos in index::sample(rng, config.cell_count, threshold) {
        cells[pos] = Some(winner.clone());
    }
    let mut cells: Vec<CellSymbol> = cells
        .into_iter()
        .map(|cell| cell.or_else(|| filler.next()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| GameError::invalid("filler pool exhausted"))?;

    cells.shuffle(rng);
    Ok(cells)
}

fn losing_cells<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[CellSymbol],
    config: &GameConfig,
) -> GameResult<Vec<CellSymbol>> {
    let threshold = config.symbols_per_winning_match;
    let mut attempts = 0u32;
    let mut cells = loop {
        attempts += 1;
        let candidate = sample_capped(rng, pool, config.cell_count, config.repetition_cap())?;
        if Grid::new(candidate.clone()).max_repeat() < threshold {
            break candidate;
        }
    };
    debug!(attempts, "losing grid accepted");
    cells.shuffle(rng);
    Ok(cells)
}

/// Draws `len` symbols uniformly from those still under `cap` copies.
fn sample_capped<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[CellSymbol],
    len: usize,
    cap: usize,
) -> GameResult<Vec<CellSymbol>> {
    let mut used = vec![0usize; pool.len()];
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let open: Vec<usize> = (0..pool.len()).filter(|&i| used[i] < cap).collect();
        let &pick = open
            .choose(rng)
            .ok_or_else(|| GameError::invalid("symbol pool exhausted under repetition cap"))?;
        used[pick] += 1;
        out.push(pool[pick].clone());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::{PrizeTable, PrizeTier};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn decorative() -> Vec<CellSymbol> {
        ["Trevo", "Sino", "Estrela", "Cereja"]
            .iter()
            .map(|s| CellSymbol::decorative(*s))
            .collect()
    }

    #[test]
    fn test_winning_grid_has_single_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let cfg = GameConfig::new(1.0, PrizeTable::regular());
        let outcome = RoundOutcome::win(5.0);
        for _ in 0..500 {
            let grid = compose_grid(&mut rng, &outcome, &cfg, &decorative()).unwrap();
            assert_eq!(grid.len(), 9);
            assert!(grid.check_outcome(&outcome, 3).is_ok(), "{grid}");
        }
    }

    #[test]
    fn test_losing_grid_has_no_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let cfg = GameConfig::new(0.0, PrizeTable::regular());
        for _ in 0..500 {
            let grid = compose_grid(&mut rng, &RoundOutcome::loss(), &cfg, &decorative()).unwrap();
            assert!(grid.max_repeat() < 3, "{grid}");
        }
    }

    #[test]
    fn test_minimal_pool_still_fills() {
        // 5 distinct symbols x cap 2 = 10 slots for 9 cells
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let cfg = GameConfig::new(
            1.0,
            PrizeTable(vec![PrizeTier::new(1.0, 1.0), PrizeTier::new(2.0, 1.0)]),
        );
        let deco: Vec<CellSymbol> = decorative().into_iter().take(3).collect();
        for _ in 0..200 {
            let lose = compose_grid(&mut rng, &RoundOutcome::loss(), &cfg, &deco).unwrap();
            assert!(lose.check_outcome(&RoundOutcome::loss(), 3).is_ok());
            let win = compose_grid(&mut rng, &RoundOutcome::win(2.0), &cfg, &deco).unwrap();
            assert!(win.check_outcome(&RoundOutcome::win(2.0), 3).is_ok());
        }
    }

    #[test]
    fn test_too_few_symbols_is_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let cfg = GameConfig::new(1.0, PrizeTable(vec![PrizeTier::new(10.0, 100.0)]));
        let deco: Vec<CellSymbol> = decorative().into_iter().take(2).collect();
        assert!(matches!(
            compose_grid(&mut rng, &RoundOutcome::loss(), &cfg, &deco),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_threshold_of_two() {
        // cap 1: every non-winning symbol appears at most once
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let mut cfg = GameConfig::new(
            1.0,
            PrizeTable(vec![
                PrizeTier::new(1.0, 1.0),
                PrizeTier::new(2.0, 1.0),
                PrizeTier::new(3.0, 1.0),
            ]),
        );
        cfg.cell_count = 4;
        cfg.symbols_per_winning_match = 2;
        let deco = vec![CellSymbol::decorative("Sino")];
        let win = compose_grid(&mut rng, &RoundOutcome::win(1.0), &cfg, &deco).unwrap();
        assert!(win.check_outcome(&RoundOutcome::win(1.0), 2).is_ok());

        cfg.prize_table.0.truncate(1);
        cfg.cell_count = 3;
        let deco = vec![CellSymbol::decorative("Sino"), CellSymbol::decorative("Trevo")];
        let lose = compose_grid(&mut rng, &RoundOutcome::loss(), &cfg, &deco).unwrap();
        assert_eq!(lose.max_repeat(), 1);
    }

    #[test]
    fn test_zero_prize_win_is_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        let cfg = GameConfig::new(1.0, PrizeTable::regular());
        assert!(compose_grid(&mut rng, &RoundOutcome::win(0.0), &cfg, &decorative()).is_err());
        assert!(compose_grid(&mut rng, &RoundOutcome::win(0.004), &cfg, &decorative()).is_err());
    }
}
