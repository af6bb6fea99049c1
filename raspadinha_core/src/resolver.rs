use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::outcome::RoundOutcome;
use rand::Rng;
use tracing::{debug, warn};

/// Decides whether a round wins and, if so, which prize it pays.
///
/// Consumes one uniform draw for the win decision and, on a win, a second
/// draw scaled to the table's total weight for the tier lookup.
pub fn resolve_round<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> GameResult<RoundOutcome> {
    config.validate()?;

    let r: f64 = rng.gen();
    if r >= config.win_frequency {
        debug!(draw = r, "round lost");
        return Ok(RoundOutcome::loss());
    }

    let total = config.prize_table.total_weight();
    let draw = rng.gen::<f64>() * total;
    let pick = config
        .prize_table
        .select(draw)
        .ok_or_else(|| GameError::invalid("prize table has no positive weight"))?;
    if pick.fell_back {
        warn!(draw, total, tier = pick.index, "tier walk overshot, paying last tier");
    }
    debug!(tier = pick.index, prize = pick.value, "round won");
    Ok(RoundOutcome::win(pick.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::{PrizeTable, PrizeTier};
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_zero_draw_wins_first_tier() {
        // StepRng(0, 0) yields 0.0 for every float draw
        let mut rng = StepRng::new(0, 0);
        let cfg = GameConfig::new(0.5, PrizeTable::regular());
        let out = resolve_round(&mut rng, &cfg).unwrap();
        assert!(out.is_win());
        assert_eq!(out.prize_value(), 0.5);
    }

    #[test]
    fn test_max_draw_loses() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let cfg = GameConfig::new(0.999, PrizeTable::regular());
        let out = resolve_round(&mut rng, &cfg).unwrap();
        assert_eq!(out, RoundOutcome::loss());
    }

    #[test]
    fn test_all_zero_weights_is_error() {
        let mut rng = StepRng::new(0, 0);
        let cfg = GameConfig::new(
            1.0,
            PrizeTable(vec![PrizeTier::new(10.0, 0.0), PrizeTier::new(20.0, 0.0)]),
        );
        assert!(matches!(
            resolve_round(&mut rng, &cfg),
            Err(GameError::InvalidConfiguration(_))
        ));
    }
}
