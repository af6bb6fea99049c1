use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raspadinha_core::{compose_grid, CellSymbol, GameConfig, PrizeTable, PrizeTier, RoundOutcome};

fn table() -> impl Strategy<Value = PrizeTable> {
    prop::collection::vec((1u32..500, 0.0f64..50.0), 1..8).prop_map(|tiers| {
        let mut tiers: Vec<PrizeTier> = tiers
            .into_iter()
            .map(|(v, w)| PrizeTier::new(v as f64, w))
            .collect();
        tiers[0].weight += 1.0;
        PrizeTable(tiers)
    })
}

proptest! {
    #[test]
    fn composed_grid_presents_outcome(
        seed in any::<u64>(),
        table in table(),
        pick in any::<prop::sample::Index>(),
        win in any::<bool>(),
    ) {
        let cfg = GameConfig::new(0.5, table);
        let deco: Vec<CellSymbol> = ["Trevo", "Sino", "Estrela", "Cereja", "Diamante"]
            .iter()
            .map(|s| CellSymbol::decorative(*s))
            .collect();
        let outcome = if win {
            RoundOutcome::win(pick.get(&cfg.prize_table.0).value)
        } else {
            RoundOutcome::loss()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = compose_grid(&mut rng, &outcome, &cfg, &deco).unwrap();
        prop_assert_eq!(grid.len(), 9);
        prop_assert!(grid.check_outcome(&outcome, 3).is_ok());
    }
}
