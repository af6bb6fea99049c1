use raspadinha_core::{play_round, GameSetup, ProvablyFairRng};

fn main() {
    // Example end-to-end round
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let nonce = 1u64;
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    let setup = GameSetup::regular();
    match play_round(&mut rng, &setup) {
        Ok(round) => println!(
            "server_seed_hash={} win={} prize={}\n{}",
            rng.server_seed_hash_hex(),
            round.outcome.is_win(),
            round.outcome.prize_value(),
            round.grid
        ),
        Err(e) => eprintln!("{e}"),
    }
}
