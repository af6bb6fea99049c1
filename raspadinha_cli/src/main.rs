use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raspadinha_core::{derive_hash_hex, simulate, GameCatalog, Segment};
use raspadinha_shared::RoundLogEntry;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "raspadinha-cli", about = "Operator CLI for the scratch-card round service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database URL, default sqlite://raspadinha.db
    #[arg(long, value_parser, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rotate server seed to a new secret
    RotateSeed { new_seed: String },
    /// View last N rounds
    ViewLogs {
        #[arg(default_value_t = 20)]
        n: i64,
    },
    /// Export rounds to CSV path
    ExportCsv { path: String },
    /// Check a catalog file without touching the database
    ValidateConfig { path: PathBuf },
    /// Play rounds offline and compare observed rates with the configuration
    Simulate {
        #[arg(long, default_value = "regular")]
        segment: Segment,
        #[arg(long, default_value_t = 100_000)]
        rounds: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Catalog file; built-in presets when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

async fn get_pool(url: Option<String>) -> anyhow::Result<SqlitePool> {
    let url = url.unwrap_or_else(|| "sqlite://raspadinha.db".into());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    Ok(pool)
}

fn row_to_entry(r: &sqlx::sqlite::SqliteRow) -> anyhow::Result<RoundLogEntry> {
    let ts: String = r.try_get("ts")?;
    let grid_json: String = r.try_get("grid_json")?;
    Ok(RoundLogEntry {
        id: r.try_get("id")?,
        ts: DateTime::parse_from_rfc3339(&ts)?.with_timezone(&Utc),
        client_seed: r.try_get("client_seed")?,
        nonce: r.try_get("nonce")?,
        server_seed_hash: r.try_get("server_seed_hash")?,
        segment: r.try_get("segment")?,
        catalog_version: r.try_get("catalog_version")?,
        is_win: r.try_get("is_win")?,
        prize_value: r.try_get("prize_value")?,
        grid: serde_json::from_str(&grid_json)?,
    })
}

fn run_simulation(segment: Segment, rounds: u64, seed: u64, config: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = match config {
        Some(path) => GameCatalog::load(path)?,
        None => GameCatalog::default(),
    };
    let setup = catalog.select(segment);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = simulate(&mut rng, &setup.config, &setup.decorative_symbols(), rounds)?;

    println!("segment={} rounds={}", segment.as_str(), report.rounds);
    println!(
        "win rate {:.4} (configured {:.4})",
        report.win_rate(),
        report.win_frequency
    );
    println!("mean payout per round {:.4}", report.mean_payout());
    println!("grid violations {}", report.grid_violations);
    let observed = report.observed_shares();
    for (i, tier) in setup.config.prize_table.0.iter().enumerate() {
        println!(
            "  {:>9}  hits={:>8}  share={:.4}  configured={:.4}",
            tier.symbol().to_string(),
            report.tier_hits[i],
            observed[i],
            report.expected_shares[i]
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ValidateConfig { path } => {
            let catalog = GameCatalog::load(&path)?;
            println!(
                "{} is valid (version {})",
                path.display(),
                catalog.version
            );
        }
        Commands::Simulate {
            segment,
            rounds,
            seed,
            config,
        } => run_simulation(segment, rounds, seed, config)?,
        Commands::RotateSeed { new_seed } => {
            let pool = get_pool(cli.database_url).await?;
            let previous: String = sqlx::query("SELECT server_seed FROM params WHERE id = 1")
                .fetch_one(&pool)
                .await?
                .try_get("server_seed")?;
            let hash = derive_hash_hex(new_seed.as_bytes());
            sqlx::query(
                "UPDATE params SET server_seed = ?, server_seed_hash = ?, nonce = 0 WHERE id = 1",
            )
            .bind(new_seed)
            .bind(hash.clone())
            .execute(&pool)
            .await?;
            println!("Revealed previous seed: {}", previous);
            println!("Rotated server seed. New hash: {}", hash);
        }
        Commands::ViewLogs { n } => {
            let pool = get_pool(cli.database_url).await?;
            let rows = sqlx::query("SELECT id, ts, client_seed, nonce, server_seed_hash, segment, catalog_version, is_win, prize_value, grid_json FROM rounds ORDER BY id DESC LIMIT ?")
                .bind(n)
                .fetch_all(&pool).await?;
            for r in &rows {
                let e = row_to_entry(r)?;
                println!(
                    "#{:>6} {} seed={} nonce={} hash={} segment={} catalog=v{} win={} prize={} grid={}",
                    e.id,
                    e.ts.to_rfc3339(),
                    e.client_seed,
                    e.nonce,
                    e.server_seed_hash,
                    e.segment,
                    e.catalog_version,
                    e.is_win,
                    e.prize_value,
                    e.grid.join(",")
                );
            }
        }
        Commands::ExportCsv { path } => {
            let pool = get_pool(cli.database_url).await?;
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record([
                "id",
                "ts",
                "client_seed",
                "nonce",
                "server_seed_hash",
                "segment",
                "catalog_version",
                "is_win",
                "prize_value",
                "grid",
            ])?;
            let rows = sqlx::query("SELECT id, ts, client_seed, nonce, server_seed_hash, segment, catalog_version, is_win, prize_value, grid_json FROM rounds ORDER BY id ASC")
                .fetch_all(&pool).await?;
            let total = rows.len();
            for r in &rows {
                let e = row_to_entry(r)?;
                wtr.write_record(&[
                    e.id.to_string(),
                    e.ts.to_rfc3339(),
                    e.client_seed,
                    e.nonce.to_string(),
                    e.server_seed_hash,
                    e.segment,
                    e.catalog_version.to_string(),
                    e.is_win.to_string(),
                    e.prize_value.to_string(),
                    e.grid.join("|"),
                ])?;
            }
            wtr.flush()?;
            println!("Exported {} rows to {}", total, path);
        }
    }

    Ok(())
}
