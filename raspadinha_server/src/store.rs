//! SQLite persistence: seed/nonce/catalog parameters and the round log.

use raspadinha_core::{derive_hash_hex, GameCatalog, Round, Segment};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
pub struct StoredParams {
    pub server_seed: String,
    pub server_seed_hash: String,
    pub catalog_json: String,
    pub nonce: i64,
}

pub async fn get_params(pool: &SqlitePool) -> anyhow::Result<StoredParams> {
    let row = sqlx::query_as::<_, StoredParams>(
        "SELECT server_seed, server_seed_hash, catalog_json, nonce FROM params WHERE id = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Claims the next nonce atomically so concurrent rounds never share one.
pub async fn next_round_params(pool: &SqlitePool) -> sqlx::Result<StoredParams> {
    sqlx::query_as::<_, StoredParams>(
        "UPDATE params SET nonce = nonce + 1 WHERE id = 1 \
         RETURNING server_seed, server_seed_hash, catalog_json, nonce",
    )
    .fetch_one(pool)
    .await
}

pub async fn set_catalog(pool: &SqlitePool, catalog: &GameCatalog) -> sqlx::Result<()> {
    sqlx::query("UPDATE params SET catalog_json = ? WHERE id = 1")
        .bind(catalog.to_json())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn record_round(
    pool: &SqlitePool,
    params: &StoredParams,
    client_seed: &str,
    segment: Segment,
    catalog_version: u32,
    round: &Round,
) -> anyhow::Result<()> {
    let grid_json = serde_json::to_string(&round.grid.labels())?;
    let ts = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO rounds (ts, client_seed, nonce, server_seed_hash, segment, catalog_version, is_win, prize_value, grid_json) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(client_seed)
    .bind(params.nonce)
    .bind(&params.server_seed_hash)
    .bind(segment.as_str())
    .bind(catalog_version)
    .bind(round.outcome.is_win())
    .bind(round.outcome.prize_value())
    .bind(grid_json)
    .execute(pool)
    .await?;
    Ok(())
}

/// Runs migrations, repairs the seed commitment and settles the catalog.
///
/// An explicit catalog file wins over the stored one; an empty store gets
/// the built-in presets. Whatever is chosen must validate.
pub async fn init_db(db: &SqlitePool, override_catalog: Option<GameCatalog>) -> anyhow::Result<GameCatalog> {
    sqlx::migrate!("./migrations").run(db).await?;

    let p = get_params(db).await?;
    let hash = derive_hash_hex(p.server_seed.as_bytes());
    if p.server_seed_hash != hash {
        sqlx::query("UPDATE params SET server_seed_hash = ? WHERE id = 1")
            .bind(&hash)
            .execute(db)
            .await?;
    }

    let catalog = match override_catalog {
        Some(catalog) => catalog,
        None if p.catalog_json.trim().is_empty() => GameCatalog::default(),
        None => GameCatalog::from_json_str(&p.catalog_json)?,
    };
    catalog.validate()?;
    set_catalog(db, &catalog).await?;
    Ok(catalog)
}
