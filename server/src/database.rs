//! # Redis
//!
//! Document store for lottery records.
//!
//! One Redis hash (`lotteries`) holds every record: field = lottery id,
//! value = the JSON document. The dataset is small (tens of lotteries, each
//! with a bounded participant list), so full-hash reads for listing are
//! cheap and ordering happens in process.

use std::{collections::HashMap, time::Duration};

use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use uuid::Uuid;

use crate::{error::AppError, lottery::Lottery};

const LOTTERIES_KEY: &str = "lotteries";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub async fn fetch_all(conn: &mut ConnectionManager) -> Result<Vec<Lottery>, AppError> {
    let raw: HashMap<String, String> = conn.hgetall(LOTTERIES_KEY).await?;

    raw.into_values()
        .map(|doc| serde_json::from_str(&doc).map_err(AppError::from))
        .collect()
}

pub async fn fetch(conn: &mut ConnectionManager, id: Uuid) -> Result<Lottery, AppError> {
    let doc: Option<String> = conn.hget(LOTTERIES_KEY, id.to_string()).await?;

    let doc = doc.ok_or(AppError::NotFound)?;
    Ok(serde_json::from_str(&doc)?)
}

pub async fn save(conn: &mut ConnectionManager, lottery: &Lottery) -> Result<(), AppError> {
    let doc = serde_json::to_string(lottery)?;
    let _: () = conn
        .hset(LOTTERIES_KEY, lottery.id.to_string(), doc)
        .await?;

    Ok(())
}

pub async fn remove(conn: &mut ConnectionManager, id: Uuid) -> Result<(), AppError> {
    let removed: usize = conn.hdel(LOTTERIES_KEY, id.to_string()).await?;

    if removed == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
