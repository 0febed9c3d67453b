use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// Listing a request shows the submitter's display name. A missing profile
/// must not fail the whole list, so resolution degrades to this placeholder.
pub const UNKNOWN_USER: &str = "Unknown User";

/// user id -> display name
static NAME_CACHE: Lazy<Cache<u64, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

pub async fn put(user_id: u64, name: String) {
    NAME_CACHE.insert(user_id, name).await;
}

/// Resolve a display name: cache, then DB, then placeholder. Never fails.
pub async fn resolve(pool: &MySqlPool, user_id: u64) -> String {
    if let Some(name) = NAME_CACHE.get(&user_id).await {
        return name;
    }

    match sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(name)) => {
            NAME_CACHE.insert(user_id, name.clone()).await;
            name
        }
        Ok(None) => UNKNOWN_USER.to_string(),
        Err(e) => {
            log::warn!("Display name lookup failed for user {}: {}", user_id, e);
            UNKNOWN_USER.to_string()
        }
    }
}

/// Batch insert resolved names
async fn batch_put(entries: &[(u64, String)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(id, name)| NAME_CACHE.insert(*id, name.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load RECENTLY active users' display names into the cache (batched)
pub async fn warmup_name_cache(pool: &MySqlPool, days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, String)>(
        r#"
        SELECT id, name
        FROM users
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (id, name) = row?;
        batch.push((id, name));
        total_count += 1;

        if batch.len() >= batch_size {
            batch_put(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining entries
    if !batch.is_empty() {
        batch_put(&batch).await;
    }

    log::info!(
        "Name cache warmup complete: {} recent users (last {} days)",
        total_count,
        days
    );

    Ok(())
}
