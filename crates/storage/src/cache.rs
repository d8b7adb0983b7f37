//! Persistent keyword embeddings, keyed by model identity and keyword.

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelStats {
    pub model: String,
    pub entries: i64,
    pub dim: i64,
}

/// Returns cached vectors for `keywords` under `model`. Missing keywords are
/// simply absent from the map; undecodable rows are treated as misses.
pub async fn load_vectors(
    pool: &SqlitePool,
    model: &str,
    keywords: &[String],
) -> anyhow::Result<HashMap<String, Vec<f32>>> {
    let wanted: HashSet<&str> = keywords.iter().map(String::as_str).collect();
    let rows = sqlx::query("SELECT keyword, dim, vector FROM embedding_cache WHERE model = ?1")
        .bind(model)
        .fetch_all(pool)
        .await?;

    let mut found = HashMap::new();
    for row in rows {
        let keyword: String = row.try_get("keyword")?;
        if !wanted.contains(keyword.as_str()) {
            continue;
        }
        let dim: i64 = row.try_get("dim")?;
        let raw: String = row.try_get("vector")?;
        match serde_json::from_str::<Vec<f32>>(&raw) {
            Ok(vector) if vector.len() as i64 == dim => {
                found.insert(keyword, vector);
            }
            Ok(vector) => warn!(
                "cached vector for {:?} has {} dims, expected {}; ignoring",
                keyword,
                vector.len(),
                dim
            ),
            Err(e) => warn!("cached vector for {:?} is unreadable: {}", keyword, e),
        }
    }
    Ok(found)
}

/// Upserts vectors for `model` in a single transaction.
pub async fn store_vectors(
    pool: &SqlitePool,
    model: &str,
    entries: &[(String, Vec<f32>)],
) -> anyhow::Result<usize> {
    let mut tx = pool.begin().await?;
    for (keyword, vector) in entries {
        sqlx::query(
            "INSERT INTO embedding_cache (model, keyword, dim, vector, created_at)
             VALUES (?1, ?2, ?3, ?4, strftime('%s','now'))
             ON CONFLICT(model, keyword) DO UPDATE SET
               dim=excluded.dim,
               vector=excluded.vector,
               created_at=excluded.created_at",
        )
        .bind(model)
        .bind(keyword)
        .bind(vector.len() as i64)
        .bind(serde_json::to_string(vector)?)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(entries.len())
}

/// Deletes cached vectors for one model, or for every model when `None`.
pub async fn clear(pool: &SqlitePool, model: Option<&str>) -> anyhow::Result<u64> {
    let result = match model {
        Some(m) => {
            sqlx::query("DELETE FROM embedding_cache WHERE model = ?1")
                .bind(m)
                .execute(pool)
                .await?
        }
        None => {
            sqlx::query("DELETE FROM embedding_cache")
                .execute(pool)
                .await?
        }
    };
    Ok(result.rows_affected())
}

pub async fn stats(pool: &SqlitePool) -> anyhow::Result<Vec<ModelStats>> {
    let rows = sqlx::query(
        "SELECT model, COUNT(*) AS entries, MAX(dim) AS dim
         FROM embedding_cache GROUP BY model ORDER BY model",
    )
    .fetch_all(pool)
    .await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(ModelStats {
            model: row.try_get("model")?,
            entries: row.try_get("entries")?,
            dim: row.try_get("dim")?,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect, migrate};

    async fn temp_pool() -> (tempfile::TempDir, SqlitePool) {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("cache.db");
        let pool = connect(&db_path.to_string_lossy()).await.unwrap();
        migrate(&pool).await.unwrap();
        (temp, pool)
    }

    #[tokio::test]
    async fn stores_and_loads_vectors_per_model() {
        let (_temp, pool) = temp_pool().await;
        let entries = vec![
            ("milk".to_string(), vec![0.5, 0.25]),
            ("bread".to_string(), vec![1.0, 0.0]),
        ];
        store_vectors(&pool, "model-a", &entries).await.unwrap();

        let wanted = vec!["milk".to_string(), "cheese".to_string()];
        let found = load_vectors(&pool, "model-a", &wanted).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["milk"], vec![0.5, 0.25]);

        let other = load_vectors(&pool, "model-b", &wanted).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_vector() {
        let (_temp, pool) = temp_pool().await;
        store_vectors(&pool, "m", &[("tea".to_string(), vec![1.0])])
            .await
            .unwrap();
        store_vectors(&pool, "m", &[("tea".to_string(), vec![0.0, 1.0])])
            .await
            .unwrap();
        let found = load_vectors(&pool, "m", &["tea".to_string()]).await.unwrap();
        assert_eq!(found["tea"], vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn clear_and_stats() {
        let (_temp, pool) = temp_pool().await;
        store_vectors(&pool, "a", &[("x".to_string(), vec![1.0, 2.0])])
            .await
            .unwrap();
        store_vectors(&pool, "b", &[("y".to_string(), vec![1.0])])
            .await
            .unwrap();

        let s = stats(&pool).await.unwrap();
        assert_eq!(
            s,
            vec![
                ModelStats { model: "a".into(), entries: 1, dim: 2 },
                ModelStats { model: "b".into(), entries: 1, dim: 1 },
            ]
        );

        assert_eq!(clear(&pool, Some("a")).await.unwrap(), 1);
        assert_eq!(clear(&pool, None).await.unwrap(), 1);
        assert!(stats(&pool).await.unwrap().is_empty());
    }
}
