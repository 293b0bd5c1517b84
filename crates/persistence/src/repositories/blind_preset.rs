//! Blind preset repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BlindPresetEntity;
use crate::metrics::QueryTimer;

/// Repository for blind preset database operations.
#[derive(Clone)]
pub struct BlindPresetRepository {
    pool: PgPool,
}

impl BlindPresetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_preset(
        &self,
        user_id: Uuid,
        name: &str,
        levels: &serde_json::Value,
    ) -> Result<BlindPresetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_blind_preset");
        let result = sqlx::query_as::<_, BlindPresetEntity>(
            r#"
            INSERT INTO blind_presets (user_id, name, levels)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, levels, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(levels)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BlindPresetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_blind_preset_by_id");
        let result = sqlx::query_as::<_, BlindPresetEntity>(
            r#"
            SELECT id, user_id, name, levels, created_at
            FROM blind_presets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BlindPresetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_blind_presets");
        let result = sqlx::query_as::<_, BlindPresetEntity>(
            r#"
            SELECT id, user_id, name, levels, created_at
            FROM blind_presets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete_preset(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_blind_preset");
        let result = sqlx::query("DELETE FROM blind_presets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
