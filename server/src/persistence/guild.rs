//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! PostgreSQL guild storage and membership transactions

use super::{GuildRepository, rollback};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildhall_common::{CharacterId, GameError, GameResult, Guild, GuildId};
use sqlx::{PgConnection, PgPool};

#[derive(Debug, sqlx::FromRow)]
struct GuildRow {
    id: GuildId,
    guild_name: String,
    level: i32,
    member_count: i32,
    created_date: DateTime<Utc>,
}

impl From<GuildRow> for Guild {
    fn from(row: GuildRow) -> Self {
        Guild::restore(
            row.id,
            row.guild_name,
            row.level,
            row.member_count,
            row.created_date,
        )
    }
}

/// Guild repository over a PostgreSQL pool
#[derive(Clone)]
pub struct PgGuildRepository {
    pool: PgPool,
}

impl PgGuildRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn join(
        conn: &mut PgConnection,
        guild_id: GuildId,
        character_id: CharacterId,
    ) -> GameResult<()> {
        let guild = sqlx::query("UPDATE guilds SET member_count = member_count + 1 WHERE id = $1")
            .bind(guild_id)
            .execute(&mut *conn)
            .await?;
        if guild.rows_affected() == 0 {
            return Err(GameError::not_found(format!(
                "Guild with ID {} not found",
                guild_id
            )));
        }

        let character = sqlx::query(
            "UPDATE characters SET guild_id = $1 WHERE id = $2 AND guild_id IS NULL",
        )
        .bind(guild_id)
        .bind(character_id)
        .execute(&mut *conn)
        .await?;
        if character.rows_affected() == 0 {
            return Err(GameError::business_rule(format!(
                "Character {} does not exist or already belongs to a guild",
                character_id
            )));
        }
        Ok(())
    }

    async fn leave(conn: &mut PgConnection, character_id: CharacterId) -> GameResult<Option<GuildId>> {
        let membership: Option<(Option<GuildId>,)> =
            sqlx::query_as("SELECT guild_id FROM characters WHERE id = $1 FOR UPDATE")
                .bind(character_id)
                .fetch_optional(&mut *conn)
                .await?;

        let guild_id = match membership {
            None => {
                return Err(GameError::not_found(format!(
                    "Character with ID {} not found",
                    character_id
                )));
            }
            Some((None,)) => return Ok(None),
            Some((Some(guild_id),)) => guild_id,
        };

        sqlx::query("UPDATE characters SET guild_id = NULL WHERE id = $1")
            .bind(character_id)
            .execute(&mut *conn)
            .await?;

        let guild = sqlx::query(
            "UPDATE guilds SET member_count = member_count - 1 WHERE id = $1 AND member_count > 0",
        )
        .bind(guild_id)
        .execute(&mut *conn)
        .await?;
        if guild.rows_affected() == 0 {
            return Err(GameError::database(format!(
                "Guild {} member count is out of sync with character {}",
                guild_id, character_id
            )));
        }
        Ok(Some(guild_id))
    }
}

#[async_trait]
impl GuildRepository for PgGuildRepository {
    async fn create(&self, guild: &Guild) -> GameResult<GuildId> {
        let (id,): (GuildId,) = sqlx::query_as(
            r#"
            INSERT INTO guilds (guild_name, level, member_count, created_date)
            VALUES ($1, $2, 0, $3)
            RETURNING id
            "#,
        )
        .bind(&guild.guild_name)
        .bind(guild.level)
        .bind(guild.created_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_all(&self) -> GameResult<Vec<Guild>> {
        let rows = sqlx::query_as::<_, GuildRow>(
            "SELECT id, guild_name, level, member_count, created_date FROM guilds ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Guild::from).collect())
    }

    async fn get_by_id(&self, id: GuildId) -> GameResult<Option<Guild>> {
        let row = sqlx::query_as::<_, GuildRow>(
            "SELECT id, guild_name, level, member_count, created_date FROM guilds WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Guild::from))
    }

    async fn find_by_name(&self, name: &str) -> GameResult<Option<Guild>> {
        let row = sqlx::query_as::<_, GuildRow>(
            r#"
            SELECT id, guild_name, level, member_count, created_date
            FROM guilds
            WHERE LOWER(guild_name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Guild::from))
    }

    async fn update(&self, id: GuildId, guild: &Guild) -> GameResult<bool> {
        let result = sqlx::query("UPDATE guilds SET guild_name = $1, level = $2 WHERE id = $3")
            .bind(&guild.guild_name)
            .bind(guild.level)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: GuildId) -> GameResult<bool> {
        let result = sqlx::query("DELETE FROM guilds WHERE id = $1 AND member_count = 0")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, guild_id: GuildId, character_id: CharacterId) -> GameResult<()> {
        let mut tx = self.pool.begin().await?;
        match Self::join(&mut tx, guild_id, character_id).await {
            Ok(()) => {
                tx.commit().await?;
                tracing::debug!("Character {} joined guild {}", character_id, guild_id);
                Ok(())
            }
            Err(e) => {
                rollback(tx, "guild join").await;
                Err(e)
            }
        }
    }

    async fn remove_member(&self, character_id: CharacterId) -> GameResult<Option<GuildId>> {
        let mut tx = self.pool.begin().await?;
        match Self::leave(&mut tx, character_id).await {
            Ok(left) => {
                tx.commit().await?;
                if let Some(guild_id) = left {
                    tracing::debug!("Character {} left guild {}", character_id, guild_id);
                }
                Ok(left)
            }
            Err(e) => {
                rollback(tx, "guild leave").await;
                Err(e)
            }
        }
    }
}
