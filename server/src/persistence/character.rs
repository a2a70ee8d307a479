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

//! PostgreSQL character storage
//!
//! A character is one row in `characters` plus one row in the attribute
//! table for its class. Reads join all three attribute tables and pick the
//! columns that match the stored type.

use super::{CharacterRepository, rollback};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildhall_common::{
    Character, CharacterClass, CharacterId, CharacterType, GameError, GameResult, GuildId,
    MageStats, RogueStats, WarriorStats,
};
use sqlx::{PgConnection, PgPool};

const SELECT_CHARACTERS: &str = r#"
    SELECT c.id, c.name, c.character_type, c.level, c.experience, c.health_points,
           c.guild_id, c.created_date,
           w.strength, w.armor, w.weapon_type,
           m.mana, m.intelligence, m.spell_school,
           r.agility, r.stealth, r.critical_chance
    FROM characters c
    LEFT JOIN warrior_attributes w ON w.character_id = c.id
    LEFT JOIN mage_attributes m ON m.character_id = c.id
    LEFT JOIN rogue_attributes r ON r.character_id = c.id
"#;

#[derive(Debug, sqlx::FromRow)]
struct CharacterRow {
    id: CharacterId,
    name: String,
    character_type: CharacterType,
    level: i32,
    experience: i64,
    health_points: i32,
    guild_id: Option<GuildId>,
    created_date: DateTime<Utc>,
    strength: Option<i32>,
    armor: Option<i32>,
    weapon_type: Option<String>,
    mana: Option<i32>,
    intelligence: Option<i32>,
    spell_school: Option<String>,
    agility: Option<i32>,
    stealth: Option<i32>,
    critical_chance: Option<f64>,
}

impl TryFrom<CharacterRow> for Character {
    type Error = GameError;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        let missing = || {
            GameError::database(format!(
                "Character {} has no {} attribute row",
                row.id, row.character_type
            ))
        };

        let class = match row.character_type {
            CharacterType::Warrior => CharacterClass::Warrior(WarriorStats {
                strength: row.strength.ok_or_else(missing)?,
                armor: row.armor.ok_or_else(missing)?,
                weapon_type: row.weapon_type.ok_or_else(missing)?,
            }),
            CharacterType::Mage => CharacterClass::Mage(MageStats {
                mana: row.mana.ok_or_else(missing)?,
                intelligence: row.intelligence.ok_or_else(missing)?,
                spell_school: row.spell_school.ok_or_else(missing)?,
            }),
            CharacterType::Rogue => CharacterClass::Rogue(RogueStats {
                agility: row.agility.ok_or_else(missing)?,
                stealth: row.stealth.ok_or_else(missing)?,
                critical_chance: row.critical_chance.ok_or_else(missing)?,
            }),
        };

        Ok(Character {
            id: Some(row.id),
            name: row.name,
            level: row.level,
            experience: row.experience,
            health_points: row.health_points,
            guild_id: row.guild_id,
            created_date: row.created_date,
            class,
        })
    }
}

fn into_characters(rows: Vec<CharacterRow>) -> GameResult<Vec<Character>> {
    rows.into_iter().map(Character::try_from).collect()
}

/// Character repository over a PostgreSQL pool
#[derive(Clone)]
pub struct PgCharacterRepository {
    pool: PgPool,
}

impl PgCharacterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, filter: &str, bind: Option<i32>) -> GameResult<Vec<Character>> {
        let sql = format!("{} {} ORDER BY c.id", SELECT_CHARACTERS, filter);
        let mut query = sqlx::query_as::<_, CharacterRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        into_characters(query.fetch_all(&self.pool).await?)
    }

    async fn insert_rows(conn: &mut PgConnection, character: &Character) -> GameResult<CharacterId> {
        let (id,): (CharacterId,) = sqlx::query_as(
            r#"
            INSERT INTO characters
                (name, character_type, level, experience, health_points, guild_id, created_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&character.name)
        .bind(character.character_type())
        .bind(character.level)
        .bind(character.experience)
        .bind(character.health_points)
        .bind(character.guild_id)
        .bind(character.created_date)
        .fetch_one(&mut *conn)
        .await?;

        write_attributes(conn, id, &character.class).await?;
        Ok(id)
    }

    async fn update_rows(
        conn: &mut PgConnection,
        id: CharacterId,
        character: &Character,
    ) -> GameResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET name = $1, level = $2, experience = $3, health_points = $4
            WHERE id = $5 AND character_type = $6
            "#,
        )
        .bind(&character.name)
        .bind(character.level)
        .bind(character.experience)
        .bind(character.health_points)
        .bind(id)
        .bind(character.character_type())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        write_attributes(conn, id, &character.class).await?;
        Ok(true)
    }

    async fn delete_rows(conn: &mut PgConnection, id: CharacterId) -> GameResult<bool> {
        let membership: Option<(Option<GuildId>,)> =
            sqlx::query_as("SELECT guild_id FROM characters WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        let Some((guild_id,)) = membership else {
            return Ok(false);
        };

        if let Some(guild_id) = guild_id {
            let released = sqlx::query(
                "UPDATE guilds SET member_count = member_count - 1 WHERE id = $1 AND member_count > 0",
            )
            .bind(guild_id)
            .execute(&mut *conn)
            .await?;
            if released.rows_affected() == 0 {
                return Err(GameError::database(format!(
                    "Guild {} member count is out of sync with character {}",
                    guild_id, id
                )));
            }
        }

        for statement in [
            "DELETE FROM equipment WHERE character_id = $1",
            "DELETE FROM warrior_attributes WHERE character_id = $1",
            "DELETE FROM mage_attributes WHERE character_id = $1",
            "DELETE FROM rogue_attributes WHERE character_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut *conn).await?;
        }

        let deleted = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }
}

/// Insert or replace the attribute row for the character's class
async fn write_attributes(
    conn: &mut PgConnection,
    id: CharacterId,
    class: &CharacterClass,
) -> GameResult<()> {
    match class {
        CharacterClass::Warrior(w) => {
            sqlx::query(
                r#"
                INSERT INTO warrior_attributes (character_id, strength, armor, weapon_type)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (character_id) DO UPDATE
                SET strength = EXCLUDED.strength, armor = EXCLUDED.armor,
                    weapon_type = EXCLUDED.weapon_type
                "#,
            )
            .bind(id)
            .bind(w.strength)
            .bind(w.armor)
            .bind(&w.weapon_type)
            .execute(&mut *conn)
            .await?;
        }
        CharacterClass::Mage(m) => {
            sqlx::query(
                r#"
                INSERT INTO mage_attributes (character_id, mana, intelligence, spell_school)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (character_id) DO UPDATE
                SET mana = EXCLUDED.mana, intelligence = EXCLUDED.intelligence,
                    spell_school = EXCLUDED.spell_school
                "#,
            )
            .bind(id)
            .bind(m.mana)
            .bind(m.intelligence)
            .bind(&m.spell_school)
            .execute(&mut *conn)
            .await?;
        }
        CharacterClass::Rogue(r) => {
            sqlx::query(
                r#"
                INSERT INTO rogue_attributes (character_id, agility, stealth, critical_chance)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (character_id) DO UPDATE
                SET agility = EXCLUDED.agility, stealth = EXCLUDED.stealth,
                    critical_chance = EXCLUDED.critical_chance
                "#,
            )
            .bind(id)
            .bind(r.agility)
            .bind(r.stealth)
            .bind(r.critical_chance)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

#[async_trait]
impl CharacterRepository for PgCharacterRepository {
    async fn create(&self, character: &Character) -> GameResult<CharacterId> {
        let mut tx = self.pool.begin().await?;
        match Self::insert_rows(&mut tx, character).await {
            Ok(id) => {
                tx.commit().await?;
                tracing::debug!("Inserted character {} with ID {}", character.name, id);
                Ok(id)
            }
            Err(e) => {
                rollback(tx, "character insert").await;
                Err(e)
            }
        }
    }

    async fn get_all(&self) -> GameResult<Vec<Character>> {
        self.fetch("", None).await
    }

    async fn get_by_id(&self, id: CharacterId) -> GameResult<Option<Character>> {
        let mut characters = self.fetch("WHERE c.id = $1", Some(id.value())).await?;
        Ok(characters.pop())
    }

    async fn get_by_type(&self, character_type: CharacterType) -> GameResult<Vec<Character>> {
        let sql = format!(
            "{} WHERE c.character_type = $1 ORDER BY c.id",
            SELECT_CHARACTERS
        );
        let rows = sqlx::query_as::<_, CharacterRow>(&sql)
            .bind(character_type)
            .fetch_all(&self.pool)
            .await?;
        into_characters(rows)
    }

    async fn get_by_guild(&self, guild_id: GuildId) -> GameResult<Vec<Character>> {
        self.fetch("WHERE c.guild_id = $1", Some(guild_id.value()))
            .await
    }

    async fn find_by_name(&self, name: &str) -> GameResult<Option<Character>> {
        let sql = format!("{} WHERE LOWER(c.name) = LOWER($1)", SELECT_CHARACTERS);
        let row = sqlx::query_as::<_, CharacterRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Character::try_from).transpose()
    }

    async fn update(&self, id: CharacterId, character: &Character) -> GameResult<bool> {
        let mut tx = self.pool.begin().await?;
        match Self::update_rows(&mut tx, id, character).await {
            Ok(true) => {
                tx.commit().await?;
                tracing::debug!("Updated character {} and its attributes", id);
                Ok(true)
            }
            Ok(false) => {
                rollback(tx, "character update").await;
                Ok(false)
            }
            Err(e) => {
                rollback(tx, "character update").await;
                Err(e)
            }
        }
    }

    async fn delete(&self, id: CharacterId) -> GameResult<bool> {
        let mut tx = self.pool.begin().await?;
        match Self::delete_rows(&mut tx, id).await {
            Ok(deleted) => {
                tx.commit().await?;
                if deleted {
                    tracing::debug!("Deleted character {} with its attributes and equipment", id);
                }
                Ok(deleted)
            }
            Err(e) => {
                rollback(tx, "character delete").await;
                Err(e)
            }
        }
    }
}
