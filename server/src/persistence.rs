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

//! Persistence layer for characters, guilds and equipment
//!
//! This layer handles:
//! - Translating entities to and from their relational rows
//! - Keeping multi-table mutations atomic (one transaction each)
//! - Guild membership changes, which touch both a character and a guild row
//!
//! Each entity family has a repository trait with a PostgreSQL
//! implementation and an in-memory implementation sharing the same contract.

pub mod character;
pub mod equipment;
pub mod guild;
pub mod memory;

pub use character::PgCharacterRepository;
pub use equipment::PgEquipmentRepository;
pub use guild::PgGuildRepository;
pub use memory::MemoryStore;

use crate::config::DatabaseConfig;
use async_trait::async_trait;
use guildhall_common::{
    Character, CharacterId, CharacterType, Equipment, EquipmentId, GameResult, Guild, GuildId,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use std::str::FromStr;
use std::sync::Arc;

/// Storage for characters and their class attribute rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Insert the base row and the class attribute row, returning the new id
    async fn create(&self, character: &Character) -> GameResult<CharacterId>;

    async fn get_all(&self) -> GameResult<Vec<Character>>;

    async fn get_by_id(&self, id: CharacterId) -> GameResult<Option<Character>>;

    async fn get_by_type(&self, character_type: CharacterType) -> GameResult<Vec<Character>>;

    async fn get_by_guild(&self, guild_id: GuildId) -> GameResult<Vec<Character>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> GameResult<Option<Character>>;

    /// Overwrite the mutable fields. Guild membership and creation date are
    /// left untouched. Returns false when no character of that id and type
    /// exists.
    async fn update(&self, id: CharacterId, character: &Character) -> GameResult<bool>;

    /// Remove the character with its attribute row and equipment, releasing
    /// its guild membership in the same unit. Returns false when absent.
    async fn delete(&self, id: CharacterId) -> GameResult<bool>;
}

/// Storage for guilds and guild membership
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Insert a guild with no members, returning the new id
    async fn create(&self, guild: &Guild) -> GameResult<GuildId>;

    async fn get_all(&self) -> GameResult<Vec<Guild>>;

    async fn get_by_id(&self, id: GuildId) -> GameResult<Option<Guild>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> GameResult<Option<Guild>>;

    /// Overwrite name and level. The member count is never written here.
    async fn update(&self, id: GuildId, guild: &Guild) -> GameResult<bool>;

    /// Remove an empty guild. Returns false when absent or occupied.
    async fn delete(&self, id: GuildId) -> GameResult<bool>;

    /// Point an unaffiliated character at the guild and increment its member
    /// count, both or neither.
    async fn add_member(&self, guild_id: GuildId, character_id: CharacterId) -> GameResult<()>;

    /// Clear the character's guild and decrement that guild's member count,
    /// both or neither. Returns the former guild, or `None` when the
    /// character was unaffiliated.
    async fn remove_member(&self, character_id: CharacterId) -> GameResult<Option<GuildId>>;
}

/// Storage for equipment rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn create(&self, equipment: &Equipment) -> GameResult<EquipmentId>;

    async fn get_by_character(&self, character_id: CharacterId) -> GameResult<Vec<Equipment>>;
}

/// The set of repositories a Guildhall instance runs on
#[derive(Clone)]
pub struct Repositories {
    pub characters: Arc<dyn CharacterRepository>,
    pub guilds: Arc<dyn GuildRepository>,
    pub equipment: Arc<dyn EquipmentRepository>,
}

impl Repositories {
    /// Repositories backed by a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            characters: Arc::new(PgCharacterRepository::new(pool.clone())),
            guilds: Arc::new(PgGuildRepository::new(pool.clone())),
            equipment: Arc::new(PgEquipmentRepository::new(pool)),
        }
    }

    /// Repositories sharing one in-memory store
    pub fn memory() -> Self {
        Self::from_store(MemoryStore::new())
    }

    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            characters: Arc::new(store.clone()),
            guilds: Arc::new(store.clone()),
            equipment: Arc::new(store),
        }
    }
}

/// Open the connection pool described by the configuration
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(&config.url)?;
    if !config.username.is_empty() {
        options = options.username(&config.username);
    }
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Apply the bundled schema migrations
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Roll back a failed transaction. Rollback failures are logged and never
/// replace the error that caused the rollback.
pub(crate) async fn rollback(tx: Transaction<'_, Postgres>, operation: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("Failed to roll back {}: {}", operation, e);
    }
}
