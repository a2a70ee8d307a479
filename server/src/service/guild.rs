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

//! Guild rules: naming, deletion guard and membership

use super::{ensure_character_id, ensure_guild_id};
use crate::persistence::{CharacterRepository, GuildRepository};
use guildhall_common::{Character, CharacterId, GameError, GameResult, Guild, GuildId};
use std::sync::Arc;

/// Aggregate figures over every stored guild
#[derive(Debug, Clone, PartialEq)]
pub struct GuildStatistics {
    pub total: usize,
    pub total_members: i64,
    pub average_members: f64,
    pub empty_guilds: usize,
    /// Name and level of the highest level guild
    pub highest_level: Option<(String, i32)>,
}

impl GuildStatistics {
    fn from_guilds(guilds: &[Guild]) -> Self {
        let total_members: i64 = guilds.iter().map(|g| i64::from(g.member_count())).sum();
        let average_members = if guilds.is_empty() {
            0.0
        } else {
            total_members as f64 / guilds.len() as f64
        };

        Self {
            total: guilds.len(),
            total_members,
            average_members,
            empty_guilds: guilds.iter().filter(|g| !g.has_members()).count(),
            highest_level: guilds
                .iter()
                .max_by_key(|g| g.level)
                .map(|g| (g.guild_name.clone(), g.level)),
        }
    }
}

/// Guild business rules over the guild and character repositories
#[derive(Clone)]
pub struct GuildService {
    guilds: Arc<dyn GuildRepository>,
    characters: Arc<dyn CharacterRepository>,
}

impl GuildService {
    pub fn new(guilds: Arc<dyn GuildRepository>, characters: Arc<dyn CharacterRepository>) -> Self {
        Self { guilds, characters }
    }

    #[tracing::instrument(skip(self, guild), fields(name = %guild.guild_name))]
    pub async fn create_guild(&self, guild: Guild) -> GameResult<GuildId> {
        guild.validate()?;
        if guild.has_members() {
            return Err(GameError::invalid_input("New guilds start without members"));
        }
        if self.guilds.find_by_name(&guild.guild_name).await?.is_some() {
            return Err(GameError::duplicate(format!(
                "Guild with name '{}' already exists",
                guild.guild_name
            )));
        }

        let id = self.guilds.create(&guild).await?;
        tracing::info!("Founded guild '{}' with ID {}", guild.guild_name, id);
        Ok(id)
    }

    pub async fn get_all_guilds(&self) -> GameResult<Vec<Guild>> {
        self.guilds.get_all().await
    }

    pub async fn get_guild_by_id(&self, id: GuildId) -> GameResult<Guild> {
        ensure_guild_id(id)?;
        self.guilds
            .get_by_id(id)
            .await?
            .ok_or_else(|| GameError::not_found(format!("Guild with ID {} not found", id)))
    }

    /// Rename or relevel a guild. The member count is not writable here.
    #[tracing::instrument(skip(self, guild), fields(guild_id = id.value()))]
    pub async fn update_guild(&self, id: GuildId, guild: Guild) -> GameResult<Guild> {
        guild.validate()?;
        let existing = self.get_guild_by_id(id).await?;
        if let Some(other) = self.guilds.find_by_name(&guild.guild_name).await?
            && other.id != Some(id)
        {
            return Err(GameError::duplicate(format!(
                "Guild with name '{}' already exists",
                guild.guild_name
            )));
        }

        if !self.guilds.update(id, &guild).await? {
            return Err(GameError::not_found(format!("Guild with ID {} not found", id)));
        }
        Ok(Guild::restore(
            id,
            guild.guild_name,
            guild.level,
            existing.member_count(),
            existing.created_date,
        ))
    }

    /// Delete a guild. Occupied guilds are refused, never cascaded.
    #[tracing::instrument(skip(self))]
    pub async fn delete_guild(&self, id: GuildId) -> GameResult<()> {
        let guild = self.get_guild_by_id(id).await?;
        if guild.has_members() {
            tracing::warn!(
                "Refused to delete guild '{}' with {} member(s)",
                guild.guild_name,
                guild.member_count()
            );
            return Err(GameError::business_rule(format!(
                "Cannot delete guild '{}' while it has {} member(s)",
                guild.guild_name,
                guild.member_count()
            )));
        }
        if !self.guilds.delete(id).await? {
            // Someone joined between the check and the delete
            return Err(GameError::business_rule(format!(
                "Cannot delete guild '{}' while it has members",
                guild.guild_name
            )));
        }
        tracing::info!("Disbanded guild '{}'", guild.guild_name);
        Ok(())
    }

    /// Enrol an unaffiliated character, returning the guild as updated
    #[tracing::instrument(skip(self))]
    pub async fn add_character_to_guild(
        &self,
        character_id: CharacterId,
        guild_id: GuildId,
    ) -> GameResult<Guild> {
        let character = self.load_character(character_id).await?;
        let guild = self.get_guild_by_id(guild_id).await?;

        match character.guild_id {
            Some(current) if current == guild_id => {
                tracing::warn!("Refused to enrol {} in guild {} twice", character.name, guild_id);
                return Err(GameError::business_rule(format!(
                    "{} is already a member of '{}'",
                    character.name, guild.guild_name
                )));
            }
            Some(current) => {
                tracing::warn!(
                    "Refused to enrol {} in guild {}, already a member of guild {}",
                    character.name,
                    guild_id,
                    current
                );
                return Err(GameError::business_rule(format!(
                    "{} must leave guild {} before joining '{}'",
                    character.name, current, guild.guild_name
                )));
            }
            None => {}
        }

        self.guilds.add_member(guild_id, character_id).await?;
        tracing::info!("{} joined '{}'", character.name, guild.guild_name);
        self.get_guild_by_id(guild_id).await
    }

    /// Release a character from its guild.
    ///
    /// Returns the former guild as updated, or `None` when the character was
    /// not in any guild.
    #[tracing::instrument(skip(self))]
    pub async fn remove_character_from_guild(
        &self,
        character_id: CharacterId,
    ) -> GameResult<Option<Guild>> {
        let character = self.load_character(character_id).await?;
        if character.guild_id.is_none() {
            tracing::info!("{} is not in any guild", character.name);
            return Ok(None);
        }

        match self.guilds.remove_member(character_id).await? {
            Some(guild_id) => {
                let guild = self.get_guild_by_id(guild_id).await?;
                tracing::info!("{} left '{}'", character.name, guild.guild_name);
                Ok(Some(guild))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn level_up_guild(&self, id: GuildId) -> GameResult<Guild> {
        let mut guild = self.get_guild_by_id(id).await?;
        guild.level_up();
        if !self.guilds.update(id, &guild).await? {
            return Err(GameError::not_found(format!("Guild with ID {} not found", id)));
        }
        tracing::info!("Guild '{}' reached level {}", guild.guild_name, guild.level);
        Ok(guild)
    }

    pub async fn guild_members(&self, id: GuildId) -> GameResult<Vec<Character>> {
        self.get_guild_by_id(id).await?;
        self.characters.get_by_guild(id).await
    }

    pub async fn statistics(&self) -> GameResult<GuildStatistics> {
        let guilds = self.guilds.get_all().await?;
        Ok(GuildStatistics::from_guilds(&guilds))
    }

    async fn load_character(&self, id: CharacterId) -> GameResult<Character> {
        ensure_character_id(id)?;
        self.characters
            .get_by_id(id)
            .await?
            .ok_or_else(|| GameError::not_found(format!("Character with ID {} not found", id)))
    }
}
