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

//! Guilds and member bookkeeping

use crate::error::{GameError, GameResult};
use crate::ids::GuildId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of a guild name
pub const GUILD_NAME_MIN_LENGTH: usize = 3;

/// Maximum length of a guild name
pub const GUILD_NAME_MAX_LENGTH: usize = 100;

/// A guild characters can join
///
/// The member count is derived state: it changes only through
/// [`Guild::add_member`] and [`Guild::remove_member`] and is never taken
/// from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Assigned by storage on create
    pub id: Option<GuildId>,
    pub guild_name: String,
    pub level: i32,
    member_count: i32,
    pub created_date: DateTime<Utc>,
}

impl Guild {
    /// Create an unsaved level 1 guild
    pub fn new(guild_name: impl Into<String>) -> Self {
        Self::with_level(guild_name, 1)
    }

    pub fn with_level(guild_name: impl Into<String>, level: i32) -> Self {
        Self {
            id: None,
            guild_name: guild_name.into(),
            level,
            member_count: 0,
            created_date: Utc::now().trunc_subsecs(6),
        }
    }

    /// Rebuild a guild from its stored row
    pub fn restore(
        id: GuildId,
        guild_name: String,
        level: i32,
        member_count: i32,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            guild_name,
            level,
            member_count,
            created_date,
        }
    }

    pub fn member_count(&self) -> i32 {
        self.member_count
    }

    pub fn has_members(&self) -> bool {
        self.member_count > 0
    }

    pub fn add_member(&mut self) {
        self.member_count += 1;
    }

    pub fn remove_member(&mut self) -> GameResult<()> {
        if self.member_count == 0 {
            return Err(GameError::invalid_state(format!(
                "Guild '{}' has no members to remove",
                self.guild_name
            )));
        }
        self.member_count -= 1;
        Ok(())
    }

    /// Guilds have no level ceiling
    pub fn level_up(&mut self) {
        self.level += 1;
    }

    /// Check every field-level constraint
    pub fn validate(&self) -> GameResult<()> {
        if self.guild_name.trim().is_empty() {
            return Err(GameError::invalid_input("Guild name cannot be empty"));
        }
        let length = self.guild_name.chars().count();
        if !(GUILD_NAME_MIN_LENGTH..=GUILD_NAME_MAX_LENGTH).contains(&length) {
            return Err(GameError::invalid_input(format!(
                "Guild name must be between {} and {} characters",
                GUILD_NAME_MIN_LENGTH, GUILD_NAME_MAX_LENGTH
            )));
        }
        if self.level < 1 {
            return Err(GameError::invalid_input("Guild level must be at least 1"));
        }
        if self.member_count < 0 {
            return Err(GameError::invalid_input("Member count cannot be negative"));
        }
        Ok(())
    }
}

impl std::fmt::Display for Guild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "[{}] {} (Level {}) - {} member(s), founded {}",
            id,
            self.guild_name,
            self.level,
            self.member_count,
            self.created_date.format("%Y-%m-%d")
        )
    }
}
