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

//! Business rules for characters and guilds
//!
//! Services validate input, enforce cross-entity rules and then delegate to
//! the repositories. They never touch SQL directly.

pub mod character;
pub mod guild;

pub use character::{CharacterService, CharacterStatistics, ExperienceGain};
pub use guild::{GuildService, GuildStatistics};

use guildhall_common::{CharacterId, GameError, GameResult, GuildId};

/// Reject ids that can never exist before asking storage
fn ensure_character_id(id: CharacterId) -> GameResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(GameError::not_found(format!("Invalid character ID: {}", id)))
    }
}

fn ensure_guild_id(id: GuildId) -> GameResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(GameError::not_found(format!("Invalid guild ID: {}", id)))
    }
}
