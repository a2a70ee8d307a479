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

//! Guildhall Common Types
//!
//! This crate defines the domain model shared by every Guildhall component:
//! - Characters and their class variants (Warrior, Mage, Rogue)
//! - Guilds and their member bookkeeping
//! - Equipment owned by characters
//! - The combat and progression capabilities characters expose
//! - The error taxonomy used by every layer
//!
//! Nothing in here performs I/O. The optional `sqlx` feature adds the
//! database type mappings used by the server's persistence layer.

pub mod character;
pub mod combat;
pub mod equipment;
pub mod error;
pub mod guild;
pub mod ids;
pub mod progression;

pub use character::{
    ATTRIBUTE_TEXT_MAX_LENGTH, Capability, Character, CharacterClass, CharacterType,
    HEALTH_POINTS_MAX, MageStats, RogueStats, STAT_MAX, WarriorStats,
};
pub use combat::{Combatant, DuelOutcome, DuelReport, DuelRound, simulate_duel};
pub use equipment::{EQUIPMENT_TYPE_MAX_LENGTH, Equipment, Rarity};
pub use error::{GameError, GameResult};
pub use guild::Guild;
pub use ids::{CharacterId, EquipmentId, GuildId};
pub use progression::{MAX_LEVEL, MIN_LEVEL, Progressable};
