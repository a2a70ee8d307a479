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

//! Strongly-typed identifiers assigned by storage.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GameError;

/// Identifier of a stored character.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct CharacterId(pub i32);

/// Identifier of a stored guild.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct GuildId(pub i32);

/// Identifier of a stored piece of equipment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct EquipmentId(pub i32);

macro_rules! impl_integer_id {
    ($t:ident, $name:literal) => {
        impl $t {
            pub fn value(&self) -> i32 {
                self.0
            }

            /// Storage only hands out positive ids.
            pub fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $t {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = GameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|e| GameError::invalid_input(format!("{} '{}': {}", $name, s.trim(), e)))
            }
        }
    };
}

impl_integer_id!(CharacterId, "CharacterId");
impl_integer_id!(GuildId, "GuildId");
impl_integer_id!(EquipmentId, "EquipmentId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!("42".parse::<CharacterId>(), Ok(CharacterId(42)));
        assert_eq!(" 7 ".parse::<GuildId>(), Ok(GuildId(7)));
        assert!("seven".parse::<GuildId>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_validity() {
        assert!(CharacterId(1).is_valid());
        assert!(!CharacterId(0).is_valid());
        assert!(!GuildId(-3).is_valid());
    }
}
