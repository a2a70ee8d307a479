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

//! Equipment owned by characters

use crate::error::{GameError, GameResult};
use crate::ids::{CharacterId, EquipmentId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of an equipment name
pub const EQUIPMENT_NAME_MAX_LENGTH: usize = 50;

/// Maximum length of an equipment type
pub const EQUIPMENT_TYPE_MAX_LENGTH: usize = 50;

/// Equipment rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }

    pub fn from_db_str(s: &str) -> GameResult<Self> {
        match s {
            "COMMON" => Ok(Rarity::Common),
            "RARE" => Ok(Rarity::Rare),
            "EPIC" => Ok(Rarity::Epic),
            "LEGENDARY" => Ok(Rarity::Legendary),
            _ => Err(GameError::database(format!("Invalid rarity: {}", s))),
        }
    }
}

impl FromStr for Rarity {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s.trim().to_uppercase().as_str())
            .map_err(|_| GameError::invalid_input(format!("Unknown rarity: {}", s.trim())))
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
        }
    }
}

/// A piece of equipment belonging to exactly one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Option<EquipmentId>,
    pub name: String,
    pub equipment_type: String,
    pub bonus_stats: i32,
    pub rarity: Rarity,
    pub character_id: CharacterId,
}

impl Equipment {
    pub fn new(
        character_id: CharacterId,
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        bonus_stats: i32,
        rarity: Rarity,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            equipment_type: equipment_type.into(),
            bonus_stats,
            rarity,
            character_id,
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        let length = self.name.trim().chars().count();
        if length == 0 || length > EQUIPMENT_NAME_MAX_LENGTH {
            return Err(GameError::invalid_input(format!(
                "Equipment name must be between 1 and {} characters",
                EQUIPMENT_NAME_MAX_LENGTH
            )));
        }
        let type_length = self.equipment_type.trim().chars().count();
        if type_length == 0 || type_length > EQUIPMENT_TYPE_MAX_LENGTH {
            return Err(GameError::invalid_input(format!(
                "Equipment type must be between 1 and {} characters",
                EQUIPMENT_TYPE_MAX_LENGTH
            )));
        }
        if self.bonus_stats < 0 {
            return Err(GameError::invalid_input("Bonus stats cannot be negative"));
        }
        Ok(())
    }
}

impl std::fmt::Display for Equipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {}, +{})",
            self.name, self.rarity, self.equipment_type, self.bonus_stats
        )
    }
}
