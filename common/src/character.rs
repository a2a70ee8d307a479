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

//! Characters and their class variants
//!
//! A character is one shared set of base attributes plus exactly one class
//! variant. The class is fixed at creation and determines power, stat growth,
//! combat ratings and display formatting.

use crate::combat::Combatant;
use crate::error::{GameError, GameResult};
use crate::ids::{CharacterId, GuildId};
use crate::progression::{MAX_LEVEL, MIN_LEVEL, Progressable, is_valid_level};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum length of a character name
pub const NAME_MIN_LENGTH: usize = 3;

/// Maximum length of a character name
pub const NAME_MAX_LENGTH: usize = 50;

/// Maximum length of a weapon type or spell school
pub const ATTRIBUTE_TEXT_MAX_LENGTH: usize = 50;

/// Upper bound for every class stat
pub const STAT_MAX: i32 = 1_000_000;

/// Upper bound for health points
pub const HEALTH_POINTS_MAX: i32 = 10_000_000;

/// Add `by` to `value` without passing `cap`. A value already above the cap is left alone.
fn grow(value: i32, by: i32, cap: i32) -> i32 {
    value.max(value.saturating_add(by).min(cap))
}

fn check_stats(label: &str, stats: &[i32]) -> GameResult<()> {
    if stats.iter().any(|s| *s < 0) {
        return Err(GameError::invalid_input(format!("{} cannot be negative", label)));
    }
    if stats.iter().any(|s| *s > STAT_MAX) {
        return Err(GameError::invalid_input(format!(
            "{} cannot exceed {}",
            label, STAT_MAX
        )));
    }
    Ok(())
}

fn check_text(label: &str, value: &str) -> GameResult<()> {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(GameError::invalid_input(format!("{} cannot be empty", label)));
    }
    if length > ATTRIBUTE_TEXT_MAX_LENGTH {
        return Err(GameError::invalid_input(format!(
            "{} cannot be longer than {} characters",
            label, ATTRIBUTE_TEXT_MAX_LENGTH
        )));
    }
    Ok(())
}

/// Character class discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "character_type", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterType {
    Warrior,
    Mage,
    Rogue,
}

/// Capabilities a character type exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Combat,
    Progression,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Combat => "Combat",
            Capability::Progression => "Progression",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::Combat => "attack, defend, calculate damage",
            Capability::Progression => "gain experience, check and apply level-ups",
        }
    }
}

impl CharacterType {
    /// All character types, in menu order
    pub fn all() -> [CharacterType; 3] {
        [CharacterType::Warrior, CharacterType::Mage, CharacterType::Rogue]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterType::Warrior => "WARRIOR",
            CharacterType::Mage => "MAGE",
            CharacterType::Rogue => "ROGUE",
        }
    }

    /// Capabilities every character of this type provides
    pub fn capabilities(&self) -> &'static [Capability] {
        const SHARED: &[Capability] = &[Capability::Combat, Capability::Progression];
        match self {
            CharacterType::Warrior | CharacterType::Mage | CharacterType::Rogue => SHARED,
        }
    }

    /// Human readable power formula
    pub fn power_formula(&self) -> &'static str {
        match self {
            CharacterType::Warrior => "strength * 2 + armor",
            CharacterType::Mage => "intelligence * 3 + mana / 2",
            CharacterType::Rogue => "agility * 2 + stealth + critical chance %",
        }
    }

    /// Hit points a fresh level 0 character of this type starts from
    pub fn base_health(&self) -> i32 {
        match self {
            CharacterType::Warrior => 150,
            CharacterType::Mage => 80,
            CharacterType::Rogue => 100,
        }
    }

    /// Multi-line description of the type and its capabilities
    pub fn describe(&self) -> String {
        let mut output = format!("{}\n  Power: {}\n  Capabilities:\n", self, self.power_formula());
        for capability in self.capabilities() {
            output.push_str(&format!("    {} - {}\n", capability.name(), capability.description()));
        }
        output
    }
}

impl std::fmt::Display for CharacterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharacterType::Warrior => write!(f, "Warrior"),
            CharacterType::Mage => write!(f, "Mage"),
            CharacterType::Rogue => write!(f, "Rogue"),
        }
    }
}

impl FromStr for CharacterType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WARRIOR" | "1" => Ok(CharacterType::Warrior),
            "MAGE" | "2" => Ok(CharacterType::Mage),
            "ROGUE" | "3" => Ok(CharacterType::Rogue),
            other => Err(GameError::invalid_input(format!(
                "Unknown character type: {}",
                other
            ))),
        }
    }
}

/// Warrior-specific attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarriorStats {
    pub strength: i32,
    pub armor: i32,
    pub weapon_type: String,
}

/// Mage-specific attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MageStats {
    pub mana: i32,
    pub intelligence: i32,
    pub spell_school: String,
}

/// Rogue-specific attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RogueStats {
    pub agility: i32,
    pub stealth: i32,
    /// Chance of a critical hit, 0.0 to 1.0
    pub critical_chance: f64,
}

/// Class variant carrying the type-specific attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum CharacterClass {
    Warrior(WarriorStats),
    Mage(MageStats),
    Rogue(RogueStats),
}

impl CharacterClass {
    pub fn character_type(&self) -> CharacterType {
        match self {
            CharacterClass::Warrior(_) => CharacterType::Warrior,
            CharacterClass::Mage(_) => CharacterType::Mage,
            CharacterClass::Rogue(_) => CharacterType::Rogue,
        }
    }

    fn validate(&self) -> GameResult<()> {
        match self {
            CharacterClass::Warrior(w) => {
                check_stats("Strength and armor", &[w.strength, w.armor])?;
                check_text("Weapon type", &w.weapon_type)?;
            }
            CharacterClass::Mage(m) => {
                check_stats("Mana and intelligence", &[m.mana, m.intelligence])?;
                check_text("Spell school", &m.spell_school)?;
            }
            CharacterClass::Rogue(r) => {
                check_stats("Agility and stealth", &[r.agility, r.stealth])?;
                if !(0.0..=1.0).contains(&r.critical_chance) {
                    return Err(GameError::invalid_input(
                        "Critical chance must be between 0.0 and 1.0",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A game character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Assigned by storage on create
    pub id: Option<CharacterId>,
    pub name: String,
    pub level: i32,
    pub experience: i64,
    pub health_points: i32,
    /// Only changed through guild membership operations
    pub guild_id: Option<GuildId>,
    pub created_date: DateTime<Utc>,
    pub class: CharacterClass,
}

impl Character {
    /// Create an unsaved character of the given class.
    ///
    /// Hit points start at the type's base health plus ten per level.
    pub fn new(name: impl Into<String>, level: i32, class: CharacterClass) -> Self {
        let health_points = class.character_type().base_health() + level.clamp(0, MAX_LEVEL) * 10;
        Self {
            id: None,
            name: name.into(),
            level,
            experience: 0,
            health_points,
            guild_id: None,
            // Storage keeps microseconds; truncate so a round-trip compares equal
            created_date: Utc::now().trunc_subsecs(6),
            class,
        }
    }

    pub fn warrior(
        name: impl Into<String>,
        level: i32,
        strength: i32,
        armor: i32,
        weapon_type: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            level,
            CharacterClass::Warrior(WarriorStats {
                strength,
                armor,
                weapon_type: weapon_type.into(),
            }),
        )
    }

    pub fn mage(
        name: impl Into<String>,
        level: i32,
        mana: i32,
        intelligence: i32,
        spell_school: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            level,
            CharacterClass::Mage(MageStats {
                mana,
                intelligence,
                spell_school: spell_school.into(),
            }),
        )
    }

    pub fn rogue(
        name: impl Into<String>,
        level: i32,
        agility: i32,
        stealth: i32,
        critical_chance: f64,
    ) -> Self {
        Self::new(
            name,
            level,
            CharacterClass::Rogue(RogueStats {
                agility,
                stealth,
                critical_chance,
            }),
        )
    }

    pub fn character_type(&self) -> CharacterType {
        self.class.character_type()
    }

    /// Check every field-level constraint
    pub fn validate(&self) -> GameResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GameError::invalid_input("Character name cannot be empty"));
        }
        let length = self.name.chars().count();
        if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&length) {
            return Err(GameError::invalid_input(format!(
                "Character name must be between {} and {} characters",
                NAME_MIN_LENGTH, NAME_MAX_LENGTH
            )));
        }
        if !is_valid_level(self.level) {
            return Err(GameError::invalid_input(format!(
                "Level must be between {} and {}",
                MIN_LEVEL, MAX_LEVEL
            )));
        }
        if self.experience < 0 {
            return Err(GameError::invalid_input("Experience cannot be negative"));
        }
        if self.health_points <= 0 {
            return Err(GameError::invalid_input("Health points must be positive"));
        }
        if self.health_points > HEALTH_POINTS_MAX {
            return Err(GameError::invalid_input(format!(
                "Health points cannot exceed {}",
                HEALTH_POINTS_MAX
            )));
        }
        self.class.validate()
    }

    /// Overall strength rating of the character
    pub fn calculate_power(&self) -> i32 {
        match &self.class {
            CharacterClass::Warrior(w) => w.strength.saturating_mul(2).saturating_add(w.armor),
            CharacterClass::Mage(m) => m.intelligence.saturating_mul(3).saturating_add(m.mana / 2),
            CharacterClass::Rogue(r) => r
                .agility
                .saturating_mul(2)
                .saturating_add(r.stealth)
                .saturating_add((r.critical_chance * 100.0).round() as i32),
        }
    }

    /// Drop accumulated experience back to zero
    pub fn reset_experience(&mut self) {
        self.experience = 0;
    }

    pub fn display_info(&self) -> String {
        self.to_string()
    }
}

impl Progressable for Character {
    fn level(&self) -> i32 {
        self.level
    }

    fn experience(&self) -> i64 {
        self.experience
    }

    fn gain_experience(&mut self, amount: i64) -> GameResult<()> {
        if amount < 0 {
            return Err(GameError::invalid_input("Experience amount cannot be negative"));
        }
        self.experience = self.experience.saturating_add(amount);
        Ok(())
    }

    fn level_up(&mut self) -> GameResult<()> {
        if self.level >= MAX_LEVEL {
            return Err(GameError::invalid_state(format!(
                "{} is already at the maximum level ({})",
                self.name, MAX_LEVEL
            )));
        }
        self.level += 1;
        match &mut self.class {
            CharacterClass::Warrior(w) => {
                w.strength = grow(w.strength, 5, STAT_MAX);
                w.armor = grow(w.armor, 3, STAT_MAX);
                self.health_points = grow(self.health_points, 20, HEALTH_POINTS_MAX);
            }
            CharacterClass::Mage(m) => {
                m.intelligence = grow(m.intelligence, 5, STAT_MAX);
                m.mana = grow(m.mana, 15, STAT_MAX);
                self.health_points = grow(self.health_points, 10, HEALTH_POINTS_MAX);
            }
            CharacterClass::Rogue(r) => {
                r.agility = grow(r.agility, 4, STAT_MAX);
                r.stealth = grow(r.stealth, 4, STAT_MAX);
                r.critical_chance = (r.critical_chance + 0.01).min(1.0);
                self.health_points = grow(self.health_points, 15, HEALTH_POINTS_MAX);
            }
        }
        Ok(())
    }
}

impl Combatant for Character {
    fn combat_name(&self) -> &str {
        &self.name
    }

    fn health(&self) -> i32 {
        self.health_points
    }

    fn attack(&self) -> i32 {
        match &self.class {
            CharacterClass::Warrior(w) => w.strength.saturating_mul(2).saturating_add(self.level),
            CharacterClass::Mage(m) => m.intelligence.saturating_mul(3).saturating_add(self.level),
            CharacterClass::Rogue(r) => r
                .agility
                .saturating_mul(2)
                .saturating_add(r.stealth)
                .saturating_add(self.level),
        }
    }

    fn defend(&self) -> i32 {
        match &self.class {
            CharacterClass::Warrior(w) => w.armor.saturating_add(self.level),
            CharacterClass::Mage(m) => (m.mana / 10).saturating_add(self.level),
            CharacterClass::Rogue(r) => (r.agility / 2).saturating_add(self.level),
        }
    }

    fn calculate_damage(&self) -> i32 {
        match &self.class {
            CharacterClass::Warrior(w) => self.attack().saturating_add(w.armor / 2),
            CharacterClass::Mage(m) => self.attack().saturating_add(m.mana / 4),
            CharacterClass::Rogue(r) => {
                (f64::from(self.attack()) * (1.0 + r.critical_chance)).round() as i32
            }
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let guild = self
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string());
        writeln!(f, "[{}] {} the {} (Level {})", id, self.name, self.character_type(), self.level)?;
        writeln!(
            f,
            "  HP: {}  XP: {}  Guild: {}  Power: {}",
            self.health_points,
            self.experience,
            guild,
            self.calculate_power()
        )?;
        match &self.class {
            CharacterClass::Warrior(w) => write!(
                f,
                "  Strength: {}  Armor: {}  Weapon: {}",
                w.strength, w.armor, w.weapon_type
            ),
            CharacterClass::Mage(m) => write!(
                f,
                "  Mana: {}  Intelligence: {}  School: {}",
                m.mana, m.intelligence, m.spell_school
            ),
            CharacterClass::Rogue(r) => write!(
                f,
                "  Agility: {}  Stealth: {}  Critical: {:.0}%",
                r.agility,
                r.stealth,
                r.critical_chance * 100.0
            ),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn level_outside_range_is_rejected(level in prop_oneof![i32::MIN..MIN_LEVEL, (MAX_LEVEL + 1)..i32::MAX]) {
            let c = Character::warrior("Thorin", level, 10, 10, "Axe");
            prop_assert!(c.validate().unwrap_err().is_invalid_input());
        }

        #[test]
        fn valid_warriors_pass(level in MIN_LEVEL..=MAX_LEVEL, strength in 0i32..1000, armor in 0i32..1000, name in "[A-Za-z]{3,50}") {
            let c = Character::warrior(name, level, strength, armor, "Axe");
            prop_assert!(c.validate().is_ok());
        }

        #[test]
        fn level_up_never_exceeds_max(start in MIN_LEVEL..=MAX_LEVEL, steps in 0usize..150) {
            let mut c = Character::rogue("Shade", start, 10, 10, 0.1);
            for _ in 0..steps {
                let _ = c.level_up();
            }
            prop_assert!(c.level <= MAX_LEVEL);
            prop_assert!(c.level >= start);
        }
    }
}
