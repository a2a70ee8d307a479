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

//! Character menu handlers

use super::{Console, ShellResult};
use guildhall_common::{
    Character, CharacterClass, CharacterId, CharacterType, Equipment, MageStats, Progressable,
    Rarity, RogueStats, WarriorStats,
};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

/// Unwrap a prompt answer inside a reader that returns `Result<_, String>`
macro_rules! field {
    ($answer:expr) => {
        match $answer.await? {
            Ok(value) => value,
            Err(message) => return Ok(Err(message)),
        }
    };
}

pub(super) fn render_characters(characters: &[Character]) -> String {
    if characters.is_empty() {
        return "No characters found.".to_string();
    }
    let mut output = String::new();
    for character in characters {
        output.push_str(&character.display_info());
        output.push_str("\n\n");
    }
    output.push_str(&format!("Total: {} character(s)", characters.len()));
    output
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Collect a full character. With `existing` every answer defaults to
    /// the stored value and the type is fixed.
    async fn read_character(
        &mut self,
        existing: Option<Character>,
    ) -> io::Result<Result<Character, String>> {
        let character_type = match &existing {
            Some(character) => character.character_type(),
            None => field!(self
                .prompt
                .ask_parsed::<CharacterType>("Character type (1=Warrior, 2=Mage, 3=Rogue): ")),
        };
        let name: String = field!(self
            .prompt
            .ask_value("Name", existing.as_ref().map(|c| c.name.clone())));
        let level: i32 = field!(self
            .prompt
            .ask_value("Level (1-100)", existing.as_ref().map(|c| c.level)));

        let current = existing.as_ref().map(|c| c.class.clone());
        let class = match character_type {
            CharacterType::Warrior => {
                let stats = match current {
                    Some(CharacterClass::Warrior(stats)) => Some(stats),
                    _ => None,
                };
                CharacterClass::Warrior(WarriorStats {
                    strength: field!(self
                        .prompt
                        .ask_value("Strength", stats.as_ref().map(|s| s.strength))),
                    armor: field!(self
                        .prompt
                        .ask_value("Armor", stats.as_ref().map(|s| s.armor))),
                    weapon_type: field!(self
                        .prompt
                        .ask_value("Weapon type", stats.map(|s| s.weapon_type))),
                })
            }
            CharacterType::Mage => {
                let stats = match current {
                    Some(CharacterClass::Mage(stats)) => Some(stats),
                    _ => None,
                };
                CharacterClass::Mage(MageStats {
                    mana: field!(self
                        .prompt
                        .ask_value("Mana", stats.as_ref().map(|s| s.mana))),
                    intelligence: field!(self
                        .prompt
                        .ask_value("Intelligence", stats.as_ref().map(|s| s.intelligence))),
                    spell_school: field!(self
                        .prompt
                        .ask_value("Spell school", stats.map(|s| s.spell_school))),
                })
            }
            CharacterType::Rogue => {
                let stats = match current {
                    Some(CharacterClass::Rogue(stats)) => Some(stats),
                    _ => None,
                };
                CharacterClass::Rogue(RogueStats {
                    agility: field!(self
                        .prompt
                        .ask_value("Agility", stats.as_ref().map(|s| s.agility))),
                    stealth: field!(self
                        .prompt
                        .ask_value("Stealth", stats.as_ref().map(|s| s.stealth))),
                    critical_chance: field!(self.prompt.ask_value(
                        "Critical chance (0.0-1.0)",
                        stats.map(|s| s.critical_chance)
                    )),
                })
            }
        };

        Ok(Ok(match existing {
            Some(existing) => Character {
                name,
                level,
                class,
                ..existing
            },
            None => Character::new(name, level, class),
        }))
    }

    async fn ask_character_id(&mut self) -> io::Result<Result<CharacterId, String>> {
        self.prompt.ask_parsed("Character ID: ").await
    }

    pub(super) async fn cmd_create_character(&mut self) -> io::Result<ShellResult> {
        let character = attempt!(self.read_character(None).await?);
        let id = attempt!(self.context.characters().create_character(character).await);
        Ok(ShellResult::Success(format!("Character created with ID {}", id)))
    }

    pub(super) async fn cmd_list_characters(&mut self) -> io::Result<ShellResult> {
        let characters = attempt!(self.context.characters().get_all_characters().await);
        Ok(ShellResult::Success(render_characters(&characters)))
    }

    pub(super) async fn cmd_view_character(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        let character = attempt!(self.context.characters().get_character_by_id(id).await);
        let equipment = attempt!(self.context.characters().get_equipment(id).await);

        let mut output = character.display_info();
        output.push_str(&format!(
            "\n  Created: {}",
            character.created_date.format("%Y-%m-%d %H:%M")
        ));
        if equipment.is_empty() {
            output.push_str("\n  Equipment: none");
        } else {
            output.push_str("\n  Equipment:");
            for item in &equipment {
                output.push_str(&format!("\n    - {}", item));
            }
        }
        Ok(ShellResult::Success(output))
    }

    pub(super) async fn cmd_update_character(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        let existing = attempt!(self.context.characters().get_character_by_id(id).await);
        self.prompt
            .say("Press Enter to keep the current value.")
            .await?;
        let character = attempt!(self.read_character(Some(existing)).await?);
        let updated = attempt!(self.context.characters().update_character(id, character).await);
        Ok(ShellResult::Success(format!(
            "Character {} updated\n{}",
            id,
            updated.display_info()
        )))
    }

    pub(super) async fn cmd_delete_character(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        attempt!(self.context.characters().delete_character(id).await);
        Ok(ShellResult::Success(format!("Character {} deleted", id)))
    }

    pub(super) async fn cmd_add_experience(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        let amount: i64 = attempt!(self.prompt.ask_parsed("Experience to add: ").await?);
        let gain = attempt!(self.context.characters().add_experience(id, amount).await);

        let character = &gain.character;
        let mut output = format!(
            "{} gained {} XP (total {})",
            character.name, amount, character.experience
        );
        if gain.leveled_up {
            output.push_str(&format!("\nLevel up! {} is now level {}", character.name, character.level));
        } else {
            output.push_str(&format!(
                "\nLevel {}, {} XP required for the next level",
                character.level,
                character.required_experience(character.level)
            ));
        }
        Ok(ShellResult::Success(output))
    }

    pub(super) async fn cmd_level_up_character(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        let character = attempt!(self.context.characters().level_up_character(id).await);
        Ok(ShellResult::Success(format!(
            "{} is now level {}\n{}",
            character.name,
            character.level,
            character.display_info()
        )))
    }

    pub(super) async fn cmd_characters_by_type(&mut self) -> io::Result<ShellResult> {
        let character_type: CharacterType = attempt!(self
            .prompt
            .ask_parsed("Character type (1=Warrior, 2=Mage, 3=Rogue): ")
            .await?);
        let characters = attempt!(
            self.context
                .characters()
                .get_characters_by_type(character_type)
                .await
        );
        Ok(ShellResult::Success(render_characters(&characters)))
    }

    pub(super) async fn cmd_character_statistics(&mut self) -> io::Result<ShellResult> {
        let stats = attempt!(self.context.characters().statistics().await);
        let strongest = stats
            .strongest
            .map(|(name, power)| format!("{} (power {})", name, power))
            .unwrap_or_else(|| "-".to_string());
        Ok(ShellResult::Success(format!(
            r#"=== Character Statistics ===
  Total:          {}
  Warriors:       {}
  Mages:          {}
  Rogues:         {}
  In a guild:     {}
  Average level:  {:.1}
  Strongest:      {}"#,
            stats.total,
            stats.warriors,
            stats.mages,
            stats.rogues,
            stats.guild_members,
            stats.average_level,
            strongest
        )))
    }

    pub(super) async fn cmd_reset_experience(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_character_id().await?);
        let character = attempt!(self.context.characters().reset_experience(id).await);
        Ok(ShellResult::Success(format!(
            "{}'s experience has been reset to 0",
            character.name
        )))
    }

    pub(super) async fn cmd_add_equipment(&mut self) -> io::Result<ShellResult> {
        let character_id = attempt!(self.ask_character_id().await?);
        let name = attempt!(self.prompt.ask_parsed::<String>("Equipment name: ").await?);
        let equipment_type = attempt!(self
            .prompt
            .ask_parsed::<String>("Equipment type (e.g. Sword, Shield): ")
            .await?);
        let bonus_stats: i32 = attempt!(self.prompt.ask_parsed("Bonus stats: ").await?);
        let rarity: Rarity = attempt!(self
            .prompt
            .ask_parsed("Rarity (COMMON, RARE, EPIC, LEGENDARY): ")
            .await?);

        let equipment = Equipment::new(character_id, name, equipment_type, bonus_stats, rarity);
        let id = attempt!(
            self.context
                .characters()
                .add_equipment(character_id, equipment)
                .await
        );
        Ok(ShellResult::Success(format!("Equipment created with ID {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::context::AppContext;
    use crate::persistence::Repositories;

    async fn console_with(
        script: &'static str,
    ) -> (Console<&'static [u8], Vec<u8>>, AppContext) {
        let context = AppContext::new(Repositories::memory());
        context
            .characters()
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        let console = Console::new(
            context.clone(),
            script.as_bytes(),
            Vec::new(),
            ConsoleConfig::default(),
        );
        (console, context)
    }

    #[tokio::test]
    async fn test_update_keeps_values_on_empty_answers() {
        let (mut console, context) = console_with("1\nThorin Stonefist\n\n55\n\n\n").await;
        let result = console.execute("4").await.unwrap();
        assert!(matches!(result, ShellResult::Success(_)));

        let stored = context
            .characters()
            .get_character_by_id(CharacterId(1))
            .await
            .unwrap();
        assert_eq!(stored.name, "Thorin Stonefist");
        assert_eq!(stored.level, 10);
        assert_eq!(
            stored.class,
            CharacterClass::Warrior(WarriorStats {
                strength: 55,
                armor: 30,
                weapon_type: "Sword".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_add_experience_reports_progress() {
        let (mut console, _) = console_with("1\n1500\n1\n-5\n").await;
        let result = console.execute("6").await.unwrap();
        assert_eq!(
            result,
            ShellResult::Success(
                "Thorin gained 1500 XP (total 1500)\nLevel 10, 10000 XP required for the next level"
                    .to_string()
            )
        );

        let result = console.execute("6").await.unwrap();
        assert_eq!(
            result,
            ShellResult::Error("Invalid input: Experience amount must be positive".to_string())
        );
    }

    #[tokio::test]
    async fn test_equipment_shows_on_character_view() {
        let (mut console, _) = console_with("1\nAegis\nShield\n12\nepic\n1\n").await;
        let result = console.execute("19").await.unwrap();
        assert_eq!(result, ShellResult::Success("Equipment created with ID 1".to_string()));

        let ShellResult::Success(view) = console.execute("3").await.unwrap() else {
            panic!("expected character view");
        };
        assert!(view.contains("[1] Thorin the Warrior (Level 10)"));
        assert!(view.contains("- Aegis (Epic Shield, +12)"));
    }

    #[tokio::test]
    async fn test_unknown_rarity_is_rejected() {
        let (mut console, _) = console_with("1\nAegis\nShield\n12\nmythic\n").await;
        let ShellResult::Error(message) = console.execute("19").await.unwrap() else {
            panic!("expected an error");
        };
        assert!(message.contains("Unknown rarity: mythic"));
    }

    #[tokio::test]
    async fn test_filter_by_type() {
        let (mut console, _) = console_with("2\n1\n").await;
        let result = console.execute("8").await.unwrap();
        assert_eq!(result, ShellResult::Success("No characters found.".to_string()));

        let ShellResult::Success(listing) = console.execute("8").await.unwrap() else {
            panic!("expected a listing");
        };
        assert!(listing.contains("Thorin"));
        assert!(listing.ends_with("Total: 1 character(s)"));
    }
}
