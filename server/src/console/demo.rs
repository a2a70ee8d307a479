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

//! Combat, polymorphism and capability demos

use super::{Console, ShellResult};
use guildhall_common::progression::{EXPERIENCE_PER_LEVEL, is_valid_level};
use guildhall_common::{
    Character, CharacterId, CharacterType, Combatant, DuelOutcome, MAX_LEVEL, MIN_LEVEL,
    combat::DEFAULT_DUEL_ROUNDS, simulate_duel,
};
use std::cmp::Reverse;
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

/// Render a duel between two characters. Neither character is modified.
pub(super) fn render_duel(first: &Character, second: &Character) -> String {
    let report = simulate_duel(first, second, DEFAULT_DUEL_ROUNDS);

    let mut output = format!(
        "=== {} vs {} ===\n{}: HP {}  ATK {}  DEF {}\n{}: HP {}  ATK {}  DEF {}\n",
        first.name,
        second.name,
        first.name,
        first.health(),
        first.attack(),
        first.defend(),
        second.name,
        second.health(),
        second.attack(),
        second.defend(),
    );
    for exchange in &report.exchanges {
        output.push_str(&format!(
            "Round {}: {} hits {} for {} ({} HP left)\n",
            exchange.round,
            exchange.attacker,
            exchange.defender,
            exchange.damage,
            exchange.defender_health
        ));
    }
    match &report.outcome {
        DuelOutcome::Winner(name) => {
            output.push_str(&format!("{} wins after {} round(s)!", name, report.rounds()))
        }
        DuelOutcome::Draw => output.push_str(&format!(
            "Draw: both still standing after {} rounds",
            report.rounds()
        )),
    }
    output
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(super) async fn cmd_combat(&mut self) -> io::Result<ShellResult> {
        let first: CharacterId = attempt!(self.prompt.ask_parsed("First character ID: ").await?);
        let second: CharacterId =
            attempt!(self.prompt.ask_parsed("Second character ID: ").await?);
        if first == second {
            return Ok(ShellResult::Error(
                "A character cannot duel itself".to_string(),
            ));
        }

        let first = attempt!(self.context.characters().get_character_by_id(first).await);
        let second = attempt!(self.context.characters().get_character_by_id(second).await);
        Ok(ShellResult::Success(render_duel(&first, &second)))
    }

    pub(super) async fn cmd_polymorphism(&mut self) -> io::Result<ShellResult> {
        let characters = attempt!(self.context.characters().get_all_characters().await);
        if characters.is_empty() {
            return Ok(ShellResult::Success("No characters found.".to_string()));
        }

        let mut output = String::from("=== One interface, many characters ===\n");
        for character in &characters {
            output.push_str(&format!(
                "\n{}\n  As a combatant: attack {}, defend {}, damage {}\n",
                character.display_info(),
                character.attack(),
                character.defend(),
                character.calculate_damage()
            ));
        }
        Ok(ShellResult::Success(output.trim_end().to_string()))
    }

    pub(super) async fn cmd_advanced(&mut self) -> io::Result<ShellResult> {
        let mut characters = attempt!(self.context.characters().get_all_characters().await);

        let mut output = String::from("=== Character Types ===\n");
        for character_type in CharacterType::all() {
            output.push_str(&character_type.describe());
        }

        output.push_str(&format!(
            "\n=== Progression Rules ===\n  Levels {} to {}, {} XP per level\n",
            MIN_LEVEL, MAX_LEVEL, EXPERIENCE_PER_LEVEL
        ));
        for level in [MIN_LEVEL, 50, MAX_LEVEL + 1] {
            output.push_str(&format!(
                "  Level {} valid: {}\n",
                level,
                is_valid_level(level)
            ));
        }

        characters.sort_by_key(|c| c.name.to_lowercase());
        output.push_str("\n=== Sorted by name ===\n");
        for character in &characters {
            output.push_str(&format!("  {} ({})\n", character.name, character.character_type()));
        }

        characters.sort_by_key(|c| Reverse(c.calculate_power()));
        output.push_str("\n=== Sorted by power ===\n");
        for character in &characters {
            output.push_str(&format!("  {} - {}\n", character.name, character.calculate_power()));
        }

        Ok(ShellResult::Success(output.trim_end().to_string()))
    }
}
