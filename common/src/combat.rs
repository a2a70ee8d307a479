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

//! Combat capability and the duel simulator used by the console demo

use serde::{Deserialize, Serialize};

/// Rounds fought before a duel is called a draw.
pub const DEFAULT_DUEL_ROUNDS: u32 = 20;

/// Entities that can fight
pub trait Combatant {
    /// Name shown in combat logs
    fn combat_name(&self) -> &str;

    /// Hit points the combatant enters a fight with
    fn health(&self) -> i32;

    /// Raw offensive rating of a single attack
    fn attack(&self) -> i32;

    /// Defensive rating against incoming attacks
    fn defend(&self) -> i32;

    /// Total damage output of one hit, including class bonuses
    fn calculate_damage(&self) -> i32;

    /// Damage this combatant deals to `target` with a single hit. Every hit
    /// lands for at least one point.
    fn damage_against(&self, target: &dyn Combatant) -> i32 {
        (self.calculate_damage() - target.defend() / 2).max(1)
    }
}

/// One exchange in a duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelRound {
    pub round: u32,
    pub attacker: String,
    pub defender: String,
    pub damage: i32,
    pub defender_health: i32,
}

/// How a duel ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOutcome {
    Winner(String),
    Draw,
}

/// Full record of a simulated duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelReport {
    pub exchanges: Vec<DuelRound>,
    pub outcome: DuelOutcome,
}

impl DuelReport {
    /// Number of rounds that were started
    pub fn rounds(&self) -> u32 {
        self.exchanges.last().map(|e| e.round).unwrap_or(0)
    }
}

/// Simulate a duel between two combatants.
///
/// `first` strikes first in every round. Neither combatant is modified; the
/// simulation works on copies of their hit points.
pub fn simulate_duel(first: &dyn Combatant, second: &dyn Combatant, max_rounds: u32) -> DuelReport {
    let mut health = [first.health(), second.health()];
    let fighters = [first, second];
    let mut exchanges = Vec::new();

    for round in 1..=max_rounds {
        for (attacker, defender) in [(0usize, 1usize), (1, 0)] {
            let damage = fighters[attacker].damage_against(fighters[defender]);
            health[defender] = (health[defender] - damage).max(0);
            exchanges.push(DuelRound {
                round,
                attacker: fighters[attacker].combat_name().to_string(),
                defender: fighters[defender].combat_name().to_string(),
                damage,
                defender_health: health[defender],
            });

            if health[defender] == 0 {
                return DuelReport {
                    exchanges,
                    outcome: DuelOutcome::Winner(fighters[attacker].combat_name().to_string()),
                };
            }
        }
    }

    DuelReport {
        exchanges,
        outcome: DuelOutcome::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        name: &'static str,
        health: i32,
        damage: i32,
        defense: i32,
    }

    impl Combatant for Dummy {
        fn combat_name(&self) -> &str {
            self.name
        }

        fn health(&self) -> i32 {
            self.health
        }

        fn attack(&self) -> i32 {
            self.damage
        }

        fn defend(&self) -> i32 {
            self.defense
        }

        fn calculate_damage(&self) -> i32 {
            self.damage
        }
    }

    #[test]
    fn test_minimum_damage() {
        let weak = Dummy { name: "Weak", health: 10, damage: 1, defense: 0 };
        let wall = Dummy { name: "Wall", health: 10, damage: 1, defense: 100 };
        assert_eq!(weak.damage_against(&wall), 1);
    }

    #[test]
    fn test_first_striker_wins_even_fight() {
        let a = Dummy { name: "A", health: 20, damage: 10, defense: 0 };
        let b = Dummy { name: "B", health: 20, damage: 10, defense: 0 };

        let report = simulate_duel(&a, &b, DEFAULT_DUEL_ROUNDS);
        assert_eq!(report.outcome, DuelOutcome::Winner("A".to_string()));
        assert_eq!(report.rounds(), 2);
        assert_eq!(report.exchanges.len(), 3);
        assert_eq!(report.exchanges.last().map(|e| e.defender_health), Some(0));
    }

    #[test]
    fn test_draw_after_round_limit() {
        let a = Dummy { name: "A", health: 1000, damage: 1, defense: 0 };
        let b = Dummy { name: "B", health: 1000, damage: 1, defense: 0 };

        let report = simulate_duel(&a, &b, 3);
        assert_eq!(report.outcome, DuelOutcome::Draw);
        assert_eq!(report.rounds(), 3);
        assert_eq!(report.exchanges.len(), 6);
    }
}
