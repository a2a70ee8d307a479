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

//! Character rules: validation, uniqueness, progression and equipment

use super::ensure_character_id;
use crate::persistence::{CharacterRepository, EquipmentRepository};
use guildhall_common::{
    Character, CharacterId, CharacterType, Equipment, EquipmentId, GameError, GameResult,
    Progressable,
};
use std::sync::Arc;

/// Result of [`CharacterService::add_experience`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceGain {
    pub character: Character,
    pub leveled_up: bool,
}

/// Aggregate figures over every stored character
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStatistics {
    pub total: usize,
    pub warriors: usize,
    pub mages: usize,
    pub rogues: usize,
    pub average_level: f64,
    pub guild_members: usize,
    /// Name and power of the strongest character
    pub strongest: Option<(String, i32)>,
}

impl CharacterStatistics {
    fn from_characters(characters: &[Character]) -> Self {
        let count = |t: CharacterType| {
            characters
                .iter()
                .filter(|c| c.character_type() == t)
                .count()
        };
        let average_level = if characters.is_empty() {
            0.0
        } else {
            characters.iter().map(|c| f64::from(c.level)).sum::<f64>() / characters.len() as f64
        };
        let strongest = characters
            .iter()
            .max_by_key(|c| c.calculate_power())
            .map(|c| (c.name.clone(), c.calculate_power()));

        Self {
            total: characters.len(),
            warriors: count(CharacterType::Warrior),
            mages: count(CharacterType::Mage),
            rogues: count(CharacterType::Rogue),
            average_level,
            guild_members: characters.iter().filter(|c| c.guild_id.is_some()).count(),
            strongest,
        }
    }
}

/// Character business rules over the character and equipment repositories
#[derive(Clone)]
pub struct CharacterService {
    characters: Arc<dyn CharacterRepository>,
    equipment: Arc<dyn EquipmentRepository>,
}

impl CharacterService {
    pub fn new(
        characters: Arc<dyn CharacterRepository>,
        equipment: Arc<dyn EquipmentRepository>,
    ) -> Self {
        Self {
            characters,
            equipment,
        }
    }

    /// Validate and store a new character, returning its id.
    ///
    /// New characters start unaffiliated; guild membership is only changed
    /// through the guild operations so member counts stay correct.
    #[tracing::instrument(skip(self, character), fields(name = %character.name))]
    pub async fn create_character(&self, character: Character) -> GameResult<CharacterId> {
        character.validate()?;
        if character.guild_id.is_some() {
            return Err(GameError::invalid_input(
                "New characters must join a guild through a membership change",
            ));
        }
        if self.characters.find_by_name(&character.name).await?.is_some() {
            return Err(GameError::duplicate(format!(
                "Character with name '{}' already exists",
                character.name
            )));
        }

        let id = self.characters.create(&character).await?;
        tracing::info!(
            "Created {} '{}' with ID {}",
            character.character_type(),
            character.name,
            id
        );
        Ok(id)
    }

    pub async fn get_all_characters(&self) -> GameResult<Vec<Character>> {
        self.characters.get_all().await
    }

    pub async fn get_character_by_id(&self, id: CharacterId) -> GameResult<Character> {
        ensure_character_id(id)?;
        self.characters
            .get_by_id(id)
            .await?
            .ok_or_else(|| GameError::not_found(format!("Character with ID {} not found", id)))
    }

    pub async fn get_characters_by_type(
        &self,
        character_type: CharacterType,
    ) -> GameResult<Vec<Character>> {
        self.characters.get_by_type(character_type).await
    }

    /// Overwrite every mutable field of a stored character.
    ///
    /// The class cannot change, and guild membership plus creation date are
    /// kept from the stored row. Lowering experience here is allowed.
    #[tracing::instrument(skip(self, character), fields(character_id = id.value()))]
    pub async fn update_character(
        &self,
        id: CharacterId,
        character: Character,
    ) -> GameResult<Character> {
        character.validate()?;
        let existing = self.get_character_by_id(id).await?;
        if existing.character_type() != character.character_type() {
            return Err(GameError::invalid_input(format!(
                "Character type cannot change from {} to {}",
                existing.character_type(),
                character.character_type()
            )));
        }
        if let Some(other) = self.characters.find_by_name(&character.name).await?
            && other.id != Some(id)
        {
            return Err(GameError::duplicate(format!(
                "Character with name '{}' already exists",
                character.name
            )));
        }

        let updated = Character {
            id: Some(id),
            guild_id: existing.guild_id,
            created_date: existing.created_date,
            ..character
        };
        self.persist(&updated).await?;
        tracing::info!("Updated character {}", id);
        Ok(updated)
    }

    /// Delete a character along with its attributes and equipment.
    ///
    /// A guild member is released from its guild in the same unit of work.
    #[tracing::instrument(skip(self))]
    pub async fn delete_character(&self, id: CharacterId) -> GameResult<()> {
        let existing = self.get_character_by_id(id).await?;
        if !self.characters.delete(id).await? {
            return Err(GameError::not_found(format!("Character with ID {} not found", id)));
        }
        match existing.guild_id {
            Some(guild_id) => tracing::info!(
                "Deleted character '{}' and released its place in guild {}",
                existing.name,
                guild_id
            ),
            None => tracing::info!("Deleted character '{}'", existing.name),
        }
        Ok(())
    }

    /// Grant experience and apply at most one level-up
    #[tracing::instrument(skip(self))]
    pub async fn add_experience(&self, id: CharacterId, amount: i64) -> GameResult<ExperienceGain> {
        if amount <= 0 {
            return Err(GameError::invalid_input("Experience amount must be positive"));
        }
        let mut character = self.get_character_by_id(id).await?;
        character.gain_experience(amount)?;

        let leveled_up = character.can_level_up();
        if leveled_up {
            character.level_up()?;
        }
        self.persist(&character).await?;

        if leveled_up {
            tracing::info!("{} reached level {}", character.name, character.level);
        }
        Ok(ExperienceGain {
            character,
            leveled_up,
        })
    }

    /// Force a level-up regardless of experience
    #[tracing::instrument(skip(self))]
    pub async fn level_up_character(&self, id: CharacterId) -> GameResult<Character> {
        let mut character = self.get_character_by_id(id).await?;
        character.level_up()?;
        self.persist(&character).await?;
        tracing::info!("{} leveled up to {}", character.name, character.level);
        Ok(character)
    }

    pub async fn reset_experience(&self, id: CharacterId) -> GameResult<Character> {
        let mut character = self.get_character_by_id(id).await?;
        character.reset_experience();
        self.persist(&character).await?;
        Ok(character)
    }

    pub async fn statistics(&self) -> GameResult<CharacterStatistics> {
        let characters = self.characters.get_all().await?;
        Ok(CharacterStatistics::from_characters(&characters))
    }

    /// Give a piece of equipment to an existing character
    pub async fn add_equipment(
        &self,
        character_id: CharacterId,
        equipment: Equipment,
    ) -> GameResult<EquipmentId> {
        equipment.validate()?;
        self.get_character_by_id(character_id).await?;
        let equipment = Equipment {
            id: None,
            character_id,
            ..equipment
        };
        let id = self.equipment.create(&equipment).await?;
        tracing::info!("Equipped character {} with '{}'", character_id, equipment.name);
        Ok(id)
    }

    pub async fn get_equipment(&self, character_id: CharacterId) -> GameResult<Vec<Equipment>> {
        self.get_character_by_id(character_id).await?;
        self.equipment.get_by_character(character_id).await
    }

    async fn persist(&self, character: &Character) -> GameResult<()> {
        let id = character
            .id
            .ok_or_else(|| GameError::invalid_state("Character has not been stored yet"))?;
        if self.characters.update(id, character).await? {
            Ok(())
        } else {
            Err(GameError::not_found(format!("Character with ID {} not found", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, MockCharacterRepository, MockEquipmentRepository};
    use guildhall_common::{CharacterClass, GuildId, MAX_LEVEL, Rarity, STAT_MAX};

    fn memory_service() -> CharacterService {
        let store = MemoryStore::new();
        CharacterService::new(Arc::new(store.clone()), Arc::new(store))
    }

    #[tokio::test]
    async fn test_create_and_fetch_round_trip() {
        let service = memory_service();
        let thorin = Character::warrior("Thorin", 10, 50, 30, "Sword");
        let id = service.create_character(thorin.clone()).await.unwrap();

        let stored = service.get_character_by_id(id).await.unwrap();
        assert_eq!(stored, Character { id: Some(id), ..thorin });
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_character() {
        let service = memory_service();
        let err = service
            .create_character(Character::warrior("Al", 10, 50, 30, "Sword"))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = service
            .create_character(Character::mage("Merlin", 101, 100, 50, "Fire"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_stats_and_text() {
        let service = memory_service();
        let err = service
            .create_character(Character::warrior("Goliath", 10, 2_000_000_000, 10, "Club"))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = service
            .create_character(Character::warrior("Goliath", 10, 50, 10, "C".repeat(51)))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(service.get_all_characters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_level_up_at_stat_ceiling() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Goliath", 10, STAT_MAX, STAT_MAX, "Club"))
            .await
            .unwrap();

        let character = service.level_up_character(id).await.unwrap();
        assert_eq!(character.level, 11);
        match &character.class {
            CharacterClass::Warrior(w) => {
                assert_eq!(w.strength, STAT_MAX);
                assert_eq!(w.armor, STAT_MAX);
            }
            other => panic!("unexpected class {:?}", other),
        }
        assert_eq!(character.calculate_power(), STAT_MAX * 3);
    }

    #[tokio::test]
    async fn test_create_rejects_preassigned_guild() {
        let service = memory_service();
        let mut rogue = Character::rogue("Shade", 4, 40, 35, 0.25);
        rogue.guild_id = Some(GuildId(1));
        let err = service.create_character(rogue).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_names_differ_only_by_case() {
        let service = memory_service();
        service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        let err = service
            .create_character(Character::mage("tHoRiN", 3, 100, 40, "Frost"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));
        assert!(err.is_invalid_input());

        service
            .create_character(Character::rogue("Élodie", 2, 40, 35, 0.2))
            .await
            .unwrap();
        let err = service
            .create_character(Character::rogue("élodie", 2, 40, 35, 0.2))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));
    }

    #[tokio::test]
    async fn test_non_positive_id_is_not_found_without_storage() {
        let mut characters = MockCharacterRepository::new();
        characters.expect_get_by_id().never();
        let service = CharacterService::new(
            Arc::new(characters),
            Arc::new(MockEquipmentRepository::new()),
        );

        for id in [0, -7] {
            let err = service.get_character_by_id(CharacterId(id)).await.unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_keeps_identity() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        let created = service.get_character_by_id(id).await.unwrap();

        let updated = service
            .update_character(id, Character::warrior("Thorin Oakenshield", 12, 60, 35, "Axe"))
            .await
            .unwrap();
        assert_eq!(updated.created_date, created.created_date);

        let stored = service.get_character_by_id(id).await.unwrap();
        assert_eq!(stored.name, "Thorin Oakenshield");
        assert_eq!(stored.level, 12);
        assert_eq!(stored.calculate_power(), 60 * 2 + 35);
    }

    #[tokio::test]
    async fn test_update_rejects_type_change_and_missing_id() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();

        let err = service
            .update_character(id, Character::mage("Thorin", 10, 100, 50, "Fire"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));

        let err = service
            .update_character(CharacterId(99), Character::warrior("Nobody", 1, 1, 1, "Stick"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_another_character() {
        let service = memory_service();
        service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        let id = service
            .create_character(Character::warrior("Balin", 8, 40, 25, "Mace"))
            .await
            .unwrap();

        let err = service
            .update_character(id, Character::warrior("THORIN", 8, 40, 25, "Mace"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));

        // Keeping its own name with different casing is fine
        service
            .update_character(id, Character::warrior("BALIN", 9, 40, 25, "Mace"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_experience_applies_single_level_up() {
        let service = memory_service();
        let id = service
            .create_character(Character::mage("Merlin", 2, 100, 50, "Arcane"))
            .await
            .unwrap();

        let gain = service.add_experience(id, 500).await.unwrap();
        assert!(!gain.leveled_up);
        assert_eq!(gain.character.level, 2);

        // Crosses several thresholds at once but only one level is granted
        let gain = service.add_experience(id, 9_000).await.unwrap();
        assert!(gain.leveled_up);
        assert_eq!(gain.character.level, 3);
        assert_eq!(gain.character.experience, 9_500);

        let stored = service.get_character_by_id(id).await.unwrap();
        assert_eq!(stored, gain.character);
    }

    #[tokio::test]
    async fn test_add_experience_rejects_non_positive_amounts() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();

        for amount in [-5, 0] {
            let err = service.add_experience(id, amount).await.unwrap_err();
            assert!(matches!(err, GameError::InvalidInput(_)));
        }

        let stored = service.get_character_by_id(id).await.unwrap();
        assert_eq!(stored.experience, 0);
        assert_eq!(stored.level, 10);
    }

    #[tokio::test]
    async fn test_level_up_respects_ceiling() {
        let service = memory_service();
        let id = service
            .create_character(Character::rogue("Shade", MAX_LEVEL - 1, 40, 35, 0.995))
            .await
            .unwrap();

        let character = service.level_up_character(id).await.unwrap();
        assert_eq!(character.level, MAX_LEVEL);

        let err = service.level_up_character(id).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
        assert_eq!(service.get_character_by_id(id).await.unwrap().level, MAX_LEVEL);
    }

    #[tokio::test]
    async fn test_reset_experience() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        service.add_experience(id, 1_500).await.unwrap();

        let character = service.reset_experience(id).await.unwrap();
        assert_eq!(character.experience, 0);
        assert_eq!(character.level, 10);
    }

    #[tokio::test]
    async fn test_delete_missing_character() {
        let service = memory_service();
        let err = service.delete_character(CharacterId(3)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_equipment_belongs_to_existing_character() {
        let service = memory_service();
        let id = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();

        service
            .add_equipment(id, Equipment::new(CharacterId(0), "Aegis", "Shield", 12, Rarity::Rare))
            .await
            .unwrap();
        let items = service.get_equipment(id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].character_id, id);

        let err = service
            .add_equipment(
                CharacterId(42),
                Equipment::new(CharacterId(42), "Aegis", "Shield", 12, Rarity::Rare),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_statistics() {
        let service = memory_service();
        service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap();
        service
            .create_character(Character::mage("Merlin", 20, 200, 80, "Arcane"))
            .await
            .unwrap();

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.warriors, 1);
        assert_eq!(stats.mages, 1);
        assert_eq!(stats.rogues, 0);
        assert_eq!(stats.average_level, 15.0);
        assert_eq!(stats.strongest, Some(("Merlin".to_string(), 80 * 3 + 100)));
    }

    #[tokio::test]
    async fn test_storage_errors_propagate_unchanged() {
        let mut characters = MockCharacterRepository::new();
        characters
            .expect_find_by_name()
            .returning(|_| Err(GameError::database("connection reset")));
        characters.expect_create().never();
        let service = CharacterService::new(
            Arc::new(characters),
            Arc::new(MockEquipmentRepository::new()),
        );

        let err = service
            .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
            .await
            .unwrap_err();
        assert_eq!(err, GameError::database("connection reset"));
    }
}
