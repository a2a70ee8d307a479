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

//! In-memory storage
//!
//! Backs the `--memory` console mode and the service tests. Every method
//! checks all of its preconditions before touching state, so a failed call
//! leaves the store unchanged the same way a rolled back transaction would.

use super::{CharacterRepository, EquipmentRepository, GuildRepository};
use async_trait::async_trait;
use guildhall_common::{
    Character, CharacterId, CharacterType, Equipment, EquipmentId, GameError, GameResult, Guild,
    GuildId,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Name comparison matching the `LOWER(name)` unique indexes
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Default)]
struct MemoryState {
    characters: BTreeMap<CharacterId, Character>,
    guilds: BTreeMap<GuildId, Guild>,
    equipment: BTreeMap<EquipmentId, Equipment>,
    last_character_id: i32,
    last_guild_id: i32,
    last_equipment_id: i32,
}

impl MemoryState {
    fn character_name_taken(&self, name: &str, except: Option<CharacterId>) -> bool {
        self.characters
            .values()
            .any(|c| c.id != except && same_name(&c.name, name))
    }

    fn guild_name_taken(&self, name: &str, except: Option<GuildId>) -> bool {
        self.guilds
            .values()
            .any(|g| g.id != except && same_name(&g.guild_name, name))
    }
}

/// Shared in-memory store implementing every repository trait
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepository for MemoryStore {
    async fn create(&self, character: &Character) -> GameResult<CharacterId> {
        let mut state = self.state.write().await;
        if state.character_name_taken(&character.name, None) {
            return Err(GameError::duplicate(format!(
                "Character with name '{}' already exists",
                character.name
            )));
        }
        if let Some(guild_id) = character.guild_id {
            if !state.guilds.contains_key(&guild_id) {
                return Err(GameError::not_found(format!("Guild with ID {} not found", guild_id)));
            }
        }

        state.last_character_id += 1;
        let id = CharacterId(state.last_character_id);
        let mut stored = character.clone();
        stored.id = Some(id);
        if let Some(guild) = character.guild_id.and_then(|g| state.guilds.get_mut(&g)) {
            guild.add_member();
        }
        state.characters.insert(id, stored);
        Ok(id)
    }

    async fn get_all(&self) -> GameResult<Vec<Character>> {
        Ok(self.state.read().await.characters.values().cloned().collect())
    }

    async fn get_by_id(&self, id: CharacterId) -> GameResult<Option<Character>> {
        Ok(self.state.read().await.characters.get(&id).cloned())
    }

    async fn get_by_type(&self, character_type: CharacterType) -> GameResult<Vec<Character>> {
        let state = self.state.read().await;
        Ok(state
            .characters
            .values()
            .filter(|c| c.character_type() == character_type)
            .cloned()
            .collect())
    }

    async fn get_by_guild(&self, guild_id: GuildId) -> GameResult<Vec<Character>> {
        let state = self.state.read().await;
        Ok(state
            .characters
            .values()
            .filter(|c| c.guild_id == Some(guild_id))
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> GameResult<Option<Character>> {
        let state = self.state.read().await;
        Ok(state
            .characters
            .values()
            .find(|c| same_name(&c.name, name))
            .cloned())
    }

    async fn update(&self, id: CharacterId, character: &Character) -> GameResult<bool> {
        let mut state = self.state.write().await;
        match state.characters.get(&id) {
            Some(stored) if stored.character_type() == character.character_type() => {}
            _ => return Ok(false),
        }
        if state.character_name_taken(&character.name, Some(id)) {
            return Err(GameError::duplicate(format!(
                "Character with name '{}' already exists",
                character.name
            )));
        }

        if let Some(stored) = state.characters.get_mut(&id) {
            stored.name = character.name.clone();
            stored.level = character.level;
            stored.experience = character.experience;
            stored.health_points = character.health_points;
            stored.class = character.class.clone();
        }
        Ok(true)
    }

    async fn delete(&self, id: CharacterId) -> GameResult<bool> {
        let mut state = self.state.write().await;
        let Some(guild_id) = state.characters.get(&id).map(|c| c.guild_id) else {
            return Ok(false);
        };

        if let Some(guild_id) = guild_id {
            let guild = state.guilds.get_mut(&guild_id).ok_or_else(|| {
                GameError::database(format!("Guild {} referenced by {} is missing", guild_id, id))
            })?;
            guild.remove_member()?;
        }
        state.equipment.retain(|_, e| e.character_id != id);
        state.characters.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl GuildRepository for MemoryStore {
    async fn create(&self, guild: &Guild) -> GameResult<GuildId> {
        let mut state = self.state.write().await;
        if state.guild_name_taken(&guild.guild_name, None) {
            return Err(GameError::duplicate(format!(
                "Guild with name '{}' already exists",
                guild.guild_name
            )));
        }

        state.last_guild_id += 1;
        let id = GuildId(state.last_guild_id);
        let stored = Guild::restore(
            id,
            guild.guild_name.clone(),
            guild.level,
            0,
            guild.created_date,
        );
        state.guilds.insert(id, stored);
        Ok(id)
    }

    async fn get_all(&self) -> GameResult<Vec<Guild>> {
        Ok(self.state.read().await.guilds.values().cloned().collect())
    }

    async fn get_by_id(&self, id: GuildId) -> GameResult<Option<Guild>> {
        Ok(self.state.read().await.guilds.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> GameResult<Option<Guild>> {
        let state = self.state.read().await;
        Ok(state
            .guilds
            .values()
            .find(|g| same_name(&g.guild_name, name))
            .cloned())
    }

    async fn update(&self, id: GuildId, guild: &Guild) -> GameResult<bool> {
        let mut state = self.state.write().await;
        if !state.guilds.contains_key(&id) {
            return Ok(false);
        }
        if state.guild_name_taken(&guild.guild_name, Some(id)) {
            return Err(GameError::duplicate(format!(
                "Guild with name '{}' already exists",
                guild.guild_name
            )));
        }
        if let Some(stored) = state.guilds.get_mut(&id) {
            stored.guild_name = guild.guild_name.clone();
            stored.level = guild.level;
        }
        Ok(true)
    }

    async fn delete(&self, id: GuildId) -> GameResult<bool> {
        let mut state = self.state.write().await;
        match state.guilds.get(&id) {
            Some(guild) if !guild.has_members() => {
                state.guilds.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_member(&self, guild_id: GuildId, character_id: CharacterId) -> GameResult<()> {
        let mut state = self.state.write().await;
        if !state.guilds.contains_key(&guild_id) {
            return Err(GameError::not_found(format!("Guild with ID {} not found", guild_id)));
        }
        match state.characters.get(&character_id) {
            Some(character) if character.guild_id.is_none() => {}
            _ => {
                return Err(GameError::business_rule(format!(
                    "Character {} does not exist or already belongs to a guild",
                    character_id
                )));
            }
        }

        if let Some(guild) = state.guilds.get_mut(&guild_id) {
            guild.add_member();
        }
        if let Some(character) = state.characters.get_mut(&character_id) {
            character.guild_id = Some(guild_id);
        }
        Ok(())
    }

    async fn remove_member(&self, character_id: CharacterId) -> GameResult<Option<GuildId>> {
        let mut state = self.state.write().await;
        let guild_id = match state.characters.get(&character_id) {
            None => {
                return Err(GameError::not_found(format!(
                    "Character with ID {} not found",
                    character_id
                )));
            }
            Some(character) => match character.guild_id {
                None => return Ok(None),
                Some(guild_id) => guild_id,
            },
        };

        let guild = state.guilds.get_mut(&guild_id).ok_or_else(|| {
            GameError::database(format!(
                "Guild {} referenced by {} is missing",
                guild_id, character_id
            ))
        })?;
        guild.remove_member()?;
        if let Some(character) = state.characters.get_mut(&character_id) {
            character.guild_id = None;
        }
        Ok(Some(guild_id))
    }
}

#[async_trait]
impl EquipmentRepository for MemoryStore {
    async fn create(&self, equipment: &Equipment) -> GameResult<EquipmentId> {
        let mut state = self.state.write().await;
        if !state.characters.contains_key(&equipment.character_id) {
            return Err(GameError::not_found(format!(
                "Character with ID {} not found",
                equipment.character_id
            )));
        }

        state.last_equipment_id += 1;
        let id = EquipmentId(state.last_equipment_id);
        let mut stored = equipment.clone();
        stored.id = Some(id);
        state.equipment.insert(id, stored);
        Ok(id)
    }

    async fn get_by_character(&self, character_id: CharacterId) -> GameResult<Vec<Equipment>> {
        let state = self.state.read().await;
        Ok(state
            .equipment
            .values()
            .filter(|e| e.character_id == character_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildhall_common::Rarity;

    async fn store_with_member() -> (MemoryStore, CharacterId, GuildId) {
        let store = MemoryStore::new();
        let character_id = CharacterRepository::create(
            &store,
            &Character::warrior("Thorin", 5, 50, 30, "Axe"),
        )
        .await
        .unwrap();
        let guild_id = GuildRepository::create(&store, &Guild::new("Iron Legion"))
            .await
            .unwrap();
        store.add_member(guild_id, character_id).await.unwrap();
        (store, character_id, guild_id)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = CharacterRepository::create(&store, &Character::mage("Merlin", 3, 200, 60, "Fire"))
            .await
            .unwrap();
        let second =
            CharacterRepository::create(&store, &Character::rogue("Shade", 2, 40, 35, 0.2))
                .await
                .unwrap();
        assert_eq!(first, CharacterId(1));
        assert_eq!(second, CharacterId(2));

        let stored = CharacterRepository::get_by_id(&store, first)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, Some(first));
        assert_eq!(stored.name, "Merlin");
    }

    #[tokio::test]
    async fn test_names_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        CharacterRepository::create(&store, &Character::warrior("Thorin", 1, 10, 5, "Axe"))
            .await
            .unwrap();
        let err = CharacterRepository::create(&store, &Character::warrior("THORIN", 1, 10, 5, "Axe"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));

        let found = CharacterRepository::find_by_name(&store, "thorin").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_non_ascii_names_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        CharacterRepository::create(&store, &Character::warrior("Élodie", 1, 10, 5, "Axe"))
            .await
            .unwrap();
        let err = CharacterRepository::create(&store, &Character::warrior("élodie", 1, 10, 5, "Axe"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));
        let found = CharacterRepository::find_by_name(&store, "ÉLODIE").await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Élodie".to_string()));

        GuildRepository::create(&store, &Guild::new("Ørder of Ásh"))
            .await
            .unwrap();
        let err = GuildRepository::create(&store, &Guild::new("øRDER OF áSH"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::DuplicateResource(_)));
        let found = GuildRepository::find_by_name(&store, "ørder of ásh").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_membership_moves_both_sides() {
        let (store, character_id, guild_id) = store_with_member().await;

        let guild = GuildRepository::get_by_id(&store, guild_id).await.unwrap().unwrap();
        assert_eq!(guild.member_count(), 1);
        let members = store.get_by_guild(guild_id).await.unwrap();
        assert_eq!(members.len(), 1);

        let left = store.remove_member(character_id).await.unwrap();
        assert_eq!(left, Some(guild_id));
        let guild = GuildRepository::get_by_id(&store, guild_id).await.unwrap().unwrap();
        assert_eq!(guild.member_count(), 0);

        // Leaving twice is a no-op
        assert_eq!(store.remove_member(character_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_join_leaves_state_untouched() {
        let (store, character_id, guild_id) = store_with_member().await;
        let other = GuildRepository::create(&store, &Guild::new("Arcane Circle"))
            .await
            .unwrap();

        let err = store.add_member(other, character_id).await.unwrap_err();
        assert!(matches!(err, GameError::BusinessRuleViolation(_)));

        let other = GuildRepository::get_by_id(&store, other).await.unwrap().unwrap();
        assert_eq!(other.member_count(), 0);
        let character = CharacterRepository::get_by_id(&store, character_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(character.guild_id, Some(guild_id));
    }

    #[tokio::test]
    async fn test_delete_character_releases_membership_and_equipment() {
        let (store, character_id, guild_id) = store_with_member().await;
        EquipmentRepository::create(
            &store,
            &Equipment::new(character_id, "Aegis", "Shield", 12, Rarity::Epic),
        )
        .await
        .unwrap();

        assert!(CharacterRepository::delete(&store, character_id).await.unwrap());
        let guild = GuildRepository::get_by_id(&store, guild_id).await.unwrap().unwrap();
        assert_eq!(guild.member_count(), 0);
        assert!(store.get_by_character(character_id).await.unwrap().is_empty());
        assert!(!CharacterRepository::delete(&store, character_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_occupied_guild_is_not_deleted() {
        let (store, character_id, guild_id) = store_with_member().await;
        assert!(!GuildRepository::delete(&store, guild_id).await.unwrap());

        store.remove_member(character_id).await.unwrap();
        assert!(GuildRepository::delete(&store, guild_id).await.unwrap());
        assert!(GuildRepository::get_by_id(&store, guild_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_refuses_type_change() {
        let store = MemoryStore::new();
        let id = CharacterRepository::create(&store, &Character::warrior("Thorin", 1, 10, 5, "Axe"))
            .await
            .unwrap();
        let updated = CharacterRepository::update(
            &store,
            id,
            &Character::mage("Thorin", 1, 100, 50, "Frost"),
        )
        .await
        .unwrap();
        assert!(!updated);
    }
}
