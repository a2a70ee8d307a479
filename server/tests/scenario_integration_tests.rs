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

//! End-to-end service scenarios on the in-memory store

use guildhall_common::{Character, CharacterId, GameError, Guild, GuildId, Progressable};
use guildhall_server::{AppContext, Repositories};

fn context() -> AppContext {
    AppContext::new(Repositories::memory())
}

/// Every guild's member count must equal the characters that reference it
async fn assert_member_counts(context: &AppContext) {
    for guild in context.guilds().get_all_guilds().await.unwrap() {
        let id = guild.id.unwrap();
        let members = context.guilds().guild_members(id).await.unwrap();
        assert_eq!(
            guild.member_count() as usize,
            members.len(),
            "member count of guild {}",
            id
        );
    }
}

#[tokio::test]
async fn test_dragon_slayers_scenario() {
    let context = context();
    let characters = context.characters();
    let guilds = context.guilds();

    let thorin = characters
        .create_character(Character::warrior("Thorin", 10, 50, 30, "Sword"))
        .await
        .unwrap();
    assert_eq!(thorin, CharacterId(1));

    let slayers = guilds
        .create_guild(Guild::new("Dragon Slayers"))
        .await
        .unwrap();
    assert_eq!(slayers, GuildId(1));

    let guild = guilds.add_character_to_guild(thorin, slayers).await.unwrap();
    assert_eq!(guild.member_count(), 1);
    let character = characters.get_character_by_id(thorin).await.unwrap();
    assert_eq!(character.guild_id, Some(slayers));
    assert_member_counts(&context).await;

    assert_eq!(character.required_experience(10), 10_000);
    let gain = characters.add_experience(thorin, 1_500).await.unwrap();
    assert!(!gain.leveled_up);
    assert_eq!(gain.character.level, 10);
    assert_eq!(gain.character.experience, 1_500);

    let guild = guilds.level_up_guild(slayers).await.unwrap();
    assert_eq!(guild.level, 2);

    let err = guilds.delete_guild(slayers).await.unwrap_err();
    assert!(matches!(err, GameError::BusinessRuleViolation(_)));

    let former = guilds
        .remove_character_from_guild(thorin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(former.member_count(), 0);
    let character = characters.get_character_by_id(thorin).await.unwrap();
    assert_eq!(character.guild_id, None);
    assert_member_counts(&context).await;

    guilds.delete_guild(slayers).await.unwrap();
    assert!(guilds.get_all_guilds().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_membership_counts_hold_through_mixed_operations() {
    let context = context();
    let characters = context.characters();
    let guilds = context.guilds();

    let mut ids = Vec::new();
    for character in [
        Character::warrior("Thorin", 10, 50, 30, "Sword"),
        Character::mage("Merlin", 20, 200, 80, "Arcane"),
        Character::rogue("Shade", 7, 45, 40, 0.3),
        Character::warrior("Balin", 8, 40, 25, "Mace"),
    ] {
        ids.push(characters.create_character(character).await.unwrap());
    }
    let slayers = guilds.create_guild(Guild::new("Dragon Slayers")).await.unwrap();
    let circle = guilds.create_guild(Guild::new("Arcane Circle")).await.unwrap();

    guilds.add_character_to_guild(ids[0], slayers).await.unwrap();
    guilds.add_character_to_guild(ids[1], circle).await.unwrap();
    guilds.add_character_to_guild(ids[2], slayers).await.unwrap();
    assert_member_counts(&context).await;

    // A failed move changes nothing
    assert!(guilds.add_character_to_guild(ids[2], circle).await.is_err());
    assert_member_counts(&context).await;

    guilds.remove_character_from_guild(ids[2]).await.unwrap();
    guilds.add_character_to_guild(ids[2], circle).await.unwrap();
    assert_member_counts(&context).await;

    // Deleting a member releases its place
    characters.delete_character(ids[0]).await.unwrap();
    assert_member_counts(&context).await;
    assert_eq!(
        guilds.get_guild_by_id(slayers).await.unwrap().member_count(),
        0
    );
    guilds.delete_guild(slayers).await.unwrap();

    let stats = guilds.statistics().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.total_members, 2);

    let stats = characters.statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.guild_members, 2);
}

#[tokio::test]
async fn test_negative_experience_leaves_character_unchanged() {
    let context = context();
    let id = context
        .characters()
        .create_character(Character::rogue("Shade", 5, 30, 20, 0.1))
        .await
        .unwrap();
    let before = context.characters().get_character_by_id(id).await.unwrap();

    let err = context.characters().add_experience(id, -5).await.unwrap_err();
    assert!(err.is_invalid_input());

    let after = context.characters().get_character_by_id(id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_character_type_filter() {
    let context = context();
    for character in [
        Character::warrior("Thorin", 10, 50, 30, "Sword"),
        Character::mage("Merlin", 20, 200, 80, "Arcane"),
        Character::warrior("Balin", 8, 40, 25, "Mace"),
    ] {
        context.characters().create_character(character).await.unwrap();
    }

    let warriors = context
        .characters()
        .get_characters_by_type(guildhall_common::CharacterType::Warrior)
        .await
        .unwrap();
    let names: Vec<_> = warriors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Thorin", "Balin"]);
}
