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

//! Guild menu handlers

use super::character::render_characters;
use super::{Console, ShellResult};
use guildhall_common::{CharacterId, Guild, GuildId};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn ask_guild_id(&mut self) -> io::Result<Result<GuildId, String>> {
        self.prompt.ask_parsed("Guild ID: ").await
    }

    pub(super) async fn cmd_create_guild(&mut self) -> io::Result<ShellResult> {
        let name = attempt!(self.prompt.ask_parsed::<String>("Guild name: ").await?);
        let level = attempt!(self.prompt.ask_parsed_or("Starting level", 1).await?);
        let id = attempt!(
            self.context
                .guilds()
                .create_guild(Guild::with_level(name, level))
                .await
        );
        Ok(ShellResult::Success(format!("Guild created with ID {}", id)))
    }

    pub(super) async fn cmd_list_guilds(&mut self) -> io::Result<ShellResult> {
        let guilds = attempt!(self.context.guilds().get_all_guilds().await);
        if guilds.is_empty() {
            return Ok(ShellResult::Success("No guilds found.".to_string()));
        }
        let mut output = String::new();
        for guild in &guilds {
            output.push_str(&format!("{}\n", guild));
        }
        output.push_str(&format!("Total: {} guild(s)", guilds.len()));
        Ok(ShellResult::Success(output))
    }

    pub(super) async fn cmd_view_guild(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_guild_id().await?);
        let guild = attempt!(self.context.guilds().get_guild_by_id(id).await);
        let members = attempt!(self.context.guilds().guild_members(id).await);
        Ok(ShellResult::Success(format!(
            "{}\n\nMembers:\n{}",
            guild,
            render_characters(&members)
        )))
    }

    pub(super) async fn cmd_update_guild(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_guild_id().await?);
        let existing = attempt!(self.context.guilds().get_guild_by_id(id).await);
        let name = attempt!(
            self.prompt
                .ask_parsed_or("Guild name", existing.guild_name.clone())
                .await?
        );
        let level = attempt!(self.prompt.ask_parsed_or("Level", existing.level).await?);
        let updated = attempt!(
            self.context
                .guilds()
                .update_guild(id, Guild::with_level(name, level))
                .await
        );
        Ok(ShellResult::Success(format!("Guild updated\n{}", updated)))
    }

    pub(super) async fn cmd_delete_guild(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_guild_id().await?);
        attempt!(self.context.guilds().delete_guild(id).await);
        Ok(ShellResult::Success(format!("Guild {} deleted", id)))
    }

    pub(super) async fn cmd_join_guild(&mut self) -> io::Result<ShellResult> {
        let character_id: CharacterId = attempt!(self.prompt.ask_parsed("Character ID: ").await?);
        let guild_id = attempt!(self.ask_guild_id().await?);
        let character = attempt!(
            self.context
                .characters()
                .get_character_by_id(character_id)
                .await
        );
        let guild = attempt!(
            self.context
                .guilds()
                .add_character_to_guild(character_id, guild_id)
                .await
        );
        Ok(ShellResult::Success(format!(
            "{} joined {} ({} member(s))",
            character.name,
            guild.guild_name,
            guild.member_count()
        )))
    }

    pub(super) async fn cmd_leave_guild(&mut self) -> io::Result<ShellResult> {
        let character_id: CharacterId = attempt!(self.prompt.ask_parsed("Character ID: ").await?);
        let character = attempt!(
            self.context
                .characters()
                .get_character_by_id(character_id)
                .await
        );
        let former = attempt!(
            self.context
                .guilds()
                .remove_character_from_guild(character_id)
                .await
        );
        Ok(ShellResult::Success(match former {
            Some(guild) => format!(
                "{} left {} ({} member(s))",
                character.name,
                guild.guild_name,
                guild.member_count()
            ),
            None => format!("{} is not in any guild", character.name),
        }))
    }

    pub(super) async fn cmd_level_up_guild(&mut self) -> io::Result<ShellResult> {
        let id = attempt!(self.ask_guild_id().await?);
        let guild = attempt!(self.context.guilds().level_up_guild(id).await);
        Ok(ShellResult::Success(format!(
            "{} is now level {}",
            guild.guild_name, guild.level
        )))
    }

    pub(super) async fn cmd_guild_statistics(&mut self) -> io::Result<ShellResult> {
        let stats = attempt!(self.context.guilds().statistics().await);
        let highest = stats
            .highest_level
            .map(|(name, level)| format!("{} (level {})", name, level))
            .unwrap_or_else(|| "-".to_string());
        Ok(ShellResult::Success(format!(
            r#"=== Guild Statistics ===
  Total guilds:     {}
  Total members:    {}
  Average members:  {:.1}
  Empty guilds:     {}
  Highest level:    {}"#,
            stats.total, stats.total_members, stats.average_members, stats.empty_guilds, highest
        )))
    }
}
