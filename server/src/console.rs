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

//! Menu-driven console
//!
//! The console only collects input and renders results; every rule lives in
//! the services behind [`AppContext`].

/// Unwrap a handler step, turning its error into a printable [`ShellResult::Error`]
macro_rules! attempt {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => return Ok($crate::console::ShellResult::Error(e.to_string())),
        }
    };
}

mod character;
mod demo;
mod guild;
mod prompt;

pub use prompt::Prompt;

use crate::config::ConsoleConfig;
use crate::context::AppContext;
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

const BANNER: &str = r#"
  ____       _ _     _ _           _ _
 / ___|_   _(_) | __| | |__   __ _| | |
| |  _| | | | | |/ _` | '_ \ / _` | | |
| |_| | |_| | | | (_| | | | | (_| | | |
 \____|\__,_|_|_|\__,_|_| |_|\__,_|_|_|

     Characters, guilds and glory
"#;

const MENU: &str = r#"
=============== MAIN MENU ===============
 Characters
   1. Create character
   2. List all characters
   3. View character
   4. Update character
   5. Delete character
   6. Add experience
   7. Level up character
   8. List characters by type
   9. Character statistics
 Guilds
  10. Create guild
  11. List all guilds
  12. View guild
  13. Update guild
  14. Delete guild
  15. Add character to guild
  16. Remove character from guild
  17. Level up guild
  18. Guild statistics
 More
  19. Add equipment
  20. Combat simulation
  21. Polymorphism demo
  22. Advanced features
  23. Reset experience
   0. Exit
========================================="#;

/// Outcome of one menu selection
#[derive(Debug, PartialEq)]
pub enum ShellResult {
    /// Selection completed with output
    Success(String),
    /// Selection failed with a message for the user
    Error(String),
    /// Leave the console
    Quit,
    /// Nothing to report
    Continue,
}

/// Interactive console over any line reader and writer
pub struct Console<R, W> {
    context: AppContext,
    prompt: Prompt<R, W>,
    config: ConsoleConfig,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(context: AppContext, reader: R, writer: W, config: ConsoleConfig) -> Self {
        Self {
            context,
            prompt: Prompt::new(reader, writer),
            config,
        }
    }

    /// Run the menu loop until the user exits or input ends
    pub async fn run(&mut self) -> io::Result<()> {
        if self.config.banner {
            self.prompt.say(BANNER).await?;
        }

        loop {
            self.prompt.say(MENU).await?;
            let choice = match self.prompt.ask("Enter your choice: ").await {
                Ok(choice) => choice,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };

            let result = match self.execute(&choice).await {
                Ok(result) => result,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };

            match result {
                ShellResult::Success(output) => self.prompt.say(&output).await?,
                ShellResult::Error(message) => {
                    tracing::debug!("Menu choice {} failed: {}", choice, message);
                    self.prompt.say(&format!("Error: {}", message)).await?
                }
                ShellResult::Quit => break,
                ShellResult::Continue => continue,
            }

            if self.config.pause {
                match self.prompt.ask("\nPress Enter to continue...").await {
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                    Err(e) => return Err(e),
                }
            }
        }

        self.prompt.say("Goodbye!").await
    }

    /// Execute one menu selection
    pub async fn execute(&mut self, choice: &str) -> io::Result<ShellResult> {
        let choice = choice.trim();
        if choice.is_empty() {
            return Ok(ShellResult::Continue);
        }
        let Ok(number) = choice.parse::<u32>() else {
            return Ok(ShellResult::Error(format!(
                "'{}' is not a menu number",
                choice
            )));
        };

        match number {
            0 => Ok(ShellResult::Quit),
            1 => self.cmd_create_character().await,
            2 => self.cmd_list_characters().await,
            3 => self.cmd_view_character().await,
            4 => self.cmd_update_character().await,
            5 => self.cmd_delete_character().await,
            6 => self.cmd_add_experience().await,
            7 => self.cmd_level_up_character().await,
            8 => self.cmd_characters_by_type().await,
            9 => self.cmd_character_statistics().await,
            10 => self.cmd_create_guild().await,
            11 => self.cmd_list_guilds().await,
            12 => self.cmd_view_guild().await,
            13 => self.cmd_update_guild().await,
            14 => self.cmd_delete_guild().await,
            15 => self.cmd_join_guild().await,
            16 => self.cmd_leave_guild().await,
            17 => self.cmd_level_up_guild().await,
            18 => self.cmd_guild_statistics().await,
            19 => self.cmd_add_equipment().await,
            20 => self.cmd_combat().await,
            21 => self.cmd_polymorphism().await,
            22 => self.cmd_advanced().await,
            23 => self.cmd_reset_experience().await,
            _ => Ok(ShellResult::Error(format!(
                "{} is not on the menu, choose 0-23",
                number
            ))),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.prompt.into_inner()
    }
}
