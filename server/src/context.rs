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

use crate::persistence::Repositories;
use crate::service::{CharacterService, GuildService};

/// Application context holding the services the console dispatches to
#[derive(Clone)]
pub struct AppContext {
    characters: CharacterService,
    guilds: GuildService,
}

impl AppContext {
    /// Wire the services onto a set of repositories
    pub fn new(repositories: Repositories) -> Self {
        let characters = CharacterService::new(
            repositories.characters.clone(),
            repositories.equipment.clone(),
        );
        let guilds = GuildService::new(repositories.guilds, repositories.characters);
        Self { characters, guilds }
    }

    /// Get the character service
    pub fn characters(&self) -> &CharacterService {
        &self.characters
    }

    /// Get the guild service
    pub fn guilds(&self) -> &GuildService {
        &self.guilds
    }
}
