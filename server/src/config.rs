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

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "server/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "server/.env"
    )]
    pub env_file: Option<String>,

    #[arg(
        long = "memory",
        help = "Keep all data in memory instead of PostgreSQL"
    )]
    pub memory: bool,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
            memory: false,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, String> {
        let conf = serde_yaml::from_reader(
            std::fs::File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?,
        )
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(conf)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: EnvField<String>,
    #[serde(default)]
    pub username: EnvField<String>,
    #[serde(default)]
    pub password: EnvField<String>,

    /// The console issues one operation at a time, so one connection suffices
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply bundled migrations on startup
    #[serde(default = "default_migrate")]
    pub migrate: bool,
}

fn default_max_connections() -> u32 {
    1
}

fn default_migrate() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Default::default(),
            username: Default::default(),
            password: Default::default(),
            max_connections: default_max_connections(),
            migrate: default_migrate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Print the banner before the first menu
    pub banner: bool,

    /// Wait for Enter after each result
    pub pause: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            banner: true,
            pause: false,
        }
    }
}
