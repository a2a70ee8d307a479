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
use guildhall_server::config::{Arguments, Configuration};
use guildhall_server::persistence::{self, Repositories};
use guildhall_server::{AppContext, Console};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging on stderr so it stays out of the console
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // In memory mode the configuration file is optional
    let config = if arguments.memory && !std::path::Path::new(&arguments.config_file).exists() {
        Configuration::default()
    } else {
        Configuration::load(&arguments.config_file)?
    };
    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Guildhall...");

    let (repositories, database) = if arguments.memory {
        tracing::info!("Using in-memory storage, nothing will be saved");
        (Repositories::memory(), None)
    } else {
        tracing::info!("Connecting to Database at {}", &config.database.url);
        let database = persistence::connect(&config.database)
            .await
            .map_err(|e| format!("Failed to connect to database: {}", e))?;

        if config.database.migrate {
            persistence::migrate(&database)
                .await
                .map_err(|e| format!("Failed to apply migrations: {}", e))?;
            tracing::info!("Database schema is up to date");
        }
        (Repositories::postgres(database.clone()), Some(database))
    };

    let context = AppContext::new(repositories);
    let mut console = Console::new(
        context,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        config.console,
    );
    console.run().await?;

    if let Some(database) = database {
        database.close().await;
        tracing::info!("Database connection closed");
    }
    Ok(())
}
