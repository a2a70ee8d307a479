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

//! Guildhall Server Library
//!
//! Repositories, business-rule services and the interactive console that
//! together manage characters and the guilds they belong to.

pub mod config;
pub mod console;
pub mod context;
pub mod persistence;
pub mod service;

pub use console::{Console, ShellResult};
pub use context::AppContext;
pub use persistence::Repositories;
