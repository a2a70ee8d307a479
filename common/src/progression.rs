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

//! Progression capability: experience, thresholds and leveling

use crate::error::GameResult;

/// Lowest level an entity can hold.
pub const MIN_LEVEL: i32 = 1;

/// Highest level an entity can hold.
pub const MAX_LEVEL: i32 = 100;

/// Experience required per level under the default curve.
pub const EXPERIENCE_PER_LEVEL: i64 = 1000;

/// Check whether a level lies within `MIN_LEVEL..=MAX_LEVEL`
pub fn is_valid_level(level: i32) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

/// Entities that can gain experience and level up
pub trait Progressable {
    /// Current level
    fn level(&self) -> i32;

    /// Accumulated experience
    fn experience(&self) -> i64;

    /// Add experience points. Negative amounts are rejected.
    fn gain_experience(&mut self, amount: i64) -> GameResult<()>;

    /// Raise the level by one and apply the variant's stat growth.
    ///
    /// Fails with `InvalidState` at `MAX_LEVEL`.
    fn level_up(&mut self) -> GameResult<()>;

    /// Experience needed to leave `level`. Implementors may override the
    /// default `level * 1000` curve.
    fn required_experience(&self, level: i32) -> i64 {
        i64::from(level) * EXPERIENCE_PER_LEVEL
    }

    /// True once accumulated experience reaches the current threshold.
    fn can_level_up(&self) -> bool {
        self.level() < MAX_LEVEL && self.experience() >= self.required_experience(self.level())
    }
}
