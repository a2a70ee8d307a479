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

//! PostgreSQL equipment storage

use super::EquipmentRepository;
use async_trait::async_trait;
use guildhall_common::{CharacterId, Equipment, EquipmentId, GameResult, Rarity};
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct EquipmentRow {
    id: EquipmentId,
    name: String,
    equipment_type: String,
    bonus_stats: i32,
    rarity: String,
    character_id: CharacterId,
}

impl TryFrom<EquipmentRow> for Equipment {
    type Error = guildhall_common::GameError;

    fn try_from(row: EquipmentRow) -> Result<Self, Self::Error> {
        Ok(Equipment {
            id: Some(row.id),
            name: row.name,
            equipment_type: row.equipment_type,
            bonus_stats: row.bonus_stats,
            rarity: Rarity::from_db_str(&row.rarity)?,
            character_id: row.character_id,
        })
    }
}

#[derive(Clone)]
pub struct PgEquipmentRepository {
    pool: PgPool,
}

impl PgEquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for PgEquipmentRepository {
    async fn create(&self, equipment: &Equipment) -> GameResult<EquipmentId> {
        let (id,): (EquipmentId,) = sqlx::query_as(
            r#"
            INSERT INTO equipment (name, equipment_type, bonus_stats, rarity, character_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&equipment.name)
        .bind(&equipment.equipment_type)
        .bind(equipment.bonus_stats)
        .bind(equipment.rarity.to_db_str())
        .bind(equipment.character_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_by_character(&self, character_id: CharacterId) -> GameResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT id, name, equipment_type, bonus_stats, rarity, character_id
            FROM equipment
            WHERE character_id = $1
            ORDER BY id
            "#,
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Equipment::try_from).collect()
    }
}
