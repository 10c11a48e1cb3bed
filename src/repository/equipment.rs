//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let mut conditions = vec!["1 = 1".to_string()];
        let mut idx = 0;

        if query.search.is_some() {
            idx += 1;
            conditions.push(format!("name ILIKE ${}", idx));
        }
        if query.category.is_some() {
            idx += 1;
            conditions.push(format!("category = ${}", idx));
        }
        if query.condition.is_some() {
            idx += 1;
            conditions.push(format!("condition = ${}", idx));
        }
        match query.available {
            Some(true) => conditions.push("available_quantity > 0".to_string()),
            Some(false) => conditions.push("available_quantity = 0".to_string()),
            None => {}
        }

        let sql = format!(
            "SELECT * FROM equipment WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&sql);
        if let Some(ref search) = query.search {
            builder = builder.bind(format!("%{}%", search));
        }
        if let Some(category) = query.category {
            builder = builder.bind(category);
        }
        if let Some(condition) = query.condition {
            builder = builder.bind(condition);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment. The available count is clamped to the total on save.
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let quantity = data.quantity.unwrap_or(1);
        let available = data.available_quantity.unwrap_or(quantity).min(quantity);

        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, description, category, condition, quantity, available_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category.unwrap_or(crate::models::enums::EquipmentCategory::Other))
        .bind(data.condition.unwrap_or(crate::models::enums::EquipmentCondition::Good))
        .bind(quantity)
        .bind(available)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment, then clamp available_quantity down to quantity
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.description, "description");
        add_field!(data.category, "category");
        add_field!(data.condition, "condition");
        add_field!(data.quantity, "quantity");
        add_field!(data.available_quantity, "available_quantity");
        let _ = idx;

        let query = format!("UPDATE equipment SET {} WHERE id = {}", sets.join(", "), id);

        let mut tx = self.pool.begin().await?;

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.description);
        bind_field!(data.category);
        bind_field!(data.condition);
        bind_field!(data.quantity);
        bind_field!(data.available_quantity);

        let result = builder.execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        // available never exceeds total
        let equipment = sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET available_quantity = LEAST(available_quantity, quantity) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(equipment)
    }

    /// Delete equipment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
