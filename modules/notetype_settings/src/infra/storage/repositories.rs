//! SeaORM repository implementations

use crate::contract::Notetype;
use crate::domain::repository::NotetypeRepository;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;

use super::entity;

// ===== Notetype Repository =====

pub struct SeaOrmNotetypeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNotetypeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record that a note uses a notetype
    pub async fn insert_note(&self, id: i64, notetype_id: i64) -> Result<()> {
        use sea_orm::ActiveValue::Set;

        let active = entity::note::ActiveModel {
            id: Set(id),
            notetype_id: Set(notetype_id),
        };
        entity::note::Entity::insert(active).exec(&*self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl NotetypeRepository for SeaOrmNotetypeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Notetype>> {
        let result = entity::Entity::find_by_id(id).one(&*self.db).await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Notetype>> {
        let result = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .one(&*self.db)
            .await?;

        match result {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn list_names_and_ids(&self) -> Result<Vec<(String, i64)>> {
        let results = entity::Entity::find()
            .select_only()
            .column(entity::Column::Name)
            .column(entity::Column::Id)
            .order_by_asc(entity::Column::Name)
            .into_tuple::<(String, i64)>()
            .all(&*self.db)
            .await?;

        Ok(results)
    }

    async fn add(&self, notetype: &Notetype) -> Result<Notetype> {
        let active_model = entity::ActiveModel::try_from(notetype)?;

        let inserted = entity::Entity::insert(active_model)
            .exec(&*self.db)
            .await?;

        self.find_by_id(inserted.last_insert_id)
            .await?
            .ok_or_else(|| anyhow!("notetype {} vanished after insert", inserted.last_insert_id))
    }

    async fn update(&self, notetype: &Notetype) -> Result<Notetype> {
        let active_model = entity::ActiveModel::try_from(notetype)?;

        let result = entity::Entity::update(active_model)
            .exec(&*self.db)
            .await?;

        result.try_into()
    }

    async fn remove(&self, id: i64) -> Result<()> {
        entity::Entity::delete_by_id(id).exec(&*self.db).await?;

        Ok(())
    }

    async fn note_ids(&self, notetype_id: i64) -> Result<Vec<i64>> {
        let results = entity::note::Entity::find()
            .select_only()
            .column(entity::note::Column::Id)
            .filter(entity::note::Column::NotetypeId.eq(notetype_id))
            .order_by_asc(entity::note::Column::Id)
            .into_tuple::<i64>()
            .all(&*self.db)
            .await?;

        Ok(results)
    }

    async fn change_notetype(&self, note_ids: &[i64], to_notetype_id: i64) -> Result<()> {
        if note_ids.is_empty() {
            return Ok(());
        }

        entity::note::Entity::update_many()
            .col_expr(entity::note::Column::NotetypeId, Expr::value(to_notetype_id))
            .filter(entity::note::Column::Id.is_in(note_ids.iter().copied()))
            .exec(&*self.db)
            .await?;

        Ok(())
    }
}
