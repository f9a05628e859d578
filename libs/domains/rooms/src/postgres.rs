use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::{
    entity,
    error::{RoomError, RoomResult},
    models::{NewRoom, OCCUPIED_CLEANING_MESSAGE, Room, RoomChanges, RoomCriterion},
    repository::RoomRepository,
};

/// PostgreSQL [`RoomRepository`]; expects a unique index on `rooms.number`.
pub struct PgRoomRepository {
    db: DatabaseConnection,
}

impl PgRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn condition(criterion: &RoomCriterion) -> Condition {
    use entity::Column;

    let expr = match *criterion {
        RoomCriterion::Id(v) => Column::Id.eq(v),
        RoomCriterion::Number(v) => Column::Number.eq(v),
        RoomCriterion::RoomCount(v) => Column::RoomCount.eq(v),
        RoomCriterion::IsOccupied(v) => Column::IsOccupied.eq(v),
        RoomCriterion::Floor(v) => Column::Floor.eq(v),
        RoomCriterion::SleepingPlaces(v) => Column::SleepingPlaces.eq(v),
        RoomCriterion::RoomType(v) => Column::RoomType.eq(v),
        RoomCriterion::NeedCleaning(v) => Column::NeedCleaning.eq(v),
    };

    Condition::all().add(expr)
}

/// Name of the `CHECK (NOT (is_occupied AND need_cleaning))` constraint.
const OCCUPIED_CLEANING_CHECK: &str = "rooms_occupied_cleaning_check";

/// A patch may set one flag while the stored row holds the other, which
/// only the table constraint sees.
fn map_patch_error(err: DbErr) -> RoomError {
    if err.to_string().contains(OCCUPIED_CLEANING_CHECK) {
        return RoomError::Validation(OCCUPIED_CLEANING_MESSAGE.to_string());
    }
    RoomError::Database(err)
}

fn map_insert_error(err: DbErr, number: i32) -> RoomError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            RoomError::Conflict(format!("room number {number} already exists"))
        }
        _ => RoomError::Database(err),
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create(&self, input: NewRoom) -> RoomResult<Room> {
        let number = input.number;
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(e, number))?;

        tracing::info!(room_id = model.id, number, "Created room");
        Ok(model.into())
    }

    async fn exists_by_number(&self, number: i32) -> RoomResult<bool> {
        let exists = entity::Entity::find()
            .filter(entity::Column::Number.eq(number))
            .one(&self.db)
            .await?
            .is_some();

        Ok(exists)
    }

    async fn list(&self) -> RoomResult<Vec<Room>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn filter(&self, criterion: &RoomCriterion) -> RoomResult<Vec<i32>> {
        let ids = entity::Entity::find()
            .select_only()
            .column(entity::Column::Id)
            .filter(condition(criterion))
            .order_by_asc(entity::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;

        Ok(ids)
    }

    async fn patch(&self, id: i32, changes: RoomChanges) -> RoomResult<u64> {
        let active_model: entity::ActiveModel = changes.into();

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_patch_error)?;

        tracing::info!(room_id = id, rows = result.rows_affected, "Patched room");
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> RoomResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(room_id = id, "Deleted room");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn is_occupied(&self, id: i32) -> RoomResult<Option<bool>> {
        let occupied = entity::Entity::find_by_id(id)
            .select_only()
            .column(entity::Column::IsOccupied)
            .into_tuple::<bool>()
            .one(&self.db)
            .await?;

        Ok(occupied)
    }
}
