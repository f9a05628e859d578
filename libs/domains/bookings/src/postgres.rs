use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::{
    entity,
    error::{BookingError, BookingResult},
    models::{Booking, BookingCriterion, BookingFields, BookingStatus},
    repository::{BookingRepository, active_clash},
};

/// PostgreSQL [`BookingRepository`].
pub struct PgBookingRepository {
    db: DatabaseConnection,
}

impl PgBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn has_active(&self, column: entity::Column, value: i32) -> BookingResult<bool> {
        let exists = entity::Entity::find()
            .filter(column.eq(value))
            .filter(active_statuses())
            .one(&self.db)
            .await?
            .is_some();

        Ok(exists)
    }
}

fn active_statuses() -> Condition {
    Condition::all().add(entity::Column::Status.is_in(BookingStatus::ACTIVE))
}

fn condition(criterion: &BookingCriterion) -> Condition {
    use entity::Column;

    let expr = match *criterion {
        BookingCriterion::Id(v) => Column::Id.eq(v),
        BookingCriterion::RoomId(v) => Column::RoomId.eq(v),
        BookingCriterion::GuestId(v) => Column::GuestId.eq(v),
        BookingCriterion::StartDate(v) => Column::StartDate.eq(v),
        BookingCriterion::EndDate(v) => Column::EndDate.eq(v),
        BookingCriterion::Status(v) => Column::Status.eq(v),
    };

    Condition::all().add(expr)
}

/// The partial unique indexes on active bookings surface as a conflict.
fn map_write_error(err: DbErr) -> BookingError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => active_clash(),
        _ => BookingError::Database(err),
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, fields: BookingFields) -> BookingResult<Booking> {
        let active_model: entity::ActiveModel = fields.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_write_error)?;

        tracing::info!(
            booking_id = model.id,
            room_id = model.room_id,
            guest_id = model.guest_id,
            "Created booking"
        );
        Ok(model.into())
    }

    async fn has_active_for_guest(&self, guest_id: i32) -> BookingResult<bool> {
        self.has_active(entity::Column::GuestId, guest_id).await
    }

    async fn has_active_for_room(&self, room_id: i32) -> BookingResult<bool> {
        self.has_active(entity::Column::RoomId, room_id).await
    }

    async fn get_by_id(&self, id: i32) -> BookingResult<Option<Booking>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, id: i32, fields: BookingFields) -> BookingResult<u64> {
        let active_model: entity::ActiveModel = fields.into();

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_write_error)?;

        tracing::info!(booking_id = id, rows = result.rows_affected, "Updated booking");
        Ok(result.rows_affected)
    }

    async fn list(&self) -> BookingResult<Vec<Booking>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn filter(&self, criterion: &BookingCriterion) -> BookingResult<Vec<i32>> {
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

    async fn delete(&self, id: i32) -> BookingResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(booking_id = id, "Deleted booking");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
