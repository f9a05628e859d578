use crate::models::{Booking, BookingFields, BookingStatus};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// `bookings` table. Partial unique indexes on `guest_id` and on `room_id`
/// over active statuses back the availability checks.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub room_id: i32,
    pub guest_id: i32,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub status: BookingStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const URL: &'static str = "/bookings";
    pub const TAG: &'static str = "bookings";
}

impl From<Model> for Booking {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            guest_id: model.guest_id,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status,
        }
    }
}

impl From<BookingFields> for ActiveModel {
    fn from(fields: BookingFields) -> Self {
        ActiveModel {
            id: NotSet,
            room_id: Set(fields.room_id),
            guest_id: Set(fields.guest_id),
            start_date: Set(fields.start_date),
            end_date: Set(fields.end_date),
            status: Set(fields.status),
        }
    }
}
