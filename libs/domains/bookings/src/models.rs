use chrono::{DateTime, Utc};
use database::filter::{self, FilterError};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::BookingError;

fn validate_date_order(booking: &CreateBooking) -> Result<(), ValidationError> {
    match (booking.start_date, booking.end_date) {
        (Some(start), Some(end)) if start >= end => Err(ValidationError::new("date_order")
            .with_message(Cow::Borrowed("start_date must be earlier than end_date"))),
        _ => Ok(()),
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[default]
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "checked_in")]
    CheckedIn,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl BookingStatus {
    /// Statuses that hold the room and the guest.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::CheckedIn];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub room_id: i32,
    pub guest_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Request body for a new booking. `status` defaults to `confirmed`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_date_order"))]
pub struct CreateBooking {
    #[validate(range(min = 1, message = "room_id must be more than 0"))]
    #[schema(example = 1)]
    pub room_id: i32,
    #[validate(range(min = 1, message = "guest_id must be more than 0"))]
    #[schema(example = 10)]
    pub guest_id: i32,
    #[validate(required(message = "start_date is required"))]
    #[schema(example = "2024-01-15T14:00:00Z")]
    pub start_date: Option<DateTime<Utc>>,
    #[validate(required(message = "end_date is required"))]
    #[schema(example = "2024-01-17T12:00:00Z")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

/// Partial update. Absent fields keep their stored value; the merged record
/// must still satisfy the [`CreateBooking`] rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookingPatch {
    /// Ignored over HTTP, where the path id is used
    pub id: Option<i32>,
    #[validate(range(min = 1, message = "room_id must be more than 0"))]
    pub room_id: Option<i32>,
    #[validate(range(min = 1, message = "guest_id must be more than 0"))]
    pub guest_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

impl BookingPatch {
    /// Fill unset fields from `current`, if there is one.
    pub fn merge(self, current: Option<&Booking>) -> CreateBooking {
        CreateBooking {
            room_id: self
                .room_id
                .or(current.map(|b| b.room_id))
                .unwrap_or_default(),
            guest_id: self
                .guest_id
                .or(current.map(|b| b.guest_id))
                .unwrap_or_default(),
            start_date: self.start_date.or(current.map(|b| b.start_date)),
            end_date: self.end_date.or(current.map(|b| b.end_date)),
            status: self.status.or(current.map(|b| b.status)),
        }
    }
}

/// Every writable column of a booking, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFields {
    pub room_id: i32,
    pub guest_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
}

impl BookingFields {
    pub fn into_booking(self, id: i32) -> Booking {
        Booking {
            id,
            room_id: self.room_id,
            guest_id: self.guest_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
        }
    }
}

impl TryFrom<CreateBooking> for BookingFields {
    type Error = BookingError;

    fn try_from(input: CreateBooking) -> Result<Self, Self::Error> {
        let (Some(start_date), Some(end_date)) = (input.start_date, input.end_date) else {
            return Err(BookingError::Validation(
                "start_date and end_date are required".to_string(),
            ));
        };

        Ok(Self {
            room_id: input.room_id,
            guest_id: input.guest_id,
            start_date,
            end_date,
            status: input.status.unwrap_or_default(),
        })
    }
}

/// One `column = value` lookup from a filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingCriterion {
    Id(i32),
    RoomId(i32),
    GuestId(i32),
    StartDate(DateTime<Utc>),
    EndDate(DateTime<Utc>),
    Status(BookingStatus),
}

impl BookingCriterion {
    pub const COLUMNS: &'static [&'static str] =
        &["id", "room_id", "guest_id", "start_date", "end_date", "status"];

    pub fn parse(column: &str, value: &Value) -> Result<Self, FilterError> {
        filter::ensure_column(column, Self::COLUMNS)?;

        let criterion = match column {
            "id" => Self::Id(filter::int_value(column, value)?),
            "room_id" => Self::RoomId(filter::int_value(column, value)?),
            "guest_id" => Self::GuestId(filter::int_value(column, value)?),
            "start_date" => Self::StartDate(filter::timestamp_value(column, value)?),
            "end_date" => Self::EndDate(filter::timestamp_value(column, value)?),
            _ => {
                let raw = filter::text_value(column, value)?;
                Self::Status(BookingStatus::from_str(raw).map_err(|_| {
                    FilterError::WrongType {
                        column: column.to_string(),
                        expected: "a booking status",
                    }
                })?)
            }
        };

        Ok(criterion)
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            Self::Id(id) => booking.id == id,
            Self::RoomId(room_id) => booking.room_id == room_id,
            Self::GuestId(guest_id) => booking.guest_id == guest_id,
            Self::StartDate(start) => booking.start_date == start,
            Self::EndDate(end) => booking.end_date == end,
            Self::Status(status) => booking.status == status,
        }
    }
}

/// Answer of `POST /filter`: every booking for an empty filter, otherwise
/// the matching ids per column.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BookingFilterResult {
    All(Vec<Booking>),
    Matches(BTreeMap<String, Vec<i32>>),
}
