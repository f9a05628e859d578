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

use crate::error::RoomError;

const ROOM_TYPE_MESSAGE: &str = "room_type must be one of: Standard, Deluxe, Suite";
pub(crate) const OCCUPIED_CLEANING_MESSAGE: &str = "cannot set need_cleaning while room is occupied";

fn validate_room_type(room_type: &str) -> Result<(), ValidationError> {
    RoomType::from_str(room_type)
        .map(|_| ())
        .map_err(|_| ValidationError::new("room_type").with_message(Cow::Borrowed(ROOM_TYPE_MESSAGE)))
}

fn occupied_and_cleaning() -> ValidationError {
    ValidationError::new("occupied_need_cleaning")
        .with_message(Cow::Borrowed(OCCUPIED_CLEANING_MESSAGE))
}

fn validate_create_occupancy(room: &CreateRoom) -> Result<(), ValidationError> {
    if room.is_occupied && room.need_cleaning {
        return Err(occupied_and_cleaning());
    }
    Ok(())
}

fn validate_patch_occupancy(patch: &RoomPatch) -> Result<(), ValidationError> {
    if patch.is_occupied == Some(true) && patch.need_cleaning == Some(true) {
        return Err(occupied_and_cleaning());
    }
    Ok(())
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum RoomType {
    #[sea_orm(string_value = "Standard")]
    Standard,
    #[sea_orm(string_value = "Deluxe")]
    Deluxe,
    #[sea_orm(string_value = "Suite")]
    Suite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    /// Assigned on creation
    pub id: i32,
    /// Door number, unique across the hotel
    pub number: i32,
    pub room_count: i32,
    pub is_occupied: bool,
    pub floor: i32,
    pub sleeping_places: i32,
    pub room_type: RoomType,
    pub need_cleaning: bool,
}

impl Room {
    pub(crate) fn apply(&mut self, changes: &RoomChanges) {
        if let Some(room_count) = changes.room_count {
            self.room_count = room_count;
        }
        if let Some(is_occupied) = changes.is_occupied {
            self.is_occupied = is_occupied;
        }
        if let Some(floor) = changes.floor {
            self.floor = floor;
        }
        if let Some(sleeping_places) = changes.sleeping_places {
            self.sleeping_places = sleeping_places;
        }
        if let Some(room_type) = changes.room_type {
            self.room_type = room_type;
        }
        if let Some(need_cleaning) = changes.need_cleaning {
            self.need_cleaning = need_cleaning;
        }
    }
}

/// Request body for adding a room.
///
/// `room_type` stays a string here so an unknown type is reported as a
/// validation failure rather than a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_create_occupancy"))]
pub struct CreateRoom {
    #[validate(range(min = 1, message = "number must be more than 0"))]
    #[schema(example = 101)]
    pub number: i32,
    #[validate(range(min = 1, message = "room_count must be more than 0"))]
    #[schema(example = 1)]
    pub room_count: i32,
    #[serde(default)]
    pub is_occupied: bool,
    #[validate(range(
        min = 1,
        message = "there are no underground floors, floor must be more than 0"
    ))]
    #[schema(example = 1)]
    pub floor: i32,
    #[validate(range(min = 1, message = "sleeping_places must be more than 0"))]
    #[schema(example = 2)]
    pub sleeping_places: i32,
    #[validate(custom(function = "validate_room_type"))]
    #[schema(example = "Standard")]
    pub room_type: String,
    #[serde(default)]
    pub need_cleaning: bool,
}

/// Partial update; absent fields are left untouched in storage.
///
/// `number` is the business key and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_patch_occupancy"))]
pub struct RoomPatch {
    #[validate(range(min = 1, message = "room_count must be more than 0"))]
    pub room_count: Option<i32>,
    pub is_occupied: Option<bool>,
    #[validate(range(min = 1, message = "floor must be more than 0"))]
    pub floor: Option<i32>,
    #[validate(range(min = 1, message = "sleeping_places must be more than 0"))]
    pub sleeping_places: Option<i32>,
    #[validate(custom(function = "validate_room_type"))]
    pub room_type: Option<String>,
    pub need_cleaning: Option<bool>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.room_count.is_none()
            && self.is_occupied.is_none()
            && self.floor.is_none()
            && self.sleeping_places.is_none()
            && self.room_type.is_none()
            && self.need_cleaning.is_none()
    }
}

fn parse_room_type(raw: &str) -> Result<RoomType, RoomError> {
    RoomType::from_str(raw).map_err(|_| RoomError::Validation(ROOM_TYPE_MESSAGE.to_string()))
}

/// A validated [`CreateRoom`] as handed to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub number: i32,
    pub room_count: i32,
    pub is_occupied: bool,
    pub floor: i32,
    pub sleeping_places: i32,
    pub room_type: RoomType,
    pub need_cleaning: bool,
}

impl TryFrom<CreateRoom> for NewRoom {
    type Error = RoomError;

    fn try_from(input: CreateRoom) -> Result<Self, Self::Error> {
        Ok(Self {
            number: input.number,
            room_count: input.room_count,
            is_occupied: input.is_occupied,
            floor: input.floor,
            sleeping_places: input.sleeping_places,
            room_type: parse_room_type(&input.room_type)?,
            need_cleaning: input.need_cleaning,
        })
    }
}

/// A validated [`RoomPatch`]; only `Some` columns are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomChanges {
    pub room_count: Option<i32>,
    pub is_occupied: Option<bool>,
    pub floor: Option<i32>,
    pub sleeping_places: Option<i32>,
    pub room_type: Option<RoomType>,
    pub need_cleaning: Option<bool>,
}

impl TryFrom<RoomPatch> for RoomChanges {
    type Error = RoomError;

    fn try_from(patch: RoomPatch) -> Result<Self, Self::Error> {
        Ok(Self {
            room_count: patch.room_count,
            is_occupied: patch.is_occupied,
            floor: patch.floor,
            sleeping_places: patch.sleeping_places,
            room_type: patch.room_type.as_deref().map(parse_room_type).transpose()?,
            need_cleaning: patch.need_cleaning,
        })
    }
}

/// One `column = value` lookup from a filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCriterion {
    Id(i32),
    Number(i32),
    RoomCount(i32),
    IsOccupied(bool),
    Floor(i32),
    SleepingPlaces(i32),
    RoomType(RoomType),
    NeedCleaning(bool),
}

impl RoomCriterion {
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "number",
        "room_count",
        "is_occupied",
        "floor",
        "sleeping_places",
        "room_type",
        "need_cleaning",
    ];

    pub fn parse(column: &str, value: &Value) -> Result<Self, FilterError> {
        filter::ensure_column(column, Self::COLUMNS)?;

        let criterion = match column {
            "id" => Self::Id(filter::int_value(column, value)?),
            "number" => Self::Number(filter::int_value(column, value)?),
            "room_count" => Self::RoomCount(filter::int_value(column, value)?),
            "is_occupied" => Self::IsOccupied(filter::bool_value(column, value)?),
            "floor" => Self::Floor(filter::int_value(column, value)?),
            "sleeping_places" => Self::SleepingPlaces(filter::int_value(column, value)?),
            "room_type" => {
                let raw = filter::text_value(column, value)?;
                Self::RoomType(RoomType::from_str(raw).map_err(|_| FilterError::WrongType {
                    column: column.to_string(),
                    expected: "one of Standard, Deluxe, Suite",
                })?)
            }
            _ => Self::NeedCleaning(filter::bool_value(column, value)?),
        };

        Ok(criterion)
    }

    pub fn matches(&self, room: &Room) -> bool {
        match *self {
            Self::Id(id) => room.id == id,
            Self::Number(number) => room.number == number,
            Self::RoomCount(count) => room.room_count == count,
            Self::IsOccupied(occupied) => room.is_occupied == occupied,
            Self::Floor(floor) => room.floor == floor,
            Self::SleepingPlaces(places) => room.sleeping_places == places,
            Self::RoomType(room_type) => room.room_type == room_type,
            Self::NeedCleaning(need) => room.need_cleaning == need,
        }
    }
}

/// Body of a successful patch.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatchStatus {
    #[schema(example = "room updated")]
    pub status: String,
}

/// Answer of `POST /filter`: every room for an empty filter, otherwise the
/// matching ids per column.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RoomFilterResult {
    All(Vec<Room>),
    Matches(BTreeMap<String, Vec<i32>>),
}
