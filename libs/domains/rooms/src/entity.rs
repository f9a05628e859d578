use crate::models::{NewRoom, Room, RoomChanges, RoomType};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: i32,
    pub room_count: i32,
    pub is_occupied: bool,
    pub floor: i32,
    pub sleeping_places: i32,
    pub room_type: RoomType,
    pub need_cleaning: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const URL: &'static str = "/rooms";
    pub const TAG: &'static str = "rooms";
}

impl From<Model> for Room {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
            room_count: model.room_count,
            is_occupied: model.is_occupied,
            floor: model.floor,
            sleeping_places: model.sleeping_places,
            room_type: model.room_type,
            need_cleaning: model.need_cleaning,
        }
    }
}

impl From<NewRoom> for ActiveModel {
    fn from(input: NewRoom) -> Self {
        ActiveModel {
            id: NotSet,
            number: Set(input.number),
            room_count: Set(input.room_count),
            is_occupied: Set(input.is_occupied),
            floor: Set(input.floor),
            sleeping_places: Set(input.sleeping_places),
            room_type: Set(input.room_type),
            need_cleaning: Set(input.need_cleaning),
        }
    }
}

/// Only the supplied columns are `Set`; everything else stays `NotSet` and is
/// left out of the `UPDATE`.
impl From<RoomChanges> for ActiveModel {
    fn from(changes: RoomChanges) -> Self {
        ActiveModel {
            id: NotSet,
            number: NotSet,
            room_count: changes.room_count.map_or(NotSet, Set),
            is_occupied: changes.is_occupied.map_or(NotSet, Set),
            floor: changes.floor.map_or(NotSet, Set),
            sleeping_places: changes.sleeping_places.map_or(NotSet, Set),
            room_type: changes.room_type.map_or(NotSet, Set),
            need_cleaning: changes.need_cleaning.map_or(NotSet, Set),
        }
    }
}
