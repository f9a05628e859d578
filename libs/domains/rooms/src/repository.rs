use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{RoomError, RoomResult};
use crate::models::{NewRoom, OCCUPIED_CLEANING_MESSAGE, Room, RoomChanges, RoomCriterion};

/// Storage operations the room service relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a room; storage assigns the id.
    async fn create(&self, input: NewRoom) -> RoomResult<Room>;

    async fn exists_by_number(&self, number: i32) -> RoomResult<bool>;

    /// All rooms ordered by id.
    async fn list(&self) -> RoomResult<Vec<Room>>;

    /// Ids of the rooms matching a single column criterion.
    async fn filter(&self, criterion: &RoomCriterion) -> RoomResult<Vec<i32>>;

    /// Write the supplied columns, returning the number of rows affected.
    async fn patch(&self, id: i32, changes: RoomChanges) -> RoomResult<u64>;

    async fn delete(&self, id: i32) -> RoomResult<bool>;

    /// `None` when no room has this id.
    async fn is_occupied(&self, id: i32) -> RoomResult<Option<bool>>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    rooms: BTreeMap<i32, Room>,
}

/// In-memory [`RoomRepository`] for development and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRoomRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, input: NewRoom) -> RoomResult<Room> {
        let mut store = self.store.write().await;

        // The service checked already; this closes the race between two adds.
        if store.rooms.values().any(|r| r.number == input.number) {
            return Err(RoomError::Conflict(format!(
                "room number {} already exists",
                input.number
            )));
        }

        store.next_id += 1;
        let room = Room {
            id: store.next_id,
            number: input.number,
            room_count: input.room_count,
            is_occupied: input.is_occupied,
            floor: input.floor,
            sleeping_places: input.sleeping_places,
            room_type: input.room_type,
            need_cleaning: input.need_cleaning,
        };
        store.rooms.insert(room.id, room.clone());

        tracing::info!(room_id = room.id, number = room.number, "Created room");
        Ok(room)
    }

    async fn exists_by_number(&self, number: i32) -> RoomResult<bool> {
        let store = self.store.read().await;
        Ok(store.rooms.values().any(|r| r.number == number))
    }

    async fn list(&self) -> RoomResult<Vec<Room>> {
        let store = self.store.read().await;
        Ok(store.rooms.values().cloned().collect())
    }

    async fn filter(&self, criterion: &RoomCriterion) -> RoomResult<Vec<i32>> {
        let store = self.store.read().await;
        Ok(store
            .rooms
            .values()
            .filter(|room| criterion.matches(room))
            .map(|room| room.id)
            .collect())
    }

    async fn patch(&self, id: i32, changes: RoomChanges) -> RoomResult<u64> {
        let mut store = self.store.write().await;

        let Some(room) = store.rooms.get_mut(&id) else {
            return Ok(0);
        };

        // A patch may touch only one of the two flags; check the merged row.
        let mut patched = room.clone();
        patched.apply(&changes);
        if patched.is_occupied && patched.need_cleaning {
            return Err(RoomError::Validation(OCCUPIED_CLEANING_MESSAGE.to_string()));
        }

        *room = patched;
        tracing::info!(room_id = id, "Patched room");
        Ok(1)
    }

    async fn delete(&self, id: i32) -> RoomResult<bool> {
        let mut store = self.store.write().await;

        if store.rooms.remove(&id).is_some() {
            tracing::info!(room_id = id, "Deleted room");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn is_occupied(&self, id: i32) -> RoomResult<Option<bool>> {
        let store = self.store.read().await;
        Ok(store.rooms.get(&id).map(|r| r.is_occupied))
    }
}
