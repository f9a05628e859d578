use database::{ColumnFilter, FilterMatches};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{RoomError, RoomResult};
use crate::models::{CreateRoom, NewRoom, Room, RoomChanges, RoomCriterion, RoomPatch};
use crate::repository::RoomRepository;

fn ensure_id(id: i32) -> RoomResult<()> {
    if id <= 0 {
        return Err(RoomError::Validation("id must be more than 0".to_string()));
    }
    Ok(())
}

/// Room usecases: validation and invariant checks in front of storage.
#[derive(Clone)]
pub struct RoomService<R: RoomRepository> {
    repository: Arc<R>,
}

impl<R: RoomRepository> RoomService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate, reject duplicate numbers, then insert.
    #[instrument(skip(self, input), fields(number = input.number))]
    pub async fn add_room(&self, input: CreateRoom) -> RoomResult<Room> {
        input
            .validate()
            .map_err(|e| RoomError::Validation(e.to_string()))?;
        let room = NewRoom::try_from(input)?;

        if self.repository.exists_by_number(room.number).await? {
            return Err(RoomError::Conflict(format!(
                "room number {} already exists",
                room.number
            )));
        }

        self.repository.create(room).await
    }

    /// Apply only the supplied fields. An empty patch succeeds without
    /// touching storage.
    #[instrument(skip(self, patch))]
    pub async fn patch_room(&self, id: i32, patch: RoomPatch) -> RoomResult<()> {
        ensure_id(id)?;

        if patch.is_empty() {
            tracing::debug!("Empty patch, nothing to do");
            return Ok(());
        }

        patch
            .validate()
            .map_err(|e| RoomError::Validation(e.to_string()))?;
        let changes = RoomChanges::try_from(patch)?;

        match self.repository.patch(id, changes).await? {
            0 => Err(RoomError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Occupied rooms cannot be removed.
    #[instrument(skip(self))]
    pub async fn remove_room(&self, id: i32) -> RoomResult<()> {
        ensure_id(id)?;

        match self.repository.is_occupied(id).await? {
            None => return Err(RoomError::NotFound(id)),
            Some(true) => return Err(RoomError::Validation("room is occupied".to_string())),
            Some(false) => {}
        }

        if !self.repository.delete(id).await? {
            return Err(RoomError::NotFound(id));
        }

        Ok(())
    }

    /// All rooms; an empty table is reported as a conflict.
    #[instrument(skip(self))]
    pub async fn get_list(&self) -> RoomResult<Vec<Room>> {
        let rooms = self.repository.list().await?;

        if rooms.is_empty() {
            return Err(RoomError::Conflict("database is clear".to_string()));
        }

        Ok(rooms)
    }

    /// Each filter column is looked up on its own; the result maps the
    /// column to the ids of matching rooms.
    #[instrument(skip(self, filter), fields(columns = filter.len()))]
    pub async fn get_filtered_rooms(&self, filter: ColumnFilter) -> RoomResult<FilterMatches> {
        let criteria = filter
            .iter()
            .map(|(column, value)| Ok((column.clone(), RoomCriterion::parse(column, value)?)))
            .collect::<RoomResult<Vec<_>>>()?;

        let mut matches = FilterMatches::new();
        for (column, criterion) in criteria {
            let ids = self.repository.filter(&criterion).await?;
            matches.insert(column, ids);
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomType;
    use crate::repository::MockRoomRepository;
    use axum_helpers::ClassifiedError;
    use mockall::predicate::eq;
    use sea_orm::DbErr;
    use serde_json::json;

    fn create_room() -> CreateRoom {
        CreateRoom {
            number: 1,
            room_count: 1,
            is_occupied: false,
            floor: 1,
            sleeping_places: 1,
            room_type: "Standard".to_string(),
            need_cleaning: false,
        }
    }

    fn stored(id: i32, input: &NewRoom) -> Room {
        Room {
            id,
            number: input.number,
            room_count: input.room_count,
            is_occupied: input.is_occupied,
            floor: input.floor,
            sleeping_places: input.sleeping_places,
            room_type: input.room_type,
            need_cleaning: input.need_cleaning,
        }
    }

    #[tokio::test]
    async fn test_add_room_creates_once() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo
            .expect_exists_by_number()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .withf(|room| room.number == 1 && room.room_type == RoomType::Standard)
            .times(1)
            .returning(|room| Ok(stored(7, &room)));

        let service = RoomService::new(mock_repo);
        let room = service.add_room(create_room()).await.unwrap();

        assert_eq!(room.id, 7);
        assert_eq!(room.number, 1);
    }

    #[tokio::test]
    async fn test_add_room_duplicate_number_is_conflict() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_exists_by_number().returning(|_| Ok(true));
        mock_repo.expect_create().never();

        let service = RoomService::new(mock_repo);
        let err = service.add_room(create_room()).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_add_room_invalid_type_never_reaches_storage() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_exists_by_number().never();
        mock_repo.expect_create().never();

        let service = RoomService::new(mock_repo);
        let input = CreateRoom {
            room_type: "Presidential".to_string(),
            ..create_room()
        };
        let err = service.add_room(input).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("Standard, Deluxe, Suite"));
    }

    #[tokio::test]
    async fn test_add_room_occupied_and_cleaning_is_validation() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_create().never();

        let service = RoomService::new(mock_repo);
        let input = CreateRoom {
            is_occupied: true,
            need_cleaning: true,
            ..create_room()
        };

        assert!(service.add_room(input).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_add_room_non_positive_fields() {
        let service = RoomService::new(MockRoomRepository::new());

        for input in [
            CreateRoom { number: 0, ..create_room() },
            CreateRoom { room_count: 0, ..create_room() },
            CreateRoom { floor: -1, ..create_room() },
            CreateRoom { sleeping_places: 0, ..create_room() },
        ] {
            assert!(service.add_room(input).await.unwrap_err().is_validation());
        }
    }

    #[tokio::test]
    async fn test_add_room_storage_error_propagates() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo
            .expect_exists_by_number()
            .returning(|_| Err(RoomError::Database(DbErr::Custom("down".into()))));

        let service = RoomService::new(mock_repo);
        let err = service.add_room(create_room()).await.unwrap_err();

        assert!(matches!(err, RoomError::Database(_)));
    }

    #[tokio::test]
    async fn test_patch_room_sends_only_supplied_fields() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo
            .expect_patch()
            .with(
                eq(1),
                eq(RoomChanges {
                    floor: Some(2),
                    ..Default::default()
                }),
            )
            .times(1)
            .returning(|_, _| Ok(1));

        let service = RoomService::new(mock_repo);
        let patch = RoomPatch {
            floor: Some(2),
            ..Default::default()
        };

        service.patch_room(1, patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_patch_skips_storage() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_patch().never();

        let service = RoomService::new(mock_repo);
        service.patch_room(3, RoomPatch::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_patch_room_rejects_bad_id_and_fields() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_patch().never();
        let service = RoomService::new(mock_repo);

        let floor = RoomPatch {
            floor: Some(2),
            ..Default::default()
        };
        assert!(service.patch_room(0, floor).await.unwrap_err().is_validation());

        let bad_type = RoomPatch {
            room_type: Some("Loft".to_string()),
            ..Default::default()
        };
        assert!(service.patch_room(1, bad_type).await.unwrap_err().is_validation());

        let both = RoomPatch {
            is_occupied: Some(true),
            need_cleaning: Some(true),
            ..Default::default()
        };
        assert!(service.patch_room(1, both).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_patch_missing_room_is_not_found() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_patch().returning(|_, _| Ok(0));

        let service = RoomService::new(mock_repo);
        let patch = RoomPatch {
            need_cleaning: Some(false),
            ..Default::default()
        };

        assert!(service.patch_room(42, patch).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remove_occupied_room_never_deletes() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo
            .expect_is_occupied()
            .with(eq(5))
            .returning(|_| Ok(Some(true)));
        mock_repo.expect_delete().never();

        let service = RoomService::new(mock_repo);
        let err = service.remove_room(5).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "room is occupied");
    }

    #[tokio::test]
    async fn test_remove_free_room() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_is_occupied().returning(|_| Ok(Some(false)));
        mock_repo
            .expect_delete()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(true));

        let service = RoomService::new(mock_repo);
        service.remove_room(5).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_missing_room_is_not_found() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_is_occupied().returning(|_| Ok(None));
        mock_repo.expect_delete().never();

        let service = RoomService::new(mock_repo);
        assert!(service.remove_room(5).await.unwrap_err().is_not_found());
        assert!(service.remove_room(-5).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_empty_list_is_conflict() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_list().returning(|| Ok(vec![]));

        let service = RoomService::new(mock_repo);
        let err = service.get_list().await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "database is clear");
    }

    #[tokio::test]
    async fn test_filter_is_keyed_by_column() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo
            .expect_filter()
            .with(eq(RoomCriterion::Floor(2)))
            .returning(|_| Ok(vec![3, 4]));
        mock_repo
            .expect_filter()
            .with(eq(RoomCriterion::IsOccupied(true)))
            .returning(|_| Ok(vec![4]));

        let service = RoomService::new(mock_repo);
        let filter = ColumnFilter::from([
            ("floor".to_string(), json!(2)),
            ("is_occupied".to_string(), json!(true)),
        ]);
        let matches = service.get_filtered_rooms(filter).await.unwrap();

        assert_eq!(matches["floor"], vec![3, 4]);
        assert_eq!(matches["is_occupied"], vec![4]);
    }

    #[tokio::test]
    async fn test_filter_unknown_column_is_validation() {
        let mut mock_repo = MockRoomRepository::new();
        mock_repo.expect_filter().never();

        let service = RoomService::new(mock_repo);
        let filter = ColumnFilter::from([
            ("floor".to_string(), json!(2)),
            ("price".to_string(), json!(100)),
        ]);

        assert!(service.get_filtered_rooms(filter).await.unwrap_err().is_validation());
    }
}
