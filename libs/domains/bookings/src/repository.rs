use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingCriterion, BookingFields};

/// Storage operations the booking service relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, fields: BookingFields) -> BookingResult<Booking>;

    /// Whether the guest holds a `confirmed` or `checked_in` booking.
    async fn has_active_for_guest(&self, guest_id: i32) -> BookingResult<bool>;

    /// Whether the room is held by a `confirmed` or `checked_in` booking.
    async fn has_active_for_room(&self, room_id: i32) -> BookingResult<bool>;

    async fn get_by_id(&self, id: i32) -> BookingResult<Option<Booking>>;

    /// Overwrite every column, returning the number of rows affected.
    async fn update(&self, id: i32, fields: BookingFields) -> BookingResult<u64>;

    /// All bookings ordered by id.
    async fn list(&self) -> BookingResult<Vec<Booking>>;

    async fn filter(&self, criterion: &BookingCriterion) -> BookingResult<Vec<i32>>;

    async fn delete(&self, id: i32) -> BookingResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    bookings: BTreeMap<i32, Booking>,
}

impl Store {
    fn active_for_guest(&self, guest_id: i32) -> bool {
        self.bookings
            .values()
            .any(|b| b.guest_id == guest_id && b.status.is_active())
    }

    fn active_for_room(&self, room_id: i32) -> bool {
        self.bookings
            .values()
            .any(|b| b.room_id == room_id && b.status.is_active())
    }

    /// Whether writing `fields` as booking `id` (`None` for a new one) would
    /// give its guest or room a second active booking.
    fn clashes(&self, id: Option<i32>, fields: &BookingFields) -> bool {
        fields.status.is_active()
            && self.bookings.values().any(|b| {
                Some(b.id) != id
                    && b.status.is_active()
                    && (b.guest_id == fields.guest_id || b.room_id == fields.room_id)
            })
    }
}

pub(crate) fn active_clash() -> BookingError {
    BookingError::Conflict("an active booking already exists for this guest or room".to_string())
}

/// In-memory [`BookingRepository`] for development and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, fields: BookingFields) -> BookingResult<Booking> {
        let mut store = self.store.write().await;

        // Same guarantees as the partial unique indexes in PostgreSQL.
        if store.clashes(None, &fields) {
            return Err(active_clash());
        }

        store.next_id += 1;
        let booking = fields.into_booking(store.next_id);
        store.bookings.insert(booking.id, booking.clone());

        tracing::info!(
            booking_id = booking.id,
            room_id = booking.room_id,
            guest_id = booking.guest_id,
            "Created booking"
        );
        Ok(booking)
    }

    async fn has_active_for_guest(&self, guest_id: i32) -> BookingResult<bool> {
        Ok(self.store.read().await.active_for_guest(guest_id))
    }

    async fn has_active_for_room(&self, room_id: i32) -> BookingResult<bool> {
        Ok(self.store.read().await.active_for_room(room_id))
    }

    async fn get_by_id(&self, id: i32) -> BookingResult<Option<Booking>> {
        Ok(self.store.read().await.bookings.get(&id).cloned())
    }

    async fn update(&self, id: i32, fields: BookingFields) -> BookingResult<u64> {
        let mut store = self.store.write().await;

        if !store.bookings.contains_key(&id) {
            return Ok(0);
        }
        if store.clashes(Some(id), &fields) {
            return Err(active_clash());
        }

        store.bookings.insert(id, fields.into_booking(id));
        tracing::info!(booking_id = id, "Updated booking");
        Ok(1)
    }

    async fn list(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.store.read().await.bookings.values().cloned().collect())
    }

    async fn filter(&self, criterion: &BookingCriterion) -> BookingResult<Vec<i32>> {
        let store = self.store.read().await;
        Ok(store
            .bookings
            .values()
            .filter(|b| criterion.matches(b))
            .map(|b| b.id)
            .collect())
    }

    async fn delete(&self, id: i32) -> BookingResult<bool> {
        let mut store = self.store.write().await;

        if store.bookings.remove(&id).is_some() {
            tracing::info!(booking_id = id, "Deleted booking");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn fields(room_id: i32, guest_id: i32, status: BookingStatus) -> BookingFields {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap();
        BookingFields {
            room_id,
            guest_id,
            start_date: start,
            end_date: start + Duration::days(2),
            status,
        }
    }

    #[tokio::test]
    async fn test_active_checks_ignore_inactive_statuses() {
        let repo = InMemoryBookingRepository::new();
        repo.create(fields(1, 10, BookingStatus::Cancelled)).await.unwrap();
        repo.create(fields(2, 20, BookingStatus::CheckedIn)).await.unwrap();

        assert!(!repo.has_active_for_guest(10).await.unwrap());
        assert!(!repo.has_active_for_room(1).await.unwrap());
        assert!(repo.has_active_for_guest(20).await.unwrap());
        assert!(repo.has_active_for_room(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_active_booking_for_room_is_conflict() {
        let repo = InMemoryBookingRepository::new();
        repo.create(fields(1, 10, BookingStatus::Confirmed)).await.unwrap();

        let result = repo.create(fields(1, 11, BookingStatus::Confirmed)).await;
        assert!(matches!(result, Err(BookingError::Conflict(_))));

        // Inactive bookings never clash.
        repo.create(fields(1, 11, BookingStatus::Pending)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_replaces_whole_record() {
        let repo = InMemoryBookingRepository::new();
        let booking = repo.create(fields(1, 10, BookingStatus::Confirmed)).await.unwrap();

        let rows = repo
            .update(booking.id, fields(3, 10, BookingStatus::Completed))
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = repo.get_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(stored.room_id, 3);
        assert_eq!(stored.status, BookingStatus::Completed);
        assert_eq!(repo.update(99, fields(3, 10, BookingStatus::Completed)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_onto_held_room_or_guest_is_conflict() {
        let repo = InMemoryBookingRepository::new();
        let first = repo.create(fields(1, 10, BookingStatus::Confirmed)).await.unwrap();
        let second = repo.create(fields(2, 20, BookingStatus::Confirmed)).await.unwrap();

        let onto_room = repo
            .update(second.id, fields(1, 20, BookingStatus::Confirmed))
            .await;
        assert!(matches!(onto_room, Err(BookingError::Conflict(_))));

        let onto_guest = repo
            .update(second.id, fields(2, 10, BookingStatus::CheckedIn))
            .await;
        assert!(matches!(onto_guest, Err(BookingError::Conflict(_))));

        let stored = repo.get_by_id(second.id).await.unwrap().unwrap();
        assert_eq!((stored.room_id, stored.guest_id), (2, 20));

        // A booking never clashes with itself, and inactive ones never clash.
        assert_eq!(
            repo.update(first.id, fields(1, 10, BookingStatus::CheckedIn)).await.unwrap(),
            1
        );
        assert_eq!(
            repo.update(second.id, fields(1, 20, BookingStatus::Cancelled)).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_filter_and_delete() {
        let repo = InMemoryBookingRepository::new();
        let first = repo.create(fields(1, 10, BookingStatus::Confirmed)).await.unwrap();
        repo.create(fields(2, 20, BookingStatus::Pending)).await.unwrap();

        let ids = repo.filter(&BookingCriterion::GuestId(10)).await.unwrap();
        assert_eq!(ids, vec![first.id]);

        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
