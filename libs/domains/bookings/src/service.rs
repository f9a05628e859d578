use database::{ColumnFilter, FilterMatches};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{BookingError, BookingResult};
use crate::models::{Booking, BookingCriterion, BookingFields, BookingPatch, CreateBooking};
use crate::policy::PrecheckPolicy;
use crate::repository::BookingRepository;

fn ensure_id(id: i32) -> BookingResult<()> {
    if id <= 0 {
        return Err(BookingError::Validation("id must be more than 0".to_string()));
    }
    Ok(())
}

fn validated(input: CreateBooking) -> BookingResult<BookingFields> {
    input
        .validate()
        .map_err(|e| BookingError::Validation(e.to_string()))?;
    BookingFields::try_from(input)
}

/// Booking usecases: validation and availability checks in front of storage.
#[derive(Clone)]
pub struct BookingService<R: BookingRepository> {
    repository: Arc<R>,
    precheck_policy: PrecheckPolicy,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            precheck_policy: PrecheckPolicy::default(),
        }
    }

    pub fn with_precheck_policy(mut self, policy: PrecheckPolicy) -> Self {
        self.precheck_policy = policy;
        self
    }

    pub fn precheck_policy(&self) -> PrecheckPolicy {
        self.precheck_policy
    }

    /// Apply the precheck policy to the outcome of a read.
    fn precheck<T: Default>(&self, what: &'static str, result: BookingResult<T>) -> BookingResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if self.precheck_policy == PrecheckPolicy::FailOpen => {
                tracing::warn!(check = what, error = %err, "Precheck failed, continuing");
                Ok(T::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Validate, make sure neither the guest nor the room is already held,
    /// then insert.
    #[instrument(skip(self, input), fields(room_id = input.room_id, guest_id = input.guest_id))]
    pub async fn create_booking(&self, input: CreateBooking) -> BookingResult<Booking> {
        let fields = validated(input)?;

        let guest_busy = self.precheck(
            "guest_active_booking",
            self.repository.has_active_for_guest(fields.guest_id).await,
        )?;
        if guest_busy {
            return Err(BookingError::Validation(
                "already have active booking with this guest_id".to_string(),
            ));
        }

        let room_busy = self.precheck(
            "room_active_booking",
            self.repository.has_active_for_room(fields.room_id).await,
        )?;
        if room_busy {
            return Err(BookingError::Validation(
                "already have active booking in this room_id".to_string(),
            ));
        }

        self.repository.create(fields).await
    }

    #[instrument(skip(self))]
    pub async fn read_by_id(&self, id: i32) -> BookingResult<Booking> {
        ensure_id(id)?;

        self.precheck("read_booking", self.repository.get_by_id(id).await)?
            .ok_or_else(|| BookingError::Validation("no rows".to_string()))
    }

    /// Merge the patch over the stored booking, re-validate the result and
    /// write every column back.
    ///
    /// A booking that does not exist is `NotFound`. Moving an active booking
    /// onto a guest or room that already holds one is a `Conflict` from
    /// storage.
    #[instrument(skip(self, patch), fields(id = ?patch.id))]
    pub async fn patch_by_id(&self, patch: BookingPatch) -> BookingResult<Booking> {
        let id = match patch.id {
            Some(id) if id > 0 => id,
            _ => return Err(BookingError::Validation("id must be more than 0".to_string())),
        };

        let current = match self.repository.get_by_id(id).await {
            Ok(Some(booking)) => Some(booking),
            Ok(None) => return Err(BookingError::NotFound(id)),
            Err(err) => self.precheck("read_before_patch", Err(err))?,
        };

        let fields = validated(patch.merge(current.as_ref()))?;

        let rows = self
            .repository
            .update(id, fields.clone())
            .await
            .map_err(|err| match err {
                BookingError::Database(e) => {
                    BookingError::Internal(format!("DB manipulating error: {e}"))
                }
                other => other,
            })?;

        if rows == 0 {
            return Err(BookingError::NotFound(id));
        }

        Ok(fields.into_booking(id))
    }

    /// All bookings; an empty table is reported as a conflict.
    #[instrument(skip(self))]
    pub async fn get_list(&self) -> BookingResult<Vec<Booking>> {
        let bookings = self.precheck("list_bookings", self.repository.list().await)?;

        if bookings.is_empty() {
            return Err(BookingError::Conflict("database is clear".to_string()));
        }

        Ok(bookings)
    }

    #[instrument(skip(self, filter), fields(columns = filter.len()))]
    pub async fn get_filtered_bookings(&self, filter: ColumnFilter) -> BookingResult<FilterMatches> {
        let criteria = filter
            .iter()
            .map(|(column, value)| Ok((column.clone(), BookingCriterion::parse(column, value)?)))
            .collect::<BookingResult<Vec<_>>>()?;

        let mut matches = FilterMatches::new();
        for (column, criterion) in criteria {
            let ids = self.repository.filter(&criterion).await?;
            matches.insert(column, ids);
        }

        Ok(matches)
    }

    #[instrument(skip(self))]
    pub async fn remove_booking(&self, id: i32) -> BookingResult<()> {
        ensure_id(id)?;

        if !self.repository.delete(id).await? {
            return Err(BookingError::NotFound(id));
        }

        Ok(())
    }
}
