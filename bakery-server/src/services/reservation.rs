//! Table reservations
//!
//! A table holds at most one active reservation per UTC calendar day. The
//! availability check and the write share one SERIALIZABLE transaction, and
//! a serialization failure is retried once.

use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DiningTable, NewReservation, Reservation, ReservationCreate, ReservationStatus,
    ReservationUpdate,
};
use shared::response::{PageMeta, PageParams};
use shared::util::utc_day_bounds;

use super::{ensure_visible, page_window, scope};
use crate::auth::CurrentCustomer;
use crate::db::{StoreError, StoreTx};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, validate_min_i32, validate_optional_text};

const SERIALIZATION_ATTEMPTS: usize = 2;

fn ensure_future(reserve_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if reserve_date <= now {
        return Err(AppError::new(ErrorCode::ReservationInPast)
            .with_detail("field", "reserve_date"));
    }
    Ok(())
}

/// Lock `table_id` and check it can take `guest_count` guests on the day of
/// `reserve_date`, ignoring reservation `exclude`.
async fn check_availability(
    tx: &mut Box<dyn StoreTx>,
    table_id: i64,
    guest_count: i32,
    reserve_date: DateTime<Utc>,
    exclude: Option<i64>,
) -> ServiceResult<DiningTable> {
    let table = tx
        .table_for_update(table_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;

    if !table.is_available {
        return Err(
            AppError::with_message(ErrorCode::TableUnavailable, "Table is not taking bookings")
                .with_detail("table_id", table_id)
                .into(),
        );
    }
    if guest_count > table.capacity {
        return Err(AppError::new(ErrorCode::GuestCountExceedsCapacity)
            .with_detail("capacity", table.capacity)
            .into());
    }

    let (from, until) = utc_day_bounds(reserve_date);
    if tx
        .has_active_reservation(table_id, from, until, exclude)
        .await?
    {
        tracing::info!(table_id, day = %from.date_naive(), "Table already booked for the day");
        return Err(AppError::new(ErrorCode::TableUnavailable)
            .with_detail("table_id", table_id)
            .into());
    }
    Ok(table)
}

fn is_serialization_failure(e: &ServiceError) -> bool {
    matches!(e, ServiceError::Store(StoreError::Serialization))
}

pub async fn create(
    state: &AppState,
    who: &CurrentCustomer,
    req: ReservationCreate,
) -> ServiceResult<Reservation> {
    validate_min_i32(req.guest_count, "guest_count", 1)?;
    validate_optional_text(&req.special_notes, "special_notes", MAX_NOTE_LEN)?;
    ensure_future(req.reserve_date, state.clock.now())?;

    let mut attempt = 1;
    loop {
        match try_create(state, who, &req).await {
            Err(e) if is_serialization_failure(&e) && attempt < SERIALIZATION_ATTEMPTS => {
                tracing::warn!(
                    table_id = req.table_id,
                    attempt,
                    "Reservation serialization conflict, retrying"
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_create(
    state: &AppState,
    who: &CurrentCustomer,
    req: &ReservationCreate,
) -> ServiceResult<Reservation> {
    let now = state.clock.now_millis();
    let mut tx = state.store.begin_serializable().await?;
    let table =
        check_availability(&mut tx, req.table_id, req.guest_count, req.reserve_date, None).await?;

    let data = NewReservation {
        customer_id: who.id,
        table_id: table.id,
        table_number: table.table_number,
        guest_count: req.guest_count,
        reserve_date: req.reserve_date,
        special_notes: req.special_notes.clone(),
    };
    let reservation = tx.insert_reservation(&data, now).await?;
    tx.commit().await?;

    tracing::info!(
        reservation_id = reservation.id,
        table_id = table.id,
        customer_id = who.id,
        reserve_date = %reservation.reserve_date,
        "Reservation created"
    );
    Ok(reservation)
}

pub async fn get(state: &AppState, who: &CurrentCustomer, id: i64) -> ServiceResult<Reservation> {
    let reservation = state
        .store
        .reservation_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    ensure_visible(who, reservation.customer_id, AppError::new(ErrorCode::ReservationNotFound))?;
    Ok(reservation)
}

pub async fn list(
    state: &AppState,
    who: &CurrentCustomer,
    params: PageParams,
) -> ServiceResult<(Vec<Reservation>, PageMeta)> {
    let (rows, total) = state
        .store
        .list_reservations(scope(who), page_window(&params))
        .await?;
    Ok((rows, params.meta(total)))
}

pub async fn update(
    state: &AppState,
    who: &CurrentCustomer,
    id: i64,
    req: ReservationUpdate,
) -> ServiceResult<Reservation> {
    if let Some(count) = req.guest_count {
        validate_min_i32(count, "guest_count", 1)?;
    }
    validate_optional_text(&req.special_notes, "special_notes", MAX_NOTE_LEN)?;
    if let Some(date) = req.reserve_date {
        ensure_future(date, state.clock.now())?;
    }
    if let Some(status) = req.status
        && !who.is_admin()
        && status != ReservationStatus::Cancelled
    {
        return Err(AppError::with_message(
            ErrorCode::AdminRequired,
            format!("Only staff can mark a reservation {status}"),
        )
        .into());
    }

    let mut attempt = 1;
    loop {
        match try_update(state, who, id, &req).await {
            Err(e) if is_serialization_failure(&e) && attempt < SERIALIZATION_ATTEMPTS => {
                tracing::warn!(
                    reservation_id = id,
                    attempt,
                    "Reservation serialization conflict, retrying"
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}

async fn try_update(
    state: &AppState,
    who: &CurrentCustomer,
    id: i64,
    req: &ReservationUpdate,
) -> ServiceResult<Reservation> {
    let now = state.clock.now_millis();
    let mut tx = state.store.begin_serializable().await?;
    let current = tx
        .reservation_for_update(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    ensure_visible(who, current.customer_id, AppError::new(ErrorCode::ReservationNotFound))?;

    let mut next = current.clone();

    if let Some(status) = req.status
        && status != current.status
    {
        if !current.status.can_transition_to(status) {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot move reservation from {} to {}", current.status, status),
            )
            .into());
        }
        next.status = status;
    }

    let moved = req.table_id.is_some_and(|t| Some(t) != current.table_id)
        || req.reserve_date.is_some_and(|d| d != current.reserve_date);
    let resized = req.guest_count.is_some_and(|g| g != current.guest_count);

    if (moved || resized) && !current.status.is_active() {
        return Err(AppError::with_message(
            ErrorCode::InvalidTransition,
            format!("Reservation is {} and can no longer be changed", current.status),
        )
        .into());
    }

    if let Some(date) = req.reserve_date {
        next.reserve_date = date;
    }
    if let Some(count) = req.guest_count {
        next.guest_count = count;
    }
    if let Some(notes) = &req.special_notes {
        next.special_notes = Some(notes.clone());
    }
    if let Some(table_id) = req.table_id {
        next.table_id = Some(table_id);
    }

    if (moved || resized) && next.status.is_active() {
        let Some(table_id) = next.table_id else {
            return Err(AppError::new(ErrorCode::TableNotFound).into());
        };
        if moved {
            let table =
                check_availability(&mut tx, table_id, next.guest_count, next.reserve_date, Some(id))
                    .await?;
            next.table_number = table.table_number;
        } else {
            let table = tx
                .table_for_update(table_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;
            if next.guest_count > table.capacity {
                return Err(AppError::new(ErrorCode::GuestCountExceedsCapacity)
                    .with_detail("capacity", table.capacity)
                    .into());
            }
        }
    }

    let saved = tx.update_reservation(&next, now).await?;
    tx.commit().await?;

    if saved.status != current.status {
        tracing::info!(
            reservation_id = id,
            from = %current.status,
            to = %saved.status,
            "Reservation status updated"
        );
    }
    Ok(saved)
}

pub async fn delete(state: &AppState, who: &CurrentCustomer, id: i64) -> ServiceResult<()> {
    let now = state.clock.now_millis();
    let mut tx = state.store.begin().await?;
    let current = tx
        .reservation_for_update(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    ensure_visible(who, current.customer_id, AppError::new(ErrorCode::ReservationNotFound))?;
    tx.soft_delete_reservation(id, now).await?;
    tx.commit().await?;
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_reserve_date_must_be_strictly_future() {
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        assert!(ensure_future(now + Duration::seconds(1), now).is_ok());
        assert_eq!(
            ensure_future(now, now).unwrap_err().code,
            ErrorCode::ReservationInPast
        );
        assert!(ensure_future(now - Duration::days(1), now).is_err());
    }
}
