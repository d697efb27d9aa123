//! Table reservations: per-day exclusivity, capacity and status rules.

mod common;

use bakery_server::db::Store;
use bakery_server::services::{reservation, table};
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DiningTableUpdate, ReservationCreate, ReservationStatus, ReservationUpdate,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, day, hour, 0, 0).unwrap()
}

fn booking(table_id: i64, guests: i32, when: DateTime<Utc>) -> ReservationCreate {
    ReservationCreate {
        table_id,
        guest_count: guests,
        reserve_date: when,
        special_notes: None,
    }
}

fn code<T: std::fmt::Debug>(r: Result<T, bakery_server::ServiceError>) -> ErrorCode {
    AppError::from(r.unwrap_err()).code
}

#[tokio::test]
async fn test_concurrent_bookings_for_same_table_and_day() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let budi = register(&h.state, "budi@bakery.test").await;
    let table5 = dining_table(&h.state, 5, 4).await;

    let (a, b) = tokio::join!(
        reservation::create(&h.state, &ana, booking(table5.id, 2, at(1, 19))),
        reservation::create(&h.state, &budi, booking(table5.id, 2, at(1, 19))),
    );

    let results = [a, b];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);

    let loser = results.into_iter().find(|r| r.is_err()).unwrap().unwrap_err();
    let loser = AppError::from(loser);
    assert_eq!(loser.code, ErrorCode::TableUnavailable);
    assert_eq!(loser.http_status(), http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_day_is_the_exclusivity_window() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let t = dining_table(&h.state, 5, 4).await;

    let lunch = reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 12)))
        .await
        .unwrap();
    assert_eq!(lunch.status, ReservationStatus::Pending);
    assert_eq!(lunch.table_id, Some(t.id));
    assert_eq!(lunch.table_number, 5);

    // same UTC day, different hour
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 20))).await),
        ErrorCode::TableUnavailable
    );
    // next day is free
    reservation::create(&h.state, &ana, booking(t.id, 2, at(2, 12)))
        .await
        .unwrap();

    // cancelling frees the day again
    reservation::update(
        &h.state,
        &ana,
        lunch.id,
        ReservationUpdate {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 20)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_validation() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let t = dining_table(&h.state, 7, 2).await;

    assert_eq!(
        code(
            reservation::create(&h.state, &ana, booking(t.id, 2, t0() - Duration::hours(1))).await
        ),
        ErrorCode::ReservationInPast
    );
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(t.id, 3, at(1, 19))).await),
        ErrorCode::GuestCountExceedsCapacity
    );
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(t.id, 0, at(1, 19))).await),
        ErrorCode::ValidationFailed
    );
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(9_999, 2, at(1, 19))).await),
        ErrorCode::TableNotFound
    );

    table::update(
        &h.state,
        t.id,
        DiningTableUpdate {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 19))).await),
        ErrorCode::TableUnavailable
    );
}

#[tokio::test]
async fn test_the_clock_decides_what_is_past() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let t = dining_table(&h.state, 5, 4).await;

    h.clock.set(at(1, 20));
    assert_eq!(
        code(reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 19))).await),
        ErrorCode::ReservationInPast
    );
}

#[tokio::test]
async fn test_moving_rechecks_availability() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let budi = register(&h.state, "budi@bakery.test").await;
    let t5 = dining_table(&h.state, 5, 4).await;
    let t6 = dining_table(&h.state, 6, 6).await;

    let mine = reservation::create(&h.state, &ana, booking(t5.id, 2, at(1, 19)))
        .await
        .unwrap();
    reservation::create(&h.state, &budi, booking(t6.id, 2, at(1, 19)))
        .await
        .unwrap();

    // onto a booked table
    let err = reservation::update(
        &h.state,
        &ana,
        mine.id,
        ReservationUpdate {
            table_id: Some(t6.id),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(code(err), ErrorCode::TableUnavailable);

    // later the same day on its own table does not conflict with itself
    let moved = reservation::update(
        &h.state,
        &ana,
        mine.id,
        ReservationUpdate {
            reserve_date: Some(at(1, 21)),
            special_notes: Some("window seat".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.reserve_date, at(1, 21));
    assert_eq!(moved.special_notes.as_deref(), Some("window seat"));

    // more guests than the table holds
    let err = reservation::update(
        &h.state,
        &ana,
        mine.id,
        ReservationUpdate {
            guest_count: Some(5),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(code(err), ErrorCode::GuestCountExceedsCapacity);

    // onto a free table on another day picks up its number
    let moved = reservation::update(
        &h.state,
        &ana,
        mine.id,
        ReservationUpdate {
            table_id: Some(t6.id),
            reserve_date: Some(at(3, 19)),
            guest_count: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.table_number, 6);
    assert_eq!(moved.guest_count, 5);
}

#[tokio::test]
async fn test_status_rules() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let boss = admin(&h).await;
    let t = dining_table(&h.state, 5, 4).await;
    let r = reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 19)))
        .await
        .unwrap();

    let confirm = ReservationUpdate {
        status: Some(ReservationStatus::Confirmed),
        ..Default::default()
    };
    assert_eq!(
        code(reservation::update(&h.state, &ana, r.id, confirm.clone()).await),
        ErrorCode::AdminRequired
    );

    let r = reservation::update(&h.state, &boss, r.id, confirm).await.unwrap();
    assert_eq!(r.status, ReservationStatus::Confirmed);

    let r = reservation::update(
        &h.state,
        &boss,
        r.id,
        ReservationUpdate {
            status: Some(ReservationStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(r.status, ReservationStatus::Completed);

    // completed is terminal
    let err = reservation::update(
        &h.state,
        &ana,
        r.id,
        ReservationUpdate {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(code(err), ErrorCode::InvalidTransition);

    let err = reservation::update(
        &h.state,
        &boss,
        r.id,
        ReservationUpdate {
            reserve_date: Some(at(4, 19)),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(code(err), ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_reservations_are_private() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let budi = register(&h.state, "budi@bakery.test").await;
    let t = dining_table(&h.state, 5, 4).await;
    let r = reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 19)))
        .await
        .unwrap();

    assert_eq!(
        code(reservation::get(&h.state, &budi, r.id).await),
        ErrorCode::ReservationNotFound
    );
    assert_eq!(
        code(reservation::delete(&h.state, &budi, r.id).await),
        ErrorCode::ReservationNotFound
    );

    reservation::delete(&h.state, &ana, r.id).await.unwrap();
    assert!(h.store.reservation_by_id(r.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_table_detaches_reservations() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let t = dining_table(&h.state, 5, 4).await;
    let r = reservation::create(&h.state, &ana, booking(t.id, 2, at(1, 19)))
        .await
        .unwrap();

    table::delete(&h.state, t.id).await.unwrap();

    let kept = reservation::get(&h.state, &ana, r.id).await.unwrap();
    assert_eq!(kept.table_id, None);
    assert_eq!(kept.table_number, 5);
    assert_eq!(
        code(table::get(&h.state, t.id).await),
        ErrorCode::TableNotFound
    );

    // the number can be reused by a new table
    let replacement = dining_table(&h.state, 5, 2).await;
    assert_ne!(replacement.id, t.id);
}
