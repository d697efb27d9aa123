//! Cart merging and wishlist uniqueness.

mod common;

use bakery_server::services::{cart, menu, wishlist};
use common::*;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{CartAdd, CartUpdate, MenuUpdate, WishlistAdd};

fn code<T: std::fmt::Debug>(r: Result<T, bakery_server::ServiceError>) -> ErrorCode {
    AppError::from(r.unwrap_err()).code
}

#[tokio::test]
async fn test_adding_same_menu_merges_lines() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let bun = menu_item(&h.state, "Cinnamon Bun", 15_000).await;

    let first = cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 2 })
        .await
        .unwrap();
    let merged = cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 3 })
        .await
        .unwrap();

    assert_eq!(merged.id, first.id);
    assert_eq!(merged.quantity, 5);
    assert_eq!(merged.unit_price, Decimal::from(15_000));
    assert_eq!(merged.subtotal, Decimal::from(75_000));
    assert_eq!(cart::list(&h.state, &ana).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cart_uses_current_menu_price() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let bun = menu_item(&h.state, "Cinnamon Bun", 15_000).await;
    let line = cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 1 })
        .await
        .unwrap();

    menu::update(
        &h.state,
        bun.id,
        MenuUpdate {
            price: Some(Decimal::from(17_500)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let line = cart::update(&h.state, &ana, line.id, CartUpdate { quantity: 2 })
        .await
        .unwrap();
    assert_eq!(line.unit_price, Decimal::from(17_500));
    assert_eq!(line.subtotal, Decimal::from(35_000));
}

#[tokio::test]
async fn test_cart_validation_and_ownership() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let budi = register(&h.state, "budi@bakery.test").await;
    let bun = menu_item(&h.state, "Cinnamon Bun", 15_000).await;

    assert_eq!(
        code(cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 0 }).await),
        ErrorCode::ValidationFailed
    );
    assert_eq!(
        code(cart::add(&h.state, &ana, CartAdd { menu_id: 77_777, quantity: 1 }).await),
        ErrorCode::MenuNotFound
    );

    let line = cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 1 })
        .await
        .unwrap();
    assert_eq!(
        code(cart::update(&h.state, &budi, line.id, CartUpdate { quantity: 4 }).await),
        ErrorCode::CartItemNotFound
    );
    assert_eq!(
        code(cart::remove(&h.state, &budi, line.id).await),
        ErrorCode::CartItemNotFound
    );

    cart::remove(&h.state, &ana, line.id).await.unwrap();
    assert!(cart::list(&h.state, &ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_cart() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let bun = menu_item(&h.state, "Cinnamon Bun", 15_000).await;
    let loaf = menu_item(&h.state, "Milk Loaf", 28_000).await;
    cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 1 })
        .await
        .unwrap();
    cart::add(&h.state, &ana, CartAdd { menu_id: loaf.id, quantity: 2 })
        .await
        .unwrap();

    assert_eq!(cart::clear(&h.state, &ana).await.unwrap(), 2);
    assert!(cart::list(&h.state, &ana).await.unwrap().is_empty());

    // a fresh line after clearing starts over
    let line = cart::add(&h.state, &ana, CartAdd { menu_id: bun.id, quantity: 1 })
        .await
        .unwrap();
    assert_eq!(line.quantity, 1);
}

#[tokio::test]
async fn test_wishlist_rejects_duplicates() {
    let h = harness();
    let ana = register(&h.state, "ana@bakery.test").await;
    let tart = menu_item(&h.state, "Lemon Tart", 32_000).await;

    wishlist::add(&h.state, &ana, WishlistAdd { menu_id: tart.id })
        .await
        .unwrap();
    let err = AppError::from(
        wishlist::add(&h.state, &ana, WishlistAdd { menu_id: tart.id })
            .await
            .unwrap_err(),
    );
    assert_eq!(err.code, ErrorCode::MenuAlreadyInWishlist);
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

    wishlist::remove(&h.state, &ana, tart.id).await.unwrap();
    assert!(wishlist::list(&h.state, &ana).await.unwrap().is_empty());

    // removed entries do not block re-adding
    wishlist::add(&h.state, &ana, WishlistAdd { menu_id: tart.id })
        .await
        .unwrap();
    assert_eq!(wishlist::list(&h.state, &ana).await.unwrap().len(), 1);
}
