//! Handler-level tests: the full actix route table wired over the
//! in-memory store, exercised through HTTP requests.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use tiffin_hub::auth::USER_ID_HEADER;
use tiffin_hub::configure_routes;
use tiffin_hub::domain::catalog::{KitchenView, PlanView};
use tiffin_hub::domain::pricing::PricingConfig;
use tiffin_hub::infrastructure::memory::InMemoryStore;
use tiffin_hub::AppState;

fn make_state() -> (Arc<InMemoryStore>, AppState) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::with_repos(
        store.clone(),
        store.clone(),
        store.clone(),
        PricingConfig::default(),
    );
    (store, state)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn add_item_body(item_id: &str, kitchen_id: Uuid, quantity: i32, unit_price: &str) -> Value {
    json!({
        "kitchen_id": kitchen_id,
        "kitchen_name": "Sharma Tiffins",
        "item_id": item_id,
        "name": format!("Dish {item_id}"),
        "quantity": quantity,
        "unit_price": unit_price,
    })
}

fn checkout_body() -> Value {
    json!({
        "delivery_address": {
            "street": "14 MG Road",
            "city": "Pune",
            "state": "MH",
            "zip_code": "411001",
        },
        "payment_method": "cash",
    })
}

#[actix_web::test]
async fn cart_routes_require_a_principal() {
    let (_store, state) = make_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn adding_the_same_item_twice_merges_quantities() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();
    let kitchen = Uuid::new_v4();

    for quantity in [1, 2] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/cart")
                .insert_header((USER_ID_HEADER, user.to_string()))
                .set_json(add_item_body("thali", kitchen, quantity, "120"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["items"].as_array().expect("items").len(), 1);
    assert_eq!(body["items"][0]["quantity"], 3);
}

#[actix_web::test]
async fn updating_a_missing_item_is_404() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "120"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/cart/item/paneer")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "quantity": 2 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn removing_an_absent_item_twice_is_fine() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "120"))
            .to_request(),
    )
    .await;

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/cart/item/thali")
                .insert_header((USER_ID_HEADER, user.to_string()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn unknown_coupon_is_400_and_leaves_the_cart_alone() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "120"))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/coupon")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "coupon_code": "BOGUS99" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["coupon_code"], "");
    assert_eq!(body["discount"], "0");
}

#[actix_web::test]
async fn stale_cart_version_is_409() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();
    let kitchen = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", kitchen, 1, "120"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let seen_version = body["version"].as_i64().expect("version");

    // A concurrent request bumps the version.
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("paneer", kitchen, 1, "90"))
            .to_request(),
    )
    .await;

    let mut stale = add_item_body("thali", kitchen, 1, "120");
    stale["version"] = json!(seen_version);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(stale)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn checkout_prices_the_cart_applies_the_coupon_and_empties_it() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();
    let kitchen = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", kitchen, 2, "100"))
            .to_request(),
    )
    .await;
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart/coupon")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "coupon_code": "SAVE20" }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["total_amount"], "200.00");
    assert_eq!(order["tax"], "10.00");
    assert_eq!(order["delivery_fee"], "30.00");
    assert_eq!(order["discount"], "20.00");
    assert_eq!(order["final_amount"], "220.00");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "pending");
    assert_eq!(order["payment_method"], "cash");
    assert_eq!(order["kitchen_id"], json!(kitchen));

    // The cart is empty afterwards.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .to_request(),
    )
    .await;
    let cart: Value = test::read_body_json(resp).await;
    assert!(cart["items"].as_array().expect("items").is_empty());
    assert_eq!(cart["coupon_code"], "");
}

#[actix_web::test]
async fn checkout_with_an_empty_cart_is_422_and_creates_no_order() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .to_request(),
    )
    .await;
    let orders: Value = test::read_body_json(resp).await;
    assert!(orders.as_array().expect("orders").is_empty());
}

#[actix_web::test]
async fn only_the_owner_can_read_an_order() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "100"))
            .to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("id").to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The order exists but is someone else's: 403, never 404.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .insert_header((USER_ID_HEADER, stranger.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{}", Uuid::new_v4()))
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn status_updates_follow_the_state_machine() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let user = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "100"))
            .to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("id").to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/orders/{order_id}/status"))
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "status": "confirmed" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "confirmed");

    // confirmed → delivered skips two states.
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/orders/{order_id}/status"))
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "status": "delivered" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/orders/{order_id}/status"))
            .insert_header((USER_ID_HEADER, user.to_string()))
            .set_json(json!({ "status": "shipped" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn only_the_owner_can_update_an_order_status() {
    let (_store, state) = make_state();
    let app = init_app!(state);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/cart")
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .set_json(add_item_body("thali", Uuid::new_v4(), 1, "100"))
            .to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .set_json(checkout_body())
            .to_request(),
    )
    .await;
    let order: Value = test::read_body_json(resp).await;
    let order_id = order["id"].as_str().expect("id").to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/orders/{order_id}/status"))
            .insert_header((USER_ID_HEADER, stranger.to_string()))
            .set_json(json!({ "status": "cancelled" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner's order is untouched.
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/orders/{order_id}"))
            .insert_header((USER_ID_HEADER, owner.to_string()))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "pending");
}

#[actix_web::test]
async fn catalog_is_public_and_filters_inactive_entries() {
    let (store, state) = make_state();
    let kitchen_id = Uuid::new_v4();
    store.seed_kitchen(KitchenView {
        id: kitchen_id,
        name: "Annapurna Kitchen".to_string(),
        description: Some("Home-style veg meals".to_string()),
        image: String::new(),
        rating: BigDecimal::from(4),
        total_ratings: 120,
        is_active: true,
        created_at: Utc::now(),
    });
    store.seed_kitchen(KitchenView {
        id: Uuid::new_v4(),
        name: "Closed Kitchen".to_string(),
        description: None,
        image: String::new(),
        rating: BigDecimal::from(5),
        total_ratings: 3,
        is_active: false,
        created_at: Utc::now(),
    });
    store.seed_plan(PlanView {
        id: Uuid::new_v4(),
        kitchen_id,
        name: "Regular".to_string(),
        description: None,
        price: BigDecimal::from(2400),
        duration_days: 30,
        meals_per_day: 2,
        is_active: true,
        created_at: Utc::now(),
    });
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/kitchens").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let kitchens: Value = test::read_body_json(resp).await;
    assert_eq!(kitchens.as_array().expect("kitchens").len(), 1);
    assert_eq!(kitchens[0]["name"], "Annapurna Kitchen");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/plans/kitchen/{kitchen_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let plans: Value = test::read_body_json(resp).await;
    assert_eq!(plans.as_array().expect("plans").len(), 1);
    assert_eq!(plans[0]["name"], "Regular");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/kitchens/{}", Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
