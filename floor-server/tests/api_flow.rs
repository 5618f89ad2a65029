//! End-to-end HTTP flows through the full router (auth middleware included)
//!
//! Each test gets its own SQLite file in a temp directory and drives the app
//! with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use floor_server::auth::JwtConfig;
use floor_server::db::repository::{dining_table, menu_item};
use floor_server::{Config, ServerState, build_app};
use http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use shared::models::{DiningTableCreate, MenuItemCreate, UserRole};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-long-enough-for-hs256";

struct TestApp {
    _dir: TempDir,
    state: ServerState,
    app: Router,
    table_id: i64,
    burger: i64,
    soda: i64,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("floor.db");
    let config = Config::with_overrides(path.to_str().unwrap(), JwtConfig::with_secret(SECRET));
    let state = ServerState::initialize(&config).await.unwrap();

    let pool = &state.db.pool;
    let table_id = dining_table::create(
        pool,
        DiningTableCreate {
            name: "Window".to_string(),
            seats: 2,
        },
    )
    .await
    .unwrap()
    .id;
    let mut menu = Vec::new();
    for (name, price) in [("Burger", 9.50), ("Soda", 3.00)] {
        let item = menu_item::create(
            pool,
            MenuItemCreate {
                name: name.to_string(),
                description: String::new(),
                price,
                category: "main".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap();
        menu.push(item.id);
    }

    TestApp {
        _dir: dir,
        app: build_app(state.clone()),
        state,
        table_id,
        burger: menu[0],
        soda: menu[1],
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register through the API and return a token
    async fn signup(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        self.login(email, "password123").await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn staff_token(&self) -> String {
        self.token_with_role("Manager", "manager@example.com", UserRole::Manager)
            .await
    }

    async fn admin_token(&self) -> String {
        self.token_with_role("Admin", "admin@example.com", UserRole::Admin)
            .await
    }

    async fn token_with_role(&self, name: &str, email: &str, role: UserRole) -> String {
        self.state
            .users
            .register(name, email, "password123", role)
            .await
            .unwrap();
        self.login(email, "password123").await
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "", "email": "nope", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    app.signup("Ada", "ada@example.com").await;
    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ada", "email": "ADA@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8002);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = spawn_app().await;
    app.signup("Ada", "ada@example.com").await;

    let (wrong_pw, a) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await;
    let (unknown, b) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ghost@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(a["code"], b["code"]);
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = spawn_app().await;

    let (status, _) = app.call(Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(Method::GET, "/api/auth/me", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    // Public catalog and table routes
    let (status, body) = app.call(Method::GET, "/api/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    let (status, _) = app.call(Method::GET, "/api/tables", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_place_order_flow() {
    let app = spawn_app().await;
    let ada = app.signup("Ada", "ada@example.com").await;
    let bob = app.signup("Bob", "bob@example.com").await;
    let staff = app.staff_token().await;
    let t = app.table_id;

    let (status, body) = app.call(Method::GET, "/api/orders", Some(&ada), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 9);

    // Client-supplied totals are ignored
    let order = json!({
        "table_id": t,
        "items": [
            { "menu_item_id": app.burger, "quantity": 2 },
            { "menu_item_id": app.soda, "quantity": 1 }
        ],
        "total_price": 0.01
    });
    let (status, body) = app
        .call(Method::POST, "/api/orders", Some(&ada), Some(order.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["merged"], false);
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let (status, body) = app
        .call(Method::GET, &format!("/api/orders/{order_id}"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_price"], 22.0);
    assert_eq!(body["data"]["status"], "pending");

    let (_, body) = app
        .call(Method::GET, &format!("/api/tables/{t}/availability"), None, None)
        .await;
    assert_eq!(body["data"]["available"], false);

    // Someone else is turned away with a conflict, not a not-found
    let (status, body) = app
        .call(Method::POST, "/api/orders", Some(&bob), Some(order.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    // ...and cannot read Ada's order
    let (status, _) = app
        .call(Method::GET, &format!("/api/orders/{order_id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Ada ordering again merges into her open order
    let (status, body) = app
        .call(Method::POST, "/api/orders", Some(&ada), Some(order))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["merged"], true);
    assert_eq!(body["data"]["order_id"], order_id);

    // Staff see one pending order and reset the table
    let (status, body) = app
        .call(Method::GET, &format!("/api/admin/tables/{t}/orders"), Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["total_price"], 44.0);

    let (status, body) = app
        .call(Method::POST, &format!("/api/admin/tables/{t}/reset"), Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["completed_orders"], 1);

    let (_, body) = app
        .call(Method::GET, &format!("/api/tables/{t}/availability"), None, None)
        .await;
    assert_eq!(body["data"]["available"], true);

    let (_, body) = app.call(Method::GET, "/api/orders", Some(&ada), None).await;
    assert_eq!(body["data"][0]["status"], "completed");
}

#[tokio::test]
async fn test_place_order_errors() {
    let app = spawn_app().await;
    let ada = app.signup("Ada", "ada@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&ada),
            Some(json!({ "table_id": app.table_id, "items": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&ada),
            Some(json!({ "table_id": 404, "items": [{ "menu_item_id": app.soda, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);

    let (status, _) = app
        .call(Method::GET, "/api/tables/404/availability", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_frees_table() {
    let app = spawn_app().await;
    let ada = app.signup("Ada", "ada@example.com").await;

    let (_, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&ada),
            Some(json!({ "table_id": app.table_id, "items": [{ "menu_item_id": app.soda, "quantity": 1 }] })),
        )
        .await;
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let (status, body) = app
        .call(Method::POST, &format!("/api/orders/{order_id}/cancel"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["table_released"], true);

    let (status, body) = app
        .call(Method::POST, &format!("/api/orders/{order_id}/cancel"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn test_admin_routes_need_roles() {
    let app = spawn_app().await;
    let ada = app.signup("Ada", "ada@example.com").await;
    let staff = app.staff_token().await;
    let t = app.table_id;

    let (status, body) = app
        .call(Method::POST, &format!("/api/admin/tables/{t}/reset"), Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, _) = app
        .call(Method::GET, "/api/admin/tables", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Managers are staff but not admins
    let (status, body) = app
        .call(Method::GET, "/api/admin/orders", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app
        .call(Method::POST, "/api/admin/tables/404/reset", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_provisioning_tables_and_menu() {
    let app = spawn_app().await;
    let ada = app.signup("Ada", "ada@example.com").await;
    let staff = app.staff_token().await;
    let admin = app.admin_token().await;

    // Managers add tables; names are unique
    let table = json!({ "name": "Patio", "seats": 4 });
    let (status, body) = app
        .call(Method::POST, "/api/admin/tables", Some(&staff), Some(table.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "available");
    let patio = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .call(Method::POST, "/api/admin/tables", Some(&staff), Some(table))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/tables",
            Some(&staff),
            Some(json!({ "name": "", "seats": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    // The catalog is admin only
    let tea = json!({ "name": "Tea", "price": 2.25, "category": "drinks" });
    let (status, _) = app
        .call(Method::POST, "/api/admin/menu", Some(&staff), Some(tea.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app
        .call(Method::POST, "/api/admin/menu", Some(&admin), Some(tea))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let tea_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/menu",
            Some(&admin),
            Some(json!({ "name": "Free lunch", "price": -1.0, "category": "main" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    // New items are orderable on new tables
    let order = json!({ "table_id": patio, "items": [{ "menu_item_id": tea_id, "quantity": 2 }] });
    let (status, body) = app
        .call(Method::POST, "/api/orders", Some(&ada), Some(order))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    // Withdrawing an item blocks new lines but keeps existing snapshots
    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/admin/menu/{tea_id}/availability"),
            Some(&admin),
            Some(json!({ "is_available": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&ada),
            Some(json!({ "table_id": patio, "items": [{ "menu_item_id": tea_id, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (_, body) = app
        .call(Method::GET, &format!("/api/orders/{order_id}"), Some(&ada), None)
        .await;
    assert_eq!(body["data"]["total_price"], 4.5);

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/admin/menu/404/availability",
            Some(&admin),
            Some(json!({ "is_available": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}
