use super::*;
use crate::db::DbService;
use crate::db::repository::{dining_table, menu_item, order, user};
use shared::models::{DiningTableCreate, MenuItemCreate, NewOrderItem, TableStatus, UserRole};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool};
use std::time::Duration;
use tempfile::TempDir;

/// Seeded database: two users, three tables, three menu items
struct Floor {
    dir: TempDir,
    pool: SqlitePool,
    tables: TableStateManager,
    orders: OrderLifecycleManager,
    coordinator: ReservationCoordinator,
    alice: i64,
    bob: i64,
    table_ids: Vec<i64>,
    /// 9.50
    burger: i64,
    /// 3.00
    soda: i64,
    /// 4.25, not available
    special: i64,
}

async fn setup() -> Floor {
    setup_with_deadline(Duration::from_secs(5)).await
}

async fn setup_with_deadline(deadline: Duration) -> Floor {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("floor.db");
    let db = DbService::new(path.to_str().unwrap(), 5).await.unwrap();
    let pool = db.pool.clone();

    let alice = user::create(&pool, "Alice", "alice@example.com", "x", UserRole::User)
        .await
        .unwrap()
        .id;
    let bob = user::create(&pool, "Bob", "bob@example.com", "x", UserRole::User)
        .await
        .unwrap()
        .id;

    let mut table_ids = Vec::new();
    for n in 1..=3 {
        let table = dining_table::create(
            &pool,
            DiningTableCreate {
                name: format!("T{n}"),
                seats: 4,
            },
        )
        .await
        .unwrap();
        table_ids.push(table.id);
    }

    let burger = add_menu_item(&pool, "Burger", 9.50).await;
    let soda = add_menu_item(&pool, "Soda", 3.00).await;
    let special = add_menu_item(&pool, "Special", 4.25).await;
    menu_item::set_available(&pool, special, false).await.unwrap();

    let tables = TableStateManager::new(pool.clone(), deadline);
    let orders = OrderLifecycleManager::new(pool.clone(), deadline);
    let coordinator = ReservationCoordinator::new(pool.clone(), deadline);

    Floor {
        dir,
        pool,
        tables,
        orders,
        coordinator,
        alice,
        bob,
        table_ids,
        burger,
        soda,
        special,
    }
}

async fn add_menu_item(pool: &SqlitePool, name: &str, price: f64) -> i64 {
    menu_item::create(
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
    .unwrap()
    .id
}

/// Second handle on the fixture's database with a single connection,
/// returned together with that connection checked out. Anything needing the
/// pool waits until the guard is dropped.
async fn starved_pool(floor: &Floor) -> (SqlitePool, PoolConnection<Sqlite>) {
    let path = floor.dir.path().join("floor.db");
    let db = DbService::new(path.to_str().unwrap(), 1).await.unwrap();
    let held = db.pool.acquire().await.unwrap();
    (db.pool, held)
}

fn line(menu_item_id: i64, quantity: i32) -> NewOrderItem {
    NewOrderItem {
        menu_item_id,
        quantity,
    }
}

/// A table is reserved exactly when it has at least one pending order
async fn assert_invariant(pool: &SqlitePool) {
    let mut conn = pool.acquire().await.unwrap();
    for table in dining_table::find_all(&mut *conn).await.unwrap() {
        let pending = order::count_pending_by_table(&mut *conn, table.id)
            .await
            .unwrap();
        let reserved = table.status == TableStatus::Reserved;
        assert_eq!(
            reserved,
            pending > 0,
            "table {} is {} with {} pending orders",
            table.id,
            table.status,
            pending
        );
        if !reserved {
            assert!(table.occupant_id.is_none());
        }
    }
}

mod test_tables;
