use super::*;

#[tokio::test]
async fn test_new_tables_are_available() {
    let floor = setup().await;
    let t1 = floor.table_ids[0];

    assert!(floor.tables.is_available(t1).await.unwrap());
    assert_eq!(floor.tables.list_available().await.unwrap().len(), 3);
    assert_eq!(floor.tables.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_reserve_then_conflict() {
    let floor = setup().await;
    let t1 = floor.table_ids[0];

    floor.tables.try_reserve(t1, floor.alice).await.unwrap();
    let table = floor.tables.get(t1).await.unwrap();
    assert_eq!(table.status, TableStatus::Reserved);
    assert_eq!(table.occupant_id, Some(floor.alice));
    assert!(!floor.tables.is_available(t1).await.unwrap());

    // The same caller does not get a second reservation either
    for who in [floor.bob, floor.alice] {
        let err = floor.tables.try_reserve(t1, who).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    let available = floor.tables.list_available().await.unwrap();
    assert!(available.iter().all(|t| t.id != t1));
}

#[tokio::test]
async fn test_release_is_idempotent() {
    let floor = setup().await;
    let t1 = floor.table_ids[0];

    floor.tables.try_reserve(t1, floor.alice).await.unwrap();
    floor.tables.release(t1).await.unwrap();
    floor.tables.release(t1).await.unwrap();

    let table = floor.tables.get(t1).await.unwrap();
    assert_eq!(table.status, TableStatus::Available);
    assert!(table.occupant_id.is_none());

    // Releasing a table that was never reserved is also fine
    floor.tables.release(floor.table_ids[1]).await.unwrap();
    assert!(floor.tables.is_available(floor.table_ids[1]).await.unwrap());
}

#[tokio::test]
async fn test_unknown_table() {
    let floor = setup().await;

    let err = floor.tables.is_available(999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        floor.tables.try_reserve(999, floor.alice).await,
        Err(FloorError::NotFound {
            entity: Entity::Table,
            id: 999
        })
    ));
    assert_eq!(
        floor.tables.release(999).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_reserve_for_unknown_user() {
    let floor = setup().await;
    let t1 = floor.table_ids[0];

    let err = floor.tables.try_reserve(t1, 4242).await.unwrap_err();
    assert!(matches!(
        err,
        FloorError::NotFound {
            entity: Entity::User,
            ..
        }
    ));
    assert!(floor.tables.is_available(t1).await.unwrap());
}

#[tokio::test]
async fn test_list_available_empty() {
    let floor = setup().await;
    for id in &floor.table_ids {
        floor.tables.try_reserve(*id, floor.alice).await.unwrap();
    }

    let err = floor.tables.list_available().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert_eq!(floor.tables.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_table_reads_are_bounded_by_deadline() {
    let floor = setup().await;
    let t1 = floor.table_ids[0];
    let (pool, held) = starved_pool(&floor).await;
    let tables = TableStateManager::new(pool, Duration::from_secs(30))
        .with_deadline(Duration::from_millis(200));

    for err in [
        tables.is_available(t1).await.unwrap_err(),
        tables.list_all().await.unwrap_err(),
        tables.list_available().await.unwrap_err(),
        tables.try_reserve(t1, floor.alice).await.unwrap_err(),
        tables.release(t1).await.unwrap_err(),
    ] {
        assert!(matches!(err, FloorError::DeadlineExceeded { after_ms: 200, .. }));
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    drop(held);
    assert!(tables.is_available(t1).await.unwrap());
}
