use cuboid_core::db::open_db_in_memory;
use cuboid_core::{
    Bag, BagRepository, BagService, BagServiceError, CuboidService, CuboidServiceError,
    CuboidValidationError, NewBag, NewCuboid, SqliteBagRepository, SqliteCuboidRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

type SqliteCuboidService<'conn> =
    CuboidService<SqliteCuboidRepository<'conn>, SqliteBagRepository<'conn>>;

fn service(conn: &Connection) -> SqliteCuboidService<'_> {
    CuboidService::new(
        SqliteCuboidRepository::try_new(conn).unwrap(),
        SqliteBagRepository::try_new(conn).unwrap(),
    )
}

fn create_bag(conn: &Connection, volume: u64) -> Bag {
    let bags = BagService::new(SqliteBagRepository::try_new(conn).unwrap());
    bags.create_bag(&NewBag {
        title: None,
        volume,
    })
    .unwrap()
}

fn occupied(conn: &Connection, bag: &Bag) -> u128 {
    SqliteBagRepository::try_new(conn)
        .unwrap()
        .get_bag_with_cuboids(bag.id)
        .unwrap()
        .unwrap()
        .payload_volume()
}

#[test]
fn fills_bag_to_exact_volume_then_rejects_one_more() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);

    service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();
    service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();
    assert_eq!(occupied(&conn, &bag), 100);

    let err = service
        .create_cuboid(&NewCuboid::new(1, 1, 1, bag.id))
        .unwrap_err();
    match err {
        CuboidServiceError::CapacityExceeded {
            bag_id,
            capacity,
            requested_total,
        } => {
            assert_eq!(bag_id, bag.id);
            assert_eq!(capacity, 100);
            assert_eq!(requested_total, 101);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(occupied(&conn, &bag), 100);
}

#[test]
fn create_against_missing_bag_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let missing = Uuid::new_v4();

    let err = service
        .create_cuboid(&NewCuboid::new(1000, 1000, 1000, missing))
        .unwrap_err();
    assert!(matches!(err, CuboidServiceError::BagNotFound(id) if id == missing));
}

#[test]
fn zero_dimension_is_invalid_input_before_any_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .create_cuboid(&NewCuboid::new(1, 0, 1, Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(
        err,
        CuboidServiceError::InvalidInput(CuboidValidationError::NonPositiveDimension {
            field: "height"
        })
    ));
}

#[test]
fn update_to_same_volume_in_full_bag_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);

    let first = service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();
    service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();

    let updated = service
        .update_cuboid(first.id, &NewCuboid::new(10, 5, 1, bag.id))
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.volume(), 50);
    assert_eq!(
        service.get_cuboid(first.id).unwrap().unwrap().dimensions,
        updated.dimensions
    );
}

#[test]
fn update_beyond_capacity_is_rejected_and_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);

    let first = service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();
    service
        .create_cuboid(&NewCuboid::new(5, 5, 2, bag.id))
        .unwrap();

    let err = service
        .update_cuboid(first.id, &NewCuboid::new(10, 10, 1, bag.id))
        .unwrap_err();
    assert!(matches!(
        err,
        CuboidServiceError::CapacityExceeded {
            requested_total: 150,
            ..
        }
    ));

    let stored = service.get_cuboid(first.id).unwrap().unwrap();
    assert_eq!(stored, first);
}

#[test]
fn update_missing_cuboid_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);
    let missing = Uuid::new_v4();

    let err = service
        .update_cuboid(missing, &NewCuboid::new(1, 1, 1, bag.id))
        .unwrap_err();
    assert!(matches!(err, CuboidServiceError::CuboidNotFound(id) if id == missing));
}

#[test]
fn update_to_missing_bag_is_bag_not_found() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);
    let cuboid = service
        .create_cuboid(&NewCuboid::new(1, 1, 1, bag.id))
        .unwrap();

    let err = service
        .update_cuboid(cuboid.id, &NewCuboid::new(1, 1, 1, Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, CuboidServiceError::BagNotFound(_)));
}

#[test]
fn moving_checks_destination_bag_only() {
    let conn = open_db_in_memory().unwrap();
    let source = create_bag(&conn, 100);
    let destination = create_bag(&conn, 60);
    let service = service(&conn);

    let moving = service
        .create_cuboid(&NewCuboid::new(5, 5, 2, source.id))
        .unwrap();
    service
        .create_cuboid(&NewCuboid::new(5, 5, 2, source.id))
        .unwrap();
    service
        .create_cuboid(&NewCuboid::new(2, 5, 1, destination.id))
        .unwrap();

    // 10 + 50 == 60 fits exactly.
    service
        .update_cuboid(moving.id, &NewCuboid::new(5, 5, 2, destination.id))
        .unwrap();
    assert_eq!(occupied(&conn, &source), 50);
    assert_eq!(occupied(&conn, &destination), 60);

    // Destination is now full; moving the other one there must fail even
    // though the source has room.
    let remaining = service
        .create_cuboid(&NewCuboid::new(1, 1, 1, source.id))
        .unwrap();
    let err = service
        .update_cuboid(remaining.id, &NewCuboid::new(1, 1, 1, destination.id))
        .unwrap_err();
    assert!(matches!(
        err,
        CuboidServiceError::CapacityExceeded { bag_id, .. } if bag_id == destination.id
    ));
}

#[test]
fn moving_excludes_own_volume_only_from_destination_sum() {
    let conn = open_db_in_memory().unwrap();
    let source = create_bag(&conn, 100);
    let destination = create_bag(&conn, 10);
    let service = service(&conn);

    let cuboid = service
        .create_cuboid(&NewCuboid::new(5, 5, 2, source.id))
        .unwrap();

    let err = service
        .update_cuboid(cuboid.id, &NewCuboid::new(5, 5, 2, destination.id))
        .unwrap_err();
    assert!(matches!(err, CuboidServiceError::CapacityExceeded { .. }));
    assert_eq!(
        service.get_cuboid(cuboid.id).unwrap().unwrap().bag_id,
        source.id
    );
}

#[test]
fn delete_frees_capacity_for_later_writes() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);

    let first = service
        .create_cuboid(&NewCuboid::new(10, 10, 1, bag.id))
        .unwrap();
    assert!(service
        .create_cuboid(&NewCuboid::new(1, 1, 1, bag.id))
        .is_err());

    service.delete_cuboid(first.id).unwrap();
    assert_eq!(occupied(&conn, &bag), 0);

    service
        .create_cuboid(&NewCuboid::new(10, 10, 1, bag.id))
        .unwrap();
}

#[test]
fn delete_missing_cuboid_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.delete_cuboid(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, CuboidServiceError::CuboidNotFound(_)));
}

#[test]
fn list_cuboids_embeds_bags() {
    let conn = open_db_in_memory().unwrap();
    let bag = create_bag(&conn, 100);
    let service = service(&conn);

    let first = service
        .create_cuboid(&NewCuboid::new(1, 2, 3, bag.id))
        .unwrap();
    let second = service
        .create_cuboid(&NewCuboid::new(3, 2, 1, bag.id))
        .unwrap();

    let items = service.list_cuboids(&[second.id, first.id]).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].cuboid, first);
    assert_eq!(items[1].cuboid, second);
    assert!(items.iter().all(|item| item.bag == bag));
}

#[test]
fn create_bag_normalizes_title_and_rejects_zero_volume() {
    let conn = open_db_in_memory().unwrap();
    let bags = BagService::new(SqliteBagRepository::try_new(&conn).unwrap());

    let bag = bags
        .create_bag(&NewBag {
            title: Some("   ".to_string()),
            volume: 5,
        })
        .unwrap();
    assert_eq!(bag.title, None);

    let loaded = bags.get_bag(bag.id).unwrap().unwrap();
    assert_eq!(loaded.bag, bag);
    assert!(loaded.cuboids.is_empty());

    let err = bags
        .create_bag(&NewBag {
            title: Some("empty".to_string()),
            volume: 0,
        })
        .unwrap_err();
    assert!(matches!(err, BagServiceError::InvalidInput(_)));
}

#[test]
fn conflict_is_the_only_retryable_error() {
    assert!(CuboidServiceError::Conflict.is_retryable());
    assert!(!CuboidServiceError::BagNotFound(Uuid::new_v4()).is_retryable());
}
