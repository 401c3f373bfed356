use gapath_world::{Cell, GridWorld};

#[test]
fn test_world_json_roundtrip_preserves_layout() {
    let world = GridWorld::new(
        4,
        Cell::new(0, 0),
        Cell::new(3, 2),
        [Cell::new(1, 1), Cell::new(2, 1)],
    )
    .unwrap();
    let json = serde_json::to_string(&world).unwrap();
    assert_eq!(
        json,
        r#"{"size":4,"start":[0,0],"destination":[3,2],"obstacles":[[1,1],[2,1]]}"#
    );
    let loaded: GridWorld = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, world);
    assert_eq!(loaded.manhattan_distance(), 5);
}

#[test]
fn test_world_json_without_obstacles() {
    let world: GridWorld =
        serde_json::from_str(r#"{"size":5,"start":[0,0],"destination":[0,4]}"#).unwrap();
    assert_eq!(world.obstacle_count(), 0);
    assert_eq!(world.manhattan_distance(), 4);
}

#[test]
fn test_world_json_is_validated() {
    let err = serde_json::from_str::<GridWorld>(
        r#"{"size":3,"start":[0,0],"destination":[2,2],"obstacles":[[2,2]]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("obstacle"), "{err}");

    let err =
        serde_json::from_str::<GridWorld>(r#"{"size":3,"start":[0,0],"destination":[5,0]}"#)
            .unwrap_err();
    assert!(err.to_string().contains("outside"), "{err}");
}
