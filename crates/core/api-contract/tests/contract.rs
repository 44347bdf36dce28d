use api_contract::{
    AddFavoriteRequest, AnomalyLogDto, CreateUnitRequest, FavoriteDto, MonitorItemDto, UnitDto,
    UnitQuery, UpdateAssignmentRequest,
};

#[test]
fn create_unit_accepts_both_casings() {
    let camel: CreateUnitRequest =
        serde_json::from_str(r#"{"ipAddress":"10.0.0.1","name":"a"}"#).expect("parse");
    assert_eq!(camel.ip_address, "10.0.0.1");
    let snake: CreateUnitRequest =
        serde_json::from_str(r#"{"ip_address":"10.0.0.2"}"#).expect("parse");
    assert_eq!(snake.ip_address, "10.0.0.2");
    assert!(snake.name.is_none());
}

#[test]
fn unit_query_accepts_backend_name() {
    let query: UnitQuery = serde_json::from_str(r#"{"compute_unit_ip":"10.0.0.9"}"#).expect("parse");
    assert_eq!(query.unit_ip.as_deref(), Some("10.0.0.9"));
}

#[test]
fn add_favorite_accepts_camel_case() {
    let req: AddFavoriteRequest =
        serde_json::from_str(r#"{"streamerUuid":"s-1"}"#).expect("parse");
    assert_eq!(req.streamer_uuid, "s-1");
}

#[test]
fn unit_dto_is_camel_case() {
    let dto = UnitDto {
        id: "1".to_string(),
        name: "line".to_string(),
        ip_address: "10.0.0.1".to_string(),
        status: "online".to_string(),
        last_seen: None,
        camera_count: 2,
        live_camera_count: 1,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert!(value.get("ipAddress").is_some());
    assert!(value.get("liveCameraCount").is_some());
    assert!(value.get("ip_address").is_none());
}

#[test]
fn monitor_item_nests_favorite() {
    let item = MonitorItemDto {
        favorite: FavoriteDto {
            streamer_uuid: "s-1".to_string(),
            name: "dock".to_string(),
            streamer_type: "camera".to_string(),
            config_template_name: "default".to_string(),
            compute_unit_ip: "10.0.0.1".to_string(),
            is_alive: true,
            features: Vec::new(),
            added_at_ms: 1,
        },
        live: true,
        unit_online: true,
        stale: false,
    };
    let value = serde_json::to_value(item).expect("serialize");
    assert_eq!(value["favorite"]["computeUnitIP"], "10.0.0.1");
    assert_eq!(value["unitOnline"], true);
}

#[test]
fn assignment_request_accepts_both_casings() {
    let camel: UpdateAssignmentRequest = serde_json::from_str(
        r#"{"streamerUuid":"s-1","appName":"detector","resultName":"person","extra":{"threshold":0.4}}"#,
    )
    .expect("parse");
    assert_eq!(camel.app_name, "detector");
    assert!(camel.is_active.is_none());
    assert_eq!(camel.extra["threshold"], 0.4);

    let snake: UpdateAssignmentRequest = serde_json::from_str(
        r#"{"assignment_uuid":"a-1","streamer_uuid":"s-1","app_name":"qr","result_name":"codes","is_active":false}"#,
    )
    .expect("parse");
    assert_eq!(snake.assignment_uuid.as_deref(), Some("a-1"));
    assert_eq!(snake.is_active, Some(false));
    assert!(snake.extra.is_empty());
}

#[test]
fn anomaly_log_dto_is_camel_case() {
    let dto = AnomalyLogDto {
        anomaly_uuid: "an-1".to_string(),
        streamer_uuid: None,
        file_path: Some("/data/an-1.png".to_string()),
        is_starred: true,
        created_at: None,
        extra: Default::default(),
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["anomalyUuid"], "an-1");
    assert_eq!(value["filePath"], "/data/an-1.png");
    assert_eq!(value["isStarred"], true);
}
