// Vendor client against an httpmock vendor: bearer header, envelope handling, both schemas.

#[cfg(test)]
mod test {
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::config::vendor::ApiSchema;
    use crate::error::VendorError;
    use crate::tests::common::service_config;
    use crate::vendor::VendorClient;

    async fn prepare_token_mock(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/token");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"access_token": "A1", "refresh_token": "R1", "expires_in": 3600}));
            })
            .await;
    }

    fn client_for(server: &MockServer, schema: ApiSchema) -> VendorClient {
        let mut config = service_config(&server.base_url());
        config.vendor.schema = schema;
        VendorClient::from_config(&config.vendor, &config.settings).unwrap()
    }

    #[tokio::test]
    async fn v1_devices_carry_bearer_header() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        let devices_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/devices").header("authorization", "Bearer A1");
                then.status(200).json_body(json!({
                    "status": true,
                    "message": "ok",
                    "data": [
                        {"device_id": "D1", "name": "Truck 1", "license_plate": "AB-123", "imei": "860000000000001"},
                        {"device_id": "D2"}
                    ]
                }));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let devices = client.list_devices().await.unwrap();

        devices_mock.assert_async().await;
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_id, "D1");
        assert_eq!(devices[0].license_plate.as_deref(), Some("AB-123"));
        assert_eq!(devices[1].name, None);
    }

    #[tokio::test]
    async fn v1_realtime_speed_is_converted() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/devices/D1/realtime");
                then.status(200).json_body(json!({
                    "status": true,
                    "message": "",
                    "data": {
                        "device_id": "D1",
                        "latitude": 40.7,
                        "longitude": -74.0,
                        "timestamp": "2024-05-01T10:00:00Z",
                        "speed": 36.0,
                        "heading": 90.0,
                        "ignition_status": 1
                    }
                }));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let location = client.get_realtime_location("D1").await.unwrap().unwrap();

        assert_eq!(location.device_id, "D1");
        assert_eq!(location.lat, Some(40.7));
        assert!((location.speed.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(location.ignition_status, Some(1));
        assert!(location.timestamp.is_some());
    }

    #[tokio::test]
    async fn v1_device_info() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        let info_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/devices/D1").header("authorization", "Bearer A1");
                then.status(200).json_body(json!({
                    "status": true,
                    "data": {"device_id": "D1", "name": "Truck 1", "license_plate": "AB-123", "imei": "860000000000001"}
                }));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let device = client.get_device_info("D1").await.unwrap();

        info_mock.assert_async().await;
        assert_eq!(device.device_id, "D1");
        assert_eq!(device.name.as_deref(), Some("Truck 1"));
        assert_eq!(device.imei.as_deref(), Some("860000000000001"));
    }

    #[tokio::test]
    async fn legacy_device_info_uses_model_as_name() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        let info_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/device/info/L1");
                then.status(200).json_body(json!({
                    "status": true,
                    "message": "Success",
                    "data": {
                        "id": "L1",
                        "imei": "359000000000002",
                        "model": "MT-200",
                        "installDate": "2023-11-02",
                        "status": "active"
                    }
                }));
            })
            .await;

        let client = client_for(&server, ApiSchema::Legacy);
        let device = client.get_device_info("L1").await.unwrap();

        info_mock.assert_async().await;
        assert_eq!(device.device_id, "L1");
        assert_eq!(device.name.as_deref(), Some("MT-200"));
        assert_eq!(device.imei.as_deref(), Some("359000000000002"));
        assert_eq!(device.license_plate, None);
    }

    #[tokio::test]
    async fn non_2xx_is_an_upstream_failure() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/devices/D1/trips");
                then.status(503).body("maintenance");
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let err = client.list_trips("D1").await.unwrap_err();

        match err {
            VendorError::UpstreamRequestFailure { path, status, .. } => {
                assert_eq!(path, "/devices/D1/trips");
                assert_eq!(status, Some(503));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn status_false_is_an_upstream_failure() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/devices/D1/alarms");
                then.status(200)
                    .json_body(json!({"status": false, "message": "device not found", "data": []}));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let err = client.list_alarms("D1").await.unwrap_err();

        assert!(matches!(err, VendorError::UpstreamRequestFailure { status: Some(200), .. }));
        assert!(err.to_string().contains("device not found"));
    }

    #[tokio::test]
    async fn mismatched_body_is_invalid_payload() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/devices/D1/trips");
                then.status(200).json_body(json!({"status": true, "data": [{"trip_id": 7}]}));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let err = client.list_trips("D1").await.unwrap_err();

        assert!(matches!(err, VendorError::InvalidPayload { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn rejected_credentials_surface_before_any_resource_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/token");
                then.status(401).json_body(json!({"error": "invalid_client"}));
            })
            .await;

        let client = client_for(&server, ApiSchema::V1);
        let err = client.list_devices().await.unwrap_err();

        assert!(matches!(err, VendorError::AuthAcquireFailure(_)), "{err:?}");
        assert_eq!(err.reason_label(), "auth_acquire");
    }

    #[tokio::test]
    async fn legacy_schema_paths_and_records() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/device/list");
                then.status(200).json_body(json!({
                    "status": true,
                    "message": "Success",
                    "data": [{
                        "device": "L1",
                        "date": "2024-05-01",
                        "lat": 40.1,
                        "lng": -73.9,
                        "time": "10:00:00",
                        "speed": 0.0,
                        "battery": "98"
                    }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/device/realtime/L1");
                then.status(200).json_body(json!({
                    "status": true,
                    "data": {"lat": 40.2, "lng": -73.8, "speed": 72.0, "time": "2024-05-01 10:05:00"}
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/device/trips/L1");
                then.status(200).json_body(json!({
                    "status": true,
                    "data": [{
                        "event": "Ignition On",
                        "eventCode": "IGN_ON",
                        "date": "2024-05-01",
                        "time": "08:30:00",
                        "lat": 40.0,
                        "lng": -74.1,
                        "speed": 0.0,
                        "mileage": 12.5
                    }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/device/alarms/L1");
                then.status(200).json_body(json!({
                    "status": true,
                    "data": [{
                        "utcDateTime": "2024-05-01 09:00:00",
                        "lat": 40.0,
                        "lng": -74.1,
                        "eventName": "Harsh Braking",
                        "time": "05:00 AM",
                        "speed": 40.0,
                        "filePath": "cam/L1/0900.mp4"
                    }]
                }));
            })
            .await;

        let client = client_for(&server, ApiSchema::Legacy);

        let devices = client.list_devices().await.unwrap();
        assert_eq!(devices[0].device_id, "L1");

        let location = client.get_realtime_location("L1").await.unwrap().unwrap();
        assert!((location.speed.unwrap() - 20.0).abs() < 1e-9);
        assert!(location.timestamp.is_some());

        let trips = client.list_trips("L1").await.unwrap();
        assert_eq!(trips[0].trip_id, "L1:2024-05-01T08:30:00:IGN_ON");
        assert_eq!(trips[0].start_time, trips[0].end_time);
        assert_eq!(trips[0].distance, Some(12.5));

        let alarms = client.list_alarms("L1").await.unwrap();
        assert_eq!(alarms[0].alarm_id, "L1:2024-05-01 09:00:00:Harsh Braking");
        assert_eq!(alarms[0].alarm_type.as_deref(), Some("Harsh Braking"));
        assert_eq!(alarms[0].media_url.as_deref(), Some("cam/L1/0900.mp4"));
    }

    #[tokio::test]
    async fn legacy_realtime_without_fix_is_none() {
        let server = MockServer::start_async().await;
        prepare_token_mock(&server).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/device/realtime/L2");
                then.status(200)
                    .json_body(json!({"status": true, "data": {"status": false, "message": "no data"}}));
            })
            .await;

        let client = client_for(&server, ApiSchema::Legacy);
        assert!(client.get_realtime_location("L2").await.unwrap().is_none());
    }
}
