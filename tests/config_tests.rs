//! Loading `DeskConfig` from YAML files

use std::io::Write;
use tempfile::NamedTempFile;
use tourdesk::prelude::*;

const CONFIG: &str = r#"
server:
  host: 0.0.0.0
  port: 8088
api:
  base_url: http://bookings.internal:8088/
  timeout_secs: 3
logging:
  filter: tourdesk=debug
seed:
  cities:
    - id: 5b0c7f1e-2d1a-4c55-9a36-0c1f2f6a9b01
      name: Jaipur
  tours:
    - id: 9d3e6a40-7c1b-4f0e-8a52-1e2b3c4d5e01
      name: Desert Camp
      tourType: group
      capacity: { adults: 3, childrenBandA: 0, childrenBandB: 0 }
      itinerary:
        - { description: Arrive, locationId: 5b0c7f1e-2d1a-4c55-9a36-0c1f2f6a9b01 }
        - { description: Dunes }
  clients:
    - id: 2f4a6c80-1b3d-4e5f-9a7b-8c9d0e1f2a01
      name: Priya Sharma
      mobile: "9811122233"
      familyFriends:
        - { name: Rohan Sharma, dateOfBirth: "1987-02-14T00:00:00.000Z" }
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(CONFIG);
    let config = DeskConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.server.socket_addr().unwrap().to_string(), "0.0.0.0:8088");
    assert_eq!(config.api.timeout_secs, 3);
    assert_eq!(config.logging.filter, "tourdesk=debug");

    let tour = &config.seed.tours[0];
    assert!(tour.is_group());
    assert_eq!(tour.capacity.max_members(), 2);
    assert_eq!(tour.itinerary[1].location_id, None);
    assert_eq!(
        config.seed.clients[0].family_friends[0].date_of_birth.as_deref(),
        Some("1987-02-14T00:00:00.000Z")
    );
}

#[test]
fn test_missing_file_is_config_error() {
    let err = DeskConfig::from_yaml_file("/nonexistent/tourdesk.yaml").unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("/nonexistent/tourdesk.yaml"));
}

#[test]
fn test_parse_error_names_file() {
    let file = write_config("server:\n  port: not-a-port\n");
    let err = DeskConfig::from_yaml_file(file.path()).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[tokio::test]
async fn test_seeded_store_serves_file_data() {
    let file = write_config(CONFIG);
    let config = DeskConfig::from_yaml_file(file.path()).unwrap();
    let store = InMemoryBookingStore::from_seed(&config.seed);

    let mut form = BookingForm::new(Session::new(Uuid::new_v4(), "Dev", "admin"));
    assert!(form.load_references(&store).await);
    form.set_journey_date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
        .unwrap();
    form.select_tour(config.seed.tours[0].id).unwrap();
    form.select_client(config.seed.clients[0].id).unwrap();

    assert_eq!(form.members()[0].name, "Rohan Sharma");
    assert_eq!(form.members()[0].date_of_birth, "1987-02-14");

    let record = form.submit(&store).await.unwrap();
    assert_eq!(record.payload.booking_details.len(), 2);
}

#[test]
fn test_demo_config_host_resolves() {
    let config = DeskConfig::from_yaml_file("demos/booking_server/config.yaml").unwrap();
    assert_eq!(config.server.host, "localhost");

    let addr = config.server.socket_addr().unwrap();
    assert!(addr.ip().is_loopback());
    assert_eq!(config.seed.clients[0].family_friends.len(), 5);
}
