use crate::dispatch::dispatch::{Dispatch, DispatchError, DispatchSettings};
use crate::dispatch::tests::utils::{add_driver, add_ride, id};
use crate::driver::DriverStatus::Available;
use crate::ride::Ride;
use crate::ride::RideStatus::Pending;
use crate::time::Time;
use std::collections::HashMap;

#[test]
fn test_missing_duration_takes_scenario_default() {
    let mut drivers = HashMap::new();
    let mut rides = Vec::new();

    add_driver(&mut drivers, "DRV_1", "Somsak", Available);
    add_ride(&mut rides, "RIDE_1", "Patient A", 600, 0, None, Pending);
    add_ride(&mut rides, "RIDE_2", "Patient B", 700, 45, None, Pending);

    let settings = DispatchSettings {
        default_ride_minutes: 90,
    };
    let dispatch = Dispatch::new(drivers, rides, settings).unwrap();

    assert_eq!(dispatch.ride(&id("RIDE_1")).unwrap().duration_min, 90);
    assert_eq!(dispatch.ride(&id("RIDE_2")).unwrap().duration_min, 45);
}

#[test]
fn test_zero_duration_fails_the_load() {
    let mut rides = Vec::new();
    add_ride(&mut rides, "RIDE_1", "Patient A", 600, 0, None, Pending);

    let settings = DispatchSettings {
        default_ride_minutes: 0,
    };
    let result = Dispatch::new(HashMap::new(), rides, settings);

    assert!(matches!(result, Err(DispatchError::ZeroDuration(_))));
}

#[test]
fn test_rides_are_kept_in_appointment_order() {
    let mut rides = Vec::new();
    add_ride(&mut rides, "RIDE_2", "Patient B", 700, 60, None, Pending);
    add_ride(&mut rides, "RIDE_1", "Patient A", 600, 60, None, Pending);

    let dispatch = Dispatch::new(HashMap::new(), rides, DispatchSettings::default()).unwrap();

    let ids: Vec<_> = dispatch.rides.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![id("RIDE_1"), id("RIDE_2")]);
}

#[test]
fn test_ride_schema_round_trip() {
    let raw = r#"{
        "id": "RIDE-001",
        "patient_name": "Boonmee Srisuk",
        "pickup": "Ban Nong Bua village hall",
        "destination": "Provincial hospital, dialysis unit",
        "appointment_time": 540,
        "status": "pending"
    }"#;

    let ride: Ride = serde_json::from_str(raw).unwrap();
    assert_eq!(ride.id, id("RIDE-001"));
    assert_eq!(ride.appointment_time, Time(540));
    assert_eq!(ride.duration_min, 0);
    assert_eq!(ride.status, Pending);
    assert!(ride.driver_info.is_none());
}
