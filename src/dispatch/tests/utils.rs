use crate::dispatch::dispatch::{Dispatch, DispatchSettings};
use crate::driver::{Driver, DriverId, DriverStatus};
use crate::ride::{DriverInfo, Ride, RideId, RideStatus};
use crate::time::Time;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::collections::HashMap;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn add_driver(
    drivers: &mut HashMap<DriverId, Driver>,
    driver_id: &str,
    full_name: &str,
    status: DriverStatus,
) {
    drivers.insert(
        id(driver_id),
        Driver {
            id: id(driver_id),
            full_name: id(full_name),
            phone: id("081-000-0000"),
            license_plate: id("AB 1234"),
            status,
        },
    );
}

pub fn add_ride(
    rides: &mut Vec<Ride>,
    ride_id: &str,
    patient_name: &str,
    appointment_time: u64,
    duration_min: u64,
    driver_id: Option<&str>,
    status: RideStatus,
) {
    rides.push(Ride {
        id: id(ride_id),
        patient_name: id(patient_name),
        pickup: id("Village clinic"),
        destination: id("District hospital"),
        appointment_time: Time(appointment_time),
        duration_min,
        status,
        driver_info: driver_id.map(|d| DriverInfo {
            id: id(d),
            full_name: id(d),
            phone: id("081-000-0000"),
            license_plate: id("AB 1234"),
        }),
    });
}

pub fn dispatch(drivers: HashMap<DriverId, Driver>, rides: Vec<Ride>) -> Dispatch {
    Dispatch::new(drivers, rides, DispatchSettings::default()).unwrap()
}

pub fn ride_at(ride_id: &str, appointment_time: u64, duration_min: u64) -> Ride {
    let mut rides = Vec::new();
    add_ride(
        &mut rides,
        ride_id,
        "Patient",
        appointment_time,
        duration_min,
        None,
        RideStatus::Pending,
    );
    rides.pop().unwrap()
}

pub fn arb_id(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

pub fn arb_ride() -> impl Strategy<Value = Ride> {
    (arb_id("RIDE"), 0..2500u64, 10..240u64).prop_map(|(rid, at, dur)| Ride {
        id: id(rid.as_ref()),
        patient_name: id("Patient"),
        pickup: id("Village clinic"),
        destination: id("District hospital"),
        appointment_time: Time(at),
        duration_min: dur,
        status: RideStatus::Pending,
        driver_info: None,
    })
}

pub type RideIdList = Vec<RideId>;

pub fn lane_ids(lanes: &[Vec<&Ride>]) -> Vec<RideIdList> {
    lanes
        .iter()
        .map(|lane| lane.iter().map(|r| r.id.clone()).collect())
        .collect()
}
