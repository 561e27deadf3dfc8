use crate::driver::{Driver, DriverId};
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type RideId = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Active rides still occupy their driver's time window.
    pub fn is_active(&self) -> bool {
        !matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            RideStatus::Pending => "pending",
            RideStatus::Assigned => "assigned",
            RideStatus::InProgress => "in progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of the driver taken at assignment time, not a live reference.
/// The ride keeps whatever contact details were current when dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub id: DriverId,
    pub full_name: Arc<str>,
    pub phone: Arc<str>,
    pub license_plate: Arc<str>,
}

impl DriverInfo {
    pub fn capture(driver: &Driver) -> DriverInfo {
        DriverInfo {
            id: driver.id.clone(),
            full_name: driver.full_name.clone(),
            phone: driver.phone.clone(),
            license_plate: driver.license_plate.clone(),
        }
    }
}

impl fmt::Display for DriverInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.license_plate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Ride {
    pub id: RideId,
    pub patient_name: Arc<str>,
    pub pickup: Arc<str>,
    pub destination: Arc<str>,
    pub appointment_time: Time,
    /// Zero means "not set"; the scenario default is applied at load.
    #[serde(default)]
    pub duration_min: u64,
    pub status: RideStatus,
    #[serde(default)]
    #[tabled(display("fmt_driver"))]
    pub driver_info: Option<DriverInfo>,
}

fn fmt_driver(driver: &Option<DriverInfo>) -> String {
    driver.as_ref().map(|d| d.to_string()).unwrap_or_default()
}

impl Ride {
    /// Occupied interval, half-open: `[appointment, appointment + duration)`.
    pub fn window(&self) -> (Time, Time) {
        (self.appointment_time, self.appointment_time + self.duration_min)
    }

    pub fn overlaps(&self, other: &Ride) -> bool {
        Time::is_overlapping(&self.window(), &other.window())
    }

    pub fn assigned_driver(&self) -> Option<&DriverId> {
        self.driver_info.as_ref().map(|d| &d.id)
    }
}
