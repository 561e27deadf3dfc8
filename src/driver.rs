use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type DriverId = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnTrip,
    Offline,
    Inactive,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on trip",
            DriverStatus::Offline => "offline",
            DriverStatus::Inactive => "inactive",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Driver {
    pub id: DriverId,
    pub full_name: Arc<str>,
    pub phone: Arc<str>,
    pub license_plate: Arc<str>,
    pub status: DriverStatus,
}

impl Driver {
    /// A driver counts as on duty unless explicitly taken off the roster.
    /// Being mid-trip is still on duty; conflicts with a concrete ride are
    /// the availability scan's job, not this filter's.
    pub fn is_on_duty(&self) -> bool {
        self.status != DriverStatus::Inactive && self.status != DriverStatus::Offline
    }
}
