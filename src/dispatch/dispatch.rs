use crate::driver::{Driver, DriverId};
use crate::ride::{DriverInfo, Ride, RideId, RideStatus};
use crate::time::Time;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("ride {0} has no duration and the scenario default is zero")]
    ZeroDuration(RideId),
    #[error("unknown ride: {0}")]
    UnknownRide(RideId),
    #[error("unknown driver: {0}")]
    UnknownDriver(DriverId),
    #[error("driver {driver} is unavailable: {reason}")]
    DriverUnavailable {
        driver: DriverId,
        reason: UnavailableReason,
    },
    #[error("cannot {action} ride {ride} while it is {status}")]
    InvalidTransition {
        ride: RideId,
        status: RideStatus,
        action: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    OffDuty,
    Conflict { at: Time },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::OffDuty => write!(f, "not on duty"),
            UnavailableReason::Conflict { at } => {
                write!(f, "conflicting job at {}", at.clock())
            }
        }
    }
}

/// Per-driver answer to "can this driver take that ride", recomputed on
/// demand and never stored.
pub struct AvailabilityVerdict<'a> {
    pub driver: &'a Driver,
    pub reason: Option<UnavailableReason>,
}

impl AvailabilityVerdict<'_> {
    pub fn is_available(&self) -> bool {
        self.reason.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub default_ride_minutes: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        DispatchSettings {
            default_ride_minutes: 60,
        }
    }
}

pub struct Dispatch {
    pub drivers: HashMap<DriverId, Driver>,
    pub rides: Vec<Ride>,
    rides_index: HashMap<RideId, usize>,
    pub settings: DispatchSettings,
}

impl Dispatch {
    pub fn new(
        drivers: HashMap<DriverId, Driver>,
        mut rides: Vec<Ride>,
        settings: DispatchSettings,
    ) -> Result<Dispatch, DispatchError> {
        for ride in rides.iter_mut() {
            if ride.duration_min == 0 {
                ride.duration_min = settings.default_ride_minutes;
            }
            if ride.duration_min == 0 {
                return Err(DispatchError::ZeroDuration(ride.id.clone()));
            }
        }
        rides.sort_by_key(|r| r.appointment_time);
        let rides_index = rides
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect::<HashMap<RideId, usize>>();
        Ok(Dispatch {
            drivers,
            rides,
            rides_index,
            settings,
        })
    }

    pub fn load_from_file(path: &str) -> Result<Self, DispatchError> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            #[serde(default)]
            settings: DispatchSettings,
            drivers: Vec<Driver>,
            rides: Vec<Ride>,
        }
        let raw: RawData = serde_json::from_str(&data)?;

        let driver_map = raw
            .drivers
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        Dispatch::new(driver_map, raw.rides, raw.settings)
    }

    pub fn ride(&self, ride_id: &RideId) -> Result<&Ride, DispatchError> {
        self.rides_index
            .get(ride_id)
            .map(|i| &self.rides[*i])
            .ok_or_else(|| DispatchError::UnknownRide(ride_id.clone()))
    }

    fn ride_idx(&self, ride_id: &RideId) -> Result<usize, DispatchError> {
        self.rides_index
            .get(ride_id)
            .copied()
            .ok_or_else(|| DispatchError::UnknownRide(ride_id.clone()))
    }

    /// Why `driver` cannot take `target`, or `None` when it can. Off-duty
    /// wins over schedule conflicts; the conflict scan skips the target
    /// ride itself and anything completed or cancelled.
    fn unavailable_reason(&self, target: &Ride, driver: &Driver) -> Option<UnavailableReason> {
        if !driver.is_on_duty() {
            return Some(UnavailableReason::OffDuty);
        }
        self.rides
            .iter()
            .filter(|r| r.assigned_driver() == Some(&driver.id))
            .filter(|r| r.id != target.id && r.status.is_active())
            .find(|r| target.overlaps(r))
            .map(|r| UnavailableReason::Conflict {
                at: r.appointment_time,
            })
    }

    /// Labels every driver for the given ride, available drivers first and
    /// alphabetical by name within each group.
    pub fn check_availability(
        &self,
        ride_id: &RideId,
    ) -> Result<Vec<AvailabilityVerdict<'_>>, DispatchError> {
        let target = self.ride(ride_id)?;
        let mut verdicts = self
            .drivers
            .values()
            .map(|driver| AvailabilityVerdict {
                driver,
                reason: self.unavailable_reason(target, driver),
            })
            .collect::<Vec<AvailabilityVerdict>>();
        verdicts.sort_by(|a, b| {
            b.is_available()
                .cmp(&a.is_available())
                .then_with(|| a.driver.full_name.cmp(&b.driver.full_name))
        });
        Ok(verdicts)
    }

    /// The only write path that attaches a driver to a ride. Re-runs the
    /// duty and overlap checks itself, so callers cannot double-book a
    /// driver by skipping the availability screen.
    pub fn assign(&mut self, ride_id: &RideId, driver_id: &DriverId) -> Result<(), DispatchError> {
        let idx = self.ride_idx(ride_id)?;
        match self.rides[idx].status {
            RideStatus::Pending | RideStatus::Assigned => {}
            status => {
                return Err(DispatchError::InvalidTransition {
                    ride: ride_id.clone(),
                    status,
                    action: "assign",
                });
            }
        }
        let driver = self
            .drivers
            .get(driver_id)
            .ok_or_else(|| DispatchError::UnknownDriver(driver_id.clone()))?;
        if let Some(reason) = self.unavailable_reason(&self.rides[idx], driver) {
            return Err(DispatchError::DriverUnavailable {
                driver: driver_id.clone(),
                reason,
            });
        }
        let snapshot = DriverInfo::capture(driver);
        self.rides[idx].driver_info = Some(snapshot);
        self.rides[idx].status = RideStatus::Assigned;

        self.assert_invariants();
        Ok(())
    }

    pub fn start(&mut self, ride_id: &RideId) -> Result<(), DispatchError> {
        let idx = self.ride_idx(ride_id)?;
        match self.rides[idx].status {
            RideStatus::Assigned => self.rides[idx].status = RideStatus::InProgress,
            status => {
                return Err(DispatchError::InvalidTransition {
                    ride: ride_id.clone(),
                    status,
                    action: "start",
                });
            }
        }
        self.assert_invariants();
        Ok(())
    }

    pub fn complete(&mut self, ride_id: &RideId) -> Result<(), DispatchError> {
        let idx = self.ride_idx(ride_id)?;
        match self.rides[idx].status {
            RideStatus::InProgress => self.rides[idx].status = RideStatus::Completed,
            status => {
                return Err(DispatchError::InvalidTransition {
                    ride: ride_id.clone(),
                    status,
                    action: "complete",
                });
            }
        }
        self.assert_invariants();
        Ok(())
    }

    /// Cancelling keeps the driver snapshot for the record; the ride stops
    /// occupying the driver's time either way.
    pub fn cancel(&mut self, ride_id: &RideId) -> Result<(), DispatchError> {
        let idx = self.ride_idx(ride_id)?;
        match self.rides[idx].status {
            RideStatus::Pending | RideStatus::Assigned => {
                self.rides[idx].status = RideStatus::Cancelled
            }
            status => {
                return Err(DispatchError::InvalidTransition {
                    ride: ride_id.clone(),
                    status,
                    action: "cancel",
                });
            }
        }
        self.assert_invariants();
        Ok(())
    }

    /// Active rides for one scenario day, packed into display lanes.
    pub fn timeline(&self, day: u64) -> Vec<Vec<&Ride>> {
        let day_rides = self
            .rides
            .iter()
            .filter(|r| r.status.is_active())
            .filter(|r| r.appointment_time.day() == day)
            .collect::<Vec<&Ride>>();
        pack_lanes(day_rides)
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        debug_assert!(
            self.rides.iter().all(|r| r.duration_min > 0),
            "Ride duration > 0 invariant violated"
        );

        debug_assert!(
            self.rides.iter().all(|r| {
                match r.status {
                    RideStatus::Pending => r.driver_info.is_none(),
                    RideStatus::Assigned | RideStatus::InProgress => r.driver_info.is_some(),
                    RideStatus::Completed | RideStatus::Cancelled => true,
                }
            }),
            "Status <-> driver_info invariant violated"
        );

        let mut rides_by_driver: HashMap<DriverId, Vec<&Ride>> = HashMap::new();
        for ride in self.rides.iter().filter(|r| r.status.is_active()) {
            if let Some(driver_id) = ride.assigned_driver() {
                rides_by_driver
                    .entry(driver_id.clone())
                    .or_default()
                    .push(ride);
            }
        }
        for (driver_id, mut rides) in rides_by_driver.into_iter() {
            rides.sort_by_key(|r| r.appointment_time);
            debug_assert!(
                rides.windows(2).all(|rs| !rs[0].overlaps(rs[1])),
                "Driver {} double-booked",
                driver_id
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}

/// Greedy first-fit interval partitioning for the day timeline: each ride
/// lands in the first lane whose last ride ends at or before the ride's
/// start. Processing in start order keeps the lane count minimal.
pub fn pack_lanes(mut rides: Vec<&Ride>) -> Vec<Vec<&Ride>> {
    rides.sort_by_key(|r| r.appointment_time);

    let mut lanes: Vec<Vec<&Ride>> = Vec::new();
    for ride in rides {
        let open_lane = lanes
            .iter_mut()
            .find(|lane| lane.last().is_some_and(|last| last.window().1 <= ride.window().0));
        match open_lane {
            Some(lane) => lane.push(ride),
            None => lanes.push(vec![ride]),
        }
    }
    lanes
}
