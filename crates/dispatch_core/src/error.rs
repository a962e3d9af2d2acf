use thiserror::Error;

use crate::ecs::{DriverId, DriverStatus, RideId, RideStatus, RiderId};

/// Errors returned by dispatch operations.
///
/// Every operation validates before it mutates, so an error leaves the store
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("driver {0} not found")]
    DriverNotFound(DriverId),
    #[error("rider {0} not found")]
    RiderNotFound(RiderId),
    #[error("ride request {0} not found")]
    RideNotFound(RideId),
    #[error("cannot {operation} ride {ride}: ride is {status}")]
    InvalidRideState {
        ride: RideId,
        status: RideStatus,
        operation: &'static str,
    },
    #[error("cannot {operation} driver {driver}: driver is {status}")]
    InvalidDriverState {
        driver: DriverId,
        status: DriverStatus,
        operation: &'static str,
    },
    #[error("rider {rider} already has active ride request {ride}")]
    RiderHasActiveRequest { rider: RiderId, ride: RideId },
    #[error("identifier {0} is already in use")]
    DuplicateId(String),
}

impl DispatchError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::DriverNotFound(_)
                | DispatchError::RiderNotFound(_)
                | DispatchError::RideNotFound(_)
        )
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_current_status() {
        let err = DispatchError::InvalidRideState {
            ride: RideId::new("ride_1"),
            status: RideStatus::Completed,
            operation: "accept",
        };
        assert_eq!(err.to_string(), "cannot accept ride ride_1: ride is completed");
        assert!(!err.is_not_found());
        assert!(DispatchError::DriverNotFound(DriverId::new("d")).is_not_found());
    }
}
