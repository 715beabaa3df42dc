use crate::{
    error::SnapshotError,
    model::{TripId, TripSnapshot},
};
use std::collections::HashMap;

/// Resolves a trip to its members and expenses. Implementations must return
/// a consistent snapshot (one read, one point in time).
pub trait TripSnapshotSource: Send + Sync {
    fn snapshot(&self, trip: &TripId) -> Result<TripSnapshot, SnapshotError>;
}

impl TripSnapshotSource for HashMap<TripId, TripSnapshot> {
    fn snapshot(&self, trip: &TripId) -> Result<TripSnapshot, SnapshotError> {
        self.get(trip)
            .cloned()
            .ok_or_else(|| SnapshotError::TripNotFound(trip.clone()))
    }
}
