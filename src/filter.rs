use std::{fmt, str::FromStr};

use crate::{
    error::AppError,
    models::trip::{Trip, TripStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TripStatus),
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(TripStatus::Pending),
        StatusFilter::Only(TripStatus::Approved),
        StatusFilter::Only(TripStatus::Rejected),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => trip.status() == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

/// Trips matching `filter`, in list order.
pub fn filter(trips: &[Trip], filter: StatusFilter) -> Vec<&Trip> {
    trips.iter().filter(|trip| filter.matches(trip)).collect()
}

/// Like [`filter`], paired with each trip's position in the full list.
pub fn filter_indexed(
    trips: &[Trip],
    filter: StatusFilter,
) -> impl Iterator<Item = (usize, &Trip)> {
    trips
        .iter()
        .enumerate()
        .filter(move |(_, trip)| filter.matches(trip))
}
