use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub i64);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSeries {
    pub id: SeriesId,
    /// Just-in-time series are computed on demand and have nothing to retain.
    pub just_in_time: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetDataSeriesArgs {
    pub exclude_just_in_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRetentionJob {
    pub series_id: SeriesId,
}

/// Handle to a job accepted by a [`JobQueue`](super::JobQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobHandle {
    pub id: Uuid,
    pub series_id: SeriesId,
}
