//! In-memory store and queue, for tests and local runs.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    BoxError, DataRetentionJob, DataSeries, GetDataSeriesArgs, JobHandle, JobQueue, SeriesId,
    SeriesStore,
};

#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    series: Vec<DataSeries>,
}

impl InMemorySeriesStore {
    pub fn new(series: Vec<DataSeries>) -> Self {
        Self { series }
    }
}

#[async_trait]
impl SeriesStore for InMemorySeriesStore {
    async fn data_series(&self, args: GetDataSeriesArgs) -> Result<Vec<DataSeries>, BoxError> {
        Ok(self
            .series
            .iter()
            .filter(|s| !(args.exclude_just_in_time && s.just_in_time))
            .cloned()
            .collect())
    }
}

/// Records accepted jobs; series listed in `reject` fail to enqueue.
#[derive(Debug, Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<JobHandle>>,
    reject: HashSet<SeriesId>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(ids: impl IntoIterator<Item = SeriesId>) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            reject: ids.into_iter().collect(),
        }
    }

    pub fn jobs(&self) -> Vec<JobHandle> {
        match self.jobs.lock() {
            Ok(jobs) => jobs.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: DataRetentionJob) -> Result<JobHandle, BoxError> {
        if self.reject.contains(&job.series_id) {
            return Err(format!("queue rejected series {}", job.series_id).into());
        }
        let handle = JobHandle {
            id: Uuid::new_v4(),
            series_id: job.series_id,
        };
        let mut jobs = self.jobs.lock().map_err(|e| e.to_string())?;
        jobs.push(handle);
        Ok(handle)
    }
}
