//! Store and queue seams. Persistence lives behind these traits.

use async_trait::async_trait;

use super::{DataRetentionJob, DataSeries, GetDataSeriesArgs, JobHandle};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[async_trait]
pub trait SeriesStore: Send + Sync {
    async fn data_series(&self, args: GetDataSeriesArgs) -> Result<Vec<DataSeries>, BoxError>;
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: DataRetentionJob) -> Result<JobHandle, BoxError>;
}
