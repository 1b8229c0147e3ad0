use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{DataRetentionJob, GetDataSeriesArgs, JobHandle, JobQueue, SeriesStore};
use crate::error::{AggregatedJobError, EnqueueError, JobFailure};

pub const DEFAULT_RETENTION_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Enqueues one retention job per stored series, on a fixed interval.
pub struct RetentionEnqueuer<S, Q> {
    series: Arc<S>,
    queue: Arc<Q>,
    interval: Duration,
}

impl<S, Q> RetentionEnqueuer<S, Q>
where
    S: SeriesStore + 'static,
    Q: JobQueue + 'static,
{
    pub fn new(series: Arc<S>, queue: Arc<Q>) -> Self {
        Self {
            series,
            queue,
            interval: DEFAULT_RETENTION_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One run: attempt every series, collect every failure.
    pub async fn enqueue_all(&self) -> Result<Vec<JobHandle>, EnqueueError> {
        let all_series = self
            .series
            .data_series(GetDataSeriesArgs {
                exclude_just_in_time: true,
            })
            .await
            .map_err(EnqueueError::FetchSeries)?;

        let mut handles = Vec::with_capacity(all_series.len());
        let mut failures = Vec::new();
        for series in &all_series {
            match self
                .queue
                .enqueue(DataRetentionJob {
                    series_id: series.id,
                })
                .await
            {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    tracing::warn!(
                        series_id = %series.id,
                        "failed to enqueue retention job: {}",
                        source
                    );
                    failures.push(JobFailure {
                        series_id: series.id,
                        source,
                    });
                }
            }
        }

        tracing::debug!(
            "enqueued {} retention job(s), {} failure(s)",
            handles.len(),
            failures.len()
        );
        if failures.is_empty() {
            Ok(handles)
        } else {
            Err(AggregatedJobError {
                attempted: all_series.len(),
                failures,
            }
            .into())
        }
    }

    /// Run until `shutdown` turns true or its sender is dropped. The first run
    /// happens immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!("retention enqueuer started (interval={:?})", self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.enqueue_all().await {
                        tracing::error!("retention enqueue run failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("retention enqueuer stopped");
    }

    /// Spawn [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
