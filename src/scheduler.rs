use crate::{errors::Result, janitor::Janitor};
use chrono::{DateTime, Utc};
use log::info;
use std::{pin::Pin, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

const MINUTE: Duration = Duration::from_secs(60);

pub const STOPPED_NOTICE: &str = "File cleanup is stopped";

pub fn running_notice(interval: u32) -> String {
    format!("File cleanup is running every {interval} minutes")
}

type TaskRun = Arc<
    dyn Fn() -> Pin<Box<dyn std::future::Future<Output = ()> + Send + 'static>>
        + Send
        + Sync
        + 'static,
>;

pub struct Task {
    run: TaskRun,
}

impl Task {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            run: Arc::new(move || Box::pin(run())),
        }
    }

    pub fn create_repeated_job(&self, period: Duration) -> Result<Job> {
        let run = Arc::clone(&self.run);
        let job = Job::new_repeated_async(period, move |_, _| run())?;

        Ok(job)
    }
}

struct Inner {
    sched: JobScheduler,
    // 当前定时作业，None 表示未运行
    job_id: Option<Uuid>,
}

/// Owns the repeating sweep job.
///
/// `start`, `stop` and `restart` are serialized, so at most one job exists
/// at any time.
pub struct CleanupScheduler {
    inner: Mutex<Inner>,
    janitor: Arc<Janitor>,
    // 一个间隔单位的时长
    period_unit: Duration,
}

impl CleanupScheduler {
    pub async fn new(janitor: Arc<Janitor>) -> Result<Self> {
        let mut sched = JobScheduler::new().await?;
        sched.set_shutdown_handler(Box::new(|| {
            Box::pin(async move {
                info!("Job scheduler is shutting down");
            })
        }));

        Ok(Self {
            inner: Mutex::new(Inner {
                sched,
                job_id: None,
            }),
            janitor,
            period_unit: MINUTE,
        })
    }

    #[cfg(test)]
    fn with_period_unit(mut self, period_unit: Duration) -> Self {
        self.period_unit = period_unit;
        self
    }

    /// Starts ticking the underlying job scheduler.
    pub async fn launch(&self) -> Result<()> {
        self.inner.lock().await.sched.start().await?;

        Ok(())
    }

    /// Announces the state, schedules the repeating sweep when the interval
    /// is not 0 and sweeps once. A job left by a previous start is cancelled
    /// first.
    pub async fn start(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock().await;
            self.stop_locked(&mut inner).await?;
            self.start_locked(&mut inner).await?;
        }

        // 锁外立即执行一次，间隔为 0 时 sweep 内部会直接跳过
        self.janitor.tick().await;

        Ok(())
    }

    /// Cancels the repeating sweep. Safe to call when nothing is scheduled.
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await
    }

    /// Applies a changed interval immediately.
    pub async fn restart(&self) -> Result<()> {
        self.start().await
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.job_id.is_some()
    }

    pub async fn next_run(&self) -> Result<Option<DateTime<Utc>>> {
        let mut inner = self.inner.lock().await;
        match inner.job_id {
            Some(job_id) => Ok(inner.sched.next_tick_for_job(job_id).await?),
            None => Ok(None),
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.stop().await?;
        self.inner.lock().await.sched.shutdown().await?;

        Ok(())
    }

    async fn start_locked(&self, inner: &mut Inner) -> Result<()> {
        let interval = self.janitor.settings().snapshot().await.check_interval;
        let notifier = self.janitor.notifier();
        if interval == 0 {
            notifier.notice(STOPPED_NOTICE);
        } else {
            notifier.notice(&running_notice(interval));
        }

        if interval > 0 {
            let janitor = Arc::clone(&self.janitor);
            let task = Task::new(move || {
                let janitor = Arc::clone(&janitor);
                async move { janitor.tick().await }
            });
            let job = task.create_repeated_job(self.period_unit * interval)?;
            let job_id = inner.sched.add(job).await?;
            inner.job_id = Some(job_id);
            info!("Sweep scheduled to run every {interval} minute(s)");
        }

        Ok(())
    }

    async fn stop_locked(&self, inner: &mut Inner) -> Result<()> {
        if let Some(job_id) = inner.job_id.take() {
            inner.sched.remove(&job_id).await?;
            info!("Sweep job {job_id} cancelled");
        }

        Ok(())
    }
}
