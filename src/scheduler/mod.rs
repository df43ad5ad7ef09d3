//! Daily timer that runs a job once per day at a fixed local time.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Schedule parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Invalid UTC offset '{0}', expected +HH:MM or -HH:MM")]
    InvalidOffset(String),
}

/// Parse a wall-clock time such as "09:00".
pub fn parse_daily_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))
}

/// Parse a UTC offset such as "+03:00", "-05:30" or "Z".
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ScheduleError> {
    let invalid = || ScheduleError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();
    if trimmed == "Z" || trimmed == "UTC" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// A time of day in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailySchedule {
    pub at: NaiveTime,
    pub offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, offset: FixedOffset) -> Self {
        Self { at, offset }
    }

    /// The first run strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_date = now.with_timezone(&self.offset).date_naive();

        let mut date = local_date;
        for _ in 0..3 {
            if let Some(candidate) = self
                .offset
                .from_local_datetime(&date.and_time(self.at))
                .single()
            {
                let candidate = candidate.with_timezone(&Utc);
                if candidate > now {
                    return candidate;
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        now + chrono::Duration::days(1)
    }

    /// How long to wait from `now` until the next run.
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Handle for stopping a running [`DailyTimer`].
///
/// Dropping the handle also stops the timer once any running job completes.
pub struct TimerHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stop the timer and wait for its task to finish.
    ///
    /// A job that is already running is allowed to complete.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Daily timer task ended abnormally: {}", e);
        }
    }
}

/// Runs a job every day at the scheduled time.
pub struct DailyTimer;

impl DailyTimer {
    /// Spawn the timer loop on the current tokio runtime.
    pub fn spawn<F, Fut>(schedule: DailySchedule, job: F) -> TimerHandle
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut last_run: Option<DateTime<Utc>> = None;
            loop {
                let now = match last_run {
                    Some(prev) if prev > Utc::now() => prev,
                    _ => Utc::now(),
                };
                let next = schedule.next_after(now);
                let delay = schedule.delay_from(now);
                tracing::info!(next_run = %next, "Daily job scheduled");

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        tracing::info!("Running daily job");
                        job().await;
                        last_run = Some(next);
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Daily timer stopped");
                        break;
                    }
                }
            }
        });

        TimerHandle {
            stop_tx: Some(stop_tx),
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn moscow_nine() -> DailySchedule {
        DailySchedule::new(
            parse_daily_time("09:00").unwrap(),
            parse_utc_offset("+03:00").unwrap(),
        )
    }

    #[test]
    fn test_parse_daily_time() {
        assert_eq!(
            parse_daily_time("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_daily_time(" 23:59 ").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        assert!(parse_daily_time("24:00").is_err());
        assert!(parse_daily_time("nine").is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+03:00").unwrap().local_minus_utc(), 10800);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("+5").unwrap().local_minus_utc(), 18000);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("03:00").is_err());
        assert!(parse_utc_offset("+15:00").is_err());
        assert!(parse_utc_offset("+03:75").is_err());
    }

    #[test]
    fn test_next_after_later_today() {
        // 05:00 UTC is 08:00 in Moscow
        let next = moscow_nine().next_after(utc("2024-03-10T05:00:00Z"));
        assert_eq!(next, utc("2024-03-10T06:00:00Z"));
    }

    #[test]
    fn test_next_after_rolls_to_tomorrow() {
        let next = moscow_nine().next_after(utc("2024-03-10T07:00:00Z"));
        assert_eq!(next, utc("2024-03-11T06:00:00Z"));
    }

    #[test]
    fn test_exact_hit_rolls_to_tomorrow() {
        let next = moscow_nine().next_after(utc("2024-03-10T06:00:00Z"));
        assert_eq!(next, utc("2024-03-11T06:00:00Z"));
    }

    #[test]
    fn test_offset_crosses_utc_date() {
        // 22:30 UTC on the 10th is already 01:30 on the 11th in Moscow
        let next = moscow_nine().next_after(utc("2024-03-10T22:30:00Z"));
        assert_eq!(next, utc("2024-03-11T06:00:00Z"));
    }

    #[test]
    fn test_delay_from() {
        let delay = moscow_nine().delay_from(utc("2024-03-10T05:30:00Z"));
        assert_eq!(delay, Duration::from_secs(30 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_runs_job_and_stops() {
        let runs = Arc::new(AtomicU32::new(0));
        let (fired_tx, mut fired_rx) = tokio::sync::mpsc::unbounded_channel();

        let counter = runs.clone();
        let handle = DailyTimer::spawn(moscow_nine(), move || {
            let counter = counter.clone();
            let fired_tx = fired_tx.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = fired_tx.send(());
            }
        });

        // The paused clock auto-advances to the scheduled run.
        fired_rx.recv().await.unwrap();
        assert!(runs.load(Ordering::SeqCst) >= 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_timer_shutdown_before_first_run() {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = runs.clone();
        let handle = DailyTimer::spawn(moscow_nine(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        handle.shutdown().await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
