//! Watering reminders.
//!
//! A schedule is due once its next watering time is less than the lead
//! window away, including any time already in the past. The background
//! task re-checks every active schedule on a fixed interval and raises a
//! `warn!` per due system so operators see it in the service log.

use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use crate::models::Schedule;
use crate::store::PgStore;

// ---

/// True when `schedule` is active and its next watering is within `lead` of `now`.
pub fn is_due(schedule: &Schedule, now: DateTime<Utc>, lead: Duration) -> bool {
    // ---
    schedule.is_active && schedule.next_watering_time - now < lead
}

/// Systems among `schedules` that are due at `now`.
pub fn due_schedules<'a>(
    schedules: &'a [Schedule],
    now: DateTime<Utc>,
    lead: Duration,
) -> impl Iterator<Item = &'a Schedule> {
    schedules.iter().filter(move |s| is_due(s, now, lead))
}

/// Run one pass over every active schedule and report the due ones.
pub async fn check_once(store: &PgStore, lead: Duration) -> Result<usize> {
    // ---
    let schedules = store.active_schedules().await?;
    let now = Utc::now();

    let mut due = 0;
    for schedule in due_schedules(&schedules, now, lead) {
        due += 1;
        tracing::warn!(
            system_id = %schedule.system_id,
            next_watering_time = %schedule.next_watering_time,
            frequency_days = schedule.frequency_days,
            "Watering due"
        );
    }

    tracing::debug!(checked = schedules.len(), due, "Watering check complete");
    Ok(due)
}

/// Check schedules forever on a fixed interval. Failures are logged and the
/// loop carries on with the next tick.
pub async fn run_checks(store: PgStore, every: StdDuration, lead: Duration) {
    // ---
    tracing::info!(interval_secs = every.as_secs(), "Starting watering checks");

    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        if let Err(e) = check_once(&store, lead).await {
            tracing::error!("Watering check failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 8, 0, 0).unwrap()
    }

    fn schedule(offset: Duration, is_active: bool) -> Schedule {
        Schedule {
            system_id: Uuid::new_v4(),
            next_watering_time: now() + offset,
            frequency_days: 3,
            is_active,
        }
    }

    #[test]
    fn test_due_within_lead_window() {
        // ---
        let lead = Duration::hours(1);
        assert!(is_due(&schedule(Duration::minutes(59), true), now(), lead));
        assert!(!is_due(&schedule(Duration::minutes(60), true), now(), lead));
        assert!(!is_due(&schedule(Duration::hours(5), true), now(), lead));
    }

    #[test]
    fn test_overdue_is_due() {
        // ---
        assert!(is_due(&schedule(-Duration::days(2), true), now(), Duration::hours(1)));
    }

    #[test]
    fn test_inactive_is_never_due() {
        // ---
        assert!(!is_due(&schedule(-Duration::minutes(5), false), now(), Duration::hours(1)));
    }

    #[test]
    fn test_due_schedules_filters() {
        // ---
        let schedules = vec![
            schedule(Duration::minutes(10), true),
            schedule(Duration::days(1), true),
            schedule(Duration::minutes(10), false),
        ];

        let due: Vec<_> = due_schedules(&schedules, now(), Duration::hours(1)).collect();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].system_id, schedules[0].system_id);
    }
}
