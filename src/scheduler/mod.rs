
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use tokio::spawn;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;

const RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(60);

/// Sunday 08:00 UTC.
pub const WEEKLY_RECAP: WeeklySchedule = WeeklySchedule { weekday: Weekday::Sun, hour: 8 };

/// A fixed weekday and hour, in UTC.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub hour: u32
}

impl WeeklySchedule {
    /// The first occurrence strictly after `after`.
    pub fn next_run(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let date = after.date_naive();

        let days_ahead = (self.weekday.num_days_from_monday() + 7 - date.weekday().num_days_from_monday()) % 7;
        let candidate = (date + Duration::days(i64::from(days_ahead))).and_time(time).and_utc();

        if candidate > after {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}

/// Sends the weekly recap to the authorized user every time `schedule` comes around.
pub fn spawn_weekly_recap(dispatcher: Arc<Dispatcher>, schedule: WeeklySchedule) -> JoinHandle<()> {
    spawn(async move {
        loop {
            let now = Utc::now();
            let next = schedule.next_run(now);

            let wait = match (next - now).to_std() {
                Ok(wait) => wait,
                Err(error) => {
                    warn!("Could not compute wait until {next}: {error}");
                    RETRY_DELAY
                }
            };

            info!("Next weekly recap for [{}] at {next}", dispatcher.authorized_user());
            sleep(wait).await;

            if Utc::now() >= next {
                dispatcher.send_weekly_recap().await;
            }
        }
    })
}
