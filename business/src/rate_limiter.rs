/*  kokpit-auth: Reporting Portal Authenticator
 *  Copyright (C) 2023 The kokpit-auth developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Local;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;
use tracing::Level;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn record_event(&self, rate_name: &str, event_time: DateTime<Local>);

    async fn remove_event(&self, rate_name: &str, event_time: DateTime<Local>);

    async fn is_rate_below_maximum(&self, rate_name: &str, now: DateTime<Local>) -> bool;

    async fn is_rate_above_maximum(&self, rate_name: &str, now: DateTime<Local>) -> bool {
        !self.is_rate_below_maximum(rate_name, now).await
    }
}

#[derive(Clone)]
pub struct RateLimiterImpl {
    maximum_events: usize,

    duration: Duration,

    rates: Arc<RwLock<BTreeMap<String, BTreeSet<DateTime<Local>>>>>,
}

#[async_trait]
impl RateLimiter for RateLimiterImpl {
    #[instrument(level = Level::DEBUG, skip(self, rate_name))]
    async fn record_event(&self, rate_name: &str, event_time: DateTime<Local>) {
        let mut rates = self.rates.write().await;
        match rates.get_mut(rate_name) {
            None => {
                let mut events: BTreeSet<DateTime<Local>> = Default::default();
                events.insert(event_time);
                rates.insert(rate_name.to_owned(), events);
            }
            Some(events) => {
                events.insert(event_time);
            }
        }
    }

    #[instrument(level = Level::DEBUG, skip(self, rate_name))]
    async fn remove_event(&self, rate_name: &str, event_time: DateTime<Local>) {
        let mut rates = self.rates.write().await;
        if let Some(events) = rates.get_mut(rate_name) {
            events.remove(&event_time);
        }
    }

    async fn is_rate_below_maximum(&self, rate_name: &str, now: DateTime<Local>) -> bool {
        let mut rates = self.rates.write().await;
        match rates.get_mut(rate_name) {
            None => return true,
            Some(events) => {
                *events = events.split_off(&(now - self.duration));
            }
        }
        drop(rates);

        let rates = self.rates.read().await;
        match rates.get(rate_name) {
            None => true,
            Some(events) => events.len() <= self.maximum_events,
        }
    }
}

pub mod inject {
    use super::*;

    pub fn rate_limiter(maximum_events: usize, duration: Duration) -> Arc<dyn RateLimiter> {
        Arc::new(RateLimiterImpl {
            maximum_events,
            duration,
            rates: Default::default(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::fixture;
    use rstest::rstest;
    use test_log::test;

    #[rstest]
    #[test(tokio::test)]
    async fn empty_rate_is_ok(now: DateTime<Local>, rate_name: &str, uut: RateLimiterImpl) {
        assert!(uut.is_rate_below_maximum(rate_name, now).await);
        assert!(!uut.is_rate_above_maximum(rate_name, now).await);
    }

    #[rstest]
    #[test(tokio::test)]
    async fn events_above_maximum_trip_the_limiter(
        now: DateTime<Local>,
        rate_name: &str,
        uut: RateLimiterImpl,
    ) {
        for i in 0..4 {
            uut.record_event(rate_name, now - Duration::seconds(i))
                .await;
        }

        assert!(uut.is_rate_above_maximum(rate_name, now).await);
    }

    #[rstest]
    #[test(tokio::test)]
    async fn events_outside_the_window_are_forgotten(
        now: DateTime<Local>,
        rate_name: &str,
        uut: RateLimiterImpl,
    ) {
        for i in 0..4 {
            uut.record_event(rate_name, now - Duration::minutes(10) - Duration::seconds(i))
                .await;
        }

        assert!(uut.is_rate_below_maximum(rate_name, now).await);
    }

    #[rstest]
    #[test(tokio::test)]
    async fn removed_event_no_longer_counts(
        now: DateTime<Local>,
        rate_name: &str,
        uut: RateLimiterImpl,
    ) {
        for i in 0..4 {
            uut.record_event(rate_name, now - Duration::seconds(i))
                .await;
        }
        uut.remove_event(rate_name, now).await;

        assert!(uut.is_rate_below_maximum(rate_name, now).await);
    }

    #[fixture]
    fn uut() -> RateLimiterImpl {
        RateLimiterImpl {
            maximum_events: 3,
            duration: Duration::minutes(5),
            rates: Default::default(),
        }
    }

    #[fixture]
    fn now() -> DateTime<Local> {
        Local::now()
    }

    #[fixture]
    fn rate_name() -> &'static str {
        "kokpituser2"
    }
}
