//! Runs dashboard effects in the background
//!
//! Each [`Effect`] is spawned as its own tokio task; when it settles the
//! resulting [`Event`] is sent back to the UI loop over a channel, so the
//! dashboard state is only ever touched from one place.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::dashboard::{Effect, Event};
use crate::data::{Locator, WeatherSource};

/// Spawns effects and collects their completions
pub struct TaskRunner {
    source: Arc<dyn WeatherSource>,
    locator: Arc<dyn Locator>,
    sender: mpsc::Sender<Event>,
    /// Channel for receiving completed effects
    pub receiver: mpsc::Receiver<Event>,
}

impl TaskRunner {
    pub fn new(source: Arc<dyn WeatherSource>, locator: Arc<dyn Locator>) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            source,
            locator,
            sender,
            receiver,
        }
    }

    /// Start `effect` without waiting for it
    pub fn spawn(&self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let locator = Arc::clone(&self.locator);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let event = run_effect(effect, source.as_ref(), locator.as_ref()).await;
            // The receiver only goes away when the app is shutting down
            let _ = sender.send(event).await;
        });
    }

    /// Checks for a completed effect without blocking
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

/// Perform one effect and describe its outcome
pub async fn run_effect(
    effect: Effect,
    source: &dyn WeatherSource,
    locator: &dyn Locator,
) -> Event {
    match effect {
        Effect::FetchBatch {
            seq,
            queries,
            notice,
        } => {
            debug!(seq, ?queries, "running batch fetch");
            match source.fetch_batch(&queries).await {
                Ok(records) => Event::BatchLoaded {
                    seq,
                    records,
                    notice,
                },
                Err(error) => Event::BatchFailed {
                    seq,
                    error,
                    notice,
                },
            }
        }
        Effect::FetchCity { seq, query } => match source.fetch_city(&query).await {
            Ok(record) => Event::CityLoaded { seq, record },
            Err(error) => Event::CityFailed { seq, error },
        },
        Effect::Locate { seq } => match locator.locate().await {
            Ok(coords) => Event::Located { seq, coords },
            Err(error) => Event::LocationFailed { seq, error },
        },
        Effect::FetchLocation { seq, coords } => match source.fetch_coordinates(coords).await {
            Ok(record) => Event::LocationWeatherLoaded { seq, record },
            Err(error) => Event::LocationWeatherFailed { seq, error },
        },
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory stand-ins for the provider and locator

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::data::{
        sample_record, Coordinates, FetchError, LocationError, Locator, WeatherRecord,
        WeatherSource,
    };

    /// Answers every query with a sunny record named after it
    #[derive(Default)]
    pub struct FakeSource {
        failing: HashSet<String>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub fn failing(queries: &[&str]) -> Self {
            Self {
                failing: queries.iter().map(|q| q.to_string()).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn fetch_city(&self, query: &str) -> Result<WeatherRecord, FetchError> {
            self.requests.lock().unwrap().push(query.to_string());
            if self.failing.contains(query) {
                return Err(FetchError::Failed(query.to_string()));
            }
            let name = if query.contains(',') { "Vancouver" } else { query };
            Ok(sample_record(
                name,
                "Sunny",
                "//cdn.weatherapi.com/weather/64x64/day/113.png",
            ))
        }
    }

    /// Locator that always refuses
    pub struct DeniedLocator;

    #[async_trait]
    impl Locator for DeniedLocator {
        async fn locate(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Denied("permission denied".to_string()))
        }
    }
}
