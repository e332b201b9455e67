//! Dashboard state and its transition function
//!
//! All weather records, the featured city, the loading/error phase and the
//! derived theme live in one [`DashboardState`]. User intents go through the
//! `begin_*`/`select_city` methods, which return the network [`Effect`] to
//! run; completions come back as [`Event`]s through [`DashboardState::apply`].
//!
//! Every operation is stamped with a sequence number when it starts. A record
//! is only overwritten by a result from an operation that started at the
//! same time or later, and a batch completion is discarded once a newer batch
//! has been started, so a slow response never clobbers fresher state.

use tracing::{debug, info, warn};

use crate::data::{Coordinates, FetchError, LocationError, WeatherRecord};
use crate::matching::{CityIdentity, FuzzyName};
use crate::theme::Theme;

/// Banner text when the user's position cannot be determined
pub const LOCATION_UNAVAILABLE: &str = "Unable to retrieve your location";

/// Banner text when the position is known but its weather could not be fetched
pub const LOCATION_WEATHER_FAILED: &str = "Failed to fetch weather for your location";

/// Loading phase of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A batch fetch is in flight
    Loading,
    /// The last operation succeeded
    Success,
    /// The last operation failed with this message
    Failed(String),
}

/// A record together with the operation that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub record: WeatherRecord,
    /// Operation that fetched the record
    pub seq: u64,
    /// Newest sequence number handed out when the record was stored
    pub written: u64,
}

/// Network work requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch all queries concurrently, all-or-nothing
    FetchBatch {
        seq: u64,
        queries: Vec<String>,
        /// Message to show once the batch lands, for fallback loads
        notice: Option<String>,
    },
    /// Fetch one city typed into the search box
    FetchCity { seq: u64, query: String },
    /// Determine the user's position
    Locate { seq: u64 },
    /// Fetch weather at the user's position
    FetchLocation { seq: u64, coords: Coordinates },
}

/// Completion of an [`Effect`]
#[derive(Debug)]
pub enum Event {
    BatchLoaded {
        seq: u64,
        records: Vec<WeatherRecord>,
        notice: Option<String>,
    },
    BatchFailed {
        seq: u64,
        error: FetchError,
        notice: Option<String>,
    },
    CityLoaded { seq: u64, record: WeatherRecord },
    CityFailed { seq: u64, error: FetchError },
    Located { seq: u64, coords: Coordinates },
    LocationFailed { seq: u64, error: LocationError },
    LocationWeatherLoaded { seq: u64, record: WeatherRecord },
    LocationWeatherFailed { seq: u64, error: FetchError },
}

/// The whole dashboard, as one value
#[derive(Debug, Clone)]
pub struct DashboardState<I = FuzzyName> {
    records: Vec<StoredRecord>,
    featured: String,
    phase: Phase,
    theme: Theme,
    defaults: Vec<String>,
    identity: I,
    next_seq: u64,
    latest_batch: u64,
    latest_location: u64,
    featured_seq: u64,
    /// Search failure held back until the in-flight batch settles
    deferred_error: Option<String>,
}

impl DashboardState<FuzzyName> {
    /// Empty dashboard featuring `featured`, using fuzzy name identity
    pub fn new<S: AsRef<str>>(defaults: &[S], featured: impl Into<String>) -> Self {
        Self::with_identity(defaults, featured, FuzzyName)
    }
}

impl<I: CityIdentity> DashboardState<I> {
    /// Empty dashboard with a custom city identity rule
    pub fn with_identity<S: AsRef<str>>(
        defaults: &[S],
        featured: impl Into<String>,
        identity: I,
    ) -> Self {
        Self {
            records: Vec::new(),
            featured: featured.into(),
            phase: Phase::Idle,
            theme: Theme::default(),
            defaults: defaults.iter().map(|s| s.as_ref().to_string()).collect(),
            identity,
            next_seq: 0,
            latest_batch: 0,
            latest_location: 0,
            featured_seq: 0,
            deferred_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn featured(&self) -> &str {
        &self.featured
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// All records in display order
    pub fn records(&self) -> impl Iterator<Item = &WeatherRecord> {
        self.records.iter().map(|stored| &stored.record)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Current error message, if the last operation failed
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// True only while the very first load is in flight
    pub fn is_initial_load(&self) -> bool {
        self.is_loading() && self.records.is_empty()
    }

    /// Whether `name` refers to the featured city
    pub fn is_featured(&self, name: &str) -> bool {
        self.identity.same_city(name, &self.featured)
    }

    fn featured_index(&self) -> Option<usize> {
        self.records
            .iter()
            .position(|stored| self.is_featured(stored.record.name()))
    }

    /// The record rendered in the expanded layout
    pub fn featured_record(&self) -> Option<&WeatherRecord> {
        self.featured_index().map(|i| &self.records[i].record)
    }

    /// Every record except the featured one, in display order
    pub fn other_records(&self) -> Vec<&WeatherRecord> {
        let featured = self.featured_index();
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != featured)
            .map(|(_, stored)| &stored.record)
            .collect()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Start a batch fetch of `queries`, replacing the record set on success
    pub fn begin_batch(&mut self, queries: Vec<String>, notice: Option<String>) -> Effect {
        let seq = self.next_seq();
        self.latest_batch = seq;
        self.phase = Phase::Loading;
        info!(seq, count = queries.len(), "starting batch fetch");
        Effect::FetchBatch {
            seq,
            queries,
            notice,
        }
    }

    /// Batch fetch of the default city set
    pub fn retry(&mut self) -> Effect {
        let defaults = self.defaults.clone();
        self.begin_batch(defaults, None)
    }

    /// Batch fetch of whatever cities are currently displayed
    pub fn refresh(&mut self) -> Option<Effect> {
        if self.records.is_empty() {
            return None;
        }
        let queries = self.records().map(|r| r.name().to_string()).collect();
        Some(self.begin_batch(queries, None))
    }

    /// Fetch one city; blank input is ignored
    pub fn begin_search(&mut self, query: &str) -> Option<Effect> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let seq = self.next_seq();
        debug!(seq, query, "starting city search");
        Some(Effect::FetchCity {
            seq,
            query: query.to_string(),
        })
    }

    /// Start locating the user
    pub fn begin_locate(&mut self) -> Effect {
        let seq = self.next_seq();
        self.latest_location = seq;
        Effect::Locate { seq }
    }

    /// Feature an already loaded city; no network access
    pub fn select_city(&mut self, name: &str) {
        self.featured_seq = self.next_seq();
        self.featured = name.to_string();
        self.recompute_theme();
    }

    /// Clear a failure banner
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Apply a completed effect, returning any follow-up work
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::BatchLoaded {
                seq,
                records,
                notice,
            } => {
                if self.is_stale_batch(seq) {
                    return None;
                }
                let written = self.next_seq;
                let mut next = Vec::with_capacity(records.len());
                for record in records {
                    self.upsert(
                        &mut next,
                        StoredRecord {
                            record,
                            seq,
                            written,
                        },
                    );
                }
                // Keep records fetched later, or stored while this batch was in flight
                for stored in std::mem::take(&mut self.records) {
                    if stored.seq > seq || stored.written >= seq {
                        self.upsert(&mut next, stored);
                    }
                }
                self.records = next;
                self.recompute_theme();
                self.phase = self.settled_phase(notice, None);
                info!(seq, count = self.records.len(), "batch applied");
                None
            }
            Event::BatchFailed {
                seq,
                error,
                notice,
            } => {
                if self.is_stale_batch(seq) {
                    return None;
                }
                warn!(seq, %error, "batch fetch failed");
                self.phase = self.settled_phase(notice, Some(error.to_string()));
                None
            }
            Event::CityLoaded { seq, record } => {
                let name = record.name().to_string();
                let mut records = std::mem::take(&mut self.records);
                let stored = StoredRecord {
                    record,
                    seq,
                    written: self.next_seq,
                };
                if !self.upsert(&mut records, stored) {
                    debug!(seq, %name, "search result superseded by newer data");
                }
                self.records = records;
                if seq > self.featured_seq {
                    self.featured_seq = seq;
                    self.featured = name;
                }
                self.recompute_theme();
                if !self.is_loading() {
                    self.phase = Phase::Success;
                }
                None
            }
            Event::CityFailed { seq, error } => {
                warn!(seq, %error, "city search failed");
                if self.is_loading() {
                    self.deferred_error = Some(error.to_string());
                } else {
                    self.phase = Phase::Failed(error.to_string());
                }
                None
            }
            Event::Located { seq, coords } => {
                if seq < self.latest_location {
                    return None;
                }
                Some(Effect::FetchLocation { seq, coords })
            }
            Event::LocationFailed { seq, error } => {
                if seq < self.latest_location {
                    return None;
                }
                warn!(seq, %error, "could not determine location");
                Some(self.fall_back(LOCATION_UNAVAILABLE))
            }
            Event::LocationWeatherLoaded { seq, record } => {
                if seq < self.latest_location {
                    return None;
                }
                let name = record.name().to_string();
                info!(seq, %name, "resolved user location");
                if seq > self.featured_seq {
                    self.featured_seq = seq;
                    self.featured = name.clone();
                }
                let mut cities = self.defaults.clone();
                let present = cities.iter().any(|c| self.identity.same_city(c, &name));
                if !present {
                    if let Some(first) = cities.first_mut() {
                        *first = name;
                    } else {
                        cities.push(name);
                    }
                }
                Some(self.begin_batch(cities, None))
            }
            Event::LocationWeatherFailed { seq, error } => {
                if seq < self.latest_location {
                    return None;
                }
                warn!(seq, %error, "location weather fetch failed");
                Some(self.fall_back(LOCATION_WEATHER_FAILED))
            }
        }
    }

    /// Reload the default set, showing `message` once it settles
    fn fall_back(&mut self, message: &str) -> Effect {
        let defaults = self.defaults.clone();
        self.begin_batch(defaults, Some(message.to_string()))
    }

    /// Phase after the latest batch lands, joining every message to show
    fn settled_phase(&mut self, notice: Option<String>, error: Option<String>) -> Phase {
        let messages: Vec<String> = notice
            .into_iter()
            .chain(self.deferred_error.take())
            .chain(error)
            .collect();
        if messages.is_empty() {
            Phase::Success
        } else {
            Phase::Failed(messages.join("; "))
        }
    }

    fn is_stale_batch(&self, seq: u64) -> bool {
        if seq < self.latest_batch {
            debug!(seq, latest = self.latest_batch, "discarding superseded batch");
            return true;
        }
        false
    }

    /// Insert or replace the record for `incoming`'s city
    ///
    /// Returns false, leaving `records` untouched, when a matching record
    /// was written by a later operation.
    fn upsert(&self, records: &mut Vec<StoredRecord>, incoming: StoredRecord) -> bool {
        let matching: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, stored)| {
                self.identity
                    .same_city(stored.record.name(), incoming.record.name())
            })
            .map(|(i, _)| i)
            .collect();

        if matching.iter().any(|&i| records[i].seq > incoming.seq) {
            return false;
        }

        match matching.split_first() {
            None => records.push(incoming),
            Some((&first, rest)) => {
                for &i in rest.iter().rev() {
                    records.remove(i);
                }
                records[first] = incoming;
            }
        }
        true
    }

    fn recompute_theme(&mut self) {
        if let Some(record) = self.featured_record() {
            self.theme = record.theme();
        }
    }
}
