use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entities::{CalculationResult, CropEntry};
use super::insight::InsightError;

/// Sequence number handed out for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets; only the newest one may update the view.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        ticket: RequestTicket,
    },
    Success(CalculationResult),
    Failed(String),
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub request: RequestState,
    tracker: RequestTracker,
    /// Entry behind the current request, kept for the dashboard's yield summary.
    pub last_crop: Option<CropEntry>,
    pub settings: PersistedSettings,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Loading { .. })
    }

    pub fn begin_request(&mut self, crop: CropEntry) -> RequestTicket {
        let ticket = self.tracker.begin();
        self.request = RequestState::Loading { ticket };
        self.last_crop = Some(crop);
        ticket
    }

    /// Applies a finished lookup. Returns `false` when a newer submission has
    /// superseded `ticket`, in which case the outcome is dropped.
    pub fn apply_outcome(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<CalculationResult, InsightError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            debug!(
                "[request] Discarding stale response #{} (latest is newer)",
                ticket.sequence()
            );
            return false;
        }

        self.request = match outcome {
            Ok(result) => RequestState::Success(result),
            Err(err) => RequestState::Failed(err.display_message()),
        };
        true
    }

    pub fn apply_persisted(&mut self, persisted: PersistedSettings) {
        self.settings = persisted;
    }
}

/// Provider settings the user saved from the settings page.
///
/// Empty or missing fields fall back to the environment, then to built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}
