//! Load state for asynchronously fetched map data.
//!
//! A load moves `Loading -> Ready` or `Loading -> Error`, and an error can
//! be retried, which goes back to `Loading`. Every load is issued a
//! [`LoadTicket`]; only the result for the most recent ticket is applied,
//! so a slow response to an earlier request cannot overwrite a newer one.
//! A refresh is a load that keeps the current state visible until its
//! result arrives.

/// Where a load currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// A request is in flight.
    Loading,
    /// Data is available.
    Ready(T),
    /// The last request failed. Holds a user-facing message.
    Error(String),
}

impl<T> LoadState<T> {
    /// Whether a request is in flight with nothing to show yet.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded data, if ready.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Loading | Self::Error(_) => None,
        }
    }

    /// The failure message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The result was applied.
    Applied,
    /// A newer request had been issued; the result was discarded.
    Stale,
}

/// [`LoadTracker::retry`] was called while not in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("retry is only available after a failed load")]
pub struct RetryUnavailable;

/// Tracks the load state and the latest issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTracker<T> {
    state: LoadState<T>,
    latest: u64,
}

impl<T> Default for LoadTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoadTracker<T> {
    /// A tracker in the `Loading` state with no request issued yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LoadState::Loading,
            latest: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Starts a new request, superseding any in flight.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        self.state = LoadState::Loading;
        log::debug!("Load request {} started", self.latest);
        LoadTicket(self.latest)
    }

    /// Starts a new request, superseding any in flight, without leaving
    /// the current state.
    pub fn refresh(&mut self) -> LoadTicket {
        self.latest += 1;
        log::debug!("Load request {} started in the background", self.latest);
        LoadTicket(self.latest)
    }

    /// Starts a new request after a failure.
    ///
    /// # Errors
    ///
    /// * If the tracker is not in the `Error` state
    pub fn retry(&mut self) -> Result<LoadTicket, RetryUnavailable> {
        if !matches!(self.state, LoadState::Error(_)) {
            return Err(RetryUnavailable);
        }
        Ok(self.begin())
    }

    /// Applies the result of `ticket`'s request, unless a newer request
    /// has been started since.
    pub fn finish<E: std::fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<T, E>,
    ) -> FinishOutcome {
        if ticket.0 != self.latest {
            log::debug!(
                "Discarding stale response for request {} (latest is {})",
                ticket.0,
                self.latest
            );
            return FinishOutcome::Stale;
        }

        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(e) => {
                log::error!("Load request {} failed: {e}", ticket.0);
                LoadState::Error(e.to_string())
            }
        };
        FinishOutcome::Applied
    }
}
