//! Fetch Lifecycle
//!
//! Tracks loading of a dataset as an explicit state machine driven by pure
//! transitions. The loader itself lives with the caller. Failures keep the
//! caller's error type so its source chain survives.

/// Lifecycle of a single fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T, E = String> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Data arrived
    Success(T),
    /// Request failed
    Failure(E),
}

/// Input to [`FetchState::reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum FetchAction<T, E = String> {
    /// A request started
    Init,
    /// The request produced data
    Succeed(T),
    /// The request failed
    Fail(E),
}

impl<T, E> FetchState<T, E> {
    /// Apply an action.
    ///
    /// `Init` always moves to `Loading`. `Succeed`/`Fail` only complete a
    /// fetch that is `Loading`; anywhere else they are ignored.
    pub fn reduce(self, action: FetchAction<T, E>) -> Self {
        match (self, action) {
            (_, FetchAction::Init) => FetchState::Loading,
            (FetchState::Loading, FetchAction::Succeed(data)) => FetchState::Success(data),
            (FetchState::Loading, FetchAction::Fail(error)) => FetchState::Failure(error),
            (state, _) => state,
        }
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Whether the last request failed
    pub fn is_error(&self) -> bool {
        matches!(self, FetchState::Failure(_))
    }

    /// Loaded data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Failure, if any
    pub fn error(&self) -> Option<&E> {
        match self {
            FetchState::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// Take the outcome of a finished fetch; `None` while `Idle` or `Loading`
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            FetchState::Success(data) => Some(Ok(data)),
            FetchState::Failure(error) => Some(Err(error)),
            FetchState::Idle | FetchState::Loading => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for FetchAction<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => FetchAction::Succeed(data),
            Err(e) => FetchAction::Fail(e),
        }
    }
}
