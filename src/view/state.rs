//! Mount lifecycle shared by every view

use crate::{error::DashboardError, types::Fetched};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity of one mount of a view, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mount {
    pub id: Uuid,
    pub mounted_at: DateTime<Utc>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            mounted_at: Utc::now(),
        }
    }

    /// Milliseconds since the mount started
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.mounted_at).num_milliseconds().max(0)
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

/// What a view currently holds
///
/// Starts in `Loading` and settles exactly once per mount. `Failed` is only
/// reachable under `FailurePolicy::SurfaceError`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Populated(T),
    Fallback(T),
    Failed(String),
}

impl<T> ViewState<T> {
    /// Moves out of `Loading` using a fetch outcome
    ///
    /// Returns false, leaving the state untouched, if the view already settled.
    pub fn settle(&mut self, outcome: Result<Fetched<T>, DashboardError>) -> bool {
        if !self.is_loading() {
            return false;
        }

        *self = match outcome {
            Ok(fetched) if fetched.is_fallback() => ViewState::Fallback(fetched.data),
            Ok(fetched) => ViewState::Populated(fetched.data),
            Err(e) => ViewState::Failed(e.to_string()),
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Data to render, whether live or fallback
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Populated(data) | ViewState::Fallback(data) => Some(data),
            ViewState::Loading | ViewState::Failed(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Populated(_) => "populated",
            ViewState::Fallback(_) => "fallback",
            ViewState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_once() {
        let mut state: ViewState<u32> = ViewState::default();
        assert!(state.is_loading());
        assert_eq!(state.data(), None);

        assert!(state.settle(Ok(Fetched::live(7))));
        assert_eq!(state, ViewState::Populated(7));

        assert!(!state.settle(Ok(Fetched::fallback(9))));
        assert_eq!(state.data(), Some(&7));
    }

    #[test]
    fn test_fallback_and_failed_states() {
        let mut fallback: ViewState<u32> = ViewState::Loading;
        fallback.settle(Ok(Fetched::fallback(1)));
        assert_eq!(fallback.label(), "fallback");
        assert_eq!(fallback.data(), Some(&1));

        let mut failed: ViewState<u32> = ViewState::Loading;
        failed.settle(Err(DashboardError::internal("boom")));
        assert_eq!(failed, ViewState::Failed("Internal error: boom".to_string()));
        assert_eq!(failed.data(), None);
    }

    #[test]
    fn test_mount_ids_are_unique() {
        assert_ne!(Mount::new().id, Mount::new().id);
    }

    #[test]
    fn test_mount_elapsed_is_non_negative() {
        let mount = Mount::new();
        assert!(mount.mounted_at <= Utc::now());
        assert!(mount.elapsed_ms() >= 0);

        let earlier = Mount {
            mounted_at: Utc::now() - chrono::TimeDelta::seconds(2),
            ..Mount::new()
        };
        assert!(earlier.elapsed_ms() >= 2000);
    }
}
