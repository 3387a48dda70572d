//! Fetch orchestration and presentation state.
//!
//! `GridController` drives a [`RowSource`] and exposes the loading, error,
//! and data conditions as one state value. Concurrent loads are resolved by
//! request-generation tagging: a response is applied only when it belongs to
//! the most recently issued request, so a slow early fetch can never
//! overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::GridError;
use crate::fetch::RowSource;
use crate::filter::filter_rows;
use crate::results::{GridRow, ResultSet};
use crate::schema::infer_columns;

/// Message shown to end users when a fetch fails; the underlying error goes
/// to the log, never verbatim into displayed text.
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load data. Please check your connection and try again.";

/// Presentation state of the grid. Exactly one condition is active at a
/// time; transitions are atomic from the caller's point of view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    /// No fetch issued yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Rows arrived; columns inferred from the first row.
    Ready {
        rows: ResultSet,
        columns: Vec<String>,
    },
    /// The query succeeded but returned zero rows. Distinct from `Failed`
    /// so the presentation can show "no data" instead of an error.
    Empty,
    /// The fetch failed; `message` is safe to display.
    Failed { message: String },
}

impl FetchState {
    /// Pure transition applied when a fetch resolves.
    #[must_use]
    pub fn from_outcome(outcome: Result<ResultSet, GridError>) -> Self {
        match outcome {
            Ok(rows) if rows.is_empty() => FetchState::Empty,
            Ok(rows) => {
                let columns = infer_columns(&rows);
                FetchState::Ready { rows, columns }
            }
            Err(err) => {
                tracing::error!(error = %err, "fetch failed");
                FetchState::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}

/// Orchestrates fetch, schema inference, and filtering for one grid.
pub struct GridController {
    source: Arc<dyn RowSource>,
    state: Mutex<FetchState>,
    term: Mutex<String>,
    generation: AtomicU64,
}

impl GridController {
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self {
            source,
            state: Mutex::new(FetchState::Idle),
            term: Mutex::new(String::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.lock_state().clone()
    }

    /// Current filter term.
    #[must_use]
    pub fn term(&self) -> String {
        lock_or_recover(&self.term).clone()
    }

    /// Set the filter term. Takes effect on the next call to
    /// [`filtered_rows`](Self::filtered_rows); no fetch is triggered.
    pub fn set_term(&self, term: impl Into<String>) {
        *lock_or_recover(&self.term) = term.into();
    }

    /// Issue a fetch. Clears any prior error, enters `Loading`, and applies
    /// the response only if no newer request was issued meanwhile.
    pub async fn load(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock_state() = FetchState::Loading;

        let outcome = self.source.fetch().await;

        let mut state = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale fetch response");
            return;
        }
        *state = FetchState::from_outcome(outcome);
    }

    /// Re-fetch. The filter term is left untouched and re-applied to the
    /// new rows.
    pub async fn refresh(&self) {
        self.load().await;
    }

    /// Rows visible under the current term, recomputed fresh from the
    /// latest state on every call.
    #[must_use]
    pub fn filtered_rows(&self) -> Vec<GridRow> {
        let term = self.term();
        match &*self.lock_state() {
            FetchState::Ready { rows, .. } => filter_rows(&rows.rows, &term).into_owned(),
            _ => Vec::new(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FetchState> {
        lock_or_recover(&self.state)
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::types::CellValue;

    use super::*;

    struct FixedSource(Result<ResultSet, GridError>);

    #[async_trait]
    impl RowSource for FixedSource {
        async fn fetch(&self) -> Result<ResultSet, GridError> {
            match &self.0 {
                Ok(rs) => Ok(rs.clone()),
                Err(e) => Err(GridError::Query(e.to_string())),
            }
        }
    }

    fn two_people() -> ResultSet {
        let mut rs = ResultSet::with_columns(Arc::new(vec!["id".into(), "name".into()]), 2);
        rs.push_values(vec![CellValue::Int(1), CellValue::Text("Alice".into())]);
        rs.push_values(vec![CellValue::Int(2), CellValue::Text("Bob".into())]);
        rs
    }

    #[tokio::test]
    async fn load_reaches_ready_with_inferred_columns() {
        let controller = GridController::new(Arc::new(FixedSource(Ok(two_people()))));
        assert_eq!(controller.state(), FetchState::Idle);

        controller.load().await;
        match controller.state() {
            FetchState::Ready { rows, columns } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(columns, ["id", "name"]);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_result_is_empty_state_not_failed() {
        let controller = GridController::new(Arc::new(FixedSource(Ok(ResultSet::default()))));
        controller.load().await;
        assert_eq!(controller.state(), FetchState::Empty);
    }

    #[tokio::test]
    async fn failure_carries_generic_message() {
        let controller = GridController::new(Arc::new(FixedSource(Err(GridError::Query(
            "relation does not exist".into(),
        )))));
        controller.load().await;
        assert_eq!(
            controller.state(),
            FetchState::Failed {
                message: LOAD_FAILED_MESSAGE.to_string()
            }
        );
        // A retry stays possible and recovers nothing here, but must not
        // panic or wedge the state machine.
        controller.refresh().await;
        assert!(matches!(controller.state(), FetchState::Failed { .. }));
    }

    #[tokio::test]
    async fn term_survives_refresh_and_reapplies_to_new_rows() {
        let controller = GridController::new(Arc::new(FixedSource(Ok(two_people()))));
        controller.load().await;
        controller.set_term("ali");
        assert_eq!(controller.filtered_rows().len(), 1);

        controller.refresh().await;
        assert_eq!(controller.term(), "ali");
        let visible = controller.filtered_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(
            visible[0].get("name"),
            Some(&CellValue::Text("Alice".into()))
        );
    }

    /// Source whose rows change on every call, for observing which response
    /// won.
    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl RowSource for CountingSource {
        async fn fetch(&self) -> Result<ResultSet, GridError> {
            let call = self.0.fetch_add(1, Ordering::SeqCst);
            let mut rs = ResultSet::with_columns(Arc::new(vec!["call".into()]), 1);
            rs.push_values(vec![CellValue::Int(call as i64)]);
            Ok(rs)
        }
    }

    #[tokio::test]
    async fn sequential_loads_apply_in_order() {
        let controller = GridController::new(Arc::new(CountingSource(AtomicUsize::new(0))));
        controller.load().await;
        controller.refresh().await;
        match controller.state() {
            FetchState::Ready { rows, .. } => {
                assert_eq!(rows.rows[0].get("call"), Some(&CellValue::Int(1)));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }
}
