//! Widget data loading
//!
//! Each widget has one slot holding its latest state. Every load takes a
//! sequence-numbered [`Ticket`] and cancels the ticket before it, so a
//! response that arrives after a newer request was issued is dropped instead
//! of overwriting fresher rows.

use std::future::Future;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::filter::FilterBoard;
use crate::filter::RefetchPlan;
use crate::model::Row;

/// Data state of a widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WidgetState {
    #[default]
    Idle,
    Loading,
    Loaded {
        rows: Vec<Row>,
    },
    Failed {
        message: String,
    },
}

impl WidgetState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            WidgetState::Loaded { rows } => Some(rows),
            _ => None,
        }
    }
}

/// Claim on a widget slot for one request.
#[derive(Debug, Clone)]
pub struct Ticket {
    widget_id: String,
    seq: u64,
    cancel: CancellationToken,
}

impl Ticket {
    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns `true` once a newer ticket was issued for the same widget.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct Slot {
    seq: u64,
    cancel: CancellationToken,
    state: WidgetState,
}

/// Tracks the data state of every widget on a page.
///
/// # Example
///
/// ```
/// use finboard_lib::{WidgetLoader, WidgetState};
/// use finboard_lib::model::Row;
///
/// let loader = WidgetLoader::new();
/// let stale = loader.begin("w1");
/// let fresh = loader.begin("w1");
///
/// assert!(loader.complete(&fresh, Ok(vec![Row::new()])));
/// assert!(!loader.complete(&stale, Ok(vec![])));
/// assert_eq!(loader.state("w1").rows().map(|r| r.len()), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct WidgetLoader {
    slots: DashMap<String, Slot>,
}

impl WidgetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a widget; `Idle` if it was never loaded.
    pub fn state(&self, widget_id: &str) -> WidgetState {
        self.slots
            .get(widget_id)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Starts a request, cancelling the one in flight.
    pub fn begin(&self, widget_id: &str) -> Ticket {
        let mut slot = self.slots.entry(widget_id.to_string()).or_default();
        slot.cancel.cancel();
        slot.seq += 1;
        slot.cancel = CancellationToken::new();
        slot.state = WidgetState::Loading;

        Ticket {
            widget_id: widget_id.to_string(),
            seq: slot.seq,
            cancel: slot.cancel.clone(),
        }
    }

    /// Returns `true` if the ticket is still the latest for its widget.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.slots
            .get(&ticket.widget_id)
            .is_some_and(|slot| slot.seq == ticket.seq)
    }

    /// Stores a response. Returns `false` if it was stale and dropped.
    pub fn complete(&self, ticket: &Ticket, result: Result<Vec<Row>, Error>) -> bool {
        let Some(mut slot) = self.slots.get_mut(&ticket.widget_id) else {
            return false;
        };
        if slot.seq != ticket.seq {
            log::debug!(
                "dropping stale response for widget '{}' (ticket {}, latest {})",
                ticket.widget_id,
                ticket.seq,
                slot.seq
            );
            return false;
        }

        slot.state = match result {
            Ok(rows) => WidgetState::Loaded { rows },
            Err(e) => {
                log::warn!("widget '{}' failed to load: {}", ticket.widget_id, e);
                WidgetState::Failed {
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Runs a fetch for a widget and stores its result.
    ///
    /// Returns `false` if a newer load superseded this one.
    pub async fn load<F, Fut>(&self, widget_id: &str, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Row>, Error>>,
    {
        self.load_after(widget_id, None, fetch).await
    }

    /// Like [`load`](Self::load), but waits `delay` first. A newer load
    /// arriving during the wait cancels this one before it fetches.
    pub async fn load_after<F, Fut>(&self, widget_id: &str, delay: Option<Duration>, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Row>, Error>>,
    {
        let ticket = self.begin(widget_id);
        let cancel = ticket.cancel.clone();
        let work = async {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            fetch().await
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("load of widget '{}' superseded (ticket {})", widget_id, ticket.seq);
                false
            }
            result = work => self.complete(&ticket, result),
        }
    }

    /// Refetches every widget named in a refetch plan with its filter
    /// parameters, honoring the plan's debounce.
    ///
    /// Returns the number of widgets whose state was updated.
    pub async fn refresh(&self, client: &DashboardClient, board: &FilterBoard, plan: &RefetchPlan) -> usize {
        let loads = plan.widgets.iter().map(|widget_id| {
            let params = board.params_for(widget_id);
            self.load_after(widget_id, plan.debounce, move || async move {
                client.widget_data(widget_id, &params).await
            })
        });

        join_all(loads).await.into_iter().filter(|applied| *applied).count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use tokio::sync::oneshot;

    use super::*;
    use crate::error::ApiError;

    fn rows(n: i64) -> Vec<Row> {
        (0..n).map(|i| Row::new().set("n", i)).collect()
    }

    #[test]
    fn test_unknown_widget_is_idle() {
        assert_eq!(WidgetLoader::new().state("nope"), WidgetState::Idle);
    }

    #[test]
    fn test_begin_cancels_previous() {
        let loader = WidgetLoader::new();
        let first = loader.begin("w");
        assert!(loader.state("w").is_loading());
        let second = loader.begin("w");

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!loader.is_current(&first));
        assert!(loader.is_current(&second));
        assert_eq!(second.seq(), first.seq() + 1);
    }

    #[test]
    fn test_stale_response_does_not_overwrite() {
        let loader = WidgetLoader::new();
        let old = loader.begin("w");
        let new = loader.begin("w");

        assert!(loader.complete(&new, Ok(rows(2))));
        assert!(!loader.complete(&old, Ok(rows(9))));
        assert_eq!(loader.state("w").rows().map(<[Row]>::len), Some(2));
    }

    #[test]
    fn test_failure_is_scoped_to_widget() {
        let loader = WidgetLoader::new();
        let a = loader.begin("a");
        let b = loader.begin("b");
        loader.complete(&a, Err(ApiError::http(500, "boom").into()));
        loader.complete(&b, Ok(rows(1)));

        assert_eq!(
            loader.state("a"),
            WidgetState::Failed {
                message: "HTTP 500: boom".into()
            }
        );
        assert!(loader.state("b").rows().is_some());
    }

    #[tokio::test]
    async fn test_newer_load_supersedes_pending_one() {
        let loader = WidgetLoader::new();
        let (_hold, pending) = oneshot::channel::<Vec<Row>>();

        let slow = loader.load("w", || async move { Ok::<_, Error>(pending.await.unwrap_or_default()) });
        let fast = async {
            tokio::task::yield_now().await;
            loader.load("w", || async { Ok::<_, Error>(rows(3)) }).await
        };

        let (slow_applied, fast_applied) = tokio::join!(slow, fast);
        assert!(!slow_applied);
        assert!(fast_applied);
        assert_eq!(loader.state("w").rows().map(<[Row]>::len), Some(3));
    }

    #[tokio::test]
    async fn test_debounced_load_is_cancelled_while_waiting() {
        let loader = WidgetLoader::new();
        let fetched = AtomicBool::new(false);
        let flag = &fetched;

        let waiting = loader.load_after("w", Some(Duration::from_secs(60)), || async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, Error>(rows(1))
        });
        let newer = async {
            tokio::task::yield_now().await;
            loader.load("w", || async { Ok::<_, Error>(rows(2)) }).await
        };

        let (first, second) = tokio::join!(waiting, newer);
        assert!(!first);
        assert!(second);
        assert!(!fetched.load(Ordering::SeqCst));
    }
}
