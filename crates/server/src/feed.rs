//! Live complaint feeds.
//!
//! [`FeedHub`] is an observer registry: every write to the complaints table
//! ends with [`FeedHub::publish`], which hands each subscriber a complete,
//! scope-filtered snapshot. Browsers reach it through [`poll`], a long-poll
//! that holds one session-keyed subscription while it waits.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::time::Duration;

use shared_types::{AppError, ComplaintResponse, FeedScope, FeedUpdate};
use sqlx::{Pool, Postgres};

use crate::auth::jwt::Claims;
use crate::repo;

/// A complete replacement list delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub revision: u64,
    pub complaints: Vec<ComplaintResponse>,
}

/// Which rows a subscriber sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    Submitter(i64),
    Everything,
}

impl FeedFilter {
    /// Resolve a requested scope for the caller. Only admins may watch everything.
    pub fn for_caller(scope: FeedScope, claims: &Claims) -> Result<Self, AppError> {
        match scope {
            FeedScope::Mine => Ok(FeedFilter::Submitter(claims.sub)),
            FeedScope::All if claims.is_admin() => Ok(FeedFilter::Everything),
            FeedScope::All => Err(AppError::forbidden("Administrator access required")),
        }
    }

    fn apply(&self, complaints: &[ComplaintResponse]) -> Vec<ComplaintResponse> {
        match self {
            FeedFilter::Everything => complaints.to_vec(),
            FeedFilter::Submitter(user_id) => complaints
                .iter()
                .filter(|c| c.submitter.as_ref().map(|s| s.user_id) == Some(*user_id))
                .cloned()
                .collect(),
        }
    }
}

type FeedCallback = Arc<dyn Fn(FeedSnapshot) + Send + Sync>;

struct Subscriber {
    filter: FeedFilter,
    callback: FeedCallback,
}

struct HubState {
    next_id: u64,
    revision: u64,
    subscribers: HashMap<u64, Subscriber>,
}

/// Observer registry for complaint snapshots.
pub struct FeedHub {
    state: Mutex<HubState>,
    sessions: Mutex<HashMap<(String, FeedScope), Subscription>>,
    /// Held from reload to publish, so revisions follow commit order.
    reload: tokio::sync::Mutex<()>,
}

/// Registration handle. Dropping it (or calling [`Subscription::cancel`]) unsubscribes.
pub struct Subscription {
    id: u64,
    hub: Weak<FeedHub>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FeedHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HubState {
                next_id: 1,
                // Clients start at 0, so their first poll is always answered at once.
                revision: 1,
                subscribers: HashMap::new(),
            }),
            sessions: Mutex::new(HashMap::new()),
            reload: tokio::sync::Mutex::new(()),
        })
    }

    pub fn revision(&self) -> u64 {
        lock(&self.state).revision
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }

    pub fn subscribe<F>(self: &Arc<Self>, filter: FeedFilter, callback: F) -> Subscription
    where
        F: Fn(FeedSnapshot) + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.insert(
            id,
            Subscriber {
                filter,
                callback: Arc::new(callback),
            },
        );
        Subscription {
            id,
            hub: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        let removed = lock(&self.state).subscribers.remove(&id);
        drop(removed);
    }

    /// Deliver `complaints` (the full collection, newest first) to every
    /// subscriber. Returns the new revision.
    pub fn publish(&self, complaints: &[ComplaintResponse]) -> u64 {
        let (revision, deliveries) = {
            let mut state = lock(&self.state);
            state.revision += 1;
            let deliveries: Vec<(FeedFilter, FeedCallback)> = state
                .subscribers
                .values()
                .map(|s| (s.filter, Arc::clone(&s.callback)))
                .collect();
            (state.revision, deliveries)
        };

        tracing::debug!(revision, subscribers = deliveries.len(), "publishing complaint snapshot");
        for (filter, callback) in deliveries {
            callback(FeedSnapshot {
                revision,
                complaints: filter.apply(complaints),
            });
        }
        revision
    }

    /// Register the one subscription a session may hold for `scope`,
    /// cancelling whatever it held before.
    pub fn subscribe_session<F>(
        self: &Arc<Self>,
        session_id: &str,
        scope: FeedScope,
        filter: FeedFilter,
        callback: F,
    ) -> u64
    where
        F: Fn(FeedSnapshot) + Send + Sync + 'static,
    {
        let subscription = self.subscribe(filter, callback);
        let id = subscription.id();
        let previous = lock(&self.sessions).insert((session_id.to_string(), scope), subscription);
        if previous.is_some() {
            tracing::debug!(scope = scope.as_str(), "replaced session feed subscription");
        }
        drop(previous);
        id
    }

    /// Drop a session subscription, unless a newer one already replaced it.
    pub fn release_session(&self, session_id: &str, scope: FeedScope, id: u64) {
        let released = {
            let mut sessions = lock(&self.sessions);
            let key = (session_id.to_string(), scope);
            match sessions.get(&key) {
                Some(current) if current.id() == id => sessions.remove(&key),
                _ => None,
            }
        };
        drop(released);
    }

    /// Cancel both feeds of a session. Used on logout.
    pub fn cancel_session(&self, session_id: &str) {
        let cancelled: Vec<Subscription> = {
            let mut sessions = lock(&self.sessions);
            [FeedScope::Mine, FeedScope::All]
                .into_iter()
                .filter_map(|scope| sessions.remove(&(session_id.to_string(), scope)))
                .collect()
        };
        if !cancelled.is_empty() {
            tracing::debug!(count = cancelled.len(), "cancelled session feeds");
        }
    }
}

/// Hub shared by server functions and the REST router.
pub fn global_hub() -> Arc<FeedHub> {
    static HUB: OnceLock<Arc<FeedHub>> = OnceLock::new();
    Arc::clone(HUB.get_or_init(FeedHub::new))
}

/// Reload every complaint and push the snapshot to all subscribers.
/// A failed reload is logged; the write that triggered it already succeeded.
pub async fn publish_latest(pool: &Pool<Postgres>, hub: &FeedHub) {
    publish_loaded(hub, async {
        let rows = repo::complaint::list_all(pool).await?;
        Ok::<_, AppError>(rows.into_iter().map(ComplaintResponse::from).collect())
    })
    .await;
}

/// Run `load` and publish its result while holding the hub's reload lock.
///
/// A writer that reloads before another commits also publishes before it,
/// so the newest revision always carries the newest list.
pub async fn publish_loaded<L>(hub: &FeedHub, load: L) -> Option<u64>
where
    L: Future<Output = Result<Vec<ComplaintResponse>, AppError>>,
{
    let _reload = hub.reload.lock().await;
    match load.await {
        Ok(complaints) => Some(hub.publish(&complaints)),
        Err(e) => {
            tracing::warn!(error = %e, "could not reload complaints for feed");
            None
        }
    }
}

/// Long-poll one feed.
///
/// Answers at once with a snapshot when `since` is not the current revision.
/// Otherwise waits up to `wait` for the next publish. The wait holds the
/// session's subscription for `scope`, so a second poll for the same session
/// and scope ends the first with [`FeedUpdate::Superseded`].
pub async fn poll<L>(
    hub: &Arc<FeedHub>,
    session_id: &str,
    scope: FeedScope,
    filter: FeedFilter,
    since: u64,
    wait: Duration,
    load: L,
) -> Result<FeedUpdate, AppError>
where
    L: Future<Output = Result<Vec<ComplaintResponse>, AppError>>,
{
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let id = hub.subscribe_session(session_id, scope, filter, move |snapshot| {
        let _ = tx.send(snapshot);
    });

    let current = hub.revision();
    if current != since {
        let loaded = load.await;
        hub.release_session(session_id, scope, id);
        return Ok(FeedUpdate::Snapshot {
            revision: current,
            complaints: loaded?,
        });
    }

    let outcome = tokio::time::timeout(wait, rx.recv()).await;
    hub.release_session(session_id, scope, id);

    Ok(match outcome {
        Ok(Some(snapshot)) => FeedUpdate::Snapshot {
            revision: snapshot.revision,
            complaints: snapshot.complaints,
        },
        Ok(None) => FeedUpdate::Superseded,
        Err(_) => FeedUpdate::Unchanged { revision: current },
    })
}
