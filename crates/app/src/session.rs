use dioxus::prelude::*;
use shared_types::{AppError, ComplaintResponse, ErrorCategory, FeedScope, FeedUpdate, UserProfile};

/// Consecutive feed failures tolerated before the loop stops.
/// Re-entering the dashboard starts a fresh loop.
const MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Client session: the signed-in user plus the two live feed tasks.
///
/// Provided once at the root. Cancelling a feed's `Task` is the unsubscribe.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionContext {
    pub current_user: Signal<Option<UserProfile>>,
    mine_feed: Signal<Option<Task>>,
    all_feed: Signal<Option<Task>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            current_user: Signal::new(None),
            mine_feed: Signal::new(None),
            all_feed: Signal::new(None),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user
            .read()
            .as_ref()
            .map(|u| u.is_admin)
            .unwrap_or(false)
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.current_user.set(Some(user));
    }

    /// Drop the user and cancel both feeds.
    pub fn clear(&mut self) {
        self.unsubscribe(FeedScope::Mine);
        self.unsubscribe(FeedScope::All);
        self.current_user.set(None);
    }

    fn slot(&self, scope: FeedScope) -> Signal<Option<Task>> {
        match scope {
            FeedScope::Mine => self.mine_feed,
            FeedScope::All => self.all_feed,
        }
    }

    pub fn unsubscribe(&mut self, scope: FeedScope) {
        let mut slot = self.slot(scope);
        let previous = slot.write().take();
        if let Some(task) = previous {
            task.cancel();
        }
    }

    /// Start long-polling `scope`, replacing `target` on every snapshot.
    ///
    /// An earlier task for the same scope is cancelled first, so at most one
    /// loop per scope is alive.
    pub fn subscribe(
        &mut self,
        scope: FeedScope,
        mut target: Signal<Option<Vec<ComplaintResponse>>>,
        on_error: Callback<String>,
    ) {
        self.unsubscribe(scope);

        let mut session = *self;
        let task = spawn(async move {
            let mut since = 0;
            let mut failures = 0;
            loop {
                let result = server::api::poll_complaint_feed(scope, since)
                    .await
                    .map_err(|e| AppError::from_server_error_or_unavailable(&e.to_string()));

                match next_step(result, &mut failures) {
                    FeedStep::Replace(revision, complaints) => {
                        since = revision;
                        target.set(Some(complaints));
                    }
                    FeedStep::Wait(revision) => since = revision,
                    FeedStep::Retry => {}
                    FeedStep::Verify(message) => {
                        let restored = server::api::get_current_user()
                            .await
                            .map_err(|e| AppError::from_server_error_or_unavailable(&e.to_string()));
                        match after_cutoff(restored, message) {
                            Cutoff::SignedOut => {
                                tracing::info!(scope = scope.as_str(), "session ended elsewhere");
                                // Cancels this task too; the layout sends the visitor to log in.
                                session.clear();
                                break;
                            }
                            Cutoff::Stop(None) => break,
                            Cutoff::Stop(Some(message)) => {
                                on_error.call(message);
                                break;
                            }
                        }
                    }
                    FeedStep::Stop(None) => break,
                    FeedStep::Stop(Some(message)) => {
                        on_error.call(message);
                        break;
                    }
                }
            }
            tracing::debug!(scope = scope.as_str(), "complaint feed stopped");
        });

        self.slot(scope).set(Some(task));
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// What the feed loop does after one poll.
#[derive(Debug, PartialEq)]
enum FeedStep {
    Replace(u64, Vec<ComplaintResponse>),
    Wait(u64),
    Retry,
    /// The server cut the feed off. Ask whether the session survived before
    /// stopping; the message is shown only if it did.
    Verify(Option<String>),
    /// Stop, optionally telling the user why.
    Stop(Option<String>),
}

/// Outcome of re-reading the session after a feed was cut off.
#[derive(Debug, PartialEq)]
enum Cutoff {
    SignedOut,
    Stop(Option<String>),
}

fn after_cutoff(restored: Result<Option<UserProfile>, AppError>, message: Option<String>) -> Cutoff {
    match restored {
        Ok(None) => Cutoff::SignedOut,
        // Still signed in (another tab took the feed over), or the check itself failed.
        Ok(Some(_)) | Err(_) => Cutoff::Stop(message),
    }
}

fn next_step(result: Result<FeedUpdate, AppError>, failures: &mut u32) -> FeedStep {
    match result {
        Ok(FeedUpdate::Snapshot {
            revision,
            complaints,
        }) => {
            *failures = 0;
            FeedStep::Replace(revision, complaints)
        }
        Ok(FeedUpdate::Unchanged { revision }) => {
            *failures = 0;
            FeedStep::Wait(revision)
        }
        Ok(FeedUpdate::Superseded) => FeedStep::Verify(None),
        Err(e) if e.category() == ErrorCategory::Auth => FeedStep::Verify(Some(e.message)),
        Err(e) if e.category() == ErrorCategory::Data => FeedStep::Stop(Some(e.message)),
        Err(_) => {
            *failures += 1;
            if *failures >= MAX_CONSECUTIVE_ERRORS {
                FeedStep::Stop(Some("Error loading complaints".to_string()))
            } else {
                FeedStep::Retry
            }
        }
    }
}
