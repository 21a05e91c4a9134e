use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashboard_core::{update, DashboardState, DashboardView, Effect, Msg};
use engine_logging::engine_trace;

/// Receives a fresh view after every observable state change.
///
/// Views arrive in the order their changes were applied; a view overtaken by
/// a newer one before delivery is dropped. Observers must not dispatch into
/// the store they observe.
pub trait StateObserver: Send + Sync {
    fn state_changed(&self, view: &DashboardView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Slot {
    state: DashboardState,
    closed: bool,
    /// Bumped for every change that produces a view.
    revision: u64,
}

struct Inner {
    slot: Mutex<Slot>,
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn StateObserver>)>>,
    /// Revision of the last view handed to observers; held while delivering.
    delivered: Mutex<u64>,
    next_subscription: AtomicU64,
}

/// Single source of truth for the session, shared by the orchestrator, the
/// poller and any observers.
///
/// Writes are last-write-wins. Once [`StateStore::close`] returns, every
/// dispatch is ignored.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<Inner>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    state: DashboardState::new(),
                    closed: false,
                    revision: 0,
                }),
                observers: Mutex::new(Vec::new()),
                delivered: Mutex::new(0),
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    /// Applies `msg` and returns the effects the caller should execute.
    pub fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let (effects, changed_view) = {
            let mut slot = self.lock_slot();
            if slot.closed {
                engine_trace!("store closed; ignoring {:?}", msg);
                return Vec::new();
            }
            let state = std::mem::take(&mut slot.state);
            let (mut state, effects) = update(state, msg);
            let changed_view = if state.consume_dirty() {
                slot.revision += 1;
                Some((slot.revision, state.view()))
            } else {
                None
            };
            slot.state = state;
            (effects, changed_view)
        };

        if let Some((revision, view)) = changed_view {
            self.notify(revision, &view);
        }
        effects
    }

    pub fn view(&self) -> DashboardView {
        self.lock_slot().state.view()
    }

    pub fn subscribe(&self, observer: Arc<dyn StateObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_observers().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.lock_observers();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Makes the store inert. Safe to call more than once.
    pub fn close(&self) {
        self.lock_slot().closed = true;
        self.lock_observers().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.lock_slot().closed
    }

    fn notify(&self, revision: u64, view: &DashboardView) {
        let mut delivered = self
            .inner
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if revision <= *delivered {
            engine_trace!("dropping superseded view r{}", revision);
            return;
        }
        *delivered = revision;

        // Observers run outside the slot and observer-list locks so they may read the store.
        let observers: Vec<Arc<dyn StateObserver>> = self
            .lock_observers()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.state_changed(view);
        }
    }

    // A panicking observer must not wedge the session; the state is still usable.
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Arc<dyn StateObserver>)>> {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::SearchInput;
    use serde_json::json;
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        views: Mutex<Vec<DashboardView>>,
    }

    impl StateObserver for Recorder {
        fn state_changed(&self, view: &DashboardView) {
            self.views.lock().unwrap().push(view.clone());
        }
    }

    #[test]
    fn observers_see_each_change_once() {
        let store = StateStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        store.dispatch(Msg::QueryChanged("cafes".into()));
        store.dispatch(Msg::QueryChanged("cafes".into()));
        store.dispatch(Msg::SnapshotReceived(json!({"count": 3})));
        store.dispatch(Msg::SnapshotReceived(json!({"count": 3})));

        let views = recorder.views.lock().unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].query, "cafes");
        assert_eq!(views[1].payload, Some(json!({"count": 3})));
    }

    #[test]
    fn unsubscribed_observers_are_not_notified() {
        let store = StateStore::new();
        let recorder = Arc::new(Recorder::default());
        let id = store.subscribe(recorder.clone());

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Msg::LocationChanged("Seattle".into()));

        assert!(recorder.views.lock().unwrap().is_empty());
        assert_eq!(store.view().location, "Seattle");
    }

    #[test]
    fn closed_store_ignores_writes() {
        let store = StateStore::new();
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());
        store.close();

        let effects = store.dispatch(Msg::SearchSubmitted(SearchInput::new("cafes", "Seattle")));
        store.dispatch(Msg::SnapshotReceived(json!({"count": 3})));

        assert!(store.is_closed());
        assert!(effects.is_empty());
        assert_eq!(store.view(), DashboardView::default());
        assert!(recorder.views.lock().unwrap().is_empty());
    }

    struct GatedObserver {
        first_seen: AtomicBool,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
        queries: Mutex<Vec<String>>,
    }

    impl StateObserver for GatedObserver {
        fn state_changed(&self, view: &DashboardView) {
            if !self.first_seen.swap(true, Ordering::SeqCst) {
                self.entered.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
            }
            self.queries.lock().unwrap().push(view.query.clone());
        }
    }

    #[test]
    fn slow_observer_ends_on_latest_view() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let observer = Arc::new(GatedObserver {
            first_seen: AtomicBool::new(false),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
            queries: Mutex::new(Vec::new()),
        });
        let store = StateStore::new();
        store.subscribe(observer.clone());

        let first = {
            let store = store.clone();
            thread::spawn(move || store.dispatch(Msg::QueryChanged("a".into())))
        };
        entered_rx.recv().unwrap();

        // "b" is applied while "a" is still being delivered.
        let second = {
            let store = store.clone();
            thread::spawn(move || store.dispatch(Msg::QueryChanged("b".into())))
        };
        thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();
        first.join().unwrap();
        second.join().unwrap();

        assert_eq!(store.view().query, "b");
        let queries = observer.queries.lock().unwrap();
        assert_eq!(queries.last().map(String::as_str), Some("b"));
        assert_eq!(*queries, vec!["a".to_string(), "b".to_string()]);
    }
}
