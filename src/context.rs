/// Page-level state shared by the new tab components

use std::cell::RefCell;
use std::rc::Rc;

use crate::recent::{DomainRecord, Tracker};
use crate::settings::Settings;
use crate::storage::KeyValueStore;

/// Built once at startup and handed to every component that touches
/// persisted state.
pub struct NewTabContext<S: KeyValueStore> {
    store: Rc<S>,
    tracker: RefCell<Tracker<Rc<S>>>,
}

impl<S: KeyValueStore> NewTabContext<S> {
    pub fn new(store: S) -> Self {
        let store = Rc::new(store);
        let tracker = RefCell::new(Tracker::load(Rc::clone(&store)));
        NewTabContext { store, tracker }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tracker(&self) -> &RefCell<Tracker<Rc<S>>> {
        &self.tracker
    }

    pub fn settings(&self) -> Settings {
        Settings::load(self.store.as_ref())
    }

    /// Current shortcuts, most recent first
    pub fn recent(&self) -> Vec<DomainRecord> {
        self.tracker.borrow().snapshot().to_vec()
    }

    /// Record a click on `url` and return the updated shortcuts
    pub fn visit(&self, url: &str, now: i64) -> Vec<DomainRecord> {
        let mut tracker = self.tracker.borrow_mut();
        tracker.record_visit(url, now);
        tracker.snapshot().to_vec()
    }

    /// Reset every setting and forget all recent domains
    pub fn reset(&self) -> Settings {
        self.tracker.borrow_mut().clear();
        Settings::reset(self.store.as_ref())
    }
}
