use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pp_ffi::PpResource;

use crate::browser::{Core, ResourceCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    AddRef(PpResource),
    Release(PpResource),
}

/// Counting service that records every call.
#[derive(Default)]
pub struct RecordingCounter {
    counts: RefCell<HashMap<PpResource, i64>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingCounter {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn count(&self, resource: PpResource) -> i64 {
        self.counts.borrow().get(&resource).copied().unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl ResourceCounter for RecordingCounter {
    fn add_ref_resource(&self, resource: PpResource) {
        *self.counts.borrow_mut().entry(resource).or_default() += 1;
        self.calls.borrow_mut().push(Call::AddRef(resource));
    }

    fn release_resource(&self, resource: PpResource) {
        *self.counts.borrow_mut().entry(resource).or_default() -= 1;
        self.calls.borrow_mut().push(Call::Release(resource));
    }
}

pub fn recording_core() -> (Core, Rc<RecordingCounter>) {
    let counter = RecordingCounter::new();
    (Core::new(counter.clone()), counter)
}
