//! Ownership of the rendering currently on display.

/// Turns document text into a displayable resource and disposes of it.
pub trait ResourceSink {
    type Handle;

    fn publish(&mut self, document: &str) -> Self::Handle;

    fn release(&mut self, handle: Self::Handle);
}

/// Holds at most one published handle.
///
/// Showing a new document releases the superseded handle, and dropping the
/// slot releases the last one. Each handle is released exactly once.
pub struct DisplaySlot<S: ResourceSink> {
    sink: S,
    current: Option<S::Handle>,
}

impl<S: ResourceSink> DisplaySlot<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    /// Publish `document` and release whatever it replaces.
    pub fn show(&mut self, document: &str) -> &S::Handle {
        let handle = self.sink.publish(document);
        if let Some(previous) = self.current.take() {
            self.sink.release(previous);
        }
        self.current.insert(handle)
    }

    pub fn current(&self) -> Option<&S::Handle> {
        self.current.as_ref()
    }

    /// Release the displayed handle, if any.
    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            self.sink.release(previous);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ResourceSink> Drop for DisplaySlot<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Ledger {
        published: Vec<usize>,
        released: Vec<usize>,
    }

    struct CountingSink(Rc<RefCell<Ledger>>);

    impl ResourceSink for CountingSink {
        type Handle = usize;

        fn publish(&mut self, _document: &str) -> usize {
            let mut ledger = self.0.borrow_mut();
            let id = ledger.published.len();
            ledger.published.push(id);
            id
        }

        fn release(&mut self, handle: usize) {
            self.0.borrow_mut().released.push(handle);
        }
    }

    #[test]
    fn test_superseded_handles_released_once() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let mut slot = DisplaySlot::new(CountingSink(ledger.clone()));

        assert_eq!(*slot.show("<svg/>"), 0);
        assert_eq!(*slot.show("<svg/>"), 1);
        assert_eq!(*slot.show("<svg/>"), 2);
        assert_eq!(ledger.borrow().released, [0, 1]);
        assert_eq!(slot.current(), Some(&2));

        drop(slot);
        assert_eq!(ledger.borrow().released, [0, 1, 2]);
    }

    #[test]
    fn test_clear_then_drop_does_not_double_release() {
        let ledger = Rc::new(RefCell::new(Ledger::default()));
        let mut slot = DisplaySlot::new(CountingSink(ledger.clone()));
        slot.show("<svg/>");
        slot.clear();
        slot.clear();
        assert!(slot.current().is_none());
        drop(slot);
        assert_eq!(ledger.borrow().released, [0]);
    }
}
