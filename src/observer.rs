//! Render-height observation for message elements.
//!
//! A `RenderObserver` watches one rendered message. It only attaches when the
//! message is the entry message of the view or embeds files, since only
//! those can change height after the first layout. The first measurement
//! reports where the entry message landed; every later resize reports a
//! height delta so the timeline can keep its scroll position.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use eframe::egui::Id;

use crate::ids::FileId;
use crate::resize::{ElementLayout, ObserveBox, ResizeEntry, ResizeWatch};
use crate::signal::{Signal, Subscription};

/// Geometry change reported after the first measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightChange {
    /// `current height - last height`, negative when the element shrank.
    pub height_diff: f32,
    pub top: f32,
    pub bottom: f32,
    pub last_top: f32,
    pub last_bottom: f32,
    /// Creation time of the observed message, if known.
    pub date: Option<DateTime<Utc>>,
}

/// Notifications sent to the view that owns the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObserverEvent {
    /// The entry message got its first layout, `offset` pixels below the
    /// top of its parent. Sent at most once per element.
    EntryMessageLoaded { element: Id, offset: f32 },
    /// An already measured element changed height.
    HeightChanged { element: Id, change: HeightChange },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmeasured,
    Measured,
}

pub struct RenderObserver {
    element: Id,
    watch: ResizeWatch,
    events: Sender<ObserverEvent>,

    is_entry_message: bool,
    file_count: usize,
    message_date: Option<DateTime<Utc>>,

    mounted: bool,
    /// Set after the first measurement or a detach; no more attach attempts.
    attach_stopped: bool,
    phase: Phase,

    last_height: f32,
    last_top: f32,
    last_bottom: f32,
}

impl RenderObserver {
    pub fn new(element: Id, events: Sender<ObserverEvent>) -> Self {
        Self {
            element,
            watch: ResizeWatch::new(),
            events,
            is_entry_message: false,
            file_count: 0,
            message_date: None,
            mounted: false,
            attach_stopped: false,
            phase: Phase::Unmeasured,
            last_height: 0.0,
            last_top: 0.0,
            last_bottom: 0.0,
        }
    }

    pub fn with_entry_message(mut self, is_entry_message: bool) -> Self {
        self.is_entry_message = is_entry_message;
        self
    }

    pub fn with_file_count(mut self, file_count: usize) -> Self {
        self.file_count = file_count;
        self
    }

    pub fn with_message_date(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.message_date = date;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_observing(&self) -> bool {
        self.watch.is_observing()
    }

    pub fn set_entry_message(&mut self, is_entry_message: bool) {
        self.is_entry_message = is_entry_message;
        self.evaluate_attachment();
    }

    pub fn set_file_count(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.evaluate_attachment();
    }

    pub fn set_message_date(&mut self, date: Option<DateTime<Utc>>) {
        self.message_date = date;
    }

    /// Whether the element is worth watching at all.
    pub fn wants_observation(&self) -> bool {
        self.is_entry_message || self.file_count > 0
    }

    fn evaluate_attachment(&mut self) {
        if self.attach_stopped || !self.mounted || !self.wants_observation() {
            return;
        }
        if !self.watch.is_observing() {
            tracing::trace!(element = ?self.element, entry = self.is_entry_message, files = self.file_count, "observing element height");
        }
        self.watch.observe(self.element, ObserveBox::BorderBox);
    }

    /// Feed the element's layout for this frame.
    pub fn layout(&mut self, layout: &ElementLayout) {
        if !self.mounted {
            self.mounted = true;
            self.evaluate_attachment();
        }
        if let Some(entry) = self.watch.poll(self.element, layout) {
            self.on_resize(&entry);
        }
    }

    fn on_resize(&mut self, entry: &ResizeEntry) {
        let (height, top, bottom) = (entry.height(), entry.top(), entry.bottom());

        match self.phase {
            Phase::Unmeasured => {
                self.phase = Phase::Measured;
                self.attach_stopped = true;

                if self.is_entry_message {
                    let parent_top = entry.layout.parent_top.unwrap_or(0.0);
                    self.emit(ObserverEvent::EntryMessageLoaded {
                        element: self.element,
                        offset: top - parent_top,
                    });
                }
            }
            Phase::Measured => {
                self.emit(ObserverEvent::HeightChanged {
                    element: self.element,
                    change: HeightChange {
                        height_diff: height - self.last_height,
                        top,
                        bottom,
                        last_top: self.last_top,
                        last_bottom: self.last_bottom,
                        date: self.message_date,
                    },
                });
            }
        }

        self.last_height = height;
        self.last_top = top;
        self.last_bottom = bottom;
    }

    /// Stop observing for good, e.g. after navigating away.
    pub fn detach(&mut self) {
        if self.watch.is_observing() {
            tracing::trace!(element = ?self.element, "detaching height observer");
        }
        self.attach_stopped = true;
        self.watch.unobserve(self.element);
    }

    /// The element is no longer rendered.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.detach();
    }

    fn emit(&self, event: ObserverEvent) {
        // The owning view may already be gone
        if self.events.send(event).is_err() {
            tracing::trace!(element = ?self.element, "observer event dropped, view closed");
        }
    }

    /// Wire the observer to its reactive inputs.
    pub fn bind(mut self, inputs: &ObserverInputs) -> BoundObserver {
        self.is_entry_message = inputs.is_entry_message.get();
        self.file_count = inputs.file_ids.with(Vec::len);

        let observer = Rc::new(RefCell::new(self));
        let mut subscriptions = Vec::with_capacity(3);

        let weak = Rc::downgrade(&observer);
        subscriptions.push(inputs.is_entry_message.subscribe(move |is_entry| {
            with_observer(&weak, |obs| obs.set_entry_message(*is_entry));
        }));

        let weak = Rc::downgrade(&observer);
        subscriptions.push(inputs.file_ids.subscribe(move |files| {
            with_observer(&weak, |obs| obs.set_file_count(files.len()));
        }));

        let weak = Rc::downgrade(&observer);
        subscriptions.push(inputs.route_path.subscribe(move |_| {
            with_observer(&weak, RenderObserver::detach);
        }));

        BoundObserver {
            observer,
            _subscriptions: subscriptions,
        }
    }
}

fn with_observer(weak: &Weak<RefCell<RenderObserver>>, f: impl FnOnce(&mut RenderObserver)) {
    if let Some(observer) = weak.upgrade() {
        f(&mut observer.borrow_mut());
    }
}

/// Reactive inputs of one observer.
#[derive(Clone, Debug)]
pub struct ObserverInputs {
    pub is_entry_message: Signal<bool>,
    pub file_ids: Signal<Vec<FileId>>,
    /// Navigation path; any change detaches the observer.
    pub route_path: Signal<String>,
}

impl ObserverInputs {
    pub fn new(route_path: Signal<String>) -> Self {
        Self {
            is_entry_message: Signal::new(false),
            file_ids: Signal::new(Vec::new()),
            route_path,
        }
    }
}

/// An observer wired to its inputs. Dropping it unmounts the element.
pub struct BoundObserver {
    observer: Rc<RefCell<RenderObserver>>,
    _subscriptions: Vec<Subscription>,
}

impl BoundObserver {
    pub fn layout(&self, layout: &ElementLayout) {
        self.observer.borrow_mut().layout(layout);
    }

    pub fn set_message_date(&self, date: Option<DateTime<Utc>>) {
        self.observer.borrow_mut().set_message_date(date);
    }

    pub fn is_observing(&self) -> bool {
        self.observer.borrow().is_observing()
    }

    pub fn phase(&self) -> Phase {
        self.observer.borrow().phase()
    }
}

impl Drop for BoundObserver {
    fn drop(&mut self) {
        if let Ok(mut observer) = self.observer.try_borrow_mut() {
            observer.unmount();
        }
    }
}
