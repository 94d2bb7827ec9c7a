//! Resize observation on top of egui's immediate-mode layout.
//!
//! egui has no retained elements, so the UI reports each frame's rects for an
//! element through [`ResizeWatch::poll`]. The watch fires once right after
//! `observe` and then whenever the observed box changes size, the way a
//! browser resize observer behaves.

use eframe::egui::{Id, Rect, Vec2};

/// Which box's size triggers a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObserveBox {
    #[default]
    BorderBox,
    ContentBox,
}

/// Geometry of one element as laid out in the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementLayout {
    /// Outer rect including frame margins and stroke.
    pub border: Rect,
    /// Inner rect holding the content.
    pub content: Rect,
    /// Top edge of the element's parent, when known.
    pub parent_top: Option<f32>,
}

impl ElementLayout {
    pub fn new(border: Rect, content: Rect) -> Self {
        Self {
            border,
            content,
            parent_top: None,
        }
    }

    pub fn with_parent_top(mut self, top: f32) -> Self {
        self.parent_top = Some(top);
        self
    }

    fn size_of(&self, observe_box: ObserveBox) -> Vec2 {
        match observe_box {
            ObserveBox::BorderBox => self.border.size(),
            ObserveBox::ContentBox => self.content.size(),
        }
    }
}

/// Delivered to the observer callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEntry {
    pub target: Id,
    pub layout: ElementLayout,
}

impl ResizeEntry {
    pub fn height(&self) -> f32 {
        self.layout.border.height()
    }

    pub fn top(&self) -> f32 {
        self.layout.border.top()
    }

    pub fn bottom(&self) -> f32 {
        self.layout.border.bottom()
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    target: Id,
    observe_box: ObserveBox,
    last_size: Option<Vec2>,
}

/// Resize observer for a single target element.
#[derive(Debug, Default)]
pub struct ResizeWatch {
    observation: Option<Observation>,
}

impl ResizeWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `target`. Observing the already observed target
    /// again only updates the box option.
    pub fn observe(&mut self, target: Id, observe_box: ObserveBox) {
        match &mut self.observation {
            Some(obs) if obs.target == target => obs.observe_box = observe_box,
            _ => {
                self.observation = Some(Observation {
                    target,
                    observe_box,
                    last_size: None,
                })
            }
        }
    }

    pub fn unobserve(&mut self, target: Id) {
        if self.observation.is_some_and(|obs| obs.target == target) {
            self.observation = None;
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Feed this frame's layout of `target`. Returns an entry when the
    /// observer should fire.
    pub fn poll(&mut self, target: Id, layout: &ElementLayout) -> Option<ResizeEntry> {
        let obs = self.observation.as_mut()?;
        if obs.target != target {
            return None;
        }
        let size = layout.size_of(obs.observe_box);
        if obs.last_size == Some(size) {
            return None;
        }
        obs.last_size = Some(size);
        Some(ResizeEntry {
            target,
            layout: *layout,
        })
    }
}
