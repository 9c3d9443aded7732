#![forbid(unsafe_code)]

use std::rc::Rc;

use tuiloop_core::event::Direction;
use tuiloop_core::view::{FocusRef, Invalidate, WeakFocus};

/// Tracks the single focused element and moves focus between neighbours.
///
/// Only a weak handle is held. An element torn down by its tree reads as
/// "nothing focused".
#[derive(Default)]
pub struct FocusNavigator {
    focused: Option<WeakFocus>,
}

impl FocusNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused element, if it is still alive.
    #[must_use]
    pub fn focused(&self) -> Option<FocusRef> {
        self.focused.as_ref()?.upgrade()
    }

    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.focused().is_some()
    }

    /// Give initial focus to `first` and signal it.
    pub fn focus_initial(&mut self, first: Option<FocusRef>, cx: &mut dyn Invalidate) {
        let Some(element) = first else {
            tracing::debug!("no focusable element");
            self.focused = None;
            return;
        };
        self.focused = Some(Rc::downgrade(&element));
        element.borrow_mut().become_focus(cx);
    }

    /// Move focus one step in `direction`. Returns `true` if focus moved.
    ///
    /// With a neighbour the old element resigns, focus is reassigned, then
    /// the new element becomes focused. Without one nothing happens.
    pub fn navigate(&mut self, direction: Direction, cx: &mut dyn Invalidate) -> bool {
        let Some(current) = self.focused() else {
            return false;
        };
        let next = {
            let element = current.borrow();
            element.neighbor(direction, element.focus_origin())
        };
        let Some(next) = next else {
            tracing::trace!(?direction, "no neighbour");
            return false;
        };
        current.borrow_mut().resign_focus(cx);
        self.focused = Some(Rc::downgrade(&next));
        next.borrow_mut().become_focus(cx);
        tracing::trace!(?direction, "focus moved");
        true
    }
}

impl std::fmt::Debug for FocusNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusNavigator")
            .field("has_focus", &self.has_focus())
            .finish()
    }
}
