#![forbid(unsafe_code)]

use tuiloop_core::geometry::Size;
use tuiloop_core::view::Surface;

use crate::focus::FocusNavigator;

/// The single window: root surface, size, and focus.
pub struct Window {
    surface: Box<dyn Surface>,
    size: Size,
    drawn: bool,
    focus: FocusNavigator,
}

impl Window {
    #[must_use]
    pub fn new(surface: Box<dyn Surface>, size: Size) -> Self {
        Self {
            surface,
            size,
            drawn: false,
            focus: FocusNavigator::new(),
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn focus(&self) -> &FocusNavigator {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusNavigator {
        &mut self.focus
    }

    #[must_use]
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Whether the first render pass has happened.
    #[must_use]
    pub fn has_drawn(&self) -> bool {
        self.drawn
    }

    /// Adopt a new size and drop size-dependent caches.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.surface.invalidate_size_cache();
    }

    /// Lay out at the current size, then render: `draw` the first time,
    /// `update` afterwards. Render failures are logged and absorbed.
    pub fn render(&mut self) {
        self.surface.layout(self.size);
        let result = if self.drawn {
            self.surface.update()
        } else {
            self.drawn = true;
            self.surface.draw()
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, size = %self.size, "render pass failed");
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("size", &self.size)
            .field("drawn", &self.drawn)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}
