use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::MountPoint;
use crate::core::SurfaceBounds;

/// Mount point backed by a GTK widget.
///
/// The surface box is the widget's allocated size, offset by its position
/// inside `root` when one is given so host-space pointer coordinates can be
/// fed to the chart unchanged.
pub struct GtkMount {
    widget: gtk::Widget,
    root: Option<gtk::Widget>,
}

impl GtkMount {
    #[must_use]
    pub fn new(widget: &impl IsA<gtk::Widget>) -> Self {
        Self {
            widget: widget.clone().upcast(),
            root: None,
        }
    }

    /// Measures pointer offsets relative to `root` instead of the widget.
    #[must_use]
    pub fn relative_to(mut self, root: &impl IsA<gtk::Widget>) -> Self {
        self.root = Some(root.clone().upcast());
        self
    }
}

impl MountPoint for GtkMount {
    fn bounds(&self) -> SurfaceBounds {
        let width = u32::try_from(self.widget.width()).unwrap_or(0);
        let height = u32::try_from(self.widget.height()).unwrap_or(0);
        let (left, top) = self
            .root
            .as_ref()
            .and_then(|root| self.widget.translate_coordinates(root, 0.0, 0.0))
            .unwrap_or((0.0, 0.0));
        SurfaceBounds::new(left, top, width, height)
    }
}
