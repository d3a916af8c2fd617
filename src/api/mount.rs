use crate::core::SurfaceBounds;

/// Host element the chart draws into.
///
/// The box is measured once at `Chart::init` (and again on `Chart::resize`);
/// container resizes are not tracked automatically.
pub trait MountPoint {
    fn bounds(&self) -> SurfaceBounds;
}

impl MountPoint for SurfaceBounds {
    fn bounds(&self) -> SurfaceBounds {
        *self
    }
}
