//! Host-provided services used by the wrappers.
//!
//! Counting is reached through a [`Core`] handle that callers inject, so a
//! [`Resource`](crate::resource::Resource) never looks up a process-wide
//! singleton.

use std::ffi::{c_void, CStr};
use std::fmt::{Debug, Formatter};
use std::ptr::NonNull;
use std::rc::Rc;

use pp_ffi::ppb::{PpbCore, PpbInstance};
use pp_ffi::{GetBrowserInterface, PpResource};
use tracing::trace;

/// External reference-counting service.
pub trait ResourceCounter {
    fn add_ref_resource(&self, resource: PpResource);

    fn release_resource(&self, resource: PpResource);
}

impl<C: ResourceCounter + ?Sized> ResourceCounter for Rc<C> {
    fn add_ref_resource(&self, resource: PpResource) {
        (**self).add_ref_resource(resource)
    }

    fn release_resource(&self, resource: PpResource) {
        (**self).release_resource(resource)
    }
}

/// Cloneable handle to the counting service.
#[derive(Clone)]
pub struct Core {
    counter: Rc<dyn ResourceCounter>,
}

impl Core {
    pub fn new<C: ResourceCounter + 'static>(counter: C) -> Self {
        Self {
            counter: Rc::new(counter),
        }
    }

    pub fn add_ref_resource(&self, resource: PpResource) {
        trace!("add ref {:?}", resource);
        self.counter.add_ref_resource(resource);
    }

    pub fn release_resource(&self, resource: PpResource) {
        trace!("release {:?}", resource);
        self.counter.release_resource(resource);
    }
}

impl Debug for Core {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("counter", &Rc::as_ptr(&self.counter))
            .finish()
    }
}

/// Counting service backed by the host's `PPB_Core` table.
pub struct BrowserCore {
    vtb: &'static PpbCore,
}

impl BrowserCore {
    pub fn new(vtb: &'static PpbCore) -> Self {
        Self { vtb }
    }

    /// # Safety
    /// `ptr` must be null or point to a `PpbCore` that lives for the rest of
    /// the process, as returned by the host for `PPB_CORE_INTERFACE`.
    pub unsafe fn from_raw(ptr: *const c_void) -> Option<Self> {
        ptr.cast::<PpbCore>().as_ref().map(Self::new)
    }
}

impl ResourceCounter for BrowserCore {
    fn add_ref_resource(&self, resource: PpResource) {
        (self.vtb.add_ref_resource)(resource)
    }

    fn release_resource(&self, resource: PpResource) {
        (self.vtb.release_resource)(resource)
    }
}

/// Queries the host for an interface table. `None` when the host
/// returns null.
pub fn get_interface(
    get_browser_interface: GetBrowserInterface,
    name: &CStr,
) -> Option<NonNull<c_void>> {
    let ptr = get_browser_interface(name.as_ptr());
    NonNull::new(ptr.cast_mut())
}

/// # Safety
/// `ptr` must be null or point to a `PpbInstance` that lives for the rest of
/// the process.
pub unsafe fn instance_interface(ptr: *const c_void) -> Option<&'static PpbInstance> {
    ptr.cast::<PpbInstance>().as_ref()
}
