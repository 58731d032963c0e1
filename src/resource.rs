use std::fmt::{Debug, Formatter};
use std::mem;

use pp_ffi::PpResource;

use crate::browser::Core;
use crate::config::FaultAttitude;
use crate::error::{PpResult, Violation};
use crate::invariant;

/// Owning handle to one reference on a host resource.
///
/// A non-null `Resource` always accounts for exactly one reference held by
/// the counting service: cloning adds one, dropping releases one. A resource
/// built without a [`Core`] performs no counting at all.
#[derive(Default)]
pub struct Resource {
    pp_resource: PpResource,
    core: Option<Core>,
}

impl Resource {
    pub fn null() -> Self {
        Self::default()
    }

    /// Takes a new reference on `resource`.
    pub fn new(core: impl Into<Option<Core>>, resource: PpResource) -> Self {
        let core = core.into();
        if !resource.is_null() {
            if let Some(core) = &core {
                core.add_ref_resource(resource);
            }
        }

        Self {
            pp_resource: resource,
            core,
        }
    }

    /// Wraps a reference the caller already owns, without adding one.
    pub fn from_pass_ref(core: impl Into<Option<Core>>, resource: PpResource) -> Self {
        Self {
            pp_resource: resource,
            core: core.into(),
        }
    }

    /// Adopts an owned reference into a resource that is still null.
    ///
    /// Adopting into a non-null resource is a programmer error; the current
    /// handle is kept and `resource` is left with the caller.
    pub fn pass_ref_from_constructor(
        &mut self,
        resource: PpResource,
        attitude: FaultAttitude,
    ) -> PpResult<()> {
        if !self.pp_resource.is_null() {
            return Err(invariant::report(
                attitude,
                Violation::AdoptIntoNonNull {
                    held: self.pp_resource,
                    incoming: resource,
                },
            ));
        }

        self.pp_resource = resource;
        Ok(())
    }

    /// Copy-and-swap: the previous handle is released when the temporary
    /// goes out of scope.
    pub fn assign(&mut self, other: &Resource) {
        let mut copy = other.clone();
        self.swap(&mut copy);
    }

    pub fn swap(&mut self, other: &mut Resource) {
        mem::swap(self, other);
    }

    /// Gives up ownership of the reference without releasing it.
    pub fn detach(mut self) -> PpResource {
        mem::replace(&mut self.pp_resource, PpResource::NULL)
    }

    pub fn is_null(&self) -> bool {
        self.pp_resource.is_null()
    }

    pub fn pp_resource(&self) -> PpResource {
        self.pp_resource
    }

    pub fn core(&self) -> Option<&Core> {
        self.core.as_ref()
    }
}

impl Clone for Resource {
    fn clone(&self) -> Self {
        Self::new(self.core.clone(), self.pp_resource)
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        if self.is_null() {
            return;
        }

        if let Some(core) = &self.core {
            core.release_resource(self.pp_resource);
        }
    }
}

impl Debug for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Resource").field(&self.pp_resource.0).finish()
    }
}
