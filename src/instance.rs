//! Plugin instances and their per-instance object registry.
//!
//! Capability implementations (printing, find, scrollbars, ...) register a
//! pointer to themselves under their interface name when they are attached to
//! an instance. Host callbacks only carry a [`PpInstance`], so the callback
//! side resolves the implementation with
//! [`Instance::get_per_instance_object`].
//!
//! The registry never owns what it points to. Every object must be removed
//! before its instance goes away; an instance dropped with entries left is
//! reported as [`Violation::LeakedPerInstanceObjects`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

use pp_ffi::ppb::PpbInstance;
use pp_ffi::{from_pp_bool, PpInstance};
use tracing::{debug, error};

use crate::config::FaultAttitude;
use crate::error::{PpResult, Violation};
use crate::invariant;
use crate::module::InstanceDirectory;

/// Non-owning pointer to a per-instance object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pointer: *mut (),
}

impl ObjectRef {
    pub fn from_ref<T>(val: &T) -> Self {
        Self {
            pointer: val as *const T as *mut (),
        }
    }

    pub fn as_ptr(&self) -> *const () {
        self.pointer
    }

    /// # Safety
    /// The object must still be alive and actually be a `T`.
    pub unsafe fn cast_ref<'a, T>(&self) -> &'a T {
        &*(self.pointer as *const T)
    }
}

impl Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectRef({:p})", self.pointer)
    }
}

/// Plugin-side behavior of an instance.
pub trait InstanceHandler {
    /// Called once, right after the instance is created, with the embed
    /// element's attributes. Returning `false` destroys the instance.
    fn init(&mut self, _instance: &Rc<Instance>, _args: &[(String, String)]) -> bool {
        true
    }

    /// Called before the instance leaves the directory. Per-instance objects
    /// still registered must be released here.
    fn did_destroy(&mut self, _instance: &Rc<Instance>) {
        // nop
    }
}

impl InstanceHandler for () {}

pub struct Instance {
    pp_instance: PpInstance,
    fault_attitude: FaultAttitude,
    interface: Option<&'static PpbInstance>,
    objects: RefCell<HashMap<String, ObjectRef>>,
    handler: RefCell<Box<dyn InstanceHandler>>,
}

impl Instance {
    pub fn new(
        pp_instance: PpInstance,
        fault_attitude: FaultAttitude,
        interface: Option<&'static PpbInstance>,
        handler: Box<dyn InstanceHandler>,
    ) -> Self {
        Self {
            pp_instance,
            fault_attitude,
            interface,
            objects: RefCell::new(HashMap::new()),
            handler: RefCell::new(handler),
        }
    }

    pub fn pp_instance(&self) -> PpInstance {
        self.pp_instance
    }

    pub fn fault_attitude(&self) -> FaultAttitude {
        self.fault_attitude
    }

    /// Registers `object` as the implementation of `interface_name`.
    ///
    /// Only one object per interface is allowed; a second registration is
    /// reported and the first one stays in place.
    pub fn add_per_instance_object(
        &self,
        interface_name: impl Into<String>,
        object: ObjectRef,
    ) -> PpResult<()> {
        let name = interface_name.into();
        if self.objects.borrow().contains_key(&name) {
            return Err(invariant::report(
                self.fault_attitude,
                Violation::DoubleRegistration { name },
            ));
        }

        debug!(
            "instance {:?}: registered {} -> {:?}",
            self.pp_instance, name, object
        );
        self.objects.borrow_mut().insert(name, object);
        Ok(())
    }

    /// Removes the registration for `interface_name`.
    ///
    /// Removing an interface that has no object is reported and changes
    /// nothing. A mismatched `object` is reported before the entry is
    /// removed anyway.
    pub fn remove_per_instance_object(
        &self,
        interface_name: &str,
        object: ObjectRef,
    ) -> PpResult<()> {
        let found = self.objects.borrow().get(interface_name).copied();
        let Some(found) = found else {
            return Err(invariant::report(
                self.fault_attitude,
                Violation::UnregisterMissing {
                    name: interface_name.to_owned(),
                },
            ));
        };

        let mismatch = (found != object).then(|| {
            invariant::report(
                self.fault_attitude,
                Violation::ObjectMismatch {
                    name: interface_name.to_owned(),
                },
            )
        });

        self.objects.borrow_mut().remove(interface_name);
        debug!(
            "instance {:?}: unregistered {}",
            self.pp_instance, interface_name
        );

        match mismatch {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolves the object registered for `interface_name` on the instance
    /// known to `directory` as `instance`. Unknown instances and unknown
    /// interfaces both yield `None`.
    pub fn get_per_instance_object(
        directory: &dyn InstanceDirectory,
        instance: PpInstance,
        interface_name: &str,
    ) -> Option<ObjectRef> {
        let that = directory.instance_for_pp_instance(instance)?;
        that.per_instance_object(interface_name)
    }

    pub fn per_instance_object(&self, interface_name: &str) -> Option<ObjectRef> {
        self.objects.borrow().get(interface_name).copied()
    }

    pub fn has_per_instance_object(&self, interface_name: &str) -> bool {
        self.objects.borrow().contains_key(interface_name)
    }

    pub fn per_instance_object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    /// `false` when the host does not provide `PPB_Instance`.
    pub fn is_full_frame(&self) -> bool {
        match self.interface {
            Some(ppb) => from_pp_bool((ppb.is_full_frame)(self.pp_instance)),
            None => {
                debug!("PPB_Instance unavailable, is_full_frame = false");
                false
            }
        }
    }

    pub(crate) fn init(self: &Rc<Self>, args: &[(String, String)]) -> bool {
        self.handler.borrow_mut().init(self, args)
    }

    pub(crate) fn did_destroy(self: &Rc<Self>) {
        self.handler.borrow_mut().did_destroy(self);
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("pp_instance", &self.pp_instance)
            .field("objects", &self.objects.borrow().len())
            .finish()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        let objects = self.objects.get_mut();
        if objects.is_empty() {
            return;
        }

        let mut names: Vec<String> = objects.keys().cloned().collect();
        names.sort();
        let _ = invariant::report(
            self.fault_attitude,
            Violation::LeakedPerInstanceObjects {
                instance: self.pp_instance,
                names,
            },
        );
    }
}

/// Registration that lasts as long as the guard.
///
/// Holds the instance weakly, so a guard may be stored inside the instance's
/// own handler; such guards have to be dropped in
/// [`InstanceHandler::did_destroy`].
pub struct PerInstanceObject {
    instance: Weak<Instance>,
    interface_name: String,
    object: ObjectRef,
}

impl PerInstanceObject {
    pub fn register(
        instance: &Rc<Instance>,
        interface_name: impl Into<String>,
        object: ObjectRef,
    ) -> PpResult<Self> {
        let interface_name = interface_name.into();
        instance.add_per_instance_object(interface_name.clone(), object)?;

        Ok(Self {
            instance: Rc::downgrade(instance),
            interface_name,
            object,
        })
    }

    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    pub fn object(&self) -> ObjectRef {
        self.object
    }
}

impl Drop for PerInstanceObject {
    fn drop(&mut self) {
        match self.instance.upgrade() {
            Some(instance) => {
                let _ = instance.remove_per_instance_object(&self.interface_name, self.object);
            }
            None => error!(
                "per-instance object {} outlived its instance",
                self.interface_name
            ),
        }
    }
}
