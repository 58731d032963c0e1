#![allow(dead_code)]

//! Fake host exposing `PPB_Core` and `PPB_Instance` through
//! `get_browser_interface`. Counts are per test thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_char, c_void, CStr};
use std::ptr::null;

use pp_bridge::ffi::ppb::{PpbCore, PpbInstance};
use pp_bridge::ffi::{
    to_pp_bool, PpBool, PpInstance, PpResource, PPB_CORE_INTERFACE, PPB_INSTANCE_INTERFACE,
};

thread_local! {
    static COUNTS: RefCell<HashMap<PpResource, i64>> = RefCell::new(HashMap::new());
}

extern "C" fn add_ref_resource(resource: PpResource) {
    COUNTS.with(|c| *c.borrow_mut().entry(resource).or_default() += 1);
}

extern "C" fn release_resource(resource: PpResource) {
    COUNTS.with(|c| *c.borrow_mut().entry(resource).or_default() -= 1);
}

extern "C" fn is_full_frame(instance: PpInstance) -> PpBool {
    to_pp_bool(instance.0 % 2 == 0)
}

static PPB_CORE: PpbCore = PpbCore {
    add_ref_resource,
    release_resource,
};

static PPB_INSTANCE: PpbInstance = PpbInstance {
    get_window_object: None,
    get_owner_element_object: None,
    bind_graphics: None,
    is_full_frame,
    execute_script: None,
};

pub fn ref_count(resource: PpResource) -> i64 {
    COUNTS.with(|c| c.borrow().get(&resource).copied().unwrap_or(0))
}

/// Host implementing every interface.
pub extern "C" fn full_host(name: *const c_char) -> *const c_void {
    let name = unsafe { CStr::from_ptr(name) };
    if name == PPB_CORE_INTERFACE {
        &PPB_CORE as *const PpbCore as *const c_void
    } else if name == PPB_INSTANCE_INTERFACE {
        &PPB_INSTANCE as *const PpbInstance as *const c_void
    } else {
        null()
    }
}

/// Host that only counts resources.
pub extern "C" fn core_only_host(name: *const c_char) -> *const c_void {
    let name = unsafe { CStr::from_ptr(name) };
    if name == PPB_CORE_INTERFACE {
        &PPB_CORE as *const PpbCore as *const c_void
    } else {
        null()
    }
}

/// Host without any interface.
pub extern "C" fn empty_host(_name: *const c_char) -> *const c_void {
    null()
}
