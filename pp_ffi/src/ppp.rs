//! Interfaces implemented by the plugin and queried by the host.

use std::ffi::{c_char, c_void};

use crate::{GetBrowserInterface, PpBool, PpInstance, PpModule, PpRect, PpResource, PpVar};

#[repr(C)]
pub struct PppInstance {
    pub did_create: extern "C" fn(
        instance: PpInstance,
        argc: u32,
        argn: *const *const c_char,
        argv: *const *const c_char,
    ) -> PpBool,
    pub did_destroy: extern "C" fn(instance: PpInstance),
    pub did_change_view:
        extern "C" fn(instance: PpInstance, position: *const PpRect, clip: *const PpRect),
    pub did_change_focus: extern "C" fn(instance: PpInstance, has_focus: PpBool),
    /// `event` points to a host input event; it is never dereferenced here.
    pub handle_input_event: extern "C" fn(instance: PpInstance, event: *const c_void) -> PpBool,
    pub handle_document_load: extern "C" fn(instance: PpInstance, url_loader: PpResource) -> PpBool,
    pub get_instance_object: extern "C" fn(instance: PpInstance) -> PpVar,
    pub get_selected_text: extern "C" fn(instance: PpInstance, html: PpBool) -> PpVar,
}

pub type InitializeModule =
    extern "C" fn(module: PpModule, get_browser_interface: GetBrowserInterface) -> i32;

pub type ShutdownModule = extern "C" fn();

pub type GetInterface = extern "C" fn(interface_name: *const c_char) -> *const c_void;
