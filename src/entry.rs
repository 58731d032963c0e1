//! Exported plugin entry points.
//!
//! The host drives a plugin through three C symbols and the `PPP_Instance`
//! table. They carry no context pointer, so the module they talk to lives in
//! a thread local; every host call arrives on the same main thread.
//! Plugins emit the symbols with [`export_plugin!`](crate::export_plugin).

use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr};
use std::ptr::null;
use std::rc::Rc;
use std::slice;

use pp_ffi::ppp::PppInstance;
use pp_ffi::{
    to_pp_bool, GetBrowserInterface, PpBool, PpInstance, PpModule, PpRect, PpResource, PpVar,
    PP_ERROR_FAILED, PP_FALSE, PP_OK, PPP_INSTANCE_INTERFACE,
};
use tracing::{error, info, trace};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{config_path, PluginConfig};
use crate::instance::InstanceHandler;
use crate::module::Module;
use crate::service::log::init_logger;

/// Builds the handler for a newly created instance.
pub type InstanceFactory = fn(PpInstance) -> Box<dyn InstanceHandler>;

struct PluginEntry {
    module: Rc<Module>,
    factory: InstanceFactory,
    _log_guards: Vec<WorkerGuard>,
}

thread_local! {
    static ENTRY: RefCell<Option<PluginEntry>> = const { RefCell::new(None) };
}

static PPP_INSTANCE: PppInstance = PppInstance {
    did_create,
    did_destroy,
    did_change_view,
    did_change_focus,
    handle_input_event,
    handle_document_load,
    get_instance_object,
    get_selected_text,
};

/// `PPP_InitializeModule`: reads the config, installs the logger and the
/// module.
pub fn initialize_module(
    pp_module: PpModule,
    get_browser_interface: GetBrowserInterface,
    factory: InstanceFactory,
) -> i32 {
    let path = config_path();
    let config = PluginConfig::read(&path).unwrap_or_else(|e| {
        eprintln!("unable to read plugin config {:?}: {}", path, e);
        PluginConfig::default()
    });
    let guards = init_logger(&config.log);

    install_module(pp_module, get_browser_interface, factory, config, guards)
}

/// Like [`initialize_module`] with an explicit config and no logger set-up.
pub fn initialize_module_with_config(
    pp_module: PpModule,
    get_browser_interface: GetBrowserInterface,
    factory: InstanceFactory,
    config: PluginConfig,
) -> i32 {
    install_module(pp_module, get_browser_interface, factory, config, vec![])
}

fn install_module(
    pp_module: PpModule,
    get_browser_interface: GetBrowserInterface,
    factory: InstanceFactory,
    config: PluginConfig,
    log_guards: Vec<WorkerGuard>,
) -> i32 {
    let module = Module::new(pp_module, get_browser_interface, config);
    if module.core().is_none() {
        error!("module {:?}: resource counting unavailable, refusing to load", pp_module);
        return PP_ERROR_FAILED;
    }

    let previous = ENTRY.with(|e| {
        e.borrow_mut().replace(PluginEntry {
            module: Rc::new(module),
            factory,
            _log_guards: log_guards,
        })
    });
    if let Some(previous) = previous {
        previous.module.shutdown();
    }

    info!("module {:?} initialized", pp_module);
    PP_OK
}

/// `PPP_ShutdownModule`: destroys leftover instances and drops the module.
pub fn shutdown_module() {
    let entry = ENTRY.with(|e| e.borrow_mut().take());
    if let Some(entry) = entry {
        entry.module.shutdown();
        info!("module {:?} shut down", entry.module.pp_module());
    }
}

/// `PPP_GetInterface`.
///
/// # Safety
/// `interface_name` must be null or a nul-terminated string.
pub unsafe fn get_interface(interface_name: *const c_char) -> *const c_void {
    if interface_name.is_null() {
        return null();
    }

    let name = CStr::from_ptr(interface_name);
    if name == PPP_INSTANCE_INTERFACE {
        &PPP_INSTANCE as *const PppInstance as *const c_void
    } else {
        null()
    }
}

/// Runs `f` against the installed module, `None` before initialization.
pub fn with_module<R>(f: impl FnOnce(&Module) -> R) -> Option<R> {
    let module = ENTRY.with(|e| e.borrow().as_ref().map(|e| e.module.clone()));
    module.map(|m| f(&m))
}

extern "C" fn did_create(
    instance: PpInstance,
    argc: u32,
    argn: *const *const c_char,
    argv: *const *const c_char,
) -> PpBool {
    let entry = ENTRY.with(|e| {
        e.borrow()
            .as_ref()
            .map(|e| (e.module.clone(), e.factory))
    });
    let Some((module, factory)) = entry else {
        return PP_FALSE;
    };

    // Safety: the host passes `argc` valid strings in each array
    let args = unsafe { collect_args(argc, argn, argv) };
    match module.create_instance(instance, factory(instance), &args) {
        Ok(_) => to_pp_bool(true),
        Err(e) => {
            error!("{}", e);
            PP_FALSE
        }
    }
}

extern "C" fn did_destroy(instance: PpInstance) {
    with_module(|m| m.destroy_instance(instance));
}

// View, focus, input and scripting are not routed to handlers; the host
// gets the answers of a plugin that ignores them.

extern "C" fn did_change_view(instance: PpInstance, _: *const PpRect, _: *const PpRect) {
    trace!("instance {:?}: view changed", instance);
}

extern "C" fn did_change_focus(instance: PpInstance, has_focus: PpBool) {
    trace!("instance {:?}: focus {}", instance, has_focus);
}

extern "C" fn handle_input_event(_: PpInstance, _: *const c_void) -> PpBool {
    PP_FALSE
}

extern "C" fn handle_document_load(_: PpInstance, _: PpResource) -> PpBool {
    PP_FALSE
}

extern "C" fn get_instance_object(_: PpInstance) -> PpVar {
    PpVar::UNDEFINED
}

extern "C" fn get_selected_text(_: PpInstance, _: PpBool) -> PpVar {
    PpVar::UNDEFINED
}

unsafe fn collect_args(
    argc: u32,
    argn: *const *const c_char,
    argv: *const *const c_char,
) -> Vec<(String, String)> {
    if argc == 0 || argn.is_null() || argv.is_null() {
        return vec![];
    }

    let names = slice::from_raw_parts(argn, argc as usize);
    let values = slice::from_raw_parts(argv, argc as usize);
    names
        .iter()
        .zip(values)
        .map(|(&n, &v)| (c_str_lossy(n), c_str_lossy(v)))
        .collect()
}

unsafe fn c_str_lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }

    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;

    use super::*;

    #[test]
    fn args_are_paired_in_order() {
        let names = [CString::new("src").unwrap(), CString::new("width").unwrap()];
        let values = [CString::new("a.swf").unwrap(), CString::new("100").unwrap()];
        let argn: Vec<*const c_char> = names.iter().map(|s| s.as_ptr()).collect();
        let argv: Vec<*const c_char> = values.iter().map(|s| s.as_ptr()).collect();

        let args = unsafe { collect_args(2, argn.as_ptr(), argv.as_ptr()) };
        assert_eq!(
            args,
            vec![
                ("src".to_owned(), "a.swf".to_owned()),
                ("width".to_owned(), "100".to_owned()),
            ]
        );
    }

    #[test]
    fn null_arrays_mean_no_args() {
        assert!(unsafe { collect_args(3, std::ptr::null(), std::ptr::null()) }.is_empty());
    }

    #[test]
    fn only_instance_interface_is_exported() {
        unsafe {
            assert!(!get_interface(PPP_INSTANCE_INTERFACE.as_ptr()).is_null());
            assert!(get_interface(c"PPP_Printing(Dev);0.3".as_ptr()).is_null());
            assert!(get_interface(null()).is_null());
        }
    }

    #[test]
    fn unrouted_calls_get_neutral_answers() {
        let table = unsafe {
            &*(get_interface(PPP_INSTANCE_INTERFACE.as_ptr()) as *const PppInstance)
        };
        let rect = PpRect::default();

        (table.did_change_view)(PpInstance(1), &rect, &rect);
        (table.did_change_focus)(PpInstance(1), to_pp_bool(true));
        assert_eq!((table.handle_input_event)(PpInstance(1), null()), PP_FALSE);
        assert_eq!((table.handle_document_load)(PpInstance(1), PpResource(5)), PP_FALSE);
        assert_eq!((table.get_instance_object)(PpInstance(1)), PpVar::UNDEFINED);
        assert_eq!((table.get_selected_text)(PpInstance(1), PP_FALSE), PpVar::UNDEFINED);
    }

    #[test]
    fn no_module_before_initialization() {
        assert!(with_module(|_| ()).is_none());
        assert_eq!(did_create(PpInstance(1), 0, null(), null()), PP_FALSE);
    }
}
