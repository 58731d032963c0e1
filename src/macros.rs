/// Emits `PPP_InitializeModule`, `PPP_ShutdownModule` and `PPP_GetInterface`
/// for the plugin library, routing them to [`entry`](crate::entry).
///
/// ```ignore
/// struct MyInstance;
/// impl pp_bridge::InstanceHandler for MyInstance {}
///
/// pp_bridge::export_plugin!(|_| Box::new(MyInstance));
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($factory:expr) => {
        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn PPP_InitializeModule(
            module: $crate::ffi::PpModule,
            get_browser_interface: $crate::ffi::GetBrowserInterface,
        ) -> i32 {
            $crate::entry::initialize_module(module, get_browser_interface, $factory)
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn PPP_ShutdownModule() {
            $crate::entry::shutdown_module()
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn PPP_GetInterface(
            interface_name: *const ::std::ffi::c_char,
        ) -> *const ::std::ffi::c_void {
            // Safety: the host passes a nul-terminated interface name
            unsafe { $crate::entry::get_interface(interface_name) }
        }

        const _: $crate::ffi::ppp::InitializeModule = PPP_InitializeModule;
        const _: $crate::ffi::ppp::ShutdownModule = PPP_ShutdownModule;
        const _: $crate::ffi::ppp::GetInterface = PPP_GetInterface;
    };
}
