use std::ffi::{c_char, c_void, CStr};

pub mod ppb;
pub mod ppp;

pub type PpBool = i32;

pub const PP_FALSE: PpBool = 0;
pub const PP_TRUE: PpBool = 1;

pub const PP_OK: i32 = 0;
pub const PP_ERROR_FAILED: i32 = -2;

pub const PPB_CORE_INTERFACE: &CStr = c"PPB_Core;0.3";
pub const PPB_INSTANCE_INTERFACE: &CStr = c"PPB_Instance;0.4";
pub const PPP_INSTANCE_INTERFACE: &CStr = c"PPP_Instance;0.4";

/// Host function handed to the plugin at module initialization.
/// Returns null for interfaces the host does not implement.
pub type GetBrowserInterface = extern "C" fn(interface_name: *const c_char) -> *const c_void;

macro_rules! opaque_handle {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(transparent)]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub i32);

            impl $name {
                pub const NULL: Self = Self(0);

                pub fn is_null(self) -> bool {
                    self.0 == 0
                }
            }
        )*
    };
}

opaque_handle! {
    /// Reference-counted resource owned by the host.
    PpResource,
    /// One embedded plugin instance.
    PpInstance,
    PpModule,
}

/// Host variant value. Only the tag is inspected on this side of the
/// boundary; the payload is carried as raw bits.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpVar {
    pub var_type: i32,
    pub padding: i32,
    pub value: i64,
}

impl PpVar {
    pub const UNDEFINED: Self = Self {
        var_type: 0,
        padding: 0,
        value: 0,
    };
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PpRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

pub fn to_pp_bool(b: bool) -> PpBool {
    if b {
        PP_TRUE
    } else {
        PP_FALSE
    }
}

pub fn from_pp_bool(b: PpBool) -> bool {
    b != PP_FALSE
}
