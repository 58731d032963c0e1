//! Interfaces implemented by the host (browser side).
//!
//! Tables mirror the host's layout slot for slot. Slots this crate never
//! calls are `Option`s so fake hosts can leave them empty; the niche keeps
//! them pointer-sized.

use crate::{PpBool, PpInstance, PpResource, PpVar};

#[repr(C)]
pub struct PpbCore {
    pub add_ref_resource: extern "C" fn(resource: PpResource),
    pub release_resource: extern "C" fn(resource: PpResource),
}

#[repr(C)]
pub struct PpbInstance {
    pub get_window_object: Option<extern "C" fn(instance: PpInstance) -> PpVar>,
    pub get_owner_element_object: Option<extern "C" fn(instance: PpInstance) -> PpVar>,
    pub bind_graphics:
        Option<extern "C" fn(instance: PpInstance, graphics_device: PpResource) -> PpBool>,
    pub is_full_frame: extern "C" fn(instance: PpInstance) -> PpBool,
    pub execute_script:
        Option<extern "C" fn(instance: PpInstance, script: PpVar, exception: *mut PpVar) -> PpVar>,
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    const SLOT: usize = size_of::<usize>();

    #[test]
    fn core_table_layout() {
        assert_eq!(offset_of!(PpbCore, add_ref_resource), 0);
        assert_eq!(offset_of!(PpbCore, release_resource), SLOT);
        assert_eq!(size_of::<PpbCore>(), 2 * SLOT);
    }

    #[test]
    fn instance_table_layout() {
        assert_eq!(offset_of!(PpbInstance, get_window_object), 0);
        assert_eq!(offset_of!(PpbInstance, get_owner_element_object), SLOT);
        assert_eq!(offset_of!(PpbInstance, bind_graphics), 2 * SLOT);
        assert_eq!(offset_of!(PpbInstance, is_full_frame), 3 * SLOT);
        assert_eq!(offset_of!(PpbInstance, execute_script), 4 * SLOT);
        assert_eq!(size_of::<PpbInstance>(), 5 * SLOT);
    }
}
