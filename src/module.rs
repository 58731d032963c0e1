use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{c_void, CStr};
use std::ptr::NonNull;
use std::rc::Rc;

use pp_ffi::ppb::PpbInstance;
use pp_ffi::{
    GetBrowserInterface, PpInstance, PpModule, PpResource, PPB_CORE_INTERFACE,
    PPB_INSTANCE_INTERFACE,
};
use tracing::{info, warn};

use crate::browser::{self, BrowserCore, Core};
use crate::config::{FaultAttitude, PluginConfig};
use crate::error::{PpError, PpResult};
use crate::instance::{Instance, InstanceHandler};
use crate::resource::Resource;

/// Resolves an opaque instance id to the live instance.
pub trait InstanceDirectory {
    fn instance_for_pp_instance(&self, instance: PpInstance) -> Option<Rc<Instance>>;
}

/// Plugin module: the connection to the host plus every live instance.
pub struct Module {
    pp_module: PpModule,
    get_browser_interface: Option<GetBrowserInterface>,
    core: Option<Core>,
    ppb_instance: Option<&'static PpbInstance>,
    config: PluginConfig,
    instances: RefCell<HashMap<PpInstance, Rc<Instance>>>,
}

impl Module {
    /// Looks up the host tables this crate uses. Missing tables are only
    /// logged; the affected calls fall back to neutral defaults.
    pub fn new(
        pp_module: PpModule,
        get_browser_interface: GetBrowserInterface,
        config: PluginConfig,
    ) -> Self {
        let core = browser::get_interface(get_browser_interface, PPB_CORE_INTERFACE)
            // Safety: the host returns a table matching the requested name
            .and_then(|ptr| unsafe { BrowserCore::from_raw(ptr.as_ptr()) })
            .map(Core::new);
        if core.is_none() {
            warn!("host does not provide {:?}", PPB_CORE_INTERFACE);
        }

        let ppb_instance = browser::get_interface(get_browser_interface, PPB_INSTANCE_INTERFACE)
            // Safety: as above
            .and_then(|ptr| unsafe { browser::instance_interface(ptr.as_ptr()) });
        if ppb_instance.is_none() {
            warn!("host does not provide {:?}", PPB_INSTANCE_INTERFACE);
        }

        Self {
            pp_module,
            get_browser_interface: Some(get_browser_interface),
            core,
            ppb_instance,
            config,
            instances: RefCell::new(HashMap::new()),
        }
    }

    /// A module with an injected counting service and no host behind it.
    pub fn with_core(core: Option<Core>, config: PluginConfig) -> Self {
        Self {
            pp_module: PpModule::NULL,
            get_browser_interface: None,
            core,
            ppb_instance: None,
            config,
            instances: RefCell::new(HashMap::new()),
        }
    }

    pub fn pp_module(&self) -> PpModule {
        self.pp_module
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn fault_attitude(&self) -> FaultAttitude {
        self.config.fault_attitude
    }

    pub fn get_browser_interface(&self, interface_name: &CStr) -> Option<NonNull<c_void>> {
        self.get_browser_interface
            .and_then(|f| browser::get_interface(f, interface_name))
    }

    pub fn core(&self) -> Option<&Core> {
        self.core.as_ref()
    }

    /// Takes a new reference on `resource`.
    pub fn resource(&self, resource: PpResource) -> Resource {
        Resource::new(self.core.clone(), resource)
    }

    /// Wraps a reference handed over by the host.
    pub fn adopt_resource(&self, resource: PpResource) -> Resource {
        Resource::from_pass_ref(self.core.clone(), resource)
    }

    /// Creates and initializes an instance. The instance is already
    /// resolvable while its handler's `init` runs.
    pub fn create_instance(
        &self,
        pp_instance: PpInstance,
        handler: Box<dyn InstanceHandler>,
        args: &[(String, String)],
    ) -> PpResult<Rc<Instance>> {
        if self.instances.borrow().contains_key(&pp_instance) {
            return Err(PpError::InstanceExists(pp_instance));
        }

        let instance = Rc::new(Instance::new(
            pp_instance,
            self.fault_attitude(),
            self.ppb_instance,
            handler,
        ));
        self.instances
            .borrow_mut()
            .insert(pp_instance, instance.clone());

        if !instance.init(args) {
            // guards taken during `init` must go before the leak check
            instance.did_destroy();
            self.instances.borrow_mut().remove(&pp_instance);
            warn!("instance {:?} refused to initialize", pp_instance);
            return Err(PpError::InitializeFail(pp_instance));
        }

        info!("instance {:?} created", pp_instance);
        Ok(instance)
    }

    /// Tears the instance down. Returns `false` for an unknown instance.
    pub fn destroy_instance(&self, pp_instance: PpInstance) -> bool {
        let Some(instance) = self.instance_for_pp_instance(pp_instance) else {
            return false;
        };

        instance.did_destroy();
        let removed = self.instances.borrow_mut().remove(&pp_instance);
        drop(removed);
        drop(instance);

        info!("instance {:?} destroyed", pp_instance);
        true
    }

    /// Destroys every remaining instance.
    pub fn shutdown(&self) {
        let mut remaining: Vec<PpInstance> = self.instances.borrow().keys().copied().collect();
        remaining.sort();
        for pp_instance in remaining {
            self.destroy_instance(pp_instance);
        }
    }

    pub fn instance_count(&self) -> usize {
        self.instances.borrow().len()
    }
}

impl InstanceDirectory for Module {
    fn instance_for_pp_instance(&self, instance: PpInstance) -> Option<Rc<Instance>> {
        self.instances.borrow().get(&instance).cloned()
    }
}
