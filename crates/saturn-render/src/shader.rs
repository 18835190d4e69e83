//! Element shader composition and caching.
//!
//! Every element shader is the shading prelude, then the frame bindings, then
//! the element's own entry points. Modules are compiled once per name.

use std::{collections::HashMap, sync::Arc};

use log::{debug, info};
use wgpu::{ShaderModuleDescriptor, ShaderSource};

use crate::pipeline::FRAME_BINDINGS_WGSL;

/// Prepend the shared shading functions and frame bindings to an element source.
pub fn compose(element_source: &str) -> String {
    let mut source = String::with_capacity(
        saturn_shading::SHADING_PRELUDE.len() + FRAME_BINDINGS_WGSL.len() + element_source.len(),
    );
    source.push_str(saturn_shading::SHADING_PRELUDE);
    source.push_str(FRAME_BINDINGS_WGSL);
    source.push_str(element_source);
    source
}

/// Compiled shader modules keyed by element name.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Compile `source` as-is under `name`, replacing any previous module.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        debug!("Compiling shader '{name}' ({} bytes)", source.len());

        let module = Arc::new(device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        }));

        if self
            .modules
            .insert(name.to_string(), module.clone())
            .is_some()
        {
            info!("Replaced shader '{name}'");
        } else {
            info!("Loaded shader '{name}'");
        }
        module
    }

    /// Compile an element shader with the prelude, or return the cached module.
    pub fn element(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        element_source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        if let Some(module) = self.modules.get(name) {
            return module.clone();
        }
        self.load_from_source(device, name, &compose(element_source))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drop every cached module.
    pub fn clear(&mut self) {
        self.modules.clear();
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_device() -> Option<wgpu::Device> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()?;
            Some(device)
        })
    }

    const SOLID_ELEMENT: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    return vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(vec3<f32>(hash21(vec2<f32>(frame.time, 1.0))), 1.0);
}
"#;

    #[test]
    fn test_compose_orders_prelude_bindings_element() {
        let source = compose(SOLID_ELEMENT);
        let prelude = source.find("fn hash21").unwrap();
        let bindings = source.find("var<uniform> frame").unwrap();
        let element = source.find("fn vs_main").unwrap();
        assert!(prelude < bindings && bindings < element);
    }

    #[test]
    fn test_library_starts_empty() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert_eq!(library.len(), 0);
    }

    #[test]
    fn test_element_is_cached() {
        let Some(device) = create_test_device() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        let first = library.element(&device, "solid", SOLID_ELEMENT);
        let second = library.element(&device, "solid", SOLID_ELEMENT);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(library.len(), 1);
    }
}
