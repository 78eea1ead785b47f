//! Fluent builders for bind group layouts and bind groups
//!
//! Bindings are numbered in the order they are added, so a layout and the
//! bind groups created from it stay in lockstep without spelling out indices.

/// A bind group layout together with the entries it was created from
pub struct BindGroupLayoutWithDesc {
    pub layout: wgpu::BindGroupLayout,
    pub entries: Vec<wgpu::BindGroupLayoutEntry>,
}

#[derive(Default)]
pub struct BindGroupLayoutBuilder {
    entries: Vec<wgpu::BindGroupLayoutEntry>,
    next_binding_index: u32,
}

impl BindGroupLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binding(mut self, binding: wgpu::BindGroupLayoutEntry) -> Self {
        self.next_binding_index = binding.binding + 1;
        self.entries.push(binding);
        self
    }

    pub fn next_binding(self, visibility: wgpu::ShaderStages, ty: wgpu::BindingType) -> Self {
        let binding = self.next_binding_index;
        self.add_binding(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty,
            count: None,
        })
    }

    /// Binding visible to both vertex and fragment stages
    pub fn next_binding_rendering(self, ty: wgpu::BindingType) -> Self {
        self.next_binding(wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT, ty)
    }

    pub fn next_binding_vertex(self, ty: wgpu::BindingType) -> Self {
        self.next_binding(wgpu::ShaderStages::VERTEX, ty)
    }

    pub fn next_binding_fragment(self, ty: wgpu::BindingType) -> Self {
        self.next_binding(wgpu::ShaderStages::FRAGMENT, ty)
    }

    pub fn create(self, device: &wgpu::Device, label: &str) -> BindGroupLayoutWithDesc {
        BindGroupLayoutWithDesc {
            layout: device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &self.entries,
            }),
            entries: self.entries,
        }
    }
}

/// Collects resources for the entries of a [`BindGroupLayoutWithDesc`], in order
pub struct BindGroupBuilder<'a> {
    layout_with_desc: &'a BindGroupLayoutWithDesc,
    entries: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(layout_with_desc: &'a BindGroupLayoutWithDesc) -> Self {
        BindGroupBuilder {
            layout_with_desc,
            entries: Vec::new(),
        }
    }

    pub fn resource(mut self, resource: wgpu::BindingResource<'a>) -> Self {
        assert!(
            self.entries.len() < self.layout_with_desc.entries.len(),
            "more resources than layout entries"
        );
        let binding = self.layout_with_desc.entries[self.entries.len()].binding;
        self.entries.push(wgpu::BindGroupEntry { binding, resource });
        self
    }

    pub fn texture(self, view: &'a wgpu::TextureView) -> Self {
        self.resource(wgpu::BindingResource::TextureView(view))
    }

    pub fn sampler(self, sampler: &'a wgpu::Sampler) -> Self {
        self.resource(wgpu::BindingResource::Sampler(sampler))
    }

    pub fn create(&self, device: &wgpu::Device, label: &str) -> wgpu::BindGroup {
        assert_eq!(
            self.entries.len(),
            self.layout_with_desc.entries.len(),
            "bind group '{}' does not cover its layout",
            label
        );
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout_with_desc.layout,
            entries: &self.entries,
        })
    }
}
