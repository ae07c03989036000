//! WGPU binding type utilities

use std::num::NonZeroU64;

pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

/// Uniform buffer bound at a per-draw dynamic offset
///
/// `element_size` is the size of one element as the shader sees it.
pub fn uniform_dynamic(element_size: u64) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: true,
        min_binding_size: NonZeroU64::new(element_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_uniform_records_element_size() {
        match uniform_dynamic(128) {
            wgpu::BindingType::Buffer {
                has_dynamic_offset,
                min_binding_size,
                ..
            } => {
                assert!(has_dynamic_offset);
                assert_eq!(min_binding_size.map(NonZeroU64::get), Some(128));
            }
            other => panic!("unexpected binding type {:?}", other),
        }
    }
}
