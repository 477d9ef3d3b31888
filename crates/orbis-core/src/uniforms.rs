//! Camera-dependent shader parameters refreshed every frame.

use glam::{Mat4, Vec3};

/// GPU uniform block shared by the globe, atmosphere and night-side shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// Projection * view.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position (`w = 1`), used as the atmosphere view vector.
    pub camera_position: [f32; 4],
    /// Unit direction from the globe center toward the sun. `w` is unused.
    pub sun_direction: [f32; 4],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_position: [0.0; 4],
            sun_direction: [0.0, 0.0, 1.0, 0.0],
        }
    }
}

impl SceneUniforms {
    /// Builds the uniform block from camera and lighting state.
    pub fn new(view_proj: Mat4, camera_position: Vec3, sun_direction: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            sun_direction: sun_direction.normalize_or_zero().extend(0.0).to_array(),
        }
    }

    /// Raw bytes ready for a uniform buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 96);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn test_sun_direction_normalized() {
        let u = SceneUniforms::new(Mat4::IDENTITY, Vec3::ONE, Vec3::new(0.0, 0.0, 200.0));
        assert_eq!(u.sun_direction, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(u.as_bytes().len(), 96);
    }
}
