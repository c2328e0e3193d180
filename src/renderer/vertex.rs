//! Instance records for GPU upload

use bytemuck::{Pod, Zeroable};

/// One textured quad: destination rect, source rect in pixels, tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// x, y, w, h on the canvas
    pub dest: [f32; 4],
    /// x, y, w, h in the texture; zero size means the whole texture
    pub src: [f32; 4],
    pub tint: [f32; 4],
    /// Index into the host's texture table
    pub texture: u32,
    pub _pad: [u32; 3],
}

impl SpriteInstance {
    pub const fn new(dest: [f32; 4], src: [f32; 4], tint: [f32; 4], texture: u32) -> Self {
        Self {
            dest,
            src,
            tint,
            texture,
            _pad: [0; 3],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SCREEN: [f32; 4] = [20.0 / 255.0, 20.0 / 255.0, 20.0 / 255.0, 1.0];
    pub const DEAD_OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const PAUSE_OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.65];
    pub const ICE: [f32; 4] = [0.0, 1.0, 1.0, 0.5];
    pub const HEALTH_BACK: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const COOLDOWN_Q: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const COOLDOWN_W: [f32; 4] = [0.0, 205.0 / 255.0, 205.0 / 255.0, 1.0];

    /// Shield tint fades out over its last 100 ticks
    pub fn shield(duration: u32) -> [f32; 4] {
        [0.0, 1.0, 1.0, (duration as f32 / 100.0).min(1.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 64);
        let batch = [SpriteInstance::new([0.0; 4], [0.0; 4], colors::WHITE, 3); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&batch);
        assert_eq!(bytes.len(), 128);
    }

    #[test]
    fn test_shield_fade() {
        assert_eq!(colors::shield(300)[3], 1.0);
        assert_eq!(colors::shield(50)[3], 0.5);
    }
}
