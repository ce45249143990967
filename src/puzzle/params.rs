//! Configuration for puzzle generation.

use crate::image::transform::Resample;

/// Configuration for piece generation
#[derive(Debug, Clone)]
pub struct MakerParams {
    /// Joint mask width as a fraction of the piece width (default: 0.3)
    pub joint_scale: f32,
    /// Filter used when shrinking joint masks (default: bilinear)
    pub resample: Resample,
    /// Reject joint styles containing pixels other than black, white or fully
    /// transparent (default: true)
    pub strict_mask_validation: bool,
}

impl Default for MakerParams {
    fn default() -> Self {
        Self {
            joint_scale: 0.3,
            resample: Resample::Bilinear,
            strict_mask_validation: true,
        }
    }
}

impl MakerParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joint_scale(mut self, joint_scale: f32) -> Self {
        self.joint_scale = joint_scale;
        self
    }

    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    pub fn with_strict_mask_validation(mut self, strict: bool) -> Self {
        self.strict_mask_validation = strict;
        self
    }
}
