//! Joint mask styles: validation, orientation and ink measurement.

pub mod joint_mask;
pub mod measure;

pub use joint_mask::{JointMaskSet, OrientedMask};
pub use measure::{measure_joint_extent, MaskExtent};
