//! Per-piece joint records.

use crate::puzzle::joint::{JointInfo, JointPosition, JointType};
use std::fmt;

/// One cell of the puzzle grid and the joints on its edges.
///
/// Joints keep the order in which they were added (that order is also the
/// order they are written to `.pm` files). At most one joint per edge.
/// `Clone` is a deep copy; callers outside the maker only ever see clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceInfo {
    id: u32,
    joints: Vec<JointInfo>,
}

impl PieceInfo {
    /// Creates a piece without joints. `id` is the row-major grid index.
    pub fn new(id: u32) -> Self {
        PieceInfo {
            id,
            joints: Vec::with_capacity(4),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn total_joints(&self) -> usize {
        self.joints.len()
    }

    /// Adds `joint`; returns false and leaves the piece unchanged if its edge
    /// is already occupied.
    pub fn add_joint(&mut self, joint: JointInfo) -> bool {
        if self.has_joint(joint.position()) {
            return false;
        }
        self.joints.push(joint);
        true
    }

    pub fn has_joint(&self, position: JointPosition) -> bool {
        self.joints.iter().any(|j| j.position() == position)
    }

    pub fn joint(&self, position: JointPosition) -> Option<JointInfo> {
        self.joints.iter().find(|j| j.position() == position).copied()
    }

    pub fn joints(&self) -> &[JointInfo] {
        &self.joints
    }

    /// True when the edge carries a protruding joint, i.e. the renderer must
    /// draw joint content from the neighbouring cell on that side.
    pub fn has_male_joint(&self, position: JointPosition) -> bool {
        self.joint(position)
            .is_some_and(|j| j.joint_type() == JointType::Male)
    }
}

impl fmt::Display for PieceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Piece ID : {}", self.id)?;
        for joint in &self.joints {
            writeln!(f, "  {}", joint)?;
        }
        Ok(())
    }
}
