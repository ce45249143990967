//! Joint metadata: which edge of a piece a joint sits on and whether it
//! protrudes (male) or is cut in (female).

use std::fmt;

/// Whether a joint protrudes from its piece or is a notch cut into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    Male = 0,
    Female = 1,
}

impl JointType {
    /// The type the facing edge of the neighbouring piece must have.
    pub fn complement(self) -> JointType {
        match self {
            JointType::Male => JointType::Female,
            JointType::Female => JointType::Male,
        }
    }

    /// Wire code used by `.pm` files.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<JointType> {
        match code {
            0 => Some(JointType::Male),
            1 => Some(JointType::Female),
            _ => None,
        }
    }
}

/// Edge of a piece, relative to the piece's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointPosition {
    Top = 0,
    Left = 1,
    Right = 2,
    Bottom = 3,
}

impl JointPosition {
    pub const ALL: [JointPosition; 4] = [
        JointPosition::Top,
        JointPosition::Left,
        JointPosition::Right,
        JointPosition::Bottom,
    ];

    /// The edge of the neighbouring piece that faces this one.
    pub fn opposite(self) -> JointPosition {
        match self {
            JointPosition::Top => JointPosition::Bottom,
            JointPosition::Bottom => JointPosition::Top,
            JointPosition::Left => JointPosition::Right,
            JointPosition::Right => JointPosition::Left,
        }
    }

    /// Wire code used by `.pm` files.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<JointPosition> {
        match code {
            0 => Some(JointPosition::Top),
            1 => Some(JointPosition::Left),
            2 => Some(JointPosition::Right),
            3 => Some(JointPosition::Bottom),
            _ => None,
        }
    }
}

/// One joint of a piece.
///
/// `width` and `height` are the measured ink extent of the joint mask style
/// used for this edge, in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointInfo {
    joint_type: JointType,
    position: JointPosition,
    width: u32,
    height: u32,
}

impl JointInfo {
    pub fn new(joint_type: JointType, position: JointPosition, width: u32, height: u32) -> Self {
        JointInfo {
            joint_type,
            position,
            width,
            height,
        }
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn position(&self) -> JointPosition {
        self.position
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when this joint and `other` can interlock: facing edges with
    /// opposite types.
    pub fn fits(&self, other: &JointInfo) -> bool {
        self.position.opposite() == other.position
            && self.joint_type.complement() == other.joint_type
    }
}

impl fmt::Display for JointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} joint at {:?} ({}x{})",
            self.joint_type, self.position, self.width, self.height
        )
    }
}
