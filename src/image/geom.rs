// src/image/geom.rs

//! Integer rectangles used to clip joint stamps against the puzzle image.

/// Represents a 2D rectangle with integer coordinates.
///
/// The rectangle is defined by its top-left corner (`x`, `y`) and its `width` and `height`.
/// The origin may lie outside an image; clip it with [`Rect::intersection`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an empty rectangle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the x-coordinate of the right edge (`x + width`).
    pub fn x_max(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Returns the y-coordinate of the bottom edge (`y + height`).
    pub fn y_max(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Checks if the rectangle has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a new rectangle that is the intersection of `self` and `other`.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::empty();
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);

        let x_max = self.x_max().min(other.x_max());
        let y_max = self.y_max().min(other.y_max());

        if x >= x_max || y >= y_max {
            Rect::empty()
        } else {
            Rect::new(x, y, (x_max - x) as u32, (y_max - y) as u32)
        }
    }
}
