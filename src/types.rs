//! Core types for spark-views.
//!
//! Integer cell geometry shared by the view tree, the hit tester and the
//! layout bridge. All coordinates are terminal cells; `x` is the column and
//! `y` is the row.

// =============================================================================
// Point
// =============================================================================

/// A cell position.
///
/// Signed because local coordinates go negative when a point lies above or
/// left of a view (a grabbed view keeps receiving events outside itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by another point.
    #[inline]
    pub const fn offset(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }

    /// Translate by the negation of another point.
    #[inline]
    pub const fn relative_to(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<(u16, u16)> for Point {
    fn from((x, y): (u16, u16)) -> Self {
        Self {
            x: x as i32,
            y: y as i32,
        }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// A rectangle of cells. `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rect. Negative sizes are clamped to zero.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rect covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Move the rect by `by`.
    #[inline]
    pub const fn offset(&self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Shrink the rect by a thickness on every side.
    pub fn inset(&self, thickness: Thickness) -> Self {
        Rect::new(
            self.x + thickness.left,
            self.y + thickness.top,
            self.width - thickness.horizontal(),
            self.height - thickness.vertical(),
        )
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

// =============================================================================
// Thickness
// =============================================================================

/// Per-side inset in cells (border + padding around a viewport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Thickness {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Thickness {
    pub const ZERO: Self = Self::uniform(0);

    /// Same inset on all four sides.
    pub const fn uniform(value: i32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[inline]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    #[inline]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }

    /// Offset from a frame's top-left to its inner area's top-left.
    #[inline]
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

// =============================================================================
// Coordinate spaces
// =============================================================================

/// The space a mouse event position is expressed in.
///
/// Content views receive viewport coordinates (0,0 = top-left visible
/// content cell). Decorative views receive frame coordinates (0,0 = their
/// own frame's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordSpace {
    #[default]
    Screen,
    Viewport,
    Frame,
}

// =============================================================================
// Dimension
// =============================================================================

/// Dimension value for layout.
///
/// - `Auto`: Auto-size based on content or flex rules
/// - `Cells(n)`: Absolute value in terminal cells
/// - `Percent(n)`: Percentage of parent (0-100)
///
/// # Examples
///
/// ```
/// use spark_views::types::Dimension;
///
/// let width = Dimension::Cells(50);
/// let height = Dimension::Percent(100.0);
/// let auto = Dimension::Auto;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    /// Absolute size in terminal cells.
    Cells(u16),
    /// Percentage of parent size (0-100).
    Percent(f32),
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Auto
        } else {
            Self::Cells(value)
        }
    }
}

// =============================================================================
// Flex Enums - For layout
// =============================================================================

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Column,
    Row,
}

/// Position type.
///
/// `Absolute` views are placed at their style offset inside the parent and
/// take no part in the parent's flow. Overlapping windows use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Relative,
    Absolute { x: u16, y: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 4)));
        assert!(!rect.contains(Point::new(6, 4)));
        assert!(!rect.contains(Point::new(5, 5)));
        assert!(!rect.contains(Point::new(1, 3)));
    }

    #[test]
    fn test_rect_negative_size_clamped() {
        let rect = Rect::new(0, 0, -3, 5);
        assert_eq!(rect.width, 0);
        assert!(rect.is_empty());
        assert!(!rect.contains(Point::new(0, 0)));
    }

    #[test]
    fn test_rect_inset() {
        let rect = Rect::new(10, 10, 20, 8);
        let inner = rect.inset(Thickness::new(1, 2, 1, 2));
        assert_eq!(inner, Rect::new(12, 11, 16, 6));

        // Inset larger than the rect collapses to empty
        let collapsed = Rect::new(0, 0, 2, 2).inset(Thickness::uniform(2));
        assert!(collapsed.is_empty());
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));

        let c = Rect::new(20, 20, 2, 2);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_point_offsets() {
        let p = Point::new(7, 9);
        assert_eq!(p.offset(Point::new(1, -1)), Point::new(8, 8));
        assert_eq!(p.relative_to(Point::new(7, 9)), Point::ZERO);
        assert_eq!(Point::from((3u16, 4u16)), Point::new(3, 4));
    }

    #[test]
    fn test_dimension_from_u16() {
        assert_eq!(Dimension::from(0u16), Dimension::Auto);
        assert_eq!(Dimension::from(12u16), Dimension::Cells(12));
    }
}
