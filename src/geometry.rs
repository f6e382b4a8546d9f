use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Axis-aligned rectangle in abstract layout cells.
///
/// `x`/`y` locate the top-left corner; `width`/`height` extend right and
/// down. All tiling math stays in `u16` cells with `u32` intermediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One-past-the-right column.
    pub const fn right(&self) -> u16 {
        self.x + self.width
    }

    /// One-past-the-bottom row.
    pub const fn bottom(&self) -> u16 {
        self.y + self.height
    }

    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Start of this rect's span along `axis`.
    pub const fn span_start(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// End (exclusive) of this rect's span along `axis`.
    pub const fn span_end(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Length of the overlap between the two rects' spans along `axis`.
    /// Zero means the spans touch at most at a single point.
    pub fn span_overlap(&self, other: &Rect, axis: Axis) -> u16 {
        let start = self.span_start(axis).max(other.span_start(axis));
        let end = self.span_end(axis).min(other.span_end(axis));
        end.saturating_sub(start)
    }
}

/// Container dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub const fn as_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One of the four sides of a pane, as named by structural commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Above,
    Below,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Above, Side::Below, Side::Left, Side::Right];

    pub const fn opposite(&self) -> Side {
        match self {
            Side::Above => Side::Below,
            Side::Below => Side::Above,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The axis a border on this side runs along. A left/right border is a
    /// vertical line, so position along it is measured on the vertical axis.
    pub const fn border_axis(&self) -> Axis {
        match self {
            Side::Above | Side::Below => Axis::Horizontal,
            Side::Left | Side::Right => Axis::Vertical,
        }
    }

    /// The two sides perpendicular to this one, in ascending border order.
    pub const fn flanks(&self) -> [Side; 2] {
        match self {
            Side::Above | Side::Below => [Side::Left, Side::Right],
            Side::Left | Side::Right => [Side::Above, Side::Below],
        }
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Side::Above => 0,
            Side::Below => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Above => "above",
            Side::Below => "below",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "above" => Ok(Side::Above),
            "below" => Ok(Side::Below),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(EngineError::UnknownSide(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_exclusive() {
        let rect = Rect::new(2, 3, 10, 5);
        assert_eq!(rect.right(), 12);
        assert_eq!(rect.bottom(), 8);
        assert_eq!(rect.area(), 50);
    }

    #[test]
    fn span_overlap_ignores_corner_contact() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 10, 10, 10);
        assert_eq!(a.span_overlap(&b, Axis::Horizontal), 0);
        assert_eq!(a.span_overlap(&b, Axis::Vertical), 0);

        let c = Rect::new(5, 0, 10, 10);
        assert_eq!(a.span_overlap(&c, Axis::Horizontal), 5);
    }

    #[test]
    fn side_round_trips_through_text() {
        for side in Side::ALL {
            assert_eq!(side.as_str().parse::<Side>().unwrap(), side);
        }
    }

    #[test]
    fn unknown_side_token_is_rejected() {
        let err = "diagonal".parse::<Side>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownSide(t) if t == "diagonal"));
    }

    #[test]
    fn opposites_pair_up() {
        assert_eq!(Side::Above.opposite(), Side::Below);
        assert_eq!(Side::Left.opposite(), Side::Right);
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn flanks_cross_the_border_axis() {
        assert_eq!(Side::Left.flanks(), [Side::Above, Side::Below]);
        assert_eq!(Side::Below.flanks(), [Side::Left, Side::Right]);
    }
}
