//! Physical pixel geometry for vitrine.
//!
//! Element measurements reported by the host page arrive as physical pixel
//! values relative to the viewport. This module provides the small set of
//! types the motion engine needs to describe them.
//!
//! # Key Types
//!
//! - [`Px`] - A single physical pixel coordinate value that supports negative
//!   values for elements scrolled above the viewport
//! - [`PxPosition`] - A 2D position in physical pixel space, e.g. a click point
//! - [`PxSize`] - A 2D size in physical pixel space, e.g. the viewport
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner of the viewport
//! - X-axis increases to the right
//! - Y-axis increases downward
//!
//! # Example
//!
//! ```
//! use vitrine_ui::px::{Px, PxPosition, PxSize};
//!
//! let click = PxPosition::new(Px::new(100), Px::new(200));
//! let viewport = PxSize::new(Px::new(1280), Px::new(720));
//!
//! assert_eq!(viewport.max_dimension(), Px::new(1280));
//! assert_eq!(click.offset(Px::new(10), Px::new(-5)).y, Px::new(195));
//! ```

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A physical pixel coordinate value.
///
/// Negative values are valid: an element whose top edge has scrolled above
/// the viewport reports a negative top.
///
/// # Examples
///
/// ```
/// use vitrine_ui::px::Px;
///
/// let top = Px::new(-50);
/// let height = Px::new(200);
/// assert_eq!(top + height, Px::new(150));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Px(pub i32);

impl Px {
    /// A constant representing zero pixels.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Px` instance from an i32 value.
    pub const fn new(value: i32) -> Self {
        Px(value)
    }

    /// Returns the raw i32 value.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrine_ui::px::Px;
    ///
    /// let px = Px::new(42);
    /// assert_eq!(px.raw(), 42);
    /// ```
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Converts the pixel value to f32.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Creates a `Px` from an f32 value, saturating at the numeric bounds
    /// instead of overflowing. `NaN` maps to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrine_ui::px::Px;
    ///
    /// assert_eq!(Px::saturating_from_f32(42.7).raw(), 42);
    /// assert_eq!(Px::saturating_from_f32(f32::MAX).raw(), i32::MAX);
    /// assert_eq!(Px::saturating_from_f32(f32::MIN).raw(), i32::MIN);
    /// ```
    pub fn saturating_from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Px::ZERO;
        }
        let clamped_value = value.clamp(i32::MIN as f32, i32::MAX as f32);
        Px(clamped_value as i32)
    }

    /// Saturating integer addition.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Px(self.0.saturating_add(rhs.0))
    }

    /// Saturating integer subtraction.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Px(self.0.saturating_sub(rhs.0))
    }

    /// Returns the value, or zero if negative.
    pub fn positive(self) -> Self {
        Px(self.0.max(0))
    }
}

impl Add for Px {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0 - rhs.0)
    }
}

impl Neg for Px {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Px(-self.0)
    }
}

impl AddAssign for Px {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Px {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl From<i32> for Px {
    fn from(value: i32) -> Self {
        Px(value)
    }
}

/// A 2D position in physical pixel space.
///
/// # Examples
///
/// ```
/// use vitrine_ui::px::{Px, PxPosition};
///
/// let a = PxPosition::new(Px::new(0), Px::new(0));
/// let b = PxPosition::new(Px::new(3), Px::new(4));
/// assert_eq!(a.distance_to(b), 5.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PxPosition {
    /// The x-coordinate in physical pixels
    pub x: Px,
    /// The y-coordinate in physical pixels
    pub y: Px,
}

impl PxPosition {
    /// A constant representing the zero position (0, 0).
    pub const ZERO: Self = Self { x: Px(0), y: Px(0) };

    /// Creates a new position from x and y coordinates.
    pub const fn new(x: Px, y: Px) -> Self {
        Self { x, y }
    }

    /// Offsets the position by the given deltas.
    pub fn offset(self, dx: Px, dy: Px) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = self.x.to_f32() - other.x.to_f32();
        let dy = self.y.to_f32() - other.y.to_f32();
        dx.hypot(dy)
    }
}

impl Add for PxPosition {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PxPosition {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size in physical pixel space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PxSize {
    /// The width in physical pixels
    pub width: Px,
    /// The height in physical pixels
    pub height: Px,
}

impl PxSize {
    /// A constant representing zero size.
    pub const ZERO: Self = Self {
        width: Px(0),
        height: Px(0),
    };

    /// Creates a new size from width and height.
    pub const fn new(width: Px, height: Px) -> Self {
        Self { width, height }
    }

    /// The larger of width and height.
    pub fn max_dimension(self) -> Px {
        self.width.max(self.height)
    }

    /// Length of the diagonal.
    pub fn diagonal(self) -> f32 {
        self.width.to_f32().hypot(self.height.to_f32())
    }

    /// The four corners, clockwise from the origin.
    pub fn corners(self) -> [PxPosition; 4] {
        [
            PxPosition::ZERO,
            PxPosition::new(self.width, Px::ZERO),
            PxPosition::new(self.width, self.height),
            PxPosition::new(Px::ZERO, self.height),
        ]
    }
}
