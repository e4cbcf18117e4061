//! Field geometry: the shared coordinate frame for every subsystem.
//!
//! Home plate is the origin, +y points at dead center field and +x at the
//! first-base side. Spray direction is measured in degrees from the
//! left-field line (0°) through center (45°) to the right-field line (90°).

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::{bases, fence};
use crate::models::{Base, FieldPosition};

/// 2D field position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_to(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector toward `other`; falls back to +y when coincident.
    #[inline]
    pub fn direction_to(&self, other: Vec2) -> Vec2 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-6 {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::new(dx / len, dy / len)
        }
    }

    #[inline]
    pub fn scaled(&self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn plus(&self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Step `max_step` meters toward `target`, stopping exactly on it.
    pub fn stepped_toward(&self, target: Vec2, max_step: f32) -> Vec2 {
        let dist = self.distance_to(target);
        if dist <= max_step || dist < 1e-6 {
            target
        } else {
            let dir = self.direction_to(target);
            self.plus(dir.scaled(max_step))
        }
    }
}

/// Unit vector for a spray direction in degrees.
///
/// 0° runs up the left-field line, 45° through second base to center,
/// 90° up the right-field line.
#[inline]
pub fn spray_unit(direction_deg: f32) -> Vec2 {
    let rad = (direction_deg - 45.0).to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Point at `distance` meters along a spray direction.
#[inline]
pub fn spray_point(direction_deg: f32, distance: f32) -> Vec2 {
    spray_unit(direction_deg).scaled(distance)
}

/// Fence distance along a spray direction (m).
#[inline]
pub fn fence_distance(direction_deg: f32) -> f32 {
    fence::distance_m(direction_deg)
}

#[inline]
pub fn is_fair(direction_deg: f32) -> bool {
    fence::is_fair(direction_deg)
}

/// Base coordinates.
pub fn base_position(base: Base) -> Vec2 {
    let (x, y) = match base {
        Base::First => bases::FIRST,
        Base::Second => bases::SECOND,
        Base::Third => bases::THIRD,
        Base::Home => bases::HOME,
    };
    Vec2::new(x, y)
}

/// Conventional defensive alignment, used when the caller supplies no
/// positions and by the neutral dummy substitute.
pub fn standard_position(pos: FieldPosition) -> Vec2 {
    match pos {
        FieldPosition::Pitcher => Vec2::new(0.0, 18.4),
        FieldPosition::Catcher => Vec2::new(0.0, -1.2),
        FieldPosition::First => Vec2::new(17.0, 22.0),
        FieldPosition::Second => Vec2::new(8.5, 33.5),
        FieldPosition::Third => Vec2::new(-17.0, 22.0),
        FieldPosition::Short => Vec2::new(-8.5, 33.5),
        FieldPosition::Left => Vec2::new(-37.0, 64.0),
        FieldPosition::Center => Vec2::new(0.0, 88.0),
        FieldPosition::Right => Vec2::new(37.0, 64.0),
    }
}

/// Infield ring radius used to pick retrievers for shallow stopped balls (m).
pub const INFIELD_RING_M: f32 = 42.0;
