//! All game entity types — plain data plus the geometry helpers they share.
//!
//! Positions are in logical field pixels (origin top-left, y grows downward)
//! and velocities in pixels per second.

use std::time::Duration;

// ── Field & entity geometry ───────────────────────────────────────────────────

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

pub const PLAYER_SIZE: (f32, f32) = (40.0, 40.0);
/// Distance between the player's start row and the bottom edge.
pub const PLAYER_START_OFFSET: f32 = 100.0;
pub const MAX_HEALTH: u8 = 3;

/// 80% of the 55 px enemy sprite.
pub const ENEMY_SIZE: (f32, f32) = (44.0, 44.0);
pub const ENEMY_SPAWN_Y: f32 = -50.0;
/// How far below the bottom edge an enemy travels before it counts as dodged.
pub const ENEMY_EXIT_MARGIN: f32 = 50.0;

pub const BULLET_SIZE: (f32, f32) = (4.0, 12.0);
pub const BULLET_SPEED: f32 = 600.0;
/// Bullets leave the ship's nose, not its centre.
pub const BULLET_MUZZLE_OFFSET: f32 = 30.0;

pub const POINTS_FOR_DODGE: u32 = 10;
pub const POINTS_FOR_KILL: u32 = POINTS_FOR_DODGE * 5;

// ── Basic vectors & boxes ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        Vec2::new(other.x - self.x, other.y - self.y).length()
    }
}

/// Axis-aligned bounding box stored as centre + half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    pub fn around(center: Vec2, size: (f32, f32)) -> Self {
        Self {
            center,
            half_w: size.0 / 2.0,
            half_h: size.1 / 2.0,
        }
    }

    /// Touching edges do not count as an overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half_w + other.half_w
            && (self.center.y - other.center.y).abs() < self.half_h + other.half_h
    }
}

// ── Identifiers ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u8,
    /// Set while the post-hit flash is showing; cleared by a deferred action.
    pub flashing: bool,
    /// Clock time at which the current flash should end.
    pub flash_until: Option<Duration>,
}

impl Player {
    pub fn spawn(field_width: f32, field_height: f32) -> Self {
        Self {
            pos: Vec2::new(field_width / 2.0, field_height - PLAYER_START_OFFSET),
            vel: Vec2::ZERO,
            health: MAX_HEALTH,
            flashing: false,
            flash_until: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, PLAYER_SIZE)
    }
}

// ── Enemy & bullet ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    /// Downward speed in px/s, fixed at spawn.
    pub speed: f32,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, ENEMY_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    /// Vertical velocity in px/s (negative = upward).
    pub vel_y: f32,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, BULLET_SIZE)
    }
}

// ── Session status ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// What the end-of-session overlay shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_overlap_when_centres_are_close() {
        let a = Aabb::around(Vec2::new(100.0, 100.0), (40.0, 40.0));
        let b = Aabb::around(Vec2::new(130.0, 110.0), (44.0, 44.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::around(Vec2::new(0.0, 0.0), (10.0, 10.0));
        let b = Aabb::around(Vec2::new(10.0, 0.0), (10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn player_spawns_near_bottom_centre() {
        let p = Player::spawn(FIELD_WIDTH, FIELD_HEIGHT);
        assert_eq!(p.pos, Vec2::new(400.0, 500.0));
        assert_eq!(p.health, MAX_HEALTH);
        assert!(!p.flashing);
    }
}
