//! Entity registry — owns every enemy and bullet record for the session.
//!
//! Records live in plain vectors; ids are handed out from a single counter so
//! a stale id never aliases a newer entity.  Removal is by id and silently
//! ignores ids that are already gone.

use crate::entities::{Bullet, Enemy, EntityId, Vec2, BULLET_SPEED};

#[derive(Clone, Debug, Default)]
pub struct Registry {
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    // ── Creation ─────────────────────────────────────────────────────────────

    pub fn spawn_enemy(&mut self, pos: Vec2, speed: f32) -> EntityId {
        let id = self.alloc_id();
        self.enemies.push(Enemy { id, pos, speed });
        id
    }

    /// Fire a bullet upward from `pos`.
    pub fn spawn_bullet(&mut self, pos: Vec2) -> EntityId {
        let id = self.alloc_id();
        self.bullets.push(Bullet {
            id,
            pos,
            vel_y: -BULLET_SPEED,
        });
        id
    }

    // ── Destruction ──────────────────────────────────────────────────────────

    pub fn despawn_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.swap_remove(idx))
    }

    pub fn despawn_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let idx = self.bullets.iter().position(|b| b.id == id)?;
        Some(self.bullets.swap_remove(idx))
    }

    /// Drop every enemy and bullet.  Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn contains_enemy(&self, id: EntityId) -> bool {
        self.enemy(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.bullets.is_empty()
    }

    // ── Motion ───────────────────────────────────────────────────────────────

    /// Advance every enemy and bullet by `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        for e in &mut self.enemies {
            e.pos.y += e.speed * dt;
        }
        for b in &mut self.bullets {
            b.pos.y += b.vel_y * dt;
        }
    }

    /// Zero every velocity; positions stay where they are.
    pub fn freeze(&mut self) {
        for e in &mut self.enemies {
            e.speed = 0.0;
        }
        for b in &mut self.bullets {
            b.vel_y = 0.0;
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.enemies.iter().all(|e| e.speed == 0.0) && self.bullets.iter().all(|b| b.vel_y == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut reg = Registry::new();
        let a = reg.spawn_enemy(Vec2::new(10.0, 0.0), 100.0);
        let b = reg.spawn_bullet(Vec2::new(10.0, 0.0));
        let c = reg.spawn_enemy(Vec2::new(20.0, 0.0), 100.0);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn despawn_twice_is_a_no_op() {
        let mut reg = Registry::new();
        let id = reg.spawn_enemy(Vec2::new(10.0, 0.0), 100.0);
        assert!(reg.despawn_enemy(id).is_some());
        assert!(reg.despawn_enemy(id).is_none());
        assert!(reg.enemies().is_empty());
    }

    #[test]
    fn ids_do_not_restart_after_clear() {
        let mut reg = Registry::new();
        let before = reg.spawn_bullet(Vec2::ZERO);
        reg.clear();
        let after = reg.spawn_bullet(Vec2::ZERO);
        assert!(after > before);
        assert_eq!(reg.bullets().len(), 1);
    }

    #[test]
    fn integrate_moves_enemies_down_and_bullets_up() {
        let mut reg = Registry::new();
        reg.spawn_enemy(Vec2::new(100.0, 0.0), 120.0);
        reg.spawn_bullet(Vec2::new(100.0, 300.0));
        reg.integrate(0.5);
        assert_eq!(reg.enemies()[0].pos.y, 60.0);
        assert_eq!(reg.bullets()[0].pos.y, 0.0);
    }

    #[test]
    fn freeze_stops_motion() {
        let mut reg = Registry::new();
        reg.spawn_enemy(Vec2::new(100.0, 10.0), 120.0);
        reg.spawn_bullet(Vec2::new(100.0, 300.0));
        reg.freeze();
        assert!(reg.is_frozen());
        reg.integrate(1.0);
        assert_eq!(reg.enemies()[0].pos.y, 10.0);
        assert_eq!(reg.bullets()[0].pos.y, 300.0);
    }
}
