//! Collision & damage resolution.
//!
//! Three passes run each Playing tick, in this order:
//!
//! 1. bullets ↔ enemies — each bullet kills at most one enemy, each enemy dies once;
//! 2. player ↔ enemies — only enemies that survived pass 1 can hurt the player;
//! 3. off-field cleanup — bullets above the top edge vanish, enemies below the
//!    bottom edge (plus margin) count as dodged.
//!
//! The passes mutate the registry and player directly and report score and
//! health changes back to the caller.  Presentation is informed only through
//! the event queue.

use crate::entities::{EntityId, Player, ENEMY_EXIT_MARGIN, POINTS_FOR_DODGE, POINTS_FOR_KILL};
use crate::events::{EventQueue, GameEvent};
use crate::registry::Registry;

/// Result of the player ↔ enemy pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerDamage {
    pub hits: u8,
    pub died: bool,
}

/// Bullet ↔ enemy pass.  Returns the score earned.
pub fn resolve_bullet_hits(reg: &mut Registry, events: &mut EventQueue) -> u32 {
    let mut pairs: Vec<(EntityId, EntityId)> = Vec::new();

    for bullet in reg.bullets() {
        let bb = bullet.bounds();
        let target = reg
            .enemies()
            .iter()
            .find(|e| !pairs.iter().any(|&(_, dead)| dead == e.id) && bb.overlaps(&e.bounds()));
        if let Some(enemy) = target {
            pairs.push((bullet.id, enemy.id));
        }
    }

    let mut gained = 0;
    for (bullet_id, enemy_id) in pairs {
        reg.despawn_bullet(bullet_id);
        if let Some(enemy) = reg.despawn_enemy(enemy_id) {
            gained += POINTS_FOR_KILL;
            events.push(GameEvent::EnemyDestroyed {
                x: enemy.pos.x,
                y: enemy.pos.y,
            });
        }
    }
    gained
}

/// Player ↔ enemy pass.  Each overlapping enemy is destroyed and costs one
/// health; once health hits zero no further hits are taken this tick.
pub fn resolve_player_hits(
    reg: &mut Registry,
    player: &mut Player,
    events: &mut EventQueue,
) -> PlayerDamage {
    let pb = player.bounds();
    let rammers: Vec<EntityId> = reg
        .enemies()
        .iter()
        .filter(|e| pb.overlaps(&e.bounds()))
        .map(|e| e.id)
        .collect();

    let mut damage = PlayerDamage::default();
    for id in rammers {
        if player.health == 0 {
            break;
        }
        reg.despawn_enemy(id);
        player.health = player.health.saturating_sub(1);
        damage.hits += 1;
        events.push(GameEvent::PlayerHit {
            health: player.health,
        });
        if player.health == 0 {
            damage.died = true;
        }
    }
    damage
}

/// Off-field cleanup.  Returns the dodge score earned.
pub fn cleanup_off_field(reg: &mut Registry, field_height: f32, events: &mut EventQueue) -> u32 {
    let gone_bullets: Vec<EntityId> = reg
        .bullets()
        .iter()
        .filter(|b| b.pos.y < 0.0)
        .map(|b| b.id)
        .collect();
    for id in gone_bullets {
        reg.despawn_bullet(id);
    }

    let dodged: Vec<EntityId> = reg
        .enemies()
        .iter()
        .filter(|e| e.pos.y > field_height + ENEMY_EXIT_MARGIN)
        .map(|e| e.id)
        .collect();
    let mut gained = 0;
    for id in dodged {
        if reg.despawn_enemy(id).is_some() {
            gained += POINTS_FOR_DODGE;
            events.push(GameEvent::EnemyDodged);
        }
    }
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Vec2;

    fn player_at(x: f32, y: f32, health: u8) -> Player {
        let mut p = Player::spawn(800.0, 600.0);
        p.pos = Vec2::new(x, y);
        p.health = health;
        p
    }

    #[test]
    fn one_bullet_kills_only_one_of_two_stacked_enemies() {
        let mut reg = Registry::new();
        let mut events = EventQueue::new();
        reg.spawn_enemy(Vec2::new(100.0, 100.0), 100.0);
        reg.spawn_enemy(Vec2::new(102.0, 104.0), 100.0);
        reg.spawn_bullet(Vec2::new(100.0, 102.0));

        let gained = resolve_bullet_hits(&mut reg, &mut events);
        assert_eq!(gained, POINTS_FOR_KILL);
        assert_eq!(reg.enemies().len(), 1);
        assert!(reg.bullets().is_empty());
    }

    #[test]
    fn two_bullets_on_one_enemy_spend_only_one() {
        let mut reg = Registry::new();
        let mut events = EventQueue::new();
        reg.spawn_enemy(Vec2::new(100.0, 100.0), 100.0);
        reg.spawn_bullet(Vec2::new(100.0, 100.0));
        reg.spawn_bullet(Vec2::new(101.0, 101.0));

        let gained = resolve_bullet_hits(&mut reg, &mut events);
        assert_eq!(gained, POINTS_FOR_KILL);
        assert!(reg.enemies().is_empty());
        assert_eq!(reg.bullets().len(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn health_never_goes_below_zero_on_multiple_rams() {
        let mut reg = Registry::new();
        let mut events = EventQueue::new();
        for dx in [0.0, 5.0, 10.0] {
            reg.spawn_enemy(Vec2::new(400.0 + dx, 500.0), 100.0);
        }
        let mut player = player_at(400.0, 500.0, 2);

        let damage = resolve_player_hits(&mut reg, &mut player, &mut events);
        assert_eq!(player.health, 0);
        assert_eq!(damage, PlayerDamage { hits: 2, died: true });
        // The third enemy was never resolved.
        assert_eq!(reg.enemies().len(), 1);
    }

    #[test]
    fn enemy_shot_this_tick_cannot_ram() {
        let mut reg = Registry::new();
        let mut events = EventQueue::new();
        reg.spawn_enemy(Vec2::new(400.0, 470.0), 100.0);
        reg.spawn_bullet(Vec2::new(400.0, 470.0));
        let mut player = player_at(400.0, 500.0, 3);

        resolve_bullet_hits(&mut reg, &mut events);
        let damage = resolve_player_hits(&mut reg, &mut player, &mut events);
        assert_eq!(damage.hits, 0);
        assert_eq!(player.health, 3);
    }

    #[test]
    fn off_field_cleanup_scores_only_dodges() {
        let mut reg = Registry::new();
        let mut events = EventQueue::new();
        reg.spawn_bullet(Vec2::new(10.0, -1.0));
        reg.spawn_enemy(Vec2::new(10.0, 651.0), 100.0);
        reg.spawn_enemy(Vec2::new(10.0, 650.0), 100.0);

        let gained = cleanup_off_field(&mut reg, 600.0, &mut events);
        assert_eq!(gained, POINTS_FOR_DODGE);
        assert!(reg.bullets().is_empty());
        assert_eq!(reg.enemies().len(), 1);
        assert_eq!(events.iter().collect::<Vec<_>>(), vec![&GameEvent::EnemyDodged]);
    }
}
