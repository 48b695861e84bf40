/// Rendering layer — all terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use dodge_shooter::compute::GameState;
use dodge_shooter::effects::{Effects, Stage};
use dodge_shooter::entities::{GameStatus, Vec2};
use dodge_shooter::sprites::{Sprite, SpriteSet};
use dodge_shooter::starfield::Starfield;
use dodge_shooter::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HIT: Color = Color::Red;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Green;
const C_STAR_LAYERS: [Color; 3] = [Color::DarkGrey, Color::Grey, Color::White];
const C_HINT: Color = Color::DarkGrey;

/// Everything a frame needs besides the simulation itself.
pub struct Scene<'a> {
    pub viewport: &'a Viewport,
    pub sprites: &'a SpriteSet,
    pub stars: &'a Starfield,
    pub effects: &'a Effects,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, scene: &Scene) -> std::io::Result<()> {
    let vp = scene.viewport;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_stars(out, vp, &scene.sprites.stars, scene.stars)?;
    draw_border(out, vp)?;
    draw_hud(out, vp, state)?;

    for enemy in state.registry.enemies() {
        draw_sprite(out, vp, &scene.sprites.enemy, enemy.pos, C_ENEMY)?;
    }
    for bullet in state.registry.bullets() {
        if let Some((col, row)) = vp.to_cell(bullet.pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(C_BULLET))?;
            out.queue(Print("║"))?;
        }
    }
    draw_explosions(out, vp, scene.effects)?;

    let ship_color = if state.player.flashing {
        C_PLAYER_HIT
    } else {
        C_PLAYER
    };
    draw_sprite(out, vp, &scene.sprites.player, state.player.pos, ship_color)?;
    draw_controls_hint(out, vp)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, vp, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    // Health — right
    let hearts: String = "♥".repeat(state.player.health as usize);
    let health_text = format!("Health: {} {}", state.player.health, hearts);
    let rx = vp
        .cols
        .saturating_sub(health_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_text))?;

    Ok(())
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

/// Tile the star art over the play area once per layer.  Each star belongs
/// to exactly one layer, so the layers never double up.
fn draw_stars<W: Write>(
    out: &mut W,
    vp: &Viewport,
    tile: &Sprite,
    field: &Starfield,
) -> std::io::Result<()> {
    let (tw, th) = (tile.width(), tile.height());
    if tw == 0 || th == 0 {
        return Ok(());
    }
    let grid: Vec<Vec<char>> = tile.rows.iter().map(|r| r.chars().collect()).collect();
    let (c0, c1) = vp.play_cols();
    let (r0, r1) = vp.play_rows();

    for (layer, offset) in field.offsets().iter().enumerate() {
        let shift = (offset / vp.px_per_row()) as usize % th;
        out.queue(style::SetForegroundColor(C_STAR_LAYERS[layer]))?;
        for row in r0..r1 {
            // Stars drift down the screen as the offset grows.
            let tr = ((row - r0) as usize + th - shift) % th;
            for col in c0..c1 {
                let tc = (col - c0) as usize % tw;
                let Some(&ch) = grid[tr].get(tc) else {
                    continue;
                };
                if ch == ' ' || (tr * 7 + tc) % 3 != layer {
                    continue;
                }
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print(ch))?;
            }
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Draw `sprite` centred on `pos`, clipped to the play area.  Spaces are
/// transparent.
fn draw_sprite<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sprite: &Sprite,
    pos: Vec2,
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row)) = vp.to_cell(pos) else {
        return Ok(());
    };
    let (c0, c1) = vp.play_cols();
    let (r0, r1) = vp.play_rows();
    let left = col as i32 - sprite.width() as i32 / 2;
    let top = row as i32 - sprite.height() as i32 / 2;

    out.queue(style::SetForegroundColor(color))?;
    for (dy, line) in sprite.rows.iter().enumerate() {
        let y = top + dy as i32;
        if y < r0 as i32 || y >= r1 as i32 {
            continue;
        }
        for (dx, ch) in line.chars().enumerate() {
            let x = left + dx as i32;
            if ch == ' ' || x < c0 as i32 || x >= c1 as i32 {
                continue;
            }
            out.queue(cursor::MoveTo(x as u16, y as u16))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

fn draw_explosions<W: Write>(out: &mut W, vp: &Viewport, effects: &Effects) -> std::io::Result<()> {
    let now = effects.now();
    for explosion in effects.explosions() {
        for (stage, pos, life_left) in explosion.visible(now) {
            let Some((col, row)) = vp.to_cell(pos) else {
                continue;
            };
            let (glyph, color) = match stage {
                Stage::Flash => ("✦", Color::White),
                Stage::Fire if life_left > 0.5 => ("*", Color::Red),
                Stage::Fire => ("*", Color::DarkYellow),
                Stage::Sparks => ("·", Color::Yellow),
                Stage::Debris => (".", Color::DarkGrey),
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ / WASD : Move   SPACE / tap : Shoot   drag : Steer   Q : Quit",
    ))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let final_score = state.summary.map_or(state.score, |s| s.final_score);
    let score_line = format!("Final Score: {}", final_score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::White),
        ("Tap, Click or SPACE to Restart", Color::Yellow),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
