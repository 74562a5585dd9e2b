// Confetti overlay: a short-lived particle burst drawn over the whole frame.
//
// Positions are kept in normalized screen space (0.0..=1.0 on both axes) so
// a burst survives terminal resizes. Particles launch upward from just below
// the center, fall back under gravity, and are dropped once they leave the
// screen.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Frame;

const GLYPHS: &[char] = &['*', '+', 'o', '.', '~', '#'];

const COLORS: &[Color] = &[
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::LightBlue,
    Color::LightRed,
    Color::LightYellow,
];

/// Downward acceleration in screen heights per second squared.
const GRAVITY: f32 = 1.2;
/// Horizontal velocity kept per step.
const DRAG: f32 = 0.98;
/// Launch point as a fraction of the screen.
const ORIGIN: (f32, f32) = (0.5, 0.6);

#[derive(Debug, Clone)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glyph: char,
    color: Color,
}

/// Active confetti particles.
pub struct Confetti {
    particles: Vec<Particle>,
    burst_size: usize,
    rng: SmallRng,
}

impl Confetti {
    pub fn new(burst_size: usize) -> Self {
        Confetti::with_rng(burst_size, SmallRng::from_os_rng())
    }

    pub fn with_rng(burst_size: usize, rng: SmallRng) -> Self {
        Confetti {
            particles: Vec::new(),
            burst_size,
            rng,
        }
    }

    /// Launch one burst. Bursts stack with particles still in flight.
    pub fn burst(&mut self) {
        self.particles.reserve(self.burst_size);
        for _ in 0..self.burst_size {
            let particle = Particle {
                x: ORIGIN.0 + self.rng.random_range(-0.05..0.05),
                y: ORIGIN.1,
                vx: self.rng.random_range(-0.6..0.6),
                vy: self.rng.random_range(-1.5..-0.5),
                glyph: GLYPHS[self.rng.random_range(0..GLYPHS.len())],
                color: COLORS[self.rng.random_range(0..COLORS.len())],
            };
            self.particles.push(particle);
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.vy += GRAVITY * dt;
            p.vx *= DRAG;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.particles
            .retain(|p| p.y <= 1.0 && (0.0..=1.0).contains(&p.x));
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Draw every on-screen particle directly into the frame buffer.
pub fn render(frame: &mut Frame, area: Rect, confetti: &Confetti) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let max_x = f32::from(area.width - 1);
    let max_y = f32::from(area.height - 1);
    let buf = frame.buffer_mut();

    for p in &confetti.particles {
        if p.y < 0.0 {
            continue;
        }
        let x = area.x + (p.x * max_x).round() as u16;
        let y = area.y + (p.y * max_y).round() as u16;
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_char(p.glyph).set_fg(p.color);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
