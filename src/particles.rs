use crate::color::{BrushColor, Rgba};
use crate::geometry::{Point, replica_angle};
use crate::renderer::Surface;
use crate::rng::CosmeticRng;

const EMIT_CHANCE: f64 = 0.5;
const LIFE_DECAY: f32 = 0.02;
const SIZE_DECAY: f64 = 0.95;
const MAX_SIZE: f64 = 3.0;
/// Upper bound on live sprites; oldest are dropped first.
pub const MAX_PARTICLES: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f32,
    pub color: Rgba,
    pub size: f64,
}

/// Sparkles trailing the brush tip, mirrored around every symmetry axis.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
    rng: CosmeticRng,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self::new(CosmeticRng::from_entropy())
    }
}

impl ParticleEmitter {
    pub fn new(rng: CosmeticRng) -> Self {
        Self { particles: Vec::new(), rng }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Maybe spawn one particle per replica of `tip`.
    pub fn emit(&mut self, tip: &Point, symmetry: u32, color: &BrushColor) {
        let rgba = color.to_rgba();
        for s in 0..symmetry {
            let at = tip.rotated(replica_angle(s, symmetry));
            if !self.rng.chance(EMIT_CHANCE) {
                continue;
            }
            let particle = Particle {
                x: at.x,
                y: at.y,
                vx: (self.rng.next_f64() - 0.5) * 2.0,
                vy: (self.rng.next_f64() - 0.5) * 2.0,
                life: 1.0,
                color: rgba,
                size: self.rng.next_f64() * MAX_SIZE,
            };
            self.particles.push(particle);
        }

        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Advance one frame: move, fade, shrink, and drop dead sprites.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= LIFE_DECAY;
            p.size *= SIZE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            surface.fill_circle(Point::new(p.x, p.y), p.size, p.color.with_alpha_factor(p.life));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
