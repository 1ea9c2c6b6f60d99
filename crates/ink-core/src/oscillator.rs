use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Two independent phase accumulators driving a node's idle wander.
///
/// Each axis has its own phase so the wander traces a Lissajous-like path
/// instead of a diagonal line. Phases are kept in [0, 2π) to avoid losing
/// f32 precision over long idle periods; `sin` makes this invisible.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WanderPhase {
    x: f32,
    y: f32,
}

impl WanderPhase {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: wrap_phase(x), y: wrap_phase(y) }
    }

    /// Draw fresh phases uniformly from [0, 2π) on both axes.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.x = rng.gen_range(0.0..TAU);
        self.y = rng.gen_range(0.0..TAU);
    }

    /// Advance both axes by `step` radians.
    pub fn advance(&mut self, step: f32) {
        self.x = wrap_phase(self.x + step);
        self.y = wrap_phase(self.y + step);
    }

    /// `amplitude * sin(phase)` per axis.
    pub fn offset(&self, amplitude: f32) -> Vec2 {
        Vec2::new(self.x.sin(), self.y.sin()) * amplitude
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}

/// Wrap an angle to [0, 2π).
pub fn wrap_phase(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
