use glam::Vec2;
use rand::Rng;

use crate::oscillator::WanderPhase;

/// Per-frame output of a node: where to draw it and how big.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translate: Vec2,
    pub scale: f32,
}

/// One dot of the trail.
///
/// While the chain is active the chain writes `position` directly each frame.
/// While idle the node wanders around the position it had when it was last
/// locked, driven by its own pair of phases.
#[derive(Debug, Clone)]
pub struct TrailNode {
    pub position: Vec2,
    lock_position: Vec2,
    phase: WanderPhase,
    scale: f32,
    amplitude: f32,
    limit: Option<f32>,
}

impl TrailNode {
    /// `size` is the dot diameter, `scale` its taper factor in (0, 1].
    ///
    /// With `clamp` set, the wander offset is limited to
    /// `size * 0.75 * scale` on each axis.
    pub fn new(size: f32, scale: f32, clamp: bool) -> Self {
        let half = size * 0.5;
        let amplitude = half - half * scale + 2.0;
        let limit = clamp.then_some(size * 0.75 * scale);

        Self {
            position: Vec2::ZERO,
            lock_position: Vec2::ZERO,
            phase: WanderPhase::default(),
            scale,
            amplitude,
            limit,
        }
    }

    /// Freeze the current position as the wander center and reseed the phases.
    pub fn lock<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.lock_position = self.position;
        self.phase.randomize(rng);
    }

    pub fn advance_phase(&mut self, step: f32) {
        self.phase.advance(step);
    }

    /// Produce this frame's transform.
    ///
    /// When `idle`, the phases advance by `step` and `position` is replaced
    /// by the wander position. Otherwise the assigned position is kept.
    pub fn render(&mut self, idle: bool, step: f32) -> NodeTransform {
        if idle {
            self.phase.advance(step);
            self.position = self.lock_position + self.wander_offset();
        }

        NodeTransform {
            translate: self.position,
            scale: self.scale,
        }
    }

    fn wander_offset(&self) -> Vec2 {
        let offset = self.phase.offset(self.amplitude);
        match self.limit {
            Some(limit) => offset.clamp(Vec2::splat(-limit), Vec2::splat(limit)),
            None => offset,
        }
    }

    pub fn lock_position(&self) -> Vec2 {
        self.lock_position
    }

    pub fn phase(&self) -> WanderPhase {
        self.phase
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn limit(&self) -> Option<f32> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_amplitude_and_limit() {
        let node = TrailNode::new(26.0, 0.5, true);
        // 13 - 6.5 + 2
        assert!((node.amplitude() - 8.5).abs() < 1e-5);
        assert!((node.limit().unwrap() - 9.75).abs() < 1e-5);

        let head = TrailNode::new(26.0, 1.0, false);
        assert!((head.amplitude() - 2.0).abs() < 1e-5);
        assert!(head.limit().is_none());
    }

    #[test]
    fn test_render_active_keeps_position() {
        let mut node = TrailNode::new(26.0, 0.8, true);
        node.position = Vec2::new(12.0, -4.0);
        let transform = node.render(false, 0.05);
        assert_eq!(transform.translate, Vec2::new(12.0, -4.0));
        assert!((transform.scale - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lock_snapshot_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut node = TrailNode::new(26.0, 0.5, true);
        node.position = Vec2::new(40.0, 50.0);

        node.lock(&mut rng);
        let first_lock = node.lock_position();
        let first_phase = node.phase();

        node.lock(&mut rng);
        assert_eq!(node.lock_position(), first_lock);
        // Phases are reseeded on every lock.
        assert_ne!(node.phase(), first_phase);
    }

    #[test]
    fn test_idle_wander_stays_near_lock() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut node = TrailNode::new(26.0, 0.2, false);
        node.position = Vec2::new(100.0, 100.0);
        node.lock(&mut rng);

        let amplitude = node.amplitude();
        for _ in 0..1000 {
            let t = node.render(true, 0.05);
            let d = t.translate - Vec2::new(100.0, 100.0);
            assert!(d.x.abs() <= amplitude + 1e-4);
            assert!(d.y.abs() <= amplitude + 1e-4);
        }
    }

    #[test]
    fn test_idle_wander_clamped() {
        let mut rng = StdRng::seed_from_u64(5);
        // amplitude 13 - 1.3 + 2 = 13.7, limit 26 * 0.75 * 0.1 = 1.95
        let mut node = TrailNode::new(26.0, 0.1, true);
        node.lock(&mut rng);
        let limit = node.limit().unwrap();

        let mut reached_limit = false;
        for _ in 0..500 {
            let t = node.render(true, 0.05);
            assert!(t.translate.x.abs() <= limit + 1e-5);
            assert!(t.translate.y.abs() <= limit + 1e-5);
            if (t.translate.x.abs() - limit).abs() < 1e-5 {
                reached_limit = true;
            }
        }
        assert!(reached_limit);
    }

    #[test]
    fn test_idle_render_advances_phase() {
        let mut node = TrailNode::new(26.0, 0.5, true);
        let before = node.phase();
        node.render(true, 0.05);
        assert!((node.phase().x() - before.x() - 0.05).abs() < 1e-6);
        assert!((node.phase().y() - before.y() - 0.05).abs() < 1e-6);
    }
}
