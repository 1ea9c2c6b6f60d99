//! Trail controller: owns the dots, the pointer target and the
//! active/idle state machine, and runs the per-frame propagation.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{MotionTiming, TrailConfig};
use crate::error::ConfigError;
use crate::idle::IdleTimer;
use crate::node::TrailNode;
use crate::render::TrailRenderer;

/// Where the trail sits before the first pointer event: just off screen.
pub const INITIAL_TARGET: Vec2 = Vec2::new(-100.0, -100.0);

/// A chain of dots lagging behind a pointer.
///
/// Drive it with [`pointer_moved`](Self::pointer_moved) on input and
/// [`tick`](Self::tick) once per display frame. Both take a monotonic
/// timestamp in milliseconds. Everything runs on the caller's thread.
pub struct TrailChain<R: TrailRenderer> {
    nodes: Vec<TrailNode>,
    renderer: R,
    target: Vec2,
    half_size: f32,
    idle: bool,
    idle_timer: IdleTimer,
    sine_node_count: usize,
    damping: f32,
    phase_speed: f32,
    motion: MotionTiming,
    enabled: bool,
    last_frame_ms: Option<f64>,
    attached: bool,
    rng: StdRng,
}

impl<R: TrailRenderer> TrailChain<R> {
    /// Build the chain and push the initial visibility state to `renderer`.
    ///
    /// On a touch device the chain comes back already detached: it never
    /// renders and ignores input.
    pub fn attach(config: &TrailConfig, renderer: R) -> Result<Self, ConfigError> {
        Self::attach_with_rng(config, renderer, StdRng::from_entropy())
    }

    /// Like [`attach`](Self::attach) with a caller-supplied RNG for the
    /// wander phases.
    pub fn attach_with_rng(
        config: &TrailConfig,
        renderer: R,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let nodes = (0..config.dot_count)
            .map(|i| TrailNode::new(config.dot_size, config.scale_for(i), config.clamp_oscillation))
            .collect();

        let mut chain = Self {
            nodes,
            renderer,
            target: INITIAL_TARGET,
            half_size: config.dot_size * 0.5,
            idle: false,
            idle_timer: IdleTimer::new(config.idle_timeout_ms),
            sine_node_count: config.sine_dot_count(),
            damping: config.damping,
            phase_speed: config.phase_speed,
            motion: config.motion,
            enabled: config.enabled,
            last_frame_ms: None,
            attached: !config.touch_device,
            rng,
        };
        if config.touch_device {
            log::info!("touch device, trail not attached");
            return Ok(chain);
        }
        chain.update_status();

        log::info!(
            "trail attached: {} dots of {}px, {} sine dots, enabled={}",
            chain.nodes.len(),
            config.dot_size,
            chain.sine_node_count,
            chain.enabled
        );
        Ok(chain)
    }

    /// Record a pointer position in client coordinates.
    ///
    /// The trail is centered on the pointer, so half the dot size is
    /// subtracted. Leaves idle mode immediately and restarts the
    /// inactivity timer.
    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.target = Vec2::new(client_x - self.half_size, client_y - self.half_size);
        self.idle_timer.restart(now_ms);
        if self.idle {
            log::debug!("trail active");
            self.idle = false;
        }
    }

    /// Run one animation frame.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.attached {
            return;
        }
        if self.idle_timer.poll(now_ms) {
            self.go_idle();
        }

        let factor = match self.last_frame_ms {
            Some(last) => self.motion.frame_factor(now_ms - last),
            None => 1.0,
        };
        self.position_cursor(factor);
        self.last_frame_ms = Some(now_ms);
    }

    /// Switch to idle: every node freezes its wander center where it is.
    pub fn go_idle(&mut self) {
        if !self.attached {
            return;
        }
        self.idle = true;
        for node in &mut self.nodes {
            node.lock(&mut self.rng);
        }
        log::debug!("trail idle, {} nodes locked", self.nodes.len());
    }

    /// Push the target through the chain.
    ///
    /// Each node takes the propagation cursor as its position, then the
    /// cursor moves `damping` of the way from that node toward its
    /// successor. Idle nodes past the sine set wander on their own and
    /// leave the cursor where it is. `frame_factor` is the number of
    /// reference frames this step covers.
    pub fn position_cursor(&mut self, frame_factor: f32) {
        if !self.attached {
            return;
        }
        // A follower keeps `damping` of its distance to the head per
        // reference frame, so k frames keep damping^k.
        let gain = if frame_factor == 1.0 {
            self.damping
        } else {
            self.damping.powf(frame_factor)
        };
        let step = self.phase_speed * frame_factor;

        let mut cursor = self.target;
        for i in 0..self.nodes.len() {
            let follows = !self.idle || self.is_sine_node(i);

            let node = &mut self.nodes[i];
            node.position = cursor;
            if self.idle && follows {
                node.advance_phase(step);
            }
            let transform = node.render(self.idle && !follows, step);
            self.renderer
                .apply_transform(i, transform.translate.x, transform.translate.y, transform.scale);

            if follows {
                let current = self.nodes[i].position;
                let next = self.nodes[self.successor_of(i)].position;
                cursor += (next - current) * gain;
            }
        }
    }

    /// The node a given node lags toward. The last node wraps to the head.
    pub fn successor_of(&self, index: usize) -> usize {
        (index + 1) % self.nodes.len()
    }

    /// Whether `index` keeps following the pointer while idle.
    pub fn is_sine_node(&self, index: usize) -> bool {
        index < self.sine_node_count
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.update_status();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.update_status();
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.update_status();
    }

    fn update_status(&mut self) {
        if !self.attached {
            return;
        }
        log::debug!("trail enabled={}", self.enabled);
        self.renderer.set_visible(self.enabled);
        self.renderer.set_native_cursor_hidden(self.enabled);
    }

    /// Tear down: cancel the idle timer and stop reacting to frames and
    /// input. Calling it again does nothing.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.idle_timer.cancel();
        log::info!("trail detached");
    }

    pub fn nodes(&self) -> &[TrailNode] {
        &self.nodes
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn sine_node_count(&self) -> usize {
        self.sine_node_count
    }

    pub fn idle_timer(&self) -> &IdleTimer {
        &self.idle_timer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NullRenderer, RecordingRenderer, RenderCommand};

    fn chain_of(count: usize) -> TrailChain<RecordingRenderer> {
        let config = TrailConfig { dot_count: count, dot_size: 26.0, ..Default::default() };
        TrailChain::attach_with_rng(&config, RecordingRenderer::new(), StdRng::seed_from_u64(42))
            .unwrap()
    }

    #[test]
    fn test_attach_rejects_empty_chain() {
        let config = TrailConfig { dot_count: 0, ..Default::default() };
        assert!(TrailChain::attach(&config, NullRenderer).is_err());
    }

    #[test]
    fn test_attach_pushes_status() {
        let chain = chain_of(3);
        assert_eq!(
            chain.renderer().commands,
            vec![RenderCommand::Visible(false), RenderCommand::NativeCursorHidden(false)]
        );
    }

    #[test]
    fn test_successor_wraps() {
        let chain = chain_of(4);
        assert_eq!(chain.successor_of(0), 1);
        assert_eq!(chain.successor_of(3), 0);

        let single = chain_of(1);
        assert_eq!(single.successor_of(0), 0);
    }

    #[test]
    fn test_pointer_centers_on_dot() {
        let mut chain = chain_of(2);
        chain.pointer_moved(113.0, 13.0, 0.0);
        assert_eq!(chain.target(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_initial_target_off_screen() {
        let mut chain = chain_of(3);
        chain.tick(0.0);
        assert_eq!(chain.nodes()[0].position, INITIAL_TARGET);
    }

    #[test]
    fn test_one_transform_per_node_per_frame() {
        let mut chain = chain_of(5);
        chain.renderer_mut().clear();
        chain.tick(0.0);
        chain.tick(16.0);
        let nodes: Vec<usize> = chain.renderer().transforms().map(|t| t.0).collect();
        assert_eq!(nodes, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_never_idle_without_pointer() {
        let mut chain = chain_of(3);
        for frame in 0..100 {
            chain.tick(frame as f64 * 16.0);
        }
        assert!(!chain.is_idle());
    }

    #[test]
    fn test_detach_is_idempotent_and_final() {
        let mut chain = chain_of(3);
        chain.pointer_moved(10.0, 10.0, 0.0);
        chain.detach();
        chain.detach();
        assert!(!chain.is_attached());
        assert!(!chain.idle_timer().is_armed());

        chain.renderer_mut().clear();
        chain.tick(1000.0);
        chain.pointer_moved(50.0, 50.0, 1000.0);
        chain.enable();
        assert!(chain.renderer().commands.is_empty());
        assert!(!chain.is_idle());
    }

    #[test]
    fn test_manual_steps_after_detach_render_nothing() {
        let mut chain = chain_of(4);
        chain.pointer_moved(50.0, 50.0, 0.0);
        chain.tick(0.0);
        chain.detach();
        chain.renderer_mut().clear();

        chain.position_cursor(1.0);
        chain.go_idle();
        assert!(chain.renderer().commands.is_empty());
        assert!(!chain.is_idle());
    }

    #[test]
    fn test_touch_device_never_attaches() {
        let config = TrailConfig {
            dot_count: 3,
            enabled: true,
            touch_device: true,
            ..Default::default()
        };
        let mut chain =
            TrailChain::attach_with_rng(&config, RecordingRenderer::new(), StdRng::seed_from_u64(1))
                .unwrap();
        assert!(!chain.is_attached());

        chain.pointer_moved(100.0, 100.0, 0.0);
        chain.tick(0.0);
        chain.tick(1000.0);
        chain.toggle();
        assert!(chain.renderer().commands.is_empty());
        assert_eq!(chain.target(), INITIAL_TARGET);
    }

    #[test]
    fn test_time_scaled_half_frame_moves_less() {
        let base = TrailConfig { dot_count: 3, ..Default::default() };
        let scaled = TrailConfig {
            motion: MotionTiming::TimeScaled { reference_fps: 60.0 },
            ..base.clone()
        };

        let run = |config: &TrailConfig, second_frame_ms: f64| {
            let mut chain =
                TrailChain::attach_with_rng(config, NullRenderer, StdRng::seed_from_u64(0))
                    .unwrap();
            chain.pointer_moved(13.0, 13.0, 0.0);
            chain.tick(0.0);
            chain.pointer_moved(113.0, 13.0, 1.0);
            chain.tick(second_frame_ms);
            chain.positions()[1].x
        };

        let locked = run(&base, 1000.0 / 60.0);
        let at_reference = run(&scaled, 1000.0 / 60.0);
        let at_double_rate = run(&scaled, 1000.0 / 120.0);
        assert!((locked - at_reference).abs() < 1e-3);
        // Shorter frames lag further behind the head.
        assert!(at_double_rate < at_reference);
    }
}
