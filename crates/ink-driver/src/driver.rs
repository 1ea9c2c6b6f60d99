//! Frame driver: a background thread that owns a trail and advances it
//! once per frame, fed by pointer events from any thread.
//!
//! The chain itself is single-threaded. Everything that touches it runs on
//! the frame thread; other threads talk to it through a [`TrailHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{bounded, tick, unbounded, Receiver, Sender, TryRecvError};
use crossbeam::select;
use ink_core::{TrailChain, TrailConfig, TrailRenderer, Vec2};

use crate::config::DriverConfig;
use crate::error::DriverError;

/// Messages from handles to the frame thread.
#[derive(Debug)]
enum DriverEvent {
    PointerMoved { x: f32, y: f32 },
    Enable,
    Disable,
    Toggle,
    Snapshot(Sender<ChainSnapshot>),
    Shutdown,
}

/// Point-in-time copy of the chain state, taken on the frame thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSnapshot {
    pub positions: Vec<Vec2>,
    pub target: Vec2,
    pub idle: bool,
    pub enabled: bool,
}

/// Cloneable, `Send` handle for feeding a running trail.
#[derive(Debug, Clone)]
pub struct TrailHandle {
    tx: Sender<DriverEvent>,
}

impl TrailHandle {
    /// Report a pointer position in client coordinates.
    pub fn pointer_moved(&self, x: f32, y: f32) -> Result<(), DriverError> {
        self.send(DriverEvent::PointerMoved { x, y })
    }

    pub fn enable(&self) -> Result<(), DriverError> {
        self.send(DriverEvent::Enable)
    }

    pub fn disable(&self) -> Result<(), DriverError> {
        self.send(DriverEvent::Disable)
    }

    pub fn toggle(&self) -> Result<(), DriverError> {
        self.send(DriverEvent::Toggle)
    }

    /// Ask the frame thread for a copy of the chain state.
    ///
    /// Events are handled in order, so the snapshot reflects every event
    /// this handle sent before it.
    pub fn snapshot(&self) -> Result<ChainSnapshot, DriverError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(DriverEvent::Snapshot(reply_tx))?;
        reply_rx.recv().map_err(|_| DriverError::Stopped)
    }

    fn send(&self, event: DriverEvent) -> Result<(), DriverError> {
        self.tx.send(event).map_err(|_| DriverError::Stopped)
    }
}

/// A running trail.
///
/// Dropping the driver stops the frame thread.
pub struct TrailDriver {
    handle: TrailHandle,
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TrailDriver {
    /// Build the chain and start advancing it at `driver_config.frame_rate`.
    pub fn spawn<R>(
        config: &TrailConfig,
        driver_config: &DriverConfig,
        renderer: R,
    ) -> Result<Self, DriverError>
    where
        R: TrailRenderer + Send + 'static,
    {
        driver_config.validate()?;
        let chain = TrailChain::attach(config, renderer)?;

        let (tx, rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let interval = driver_config.frame_interval();

        let thread = thread::Builder::new()
            .name(driver_config.thread_name.clone())
            .spawn(move || {
                let frames = tick(interval);
                run_frame_loop(chain, rx, frames);
                running_clone.store(false, Ordering::Relaxed);
            })
            .map_err(DriverError::Spawn)?;

        log::info!(
            "trail driver started at {} fps on thread {:?}",
            driver_config.frame_rate,
            driver_config.thread_name
        );

        Ok(Self {
            handle: TrailHandle { tx },
            running,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> TrailHandle {
        self.handle.clone()
    }

    /// Stop the frame thread and wait for it to exit.
    ///
    /// The chain is detached and the renderer dropped on the way out; no
    /// renderer call happens after this returns. Repeated calls are no-ops.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.handle.tx.send(DriverEvent::Shutdown);
            if thread.join().is_err() {
                log::error!("trail frame thread panicked");
            }
            self.running.store(false, Ordering::Relaxed);
            log::info!("trail driver stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for TrailDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_frame_loop<R: TrailRenderer>(
    mut chain: TrailChain<R>,
    events: Receiver<DriverEvent>,
    frames: Receiver<Instant>,
) {
    let start = Instant::now();
    let now_ms = || start.elapsed().as_secs_f64() * 1000.0;

    // Draw once right away instead of waiting a full interval.
    chain.tick(now_ms());

    loop {
        let keep_running = select! {
            recv(events) -> event => match event {
                Ok(DriverEvent::Shutdown) | Err(_) => false,
                Ok(event) => {
                    handle_event(&mut chain, event, now_ms());
                    true
                }
            },
            recv(frames) -> _ => {
                // Catch up on input so the frame sees the latest pointer.
                let open = drain_events(&mut chain, &events, now_ms());
                if open {
                    chain.tick(now_ms());
                }
                open
            },
        };
        if !keep_running {
            break;
        }
    }

    chain.detach();
}

/// Apply everything queued. Returns `false` once shutdown is seen.
fn drain_events<R: TrailRenderer>(
    chain: &mut TrailChain<R>,
    events: &Receiver<DriverEvent>,
    now_ms: f64,
) -> bool {
    loop {
        match events.try_recv() {
            Ok(DriverEvent::Shutdown) | Err(TryRecvError::Disconnected) => return false,
            Ok(event) => handle_event(chain, event, now_ms),
            Err(TryRecvError::Empty) => return true,
        }
    }
}

fn handle_event<R: TrailRenderer>(chain: &mut TrailChain<R>, event: DriverEvent, now_ms: f64) {
    match event {
        DriverEvent::PointerMoved { x, y } => chain.pointer_moved(x, y, now_ms),
        DriverEvent::Enable => chain.enable(),
        DriverEvent::Disable => chain.disable(),
        DriverEvent::Toggle => chain.toggle(),
        DriverEvent::Snapshot(reply) => {
            let _ = reply.send(ChainSnapshot {
                positions: chain.positions(),
                target: chain.target(),
                idle: chain.is_idle(),
                enabled: chain.is_enabled(),
            });
        }
        DriverEvent::Shutdown => {}
    }
}
