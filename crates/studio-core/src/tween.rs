//! Progress tween that drives the flythrough camera.
//!
//! The driver eases `progress` from [`START_PROGRESS`] to 1 over the
//! configured duration, holds for a pause, then starts a new cycle. All
//! timing is expressed in wall-clock milliseconds supplied by the caller so
//! the driver stays deterministic under test.

use crate::constants::{RESTART_PAUSE_MS, START_PROGRESS};
use crate::easing::sinusoidal_in_out;
use crate::timing::TimingConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverPhase {
    Idle,
    Running { start_ms: f64 },
    Pausing { until_ms: f64 },
    Stopped,
}

/// What happened during a call to [`ProgressDriver::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverEvent {
    None,
    Completed,
    Restarted { generation: u64 },
}

#[derive(Clone, Debug)]
pub struct ProgressDriver {
    duration_ms: f64,
    pause_ms: f64,
    progress: f32,
    phase: DriverPhase,
    generation: u64,
    cycle_start_ms: f64,
}

impl ProgressDriver {
    pub fn new(duration_ms: f64, pause_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(1.0),
            pause_ms: pause_ms.max(0.0),
            progress: START_PROGRESS,
            phase: DriverPhase::Idle,
            generation: 0,
            cycle_start_ms: 0.0,
        }
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.animation_duration_ms, RESTART_PAUSE_MS)
    }

    /// Begin a fresh cycle, cancelling whatever cycle or pending restart
    /// was in flight. Returns the new generation.
    pub fn start(&mut self, now_ms: f64) -> u64 {
        self.generation += 1;
        self.progress = START_PROGRESS;
        self.cycle_start_ms = now_ms;
        self.phase = DriverPhase::Running { start_ms: now_ms };
        log::debug!("[tween] cycle {} started", self.generation);
        self.generation
    }

    /// Halt the tween. A pending restart is dropped along with it.
    pub fn stop(&mut self) {
        if matches!(
            self.phase,
            DriverPhase::Running { .. } | DriverPhase::Pausing { .. }
        ) {
            self.generation += 1;
            self.phase = DriverPhase::Stopped;
            log::debug!("[tween] stopped at progress {:.3}", self.progress);
        }
    }

    /// Start a new cycle only if nothing is currently running or pausing.
    pub fn ensure_running(&mut self, now_ms: f64) -> bool {
        match self.phase {
            DriverPhase::Idle | DriverPhase::Stopped => {
                self.start(now_ms);
                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, now_ms: f64) -> DriverEvent {
        match self.phase {
            DriverPhase::Running { start_ms } => {
                let t = ((now_ms - start_ms) / self.duration_ms) as f32;
                if t >= 1.0 {
                    self.progress = 1.0;
                    self.phase = DriverPhase::Pausing {
                        until_ms: now_ms + self.pause_ms,
                    };
                    DriverEvent::Completed
                } else {
                    let eased = sinusoidal_in_out(t.max(0.0));
                    self.progress = START_PROGRESS + (1.0 - START_PROGRESS) * eased;
                    DriverEvent::None
                }
            }
            DriverPhase::Pausing { until_ms } if now_ms >= until_ms => {
                let generation = self.start(now_ms);
                DriverEvent::Restarted { generation }
            }
            _ => DriverEvent::None,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wall-clock start of the current cycle; image delays count from here.
    pub fn cycle_start_ms(&self) -> f64 {
        self.cycle_start_ms
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            DriverPhase::Running { .. } | DriverPhase::Pausing { .. }
        )
    }
}
