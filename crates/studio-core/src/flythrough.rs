//! Hero flythrough state: tween, camera rig, discovery points and the
//! closing reveal, advanced once per animation frame.

use crate::error::ConfigError;
use crate::fade::{slogan_glow, text_glow, DiscoveryPoint, TerminalReveal};
use crate::path::CameraPath;
use crate::rig::CameraRig;
use crate::timing::TimingConfig;
use crate::tween::{DriverEvent, ProgressDriver};
use glam::{Quat, Vec3};

/// Snapshot handed to the renderer after [`Flythrough::frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub progress: f32,
    pub camera_position: Vec3,
    pub camera_orientation: Quat,
    pub terminal: TerminalReveal,
    pub text_glow: f32,
    pub event: DriverEvent,
}

#[derive(Clone, Debug)]
pub struct Flythrough {
    config: TimingConfig,
    path: CameraPath,
    driver: ProgressDriver,
    rig: CameraRig,
    points: Vec<DiscoveryPoint>,
    slogan: Vec<DiscoveryPoint>,
    terminal: TerminalReveal,
}

impl Flythrough {
    pub fn new(config: TimingConfig, path: CameraPath) -> Result<Self, ConfigError> {
        config.validate()?;
        let driver = ProgressDriver::from_config(&config);
        let mut rig = CameraRig::default();
        rig.position = path.point_at(driver.progress());
        Ok(Self {
            config,
            path,
            driver,
            rig,
            points: Vec::new(),
            slogan: Vec::new(),
            terminal: TerminalReveal::at(0.0),
        })
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    pub fn path(&self) -> &CameraPath {
        &self.path
    }

    pub fn add_text(&mut self, position: Vec3) -> usize {
        self.points.push(DiscoveryPoint::text(position));
        self.points.len() - 1
    }

    pub fn add_image(&mut self, position: Vec3, section_index: usize) -> usize {
        self.points
            .push(DiscoveryPoint::image(position, section_index, &self.config));
        self.points.len() - 1
    }

    pub fn add_slogan_part(&mut self, base_glow: f32) -> usize {
        self.slogan.push(DiscoveryPoint::slogan_part(base_glow));
        self.slogan.len() - 1
    }

    pub fn points(&self) -> &[DiscoveryPoint] {
        &self.points
    }

    pub fn slogan(&self) -> &[DiscoveryPoint] {
        &self.slogan
    }

    pub fn driver(&self) -> &ProgressDriver {
        &self.driver
    }

    pub fn start(&mut self, now_ms: f64) {
        self.driver.start(now_ms);
        self.reset_cycle();
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Visibility observer hook: leaving the viewport stops the tween,
    /// coming back starts a fresh cycle.
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) {
        if visible {
            if self.driver.ensure_running(now_ms) {
                self.reset_cycle();
            }
        } else {
            self.driver.stop();
        }
    }

    pub fn frame(&mut self, now_ms: f64, elapsed_sec: f32) -> FrameState {
        let event = self.driver.update(now_ms);
        if let DriverEvent::Restarted { generation } = event {
            log::info!("[hero] flythrough cycle {} restarted", generation);
            self.reset_cycle();
        }
        let progress = self.driver.progress();
        self.rig.follow(&self.path, progress);

        let camera = self.rig.position;
        let cycle_start = self.driver.cycle_start_ms();
        for point in &mut self.points {
            point.step(camera, now_ms, cycle_start, &self.config);
        }

        self.terminal = TerminalReveal::at(progress);
        for part in &mut self.slogan {
            part.set_opacity(self.terminal.opacity);
        }

        FrameState {
            progress,
            camera_position: camera,
            camera_orientation: self.rig.orientation,
            terminal: self.terminal,
            text_glow: text_glow(elapsed_sec),
            event,
        }
    }

    pub fn slogan_glow(&self, index: usize, elapsed_sec: f32) -> f32 {
        match self.slogan.get(index) {
            Some(DiscoveryPoint::SloganPart { base_glow, .. }) => slogan_glow(*base_glow, elapsed_sec),
            _ => 0.0,
        }
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    fn reset_cycle(&mut self) {
        for point in &mut self.points {
            point.reset_for_cycle();
        }
    }
}
