//! Keyframe clips and a minimal mixer that plays them on a [`ModelRig`] pose.
//!
//! [`ModelRig`]: crate::model::ModelRig

use crate::model::NodeTransform;
use glam::{Quat, Vec3};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub node: usize,
    pub times: Vec<f32>,
    pub values: ChannelValues,
    pub interpolation: Interpolation,
}

impl Channel {
    fn apply(&self, time: f32, pose: &mut [NodeTransform]) {
        let Some(target) = pose.get_mut(self.node) else {
            return;
        };
        let Some((i0, i1, f)) = key_span(&self.times, time) else {
            return;
        };
        let f = match self.interpolation {
            Interpolation::Linear => f,
            Interpolation::Step => 0.0,
        };
        match &self.values {
            ChannelValues::Translation(v) if i1 < v.len() => {
                target.translation = v[i0].lerp(v[i1], f);
            }
            ChannelValues::Rotation(v) if i1 < v.len() => {
                target.rotation = v[i0].slerp(v[i1], f).normalize();
            }
            ChannelValues::Scale(v) if i1 < v.len() => {
                target.scale = v[i0].lerp(v[i1], f);
            }
            _ => {}
        }
    }
}

/// Surrounding key indices and blend factor for `time`. Times before the
/// first key or after the last clamp to that key.
fn key_span(times: &[f32], time: f32) -> Option<(usize, usize, f32)> {
    let last = times.len().checked_sub(1)?;
    if time <= times[0] {
        return Some((0, 0, 0.0));
    }
    if time >= times[last] {
        return Some((last, last, 0.0));
    }
    let i1 = times.partition_point(|&t| t <= time);
    let i0 = i1 - 1;
    let span = times[i1] - times[i0];
    let f = if span > 0.0 { (time - times[i0]) / span } else { 0.0 };
    Some((i0, i1, f))
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            channels,
            duration,
        }
    }

    pub fn sample(&self, time: f32, pose: &mut [NodeTransform]) {
        for channel in &self.channels {
            channel.apply(time, pose);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Action {
    time: f32,
    playing: bool,
}

/// One looping action per clip. Stopped actions rewind and leave the rest
/// pose in place.
#[derive(Clone, Debug)]
pub struct Mixer {
    clips: Vec<AnimationClip>,
    actions: Vec<Action>,
    rest: Vec<NodeTransform>,
    pose: Vec<NodeTransform>,
}

impl Mixer {
    pub fn new(clips: Vec<AnimationClip>, rest: Vec<NodeTransform>) -> Self {
        let actions = vec![Action::default(); clips.len()];
        Self {
            clips,
            actions,
            pose: rest.clone(),
            rest,
        }
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn play_all(&mut self) {
        for action in &mut self.actions {
            action.playing = true;
        }
    }

    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            *action = Action::default();
        }
        self.pose.clone_from(&self.rest);
    }

    pub fn is_playing(&self) -> bool {
        self.actions.iter().any(|a| a.playing)
    }

    pub fn update(&mut self, dt: Duration) {
        if !self.is_playing() {
            return;
        }
        let dt = dt.as_secs_f32();
        self.pose.clone_from(&self.rest);
        for (clip, action) in self.clips.iter().zip(self.actions.iter_mut()) {
            if !action.playing {
                continue;
            }
            action.time += dt;
            if clip.duration > 0.0 {
                action.time %= clip.duration;
            }
            clip.sample(action.time, &mut self.pose);
        }
    }

    pub fn pose(&self) -> &[NodeTransform] {
        &self.pose
    }
}
