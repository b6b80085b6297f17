use std::collections::HashMap;

use eframe::egui::Vec2;

use super::layout::LayoutFrame;

pub const LAYOUT_TWEEN_DURATION_SECS: f32 = 0.28;
/// Positional delta below which a layout change is applied without animating.
pub const LAYOUT_SNAP_THRESHOLD: f32 = 0.5;
pub const CAMERA_FOCUS_BASE_SECS: f32 = 0.42;
pub const CAMERA_DURATION_FACTOR: f32 = 0.7;

struct LayoutTween {
    from: HashMap<String, Vec2>,
    target: LayoutFrame,
    started_at: f64,
    duration_secs: f32,
}

struct CameraTween {
    from: Vec2,
    to: Vec2,
    started_at: f64,
    duration_secs: f32,
}

/// Two independent cancellable tween chains sharing the host's repaint loop:
/// a layout transition between frames and a camera focus glide. Both are
/// driven by caller-supplied wall-clock seconds, never a tick count. A tween
/// handle is an `Option`; starting a new tween of the same kind always takes
/// (nulls) the old one first, so two generations can never write in the same
/// frame.
pub struct AnimationScheduler {
    layout: Option<LayoutTween>,
    camera: Option<CameraTween>,
    rendered: LayoutFrame,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            layout: None,
            camera: None,
            rendered: LayoutFrame::default(),
        }
    }

    pub fn rendered(&self) -> &LayoutFrame {
        &self.rendered
    }

    pub fn is_layout_animating(&self) -> bool {
        self.layout.is_some()
    }

    pub fn is_camera_animating(&self) -> bool {
        self.camera.is_some()
    }

    pub fn cancel_layout(&mut self) {
        self.layout = None;
    }

    pub fn cancel_camera(&mut self) {
        self.camera = None;
    }

    /// Points the layout chain at a new target frame. Snaps (no interpolation
    /// frames) while a gesture is active, when either frame is empty, when a
    /// target node has no prior rendered position, or when no node moved more
    /// than the snap threshold; otherwise starts a fresh linear tween from
    /// the currently rendered positions.
    pub fn retarget_layout(&mut self, target: LayoutFrame, gesture_active: bool, now: f64) {
        self.cancel_layout();

        if gesture_active || target.nodes.is_empty() || self.rendered.nodes.is_empty() {
            self.rendered = target;
            return;
        }

        let from = self.rendered.position_by_id();
        let mut should_animate = false;
        let mut missing_prior = false;
        for node in &target.nodes {
            match from.get(&node.id) {
                None => {
                    missing_prior = true;
                    break;
                }
                Some(previous) => {
                    if (node.pos - *previous).abs().max_elem() > LAYOUT_SNAP_THRESHOLD {
                        should_animate = true;
                    }
                }
            }
        }

        if missing_prior || !should_animate {
            self.rendered = target;
            return;
        }

        self.layout = Some(LayoutTween {
            from,
            target,
            started_at: now,
            duration_secs: LAYOUT_TWEEN_DURATION_SECS,
        });
    }

    /// Advances the layout tween. Edges always come from the target frame;
    /// only node positions interpolate. Returns true while still animating.
    pub fn tick_layout(&mut self, now: f64) -> bool {
        let Some(tween) = &self.layout else {
            return false;
        };

        let elapsed = (now - tween.started_at).max(0.0) as f32;
        let t = (elapsed / tween.duration_secs).min(1.0);

        let mut nodes = tween.target.nodes.clone();
        for node in &mut nodes {
            if let Some(previous) = tween.from.get(&node.id) {
                node.pos = *previous + (node.pos - *previous) * t;
            }
        }
        self.rendered = LayoutFrame {
            nodes,
            edges: tween.target.edges.clone(),
        };

        if t >= 1.0 {
            let tween = self.layout.take();
            if let Some(tween) = tween {
                self.rendered = tween.target;
            }
            return false;
        }
        true
    }

    /// Starts a camera glide of the viewport translation. Scale is never
    /// animated. Cancels any in-flight camera tween first.
    pub fn start_camera(&mut self, from: Vec2, to: Vec2, duration_secs: f32, now: f64) {
        self.cancel_camera();

        if duration_secs <= 0.0 || (to - from).length() <= f32::EPSILON {
            self.camera = None;
            return;
        }

        self.camera = Some(CameraTween {
            from,
            to,
            started_at: now,
            duration_secs,
        });
    }

    /// Advances the camera tween, returning the translation to apply, if any.
    pub fn tick_camera(&mut self, now: f64) -> Option<Vec2> {
        let tween = self.camera.as_ref()?;
        let elapsed = (now - tween.started_at).max(0.0) as f32;
        let t = (elapsed / tween.duration_secs).min(1.0);
        let translation = tween.from + (tween.to - tween.from) * t;

        if t >= 1.0 {
            self.camera = None;
        }
        Some(translation)
    }

    pub fn camera_focus_duration_secs(motion_speed_factor: f32) -> f32 {
        CAMERA_FOCUS_BASE_SECS * motion_speed_factor * CAMERA_DURATION_FACTOR
    }
}
