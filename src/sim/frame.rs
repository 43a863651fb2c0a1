//! Renderer-neutral draw list
//!
//! `Simulation::draw` appends primitives in canvas pixels. The external
//! renderer (canvas 2D, WebGPU, terminal) consumes the list and must not feed
//! anything back into the simulation.

use glam::Vec2;
use serde::Serialize;

/// What a primitive represents, for the renderer's palette lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Paint {
    Track,
    Player,
    Hazard,
    /// Hazard that is visible but not yet lethal
    Telegraph,
    Reward,
    Hud,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
    Ring { center: Vec2, radius: f32, thickness: f32 },
    Text { pos: Vec2, text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCommand {
    pub shape: Shape,
    pub paint: Paint,
}

/// One frame's worth of draw commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(64),
        }
    }

    /// Start a new frame, keeping the allocation
    pub fn begin(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
        self.push(Shape::Circle { center, radius }, paint);
    }

    pub fn rect(&mut self, min: Vec2, max: Vec2, paint: Paint) {
        self.push(Shape::Rect { min, max }, paint);
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, thickness: f32, paint: Paint) {
        self.push(
            Shape::Ring {
                center,
                radius,
                thickness,
            },
            paint,
        );
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>) {
        self.push(
            Shape::Text {
                pos,
                text: text.into(),
            },
            Paint::Hud,
        );
    }

    fn push(&mut self, shape: Shape, paint: Paint) {
        self.commands.push(DrawCommand { shape, paint });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn count(&self, paint: Paint) -> usize {
        self.commands.iter().filter(|c| c.paint == paint).count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
