use nalgebra::Vector2;

use crate::satellite::SatelliteKind;

/// One draw request for a satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SatelliteKind,
    pub pos: Vector2<f64>, // m
    pub angle: f64,        // rad, facing heading
    pub thrust: bool,      // draw the engine flame (ship only)
    pub defunct: bool,
}

/// Output sink for the draw pass. The simulator never reads back from it.
pub trait Canvas {
    fn draw_earth(&mut self, pos: Vector2<f64>, rotation: f64);
    fn draw_satellite(&mut self, sprite: &Sprite);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Earth { pos: Vector2<f64>, rotation: f64 },
    Satellite(Sprite),
}

/// Canvas that records every request, for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Satellite(s) => Some(s),
            DrawCommand::Earth { .. } => None,
        })
    }

    pub fn count(&self, kind: SatelliteKind) -> usize {
        self.sprites().filter(|s| s.kind == kind).count()
    }
}

impl Canvas for DrawList {
    fn draw_earth(&mut self, pos: Vector2<f64>, rotation: f64) {
        self.commands.push(DrawCommand::Earth { pos, rotation });
    }

    fn draw_satellite(&mut self, sprite: &Sprite) {
        self.commands.push(DrawCommand::Satellite(*sprite));
    }
}
