//! Circular obstacles and collision checks
//!
//! The obstacle field is fixed when a session starts. A point collides with
//! an obstacle when it lies strictly inside the obstacle's radius; the rim
//! itself is passable.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// A circular obstacle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns true if `point` is strictly inside this obstacle
    pub fn contains(&self, point: Vec2) -> bool {
        self.center().distance(&point) < self.radius
    }

    /// The three-obstacle field the rover ships with
    pub fn default_field() -> Vec<Obstacle> {
        vec![
            Obstacle::new(15.0, 15.0, 2.0),
            Obstacle::new(5.0, 20.0, 3.0),
            Obstacle::new(25.0, 5.0, 4.0),
        ]
    }
}

/// Returns true if `point` is clear of every obstacle
pub fn is_position_valid(obstacles: &[Obstacle], point: Vec2) -> bool {
    !obstacles.iter().any(|o| o.contains(point))
}
