//! Survivor ground truth
//!
//! Every session places the same seven survivors at fixed positions spread
//! over the quadrants of the search area. Vital signs and the remaining-time
//! estimate are rolled once at creation and stay fixed for the session.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Triage category of a survivor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivorStatus {
    Critical,
    Stable,
    Injured,
}

/// Vital signs, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    /// Beats per minute, 60..100
    pub heart_rate: u32,
    /// Degrees Celsius, 36..38
    pub body_temperature: f64,
    /// Breaths per minute, 12..20
    pub respiration_rate: u32,
}

impl VitalSigns {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            heart_rate: rng.gen_range(60..100),
            body_temperature: rng.gen_range(36.0..38.0),
            respiration_rate: rng.gen_range(12..20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survivor {
    pub id: String,
    pub name: String,
    pub status: SurvivorStatus,
    pub position: Vec2,
    pub vital_signs: VitalSigns,
    /// Estimated minutes until the survivor's condition turns fatal.
    /// Not counted down.
    pub time_remaining: u32,
}

/// Fixed placement table: (status, position)
const PLACEMENTS: [(SurvivorStatus, f64, f64); 7] = [
    (SurvivorStatus::Critical, 5.0, 5.0),
    (SurvivorStatus::Stable, 25.0, 5.0),
    (SurvivorStatus::Critical, 5.0, 25.0),
    (SurvivorStatus::Injured, 25.0, 25.0),
    (SurvivorStatus::Stable, 15.0, 25.0),
    (SurvivorStatus::Critical, 2.0, 15.0),
    (SurvivorStatus::Injured, 28.0, 15.0),
];

/// Generate the session's ground-truth survivor population
pub fn generate_survivors<R: Rng + ?Sized>(rng: &mut R) -> Vec<Survivor> {
    PLACEMENTS
        .iter()
        .enumerate()
        .map(|(i, &(status, x, y))| Survivor {
            id: format!("survivor-{}", i + 1),
            name: format!("Survivor {}", i + 1),
            status,
            position: Vec2::new(x, y),
            vital_signs: VitalSigns::roll(rng),
            time_remaining: rng.gen_range(30..80),
        })
        .collect()
}
