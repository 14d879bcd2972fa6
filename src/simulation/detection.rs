//! Survivor detection by proximity
//!
//! Detection is one-way: a survivor enters `sensor_data.survivors` the first
//! time the rover passes within the detection radius and is never removed.

use ahash::AHashSet;

use crate::core::config::SimulationConfig;
use crate::world::state::WorldState;
use crate::world::survivor::Survivor;

/// Survivors within range that have not been detected yet
///
/// Returns nothing while the rover is unreachable or recharging.
pub fn check_for_survivors(state: &WorldState, config: &SimulationConfig) -> Vec<Survivor> {
    if !state.communication_active || state.is_recharging {
        return Vec::new();
    }

    state
        .survivors
        .iter()
        .filter(|s| !state.is_detected(&s.id))
        .filter(|s| state.position.distance(&s.position) <= config.detection_radius)
        .cloned()
        .collect()
}

/// Append newly detected survivors, skipping any id already present.
/// Returns the survivors actually added.
pub fn merge_detected(state: &mut WorldState, detected: Vec<Survivor>) -> Vec<Survivor> {
    let mut known: AHashSet<String> = state
        .sensor_data
        .survivors
        .iter()
        .map(|s| s.id.clone())
        .collect();

    let added: Vec<Survivor> = detected
        .into_iter()
        .filter(|s| known.insert(s.id.clone()))
        .collect();

    state.sensor_data.survivors.extend(added.iter().cloned());
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fresh() -> (WorldState, SimulationConfig) {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        (WorldState::new(&config, &mut rng), config)
    }

    #[test]
    fn test_nothing_in_range_at_start() {
        let (state, config) = fresh();
        assert!(check_for_survivors(&state, &config).is_empty());
    }

    #[test]
    fn test_detects_within_radius() {
        let (mut state, config) = fresh();
        state.position = Vec2::new(8.0, 8.0);

        let found = check_for_survivors(&state, &config);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "survivor-1");
    }

    #[test]
    fn test_radius_is_inclusive() {
        let (mut state, config) = fresh();
        state.position = Vec2::new(10.0, 5.0);

        let found = check_for_survivors(&state, &config);
        assert_eq!(found.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), ["survivor-1"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (mut state, config) = fresh();
        state.position = Vec2::new(8.0, 8.0);

        let found = check_for_survivors(&state, &config);
        let added = merge_detected(&mut state, found.clone());
        assert_eq!(added.len(), 1);

        let added_again = merge_detected(&mut state, found);
        assert!(added_again.is_empty());
        assert_eq!(state.sensor_data.survivors.len(), 1);
        assert!(check_for_survivors(&state, &config).is_empty());
    }

    #[test]
    fn test_merge_dedups_within_batch() {
        let (mut state, _) = fresh();
        let s = state.survivors[2].clone();

        let added = merge_detected(&mut state, vec![s.clone(), s]);
        assert_eq!(added.len(), 1);
        assert_eq!(state.sensor_data.survivors.len(), 1);
    }

    #[test]
    fn test_blind_while_gated() {
        let (mut state, config) = fresh();
        state.position = Vec2::new(8.0, 8.0);

        state.is_recharging = true;
        assert!(check_for_survivors(&state, &config).is_empty());

        state.is_recharging = false;
        state.communication_active = false;
        assert!(check_for_survivors(&state, &config).is_empty());
    }
}
