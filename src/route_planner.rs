//! Custom route ordering, time estimate and share codes
//!
//! Ordering is a coarse heuristic, not a shortest path: animals are visited
//! in ascending `x + y` of their zone's map position, which roughly walks
//! outward from the entrance in the top-left corner of the park map.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use rustc_hash::FxHashMap;

use crate::models::{ids_match, Animal, Zone};

/// Walking time between two consecutive zones
pub const MINUTES_PER_ZONE: u32 = 15;
/// Time spent at each animal
pub const MINUTES_PER_ANIMAL: u32 = 5;

const SHARE_CODE_DELIMITER: char = ',';

// ============================================================================
// Ordering
// ============================================================================

/// Sort animals by the position rank of their zone, then by Chinese name.
/// Animals whose zone has no known position go last.
pub fn order_by_position(mut animals: Vec<Animal>, zones: &[Zone]) -> Vec<Animal> {
    if animals.len() <= 1 {
        return animals;
    }

    let ranks: FxHashMap<String, f64> = zones
        .iter()
        .map(|z| (z.id.to_lowercase(), z.position.manhattan_rank()))
        .collect();
    let rank_of = |animal: &Animal| {
        ranks
            .get(&animal.zone_id.to_lowercase())
            .copied()
            .unwrap_or(f64::MAX)
    };

    animals.sort_by(|a, b| {
        rank_of(a)
            .total_cmp(&rank_of(b))
            .then_with(|| a.chinese_name.cmp(&b.chinese_name))
    });
    animals
}

/// Zone ids in first-visit order, de-duplicated case-insensitively
pub fn distinct_zone_ids(ordered: &[Animal]) -> Vec<String> {
    let mut zone_ids: Vec<String> = Vec::new();
    for animal in ordered {
        if !zone_ids.iter().any(|z| ids_match(z, &animal.zone_id)) {
            zone_ids.push(animal.zone_id.clone());
        }
    }
    zone_ids
}

pub fn estimate_minutes(zone_count: usize, animal_count: usize) -> u32 {
    let transitions = u32::try_from(zone_count.saturating_sub(1)).unwrap_or(u32::MAX);
    let animals = u32::try_from(animal_count).unwrap_or(u32::MAX);
    transitions
        .saturating_mul(MINUTES_PER_ZONE)
        .saturating_add(animals.saturating_mul(MINUTES_PER_ANIMAL))
}

// ============================================================================
// Share codes
// ============================================================================

/// Encode an ordered id list as a URL-safe token
pub fn encode_share_code<S: AsRef<str>>(ids: &[S]) -> String {
    let joined = ids
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&SHARE_CODE_DELIMITER.to_string());
    URL_SAFE_NO_PAD.encode(joined.as_bytes())
}

/// Decode a share token back into ids; any malformed token yields an empty list
pub fn decode_share_code(code: &str) -> Vec<String> {
    let code = code.trim();
    if code.is_empty() {
        return Vec::new();
    }

    let bytes = match URL_SAFE_NO_PAD
        .decode(code.trim_end_matches('='))
        .or_else(|_| URL_SAFE.decode(code))
    {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Invalid share code {:?}: {}", code, e);
            return Vec::new();
        }
    };

    let Ok(text) = String::from_utf8(bytes) else {
        tracing::warn!("Share code {:?} is not valid UTF-8", code);
        return Vec::new();
    };

    text.split(SHARE_CODE_DELIMITER)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
