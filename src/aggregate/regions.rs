use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use super::{capitalize, region_id};
use crate::storage::{Document, Part, Position, Region};

/// Size of a freshly discovered region.
pub const NEW_REGION_SIZE: f64 = 40.0;
/// Intensity of a freshly discovered region.
pub const NEW_REGION_INTENSITY: f64 = 0.3;
/// Size gained per unit of part strength.
pub const SIZE_PER_STRENGTH: f64 = 15.0;
/// Intensity gained per mention.
pub const INTENSITY_STEP: f64 = 0.1;

/// Canvas envelope for randomly placed regions.
pub const CANVAS_X: (f64, f64) = (150.0, 850.0);
pub const CANVAS_Y: (f64, f64) = (150.0, 650.0);

/// Apply every part of an analysis to the document's regions, in list order.
///
/// New parts create a region when none exists at their id; every part that resolves to
/// a region then grows it. Parts sharing an id apply once each.
pub fn apply_parts<R: Rng + ?Sized>(
    doc: &mut Document,
    parts: &[Part],
    now: DateTime<Utc>,
    rng: &mut R,
) {
    for part in parts {
        let id = region_id(&part.id);

        if part.is_new && !doc.regions.contains_key(&id) {
            let region = new_region(&id, part, now, rng);
            info!(region = %id, name = %region.name, "Creating new region");
            doc.regions.insert(id.clone(), region);
        }

        match doc.regions.get_mut(&id) {
            Some(region) => grow(region, part.strength),
            None => debug!(part = %part.id, "Part has no region, skipping"),
        }
    }
}

/// Grow a region by one mention of the given strength.
pub fn grow(region: &mut Region, strength: f64) {
    region.size += strength * SIZE_PER_STRENGTH;
    region.intensity = (region.intensity + INTENSITY_STEP).clamp(0.0, 1.0);
}

fn new_region<R: Rng + ?Sized>(id: &str, part: &Part, now: DateTime<Utc>, rng: &mut R) -> Region {
    let color = part
        .suggested_color
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| random_color(rng));
    let Position { x, y } = part
        .suggested_position
        .unwrap_or_else(|| random_position(rng));

    Region {
        id: id.to_string(),
        name: capitalize(&part.id),
        color,
        size: NEW_REGION_SIZE,
        x,
        y,
        intensity: NEW_REGION_INTENSITY,
        created_at: Some(now),
    }
}

/// A random `#rrggbb` colour.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06x}", rng.gen_range(0..0x0100_0000u32))
}

/// A random point inside the canvas envelope.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position {
        x: rng.gen_range(CANVAS_X.0..=CANVAS_X.1),
        y: rng.gen_range(CANVAS_Y.0..=CANVAS_Y.1),
    }
}
