//! Placement and hit-testing rules
//!
//! Pure geometry over the current drop set. The canvas content area is a
//! circle; every radius here is expressed at z = 1 and scaled by inverse
//! depth at the point of use.

use waymark_core::drop::{sort_by_layout_priority, DropKind, Dropped, ENTITY_RADIUS};
use waymark_core::location::{scaled_radius, Location3D};

/// Radius of the canvas content circle.
pub const CONTENT_RADIUS: f64 = 250.0;

/// Minimum clearance around the cursor when placing entity/portal drops.
pub const PROXIMITY_RADIUS: f64 = 2.0 * ENTITY_RADIUS;

/// Reach of the lift cursor.
pub const LIFT_RADIUS: f64 = ENTITY_RADIUS;

/// Entity/portal drops more than this many z units away never block
/// placement.
const PROXIMITY_DEPTH_WINDOW: f64 = 2.0;

/// A drop targeted for lifting may sit at most this many z units behind
/// the cursor.
const LIFT_DEPTH_SLACK: f64 = 1.0;

/// Center of the content circle.
pub fn content_center() -> Location3D {
    Location3D::new(CONTENT_RADIUS, CONTENT_RADIUS, 1.0)
}

/// Whether a location lies inside the content circle, inset by `padding`
pub fn in_content_circle(location: Location3D, padding: f64) -> bool {
    location.is_intersecting_2d(content_center(), CONTENT_RADIUS - padding)
}

/// Whether placing at `location` would crowd an existing drop
///
/// Abstractions never block placement; entity and portal drops block both
/// kinds. Locations whose padded footprint leaves the content circle are
/// treated as crowded too.
pub fn within_proximity(location: Location3D, drops: &[Dropped]) -> bool {
    let proximity_scaled = scaled_radius(PROXIMITY_RADIUS, location.z);
    if !in_content_circle(location, proximity_scaled) {
        return true;
    }

    drops.iter().any(|drop| {
        if drop.kind() == DropKind::Abstraction {
            return false;
        }
        if (location.z - drop.location().z).abs() > PROXIMITY_DEPTH_WINDOW {
            return false;
        }
        let radius = proximity_scaled + scaled_radius(drop.kind().radius(), drop.location().z);
        location.is_intersecting_2d(drop.location(), radius)
    })
}

/// The drop a lift at `location` would target, if any
///
/// Nearest-first layout priority decides precedence; a candidate must not
/// sit more than one z unit in front of the cursor, and its own scaled
/// radius plus the scaled lift radius must reach the cursor in 2D.
pub fn targeted_drop(location: Location3D, drops: &[Dropped]) -> Option<Dropped> {
    let mut candidates = drops.to_vec();
    sort_by_layout_priority(&mut candidates, false);

    candidates.into_iter().find(|drop| {
        if location.z > drop.location().z + LIFT_DEPTH_SLACK {
            return false;
        }
        let radius = scaled_radius(drop.kind().radius(), drop.location().z)
            + scaled_radius(LIFT_RADIUS, location.z);
        location.is_intersecting_2d(drop.location(), radius)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use waymark_core::drop::{DroppedAbstraction, DroppedPortal};

    fn portal_at(id: &str, x: f64, y: f64, z: f64) -> Dropped {
        Dropped::Portal(DroppedPortal {
            id: id.to_string(),
            location: Location3D::new(x, y, z),
            url: Url::parse("https://example.com/").unwrap(),
        })
    }

    fn abstraction_at(id: &str, x: f64, y: f64, z: f64) -> Dropped {
        Dropped::Abstraction(DroppedAbstraction {
            id: id.to_string(),
            location: Location3D::new(x, y, z),
            image_url: Url::parse("https://example.com/i.jpg").unwrap(),
        })
    }

    #[test]
    fn test_content_circle_boundaries() {
        assert!(in_content_circle(content_center(), 0.0));
        assert!(in_content_circle(Location3D::new(250.0, 10.0, 1.0), 0.0));
        assert!(!in_content_circle(Location3D::new(250.0, 10.0, 1.0), 20.0));
        assert!(!in_content_circle(Location3D::new(600.0, 250.0, 1.0), 0.0));
    }

    #[test]
    fn test_proximity_blocked_by_nearby_portal() {
        let drops = vec![portal_at("p", 250.0, 250.0, 1.0)];
        assert!(within_proximity(content_center(), &drops));
    }

    #[test]
    fn test_proximity_ignores_abstractions() {
        let drops = vec![abstraction_at("a", 250.0, 250.0, 1.0)];
        assert!(!within_proximity(content_center(), &drops));
    }

    #[test]
    fn test_proximity_ignores_depth_separated_drops() {
        // Same planar spot, but more than 2 z units away.
        let drops = vec![portal_at("p", 250.0, 250.0, 4.0)];
        assert!(!within_proximity(content_center(), &drops));
    }

    #[test]
    fn test_proximity_blocked_outside_content_circle() {
        assert!(within_proximity(Location3D::new(495.0, 250.0, 1.0), &[]));
    }

    #[test]
    fn test_clear_spot_is_not_crowded() {
        let drops = vec![portal_at("p", 100.0, 100.0, 1.0)];
        assert!(!within_proximity(Location3D::new(350.0, 350.0, 1.0), &drops));
    }

    #[test]
    fn test_targeted_drop_prefers_nearest() {
        let near = portal_at("near", 250.0, 250.0, 1.0);
        let far = portal_at("far", 250.0, 250.0, 3.0);
        let hit = targeted_drop(content_center(), &[far, near]).unwrap();
        assert_eq!(hit.id(), "near");
    }

    #[test]
    fn test_targeted_drop_respects_depth_slack() {
        // Cursor at z = 3 cannot lift a drop at z = 1 (more than 1 unit in
        // front of it).
        let drop = portal_at("p", 250.0, 250.0, 1.0);
        let cursor = Location3D::new(250.0, 250.0, 3.0);
        assert!(targeted_drop(cursor, &[drop.clone()]).is_none());

        // A cursor one unit deeper than the drop still reaches it.
        let cursor = Location3D::new(250.0, 250.0, 2.0);
        assert!(targeted_drop(cursor, &[drop]).is_some());
    }

    #[test]
    fn test_targeted_drop_none_when_out_of_reach() {
        let drop = portal_at("p", 100.0, 100.0, 1.0);
        assert!(targeted_drop(Location3D::new(400.0, 400.0, 1.0), &[drop]).is_none());
    }
}
