//! R-tree index over geofence boundaries for point-in-zone lookups.

use geo::{BoundingRect as _, Contains as _, LineString, Polygon};
use rstar::{AABB, RTree, RTreeObject};
use tourist_safety_geofence_models::{Geofence, GeofenceId, LatLon, RiskLevel};

use crate::to_point;

/// A zone polygon stored in the R-tree with its metadata.
struct ZoneEntry {
    id: GeofenceId,
    risk: RiskLevel,
    envelope: AABB<[f64; 2]>,
    polygon: Polygon<f64>,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// A zone containing a queried point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneHit {
    pub id: GeofenceId,
    pub risk: RiskLevel,
}

/// Spatial index built from a snapshot of the geofence collection.
///
/// The index does not observe later store mutations; rebuild it from a
/// fresh snapshot when the collection changes.
pub struct ZoneIndex {
    zones: RTree<ZoneEntry>,
}

impl ZoneIndex {
    /// Builds an index from the given geofences.
    #[must_use]
    pub fn build<'a>(geofences: impl IntoIterator<Item = &'a Geofence>) -> Self {
        let entries: Vec<ZoneEntry> = geofences
            .into_iter()
            .map(|fence| {
                let ring: LineString<f64> = fence
                    .coords
                    .iter()
                    .map(|p| (p.lon, p.lat))
                    .collect::<Vec<_>>()
                    .into();
                let polygon = Polygon::new(ring, vec![]);
                let envelope = compute_envelope(&polygon);

                ZoneEntry {
                    id: fence.id,
                    risk: fence.risk,
                    envelope,
                    polygon,
                }
            })
            .collect();

        log::debug!("Built zone index over {} geofences", entries.len());

        Self {
            zones: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.size() == 0
    }

    /// Zones whose interior contains `point`, highest risk first.
    ///
    /// Zones can overlap, so every match is returned. Ties are ordered by
    /// ascending id.
    #[must_use]
    pub fn containing(&self, point: LatLon) -> Vec<ZoneHit> {
        let geo_point = to_point(point);
        let query_env = AABB::from_point([point.lon, point.lat]);

        let mut hits: Vec<ZoneHit> = self
            .zones
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(&geo_point))
            .map(|entry| ZoneHit {
                id: entry.id,
                risk: entry.risk,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.risk
                .priority()
                .cmp(&a.risk.priority())
                .then(a.id.cmp(&b.id))
        });
        hits
    }
}

/// Compute the bounding box envelope for a [`Polygon`].
fn compute_envelope(polygon: &Polygon<f64>) -> AABB<[f64; 2]> {
    polygon.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{circle_polygon, close_ring};

    fn restricted_area() -> Geofence {
        Geofence {
            id: GeofenceId(1),
            name: "Restricted Area 7".to_string(),
            risk: RiskLevel::High,
            coords: close_ring(vec![
                LatLon::new(27.7, 85.3),
                LatLon::new(27.7, 85.35),
                LatLon::new(27.75, 85.35),
                LatLon::new(27.75, 85.3),
            ])
            .unwrap(),
        }
    }

    #[test]
    fn finds_zone_containing_point() {
        let fences = [restricted_area()];
        let index = ZoneIndex::build(&fences);

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.containing(LatLon::new(27.72, 85.32)),
            vec![ZoneHit {
                id: GeofenceId(1),
                risk: RiskLevel::High
            }]
        );
    }

    #[test]
    fn far_point_matches_nothing() {
        let fences = [restricted_area()];
        let index = ZoneIndex::build(&fences);
        assert!(index.containing(LatLon::new(40.0, -74.0)).is_empty());
    }

    #[test]
    fn overlapping_zones_sorted_by_risk() {
        let center = LatLon::new(27.72, 85.32);
        let fences = [
            Geofence {
                id: GeofenceId(2),
                name: "Market".to_string(),
                risk: RiskLevel::Low,
                coords: circle_polygon(center, 800.0),
            },
            restricted_area(),
            Geofence {
                id: GeofenceId(3),
                name: "Temple".to_string(),
                risk: RiskLevel::Medium,
                coords: circle_polygon(center, 300.0),
            },
        ];
        let index = ZoneIndex::build(&fences);

        let ids: Vec<GeofenceId> = index.containing(center).iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![GeofenceId(1), GeofenceId(3), GeofenceId(2)]);
    }

    #[test]
    fn empty_index() {
        let index = ZoneIndex::build(&Vec::<Geofence>::new());
        assert!(index.is_empty());
        assert!(index.containing(LatLon::new(0.0, 0.0)).is_empty());
    }
}
