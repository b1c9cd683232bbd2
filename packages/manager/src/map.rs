//! Map rendering data for geofences.
//!
//! Produces one [`ZoneLayer`] per stored zone plus at most one transient
//! marker for a searched-but-unsaved location. The renderer itself lives
//! elsewhere; these types only say what to draw and how to color it.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};
use serde::Serialize;
use serde_json::json;
use tourist_safety_geofence_models::{Geofence, GeofenceId, LatLon, RiskLevel};

/// Fill opacity shared by every zone.
pub const ZONE_FILL_OPACITY: f64 = 0.2;

/// Theme color a zone is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneTone {
    Destructive,
    Warning,
    Success,
}

/// Badge variant used for the risk level in the zone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeVariant {
    Destructive,
    Default,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyle {
    pub tone: ZoneTone,
    pub badge: BadgeVariant,
    pub fill_opacity: f64,
}

impl ZoneStyle {
    #[must_use]
    pub const fn for_risk(risk: RiskLevel) -> Self {
        let (tone, badge) = match risk {
            RiskLevel::High => (ZoneTone::Destructive, BadgeVariant::Destructive),
            RiskLevel::Medium => (ZoneTone::Warning, BadgeVariant::Default),
            RiskLevel::Low => (ZoneTone::Success, BadgeVariant::Secondary),
        };
        Self {
            tone,
            badge,
            fill_opacity: ZONE_FILL_OPACITY,
        }
    }
}

/// One stored zone, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLayer {
    pub id: GeofenceId,
    /// Tooltip text, e.g. `"Restricted Area 7 - High Risk"`.
    pub label: String,
    pub risk: RiskLevel,
    pub style: ZoneStyle,
    pub ring: Vec<LatLon>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayers {
    pub zones: Vec<ZoneLayer>,
    /// Location found by a search that has not been saved yet.
    pub marker: Option<LatLon>,
}

/// Builds the layer list for `geofences`, in store order.
#[must_use]
pub fn map_layers(geofences: &[Geofence], marker: Option<LatLon>) -> MapLayers {
    MapLayers {
        zones: geofences
            .iter()
            .map(|fence| ZoneLayer {
                id: fence.id,
                label: fence.label(),
                risk: fence.risk,
                style: ZoneStyle::for_risk(fence.risk),
                ring: fence.coords.clone(),
            })
            .collect(),
        marker,
    }
}

fn position(p: LatLon) -> Vec<f64> {
    vec![p.lon, p.lat]
}

impl MapLayers {
    /// Exports the layers as a GeoJSON feature collection.
    ///
    /// Zones become `Polygon` features carrying `label`, `risk` and `tone`
    /// properties; the marker, if any, becomes a `Point` feature with
    /// `"kind": "pendingMarker"`. Positions are `[lon, lat]`.
    #[must_use]
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features: Vec<Feature> = self
            .zones
            .iter()
            .map(|zone| {
                let ring = zone.ring.iter().copied().map(position).collect();
                let mut properties = JsonObject::new();
                properties.insert("label".to_string(), json!(zone.label));
                properties.insert("risk".to_string(), json!(zone.risk));
                properties.insert("tone".to_string(), json!(zone.style.tone));
                properties.insert("fillOpacity".to_string(), json!(zone.style.fill_opacity));

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                    id: Some(Id::Number(zone.id.0.into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        if let Some(marker) = self.marker {
            let mut properties = JsonObject::new();
            properties.insert("kind".to_string(), json!("pendingMarker"));
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(position(marker)))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence(id: u64, name: &str, risk: RiskLevel) -> Geofence {
        Geofence {
            id: GeofenceId(id),
            name: name.to_string(),
            risk,
            coords: vec![
                LatLon::new(27.7, 85.3),
                LatLon::new(27.7, 85.35),
                LatLon::new(27.75, 85.35),
                LatLon::new(27.7, 85.3),
            ],
        }
    }

    #[test]
    fn risk_maps_to_tone_and_badge() {
        assert_eq!(ZoneStyle::for_risk(RiskLevel::High).tone, ZoneTone::Destructive);
        assert_eq!(ZoneStyle::for_risk(RiskLevel::Medium).tone, ZoneTone::Warning);
        assert_eq!(ZoneStyle::for_risk(RiskLevel::Low).tone, ZoneTone::Success);
        assert_eq!(ZoneStyle::for_risk(RiskLevel::High).badge, BadgeVariant::Destructive);
        assert_eq!(ZoneStyle::for_risk(RiskLevel::Medium).badge, BadgeVariant::Default);
        assert_eq!(ZoneStyle::for_risk(RiskLevel::Low).badge, BadgeVariant::Secondary);
        for risk in RiskLevel::all() {
            assert!((ZoneStyle::for_risk(*risk).fill_opacity - 0.2).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn one_layer_per_zone_with_label() {
        let fences = vec![
            fence(1, "Restricted Area 7", RiskLevel::High),
            fence(4, "Market", RiskLevel::Low),
        ];
        let layers = map_layers(&fences, None);

        assert_eq!(layers.zones.len(), 2);
        assert_eq!(layers.zones[0].label, "Restricted Area 7 - High Risk");
        assert_eq!(layers.zones[1].label, "Market - Low Risk");
        assert_eq!(layers.zones[1].id, GeofenceId(4));
        assert!(layers.marker.is_none());
    }

    #[test]
    fn geojson_uses_lon_lat_order() {
        let layers = map_layers(
            &[fence(1, "Restricted Area 7", RiskLevel::High)],
            Some(LatLon::new(27.71, 85.32)),
        );
        let collection = layers.to_geojson();
        assert_eq!(collection.features.len(), 2);

        let value = serde_json::to_value(&collection).unwrap();
        let polygon = &value["features"][0];
        assert_eq!(polygon["geometry"]["type"], "Polygon");
        assert_eq!(polygon["geometry"]["coordinates"][0][0], json!([85.3, 27.7]));
        assert_eq!(polygon["properties"]["tone"], "destructive");
        assert_eq!(polygon["properties"]["label"], "Restricted Area 7 - High Risk");

        let marker = &value["features"][1];
        assert_eq!(marker["geometry"]["type"], "Point");
        assert_eq!(marker["geometry"]["coordinates"], json!([85.32, 27.71]));
        assert_eq!(marker["properties"]["kind"], "pendingMarker");
    }

    #[test]
    fn layers_serialize_in_camel_case() {
        let layers = map_layers(&[fence(2, "Old Town", RiskLevel::Medium)], None);
        let value = serde_json::to_value(&layers).unwrap();
        assert_eq!(value["zones"][0]["style"]["fillOpacity"], json!(0.2));
        assert_eq!(value["zones"][0]["style"]["badge"], "default");
        assert!(value["marker"].is_null());
    }
}
