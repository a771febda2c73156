use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use geojson::{FeatureCollection, Geometry, JsonObject};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    data::REGION_PROPERTY,
    metric::{Legend, METRICS},
    presenter::{RenderSurface, StyledFeature},
    region::Viewport,
};

/// Render surface that collects the overlay as a styled GeoJSON document,
/// shaped like the collection the web map widget consumes.
#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    features: Vec<geojson::Feature>,
    legend: Option<Legend>,
    viewport: Option<Viewport>,
}

impl GeoJsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut members = JsonObject::new();
        members.insert("name".into(), json!("nationalmap"));
        members.insert(
            "crs".into(),
            json!({ "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } }),
        );
        members.insert(
            "style".into(),
            json!({ "opacity": 1, "dashArray": "1", "fillOpacity": 0.8, "weight": 1.0 }),
        );
        if let Some(legend) = &self.legend {
            let entries: Vec<Value> = legend
                .entries
                .iter()
                .map(|e| json!({ "label": e.label, "color": e.color }))
                .collect();
            members.insert("legend".into(), json!({ "title": legend.title, "entries": entries }));
        }
        if let Some(viewport) = &self.viewport {
            members.insert(
                "viewport".into(),
                json!({
                    "center": [viewport.center.y, viewport.center.x],
                    "zoom": viewport.zoom,
                }),
            );
        }

        FeatureCollection {
            bbox: None,
            features: self.features.clone(),
            foreign_members: Some(members),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.to_feature_collection())?;
        writer.flush()?;
        info!(path = %path.display(), features = self.features.len(), "wrote overlay");
        Ok(())
    }
}

impl RenderSurface for GeoJsonSurface {
    fn set_geometry(&mut self, geometry: &[StyledFeature]) {
        self.features = geometry.iter().map(to_geojson_feature).collect();
    }

    fn set_legend(&mut self, legend: &Legend) {
        self.legend = Some(legend.clone());
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }
}

fn to_geojson_feature(styled: &StyledFeature) -> geojson::Feature {
    let feature = &styled.feature;
    let mut properties = JsonObject::new();
    properties.insert(REGION_PROPERTY.into(), json!(feature.region.0));
    for def in &METRICS {
        properties.insert(def.property.into(), json!(feature.metric(def.id)));
    }
    properties.insert("color".into(), json!(styled.style.stroke_color));
    properties.insert("fillColor".into(), json!(styled.style.fill_color));
    properties.insert("class".into(), json!(styled.style.class));

    geojson::Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
