use std::{
    fs,
    path::Path,
    str::FromStr,
    sync::Arc,
};

use geo::{Geometry, MultiPolygon};
use geojson::{GeoJson, JsonObject};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::LoadError,
    metric::{MetricId, METRICS},
    region::{RegionId, RegionSelector},
};

/// Property carrying the state FIPS code of each feature. Integer, whole
/// float (`42.0`) and numeric string (`"06"`) codes are accepted.
pub const REGION_PROPERTY: &str = "STATEFIP";

/// One mapped area (a PUMA) with its state and metric values.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub region: RegionId,
    /// Indexed by `MetricId::index`.
    pub metrics: [f64; 4],
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    pub fn metric(&self, id: MetricId) -> f64 {
        self.metrics[id.index()]
    }
}

/// Ordered, shared feature list. Filtering clones the `Arc`s, never the shapes.
#[derive(Clone, Debug, Default)]
pub struct GeometryCollection {
    features: Vec<Arc<Feature>>,
}

impl GeometryCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features: features.into_iter().map(Arc::new).collect() }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Feature>> {
        self.features.iter()
    }
}

/// Keeps the features of the selected region in their original order. The
/// whole-area selector keeps everything; an id with no features gives an
/// empty collection.
pub fn filter(collection: &GeometryCollection, selector: RegionSelector) -> GeometryCollection {
    let features = match selector {
        RegionSelector::WholeArea => collection.features.clone(),
        RegionSelector::Region(id) => collection
            .features
            .iter()
            .filter(|f| f.region == id)
            .cloned()
            .collect(),
    };
    GeometryCollection { features }
}

/// The nationwide collection, loaded once and read-only afterwards.
#[derive(Debug)]
pub struct GeometrySource {
    collection: GeometryCollection,
}

impl GeometrySource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let source = Self::from_str(&txt)?;
        info!(path = %path.display(), features = source.collection.len(), "loaded geometry");
        Ok(source)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self, LoadError> {
        let GeoJson::FeatureCollection(fc) = raw else {
            return Err(LoadError::NotFeatureCollection);
        };

        let mut features = Vec::with_capacity(fc.features.len());
        for (index, feature) in fc.features.into_iter().enumerate() {
            let props = feature.properties.unwrap_or_default();
            let region = read_region(&props, index)?;

            let mut metrics = [0.0; 4];
            for def in &METRICS {
                metrics[def.id.index()] = read_metric(&props, def.property, index)?;
            }

            let gj = feature.geometry.ok_or(LoadError::MissingGeometry { index })?;
            let geom: Geometry<f64> = gj
                .value
                .try_into()
                .map_err(|source| LoadError::Geometry { index, source })?;
            let geometry = match geom {
                Geometry::Polygon(p) => p.into(),
                Geometry::MultiPolygon(m) => m,
                other => {
                    return Err(LoadError::UnsupportedGeometry { index, kind: geometry_kind(&other) });
                }
            };

            features.push(Feature { region, metrics, geometry });
        }
        debug!(count = features.len(), "parsed features");

        Ok(Self::from_features(features))
    }

    pub fn from_features(features: Vec<Feature>) -> Self {
        Self { collection: GeometryCollection::new(features) }
    }

    pub fn collection(&self) -> &GeometryCollection {
        &self.collection
    }
}

impl FromStr for GeometrySource {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = GeoJson::from_str(s).map_err(LoadError::Parse)?;
        Self::from_geojson(raw)
    }
}

fn read_region(props: &JsonObject, index: usize) -> Result<RegionId, LoadError> {
    let invalid = LoadError::InvalidProperty { index, property: REGION_PROPERTY };
    let code = match props.get(REGION_PROPERTY) {
        None | Some(Value::Null) => {
            return Err(LoadError::MissingProperty { index, property: REGION_PROPERTY });
        }
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|x| x.fract() == 0.0 && *x >= 0.0).map(|x| x as u64))
            .ok_or(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| invalid)?,
        Some(_) => return Err(invalid),
    };
    u8::try_from(code)
        .map(RegionId)
        .map_err(|_| LoadError::InvalidProperty { index, property: REGION_PROPERTY })
}

fn read_metric(props: &JsonObject, property: &'static str, index: usize) -> Result<f64, LoadError> {
    match props.get(property) {
        None | Some(Value::Null) => Err(LoadError::MissingProperty { index, property }),
        Some(v) => v.as_f64().ok_or(LoadError::InvalidProperty { index, property }),
    }
}

fn geometry_kind(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
