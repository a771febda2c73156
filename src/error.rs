use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the geometry file. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read geometry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("geometry file is not valid GeoJSON: {0}")]
    Parse(#[source] geojson::Error),

    #[error("geometry file must contain a FeatureCollection")]
    NotFeatureCollection,

    #[error("feature {index} is missing property `{property}`")]
    MissingProperty { index: usize, property: &'static str },

    #[error("feature {index} has an invalid `{property}` value")]
    InvalidProperty { index: usize, property: &'static str },

    #[error("feature {index} has no geometry")]
    MissingGeometry { index: usize },

    #[error("feature {index} has unsupported geometry type {kind}")]
    UnsupportedGeometry { index: usize, kind: &'static str },

    #[error("feature {index} has malformed geometry: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: geojson::Error,
    },
}

/// Free-text selector input that does not name a known region or metric.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown region `{0}`")]
    UnknownRegion(String),

    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
}
