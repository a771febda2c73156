//! Choropleth of peer-lending resilience metrics over U.S. PUMAs.
//!
//! [`data`] loads and filters the nationwide geometry, [`metric`] buckets
//! values into colour classes and builds legends, [`region`] holds the
//! state directory and zoom policy, and [`presenter::MapPresenter`] keeps
//! a [`presenter::RenderSurface`] in step with the user's selection.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod logging;
pub mod map_draw;
pub mod metric;
pub mod presenter;
pub mod region;
pub mod state;
pub mod terminal;
pub mod ui;

pub use data::{filter, Feature, GeometryCollection, GeometrySource};
pub use error::{LoadError, SelectionError};
pub use metric::{classify, Legend, LegendEntry, MetricDefinition, MetricId, ValueKind, METRICS};
pub use presenter::{Changes, MapPresenter, Overlay, RenderSurface, StyledFeature, ViewSelection};
pub use region::{RegionId, RegionSelector, Viewport, REGIONS};
