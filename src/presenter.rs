use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    data::{filter, Feature, GeometryCollection, GeometrySource},
    metric::{FeatureStyle, Legend, MetricId},
    region::{self, RegionSelector, Viewport},
};

/// What the user currently has selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSelection {
    pub region: RegionSelector,
    pub metric: MetricId,
}

impl Default for ViewSelection {
    fn default() -> Self {
        Self { region: region::default_region().selector, metric: MetricId::default() }
    }
}

#[derive(Clone, Debug)]
pub struct StyledFeature {
    pub feature: Arc<Feature>,
    pub style: FeatureStyle,
}

impl PartialEq for StyledFeature {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.feature, &other.feature) && self.style == other.style
    }
}

/// Everything the rendering surface shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub geometry: Vec<StyledFeature>,
    pub legend: Legend,
    pub viewport: Viewport,
}

/// Which overlay artifacts a transition replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    pub geometry: bool,
    pub legend: bool,
    pub viewport: bool,
}

impl Changes {
    pub const ALL: Changes = Changes { geometry: true, legend: true, viewport: true };

    pub fn any(self) -> bool {
        self.geometry || self.legend || self.viewport
    }
}

/// A widget that displays the overlay. The presenter only ever overwrites
/// these three artifacts and never reads them back.
pub trait RenderSurface {
    fn set_geometry(&mut self, geometry: &[StyledFeature]);
    fn set_legend(&mut self, legend: &Legend);
    fn set_viewport(&mut self, viewport: Viewport);
}

/// Keeps the overlay consistent with the selection.
///
/// Construction requires a loaded [`GeometrySource`], so a presenter is
/// always ready; each selection event recomputes synchronously and
/// reports which artifacts changed.
#[derive(Debug)]
pub struct MapPresenter {
    source: GeometrySource,
    selection: ViewSelection,
    filtered: GeometryCollection,
    overlay: Overlay,
}

impl MapPresenter {
    pub fn new(source: GeometrySource, selection: ViewSelection) -> Self {
        let filtered = filter(source.collection(), selection.region);
        let definition = selection.metric.definition();
        let overlay = Overlay {
            geometry: style_all(&filtered, selection.metric),
            legend: definition.legend(),
            viewport: viewport_for(selection.region, None),
        };
        info!(
            region = ?selection.region,
            metric = definition.name,
            features = filtered.len(),
            "presenter ready"
        );
        Self { source, selection, filtered, overlay }
    }

    pub fn selection(&self) -> ViewSelection {
        self.selection
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn source(&self) -> &GeometrySource {
        &self.source
    }

    /// Refilters the geometry, restyles it with the current metric and
    /// moves the viewport to the region.
    pub fn on_region_change(&mut self, region: RegionSelector) -> Changes {
        self.selection.region = region;
        self.filtered = filter(self.source.collection(), region);

        let geometry = style_all(&self.filtered, self.selection.metric);
        let viewport = viewport_for(region, Some(self.overlay.viewport));
        let changes = Changes {
            geometry: geometry != self.overlay.geometry,
            legend: false,
            viewport: viewport != self.overlay.viewport,
        };
        self.overlay.geometry = geometry;
        self.overlay.viewport = viewport;

        info!(region = ?region, features = self.filtered.len(), zoom = viewport.zoom, "region changed");
        changes
    }

    /// Restyles the already filtered geometry and rebuilds the legend.
    pub fn on_metric_change(&mut self, metric: MetricId) -> Changes {
        self.selection.metric = metric;

        let geometry = style_all(&self.filtered, metric);
        let legend = metric.definition().legend();
        let changes = Changes {
            geometry: geometry != self.overlay.geometry,
            legend: legend != self.overlay.legend,
            viewport: false,
        };
        self.overlay.geometry = geometry;
        self.overlay.legend = legend;

        info!(metric = metric.definition().name, "metric changed");
        changes
    }

    /// Pushes the changed artifacts to `surface`.
    pub fn publish<S: RenderSurface + ?Sized>(&self, surface: &mut S, changes: Changes) {
        debug!(?changes, "publishing overlay");
        if changes.geometry {
            surface.set_geometry(&self.overlay.geometry);
        }
        if changes.legend {
            surface.set_legend(&self.overlay.legend);
        }
        if changes.viewport {
            surface.set_viewport(self.overlay.viewport);
        }
    }
}

fn style_all(collection: &GeometryCollection, metric: MetricId) -> Vec<StyledFeature> {
    let definition = metric.definition();
    collection
        .iter()
        .map(|feature| StyledFeature {
            feature: Arc::clone(feature),
            style: definition.style(feature.metric(metric)),
        })
        .collect()
}

/// Directory centre with the zoom policy applied. A selector missing from
/// the directory keeps the previous centre.
fn viewport_for(selector: RegionSelector, previous: Option<Viewport>) -> Viewport {
    let zoom = selector.zoom_class().zoom();
    match region::entry_for(selector) {
        Some(entry) => Viewport { center: entry.center, zoom },
        None => {
            let center = previous.map_or(region::default_region().center, |v| v.center);
            Viewport { center, zoom }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::feature;
    use crate::region::{lookup, RegionId};

    fn presenter() -> MapPresenter {
        let collection = vec![
            feature(42, 0.15),
            feature(6, 0.21),
            feature(42, 0.24),
            feature(48, 0.30),
        ];
        let source = GeometrySource::from_features(collection);
        MapPresenter::new(source, ViewSelection::default())
    }

    #[derive(Default)]
    struct RecordingSurface {
        geometry: Option<usize>,
        legend: Option<&'static str>,
        viewport: Option<Viewport>,
        calls: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn set_geometry(&mut self, geometry: &[StyledFeature]) {
            self.geometry = Some(geometry.len());
            self.calls += 1;
        }

        fn set_legend(&mut self, legend: &Legend) {
            self.legend = Some(legend.title);
            self.calls += 1;
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.viewport = Some(viewport);
            self.calls += 1;
        }
    }

    #[test]
    fn test_starts_on_whole_area() {
        let p = presenter();
        assert_eq!(p.selection().region, RegionSelector::WholeArea);
        assert_eq!(p.overlay().geometry.len(), 4);
        assert_eq!(p.overlay().viewport.zoom, 4);
        assert_eq!(p.overlay().legend.title, "Emergency Borrowing (%)");
    }

    #[test]
    fn test_region_change_filters_and_zooms() {
        let mut p = presenter();
        let changes = p.on_region_change(lookup("Pennsylvania").unwrap().selector);
        assert_eq!(changes, Changes { geometry: true, legend: false, viewport: true });
        assert_eq!(p.overlay().geometry.len(), 2);
        assert!(p.overlay().geometry.iter().all(|s| s.feature.region == RegionId(42)));
        assert_eq!(p.overlay().viewport.zoom, 6);

        p.on_region_change(lookup("Texas").unwrap().selector);
        assert_eq!(p.overlay().viewport.zoom, 5);
        p.on_region_change(RegionSelector::WholeArea);
        assert_eq!(p.overlay().viewport.zoom, 4);
    }

    #[test]
    fn test_metric_change_keeps_region() {
        let mut p = presenter();
        p.on_region_change(RegionSelector::Region(RegionId(42)));
        let changes = p.on_metric_change(MetricId::AmountOwedByOthers);
        assert!(changes.legend);
        assert!(!changes.viewport);
        assert_eq!(p.overlay().geometry.len(), 2);
        assert_eq!(p.overlay().legend.title, "Amount Owed by Others");
        // Sub-dollar values all sit in the lowest currency class.
        assert!(p.overlay().geometry.iter().all(|s| s.style.class == 0));
    }

    #[test]
    fn test_styles_follow_classifier() {
        let p = presenter();
        let classes: Vec<usize> = p.overlay().geometry.iter().map(|s| s.style.class).collect();
        assert_eq!(classes, [0, 1, 2, 3]);
    }

    #[test]
    fn test_metric_change_is_idempotent() {
        let mut p = presenter();
        p.on_metric_change(MetricId::OwedByOthers);
        let before = p.overlay().clone();
        let changes = p.on_metric_change(MetricId::OwedByOthers);
        assert!(!changes.any());
        assert_eq!(p.overlay(), &before);
    }

    #[test]
    fn test_unknown_region_draws_nothing() {
        let mut p = presenter();
        p.on_region_change(RegionSelector::Region(RegionId(99)));
        assert!(p.overlay().geometry.is_empty());
        assert_eq!(p.overlay().viewport.zoom, 6);
    }

    #[test]
    fn test_publish_only_sends_changes() {
        let mut p = presenter();
        let mut surface = RecordingSurface::default();
        p.publish(&mut surface, Changes::ALL);
        assert_eq!(surface.calls, 3);

        let changes = p.on_region_change(RegionSelector::Region(RegionId(6)));
        p.publish(&mut surface, changes);
        assert_eq!(surface.calls, 5);
        assert_eq!(surface.geometry, Some(1));
        assert_eq!(surface.legend, Some("Emergency Borrowing (%)"));
        assert_eq!(surface.viewport.map(|v| v.zoom), Some(5));
    }
}
