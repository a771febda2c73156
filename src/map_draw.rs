use std::sync::Arc;

use geo::LineString;
use ratatui::{
    Frame,
    layout::Rect as TuiRect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line as TextLine, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Context, Line},
    },
};

use crate::{
    data::Feature,
    metric::Legend,
    presenter::{RenderSurface, StyledFeature},
    region::Viewport,
};

/// Web-map tiles visible across the map panel; sets how many degrees of
/// longitude a zoom level spans.
const TILES_ACROSS: f64 = 4.0;

/// Terminal render surface: keeps the last published overlay and draws it
/// on a braille canvas.
#[derive(Default)]
pub struct MapView {
    items: Vec<(Arc<Feature>, Color)>,
    legend: Option<Legend>,
    viewport: Option<Viewport>,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes currently drawn.
    pub fn feature_count(&self) -> usize {
        self.items.len()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Canvas `(x_bounds, y_bounds)` for the current viewport.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        match self.viewport {
            Some(v) => viewport_bounds(v),
            None => ([-180.0, 180.0], [-90.0, 90.0]),
        }
    }

    /// Draws each feature outline in its class colour.
    pub fn render(&self, f: &mut Frame, area: TuiRect, title: &str) {
        let (x_bounds, y_bounds) = self.bounds();
        let canvas = Canvas::default()
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for (feature, color) in &self.items {
                    for poly in &feature.geometry.0 {
                        draw_ring(ctx, poly.exterior(), *color);
                        for interior in poly.interiors() {
                            draw_ring(ctx, interior, *color);
                        }
                    }
                }
            });
        f.render_widget(canvas, area);
    }

    /// Legend panel: a colour swatch and range label per class.
    pub fn render_legend(&self, f: &mut Frame, area: TuiRect) {
        let (title, lines) = match &self.legend {
            Some(legend) => {
                let lines: Vec<TextLine> = legend
                    .entries
                    .iter()
                    .map(|entry| {
                        TextLine::from(vec![
                            Span::styled("██ ", Style::default().fg(parse_color(entry.color))),
                            Span::raw(entry.label.clone()),
                        ])
                    })
                    .collect();
                (legend.title, lines)
            }
            None => ("Legend", Vec::new()),
        };
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, area);
    }
}

impl RenderSurface for MapView {
    fn set_geometry(&mut self, geometry: &[StyledFeature]) {
        self.items = geometry
            .iter()
            .map(|s| (Arc::clone(&s.feature), parse_color(s.style.fill_color)))
            .collect();
    }

    fn set_legend(&mut self, legend: &Legend) {
        self.legend = Some(legend.clone());
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }
}

fn draw_ring(ctx: &mut Context<'_>, ring: &LineString<f64>, color: Color) {
    for window in ring.0.windows(2) {
        let a = window[0];
        let b = window[1];
        ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
    }
    if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
        if first != last {
            ctx.draw(&Line { x1: last.x, y1: last.y, x2: first.x, y2: first.y, color });
        }
    }
}

/// Longitude span halves with every zoom step; latitude span is half the
/// longitude span to suit terminal cell proportions.
fn viewport_bounds(viewport: Viewport) -> ([f64; 2], [f64; 2]) {
    let lon_span = 360.0 / f64::from(1u32 << viewport.zoom.min(20)) * TILES_ACROSS;
    let lat_span = lon_span / 2.0;
    let c = viewport.center;
    (
        [c.x - lon_span / 2.0, c.x + lon_span / 2.0],
        [c.y - lat_span / 2.0, c.y + lat_span / 2.0],
    )
}

/// `#rrggbb` to a terminal colour; anything unparseable draws white.
fn parse_color(hex: &str) -> Color {
    hex.parse::<Color>().unwrap_or(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{tests::feature, GeometrySource};
    use crate::metric::MetricId;
    use crate::presenter::{Changes, MapPresenter, ViewSelection};
    use crate::region::lookup;
    use geo::Coord;

    #[test]
    fn test_viewport_bounds_shrink_with_zoom() {
        let center = Coord { x: -91.1454, y: 37.8187 };
        let (x4, y4) = viewport_bounds(Viewport { center, zoom: 4 });
        let (x5, _) = viewport_bounds(Viewport { center, zoom: 5 });
        assert!((x4[1] - x4[0] - 90.0).abs() < 1e-9);
        assert!((x5[1] - x5[0] - 45.0).abs() < 1e-9);
        assert!((y4[1] - y4[0] - 45.0).abs() < 1e-9);
        assert!(((x4[0] + x4[1]) / 2.0 - center.x).abs() < 1e-9);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#bfd2ff"), Color::Rgb(0xbf, 0xd2, 0xff));
        assert_eq!(parse_color("not a colour"), Color::White);
    }

    #[test]
    fn test_surface_tracks_presenter() {
        let source = GeometrySource::from_features(vec![feature(42, 0.3), feature(6, 0.1)]);
        let mut presenter = MapPresenter::new(source, ViewSelection::default());
        let mut view = MapView::new();
        assert_eq!(view.bounds(), ([-180.0, 180.0], [-90.0, 90.0]));

        presenter.publish(&mut view, Changes::ALL);
        assert_eq!(view.feature_count(), 2);
        assert_eq!(view.items[0].1, Color::Rgb(0x00, 0x4c, 0xff));

        let changes = presenter.on_region_change(lookup("California").unwrap().selector);
        presenter.publish(&mut view, changes);
        assert_eq!(view.feature_count(), 1);

        let changes = presenter.on_metric_change(MetricId::ExcessSpendingBorrowing);
        presenter.publish(&mut view, changes);
        assert_eq!(view.legend().map(|l| l.title), Some("Excess Spending Borrowing (%)"));
        assert_eq!(view.items[0].1, Color::Rgb(0x7a, 0x52, 0xff));
    }
}
