use crossterm::event::KeyCode;

use crate::{
    map_draw::MapView,
    metric::MetricId,
    presenter::{Changes, MapPresenter},
    region::REGIONS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Regions,
    Metrics,
}

/// Selection controls around the presenter: two cursors, a focused panel,
/// and the terminal surface the presenter publishes to.
pub struct AppState {
    pub presenter: MapPresenter,
    pub map: MapView,
    pub region_cursor: usize,
    pub metric_cursor: usize,
    pub active_panel: Panel,
}

impl AppState {
    pub const HELP_TEXT: &'static str = "\
Tab: switch list
↑/↓: move
Enter: apply
1-4: pick a metric
q: quit";

    pub fn new(presenter: MapPresenter) -> Self {
        let selection = presenter.selection();
        let region_cursor = REGIONS
            .iter()
            .position(|e| e.selector == selection.region)
            .unwrap_or(0);
        let mut map = MapView::new();
        presenter.publish(&mut map, Changes::ALL);

        Self {
            presenter,
            map,
            region_cursor,
            metric_cursor: selection.metric.index(),
            active_panel: Panel::Regions,
        }
    }

    /// Display name of the applied region.
    pub fn region_name(&self) -> &'static str {
        let selected = self.presenter.selection().region;
        REGIONS
            .iter()
            .find(|e| e.selector == selected)
            .map_or("Unknown region", |e| e.name)
    }

    /// Returns true when the user asked to quit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        use KeyCode::*;
        match key {
            Char('q') => return true,
            Tab | BackTab => {
                self.active_panel = match self.active_panel {
                    Panel::Regions => Panel::Metrics,
                    Panel::Metrics => Panel::Regions,
                };
            }
            Up => match self.active_panel {
                Panel::Regions => self.region_cursor = self.region_cursor.saturating_sub(1),
                Panel::Metrics => self.metric_cursor = self.metric_cursor.saturating_sub(1),
            },
            Down => match self.active_panel {
                Panel::Regions => {
                    if self.region_cursor + 1 < REGIONS.len() {
                        self.region_cursor += 1;
                    }
                }
                Panel::Metrics => {
                    if self.metric_cursor + 1 < MetricId::ALL.len() {
                        self.metric_cursor += 1;
                    }
                }
            },
            Enter | Char(' ') => match self.active_panel {
                Panel::Regions => self.apply_region(),
                Panel::Metrics => self.apply_metric(),
            },
            Char(c @ '1'..='4') => {
                self.metric_cursor = c as usize - '1' as usize;
                self.apply_metric();
            }
            _ => {}
        }
        false
    }

    fn apply_region(&mut self) {
        let entry = &REGIONS[self.region_cursor];
        let changes = self.presenter.on_region_change(entry.selector);
        self.presenter.publish(&mut self.map, changes);
    }

    fn apply_metric(&mut self) {
        let metric = MetricId::ALL[self.metric_cursor];
        let changes = self.presenter.on_metric_change(metric);
        self.presenter.publish(&mut self.map, changes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{tests::feature, GeometrySource};
    use crate::presenter::ViewSelection;
    use crate::region::{RegionId, RegionSelector};

    fn state() -> AppState {
        let source = GeometrySource::from_features(vec![
            feature(1, 0.1),
            feature(2, 0.2),
            feature(1, 0.3),
        ]);
        AppState::new(MapPresenter::new(source, ViewSelection::default()))
    }

    #[test]
    fn test_starts_on_defaults() {
        let s = state();
        assert_eq!(s.region_cursor, 0);
        assert_eq!(s.metric_cursor, 0);
        assert_eq!(s.region_name(), "United States");
        assert_eq!(s.map.feature_count(), 3);
    }

    #[test]
    fn test_moving_does_not_apply_until_enter() {
        let mut s = state();
        s.handle_input(KeyCode::Down);
        assert_eq!(s.region_cursor, 1);
        assert_eq!(s.presenter.selection().region, RegionSelector::WholeArea);

        s.handle_input(KeyCode::Enter);
        assert_eq!(s.presenter.selection().region, RegionSelector::Region(RegionId(1)));
        assert_eq!(s.region_name(), "Alabama");
        assert_eq!(s.map.feature_count(), 2);
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut s = state();
        s.handle_input(KeyCode::Up);
        assert_eq!(s.region_cursor, 0);
        s.handle_input(KeyCode::Tab);
        for _ in 0..10 {
            s.handle_input(KeyCode::Down);
        }
        assert_eq!(s.metric_cursor, 3);
    }

    #[test]
    fn test_metric_keys() {
        let mut s = state();
        s.handle_input(KeyCode::Char('4'));
        assert_eq!(s.presenter.selection().metric, MetricId::AmountOwedByOthers);
        assert_eq!(s.map.legend().map(|l| l.title), Some("Amount Owed by Others"));

        s.handle_input(KeyCode::Tab);
        s.handle_input(KeyCode::Up);
        s.handle_input(KeyCode::Enter);
        assert_eq!(s.presenter.selection().metric, MetricId::OwedByOthers);
    }

    #[test]
    fn test_quit() {
        let mut s = state();
        assert!(!s.handle_input(KeyCode::Char('x')));
        assert!(s.handle_input(KeyCode::Char('q')));
    }
}
