use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::{
    metric::MetricId,
    region::{RegionSelector, REGIONS},
    state::{AppState, Panel},
};

const TITLE: &str = "Peer Lending in the United States";
const ATTRIBUTION: &str = "Public service of Community Finance (communityfi.org)";
const OFF_FRAME_NOTE: &str = "Alaska and Hawaii lie outside this view; pick them from the list.";

pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(f.area());

    // Left: region selector
    let regions: Vec<ListItem> = REGIONS.iter().map(|e| ListItem::new(e.name)).collect();
    let mut region_state = ListState::default();
    region_state.select(Some(state.region_cursor));
    let region_list = List::new(regions)
        .block(focus_block("Select a state", state.active_panel == Panel::Regions))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().fg(Color::Red));
    f.render_stateful_widget(region_list, chunks[0], &mut region_state);

    // Center: map
    let selection = state.presenter.selection();
    let title = format!("{} – {}", state.region_name(), selection.metric);
    state.map.render(f, chunks[1], &title);

    // Right: metric selector, legend, info
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MetricId::ALL.len() as u16 + 2),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(chunks[2]);

    let metrics: Vec<ListItem> = MetricId::ALL
        .iter()
        .map(|id| {
            let marker = if *id == selection.metric { "(•)" } else { "( )" };
            ListItem::new(format!("{marker} {}", id.definition().name))
        })
        .collect();
    let mut metric_state = ListState::default();
    metric_state.select(Some(state.metric_cursor));
    let metric_list = List::new(metrics)
        .block(focus_block("Select a variable", state.active_panel == Panel::Metrics))
        .highlight_style(Style::default().fg(Color::Red));
    f.render_stateful_widget(metric_list, right_chunks[0], &mut metric_state);

    state.map.render_legend(f, right_chunks[1]);

    let info = Paragraph::new(info_text(state))
        .block(Block::default().borders(Borders::ALL).title(TITLE))
        .wrap(Wrap { trim: true });
    f.render_widget(info, right_chunks[2]);
}

fn info_text(state: &AppState) -> String {
    let selection = state.presenter.selection();
    let mut text = format!("{} – {} areas\n\n", state.region_name(), state.map.feature_count());
    if selection.region == RegionSelector::WholeArea {
        text.push_str(OFF_FRAME_NOTE);
        text.push_str("\n\n");
    }
    text.push_str(selection.metric.definition().description);
    text.push_str("\n\n");
    text.push_str(AppState::HELP_TEXT);
    text.push_str("\n\n");
    text.push_str(ATTRIBUTION);
    text
}

fn focus_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused { Color::Yellow } else { Color::White };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}
