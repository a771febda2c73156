use std::fmt;
use std::str::FromStr;

use crate::error::SelectionError;

/// Number of colour classes every metric is split into.
pub const CLASS_COUNT: usize = 4;

/// Outline colour shared by every class of every metric.
pub const STROKE_COLOR: &str = "black";

/// The four precomputed financial-resilience indicators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricId {
    #[default]
    EmergencyBorrowing,
    ExcessSpendingBorrowing,
    OwedByOthers,
    AmountOwedByOthers,
}

impl MetricId {
    /// Selector order.
    pub const ALL: [MetricId; 4] = [
        MetricId::EmergencyBorrowing,
        MetricId::ExcessSpendingBorrowing,
        MetricId::OwedByOthers,
        MetricId::AmountOwedByOthers,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static MetricDefinition {
        &METRICS[self.index()]
    }

    /// Command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            MetricId::EmergencyBorrowing => "emergency-borrowing",
            MetricId::ExcessSpendingBorrowing => "excess-spending-borrowing",
            MetricId::OwedByOthers => "owed-by-others",
            MetricId::AmountOwedByOthers => "amount-owed",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

impl FromStr for MetricId {
    type Err = SelectionError;

    /// Accepts either the slug or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MetricId::ALL
            .into_iter()
            .find(|id| {
                id.slug().eq_ignore_ascii_case(wanted)
                    || id.definition().name.eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| SelectionError::UnknownMetric(s.to_string()))
    }
}

/// How legend labels render a metric's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Shares in `[0, 1]`, shown as percentages without a unit suffix.
    Percentage,
    /// Dollar amounts, shown rounded to whole dollars.
    Currency,
}

/// Static description of one metric: where it lives in the geometry file,
/// how it is labelled, and how its values are bucketed and coloured.
#[derive(Debug)]
pub struct MetricDefinition {
    pub id: MetricId,
    /// Short selector label.
    pub name: &'static str,
    /// Sentence shown next to the selector.
    pub description: &'static str,
    /// Legend title.
    pub title: &'static str,
    /// Feature property holding the value.
    pub property: &'static str,
    /// `[min, p25, p50, p75, max]` over all features.
    pub boundaries: [f64; 5],
    pub colors: [&'static str; CLASS_COUNT],
    pub value_kind: ValueKind,
}

pub static METRICS: [MetricDefinition; 4] = [
    MetricDefinition {
        id: MetricId::EmergencyBorrowing,
        name: "Emergency Borrowing",
        description: "Likelihood that the average person in a given area would borrow from \
                      friends or family to cover a $400 emergency expense",
        title: "Emergency Borrowing (%)",
        property: "weighted_Emergency_Borrowing",
        boundaries: [0.114408, 0.198014, 0.226183, 0.257190, 0.441033],
        colors: ["#bfd2ff", "#8aadff", "#4a80ff", "#004cff"],
        value_kind: ValueKind::Percentage,
    },
    MetricDefinition {
        id: MetricId::ExcessSpendingBorrowing,
        name: "Excess Spending Borrowing",
        description: "Likelihood that the average person in a given area's spending has \
                      exceeded their income and they would borrow from friends or family to \
                      cover the excess expenses",
        title: "Excess Spending Borrowing (%)",
        property: "Weighted_Excess_Spending_Borrowing",
        boundaries: [0.048980, 0.080217, 0.089925, 0.103192, 0.221574],
        colors: ["#cebfff", "#ab91ff", "#7a52ff", "#3c00ff"],
        value_kind: ValueKind::Percentage,
    },
    MetricDefinition {
        id: MetricId::OwedByOthers,
        name: "Owed by Others",
        description: "Likelihood that the average person in a given area is owed money by \
                      friends, businesses, or others",
        title: "Willingness to Lend (%)",
        property: "weighted_Willing_to_Lend",
        boundaries: [0.002730, 0.009475, 0.012500, 0.017434, 0.064409],
        colors: ["#dcc4ff", "#ba8aff", "#954dff", "#6800ff"],
        value_kind: ValueKind::Percentage,
    },
    MetricDefinition {
        id: MetricId::AmountOwedByOthers,
        name: "Amount Owed by Others",
        description: "How much money the average person in a given area is likely to be owed \
                      by friends, businesses, or others",
        title: "Amount Owed by Others",
        property: "weighted_Amount_Willing_to_Lend",
        boundaries: [689.999309, 1352.286746, 1766.829105, 2504.259972, 12411.070516],
        colors: ["#e5baff", "#cf82ff", "#ba4aff", "#9d00ff"],
        value_kind: ValueKind::Currency,
    },
];

/// Buckets `value` by the p25/p50/p75 cut points. Intervals are closed on
/// the upper end, so a value equal to a quartile lands in the lower class.
/// `boundaries[0]` and `boundaries[4]` are never compared against.
pub fn classify(value: f64, boundaries: &[f64; 5]) -> usize {
    if value <= boundaries[1] {
        0
    } else if value <= boundaries[2] {
        1
    } else if value <= boundaries[3] {
        2
    } else {
        3
    }
}

/// Stroke and fill applied to one feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureStyle {
    pub stroke_color: &'static str,
    pub fill_color: &'static str,
    pub class: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

/// Titled legend with one entry per class, lowest class first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Legend {
    pub title: &'static str,
    pub entries: [LegendEntry; CLASS_COUNT],
}

impl MetricDefinition {
    pub fn classify(&self, value: f64) -> usize {
        classify(value, &self.boundaries)
    }

    pub fn style(&self, value: f64) -> FeatureStyle {
        let class = self.classify(value);
        FeatureStyle {
            stroke_color: STROKE_COLOR,
            fill_color: self.colors[class],
            class,
        }
    }

    /// Legend for this metric. Class `i` is labelled with the interval
    /// `(boundaries[i], boundaries[i + 1]]`.
    pub fn legend(&self) -> Legend {
        let entries = std::array::from_fn(|class| LegendEntry {
            label: self.range_label(self.boundaries[class], self.boundaries[class + 1]),
            color: self.colors[class],
        });
        Legend { title: self.title, entries }
    }

    fn range_label(&self, low: f64, high: f64) -> String {
        match self.value_kind {
            ValueKind::Percentage => {
                format!("{} to {}", format_percentage(low), format_percentage(high))
            }
            ValueKind::Currency => {
                format!("${} to ${}", low.round() as i64, high.round() as i64)
            }
        }
    }
}

/// `0.198014` -> `"19.8"`: scaled by 100, two decimals, trailing zeros dropped.
fn format_percentage(share: f64) -> String {
    let fixed = format!("{:.2}", share * 100.0);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_definitions_are_indexed_by_id() {
        for id in MetricId::ALL {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn test_boundaries_are_non_decreasing() {
        for def in &METRICS {
            assert!(def.boundaries.windows(2).all(|w| w[0] <= w[1]), "{}", def.name);
        }
    }

    #[test]
    fn test_ties_fall_into_lower_class() {
        for def in &METRICS {
            let b = def.boundaries;
            assert_eq!(def.classify(b[1]), 0);
            assert_eq!(def.classify(b[2]), 1);
            assert_eq!(def.classify(b[3]), 2);
            assert_eq!(def.classify(b[4]), 3);
        }
    }

    #[test]
    fn test_just_above_quartile_moves_up() {
        for def in &METRICS {
            let b = def.boundaries;
            for (cut, expected) in [(b[1], 1), (b[2], 2), (b[3], 3)] {
                let above = cut + cut.abs() * 1e-9;
                assert_eq!(def.classify(above), expected, "{} above {}", def.name, cut);
                assert_eq!(def.classify(f64::from_bits(cut.to_bits() + 1)), expected);
            }
        }
    }

    #[test]
    fn test_out_of_range_values_use_extreme_classes() {
        for def in &METRICS {
            assert_eq!(def.classify(def.boundaries[0] - 1.0), 0);
            assert_eq!(def.classify(-1.0e12), 0);
            assert_eq!(def.classify(def.boundaries[4] * 10.0), 3);
            assert_eq!(def.classify(f64::INFINITY), 3);
        }
    }

    #[test]
    fn test_classes_match_interval_membership() {
        let mut rng = rand::rng();
        for def in &METRICS {
            let b = def.boundaries;
            let span = b[4] - b[0];
            for _ in 0..2_000 {
                let v = rng.random_range((b[0] - span)..(b[4] + span));
                let class = def.classify(v);
                let inside = [
                    v <= b[1],
                    b[1] < v && v <= b[2],
                    b[2] < v && v <= b[3],
                    b[3] < v,
                ];
                assert_eq!(inside.iter().filter(|hit| **hit).count(), 1);
                assert!(inside[class], "{} classified {v} as {class}", def.name);
            }
        }
    }

    #[test]
    fn test_emergency_borrowing_scenario() {
        let boundaries = [0.1144, 0.1980, 0.2262, 0.2572, 0.4410];
        assert_eq!(classify(0.20, &boundaries), 1);

        let def = MetricId::EmergencyBorrowing.definition();
        assert_eq!(def.classify(0.20), 1);
        let legend = def.legend();
        assert_eq!(legend.entries[0].label, "11.44 to 19.8");
        assert_eq!(legend.title, "Emergency Borrowing (%)");
    }

    #[test]
    fn test_currency_labels() {
        let legend = MetricId::AmountOwedByOthers.definition().legend();
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            ["$690 to $1352", "$1352 to $1767", "$1767 to $2504", "$2504 to $12411"]
        );
    }

    #[test]
    fn test_percentage_labels() {
        let legend = MetricId::EmergencyBorrowing.definition().legend();
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            ["11.44 to 19.8", "19.8 to 22.62", "22.62 to 25.72", "25.72 to 44.1"]
        );
    }

    #[test]
    fn test_legend_is_ascending_and_uses_color_table() {
        for def in &METRICS {
            let legend = def.legend();
            let lows: Vec<f64> = legend
                .entries
                .iter()
                .map(|e| {
                    let low = e.label.split(" to ").next().unwrap_or_default();
                    low.trim_start_matches('$').parse::<f64>().unwrap()
                })
                .collect();
            assert!(lows.windows(2).all(|w| w[0] <= w[1]), "{}", def.name);
            for (entry, color) in legend.entries.iter().zip(def.colors) {
                assert_eq!(entry.color, color);
            }
        }
    }

    #[test]
    fn test_style_has_constant_stroke() {
        for def in &METRICS {
            for v in def.boundaries {
                let style = def.style(v);
                assert_eq!(style.stroke_color, "black");
                assert_eq!(style.fill_color, def.colors[style.class]);
            }
        }
    }

    #[test]
    fn test_parse_metric_names() {
        assert_eq!("amount-owed".parse::<MetricId>(), Ok(MetricId::AmountOwedByOthers));
        assert_eq!("emergency borrowing".parse::<MetricId>(), Ok(MetricId::EmergencyBorrowing));
        assert_eq!(
            "income".parse::<MetricId>(),
            Err(SelectionError::UnknownMetric("income".to_string()))
        );
    }

    #[test]
    fn test_format_percentage_trims_zeros() {
        assert_eq!(format_percentage(0.2), "20");
        assert_eq!(format_percentage(0.441033), "44.1");
        assert_eq!(format_percentage(0.002730), "0.27");
    }
}
