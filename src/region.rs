use std::fmt;

use geo::Coord;

use crate::error::SelectionError;

/// State FIPS code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u8);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// What the region control selects: every feature, or one state's features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionSelector {
    WholeArea,
    Region(RegionId),
}

impl RegionSelector {
    pub fn zoom_class(self) -> ZoomClass {
        match self {
            RegionSelector::WholeArea => ZoomClass::WholeArea,
            RegionSelector::Region(id) if LARGE_REGIONS.contains(&id.0) => ZoomClass::Large,
            RegionSelector::Region(id) if SMALL_REGIONS.contains(&id.0) => ZoomClass::Small,
            RegionSelector::Region(_) => ZoomClass::Default,
        }
    }
}

/// Geographically large states, shown one step coarser than usual.
const LARGE_REGIONS: [u8; 3] = [2, 6, 48];
/// Geographically small states, shown one step finer than usual.
const SMALL_REGIONS: [u8; 11] = [10, 11, 23, 24, 25, 33, 34, 36, 44, 50, 54];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomClass {
    WholeArea,
    Large,
    Default,
    Small,
}

impl ZoomClass {
    /// Web-map zoom level.
    pub fn zoom(self) -> u8 {
        match self {
            ZoomClass::WholeArea => 4,
            ZoomClass::Large => 5,
            ZoomClass::Default => 6,
            ZoomClass::Small => 7,
        }
    }
}

/// Where the map looks: centre (`x` = longitude, `y` = latitude) and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Coord<f64>,
    pub zoom: u8,
}

#[derive(Debug)]
pub struct RegionEntry {
    pub name: &'static str,
    pub selector: RegionSelector,
    pub center: Coord<f64>,
}

impl RegionEntry {
    pub fn viewport(&self) -> Viewport {
        Viewport { center: self.center, zoom: self.selector.zoom_class().zoom() }
    }
}

macro_rules! region {
    ($name:literal, whole, $lat:literal, $lon:literal) => {
        RegionEntry {
            name: $name,
            selector: RegionSelector::WholeArea,
            center: Coord { x: $lon, y: $lat },
        }
    };
    ($name:literal, $fips:literal, $lat:literal, $lon:literal) => {
        RegionEntry {
            name: $name,
            selector: RegionSelector::Region(RegionId($fips)),
            center: Coord { x: $lon, y: $lat },
        }
    };
}

/// Selector entries in display order; the whole-area entry comes first and
/// is the default.
pub static REGIONS: [RegionEntry; 52] = [
    region!("United States", whole, 37.8187, -91.1454),
    region!("Alabama", 1, 32.3182, -86.9023),
    region!("Alaska", 2, 63.5888, -154.4931),
    region!("Arizona", 4, 34.0489, -111.0937),
    region!("Arkansas", 5, 35.2010, -91.8318),
    region!("California", 6, 36.7783, -119.4179),
    region!("Colorado", 8, 39.5501, -105.7821),
    region!("Connecticut", 9, 41.6032, -73.0877),
    region!("Delaware", 10, 38.9108, -75.5277),
    region!("District of Columbia", 11, 38.9072, -77.0369),
    region!("Florida", 12, 27.6648, -81.5158),
    region!("Georgia", 13, 32.1574, -82.9071),
    region!("Hawaii", 15, 19.8987, -155.6659),
    region!("Idaho", 16, 43.6081, -116.5087),
    region!("Indiana", 18, 40.5512, -85.6024),
    region!("Illinois", 17, 40.6331, -89.3985),
    region!("Iowa", 19, 41.8780, -93.0977),
    region!("Kansas", 20, 39.0119, -98.4842),
    region!("Kentucky", 21, 37.8393, -84.2700),
    region!("Louisiana", 22, 30.5191, -91.5209),
    region!("Maine", 23, 45.2538, -69.4455),
    region!("Maryland", 24, 39.0458, -76.6413),
    region!("Massachusetts", 25, 42.4072, -71.3824),
    region!("Michigan", 26, 42.2331, -84.3272),
    region!("Minnesota", 27, 46.7296, -94.6859),
    region!("Mississippi", 28, 32.3547, -89.3985),
    region!("Missouri", 29, 37.9643, -91.8318),
    region!("Montana", 30, 46.8797, -110.3626),
    region!("Nebraska", 31, 41.4925, -99.9018),
    region!("Nevada", 32, 38.8026, -116.4194),
    region!("New Hampshire", 33, 43.1939, -71.5724),
    region!("New Jersey", 34, 40.0583, -74.4057),
    region!("New Mexico", 35, 34.9727, -105.0324),
    region!("New York", 36, 40.7128, -74.0060),
    region!("North Carolina", 37, 35.7596, -79.0193),
    region!("North Dakota", 38, 47.5515, -101.0020),
    region!("Ohio", 39, 40.4173, -82.9071),
    region!("Oklahoma", 40, 35.0078, -97.0929),
    region!("Oregon", 41, 43.8041, -120.5542),
    region!("Pennsylvania", 42, 41.2033, -77.1945),
    region!("Rhode Island", 44, 41.5801, -71.4774),
    region!("South Carolina", 45, 33.8361, -81.1637),
    region!("South Dakota", 46, 43.9695, -99.9018),
    region!("Tennessee", 47, 35.5175, -86.5804),
    region!("Texas", 48, 31.9686, -99.9018),
    region!("Utah", 49, 40.7607, -111.8939),
    region!("Vermont", 50, 44.5588, -72.5778),
    region!("Virginia", 51, 37.4316, -78.6569),
    region!("Washington", 53, 47.7511, -120.7401),
    region!("West Virginia", 54, 38.5976, -80.4549),
    region!("Wisconsin", 55, 43.7844, -88.7879),
    region!("Wyoming", 56, 43.0760, -107.2903),
];

pub fn default_region() -> &'static RegionEntry {
    &REGIONS[0]
}

/// Resolves a display name, ignoring ASCII case.
pub fn lookup(name: &str) -> Result<&'static RegionEntry, SelectionError> {
    let wanted = name.trim();
    REGIONS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| SelectionError::UnknownRegion(name.to_string()))
}

/// Entry for a selector value, if the directory has one.
pub fn entry_for(selector: RegionSelector) -> Option<&'static RegionEntry> {
    REGIONS.iter().find(|entry| entry.selector == selector)
}
