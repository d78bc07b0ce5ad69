use geo::{MultiPolygon, Point};
use std::collections::BTreeMap;

/// One postal-code polygon from one outage snapshot, in WGS 84.
#[derive(Debug, Clone)]
pub struct OutageArea {
    pub postcode: String,
    pub inhabitants: u64,
    /// Timestamp label of the snapshot this row came from, e.g. "09:30".
    pub timestamp: String,
    pub geometry: MultiPolygon<f64>,
}

/// One reported event site, in WGS 84. Not time-varying.
#[derive(Debug, Clone)]
pub struct EventSite {
    pub reference: String,
    pub date: String,
    pub name: String,
    pub location: String,
    pub point: Point<f64>,
}

/// All snapshots concatenated in configuration order, plus the events.
///
/// Row position in `areas` is the join key between polygon geometry and
/// plotted values downstream, so the order must not change after loading.
#[derive(Debug, Clone)]
pub struct OutageDataset {
    pub areas: Vec<OutageArea>,
    pub events: Vec<EventSite>,
    /// Distinct timestamp labels, ascending.
    pub timestamps: Vec<String>,
    /// Total affected inhabitants per timestamp label.
    pub totals: BTreeMap<String, u64>,
}
