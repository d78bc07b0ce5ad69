//! Typed model of the Plotly figure JSON consumed by plotly.js.
//!
//! Only the surface this app emits is modeled. Heterogeneous `animate`
//! argument arrays keep `serde_json::Value` since their element types vary
//! by position.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choroplethmapbox(ChoroplethTrace),
    Scattermapbox(ScatterTrace),
}

/// Polygon layer colored by a per-row value joined through feature ids.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace {
    /// GeoJSON FeatureCollection whose feature ids match `locations`.
    pub geojson: Value,
    pub locations: Vec<u64>,
    pub z: Vec<u64>,
    pub colorscale: String,
    pub zmin: u64,
    pub zmax: u64,
    pub featureidkey: String,
    pub marker: ChoroplethMarker,
    pub customdata: Vec<Value>,
    pub hovertemplate: String,
    pub hoverinfo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<Colorbar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethMarker {
    pub opacity: f64,
    pub line: MarkerLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Colorbar {
    pub orientation: String,
    pub x: f64,
    pub y: f64,
    pub thickness: u32,
    pub len: f64,
    pub bgcolor: String,
    pub title: ColorbarTitle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorbarTitle {
    pub text: String,
    pub side: String,
}

/// Point marker layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub mode: String,
    pub marker: ScatterMarker,
    pub name: String,
    pub customdata: Vec<Value>,
    pub hovertemplate: String,
    pub hoverinfo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterMarker {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub mapbox: Mapbox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub margin: Margin,
    pub annotations: Vec<Annotation>,
    pub updatemenus: Vec<UpdateMenu>,
    pub sliders: Vec<Slider>,
    pub images: Vec<LayoutImage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    pub style: String,
    pub center: MapCenter,
    pub zoom: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub showarrow: bool,
    pub font: Font,
    pub bgcolor: String,
    pub borderpad: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: String,
    pub buttons: Vec<Button>,
    pub direction: String,
    pub pad: Pad,
    pub showactive: bool,
    pub x: f64,
    pub xanchor: String,
    pub y: f64,
    pub yanchor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub label: String,
    pub method: String,
    pub args: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Slider {
    pub active: u32,
    pub steps: Vec<SliderStep>,
    pub x: f64,
    pub y: f64,
    pub len: f64,
    pub xanchor: String,
    pub yanchor: String,
    pub pad: Pad,
    pub currentvalue: CurrentValue,
    pub transition: Transition,
    pub bgcolor: String,
    pub bordercolor: String,
    pub borderwidth: u32,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    pub args: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentValue {
    pub font: Font,
    pub prefix: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutImage {
    pub source: String,
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    pub yanchor: String,
    pub sizex: f64,
    pub sizey: f64,
}

/// One animation state: replacement trace data plus replacement annotations.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
    pub layout: FrameLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameLayout {
    pub annotations: Vec<Annotation>,
}
