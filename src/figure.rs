use crate::config::{AppConfig, FigureConfig, ViewportMode};
use crate::plotly::{
    Annotation, Button, ChoroplethMarker, ChoroplethTrace, Colorbar, ColorbarTitle, CurrentValue,
    Figure, Font, Frame, FrameLayout, Layout, LayoutImage, MapCenter, Mapbox, Margin, MarkerLine,
    Pad, ScatterMarker, ScatterTrace, Slider, SliderStep, Trace, Transition, UpdateMenu,
};
use crate::types::{EventSite, OutageArea, OutageDataset};
use anyhow::{anyhow, Context, Result};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::Rect;
use serde_json::{json, Value};

const AREA_HOVERTEMPLATE: &str = "<b>Postal code:</b> %{customdata[0]}<br>\
                                  <b>Inhabitants affected:</b> %{z}<extra></extra>";
const EVENT_HOVERTEMPLATE: &str = "<b>Reference:</b> %{customdata[0]}<br>\
                                   <b>Date:</b> %{customdata[1]}<br>\
                                   <b>Name:</b> %{customdata[2]}<br>\
                                   <b>Location:</b> %{customdata[3]}<extra></extra>";

/// Frame advance interval while playing, in milliseconds.
const FRAME_DURATION_MS: u32 = 1000;

/// Assemble the complete animated figure from the loaded dataset.
///
/// Pure single-pass build: the result is immutable and any inconsistency
/// (no timestamps, no geometry, a label without an aggregate) is an error
/// here rather than broken display text later.
pub fn build_figure(config: &AppConfig, dataset: &OutageDataset) -> Result<Figure> {
    println!(
        "Assembling figure: {} areas, {} events, {} timestamps",
        dataset.areas.len(),
        dataset.events.len(),
        dataset.timestamps.len()
    );

    let first = dataset
        .timestamps
        .first()
        .ok_or_else(|| anyhow!("No timestamps configured"))?;
    let center = map_center(&dataset.areas)?;

    let indexed: Vec<(usize, &OutageArea)> = dataset.areas.iter().enumerate().collect();

    let base = choropleth_trace(&config.figure, &indexed)
        .context("Failed to build the base choropleth layer")?;
    let overlay = events_trace(&config.figure, &dataset.events);

    // One frame per label, ascending; `timestamps` is already sorted.
    let mut frames = Vec::with_capacity(dataset.timestamps.len());
    for timestamp in &dataset.timestamps {
        let subset: Vec<(usize, &OutageArea)> = indexed
            .iter()
            .filter(|(_, area)| &area.timestamp == timestamp)
            .cloned()
            .collect();
        let total = aggregate_for(dataset, timestamp)?;

        frames.push(Frame {
            name: timestamp.clone(),
            data: vec![choropleth_trace(&config.figure, &subset)
                .with_context(|| format!("Failed to build the frame for {}", timestamp))?],
            layout: FrameLayout {
                annotations: vec![total_annotation(&config.figure.heading, total)],
            },
        });
    }

    let initial_total = aggregate_for(dataset, first)?;
    let height = match config.style.viewport {
        ViewportMode::Fixed => Some(config.style.height),
        ViewportMode::Full => None,
    };

    let layout = Layout {
        mapbox: Mapbox {
            style: config.figure.map_style.clone(),
            center,
            zoom: config.figure.zoom,
        },
        height,
        margin: Margin { l: 0, r: 0, t: 0, b: 0 },
        annotations: vec![total_annotation(&config.figure.heading, initial_total)],
        updatemenus: vec![play_pause_menu()],
        sliders: vec![timestamp_slider(&dataset.timestamps)],
        images: logo_images(&config.figure),
    };

    Ok(Figure {
        data: vec![base, overlay],
        layout,
        frames,
    })
}

fn aggregate_for(dataset: &OutageDataset, timestamp: &str) -> Result<u64> {
    dataset
        .totals
        .get(timestamp)
        .copied()
        .ok_or_else(|| anyhow!("No aggregate computed for timestamp {}", timestamp))
}

/// Choropleth trace over the given rows, keyed by global row index.
///
/// Every trace carries the same colorscale, bounds and colorbar, so color
/// meaning stays comparable across the base layer and all frames.
fn choropleth_trace(figure: &FigureConfig, rows: &[(usize, &OutageArea)]) -> Result<Trace> {
    let locations = rows.iter().map(|(id, _)| *id as u64).collect();
    let z = rows.iter().map(|(_, area)| area.inhabitants).collect();
    let customdata = rows
        .iter()
        .map(|(_, area)| json!([area.postcode, area.inhabitants]))
        .collect();

    Ok(Trace::Choroplethmapbox(ChoroplethTrace {
        geojson: feature_collection(rows)?,
        locations,
        z,
        colorscale: figure.colorscale.clone(),
        zmin: 0,
        zmax: figure.ceiling,
        featureidkey: "id".to_string(),
        marker: ChoroplethMarker {
            opacity: figure.opacity,
            line: MarkerLine { width: 0.0 },
        },
        customdata,
        hovertemplate: AREA_HOVERTEMPLATE.to_string(),
        hoverinfo: "text".to_string(),
        colorbar: Some(colorbar(figure)),
    }))
}

/// Static overlay of event markers. Lives only in the base trace list and
/// is never part of a frame, so it persists unchanged across animation.
fn events_trace(figure: &FigureConfig, events: &[EventSite]) -> Trace {
    Trace::Scattermapbox(ScatterTrace {
        lat: events.iter().map(|e| e.point.y()).collect(),
        lon: events.iter().map(|e| e.point.x()).collect(),
        mode: "markers".to_string(),
        marker: ScatterMarker {
            size: figure.marker_size,
            color: figure.marker_color.clone(),
        },
        name: "Event locations".to_string(),
        customdata: events
            .iter()
            .map(|e| json!([e.reference, e.date, e.name, e.location]))
            .collect(),
        hovertemplate: EVENT_HOVERTEMPLATE.to_string(),
        hoverinfo: "text".to_string(),
    })
}

/// GeoJSON FeatureCollection whose feature ids are the global row indices,
/// matching the trace `locations` through `featureidkey` "id".
fn feature_collection(rows: &[(usize, &OutageArea)]) -> Result<Value> {
    let features = rows
        .iter()
        .map(|(id, area)| geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&area.geometry))),
            id: Some(geojson::feature::Id::Number((*id as u64).into())),
            properties: None,
            foreign_members: None,
        })
        .collect();

    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    serde_json::to_value(collection).context("Failed to serialize feature collection")
}

fn total_annotation(heading: &str, total: u64) -> Annotation {
    Annotation {
        text: format!("<b>{}<br>{}</b>", heading, format_thousands(total)),
        x: 0.5,
        y: 0.99,
        xref: "paper".to_string(),
        yref: "paper".to_string(),
        showarrow: false,
        font: Font {
            size: 30,
            color: "white".to_string(),
        },
        bgcolor: "rgba(0, 0, 0, 0.7)".to_string(),
        borderpad: 10,
    }
}

fn colorbar(figure: &FigureConfig) -> Colorbar {
    Colorbar {
        orientation: "h".to_string(),
        x: 0.9,
        y: 0.85,
        thickness: 10,
        len: 0.2,
        bgcolor: "rgba(255,255,255,0.6)".to_string(),
        title: ColorbarTitle {
            text: figure.colorbar_title.clone(),
            side: "top".to_string(),
        },
    }
}

fn play_pause_menu() -> UpdateMenu {
    UpdateMenu {
        kind: "buttons".to_string(),
        buttons: vec![
            Button {
                label: "Play".to_string(),
                method: "animate".to_string(),
                args: json!([
                    null,
                    {
                        "frame": { "duration": FRAME_DURATION_MS, "redraw": true },
                        "fromcurrent": true
                    }
                ]),
            },
            Button {
                label: "Pause".to_string(),
                method: "animate".to_string(),
                args: json!([
                    [null],
                    {
                        "frame": { "duration": 0, "redraw": true },
                        "mode": "immediate"
                    }
                ]),
            },
        ],
        direction: "left".to_string(),
        pad: Pad {
            r: Some(10),
            t: Some(10),
            b: None,
        },
        showactive: false,
        x: 0.1,
        xanchor: "right".to_string(),
        y: 0.05,
        yanchor: "bottom".to_string(),
    }
}

/// One clickable step per timestamp; selecting a step jumps to its frame
/// immediately, so colors, annotation and slider position switch together.
fn timestamp_slider(timestamps: &[String]) -> Slider {
    let steps = timestamps
        .iter()
        .map(|timestamp| SliderStep {
            label: timestamp.clone(),
            method: "animate".to_string(),
            args: json!([
                [timestamp],
                {
                    "frame": { "duration": 0, "redraw": true },
                    "mode": "immediate"
                }
            ]),
        })
        .collect();

    Slider {
        active: 0,
        steps,
        x: 0.5,
        y: 0.05,
        len: 0.7,
        xanchor: "center".to_string(),
        yanchor: "bottom".to_string(),
        pad: Pad {
            r: None,
            t: Some(10),
            b: Some(10),
        },
        currentvalue: CurrentValue {
            font: Font {
                size: 36,
                color: "black".to_string(),
            },
            prefix: "Current time: ".to_string(),
            visible: true,
        },
        transition: Transition { duration: 0 },
        bgcolor: "rgba(0, 0, 0, 0.7)".to_string(),
        bordercolor: "black".to_string(),
        borderwidth: 2,
        font: Font {
            size: 14,
            color: "black".to_string(),
        },
    }
}

fn logo_images(figure: &FigureConfig) -> Vec<LayoutImage> {
    match &figure.logo_url {
        Some(url) => vec![LayoutImage {
            source: url.clone(),
            x: 0.13,
            y: 0.84,
            xanchor: "right".to_string(),
            yanchor: "bottom".to_string(),
            sizex: 0.15,
            sizey: 0.15,
        }],
        None => vec![],
    }
}

/// Map center from the combined extent of all snapshot geometry.
fn map_center(areas: &[OutageArea]) -> Result<MapCenter> {
    let mut overall: Option<Rect<f64>> = None;

    for area in areas {
        if let Some(rect) = area.geometry.bounding_rect() {
            overall = Some(match overall {
                Some(acc) => Rect::new(
                    geo::Coord {
                        x: acc.min().x.min(rect.min().x),
                        y: acc.min().y.min(rect.min().y),
                    },
                    geo::Coord {
                        x: acc.max().x.max(rect.max().x),
                        y: acc.max().y.max(rect.max().y),
                    },
                ),
                None => rect,
            });
        }
    }

    let overall = overall
        .ok_or_else(|| anyhow!("No snapshot geometry loaded; cannot determine the map center"))?;

    Ok(MapCenter {
        lat: (overall.min().y + overall.max().y) / 2.0,
        lon: (overall.min().x + overall.max().x) / 2.0,
    })
}

/// Group digits in threes from the right: 12345 -> "12,345".
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
