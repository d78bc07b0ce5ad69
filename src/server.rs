use crate::config::{AppConfig, StyleConfig, ViewportMode};
use crate::plotly::Figure;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::{Html, Json},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Everything a request needs, built once before serving starts.
pub struct AppState {
    pub page: String,
    pub figure: serde_json::Value,
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
<style>
html, body { margin: 0; padding: 0; }
#map { width: 100%; height: __HEIGHT__; }
@media (max-width: __HIDE_BELOW__px) { #map .modebar { display: none; } }
</style>
</head>
<body>
<div id="map"></div>
<script>
fetch("figure.json")
  .then((resp) => resp.json())
  .then((fig) =>
    Plotly.newPlot("map", fig.data, fig.layout, { responsive: true })
      .then((gd) => Plotly.addFrames(gd, fig.frames)));
</script>
</body>
</html>
"#;

/// Render the single page that mounts the figure.
///
/// The toolbar (modebar) is hidden below the configured breakpoint and
/// shown at or above it; the viewport mode picks the map height.
pub fn render_page(title: &str, style: &StyleConfig) -> String {
    let height = match style.viewport {
        ViewportMode::Full => "100vh".to_string(),
        ViewportMode::Fixed => format!("{}px", style.height),
    };
    let hide_below = style.toolbar_breakpoint_px.saturating_sub(1);

    PAGE_TEMPLATE
        .replace("__TITLE__", title)
        .replace("__HEIGHT__", &height)
        .replace("__HIDE_BELOW__", &hide_below.to_string())
}

pub async fn start_server(config: AppConfig, figure: Figure) -> Result<()> {
    let figure = serde_json::to_value(&figure).context("Failed to serialize figure")?;

    let state = Arc::new(AppState {
        page: render_page(&config.figure.title, &config.style),
        figure,
    });

    let addr = config.server.bind_addr()?;
    println!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/", get(page_handler))
        .route("/figure.json", get(figure_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn page_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn figure_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.figure.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_hides_toolbar_below_breakpoint() {
        let page = render_page("Outage map", &StyleConfig::default());

        assert!(page.contains("@media (max-width: 767px)"));
        assert!(page.contains(".modebar { display: none; }"));
        assert!(page.contains("<title>Outage map</title>"));
    }

    #[test]
    fn test_viewport_mode_picks_map_height() {
        let full = StyleConfig {
            viewport: ViewportMode::Full,
            ..StyleConfig::default()
        };
        assert!(render_page("t", &full).contains("height: 100vh"));

        let fixed = StyleConfig {
            viewport: ViewportMode::Fixed,
            height: 600,
            ..StyleConfig::default()
        };
        assert!(render_page("t", &fixed).contains("height: 600px"));
    }

    #[test]
    fn test_custom_breakpoint_lands_in_the_media_rule() {
        let style = StyleConfig {
            toolbar_breakpoint_px: 1024,
            ..StyleConfig::default()
        };
        assert!(render_page("t", &style).contains("@media (max-width: 1023px)"));
    }

    #[tokio::test]
    async fn test_figure_endpoint_serves_the_built_figure() {
        let state = Arc::new(AppState {
            page: String::new(),
            figure: json!({ "data": [], "frames": [] }),
        });

        let Json(value) = figure_handler(State(state)).await;
        assert_eq!(value["data"], json!([]));
    }
}
