use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub figure: FigureConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub snapshots: Vec<SnapshotInput>,
    pub events: PathBuf,
    /// Source CRS of the events file, required when it is a Shapefile.
    pub events_crs: Option<String>,
    #[serde(default = "default_postcode_property")]
    pub postcode_property: String,
    #[serde(default = "default_inhabitants_property")]
    pub inhabitants_property: String,
    #[serde(default = "default_reference_property")]
    pub reference_property: String,
    #[serde(default = "default_date_property")]
    pub date_property: String,
    #[serde(default = "default_name_property")]
    pub name_property: String,
    #[serde(default = "default_location_property")]
    pub location_property: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotInput {
    pub path: PathBuf,
    /// Timestamp label, e.g. "09:30". Never inferred from the file.
    pub timestamp: String,
    /// Source CRS, e.g. "EPSG:28992". Required for Shapefiles.
    pub crs: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FigureConfig {
    pub title: String,
    /// Heading of the running-total annotation.
    pub heading: String,
    pub colorbar_title: String,
    pub colorscale: String,
    /// Color scale saturation ceiling; counts above it clamp visually.
    pub ceiling: u64,
    pub map_style: String,
    pub zoom: f64,
    pub opacity: f64,
    pub marker_size: u32,
    pub marker_color: String,
    pub logo_url: Option<String>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            title: "Power outage map".to_string(),
            heading: "Inhabitants affected by power outage:".to_string(),
            colorbar_title: "Inhabitants per postal code".to_string(),
            colorscale: "Turbo".to_string(),
            ceiling: 10_000,
            map_style: "open-street-map".to_string(),
            zoom: 11.0,
            opacity: 0.7,
            marker_size: 10,
            marker_color: "red".to_string(),
            logo_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMode {
    /// Map fills the browser viewport; no fixed figure height.
    Full,
    /// Fixed pixel height from `height`.
    Fixed,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleConfig {
    pub viewport: ViewportMode,
    pub height: u32,
    /// Chart toolbar is hidden below this screen width.
    pub toolbar_breakpoint_px: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportMode::Full,
            height: 800,
            toolbar_breakpoint_px: 768,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Bind address, with `HOST` / `PORT` environment overrides applied.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let host = match env::var("HOST") {
            Ok(v) if !v.is_empty() => v,
            _ => self.host.clone(),
        };
        let port = match env::var("PORT") {
            Ok(v) if !v.is_empty() => v
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", v))?,
            _ => self.port,
        };
        let ip: IpAddr = host
            .parse()
            .with_context(|| format!("Invalid bind host: {}", host))?;
        Ok(SocketAddr::new(ip, port))
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

fn default_postcode_property() -> String {
    "postcode".to_string()
}

fn default_inhabitants_property() -> String {
    "aantalInwoners".to_string()
}

fn default_reference_property() -> String {
    "Referentienummer".to_string()
}

fn default_date_property() -> String {
    "Datum".to_string()
}

fn default_name_property() -> String {
    "Naam".to_string()
}

fn default_location_property() -> String {
    "Lokatie".to_string()
}
