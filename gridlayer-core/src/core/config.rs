//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub layer: LayerCfg,
    pub view: Option<ViewCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LayerCfg {
    pub id: String,
    /// Grid projection (identity, EPSG:3857, EPSG:4326). Default: map projection
    pub projection: Option<String>,
    /// Grid line style, merged with the default symbol
    pub symbol: Option<Value>,
    /// Altitude of all grids in meters
    pub altitude: Option<f64>,
    /// Pass debug flag to label painters
    #[serde(default)]
    pub debug: bool,
    #[serde(rename = "grid", default)]
    pub grids: Vec<GridCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GridCfg {
    /// Anchor of cell (0, 0)
    pub center: (f64, f64),
    /// Cell width in grid units
    pub width: f64,
    /// Cell height in grid units
    pub height: f64,
    /// projection: projected distance, meter: geographic distance, degree: coordinate offset
    pub unit: Option<String>,
    pub altitude: Option<f64>,
    /// Column limits in cell edge multiples. Default: unbounded
    pub cols: Option<BoundsCfg>,
    pub rows: Option<BoundsCfg>,
    #[serde(default)]
    pub data: Vec<DataCellCfg>,
}

/// `[lo, hi]` or `{ min = lo, max = hi }` with optional sides
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum BoundsCfg {
    Pair(i64, i64),
    Table { min: Option<i64>, max: Option<i64> },
}

impl BoundsCfg {
    pub fn limits(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            BoundsCfg::Pair(lo, hi) => (Some(lo), Some(hi)),
            BoundsCfg::Table { min, max } => (min, max),
        }
    }
}

/// A single index or an inclusive `[from, to]` range
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RangeCfg {
    Single(i64),
    Span(i64, i64),
}

impl RangeCfg {
    pub fn span(&self) -> (i64, i64) {
        match *self {
            RangeCfg::Single(idx) => (idx, idx),
            RangeCfg::Span(from, to) => (from, to),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct DataCellCfg {
    pub cols: RangeCfg,
    pub rows: RangeCfg,
    pub properties: Option<Value>,
    pub symbol: Option<Value>,
}

/// Reference view used by the command line tools
#[derive(Deserialize, Clone, Debug)]
pub struct ViewCfg {
    pub center: (f64, f64),
    pub zoom: f64,
    #[serde(default = "default_view_size")]
    pub width: u32,
    #[serde(default = "default_view_size")]
    pub height: u32,
    #[serde(default)]
    pub pitch: f64,
    pub projection: Option<String>,
}

pub fn default_view_size() -> u32 {
    512
}

pub const DEFAULT_CONFIG: &'static str = r##"
[layer]
id = "grid"
#projection = "EPSG:3857"
#altitude = 0.0

[layer.symbol]
lineColor = "#bbb"
lineWidth = 1
lineOpacity = 1

[[layer.grid]]
center = [0.0, 0.0]
width = 100.0
height = 100.0
unit = "projection"
#cols = [-5, 5]
#rows = { min = -5 }

[[layer.grid.data]]
cols = [2, 4]
rows = 5
properties = { name = "A" }
symbol = { polygonFill = "#f00", polygonOpacity = 0.5, textName = "{name}" }

[view]
center = [0.0, 0.0]
zoom = 17.0
width = 512
height = 512
"##;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").map_err(|e| e.to_string())?;
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| match e.source() {
        Some(source) => format!("Template error: {}", source),
        None => format!("Template error: {}", e),
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
