//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Cell symbols and zoom/property dependent style values

use crate::style::color::{self, Rgba};
use serde_json::{Map, Value};

/// Style properties in camel case notation (`lineColor`, `polygonFill`, ...)
pub type Symbol = Map<String, Value>;

/// Inputs for evaluating function values of a symbol
#[derive(Clone, Copy, Debug)]
pub struct StyleContext<'a> {
    pub zoom: f64,
    pub properties: Option<&'a Value>,
}

impl<'a> StyleContext<'a> {
    pub fn new(zoom: f64, properties: Option<&'a Value>) -> StyleContext<'a> {
        StyleContext { zoom, properties }
    }
    fn property(&self, name: &str) -> Option<&'a Value> {
        self.properties.and_then(|p| p.get(name))
    }
}

pub fn default_symbol() -> Symbol {
    let symbol = json!({
        "lineColor": "#bbb",
        "lineWidth": 1,
        "lineOpacity": 1,
        "lineDasharray": [],
        "lineCap": "butt",
        "lineJoin": "round",
        "polygonOpacity": 0
    });
    match symbol {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `over` entries replace those of `base`
pub fn merge_symbol(base: &Symbol, over: &Symbol) -> Symbol {
    let mut merged = base.clone();
    for (key, value) in over {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Function values are objects with `stops` or an identity `property`
pub fn is_function(value: &Value) -> bool {
    match value {
        Value::Object(obj) => {
            obj.contains_key("stops")
                || (obj.get("type").and_then(Value::as_str) == Some("identity")
                    && obj.contains_key("property"))
        }
        _ => false,
    }
}

/// Evaluate a value, returning plain values unchanged
pub fn evaluate(value: &Value, ctx: &StyleContext) -> Value {
    let func = match value {
        Value::Object(obj) if is_function(value) => obj,
        _ => return value.clone(),
    };
    let default = func.get("default").cloned().unwrap_or(Value::Null);
    let input = match func.get("property").and_then(Value::as_str) {
        Some(name) => match ctx.property(name) {
            Some(v) => v.clone(),
            None => return default,
        },
        None => Value::from(ctx.zoom),
    };
    let empty = Vec::new();
    let stops = func.get("stops").and_then(Value::as_array).unwrap_or(&empty);
    let stops: Vec<(&Value, &Value)> = stops
        .iter()
        .filter_map(|s| match s.as_array() {
            Some(pair) if pair.len() == 2 => Some((&pair[0], &pair[1])),
            _ => None,
        })
        .collect();

    let ftype = func
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_else(|| default_function_type(&input, &stops));
    let result = match ftype {
        "identity" => Some(input.clone()),
        "categorical" => stops
            .iter()
            .find(|(stop_in, _)| **stop_in == input)
            .map(|(_, out)| (*out).clone()),
        "interval" => input.as_f64().and_then(|x| interval(&stops, x)),
        "exponential" => {
            let base = func.get("base").and_then(Value::as_f64).unwrap_or(1.0);
            input.as_f64().and_then(|x| exponential(&stops, x, base))
        }
        _ => None,
    };
    result.unwrap_or(default)
}

fn default_function_type(input: &Value, stops: &[(&Value, &Value)]) -> &'static str {
    if !input.is_number() {
        return "categorical";
    }
    match stops.first() {
        Some((_, out)) if is_interpolatable(out) => "exponential",
        _ => "interval",
    }
}

fn is_interpolatable(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => color::parse_color(s).is_some(),
        Value::Array(arr) => arr.iter().all(Value::is_number),
        _ => false,
    }
}

fn interval(stops: &[(&Value, &Value)], x: f64) -> Option<Value> {
    let (_, first) = stops.first()?;
    let mut out = *first;
    for (stop_in, stop_out) in stops {
        match stop_in.as_f64() {
            Some(v) if v <= x => out = *stop_out,
            _ => break,
        }
    }
    Some(out.clone())
}

fn exponential(stops: &[(&Value, &Value)], x: f64, base: f64) -> Option<Value> {
    let (first_in, first_out) = stops.first()?;
    if x <= first_in.as_f64()? {
        return Some((*first_out).clone());
    }
    for pair in stops.windows(2) {
        let (in0, out0) = pair[0];
        let (in1, out1) = pair[1];
        let (x0, x1) = (in0.as_f64()?, in1.as_f64()?);
        if x <= x1 {
            let t = interpolation_factor(x, x0, x1, base);
            return Some(interpolate_value(out0, out1, t));
        }
    }
    stops.last().map(|(_, out)| (*out).clone())
}

fn interpolation_factor(x: f64, x0: f64, x1: f64, base: f64) -> f64 {
    let range = x1 - x0;
    if range == 0.0 {
        0.0
    } else if base == 1.0 {
        (x - x0) / range
    } else {
        (base.powf(x - x0) - 1.0) / (base.powf(range) - 1.0)
    }
}

fn interpolate_value(a: &Value, b: &Value, t: f64) -> Value {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            json!(a + (b - a) * t)
        }
        (Value::String(sa), Value::String(sb)) => {
            match (color::parse_color(sa), color::parse_color(sb)) {
                (Some(ca), Some(cb)) => Value::String(color::to_css(&color::interpolate(&ca, &cb, t))),
                _ => a.clone(),
            }
        }
        (Value::Array(va), Value::Array(vb)) if va.len() == vb.len() => Value::Array(
            va.iter()
                .zip(vb.iter())
                .map(|(x, y)| interpolate_value(x, y, t))
                .collect(),
        ),
        _ => a.clone(),
    }
}

/// Evaluate all function values of a symbol
pub fn resolve_style(symbol: &Symbol, ctx: &StyleContext) -> ResolvedStyle {
    let resolved = symbol
        .iter()
        .map(|(key, value)| (key.clone(), evaluate(value, ctx)))
        .collect();
    ResolvedStyle(resolved)
}

/// A symbol with all function values evaluated
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ResolvedStyle(pub Symbol);

impl ResolvedStyle {
    pub fn symbol(&self) -> &Symbol {
        &self.0
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
    pub fn color(&self, key: &str) -> Option<Rgba> {
        self.string(key).and_then(color::parse_color)
    }
    pub fn line_color(&self) -> Option<Rgba> {
        self.color("lineColor")
    }
    pub fn line_width(&self) -> f64 {
        self.number("lineWidth").unwrap_or(1.0)
    }
    pub fn line_opacity(&self) -> f64 {
        self.number("lineOpacity").unwrap_or(1.0)
    }
    pub fn line_dasharray(&self) -> Vec<f64> {
        self.get("lineDasharray")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default()
    }
    pub fn line_cap(&self) -> &str {
        self.string("lineCap").unwrap_or("butt")
    }
    pub fn line_join(&self) -> &str {
        self.string("lineJoin").unwrap_or("round")
    }
    pub fn polygon_fill(&self) -> Option<Rgba> {
        self.color("polygonFill")
    }
    pub fn polygon_opacity(&self) -> Option<f64> {
        self.number("polygonOpacity")
    }
    pub fn polygon_pattern_file(&self) -> Option<&str> {
        self.string("polygonPatternFile")
    }
    /// Fill opacity, 1 unless given
    pub fn fill_opacity(&self) -> f64 {
        self.polygon_opacity().unwrap_or(1.0)
    }
    /// Style fills its area with a color or a pattern
    pub fn has_fill(&self) -> bool {
        self.polygon_opacity().map_or(false, |o| o > 0.0)
            || self.get("polygonFill").is_some()
            || self.polygon_pattern_file().is_some()
    }
    /// Style draws markers or texts
    pub fn is_label(&self) -> bool {
        is_label_symbol(&self.0)
    }
    pub fn external_resources(&self) -> Vec<String> {
        external_resources(&self.0)
    }
}

/// Image, text, vector and vector path marker symbols are painted on cell centers
pub fn is_label_symbol(symbol: &Symbol) -> bool {
    let has = |key: &str| symbol.get(key).map_or(false, |v| !v.is_null());
    let marker_type = symbol.get("markerType").and_then(Value::as_str);
    has("markerFile")
        || has("textName")
        || (marker_type == Some("path") && has("markerPath"))
        || (marker_type.is_some() && marker_type != Some("path"))
}

const RESOURCE_KEYS: &[&str] = &["markerFile", "polygonPatternFile", "linePatternFile"];

/// External files referenced by a symbol, `url(...)` unwrapped
pub fn external_resources(symbol: &Symbol) -> Vec<String> {
    let mut resources = Vec::new();
    for key in RESOURCE_KEYS {
        if let Some(url) = symbol.get(*key).and_then(Value::as_str) {
            let url = url.trim();
            let url = if url.starts_with("url(") && url.ends_with(')') {
                url[4..url.len() - 1].trim_matches(|c: char| c == '\'' || c == '"')
            } else {
                url
            };
            if !url.is_empty() && !resources.iter().any(|r| r == url) {
                resources.push(url.to_string());
            }
        }
    }
    resources
}

/// Label symbols are placed on points without outline or fill
pub fn label_placement_symbol(symbol: &Symbol) -> Symbol {
    let mut label = symbol.clone();
    label.insert("markerPlacement".to_string(), json!("point"));
    label.insert("textPlacement".to_string(), json!("point"));
    label.insert("lineOpacity".to_string(), json!(0));
    label.insert("polygonOpacity".to_string(), json!(0));
    label
}
