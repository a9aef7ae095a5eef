//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::style::symbol::Symbol;
use serde_json;
use std;
use toml::map::Map;
use toml::Value::{self, Array, Boolean, Datetime, Float, Integer, String, Table};

/// Convert a symbol from TOML to its JSON form.
///
/// Function stops can be written as tables: `stops = [{ in = 0, out = "blue" }]`
pub fn toml_to_json(toml: &toml::Value) -> serde_json::Value {
    TomlConverter::new().convert_value(toml)
}

/// Convert a TOML symbol table
pub fn toml_to_symbol(toml: &toml::Value) -> Result<Symbol, std::string::String> {
    match toml_to_json(toml) {
        serde_json::Value::Object(symbol) => Ok(symbol),
        other => Err(format!("Symbol must be a table, found `{}`", other)),
    }
}

/// Pretty printed JSON of a TOML symbol
pub fn toml_symbol_to_json_string(toml: &toml::Value) -> Result<std::string::String, std::string::String> {
    serde_json::to_string_pretty(&toml_to_json(toml)).map_err(|e| e.to_string())
}

struct TomlConverter;
impl TomlConverter {
    pub fn new() -> TomlConverter {
        TomlConverter
    }

    pub fn convert_value(&self, toml: &toml::Value) -> serde_json::Value {
        match *toml {
            Table(ref value) => self.convert_table(value),
            Array(ref array) => {
                serde_json::Value::Array(array.iter().map(|v| self.convert_value(v)).collect())
            }
            String(ref value) => serde_json::Value::String(value.clone()),
            Integer(value) => serde_json::Value::from(value),
            Float(value) => serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Boolean(value) => serde_json::Value::Bool(value),
            Datetime(ref value) => serde_json::Value::String(value.to_string()),
        }
    }

    pub fn convert_table(&self, table: &Map<std::string::String, Value>) -> serde_json::Value {
        let mut json = serde_json::Map::new();
        for (key, value) in table.iter() {
            if key == "stops" {
                json.insert(key.to_string(), self.convert_stops(value));
            } else {
                json.insert(key.to_string(), self.convert_value(value));
            }
        }
        serde_json::Value::Object(json)
    }

    fn convert_stops(&self, value: &toml::Value) -> serde_json::Value {
        let mut stops = Vec::new();
        if let Array(ref stops_arr) = *value {
            for stop in stops_arr.iter() {
                match *stop {
                    Table(ref stops_tbl) => {
                        if let Some(input) = stops_tbl.get("in") {
                            let mut pair = vec![self.convert_value(input)];
                            if let Some(output) = stops_tbl.get("out") {
                                pair.push(self.convert_value(output));
                            }
                            stops.push(serde_json::Value::Array(pair));
                        }
                    }
                    // already in `[in, out]` form
                    Array(_) => stops.push(self.convert_value(stop)),
                    _ => {}
                }
            }
        }
        serde_json::Value::Array(stops)
    }
}

/// Convert a JSON symbol or property value back to TOML.
///
/// Function stops are written as `{ in, out }` tables. Nulls are dropped.
pub fn json_to_toml(json: &serde_json::Value) -> Option<toml::Value> {
    match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(value) => Some(Boolean(*value)),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(value) => Some(Integer(value)),
            None => number.as_f64().map(Float),
        },
        serde_json::Value::String(value) => Some(String(value.clone())),
        serde_json::Value::Array(array) => {
            Some(Array(array.iter().filter_map(json_to_toml).collect()))
        }
        serde_json::Value::Object(object) => {
            let mut table = Map::new();
            for (key, value) in object {
                let value = if key == "stops" {
                    stops_to_toml(value)
                } else {
                    json_to_toml(value)
                };
                if let Some(value) = value {
                    table.insert(key.clone(), value);
                }
            }
            Some(Table(table))
        }
    }
}

fn stops_to_toml(json: &serde_json::Value) -> Option<toml::Value> {
    let stops = json.as_array()?;
    let tables = stops
        .iter()
        .filter_map(|stop| {
            let pair = stop.as_array()?;
            let mut table = Map::new();
            table.insert("in".to_string(), json_to_toml(pair.get(0)?)?);
            if let Some(output) = pair.get(1).and_then(json_to_toml) {
                table.insert("out".to_string(), output);
            }
            Some(Table(table))
        })
        .collect();
    Some(Array(tables))
}

fn toml_key(key: &str) -> std::string::String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        String(key.to_string()).to_string()
    }
}

/// Single line TOML of a value, tables as inline tables
pub fn inline_toml(toml: &toml::Value) -> std::string::String {
    match toml {
        Table(table) => {
            if table.is_empty() {
                return "{}".to_string();
            }
            let entries = table
                .iter()
                .map(|(key, value)| format!("{} = {}", toml_key(key), inline_toml(value)))
                .collect::<Vec<_>>();
            format!("{{ {} }}", entries.join(", "))
        }
        Array(array) => {
            let items = array.iter().map(inline_toml).collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }
        String(value) => {
            let mut quoted = std::string::String::with_capacity(value.len() + 2);
            quoted.push('"');
            for c in value.chars() {
                match c {
                    '"' => quoted.push_str("\\\""),
                    '\\' => quoted.push_str("\\\\"),
                    '\n' => quoted.push_str("\\n"),
                    '\t' => quoted.push_str("\\t"),
                    '\r' => quoted.push_str("\\r"),
                    c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
                    c => quoted.push(c),
                }
            }
            quoted.push('"');
            quoted
        }
        Float(value) => format!("{:?}", value),
        other => other.to_string(),
    }
}
