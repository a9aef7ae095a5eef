//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{parse_config, read_config, ApplicationCfg, BoundsCfg, RangeCfg, DEFAULT_CONFIG};
use crate::core::grid_spec::GridSpec;
use crate::core::layer::GridLayer;
use crate::core::viewport::MapView;
use crate::core::Config;
use cell_grid::{AxisBounds, Projection, Unit};
use std::env;

#[test]
fn test_default_config() {
    let config: ApplicationCfg =
        parse_config(DEFAULT_CONFIG.to_string(), "default.toml").expect("parse_config returned Err");
    assert_eq!(config.layer.id, "grid");
    assert_eq!(config.layer.grids.len(), 1);
    let grid = &config.layer.grids[0];
    assert_eq!(grid.center, (0.0, 0.0));
    assert_eq!(grid.unit, Some("projection".to_string()));
    assert_eq!(grid.data.len(), 1);
    assert_eq!(grid.data[0].cols, RangeCfg::Span(2, 4));
    assert_eq!(grid.data[0].rows, RangeCfg::Single(5));
    let view = config.view.expect("view missing");
    assert_eq!(view.zoom, 17.0);
    assert_eq!(view.width, 512);
    assert_eq!(view.pitch, 0.0);

    let layer = GridLayer::from_config(&config.layer).expect("from_config returned Err");
    assert_eq!(layer.grid_count(), 1);
    assert_eq!(layer.options().symbol["lineColor"], json!("#bbb"));
    // Defaults not in config
    assert_eq!(layer.options().symbol["polygonOpacity"], json!(0));
    let data = &layer.grid(0).unwrap().data[0];
    assert_eq!(data.cols, (2, 4));
    assert_eq!(data.rows, (5, 5));
    assert_eq!(data.properties, Some(json!({"name": "A"})));
    assert!(data.has_symbol());
}

#[test]
fn test_generated_config() {
    let mut toml = GridLayer::gen_config();
    toml.push_str(&MapView::gen_config());
    let config: Result<ApplicationCfg, _> = parse_config(toml, "gen.toml");
    let config = config.expect("generated config invalid");
    let layer = GridLayer::from_config(&config.layer).expect("generated layer invalid");
    assert_eq!(layer.options().symbol["lineColor"], json!("#bbb"));
    let data = &layer.grid(0).unwrap().data[0];
    assert_eq!(data.symbol.as_ref().unwrap()["polygonFill"], json!("#f00"));
    assert!(MapView::from_config(&config.view.unwrap()).is_ok());
}

#[test]
fn test_runtime_config() {
    let toml = r##"
        [layer]
        id = "runtime"
        projection = "EPSG:4326"
        altitude = 12.5
        debug = true

        [layer.symbol]
        lineColor = "#0a0"
        lineWidth = 2

        [[layer.grid]]
        center = [8.5, 47.25]
        width = 250.0
        height = 125.0
        unit = "meter"
        altitude = 3.0
        cols = [-4, 6]
        rows = { max = 3 }

        [[layer.grid.data]]
        cols = [0, 2]
        rows = -1
        properties = { name = "Cell \"A\"", rank = 2 }
        [layer.grid.data.symbol]
        polygonOpacity = 0.5
        [layer.grid.data.symbol.polygonFill]
        property = "rank"
        stops = [{ in = 0, out = "#00f" }, { in = 10, out = "#f00" }]

        [[layer.grid]]
        center = [0.0, 0.0]
        width = 0.5
        height = 0.5
        unit = "degree"
        "##;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    let layer = GridLayer::from_config(&config.layer).unwrap();

    let runtime = layer.gen_runtime_config();
    let config: ApplicationCfg = parse_config(runtime.clone(), "runtime.toml")
        .unwrap_or_else(|e| panic!("{}\n{}", e, runtime));
    let reloaded = GridLayer::from_config(&config.layer).unwrap();

    assert_eq!(reloaded.id, "runtime");
    assert_eq!(reloaded.options().projection, Some(Projection::Wgs84));
    assert_eq!(reloaded.options().altitude, Some(12.5));
    assert!(reloaded.options().debug);
    assert_eq!(reloaded.options().symbol, layer.options().symbol);
    assert_eq!(reloaded.options().symbol["lineColor"], json!("#0a0"));
    assert_eq!(reloaded.grid_count(), 2);

    let grid = reloaded.grid(0).unwrap();
    assert_eq!(grid.center, layer.grid(0).unwrap().center);
    assert_eq!(grid.unit, Unit::Meter);
    assert_eq!(grid.altitude, Some(3.0));
    assert_eq!(grid.cols, AxisBounds::new(Some(-4), Some(6)));
    assert_eq!(grid.rows, AxisBounds::new(None, Some(3)));
    assert_eq!(grid.data, layer.grid(0).unwrap().data);
    assert_eq!(grid.data[0].rows, (-1, -1));
    assert_eq!(
        grid.data[0].symbol.as_ref().unwrap()["polygonFill"]["stops"],
        json!([[0, "#00f"], [10, "#f00"]])
    );

    let grid = reloaded.grid(1).unwrap();
    assert_eq!(grid.width, 0.5);
    assert_eq!(grid.unit, Unit::Degree);
    assert_eq!(grid.altitude, None);
    assert_eq!(grid.cols, AxisBounds::unbounded());
    assert!(grid.data.is_empty());
}

#[test]
fn test_bounds() {
    let toml = r#"
        [layer]
        id = "bounds"
        projection = "identity"

        [[layer.grid]]
        center = [10.0, 20.0]
        width = 5.0
        height = 2.5
        unit = "meter"
        altitude = 30.0
        cols = [-5, 5]
        rows = { min = -2 }
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert!(config.view.is_none());
    assert_eq!(config.layer.grids[0].cols, Some(BoundsCfg::Pair(-5, 5)));
    assert_eq!(
        config.layer.grids[0].rows,
        Some(BoundsCfg::Table {
            min: Some(-2),
            max: None
        })
    );
    let layer = GridLayer::from_config(&config.layer).unwrap();
    assert_eq!(layer.options().projection, Some(Projection::Identity));
    let grid: &GridSpec = layer.grid(0).unwrap();
    assert_eq!(grid.unit, Unit::Meter);
    assert_eq!(grid.altitude, Some(30.0));
    assert_eq!(grid.cols, AxisBounds::new(Some(-5), Some(5)));
    assert_eq!(grid.rows, AxisBounds::new(Some(-2), None));
}

#[test]
fn test_config_errors() {
    let grid_layer = |grid: &str| {
        let toml = format!("[layer]\nid = \"err\"\n[[layer.grid]]\n{}", grid);
        let config: ApplicationCfg = parse_config(toml, "").unwrap();
        GridLayer::from_config(&config.layer).err()
    };
    assert_eq!(
        grid_layer("center = [0.0, 0.0]\nwidth = 1.0\nheight = 1.0\nunit = \"inch\""),
        Some("Layer 'err' grid 0: Unknown grid unit 'inch'".to_string())
    );
    assert_eq!(
        grid_layer("center = [0.0, 0.0]\nwidth = 0.0\nheight = 1.0"),
        Some("Layer 'err' grid 0: Grid cell size must be positive, got 0 x 1".to_string())
    );
    assert_eq!(
        grid_layer("center = [0.0, 0.0]\nwidth = 1.0\nheight = 1.0\ncols = [3, 1]"),
        Some("Layer 'err' grid 0: Invalid grid cols [3, 1]".to_string())
    );
    assert_eq!(
        grid_layer(
            "center = [0.0, 0.0]\nwidth = 1.0\nheight = 1.0\n[[layer.grid.data]]\ncols = [4, 2]\nrows = 0"
        ),
        Some("Layer 'err' grid 0: Invalid data cell range cols: (4, 2) rows: (0, 0)".to_string())
    );

    let toml = "[layer]\nid = \"err\"\nprojection = \"EPSG:2056\"";
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        GridLayer::from_config(&config.layer).err(),
        Some("Unknown projection 'EPSG:2056'".to_string())
    );
}

#[test]
fn test_parse_error() {
    let config: Result<ApplicationCfg, _> = read_config("src/core/mod.rs");
    assert!(config
        .err()
        .unwrap()
        .starts_with("src/core/mod.rs - unexpected character found: `/`"));

    let config: Result<ApplicationCfg, _> = read_config("wrongfile");
    assert_eq!("Could not find config file!", config.err().unwrap());

    let config: Result<ApplicationCfg, _> =
        parse_config("[layer]\nid = \"${LAYER}\"".to_string(), "");
    assert_eq!(
        "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`",
        config.err().unwrap()
    );
}

#[test]
fn test_env_template() {
    env::set_var("GRIDLAYER_TEST_ID", "from_env");
    let toml = r#"
        [layer]
        id = "{{ env.GRIDLAYER_TEST_ID }}"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "env.toml").unwrap();
    assert_eq!(config.layer.id, "from_env");

    let toml = r#"
        [layer]
        id = "{{ env.GRIDLAYER_TEST_UNDEFINED }}"
        "#;
    let config: Result<ApplicationCfg, _> = parse_config(toml.to_string(), "env.toml");
    assert!(config.err().unwrap().starts_with("Template error"));
}
