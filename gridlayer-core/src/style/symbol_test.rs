//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::style::symbol::*;
use serde_json::Value;

fn symbol(value: Value) -> Symbol {
    match value {
        Value::Object(map) => map,
        _ => panic!("symbol must be an object"),
    }
}

#[test]
fn test_default_symbol() {
    let style = resolve_style(&default_symbol(), &StyleContext::new(10.0, None));
    assert_eq!(style.line_color(), Some([187, 187, 187, 255]));
    assert_eq!(style.line_width(), 1.0);
    assert_eq!(style.line_opacity(), 1.0);
    assert_eq!(style.line_dasharray(), Vec::<f64>::new());
    assert_eq!(style.line_cap(), "butt");
    assert_eq!(style.line_join(), "round");
    assert_eq!(style.polygon_opacity(), Some(0.0));
    assert!(!style.has_fill());
    assert!(!style.is_label());
}

#[test]
fn test_merge_symbol() {
    let merged = merge_symbol(
        &default_symbol(),
        &symbol(json!({ "lineColor": "#f00", "polygonFill": "#00f" })),
    );
    let style = resolve_style(&merged, &StyleContext::new(0.0, None));
    assert_eq!(style.line_color(), Some([255, 0, 0, 255]));
    assert_eq!(style.line_width(), 1.0);
    assert!(style.has_fill());
}

#[test]
fn test_zoom_functions() {
    let s = symbol(json!({
        "lineWidth": { "stops": [[10, 1], [20, 11]] },
        "polygonOpacity": { "type": "interval", "stops": [[5, 0.2], [10, 0.8]] },
        "lineColor": { "stops": [[0, "#000"], [10, "#fff"]] },
        "polygonFill": { "type": "interval", "stops": [[12, "#f00"], [14, "#0f0"]] }
    }));
    let style = resolve_style(&s, &StyleContext::new(15.0, None));
    assert_eq!(style.line_width(), 6.0);
    assert_eq!(style.polygon_opacity(), Some(0.8));
    assert_eq!(style.line_color(), Some([255, 255, 255, 255]));
    assert_eq!(style.polygon_fill(), Some([0, 255, 0, 255]));

    let style = resolve_style(&s, &StyleContext::new(5.0, None));
    assert_eq!(style.line_width(), 1.0);
    assert_eq!(style.polygon_opacity(), Some(0.2));
    assert_eq!(style.line_color(), Some([128, 128, 128, 255]));
    assert_eq!(style.polygon_fill(), Some([255, 0, 0, 255]));

    let style = resolve_style(&s, &StyleContext::new(30.0, None));
    assert_eq!(style.line_width(), 11.0);

    let style = resolve_style(&s, &StyleContext::new(13.9, None));
    assert_eq!(style.polygon_fill(), Some([255, 0, 0, 255]));
    let style = resolve_style(&s, &StyleContext::new(14.0, None));
    assert_eq!(style.polygon_fill(), Some([0, 255, 0, 255]));
}

#[test]
fn test_exponential_base() {
    let value = json!({ "base": 2, "stops": [[0, 0], [2, 3]] });
    // (2^1 - 1) / (2^2 - 1)
    assert_eq!(evaluate(&value, &StyleContext::new(1.0, None)), json!(1.0));
}

#[test]
fn test_property_functions() {
    let properties = json!({ "temperature": 50, "kind": "lake" });
    let s = symbol(json!({
        "polygonOpacity": { "property": "temperature", "stops": [[0, 0], [100, 1]] },
        "polygonFill": {
            "property": "kind",
            "stops": [["forest", "#0f0"], ["lake", "#00f"]],
            "default": "#fff"
        },
        "textName": { "property": "kind", "type": "identity" },
        "lineWidth": { "property": "missing", "stops": [[0, 1]], "default": 3 }
    }));
    let style = resolve_style(&s, &StyleContext::new(10.0, Some(&properties)));
    assert_eq!(style.polygon_opacity(), Some(0.5));
    assert_eq!(style.polygon_fill(), Some([0, 0, 255, 255]));
    assert_eq!(style.string("textName"), Some("lake"));
    assert_eq!(style.line_width(), 3.0);

    let other = json!({ "kind": "desert" });
    let style = resolve_style(&s, &StyleContext::new(10.0, Some(&other)));
    assert_eq!(style.polygon_fill(), Some([255, 255, 255, 255]));
    // no value and no default
    assert_eq!(style.polygon_opacity(), None);
}

#[test]
fn test_label_symbols() {
    assert!(is_label_symbol(&symbol(json!({ "markerFile": "a.png" }))));
    assert!(is_label_symbol(&symbol(json!({ "textName": "{name}" }))));
    assert!(is_label_symbol(&symbol(json!({ "markerType": "ellipse" }))));
    assert!(is_label_symbol(
        &symbol(json!({ "markerType": "path", "markerPath": "M0 0" }))
    ));
    assert!(!is_label_symbol(&symbol(json!({ "markerType": "path" }))));
    assert!(!is_label_symbol(&symbol(json!({ "polygonFill": "#f00" }))));

    let label = label_placement_symbol(&symbol(json!({ "textName": "x", "polygonOpacity": 1 })));
    assert_eq!(label["markerPlacement"], json!("point"));
    assert_eq!(label["textPlacement"], json!("point"));
    assert_eq!(label["lineOpacity"], json!(0));
    assert_eq!(label["polygonOpacity"], json!(0));
    assert_eq!(label["textName"], json!("x"));
}

#[test]
fn test_external_resources() {
    let s = symbol(json!({
        "markerFile": "url('img/marker.png')",
        "polygonPatternFile": "pattern.png",
        "linePatternFile": "pattern.png",
        "lineColor": "#000"
    }));
    assert_eq!(
        external_resources(&s),
        vec!["img/marker.png".to_string(), "pattern.png".to_string()]
    );
}
