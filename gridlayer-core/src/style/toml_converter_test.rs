//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::style::toml_converter::{
    inline_toml, json_to_toml, toml_symbol_to_json_string, toml_to_json, toml_to_symbol,
};

#[test]
pub fn color_stops() {
    use toml::Value;

    let symbol = r##"
        lineColor = "#bbb"
        [polygonFill]
        property = "temperature"
        stops = [{ in = 0, out = "blue" }, { in = 100, out = "red" }]"##;

    let toml = symbol.parse::<Value>().unwrap();

    let configjson = toml_symbol_to_json_string(&toml).unwrap();
    println!("{}", configjson);
    let expected = r##"{
  "lineColor": "#bbb",
  "polygonFill": {
    "property": "temperature",
    "stops": [
      [
        0,
        "blue"
      ],
      [
        100,
        "red"
      ]
    ]
  }
}"##;
    assert_eq!(configjson, expected);
}

#[test]
pub fn zoom_stops() {
    use toml::Value;

    let symbol = r##"
        [polygonOpacity]
        base = 2
        stops = [{ in = 15, out = 0.0 }, { in = 16, out = 1.0 }]

        [lineDasharray]
        stops = [[15, [1, 1]], [16, [2, 2]]]"##;

    let toml = symbol.parse::<Value>().unwrap();
    let json = toml_to_json(&toml);
    assert_eq!(
        json,
        json!({
            "polygonOpacity": { "base": 2, "stops": [[15, 0.0], [16, 1.0]] },
            "lineDasharray": { "stops": [[15, [1, 1]], [16, [2, 2]]] }
        })
    );
}

#[test]
pub fn symbol_table() {
    use toml::Value;

    let toml = "markerFile = \"url(marker.png)\"".parse::<Value>().unwrap();
    let symbol = toml_to_symbol(&toml).unwrap();
    assert_eq!(symbol["markerFile"], json!("url(marker.png)"));

    let toml = Value::Integer(3);
    assert_eq!(
        toml_to_symbol(&toml).err(),
        Some("Symbol must be a table, found `3`".to_string())
    );
}

#[test]
pub fn symbol_back_to_toml() {
    use toml::Value;

    let symbol = json!({
        "lineColor": "#bbb",
        "lineWidth": 1.5,
        "polygonOpacity": null,
        "text-name": "say \"hi\"",
        "polygonFill": {
            "property": "temperature",
            "stops": [[0, "blue"], [100, "red"]]
        }
    });
    let toml = json_to_toml(&symbol).unwrap();
    let inline = inline_toml(&toml);
    assert_eq!(
        inline,
        r##"{ lineColor = "#bbb", lineWidth = 1.5, polygonFill = { property = "temperature", stops = [{ in = 0, out = "blue" }, { in = 100, out = "red" }] }, text-name = "say \"hi\"" }"##
    );

    let reparsed = format!("symbol = {}", inline).parse::<Value>().unwrap();
    let mut expected = symbol.clone();
    expected.as_object_mut().unwrap().remove("polygonOpacity");
    assert_eq!(toml_to_json(&reparsed["symbol"]), expected);

    assert_eq!(inline_toml(&json_to_toml(&json!({})).unwrap()), "{}");
    assert_eq!(inline_toml(&json_to_toml(&json!({"a b": 2.0})).unwrap()), r#"{ "a b" = 2.0 }"#);
    assert!(json_to_toml(&json!(null)).is_none());
}
