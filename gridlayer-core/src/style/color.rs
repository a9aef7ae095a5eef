//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! CSS color parsing

use regex::Regex;

/// RGBA color, alpha scaled to 0-255
pub type Rgba = [u8; 4];

lazy_static! {
    static ref RGB_FUNC: Regex = Regex::new(
        r"^rgba?\(\s*([0-9.]+)\s*,\s*([0-9.]+)\s*,\s*([0-9.]+)\s*(?:,\s*([0-9.]+)\s*)?\)$"
    )
    .expect("valid regex");
}

const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("silver", [192, 192, 192, 255]),
    ("transparent", [0, 0, 0, 0]),
];

fn hex_digit_pair(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 | 4 => {
            let mut rgba = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgba[i] = v * 17;
            }
            Some(rgba)
        }
        6 | 8 => {
            let mut rgba = [255u8; 4];
            for i in 0..hex.len() / 2 {
                rgba[i] = hex_digit_pair(&hex[i * 2..i * 2 + 2])?;
            }
            Some(rgba)
        }
        _ => None,
    }
}

fn channel(s: &str) -> Option<u8> {
    let v = s.parse::<f64>().ok()?;
    Some(v.max(0.0).min(255.0).round() as u8)
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` or a basic color name
pub fn parse_color(color: &str) -> Option<Rgba> {
    let color = color.trim();
    if color.starts_with('#') {
        return parse_hex(&color[1..]);
    }
    let lower = color.to_lowercase();
    if let Some(caps) = RGB_FUNC.captures(&lower) {
        let alpha = match caps.get(4) {
            Some(a) => {
                let a = a.as_str().parse::<f64>().ok()?;
                (a.max(0.0).min(1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        return Some([
            channel(&caps[1])?,
            channel(&caps[2])?,
            channel(&caps[3])?,
            alpha,
        ]);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgba)| *rgba)
}

/// Normalized RGBA for shader uniforms
pub fn normalized(rgba: &Rgba) -> [f32; 4] {
    [
        rgba[0] as f32 / 255.0,
        rgba[1] as f32 / 255.0,
        rgba[2] as f32 / 255.0,
        rgba[3] as f32 / 255.0,
    ]
}

/// CSS representation understood by `parse_color`
pub fn to_css(rgba: &Rgba) -> String {
    format!(
        "rgba({},{},{},{})",
        rgba[0],
        rgba[1],
        rgba[2],
        rgba[3] as f64 / 255.0
    )
}

/// Linear interpolation between two colors
pub fn interpolate(a: &Rgba, b: &Rgba, t: f64) -> Rgba {
    let mut rgba = [0u8; 4];
    for i in 0..4 {
        let v = a[i] as f64 + (b[i] as f64 - a[i] as f64) * t;
        rgba[i] = v.max(0.0).min(255.0).round() as u8;
    }
    rgba
}

#[test]
fn test_parse_color() {
    assert_eq!(parse_color("#bbb"), Some([187, 187, 187, 255]));
    assert_eq!(parse_color("#ff0000"), Some([255, 0, 0, 255]));
    assert_eq!(parse_color("#ff000080"), Some([255, 0, 0, 128]));
    assert_eq!(parse_color("rgb(1, 2, 3)"), Some([1, 2, 3, 255]));
    assert_eq!(parse_color("rgba(1,2,3,0.5)"), Some([1, 2, 3, 128]));
    assert_eq!(parse_color("White"), Some([255, 255, 255, 255]));
    assert_eq!(parse_color("#ggg"), None);
    assert_eq!(parse_color("no-color"), None);
    assert_eq!(
        parse_color(&to_css(&[10, 20, 30, 255])),
        Some([10, 20, 30, 255])
    );
}

#[test]
fn test_interpolate() {
    assert_eq!(
        interpolate(&[0, 0, 255, 255], &[255, 0, 0, 255], 0.5),
        [128, 0, 128, 255]
    );
}
