//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use cell_grid::Coord;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use gridlayer_core::core::config::DEFAULT_CONFIG;
use gridlayer_core::core::grid_spec::GridSpec;
use gridlayer_core::core::layer::GridLayer;
use gridlayer_core::core::screen::ScreenExtent;
use gridlayer_core::core::sequencer::{CellRecord, Visit};
use gridlayer_core::core::viewport::{MapView, Viewport};
use gridlayer_core::core::{parse_config, read_config, ApplicationCfg, Config};
use gridlayer_core::render::gpu::{
    BufferId, BufferUsage, DataBufferIds, GpuBackend, LineUniforms, ProgramId,
};
use gridlayer_core::render::labels::LabelPlacement;
use gridlayer_core::render::path::{CommandSequence, PathSink};
use gridlayer_core::render::shaders::ShaderSource;
use gridlayer_core::render::{CanvasGridRenderer, FrameSummary, GlGridRenderer, GridSource};
use gridlayer_core::style::color::Rgba;
use gridlayer_core::style::ResolvedStyle;
use log::Record;
use std::env;
use std::io::Write;
use std::process;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        let timestamp = time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            timestamp,
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG");
    let rust_log = match (args.value_of("loglevel"), rust_log_env.as_ref()) {
        (None, Ok(rust_log)) => rust_log.as_str(),
        (loglevel, _) => loglevel.unwrap_or("info"),
    };
    builder.parse_filters(rust_log);

    builder.init();
}

fn config_from_args(args: &ArgMatches<'_>) -> Result<ApplicationCfg, String> {
    match args.value_of("config") {
        Some(path) => {
            info!("Reading configuration from '{}'", path);
            read_config(path)
        }
        None => parse_config(DEFAULT_CONFIG.to_string(), "default config"),
    }
}

fn layer_from_args(args: &ArgMatches<'_>) -> Result<(GridLayer, MapView), String> {
    let config = config_from_args(args)?;
    let layer = GridLayer::from_config(&config.layer)?;
    let view = match config.view {
        Some(ref view_cfg) => MapView::from_config(view_cfg)?,
        None => MapView::new(
            Coord::new(0.0, 0.0),
            0.0,
            512,
            512,
            Default::default(),
        ),
    };
    Ok((layer, view))
}

fn grid_index(args: &ArgMatches<'_>, layer: &GridLayer) -> Result<usize, String> {
    let grid_index = match args.value_of("grid") {
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| "Error parsing 'grid' as integer value".to_string())?,
        None => 0,
    };
    if grid_index >= layer.grid_count() {
        return Err(format!(
            "Grid index {} out of range (grid count {})",
            grid_index,
            layer.grid_count()
        ));
    }
    Ok(grid_index)
}

fn coord_arg(args: &ArgMatches<'_>, name: &str) -> Result<Coord, String> {
    let values = args
        .value_of(name)
        .ok_or(format!("Missing '{}' coordinate", name))?
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("Error parsing '{}' as pair of float values", name))?;
    match values.as_slice() {
        [x, y] => Ok(Coord::new(*x, *y)),
        _ => Err(format!("Error parsing '{}' as pair of float values", name)),
    }
}

fn genconfig(args: &ArgMatches<'_>) -> Result<String, String> {
    if args.value_of("config").is_some() {
        let (layer, view) = layer_from_args(args)?;
        let mut config = layer.gen_runtime_config();
        config.push_str(&format!(
            "\n[view]\ncenter = [{:?}, {:?}]\nzoom = {:?}\nwidth = {}\nheight = {}\nprojection = \"{}\"\n",
            view.center.x,
            view.center.y,
            view.zoom,
            view.width,
            view.height,
            view.projection.code()
        ));
        Ok(config)
    } else {
        let mut config = GridLayer::gen_config();
        config.push_str(&MapView::gen_config());
        Ok(config)
    }
}

fn extent(args: &ArgMatches<'_>) -> Result<(), String> {
    let (layer, view) = layer_from_args(args)?;
    let grid_index = grid_index(args, &layer)?;
    match layer.get_grid_extent(grid_index, &view) {
        Some(extent) => println!(
            "{},{},{},{}",
            extent.minx, extent.miny, extent.maxx, extent.maxy
        ),
        None => println!("Grid {} has no valid extent", grid_index),
    }
    Ok(())
}

/// Counts paint calls instead of painting
#[derive(Default)]
struct CountingSink {
    rects: usize,
    fills: usize,
    strokes: usize,
    labels: usize,
}

impl PathSink for CountingSink {
    fn fill_rect(&mut self, rect: &ScreenExtent, _color: &Rgba, _opacity: f64) {
        debug!("fill rect {:?}", rect);
        self.rects += 1;
    }
    fn fill_path(&mut self, _path: &CommandSequence, _style: &ResolvedStyle, _opacity: f64) {
        self.fills += 1;
    }
    fn stroke_path(&mut self, _path: &CommandSequence, _style: &ResolvedStyle, _opacity: f64) {
        self.strokes += 1;
    }
    fn paint_label(&mut self, label: &LabelPlacement) {
        debug!(
            "label of data entry {} at {} anchors",
            label.data_index,
            label.anchors.len()
        );
        self.labels += 1;
    }
}

fn print_summary(summary: &FrameSummary) {
    for frame in &summary.grids {
        match frame.range {
            Some(range) => println!(
                "grid {}: cols {}..{} rows {}..{} ({} cells){}",
                frame.grid_index,
                range.mincol,
                range.maxcol,
                range.minrow,
                range.maxrow,
                range.len(),
                if frame.collapsed { ", collapsed" } else { "" }
            ),
            None => println!("grid {}: not visible", frame.grid_index),
        }
    }
    println!(
        "batches: {}, quads: {}, skipped: {}, labels: {}",
        summary.batches(),
        summary.quads(),
        summary.skipped(),
        summary.labels()
    );
}

fn cells(args: &ArgMatches<'_>) -> Result<(), String> {
    let (layer, view) = layer_from_args(args)?;
    let grid_index = grid_index(args, &layer)?;
    let extent = view.extent();
    info!(
        "View extent {},{},{},{}",
        extent.minx, extent.miny, extent.maxx, extent.maxy
    );
    if layer.get_cell_range(grid_index, &view).is_none() {
        println!("Grid {} is out of view", grid_index);
    }
    let mut renderer = CanvasGridRenderer::new();
    for resource in renderer.check_resources(&layer, &view) {
        println!("resource: {}", resource);
    }
    let mut sink = CountingSink::default();
    let summary = renderer.draw(&layer, &view, &mut sink);
    print_summary(&summary);
    println!(
        "rects: {}, fills: {}, strokes: {}, labels: {}",
        sink.rects, sink.fills, sink.strokes, sink.labels
    );
    print!("{:?}", renderer.stats());
    Ok(())
}

fn identify(args: &ArgMatches<'_>) -> Result<(), String> {
    let (layer, view) = layer_from_args(args)?;
    let grid_index = grid_index(args, &layer)?;
    let coord = coord_arg(args, "point")?;
    match layer.identify(&coord, grid_index, &view) {
        Some(found) => {
            println!("cell: {},{}", found.col, found.row);
            println!(
                "nw: {},{} width: {} height: {}",
                found.geometry.nw.x, found.geometry.nw.y, found.geometry.width, found.geometry.height
            );
            let ring = found
                .geometry
                .ring
                .iter()
                .map(|c| format!("{} {}", c.x, c.y))
                .collect::<Vec<_>>();
            println!("ring: {}", ring.join(", "));
        }
        None => println!("No cell at {},{}", coord.x, coord.y),
    }
    Ok(())
}

fn around(args: &ArgMatches<'_>) -> Result<(), String> {
    let (layer, view) = layer_from_args(args)?;
    let grid_index = grid_index(args, &layer)?;
    let coord = coord_arg(args, "point")?;
    let limit = match args.value_of("limit") {
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| "Error parsing 'limit' as integer value".to_string())?,
        None => usize::MAX,
    };
    let mut visited = 0;
    layer.visit_around(
        &coord,
        |cell: &CellRecord| {
            println!(
                "{},{} data {} {}",
                cell.col,
                cell.row,
                cell.data_index,
                cell.properties
                    .map(|p| p.to_string())
                    .unwrap_or_default()
            );
            visited += 1;
            if visited >= limit {
                Visit::Stop
            } else {
                Visit::Continue
            }
        },
        grid_index,
        &view,
    );
    if visited == 0 {
        println!("No data cells around {},{}", coord.x, coord.y);
    }
    Ok(())
}

/// Keeps track of GPU objects without a GL context
#[derive(Default)]
struct NullBackend {
    next_id: u32,
    uploaded: usize,
    lines: usize,
    triangles: usize,
}

impl GpuBackend for NullBackend {
    fn create_program(&mut self, shader: &ShaderSource) -> Result<ProgramId, String> {
        debug!("program with uniforms {:?}", shader.uniforms);
        self.next_id += 1;
        Ok(self.next_id)
    }
    fn delete_program(&mut self, _program: ProgramId) {}
    fn create_buffer(&mut self) -> Result<BufferId, String> {
        self.next_id += 1;
        Ok(self.next_id)
    }
    fn delete_buffer(&mut self, _buffer: BufferId) {}
    fn upload(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage) {
        debug!("buffer {}: {} bytes {:?}", buffer, data.len(), usage);
        self.uploaded += data.len();
    }
    fn draw_lines(
        &mut self,
        _program: ProgramId,
        _positions: BufferId,
        vertex_count: usize,
        _uniforms: &LineUniforms,
    ) {
        self.lines += vertex_count / 2;
    }
    fn draw_indexed_triangles(
        &mut self,
        _program: ProgramId,
        _buffers: &DataBufferIds,
        index_count: usize,
        _matrix: &[f32; 16],
    ) {
        self.triangles += index_count / 3;
    }
}

fn pack(args: &ArgMatches<'_>) -> Result<(), String> {
    let (layer, view) = layer_from_args(args)?;
    let grid_index = grid_index(args, &layer)?;
    let grid: &GridSpec = layer
        .grid(grid_index)
        .ok_or(format!("Grid {} not found", grid_index))?;
    if grid.data.is_empty() {
        println!("Grid {} has no data cells", grid_index);
    }
    let mut renderer = GlGridRenderer::new(NullBackend::default());
    let mut sink = CountingSink::default();
    let summary = renderer.draw(&layer, &view, &mut sink)?;
    print_summary(&summary);
    if let Some(packed) = renderer.cache().packed(grid_index) {
        println!(
            "grid {}: {} vertices, {} indices, {} bytes",
            grid_index,
            packed.vertex_count(),
            packed.indices.len(),
            packed.position_bytes().len()
                + packed.colors.len()
                + packed.opacities.len()
                + packed.index_bytes().len()
        );
    }
    let backend = renderer.backend();
    println!(
        "uploaded: {} bytes, lines: {}, triangles: {}",
        backend.uploaded, backend.lines, backend.triangles
    );
    print!("{:?}", renderer.stats());
    renderer.on_remove();
    Ok(())
}

fn main() {
    dotenv().ok();
    // http://kbknapp.github.io/clap-rs/clap/
    let mut app = App::new("gridlayer")
        .version(crate_version!())
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("grid layer cell geometry and render buffer inspection")
        .subcommand(SubCommand::with_name("genconfig")
                        .args_from_usage("-c, --config=[FILE] 'Generate from existing config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Generate configuration template"))
        .subcommand(SubCommand::with_name("extent")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --grid=[INDEX] 'Grid index (Default: 0)'")
                        .about("Map area covered by a grid"))
        .subcommand(SubCommand::with_name("cells")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --grid=[INDEX] 'Grid index (Default: 0)'")
                        .about("Visible cells and canvas drawing of the configured view"))
        .subcommand(SubCommand::with_name("identify")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --grid=[INDEX] 'Grid index (Default: 0)'
                                              --point=<x,y> 'Map coordinate'")
                        .about("Cell and outline at a coordinate"))
        .subcommand(SubCommand::with_name("around")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --grid=[INDEX] 'Grid index (Default: 0)'
                                              --point=<x,y> 'Map coordinate'
                                              --limit=[NUM] 'Maximum number of visited cells'")
                        .about("Data cells ordered by distance to a coordinate"))
        .subcommand(SubCommand::with_name("pack")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --grid=[INDEX] 'Grid index (Default: 0)'")
                        .about("GPU buffer sizes of the configured view"));

    let result = match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
            Ok(())
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                genconfig(sub_m).map(|config| println!("{}", config))
            }
            ("extent", Some(sub_m)) => {
                init_logger(sub_m);
                extent(sub_m)
            }
            ("cells", Some(sub_m)) => {
                init_logger(sub_m);
                cells(sub_m)
            }
            ("identify", Some(sub_m)) => {
                init_logger(sub_m);
                identify(sub_m)
            }
            ("around", Some(sub_m)) => {
                init_logger(sub_m);
                around(sub_m)
            }
            ("pack", Some(sub_m)) => {
                init_logger(sub_m);
                pack(sub_m)
            }
            _ => {
                let _ = app.print_help();
                println!("");
                Ok(())
            }
        },
    };
    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
