use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use boxmerge::{
    visualize::{blank_canvas, canvas_size, render_annotations, render_merge_step},
    ConsolidatorBuilder, MergeOptions, OcrResponse,
};
use clap::Parser;
use image::RgbImage;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Consolidates OCR text detections into merged text regions.
#[derive(Debug, Parser)]
#[command(name = "boxmerge", version)]
struct Cli {
    /// OCR response JSON, `-` for stdin
    input: PathBuf,
    /// Keep the first detection instead of treating it as the whole-image summary
    #[arg(long)]
    keep_first: bool,
    #[arg(long, default_value_t = MergeOptions::default().max_angle_difference)]
    max_angle_difference: f64,
    #[arg(long, default_value_t = MergeOptions::default().max_center_offset_ratio)]
    max_center_offset_ratio: f64,
    #[arg(long, default_value_t = MergeOptions::default().min_vertical_overlap_ratio)]
    min_vertical_overlap_ratio: f64,
    #[arg(long, default_value_t = MergeOptions::default().max_gap_ratio)]
    max_gap_ratio: f64,
    #[arg(long, default_value_t = MergeOptions::default().containment_threshold)]
    containment_threshold: f64,
    #[arg(long, default_value_t = MergeOptions::default().iou_threshold)]
    iou_threshold: f64,
    #[arg(long, default_value_t = MergeOptions::default().iou_grid_resolution)]
    iou_grid_resolution: usize,
    /// Write one image per merge step into this directory
    #[arg(long)]
    trace_dir: Option<PathBuf>,
    /// Background image for trace output
    #[arg(long, requires = "trace_dir")]
    image: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let input = read_input(&cli.input)?;
    let detections = serde_json::from_str::<OcrResponse>(&input)
        .context("Failed to parse OCR response")?
        .into_detections();

    let consolidator = ConsolidatorBuilder::new()
        .max_angle_difference(cli.max_angle_difference)
        .max_center_offset_ratio(cli.max_center_offset_ratio)
        .min_vertical_overlap_ratio(cli.min_vertical_overlap_ratio)
        .max_gap_ratio(cli.max_gap_ratio)
        .containment_threshold(cli.containment_threshold)
        .iou_threshold(cli.iou_threshold)
        .iou_grid_resolution(cli.iou_grid_resolution)
        .skip_full_text(!cli.keep_first)
        .build();

    let start = Instant::now();
    let consolidation = consolidator.clean_detections_traced(&detections);
    log::debug!(
        "{} detections consolidated into {} annotations with {} merges in {:?}",
        detections.len(),
        consolidation.annotations.len(),
        consolidation.steps.len(),
        start.elapsed()
    );

    if let Some(trace_dir) = &cli.trace_dir {
        fs::create_dir_all(trace_dir)
            .with_context(|| format!("Failed to create {}", trace_dir.display()))?;
        let background = match &cli.image {
            Some(path) => image::open(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
                .to_rgb8(),
            None => {
                let (width, height) = canvas_size(&consolidation.annotations, 20);
                blank_canvas(width, height)
            }
        };
        for (i, step) in consolidation.steps.iter().enumerate() {
            let mut canvas = background.clone();
            render_merge_step(&mut canvas, step);
            save(&canvas, trace_dir.join(format!("step_{i}.png")))?;
        }
        let mut canvas = background;
        render_annotations(&mut canvas, &consolidation.annotations);
        save(&canvas, trace_dir.join("result.png"))?;
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&consolidation.annotations)?
    } else {
        serde_json::to_string(&consolidation.annotations)?
    };
    println!("{output}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        Ok(input)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn save(canvas: &RgbImage, path: PathBuf) -> Result<()> {
    canvas
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
