use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;
use sprocket_edge::tools::{
    add_noise, bench_limit_from_env, dataset_iter, dataset_root_from_env, frame_stats, load_config,
    load_frame, parse_box_labels, smoke_from_env, synthetic_step_frame,
};
use sprocket_edge::utils::grayscale::rgb_to_grayscale;
use sprocket_edge::{
    BoundingRegion, FrameJob, RefineConfig, Refiner, refine_edge_with_diagnostics,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "edgetool", version, about = "Sprocket edge refinement tools")]
struct Cli {
    /// JSON config file; missing fields take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use the two-method preset instead of the defaults
    #[arg(long, global = true)]
    compat: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refine the edge row of one image
    Refine {
        #[arg(long)]
        image: PathBuf,
        /// Detector box as left,top,right,bottom
        #[arg(long, value_parser = parse_bbox)]
        bbox: BoundingRegion,
        /// Prior row; defaults to the box top
        #[arg(long)]
        expected: Option<f32>,
    },
    /// Refine a generated step edge and report the error
    Synthetic {
        #[arg(long)]
        edge_row: f32,
        #[arg(long, default_value_t = 64)]
        width: usize,
        #[arg(long, default_value_t = 160)]
        height: usize,
        /// Noise amplitude in gray levels
        #[arg(long, default_value_t = 0)]
        noise: u8,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Refine a directory of frames in order, one box per frame
    Sequence {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Box label file; defaults to `<root>/boxes.txt`
        #[arg(long)]
        labels: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
        /// Refine all frames on the thread pool, then smooth in order
        #[arg(long)]
        batch: bool,
    },
}

fn parse_bbox(value: &str) -> Result<BoundingRegion, String> {
    let parts: Vec<i32> = value
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [left, top, right, bottom] => Ok(BoundingRegion::new(*left, *top, *right, *bottom)),
        _ => Err(format!("expected left,top,right,bottom, got {value:?}")),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref(), cli.compat) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command {
        Command::Refine {
            image,
            bbox,
            expected,
        } => refine_cmd(&image, bbox, expected, &config),
        Command::Synthetic {
            edge_row,
            width,
            height,
            noise,
            seed,
        } => synthetic_cmd(edge_row, width, height, noise, seed, &config),
        Command::Sequence {
            root,
            labels,
            limit,
            smoke,
            batch,
        } => sequence_cmd(root, labels, limit, smoke, batch, config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(path: Option<&Path>, compat: bool) -> Result<RefineConfig, String> {
    let config = match path {
        Some(path) => load_config(path).map_err(|e| e.to_string())?,
        None if compat => RefineConfig::compat(),
        None => RefineConfig::default(),
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn refine_cmd(
    image: &Path,
    bbox: BoundingRegion,
    expected: Option<f32>,
    config: &RefineConfig,
) -> Result<(), String> {
    let frame =
        load_frame(image).map_err(|e| format!("Failed to load image {}: {e}", image.display()))?;
    let gray = rgb_to_grayscale(&frame.data, frame.width, frame.height);
    let stats = frame_stats(&gray);
    info!(
        "{} ({}x{}) luma {}-{} avg {}",
        image.display(),
        frame.width,
        frame.height,
        stats.min,
        stats.max,
        stats.avg
    );

    let view = frame.view().map_err(|e| e.to_string())?;
    let expected = expected.unwrap_or(bbox.top as f32);
    let start = Instant::now();
    let (result, diagnostics) = refine_edge_with_diagnostics(&view, &bbox, expected, config);
    let elapsed_us = start.elapsed().as_micros();

    let report = json!({
        "image": image.display().to_string(),
        "bbox": bbox,
        "expected_row": expected,
        "result": result,
        "diagnostics": diagnostics,
        "elapsed_us": elapsed_us,
    });
    println!("{report}");
    Ok(())
}

fn synthetic_cmd(
    edge_row: f32,
    width: usize,
    height: usize,
    noise: u8,
    seed: u64,
    config: &RefineConfig,
) -> Result<(), String> {
    let mut frame = synthetic_step_frame(width, height, edge_row, 40, 200);
    add_noise(&mut frame, noise, seed);
    let view = frame.view().map_err(|e| e.to_string())?;

    // Loose box: starts ten rows above the edge, spans half the frame
    let top = (edge_row.floor() as i32 - 10).max(0);
    let bbox = BoundingRegion::new(
        (width / 5) as i32,
        top,
        (width - width / 5) as i32,
        top + (height / 2) as i32,
    );
    let expected = bbox.top as f32;
    let (result, diagnostics) = refine_edge_with_diagnostics(&view, &bbox, expected, config);

    let report = json!({
        "edge_row": edge_row,
        "bbox": bbox,
        "result": result,
        "error": result.refined_row - edge_row,
        "diagnostics": diagnostics,
    });
    println!("{report}");
    Ok(())
}

fn sequence_cmd(
    root: Option<PathBuf>,
    labels: Option<PathBuf>,
    limit: Option<usize>,
    smoke: bool,
    batch: bool,
    config: RefineConfig,
) -> Result<(), String> {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();
    let labels_path = labels.unwrap_or_else(|| root.join("boxes.txt"));
    let labels = parse_box_labels(&labels_path)?;

    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    if images.len() > labels.len() {
        return Err(format!(
            "{} frames but only {} boxes in {}",
            images.len(),
            labels.len(),
            labels_path.display()
        ));
    }
    info!("refining {} frames from {}", images.len(), root.display());

    let mut refiner = Refiner::new(config).map_err(|e| e.to_string())?;
    let start = Instant::now();

    let mut frames = Vec::with_capacity(images.len());
    for path in &images {
        frames.push(
            load_frame(path).map_err(|e| format!("Failed to load image {}: {e}", path.display()))?,
        );
    }

    let results = if batch {
        let jobs: Vec<FrameJob<'_>> = frames
            .iter()
            .zip(&labels)
            .map(|(frame, (bbox, expected))| FrameJob {
                data: &frame.data,
                width: frame.width,
                height: frame.height,
                channels: frame.channels,
                bbox: *bbox,
                expected_row: *expected,
            })
            .collect();
        refiner.process_batch(&jobs)
    } else {
        let mut results = Vec::with_capacity(frames.len());
        for (frame, (bbox, expected)) in frames.iter().zip(&labels) {
            let view = frame.view().map_err(|e| e.to_string())?;
            let expected = expected.unwrap_or(bbox.top as f32);
            results.push(refiner.process_with_expected(&view, bbox, expected));
        }
        results
    };

    for (path, result) in images.iter().zip(&results) {
        let line = json!({
            "frame": path.display().to_string(),
            "result": result,
        });
        println!("{line}");
    }

    let accepted = results.iter().filter(|r| r.accepted).count();
    info!(
        "{} / {} accepted in {:.2?}",
        accepted,
        results.len(),
        start.elapsed()
    );
    Ok(())
}
