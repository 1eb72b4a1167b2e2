use crate::config::RefineConfig;
use crate::error::ConfigLoadError;
use crate::models::{BoundingRegion, OwnedFrame};
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn max_dim_from_env() -> Option<u32> {
    match env::var("SPROCKET_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as an RGB frame.
///
/// When `SPROCKET_MAX_DIM` is set the image is downscaled so its longer side
/// fits; detector boxes must then be given in the downscaled coordinates.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<OwnedFrame, image::ImageError> {
    let img = image::open(path)?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    Ok(OwnedFrame {
        data: rgb.into_raw(),
        width: width as usize,
        height: height as usize,
        channels: 3,
    })
}

/// Read and validate a JSON refinement config; missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<RefineConfig, ConfigLoadError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RefineConfig =
        serde_json::from_str(&data).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate().map_err(|source| ConfigLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

/// Gray frame with a horizontal dark-to-bright step at fractional row `edge_row`.
///
/// Rows above the edge are `dark`, rows below are `bright`; the row containing
/// the edge is area-weighted, as a real sensor would integrate it.
pub fn synthetic_step_frame(
    width: usize,
    height: usize,
    edge_row: f32,
    dark: u8,
    bright: u8,
) -> OwnedFrame {
    let mut data = vec![0u8; width * height];
    for (y, row) in data.chunks_exact_mut(width.max(1)).enumerate() {
        let coverage = (y as f32 + 0.5 - edge_row).clamp(0.0, 1.0);
        let value = dark as f32 + (bright as f32 - dark as f32) * coverage;
        row.fill(value.round().clamp(0.0, 255.0) as u8);
    }
    OwnedFrame {
        data,
        width,
        height,
        channels: 1,
    }
}

/// Add deterministic pseudo-random noise of at most `amplitude` levels.
///
/// Uses a fixed xorshift sequence so that synthetic runs are reproducible.
pub fn add_noise(frame: &mut OwnedFrame, amplitude: u8, seed: u64) {
    if amplitude == 0 {
        return;
    }
    let mut state = seed | 1;
    let span = 2 * amplitude as i32 + 1;
    for px in &mut frame.data {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let delta = (state % span as u64) as i32 - amplitude as i32;
        *px = (*px as i32 + delta).clamp(0, 255) as u8;
    }
}

/// Summary statistics for 8-bit sample data.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    /// Minimum sample value.
    pub min: u8,
    /// Maximum sample value.
    pub max: u8,
    /// Average sample value.
    pub avg: u8,
}

/// Compute min/max/avg over raw frame bytes.
pub fn frame_stats(data: &[u8]) -> FrameStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in data {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if data.is_empty() {
        0
    } else {
        (sum / data.len() as u64) as u8
    };
    FrameStats { min, max, avg }
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("SPROCKET_DATASET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/frames"))
}

/// Frame limit from environment variables.
///
/// Returns `None` (every frame) when `SPROCKET_BENCH_LIMIT` is unset or `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("SPROCKET_BENCH_LIMIT") {
        Ok(value) => value
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

/// Smoke test flag from environment variables.
pub fn smoke_from_env() -> bool {
    matches!(
        env::var("SPROCKET_SMOKE").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// Parse a box label file: one `left top right bottom [expected_row]` line per frame.
///
/// Blank lines and `#` comments are skipped; commas are accepted as
/// separators. Malformed lines are reported with their line number.
pub fn parse_box_labels<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<(BoundingRegion, Option<f32>)>, String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read labels {}: {e}", path.display()))?;

    let mut labels = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() != 4 && tokens.len() != 5 {
            return Err(format!(
                "{}:{}: expected 4 or 5 values, found {}",
                path.display(),
                line_no + 1,
                tokens.len()
            ));
        }
        let mut coords = [0i32; 4];
        for (dst, token) in coords.iter_mut().zip(&tokens) {
            *dst = token
                .parse::<i32>()
                .map_err(|e| format!("{}:{}: {e}", path.display(), line_no + 1))?;
        }
        let expected = match tokens.get(4) {
            Some(token) => Some(
                token
                    .parse::<f32>()
                    .map_err(|e| format!("{}:{}: {e}", path.display(), line_no + 1))?,
            ),
            None => None,
        };
        labels.push((
            BoundingRegion::new(coords[0], coords[1], coords[2], coords[3]),
            expected,
        ));
    }
    Ok(labels)
}

/// Iterate frame image paths in name order, with optional smoke list and limit.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
    smoke: bool,
) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let smoke_path = root.join("_smoke.txt");
    let contents = fs::read_to_string(&smoke_path).ok()?;
    let mut paths = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let candidate = Path::new(line);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            root.join(candidate)
        };
        if path.exists() {
            paths.push(path);
        }
    }
    if paths.is_empty() { None } else { Some(paths) }
}

// Frames of one sequence live in a single directory; no recursion.
fn collect_images(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut images = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp") {
                images.push(path);
            }
        }
    }
    images
}
