use crate::config::{InterpolationConvention, RefineConfig};
use crate::edges::compute_edge_maps;
use crate::error::RefineError;
use crate::models::{BoundingRegion, Diagnostics, FrameView, Reason, RefinementResult, RowProfile};
use crate::refine::gate::apply_gate;
use crate::refine::peaks::{find_peaks, select_candidate};
use crate::refine::profile::{build_profiles, fuse_profiles, search_band};
use crate::refine::region::extract_region;
use crate::refine::subpixel::interpolate_peak;
use log::debug;

/// Run peak finding, selection, interpolation and the sanity gate on a fused profile
pub(crate) fn refine_fused(
    fused: &RowProfile,
    expected_row: f32,
    box_height: f32,
    config: &RefineConfig,
    convention: InterpolationConvention,
    diag: &mut Diagnostics,
) -> Result<RefinementResult, RefineError> {
    let peaks = find_peaks(fused, config.peak_threshold_fraction)?;
    diag.candidate_count = peaks.len();

    let best = select_candidate(
        &peaks,
        expected_row,
        box_height,
        config.distance_scale_fraction,
    )
    .ok_or(RefineError::NoEdgeFound)?;
    diag.peak_row = Some(best.peak.row);
    diag.score = best.score;

    let sub = interpolate_peak(fused, best.peak.row, convention);
    diag.raw_row = Some(sub.row);
    diag.deviation = Some((sub.row - expected_row).abs());

    debug!(
        "refine: {} peaks, selected row {} (score {:.3}), refined {:.3}",
        peaks.len(),
        best.peak.row,
        best.score,
        sub.row
    );

    let reason = if sub.degenerate {
        Reason::DegenerateInterpolation
    } else {
        Reason::Accepted
    };
    Ok(apply_gate(
        sub.row,
        expected_row,
        config.max_deviation,
        best.score,
        reason,
    ))
}

/// Stages from region extraction up to the gated result
pub(crate) fn refine_frame(
    frame: &FrameView<'_>,
    bbox: &BoundingRegion,
    expected_row: f32,
    config: &RefineConfig,
    diag: &mut Diagnostics,
) -> Result<RefinementResult, RefineError> {
    let extracted = extract_region(
        frame,
        bbox,
        config.margin_x,
        config.margin_y,
        config.parallel_methods,
    )?;
    let band = search_band(bbox, &extracted.region, config.search_band_fraction)?;
    diag.band_start = Some(band.start);
    diag.band_end = Some(band.end);
    debug!(
        "refine: working region {:?}, band {}..{}",
        extracted.region, band.start, band.end
    );

    let maps = compute_edge_maps(&extracted.luma, config);
    let profiles = build_profiles(&maps, extracted.row_offset(), &band);
    let fused = fuse_profiles(&profiles, config.method_weights, &band);

    refine_fused(
        &fused,
        expected_row,
        bbox.height() as f32,
        config,
        config.frame_interpolation(),
        diag,
    )
}

/// Convert any stage failure into a fallback at the frame boundary
pub(crate) fn settle(
    outcome: Result<RefinementResult, RefineError>,
    expected_row: f32,
    mut diag: Diagnostics,
) -> (RefinementResult, Diagnostics) {
    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            debug!("refine: falling back to expected row {}: {}", expected_row, err);
            RefinementResult::fallback(expected_row, err.reason())
        }
    };
    diag.reason = Some(result.reason);
    (result, diag)
}
