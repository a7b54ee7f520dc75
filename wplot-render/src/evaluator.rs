use std::ops::Range;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use wplot_core::{Complex64, CoreError, Expression, Projection, Viewport};

use crate::value_buffer::ValueBuffer;

/// Rows per parallel band. Bands are order-independent pure computations, so
/// the split only affects scheduling granularity.
const BAND_ROWS: u32 = 64;

/// Evaluate the expression at every pixel of the viewport.
///
/// Scans the grid row-major, mapping each integer pixel coordinate to its
/// complex point, and tracks the running min/max of `projection` over the
/// results. The extrema are seeded from the first pixel rather than ±∞, so a
/// single-pixel frame has `min == max` — and a NaN projection at the first
/// pixel leaves the pair NaN, while NaN projections anywhere else are
/// skipped by the running comparisons.
///
/// The output holds the raw complex values; the projection is used only for
/// the extrema. Any evaluation failure aborts the whole frame.
pub fn evaluate<E: Expression + ?Sized>(
    expr: &E,
    viewport: &Viewport,
    projection: Projection,
) -> crate::Result<ValueBuffer> {
    evaluate_band(expr, viewport, projection, 0..viewport.height)
}

/// Evaluate the pixel rows `rows` of the viewport as a standalone band.
///
/// The band shares the full frame's pixel-to-point arithmetic — each point
/// is computed from the absolute row index, not from recomputed band
/// corners — so banded results concatenate to exactly the values a whole-
/// frame [`evaluate`] produces. The extrema are seeded from the band's own
/// first pixel.
pub fn evaluate_band<E: Expression + ?Sized>(
    expr: &E,
    viewport: &Viewport,
    projection: Projection,
    rows: Range<u32>,
) -> crate::Result<ValueBuffer> {
    if rows.start >= rows.end || rows.end > viewport.height {
        return Err(CoreError::InvalidViewport {
            reason: format!(
                "row band {}..{} outside frame height {}",
                rows.start, rows.end, viewport.height
            ),
        }
        .into());
    }
    let height = rows.end - rows.start;
    let (values, extrema) = evaluate_rows(expr, viewport, projection, rows.start, height)?;
    let (min, max) = seeded_extrema(projection.apply(values[0]), extrema);
    Ok(ValueBuffer {
        width: viewport.width,
        height,
        values,
        min,
        max,
    })
}

/// Parallel variant of [`evaluate`]: splits the frame into pixel-row bands,
/// evaluates them on the rayon pool, and folds the band extrema. Produces
/// identical output to the sequential scan.
pub fn evaluate_par<E: Expression + Sync + ?Sized>(
    expr: &E,
    viewport: &Viewport,
    projection: Projection,
) -> crate::Result<ValueBuffer> {
    let start = Instant::now();
    debug!(
        width = viewport.width,
        height = viewport.height,
        %projection,
        "Starting banded evaluation"
    );

    let band_starts: Vec<u32> = (0..viewport.height).step_by(BAND_ROWS as usize).collect();
    let bands: Vec<(Vec<Complex64>, Option<(f64, f64)>)> = band_starts
        .par_iter()
        .map(|&row_start| {
            let rows = BAND_ROWS.min(viewport.height - row_start);
            evaluate_rows(expr, viewport, projection, row_start, rows)
        })
        .collect::<crate::Result<_>>()?;

    let mut values = Vec::with_capacity(viewport.pixel_count());
    let mut extrema: Option<(f64, f64)> = None;
    for (band_values, band_extrema) in bands {
        values.extend_from_slice(&band_values);
        if let Some((band_min, band_max)) = band_extrema {
            extrema = Some(match extrema {
                None => (band_min, band_max),
                Some((lo, hi)) => (lo.min(band_min), hi.max(band_max)),
            });
        }
    }
    let (min, max) = seeded_extrema(projection.apply(values[0]), extrema);

    info!(
        elapsed_ms = start.elapsed().as_millis(),
        min, max, "Evaluation complete"
    );

    Ok(ValueBuffer {
        width: viewport.width,
        height: viewport.height,
        values,
        min,
        max,
    })
}

/// Evaluate `rows` pixel rows starting at absolute row `row_start`.
///
/// The returned extrema cover the non-NaN scalars only (`None` when every
/// scalar is NaN); the caller applies the first-pixel seeding rule.
fn evaluate_rows<E: Expression + ?Sized>(
    expr: &E,
    viewport: &Viewport,
    projection: Projection,
    row_start: u32,
    rows: u32,
) -> crate::Result<(Vec<Complex64>, Option<(f64, f64)>)> {
    let mut values = Vec::with_capacity(viewport.width as usize * rows as usize);
    let mut extrema: Option<(f64, f64)> = None;

    for py in row_start..row_start + rows {
        for px in 0..viewport.width {
            let value = expr.evaluate(viewport.point_at(px, py))?;
            let scalar = projection.apply(value);
            if !scalar.is_nan() {
                extrema = Some(match extrema {
                    None => (scalar, scalar),
                    Some((lo, hi)) => (
                        if scalar < lo { scalar } else { lo },
                        if scalar > hi { scalar } else { hi },
                    ),
                });
            }
            values.push(value);
        }
    }

    Ok((values, extrema))
}

/// Resolve a frame's extrema from its first pixel's scalar and the running
/// non-NaN extrema. A NaN first pixel poisons the pair, matching what the
/// running comparisons of a sequential scan produce.
fn seeded_extrema(first: f64, extrema: Option<(f64, f64)>) -> (f64, f64) {
    if first.is_nan() {
        (f64::NAN, f64::NAN)
    } else {
        extrema.unwrap_or((first, first))
    }
}
