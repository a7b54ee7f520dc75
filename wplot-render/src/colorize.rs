use std::f64::consts::PI;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use wplot_core::{Complex64, CoreError, Projection};

use crate::buffer::RenderBuffer;
use crate::value_buffer::ValueBuffer;

/// Domain-coloring style, used when the projection alone doesn't determine
/// the color (the magnitude mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainStyle {
    /// Hue from phase; saturation and intensity from the fractional part of
    /// `ln|v|`, producing repeating brightness bands (a conformal "grid").
    #[serde(rename = "conformalColorThin")]
    ConformalThin,
    /// Hue from phase, full saturation, intensity from magnitude rescaled
    /// over the frame's `[min, max]`.
    #[serde(rename = "nonconformalColorWithValue")]
    NonconformalValue,
}

impl std::str::FromStr for DomainStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conformalColorThin" | "conformal" => Ok(Self::ConformalThin),
            "nonconformalColorWithValue" | "value" => Ok(Self::NonconformalValue),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

/// How a complex value becomes a pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Pure greyscale from the projection, rescaled over the frame extrema.
    Greyscale(Projection),
    /// Phase-as-hue domain coloring.
    Domain(DomainStyle),
}

impl ColorMode {
    /// The mode matching a projection: magnitude gets domain coloring in the
    /// given style, the scalar projections get greyscale.
    pub fn for_projection(projection: Projection, style: DomainStyle) -> Self {
        match projection {
            Projection::Magnitude => Self::Domain(style),
            p => Self::Greyscale(p),
        }
    }

    /// Color a single value. `min`/`max` must be the extrema of the matching
    /// projection over the frame; a mismatched pairing is the caller's bug
    /// and produces garbage rather than an error.
    pub fn color(self, value: Complex64, min: f64, max: f64) -> [u8; 4] {
        match self {
            // Phase ignores the frame extrema: the argument already lives in
            // a fixed range.
            Self::Greyscale(Projection::Phase) => greyscale(Projection::Phase, value, -PI, PI),
            Self::Greyscale(p) => greyscale(p, value, min, max),
            Self::Domain(DomainStyle::NonconformalValue) => {
                let hue = hue_from_value(value);
                let mut intensity = scale_to_unit(-value.norm(), -max, -min);
                if !intensity.is_finite() {
                    intensity = 0.0;
                }
                let [r, g, b] = hsv_to_rgb(hue, 1.0, intensity);
                [r, g, b, 255]
            }
            Self::Domain(DomainStyle::ConformalThin) => {
                let hue = hue_from_value(value);
                let log_magnitude = value.norm().ln();
                let fractional = log_magnitude - log_magnitude.floor();
                let mut saturation = linear_scale(fractional, 0.7, 1.0);
                let mut intensity = linear_scale(fractional, 0.7, 1.0);
                if !saturation.is_finite() {
                    saturation = 0.0;
                }
                if !intensity.is_finite() {
                    intensity = 0.0;
                }
                let [r, g, b] = hsv_to_rgb(hue, saturation, intensity);
                [r, g, b, 255]
            }
        }
    }
}

/// Fill an RGBA buffer from per-pixel complex values.
///
/// Writes 4 bytes per pixel; the buffer mutation is the only effect. The
/// buffer and value sequence must describe the same pixel grid (checked only
/// by debug assertion — well-formed requests are the caller's contract).
pub fn colorize(buffer: &mut RenderBuffer, values: &ValueBuffer, mode: ColorMode) {
    debug_assert_eq!(buffer.pixels.len(), values.values.len() * 4);
    let (min, max) = (values.min, values.max);
    buffer
        .pixels
        .par_chunks_mut(4)
        .zip(values.values.par_iter())
        .for_each(|(pixel, &value)| {
            pixel.copy_from_slice(&mode.color(value, min, max));
        });
}

/// Greyscale intensity from the negated projection rescaled over the negated
/// extrema, so smaller projections render brighter. Kept exactly as the
/// rescale the renderer has always used.
fn greyscale(projection: Projection, value: Complex64, min: f64, max: f64) -> [u8; 4] {
    let mut intensity = scale_to_unit(-projection.apply(value), -max, -min);
    if !intensity.is_finite() {
        intensity = 0.0;
    }
    let [r, g, b] = hsv_to_rgb(0.0, 0.0, intensity);
    [r, g, b, 255]
}

fn scale_to_unit(d: f64, min: f64, max: f64) -> f64 {
    (d - min) / (max - min)
}

fn linear_scale(d: f64, min: f64, max: f64) -> f64 {
    (max - min) * d + min
}

/// Hue in `[0, 360)` from the value's phase; the `arg == π` boundary wraps
/// to 0. Non-finite phases fall back to 0.
fn hue_from_value(value: Complex64) -> f64 {
    let mut hue = (PI + value.arg()) * 180.0 / PI;
    if !hue.is_finite() {
        hue = 0.0;
    }
    if hue >= 360.0 {
        hue -= 360.0;
    }
    hue
}

/// Standard HSV→RGB: hue in degrees `[0, 360)`, saturation and value in
/// `[0, 1]`, bytes via floor of a 0–255 linear scale.
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    [
        ((r + m) * 255.0).floor() as u8,
        ((g + m) * 255.0).floor() as u8,
        ((b + m) * 255.0).floor() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_buffer(values: Vec<Complex64>, min: f64, max: f64) -> ValueBuffer {
        let width = values.len() as u32;
        ValueBuffer {
            width,
            height: 1,
            values,
            min,
            max,
        }
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), [0, 0, 255]);
    }

    #[test]
    fn hsv_zero_saturation_is_grey() {
        let [r, g, b] = hsv_to_rgb(0.0, 0.0, 0.5);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, 127);
    }

    #[test]
    fn hue_covers_half_turn() {
        // arg(1) = 0 → hue 180 (cyan side); arg(i) = π/2 → hue 270.
        assert!((hue_from_value(Complex64::new(1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((hue_from_value(Complex64::new(0.0, 1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn hue_wraps_at_pi_boundary() {
        // arg(-1) = π would map to 360; it must wrap into [0, 360).
        let hue = hue_from_value(Complex64::new(-1.0, 0.0));
        assert!((0.0..360.0).contains(&hue));
        assert!(hue.abs() < 1e-9);
    }

    #[test]
    fn hue_of_origin_defaults_to_zero() {
        // arg(0) = 0, finite, so this is the π-offset half-turn hue.
        assert!((hue_from_value(Complex64::new(0.0, 0.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn greyscale_modes_emit_equal_channels() {
        let values = value_buffer(
            vec![
                Complex64::new(-1.0, 0.5),
                Complex64::new(0.2, -0.3),
                Complex64::new(2.0, 1.0),
            ],
            -1.0,
            2.0,
        );
        for mode in [
            ColorMode::Greyscale(Projection::RealPart),
            ColorMode::Greyscale(Projection::ImaginaryPart),
            ColorMode::Greyscale(Projection::Phase),
        ] {
            let mut buf = RenderBuffer::new(values.width, values.height);
            colorize(&mut buf, &values, mode);
            for px in buf.pixels.chunks_exact(4) {
                assert_eq!(px[0], px[1]);
                assert_eq!(px[1], px[2]);
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn greyscale_brighter_for_smaller_values() {
        // The rescale is inverted: smaller real part → higher intensity.
        let values = value_buffer(
            vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            0.0,
            1.0,
        );
        let mut buf = RenderBuffer::new(2, 1);
        colorize(&mut buf, &values, ColorMode::Greyscale(Projection::RealPart));
        assert!(buf.pixels[0] > buf.pixels[4]);
        assert_eq!(buf.pixels[0], 255);
        assert_eq!(buf.pixels[4], 0);
    }

    #[test]
    fn degenerate_extrema_render_black() {
        // min == max makes the rescale divide by zero; intensity must be
        // forced to 0, not NaN.
        let values = value_buffer(vec![Complex64::new(1.0, 0.0); 3], 1.0, 1.0);
        let mut buf = RenderBuffer::new(3, 1);
        colorize(&mut buf, &values, ColorMode::Greyscale(Projection::RealPart));
        for px in buf.pixels.chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn conformal_zero_magnitude_is_black() {
        // ln(0) is non-finite; saturation and intensity collapse to 0.
        let values = value_buffer(vec![Complex64::new(0.0, 0.0)], 0.0, 1.0);
        let mut buf = RenderBuffer::new(1, 1);
        colorize(&mut buf, &values, ColorMode::Domain(DomainStyle::ConformalThin));
        assert_eq!(&buf.pixels[..], &[0, 0, 0, 255]);
    }

    #[test]
    fn conformal_band_ramp_repeats_per_log_unit() {
        // |v| = e^0.25 and |v| = e^1.25 share a fractional log magnitude,
        // so they get identical colors up to hue.
        let a = ColorMode::Domain(DomainStyle::ConformalThin).color(
            Complex64::new(0.25f64.exp(), 0.0),
            0.0,
            10.0,
        );
        let b = ColorMode::Domain(DomainStyle::ConformalThin).color(
            Complex64::new(1.25f64.exp(), 0.0),
            0.0,
            10.0,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn nonconformal_uses_frame_extrema() {
        let mode = ColorMode::Domain(DomainStyle::NonconformalValue);
        // Magnitude at max → intensity 0 (inverted rescale) → black.
        let at_max = mode.color(Complex64::new(2.0, 0.0), 0.0, 2.0);
        assert_eq!(at_max, [0, 0, 0, 255]);
        // Magnitude at min → full intensity, saturated hue.
        let at_min = mode.color(Complex64::new(0.5, 0.0), 0.5, 2.0);
        assert_ne!(&at_min[..3], &[0, 0, 0]);
        assert_eq!(at_min[3], 255);
    }

    #[test]
    fn alpha_is_always_opaque() {
        let values = value_buffer(
            vec![
                Complex64::new(0.0, 0.0),
                Complex64::new(f64::INFINITY, 0.0),
                Complex64::new(f64::NAN, f64::NAN),
            ],
            0.0,
            0.0,
        );
        for mode in [
            ColorMode::Greyscale(Projection::RealPart),
            ColorMode::Domain(DomainStyle::ConformalThin),
            ColorMode::Domain(DomainStyle::NonconformalValue),
        ] {
            let mut buf = RenderBuffer::new(3, 1);
            colorize(&mut buf, &values, mode);
            for px in buf.pixels.chunks_exact(4) {
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn mode_for_projection() {
        assert_eq!(
            ColorMode::for_projection(Projection::Magnitude, DomainStyle::ConformalThin),
            ColorMode::Domain(DomainStyle::ConformalThin)
        );
        assert_eq!(
            ColorMode::for_projection(Projection::Phase, DomainStyle::ConformalThin),
            ColorMode::Greyscale(Projection::Phase)
        );
    }

    #[test]
    fn style_wire_names_round_trip() {
        let json = serde_json::to_string(&DomainStyle::ConformalThin).unwrap();
        assert_eq!(json, "\"conformalColorThin\"");
        assert_eq!(
            "nonconformalColorWithValue".parse::<DomainStyle>().unwrap(),
            DomainStyle::NonconformalValue
        );
    }
}
