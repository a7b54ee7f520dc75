use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maps a complex value to the single real scalar used for color scaling.
///
/// The evaluator tracks the running min/max of this scalar; the greyscale
/// color modes reuse it as the pixel intensity source. Serde names match the
/// wire format of the worker messages (`"realPart"`, `"phase"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Projection {
    Magnitude,
    RealPart,
    ImaginaryPart,
    Phase,
}

impl Projection {
    /// Project a complex value to its scalar.
    ///
    /// `Phase` uses the principal argument in `(-π, π]`.
    #[inline]
    pub fn apply(self, value: Complex64) -> f64 {
        match self {
            Self::Magnitude => value.norm(),
            Self::RealPart => value.re,
            Self::ImaginaryPart => value.im,
            Self::Phase => value.arg(),
        }
    }
}

impl std::str::FromStr for Projection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magnitude" | "mag" => Ok(Self::Magnitude),
            "realPart" | "real" => Ok(Self::RealPart),
            "imaginaryPart" | "imaginary" | "imag" => Ok(Self::ImaginaryPart),
            "phase" | "arg" => Ok(Self::Phase),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Magnitude => "magnitude",
            Self::RealPart => "realPart",
            Self::ImaginaryPart => "imaginaryPart",
            Self::Phase => "phase",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn magnitude_of_three_four() {
        let v = Complex64::new(3.0, 4.0);
        assert!((Projection::Magnitude.apply(v) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn real_and_imaginary_parts() {
        let v = Complex64::new(-1.5, 2.5);
        assert!((Projection::RealPart.apply(v) - (-1.5)).abs() < EPSILON);
        assert!((Projection::ImaginaryPart.apply(v) - 2.5).abs() < EPSILON);
    }

    #[test]
    fn phase_of_negative_real_axis() {
        let v = Complex64::new(-1.0, 0.0);
        assert!((Projection::Phase.apply(v) - PI).abs() < EPSILON);
    }

    #[test]
    fn wire_names_round_trip() {
        for p in [
            Projection::Magnitude,
            Projection::RealPart,
            Projection::ImaginaryPart,
            Projection::Phase,
        ] {
            let json = serde_json::to_string(&p).unwrap();
            let back: Projection = serde_json::from_str(&json).unwrap();
            assert_eq!(p, back);
        }
        assert_eq!(
            serde_json::to_string(&Projection::RealPart).unwrap(),
            "\"realPart\""
        );
    }

    #[test]
    fn parse_accepts_wire_and_short_names() {
        assert_eq!(
            "imaginaryPart".parse::<Projection>().unwrap(),
            Projection::ImaginaryPart
        );
        assert_eq!("imag".parse::<Projection>().unwrap(), Projection::ImaginaryPart);
        assert!("luminance".parse::<Projection>().is_err());
    }
}
