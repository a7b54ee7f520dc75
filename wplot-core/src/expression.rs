use num_complex::Complex64;

use crate::error::CoreError;

/// The seam to the expression evaluator.
///
/// Parsing and compilation of an expression language are deliberately outside
/// this crate; whatever produced the expression, all the plotting pipeline
/// needs is "evaluate at `w`". Designed for **static dispatch** — the
/// evaluator is generic over `E: Expression` so the per-pixel call can be
/// inlined — but the trait is object-safe for callers that need to ship
/// expressions across threads as `Arc<dyn Expression + Send + Sync>`.
///
/// An implementation may fail (division by zero, domain errors, a bad parse
/// surfacing late). Failure is terminal for the whole render request; there
/// is no per-pixel recovery.
pub trait Expression {
    /// Evaluate the expression with the free variable bound to `w`.
    fn evaluate(&self, w: Complex64) -> crate::Result<Complex64>;
}

/// Any complex closure is an expression. Handy for tests and for callers
/// bridging in an external evaluator.
impl<F> Expression for F
where
    F: Fn(Complex64) -> crate::Result<Complex64>,
{
    fn evaluate(&self, w: Complex64) -> crate::Result<Complex64> {
        self(w)
    }
}

/// The built-in function set, selectable by name.
///
/// These are total over ℂ: poles and branch points produce non-finite
/// components, which the colorizer's degeneracy handling maps to intensity 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `w`
    Identity,
    /// `w²`
    Square,
    /// `w³`
    Cube,
    /// `1 / w`
    Inverse,
    /// `e^w`
    Exp,
    /// Principal branch of `ln w`
    Ln,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    /// `(w² − 1)(w − 2 − i)² / (w² + 2 + 2i)` — the classic domain-coloring
    /// showcase with visible zeros, a double zero, and poles.
    Demo,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Self::Identity,
        Self::Square,
        Self::Cube,
        Self::Inverse,
        Self::Exp,
        Self::Ln,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sinh,
        Self::Cosh,
        Self::Demo,
    ];

    /// Canonical name accepted by [`FromStr`](std::str::FromStr).
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "w",
            Self::Square => "square",
            Self::Cube => "cube",
            Self::Inverse => "inv",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Demo => "demo",
        }
    }
}

impl Expression for Builtin {
    fn evaluate(&self, w: Complex64) -> crate::Result<Complex64> {
        Ok(match self {
            Self::Identity => w,
            Self::Square => w * w,
            Self::Cube => w * w * w,
            Self::Inverse => w.inv(),
            Self::Exp => w.exp(),
            Self::Ln => w.ln(),
            Self::Sin => w.sin(),
            Self::Cos => w.cos(),
            Self::Tan => w.tan(),
            Self::Sinh => w.sinh(),
            Self::Cosh => w.cosh(),
            Self::Demo => {
                let i = Complex64::new(0.0, 1.0);
                let one = Complex64::new(1.0, 0.0);
                let a = w * w - one;
                let b = w - Complex64::new(2.0, 0.0) - i;
                let denom = w * w + Complex64::new(2.0, 2.0);
                a * b * b / denom
            }
        })
    }
}

impl std::str::FromStr for Builtin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" | "identity" => Ok(Self::Identity),
            "square" | "w^2" => Ok(Self::Square),
            "cube" | "w^3" => Ok(Self::Cube),
            "inv" | "1/w" => Ok(Self::Inverse),
            "exp" => Ok(Self::Exp),
            "ln" | "log" => Ok(Self::Ln),
            "sin" => Ok(Self::Sin),
            "cos" => Ok(Self::Cos),
            "tan" => Ok(Self::Tan),
            "sinh" => Ok(Self::Sinh),
            "cosh" => Ok(Self::Cosh),
            "demo" => Ok(Self::Demo),
            other => Err(CoreError::UnknownFunction(other.to_string())),
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
