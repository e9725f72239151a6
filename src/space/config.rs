use std::path::PathBuf;
use std::str::FromStr;

use super::Dim;
use crate::error::ParameterError;

/// Parameters of a [`PolygonSpace`](super::PolygonSpace).
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSpaceConfig {
    /// Text file holding one `x y` vertex per line.
    pub file: PathBuf,
    /// Half of the extrusion length along Z. Must be positive in 3D.
    pub height: f64,
    /// Dimensionality of the simulation.
    pub dim: Dim,
}

impl PolygonSpaceConfig {
    /// Creates a 2D configuration with zero height for the given file.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            height: 0.0,
            dim: Dim::Two,
        }
    }

    /// Sets the half-height of the extrusion.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the dimensionality.
    #[must_use]
    pub fn with_dim(mut self, dim: Dim) -> Self {
        self.dim = dim;
        self
    }
}

/// Parses `polygon FILE [HEIGHT]`. The `polygon` keyword is optional.
impl FromStr for PolygonSpaceConfig {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();
        if tokens.peek() == Some(&"polygon") {
            tokens.next();
        }

        let file = tokens
            .next()
            .ok_or_else(|| ParameterError::Declaration("missing file name".into()))?;
        let mut config = Self::new(file);

        if let Some(token) = tokens.next() {
            config.height = token.parse().map_err(|_| {
                ParameterError::Declaration(format!("height `{token}' is not a number"))
            })?;
        }
        if let Some(extra) = tokens.next() {
            return Err(ParameterError::Declaration(format!(
                "unexpected token `{extra}'"
            )));
        }
        Ok(config)
    }
}
