//! Risk coefficient and time-discount model.
//!
//! The model produces a normalized weighting vector over risk-factor columns
//! and a time-decay multiplier applied to a person's static risk based on the
//! number of days since that person was last tested.

use std::str::FromStr;

use crate::config::RiskModelConfig;
use crate::error::{Result, RiskRosterError};

/// How the per-risk-factor coefficient vector is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientKind {
    /// All coefficients equal to `1/n`
    Uniform,
    /// Coefficients proportional to rank `1..n`, normalized to sum 1
    Linear,
    /// Coefficients taken from a stored base vector
    Custom,
}

impl CoefficientKind {
    /// String tag used in the flat configuration format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Linear => "linear",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for CoefficientKind {
    type Err = RiskRosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "linear" => Ok(Self::Linear),
            "custom" => Ok(Self::Custom),
            other => Err(RiskRosterError::configuration(
                "Risk coefficient",
                format!("kind must be one of uniform, linear, custom; given \"{other}\""),
            )),
        }
    }
}

/// How elapsed-days-since-last-test maps to a discount multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// `1 / (1 + exp(-a * (days - b)))` with stored `(a, b)`
    Sigmoid,
    /// Direct per-day lookup into a stored vector, saturating at both ends
    Custom,
}

impl DiscountKind {
    /// String tag used in the flat configuration format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for DiscountKind {
    type Err = RiskRosterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sigmoid" => Ok(Self::Sigmoid),
            "custom" => Ok(Self::Custom),
            other => Err(RiskRosterError::configuration(
                "Discount",
                format!("kind must be one of sigmoid, custom; given \"{other}\""),
            )),
        }
    }
}

/// Modified sigmoid used by the [`DiscountKind::Sigmoid`] discount
#[must_use]
pub fn modified_sigmoid(x: f64, coefficient: f64, shift: f64) -> f64 {
    1.0 / (1.0 + (-coefficient * (x - shift)).exp())
}

/// Parse a comma-separated vector of floats; entries that fail to parse
/// become `0.0` and empty entries are skipped.
#[must_use]
pub fn parse_csv_vector(s: &str) -> Vec<f64> {
    s.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| entry.trim().parse::<f64>().unwrap_or(0.0))
        .collect()
}

/// Risk coefficient and discount model.
///
/// Both halves of the model start out unconfigured; evaluating an
/// unconfigured half is a [`RiskRosterError::Configuration`] error.
#[derive(Debug, Clone, Default)]
pub struct RiskModel {
    coeff_kind: Option<CoefficientKind>,
    coeff_vector: Option<Vec<f64>>,
    discount_kind: Option<DiscountKind>,
    discount_vector: Option<Vec<f64>>,
}

impl RiskModel {
    /// Create an unconfigured model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from a flat configuration structure
    pub fn from_config(config: &RiskModelConfig) -> Result<Self> {
        let mut model = Self::new();
        if let Some(kind) = config.coeff_kind.as_deref() {
            model.set_coefficients(kind.parse()?, config.coeff_vector.clone())?;
        }
        if let Some(kind) = config.discount_kind.as_deref() {
            let vector = config.discount_vector.clone().ok_or_else(|| {
                RiskRosterError::configuration(
                    "Discount",
                    format!("kind \"{kind}\" was not configured with a vector"),
                )
            })?;
            model.set_discount(kind.parse()?, vector)?;
        }
        Ok(model)
    }

    /// Export the model as a flat configuration structure
    #[must_use]
    pub fn to_config(&self) -> RiskModelConfig {
        RiskModelConfig {
            coeff_kind: self.coeff_kind.map(|k| k.as_str().to_string()),
            coeff_vector: self.coeff_vector.clone(),
            discount_kind: self.discount_kind.map(|k| k.as_str().to_string()),
            discount_vector: self.discount_vector.clone(),
        }
    }

    /// Set the coefficient kind. The vector is required for
    /// [`CoefficientKind::Custom`] and ignored (cleared) otherwise.
    pub fn set_coefficients(
        &mut self,
        kind: CoefficientKind,
        vector: Option<Vec<f64>>,
    ) -> Result<()> {
        if kind == CoefficientKind::Custom && vector.is_none() {
            return Err(RiskRosterError::configuration(
                "Risk coefficient",
                "custom kind requires a coefficient vector",
            ));
        }
        self.coeff_kind = Some(kind);
        self.coeff_vector = if kind == CoefficientKind::Custom {
            vector
        } else {
            None
        };
        Ok(())
    }

    /// Set the discount kind and its parameter vector.
    ///
    /// For [`DiscountKind::Sigmoid`] the vector must hold exactly two
    /// entries: the scale `a` and the shift `b`.
    pub fn set_discount(&mut self, kind: DiscountKind, vector: Vec<f64>) -> Result<()> {
        if kind == DiscountKind::Sigmoid && vector.len() != 2 {
            return Err(RiskRosterError::configuration(
                "Discount",
                format!(
                    "sigmoid kind requires exactly 2 parameters (scale, shift); given {}",
                    vector.len()
                ),
            ));
        }
        self.discount_kind = Some(kind);
        self.discount_vector = Some(vector);
        Ok(())
    }

    /// Configured coefficient kind, if any
    #[must_use]
    pub const fn coefficient_kind(&self) -> Option<CoefficientKind> {
        self.coeff_kind
    }

    /// Configured discount kind, if any
    #[must_use]
    pub const fn discount_kind(&self) -> Option<DiscountKind> {
        self.discount_kind
    }

    /// Produce the coefficient vector for `n` risk-factor columns.
    ///
    /// For the custom kind a stored vector shorter than `n` is extended by
    /// repeating its last entry, and a longer one is truncated; neither case
    /// re-normalizes the result.
    pub fn coefficients(&self, n: usize) -> Result<Vec<f64>> {
        let kind = self.coeff_kind.ok_or_else(|| {
            RiskRosterError::configuration("Risk coefficient", "kind was not configured")
        })?;
        match kind {
            CoefficientKind::Uniform => {
                if n == 0 {
                    return Ok(Vec::new());
                }
                Ok(vec![1.0 / n as f64; n])
            }
            CoefficientKind::Linear => {
                let total: f64 = (n * (n + 1)) as f64 / 2.0;
                Ok((1..=n).map(|rank| rank as f64 / total).collect())
            }
            CoefficientKind::Custom => {
                let stored = self.coeff_vector.as_deref().ok_or_else(|| {
                    RiskRosterError::configuration(
                        "Risk coefficient",
                        "custom kind was not configured with a vector",
                    )
                })?;
                if stored.is_empty() {
                    return Err(RiskRosterError::configuration(
                        "Risk coefficient",
                        "custom coefficient vector is empty",
                    ));
                }
                let last = *stored.last().unwrap_or(&0.0);
                Ok(stored
                    .iter()
                    .copied()
                    .chain(std::iter::repeat(last))
                    .take(n)
                    .collect())
            }
        }
    }

    /// Discount multiplier in `[0, 1]` for a given number of elapsed days
    /// since the last test.
    ///
    /// The custom kind saturates: negative elapsed time yields `0.0` and
    /// elapsed time at or beyond the vector length yields `1.0` (fully
    /// decayed, equivalent to never tested).
    pub fn discount(&self, elapsed_days: i64) -> Result<f64> {
        let kind = self
            .discount_kind
            .ok_or_else(|| RiskRosterError::configuration("Discount", "kind was not configured"))?;
        let vector = self.discount_vector.as_deref().ok_or_else(|| {
            RiskRosterError::configuration(
                "Discount",
                format!("kind \"{}\" was not configured with a vector", kind.as_str()),
            )
        })?;
        match kind {
            DiscountKind::Sigmoid => {
                Ok(modified_sigmoid(elapsed_days as f64, vector[0], vector[1]))
            }
            DiscountKind::Custom => {
                if elapsed_days < 0 {
                    Ok(0.0)
                } else if elapsed_days as usize >= vector.len() {
                    Ok(1.0)
                } else {
                    Ok(vector[elapsed_days as usize])
                }
            }
        }
    }

    /// Bulk evaluation of [`RiskModel::discount`] over many elapsed values
    pub fn discounts<I>(&self, elapsed: I) -> Result<Vec<f64>>
    where
        I: IntoIterator<Item = i64>,
    {
        elapsed.into_iter().map(|days| self.discount(days)).collect()
    }
}
