use crate::model::Gate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Orderings applied to gates before greedy placement.
/// All three sort descending by their key and keep input order on ties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    /// `width + height + width * height`: large-area, large-perimeter gates first.
    AreaPerimeter,
    /// `width + height`.
    Perimeter,
    /// `max(width, height)`.
    MaxSide,
}

impl SortStrategy {
    /// Every ordering, in the order the portfolio tries them.
    pub const ALL: [SortStrategy; 3] = [Self::AreaPerimeter, Self::Perimeter, Self::MaxSide];

    /// Sort key for `gate`; larger keys are placed first.
    pub fn key(&self, gate: &Gate) -> u64 {
        let w = gate.width as u64;
        let h = gate.height as u64;
        match self {
            Self::AreaPerimeter => w + h + w * h,
            Self::Perimeter => w + h,
            Self::MaxSide => w.max(h),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AreaPerimeter => "area-perimeter",
            Self::Perimeter => "perimeter",
            Self::MaxSide => "max-side",
        }
    }
}

impl FromStr for SortStrategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "area-perimeter" | "area_perimeter" | "ap" => Ok(Self::AreaPerimeter),
            "2" | "perimeter" | "p" => Ok(Self::Perimeter),
            "3" | "max-side" | "max_side" | "ms" => Ok(Self::MaxSide),
            _ => Err(()),
        }
    }
}

/// User-facing strategy selector: a single ordering or the best-of-all portfolio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    AreaPerimeter,
    Perimeter,
    MaxSide,
    /// Pack with every ordering and keep the densest layout.
    Auto,
}

impl Strategy {
    /// Orderings to evaluate for this selector.
    pub fn candidates(&self) -> Vec<SortStrategy> {
        match self {
            Self::AreaPerimeter => vec![SortStrategy::AreaPerimeter],
            Self::Perimeter => vec![SortStrategy::Perimeter],
            Self::MaxSide => vec![SortStrategy::MaxSide],
            Self::Auto => SortStrategy::ALL.to_vec(),
        }
    }
}

impl From<SortStrategy> for Strategy {
    fn from(s: SortStrategy) -> Self {
        match s {
            SortStrategy::AreaPerimeter => Self::AreaPerimeter,
            SortStrategy::Perimeter => Self::Perimeter,
            SortStrategy::MaxSide => Self::MaxSide,
        }
    }
}

impl FromStr for Strategy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<SortStrategy>().map(Self::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Gate ordering, or `auto` to try all of them.
    #[serde(default = "default_strategy")]
    pub strategy: Strategy,
    /// Skip candidate points that were already emitted during the run.
    /// Layouts are identical either way; this only shrinks the frontier.
    #[serde(default)]
    pub dedup_candidates: bool,
    /// Evaluate `auto` candidates in parallel (requires feature "parallel").
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            dedup_candidates: false,
            parallel: default_parallel(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if `parallel` is requested but the crate was built
    /// without the `parallel` feature.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.parallel && !cfg!(feature = "parallel") {
            return Err(crate::error::GatePackError::InvalidConfig(
                "parallel evaluation requires the `parallel` feature".into(),
            ));
        }
        Ok(())
    }
}

fn default_strategy() -> Strategy {
    Strategy::AreaPerimeter
}
fn default_parallel() -> bool {
    false
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn strategy(mut self, v: Strategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    pub fn dedup_candidates(mut self, v: bool) -> Self {
        self.cfg.dedup_candidates = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
