// Normalization criteria: weighted, bounded, directional scoring rules.
//
// Everything is validated on construction. A `CategoryCriteria` that exists
// has weights in [0, 1] summing to one and bounds with min < max.

use serde::{Deserialize, Serialize};

use crate::stats::{BattingStat, FieldingStat, PitchingStat, StatCategory, StatKey};

/// Allowed drift of a category's weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriteriaError {
    #[error("weight for {category} stat `{stat}` must be within [0, 1], got {weight}")]
    WeightOutOfRange {
        category: StatCategory,
        stat: String,
        weight: f64,
    },

    #[error("bounds for {category} stat `{stat}` must satisfy min < max, got min={min} max={max}")]
    InvalidBounds {
        category: StatCategory,
        stat: String,
        min: f64,
        max: f64,
    },

    #[error("{category} stat `{stat}` has a non-finite weight or bound")]
    NonFinite { category: StatCategory, stat: String },

    #[error("`{stat}` is not a {category} stat")]
    UnknownStat { category: StatCategory, stat: String },

    #[error("{category} criteria weights must sum to 1, got {sum}")]
    WeightSum { category: StatCategory, sum: f64 },
}

// ---------------------------------------------------------------------------
// Single criterion
// ---------------------------------------------------------------------------

/// One scoring rule: the raw value of `stat` is min-max normalized against
/// `[min, max]`, optionally inverted, then weighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatCriterion<K: StatKey> {
    stat: K,
    weight: f64,
    invert: bool,
    min: f64,
    max: f64,
}

impl<K: StatKey> StatCriterion<K> {
    pub fn new(
        stat: K,
        weight: f64,
        invert: bool,
        min: f64,
        max: f64,
    ) -> Result<Self, CriteriaError> {
        let name = || stat.name().to_string();
        if !(weight.is_finite() && min.is_finite() && max.is_finite()) {
            return Err(CriteriaError::NonFinite {
                category: K::CATEGORY,
                stat: name(),
            });
        }
        if !(0.0..=1.0).contains(&weight) {
            return Err(CriteriaError::WeightOutOfRange {
                category: K::CATEGORY,
                stat: name(),
                weight,
            });
        }
        if min >= max {
            return Err(CriteriaError::InvalidBounds {
                category: K::CATEGORY,
                stat: name(),
                min,
                max,
            });
        }
        Ok(StatCriterion {
            stat,
            weight,
            invert,
            min,
            max,
        })
    }

    /// Build from an untyped spec, resolving the stat name in `K`'s key set.
    pub fn from_spec(spec: &CriterionSpec) -> Result<Self, CriteriaError> {
        let stat = K::from_name(&spec.stat).ok_or_else(|| CriteriaError::UnknownStat {
            category: K::CATEGORY,
            stat: spec.stat.clone(),
        })?;
        StatCriterion::new(stat, spec.weight, spec.invert, spec.min, spec.max)
    }

    pub fn stat(&self) -> K {
        self.stat
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// `raw` mapped into [0, 1] against the bounds, flipped when inverted.
    pub fn normalize(&self, raw: f64) -> f64 {
        let normalized = ((raw - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        if self.invert {
            1.0 - normalized
        } else {
            normalized
        }
    }

    /// This criterion's share of the score, in [0, weight].
    pub fn contribution(&self, raw: f64) -> f64 {
        self.normalize(raw) * self.weight
    }
}

// ---------------------------------------------------------------------------
// Per-category set
// ---------------------------------------------------------------------------

/// The criteria of one category. Weights sum to 1 within `WEIGHT_SUM_TOLERANCE`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCriteria<K: StatKey> {
    criteria: Vec<StatCriterion<K>>,
}

impl<K: StatKey> CategoryCriteria<K> {
    pub fn new(criteria: Vec<StatCriterion<K>>) -> Result<Self, CriteriaError> {
        let sum: f64 = criteria.iter().map(|c| c.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CriteriaError::WeightSum {
                category: K::CATEGORY,
                sum,
            });
        }
        Ok(CategoryCriteria { criteria })
    }

    pub fn from_specs(specs: &[CriterionSpec]) -> Result<Self, CriteriaError> {
        let criteria = specs
            .iter()
            .map(StatCriterion::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        CategoryCriteria::new(criteria)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatCriterion<K>> {
        self.criteria.iter()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// Untyped criterion as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub stat: String,
    pub weight: f64,
    #[serde(default)]
    pub invert: bool,
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// Full set
// ---------------------------------------------------------------------------

/// Criteria for all three categories.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationCriteria {
    batting: CategoryCriteria<BattingStat>,
    pitching: CategoryCriteria<PitchingStat>,
    fielding: CategoryCriteria<FieldingStat>,
}

impl NormalizationCriteria {
    pub fn new(
        batting: Vec<StatCriterion<BattingStat>>,
        pitching: Vec<StatCriterion<PitchingStat>>,
        fielding: Vec<StatCriterion<FieldingStat>>,
    ) -> Result<Self, CriteriaError> {
        Ok(NormalizationCriteria {
            batting: CategoryCriteria::new(batting)?,
            pitching: CategoryCriteria::new(pitching)?,
            fielding: CategoryCriteria::new(fielding)?,
        })
    }

    pub fn from_specs(
        batting: &[CriterionSpec],
        pitching: &[CriterionSpec],
        fielding: &[CriterionSpec],
    ) -> Result<Self, CriteriaError> {
        Ok(NormalizationCriteria {
            batting: CategoryCriteria::from_specs(batting)?,
            pitching: CategoryCriteria::from_specs(pitching)?,
            fielding: CategoryCriteria::from_specs(fielding)?,
        })
    }

    pub fn batting(&self) -> &CategoryCriteria<BattingStat> {
        &self.batting
    }

    pub fn pitching(&self) -> &CategoryCriteria<PitchingStat> {
        &self.pitching
    }

    pub fn fielding(&self) -> &CategoryCriteria<FieldingStat> {
        &self.fielding
    }
}
