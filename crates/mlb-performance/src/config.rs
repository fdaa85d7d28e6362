// Configuration loading and validation (assessment.toml).

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::Deserialize;
use thiserror::Error;

use crate::assessment::{
    CriteriaError, CriterionSpec, MinMaxNormalizationAssessor, MinimumThresholdParticipationAssessor,
    NormalizationCriteria, ParticipationPolicy, ParticipationRates, ParticipationThresholds,
    ProratedParticipationAssessor,
};
use crate::season::WeeklyAssessment;

const CONFIG_FILE: &str = "assessment.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("invalid normalization criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// assessment.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for assessment.toml.
#[derive(Debug, Clone, Deserialize)]
struct AssessmentFile {
    cadence: CadenceSection,
    participation: ParticipationConfig,
    scoring: ScoringConfig,
    criteria: CriteriaConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct CadenceSection {
    weekday: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Fixed,
    Prorated,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipationConfig {
    pub policy: PolicyKind,
    /// Required by the fixed policy.
    #[serde(default)]
    pub thresholds: Option<ParticipationThresholds>,
    /// Per-game minimums for the prorated policy.
    #[serde(default)]
    pub rates: ParticipationRates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Percentage change between two scores that counts as significant.
    pub score_change_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriteriaConfig {
    pub batting: Vec<CriterionSpec>,
    pub pitching: Vec<CriterionSpec>,
    pub fielding: Vec<CriterionSpec>,
}

/// Game-log CSV files, relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batting: String,
    pub pitching: String,
    pub fielding: String,
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub assessment_weekday: Weekday,
    pub participation: ParticipationConfig,
    pub scoring: ScoringConfig,
    pub criteria: CriteriaConfig,
    pub data_paths: DataPaths,
}

impl Config {
    /// Validated criteria for all three categories.
    pub fn build_criteria(&self) -> Result<NormalizationCriteria, ConfigError> {
        Ok(NormalizationCriteria::from_specs(
            &self.criteria.batting,
            &self.criteria.pitching,
            &self.criteria.fielding,
        )?)
    }

    pub fn build_performance_assessor(&self) -> Result<MinMaxNormalizationAssessor, ConfigError> {
        Ok(MinMaxNormalizationAssessor::new(self.build_criteria()?)
            .with_score_change_threshold(self.scoring.score_change_threshold))
    }

    pub fn build_participation_policy(&self) -> Result<ParticipationPolicy, ConfigError> {
        match self.participation.policy {
            PolicyKind::Fixed => {
                let thresholds = self.participation.thresholds.ok_or_else(|| {
                    ConfigError::ValidationError {
                        field: "participation.thresholds".into(),
                        message: "required when policy is \"fixed\"".into(),
                    }
                })?;
                Ok(ParticipationPolicy::Fixed(
                    MinimumThresholdParticipationAssessor::new(thresholds),
                ))
            }
            PolicyKind::Prorated => Ok(ParticipationPolicy::Prorated(
                ProratedParticipationAssessor::new(self.participation.rates),
            )),
        }
    }

    pub fn schedule(&self) -> WeeklyAssessment {
        WeeklyAssessment(self.assessment_weekday)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/assessment.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: AssessmentFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let assessment_weekday: Weekday =
        file.cadence
            .weekday
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                field: "cadence.weekday".into(),
                message: format!("`{}` is not a day of the week", file.cadence.weekday),
            })?;

    let config = Config {
        assessment_weekday,
        participation: file.participation,
        scoring: file.scoring,
        criteria: file.criteria,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/assessment.toml` into `config/` unless a config file is
/// already there. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let default = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(None);
    }
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in either defaults/ or config/ under {}",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&default, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;
    Ok(Some(target))
}

/// Loads config relative to the current working directory, copying
/// defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let threshold = config.scoring.score_change_threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scoring.score_change_threshold".into(),
            message: format!("must be a positive percentage, got {threshold}"),
        });
    }

    let rates = &config.participation.rates;
    let rate_fields: &[(&str, f64)] = &[
        (
            "participation.rates.plate_appearances_per_game",
            rates.plate_appearances_per_game,
        ),
        (
            "participation.rates.batters_faced_per_game",
            rates.batters_faced_per_game,
        ),
        (
            "participation.rates.total_chances_per_game",
            rates.total_chances_per_game,
        ),
    ];
    for (name, val) in rate_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be >= 0, got {val}"),
            });
        }
    }

    let paths: &[(&str, &str)] = &[
        ("data_paths.batting", &config.data_paths.batting),
        ("data_paths.pitching", &config.data_paths.pitching),
        ("data_paths.fielding", &config.data_paths.fielding),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    config.build_participation_policy()?;
    config.build_criteria()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
