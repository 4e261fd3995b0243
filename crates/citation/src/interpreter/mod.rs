//! Simulated model interpretation
//!
//! No model is executed. Contribution values are drawn from a flat Dirichlet
//! distribution with a fixed seed so that every analysis of the same
//! dataset, model and method returns the same attribution.

mod catalog;

pub use catalog::{Catalog, Dataset, DatasetSummary, Feature, Model, ModelSummary};

use aicif_common::AppError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Dirichlet, Distribution};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Chart colors, cycled per feature
pub const PALETTE: [&str; 6] = ["#3498db", "#2ecc71", "#e74c3c", "#f39c12", "#9b59b6", "#1abc9c"];

/// Simulated baseline of a waterfall chart
pub const SHAP_BASELINE: f64 = 0.5;

/// LIME values deviate from the base draw by at most this fraction
pub const LIME_JITTER: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationMethod {
    #[default]
    Shap,
    Lime,
}

impl ExplanationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shap => "shap",
            Self::Lime => "lime",
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Self::Shap => "SHAP",
            Self::Lime => "LIME",
        }
    }
}

impl fmt::Display for ExplanationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplanationMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shap" => Ok(Self::Shap),
            "lime" => Ok(Self::Lime),
            other => Err(AppError::InvalidFormat {
                message: format!("Unknown explanation method '{other}', expected 'shap' or 'lime'"),
            }),
        }
    }
}

/// Credit attributed to one feature's data source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    /// Source description of the feature
    pub feature: String,
    pub name: String,
    pub doi: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Waterfall,
    Bar,
}

/// Chart-ready view of a contribution analysis
#[derive(Debug, Clone, Serialize)]
pub struct ContributionChart {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub features: Vec<String>,
    pub values: Vec<f64>,
    pub sources: Vec<String>,
    pub colors: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub dataset: String,
    pub model: String,
    pub method: &'static str,
}

/// Attributes model output to the data sources behind each feature
#[derive(Debug, Clone)]
pub struct ModelInterpreter {
    catalog: Catalog,
    seed: u64,
}

impl ModelInterpreter {
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        Self { catalog, seed }
    }

    pub fn with_sample_catalog(seed: u64) -> Self {
        Self::new(Catalog::sample(), seed)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_datasets(&self) -> Vec<DatasetSummary> {
        self.catalog.datasets.iter().map(DatasetSummary::from).collect()
    }

    pub fn list_models(&self) -> Vec<ModelSummary> {
        self.catalog.models.iter().map(ModelSummary::from).collect()
    }

    /// Per-feature contributions, largest first
    ///
    /// Unknown dataset or model ids produce an empty list. SHAP values sum
    /// to one; LIME values are the same draw scaled by up to ten percent
    /// either way.
    pub fn analyze_contributions(
        &self,
        dataset_id: &str,
        model_id: &str,
        method: ExplanationMethod,
    ) -> Vec<FeatureContribution> {
        let (Some(dataset), Some(model)) = (self.catalog.dataset(dataset_id), self.catalog.model(model_id)) else {
            debug!(dataset_id, model_id, "Unknown dataset or model");
            return Vec::new();
        };

        if !model.supports(dataset_id) {
            warn!(dataset_id, model_id, "Model is not listed as compatible with dataset");
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let raw = flat_dirichlet(dataset.features.len(), &mut rng);

        let mut contributions: Vec<FeatureContribution> = dataset
            .features
            .iter()
            .zip(raw)
            .map(|(feature, base)| {
                let value = match method {
                    ExplanationMethod::Shap => base,
                    ExplanationMethod::Lime => base * (1.0 + rng.gen_range(-LIME_JITTER..LIME_JITTER)),
                };
                FeatureContribution {
                    feature: feature.source.clone(),
                    name: feature.name.clone(),
                    doi: feature.doi.clone(),
                    value: round_to(value, 4),
                    percentage: round_to(value * 100.0, 2),
                }
            })
            .collect();

        contributions.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

        debug!(
            dataset_id,
            model_id,
            method = method.as_str(),
            features = contributions.len(),
            "Computed feature contributions"
        );

        contributions
    }

    /// Waterfall (SHAP) or bar (LIME) chart data, `None` when there is
    /// nothing to chart
    pub fn generate_visualization(
        &self,
        dataset_id: &str,
        model_id: &str,
        method: ExplanationMethod,
    ) -> Option<ContributionChart> {
        let contributions = self.analyze_contributions(dataset_id, model_id, method);
        if contributions.is_empty() {
            return None;
        }

        let dataset = self.catalog.dataset(dataset_id)?;
        let model = self.catalog.model(model_id)?;

        let values: Vec<f64> = contributions.iter().map(|c| c.value).collect();
        let (chart_type, baseline, total) = match method {
            ExplanationMethod::Shap => (ChartType::Waterfall, Some(SHAP_BASELINE), Some(values.iter().sum::<f64>())),
            ExplanationMethod::Lime => (ChartType::Bar, None, None),
        };

        Some(ContributionChart {
            chart_type,
            features: contributions.iter().map(|c| c.name.clone()).collect(),
            sources: contributions.iter().map(|c| c.feature.clone()).collect(),
            colors: (0..contributions.len()).map(|i| PALETTE[i % PALETTE.len()]).collect(),
            values,
            baseline,
            total,
            dataset: dataset.name.clone(),
            model: model.name.clone(),
            method: method.as_upper(),
        })
    }
}

/// Sample `n` weights from Dirichlet(1, ..., 1)
fn flat_dirichlet(n: usize, rng: &mut StdRng) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => match Dirichlet::new(&vec![1.0; n]) {
            Ok(dist) => dist.sample(rng),
            Err(e) => {
                warn!(error = ?e, "Dirichlet construction failed, using uniform weights");
                vec![1.0 / n as f64; n]
            }
        },
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> ModelInterpreter {
        ModelInterpreter::with_sample_catalog(42)
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("SHAP".parse::<ExplanationMethod>().unwrap(), ExplanationMethod::Shap);
        assert_eq!(" lime ".parse::<ExplanationMethod>().unwrap(), ExplanationMethod::Lime);
        assert!("gradcam".parse::<ExplanationMethod>().is_err());
    }

    #[test]
    fn test_shap_values_sum_to_one() {
        let result = interpreter().analyze_contributions("climate_data", "temperature_prediction", ExplanationMethod::Shap);
        assert_eq!(result.len(), 5);

        let total: f64 = result.iter().map(|c| c.value).sum();
        assert!((total - 1.0).abs() < 1e-3, "sum was {total}");
        assert!(result.iter().all(|c| c.value >= 0.0));
    }

    #[test]
    fn test_sorted_descending() {
        let result = interpreter().analyze_contributions("biodiversity_data", "biodiversity_assessment", ExplanationMethod::Lime);
        assert!(result.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let a = interpreter().analyze_contributions("climate_data", "climate_impact_model", ExplanationMethod::Lime);
        let b = interpreter().analyze_contributions("climate_data", "climate_impact_model", ExplanationMethod::Lime);
        assert_eq!(a, b);
    }

    #[test]
    fn test_lime_stays_within_jitter_of_shap() {
        let interp = interpreter();
        let shap = interp.analyze_contributions("climate_data", "temperature_prediction", ExplanationMethod::Shap);
        let lime = interp.analyze_contributions("climate_data", "temperature_prediction", ExplanationMethod::Lime);
        assert_eq!(shap.len(), lime.len());

        for l in &lime {
            let s = shap.iter().find(|s| s.name == l.name).unwrap();
            assert!(l.value >= s.value * 0.9 - 1e-4, "{} too low", l.name);
            assert!(l.value <= s.value * 1.1 + 1e-4, "{} too high", l.name);
        }
        assert_ne!(shap, lime);

        let total: f64 = lime.iter().map(|c| c.value).sum();
        assert!((total - 1.0).abs() > 1e-9, "lime values unexpectedly sum to one");
    }

    #[test]
    fn test_contribution_fields() {
        let result = interpreter().analyze_contributions("climate_data", "temperature_prediction", ExplanationMethod::Shap);
        let temp = result.iter().find(|c| c.name == "Temperature").unwrap();
        assert_eq!(temp.doi, "10.5061/dryad.temp123");
        assert_eq!(temp.feature, "NOAA Temperature Dataset (Chen et al., 2022)");
        assert!((temp.percentage - temp.value * 100.0).abs() < 0.01);
    }

    #[test]
    fn test_unknown_ids_yield_nothing() {
        let interp = interpreter();
        assert!(interp.analyze_contributions("nope", "temperature_prediction", ExplanationMethod::Shap).is_empty());
        assert!(interp.analyze_contributions("climate_data", "nope", ExplanationMethod::Shap).is_empty());
        assert!(interp.generate_visualization("nope", "nope", ExplanationMethod::Lime).is_none());
    }

    #[test]
    fn test_incompatible_pair_is_still_analyzed() {
        let result = interpreter().analyze_contributions("biodiversity_data", "temperature_prediction", ExplanationMethod::Shap);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_waterfall_chart() {
        let chart = interpreter()
            .generate_visualization("climate_data", "temperature_prediction", ExplanationMethod::Shap)
            .unwrap();
        assert_eq!(chart.chart_type, ChartType::Waterfall);
        assert_eq!(chart.features.len(), 5);
        assert_eq!(chart.colors.len(), 5);
        assert_eq!(chart.baseline, Some(SHAP_BASELINE));
        assert!((chart.total.unwrap() - chart.values.iter().sum::<f64>()).abs() < 1e-12);
        assert_eq!(chart.dataset, "Climate Change Dataset");
        assert_eq!(chart.model, "Global Temperature Prediction Model");
        assert_eq!(chart.method, "SHAP");
    }

    #[test]
    fn test_bar_chart_omits_waterfall_fields() {
        let chart = interpreter()
            .generate_visualization("biodiversity_data", "climate_impact_model", ExplanationMethod::Lime)
            .unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["method"], "LIME");
        assert!(json.get("baseline").is_none());
        assert!(json.get("total").is_none());
    }

    #[test]
    fn test_flat_dirichlet_edge_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(flat_dirichlet(0, &mut rng).is_empty());
        assert_eq!(flat_dirichlet(1, &mut rng), vec![1.0]);
        let weights = flat_dirichlet(3, &mut rng);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
