//! Static dataset and model catalog

use serde::Serialize;
use std::collections::BTreeMap;

/// A dataset feature and the source it is credited to
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub name: String,
    pub doi: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub metrics: BTreeMap<String, f64>,
    pub compatible_datasets: Vec<String>,
}

impl Model {
    pub fn supports(&self, dataset_id: &str) -> bool {
        self.compatible_datasets.iter().any(|d| d == dataset_id)
    }
}

/// Listing entry for a dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub feature_count: usize,
}

/// Listing entry for a model
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub metrics: BTreeMap<String, f64>,
    pub compatible_datasets: Vec<String>,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id.clone(),
            name: dataset.name.clone(),
            description: dataset.description.clone(),
            feature_count: dataset.features.len(),
        }
    }
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id.clone(),
            name: model.name.clone(),
            model_type: model.model_type.clone(),
            metrics: model.metrics.clone(),
            compatible_datasets: model.compatible_datasets.clone(),
        }
    }
}

/// Datasets and models in listing order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub datasets: Vec<Dataset>,
    pub models: Vec<Model>,
}

impl Catalog {
    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn model(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Built-in climate and biodiversity catalog
    pub fn sample() -> Self {
        let datasets = vec![
            dataset(
                "climate_data",
                "Climate Change Dataset",
                "Global climate indicators 1950-2023",
                &[
                    ("Temperature", "10.5061/dryad.temp123", "NOAA Temperature Dataset (Chen et al., 2022)"),
                    ("CO2 Levels", "10.5061/dryad.co2456", "Global Carbon Project (Davies, 2021)"),
                    ("Sea Level", "10.5061/dryad.sea789", "Satellite Altimetry Data (Martinez & Lee, 2023)"),
                    ("Ocean pH", "10.5061/dryad.ph0123", "Global Ocean Acidification Dataset (Johnson, 2021)"),
                    ("Ice Coverage", "10.5061/dryad.ice456", "Polar Ice Monitoring Project (Smith et al., 2022)"),
                ],
            ),
            dataset(
                "biodiversity_data",
                "Marine Biodiversity Dataset",
                "Species diversity across coral reef ecosystems",
                &[
                    ("Species Richness", "10.5061/dryad.rich123", "Global Reef Monitoring Network (Williams, 2021)"),
                    ("Coral Cover", "10.5061/dryad.coral456", "Coral Reef Studies (Garcia & Wong, 2022)"),
                    ("Water Quality", "10.5061/dryad.water789", "Ocean Quality Database (Lee et al., 2020)"),
                    ("Fishing Pressure", "10.5061/dryad.fish0123", "Global Fishing Watch (Kumar, 2023)"),
                    ("Tourism Impact", "10.5061/dryad.tour456", "Coastal Tourism Research (Smith, 2021)"),
                ],
            ),
        ];

        let models = vec![
            model(
                "temperature_prediction",
                "Global Temperature Prediction Model",
                "regression",
                &[("rmse", 0.42), ("r2", 0.89)],
                &["climate_data"],
            ),
            model(
                "biodiversity_assessment",
                "Coral Reef Biodiversity Assessment",
                "classification",
                &[("accuracy", 0.87), ("f1", 0.84)],
                &["biodiversity_data"],
            ),
            model(
                "climate_impact_model",
                "Climate Impact on Biodiversity Model",
                "regression",
                &[("rmse", 0.56), ("r2", 0.78)],
                &["climate_data", "biodiversity_data"],
            ),
        ];

        Self { datasets, models }
    }
}

fn dataset(id: &str, name: &str, description: &str, features: &[(&str, &str, &str)]) -> Dataset {
    Dataset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        features: features
            .iter()
            .map(|(name, doi, source)| Feature {
                name: name.to_string(),
                doi: doi.to_string(),
                source: source.to_string(),
            })
            .collect(),
    }
}

fn model(id: &str, name: &str, model_type: &str, metrics: &[(&str, f64)], compatible: &[&str]) -> Model {
    Model {
        id: id.to_string(),
        name: name.to_string(),
        model_type: model_type.to_string(),
        metrics: metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        compatible_datasets: compatible.iter().map(|d| d.to_string()).collect(),
    }
}
