use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::site::expand_site_selection;
use crate::domain::DomainError;

/// Oldest model year accepted in a search.
pub const MIN_MODEL_YEAR: u32 = 1900;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Buy,
    Leasing,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Buy => "buy",
            SearchMode::Leasing => "leasing",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Benzin,
    Diesel,
    Ev,
    Hybrid,
    Phev,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Benzin,
        FuelType::Diesel,
        FuelType::Ev,
        FuelType::Hybrid,
        FuelType::Phev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Benzin => "benzin",
            FuelType::Diesel => "diesel",
            FuelType::Ev => "ev",
            FuelType::Hybrid => "hybrid",
            FuelType::Phev => "phev",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Benzin => "Benzin",
            FuelType::Diesel => "Diesel",
            FuelType::Ev => "El",
            FuelType::Hybrid => "Hybrid",
            FuelType::Phev => "Plugin Hybrid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "benzin" | "petrol" | "gasoline" => Some(FuelType::Benzin),
            "diesel" => Some(FuelType::Diesel),
            "ev" | "el" | "electric" => Some(FuelType::Ev),
            "hybrid" => Some(FuelType::Hybrid),
            "phev" | "plugin_hybrid" | "plugin hybrid" => Some(FuelType::Phev),
            _ => None,
        }
    }
}

/// Ranking preference for buyers, as `(value, label)`.
pub const BUY_OPTIMIZATIONS: &[(&str, &str)] = &[
    ("laveste_pris", "Laveste pris"),
    ("bedste_værdi", "Bedste værdi"),
    ("nyeste_årgang", "Nyeste årgang"),
    ("laveste_km", "Laveste km"),
    ("bedste_udstyr", "Bedste udstyr"),
    ("hurtigste_salg", "Hurtigste salg"),
];

/// Ranking preference for leasing customers, as `(value, label)`.
pub const LEASING_OPTIMIZATIONS: &[(&str, &str)] = &[
    ("laveste_månedlig", "Laveste månedlige"),
    ("laveste_udbetaling", "Laveste udbetaling"),
    ("bedste_værdi", "Bedste værdi"),
    ("kortest_bindingsperiode", "Kortest bindingsperiode"),
    ("bedste_service", "Bedste service"),
    ("laveste_total", "Laveste total"),
];

pub const DEFAULT_OPTIMIZATION: &str = "laveste_pris";

/// Human label for an optimization value; unknown values are shown as given
/// with underscores replaced.
pub fn optimization_label(value: &str) -> String {
    BUY_OPTIMIZATIONS
        .iter()
        .chain(LEASING_OPTIMIZATIONS.iter())
        .find(|(v, _)| *v == value)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| value.replace('_', " "))
}

pub fn current_year() -> u32 {
    chrono::Local::now().year() as u32
}

/// Search criteria as submitted by the form or the CLI.
///
/// `make`/`model` are accepted as single-value aliases for older clients and
/// folded into `makes`/`models` by [`SearchRequest::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub mode: Option<SearchMode>,
    #[serde(default)]
    pub makes: Vec<String>,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<u32>,
    #[serde(default)]
    pub fuel_types: Vec<FuelType>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downpayment_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<String>,
    #[serde(default)]
    pub sites: Vec<String>,
}

impl SearchRequest {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn with_makes(mut self, makes: Vec<String>) -> Self {
        self.makes = makes;
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_years(mut self, from: Option<u32>, to: Option<u32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    pub fn with_sites(mut self, sites: Vec<String>) -> Self {
        self.sites = sites;
        self
    }

    pub fn with_optimization(mut self, optimization: impl Into<String>) -> Self {
        self.optimization = Some(optimization.into());
        self
    }

    /// Trim every text field, drop blanks, and fold the legacy single
    /// `make`/`model` fields into the lists.
    pub fn normalized(mut self) -> Self {
        if let Some(make) = self.make.take() {
            if !self.makes.iter().any(|m| m.eq_ignore_ascii_case(make.trim())) {
                self.makes.insert(0, make);
            }
        }
        if let Some(model) = self.model.take() {
            if !self.models.iter().any(|m| m.eq_ignore_ascii_case(model.trim())) {
                self.models.insert(0, model);
            }
        }

        self.makes = clean_list(self.makes);
        self.models = clean_list(self.models);
        self.equipment = clean_list(self.equipment);
        self.sites = clean_list(self.sites);
        self.optimization = self
            .optimization
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
        self
    }

    pub fn mode_or_default(&self) -> SearchMode {
        self.mode.unwrap_or_default()
    }

    pub fn optimization(&self) -> Option<&str> {
        self.optimization.as_deref()
    }

    pub fn primary_make(&self) -> Option<&str> {
        self.makes.first().map(String::as_str)
    }

    /// Selected sites with groups expanded.
    pub fn expanded_sites(&self) -> Vec<String> {
        expand_site_selection(&self.sites)
    }

    pub fn validate_for_llm_search(&self) -> Result<(), DomainError> {
        if self.makes.is_empty() {
            return Err(DomainError::invalid_input(
                "Missing required fields: makes",
            ));
        }
        if self.expanded_sites().is_empty() {
            return Err(DomainError::invalid_input(
                "Missing required fields: sites",
            ));
        }
        self.validate_ranges()
    }

    pub fn validate_for_direct_search(&self) -> Result<(), DomainError> {
        if self.mode.is_none() || self.makes.is_empty() {
            return Err(DomainError::invalid_input(
                "Missing required fields: mode, makes",
            ));
        }
        self.validate_ranges()
    }

    fn validate_ranges(&self) -> Result<(), DomainError> {
        let max_year = current_year() + 1;

        for (field, year) in [("year_from", self.year_from), ("year_to", self.year_to)] {
            if let Some(year) = year {
                if !(MIN_MODEL_YEAR..=max_year).contains(&year) {
                    return Err(DomainError::invalid_input(format!(
                        "{field} must be between {MIN_MODEL_YEAR} and {max_year}"
                    )));
                }
            }
        }

        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                return Err(DomainError::invalid_input(
                    "year_from must not be later than year_to",
                ));
            }
        }

        for (field, price) in [
            ("max_price", self.max_price),
            ("monthly_max", self.monthly_max),
            ("downpayment_max", self.downpayment_max),
        ] {
            if let Some(price) = price {
                if !price.is_finite() || price <= 0.0 {
                    return Err(DomainError::invalid_input(format!(
                        "{field} must be a positive amount"
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("mode={}", self.mode_or_default()),
            format!("makes={:?}", self.makes),
        ];

        if !self.models.is_empty() {
            parts.push(format!("models={:?}", self.models));
        }
        if self.year_from.is_some() || self.year_to.is_some() {
            parts.push(format!(
                "years={}-{}",
                self.year_from.map(|y| y.to_string()).unwrap_or_default(),
                self.year_to.map(|y| y.to_string()).unwrap_or_default()
            ));
        }
        if let Some(price) = self.max_price {
            parts.push(format!("max_price={price}"));
        }
        if let Some(monthly) = self.monthly_max {
            parts.push(format!("monthly_max={monthly}"));
        }
        if let Some(ref optimization) = self.optimization {
            parts.push(format!("optimization={optimization}"));
        }
        parts.push(format!("sites={:?}", self.sites));

        parts.join(", ")
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audi_request() -> SearchRequest {
        SearchRequest::new(SearchMode::Buy)
            .with_makes(vec!["Audi".to_string()])
            .with_sites(vec!["group:DK".to_string()])
    }

    #[test]
    fn deserializes_form_payload() {
        let json = r#"{
            "mode": "leasing",
            "makes": ["BMW"],
            "models": ["X3"],
            "fuel_types": ["diesel", "phev"],
            "equipment": ["navigation"],
            "monthly_max": 4500,
            "tax_paid": true,
            "optimization": "laveste_månedlig",
            "sites": ["group:DK"]
        }"#;

        let request: SearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, Some(SearchMode::Leasing));
        assert_eq!(request.fuel_types, vec![FuelType::Diesel, FuelType::Phev]);
        assert_eq!(request.monthly_max, Some(4500.0));
        assert_eq!(request.optimization(), Some("laveste_månedlig"));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let request: SearchRequest = serde_json::from_str(r#"{"mode":"buy"}"#).unwrap();
        assert!(request.makes.is_empty());
        assert!(request.sites.is_empty());
        assert!(request.fuel_types.is_empty());
    }

    #[test]
    fn normalized_folds_legacy_fields_and_trims() {
        let request = SearchRequest {
            make: Some(" Audi ".to_string()),
            model: Some("A4".to_string()),
            makes: vec!["  ".to_string(), "BMW".to_string()],
            optimization: Some("  ".to_string()),
            ..SearchRequest::default()
        }
        .normalized();

        assert_eq!(request.makes, vec!["Audi", "BMW"]);
        assert_eq!(request.models, vec!["A4"]);
        assert!(request.make.is_none());
        assert!(request.optimization.is_none());
    }

    #[test]
    fn llm_search_requires_makes_and_sites() {
        let err = SearchRequest::new(SearchMode::Buy)
            .with_sites(vec!["dba.dk".to_string()])
            .validate_for_llm_search()
            .unwrap_err();
        assert!(err.to_string().contains("makes"));

        let err = SearchRequest::new(SearchMode::Buy)
            .with_makes(vec!["Audi".to_string()])
            .with_sites(vec!["group:XX".to_string()])
            .validate_for_llm_search()
            .unwrap_err();
        assert!(err.to_string().contains("sites"));

        assert!(audi_request().validate_for_llm_search().is_ok());
    }

    #[test]
    fn direct_search_requires_mode() {
        let request = SearchRequest {
            makes: vec!["Audi".to_string()],
            ..SearchRequest::default()
        };
        let err = request.validate_for_direct_search().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Missing required fields: mode, makes"
        );
    }

    #[test]
    fn rejects_inverted_or_out_of_range_years() {
        let err = audi_request()
            .with_years(Some(2022), Some(2018))
            .validate_for_llm_search()
            .unwrap_err();
        assert!(err.to_string().contains("year_from"));

        let err = audi_request()
            .with_years(Some(1850), None)
            .validate_for_llm_search()
            .unwrap_err();
        assert!(err.to_string().contains("year_from"));
    }

    #[test]
    fn rejects_non_positive_prices() {
        let mut request = audi_request();
        request.max_price = Some(0.0);
        let err = request.validate_for_llm_search().unwrap_err();
        assert!(err.to_string().contains("max_price"));
    }

    #[test]
    fn optimization_labels() {
        assert_eq!(optimization_label("laveste_km"), "Laveste km");
        assert_eq!(optimization_label("laveste_total"), "Laveste total");
        assert_eq!(optimization_label("egen_regel"), "egen regel");
    }

    #[test]
    fn fuel_type_parsing_accepts_danish_and_english() {
        assert_eq!(FuelType::from_str("El"), Some(FuelType::Ev));
        assert_eq!(FuelType::from_str("petrol"), Some(FuelType::Benzin));
        assert_eq!(FuelType::from_str("plugin hybrid"), Some(FuelType::Phev));
        assert_eq!(FuelType::from_str("steam"), None);
    }
}
