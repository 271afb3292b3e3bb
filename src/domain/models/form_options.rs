use serde::Serialize;

use super::equipment::{EquipmentOption, EQUIPMENT_OPTIONS};
use super::search_request::{FuelType, BUY_OPTIMIZATIONS, LEASING_OPTIMIZATIONS};
use super::site::{SiteOption, SITE_OPTIONS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationOptions {
    pub buy: Vec<SelectOption>,
    pub leasing: Vec<SelectOption>,
}

/// The static choice tables a search form needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOptions {
    pub fuel_types: Vec<SelectOption>,
    pub optimizations: OptimizationOptions,
    pub equipment: Vec<EquipmentOption>,
    pub sites: Vec<SiteOption>,
}

impl FormOptions {
    pub fn catalogue() -> Self {
        let to_options = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(value, label)| SelectOption::new(value, label))
                .collect::<Vec<_>>()
        };

        Self {
            fuel_types: FuelType::ALL
                .iter()
                .map(|f| SelectOption::new(f.as_str(), f.label()))
                .collect(),
            optimizations: OptimizationOptions {
                buy: to_options(BUY_OPTIMIZATIONS),
                leasing: to_options(LEASING_OPTIMIZATIONS),
            },
            equipment: EQUIPMENT_OPTIONS.to_vec(),
            sites: SITE_OPTIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_exposes_every_table() {
        let options = FormOptions::catalogue();
        assert_eq!(options.fuel_types.len(), 5);
        assert_eq!(options.optimizations.buy.len(), 6);
        assert_eq!(options.optimizations.leasing.len(), 6);
        assert_eq!(options.equipment.len(), EQUIPMENT_OPTIONS.len());
        assert_eq!(options.sites.len(), SITE_OPTIONS.len());
    }

    #[test]
    fn site_groups_serialize_with_group_flag() {
        let json = serde_json::to_value(FormOptions::catalogue()).unwrap();
        assert_eq!(json["sites"][0]["value"], "group:DK");
        assert_eq!(json["sites"][0]["isGroup"], true);
        assert_eq!(json["sites"][2]["group"], "DK");
        assert!(json["sites"][2].get("isGroup").is_none());
    }
}
