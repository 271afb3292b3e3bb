use anyhow::Result;

use crate::cli::OutputFormat;
use crate::{FormOptions, SelectOption};

pub struct OptionsController;

impl OptionsController {
    pub fn options(&self, format: OutputFormat) -> Result<String> {
        let options = FormOptions::catalogue();

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&options)?,
            OutputFormat::Text => format_options(&options),
        })
    }
}

fn format_options(options: &FormOptions) -> String {
    let section = |title: &str, items: &[SelectOption]| {
        let lines: Vec<String> = items
            .iter()
            .map(|o| format!("  {:<28} {}", o.value, o.label))
            .collect();
        format!("{title}:\n{}\n", lines.join("\n"))
    };

    let mut out = String::new();
    out.push_str(&section("Fuel types", &options.fuel_types));
    out.push('\n');
    out.push_str(&section("Buy optimizations", &options.optimizations.buy));
    out.push('\n');
    out.push_str(&section("Leasing optimizations", &options.optimizations.leasing));
    out.push_str("\nSites:\n");
    for site in &options.sites {
        out.push_str(&format!("  {:<28} {}\n", site.value, site.label));
    }
    out.push_str(&format!("\nEquipment: {} options\n", options.equipment.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output_lists_sites_and_fuels() {
        let text = OptionsController.options(OutputFormat::Text).unwrap();
        assert!(text.contains("group:DK"));
        assert!(text.contains("Plugin Hybrid"));
    }

    #[test]
    fn json_output_is_the_catalogue() {
        let json = OptionsController.options(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fuel_types"][0]["value"], "benzin");
    }
}
