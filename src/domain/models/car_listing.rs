use serde::{Deserialize, Serialize};

/// A single car offered for sale or lease on a marketplace.
///
/// Every field is optional because listings come from untrusted sources; the
/// validation pipeline decides which ones are good enough to show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CarListing {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_ask_price(mut self, price: i64) -> Self {
        self.ask_price = Some(price);
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_mileage(mut self, mileage: i64) -> Self {
        self.mileage = Some(mileage);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_fuel_type(mut self, fuel_type: impl Into<String>) -> Self {
        self.fuel_type = Some(fuel_type.into());
        self
    }

    pub fn with_transmission(mut self, transmission: impl Into<String>) -> Self {
        self.transmission = Some(transmission.into());
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// The title, or `"<make> <model>"` when only those are known.
    pub fn display_title(&self) -> Option<String> {
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return Some(title.to_string());
        }

        let make = self.make.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
        let model = self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())?;
        Some(format!("{make} {model}"))
    }

    /// One-line rendering used by the CLI.
    pub fn display_line(&self) -> String {
        let title = self.display_title().unwrap_or_else(|| "N/A".to_string());
        let year = self.year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string());
        let km = self
            .mileage
            .map(|m| format!("{} km", group_thousands(m)))
            .unwrap_or_else(|| "N/A".to_string());
        let price = match (self.ask_price, self.monthly_price) {
            (Some(p), _) => format!("{} kr", group_thousands(p)),
            (None, Some(m)) => format!("{} kr/md", group_thousands(m)),
            (None, None) => "N/A".to_string(),
        };
        let location = self.location.as_deref().unwrap_or("N/A");

        format!("{title} | {year} | {km} | {price} | {location}")
    }
}

/// Format a number with `.` as thousands separator, the Danish way.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_falls_back_to_make_and_model() {
        let listing = CarListing {
            make: Some("Audi".to_string()),
            model: Some("A6".to_string()),
            ..CarListing::default()
        };
        assert_eq!(listing.display_title().as_deref(), Some("Audi A6"));

        let listing = CarListing {
            title: Some("  ".to_string()),
            make: Some("Audi".to_string()),
            ..CarListing::default()
        };
        assert_eq!(listing.display_title(), None);
    }

    #[test]
    fn display_line_prefers_ask_price() {
        let listing = CarListing::new("Audi A4", "https://www.bilbasen.dk/brugt/bil/audi/1")
            .with_ask_price(245000)
            .with_year(2020)
            .with_mileage(85000)
            .with_location("København");

        assert_eq!(
            listing.display_line(),
            "Audi A4 | 2020 | 85.000 km | 245.000 kr | København"
        );
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(1234567), "1.234.567");
        assert_eq!(group_thousands(-4500), "-4.500");
    }

    #[test]
    fn serialization_skips_empty_fields() {
        let listing = CarListing::new("Audi A3", "https://www.dba.dk/bil/audi-a3/id-1");
        let json = serde_json::to_value(&listing).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("title"));
        assert!(object.contains_key("url"));
    }
}
