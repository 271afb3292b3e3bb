//! Stand-ins for marketplace integrations.
//!
//! Each source logs the search it would run and returns fixed adverts
//! labelled with the requested make. None of them touch the network.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::ListingSource;
use crate::domain::{current_year, CarListing, DomainError, SearchRequest};

const DEFAULT_YEAR_FROM: u32 = 2010;
const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

/// Every mock marketplace, in merge order.
pub fn default_listing_sources() -> Vec<Arc<dyn ListingSource>> {
    vec![
        Arc::new(BilbasenSource),
        Arc::new(DbaSource),
        Arc::new(AutoUncleSource),
    ]
}

fn primary_make(request: &SearchRequest) -> Result<&str, DomainError> {
    request
        .primary_make()
        .ok_or_else(|| DomainError::invalid_input("Missing required fields: mode, makes"))
}

pub struct BilbasenSource;

impl BilbasenSource {
    pub fn search_url(request: &SearchRequest) -> String {
        let makes = request.makes.join(",").to_lowercase();
        let year_from = request.year_from.unwrap_or(DEFAULT_YEAR_FROM);
        let year_to = request.year_to.unwrap_or_else(current_year);
        let max_price = request.max_price.unwrap_or(DEFAULT_MAX_PRICE);

        format!(
            "https://www.bilbasen.dk/brugt/bil?YearFrom={year_from}&YearTo={year_to}&PriceFrom=0&PriceTo={max_price}&Make={makes}"
        )
    }
}

#[async_trait]
impl ListingSource for BilbasenSource {
    fn name(&self) -> &str {
        "Bilbasen"
    }

    fn domain(&self) -> &str {
        "bilbasen.dk"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<CarListing>, DomainError> {
        let make = primary_make(request)?;
        info!("Searching Bilbasen: {}", Self::search_url(request));

        let slug = make.to_lowercase();
        Ok(vec![
            CarListing::new(
                format!("{make} A4 2.0 TDI"),
                format!("https://www.bilbasen.dk/brugt/bil/{slug}/12345678"),
            )
            .with_ask_price(245000)
            .with_year(2020)
            .with_mileage(85000)
            .with_location("København")
            .with_fuel_type("Diesel")
            .with_transmission("Automatgear"),
            CarListing::new(
                format!("{make} Q5 3.0 TDI"),
                format!("https://www.bilbasen.dk/brugt/bil/{slug}/12345679"),
            )
            .with_ask_price(385000)
            .with_year(2021)
            .with_mileage(65000)
            .with_location("Aarhus")
            .with_fuel_type("Diesel")
            .with_transmission("Automatgear"),
        ])
    }
}

pub struct DbaSource;

#[async_trait]
impl ListingSource for DbaSource {
    fn name(&self) -> &str {
        "DBA"
    }

    fn domain(&self) -> &str {
        "dba.dk"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<CarListing>, DomainError> {
        let make = primary_make(request)?;
        info!("Searching DBA: {}", request.makes.join(" ").to_lowercase());

        Ok(vec![CarListing::new(
            format!("{make} A3 1.6 TDI"),
            format!("https://www.dba.dk/bil/{}-a3/id-1234567890", make.to_lowercase()),
        )
        .with_ask_price(165000)
        .with_year(2019)
        .with_mileage(125000)
        .with_location("Odense")
        .with_fuel_type("Diesel")
        .with_transmission("Manuelt gear")])
    }
}

pub struct AutoUncleSource;

#[async_trait]
impl ListingSource for AutoUncleSource {
    fn name(&self) -> &str {
        "AutoUncle"
    }

    fn domain(&self) -> &str {
        "autouncle.dk"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<CarListing>, DomainError> {
        let make = primary_make(request)?;
        info!("Searching AutoUncle: {}", make);

        Ok(vec![CarListing::new(
            format!("{make} e-tron 55 quattro"),
            format!("https://www.autouncle.dk/da/brugte-biler/{make}/e-tron"),
        )
        .with_ask_price(425000)
        .with_year(2022)
        .with_mileage(45000)
        .with_location("Aalborg")
        .with_fuel_type("El")
        .with_transmission("Automatgear")])
    }
}
