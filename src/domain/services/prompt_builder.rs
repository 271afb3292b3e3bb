use crate::domain::equipment::expand_equipment_terms;
use crate::domain::{optimization_label, SearchMode, SearchRequest};

/// Output contract appended to every search prompt.
const JSON_INSTRUCTIONS: &str = "\
Søg kun på de specificerede sites og returner resultater i JSON format med følgende struktur:
[
  {
    \"title\": \"bil titel\",
    \"url\": \"direkte link til annoncen\",
    \"ask_price\": pris_i_kr,
    \"monthly_price\": månedlig_ydelse_i_kr,
    \"year\": årstal,
    \"mileage\": kilometer,
    \"location\": \"by/område\"
  }
]

Returner kun annoncer der findes på de angivne sites, og kun links til konkrete annoncer (ikke søgesider).
Hvis JSON ikke er muligt, giv da et kort tekstsvar med de bedste fund.";

/// Render search criteria into the Danish buyer-assistant prompt sent to the
/// search model.
pub fn build_search_prompt(request: &SearchRequest) -> String {
    let mut criteria: Vec<String> = Vec::new();

    criteria.push(vehicle_clause(request));

    if let Some(years) = year_clause(request.year_from, request.year_to) {
        criteria.push(years);
    }

    if !request.fuel_types.is_empty() {
        let fuels = request
            .fuel_types
            .iter()
            .map(|f| f.label().to_lowercase())
            .collect::<Vec<_>>()
            .join(" eller ");
        criteria.push(format!("drivmiddel: {fuels}"));
    }

    criteria.extend(price_clauses(request));

    let equipment = expand_equipment_terms(&request.equipment);
    if !equipment.is_empty() {
        criteria.push(format!("med udstyr {equipment}"));
    }

    match request.tax_paid {
        Some(true) => criteria.push("kun biler med betalt registreringsafgift".to_string()),
        Some(false) => criteria.push("inkluder også biler uden betalt afgift".to_string()),
        None => {}
    }

    let optimization = request
        .optimization()
        .map(|o| format!(" (optimeret for {})", optimization_label(o).to_lowercase()))
        .unwrap_or_default();

    let sites = request.expanded_sites().join(", ");
    let action = match request.mode_or_default() {
        SearchMode::Buy => "søge efter brugte biler til køb",
        SearchMode::Leasing => "søge efter leasingtilbud",
    };

    format!(
        "Som bilkøber-assistent skal du {action}: {}{optimization} på følgende bilsites: {sites}.\n\n{JSON_INSTRUCTIONS}",
        criteria.join(", ")
    )
}

fn vehicle_clause(request: &SearchRequest) -> String {
    let makes = request.makes.join(" eller ");
    if request.models.is_empty() {
        makes
    } else {
        format!("{makes} (modeller: {})", request.models.join(", "))
    }
}

fn year_clause(from: Option<u32>, to: Option<u32>) -> Option<String> {
    match (from, to) {
        (Some(from), Some(to)) => Some(format!("fra {from} til {to}")),
        (Some(from), None) => Some(format!("fra {from}")),
        (None, Some(to)) => Some(format!("til {to}")),
        (None, None) => None,
    }
}

fn price_clauses(request: &SearchRequest) -> Vec<String> {
    let mut clauses = Vec::new();

    match request.mode_or_default() {
        SearchMode::Buy => {
            if let Some(price) = request.max_price {
                clauses.push(format!("maksimal pris {} kr", format_amount(price)));
            }
        }
        SearchMode::Leasing => {
            if let Some(monthly) = request.monthly_max {
                clauses.push(format!(
                    "maksimal månedlig ydelse {} kr",
                    format_amount(monthly)
                ));
            }
            if let Some(down) = request.downpayment_max {
                clauses.push(format!("maksimal udbetaling {} kr", format_amount(down)));
            }
        }
    }

    clauses
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount:.2}")
    }
}
