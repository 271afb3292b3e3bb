//! Turns the free-form answer of a search model into candidate listings.
//!
//! Models are asked for a bare JSON array but answer in many shapes: the
//! array itself, the array inside a fenced code block, the array somewhere in
//! a paragraph of prose, or prose only. [`parse_llm_content`] tries each
//! shape in that order and reports which one worked.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::CarListing;

/// Keys under which models tend to nest the listing array.
const WRAPPER_KEYS: &[&str] = &["results", "cars", "listings", "data"];

/// Upper bound on start positions probed when hunting for embedded JSON.
const MAX_EMBEDDED_PROBES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    Direct,
    FencedBlock,
    Embedded,
    RawText,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Direct => "direct",
            ParseStrategy::FencedBlock => "fenced_block",
            ParseStrategy::Embedded => "embedded",
            ParseStrategy::RawText => "raw_text",
        }
    }

    /// Whether JSON had to be dug out of surrounding text.
    pub fn extraction_used(&self) -> bool {
        matches!(self, ParseStrategy::FencedBlock | ParseStrategy::Embedded)
    }
}

impl std::fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedContent {
    pub strategy: ParseStrategy,
    pub candidates: Vec<Value>,
}

impl ParsedContent {
    fn new(strategy: ParseStrategy, candidates: Vec<Value>) -> Self {
        Self {
            strategy,
            candidates,
        }
    }

    pub fn is_raw_text(&self) -> bool {
        self.strategy == ParseStrategy::RawText
    }
}

pub fn parse_llm_content(content: &str) -> ParsedContent {
    let trimmed = content.trim();

    if let Some(candidates) = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(candidates_from)
    {
        return ParsedContent::new(ParseStrategy::Direct, candidates);
    }

    for block in fenced_blocks(trimmed) {
        if let Some(candidates) = serde_json::from_str::<Value>(block.trim())
            .ok()
            .and_then(candidates_from)
        {
            return ParsedContent::new(ParseStrategy::FencedBlock, candidates);
        }
    }

    if let Some(candidates) = embedded_json(trimmed) {
        return ParsedContent::new(ParseStrategy::Embedded, candidates);
    }

    ParsedContent::new(ParseStrategy::RawText, Vec::new())
}

/// Unwrap a parsed JSON value into listing candidates.
fn candidates_from(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if matches!(map.get(*key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return Some(items);
                    }
                }
            }
            Some(vec![Value::Object(map)])
        }
        _ => None,
    }
}

/// Bodies of ``` fenced blocks, in order. The info string (`json`) on the
/// opening fence is skipped.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];

        match body.find("```") {
            Some(close) => {
                blocks.push(&body[..close]);
                rest = &body[close + 3..];
            }
            None => break,
        }
    }

    blocks
}

/// Find the first JSON array (or, failing that, object) inside prose.
///
/// Every `[` is tried as a start position and a single value is read from
/// there, ignoring whatever follows it. Arrays without any object in them,
/// such as citation markers like `[1]`, are skipped.
fn embedded_json(text: &str) -> Option<Vec<Value>> {
    let arrays = text
        .match_indices('[')
        .take(MAX_EMBEDDED_PROBES)
        .filter_map(|(i, _)| read_first_value(&text[i..]))
        .find_map(|value| match value {
            Value::Array(items) if items.iter().any(Value::is_object) => Some(items),
            _ => None,
        });

    if arrays.is_some() {
        return arrays;
    }

    text.match_indices('{')
        .take(MAX_EMBEDDED_PROBES)
        .filter_map(|(i, _)| read_first_value(&text[i..]))
        .find_map(|value| match value {
            Value::Object(_) => candidates_from(value),
            _ => None,
        })
}

fn read_first_value(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
}

/// Build a listing from one candidate, tolerating the loose typing models
/// produce: numbers as strings (`"245.000 kr"`), lists as comma-separated
/// text, and a few common alternative key names.
pub fn listing_from_value(value: &Value) -> Option<CarListing> {
    let map = value.as_object()?;

    Some(CarListing {
        title: text_field(map, &["title", "name", "titel"]),
        make: text_field(map, &["make", "brand", "maerke", "mærke"]),
        model: text_field(map, &["model"]),
        year: number_field(map, &["year", "model_year", "aargang", "årgang"]),
        mileage: number_field(map, &["mileage", "km", "kilometer"]),
        ask_price: number_field(map, &["ask_price", "price", "pris"]),
        monthly_price: number_field(map, &["monthly_price", "monthly", "maanedlig_ydelse"]),
        location: text_field(map, &["location", "city", "by"]),
        url: text_field(map, &["url", "link", "href"]),
        description: text_field(map, &["description", "beskrivelse"]),
        fuel_type: text_field(map, &["fuel_type", "fuel", "drivmiddel"]),
        transmission: text_field(map, &["transmission", "gear"]),
        engine_size: text_field(map, &["engine_size", "engine"]),
        power: text_field(map, &["power", "hk"]),
        equipment: list_field(map, &["equipment", "udstyr"]),
        images: list_field(map, &["images", "image"]),
        dealer: text_field(map, &["dealer", "forhandler", "seller"]),
        phone: text_field(map, &["phone", "telefon"]),
        email: text_field(map, &["email"]),
    })
}

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

fn text_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_present(map, keys)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_field(map: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    match first_present(map, keys)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => parse_loose_number(s),
        _ => None,
    }
}

/// Extract an integer from text such as `"245.000 kr"` or `"85 000 km"`.
///
/// Only the first number is read. A `.`, `,` or space followed by exactly
/// three digits is a thousands separator; anything else ends the number, so
/// `"3.495,00 kr/md"` is 3495 and `"2018-2019"` is 2018.
pub fn parse_loose_number(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    let start = chars.iter().position(char::is_ascii_digit)?;

    let mut digits = String::new();
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !(is_group_separator(c) && is_thousands_group(&chars[i + 1..])) {
            break;
        }
        i += 1;
    }

    let value = digits.parse::<i64>().ok()?;
    if trimmed.starts_with('-') {
        Some(-value)
    } else {
        Some(value)
    }
}

fn is_group_separator(c: char) -> bool {
    matches!(c, '.' | ',' | ' ' | '\u{a0}')
}

/// Exactly three digits, then a non-digit or the end.
fn is_thousands_group(rest: &[char]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(char::is_ascii_digit)
        && rest.get(3).map_or(true, |c| !c.is_ascii_digit())
}

fn list_field(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match first_present(map, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_array_directly() {
        let parsed = parse_llm_content(r#"  [{"title":"Audi A4","url":"https://www.bilbasen.dk/brugt/bil/audi/1"}]  "#);
        assert_eq!(parsed.strategy, ParseStrategy::Direct);
        assert_eq!(parsed.candidates.len(), 1);
        assert!(!parsed.strategy.extraction_used());
    }

    #[test]
    fn empty_array_is_a_valid_direct_answer() {
        let parsed = parse_llm_content("[]");
        assert_eq!(parsed.strategy, ParseStrategy::Direct);
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn unwraps_known_wrapper_objects() {
        let parsed = parse_llm_content(r#"{"results":[{"title":"a"},{"title":"b"}],"note":"x"}"#);
        assert_eq!(parsed.strategy, ParseStrategy::Direct);
        assert_eq!(parsed.candidates.len(), 2);

        let parsed = parse_llm_content(r#"{"cars":[{"title":"a"}]}"#);
        assert_eq!(parsed.candidates.len(), 1);
    }

    #[test]
    fn single_object_becomes_one_candidate() {
        let parsed = parse_llm_content(r#"{"title":"Audi A4","url":"https://dba.dk/bil/a4/id-123456"}"#);
        assert_eq!(parsed.strategy, ParseStrategy::Direct);
        assert_eq!(parsed.candidates.len(), 1);
    }

    #[test]
    fn reads_fenced_json_block() {
        let content = "Her er resultaterne:\n```json\n[{\"title\":\"BMW X3\"}]\n```\nHeld og lykke!";
        let parsed = parse_llm_content(content);
        assert_eq!(parsed.strategy, ParseStrategy::FencedBlock);
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.strategy.extraction_used());
    }

    #[test]
    fn skips_non_json_fenced_blocks() {
        let content = "```\nikke json\n```\nog så:\n```\n[{\"title\":\"VW Golf\"}]\n```";
        let parsed = parse_llm_content(content);
        assert_eq!(parsed.strategy, ParseStrategy::FencedBlock);
        assert_eq!(parsed.candidates[0]["title"], "VW Golf");
    }

    #[test]
    fn finds_array_embedded_in_prose_past_citations() {
        let content = "Jeg fandt disse biler [1][2]: [{\"title\":\"Audi Q5\",\"ask_price\":385000}] Kilder: [3]";
        let parsed = parse_llm_content(content);
        assert_eq!(parsed.strategy, ParseStrategy::Embedded);
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0]["title"], "Audi Q5");
    }

    #[test]
    fn finds_embedded_object_when_no_array() {
        let content = "Bedste fund: {\"title\":\"Audi e-tron\",\"year\":2022} - ring til forhandleren.";
        let parsed = parse_llm_content(content);
        assert_eq!(parsed.strategy, ParseStrategy::Embedded);
        assert_eq!(parsed.candidates.len(), 1);
    }

    #[test]
    fn falls_back_to_raw_text() {
        let parsed = parse_llm_content("Jeg kunne desværre ikke finde nogen biler [1].");
        assert!(parsed.is_raw_text());
        assert!(parsed.candidates.is_empty());
        assert!(!parsed.strategy.extraction_used());
    }

    #[test]
    fn scalar_json_is_treated_as_text() {
        assert!(parse_llm_content("\"bare en streng\"").is_raw_text());
        assert!(parse_llm_content("42").is_raw_text());
    }

    #[test]
    fn listing_conversion_is_lenient() {
        let value = json!({
            "name": "Audi A4 Avant",
            "price": "245.000 kr",
            "year": "2020",
            "km": 85000.0,
            "link": " https://www.bilbasen.dk/brugt/bil/audi/a4/12345678 ",
            "equipment": "navigation, læder, ",
            "images": ["https://img/1.jpg", 7, null],
            "location": null,
            "city": "Aarhus"
        });

        let listing = listing_from_value(&value).unwrap();
        assert_eq!(listing.title.as_deref(), Some("Audi A4 Avant"));
        assert_eq!(listing.ask_price, Some(245000));
        assert_eq!(listing.year, Some(2020));
        assert_eq!(listing.mileage, Some(85000));
        assert_eq!(
            listing.url.as_deref(),
            Some("https://www.bilbasen.dk/brugt/bil/audi/a4/12345678")
        );
        assert_eq!(listing.equipment, vec!["navigation", "læder"]);
        assert_eq!(listing.images, vec!["https://img/1.jpg", "7"]);
        assert_eq!(listing.location.as_deref(), Some("Aarhus"));
    }

    #[test]
    fn non_objects_are_not_listings() {
        assert!(listing_from_value(&json!("Audi")).is_none());
        assert!(listing_from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn loose_numbers() {
        assert_eq!(parse_loose_number("85 000 km"), Some(85000));
        assert_eq!(parse_loose_number("-1.500"), Some(-1500));
        assert_eq!(parse_loose_number("ukendt"), None);
        assert_eq!(parse_loose_number("1.234.567"), Some(1234567));
        assert_eq!(parse_loose_number("245,000 DKK"), Some(245000));
    }

    #[test]
    fn loose_numbers_stop_at_decimals() {
        assert_eq!(parse_loose_number("3.495,00 kr/md"), Some(3495));
        assert_eq!(parse_loose_number("4.199,5"), Some(4199));
        assert_eq!(parse_loose_number("3495.00"), Some(3495));
    }

    #[test]
    fn loose_numbers_read_only_the_first_of_a_range() {
        assert_eq!(parse_loose_number("fra 199.000 til 249.000 kr"), Some(199000));
        assert_eq!(parse_loose_number("2018-2019"), Some(2018));
        assert_eq!(parse_loose_number("2018 2019"), Some(2018));
    }

    #[test]
    fn danish_monthly_price_keeps_its_magnitude() {
        let listing = listing_from_value(&json!({
            "title": "Audi Q4 e-tron",
            "monthly_price": "3.495,00 kr/md",
            "year": "2018-2019"
        }))
        .unwrap();
        assert_eq!(listing.monthly_price, Some(3495));
        assert_eq!(listing.year, Some(2018));
    }

    #[test]
    fn embedded_probing_stops_after_the_probe_limit() {
        let citations = "[1]".repeat(MAX_EMBEDDED_PROBES);
        let content = format!("Kilder {citations}: [{{\"title\":\"Audi A4\"}},{{\"title\":\"BMW 320d\"}}]");

        // The array itself is never probed; the object fallback finds its first item.
        let parsed = parse_llm_content(&content);
        assert_eq!(parsed.strategy, ParseStrategy::Embedded);
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0]["title"], "Audi A4");

        let citations = "[1]".repeat(MAX_EMBEDDED_PROBES - 1);
        let content = format!("Kilder {citations}: [{{\"title\":\"Audi A4\"}},{{\"title\":\"BMW 320d\"}}]");
        assert_eq!(parse_llm_content(&content).candidates.len(), 2);
    }

    #[test]
    fn truncated_array_yields_its_first_complete_object() {
        let content = "Resultater: [{\"title\":\"Audi A4\"}, {\"title\":\"BMW 320d\", \"year\": 20";
        let parsed = parse_llm_content(content);
        assert_eq!(parsed.strategy, ParseStrategy::Embedded);
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0]["title"], "Audi A4");
    }
}
