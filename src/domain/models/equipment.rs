use serde::Serialize;

/// Grouping used by the equipment picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    ClimateComfort,
    Technology,
    Safety,
    CamerasParking,
    Lighting,
    Exterior,
    WheelsSuspension,
    Engine,
    Transmission,
    Convenience,
    Interior,
    Storage,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipmentOption {
    pub value: &'static str,
    pub label: &'static str,
    pub category: EquipmentCategory,
}

const fn opt(value: &'static str, label: &'static str, category: EquipmentCategory) -> EquipmentOption {
    EquipmentOption {
        value,
        label,
        category,
    }
}

use EquipmentCategory::*;

pub const EQUIPMENT_OPTIONS: &[EquipmentOption] = &[
    opt("2_zone_klima", "2 zone klima", ClimateComfort),
    opt("3_zone_klima", "3 zone klima", ClimateComfort),
    opt("automatisk_klima", "Automatisk klima", ClimateComfort),
    opt("klimaanlaeg", "Klimaanlæg", ClimateComfort),
    opt("saedevarme", "Sædevarme", ClimateComfort),
    opt("saedekøling", "Sædekøling", ClimateComfort),
    opt("ventilerede_saeder", "Ventilerede sæder", ClimateComfort),
    opt("massage_saeder", "Massage sæder", ClimateComfort),
    opt("el_saeder", "El-sæder", ClimateComfort),
    opt("memory_saeder", "Memory sæder", ClimateComfort),
    opt("laeder", "Læder", ClimateComfort),
    opt("alcantara", "Alcantara", ClimateComfort),
    opt("sport_saeder", "Sport sæder", ClimateComfort),

    opt("navigation", "Navigation", Technology),
    opt("gps", "GPS", Technology),
    opt("bluetooth", "Bluetooth", Technology),
    opt("android_auto", "Android Auto", Technology),
    opt("apple_carplay", "Apple CarPlay", Technology),
    opt("wifi", "WiFi", Technology),
    opt("usb", "USB", Technology),
    opt("aux", "AUX", Technology),
    opt("cd_afspiller", "CD afspiller", Technology),
    opt("dab_radio", "DAB radio", Technology),
    opt("harman_kardon", "Harman Kardon", Technology),
    opt("bose", "Bose", Technology),
    opt("bang_olufsen", "Bang & Olufsen", Technology),
    opt("premium_lyd", "Premium lyd", Technology),

    opt("abs", "ABS", Safety),
    opt("esp", "ESP", Safety),
    opt("airbags", "Airbags", Safety),
    opt("side_airbags", "Side airbags", Safety),
    opt("gardin_airbags", "Gardin airbags", Safety),
    opt("adaptiv_fartpilot", "Adaptiv fartpilot", Safety),
    opt("fartpilot", "Fartpilot", Safety),
    opt("lane_assist", "Lane assist", Safety),
    opt("blind_spot", "Blind spot", Safety),
    opt("collision_warning", "Collision warning", Safety),
    opt("emergency_brake", "Emergency brake", Safety),
    opt("traffic_sign_recognition", "Traffic sign recognition", Safety),
    opt("driver_attention", "Driver attention", Safety),
    opt("night_vision", "Night vision", Safety),

    opt("360_kamera", "360° kamera", CamerasParking),
    opt("bakkamera", "Bakkamera", CamerasParking),
    opt("frontkamera", "Frontkamera", CamerasParking),
    opt("sidekamera", "Sidekamera", CamerasParking),
    opt("parkeringssensorer", "Parkeringssensorer", CamerasParking),
    opt("park_assist", "Park assist", CamerasParking),
    opt("automatisk_parkering", "Automatisk parkering", CamerasParking),

    opt("xenon", "Xenon", Lighting),
    opt("led_forlygter", "LED forlygter", Lighting),
    opt("led_baglygter", "LED baglygter", Lighting),
    opt("matrix_led", "Matrix LED", Lighting),
    opt("adaptive_lys", "Adaptive lys", Lighting),
    opt("automatiske_lygter", "Automatiske lygter", Lighting),
    opt("tågelygter", "Tågelygter", Lighting),
    opt("dagslys", "Dagslys", Lighting),

    opt("panoramatag", "Panoramatag", Exterior),
    opt("soltag", "Soltag", Exterior),
    opt("el_soltag", "El-soltag", Exterior),
    opt("tagbøjler", "Tagbøjler", Exterior),
    opt("tagbox", "Tagbox", Exterior),
    opt("anhængertræk", "Anhængertræk", Exterior),
    opt("el_anhængertræk", "El-anhængertræk", Exterior),
    opt("metallic_lak", "Metallic lak", Exterior),
    opt("perlelak", "Perlelak", Exterior),

    opt("alufælge", "Alufælge", WheelsSuspension),
    opt("sport_undervogn", "Sport undervogn", WheelsSuspension),
    opt("luftundervogn", "Luftundervogn", WheelsSuspension),
    opt("adaptiv_undervogn", "Adaptiv undervogn", WheelsSuspension),
    opt("sport_styring", "Sport styring", WheelsSuspension),

    opt("turbo", "Turbo", Engine),
    opt("kompressor", "Kompressor", Engine),
    opt("sport_mode", "Sport mode", Engine),
    opt("eco_mode", "Eco mode", Engine),
    opt("start_stop", "Start/stop", Engine),

    opt("automatgear", "Automatgear", Transmission),
    opt("tiptronic", "Tiptronic", Transmission),
    opt("dsg", "DSG", Transmission),
    opt("cvt", "CVT", Transmission),
    opt("firehjulstræk", "Firehjulstræk", Transmission),
    opt("quattro", "Quattro", Transmission),
    opt("xdrive", "xDrive", Transmission),
    opt("4matic", "4MATIC", Transmission),

    opt("keyless_go", "Keyless Go", Convenience),
    opt("keyless_entry", "Keyless Entry", Convenience),
    opt("el_bagklap", "El-bagklap", Convenience),
    opt("el_vinduer", "El-vinduer", Convenience),
    opt("el_spejle", "El-spejle", Convenience),
    opt("foldbare_spejle", "Foldbare spejle", Convenience),
    opt("opvarmede_spejle", "Opvarmede spejle", Convenience),
    opt("regnsensor", "Regnsensor", Convenience),
    opt("lyssensor", "Lyssensor", Convenience),

    opt("multifunktionsrat", "Multifunktionsrat", Interior),
    opt("el_rat", "El-rat", Interior),
    opt("opvarmet_rat", "Opvarmet rat", Interior),
    opt("læder_rat", "Læder rat", Interior),
    opt("sport_rat", "Sport rat", Interior),
    opt("head_up_display", "Head-up display", Interior),
    opt("digital_cockpit", "Digital cockpit", Interior),
    opt("instrumentpanel", "Instrumentpanel", Interior),

    opt("krog_bagagerum", "Krog bagagerum", Storage),
    opt("net_bagagerum", "Net bagagerum", Storage),
    opt("skileje", "Skileje", Storage),
    opt("opbevaringspakke", "Opbevaringspakke", Storage),
    opt("bagagerumsafdækning", "Bagagerumsafdækning", Storage),

    opt("hybrid", "Hybrid", Special),
    opt("plugin_hybrid", "Plugin hybrid", Special),
    opt("el_bil", "El-bil", Special),
    opt("mild_hybrid", "Mild hybrid", Special),
    opt("adblue", "AdBlue", Special),
    opt("dpf_filter", "DPF filter", Special),
];

/// The wording variants Danish marketplaces use for one piece of equipment,
/// plus a ready-made OR pattern for search prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentSynonym {
    pub term: &'static str,
    pub synonyms: &'static [&'static str],
    pub search_pattern: &'static str,
}

impl EquipmentSynonym {
    fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        self.term.to_lowercase() == candidate
            || self.synonyms.iter().any(|s| s.to_lowercase() == candidate)
    }
}

pub const EQUIPMENT_SYNONYMS: &[EquipmentSynonym] = &[
    EquipmentSynonym {
        term: "læder",
        synonyms: &["læder", "leather", "læderindtræk", "læder interiør", "læder sæder", "skindinteriør"],
        search_pattern: "(læder OR leather OR læderindtræk OR 'læder interiør' OR 'læder sæder' OR skindinteriør)",
    },
    EquipmentSynonym {
        term: "sportssæder",
        synonyms: &["sportssæder", "sportsæder", "sport seats", "sport sæder", "S-line sæder", "sportsstole"],
        search_pattern: "(sportssæder OR sportsæder OR 'sport seats' OR 'sport sæder' OR 'S-line sæder' OR sportsstole)",
    },
    EquipmentSynonym {
        term: "panoramatag",
        synonyms: &["panoramatag", "panorama tag", "soltag", "glasstag", "panoramic roof", "sunroof"],
        search_pattern: "(panoramatag OR 'panorama tag' OR soltag OR glasstag OR 'panoramic roof' OR sunroof)",
    },
    EquipmentSynonym {
        term: "navigation",
        synonyms: &["navigation", "navi", "GPS", "navigationssystem", "infotainment", "MMI", "iDrive"],
        search_pattern: "(navigation OR navi OR GPS OR navigationssystem OR infotainment OR MMI OR iDrive)",
    },
    EquipmentSynonym {
        term: "klimaanlæg",
        synonyms: &["klimaanlæg", "aircon", "aircondition", "klima", "automatisk klima", "2-zone klima"],
        search_pattern: "(klimaanlæg OR aircon OR aircondition OR klima OR 'automatisk klima' OR '2-zone klima')",
    },
    EquipmentSynonym {
        term: "xenon",
        synonyms: &["xenon", "xenon lys", "HID", "bi-xenon", "LED forlygter", "adaptive lys"],
        search_pattern: "(xenon OR 'xenon lys' OR HID OR bi-xenon OR 'LED forlygter' OR 'adaptive lys')",
    },
    EquipmentSynonym {
        term: "fartpilot",
        synonyms: &["fartpilot", "cruise control", "adaptive cruise", "ACC", "speed pilot"],
        search_pattern: "(fartpilot OR 'cruise control' OR 'adaptive cruise' OR ACC OR 'speed pilot')",
    },
    EquipmentSynonym {
        term: "parkeringssensor",
        synonyms: &["parkeringssensor", "PDC", "parking sensor", "parkeringshjælp", "bagparkeringssensor"],
        search_pattern: "(parkeringssensor OR PDC OR 'parking sensor' OR parkeringshjælp OR bagparkeringssensor)",
    },
    EquipmentSynonym {
        term: "bakspejl",
        synonyms: &["bakspejl", "bakkamera", "rear camera", "parkeringskamera", "360 kamera"],
        search_pattern: "(bakspejl OR bakkamera OR 'rear camera' OR parkeringskamera OR '360 kamera')",
    },
    EquipmentSynonym {
        term: "bluetooth",
        synonyms: &["bluetooth", "hands-free", "telefon", "streaming", "wireless"],
        search_pattern: "(bluetooth OR hands-free OR telefon OR streaming OR wireless)",
    },
    EquipmentSynonym {
        term: "metallic",
        synonyms: &["metallic", "metallic lak", "perlelak", "special lak", "metallic maling"],
        search_pattern: "(metallic OR 'metallic lak' OR perlelak OR 'special lak' OR 'metallic maling')",
    },
    EquipmentSynonym {
        term: "fælge",
        synonyms: &["fælge", "alufælge", "alloy wheels", "sportsfælge", "lette fælge"],
        search_pattern: "(fælge OR alufælge OR 'alloy wheels' OR sportsfælge OR 'lette fælge')",
    },
];

pub fn find_option(value: &str) -> Option<&'static EquipmentOption> {
    EQUIPMENT_OPTIONS.iter().find(|o| o.value == value)
}

/// Display label for an equipment value; unknown values are made readable by
/// replacing underscores with spaces.
pub fn equipment_label(value: &str) -> String {
    find_option(value)
        .map(|o| o.label.to_string())
        .unwrap_or_else(|| value.replace('_', " "))
}

fn find_synonym(term: &str) -> Option<&'static EquipmentSynonym> {
    let label = equipment_label(term);
    EQUIPMENT_SYNONYMS
        .iter()
        .find(|s| s.matches(term) || s.matches(&label))
}

/// Render equipment terms as a search expression, expanding known terms into
/// their synonym OR-pattern and quoting the rest. Parts are joined with `AND`.
pub fn expand_equipment_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.trim().is_empty())
        .map(|term| match find_synonym(term) {
            Some(synonym) => synonym.search_pattern.to_string(),
            None => format!("\"{}\"", equipment_label(term)),
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// All known wordings for `term`, or just the term itself.
pub fn equipment_synonyms(term: &str) -> Vec<String> {
    match find_synonym(term) {
        Some(synonym) => synonym.synonyms.iter().map(|s| s.to_string()).collect(),
        None => vec![term.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_values_are_unique() {
        for (i, option) in EQUIPMENT_OPTIONS.iter().enumerate() {
            assert!(
                EQUIPMENT_OPTIONS[i + 1..].iter().all(|o| o.value != option.value),
                "duplicate equipment value {}",
                option.value
            );
        }
    }

    #[test]
    fn label_falls_back_to_readable_value() {
        assert_eq!(equipment_label("laeder"), "Læder");
        assert_eq!(equipment_label("varme_i_forruden"), "varme i forruden");
    }

    #[test]
    fn expands_known_terms_by_value_label_or_synonym() {
        let expanded = expand_equipment_terms(&["laeder"]);
        assert!(expanded.starts_with("(læder OR leather"));

        let expanded = expand_equipment_terms(&["GPS"]);
        assert!(expanded.starts_with("(navigation OR navi"));

        let expanded = expand_equipment_terms(&["Sunroof"]);
        assert!(expanded.contains("panoramatag"));
    }

    #[test]
    fn quotes_unknown_terms_and_joins_with_and() {
        let expanded = expand_equipment_terms(&["xenon", "head_up_display"]);
        assert_eq!(
            expanded,
            "(xenon OR 'xenon lys' OR HID OR bi-xenon OR 'LED forlygter' OR 'adaptive lys') AND \"Head-up display\""
        );
    }

    #[test]
    fn empty_input_gives_empty_expression() {
        let none: [&str; 0] = [];
        assert_eq!(expand_equipment_terms(&none), "");
    }

    #[test]
    fn synonyms_lookup() {
        let synonyms = equipment_synonyms("ACC");
        assert!(synonyms.contains(&"fartpilot".to_string()));
        assert_eq!(equipment_synonyms("tagbox"), vec!["tagbox".to_string()]);
    }
}
