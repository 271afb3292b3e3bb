use serde::Serialize;

/// Prefix marking a site-group selection such as `group:DK`.
pub const GROUP_PREFIX: &str = "group:";

pub const DK_SITES: &[&str] = &[
    "bilbasen.dk",
    "dba.dk",
    "biltorvet.dk",
    "autotorvet.dk",
    "autobasen.dk",
    "bilhandel.dk",
    "bilsalg.autocom.dk",
];

pub const EU_SITES: &[&str] = &["mobile.de", "autoscout24.com", "heycar.de"];

/// Named groups of marketplaces that can be selected as a whole.
pub const SITE_GROUPS: &[(&str, &[&str])] = &[("DK", DK_SITES), ("EU", EU_SITES)];

/// A selectable entry in the site picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(rename = "isGroup", skip_serializing_if = "std::ops::Not::not")]
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
}

const fn group_option(value: &'static str, label: &'static str) -> SiteOption {
    SiteOption {
        value,
        label,
        is_group: true,
        group: None,
    }
}

const fn site_option(value: &'static str, label: &'static str, group: &'static str) -> SiteOption {
    SiteOption {
        value,
        label,
        is_group: false,
        group: Some(group),
    }
}

pub const SITE_OPTIONS: &[SiteOption] = &[
    group_option("group:DK", "Danske sites (alle)"),
    group_option("group:EU", "Europæiske sites (alle)"),
    site_option("bilbasen.dk", "Bilbasen.dk", "DK"),
    site_option("dba.dk", "DBA.dk", "DK"),
    site_option("biltorvet.dk", "Biltorvet.dk", "DK"),
    site_option("autotorvet.dk", "Autotorvet.dk", "DK"),
    site_option("autobasen.dk", "Autobasen.dk", "DK"),
    site_option("bilhandel.dk", "Bilhandel.dk", "DK"),
    site_option("bilsalg.autocom.dk", "Bilsalg.autocom.dk", "DK"),
    site_option("mobile.de", "Mobile.de", "EU"),
    site_option("autoscout24.com", "AutoScout24.com", "EU"),
    site_option("heycar.de", "HeyCar.de", "EU"),
];

/// Every individual site, Danish first.
pub fn all_sites() -> Vec<String> {
    SITE_GROUPS
        .iter()
        .flat_map(|(_, sites)| sites.iter().map(|s| s.to_string()))
        .collect()
}

pub fn group_members(name: &str) -> Option<&'static [&'static str]> {
    SITE_GROUPS
        .iter()
        .find(|(group, _)| *group == name)
        .map(|(_, sites)| *sites)
}

/// Expand `group:<NAME>` selections into their member sites.
///
/// Unknown groups are dropped, plain entries are kept as given, and the
/// result holds each site once in first-seen order.
pub fn expand_site_selection<S: AsRef<str>>(selected: &[S]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();

    let mut push = |site: &str| {
        if !expanded.iter().any(|s| s == site) {
            expanded.push(site.to_string());
        }
    };

    for entry in selected {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }
        match entry.strip_prefix(GROUP_PREFIX) {
            Some(group) => {
                if let Some(members) = group_members(group) {
                    members.iter().for_each(|s| push(s));
                }
            }
            None => push(entry),
        }
    }

    expanded
}

/// True when `host` is `site` or one of its subdomains.
pub fn host_matches_site(host: &str, site: &str) -> bool {
    let host = strip_www(&host.to_ascii_lowercase());
    let site = strip_www(&site.to_ascii_lowercase());

    if site.is_empty() {
        return false;
    }

    host == site || host.ends_with(&format!(".{site}"))
}

fn strip_www(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
