use serde::{Deserialize, Serialize};

/// Continent grouping used for destination matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    SouthAmerica,
    Oceania,
    Antarctica,
}

/// ISO 3166-1 alpha-2 country codes the catalog schedules trips in,
/// grouped by continent. Catalogs store countries as alpha-2 codes; the
/// engine resolves continents from this table rather than from the store.
const COUNTRY_CONTINENTS: &[(&str, Continent)] = &[
    // Africa
    ("BW", Continent::Africa),
    ("CV", Continent::Africa),
    ("DZ", Continent::Africa),
    ("EG", Continent::Africa),
    ("ET", Continent::Africa),
    ("GH", Continent::Africa),
    ("KE", Continent::Africa),
    ("MA", Continent::Africa),
    ("MG", Continent::Africa),
    ("ML", Continent::Africa),
    ("MW", Continent::Africa),
    ("MZ", Continent::Africa),
    ("NA", Continent::Africa),
    ("RW", Continent::Africa),
    ("SC", Continent::Africa),
    ("SN", Continent::Africa),
    ("TN", Continent::Africa),
    ("TZ", Continent::Africa),
    ("UG", Continent::Africa),
    ("ZA", Continent::Africa),
    ("ZM", Continent::Africa),
    ("ZW", Continent::Africa),
    // Asia
    ("AE", Continent::Asia),
    ("BD", Continent::Asia),
    ("BT", Continent::Asia),
    ("CN", Continent::Asia),
    ("GE", Continent::Asia),
    ("ID", Continent::Asia),
    ("IL", Continent::Asia),
    ("IN", Continent::Asia),
    ("JO", Continent::Asia),
    ("JP", Continent::Asia),
    ("KG", Continent::Asia),
    ("KH", Continent::Asia),
    ("KR", Continent::Asia),
    ("KZ", Continent::Asia),
    ("LA", Continent::Asia),
    ("LK", Continent::Asia),
    ("MM", Continent::Asia),
    ("MN", Continent::Asia),
    ("MV", Continent::Asia),
    ("MY", Continent::Asia),
    ("NP", Continent::Asia),
    ("OM", Continent::Asia),
    ("PH", Continent::Asia),
    ("QA", Continent::Asia),
    ("SA", Continent::Asia),
    ("SG", Continent::Asia),
    ("TH", Continent::Asia),
    ("TJ", Continent::Asia),
    ("TR", Continent::Asia),
    ("TW", Continent::Asia),
    ("UZ", Continent::Asia),
    ("VN", Continent::Asia),
    // Europe
    ("AL", Continent::Europe),
    ("AT", Continent::Europe),
    ("BA", Continent::Europe),
    ("BE", Continent::Europe),
    ("BG", Continent::Europe),
    ("CH", Continent::Europe),
    ("CY", Continent::Europe),
    ("CZ", Continent::Europe),
    ("DE", Continent::Europe),
    ("DK", Continent::Europe),
    ("EE", Continent::Europe),
    ("ES", Continent::Europe),
    ("FI", Continent::Europe),
    ("FR", Continent::Europe),
    ("GB", Continent::Europe),
    ("GR", Continent::Europe),
    ("HR", Continent::Europe),
    ("HU", Continent::Europe),
    ("IE", Continent::Europe),
    ("IS", Continent::Europe),
    ("IT", Continent::Europe),
    ("LT", Continent::Europe),
    ("LU", Continent::Europe),
    ("LV", Continent::Europe),
    ("ME", Continent::Europe),
    ("MK", Continent::Europe),
    ("MT", Continent::Europe),
    ("NL", Continent::Europe),
    ("NO", Continent::Europe),
    ("PL", Continent::Europe),
    ("PT", Continent::Europe),
    ("RO", Continent::Europe),
    ("RS", Continent::Europe),
    ("SE", Continent::Europe),
    ("SI", Continent::Europe),
    ("SK", Continent::Europe),
    ("UA", Continent::Europe),
    // North America
    ("BZ", Continent::NorthAmerica),
    ("CA", Continent::NorthAmerica),
    ("CR", Continent::NorthAmerica),
    ("CU", Continent::NorthAmerica),
    ("DO", Continent::NorthAmerica),
    ("GT", Continent::NorthAmerica),
    ("HN", Continent::NorthAmerica),
    ("JM", Continent::NorthAmerica),
    ("MX", Continent::NorthAmerica),
    ("NI", Continent::NorthAmerica),
    ("PA", Continent::NorthAmerica),
    ("SV", Continent::NorthAmerica),
    ("US", Continent::NorthAmerica),
    // South America
    ("AR", Continent::SouthAmerica),
    ("BO", Continent::SouthAmerica),
    ("BR", Continent::SouthAmerica),
    ("CL", Continent::SouthAmerica),
    ("CO", Continent::SouthAmerica),
    ("EC", Continent::SouthAmerica),
    ("GY", Continent::SouthAmerica),
    ("PE", Continent::SouthAmerica),
    ("PY", Continent::SouthAmerica),
    ("SR", Continent::SouthAmerica),
    ("UY", Continent::SouthAmerica),
    ("VE", Continent::SouthAmerica),
    // Oceania
    ("AU", Continent::Oceania),
    ("FJ", Continent::Oceania),
    ("NZ", Continent::Oceania),
    ("PG", Continent::Oceania),
    ("TO", Continent::Oceania),
    ("VU", Continent::Oceania),
    ("WS", Continent::Oceania),
    // Antarctica
    ("AQ", Continent::Antarctica),
];

/// Resolves the continent of an alpha-2 country code.
///
/// Returns `None` for codes outside the reference table; callers treat
/// unknown codes as unmatchable rather than erroring, since the catalog
/// vocabulary may grow ahead of this table.
pub fn continent_of(country_code: &str) -> Option<Continent> {
    COUNTRY_CONTINENTS
        .iter()
        .find(|(code, _)| *code == country_code)
        .map(|(_, continent)| *continent)
}

/// All known country codes on the given continent.
pub fn countries_in(continent: Continent) -> impl Iterator<Item = &'static str> {
    COUNTRY_CONTINENTS
        .iter()
        .filter(move |(_, c)| *c == continent)
        .map(|(code, _)| *code)
}
