//! Word lists shared by detection, canonicalization and filtering.
//!
//! Entries are upper-case where they are compared against cell values and
//! lower-case where they are compared against normalized headers.

/// US state and DC two-letter abbreviations.
pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Street-type tokens that mark a value as a street address.
pub const STREET_SUFFIXES: &[&str] = &[
    "ST", "STREET", "RD", "ROAD", "AVE", "AV", "AVENUE", "BLVD", "DR", "DRIVE", "LN", "LANE",
    "CT", "COURT", "HWY", "HIGHWAY", "PKWY", "WAY", "TER", "TERRACE", "PL", "PLACE", "CIR",
    "CIRCLE", "TRL", "TRAIL", "LOOP",
];

/// Secondary-unit designators, lower-case.
pub const UNIT_TOKENS: &[&str] = &[
    "apt", "apartment", "unit", "ste", "suite", "bldg", "building", "fl", "floor", "rm", "room",
];

/// Vehicle manufacturers. Used for the OEM rate and corporate exclusion.
pub const OEMS: &[&str] = &[
    "TOYOTA", "HONDA", "CHEVROLET", "CHEVY", "FORD", "NISSAN", "KIA", "HYUNDAI", "CHRYSLER",
    "DODGE", "JEEP", "RAM", "VOLKSWAGEN", "VW", "AUDI", "BMW", "MERCEDES", "MERCEDES-BENZ",
    "LEXUS", "ACURA", "INFINITI", "GMC", "BUICK", "CADILLAC", "SUBARU", "MAZDA", "VOLVO",
    "PORSCHE",
];

/// Dealer groups, auctions and rental fleets.
pub const CORPORATE_BRANDS: &[&str] = &[
    "MANHEIM", "ADESA", "CARMAX", "AUTONATION", "LITHIA", "PENSKE", "SONIC", "GROUP 1",
    "CARVANA", "ENTERPRISE", "HERTZ", "AVIS", "BUDGET", "COPART", "IAA", "VROOM",
];

/// Words that mark a name as a business.
pub const CORPORATE_KEYWORDS: &[&str] = &[
    "AUTO", "MOTORS", "MOTOR", "SALES", "SERVICE", "PARTS", "BODY", "FLEET", "WHOLESALE",
    "AUCTION", "DEALER", "ROOFTOP", "GROUP", "HOLDINGS", "LEASING", "RENTAL", "FINANCIAL",
    "CREDIT",
];

/// Legal-entity suffixes.
pub const CORPORATE_SUFFIXES: &[&str] = &[
    "INC", "LLC", "LLP", "PLC", "CORP", "CO", "COMPANY", "LTD", "TRUST", "FOUNDATION",
    "ASSOCIATION",
];

/// Headers of multi-VIN list columns eligible for explosion.
pub const VIN_LIST_HEADERS: &[&str] = &[
    "vin explosion", "vin list", "vin_list", "vins", "vin(s)", "multi vin", "multivin",
    "vin batch", "vin csv", "vin pipe", "vin delim", "vin_split", "vins_found",
];

/// Separators inside a multi-VIN cell.
pub const VIN_LIST_DELIMITERS: &[char] = &[',', ';', '|', '/', ' ', '\t'];

/// Header phrases that mark a combined City/State/Zip column.
pub const COMPOSITE_CSZ_HEADERS: &[&str] =
    &["city state zip", "city st zip", "csz", "city state", "city st"];

/// Date header tokens in fallback precedence order.
pub const DATE_PRECEDENCE: &[&str] =
    &["del date", "sold date", "sale date", "deliverydate", "date"];

/// Header tokens that mark a person-name column.
pub const NAME_HEADER_TOKENS: &[&str] = &["first", "last", "name", "fullname"];

/// Header tokens that mark a vehicle-model column.
pub const MODEL_HEADER_TOKENS: &[&str] = &["model", "series", "trim"];

/// Whether an upper-cased value is a state abbreviation.
pub fn is_state_abbr(value: &str) -> bool {
    US_STATES.contains(&value)
}

/// Whether an upper-cased value is a manufacturer name.
pub fn is_oem(value: &str) -> bool {
    OEMS.contains(&value)
}
