//! Declarative rule table driving header scoring.
//!
//! Every canonical field has one [`FieldRule`]: the synonyms a header may
//! match, keywords that penalize or boost a match, and the value check used
//! to score sampled cell contents. Keywords are written the way they appear
//! in exports; the header matcher normalizes them once at construction.

use super::field::CanonicalField;

/// Score given to an exact synonym (or field name) match.
pub const FUZZY_STRONG: f64 = 90.0;
/// Minimum header score for a column to become a candidate.
pub const FUZZY_CANDIDATE: f64 = 80.0;
/// Bonus for a header containing a positive keyword.
pub const POSITIVE_BONUS: f64 = 5.0;
/// Penalty for a header containing a negative keyword.
pub const NEGATIVE_PENALTY: f64 = 20.0;
/// Penalty for fields that attract many misleading headers.
pub const STRICT_NEGATIVE_PENALTY: f64 = 30.0;

/// Value check applied to a candidate column's sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCheck {
    /// No value signal (names, addresses, free text).
    None,
    Vin,
    Email,
    Phone,
    Zip,
    Numeric,
    ModelYear,
    Date,
}

/// Scoring rule for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: CanonicalField,
    pub synonyms: &'static [&'static str],
    pub negatives: &'static [&'static str],
    pub negative_penalty: f64,
    pub positives: &'static [&'static str],
    pub check: ValueCheck,
}

const TRADE_IN: &[&str] = &[
    "trade", "trade-in", "tradein", "t1", "t2", "trade 1", "trade 2",
];

const NAME_NEGATIVES: &[&str] = &[
    "date", "entry", "activity", "pay", "payment", "due", "co", "co buyer", "co-buyer",
    "cobuyer", "company", "business", "dealer", "rooftop", "auction",
];

const PHONE_NEGATIVES: &[&str] = &[
    "address", "addr", "street", "city", "state", "zip", "email", "area", "ac", "ext",
];

/// The field rule table, one entry per canonical field.
pub static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: CanonicalField::Store,
        synonyms: &[
            "store", "rooftop", "location", "franchise", "dealer name", "store name",
            "rooftop name", "location name", "dealership", "dealer", "rooftop id", "dlr",
            "dealership name",
        ],
        negatives: &["id", "number", "no", "code", "fee", "fees", "charge", "charges", "dv"],
        negative_penalty: STRICT_NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::DealNumber,
        synonyms: &[
            "deal_number", "deal#", "dealno", "deal", "ro", "rono", "ro#", "stockdeal",
            "deal id", "deal num", "deal number", "doc#", "doc no",
        ],
        negatives: &["type", "status", "fee", "fees", "amount", "total", "balance", "date"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::CustomerId,
        synonyms: &[
            "cust_no", "customerid", "custid", "cid", "dmsid", "customer_number", "customerno",
            "accountid", "account id", "acctid", "clientid", "customer id",
        ],
        negatives: &["name", "first", "last", "email", "phone", "address"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::LastName,
        synonyms: &["lastname", "surname", "familyname", "last name", "buyer last", "primary last"],
        negatives: NAME_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::FirstName,
        synonyms: &["firstname", "givenname", "first name", "buyer first", "primary first"],
        negatives: NAME_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::FullName,
        synonyms: &[
            "full name", "fullname", "customer name", "customername", "contact name",
            "contactname", "buyer name", "primary name",
        ],
        negatives: NAME_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Email,
        synonyms: &["email", "emailaddress", "e-mail", "email address"],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Email,
    },
    FieldRule {
        field: CanonicalField::HomePhone,
        synonyms: &["home", "homephone", "home phone", "residence phone"],
        negatives: PHONE_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Phone,
    },
    FieldRule {
        field: CanonicalField::MobilePhone,
        synonyms: &[
            "phonecell", "mobile", "cell", "cellphone", "mobilephone", "mobile phone", "cell phone",
        ],
        negatives: PHONE_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Phone,
    },
    FieldRule {
        field: CanonicalField::WorkPhone,
        synonyms: &[
            "work", "workphone", "businessphone", "work phone", "office phone", "business phone",
        ],
        negatives: PHONE_NEGATIVES,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Phone,
    },
    FieldRule {
        field: CanonicalField::Phone2,
        synonyms: &[
            "phone2", "altphone", "secondaryphone", "otherphone", "alternate phone", "alt phone",
            "phone", "phone number", "telephone", "tel",
        ],
        negatives: &[
            "home", "mobile", "cell", "work", "office", "business", "area", "ac", "ext",
        ],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Phone,
    },
    FieldRule {
        field: CanonicalField::Address1,
        synonyms: &[
            "street", "address", "address1", "addr1", "streetaddress", "address line 1",
            "addressline1", "customer address", "customeraddress", "mailing address",
            "street addr", "primary address", "residential address",
        ],
        negatives: &[
            "line 2", "address2", "addr2", "bank", "billing", "mailing", "finance", "lien",
            "email", "e-mail",
        ],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &["line 1", "address1", "addr1", "street"],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Address2,
        synonyms: &[
            "address2", "addr2", "address line 2", "addressline2", "suite", "ste", "unit", "apt",
            "apartment", "po box", "p.o. box", "pobox", "building", "bldg", "floor", "fl",
            "room", "rm",
        ],
        negatives: &["line 1", "address1", "addr1", "address", "street", "addr", "email", "e-mail"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[
            "line 2", "address2", "addr2", "suite", "unit", "apt", "apartment", "po box",
            "p.o. box", "pobox",
        ],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::City,
        synonyms: &["city", "town", "municipality", "locality", "city name", "csz city"],
        negatives: &[
            "co-buyer", "cobuyer", "co buyer", "bank", "billing", "mailing", "shipping", "lien",
            "finance", "type", "file", "status", "code", "first", "last", "name", "full name",
            "fullname", "model", "series", "trim", "vin", "stock", "body",
        ],
        negative_penalty: STRICT_NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::State,
        synonyms: &[
            "state", "st", "province", "region", "state/province", "state code", "csz state",
        ],
        negatives: &["status", "statement"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Zip,
        synonyms: &[
            "zip", "zip5", "zipcode", "postalcode", "postcode", "zip code", "postal code",
            "csz zip",
        ],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Zip,
    },
    FieldRule {
        field: CanonicalField::Vin,
        synonyms: &["vin", "vehicleid", "vehicle id", "vin number"],
        negatives: &[
            "trade", "trade-in", "tradein", "t1", "t2", "trade 1", "trade 2", "make", "model",
            "type", "file", "explosion", "list", "vins", "multi", "batch",
        ],
        negative_penalty: STRICT_NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Vin,
    },
    FieldRule {
        field: CanonicalField::Make,
        synonyms: &["make", "manufacturer", "brand", "oem"],
        negatives: TRADE_IN,
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Model,
        synonyms: &["model", "vehiclemodel", "series", "trim", "model name"],
        negatives: &[
            "trade", "trade-in", "tradein", "t1", "t2", "trade 1", "trade 2", "year",
        ],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Year,
        synonyms: &["year", "modelyear", "vehicleyear", "model year"],
        negatives: &[
            "trade", "trade-in", "tradein", "t1", "t2", "trade 1", "trade 2", "model", "series",
            "trim",
        ],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::ModelYear,
    },
    FieldRule {
        field: CanonicalField::DeliveryDate,
        synonyms: &[
            "del_date", "deliverydate", "sold_date", "solddate", "sale_date", "saledate", "date",
            "delivery", "delivered",
        ],
        negatives: &[
            "miles", "mileage", "odometer", "distance", "birth", "dob", "due", "payment", "pay",
        ],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Date,
    },
    FieldRule {
        field: CanonicalField::DeliveryMiles,
        synonyms: &["del_miles", "deliverymiles", "delivery_mileage", "miles_at_delivery"],
        negatives: &["date"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Numeric,
    },
    FieldRule {
        field: CanonicalField::Distance,
        synonyms: &["dist", "distance", "milesaway", "distance_to_dealer", "customerdistance"],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Numeric,
    },
    FieldRule {
        field: CanonicalField::VehicleCondition,
        synonyms: &["newused", "condition", "stocktype", "nu", "n/u"],
        negatives: &["type", "vehicle type", "body", "bodystyle", "style"],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Mileage,
        synonyms: &[
            "mileage", "odometer", "odo", "currentmileage", "current_odometer", "miles",
            "odometer reading",
        ],
        negatives: &["delivery", "del", "away", "distance"],
        negative_penalty: STRICT_NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::Numeric,
    },
    FieldRule {
        field: CanonicalField::Term,
        synonyms: &["term", "termmonths", "financeterm", "leaseterm", "term months", "months term"],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::HomeAreaCode,
        synonyms: &[
            "home area code", "home area", "home ac", "homeareacode", "res area", "res area code",
        ],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::MobileAreaCode,
        synonyms: &["mobile area code", "cell area code", "cell area", "mobile area", "cell ac"],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::WorkAreaCode,
        synonyms: &[
            "work area code", "office area code", "work area", "office area", "business area",
        ],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::Phone2AreaCode,
        synonyms: &[
            "alt area code", "alternate area code", "secondary area code", "other area code",
        ],
        negatives: &[],
        negative_penalty: NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
    FieldRule {
        field: CanonicalField::AreaCode,
        synonyms: &["area code", "areacode", "area", "ac"],
        negatives: &[
            "home", "res", "mobile", "cell", "work", "office", "business", "alt", "alternate",
            "secondary", "other",
        ],
        negative_penalty: STRICT_NEGATIVE_PENALTY,
        positives: &[],
        check: ValueCheck::None,
    },
];

/// Look up the rule for a field.
pub fn rule_for(field: CanonicalField) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|r| r.field == field)
}
