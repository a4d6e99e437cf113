//! Canonical field definitions and the locked output order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A canonical business attribute.
///
/// The first 26 variants are output fields, declared in the locked output
/// order. The area-code variants are detected but never written; they only
/// feed phone normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Store")]
    Store,
    #[serde(rename = "Deal_Number")]
    DealNumber,
    #[serde(rename = "CustomerID")]
    CustomerId,
    #[serde(rename = "Last_Name")]
    LastName,
    #[serde(rename = "First_Name")]
    FirstName,
    #[serde(rename = "FullName")]
    FullName,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Home_Phone")]
    HomePhone,
    #[serde(rename = "Mobile_Phone")]
    MobilePhone,
    #[serde(rename = "Work_Phone")]
    WorkPhone,
    #[serde(rename = "Phone2")]
    Phone2,
    #[serde(rename = "Address1")]
    Address1,
    #[serde(rename = "Address2")]
    Address2,
    #[serde(rename = "City")]
    City,
    #[serde(rename = "State")]
    State,
    #[serde(rename = "Zip")]
    Zip,
    #[serde(rename = "VIN")]
    Vin,
    #[serde(rename = "Make")]
    Make,
    #[serde(rename = "Model")]
    Model,
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "DeliveryDate")]
    DeliveryDate,
    #[serde(rename = "Delivery_Miles")]
    DeliveryMiles,
    #[serde(rename = "Distance")]
    Distance,
    #[serde(rename = "Vehicle_Condition")]
    VehicleCondition,
    #[serde(rename = "Mileage")]
    Mileage,
    #[serde(rename = "Term")]
    Term,
    #[serde(rename = "Home_AreaCode")]
    HomeAreaCode,
    #[serde(rename = "Mobile_AreaCode")]
    MobileAreaCode,
    #[serde(rename = "Work_AreaCode")]
    WorkAreaCode,
    #[serde(rename = "Phone2_AreaCode")]
    Phone2AreaCode,
    #[serde(rename = "AreaCode")]
    AreaCode,
}

impl CanonicalField {
    /// Output fields in the locked output order.
    pub const OUTPUT_ORDER: [CanonicalField; 26] = [
        CanonicalField::Store,
        CanonicalField::DealNumber,
        CanonicalField::CustomerId,
        CanonicalField::LastName,
        CanonicalField::FirstName,
        CanonicalField::FullName,
        CanonicalField::Email,
        CanonicalField::HomePhone,
        CanonicalField::MobilePhone,
        CanonicalField::WorkPhone,
        CanonicalField::Phone2,
        CanonicalField::Address1,
        CanonicalField::Address2,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::Zip,
        CanonicalField::Vin,
        CanonicalField::Make,
        CanonicalField::Model,
        CanonicalField::Year,
        CanonicalField::DeliveryDate,
        CanonicalField::DeliveryMiles,
        CanonicalField::Distance,
        CanonicalField::VehicleCondition,
        CanonicalField::Mileage,
        CanonicalField::Term,
    ];

    /// Detected-only fields used for phone area-code merging.
    pub const AREA_CODES: [CanonicalField; 5] = [
        CanonicalField::HomeAreaCode,
        CanonicalField::MobileAreaCode,
        CanonicalField::WorkAreaCode,
        CanonicalField::Phone2AreaCode,
        CanonicalField::AreaCode,
    ];

    /// Fields shown in the mapping report.
    pub const REPORTED: [CanonicalField; 6] = [
        CanonicalField::Vin,
        CanonicalField::Address1,
        CanonicalField::Address2,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::Zip,
    ];

    /// Every field the detector knows about.
    pub fn all() -> impl Iterator<Item = CanonicalField> {
        Self::OUTPUT_ORDER.into_iter().chain(Self::AREA_CODES)
    }

    /// The canonical column name as written to output.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Store => "Store",
            CanonicalField::DealNumber => "Deal_Number",
            CanonicalField::CustomerId => "CustomerID",
            CanonicalField::LastName => "Last_Name",
            CanonicalField::FirstName => "First_Name",
            CanonicalField::FullName => "FullName",
            CanonicalField::Email => "Email",
            CanonicalField::HomePhone => "Home_Phone",
            CanonicalField::MobilePhone => "Mobile_Phone",
            CanonicalField::WorkPhone => "Work_Phone",
            CanonicalField::Phone2 => "Phone2",
            CanonicalField::Address1 => "Address1",
            CanonicalField::Address2 => "Address2",
            CanonicalField::City => "City",
            CanonicalField::State => "State",
            CanonicalField::Zip => "Zip",
            CanonicalField::Vin => "VIN",
            CanonicalField::Make => "Make",
            CanonicalField::Model => "Model",
            CanonicalField::Year => "Year",
            CanonicalField::DeliveryDate => "DeliveryDate",
            CanonicalField::DeliveryMiles => "Delivery_Miles",
            CanonicalField::Distance => "Distance",
            CanonicalField::VehicleCondition => "Vehicle_Condition",
            CanonicalField::Mileage => "Mileage",
            CanonicalField::Term => "Term",
            CanonicalField::HomeAreaCode => "Home_AreaCode",
            CanonicalField::MobileAreaCode => "Mobile_AreaCode",
            CanonicalField::WorkAreaCode => "Work_AreaCode",
            CanonicalField::Phone2AreaCode => "Phone2_AreaCode",
            CanonicalField::AreaCode => "AreaCode",
        }
    }

    /// Position in the locked output order, if this is an output field.
    pub fn output_position(&self) -> Option<usize> {
        Self::OUTPUT_ORDER.iter().position(|f| f == self)
    }

    /// Whether this field is written to output.
    pub fn is_output(&self) -> bool {
        self.output_position().is_some()
    }

    /// Fields that may legitimately share close scores with another column
    /// without being an ambiguity (names alongside each other, phone roles).
    pub fn may_coexist(&self) -> bool {
        matches!(
            self,
            CanonicalField::FullName
                | CanonicalField::FirstName
                | CanonicalField::LastName
                | CanonicalField::HomePhone
                | CanonicalField::MobilePhone
                | CanonicalField::WorkPhone
                | CanonicalField::Phone2
        )
    }

    /// Phone role fields and their dedicated area-code field.
    pub fn phone_roles() -> [(CanonicalField, CanonicalField); 4] {
        [
            (CanonicalField::HomePhone, CanonicalField::HomeAreaCode),
            (CanonicalField::MobilePhone, CanonicalField::MobileAreaCode),
            (CanonicalField::WorkPhone, CanonicalField::WorkAreaCode),
            (CanonicalField::Phone2, CanonicalField::Phone2AreaCode),
        ]
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::all()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown canonical field '{}'", s))
    }
}
