//! Canonical records and the canonical table.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::address;
use crate::inference::heuristics;
use crate::schema::CanonicalField;

/// One output row with a typed slot per canonical field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalRecord {
    /// Original 1-based data-row position in the source file.
    pub row_number: usize,

    pub store: Option<String>,
    pub deal_number: Option<String>,
    pub customer_id: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub home_phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub work_phone: Option<String>,
    pub phone2: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_miles: Option<String>,
    pub distance: Option<String>,
    pub vehicle_condition: Option<String>,
    pub mileage: Option<String>,
    pub term: Option<String>,

    /// Values of other date-bearing columns, in fallback precedence order.
    pub date_fallbacks: Vec<String>,
    /// Unmapped source columns, kept for audit output only.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extras: IndexMap<String, String>,
}

impl CanonicalRecord {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Self::default()
        }
    }

    fn slot(&self, field: CanonicalField) -> Option<&Option<String>> {
        let slot = match field {
            CanonicalField::Store => &self.store,
            CanonicalField::DealNumber => &self.deal_number,
            CanonicalField::CustomerId => &self.customer_id,
            CanonicalField::LastName => &self.last_name,
            CanonicalField::FirstName => &self.first_name,
            CanonicalField::FullName => &self.full_name,
            CanonicalField::Email => &self.email,
            CanonicalField::HomePhone => &self.home_phone,
            CanonicalField::MobilePhone => &self.mobile_phone,
            CanonicalField::WorkPhone => &self.work_phone,
            CanonicalField::Phone2 => &self.phone2,
            CanonicalField::Address1 => &self.address1,
            CanonicalField::Address2 => &self.address2,
            CanonicalField::City => &self.city,
            CanonicalField::State => &self.state,
            CanonicalField::Zip => &self.zip,
            CanonicalField::Vin => &self.vin,
            CanonicalField::Make => &self.make,
            CanonicalField::Model => &self.model,
            CanonicalField::Year => &self.year,
            CanonicalField::DeliveryDate => &self.delivery_date,
            CanonicalField::DeliveryMiles => &self.delivery_miles,
            CanonicalField::Distance => &self.distance,
            CanonicalField::VehicleCondition => &self.vehicle_condition,
            CanonicalField::Mileage => &self.mileage,
            CanonicalField::Term => &self.term,
            _ => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, field: CanonicalField) -> Option<&mut Option<String>> {
        let slot = match field {
            CanonicalField::Store => &mut self.store,
            CanonicalField::DealNumber => &mut self.deal_number,
            CanonicalField::CustomerId => &mut self.customer_id,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::FullName => &mut self.full_name,
            CanonicalField::Email => &mut self.email,
            CanonicalField::HomePhone => &mut self.home_phone,
            CanonicalField::MobilePhone => &mut self.mobile_phone,
            CanonicalField::WorkPhone => &mut self.work_phone,
            CanonicalField::Phone2 => &mut self.phone2,
            CanonicalField::Address1 => &mut self.address1,
            CanonicalField::Address2 => &mut self.address2,
            CanonicalField::City => &mut self.city,
            CanonicalField::State => &mut self.state,
            CanonicalField::Zip => &mut self.zip,
            CanonicalField::Vin => &mut self.vin,
            CanonicalField::Make => &mut self.make,
            CanonicalField::Model => &mut self.model,
            CanonicalField::Year => &mut self.year,
            CanonicalField::DeliveryDate => &mut self.delivery_date,
            CanonicalField::DeliveryMiles => &mut self.delivery_miles,
            CanonicalField::Distance => &mut self.distance,
            CanonicalField::VehicleCondition => &mut self.vehicle_condition,
            CanonicalField::Mileage => &mut self.mileage,
            CanonicalField::Term => &mut self.term,
            _ => return None,
        };
        Some(slot)
    }

    /// Value of an output field; `None` when empty or not an output field.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.slot(field).and_then(|v| v.as_deref())
    }

    /// Set an output field. Blank values are stored as `None`; auxiliary
    /// fields are ignored.
    pub fn set(&mut self, field: CanonicalField, value: Option<String>) {
        if let Some(slot) = self.slot_mut(field) {
            *slot = value.filter(|v| !v.trim().is_empty());
        }
    }

    /// First parseable date among DeliveryDate and the fallback columns.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.delivery_date
            .iter()
            .chain(self.date_fallbacks.iter())
            .find_map(|v| heuristics::parse_date(v))
    }

    /// Upper-cased VIN when it is a strict 17-character VIN.
    pub fn valid_vin(&self) -> Option<String> {
        self.vin
            .as_deref()
            .filter(|v| heuristics::is_valid_vin(v))
            .map(|v| v.trim().to_ascii_uppercase())
    }

    /// Address1, or a PO-box Address2 standing in for it.
    pub fn effective_address1(&self, po_box_counts: bool) -> Option<&str> {
        match self.get(CanonicalField::Address1) {
            Some(a1) => Some(a1),
            None if po_box_counts => self
                .get(CanonicalField::Address2)
                .filter(|a2| heuristics::is_po_box(a2)),
            None => None,
        }
    }

    /// Normalized Address1|City|State|Zip key; empty when any part is missing.
    pub fn address_key(&self) -> String {
        address::address_key(
            self.get(CanonicalField::Address1).unwrap_or(""),
            self.get(CanonicalField::City).unwrap_or(""),
            self.get(CanonicalField::State).unwrap_or(""),
            self.get(CanonicalField::Zip).unwrap_or(""),
        )
    }
}

/// The canonical record set plus which fields have a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalTable {
    /// Output fields with a source, in locked output order.
    pub fields: Vec<CanonicalField>,
    pub records: Vec<CanonicalRecord>,
    /// Whether any fallback date column exists.
    pub has_date_fallbacks: bool,
    /// Headers of the unmapped source columns carried in `extras`.
    pub extra_headers: Vec<String>,
}

impl CanonicalTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a field has a source column.
    pub fn has(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    /// Whether any date source (DeliveryDate or a fallback) exists.
    pub fn has_date_source(&self) -> bool {
        self.has(CanonicalField::DeliveryDate) || self.has_date_fallbacks
    }

    /// A table with the same columns and the given records.
    pub fn with_records(&self, records: Vec<CanonicalRecord>) -> Self {
        Self {
            fields: self.fields.clone(),
            records,
            has_date_fallbacks: self.has_date_fallbacks,
            extra_headers: self.extra_headers.clone(),
        }
    }

    /// Split records by a predicate into (kept, removed), preserving order.
    pub fn partition(
        &self,
        keep: impl Fn(&CanonicalRecord) -> bool,
    ) -> (Self, Vec<CanonicalRecord>) {
        let (kept, removed): (Vec<_>, Vec<_>) =
            self.records.iter().cloned().partition(|r| keep(r));
        (self.with_records(kept), removed)
    }

    /// Header row for output.
    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// A record's output cells, aligned with [`Self::headers`].
    pub fn row_values<'a>(&self, record: &'a CanonicalRecord) -> Vec<&'a str> {
        self.fields
            .iter()
            .map(|&f| record.get(f).unwrap_or(""))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_cover_output_fields() {
        let mut record = CanonicalRecord::new(1);
        for (i, field) in CanonicalField::OUTPUT_ORDER.iter().enumerate() {
            record.set(*field, Some(format!("v{i}")));
        }
        for (i, field) in CanonicalField::OUTPUT_ORDER.iter().enumerate() {
            assert_eq!(record.get(*field), Some(format!("v{i}").as_str()));
        }
        record.set(CanonicalField::AreaCode, Some("512".into()));
        assert_eq!(record.get(CanonicalField::AreaCode), None);
    }

    #[test]
    fn test_blank_values_are_none() {
        let mut record = CanonicalRecord::new(1);
        record.set(CanonicalField::City, Some("   ".into()));
        assert_eq!(record.city, None);
    }

    #[test]
    fn test_effective_date_falls_back() {
        let mut record = CanonicalRecord::new(1);
        record.date_fallbacks = vec!["garbage".into(), "2023-04-01".into()];
        assert_eq!(record.effective_date(), NaiveDate::from_ymd_opt(2023, 4, 1));

        record.delivery_date = Some("2024-01-02".into());
        assert_eq!(record.effective_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_effective_address_uses_po_box() {
        let mut record = CanonicalRecord::new(1);
        record.address2 = Some("PO Box 9".into());
        assert_eq!(record.effective_address1(true), Some("PO Box 9"));
        assert_eq!(record.effective_address1(false), None);

        record.address2 = Some("Apt 4".into());
        assert_eq!(record.effective_address1(true), None);
    }

    #[test]
    fn test_valid_vin_is_uppercased() {
        let mut record = CanonicalRecord::new(1);
        record.vin = Some("1hgcm82633a004352".into());
        assert_eq!(record.valid_vin().as_deref(), Some("1HGCM82633A004352"));
        record.vin = Some("12345".into());
        assert_eq!(record.valid_vin(), None);
    }

    #[test]
    fn test_row_values_follow_fields() {
        let table = CanonicalTable {
            fields: vec![CanonicalField::City, CanonicalField::Zip],
            records: vec![],
            ..Default::default()
        };
        let mut record = CanonicalRecord::new(3);
        record.zip = Some("73301".into());
        assert_eq!(table.headers(), vec!["City", "Zip"]);
        assert_eq!(table.row_values(&record), vec!["", "73301"]);
    }
}
