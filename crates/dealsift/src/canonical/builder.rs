//! Assembling canonical records from a detected table.

use indexmap::IndexMap;

use super::address;
use super::phone::normalize_phone;
use super::record::{CanonicalRecord, CanonicalTable};
use crate::inference::{composite, date_precedence, is_date_header, normalize_label, HeaderMatcher};
use crate::input::RawTable;
use crate::schema::{CanonicalField, FieldMapping};

/// Fields copied straight from their source column.
const DIRECT_FIELDS: [CanonicalField; 18] = [
    CanonicalField::Store,
    CanonicalField::DealNumber,
    CanonicalField::CustomerId,
    CanonicalField::LastName,
    CanonicalField::FirstName,
    CanonicalField::Email,
    CanonicalField::City,
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

/// Replace non-breaking spaces, collapse whitespace runs and trim, for
/// headers and cells alike.
pub fn clean_cells(table: &RawTable) -> RawTable {
    let mut cleaned = table.map_cells(collapse_whitespace);
    cleaned.headers = table.headers.iter().map(|h| collapse_whitespace(h)).collect();
    cleaned
}

fn collapse_whitespace(value: &str) -> String {
    value
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the canonical table from a detected raw table and its mapping.
pub struct Canonicalizer<'a> {
    matcher: &'a HeaderMatcher,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(matcher: &'a HeaderMatcher) -> Self {
        Self { matcher }
    }

    /// Columns whose header marks a fallback date, in precedence order.
    pub fn date_fallback_columns(&self, table: &RawTable, mapping: &FieldMapping) -> Vec<usize> {
        let mapped = mapping.index_of(CanonicalField::DeliveryDate);
        let mut columns: Vec<(usize, usize)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != mapped)
            .filter_map(|(idx, header)| {
                let normalized = normalize_label(header);
                if !is_date_header(self.matcher, &normalized) {
                    return None;
                }
                date_precedence(&normalized).map(|rank| (rank, idx))
            })
            .collect();
        columns.sort();
        columns.into_iter().map(|(_, idx)| idx).collect()
    }

    /// Assemble one canonical record per raw row.
    pub fn build(&self, table: &RawTable, mapping: &FieldMapping) -> CanonicalTable {
        let date_columns = self.date_fallback_columns(table, mapping);
        let extra_columns: Vec<usize> = (0..table.column_count())
            .filter(|idx| !composite::is_synthetic(&table.headers[*idx]))
            .filter(|idx| !mapping.iter().any(|(_, c)| c.index == *idx))
            .collect();

        let has_name_parts = mapping.contains(CanonicalField::FirstName)
            || mapping.contains(CanonicalField::LastName);
        let same_address_source = matches!(
            (
                mapping.index_of(CanonicalField::Address1),
                mapping.index_of(CanonicalField::Address2),
            ),
            (Some(a), Some(b)) if a == b
        );

        let mut records: Vec<CanonicalRecord> = table
            .rows
            .iter()
            .zip(&table.row_numbers)
            .map(|(row, &number)| {
                let cell = |field: CanonicalField| -> Option<String> {
                    mapping
                        .index_of(field)
                        .map(|i| row[i].trim())
                        .filter(|v| !RawTable::is_missing(v))
                        .map(str::to_string)
                };

                let mut record = CanonicalRecord::new(number);
                for field in DIRECT_FIELDS {
                    record.set(field, cell(field));
                }
                record.state = cell(CanonicalField::State).map(|s| s.to_ascii_uppercase());

                if has_name_parts {
                    let joined = [record.first_name.as_deref(), record.last_name.as_deref()]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(" ");
                    record.set(CanonicalField::FullName, Some(collapse_whitespace(&joined)));
                }

                for (phone, area) in CanonicalField::phone_roles() {
                    let area_code = cell(area).or_else(|| cell(CanonicalField::AreaCode));
                    let value = cell(phone).map(|raw| normalize_phone(&raw, area_code.as_deref()));
                    record.set(phone, value);
                }

                let (a1, a2) = address::assemble(
                    cell(CanonicalField::Address1),
                    cell(CanonicalField::Address2),
                    same_address_source,
                );
                record.address1 = a1;
                record.address2 = a2;

                record.date_fallbacks = date_columns
                    .iter()
                    .map(|&i| row[i].trim())
                    .filter(|v| !RawTable::is_missing(v))
                    .map(str::to_string)
                    .collect();
                record.extras = extra_columns
                    .iter()
                    .map(|&i| (table.headers[i].clone(), row[i].clone()))
                    .collect::<IndexMap<_, _>>();
                record
            })
            .collect();

        // Raw FullName only when no row produced a name from its parts.
        let full_name_col = mapping.index_of(CanonicalField::FullName);
        if let Some(col) = full_name_col {
            if records.iter().all(|r| r.full_name.is_none()) {
                for (record, row) in records.iter_mut().zip(&table.rows) {
                    let raw = row[col].trim();
                    if !RawTable::is_missing(raw) {
                        record.full_name = Some(collapse_whitespace(raw));
                    }
                }
            }
        }

        let fields = CanonicalField::OUTPUT_ORDER
            .into_iter()
            .filter(|&field| match field {
                CanonicalField::FullName => has_name_parts || full_name_col.is_some(),
                CanonicalField::Address1 => {
                    mapping.contains(CanonicalField::Address1)
                        || mapping.contains(CanonicalField::Address2)
                }
                _ => mapping.contains(field),
            })
            .collect();

        CanonicalTable {
            fields,
            records,
            has_date_fallbacks: !date_columns.is_empty(),
            extra_headers: extra_columns.iter().map(|&i| table.headers[i].clone()).collect(),
        }
    }
}
