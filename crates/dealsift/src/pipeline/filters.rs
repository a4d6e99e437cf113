//! Row filters, applied in a fixed order.

use chrono::{Months, NaiveDate};

use super::config::PipelineConfig;
use super::corporate;
use crate::canonical::{CanonicalRecord, CanonicalTable};
use crate::inference::heuristics;
use crate::schema::CanonicalField;

/// Distances above this are treated as missing.
pub const MAX_PLAUSIBLE_DISTANCE: f64 = 1000.0;
/// Share of rows that must carry a valid distance for the distance filter
/// to run.
pub const MIN_DISTANCE_COVERAGE: f64 = 0.05;

const ADDRESS_FIELDS: [CanonicalField; 5] = [
    CanonicalField::Address1,
    CanonicalField::Address2,
    CanonicalField::City,
    CanonicalField::State,
    CanonicalField::Zip,
];

/// Result of one filter over a table.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub table: CanonicalTable,
    pub removed: Vec<CanonicalRecord>,
    /// Why the stage did nothing, when it did not run.
    pub skipped: Option<String>,
}

impl FilterOutcome {
    fn skipped(table: &CanonicalTable, reason: impl Into<String>) -> Self {
        Self {
            table: table.clone(),
            removed: Vec::new(),
            skipped: Some(reason.into()),
        }
    }

    fn partitioned(table: &CanonicalTable, keep: impl Fn(&CanonicalRecord) -> bool) -> Self {
        let (table, removed) = table.partition(keep);
        Self {
            table,
            removed,
            skipped: None,
        }
    }
}

/// A row-removing pipeline stage.
///
/// Filters never fail. A filter whose required columns are all absent
/// returns the table unchanged.
pub trait Filter {
    /// Stable stage name used in reports and audit file names.
    fn name(&self) -> &'static str;

    /// Apply the filter, returning a new table.
    fn apply(&self, table: &CanonicalTable) -> FilterOutcome;
}

/// Removes rows whose name reads as a business.
pub struct CorporateFilter;

impl Filter for CorporateFilter {
    fn name(&self) -> &'static str {
        "corporate"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has(CanonicalField::FullName)
            && !table.has(CanonicalField::FirstName)
            && !table.has(CanonicalField::LastName)
        {
            return FilterOutcome::skipped(table, "no name columns");
        }
        FilterOutcome::partitioned(table, |r| {
            let verdict = corporate::score_names(
                r.full_name.as_deref(),
                r.first_name.as_deref(),
                r.last_name.as_deref(),
            );
            !verdict.excluded()
        })
    }
}

/// Removes rows without a last name.
pub struct NamePresenceFilter;

impl Filter for NamePresenceFilter {
    fn name(&self) -> &'static str {
        "name_present"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has(CanonicalField::LastName) {
            return FilterOutcome::skipped(table, "no Last_Name column");
        }
        FilterOutcome::partitioned(table, |r| r.last_name.is_some())
    }
}

/// Removes rows without a street, City, State and Zip.
///
/// Once any address column has a source, an absent column counts as an
/// empty value.
pub struct AddressPresenceFilter {
    pub po_box_counts_as_address: bool,
}

impl Filter for AddressPresenceFilter {
    fn name(&self) -> &'static str {
        "address_present"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !ADDRESS_FIELDS.iter().any(|f| table.has(*f)) {
            return FilterOutcome::skipped(table, "no address columns");
        }
        let po_box = self.po_box_counts_as_address;
        FilterOutcome::partitioned(table, |r| {
            r.effective_address1(po_box).is_some()
                && r.city.is_some()
                && r.state.is_some()
                && r.zip.is_some()
        })
    }
}

/// Keeps rows in the home state.
pub struct OutOfStateFilter {
    pub home_state: String,
}

impl Filter for OutOfStateFilter {
    fn name(&self) -> &'static str {
        "out_of_state"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has(CanonicalField::State) {
            return FilterOutcome::skipped(table, "no State column");
        }
        let home = self.home_state.trim();
        FilterOutcome::partitioned(table, |r| {
            r.state.as_deref().is_some_and(|s| s.trim().eq_ignore_ascii_case(home))
        })
    }
}

/// Keeps rows whose model year lies in an inclusive window.
pub struct ModelYearFilter {
    pub min_year: i32,
    pub max_year: i32,
}

impl Filter for ModelYearFilter {
    fn name(&self) -> &'static str {
        "model_year"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has(CanonicalField::Year) {
            return FilterOutcome::skipped(table, "no Year column");
        }
        let window = self.min_year..=self.max_year;
        FilterOutcome::partitioned(table, |r| {
            r.year
                .as_deref()
                .and_then(heuristics::parse_model_year)
                .is_some_and(|y| window.contains(&y))
        })
    }
}

/// Keeps rows delivered at least `months` before `today`.
pub struct DeliveryAgeFilter {
    pub months: u32,
    pub today: NaiveDate,
}

impl DeliveryAgeFilter {
    /// Latest effective date that still passes.
    pub fn cutoff(&self) -> NaiveDate {
        self.today
            .checked_sub_months(Months::new(self.months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Filter for DeliveryAgeFilter {
    fn name(&self) -> &'static str {
        "delivery_age"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has_date_source() {
            return FilterOutcome::skipped(table, "no date columns");
        }
        let cutoff = self.cutoff();
        FilterOutcome::partitioned(table, |r| r.effective_date().is_some_and(|d| d <= cutoff))
    }
}

/// Keeps nearby customers when enough rows carry a distance.
pub struct DistanceFilter {
    pub max_miles: f64,
}

/// Parsed distance, or `None` when missing or implausible.
pub fn plausible_distance(value: Option<&str>) -> Option<f64> {
    value
        .and_then(heuristics::parse_number)
        .filter(|d| *d <= MAX_PLAUSIBLE_DISTANCE)
}

impl Filter for DistanceFilter {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn apply(&self, table: &CanonicalTable) -> FilterOutcome {
        if !table.has(CanonicalField::Distance) {
            return FilterOutcome::skipped(table, "no Distance column");
        }
        let valid = table
            .records
            .iter()
            .filter(|r| plausible_distance(r.distance.as_deref()).is_some())
            .count();
        let coverage = if table.is_empty() {
            0.0
        } else {
            valid as f64 / table.len() as f64
        };
        if coverage < MIN_DISTANCE_COVERAGE {
            return FilterOutcome::skipped(
                table,
                format!(
                    "distance coverage {:.1}% below {:.0}%",
                    coverage * 100.0,
                    MIN_DISTANCE_COVERAGE * 100.0
                ),
            );
        }
        let max = self.max_miles;
        FilterOutcome::partitioned(table, |r| {
            plausible_distance(r.distance.as_deref()).is_none_or(|d| d <= max)
        })
    }
}

/// The enabled filters for a configuration, in stage order.
pub fn enabled_filters(config: &PipelineConfig, today: NaiveDate) -> Vec<Box<dyn Filter>> {
    let mut filters: Vec<Box<dyn Filter>> = Vec::new();
    if config.exclude_corporate {
        filters.push(Box::new(CorporateFilter));
    }
    if config.name_present {
        filters.push(Box::new(NamePresenceFilter));
    }
    if config.address_present {
        filters.push(Box::new(AddressPresenceFilter {
            po_box_counts_as_address: config.po_box_counts_as_address,
        }));
    }
    if config.delete_out_of_state {
        filters.push(Box::new(OutOfStateFilter {
            home_state: config.home_state.clone(),
        }));
    }
    if config.model_year_filter.enabled {
        filters.push(Box::new(ModelYearFilter {
            min_year: config.model_year_filter.min_year,
            max_year: config.model_year_filter.max_year,
        }));
    }
    if config.delivery_age_filter.enabled {
        filters.push(Box::new(DeliveryAgeFilter {
            months: config.delivery_age_filter.months,
            today,
        }));
    }
    if config.distance_filter.enabled {
        filters.push(Box::new(DistanceFilter {
            max_miles: config.distance_filter.max_miles,
        }));
    }
    filters
}
