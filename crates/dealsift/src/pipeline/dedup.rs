//! Two-pass deduplication: by VIN, then by address.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::canonical::{CanonicalRecord, CanonicalTable};
use crate::inference::heuristics;

/// Why the deduplicator dropped a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Lost to a better row with the same VIN.
    Vin,
    /// Lost to a better row at the same address.
    Address,
    /// Its whole address group was suppressed because a newer row at that
    /// address was dropped in the VIN pass.
    CrossPass,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Vin => "vin",
            DropReason::Address => "address",
            DropReason::CrossPass => "cross_pass",
        }
    }
}

/// A row removed by the deduplicator.
#[derive(Debug, Clone, Serialize)]
pub struct DroppedRow {
    pub record: CanonicalRecord,
    pub reason: DropReason,
    /// The VIN or address key the row was grouped on.
    pub key: String,
    /// Source row of the group survivor, when one remains.
    pub kept_row: Option<usize>,
}

/// Result of deduplication.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub table: CanonicalTable,
    pub dropped: Vec<DroppedRow>,
}

impl DedupOutcome {
    pub fn removed(&self) -> usize {
        self.dropped.len()
    }

    pub fn count(&self, reason: DropReason) -> usize {
        self.dropped.iter().filter(|d| d.reason == reason).count()
    }
}

/// Survivor ordering for one row. Greater ranks win.
#[derive(Debug, Clone, Copy)]
struct Rank {
    date: Option<NaiveDate>,
    has_deal: bool,
    deal: Option<f64>,
    position: usize,
}

impl Rank {
    fn of(record: &CanonicalRecord, position: usize) -> Self {
        let deal = record.deal_number.as_deref();
        Self {
            date: record.effective_date(),
            has_deal: deal.is_some(),
            deal: deal.and_then(heuristics::parse_number).map(f64::abs),
            position,
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.has_deal.cmp(&other.has_deal))
            .then_with(|| match (self.deal, other.deal) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
            .then(self.position.cmp(&other.position))
    }
}

/// Position of the winning row among `members`.
fn survivor(members: &[usize], ranks: &[Rank]) -> usize {
    let mut best = members[0];
    for &m in &members[1..] {
        if ranks[m].cmp(&ranks[best]) == Ordering::Greater {
            best = m;
        }
    }
    best
}

/// Removes duplicate customers, keeping the freshest row per VIN and then
/// per address.
#[derive(Debug, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, table: &CanonicalTable) -> DedupOutcome {
        let records = &table.records;
        let ranks: Vec<Rank> = records.iter().enumerate().map(|(i, r)| Rank::of(r, i)).collect();
        let mut alive = vec![true; records.len()];
        let mut dropped: Vec<(usize, DropReason, String, Option<usize>)> = Vec::new();

        // Pass 1: VIN
        let mut by_vin: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(vin) = record.valid_vin() {
                by_vin.entry(vin).or_default().push(i);
            }
        }
        let mut vin_losers = Vec::new();
        for (vin, members) in &by_vin {
            let winner = survivor(members, &ranks);
            for &m in members.iter().filter(|&&m| m != winner) {
                alive[m] = false;
                vin_losers.push(m);
                dropped.push((m, DropReason::Vin, vin.clone(), Some(records[winner].row_number)));
            }
        }

        let keys: Vec<String> = records.iter().map(CanonicalRecord::address_key).collect();

        // Newest surviving date per address after pass 1
        let mut newest: IndexMap<&str, Option<NaiveDate>> = IndexMap::new();
        for (i, key) in keys.iter().enumerate() {
            if alive[i] && !key.is_empty() {
                let slot = newest.entry(key.as_str()).or_insert(None);
                *slot = (*slot).max(ranks[i].date);
            }
        }
        let mut suppressed: HashSet<&str> = HashSet::new();
        for &m in &vin_losers {
            let key = keys[m].as_str();
            if key.is_empty() {
                continue;
            }
            if let (Some(date), Some(best)) = (ranks[m].date, newest.get(key)) {
                if best.is_none_or(|b| date > b) {
                    suppressed.insert(key);
                }
            }
        }

        // Pass 2: address
        let mut by_address: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (i, key) in keys.iter().enumerate() {
            if alive[i] && !key.is_empty() {
                by_address.entry(key.as_str()).or_default().push(i);
            }
        }
        for (key, members) in &by_address {
            if suppressed.contains(key) {
                for &m in members {
                    alive[m] = false;
                    dropped.push((m, DropReason::CrossPass, key.to_string(), None));
                }
                continue;
            }
            let winner = survivor(members, &ranks);
            for &m in members.iter().filter(|&&m| m != winner) {
                alive[m] = false;
                let kept_row = Some(records[winner].row_number);
                dropped.push((m, DropReason::Address, key.to_string(), kept_row));
            }
        }

        let kept: Vec<CanonicalRecord> = records
            .iter()
            .zip(&alive)
            .filter(|(_, keep)| **keep)
            .map(|(r, _)| r.clone())
            .collect();

        let dropped: Vec<DroppedRow> = dropped
            .into_iter()
            .map(|(i, reason, key, kept_row)| DroppedRow {
                record: records[i].clone(),
                reason,
                key,
                kept_row,
            })
            .collect();

        log::info!(
            "dedup: {} -> {} rows ({} by VIN, {} by address, {} cross-pass)",
            records.len(),
            kept.len(),
            dropped.iter().filter(|d| d.reason == DropReason::Vin).count(),
            dropped.iter().filter(|d| d.reason == DropReason::Address).count(),
            dropped.iter().filter(|d| d.reason == DropReason::CrossPass).count(),
        );

        DedupOutcome {
            table: table.with_records(kept),
            dropped,
        }
    }
}
