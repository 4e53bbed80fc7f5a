//! # vsh-timeline
//!
//! The timeline aggregation engine: turns the live file tree, the file
//! index, and the category configuration into cumulative per-category
//! daily series over a shared date axis, ready for a charting layer.
//!
//! Events are signed day-bucketed deltas: `+1` when a file's effective
//! creation date falls on a day, `-1` on the recorded deletion day when
//! deletion accounting is enabled. Each series is the running sum of its
//! deltas along the axis, produced by an ascending sorted merge (each
//! delta is consumed exactly once).

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

use vsh_core::{resolver, Category, LegendOrder, Result, Settings};
use vsh_index::Index;
use vsh_vault::{Vault, VaultFile};

/// One rendered series: category label, color, one value per axis day,
/// and the cumulative total used for legend ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySeries {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub total: i64,
    pub values: Vec<i64>,
}

/// Everything the charting layer consumes: the shared axis labels plus the
/// series, in legend order. Purely presentational fields pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphData {
    pub labels: Vec<String>,
    pub series: Vec<CategorySeries>,
}

impl GraphData {
    fn empty() -> Self {
        Self {
            labels: Vec::new(),
            series: Vec::new(),
        }
    }
}

/// Per-category event stream while aggregating: signed deltas keyed by
/// day bucket. BTreeMap keeps them sorted for the axis merge.
struct EventStream<'a> {
    category: &'a Category,
    deltas: BTreeMap<NaiveDate, i64>,
}

impl<'a> EventStream<'a> {
    fn new(category: &'a Category) -> Self {
        Self {
            category,
            deltas: BTreeMap::new(),
        }
    }

    fn add(&mut self, day: NaiveDate, delta: i64) {
        *self.deltas.entry(day).or_insert(0) += delta;
    }

    fn min_day(&self) -> Option<NaiveDate> {
        self.deltas.keys().next().copied()
    }

    fn max_day(&self) -> Option<NaiveDate> {
        self.deltas.keys().next_back().copied()
    }
}

/// Build graph data from the current live tree, enumerated here, with
/// "today" taken from the wall clock.
pub fn build<V: Vault>(vault: &V, index: &Index, settings: &Settings) -> Result<GraphData> {
    let files = vault.files()?;
    Ok(build_at(
        vault,
        &files,
        index,
        settings,
        Local::now().date_naive(),
    ))
}

/// Build graph data from an already-enumerated tree, with an explicit
/// "today" for the axis end. Deterministic given its inputs.
pub fn build_at<V: Vault>(
    vault: &V,
    files: &[VaultFile],
    index: &Index,
    settings: &Settings,
    today: NaiveDate,
) -> GraphData {
    let mut streams: Vec<EventStream> =
        settings.categories.iter().map(EventStream::new).collect();

    // Creation events from the live tree.
    for file in files {
        let created = effective_created(vault, file, index, settings);
        for matched in resolver::resolve(&settings.categories, &file.path) {
            if let Some(stream) = streams.iter_mut().find(|s| s.category.id == matched.id) {
                stream.add(created.date(), 1);
            }
        }
    }

    // Retroactive accounting for files the index remembers but the tree no
    // longer has: they count between their recorded creation and deletion.
    if settings.deletion_accounting_active() {
        for entry in index.values() {
            let Some(deleted) = entry.deleted else { continue };
            for matched in resolver::resolve(&settings.categories, &entry.path) {
                if let Some(stream) = streams.iter_mut().find(|s| s.category.id == matched.id) {
                    stream.add(entry.created.date(), 1);
                    stream.add(deleted.date(), -1);
                }
            }
        }
    }

    // Categories that never saw an event have no date range; drop them.
    streams.retain(|s| !s.deltas.is_empty());
    if streams.is_empty() {
        return GraphData::empty();
    }

    let axis = date_axis(&streams, settings.anchor_category_id, today);
    let labels = axis
        .iter()
        .map(|day| day.format(&settings.date_format).to_string())
        .collect();

    let mut series: Vec<CategorySeries> = streams
        .iter()
        .map(|stream| cumulative_series(stream, &axis))
        .collect();
    match settings.legend_order {
        LegendOrder::Ascending => series.sort_by(|a, b| a.total.cmp(&b.total)),
        LegendOrder::Descending => series.sort_by(|a, b| b.total.cmp(&a.total)),
    }

    debug!(
        days = axis.len(),
        series = series.len(),
        "built timeline graph data"
    );
    GraphData { labels, series }
}

/// Effective creation date of a live file, as an ordered fallback chain:
/// frontmatter override (when configured and parseable), then the indexed
/// creation date, then the live timestamp.
fn effective_created<V: Vault>(
    vault: &V,
    file: &VaultFile,
    index: &Index,
    settings: &Settings,
) -> NaiveDateTime {
    if let (Some(field), Some(format)) = (&settings.override_field, &settings.override_format) {
        if let Some(raw) = vault.metadata_field(&file.path, field) {
            match parse_override(&raw, format) {
                Some(parsed) => return parsed,
                None => warn!(
                    path = %file.path,
                    value = %raw,
                    format = %format,
                    "unparseable date override, falling back"
                ),
            }
        }
    }
    if let Some(entry) = index.get(&file.path) {
        return entry.created;
    }
    file.created
}

/// Parse an override value: full date-time first, then date-only taken at
/// midday (the day bucket is all that matters downstream).
fn parse_override(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(12, 0, 0))
    })
}

/// The shared axis: every calendar day from the start (the anchor
/// category's earliest day when configured and populated, else the global
/// minimum) through max(every stream's maximum, today).
fn date_axis(streams: &[EventStream], anchor: Option<u32>, today: NaiveDate) -> Vec<NaiveDate> {
    let global_min = streams.iter().filter_map(EventStream::min_day).min();
    let start = anchor
        .and_then(|id| streams.iter().find(|s| s.category.id == id))
        .and_then(EventStream::min_day)
        .or(global_min);
    let Some(start) = start else { return Vec::new() };

    let end = streams
        .iter()
        .filter_map(EventStream::max_day)
        .max()
        .map_or(today, |max| max.max(today));

    let mut axis = Vec::new();
    let mut day = start;
    loop {
        axis.push(day);
        if day >= end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    axis
}

/// Walk the axis once, consuming each delta at most once in ascending
/// order. Deltas dated before the axis start fold into the first value.
fn cumulative_series(stream: &EventStream, axis: &[NaiveDate]) -> CategorySeries {
    let mut pending = stream.deltas.iter().peekable();
    let mut sum = 0i64;
    let mut values = Vec::with_capacity(axis.len());
    for &day in axis {
        while let Some((&delta_day, &delta)) = pending.peek() {
            if delta_day > day {
                break;
            }
            sum += delta;
            pending.next();
        }
        values.push(sum);
    }

    CategorySeries {
        id: stream.category.id,
        name: stream.category.name.clone(),
        color: stream.category.color.clone(),
        total: stream.deltas.values().sum(),
        values,
    }
}
