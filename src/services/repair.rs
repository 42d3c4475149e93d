//! Structural repair of the course catalog
//!
//! The exported catalog carries two known corruptions:
//!
//! 1. Split quotes: a free-text location such as `N'Hall A, Room 3'` contains
//!    a comma, so its tail lands in `instructor` and every later column moves
//!    one place to the right.
//! 2. Column shift: the whole table was written one column to the right, so
//!    `course_name` holds credit counts, `course_code` holds names and
//!    `course_id` holds codes.
//!
//! Each detector runs in two passes. The first pass inspects the table and
//! produces per-row flags or a catalog-wide trigger. The second builds
//! replacement columns and returns a new table.

use crate::models::Table;

/// Marker left by the exporter on quoted national-character strings
const QUOTE_PREFIX: &str = "N'";
const QUOTE_SUFFIX: char = '\'';

/// Repairs a raw course table
///
/// Pure and idempotent on clean input: a repaired table no longer trips
/// either detector.
pub fn repair(table: Table) -> Table {
    if table.is_empty() {
        return table;
    }

    let table = table.map_cells(|cell| cell.trim().to_string());
    let table = repair_split_quotes(table);
    let table = repair_column_shift(table);
    strip_quote_artifacts(table)
}

/// Flags rows whose location opens with `N'` and whose instructor closes the quote
pub fn split_quote_flags(table: &Table) -> Vec<bool> {
    let (Some(locations), Some(instructors)) =
        (table.column("location"), table.column("instructor"))
    else {
        return vec![false; table.len()];
    };

    locations
        .iter()
        .zip(&instructors)
        .map(|(loc, instr)| loc.starts_with(QUOTE_PREFIX) && instr.ends_with(QUOTE_SUFFIX))
        .collect()
}

fn repair_split_quotes(table: Table) -> Table {
    let flags = split_quote_flags(&table);
    let flagged = flags.iter().filter(|f| **f).count();
    if flagged == 0 {
        return table;
    }

    tracing::warn!(rows = flagged, "Repairing split quoted locations");

    let n = table.len();
    let locations = column_or_blank(&table, "location");
    let instructors = column_or_blank(&table, "instructor");
    let semesters = column_or_blank(&table, "semester_offered");
    let descriptions = table.column("course_description");

    let mut new_locations = locations.clone();
    let mut new_instructors = instructors.clone();
    let mut new_semesters = semesters.clone();

    for i in (0..n).filter(|&i| flags[i]) {
        new_locations[i] = strip_outer_quotes(&format!("{},{}", locations[i], instructors[i]));
        new_instructors[i] = semesters[i].clone();
        if let Some(descriptions) = &descriptions {
            new_semesters[i] = descriptions[i].clone();
        }
    }

    let table = table
        .with_column("location", new_locations)
        .with_column("instructor", new_instructors);

    if descriptions.is_some() {
        table.with_column("semester_offered", new_semesters)
    } else {
        table
    }
}

/// True when strictly more than half of the `course_name` values are numeric
pub fn column_shift_detected(table: &Table) -> bool {
    let Some(names) = table.column("course_name") else {
        return false;
    };
    if names.is_empty() {
        return false;
    }

    let numeric = names.iter().filter(|name| is_numeric(name)).count();
    numeric * 2 > names.len()
}

fn repair_column_shift(table: Table) -> Table {
    if !column_shift_detected(&table) {
        return table;
    }

    tracing::warn!(rows = table.len(), "Repairing column shift and regenerating course ids");

    let credits = column_or_blank(&table, "course_name");
    let names = column_or_blank(&table, "course_code");
    let codes = column_or_blank(&table, "course_id");
    let ids = (1..=table.len()).map(|i| i.to_string()).collect();

    table
        .with_column("credits", credits)
        .with_column("course_name", names)
        .with_column("course_code", codes)
        .with_column("course_id", ids)
}

/// Removes leftover `N'...'` quoting from location and instructor across the catalog
fn strip_quote_artifacts(table: Table) -> Table {
    table
        .map_column("location", |loc| strip_outer_quotes(loc).trim().to_string())
        .map_column("instructor", |instr| {
            instr.replace(QUOTE_PREFIX, "").replace(QUOTE_SUFFIX, "").trim().to_string()
        })
}

fn strip_outer_quotes(value: &str) -> String {
    let value = value.strip_prefix(QUOTE_PREFIX).unwrap_or(value);
    value.strip_suffix(QUOTE_SUFFIX).unwrap_or(value).to_string()
}

fn column_or_blank(table: &Table, name: &str) -> Vec<String> {
    table
        .column(name)
        .unwrap_or_else(|| vec![String::new(); table.len()])
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().map(|v| !v.is_nan()).unwrap_or(false)
}
