use crate::analyzers::types::{BirthYearStats, Demographics, SchemaField};
use crate::analyzers::utility::{FrequencyTable, ValueCount};
use crate::trips::TripTable;

fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<ValueCount<String>> {
    values
        .collect::<FrequencyTable<&str>>()
        .into_value_counts()
        .into_iter()
        .map(|c| ValueCount {
            value: c.value.to_string(),
            count: c.count,
        })
        .collect()
}

fn birth_year_stats(table: &TripTable) -> Option<BirthYearStats> {
    let mut years = FrequencyTable::new();
    let mut earliest = i32::MAX;
    let mut most_recent = i32::MIN;

    for year in table.iter().filter_map(|t| t.birth_year()) {
        earliest = earliest.min(year);
        most_recent = most_recent.max(year);
        years.add(year);
    }

    years.mode().map(|mode| BirthYearStats {
        earliest_birth_year: earliest,
        most_recent_birth_year: most_recent,
        most_common_birth_year: mode.value,
    })
}

/// Rider breakdown by user type, gender and birth year.
///
/// Never fails: an empty table yields empty counts. Gender and birth-year
/// sections are [`SchemaField::Absent`] when the city's data has no such
/// column; rows with a blank cell are skipped.
pub fn summarize(table: &TripTable) -> Demographics {
    let schema = table.schema();

    let gender_counts = if schema.has_gender {
        SchemaField::Present(value_counts(table.iter().filter_map(|t| t.gender())))
    } else {
        SchemaField::Absent
    };

    let birth_year_stats = if schema.has_birth_year {
        SchemaField::Present(birth_year_stats(table))
    } else {
        SchemaField::Absent
    };

    Demographics {
        user_type_counts: value_counts(table.iter().filter_map(|t| t.user_type())),
        gender_counts,
        birth_year_stats,
    }
}
