// Reconciliation of the short and long thermal runs
use super::series::{Row, Series};

/// Merge two time-aligned runs into one timeline.
///
/// The x-values of the result are the union of both inputs. Where both runs have a
/// row at the same x, each motor takes the `long` run's reading when present and
/// falls back to the `short` run's reading otherwise.
pub fn merge_prefer_later(short: &Series, long: &Series) -> Series {
    let mut columns = long.columns().to_vec();
    for column in short.columns() {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }

    let (a, b) = (short.rows(), long.rows());
    let mut rows = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    loop {
        match (a.get(i), b.get(j)) {
            (Some(s), Some(l)) if s.x == l.x => {
                rows.push(combine(s, l));
                i += 1;
                j += 1;
            }
            (Some(s), Some(l)) if s.x < l.x => {
                rows.push(s.clone());
                i += 1;
            }
            (_, Some(l)) => {
                rows.push(l.clone());
                j += 1;
            }
            (Some(s), None) => {
                rows.push(s.clone());
                i += 1;
            }
            (None, None) => break,
        }
    }

    Series::new(
        "thermal",
        long.axis(),
        long.x_column().to_string(),
        columns,
        rows,
    )
}

fn combine(short: &Row, long: &Row) -> Row {
    let mut values = short.values.clone();
    values.extend(long.values.iter().map(|(k, v)| (k.clone(), *v)));
    Row::new(long.x, values)
}
