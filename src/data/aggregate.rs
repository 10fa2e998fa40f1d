//! Summary statistics over a filtered view.
//!
//! Every function here is a pure function of its input slice and returns a
//! defined empty-state value when the view is empty.

use std::collections::HashMap;

use super::model::Record;

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Arithmetic mean of `usd`; 0 for an empty view.
pub fn mean_salary(view: &[&Record]) -> f64 {
    if view.is_empty() {
        return 0.0;
    }
    view.iter().map(|r| r.usd).sum::<f64>() / view.len() as f64
}

/// Maximum of `usd`; 0 for an empty view.
pub fn max_salary(view: &[&Record]) -> f64 {
    view.iter()
        .map(|r| r.usd)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

pub fn record_count(view: &[&Record]) -> usize {
    view.len()
}

/// Mode of the job title. Ties go to the title encountered first.
pub fn most_frequent_title(view: &[&Record]) -> String {
    value_counts(view, |r| r.job_title.as_str())
        .into_iter()
        .next()
        .map(|(title, _)| title)
        .unwrap_or_default()
}

/// The four headline numbers, computed in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    pub most_frequent_title: String,
}

pub fn summarize(view: &[&Record]) -> Summary {
    Summary {
        mean_salary: mean_salary(view),
        max_salary: max_salary(view),
        record_count: record_count(view),
        most_frequent_title: most_frequent_title(view),
    }
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Group key paired with the mean of the grouped values.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
}

/// Running sum/count per key, remembering first-encounter order.
fn group_means<'a, K, V>(view: &[&'a Record], key: K, value: V) -> Vec<GroupMean>
where
    K: Fn(&'a Record) -> &'a str,
    V: Fn(&Record) -> f64,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<(&str, f64, usize)> = Vec::new();

    for &rec in view {
        let k = key(rec);
        let slot = *slots.entry(k).or_insert_with(|| {
            acc.push((k, 0.0, 0));
            acc.len() - 1
        });
        acc[slot].1 += value(rec);
        acc[slot].2 += 1;
    }

    acc.into_iter()
        .map(|(k, sum, n)| GroupMean {
            key: k.to_string(),
            mean: sum / n as f64,
        })
        .collect()
}

/// The `n` job titles with the highest mean `usd`, returned ascending by mean.
///
/// Among equal means the title seen first in the view wins a place in the
/// top `n` and sorts after (above, on a bar chart) the later one.
pub fn top_n_by_title(view: &[&Record], n: usize) -> Vec<GroupMean> {
    let mut groups = group_means(view, |r| r.job_title.as_str(), |r| r.usd);
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    groups.truncate(n);
    groups.reverse();
    groups
}

/// Filter by `predicate`, then mean of `value` grouped by `group`, sorted by key.
pub fn grouped_mean<'a, P, K, V>(view: &[&'a Record], predicate: P, group: K, value: V) -> Vec<GroupMean>
where
    P: Fn(&Record) -> bool,
    K: Fn(&'a Record) -> &'a str,
    V: Fn(&Record) -> f64,
{
    let subset: Vec<&'a Record> = view.iter().copied().filter(|r| predicate(r)).collect();
    let mut groups = group_means(&subset, group, value);
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Record count per distinct value of `column`, most frequent first; ties keep
/// first-encounter order.
pub fn value_counts<'a, K>(view: &[&'a Record], column: K) -> Vec<(String, usize)>
where
    K: Fn(&'a Record) -> &'a str,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for &rec in view {
        let k = column(rec);
        match slots.get(k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slots.insert(k, counts.len());
                counts.push((k, 1));
            }
        }
    }

    // Stable sort keeps encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(k, c)| (k.to_string(), c)).collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width binning of `usd`. `edges.len() == counts.len() + 1` unless empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Split `[min(usd), max(usd)]` into `bins` intervals, the last one closed on
/// the right. When every value is equal the range is widened to `v ± 0.5`.
pub fn histogram(view: &[&Record], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let Some((mut lo, mut hi)) = view.iter().map(|r| r.usd).fold(None::<(f64, f64)>, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) else {
        return Histogram::default();
    };

    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0usize; bins];
    for rec in view {
        let mut idx = (((rec.usd - lo) / width) as usize).min(bins - 1);
        // Division can land one bin off a value that sits exactly on an edge.
        if idx > 0 && rec.usd < edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && rec.usd >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}
