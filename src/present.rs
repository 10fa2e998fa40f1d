use eframe::egui::Color32;

use crate::color::{generate_palette, RD_YL_GN, YL_OR_RD};
use crate::data::aggregate::{self, Histogram, Summary};
use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

/// A chart area either has something to draw or a message explaining why not.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Ready(T),
    NoData(&'static str),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(spec) => Some(spec),
            Panel::NoData(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub text: String,
    pub color: Color32,
}

/// Horizontal bars, bottom to top in `bars` order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub title: String,
    pub bars: Vec<BarItem>,
    pub x_limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub center: f64,
    pub width: f64,
    pub count: usize,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Fraction of the whole, in `[0, 1]`.
    pub share: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSpec {
    pub title: &'static str,
    /// Inner radius as a fraction of the outer one.
    pub hole: f64,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub iso3: String,
    pub mean: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethSpec {
    pub title: String,
    pub value_label: &'static str,
    pub regions: Vec<Region>,
    pub min: f64,
    pub max: f64,
}

/// Detail table headers, in the same order as [`detail_row`].
pub const DETAIL_HEADERS: [&str; 10] = [
    "Ano",
    "Senioridade",
    "Tipo de Contrato",
    "Cargo",
    "Salário",
    "Moeda",
    "USD",
    "Tipo",
    "Tamanho da Empresa",
    "País",
];

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567.8` → `"1,234,568"`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(&format!("{:.0}", rounded.abs())))
}

/// `75000.0` → `"$75,000"`.
pub fn format_usd(value: f64) -> String {
    let body = format_count(value);
    match body.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${body}"),
    }
}

/// `1234.5` → `"$1,234.50"`.
pub fn format_usd_cents(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(int))
}

// ---------------------------------------------------------------------------
// Aggregate → presentation mappings
// ---------------------------------------------------------------------------

pub fn metric_cards(summary: &Summary) -> [MetricCard; 4] {
    [
        MetricCard {
            label: "Salário médio",
            value: format_usd(summary.mean_salary),
        },
        MetricCard {
            label: "Salário máximo",
            value: format_usd(summary.max_salary),
        },
        MetricCard {
            label: "Total de registros",
            value: format_count(summary.record_count as f64),
        },
        MetricCard {
            label: "Cargo mais frequente",
            value: summary.most_frequent_title.clone(),
        },
    ]
}

/// Room left right of the longest bar for its value label.
const BAR_PADDING: f64 = 0.12;

pub fn top_titles_chart(view: &[&Record], n: usize) -> Panel<BarSpec> {
    let top = aggregate::top_n_by_title(view, n);
    if top.is_empty() {
        return Panel::NoData("Nenhum dado para exibir no gráfico de cargos.");
    }

    let min = top.first().map_or(0.0, |g| g.mean);
    let max = top.last().map_or(0.0, |g| g.mean);
    let bars = top
        .into_iter()
        .map(|g| BarItem {
            color: YL_OR_RD.sample_range(g.mean, min, max),
            text: format_usd_cents(g.mean),
            value: g.mean,
            label: g.key,
        })
        .collect();

    Panel::Ready(BarSpec {
        title: format!("Top {n} cargos por salário médio"),
        bars,
        x_limit: max.max(0.0) * (1.0 + BAR_PADDING),
    })
}

pub fn histogram_chart(view: &[&Record], bins: usize) -> Panel<HistogramSpec> {
    let hist: Histogram = aggregate::histogram(view, bins);
    if hist.is_empty() {
        return Panel::NoData("Nenhum dado para exibir no gráfico de distribuição.");
    }

    let centers = hist.centers();
    let (lo, hi) = (
        centers.first().copied().unwrap_or(0.0),
        centers.last().copied().unwrap_or(0.0),
    );
    let bins = centers
        .iter()
        .zip(hist.widths())
        .zip(&hist.counts)
        .map(|((&center, width), &count)| HistogramBin {
            center,
            width,
            count,
            color: YL_OR_RD.sample_range(center, lo, hi),
        })
        .collect();

    Panel::Ready(HistogramSpec {
        title: "Distribuição de salários anuais",
        x_title: "Faixa salarial (USD)",
        y_title: "Contagem",
        bins,
    })
}

pub fn remote_mix_chart(view: &[&Record]) -> Panel<PieSpec> {
    let counts = aggregate::value_counts(view, |r| r.remote.as_str());
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Panel::NoData("Nenhum dado para exibir no gráfico dos tipos de trabalho.");
    }

    let palette = generate_palette(counts.len());
    let slices = counts
        .into_iter()
        .zip(palette)
        .map(|((label, count), color)| PieSlice {
            label,
            count,
            share: count as f64 / total as f64,
            color,
        })
        .collect();

    Panel::Ready(PieSpec {
        title: "Proporção dos tipos de trabalho",
        hole: 0.5,
        slices,
    })
}

fn localized_role(role: &str) -> &str {
    match role {
        "Data Scientist" => "Cientista de Dados",
        "Data Engineer" => "Engenheiro de Dados",
        "Data Analyst" => "Analista de Dados",
        other => other,
    }
}

/// Mean salary of `role` per residence country.
pub fn role_choropleth(view: &[&Record], role: &str) -> Panel<ChoroplethSpec> {
    if view.is_empty() {
        return Panel::NoData("Nenhum dado para exibir no gráfico de países.");
    }

    let means = aggregate::grouped_mean(
        view,
        |r| r.job_title == role,
        |r| r.residence_iso3.as_str(),
        |r| r.usd,
    );
    if means.is_empty() {
        return Panel::NoData("Nenhum registro do cargo selecionado para exibir no mapa.");
    }

    let min = means.iter().map(|g| g.mean).fold(f64::INFINITY, f64::min);
    let max = means.iter().map(|g| g.mean).fold(f64::NEG_INFINITY, f64::max);
    let regions = means
        .into_iter()
        .map(|g| Region {
            color: RD_YL_GN.sample_range(g.mean, min, max),
            iso3: g.key,
            mean: g.mean,
        })
        .collect();

    Panel::Ready(ChoroplethSpec {
        title: format!("Salário médio de {} por país", localized_role(role)),
        value_label: "Salário médio (USD)",
        regions,
        min,
        max,
    })
}

/// One detail-table row; the raw residence and company columns are left out.
pub fn detail_row(rec: &Record) -> [String; 10] {
    [
        rec.year.to_string(),
        rec.seniority.clone(),
        rec.contract.clone(),
        rec.job_title.clone(),
        format_count(rec.salary),
        rec.currency.clone(),
        format_count(rec.usd),
        rec.remote.clone(),
        rec.company_size.clone(),
        rec.residence_iso3.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn number_formatting() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1_234_567.8), "1,234,568");
        assert_eq!(format_usd(75_000.0), "$75,000");
        assert_eq!(format_usd(-1_500.0), "-$1,500");
        assert_eq!(format_usd_cents(1_234.5), "$1,234.50");
        assert_eq!(format_usd_cents(100.0), "$100.00");
    }

    #[test]
    fn empty_view_produces_no_data_panels() {
        let view: Vec<&Record> = Vec::new();
        assert!(matches!(top_titles_chart(&view, 10), Panel::NoData(_)));
        assert!(matches!(histogram_chart(&view, 30), Panel::NoData(_)));
        assert!(matches!(remote_mix_chart(&view), Panel::NoData(_)));
        assert!(matches!(role_choropleth(&view, "Data Scientist"), Panel::NoData(_)));

        let cards = metric_cards(&aggregate::summarize(&view));
        let values: Vec<&str> = cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["$0", "$0", "0", ""]);
    }

    #[test]
    fn bar_chart_is_ascending_with_padded_axis() {
        let data = vec![
            record(2023, "senior", "Data Scientist", 100_000.0, "remoto"),
            record(2023, "junior", "Analyst", 50_000.0, "presencial"),
        ];
        let view: Vec<&Record> = data.iter().collect();
        let spec = match top_titles_chart(&view, 10) {
            Panel::Ready(spec) => spec,
            Panel::NoData(msg) => panic!("{msg}"),
        };
        assert_eq!(spec.title, "Top 10 cargos por salário médio");
        assert_eq!(spec.bars[0].label, "Analyst");
        assert_eq!(spec.bars[1].text, "$100,000.00");
        assert!((spec.x_limit - 112_000.0).abs() < 1e-6);
    }

    #[test]
    fn pie_shares_sum_to_one() {
        let data = vec![
            record(2023, "senior", "X", 1.0, "remoto"),
            record(2023, "senior", "X", 1.0, "remoto"),
            record(2023, "senior", "X", 1.0, "presencial"),
            record(2023, "senior", "X", 1.0, "hibrido"),
        ];
        let view: Vec<&Record> = data.iter().collect();
        let spec = remote_mix_chart(&view).ready().cloned().unwrap();
        assert_eq!(spec.slices.len(), 3);
        assert_eq!(spec.slices[0].label, "remoto");
        assert!((spec.slices[0].share - 0.5).abs() < 1e-12);
        let total: f64 = spec.slices.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn choropleth_without_focus_role_has_no_data() {
        let data = vec![record(2023, "junior", "Analyst", 50_000.0, "presencial")];
        let view: Vec<&Record> = data.iter().collect();
        assert!(matches!(role_choropleth(&view, "Data Scientist"), Panel::NoData(_)));
    }

    #[test]
    fn choropleth_averages_per_country() {
        let mut data = vec![
            record(2023, "senior", "Data Scientist", 100_000.0, "remoto"),
            record(2024, "senior", "Data Scientist", 120_000.0, "remoto"),
            record(2024, "senior", "Data Scientist", 40_000.0, "remoto"),
            record(2024, "senior", "Analyst", 1.0, "remoto"),
        ];
        data[2].residence_iso3 = "BRA".into();
        let view: Vec<&Record> = data.iter().collect();
        let spec = role_choropleth(&view, "Data Scientist").ready().cloned().unwrap();
        assert_eq!(spec.title, "Salário médio de Cientista de Dados por país");
        let keys: Vec<(&str, f64)> = spec.regions.iter().map(|r| (r.iso3.as_str(), r.mean)).collect();
        assert_eq!(keys, vec![("BRA", 40_000.0), ("USA", 110_000.0)]);
        assert_eq!(spec.min, 40_000.0);
        assert_eq!(spec.max, 110_000.0);
    }

    #[test]
    fn histogram_bins_carry_counts() {
        let data: Vec<Record> = (0..10)
            .map(|i| record(2023, "senior", "X", 10_000.0 * i as f64, "remoto"))
            .collect();
        let view: Vec<&Record> = data.iter().collect();
        let spec = histogram_chart(&view, 5).ready().cloned().unwrap();
        assert_eq!(spec.bins.len(), 5);
        assert_eq!(spec.bins.iter().map(|b| b.count).sum::<usize>(), 10);
    }

    #[test]
    fn detail_row_drops_raw_location_columns() {
        let rec = record(2023, "senior", "Data Scientist", 123_456.0, "remoto");
        let row = detail_row(&rec);
        assert_eq!(row.len(), DETAIL_HEADERS.len());
        assert_eq!(row[4], "123,456");
        assert_eq!(row[9], "USA");
    }
}
