//! Rendering sinks: consumers of chart-ready [`Series`].
//!
//! All visual concerns live behind [`RenderSink`]; the pipeline never hands a sink anything but
//! finished series.

use crate::aggregate::{Series, SeriesKind};

/// A chart renderer boundary. Receives each aggregate series in order.
pub trait RenderSink {
    fn render(&mut self, series: &Series);
}

/// Prints each series as an underlined table on stdout.
#[derive(Debug, Default)]
pub struct TermSink;

impl RenderSink for TermSink {
    fn render(&mut self, series: &Series) {
        println!("{}", series.name);
        println!("{}", underline(&series.name));
        println!();

        if series.labels.is_empty() {
            println!("  (no data)");
            println!();
            return;
        }

        let width = series
            .labels
            .iter()
            .map(|label| label.len())
            .max()
            .unwrap_or(0);
        for (label, value) in series.labels.iter().zip(&series.values) {
            match series.kind {
                SeriesKind::Pie => println!("  {label:<width$}  {value:>7.2}%"),
                _ => println!("  {label:<width$}  {:>7}", *value as u64),
            }
        }
        println!();
    }
}

/// Collects the series and serializes them as a JSON array, for an external chart renderer.
#[derive(Debug, Default)]
pub struct JsonSink {
    series: Vec<Series>,
}

impl JsonSink {
    pub fn into_json(self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.series)
    }
}

impl RenderSink for JsonSink {
    fn render(&mut self, series: &Series) {
        self.series.push(series.clone());
    }
}

fn underline(title: &str) -> String {
    title
        .split(' ')
        .map(|word| "=".repeat(word.len()))
        .collect::<Vec<_>>()
        .join(" ")
}
