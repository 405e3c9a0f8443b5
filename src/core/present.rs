use crate::domain::model::FleetSeries;
use crate::domain::ports::{ExportFormat, Storage};
use crate::utils::error::{FleetError, Result};
use rust_xlsxwriter::Workbook;
use std::fmt;

pub const COLUMN_HEADERS: [&str; 3] = ["Localidade", "Ano", "Valor"];

const PLOT_WIDTH: usize = 40;

/// Line chart of one region's fleet counts, x = year, y = vehicles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub title: String,
    pub series_name: String,
    pub x_labels: Vec<String>,
    pub values: Vec<i64>,
}

impl Chart {
    pub fn points(&self) -> impl Iterator<Item = (&str, i64)> {
        self.x_labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn y_labels(&self) -> Vec<String> {
        self.values.iter().copied().map(group_thousands).collect()
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "── {}", self.series_name)?;

        let max = self.values.iter().copied().max().unwrap_or(0).max(1);
        let y_labels = self.y_labels();
        let label_width = y_labels.iter().map(String::len).max().unwrap_or(0);

        for ((year, value), label) in self.points().zip(&y_labels) {
            let filled = bar_width(value, max);
            writeln!(
                f,
                "{year} │{marker:>filled$}{pad} {label:>label_width$}",
                marker = if filled > 0 { "●" } else { "" },
                pad = " ".repeat(PLOT_WIDTH - filled),
            )?;
        }
        Ok(())
    }
}

// i128 keeps `value * PLOT_WIDTH` exact for any i64.
fn bar_width(value: i64, max: i64) -> usize {
    let scaled = i128::from(value.max(0)) * PLOT_WIDTH as i128 / i128::from(max.max(1));
    usize::try_from(scaled).map_or(0, |width| width.min(PLOT_WIDTH))
}

/// Formats an integer with comma thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Builds a chart for the rows of `region_code`, years ascending.
pub fn render(series: &FleetSeries, region_code: &str, region_name: &str) -> Result<Chart> {
    let mut points: Vec<(i32, i64)> = series
        .for_region(region_code)
        .map(|row| (row.year, row.value))
        .collect();

    if points.is_empty() {
        tracing::error!("No rows for region {} in series of {}", region_code, series.len());
        return Err(FleetError::NoDataError {
            region_code: region_code.to_string(),
        });
    }
    points.sort_by_key(|(year, _)| *year);

    Ok(Chart {
        title: format!("Vehicle fleet - {}", region_name),
        series_name: region_name.to_string(),
        x_labels: points.iter().map(|(year, _)| year.to_string()).collect(),
        values: points.iter().map(|(_, value)| *value).collect(),
    })
}

/// File name for a region's export; path separators are not allowed through.
pub fn export_file_name(region_name: &str, format: ExportFormat) -> String {
    let safe: String = region_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
        .collect();
    format!("{}.{}", safe, format.extension())
}

pub fn to_xlsx(series: &FleetSeries) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in (0u16..).zip(COLUMN_HEADERS) {
        worksheet.write_string(0, col, header)?;
    }
    for (row, record) in (1u32..).zip(series.rows()) {
        worksheet.write_string(row, 0, &record.region_code)?;
        worksheet.write_number(row, 1, f64::from(record.year))?;
        worksheet.write_number(row, 2, record.value as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn to_csv(series: &FleetSeries) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if series.is_empty() {
        writer.write_record(COLUMN_HEADERS)?;
    }
    for row in series.rows() {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| FleetError::IoError(e.into_error()))
}

/// Writes the full series to `{region_name}.{ext}` through `storage`,
/// replacing any earlier export for the same region.
pub async fn save<S: Storage>(
    storage: &S,
    series: &FleetSeries,
    region_name: &str,
    format: ExportFormat,
) -> Result<String> {
    let file_name = export_file_name(region_name, format);
    let data = match format {
        ExportFormat::Xlsx => to_xlsx(series)?,
        ExportFormat::Csv => to_csv(series)?,
    };

    tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
    let path = storage.write_file(&file_name, &data).await?;
    tracing::info!("Saved {} rows to {}", series.len(), path);
    Ok(path)
}
