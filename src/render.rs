use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartFormat, ChartPoint, ChartSolidFill, ChartType, Color, Format,
    Workbook, Worksheet,
};
use tracing::info;

use crate::error::{FplError, Result};
use crate::report::{ChartKind, ChartSpec, Tone};

const SHEET: &str = "Report";
const HEADER_ROW: u32 = 3;
const FIRST_DATA_ROW: u32 = 4;
const CHART_COL: u16 = 7;

const INDIGO: u32 = 0x4B0082;
const LIMEGREEN: u32 = 0x32CD32;
const RED: u32 = 0xFF0000;

/// Draws a chart spec somewhere and reports where it went.
pub trait Renderer {
    fn render(&self, chart: &ChartSpec) -> Result<PathBuf>;
}

/// Writes one `.xlsx` workbook per chart: the annotated data table plus an
/// embedded chart.
pub struct XlsxRenderer {
    out_dir: PathBuf,
}

impl XlsxRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn path_for(&self, chart: &ChartSpec) -> PathBuf {
        self.out_dir.join(format!("{}.xlsx", chart.filename))
    }
}

impl Renderer for XlsxRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<PathBuf> {
        if spec.points.is_empty() {
            return Err(FplError::EmptyResult {
                report: spec.filename.clone(),
            });
        }
        fs::create_dir_all(&self.out_dir).map_err(|err| {
            FplError::Render(format!("create {}: {err}", self.out_dir.display()))
        })?;

        let path = self.path_for(spec);
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SHEET)?;
            write_table(sheet, spec)?;
            let chart = build_chart(spec);
            sheet.insert_chart(0, CHART_COL, &chart)?;
        }
        save(&mut workbook, &path)?;
        info!(path = %path.display(), players = spec.points.len(), "chart written");
        Ok(path)
    }
}

fn save(workbook: &mut Workbook, path: &Path) -> Result<()> {
    workbook
        .save(path)
        .map_err(|err| FplError::Render(format!("write {}: {err}", path.display())))
}

fn write_table(sheet: &mut Worksheet, spec: &ChartSpec) -> Result<()> {
    let banner = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(INDIGO));
    let heading = Format::new()
        .set_italic()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(INDIGO));
    let bold = Format::new().set_bold();
    let italic = Format::new().set_italic();

    sheet.write_string_with_format(0, 0, &spec.title, &banner)?;
    sheet.write_string_with_format(1, 0, &spec.subtitle, &heading)?;

    let headers = [
        "Player",
        spec.y_label.as_str(),
        spec.x_label.as_str(),
        "Note",
        "Note",
        "Photo",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(HEADER_ROW, col as u16, *header, &bold)?;
    }

    for (idx, point) in spec.points.iter().enumerate() {
        let row = FIRST_DATA_ROW + idx as u32;
        sheet.write_string(row, 0, &point.label)?;
        sheet.write_number(row, 1, point.y)?;
        sheet.write_number(row, 2, point.x)?;
        for (offset, note) in point.annotations.iter().take(2).enumerate() {
            sheet.write_string(row, 3 + offset as u16, note)?;
        }
        sheet.write_string(row, 5, &point.photo_url)?;
    }

    let foot_row = FIRST_DATA_ROW + spec.points.len() as u32 + 1;
    sheet.write_string_with_format(foot_row, 0, &spec.footnote, &italic)?;
    sheet.write_string_with_format(foot_row + 1, 0, "Data Source: Official FPL", &italic)?;
    sheet.write_string_with_format(
        foot_row + 2,
        0,
        format!("Generated {}", Utc::now().to_rfc3339()),
        &italic,
    )?;
    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 20)?;
    sheet.set_column_width(3, 16)?;
    sheet.set_column_width(4, 16)?;
    Ok(())
}

fn build_chart(spec: &ChartSpec) -> Chart {
    let last_row = FIRST_DATA_ROW + spec.points.len() as u32 - 1;
    let mut chart = match spec.kind {
        ChartKind::Column => Chart::new(ChartType::Column),
        ChartKind::Scatter => Chart::new(ChartType::Scatter),
    };
    chart.set_width(1200).set_height(640);
    let heading = format!("{} - {}", spec.title, spec.subtitle);
    chart.title().set_name(heading.as_str());
    chart.x_axis().set_name(spec.x_label.as_str());
    chart.y_axis().set_name(spec.y_label.as_str());
    chart.legend().set_hidden();

    let labels: Vec<ChartDataLabel> = spec
        .points
        .iter()
        .map(|p| {
            let text = format!("{} ({})", p.label, p.annotations.join(", "));
            ChartDataLabel::new().set_value(text.as_str()).to_custom()
        })
        .collect();

    match spec.kind {
        ChartKind::Column => {
            let colors: Vec<ChartPoint> = spec
                .points
                .iter()
                .map(|p| {
                    let rgb = match p.tone {
                        Tone::Neutral => INDIGO,
                        Tone::Positive => LIMEGREEN,
                        Tone::Negative => RED,
                    };
                    ChartPoint::new().set_format(
                        ChartFormat::new()
                            .set_solid_fill(ChartSolidFill::new().set_color(Color::RGB(rgb))),
                    )
                })
                .collect();
            chart
                .add_series()
                .set_categories((SHEET, FIRST_DATA_ROW, 0, last_row, 0))
                .set_values((SHEET, FIRST_DATA_ROW, 1, last_row, 1))
                .set_points(&colors)
                .set_custom_data_labels(&labels);
        }
        ChartKind::Scatter => {
            chart
                .add_series()
                .set_categories((SHEET, FIRST_DATA_ROW, 2, last_row, 2))
                .set_values((SHEET, FIRST_DATA_ROW, 1, last_row, 1))
                .set_custom_data_labels(&labels);
        }
    }
    chart
}
