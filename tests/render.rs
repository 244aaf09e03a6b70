use fpl_charts::FplError;
use fpl_charts::render::{Renderer, XlsxRenderer};
use fpl_charts::report::{ChartKind, ChartSpec, PlotPoint, Tone};

fn spec(kind: ChartKind, points: usize) -> ChartSpec {
    ChartSpec {
        filename: "most_bonus_pts".to_string(),
        title: "Fantasy Premier League 2020/21".to_string(),
        subtitle: "Most Bonus Points".to_string(),
        footnote: "*min 50 total pts".to_string(),
        kind,
        x_label: "Player".to_string(),
        y_label: "Bonus points".to_string(),
        points: (0..points)
            .map(|idx| PlotPoint {
                label: format!("Player {idx}"),
                x: idx as f64,
                y: 10.0 + idx as f64,
                annotations: vec![format!("{} bonus pts", 10 + idx), "200 total pts".to_string()],
                tone: if idx % 2 == 0 { Tone::Positive } else { Tone::Negative },
                photo_url: format!("https://img.example/p{idx}.png"),
            })
            .collect(),
    }
}

#[test]
fn writes_column_chart_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = XlsxRenderer::new(dir.path().join("charts"));
    let path = renderer.render(&spec(ChartKind::Column, 5)).unwrap();
    assert_eq!(path, dir.path().join("charts").join("most_bonus_pts.xlsx"));
    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn writes_scatter_chart_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = XlsxRenderer::new(dir.path());
    let path = renderer.render(&spec(ChartKind::Scatter, 3)).unwrap();
    assert!(path.exists());
}

#[test]
fn refuses_empty_chart() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = XlsxRenderer::new(dir.path());
    let err = renderer.render(&spec(ChartKind::Column, 0)).unwrap_err();
    assert!(matches!(err, FplError::EmptyResult { .. }));
    assert!(!dir.path().join("most_bonus_pts.xlsx").exists());
}
