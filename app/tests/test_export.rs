//! FILENAME: tests/test_export.rs
//! Integration tests for the export pipeline.

mod common;

use std::io::Cursor;

use activity_model::{Activity, FilterSpec, InMemoryStore, OutputFormat, RecordStore, ReportConfig, ReportType};
use app_lib::{capture_charts, DirectorySink, ExportError, ExportPipeline, ExportSettings};
use persistence::ChartImage;
use calamine::{Data, Reader, Xlsx};
use common::{context, pdf_images, pdf_pages, pipeline, ActivityFixture, BrokenSink, FakeSurface, MemorySink, TINY_PNG};
use report_engine::{aggregate, filter, rating_label, to_series, ChartDimension, ChartKind, Resolver};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_sheet(bytes: &[u8]) -> calamine::Range<Data> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec())).unwrap();
    workbook.worksheet_range("Actividades").unwrap()
}

fn column(range: &calamine::Range<Data>, col: usize) -> Vec<String> {
    range.rows().skip(1).map(|row| row[col].to_string()).collect()
}

fn red_a() -> FilterSpec {
    FilterSpec::builder().network("RED-A").build().unwrap()
}

fn no_network() -> FilterSpec {
    FilterSpec::builder().network("NOPE").build().unwrap()
}

// ============================================================================
// SPREADSHEET
// ============================================================================

#[test]
fn test_empty_store_gives_header_only_sheet() {
    let sink = MemorySink::default();
    let pipeline = ExportPipeline::new(
        InMemoryStore::default(),
        ExportSettings::default(),
        context(),
        Box::new(sink.clone()),
    );

    assert!(pipeline.export_spreadsheet(&[], &FilterSpec::all(), ReportType::Activities, None));

    let files = sink.delivered();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, "informe_actividades.xlsx");
    let range = read_sheet(&files[0].1);
    assert_eq!(range.get_size(), (1, 16));
    assert_eq!(range.get_value((0, 15)), Some(&Data::String("Comentarios".to_string())));
}

#[test]
fn test_network_filter_exports_matching_rows() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone());
    let config = ReportConfig::new(ReportType::Activities, red_a(), OutputFormat::Spreadsheet);

    let name = pipeline.run_blocking(config).unwrap();
    assert_eq!(name, "informe_actividades.xlsx");

    let files = sink.delivered();
    let range = read_sheet(&files[0].1);
    assert_eq!(range.height(), 5);
    assert!(column(&range, 5).iter().all(|network| network == "Red Andaluza"));
    assert_eq!(range.get_value((1, 13)), Some(&Data::Float(27.0)));
}

#[test]
fn test_requested_filename_gets_extension() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone());
    let records = ActivityFixture::activities();

    assert!(pipeline.export_spreadsheet(&records, &FilterSpec::all(), ReportType::Complete, Some("memoria")));
    assert_eq!(sink.delivered()[0].0, "memoria.xlsx");
}

#[test]
fn test_failed_delivery_reports_false() {
    let pipeline = ExportPipeline::new(
        ActivityFixture::store(),
        ExportSettings::default(),
        context(),
        Box::new(BrokenSink),
    );
    let records = ActivityFixture::activities();

    assert!(!pipeline.export_spreadsheet(&records, &FilterSpec::all(), ReportType::Activities, None));

    let err = pipeline
        .export_document(&records, &FilterSpec::all(), ReportType::Activities, Vec::new(), None)
        .unwrap_err();
    assert!(matches!(err, ExportError::Delivery { .. }));
}

#[test]
fn test_directory_sink_receives_file() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ExportPipeline::new(
        ActivityFixture::store(),
        ExportSettings::default(),
        context(),
        Box::new(DirectorySink::new(dir.path())),
    );
    let config = ReportConfig::new(ReportType::Statistics, FilterSpec::all(), OutputFormat::Spreadsheet);

    let name = pipeline.run_blocking(config).unwrap();
    let bytes = std::fs::read(dir.path().join(&name)).unwrap();
    assert_eq!(read_sheet(&bytes).height(), 11);
}

#[test]
fn test_out_of_range_rating_is_left_out() {
    let mut store = ActivityFixture::store();
    store.activities[0] = store.activities[0].clone().with_rating(9);
    let sink = MemorySink::default();
    let pipeline = ExportPipeline::new(store, ExportSettings::default(), context(), Box::new(sink.clone()));

    pipeline
        .run_blocking(ReportConfig::new(ReportType::Activities, FilterSpec::all(), OutputFormat::Spreadsheet))
        .unwrap();

    let range = read_sheet(&sink.delivered()[0].1);
    assert_eq!(range.height(), 10);
    assert!(!column(&range, 0).contains(&ActivityFixture::activities()[0].name));
}

// ============================================================================
// DOCUMENT
// ============================================================================

#[test]
fn test_empty_document_still_delivered() {
    let sink = MemorySink::default();
    let pipeline = ExportPipeline::new(
        InMemoryStore::default(),
        ExportSettings::default(),
        context(),
        Box::new(sink.clone()),
    );

    let name = pipeline
        .export_document(&[], &FilterSpec::all(), ReportType::Activities, Vec::new(), None)
        .unwrap();

    assert!(name.starts_with("informe_actividades_") && name.ends_with(".pdf"));
    assert!(sink.delivered()[0].1.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_one_failed_capture_still_completes_document() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone()).with_surface(Box::new(FakeSurface::failing_on(&["chart-rating"])));
    let config = ReportConfig::new(ReportType::Statistics, FilterSpec::all(), OutputFormat::Document);

    let name = pipeline.run(config).await.unwrap();

    assert!(name.starts_with("informe_estadisticas_"));
    let files = sink.delivered();
    assert_eq!(files.len(), 1);
    assert!(files[0].1.starts_with(b"%PDF"));
    assert_eq!(pdf_images(&files[0].1), 3);
}

#[tokio::test]
async fn test_empty_snapshot_leaves_slot_blank() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone()).with_surface(Box::new(FakeSurface::empty_on(&["chart-rating"])));
    let config = ReportConfig::new(ReportType::Statistics, FilterSpec::all(), OutputFormat::Document);

    pipeline.run(config).await.unwrap();

    let files = sink.delivered();
    assert_eq!(files.len(), 1);
    assert_eq!(pdf_images(&files[0].1), 3);
}

#[test]
fn test_grid_shows_only_captured_images() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone());
    let records = ActivityFixture::activities();
    let images = vec![Some(ChartImage::new(TINY_PNG.to_vec())), None];

    pipeline
        .export_document(&records, &FilterSpec::all(), ReportType::Statistics, images, None)
        .unwrap();

    assert_eq!(pdf_images(&sink.delivered()[0].1), 1);
}

#[tokio::test]
async fn test_no_matches_gives_one_page_without_charts() {
    for report_type in [ReportType::Statistics, ReportType::Complete] {
        let sink = MemorySink::default();
        let surface = std::sync::Arc::new(FakeSurface::working());
        let pipeline = pipeline(sink.clone()).with_surface(Box::new(SharedSurface(surface.clone())));
        let config = ReportConfig::new(report_type, no_network(), OutputFormat::Document);

        pipeline.run(config).await.unwrap();

        let bytes = &sink.delivered()[0].1;
        assert_eq!(pdf_pages(bytes), 1, "{:?}", report_type);
        assert_eq!(pdf_images(bytes), 0, "{:?}", report_type);
        assert!(surface.rendered.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_failed_capture_leaves_its_slot_blank() {
    let surface = FakeSurface::failing_on(&["chart-rating"]);
    let charts: Vec<_> = ChartKind::GRID.iter().map(|k| (*k, Vec::new())).collect();

    let images = capture_charts(&surface, &charts).await;

    assert_eq!(images.iter().filter(|i| i.is_some()).count(), 3);
    assert!(images[1].is_none());
}

#[tokio::test]
async fn test_complete_report_without_surface() {
    let sink = MemorySink::default();
    let pipeline = pipeline(sink.clone());
    let config = ReportConfig::new(ReportType::Complete, red_a(), OutputFormat::Document);

    let name = pipeline.run(config).await.unwrap();
    assert!(name.starts_with("informe_completo_"));
    assert_eq!(sink.delivered().len(), 1);
}

#[tokio::test]
async fn test_surface_renders_every_grid_chart() {
    let sink = MemorySink::default();
    let surface = std::sync::Arc::new(FakeSurface::working());
    let pipeline = pipeline(sink).with_surface(Box::new(SharedSurface(surface.clone())));
    let config = ReportConfig::new(ReportType::Complete, FilterSpec::all(), OutputFormat::Document);

    pipeline.run(config).await.unwrap();

    let rendered = surface.rendered.lock().unwrap();
    let ids: Vec<&str> = rendered.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["chart-participation", "chart-rating", "chart-network", "chart-department"]);
    // Two networks in the fixture
    assert_eq!(rendered[2].1, 2);
}

/// Lets a test keep a handle on the surface the pipeline owns.
struct SharedSurface(std::sync::Arc<FakeSurface>);

#[async_trait::async_trait]
impl app_lib::VisualizationSurface for SharedSurface {
    async fn render(
        &self,
        surface_id: &str,
        series: &[report_engine::SeriesPoint],
    ) -> Result<(), app_lib::CaptureError> {
        self.0.render(surface_id, series).await
    }

    async fn capture(&self, surface_id: &str) -> Result<persistence::ChartImage, app_lib::CaptureError> {
        self.0.capture(surface_id).await
    }
}

// ============================================================================
// STATISTICS OVER THE FIXTURE
// ============================================================================

#[test]
fn test_network_filter_gives_single_network_node() {
    let records = ActivityFixture::activities();
    let catalog = ActivityFixture::catalog();
    let resolver = Resolver::new(&catalog);

    let matched = filter(&records, &red_a());
    let tree = aggregate(&matched, &resolver);

    assert_eq!(matched.len(), 4);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].label, "Red Andaluza");
    assert_eq!(tree[0].total_actions, 4);
}

#[test]
fn test_ratings_average_and_histogram() {
    let records: Vec<Activity> = [5u8, 5, 4]
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Activity::new(format!("r{}", i), "Actividad", ActivityFixture::date(3, 1), ActivityFixture::date(3, 1))
                .with_classification("RED-A", "IES Norte", "2T")
                .with_rating(*r)
        })
        .collect();
    let catalog = ActivityFixture::catalog();
    let resolver = Resolver::new(&catalog);
    let refs: Vec<&Activity> = records.iter().collect();

    let tree = aggregate(&refs, &resolver);
    let average = tree[0].average_rating.unwrap();
    assert!((average - 14.0 / 3.0).abs() < 1e-9);

    let histogram: Vec<(String, u64)> = to_series(&refs, ChartDimension::Rating, &resolver)
        .into_iter()
        .map(|p| (p.name, p.value))
        .collect();
    assert_eq!(histogram, vec![(rating_label(5), 2), (rating_label(4), 1)]);
}

#[test]
fn test_zero_participants_still_counts_as_action() {
    let mut store = ActivityFixture::store();
    store.activities = vec![Activity::new("z", "Reunión", ActivityFixture::date(4, 2), ActivityFixture::date(4, 2))
        .with_classification("RED-B", "CIFP Este", "2T")
        .with_participants(0, 0)
        .with_rating(3)];
    let catalog = store.load_catalog();
    let resolver = Resolver::new(&catalog);
    let records = store.list_activities();
    let refs: Vec<&Activity> = records.iter().collect();

    let tree = aggregate(&refs, &resolver);
    assert_eq!(tree[0].total_actions, 1);
    assert_eq!(tree[0].total_students + tree[0].total_teachers, 0);
    assert!(to_series(&refs, ChartDimension::Participation, &resolver).is_empty());
}
