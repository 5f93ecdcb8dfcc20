//! FILENAME: tests/common/mod.rs
//! Fixtures for export pipeline integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use activity_model::{
    Activity, Catalog, Department, InMemoryStore, Network, Objective, Priority, ProfessionalFamily, Quarter,
};
use app_lib::{CaptureError, DownloadSink, ExportPipeline, ExportSettings, ReportContext, Role, VisualizationSurface};
use async_trait::async_trait;
use chrono::NaiveDate;
use persistence::ChartImage;
use report_engine::SeriesPoint;

/// A valid 2x2 RGB PNG.
pub const TINY_PNG: [u8; 73] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00,
    0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x08, 0x02, 0x00, 0x00, 0x00, 0xFD, 0xD4, 0x9A, 0x73, 0x00, 0x00, 0x00,
    0x10, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x38, 0x21, 0x27, 0x07, 0x44, 0x0C, 0x10, 0x0A, 0x00, 0x1F,
    0x26, 0x04, 0x11, 0xA2, 0x8F, 0x22, 0xAF, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60,
    0x82,
];

// ============================================================================
// PDF INSPECTION
// ============================================================================

fn occurrences(bytes: &[u8], needle: &[u8]) -> usize {
    bytes.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Embedded image objects in a PDF.
pub fn pdf_images(bytes: &[u8]) -> usize {
    occurrences(bytes, b"/Subtype/Image")
}

/// Page objects in a PDF (the page tree node is not counted).
pub fn pdf_pages(bytes: &[u8]) -> usize {
    occurrences(bytes, b"/Type/Page") - occurrences(bytes, b"/Type/Pages")
}

// ============================================================================
// ACTIVITY FIXTURE
// ============================================================================

/// Ten activities over two networks; four belong to RED-A.
pub struct ActivityFixture;

impl ActivityFixture {
    pub fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    pub fn catalog() -> Catalog {
        Catalog {
            networks: vec![
                Network { code: "RED-A".to_string(), name: "Red Andaluza".to_string() },
                Network { code: "RED-B".to_string(), name: "Red Bética".to_string() },
            ],
            departments: vec![
                Department { code: "INF".to_string(), name: "Informática".to_string() },
                Department { code: "ADM".to_string(), name: "Administración".to_string() },
            ],
            families: vec![ProfessionalFamily { code: "IFC".to_string(), name: "Informática y Comunicaciones".to_string() }],
            quarters: vec![
                Quarter { id: "1T".to_string(), name: "Primer trimestre".to_string() },
                Quarter { id: "2T".to_string(), name: "Segundo trimestre".to_string() },
            ],
            objectives: vec![Objective {
                id: "o1".to_string(),
                name: "Empleabilidad".to_string(),
                priority: Priority::High,
                is_active: true,
            }],
            ..Catalog::default()
        }
    }

    pub fn activities() -> Vec<Activity> {
        let rows = [
            ("a1", "Taller de robótica", "RED-A", "IES Norte", "1T", "INF", 25, 2, 5),
            ("a2", "Visita a empresa", "RED-A", "IES Norte", "1T", "ADM", 30, 3, 4),
            ("a3", "Feria de empleo", "RED-A", "IES Sur", "2T", "INF", 40, 4, 5),
            ("a4", "Charla de ciberseguridad", "RED-A", "IES Sur", "2T", "INF", 20, 1, 3),
            ("a5", "Hackathon", "RED-B", "CIFP Este", "1T", "INF", 50, 5, 5),
            ("a6", "Jornada de puertas abiertas", "RED-B", "CIFP Este", "1T", "ADM", 60, 6, 4),
            ("a7", "Curso de ofimática", "RED-B", "CIFP Oeste", "2T", "ADM", 15, 1, 2),
            ("a8", "Mentoría", "RED-B", "CIFP Oeste", "2T", "INF", 10, 2, 4),
            ("a9", "Simulacro de entrevista", "RED-B", "CIFP Este", "2T", "ADM", 18, 2, 3),
            ("a10", "Concurso de programación", "RED-B", "CIFP Oeste", "1T", "INF", 35, 3, 5),
        ];

        rows.iter()
            .enumerate()
            .map(|(i, (id, name, network, center, quarter, dept, students, teachers, rating))| {
                let start = Self::date(1 + (i as u32 % 6), 10);
                Activity::new(*id, *name, start, start)
                    .with_classification(*network, *center, *quarter)
                    .with_departments([*dept])
                    .with_families(["IFC"])
                    .with_objectives(["o1"])
                    .with_participants(*students, *teachers)
                    .with_rating(*rating)
            })
            .collect()
    }

    pub fn store() -> InMemoryStore {
        InMemoryStore::new(Self::activities(), Self::catalog())
    }
}

pub fn context() -> ReportContext {
    ReportContext::new("Ana Ruiz", "ana@centro.es", Role::Admin).with_course("2024-2025")
}

// ============================================================================
// FAKE SURFACE
// ============================================================================

/// Returns TINY_PNG for every capture except the listed surfaces.
pub struct FakeSurface {
    pub failing: Vec<&'static str>,
    /// Surfaces whose snapshot comes back as zero bytes.
    pub empty: Vec<&'static str>,
    pub rendered: Mutex<Vec<(String, usize)>>,
}

impl FakeSurface {
    pub fn working() -> Self {
        FakeSurface { failing: Vec::new(), empty: Vec::new(), rendered: Mutex::new(Vec::new()) }
    }

    pub fn failing_on(surfaces: &[&'static str]) -> Self {
        FakeSurface { failing: surfaces.to_vec(), ..FakeSurface::working() }
    }

    pub fn empty_on(surfaces: &[&'static str]) -> Self {
        FakeSurface { empty: surfaces.to_vec(), ..FakeSurface::working() }
    }
}

#[async_trait]
impl VisualizationSurface for FakeSurface {
    async fn render(&self, surface_id: &str, series: &[SeriesPoint]) -> Result<(), CaptureError> {
        self.rendered.lock().unwrap().push((surface_id.to_string(), series.len()));
        Ok(())
    }

    async fn capture(&self, surface_id: &str) -> Result<ChartImage, CaptureError> {
        if self.failing.contains(&surface_id) {
            return Err(CaptureError::Failed { surface: surface_id.to_string(), reason: "canvas lost".to_string() });
        }
        if self.empty.contains(&surface_id) {
            return Ok(ChartImage::new(Vec::new()));
        }
        Ok(ChartImage::new(TINY_PNG.to_vec()))
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Keeps delivered files in memory; clones share the same storage.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn delivered(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.files.lock().unwrap().push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Rejects every delivery.
pub struct BrokenSink;

impl DownloadSink for BrokenSink {
    fn deliver(&self, _filename: &str, _bytes: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
    }
}

/// A pipeline over the fixture store delivering into `sink`.
pub fn pipeline(sink: MemorySink) -> ExportPipeline<InMemoryStore> {
    ExportPipeline::new(ActivityFixture::store(), ExportSettings::default(), context(), Box::new(sink))
}
