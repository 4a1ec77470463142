//! Environment diagnostics
//!
//! Reports which search engine will actually run: whether an rg binary is
//! reachable, where it came from, and the fallback status.

use serde::Serialize;

use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::search::rg::{locate_rg, RgSource, RG_PATH_ENV};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    pub rg_available: bool,
    pub rg_path: Option<String>,
    pub rg_source: Option<String>,
    pub active_engine: &'static str,
}

pub fn report() -> DoctorReport {
    // All fields come from the one discovery the search path itself runs,
    // so the report cannot contradict what an actual search would do.
    match locate_rg() {
        Some((path, source)) => DoctorReport {
            rg_available: true,
            rg_path: Some(path.display().to_string()),
            rg_source: Some(match source {
                RgSource::EnvOverride => format!("env:{}", RG_PATH_ENV),
                RgSource::PathLookup => "path".to_string(),
            }),
            active_engine: "rg",
        },
        None => DoctorReport {
            rg_available: false,
            rg_path: None,
            rg_source: None,
            active_engine: "built-in",
        },
    }
}

pub fn render(report: &DoctorReport, config: RenderConfig) -> String {
    match config.format {
        OutputFormat::Jsonl | OutputFormat::Json => {
            let renderer = Renderer::with_config(config);
            renderer.render_report(report)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!(
                "rg: {}\n",
                match &report.rg_path {
                    Some(path) => format!("found ({})", path),
                    None => "not found".to_string(),
                }
            ));
            if let Some(source) = &report.rg_source {
                out.push_str(&format!("rg source: {}\n", source));
            }
            out.push_str(&format!("active engine: {}", report.active_engine));
            out
        }
    }
}
