//! Frontera con el motor externo de chequeo de tipos.
//!
//! El motor es un colaborador opaco: consume el lote reescrito más la
//! configuración y produce exactamente una señal terminal. Su representación
//! interna de diagnósticos no cruza esta frontera: en el punto de invocación
//! se traduce al modelo Outcome/CheckReport.

pub mod closure;
pub mod diagnostics;

pub use closure::ClosureChecker;
pub use diagnostics::{Diagnostic, DiagnosticLevel};

use crate::config::CheckerConfig;
use std::path::PathBuf;

/// Lote de archivos ya reescritos y montados en el directorio de staging.
#[derive(Debug, Clone, Default)]
pub struct CheckBatch {
    pub sources: Vec<PathBuf>,
    pub externs: Vec<PathBuf>,
}

/// Salida cruda del motor más los diagnósticos estructurados.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub raw_output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn infrastructure(detail: String) -> Self {
        Self {
            raw_output: detail,
            diagnostics: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        diagnostics::count_errors(&self.diagnostics)
    }

    pub fn warning_count(&self) -> usize {
        diagnostics::count_warnings(&self.diagnostics)
    }
}

/// Clase de fallo de un lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// El motor corrió y encontró diagnósticos de clase fatal.
    Diagnostics,
    /// El motor no pudo invocarse (comando ausente, conformance faltante).
    Infrastructure,
    /// El motor superó el límite de tiempo configurado.
    Timeout,
}

impl FailureKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FailureKind::Diagnostics => "diagnósticos fatales",
            FailureKind::Infrastructure => "fallo de infraestructura",
            FailureKind::Timeout => "tiempo agotado",
        }
    }
}

/// Resultado terminal de una invocación: exactamente uno por corrida,
/// nunca parcial.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(CheckReport),
    Failure {
        kind: FailureKind,
        report: CheckReport,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn report(&self) -> &CheckReport {
        match self {
            Outcome::Success(report) => report,
            Outcome::Failure { report, .. } => report,
        }
    }
}

/// Motor de chequeo: una invocación bloqueante, una señal terminal.
pub trait CheckEngine {
    fn check(&self, batch: &CheckBatch, config: &CheckerConfig) -> Outcome;
}

/// Arma la línea de flags del motor a partir de la configuración declarada.
pub fn build_checker_args(batch: &CheckBatch, config: &CheckerConfig) -> Vec<String> {
    let mut args = Vec::new();

    args.push("--compilation_level".to_string());
    args.push(config.compilation_level.clone());
    args.push("--module_resolution".to_string());
    args.push(config.module_resolution.clone());
    args.push("--language_in".to_string());
    args.push(config.language_in.clone());
    args.push("--language_out".to_string());
    args.push(config.language_out.clone());
    args.push("--warning_level".to_string());
    args.push(config.warning_level.clone());

    if config.process_common_js_modules {
        args.push("--process_common_js_modules".to_string());
    }
    if config.new_type_inference {
        args.push("--new_type_inf".to_string());
    }
    if config.checks_only {
        args.push("--checks_only".to_string());
    }

    if !config.hide_warnings_for.is_empty() {
        args.push("--hide_warnings_for".to_string());
        args.push(config.hide_warnings_for.clone());
    }
    if !config.conformance_config.is_empty() {
        args.push("--conformance_configs".to_string());
        args.push(config.conformance_config.clone());
    }

    for class in &config.jscomp_error {
        args.push("--jscomp_error".to_string());
        args.push(class.clone());
    }
    for class in &config.jscomp_warning {
        args.push("--jscomp_warning".to_string());
        args.push(class.clone());
    }
    for class in &config.jscomp_off {
        args.push("--jscomp_off".to_string());
        args.push(class.clone());
    }

    for extern_file in &batch.externs {
        args.push("--externs".to_string());
        args.push(extern_file.display().to_string());
    }
    for source in &batch.sources {
        args.push("--js".to_string());
        args.push(source.display().to_string());
    }

    args
}
