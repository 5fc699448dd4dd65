//! Evidencia durable y render de diagnósticos.
//!
//! Una corrida fallida siempre deja la evidencia completa en un log de ruta
//! fija y conocida, sobrescribiendo el de la corrida anterior. Una corrida
//! exitosa elimina el log viejo para que no quede evidencia engañosa.

use crate::checker::{CheckReport, Diagnostic, DiagnosticLevel, FailureKind};
use anyhow::Context;
use chrono::Local;
use colored::*;
use std::fs;
use std::path::Path;

/// Escribe la evidencia completa del fallo en el log fijo (sobrescribe).
pub fn escribir_evidencia(
    log_path: &Path,
    kind: FailureKind,
    report: &CheckReport,
) -> anyhow::Result<()> {
    let encabezado = format!(
        "# typeguard — evidencia de fallo\n# Fecha: {}\n# Clase: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        kind.describe(),
    );
    let cuerpo = if report.raw_output.is_empty() {
        "(el motor no produjo salida)\n".to_string()
    } else {
        report.raw_output.clone()
    };
    fs::write(log_path, format!("{}{}", encabezado, cuerpo))
        .with_context(|| format!("No se pudo escribir la evidencia en {}", log_path.display()))
}

/// Elimina un log de evidencia obsoleto de una corrida anterior exitosa.
pub fn limpiar_evidencia(log_path: &Path) {
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }
}

/// Línea coloreada para un diagnóstico, al estilo de la consola.
pub fn render_diagnostico(diag: &Diagnostic) -> String {
    let (icon, color) = match diag.level {
        DiagnosticLevel::Error => ("❌ ERROR", "red"),
        DiagnosticLevel::Warning => ("⚠️  WARN ", "yellow"),
    };
    let line_info = diag.line.map(|l| format!(":{}", l)).unwrap_or_default();
    format!(
        "   {} [{}{}]: {}",
        icon.color(color),
        diag.file.yellow(),
        line_info,
        diag.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckReport;
    use tempfile::TempDir;

    #[test]
    fn test_evidencia_se_escribe_y_no_queda_vacia() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("typeguard-error.log");
        let report = CheckReport {
            raw_output: "lib/icons.js:45: ERROR - type mismatch\n1 error(s)".to_string(),
            diagnostics: Vec::new(),
        };

        escribir_evidencia(&log, FailureKind::Diagnostics, &report).unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(!content.is_empty(), "la evidencia no puede quedar vacía");
        assert!(content.contains("type mismatch"));
        assert!(content.contains("diagnósticos fatales"));
    }

    #[test]
    fn test_evidencia_sobrescribe_corrida_anterior() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("typeguard-error.log");
        std::fs::write(&log, "evidencia vieja").unwrap();

        let report = CheckReport {
            raw_output: "evidencia nueva".to_string(),
            diagnostics: Vec::new(),
        };
        escribir_evidencia(&log, FailureKind::Infrastructure, &report).unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("evidencia nueva"));
        assert!(!content.contains("evidencia vieja"));
    }

    #[test]
    fn test_limpiar_evidencia_borra_log_obsoleto() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("typeguard-error.log");
        std::fs::write(&log, "obsoleto").unwrap();

        limpiar_evidencia(&log);
        assert!(!log.exists(), "el log obsoleto debe eliminarse tras el éxito");

        // Sin log presente es un no-op
        limpiar_evidencia(&log);
    }

    #[test]
    fn test_render_incluye_archivo_y_linea() {
        let diag = Diagnostic {
            file: "lib/emulation.js".to_string(),
            line: Some(12),
            level: DiagnosticLevel::Warning,
            message: "variable sin uso".to_string(),
        };
        let rendered = render_diagnostico(&diag);
        assert!(rendered.contains("lib/emulation.js"));
        assert!(rendered.contains(":12"));
        assert!(rendered.contains("variable sin uso"));
    }
}
