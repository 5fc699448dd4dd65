//! Parseo de la salida de diagnóstico del motor externo.
//!
//! El motor reporta líneas con el formato
//! `archivo:línea: SEVERIDAD - mensaje`, más líneas de contexto (la línea
//! fuente y un caret) que aquí se ignoran. El resumen final
//! `N error(s), M warning(s)` tampoco se parsea: las cuentas salen de los
//! diagnósticos estructurados.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severidad de un diagnóstico reportado por el motor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Serialize, Debug, Clone)]
pub struct Diagnostic {
    pub file: String,
    pub line: Option<usize>,
    pub level: DiagnosticLevel,
    pub message: String,
}

static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<file>[^\s:]+):(?P<line>\d+):\s+(?P<level>ERROR|WARNING)\s+-\s+(?P<msg>.+)$")
        .expect("patrón de diagnóstico inválido")
});

/// Extrae los diagnósticos estructurados de la salida cruda del motor.
/// Las líneas que no siguen el formato se conservan solo en la evidencia.
pub fn parse_output(raw: &str) -> Vec<Diagnostic> {
    DIAGNOSTIC_LINE
        .captures_iter(raw)
        .map(|caps| Diagnostic {
            file: caps["file"].to_string(),
            line: caps["line"].parse().ok(),
            level: if &caps["level"] == "ERROR" {
                DiagnosticLevel::Error
            } else {
                DiagnosticLevel::Warning
            },
            message: caps["msg"].to_string(),
        })
        .collect()
}

pub fn count_errors(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Error)
        .count()
}

pub fn count_warnings(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Warning)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
lib/icons.js:45: ERROR - [JSC_TYPE_MISMATCH] actual parameter 1 of parse does not match formal parameter
    const color = parse(value);
                        ^

lib/emulation.js:12: WARNING - [JSC_UNUSED_LOCAL] variable viewport is never used
aggregator/index.js:3: ERROR - [JSC_UNDEFINED_NAME] Aggregate is not defined

2 error(s), 1 warning(s), 0 filtered warning(s)
";

    #[test]
    fn test_parse_structured_diagnostics() {
        let diags = parse_output(SAMPLE);
        assert_eq!(diags.len(), 3);

        assert_eq!(diags[0].file, "lib/icons.js");
        assert_eq!(diags[0].line, Some(45));
        assert_eq!(diags[0].level, DiagnosticLevel::Error);
        assert!(diags[0].message.contains("JSC_TYPE_MISMATCH"));

        assert_eq!(diags[1].level, DiagnosticLevel::Warning);
        assert_eq!(diags[2].file, "aggregator/index.js");
    }

    #[test]
    fn test_counts_by_level() {
        let diags = parse_output(SAMPLE);
        assert_eq!(count_errors(&diags), 2);
        assert_eq!(count_warnings(&diags), 1);
    }

    #[test]
    fn test_caret_and_summary_lines_ignored() {
        let diags = parse_output(SAMPLE);
        assert!(
            diags.iter().all(|d| !d.message.contains("filtered")),
            "el resumen final no es un diagnóstico"
        );
    }

    #[test]
    fn test_empty_output_yields_no_diagnostics() {
        assert!(parse_output("").is_empty());
        assert!(parse_output("0 error(s), 0 warning(s)\n").is_empty());
    }
}
