//! Invocación del compilador de chequeo externo como proceso hijo.
//!
//! Una corrida es una llamada bloqueante: se lanza el proceso, se espera una
//! única señal terminal y se traduce al modelo Outcome. No hay streaming de
//! resultados parciales ni reintentos. La espera está acotada por
//! `timeout_secs`; un motor colgado produce `Failure(Timeout)` en lugar de
//! colgar la corrida completa.

use super::{CheckBatch, CheckEngine, CheckReport, FailureKind, Outcome, build_checker_args};
use crate::checker::diagnostics::{self, DiagnosticLevel};
use crate::config::CheckerConfig;
use std::process::Stdio;
use std::time::Duration;

pub struct ClosureChecker;

impl ClosureChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClosureChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckEngine for ClosureChecker {
    fn check(&self, batch: &CheckBatch, config: &CheckerConfig) -> Outcome {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                return Outcome::Failure {
                    kind: FailureKind::Infrastructure,
                    report: CheckReport::infrastructure(format!(
                        "No se pudo crear el runtime para invocar el motor: {}",
                        e
                    )),
                };
            }
        };
        rt.block_on(run_engine(batch, config))
    }
}

async fn run_engine(batch: &CheckBatch, config: &CheckerConfig) -> Outcome {
    let flags = build_checker_args(batch, config);

    let mut command = tokio::process::Command::new(&config.command);
    command
        .args(&config.args)
        .args(&flags)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            return Outcome::Failure {
                kind: FailureKind::Infrastructure,
                report: CheckReport::infrastructure(format!(
                    "No se pudo invocar '{}': {}",
                    config.command, e
                )),
            };
        }
    };

    let limit = Duration::from_secs(config.timeout_secs);
    let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Outcome::Failure {
                kind: FailureKind::Infrastructure,
                report: CheckReport::infrastructure(format!(
                    "El motor terminó sin entregar salida: {}",
                    e
                )),
            };
        }
        // kill_on_drop mata el proceso colgado al descartar el future
        Err(_) => {
            return Outcome::Failure {
                kind: FailureKind::Timeout,
                report: CheckReport::infrastructure(format!(
                    "El motor superó el límite de {} segundos.",
                    config.timeout_secs
                )),
            };
        }
    };

    let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !raw.is_empty() {
            raw.push('\n');
        }
        raw.push_str(&stderr);
    }

    let parsed = diagnostics::parse_output(&raw);
    let has_fatal = parsed.iter().any(|d| d.level == DiagnosticLevel::Error);
    let report = CheckReport {
        raw_output: raw,
        diagnostics: parsed,
    };

    // Un fallo de parseo del lote también sale por acá: el motor retorna
    // estado no-cero aunque no haya diagnósticos con formato reconocible.
    if has_fatal || !output.status.success() {
        Outcome::Failure {
            kind: FailureKind::Diagnostics,
            report,
        }
    } else {
        Outcome::Success(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;

    fn config_with_command(command: &str, args: &[&str]) -> CheckerConfig {
        CheckerConfig {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 5,
            ..CheckerConfig::default()
        }
    }

    #[test]
    fn test_missing_command_is_infrastructure_failure() {
        let checker = ClosureChecker::new();
        let config = config_with_command("typeguard-no-such-binary-xyz", &[]);
        let outcome = checker.check(&CheckBatch::default(), &config);

        match outcome {
            Outcome::Failure { kind, report } => {
                assert_eq!(kind, FailureKind::Infrastructure);
                assert!(report.raw_output.contains("typeguard-no-such-binary-xyz"));
            }
            Outcome::Success(_) => panic!("un comando inexistente no puede dar éxito"),
        }
    }

    #[test]
    fn test_nonzero_exit_is_diagnostics_failure() {
        let checker = ClosureChecker::new();
        // `false` corre y termina con estado no-cero: el lote falló.
        let config = config_with_command("false", &[]);
        let outcome = checker.check(&CheckBatch::default(), &config);

        match outcome {
            Outcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::Diagnostics),
            Outcome::Success(_) => panic!("estado no-cero debe producir Failure"),
        }
    }

    #[test]
    fn test_clean_run_is_success() {
        let checker = ClosureChecker::new();
        let config = config_with_command("true", &[]);
        let outcome = checker.check(&CheckBatch::default(), &config);
        assert!(outcome.is_success());
    }

    #[test]
    fn test_hung_engine_times_out() {
        let checker = ClosureChecker::new();
        let config = CheckerConfig {
            command: "sleep".to_string(),
            args: vec!["30".to_string()],
            timeout_secs: 1,
            ..CheckerConfig::default()
        };
        let outcome = checker.check(&CheckBatch::default(), &config);

        match outcome {
            Outcome::Failure { kind, report } => {
                assert_eq!(kind, FailureKind::Timeout);
                assert!(report.raw_output.contains("1 segundo"));
            }
            Outcome::Success(_) => panic!("un motor colgado debe agotar el tiempo"),
        }
    }
}
