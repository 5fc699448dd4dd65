//! Orquestador del lote: resuelve el conjunto de fuentes, reescribe cada
//! archivo, monta el lote en staging e invoca el motor de chequeo una sola
//! vez. Sin reintentos: la corrida es todo-o-nada y termina con exactamente
//! un Outcome.

use crate::checker::{
    CheckBatch, CheckEngine, CheckReport, ClosureChecker, DiagnosticLevel, FailureKind, Outcome,
};
use crate::commands::OutputMode;
use crate::config::TypeguardConfig;
use crate::report;
use crate::rewrite::RewriteEngine;
use crate::sources::{GlobResolver, ResolvedSources, resolve_source_set};
use crate::stats::TypeguardStats;
use anyhow::Context;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Resultado de una corrida completa del pipeline.
pub struct CheckRun {
    pub outcome: Outcome,
    pub files_checked: usize,
}

pub fn handle_check(project_root: &Path, output_mode: OutputMode) {
    let inicio = Instant::now();

    if output_mode != OutputMode::Quiet {
        crate::ui::mostrar_banner();
    }

    let config = TypeguardConfig::load(project_root).unwrap_or_else(|| {
        if output_mode != OutputMode::Quiet {
            println!(
                "{} {}",
                "⚠️".yellow(),
                "No se encontró .typeguardrc.toml; usando la configuración por defecto.".yellow()
            );
            println!("   Ejecuta 'typeguard init' para generar una.");
        }
        TypeguardConfig::default()
    });

    // Los errores de configuración son previos al lote: salida 2, nunca 1.
    if let Err(e) = config.validate() {
        eprintln!("{} Configuración inválida: {}", "❌".red(), e);
        std::process::exit(2);
    }

    let engine = ClosureChecker::new();
    let run = run_check(project_root, &config, &engine, output_mode);

    let mut stats = TypeguardStats::cargar(project_root);
    stats.registrar_corrida(run.outcome.is_success(), inicio.elapsed().as_secs());
    stats.guardar(project_root);

    reportar(project_root, &config, &run, output_mode);

    // Salida 1 → CI marca la corrida como fallida
    if !run.outcome.is_success() {
        std::process::exit(1);
    }
}

/// Corre el pipeline y retorna exactamente un Outcome, pase lo que pase.
///
/// La evidencia se persiste acá: un fallo de cualquier clase sobrescribe el
/// log fijo; un éxito elimina el log de una corrida anterior.
pub fn run_check(
    project_root: &Path,
    config: &TypeguardConfig,
    engine: &dyn CheckEngine,
    output_mode: OutputMode,
) -> CheckRun {
    let (outcome, files_checked) = ejecutar_pipeline(project_root, config, engine, output_mode);

    let log_path = project_root.join(&config.error_log);
    match &outcome {
        Outcome::Success(_) => report::limpiar_evidencia(&log_path),
        Outcome::Failure { kind, report } => {
            if let Err(e) = report::escribir_evidencia(&log_path, *kind, report) {
                eprintln!("   ⚠️  No se pudo escribir la evidencia: {}", e);
            }
        }
    }

    CheckRun {
        outcome,
        files_checked,
    }
}

fn ejecutar_pipeline(
    project_root: &Path,
    config: &TypeguardConfig,
    engine: &dyn CheckEngine,
    output_mode: OutputMode,
) -> (Outcome, usize) {
    let resolver = GlobResolver::new(project_root);
    let resolved = resolve_source_set(
        &config.sources.inclusion,
        &config.sources.externs,
        &config.sources.exclusion,
        &resolver,
    );

    if resolved.is_empty() {
        return (Outcome::Success(CheckReport::default()), 0);
    }

    if output_mode == OutputMode::Verbose {
        println!("\n📂 Archivos del lote:");
        for file in resolved.iter() {
            let rel = file.strip_prefix(project_root).unwrap_or(file);
            println!("   {}", rel.display());
        }
    }

    let batch = match stage_batch(project_root, config, &resolved, output_mode) {
        Ok(batch) => batch,
        Err(e) => {
            return (
                Outcome::Failure {
                    kind: FailureKind::Infrastructure,
                    report: CheckReport::infrastructure(format!(
                        "No se pudo montar el lote reescrito: {:#}",
                        e
                    )),
                },
                resolved.len(),
            );
        }
    };

    // El archivo de reglas de conformance lo consume el motor de forma
    // opaca; si falta, el motor ni siquiera se invoca.
    let mut checker_config = config.checker.clone();
    if !checker_config.conformance_config.is_empty() {
        let conformance = project_root.join(&checker_config.conformance_config);
        if !conformance.exists() {
            return (
                Outcome::Failure {
                    kind: FailureKind::Infrastructure,
                    report: CheckReport::infrastructure(format!(
                        "No existe el archivo de reglas de conformance: {}",
                        conformance.display()
                    )),
                },
                resolved.len(),
            );
        }
        checker_config.conformance_config = conformance.display().to_string();
    }

    checker_config.warning_level = match output_mode {
        OutputMode::Quiet => "QUIET",
        OutputMode::Verbose => "VERBOSE",
    }
    .to_string();

    let spinner = (output_mode != OutputMode::Quiet).then(|| {
        let s = ProgressBar::new_spinner();
        s.set_message("⚡ Chequeando tipos (una sola invocación, sin resultados parciales)...");
        s.enable_steady_tick(Duration::from_millis(120));
        s
    });

    let outcome = engine.check(&batch, &checker_config);

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    (outcome, resolved.len())
}

/// Reescribe cada archivo del conjunto y lo escribe bajo el directorio de
/// staging, espejando su ruta relativa. Los originales no se tocan; los
/// números de línea del lote montado coinciden con los originales.
fn stage_batch(
    project_root: &Path,
    config: &TypeguardConfig,
    resolved: &ResolvedSources,
    output_mode: OutputMode,
) -> anyhow::Result<CheckBatch> {
    let staging_root = project_root.join(&config.staging_dir);
    if staging_root.exists() {
        fs::remove_dir_all(&staging_root)
            .with_context(|| format!("No se pudo limpiar {}", staging_root.display()))?;
    }
    fs::create_dir_all(&staging_root)?;

    let mut rewrite_engine = RewriteEngine::with_builtin_rules();
    let user_rules = project_root.join(".typeguard/rules.yaml");
    if user_rules.exists() {
        let cargadas = rewrite_engine.load_from_yaml(&user_rules)?;
        if output_mode == OutputMode::Verbose {
            println!("   ✅ {} regla(s) de reescritura del usuario cargadas.", cargadas);
        }
    }

    let progress = (output_mode == OutputMode::Verbose).then(|| {
        let pb = ProgressBar::new(resolved.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("   📝 Reescribiendo {pos}/{len} {bar:30.cyan}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    });

    let stage_one = |file: &PathBuf| -> anyhow::Result<PathBuf> {
        let contenido = fs::read_to_string(file)
            .with_context(|| format!("No se pudo leer {}", file.display()))?;
        let reescrito = rewrite_engine.rewrite(&contenido);

        let rel = file.strip_prefix(project_root).unwrap_or(file);
        let destino = staging_root.join(rel);
        if let Some(parent) = destino.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destino, reescrito)
            .with_context(|| format!("No se pudo escribir {}", destino.display()))?;

        if let Some(pb) = &progress {
            pb.inc(1);
        }
        Ok(destino)
    };

    let mut batch = CheckBatch::default();
    for file in &resolved.sources {
        batch.sources.push(stage_one(file)?);
    }
    // Los externs comparten las convenciones de autoría de las fuentes, así
    // que pasan por la misma reescritura.
    for file in &resolved.externs {
        batch.externs.push(stage_one(file)?);
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(batch)
}

fn reportar(
    project_root: &Path,
    config: &TypeguardConfig,
    run: &CheckRun,
    output_mode: OutputMode,
) {
    if run.files_checked == 0 {
        println!(
            "{} No se encontraron archivos para chequear con los patrones configurados.",
            "⚠️".yellow()
        );
        return;
    }

    let report = run.outcome.report();
    for diag in &report.diagnostics {
        // Las advertencias nunca fallan el lote y en modo quiet ni se listan
        if diag.level == DiagnosticLevel::Warning && output_mode == OutputMode::Quiet {
            continue;
        }
        println!("{}", report::render_diagnostico(diag));
    }

    if output_mode != OutputMode::Quiet {
        crate::ui::mostrar_resumen(report.error_count(), report.warning_count());
    }

    match &run.outcome {
        Outcome::Success(_) => {
            println!(
                "{}",
                format!(
                    "✅ Chequeo de tipos exitoso ({} archivo(s)).",
                    run.files_checked
                )
                .green()
            );
        }
        Outcome::Failure { kind, .. } => {
            let log_path = project_root.join(&config.error_log);
            println!(
                "{}",
                format!(
                    "❌ Chequeo fallido ({}). Revisa `{}` para el detalle.",
                    kind.describe(),
                    log_path.display()
                )
                .red()
            );
        }
    }
}
