pub mod check;
pub mod doctor;
pub mod init;
pub mod rewrite;
pub mod rules;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "typeguard")]
#[command(about = "Prepara fuentes CommonJS y orquesta su chequeo de tipos de mundo cerrado", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Corre el pipeline completo: reescritura + chequeo de tipos
    Check {
        /// Salida resumida (se activa sola si la variable CI está definida)
        #[arg(long)]
        quiet: bool,
        /// Salida detallada: lista de archivos y advertencias
        #[arg(long)]
        verbose: bool,
    },
    /// Muestra la reescritura de un archivo sin chequearlo
    Rewrite {
        /// Archivo a reescribir (relativo a la raíz del proyecto)
        file: String,
    },
    /// Lista las reglas de reescritura activas
    Rules,
    /// Genera una configuración por defecto (.typeguardrc.toml)
    Init {
        /// Sobrescribe una configuración existente
        #[arg(long)]
        force: bool,
    },
    /// Diagnóstico del entorno (configuración, motor, conformance)
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Verbose,
}

/// QUIET en CI salvo pedido explícito de --verbose; VERBOSE en corridas
/// interactivas. Espeja la política de verbosidad del entorno.
pub fn get_output_mode(quiet: bool, verbose: bool) -> OutputMode {
    if verbose {
        return OutputMode::Verbose;
    }
    if quiet || std::env::var("CI").is_ok() {
        OutputMode::Quiet
    } else {
        OutputMode::Verbose
    }
}
