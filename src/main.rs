//! # Typeguard - Chequeo de tipos de mundo cerrado para CommonJS
//!
//! Prepara un árbol de fuentes CommonJS para un compilador de chequeo de
//! tipos que no entiende todos los idiomas de carga de módulos del árbol:
//! reescribe en memoria las expresiones `require` irresolubles, monta el lote
//! y orquesta una única invocación del motor con su veredicto para CI.

use clap::Parser;
use commands::{Cli, Commands};

// Módulos
pub mod checker;
pub mod commands;
pub mod config;
pub mod report;
pub mod rewrite;
pub mod sources;
pub mod stats;
pub mod ui;

fn main() {
    let cli = Cli::parse();

    let project_root = config::TypeguardConfig::find_project_root()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| ".".into()));

    match cli.command {
        Some(Commands::Check { quiet, verbose }) => {
            commands::check::handle_check(&project_root, commands::get_output_mode(quiet, verbose));
        }
        Some(Commands::Rewrite { file }) => {
            commands::rewrite::handle_rewrite(&project_root, &file);
        }
        Some(Commands::Rules) => {
            commands::rules::handle_rules_command(&project_root);
        }
        Some(Commands::Init { force }) => {
            commands::init::handle_init_command(&project_root, force);
        }
        Some(Commands::Doctor) => {
            commands::doctor::handle_doctor_command(&project_root);
        }
        None => {
            // Comportamiento por defecto: el pipeline completo
            commands::check::handle_check(&project_root, commands::get_output_mode(false, false));
        }
    }
}
