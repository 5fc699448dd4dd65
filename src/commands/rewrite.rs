//! Vista previa de la reescritura de un archivo, sin chequearlo.
//!
//! Imprime a stdout el texto que el motor de chequeo recibiría. Útil para
//! depurar por qué una regla (no) aplica.

use crate::rewrite::RewriteEngine;
use colored::*;
use std::path::Path;

pub fn handle_rewrite(project_root: &Path, file: &str) {
    let path = project_root.join(file);
    if !path.is_file() {
        eprintln!("{} El archivo '{}' no existe en el proyecto.", "❌".red(), file);
        std::process::exit(2);
    }

    let contenido = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} No se pudo leer '{}': {}", "❌".red(), file, e);
            std::process::exit(1);
        }
    };

    let mut engine = RewriteEngine::with_builtin_rules();
    let user_rules = project_root.join(".typeguard/rules.yaml");
    if user_rules.exists() {
        if let Err(e) = engine.load_from_yaml(&user_rules) {
            eprintln!("   ⚠️  Error al cargar rules.yaml: {}", e);
        }
    }

    print!("{}", engine.rewrite(&contenido));
}
