//! Módulo de interfaz de usuario
//!
//! Funciones relacionadas con la presentación en la terminal.

use colored::*;

/// Muestra el banner ASCII art de Typeguard al inicio del programa
pub fn mostrar_banner() {
    println!();
    println!(
        "{}",
        "╔═══════════════════════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        r"
   ████████╗██╗   ██╗██████╗ ███████╗ ██████╗ ██╗   ██╗ █████╗ ██████╗ ██████╗
   ╚══██╔══╝╚██╗ ██╔╝██╔══██╗██╔════╝██╔════╝ ██║   ██║██╔══██╗██╔══██╗██╔══██╗
      ██║    ╚████╔╝ ██████╔╝█████╗  ██║  ███╗██║   ██║███████║██████╔╝██║  ██║
      ██║     ╚██╔╝  ██╔═══╝ ██╔══╝  ██║   ██║██║   ██║██╔══██║██╔══██╗██║  ██║
      ██║      ██║   ██║     ███████╗╚██████╔╝╚██████╔╝██║  ██║██║  ██║██████╔╝
      ╚═╝      ╚═╝   ╚═╝     ╚══════╝ ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝
"
        .bright_cyan()
        .bold()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════════════════╝".bright_cyan()
    );
    println!();
    println!(
        "{}",
        "        🛡️  Typeguard: Chequeo de tipos de mundo cerrado  🛡️"
            .bright_white()
            .bold()
    );
    println!(
        "{}",
        "        ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan()
    );
}

/// Resumen final de una corrida: cuentas por severidad.
pub fn mostrar_resumen(errores: usize, advertencias: usize) {
    if errores == 0 && advertencias == 0 {
        println!("\n{}", "✅ Sin diagnósticos reportados.".green());
    } else {
        println!(
            "\n🚩 {} error(es)  ⚠️  {} advertencia(s)",
            errores.to_string().red().bold(),
            advertencias.to_string().yellow()
        );
    }
}
