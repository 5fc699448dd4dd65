use crate::rewrite::RewriteEngine;
use colored::Colorize;

pub fn handle_rules_command(project_root: &std::path::Path) {
    let mut engine = RewriteEngine::with_builtin_rules();

    let user_rules = project_root.join(".typeguard/rules.yaml");
    let mut user_loaded = 0;
    if user_rules.exists() {
        match engine.load_from_yaml(&user_rules) {
            Ok(n) => user_loaded = n,
            Err(e) => println!("   ⚠️  Error al cargar rules.yaml: {}", e),
        }
    }

    println!(
        "\n{} {}",
        "Reglas de reescritura activas (en orden de aplicación):".bold(),
        format!("({})", engine.rule_count()).dimmed()
    );

    for rule in engine.rules() {
        let preview = rule.match_preview();
        let truncated = if preview.chars().count() > 44 {
            format!("{}…", preview.chars().take(44).collect::<String>())
        } else {
            preview
        };
        println!(
            "  {:<24} {:<10} {}  {} {}",
            rule.name.yellow(),
            format!("[{}]", rule.kind_label()),
            truncated,
            "→".dimmed(),
            rule.replace.dimmed()
        );
    }

    println!();
    println!(
        "   Info: el catch-all {} corre siempre al final; solo toca referencias",
        "NON_RELATIVE_REQUIRE".yellow()
    );
    println!("   a módulos que no empiezan con un marcador de ruta relativa ('.').");
    if user_loaded > 0 {
        println!(
            "   Info: {} regla(s) del usuario cargadas desde .typeguard/rules.yaml.",
            user_loaded
        );
    } else {
        println!("   Info: Para agregar reglas propias, crea .typeguard/rules.yaml:");
        println!("   rules:");
        println!("     - name: SPEEDLINE");
        println!("       kind: literal");
        println!("       match: \"require('speedline')\"");
        println!("       replace: \"function(arg) {{}}\"");
    }
}
