use crate::config::TypeguardConfig;
use colored::*;
use std::path::Path;

/// Runs `typeguard init` in `project_root`.
/// Returns Err if config already exists and force == false.
pub fn run_init(project_root: &Path, force: bool) -> anyhow::Result<()> {
    let config_path = project_root.join(".typeguardrc.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Ya existe una configuración en {}. Usa --force para sobrescribir.",
            config_path.display()
        );
    }

    let mut config = TypeguardConfig::default();
    config.project_name = project_root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("js-project")
        .to_string();

    config.save(project_root)?;
    Ok(())
}

pub fn handle_init_command(project_root: &Path, force: bool) {
    println!("\n{}", "🚀 Typeguard Init".bold().green());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match run_init(project_root, force) {
        Ok(()) => {
            let config_path = project_root.join(".typeguardrc.toml");
            println!(
                "   ✅ Configuración creada en: {}",
                config_path.display().to_string().cyan()
            );
            println!("\n   {} Próximos pasos:", "💡".yellow());
            println!("      Ajusta [sources] a los archivos de tu proyecto");
            println!("      typeguard rules            # reglas de reescritura activas");
            println!("      typeguard check            # reescritura + chequeo de tipos");
        }
        Err(e) => {
            eprintln!("   ❌ {}", e);
            eprintln!("   💡 Usa --force para sobrescribir la configuración existente.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config_file() {
        let tmp = TempDir::new().unwrap();
        run_init(tmp.path(), false).unwrap();
        let config_path = tmp.path().join(".typeguardrc.toml");
        assert!(config_path.exists(), "init should create .typeguardrc.toml");
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("inclusion"), "config must contain the source set");
        assert!(content.contains("jscomp_error"), "config must contain severity buckets");
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".typeguardrc.toml");
        std::fs::write(&config_path, "existing = true").unwrap();

        let result = run_init(tmp.path(), false);
        assert!(result.is_err(), "init without force should fail if config exists");
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "existing = true", "content must be unchanged");
    }

    #[test]
    fn test_init_with_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".typeguardrc.toml");
        std::fs::write(&config_path, "old = true").unwrap();

        run_init(tmp.path(), true).unwrap();
        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("inclusion"), "force should overwrite with new config");
    }

    #[test]
    fn test_init_uses_directory_name_as_project_name() {
        let tmp = TempDir::new().unwrap();
        let proyecto = tmp.path().join("mi-proyecto-js");
        std::fs::create_dir_all(&proyecto).unwrap();

        run_init(&proyecto, false).unwrap();
        let loaded = TypeguardConfig::load(&proyecto).unwrap();
        assert_eq!(loaded.project_name, "mi-proyecto-js");
    }
}
