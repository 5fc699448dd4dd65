use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// Check if the config file (.typeguardrc.toml) exists, loads and validates
pub fn check_config(project_root: &Path) -> anyhow::Result<crate::config::TypeguardConfig> {
    let config_path = project_root.join(".typeguardrc.toml");

    if !config_path.exists() {
        anyhow::bail!(".typeguardrc.toml not found at {}", config_path.display());
    }

    let config = crate::config::TypeguardConfig::load(project_root)
        .ok_or_else(|| anyhow::anyhow!("Failed to load .typeguardrc.toml"))?;
    config.validate()?;
    Ok(config)
}

/// Check if the external checking engine can be spawned at all
pub fn check_engine_command(config: &crate::config::TypeguardConfig) -> bool {
    Command::new(&config.checker.command)
        .args(&config.checker.args)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Check if the conformance rules file referenced by the config exists
pub fn check_conformance(project_root: &Path, config: &crate::config::TypeguardConfig) -> bool {
    if config.checker.conformance_config.is_empty() {
        return true;
    }
    project_root.join(&config.checker.conformance_config).exists()
}

/// Main handler for the doctor command with colored output
pub fn handle_doctor_command(project_root: &Path) {
    println!("\n{}", "🏥 Typeguard Doctor".bold().cyan());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut issues = 0;

    // Check 1: Config file
    print!("   ");
    let config = match check_config(project_root) {
        Ok(config) => {
            println!("{} Config file", "✅".green());
            println!("      └─ {}", config.project_name.cyan());
            Some(config)
        }
        Err(e) => {
            println!("{} Config file", "❌".red());
            println!("      └─ Error: {}", e.to_string().red());
            issues += 1;
            None
        }
    };

    let config = config.unwrap_or_default();

    // Check 2: Checking engine
    print!("   ");
    if check_engine_command(&config) {
        println!("{} Checking engine ({})", "✅".green(), config.checker.command);
    } else {
        println!("{} Checking engine ({})", "❌".red(), config.checker.command);
        println!(
            "      └─ {}",
            "The engine command did not answer --version; a check run would fail".red()
        );
        issues += 1;
    }

    // Check 3: Conformance rules file
    print!("   ");
    if check_conformance(project_root, &config) {
        println!("{} Conformance rules", "✅".green());
    } else {
        println!("{} Conformance rules", "❌".red());
        println!(
            "      └─ {} {}",
            "Missing:".red(),
            config.checker.conformance_config.red()
        );
        issues += 1;
    }

    // Check 4: Stale evidence log from a previous failing run
    print!("   ");
    let log_path = project_root.join(&config.error_log);
    if log_path.exists() {
        println!("{} Evidence log present", "⚠️ ".yellow());
        println!(
            "      └─ {} {}",
            "Last run failed; see".yellow(),
            log_path.display().to_string().yellow()
        );
    } else {
        println!("{} No stale evidence log", "✅".green());
    }

    // Summary
    println!();
    if issues == 0 {
        println!("{}", "✅ All critical checks passed!".green().bold());
    } else if issues == 1 {
        println!("{}", format!("⚠️  {} critical issue found", issues).yellow().bold());
    } else {
        println!("{}", format!("⚠️  {} critical issues found", issues).yellow().bold());
    }

    println!();

    // Exit with error code if issues > 0
    if issues > 0 {
        std::process::exit(1);
    }
}
