use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Versión actual de Typeguard (leída desde Cargo.toml en tiempo de compilación)
pub const TYPEGUARD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Conjunto de fuentes: tres listas ordenadas de patrones de ruta.
///
/// La lista final de archivos es `(inclusion ∪ externs) \ exclusion`,
/// preservando orden y sin duplicados.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SourceSetConfig {
    pub inclusion: Vec<String>,
    pub externs: Vec<String>,
    pub exclusion: Vec<String>,
}

impl Default for SourceSetConfig {
    fn default() -> Self {
        Self {
            inclusion: vec![
                "lib/event-helpers.js".to_string(),
                "lib/icons.js".to_string(),
                "lib/styles-helpers.js".to_string(),
                "lib/url-shim.js".to_string(),
                "aggregator/**/*.js".to_string(),
                "report/formatter.js".to_string(),
                "lib/traces/tracing-processor.js".to_string(),
                "lib/emulation.js".to_string(),
            ],
            externs: vec![
                "closure/typedefs/*.js".to_string(),
                "closure/third_party/*.js".to_string(),
            ],
            exclusion: vec!["audits/byte-efficiency/unused-css-rules.js".to_string()],
        }
    }
}

/// Configuración declarada del motor de chequeo.
///
/// Registro inmutable durante la corrida: dialecto de entrada y salida, nivel
/// de compilación, resolución de módulos, modo solo-chequeo y los tres
/// baldes de severidad por clase de diagnóstico.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CheckerConfig {
    pub command: String,
    pub args: Vec<String>,
    pub language_in: String,
    pub language_out: String,
    pub compilation_level: String,
    pub module_resolution: String,
    pub process_common_js_modules: bool,
    pub new_type_inference: bool,
    pub checks_only: bool,
    /// VERBOSE o QUIET; en CI la corrida fuerza QUIET.
    pub warning_level: String,
    pub hide_warnings_for: String,
    pub conformance_config: String,
    pub timeout_secs: u64,
    /// Clases cuya violación aborta el lote con fallo.
    pub jscomp_error: Vec<String>,
    /// Clases reportadas pero nunca fatales por sí solas.
    pub jscomp_warning: Vec<String>,
    /// Clases silenciadas explícitamente.
    pub jscomp_off: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            command: "npx".to_string(),
            args: vec!["google-closure-compiler".to_string()],
            language_in: "ECMASCRIPT6_STRICT".to_string(),
            language_out: "ECMASCRIPT5_STRICT".to_string(),
            compilation_level: "SIMPLE".to_string(),
            module_resolution: "NODE".to_string(),
            process_common_js_modules: true,
            new_type_inference: true,
            checks_only: true,
            warning_level: "VERBOSE".to_string(),
            hide_warnings_for: "synthetic".to_string(),
            conformance_config: "closure/conformance_config.textproto".to_string(),
            timeout_secs: 300,
            jscomp_error: vec![
                "checkTypes".to_string(),
                "conformanceViolations".to_string(),
            ],
            jscomp_warning: vec![
                "accessControls".to_string(),
                "checkRegExp".to_string(),
                "const".to_string(),
                "missingProperties".to_string(),
                "missingReturn".to_string(),
                "newCheckTypes".to_string(),
                "strictModuleDepCheck".to_string(),
                "typeInvalidation".to_string(),
                "undefinedNames".to_string(),
                "visibility".to_string(),
                "missingProvide".to_string(),
                "checkDebuggerStatement".to_string(),
                "externsValidation".to_string(),
                "uselessCode".to_string(),
                "ambiguousFunctionDecl".to_string(),
                "es3".to_string(),
                "es5Strict".to_string(),
                "globalThis".to_string(),
                "nonStandardJsDocs".to_string(),
                "strictMissingRequire".to_string(),
                "suspiciousCode".to_string(),
                "unknownDefines".to_string(),
            ],
            jscomp_off: vec!["newCheckTypesExtraChecks".to_string()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TypeguardConfig {
    pub version: String,
    pub project_name: String,
    /// Log de evidencia de fallo, sobrescrito en cada corrida fallida.
    pub error_log: String,
    /// Directorio donde se monta el lote reescrito antes de invocar el motor.
    pub staging_dir: String,
    pub sources: SourceSetConfig,
    pub checker: CheckerConfig,
}

impl Default for TypeguardConfig {
    fn default() -> Self {
        Self {
            version: TYPEGUARD_VERSION.to_string(),
            project_name: "js-project".to_string(),
            error_log: "typeguard-error.log".to_string(),
            staging_dir: ".typeguard/staging".to_string(),
            sources: SourceSetConfig::default(),
            checker: CheckerConfig::default(),
        }
    }
}

impl TypeguardConfig {
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml = toml::to_string_pretty(self)?;
        fs::write(path.join(".typeguardrc.toml"), toml)?;
        Ok(())
    }

    /// Carga la configuración desde `.typeguardrc.toml`.
    ///
    /// Tolerante con campos faltantes (usa valores por defecto). Si la
    /// versión guardada no coincide con la del binario, se actualiza y se
    /// vuelve a guardar.
    pub fn load(path: &Path) -> Option<Self> {
        let config_path = path.join(".typeguardrc.toml");
        let content = fs::read_to_string(&config_path).ok()?;

        match toml::from_str::<TypeguardConfig>(&content) {
            Ok(mut config) => {
                if config.version != TYPEGUARD_VERSION {
                    println!(
                        "{}",
                        format!(
                            "   🔄 Actualizando configuración de versión {} a {}...",
                            config.version, TYPEGUARD_VERSION
                        )
                        .yellow()
                    );
                    config.version = TYPEGUARD_VERSION.to_string();
                    let _ = config.save(path);
                }
                Some(config)
            }
            Err(_) => {
                println!(
                    "{}",
                    "   ⚠️  No se pudo cargar la configuración. Se usarán valores por defecto."
                        .yellow()
                );
                None
            }
        }
    }

    /// Valida los invariantes de la configuración antes de cualquier trabajo.
    ///
    /// Una clase de diagnóstico puede vivir en un solo balde de severidad;
    /// una clase repetida es un error de configuración, no un fallo del lote.
    pub fn validate(&self) -> anyhow::Result<()> {
        let checker = &self.checker;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut repeated: Vec<&str> = Vec::new();
        let buckets = checker
            .jscomp_error
            .iter()
            .chain(checker.jscomp_warning.iter())
            .chain(checker.jscomp_off.iter());
        for class in buckets {
            if !seen.insert(class.as_str()) {
                repeated.push(class.as_str());
            }
        }
        if !repeated.is_empty() {
            anyhow::bail!(
                "Clases de diagnóstico en más de un balde de severidad: {}",
                repeated.join(", ")
            );
        }

        if checker.timeout_secs == 0 {
            anyhow::bail!("timeout_secs debe ser mayor que cero");
        }

        if checker.warning_level != "VERBOSE" && checker.warning_level != "QUIET" {
            anyhow::bail!(
                "warning_level debe ser VERBOSE o QUIET (se recibió '{}')",
                checker.warning_level
            );
        }

        if checker.command.trim().is_empty() {
            anyhow::bail!("El comando del motor de chequeo no puede estar vacío");
        }

        Ok(())
    }

    /// Busca la raíz del proyecto subiendo desde el directorio actual hasta
    /// encontrar un `.typeguardrc.toml`.
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            if current.join(".typeguardrc.toml").exists() {
                return Some(current.to_path_buf());
            }
            dir = current.parent();
        }
        None
    }
}
