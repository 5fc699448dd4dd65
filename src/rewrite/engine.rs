//! Motor de reescritura de fuentes CommonJS.
//!
//! Reemplaza expresiones `require(...)` que el chequeador de tipos no puede
//! resolver por sustitutos que sí conoce. La reescritura vive solo en memoria:
//! el texto transformado se usa únicamente para el chequeo, nunca se ejecuta
//! ni se escribe sobre el archivo original.

use crate::rewrite::{MatcherKind, RuleDefinition, RuleFile};
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Matcher de una regla: subcadena literal exacta o patrón con capturas.
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub name: String,
    pub matcher: Matcher,
    pub replace: String,
}

impl RewriteRule {
    pub fn literal(name: &str, find: &str, replace: &str) -> Self {
        Self {
            name: name.to_string(),
            matcher: Matcher::Literal(find.to_string()),
            replace: replace.to_string(),
        }
    }

    pub fn pattern(name: &str, pattern: &str, replace: &str) -> anyhow::Result<Self> {
        let re = Regex::new(pattern)
            .with_context(|| format!("Patrón inválido en la regla '{}'", name))?;
        Ok(Self {
            name: name.to_string(),
            matcher: Matcher::Pattern(re),
            replace: replace.to_string(),
        })
    }

    /// Construye una regla desde una definición de `.typeguard/rules.yaml`.
    ///
    /// Invariante: ni el matcher ni el reemplazo pueden contener saltos de
    /// línea. El conteo de líneas del archivo reescrito debe coincidir con el
    /// original para que los diagnósticos sigan apuntando a líneas reales.
    pub fn from_definition(def: &RuleDefinition) -> anyhow::Result<Self> {
        if def.matches.contains('\n') || def.replace.contains('\n') {
            anyhow::bail!(
                "La regla '{}' contiene saltos de línea; las reglas no pueden alterar el conteo de líneas.",
                def.name
            );
        }
        match def.kind {
            MatcherKind::Literal => Ok(Self::literal(&def.name, &def.matches, &def.replace)),
            MatcherKind::Pattern => Self::pattern(&def.name, &def.matches, &def.replace),
        }
    }

    /// Aplica la regla al texto completo. Si no hay coincidencias, retorna el
    /// texto sin cambios (una regla que no aplica no es un error).
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Matcher::Literal(find) => text.replace(find.as_str(), &self.replace),
            Matcher::Pattern(re) => re.replace_all(text, self.replace.as_str()).into_owned(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.matcher {
            Matcher::Literal(_) => "LITERAL",
            Matcher::Pattern(_) => "PATTERN",
        }
    }

    pub fn match_preview(&self) -> String {
        match &self.matcher {
            Matcher::Literal(find) => find.clone(),
            Matcher::Pattern(re) => re.as_str().to_string(),
        }
    }
}

/// Reglas integradas, en el orden exacto de aplicación.
///
/// El orden importa: cada regla opera sobre la salida de la anterior. Las
/// sustituciones de módulos con nombre van primero; el catch-all de módulos
/// no relativos no vive en esta lista (ver `RewriteEngine`).
static BUILTIN_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::literal(
            "WEB_INSPECTOR_COLOR",
            "require('../lib/web-inspector').Color.parse;",
            "WebInspector.Color.parse;",
        ),
        RewriteRule::literal(
            "GL_MATRIX",
            "require('gl-matrix')",
            "/** @type{!Object<string, *>} */({})",
        ),
        RewriteRule::literal("WHATWG_URL", "require('whatwg-url').URL", "self.URL"),
        RewriteRule::pattern(
            "TRACEVIEWER_BUNDLE",
            r"require\('(\.\./)*third_party/traceviewer-js/'\);",
            "{};",
        )
        .expect("regla integrada TRACEVIEWER_BUNDLE inválida"),
        RewriteRule::literal(
            "METAVIEWPORT_PARSER",
            "require('metaviewport-parser')",
            "MetaviewportParser",
        ),
    ]
});

/// Catch-all: cualquier `require` cuyo destino no empiece con un marcador de
/// ruta relativa se reemplaza por un objeto vacío tipado como `*`. Pierde
/// información de tipos a cambio de que el archivo sea parseable.
static CATCH_ALL: Lazy<RewriteRule> = Lazy::new(|| {
    RewriteRule::pattern(
        "NON_RELATIVE_REQUIRE",
        r"require\('[^.].*?'\)",
        "/** @type {*} */ ({})",
    )
    .expect("regla integrada NON_RELATIVE_REQUIRE inválida")
});

/// Lista ordenada de reglas más un catch-all estructuralmente último.
///
/// El catch-all es un campo aparte, no el final de `specific`: así ninguna
/// inserción posterior (reglas del usuario) puede quedar detrás de él.
pub struct RewriteEngine {
    specific: Vec<RewriteRule>,
    catch_all: RewriteRule,
}

impl RewriteEngine {
    pub fn with_builtin_rules() -> Self {
        Self {
            specific: BUILTIN_RULES.clone(),
            catch_all: CATCH_ALL.clone(),
        }
    }

    /// Carga reglas adicionales del usuario desde un YAML.
    ///
    /// Retorna cuántas reglas se agregaron. Las reglas del usuario se aplican
    /// después de las integradas y antes del catch-all.
    pub fn load_from_yaml(&mut self, yaml_path: &Path) -> anyhow::Result<usize> {
        let content = fs::read_to_string(yaml_path)
            .with_context(|| format!("No se pudo leer {}", yaml_path.display()))?;
        let file: RuleFile = serde_yaml::from_str(&content)
            .with_context(|| format!("YAML inválido en {}", yaml_path.display()))?;

        let mut loaded = 0;
        for def in &file.rules {
            self.specific.push(RewriteRule::from_definition(def)?);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Reescribe el texto completo de un archivo: pliegue por la izquierda
    /// sobre la lista de reglas, cada una aplicada a la salida de la anterior,
    /// y el catch-all al final.
    pub fn rewrite(&self, text: &str) -> String {
        let specific = self
            .specific
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc));
        self.catch_all.apply(&specific)
    }

    /// Reglas activas en orden de aplicación, catch-all incluido al final.
    pub fn rules(&self) -> impl Iterator<Item = &RewriteRule> {
        self.specific.iter().chain(std::iter::once(&self.catch_all))
    }

    pub fn rule_count(&self) -> usize {
        self.specific.len() + 1
    }
}
