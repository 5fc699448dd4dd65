pub mod engine;

pub use engine::RewriteEngine;
use serde::{Deserialize, Serialize};

/// Tipo de matcher de una regla de reescritura.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Literal,
    Pattern,
}

/// Definición serializable de una regla (formato de `.typeguard/rules.yaml`).
///
/// Las reglas del usuario se insertan después de las reglas integradas y
/// siempre antes del catch-all de módulos no relativos.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RuleDefinition {
    pub name: String,
    pub kind: MatcherKind,
    #[serde(rename = "match")]
    pub matches: String,
    pub replace: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RuleFile {
    pub rules: Vec<RuleDefinition>,
}
