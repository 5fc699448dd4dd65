use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Default)]
pub struct TypeguardStats {
    pub corridas_totales: u32,
    pub corridas_fallidas: u32,
    pub ultima_duracion_secs: u64,
    pub ultimo_resultado: String,
}

impl TypeguardStats {
    pub fn cargar(path: &Path) -> Self {
        let stats_path = path.join(".typeguard_stats.json");
        if let Ok(content) = fs::read_to_string(stats_path) {
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    pub fn guardar(&self, path: &Path) {
        let stats_path = path.join(".typeguard_stats.json");
        if let Ok(content) = serde_json::to_string_pretty(self) {
            let _ = fs::write(stats_path, content);
        }
    }

    pub fn registrar_corrida(&mut self, exito: bool, duracion_secs: u64) {
        self.corridas_totales += 1;
        if !exito {
            self.corridas_fallidas += 1;
        }
        self.ultima_duracion_secs = duracion_secs;
        self.ultimo_resultado = if exito { "exito" } else { "fallo" }.to_string();
    }
}
