use crate::outline::OutlineNode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Placeholder icon for activities with no dedicated artwork.
pub const DEFAULT_ICON: &str = "/static/images/frentes/default-placeholder.png";

/// Free-text noise token stripped from activity names (case-sensitive).
const NOISE_TOKEN: &str = "disponível";

/// `;` glued to an equipment code (`BH129` style) becomes a space, so lists
/// like `BH128; BH129; BH130` survive the delimiter-noise cleanup readable.
static EQUIPMENT_CODE_FIXUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";\s*([A-Z]+\d+)").expect("static regex"));

/// Known work-front labels and their dashboard artwork.
const DEFAULT_ICON_TABLE: &[(&str, &str)] = &[
    ("Pátio de Alimentação", "/static/images/frentes/patioAlimentacao.png"),
    ("Secagem", "/static/images/frentes/secagem.png"),
    ("Torre de Resfriamento", "/static/images/frentes/TorreResfriamento.png"),
    ("Mistura", "/static/images/frentes/mistura.png"),
    ("Briquetagem", "/static/images/frentes/briquetagem.png"),
    ("Forno", "/static/images/frentes/forno.png"),
    ("Forno Industrial", "/static/images/frentes/forno.png"),
    ("Ventiladores", "/static/images/frentes/ventilador.png"),
    ("Ventiladores Principais", "/static/images/frentes/ventilador.png"),
    ("Precipitadores", "/static/images/frentes/precipitador.png"),
    ("Precipitadores Eletrostáticos", "/static/images/frentes/precipitador.png"),
    ("Peneiramento", "/static/images/frentes/peneiramento.png"),
    ("Pátio de Briquete", "/static/images/frentes/patioBriquete.png"),
    ("Retorno da Mistura", "/static/images/frentes/retornoMistura.png"),
    ("Retorno da Produção", "/static/images/frentes/retornoProducao.png"),
    (
        "Teste Operacional dos Ventiladores",
        "/static/images/frentes/testeOperacionalVentiladores.png",
    ),
    // Misspelled label present in real exports
    ("Torre de Refriamento", "/static/images/frentes/TorreResfriamento.png"),
    ("Moinho Principal", "/static/images/frentes/moinho.png"),
    ("Sistema de Controle", "/static/images/frentes/controle.png"),
    ("Sistema de Secagem", "/static/images/frentes/secagem.png"),
    ("Teste Operacional Geral", "/static/images/frentes/testeOperacional.png"),
];

/// Exact-match lookup from normalized activity name to icon path.
///
/// Injected into the pipeline so deployments can extend the table without
/// touching pipeline logic.
#[derive(Debug, Clone)]
pub struct IconMap {
    entries: HashMap<String, String>,
    default_icon: String,
}

impl Default for IconMap {
    fn default() -> Self {
        Self::with_entries(
            DEFAULT_ICON_TABLE
                .iter()
                .map(|&(name, path)| (name.to_string(), path.to_string())),
            DEFAULT_ICON,
        )
    }
}

impl IconMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(
        entries: impl IntoIterator<Item = (String, String)>,
        default_icon: impl Into<String>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            default_icon: default_icon.into(),
        }
    }

    /// Resolve an icon path; unmapped names get the placeholder.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &str {
        self.entries
            .get(name)
            .map_or(&self.default_icon, String::as_str)
    }
}

/// Clean a free-text activity name.
///
/// Applies the equipment-code fixup, strips `( ) / \ |`, removes the
/// `disponível` noise token and collapses whitespace. Idempotent:
/// normalizing an already-normalized name is a no-op.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let fixed = EQUIPMENT_CODE_FIXUP.replace_all(name, " $1");
    let stripped: String = fixed
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '/' | '\\' | '|'))
        .collect();
    let cleaned = stripped.replace(NOISE_TOKEN, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Outline node with a sanitized name and resolved icon.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedActivity {
    pub name: String,
    pub planned: f64,
    pub real: f64,
    pub image: String,
    pub sub_activities: Vec<NormalizedSub>,
}

/// Sub-activities get the same name treatment but never an icon.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSub {
    pub name: String,
    pub planned: f64,
    pub real: f64,
}

pub fn normalize_activities(nodes: Vec<OutlineNode>, icons: &IconMap) -> Vec<NormalizedActivity> {
    nodes
        .into_iter()
        .map(|node| {
            let name = normalize_name(&node.name);
            let image = icons.resolve(&name).to_string();
            NormalizedActivity {
                name,
                planned: node.planned,
                real: node.real,
                image,
                sub_activities: node
                    .sub_activities
                    .into_iter()
                    .map(|sub| NormalizedSub {
                        name: normalize_name(&sub.name),
                        planned: sub.planned,
                        real: sub.real,
                    })
                    .collect(),
            }
        })
        .collect()
}
