// Data Model - deputies, earmarks and beneficiaries
// Mirrors the field names of the source JSON (Câmara dos Deputados open
// data enriched with SIOP budget execution). Normalization happens once,
// at deserialization: years become integers and monetary fields become
// floats, so downstream comparisons never juggle strings and numbers.

use crate::money::parse_money;
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel label for beneficiaries that arrive without a name.
pub const UNIDENTIFIED: &str = "Não identificado";

// ============================================================================
// DEPUTY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deputy {
    #[serde(rename = "ultimoStatus")]
    pub status: DeputyStatus,

    #[serde(rename = "municipioNascimento", default)]
    pub municipio_nascimento: Option<String>,

    #[serde(rename = "ufNascimento", default)]
    pub uf_nascimento: Option<String>,

    #[serde(default)]
    pub escolaridade: Option<String>,

    // Arrives as a list of objects with "titulo", bare strings or nulls;
    // kept opaque for the presentation layer
    #[serde(default)]
    pub profissoes: Option<Vec<serde_json::Value>>,

    #[serde(rename = "redeSocial", default, deserialize_with = "de_null_default")]
    pub rede_social: Vec<String>,

    #[serde(rename = "urlWebsite", default)]
    pub url_website: Option<String>,

    /// Budget execution records (emendas). Absent/null means none.
    #[serde(rename = "emendas_execucao", default, deserialize_with = "de_null_default")]
    pub earmarks: Vec<Earmark>,

    /// Parliamentary fronts the deputy participates in (activity view).
    #[serde(rename = "frentes", default, deserialize_with = "de_null_default")]
    pub fronts: Vec<String>,

    /// Committees and other active bodies (activity view).
    #[serde(rename = "orgaos_ativos", default, deserialize_with = "de_null_default")]
    pub committees: Vec<Committee>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeputyStatus {
    #[serde(rename = "nomeEleitoral")]
    pub nome_eleitoral: String,

    #[serde(rename = "nomeCivil", default)]
    pub nome_civil: Option<String>,

    #[serde(rename = "siglaPartido")]
    pub sigla_partido: String,

    #[serde(rename = "siglaUf")]
    pub sigla_uf: String,

    #[serde(default)]
    pub situacao: Option<String>,

    #[serde(rename = "condicaoEleitoral", default)]
    pub condicao_eleitoral: Option<String>,

    #[serde(rename = "urlFoto", default)]
    pub url_foto: Option<String>,

    #[serde(default)]
    pub gabinete: Option<Office>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Office {
    #[serde(default)]
    pub predio: Option<String>,

    #[serde(default)]
    pub sala: Option<String>,

    #[serde(default)]
    pub telefone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Committee {
    #[serde(default, deserialize_with = "de_null_default")]
    pub sigla: String,

    #[serde(default, deserialize_with = "de_null_default")]
    pub nome: String,

    #[serde(default)]
    pub titulo: Option<String>,
}

// ============================================================================
// EARMARK (emenda de execução orçamentária)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Earmark {
    /// Fiscal year, normalized to an integer even when the source sends
    /// it as a string ("2023" vs 2023).
    #[serde(rename = "ano", default, deserialize_with = "de_year")]
    pub ano: i32,

    #[serde(default)]
    pub codigo: Option<String>,

    #[serde(default)]
    pub funcao: Option<String>,

    #[serde(default)]
    pub subfuncao: Option<String>,

    #[serde(default)]
    pub tipo: Option<String>,

    /// Generic destination when the record is not broken down into
    /// beneficiaries (e.g. "SAO PAULO (UF)" or a municipality).
    #[serde(default)]
    pub localidade: Option<String>,

    #[serde(rename = "beneficiarios", default, deserialize_with = "de_null_default")]
    pub beneficiarios: Vec<Beneficiary>,

    // Monetary execution fields. Source sends locale strings, plain
    // numbers, nulls or omits them entirely; all land as f64, absent = 0.
    #[serde(rename = "valor_empenhado", default, deserialize_with = "de_money")]
    pub valor_empenhado: f64,

    #[serde(rename = "valor_liquidado", default, deserialize_with = "de_money")]
    pub valor_liquidado: f64,

    #[serde(rename = "valor_pago", default, deserialize_with = "de_money")]
    pub valor_pago: f64,

    // Restos a pagar (carryover) variant fields
    #[serde(rename = "valor_resto_inscrito", default, deserialize_with = "de_money")]
    pub valor_resto_inscrito: f64,

    #[serde(rename = "valor_resto_cancelado", default, deserialize_with = "de_money")]
    pub valor_resto_cancelado: f64,

    #[serde(rename = "valor_resto_pago", default, deserialize_with = "de_money")]
    pub valor_resto_pago: f64,
}

impl Earmark {
    /// Labels this earmark contributes to the beneficiary facet.
    ///
    /// Beneficiaries win over the generic locality: an earmark feeds at
    /// most one of the two branches, never both.
    pub fn beneficiary_labels(&self) -> Vec<String> {
        if !self.beneficiarios.is_empty() {
            return self.beneficiarios.iter().map(Beneficiary::label).collect();
        }
        match &self.localidade {
            Some(loc) if !loc.trim().is_empty() => vec![loc.clone()],
            _ => Vec::new(),
        }
    }

    /// Lowercased haystack for the detail-view beneficiary substring
    /// filter: generic locality plus every "nome municipio" pair.
    pub fn beneficiary_haystack(&self) -> String {
        let mut text = String::new();
        if let Some(loc) = &self.localidade {
            text.push_str(loc);
        }
        for b in &self.beneficiarios {
            text.push(' ');
            text.push_str(&b.nome);
            if let Some(mun) = &b.municipio {
                text.push(' ');
                text.push_str(mun);
            }
        }
        text.to_lowercase()
    }

    /// Lowercased haystack for the detail-view free-text filter: the
    /// beneficiary haystack plus the functional classification.
    pub fn search_haystack(&self) -> String {
        let mut text = self.beneficiary_haystack();
        if let Some(funcao) = &self.funcao {
            text.push(' ');
            text.push_str(&funcao.to_lowercase());
        }
        text
    }
}

// ============================================================================
// BENEFICIARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    #[serde(default = "default_nome", deserialize_with = "de_nome")]
    pub nome: String,

    #[serde(default)]
    pub municipio: Option<String>,

    #[serde(rename = "valor", default, deserialize_with = "de_money")]
    pub valor: f64,
}

impl Default for Beneficiary {
    fn default() -> Self {
        Beneficiary {
            nome: UNIDENTIFIED.to_string(),
            municipio: None,
            valor: 0.0,
        }
    }
}

impl Beneficiary {
    /// Display label: `nome` alone, or `"nome - municipio"`.
    pub fn label(&self) -> String {
        match &self.municipio {
            Some(mun) if !mun.trim().is_empty() => format!("{} - {}", self.nome, mun),
            _ => self.nome.clone(),
        }
    }
}

// ============================================================================
// DESERIALIZATION HELPERS
// ============================================================================

/// Missing OR null collection/string fields collapse to the default.
/// `#[serde(default)]` alone only covers the missing case.
fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Year as number or string; unparseable strings degrade to 0 under the
/// same lenient contract as money values.
fn de_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<RawYear>::deserialize(deserializer)? {
        None => 0,
        Some(RawYear::Num(n)) => n as i32,
        Some(RawYear::Text(s)) => s.trim().parse().unwrap_or(0),
    })
}

/// Monetary value as locale string, plain number or null.
fn de_money<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMoney {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<RawMoney>::deserialize(deserializer)? {
        None => 0.0,
        Some(RawMoney::Num(n)) => n,
        Some(RawMoney::Text(s)) => parse_money(&s),
    })
}

fn default_nome() -> String {
    UNIDENTIFIED.to_string()
}

/// Beneficiary name: absent, null or blank becomes the sentinel label.
fn de_nome<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let nome = Option::<String>::deserialize(deserializer)?;
    Ok(match nome {
        Some(n) if !n.trim().is_empty() => n,
        _ => UNIDENTIFIED.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
