// Dataset loading + session state
// The JSON file comes in two shapes: a bare deputy array (old exports)
// or an object with "dados" + "metadata" (new exports). Both parse
// transparently. The Session object replaces the ambient globals of the
// original dashboard: it owns the loaded dataset and the currently open
// detail view, and every query goes through it.

use crate::aggregate::{aggregate, Aggregate};
use crate::autocomplete::{AutocompleteIndex, MIN_QUERY_DATASET, MIN_QUERY_DETAIL};
use crate::facets::{extract_earmark_facets, extract_facets, EarmarkFacets, Facets};
use crate::filter::{
    filter_activity, filter_deputies, filter_earmarks, Activity, DeputyFilter, EarmarkFilter,
};
use crate::model::{Committee, Deputy, Earmark};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::fs;
use std::path::Path;

// ============================================================================
// FILE SHAPES
// ============================================================================

#[derive(Deserialize)]
struct Metadata {
    #[serde(default)]
    data_atualizacao: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Bare(Vec<Deputy>),
    Wrapped {
        dados: Vec<Deputy>,
        #[serde(default)]
        metadata: Option<Metadata>,
    },
}

// ============================================================================
// DATASET
// ============================================================================

/// The loaded dataset plus its derived indices. Read-only after load:
/// filtering produces transient views, never mutates records.
pub struct Dataset {
    pub deputies: Vec<Deputy>,
    pub facets: Facets,
    /// Freshness signal: file modification time, falling back to the
    /// metadata timestamp shipped inside the JSON.
    pub updated_at: Option<String>,
    autocomplete: AutocompleteIndex,
}

impl Dataset {
    /// Parse a dataset from a JSON string (either file shape).
    pub fn from_json(json: &str) -> Result<Self> {
        Self::build(json, None)
    }

    /// Load a dataset from disk, deriving the freshness string from the
    /// file's modification time when available.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset file: {:?}", path))?;

        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(|time| {
                DateTime::<Local>::from(time)
                    .format("%d/%m/%Y %H:%M")
                    .to_string()
            });

        Self::build(&content, modified)
    }

    fn build(json: &str, modified: Option<String>) -> Result<Self> {
        let file: DatasetFile =
            serde_json::from_str(json).context("failed to parse dataset JSON")?;

        let (deputies, metadata) = match file {
            DatasetFile::Bare(deputies) => (deputies, None),
            DatasetFile::Wrapped { dados, metadata } => (dados, metadata),
        };

        // File mtime wins; the embedded timestamp is the fallback
        let updated_at = modified.or(metadata.and_then(|m| m.data_atualizacao));

        let facets = extract_facets(&deputies);
        let autocomplete =
            AutocompleteIndex::new(facets.beneficiary_labels.clone(), MIN_QUERY_DATASET);

        Ok(Dataset {
            deputies,
            facets,
            updated_at,
            autocomplete,
        })
    }

    /// Filtered deputy list, input order preserved.
    pub fn filter(&self, filter: &DeputyFilter) -> Vec<&Deputy> {
        filter_deputies(&self.deputies, filter)
    }

    /// Dataset-wide beneficiary label suggestions.
    pub fn suggest(&self, term: &str) -> Vec<&str> {
        self.autocomplete.query(term)
    }

    /// Locate a deputy by exact electoral name.
    pub fn find_deputy(&self, name: &str) -> Option<&Deputy> {
        self.deputies
            .iter()
            .find(|dep| dep.status.nome_eleitoral == name)
    }
}

// ============================================================================
// DETAIL VIEW
// ============================================================================

/// Cached state of one open deputy detail: the earmark subset and its
/// deputy-scoped indices. Replaced wholesale when another detail opens.
pub struct DetailView {
    pub name: String,
    pub earmarks: Vec<Earmark>,
    pub facets: EarmarkFacets,
    fronts: Vec<String>,
    committees: Vec<Committee>,
    autocomplete: AutocompleteIndex,
}

impl DetailView {
    fn new(deputy: &Deputy) -> Self {
        let earmarks = deputy.earmarks.clone();
        let facets = extract_earmark_facets(&earmarks);
        let autocomplete =
            AutocompleteIndex::new(facets.beneficiary_labels.clone(), MIN_QUERY_DETAIL);

        DetailView {
            name: deputy.status.nome_eleitoral.clone(),
            earmarks,
            facets,
            fronts: deputy.fronts.clone(),
            committees: deputy.committees.clone(),
            autocomplete,
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Explicit context object owning the loaded dataset and the open
/// detail view. Query operations are pure functions of (state, filter);
/// calling them before a load yields a clear not-ready error instead of
/// a panic or an empty lie.
#[derive(Default)]
pub struct Session {
    dataset: Option<Dataset>,
    detail: Option<DetailView>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Load (or replace) the dataset from disk. Resets any open detail.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.dataset = Some(Dataset::load(path)?);
        self.detail = None;
        Ok(())
    }

    /// Load (or replace) the dataset from a JSON string.
    pub fn load_str(&mut self, json: &str) -> Result<()> {
        self.dataset = Some(Dataset::from_json(json)?);
        self.detail = None;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.is_some()
    }

    fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| anyhow!("dataset not loaded - call load() first"))
    }

    fn detail(&self) -> Result<&DetailView> {
        self.detail
            .as_ref()
            .ok_or_else(|| anyhow!("no deputy detail open - call open_detail() first"))
    }

    pub fn updated_at(&self) -> Result<Option<&str>> {
        Ok(self.dataset()?.updated_at.as_deref())
    }

    pub fn facets(&self) -> Result<&Facets> {
        Ok(&self.dataset()?.facets)
    }

    pub fn filter_deputies(&self, filter: &DeputyFilter) -> Result<Vec<&Deputy>> {
        Ok(self.dataset()?.filter(filter))
    }

    pub fn suggest(&self, term: &str) -> Result<Vec<&str>> {
        Ok(self.dataset()?.suggest(term))
    }

    /// Open the detail view for a deputy by electoral name. Any
    /// previously open detail is replaced wholesale.
    pub fn open_detail(&mut self, name: &str) -> Result<&DetailView> {
        let view = {
            let deputy = self
                .dataset()?
                .find_deputy(name)
                .ok_or_else(|| anyhow!("deputy not found: {}", name))?;
            DetailView::new(deputy)
        };
        Ok(self.detail.insert(view))
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_facets(&self) -> Result<&EarmarkFacets> {
        Ok(&self.detail()?.facets)
    }

    /// Filter + sort + total the open deputy's earmarks.
    pub fn detail_table(&self, filter: &EarmarkFilter) -> Result<Aggregate> {
        let view = self.detail()?;
        let filtered = filter_earmarks(&view.earmarks, filter);
        Ok(aggregate(&filtered))
    }

    /// Detail-scope beneficiary suggestions (single-character trigger).
    pub fn detail_suggest(&self, term: &str) -> Result<Vec<&str>> {
        Ok(self.detail()?.autocomplete.query(term))
    }

    /// Filtered parliamentary activity (fronts/committees) of the open
    /// deputy.
    pub fn activity(&self, term: &str) -> Result<Activity> {
        let view = self.detail()?;
        Ok(filter_activity(&view.fronts, &view.committees, term))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"{
        "metadata": {"data_atualizacao": "01/08/2026 10:30"},
        "dados": [
            {
                "ultimoStatus": {
                    "nomeEleitoral": "ALICE",
                    "siglaPartido": "PT",
                    "siglaUf": "SP"
                },
                "frentes": ["Frente Parlamentar da Saúde"],
                "orgaos_ativos": [
                    {"sigla": "CSAUDE", "nome": "Comissão de Saúde", "titulo": "Titular"}
                ],
                "emendas_execucao": [
                    {
                        "ano": 2023,
                        "codigo": "EM-1",
                        "funcao": "Saúde",
                        "valor_empenhado": "1.000,00",
                        "beneficiarios": [
                            {"nome": "Hospital A", "municipio": "SP", "valor": "1.000,00"}
                        ]
                    },
                    {
                        "ano": 2022,
                        "codigo": "EM-2",
                        "funcao": "Educação",
                        "localidade": "Campinas",
                        "valor_empenhado": "500,00",
                        "valor_pago": "250,00"
                    }
                ]
            },
            {
                "ultimoStatus": {
                    "nomeEleitoral": "BOB",
                    "siglaPartido": "MDB",
                    "siglaUf": "RJ"
                }
            }
        ]
    }"#;

    #[test]
    fn test_both_file_shapes() {
        let wrapped = Dataset::from_json(WRAPPED).unwrap();
        assert_eq!(wrapped.deputies.len(), 2);
        assert_eq!(wrapped.updated_at.as_deref(), Some("01/08/2026 10:30"));

        let bare = Dataset::from_json(
            r#"[{"ultimoStatus": {"nomeEleitoral": "X", "siglaPartido": "PT", "siglaUf": "SP"}}]"#,
        )
        .unwrap();
        assert_eq!(bare.deputies.len(), 1);
        assert!(bare.updated_at.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Dataset::from_json("{not json").is_err());
        assert!(Dataset::from_json(r#"{"wrong": true}"#).is_err());
    }

    #[test]
    fn test_session_not_ready() {
        let session = Session::new();
        assert!(!session.is_ready());
        assert!(session.facets().is_err());
        assert!(session.filter_deputies(&DeputyFilter::default()).is_err());
        assert!(session.suggest("camp").is_err());
        assert!(session.detail_table(&EarmarkFilter::default()).is_err());
    }

    #[test]
    fn test_empty_dataset_is_not_an_error() {
        let mut session = Session::new();
        session.load_str("[]").unwrap();

        assert!(session.is_ready());
        assert!(session.facets().unwrap().years.is_empty());
        assert!(session
            .filter_deputies(&DeputyFilter::default())
            .unwrap()
            .is_empty());
        assert!(session.suggest("camp").unwrap().is_empty());
    }

    #[test]
    fn test_dataset_facets_and_suggestions() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();

        let facets = session.facets().unwrap();
        assert_eq!(facets.years, vec![2023, 2022]);
        assert_eq!(facets.parties, vec!["MDB", "PT"]);
        assert_eq!(
            facets.beneficiary_labels,
            vec!["Campinas", "Hospital A - SP"]
        );

        // Dataset scope: two characters trigger suggestions
        assert!(session.suggest("c").unwrap().is_empty());
        assert_eq!(session.suggest("ca").unwrap(), vec!["Campinas"]);
    }

    // Spec scenario: filtering year=2023 AND function=Saúde includes
    // Alice with committed total 1000.00; year=2022 AND function=Saúde
    // excludes her (no single earmark satisfies both).
    #[test]
    fn test_alice_scenario() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();

        let joint = DeputyFilter {
            year: Some(2023),
            function: Some("Saúde".to_string()),
            ..Default::default()
        };
        let included = session.filter_deputies(&joint).unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].status.nome_eleitoral, "ALICE");

        session.open_detail("ALICE").unwrap();
        let table = session
            .detail_table(&EarmarkFilter {
                year: Some(2023),
                function: Some("Saúde".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.totals.empenhado, 1000.0);

        let cross = DeputyFilter {
            year: Some(2022),
            function: Some("Saúde".to_string()),
            ..Default::default()
        };
        assert!(session.filter_deputies(&cross).unwrap().is_empty());
    }

    #[test]
    fn test_detail_view_lifecycle() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();

        assert!(session.detail_table(&EarmarkFilter::default()).is_err());
        assert!(session.open_detail("NOBODY").is_err());

        let view = session.open_detail("ALICE").unwrap();
        assert_eq!(view.name, "ALICE");
        assert_eq!(view.earmarks.len(), 2);

        // Detail scope: single character triggers suggestions
        assert_eq!(session.detail_suggest("c").unwrap(), vec!["Campinas"]);

        let table = session.detail_table(&EarmarkFilter::default()).unwrap();
        assert_eq!(table.rows.len(), 2);
        // Sorted: 2023 before 2022
        assert_eq!(table.rows[0].codigo.as_deref(), Some("EM-1"));
        assert_eq!(table.totals.empenhado, 1500.0);
        assert_eq!(table.totals.pago, 250.0);

        // Opening another deputy replaces the view wholesale
        let bob = session.open_detail("BOB").unwrap();
        assert_eq!(bob.name, "BOB");
        assert!(bob.earmarks.is_empty());
        assert!(session
            .detail_table(&EarmarkFilter::default())
            .unwrap()
            .rows
            .is_empty());

        session.close_detail();
        assert!(session.detail_facets().is_err());
    }

    #[test]
    fn test_activity_through_session() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();
        session.open_detail("ALICE").unwrap();

        let all = session.activity("").unwrap();
        assert_eq!(all.fronts.len(), 1);
        assert_eq!(all.committees.len(), 1);

        let none = session.activity("meio ambiente").unwrap();
        assert!(none.fronts.is_empty());
        assert!(none.committees.is_empty());
    }

    // A suggestion fed back as the filter value must behave exactly
    // like the user typing that label by hand.
    #[test]
    fn test_suggestion_round_trips_into_filter() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();

        let suggestion = session.suggest("hosp").unwrap()[0].to_string();
        assert_eq!(suggestion, "Hospital A - SP");

        let filter = DeputyFilter {
            beneficiary: Some(suggestion),
            ..Default::default()
        };
        let result = session.filter_deputies(&filter).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status.nome_eleitoral, "ALICE");
    }

    #[test]
    fn test_load_replaces_dataset_and_detail() {
        let mut session = Session::new();
        session.load_str(WRAPPED).unwrap();
        session.open_detail("ALICE").unwrap();

        session.load_str("[]").unwrap();
        assert!(session.detail_facets().is_err());
        assert!(session
            .filter_deputies(&DeputyFilter::default())
            .unwrap()
            .is_empty());
    }
}
