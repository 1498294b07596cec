// Facet Extractor - filter vocabularies derived from the dataset
// One pass over every deputy/earmark/beneficiary; deduplicated, sorted
// value sets ready to populate the selection inputs. Years sort
// descending (newest first), everything else lexicographic ascending.

use crate::model::{Deputy, Earmark};
use serde::Serialize;
use std::collections::BTreeSet;

/// Dataset-wide filter vocabularies.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub years: Vec<i32>,
    pub parties: Vec<String>,
    pub ufs: Vec<String>,
    pub functions: Vec<String>,
    pub beneficiary_labels: Vec<String>,
}

/// Deputy-scoped vocabularies for the detail view (no party/UF: the
/// view is already pinned to one deputy).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EarmarkFacets {
    pub years: Vec<i32>,
    pub functions: Vec<String>,
    pub beneficiary_labels: Vec<String>,
}

/// Scan the whole dataset once and build every facet set.
pub fn extract_facets(deputies: &[Deputy]) -> Facets {
    let mut years = BTreeSet::new();
    let mut parties = BTreeSet::new();
    let mut ufs = BTreeSet::new();
    let mut functions = BTreeSet::new();
    let mut labels = BTreeSet::new();

    for dep in deputies {
        parties.insert(dep.status.sigla_partido.clone());
        ufs.insert(dep.status.sigla_uf.clone());
        collect_earmark_values(&dep.earmarks, &mut years, &mut functions, &mut labels);
    }

    Facets {
        years: years.into_iter().rev().collect(),
        parties: parties.into_iter().collect(),
        ufs: ufs.into_iter().collect(),
        functions: functions.into_iter().collect(),
        beneficiary_labels: labels.into_iter().collect(),
    }
}

/// Same scan, scoped to one deputy's earmark list.
pub fn extract_earmark_facets(earmarks: &[Earmark]) -> EarmarkFacets {
    let mut years = BTreeSet::new();
    let mut functions = BTreeSet::new();
    let mut labels = BTreeSet::new();

    collect_earmark_values(earmarks, &mut years, &mut functions, &mut labels);

    EarmarkFacets {
        years: years.into_iter().rev().collect(),
        functions: functions.into_iter().collect(),
        beneficiary_labels: labels.into_iter().collect(),
    }
}

fn collect_earmark_values(
    earmarks: &[Earmark],
    years: &mut BTreeSet<i32>,
    functions: &mut BTreeSet<String>,
    labels: &mut BTreeSet<String>,
) {
    for em in earmarks {
        years.insert(em.ano);
        if let Some(funcao) = &em.funcao {
            if !funcao.is_empty() {
                functions.insert(funcao.clone());
            }
        }
        // At most one branch per earmark: beneficiaries, else locality
        for label in em.beneficiary_labels() {
            labels.insert(label);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
