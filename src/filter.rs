// 🔎 Predicate Engine
// Two evaluation levels sharing one combinator rule, "existential
// descent": a deputy passes the earmark-scoped filters iff at least one
// of their earmarks satisfies ALL active constraints simultaneously.
// Matching one constraint on one earmark and another on a different
// earmark is NOT a match.

use crate::model::{Committee, Deputy, Earmark};
use serde::Serialize;

// ============================================================================
// DEPUTY-LEVEL FILTER (card grid)
// ============================================================================

/// Active filter set for the deputy grid. `None` / empty term = "any".
#[derive(Debug, Clone, Default)]
pub struct DeputyFilter {
    /// Case-insensitive substring over the electoral name.
    pub term: String,
    /// Exact party acronym.
    pub party: Option<String>,
    /// Exact state (UF) acronym.
    pub uf: Option<String>,
    /// Earmark-scoped: fiscal year.
    pub year: Option<i32>,
    /// Earmark-scoped: exact functional classification.
    pub function: Option<String>,
    /// Earmark-scoped: exact beneficiary label (facet value, not a
    /// substring - the detail view is the one with substring search).
    pub beneficiary: Option<String>,
}

impl DeputyFilter {
    /// Whether any earmark-scoped constraint is active. When none is,
    /// the existence check is skipped entirely: a deputy with zero
    /// earmarks still matches on name/party/UF alone.
    pub fn has_earmark_constraints(&self) -> bool {
        self.year.is_some() || self.function.is_some() || self.beneficiary.is_some()
    }

    /// Evaluate the earmark-scoped constraints against one earmark.
    pub fn earmark_matches(&self, em: &Earmark) -> bool {
        let year_ok = self.year.map_or(true, |y| em.ano == y);
        let func_ok = self
            .function
            .as_deref()
            .map_or(true, |f| em.funcao.as_deref() == Some(f));
        let ben_ok = self
            .beneficiary
            .as_deref()
            .map_or(true, |b| em.beneficiary_labels().iter().any(|l| l == b));

        year_ok && func_ok && ben_ok
    }

    /// Full deputy predicate.
    pub fn matches(&self, dep: &Deputy) -> bool {
        let term = self.term.trim().to_lowercase();
        let name_ok = term.is_empty()
            || dep.status.nome_eleitoral.to_lowercase().contains(&term);
        let party_ok = self
            .party
            .as_deref()
            .map_or(true, |p| dep.status.sigla_partido == p);
        let uf_ok = self.uf.as_deref().map_or(true, |u| dep.status.sigla_uf == u);

        if !(name_ok && party_ok && uf_ok) {
            return false;
        }

        if !self.has_earmark_constraints() {
            return true;
        }

        // Existential descent: some earmark satisfies everything at once
        dep.earmarks.iter().any(|em| self.earmark_matches(em))
    }
}

/// Filter a deputy list, preserving input order.
pub fn filter_deputies<'a>(deputies: &'a [Deputy], filter: &DeputyFilter) -> Vec<&'a Deputy> {
    deputies.iter().filter(|dep| filter.matches(dep)).collect()
}

// ============================================================================
// EARMARK-LEVEL FILTER (detail view)
// ============================================================================

/// Filter set for one deputy's earmark table. The beneficiary field
/// here is a free-text substring, unlike the grid's exact facet match.
#[derive(Debug, Clone, Default)]
pub struct EarmarkFilter {
    /// Free text over beneficiaries, locality and function.
    pub term: String,
    pub year: Option<i32>,
    pub function: Option<String>,
    /// Substring over locality + beneficiary "nome municipio" pairs.
    pub beneficiary: String,
}

impl EarmarkFilter {
    pub fn matches(&self, em: &Earmark) -> bool {
        let year_ok = self.year.map_or(true, |y| em.ano == y);
        let func_ok = self
            .function
            .as_deref()
            .map_or(true, |f| em.funcao.as_deref() == Some(f));

        let ben_term = self.beneficiary.trim().to_lowercase();
        let ben_ok = ben_term.is_empty() || em.beneficiary_haystack().contains(&ben_term);

        let term = self.term.trim().to_lowercase();
        let term_ok = term.is_empty() || em.search_haystack().contains(&term);

        year_ok && func_ok && ben_ok && term_ok
    }
}

/// Filter an earmark list, preserving input order.
pub fn filter_earmarks<'a>(earmarks: &'a [Earmark], filter: &EarmarkFilter) -> Vec<&'a Earmark> {
    earmarks.iter().filter(|em| filter.matches(em)).collect()
}

// ============================================================================
// ACTIVITY VIEW (frentes / committees)
// ============================================================================

/// Filtered parliamentary activity of one deputy.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub fronts: Vec<String>,
    pub committees: Vec<Committee>,
}

/// Case-insensitive substring filter over fronts and committees.
/// Committees match on `"sigla nome"`. Empty term keeps everything.
pub fn filter_activity(fronts: &[String], committees: &[Committee], term: &str) -> Activity {
    let term = term.trim().to_lowercase();

    let fronts = fronts
        .iter()
        .filter(|f| term.is_empty() || f.to_lowercase().contains(&term))
        .cloned()
        .collect();

    let committees = committees
        .iter()
        .filter(|c| {
            term.is_empty()
                || format!("{} {}", c.sigla, c.nome).to_lowercase().contains(&term)
        })
        .cloned()
        .collect();

    Activity { fronts, committees }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Beneficiary, DeputyStatus};

    fn deputy(name: &str, party: &str, uf: &str, earmarks: Vec<Earmark>) -> Deputy {
        Deputy {
            status: DeputyStatus {
                nome_eleitoral: name.to_string(),
                nome_civil: None,
                sigla_partido: party.to_string(),
                sigla_uf: uf.to_string(),
                situacao: None,
                condicao_eleitoral: None,
                url_foto: None,
                gabinete: None,
            },
            municipio_nascimento: None,
            uf_nascimento: None,
            escolaridade: None,
            profissoes: None,
            rede_social: Vec::new(),
            url_website: None,
            earmarks,
            fronts: Vec::new(),
            committees: Vec::new(),
        }
    }

    fn earmark(ano: i32, funcao: &str, localidade: Option<&str>) -> Earmark {
        Earmark {
            ano,
            codigo: None,
            funcao: Some(funcao.to_string()),
            subfuncao: None,
            tipo: None,
            localidade: localidade.map(str::to_string),
            beneficiarios: Vec::new(),
            valor_empenhado: 0.0,
            valor_liquidado: 0.0,
            valor_pago: 0.0,
            valor_resto_inscrito: 0.0,
            valor_resto_cancelado: 0.0,
            valor_resto_pago: 0.0,
        }
    }

    fn beneficiary(nome: &str, municipio: Option<&str>) -> Beneficiary {
        Beneficiary {
            nome: nome.to_string(),
            municipio: municipio.map(str::to_string),
            valor: 0.0,
        }
    }

    #[test]
    fn test_name_search_case_insensitive() {
        let dep = deputy("MARIA DA SILVA", "PT", "SP", vec![]);

        let hit = DeputyFilter {
            term: "da silva".to_string(),
            ..Default::default()
        };
        assert!(hit.matches(&dep));

        let miss = DeputyFilter {
            term: "pereira".to_string(),
            ..Default::default()
        };
        assert!(!miss.matches(&dep));
    }

    #[test]
    fn test_party_and_uf_exact() {
        let dep = deputy("MARIA", "PT", "SP", vec![]);

        let filter = DeputyFilter {
            party: Some("PT".to_string()),
            uf: Some("SP".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&dep));

        let wrong_party = DeputyFilter {
            party: Some("MDB".to_string()),
            ..Default::default()
        };
        assert!(!wrong_party.matches(&dep));
    }

    #[test]
    fn test_no_earmark_filter_skips_existence_check() {
        // Deputy without a single earmark still matches on identity alone
        let dep = deputy("MARIA", "PT", "SP", vec![]);
        assert!(DeputyFilter::default().matches(&dep));

        // But any earmark-scoped filter excludes them
        let with_year = DeputyFilter {
            year: Some(2023),
            ..Default::default()
        };
        assert!(!with_year.matches(&dep));
    }

    #[test]
    fn test_existential_descent_joint_satisfaction() {
        // One earmark satisfies year, ANOTHER satisfies function -
        // no single earmark satisfies both, so the deputy is out.
        let dep = deputy(
            "ALICE",
            "PT",
            "SP",
            vec![
                earmark(2023, "Saúde", Some("SP")),
                earmark(2022, "Educação", Some("Campinas")),
            ],
        );

        let joint = DeputyFilter {
            year: Some(2023),
            function: Some("Saúde".to_string()),
            ..Default::default()
        };
        assert!(joint.matches(&dep));

        let cross = DeputyFilter {
            year: Some(2022),
            function: Some("Saúde".to_string()),
            ..Default::default()
        };
        assert!(!cross.matches(&dep));
    }

    #[test]
    fn test_beneficiary_facet_exact_match() {
        let mut em = earmark(2023, "Saúde", Some("BRASIL (NACIONAL)"));
        em.beneficiarios = vec![beneficiary("Hospital A", Some("SP"))];
        let dep = deputy("ALICE", "PT", "SP", vec![em]);

        let by_label = DeputyFilter {
            beneficiary: Some("Hospital A - SP".to_string()),
            ..Default::default()
        };
        assert!(by_label.matches(&dep));

        // The label is exact, not a substring
        let partial = DeputyFilter {
            beneficiary: Some("Hospital A".to_string()),
            ..Default::default()
        };
        assert!(!partial.matches(&dep));

        // Locality is shadowed by the beneficiaries branch
        let by_locality = DeputyFilter {
            beneficiary: Some("BRASIL (NACIONAL)".to_string()),
            ..Default::default()
        };
        assert!(!by_locality.matches(&dep));
    }

    #[test]
    fn test_locality_fallback_as_label() {
        let dep = deputy("BOB", "MDB", "RJ", vec![earmark(2022, "Urbanismo", Some("Niterói"))]);

        let filter = DeputyFilter {
            beneficiary: Some("Niterói".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&dep));
    }

    #[test]
    fn test_filter_deputies_preserves_order() {
        let deputies = vec![
            deputy("ALICE", "PT", "SP", vec![]),
            deputy("BOB", "MDB", "RJ", vec![]),
            deputy("ALINE", "PT", "MG", vec![]),
        ];

        let filter = DeputyFilter {
            term: "ali".to_string(),
            ..Default::default()
        };
        let result = filter_deputies(&deputies, &filter);
        let names: Vec<&str> = result
            .iter()
            .map(|d| d.status.nome_eleitoral.as_str())
            .collect();

        assert_eq!(names, vec!["ALICE", "ALINE"]);
    }

    #[test]
    fn test_earmark_filter_beneficiary_substring() {
        let mut em = earmark(2023, "Saúde", Some("SAO PAULO (UF)"));
        em.beneficiarios = vec![beneficiary("Hospital das Clínicas", Some("São Paulo"))];

        // Substring over "nome municipio" pairs, case-insensitive
        let by_ben = EarmarkFilter {
            beneficiary: "clínicas são".to_string(),
            ..Default::default()
        };
        assert!(by_ben.matches(&em));

        // Locality participates in the haystack even with beneficiaries
        let by_loc = EarmarkFilter {
            beneficiary: "sao paulo (uf)".to_string(),
            ..Default::default()
        };
        assert!(by_loc.matches(&em));

        // Function text is NOT part of the beneficiary haystack
        let by_func = EarmarkFilter {
            beneficiary: "saúde".to_string(),
            ..Default::default()
        };
        assert!(!by_func.matches(&em));
    }

    #[test]
    fn test_earmark_filter_free_text_includes_function() {
        let em = earmark(2023, "Saúde", Some("Campinas"));

        let by_func = EarmarkFilter {
            term: "saúde".to_string(),
            ..Default::default()
        };
        assert!(by_func.matches(&em));

        let by_loc = EarmarkFilter {
            term: "campinas".to_string(),
            ..Default::default()
        };
        assert!(by_loc.matches(&em));

        // Empty filters always match
        assert!(EarmarkFilter::default().matches(&em));
    }

    #[test]
    fn test_earmark_filter_year_and_function() {
        let em = earmark(2023, "Saúde", None);

        let exact = EarmarkFilter {
            year: Some(2023),
            function: Some("Saúde".to_string()),
            ..Default::default()
        };
        assert!(exact.matches(&em));

        let wrong_year = EarmarkFilter {
            year: Some(2021),
            ..Default::default()
        };
        assert!(!wrong_year.matches(&em));
    }

    #[test]
    fn test_activity_filter() {
        let fronts = vec![
            "Frente Parlamentar da Saúde".to_string(),
            "Frente Parlamentar do Esporte".to_string(),
        ];
        let committees = vec![
            Committee {
                sigla: "CSAUDE".to_string(),
                nome: "Comissão de Saúde".to_string(),
                titulo: Some("Titular".to_string()),
            },
            Committee {
                sigla: "CE".to_string(),
                nome: "Comissão de Educação".to_string(),
                titulo: None,
            },
        ];

        let result = filter_activity(&fronts, &committees, "saúde");
        assert_eq!(result.fronts.len(), 1);
        assert_eq!(result.committees.len(), 1);
        assert_eq!(result.committees[0].sigla, "CSAUDE");

        // Committees also match on the acronym
        let by_sigla = filter_activity(&fronts, &committees, "ce ");
        assert_eq!(by_sigla.committees.len(), 1);

        // Empty term keeps everything
        let all = filter_activity(&fronts, &committees, "");
        assert_eq!(all.fronts.len(), 2);
        assert_eq!(all.committees.len(), 2);
    }
}
