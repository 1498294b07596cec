// Aggregator - sorted earmark table + column totals
// Sort is stable: fiscal year descending, then committed amount
// descending, ties keep input order. Totals are plain left-to-right
// float sums over the sorted rows, so repeated runs over the same
// filtered set reproduce the same figures bit for bit.

use crate::model::Earmark;
use crate::money::format_money;
use serde::Serialize;

/// Column-wise sums of the monetary execution fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub empenhado: f64,
    pub liquidado: f64,
    pub pago: f64,
    pub rp_inscrito: f64,
    pub rp_cancelado: f64,
    pub rp_pago: f64,
}

impl Totals {
    pub fn is_zero(&self) -> bool {
        self.empenhado == 0.0
            && self.liquidado == 0.0
            && self.pago == 0.0
            && self.rp_inscrito == 0.0
            && self.rp_cancelado == 0.0
            && self.rp_pago == 0.0
    }

    /// Display strings for the totals row of the table.
    pub fn formatted(&self) -> FormattedTotals {
        FormattedTotals {
            empenhado: format_money(self.empenhado),
            liquidado: format_money(self.liquidado),
            pago: format_money(self.pago),
            rp_inscrito: format_money(self.rp_inscrito),
            rp_cancelado: format_money(self.rp_cancelado),
            rp_pago: format_money(self.rp_pago),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormattedTotals {
    pub empenhado: String,
    pub liquidado: String,
    pub pago: String,
    pub rp_inscrito: String,
    pub rp_cancelado: String,
    pub rp_pago: String,
}

/// Sorted rows plus their totals. Empty rows means the caller renders a
/// "no results" state, not a zero-row table.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub rows: Vec<Earmark>,
    pub totals: Totals,
}

/// Sort a filtered earmark set and total its monetary columns.
pub fn aggregate(earmarks: &[&Earmark]) -> Aggregate {
    let mut rows: Vec<Earmark> = earmarks.iter().map(|em| (*em).clone()).collect();

    // Vec::sort_by is stable, which is what keeps equal rows in input order
    rows.sort_by(|a, b| {
        b.ano
            .cmp(&a.ano)
            .then(b.valor_empenhado.total_cmp(&a.valor_empenhado))
    });

    let mut totals = Totals::default();
    for em in &rows {
        totals.empenhado += em.valor_empenhado;
        totals.liquidado += em.valor_liquidado;
        totals.pago += em.valor_pago;
        totals.rp_inscrito += em.valor_resto_inscrito;
        totals.rp_cancelado += em.valor_resto_cancelado;
        totals.rp_pago += em.valor_resto_pago;
    }

    Aggregate { rows, totals }
}

// ============================================================================
// TESTS
// ============================================================================
