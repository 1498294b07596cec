use anyhow::{bail, Result};
use std::env;

use emendas_dashboard::{
    aggregate, format_money, DeputyFilter, EarmarkFilter, Earmark, FormattedTotals, Session,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: emendas-dashboard <dataset.json> [stats|facets|deputy <nome>]");
        std::process::exit(1);
    }

    let mut session = Session::new();
    session.load(&args[1])?;

    let mode = args.get(2).map(String::as_str).unwrap_or("stats");
    match mode {
        "stats" => run_stats(&session),
        "facets" => run_facets(&session),
        "deputy" => {
            let Some(name) = args.get(3) else {
                bail!("deputy mode needs a name: emendas-dashboard <dataset.json> deputy <nome>");
            };
            run_deputy(&mut session, name)
        }
        other => bail!("unknown mode: {}", other),
    }
}

fn run_stats(session: &Session) -> Result<()> {
    println!("📊 Emendas Dashboard - dataset stats");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if let Some(updated) = session.updated_at()? {
        println!("Atualizado em: {}", updated);
    }

    let deputies = session.filter_deputies(&DeputyFilter::default())?;
    let earmarks: Vec<&Earmark> = deputies
        .iter()
        .flat_map(|dep| dep.earmarks.iter())
        .collect();
    let result = aggregate(&earmarks);

    println!("✓ {} deputados, {} emendas", deputies.len(), result.rows.len());

    let facets = session.facets()?;
    println!(
        "✓ Facets: {} anos, {} partidos, {} UFs, {} funções, {} beneficiários",
        facets.years.len(),
        facets.parties.len(),
        facets.ufs.len(),
        facets.functions.len(),
        facets.beneficiary_labels.len()
    );

    println!("\nTotais gerais:");
    print_totals(&result.totals.formatted());

    Ok(())
}

fn run_facets(session: &Session) -> Result<()> {
    let facets = session.facets()?;

    println!("Anos:");
    for year in &facets.years {
        println!("  {}", year);
    }
    println!("Partidos:");
    for party in &facets.parties {
        println!("  {}", party);
    }
    println!("UFs:");
    for uf in &facets.ufs {
        println!("  {}", uf);
    }
    println!("Funções:");
    for funcao in &facets.functions {
        println!("  {}", funcao);
    }
    println!("Beneficiários ({}):", facets.beneficiary_labels.len());
    for label in &facets.beneficiary_labels {
        println!("  {}", label);
    }

    Ok(())
}

fn run_deputy(session: &mut Session, name: &str) -> Result<()> {
    let display_name = session.open_detail(name)?.name.clone();
    println!("📋 Execução orçamentária - {}", display_name);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let table = session.detail_table(&EarmarkFilter::default())?;

    if table.rows.is_empty() {
        println!("Nenhuma emenda registrada.");
        return Ok(());
    }

    for em in &table.rows {
        let funcao = em.funcao.as_deref().unwrap_or("-");
        let destino = em
            .beneficiary_labels()
            .first()
            .cloned()
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{} | {:30} | {:40} | {}",
            em.ano,
            funcao,
            destino,
            format_money(em.valor_empenhado)
        );
    }

    println!("\nTotais ({} emendas):", table.rows.len());
    print_totals(&table.totals.formatted());

    Ok(())
}

fn print_totals(totals: &FormattedTotals) {
    println!("  Empenhado:     {}", totals.empenhado);
    println!("  Liquidado:     {}", totals.liquidado);
    println!("  Pago:          {}", totals.pago);
    println!("  RP Inscritos:  {}", totals.rp_inscrito);
    println!("  RP Cancelados: {}", totals.rp_cancelado);
    println!("  RP Pagos:      {}", totals.rp_pago);
}
