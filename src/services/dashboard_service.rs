// src/services/dashboard_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    db::DespesaRepository,
    models::{
        financeiro::{
            DashboardResumo, Despesa, SaudeFinanceira, StatusDespesa, JANELA_VENCENDO_DIAS,
        },
        periodo::Periodo,
    },
    services::fechamento_service::calculadora::arredondar,
};

/// Acima deste percentual de despesas atrasadas a saúde vira CRITICO.
/// Qualquer atraso não nulo abaixo disso é ATENCAO.
const LIMITE_CRITICO_ATRASO: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

#[derive(Clone)]
pub struct DashboardService {
    despesa_repo: DespesaRepository,
}

impl DashboardService {
    pub fn new(despesa_repo: DespesaRepository) -> Self {
        Self { despesa_repo }
    }

    /// Resumo sempre recalculado sob demanda a partir do conjunto de
    /// despesas do escopo; nada é persistido.
    pub async fn resumo(&self, escopo: EscopoConsulta) -> Result<DashboardResumo, AppError> {
        let despesas = self
            .despesa_repo
            .listar(escopo.loja_id, Some(escopo.periodo))
            .await?;
        Ok(montar_resumo(&despesas, Utc::now().date_naive(), escopo.periodo))
    }
}

/// Monta o resumo do dashboard a partir das despesas da competência.
/// Conjunto vazio resulta em percentuais zerados, nunca em erro de divisão.
pub fn montar_resumo(despesas: &[Despesa], hoje: NaiveDate, periodo: Periodo) -> DashboardResumo {
    let ativas: Vec<&Despesa> = despesas
        .iter()
        .filter(|d| d.status.conta_nos_totais())
        .collect();

    let total: Decimal = ativas.iter().map(|d| d.valor_liquido).sum();

    let soma_status = |status: StatusDespesa| -> Decimal {
        ativas
            .iter()
            .filter(|d| d.status == status)
            .map(|d| d.valor_liquido)
            .sum()
    };

    let percentual = |parte: Decimal| -> Decimal {
        if total.is_zero() {
            Decimal::ZERO
        } else {
            arredondar(parte / total * Decimal::ONE_HUNDRED)
        }
    };

    let percentual_pago = percentual(soma_status(StatusDespesa::Pago));
    let percentual_atrasado = percentual(soma_status(StatusDespesa::Atrasado));
    let percentual_previsto = percentual(soma_status(StatusDespesa::Previsto));

    let mut despesas_vencendo_semana = 0i64;
    let mut despesas_atrasadas = 0i64;
    for despesa in &ativas {
        let ind = despesa.indicadores(hoje);
        if ind.is_vencendo {
            despesas_vencendo_semana += 1;
        }
        if ind.is_atrasado {
            despesas_atrasadas += 1;
        }
    }

    let saude_financeira = if percentual_atrasado > LIMITE_CRITICO_ATRASO {
        SaudeFinanceira::Critico
    } else if percentual_atrasado > Decimal::ZERO {
        SaudeFinanceira::Atencao
    } else {
        SaudeFinanceira::Saudavel
    };

    let mensagem_assistente = montar_mensagem(
        saude_financeira,
        percentual_atrasado,
        despesas_atrasadas,
        despesas_vencendo_semana,
        periodo,
    );

    DashboardResumo {
        percentual_pago,
        percentual_atrasado,
        percentual_previsto,
        total_despesas_mes: arredondar(total),
        despesas_vencendo_semana,
        despesas_atrasadas,
        saude_financeira,
        mensagem_assistente,
    }
}

// Texto livre do assistente: vazio quando não há nada digno de nota.
fn montar_mensagem(
    saude: SaudeFinanceira,
    percentual_atrasado: Decimal,
    atrasadas: i64,
    vencendo: i64,
    periodo: Periodo,
) -> String {
    let mut partes: Vec<String> = Vec::new();
    let rotulo = periodo.formatar_exibicao();

    match saude {
        SaudeFinanceira::Critico => partes.push(format!(
            "Situação crítica em {rotulo}: {percentual_atrasado}% do valor do mês está atrasado ({atrasadas} despesa(s)). Priorize a regularização."
        )),
        SaudeFinanceira::Atencao => partes.push(format!(
            "Há {atrasadas} despesa(s) atrasada(s) em {rotulo}."
        )),
        SaudeFinanceira::Saudavel => {}
    }

    if vencendo > 0 {
        partes.push(format!(
            "{vencendo} despesa(s) vencem nos próximos {JANELA_VENCENDO_DIAS} dias."
        ));
    }

    partes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, d).unwrap()
    }

    fn dez_2025() -> Periodo {
        Periodo::novo(12, 2025).unwrap()
    }

    fn despesa(id: i64, liquido: &str, status: StatusDespesa, vencimento: NaiveDate) -> Despesa {
        Despesa {
            id,
            descricao: format!("Despesa {id}"),
            loja_id: 1,
            categoria_id: None,
            valor_bruto: dec(liquido),
            valor_desconto: Decimal::ZERO,
            valor_acrescimo: Decimal::ZERO,
            valor_liquido: dec(liquido),
            data_competencia: dia(2025, 12, 1),
            data_vencimento: vencimento,
            data_pagamento: None,
            status,
            criado_em: Utc::now(),
            criado_por: None,
        }
    }

    #[test]
    fn cenario_pago_e_atrasado_fecha_em_cem_por_cento() {
        // loja 1, 12/2025: 100 PAGO + 50 ATRASADO
        let hoje = dia(2025, 12, 10);
        let despesas = vec![
            despesa(1, "100.00", StatusDespesa::Pago, dia(2025, 12, 5)),
            despesa(2, "50.00", StatusDespesa::Atrasado, dia(2025, 12, 5)),
        ];

        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        assert_eq!(resumo.percentual_pago, dec("66.67"));
        assert_eq!(resumo.percentual_atrasado, dec("33.33"));
        assert_eq!(resumo.percentual_previsto, dec("0"));
        assert_eq!(resumo.total_despesas_mes, dec("150.00"));
        assert_eq!(resumo.despesas_atrasadas, 1);
        assert_eq!(
            resumo.percentual_pago + resumo.percentual_atrasado + resumo.percentual_previsto,
            dec("100.00")
        );
    }

    #[test]
    fn soma_dos_percentuais_fecha_em_cem_dentro_do_arredondamento() {
        let hoje = dia(2025, 12, 1);
        let despesas = vec![
            despesa(1, "33.33", StatusDespesa::Pago, dia(2025, 12, 20)),
            despesa(2, "33.33", StatusDespesa::Atrasado, dia(2025, 11, 20)),
            despesa(3, "33.34", StatusDespesa::Previsto, dia(2025, 12, 25)),
        ];
        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        let soma = resumo.percentual_pago + resumo.percentual_atrasado + resumo.percentual_previsto;
        assert!((soma - dec("100")).abs() <= dec("0.02"), "soma fora da tolerância: {soma}");
    }

    #[test]
    fn sem_despesas_tudo_zerado_e_saudavel() {
        let resumo = montar_resumo(&[], dia(2025, 12, 10), dez_2025());
        assert_eq!(resumo.percentual_pago, Decimal::ZERO);
        assert_eq!(resumo.percentual_atrasado, Decimal::ZERO);
        assert_eq!(resumo.percentual_previsto, Decimal::ZERO);
        assert_eq!(resumo.total_despesas_mes, Decimal::ZERO);
        assert_eq!(resumo.saude_financeira, SaudeFinanceira::Saudavel);
        assert!(resumo.mensagem_assistente.is_empty());
    }

    #[test]
    fn canceladas_ficam_fora_de_todos_os_totais() {
        let hoje = dia(2025, 12, 10);
        let despesas = vec![
            despesa(1, "100.00", StatusDespesa::Pago, dia(2025, 12, 5)),
            despesa(2, "900.00", StatusDespesa::Cancelado, dia(2025, 12, 5)),
        ];
        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        assert_eq!(resumo.percentual_pago, dec("100.00"));
        assert_eq!(resumo.total_despesas_mes, dec("100.00"));
        assert_eq!(resumo.despesas_atrasadas, 0);
    }

    #[test]
    fn atraso_acima_do_limite_e_critico() {
        let hoje = dia(2025, 12, 10);
        let despesas = vec![
            despesa(1, "50.00", StatusDespesa::Atrasado, dia(2025, 12, 1)),
            despesa(2, "50.00", StatusDespesa::Previsto, dia(2025, 12, 28)),
        ];
        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        assert_eq!(resumo.saude_financeira, SaudeFinanceira::Critico);
        assert!(!resumo.mensagem_assistente.is_empty());
    }

    #[test]
    fn atraso_pequeno_e_atencao() {
        let hoje = dia(2025, 12, 10);
        let despesas = vec![
            despesa(1, "10.00", StatusDespesa::Atrasado, dia(2025, 12, 1)),
            despesa(2, "990.00", StatusDespesa::Pago, dia(2025, 12, 5)),
        ];
        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        assert_eq!(resumo.saude_financeira, SaudeFinanceira::Atencao);
    }

    #[test]
    fn vencendo_na_semana_e_contado_e_mencionado() {
        let hoje = dia(2025, 12, 10);
        let despesas = vec![
            despesa(1, "100.00", StatusDespesa::Previsto, dia(2025, 12, 12)),
            despesa(2, "100.00", StatusDespesa::Previsto, dia(2025, 12, 28)),
        ];
        let resumo = montar_resumo(&despesas, hoje, dez_2025());
        assert_eq!(resumo.despesas_vencendo_semana, 1);
        assert_eq!(resumo.saude_financeira, SaudeFinanceira::Saudavel);
        assert!(resumo.mensagem_assistente.contains("vencem"));
    }
}
