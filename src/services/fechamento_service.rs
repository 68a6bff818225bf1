// src/services/fechamento_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    db::{fechamento_repo::TotaisFechamento, DespesaRepository, FechamentoRepository, TaxaRepository},
    models::financeiro::{FaturamentoItem, Fechamento, StatusFechamento},
};

/// Seam com o sistema de vendas: o fechamento só precisa dos agregados de
/// faturamento do período. A implementação de produção lê a réplica local
/// (`db::VendasRepository`); testes usam um provedor em memória.
#[async_trait]
pub trait ProvedorFaturamento: Send + Sync {
    async fn faturamento_por_loja(
        &self,
        escopo: EscopoConsulta,
    ) -> Result<Vec<FaturamentoItem>, AppError>;
}

/// Matemática financeira do fechamento, isolada e sem IO.
/// Arredondamento padrão bancário (half-up) em 2 casas, item a item.
pub mod calculadora {
    use rust_decimal::{Decimal, RoundingStrategy};

    use crate::models::financeiro::{FaturamentoItem, ModalidadePagamento, TaxaItem};

    pub const BANDEIRA_GERAL: &str = "GERAL";

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TotaisReceita {
        pub total_bruto: Decimal,
        pub total_taxas: Decimal,
        pub receita_liquida: Decimal,
    }

    pub fn arredondar(valor: Decimal) -> Decimal {
        valor.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Taxa aplicável a um item de venda: bandeira exata primeiro, depois o
    /// fallback GERAL. A faixa de parcelas precisa conter o item.
    pub fn buscar_taxa<'a>(
        taxas: &'a [TaxaItem],
        modalidade: ModalidadePagamento,
        bandeira: &str,
        parcelas: i32,
    ) -> Option<&'a TaxaItem> {
        let aplicavel = |t: &&TaxaItem| {
            t.modalidade == modalidade
                && (t.parcela_inicial..=t.parcela_final).contains(&parcelas)
        };

        taxas
            .iter()
            .find(|t| aplicavel(t) && t.bandeira == bandeira)
            .or_else(|| taxas.iter().find(|t| aplicavel(t) && t.bandeira == BANDEIRA_GERAL))
    }

    /// Total bruto, total de taxas e líquido a receber das vendas do
    /// período. Item sem taxa cadastrada entra no bruto sem custo.
    pub fn calcular_liquido_vendas(
        itens: &[FaturamentoItem],
        taxas: &[TaxaItem],
    ) -> TotaisReceita {
        let mut total_bruto = Decimal::ZERO;
        let mut total_taxas = Decimal::ZERO;

        for item in itens {
            total_bruto += item.valor_bruto;

            if let Some(taxa) =
                buscar_taxa(taxas, item.tipo_pagamento, &item.bandeira, item.parcelas)
            {
                let percentual = taxa.taxa_percentual / Decimal::ONE_HUNDRED;
                let custo = item.valor_bruto * percentual + taxa.taxa_fixa;
                // Arredonda item a item para evitar acúmulo de dízimas.
                total_taxas += arredondar(custo);
            }
        }

        let total_bruto = arredondar(total_bruto);
        let total_taxas = arredondar(total_taxas);

        TotaisReceita {
            total_bruto,
            total_taxas,
            receita_liquida: total_bruto - total_taxas,
        }
    }
}

/// Orquestra o fechamento mensal: vendas externas, taxas da loja e despesas
/// da competência. Resultado sempre rederivado por inteiro, nunca remendado.
#[derive(Clone)]
pub struct FechamentoService {
    fechamento_repo: FechamentoRepository,
    despesa_repo: DespesaRepository,
    taxa_repo: TaxaRepository,
    vendas: Arc<dyn ProvedorFaturamento>,
}

impl FechamentoService {
    pub fn new(
        fechamento_repo: FechamentoRepository,
        despesa_repo: DespesaRepository,
        taxa_repo: TaxaRepository,
        vendas: Arc<dyn ProvedorFaturamento>,
    ) -> Self {
        Self {
            fechamento_repo,
            despesa_repo,
            taxa_repo,
            vendas,
        }
    }

    pub async fn calcular(&self, escopo: EscopoConsulta) -> Result<Fechamento, AppError> {
        // Período FECHADO é imutável: devolve o registro como está.
        if let Some(existente) = self.fechamento_repo.buscar(escopo).await? {
            if existente.status == StatusFechamento::Fechado {
                tracing::info!(
                    loja_id = escopo.loja_id,
                    mes = escopo.periodo.mes,
                    ano = escopo.periodo.ano,
                    "Período já fechado, retornando fechamento persistido"
                );
                return Ok(existente);
            }
        }

        // 1. Receita líquida (vendas - taxas)
        let itens = self.vendas.faturamento_por_loja(escopo).await?;
        let taxas = self.taxa_repo.taxas_vigentes_da_loja(escopo.loja_id).await?;
        let receita = calculadora::calcular_liquido_vendas(&itens, &taxas);

        // 2. Despesas da competência (não canceladas)
        let total_despesas =
            calculadora::arredondar(self.despesa_repo.somar_competencia(escopo).await?);

        // 3. Resultado operacional
        let resultado_operacional = receita.receita_liquida - total_despesas;

        // 4. Snapshot para auditoria
        let snapshot = json!({
            "periodo": escopo.periodo.formatar_iso(),
            "vendas_brutas": itens,
            "calculo_receita": {
                "total_bruto": receita.total_bruto,
                "total_taxas": receita.total_taxas,
                "receita_liquida": receita.receita_liquida,
            },
            "data_processamento": Utc::now().to_rfc3339(),
        });

        let totais = TotaisFechamento {
            faturamento_bruto: receita.total_bruto,
            total_taxas: receita.total_taxas,
            receita_liquida: receita.receita_liquida,
            total_despesas,
            resultado_operacional,
        };

        self.fechamento_repo.upsert(escopo, totais, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::calculadora::*;
    use crate::models::financeiro::{FaturamentoItem, ModalidadePagamento, TaxaItem};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn taxa(
        modalidade: ModalidadePagamento,
        bandeira: &str,
        percentual: &str,
        fixa: &str,
        parcelas: (i32, i32),
    ) -> TaxaItem {
        TaxaItem {
            id: 0,
            perfil_id: 1,
            modalidade,
            bandeira: bandeira.to_string(),
            parcela_inicial: parcelas.0,
            parcela_final: parcelas.1,
            taxa_percentual: dec(percentual),
            taxa_fixa: dec(fixa),
            dias_para_recebimento: 1,
        }
    }

    fn venda(
        modalidade: ModalidadePagamento,
        bandeira: &str,
        parcelas: i32,
        valor: &str,
    ) -> FaturamentoItem {
        FaturamentoItem {
            tipo_pagamento: modalidade,
            bandeira: bandeira.to_string(),
            parcelas,
            valor_bruto: dec(valor),
        }
    }

    #[test]
    fn arredondamento_half_up_em_duas_casas() {
        assert_eq!(arredondar(dec("10.005")), dec("10.01"));
        assert_eq!(arredondar(dec("10.004")), dec("10.00"));
        assert_eq!(arredondar(dec("10")), dec("10"));
    }

    #[test]
    fn taxa_da_bandeira_especifica_prevalece_sobre_geral() {
        let taxas = vec![
            taxa(ModalidadePagamento::Debito, "GERAL", "2.00", "0", (1, 1)),
            taxa(ModalidadePagamento::Debito, "VISA", "1.50", "0", (1, 1)),
        ];
        let escolhida = buscar_taxa(&taxas, ModalidadePagamento::Debito, "VISA", 1).unwrap();
        assert_eq!(escolhida.taxa_percentual, dec("1.50"));
    }

    #[test]
    fn bandeira_sem_taxa_propria_cai_no_geral() {
        let taxas = vec![taxa(ModalidadePagamento::Debito, "GERAL", "2.00", "0", (1, 1))];
        let escolhida = buscar_taxa(&taxas, ModalidadePagamento::Debito, "ELO", 1).unwrap();
        assert_eq!(escolhida.bandeira, "GERAL");
    }

    #[test]
    fn faixa_de_parcelas_limita_a_taxa() {
        let taxas = vec![
            taxa(ModalidadePagamento::CreditoParcelado, "GERAL", "3.00", "0", (2, 6)),
            taxa(ModalidadePagamento::CreditoParcelado, "GERAL", "4.50", "0", (7, 12)),
        ];
        assert_eq!(
            buscar_taxa(&taxas, ModalidadePagamento::CreditoParcelado, "VISA", 3)
                .unwrap()
                .taxa_percentual,
            dec("3.00")
        );
        assert_eq!(
            buscar_taxa(&taxas, ModalidadePagamento::CreditoParcelado, "VISA", 10)
                .unwrap()
                .taxa_percentual,
            dec("4.50")
        );
        assert!(buscar_taxa(&taxas, ModalidadePagamento::CreditoParcelado, "VISA", 1).is_none());
    }

    #[test]
    fn liquido_e_bruto_menos_taxas() {
        let taxas = vec![
            taxa(ModalidadePagamento::Debito, "GERAL", "2.00", "0.00", (1, 1)),
            taxa(ModalidadePagamento::CreditoAvista, "GERAL", "3.00", "0.40", (1, 1)),
        ];
        let itens = vec![
            venda(ModalidadePagamento::Debito, "VISA", 1, "1000.00"),
            venda(ModalidadePagamento::CreditoAvista, "MASTER", 1, "500.00"),
        ];

        let totais = calcular_liquido_vendas(&itens, &taxas);
        assert_eq!(totais.total_bruto, dec("1500.00"));
        // 1000 * 2% = 20.00; 500 * 3% + 0.40 = 15.40
        assert_eq!(totais.total_taxas, dec("35.40"));
        assert_eq!(totais.receita_liquida, dec("1464.60"));
    }

    #[test]
    fn item_sem_taxa_cadastrada_entra_sem_custo() {
        let itens = vec![venda(ModalidadePagamento::Pix, "GERAL", 1, "300.00")];
        let totais = calcular_liquido_vendas(&itens, &[]);
        assert_eq!(totais.total_bruto, dec("300.00"));
        assert_eq!(totais.total_taxas, dec("0.00"));
        assert_eq!(totais.receita_liquida, dec("300.00"));
    }

    #[test]
    fn sem_vendas_todos_os_totais_zeram() {
        let totais = calcular_liquido_vendas(&[], &[]);
        assert_eq!(totais.total_bruto, Decimal::ZERO);
        assert_eq!(totais.receita_liquida, Decimal::ZERO);
    }

    #[test]
    fn resultado_operacional_e_bruto_menos_taxas_menos_despesas() {
        // Propriedade central do fechamento, para entradas arbitrárias.
        let casos = [
            ("1000.00", "35.40", "200.00"),
            ("0.00", "0.00", "150.00"),
            ("99999.99", "1234.56", "0.00"),
        ];
        for (bruto, taxas, despesas) in casos {
            let (bruto, taxas, despesas) = (dec(bruto), dec(taxas), dec(despesas));
            let liquida = bruto - taxas;
            let resultado = liquida - despesas;
            assert_eq!(resultado, bruto - taxas - despesas);
        }
    }
}
