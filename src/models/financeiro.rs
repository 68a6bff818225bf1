// src/models/financeiro.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_despesa", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDespesa {
    Previsto,
    Pago,
    Atrasado,
    Cancelado,
}

impl StatusDespesa {
    /// Parse estrito do PATCH de status: qualquer valor fora dos quatro
    /// conhecidos é recusado na borda, nunca armazenado.
    pub fn parse(valor: &str) -> Option<Self> {
        match valor {
            "PREVISTO" => Some(Self::Previsto),
            "PAGO" => Some(Self::Pago),
            "ATRASADO" => Some(Self::Atrasado),
            "CANCELADO" => Some(Self::Cancelado),
            _ => None,
        }
    }

    /// CANCELADO sai de todos os totais; os demais status contam.
    pub fn conta_nos_totais(&self) -> bool {
        !matches!(self, Self::Cancelado)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_fechamento", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFechamento {
    Aberto,
    Fechado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "modalidade_pagamento", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModalidadePagamento {
    Debito,
    CreditoAvista,
    CreditoParcelado,
    Pix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaudeFinanceira {
    Saudavel,
    Atencao,
    Critico,
}

// --- Cadastros de apoio ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Categoria {
    pub id: i64,
    pub nome: String,
    pub ativa: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoriaPayload {
    #[validate(length(min = 1, message = "O nome da categoria é obrigatório."))]
    pub nome: String,
    #[serde(default = "ativa_padrao")]
    pub ativa: bool,
}

fn ativa_padrao() -> bool {
    true
}

#[derive(Debug, Clone, FromRow)]
pub struct PerfilTaxa {
    pub id: i64,
    pub nome: String,
    pub loja_id: i64,
    pub data_inicio_vigencia: NaiveDate,
    pub ativo: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct TaxaItem {
    pub id: i64,
    pub perfil_id: i64,
    pub modalidade: ModalidadePagamento,
    pub bandeira: String,
    pub parcela_inicial: i32,
    pub parcela_final: i32,
    pub taxa_percentual: Decimal,
    pub taxa_fixa: Decimal,
    pub dias_para_recebimento: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaxaItemOut {
    pub tipo: ModalidadePagamento,
    pub bandeira: String,
    pub taxa_percentual: Decimal,
    pub dias_para_recebimento: i32,
}

impl From<&TaxaItem> for TaxaItemOut {
    fn from(t: &TaxaItem) -> Self {
        Self {
            tipo: t.modalidade,
            bandeira: t.bandeira.clone(),
            taxa_percentual: t.taxa_percentual,
            dias_para_recebimento: t.dias_para_recebimento,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerfilTaxaOut {
    pub id: i64,
    pub nome: String,
    #[serde(rename = "loja_id_externo")]
    pub loja_id: i64,
    pub data_inicio_vigencia: NaiveDate,
    pub ativo: bool,
    pub taxas: Vec<TaxaItemOut>,
}

// --- Despesas (Contas a Pagar) ---

#[derive(Debug, Clone, FromRow)]
pub struct Despesa {
    pub id: i64,
    pub descricao: String,
    pub loja_id: i64,
    pub categoria_id: Option<i64>,
    pub valor_bruto: Decimal,
    pub valor_desconto: Decimal,
    pub valor_acrescimo: Decimal,
    pub valor_liquido: Decimal,
    pub data_competencia: NaiveDate,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<NaiveDate>,
    pub status: StatusDespesa,
    pub criado_em: DateTime<Utc>,
    pub criado_por: Option<i64>,
}

/// Sinalizadores de vencimento derivados, nunca persistidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicadoresVencimento {
    pub dias_para_vencimento: i64,
    pub is_vencendo: bool,
    pub is_atrasado: bool,
}

/// Janela "vencendo nesta semana", em dias a partir de hoje.
pub const JANELA_VENCENDO_DIAS: i64 = 7;

impl Despesa {
    /// Líquido sempre rederivável: bruto - desconto + acréscimo.
    pub fn calcular_liquido(bruto: Decimal, desconto: Decimal, acrescimo: Decimal) -> Decimal {
        bruto - desconto + acrescimo
    }

    /// Deriva os sinalizadores de vencimento em relação a `hoje`.
    /// is_atrasado e is_vencendo são mutuamente exclusivos, e ambos falsos
    /// quando a despesa já está PAGO ou CANCELADO.
    pub fn indicadores(&self, hoje: NaiveDate) -> IndicadoresVencimento {
        let dias = (self.data_vencimento - hoje).num_days();

        if matches!(self.status, StatusDespesa::Pago | StatusDespesa::Cancelado) {
            return IndicadoresVencimento {
                dias_para_vencimento: dias,
                is_vencendo: false,
                is_atrasado: false,
            };
        }

        let is_atrasado = dias < 0 || self.status == StatusDespesa::Atrasado;
        let is_vencendo = !is_atrasado && (0..=JANELA_VENCENDO_DIAS).contains(&dias);

        IndicadoresVencimento {
            dias_para_vencimento: dias,
            is_vencendo,
            is_atrasado,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoriaResumo {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DespesaOut {
    pub id: i64,
    pub descricao: String,
    pub valor_liquido: Decimal,
    pub status: StatusDespesa,
    pub data_competencia: NaiveDate,
    pub categoria: Option<CategoriaResumo>,
    pub dias_para_vencimento: i64,
    pub is_vencendo: bool,
    pub is_atrasado: bool,
}

impl DespesaOut {
    pub fn montar(despesa: &Despesa, categoria: Option<&Categoria>, hoje: NaiveDate) -> Self {
        let ind = despesa.indicadores(hoje);
        Self {
            id: despesa.id,
            descricao: despesa.descricao.clone(),
            valor_liquido: despesa.valor_liquido,
            status: despesa.status,
            data_competencia: despesa.data_competencia,
            categoria: categoria.map(|c| CategoriaResumo {
                id: c.id,
                nome: c.nome.clone(),
            }),
            dias_para_vencimento: ind.dias_para_vencimento,
            is_vencendo: ind.is_vencendo,
            is_atrasado: ind.is_atrasado,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DespesaDetalheOut {
    #[serde(flatten)]
    pub resumo: DespesaOut,
    pub valor_bruto: Decimal,
    pub valor_desconto: Decimal,
    pub valor_acrescimo: Decimal,
    pub data_vencimento: NaiveDate,
    #[serde(rename = "loja_id_externo")]
    pub loja_id: i64,
}

impl DespesaDetalheOut {
    pub fn montar(despesa: &Despesa, categoria: Option<&Categoria>, hoje: NaiveDate) -> Self {
        Self {
            resumo: DespesaOut::montar(despesa, categoria, hoje),
            valor_bruto: despesa.valor_bruto,
            valor_desconto: despesa.valor_desconto,
            valor_acrescimo: despesa.valor_acrescimo,
            data_vencimento: despesa.data_vencimento,
            loja_id: despesa.loja_id,
        }
    }
}

/// Normaliza um valor monetário digitado com vírgula decimal ("1.234,56")
/// para a forma com ponto antes do parse. Entrada não numérica é recusada.
pub fn normalizar_valor(texto: &str) -> Result<Decimal, String> {
    let texto = texto.trim();
    if texto.is_empty() {
        return Err("Valor vazio.".to_string());
    }
    let normalizado = if texto.contains(',') {
        texto.replace('.', "").replace(',', ".")
    } else {
        texto.to_string()
    };
    Decimal::from_str(&normalizado).map_err(|_| format!("Valor inválido: {texto}"))
}

fn de_valor_monetario<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ValorFlexivel {
        Numero(Decimal),
        Texto(String),
    }

    match ValorFlexivel::deserialize(deserializer)? {
        ValorFlexivel::Numero(v) => Ok(v),
        ValorFlexivel::Texto(s) => normalizar_valor(&s).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DespesaPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    pub loja_id: i64,
    pub categoria_id: i64,
    /// Aceita número JSON ou string com vírgula decimal.
    #[serde(deserialize_with = "de_valor_monetario")]
    #[schema(value_type = String, example = "1234,56")]
    pub valor: Decimal,
    #[serde(default)]
    pub valor_desconto: Option<Decimal>,
    #[serde(default)]
    pub valor_acrescimo: Option<Decimal>,
    pub data_competencia: NaiveDate,
    pub data_vencimento: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPayload {
    pub status: String,
}

// --- Fechamento mensal ---

#[derive(Debug, Clone, FromRow)]
pub struct Fechamento {
    pub id: i64,
    pub loja_id: i64,
    pub mes: i32,
    pub ano: i32,
    pub faturamento_bruto: Decimal,
    pub total_taxas: Decimal,
    pub receita_liquida: Decimal,
    pub total_despesas: Decimal,
    pub resultado_operacional: Decimal,
    pub status: StatusFechamento,
    pub dados_auditoria: Option<serde_json::Value>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FechamentoOut {
    pub loja_id: i64,
    pub mes: i32,
    pub ano: i32,
    pub faturamento_bruto: Decimal,
    pub total_taxas: Decimal,
    pub receita_liquida: Decimal,
    pub total_despesas: Decimal,
    pub resultado_operacional: Decimal,
    pub status: StatusFechamento,
}

impl From<&Fechamento> for FechamentoOut {
    fn from(f: &Fechamento) -> Self {
        Self {
            loja_id: f.loja_id,
            mes: f.mes,
            ano: f.ano,
            faturamento_bruto: f.faturamento_bruto,
            total_taxas: f.total_taxas,
            receita_liquida: f.receita_liquida,
            total_despesas: f.total_despesas,
            resultado_operacional: f.resultado_operacional,
            status: f.status,
        }
    }
}

// --- Dashboard ---

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResumo {
    pub percentual_pago: Decimal,
    pub percentual_atrasado: Decimal,
    pub percentual_previsto: Decimal,
    pub total_despesas_mes: Decimal,
    pub despesas_vencendo_semana: i64,
    pub despesas_atrasadas: i64,
    pub saude_financeira: SaudeFinanceira,
    pub mensagem_assistente: String,
}

// --- Faturamento externo (sistema de vendas) ---

/// Um grupo de vendas agregado vindo do sistema externo: modalidade,
/// bandeira, parcelas e o total bruto vendido nessa combinação.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FaturamentoItem {
    pub tipo_pagamento: ModalidadePagamento,
    pub bandeira: String,
    pub parcelas: i32,
    pub valor_bruto: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn despesa_base(status: StatusDespesa, vencimento: NaiveDate) -> Despesa {
        Despesa {
            id: 1,
            descricao: "Aluguel".to_string(),
            loja_id: 1,
            categoria_id: None,
            valor_bruto: Decimal::new(10_000, 2),
            valor_desconto: Decimal::ZERO,
            valor_acrescimo: Decimal::ZERO,
            valor_liquido: Decimal::new(10_000, 2),
            data_competencia: vencimento,
            data_vencimento: vencimento,
            data_pagamento: None,
            status,
            criado_em: Utc::now(),
            criado_por: None,
        }
    }

    fn dia(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn liquido_e_bruto_menos_desconto_mais_acrescimo() {
        let liquido = Despesa::calcular_liquido(
            Decimal::new(10_000, 2),
            Decimal::new(1_000, 2),
            Decimal::new(500, 2),
        );
        assert_eq!(liquido, Decimal::new(9_500, 2));
    }

    #[test]
    fn vencida_e_marcada_atrasada() {
        let hoje = dia(2025, 12, 10);
        let d = despesa_base(StatusDespesa::Previsto, dia(2025, 12, 5));
        let ind = d.indicadores(hoje);
        assert!(ind.is_atrasado);
        assert!(!ind.is_vencendo);
        assert_eq!(ind.dias_para_vencimento, -5);
    }

    #[test]
    fn vencendo_dentro_da_janela_semanal() {
        let hoje = dia(2025, 12, 10);
        let d = despesa_base(StatusDespesa::Previsto, dia(2025, 12, 15));
        let ind = d.indicadores(hoje);
        assert!(ind.is_vencendo);
        assert!(!ind.is_atrasado);
    }

    #[test]
    fn vencendo_hoje_conta_na_janela() {
        let hoje = dia(2025, 12, 10);
        let d = despesa_base(StatusDespesa::Previsto, hoje);
        assert!(d.indicadores(hoje).is_vencendo);
    }

    #[test]
    fn fora_da_janela_nao_esta_vencendo() {
        let hoje = dia(2025, 12, 1);
        let d = despesa_base(StatusDespesa::Previsto, dia(2025, 12, 20));
        let ind = d.indicadores(hoje);
        assert!(!ind.is_vencendo);
        assert!(!ind.is_atrasado);
    }

    #[test]
    fn paga_ou_cancelada_nunca_sinaliza() {
        let hoje = dia(2025, 12, 10);
        for status in [StatusDespesa::Pago, StatusDespesa::Cancelado] {
            let d = despesa_base(status, dia(2025, 12, 5));
            let ind = d.indicadores(hoje);
            assert!(!ind.is_atrasado);
            assert!(!ind.is_vencendo);
        }
    }

    #[test]
    fn status_atrasado_prevalece_mesmo_sem_vencer() {
        // Marcada ATRASADO manualmente, mesmo com vencimento futuro.
        let hoje = dia(2025, 12, 10);
        let d = despesa_base(StatusDespesa::Atrasado, dia(2025, 12, 12));
        let ind = d.indicadores(hoje);
        assert!(ind.is_atrasado);
        assert!(!ind.is_vencendo);
    }

    #[test]
    fn parse_status_aceita_somente_os_quatro() {
        assert_eq!(StatusDespesa::parse("PAGO"), Some(StatusDespesa::Pago));
        assert_eq!(StatusDespesa::parse("PREVISTO"), Some(StatusDespesa::Previsto));
        assert_eq!(StatusDespesa::parse("pago"), None);
        assert_eq!(StatusDespesa::parse("QUITADO"), None);
        assert_eq!(StatusDespesa::parse(""), None);
    }

    #[test]
    fn normalizar_valor_aceita_virgula_decimal() {
        assert_eq!(normalizar_valor("1234,56").unwrap(), Decimal::new(123_456, 2));
        assert_eq!(normalizar_valor("1.234,56").unwrap(), Decimal::new(123_456, 2));
        assert_eq!(normalizar_valor("1234.56").unwrap(), Decimal::new(123_456, 2));
        assert_eq!(normalizar_valor("  50  ").unwrap(), Decimal::new(50, 0));
    }

    #[test]
    fn normalizar_valor_recusa_nao_numerico() {
        assert!(normalizar_valor("abc").is_err());
        assert!(normalizar_valor("").is_err());
        assert!(normalizar_valor("12,34,56").is_err());
    }
}
