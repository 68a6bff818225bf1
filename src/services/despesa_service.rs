// src/services/despesa_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::{error::AppError, escopo::EscopoConsulta},
    db::{despesa_repo::DadosDespesa, CategoriaRepository, DespesaRepository, FechamentoRepository},
    models::{
        auth::SessaoAtual,
        financeiro::{
            Categoria, Despesa, DespesaDetalheOut, DespesaOut, DespesaPayload, StatusDespesa,
            StatusFechamento,
        },
        periodo::Periodo,
    },
    services::auth::AuthService,
};

/// Ciclo de vida das despesas: validação, guarda de período fechado,
/// autorização por loja e montagem das formas de resposta.
#[derive(Clone)]
pub struct DespesaService {
    despesa_repo: DespesaRepository,
    categoria_repo: CategoriaRepository,
    fechamento_repo: FechamentoRepository,
    auth: AuthService,
}

impl DespesaService {
    pub fn new(
        despesa_repo: DespesaRepository,
        categoria_repo: CategoriaRepository,
        fechamento_repo: FechamentoRepository,
        auth: AuthService,
    ) -> Self {
        Self {
            despesa_repo,
            categoria_repo,
            fechamento_repo,
            auth,
        }
    }

    pub async fn listar(
        &self,
        sessao: &SessaoAtual,
        loja_id: i64,
        periodo: Option<Periodo>,
    ) -> Result<Vec<DespesaOut>, AppError> {
        self.auth.exigir_acesso_loja(sessao, loja_id, false).await?;

        let despesas = self.despesa_repo.listar(loja_id, periodo).await?;
        let categorias = self.categorias_de(&despesas).await?;
        let hoje = Utc::now().date_naive();

        Ok(despesas
            .iter()
            .map(|d| {
                let categoria = d
                    .categoria_id
                    .and_then(|id| categorias.iter().find(|c| c.id == id));
                DespesaOut::montar(d, categoria, hoje)
            })
            .collect())
    }

    pub async fn buscar(
        &self,
        sessao: &SessaoAtual,
        id: i64,
    ) -> Result<DespesaDetalheOut, AppError> {
        let despesa = self.carregar(id).await?;
        self.auth
            .exigir_acesso_loja(sessao, despesa.loja_id, false)
            .await?;

        let categoria = self.categoria_da(&despesa).await?;
        Ok(DespesaDetalheOut::montar(
            &despesa,
            categoria.as_ref(),
            Utc::now().date_naive(),
        ))
    }

    pub async fn criar(
        &self,
        sessao: &SessaoAtual,
        payload: DespesaPayload,
    ) -> Result<DespesaOut, AppError> {
        Self::validar_payload(&payload)?;
        self.auth
            .exigir_acesso_loja(sessao, payload.loja_id, true)
            .await?;

        if !self.categoria_repo.existe(payload.categoria_id).await? {
            return Err(AppError::NaoEncontrado("Categoria"));
        }
        self.exigir_periodo_aberto(payload.loja_id, payload.data_competencia)
            .await?;

        let dados = Self::montar_dados(&payload);
        let despesa = self
            .despesa_repo
            .criar(dados, Some(sessao.usuario.id))
            .await?;

        let categoria = self.categoria_da(&despesa).await?;
        Ok(DespesaOut::montar(
            &despesa,
            categoria.as_ref(),
            Utc::now().date_naive(),
        ))
    }

    pub async fn atualizar(
        &self,
        sessao: &SessaoAtual,
        id: i64,
        payload: DespesaPayload,
    ) -> Result<DespesaOut, AppError> {
        Self::validar_payload(&payload)?;

        let atual = self.carregar(id).await?;
        self.auth
            .exigir_acesso_loja(sessao, atual.loja_id, true)
            .await?;
        if payload.loja_id != atual.loja_id {
            self.auth
                .exigir_acesso_loja(sessao, payload.loja_id, true)
                .await?;
        }

        if !self.categoria_repo.existe(payload.categoria_id).await? {
            return Err(AppError::NaoEncontrado("Categoria"));
        }

        // Nem a competência atual nem a de destino podem estar fechadas.
        self.exigir_periodo_aberto(atual.loja_id, atual.data_competencia)
            .await?;
        self.exigir_periodo_aberto(payload.loja_id, payload.data_competencia)
            .await?;

        let dados = Self::montar_dados(&payload);
        let despesa = self
            .despesa_repo
            .atualizar(id, dados)
            .await?
            .ok_or(AppError::NaoEncontrado("Despesa"))?;

        let categoria = self.categoria_da(&despesa).await?;
        Ok(DespesaOut::montar(
            &despesa,
            categoria.as_ref(),
            Utc::now().date_naive(),
        ))
    }

    /// PATCH de status: só os quatro valores conhecidos passam da borda.
    pub async fn mudar_status(
        &self,
        sessao: &SessaoAtual,
        id: i64,
        valor: &str,
    ) -> Result<DespesaOut, AppError> {
        let status = StatusDespesa::parse(valor)
            .ok_or_else(|| AppError::StatusInvalido(valor.to_string()))?;

        let atual = self.carregar(id).await?;
        self.auth
            .exigir_acesso_loja(sessao, atual.loja_id, true)
            .await?;
        self.exigir_periodo_aberto(atual.loja_id, atual.data_competencia)
            .await?;

        let despesa = self
            .despesa_repo
            .atualizar_status(id, status)
            .await?
            .ok_or(AppError::NaoEncontrado("Despesa"))?;

        let categoria = self.categoria_da(&despesa).await?;
        Ok(DespesaOut::montar(
            &despesa,
            categoria.as_ref(),
            Utc::now().date_naive(),
        ))
    }

    /// Exclusão definitiva; id inexistente é 404, nunca sucesso silencioso.
    pub async fn excluir(&self, sessao: &SessaoAtual, id: i64) -> Result<(), AppError> {
        let atual = self.carregar(id).await?;
        self.auth
            .exigir_acesso_loja(sessao, atual.loja_id, true)
            .await?;
        self.exigir_periodo_aberto(atual.loja_id, atual.data_competencia)
            .await?;

        let excluidas = self.despesa_repo.excluir(id).await?;
        if excluidas == 0 {
            return Err(AppError::NaoEncontrado("Despesa"));
        }
        Ok(())
    }

    async fn carregar(&self, id: i64) -> Result<Despesa, AppError> {
        self.despesa_repo
            .buscar(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Despesa"))
    }

    async fn categoria_da(&self, despesa: &Despesa) -> Result<Option<Categoria>, AppError> {
        match despesa.categoria_id {
            Some(id) => self.categoria_repo.buscar(id).await,
            None => Ok(None),
        }
    }

    async fn categorias_de(&self, despesas: &[Despesa]) -> Result<Vec<Categoria>, AppError> {
        let mut ids: Vec<i64> = despesas.iter().filter_map(|d| d.categoria_id).collect();
        ids.sort_unstable();
        ids.dedup();
        self.categoria_repo.buscar_por_ids(&ids).await
    }

    async fn exigir_periodo_aberto(
        &self,
        loja_id: i64,
        competencia: NaiveDate,
    ) -> Result<(), AppError> {
        let periodo = Periodo {
            mes: competencia.month(),
            ano: competencia.year(),
        };
        let escopo = EscopoConsulta::new(loja_id, periodo);

        if let Some(StatusFechamento::Fechado) =
            self.fechamento_repo.status_do_periodo(escopo).await?
        {
            return Err(AppError::PeriodoFechado {
                mes: periodo.mes,
                ano: periodo.ano,
            });
        }
        Ok(())
    }

    fn validar_payload(payload: &DespesaPayload) -> Result<(), AppError> {
        payload.validate()?;
        if payload.valor < Decimal::ZERO {
            return Err(AppError::CampoInvalido(
                "O valor da despesa não pode ser negativo.".to_string(),
            ));
        }
        Ok(())
    }

    fn montar_dados(payload: &DespesaPayload) -> DadosDespesa<'_> {
        let desconto = payload.valor_desconto.unwrap_or(Decimal::ZERO);
        let acrescimo = payload.valor_acrescimo.unwrap_or(Decimal::ZERO);
        DadosDespesa {
            descricao: &payload.descricao,
            loja_id: payload.loja_id,
            categoria_id: Some(payload.categoria_id),
            valor_bruto: payload.valor,
            valor_desconto: desconto,
            valor_acrescimo: acrescimo,
            valor_liquido: Despesa::calcular_liquido(payload.valor, desconto, acrescimo),
            data_competencia: payload.data_competencia,
            data_vencimento: payload.data_vencimento,
        }
    }
}
