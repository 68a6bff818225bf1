// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::auth::{Claims, LojaOut, MeResponse, SessaoAtual},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String) -> Self {
        Self {
            usuario_repo,
            jwt_secret,
        }
    }

    /// Login em duas portas: primeiro o dispositivo (falha distinta, o
    /// frontend mostra mensagem própria), depois as credenciais (falha
    /// genérica, sem revelar se o usuário existe).
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        dispositivo_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        let dispositivo_id = dispositivo_id.ok_or(AppError::DispositivoNaoAutorizado)?;
        if !self.usuario_repo.dispositivo_liberado(dispositivo_id).await? {
            return Err(AppError::DispositivoNaoAutorizado);
        }

        let usuario = self
            .usuario_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::CredenciaisInvalidas)?;

        let senha = password.to_owned();
        let hash = usuario.senha_hash.clone();

        // Executa a verificação de bcrypt fora do executor async
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::CredenciaisInvalidas);
        }

        // Loja ativa padrão: a primeira loja acessível.
        let loja_ativa = self.usuario_repo.primeira_loja(usuario.id).await?;
        self.criar_token(usuario.id, loja_ativa)
    }

    /// Resolve a sessão a partir do bearer token. Qualquer falha (token
    /// expirado, usuário removido) vira TokenInvalido: o cliente trata como
    /// deslogado.
    pub async fn validar_token(&self, token: &str) -> Result<SessaoAtual, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::TokenInvalido)?;

        let usuario = self
            .usuario_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::TokenInvalido)?;

        Ok(SessaoAtual {
            usuario,
            active_loja_id: token_data.claims.active_loja_id,
        })
    }

    pub async fn montar_me(&self, sessao: &SessaoAtual) -> Result<MeResponse, AppError> {
        let grupos = self.usuario_repo.grupos_do_usuario(sessao.usuario.id).await?;

        let active_loja = sessao.active_loja_id.and_then(|id| {
            grupos
                .iter()
                .flat_map(|g| g.lojas.iter())
                .find(|l| l.id == id)
                .cloned()
        });

        Ok(MeResponse {
            user: (&sessao.usuario).into(),
            grupos,
            active_loja,
        })
    }

    /// Troca a loja ativa. A loja precisa estar no conjunto acessível do
    /// usuário; o estado vive no token, então um token novo é emitido.
    pub async fn trocar_loja(
        &self,
        sessao: &SessaoAtual,
        loja_id: i64,
    ) -> Result<(LojaOut, String), AppError> {
        let loja = self
            .usuario_repo
            .loja_acessivel(sessao.usuario.id, loja_id)
            .await?
            .ok_or(AppError::AcessoNegadoLoja(loja_id))?;

        let token = self.criar_token(sessao.usuario.id, Some(loja_id))?;
        Ok((loja, token))
    }

    /// Toda operação escopada por loja exige que a loja pedida seja a loja
    /// ativa da sessão E esteja no conjunto acessível. Com `edicao`, o papel
    /// na loja não pode ser LEITURA.
    pub async fn exigir_acesso_loja(
        &self,
        sessao: &SessaoAtual,
        loja_id: i64,
        edicao: bool,
    ) -> Result<LojaOut, AppError> {
        if sessao.active_loja_id != Some(loja_id) {
            return Err(AppError::AcessoNegadoLoja(loja_id));
        }

        let loja = self
            .usuario_repo
            .loja_acessivel(sessao.usuario.id, loja_id)
            .await?
            .ok_or(AppError::AcessoNegadoLoja(loja_id))?;

        if edicao && !loja.papel.pode_editar() {
            return Err(AppError::SomenteLeitura);
        }

        Ok(loja)
    }

    /// Mutação de cadastros de apoio (categorias): exige papel com edição
    /// na loja ativa da sessão.
    pub async fn exigir_edicao_na_loja_ativa(
        &self,
        sessao: &SessaoAtual,
    ) -> Result<LojaOut, AppError> {
        let loja_id = sessao.active_loja_id.ok_or(AppError::SomenteLeitura)?;
        self.exigir_acesso_loja(sessao, loja_id, true).await
    }

    fn criar_token(&self, usuario_id: i64, active_loja_id: Option<i64>) -> Result<String, AppError> {
        let agora = Utc::now();
        let expira_em = agora + chrono::Duration::hours(24);

        let claims = Claims {
            sub: usuario_id,
            active_loja_id,
            exp: expira_em.timestamp() as usize,
            iat: agora.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
