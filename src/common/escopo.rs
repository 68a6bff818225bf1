// src/common/escopo.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use crate::models::periodo::Periodo;

/// Chave explícita de escopo: toda consulta periodizada (despesas,
/// fechamento, resumo do dashboard) é identificada por (loja, mês, ano).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EscopoConsulta {
    pub loja_id: i64,
    pub periodo: Periodo,
}

impl EscopoConsulta {
    pub fn new(loja_id: i64, periodo: Periodo) -> Self {
        Self { loja_id, periodo }
    }
}

/// Carimbo emitido para uma consulta em andamento. A resposta só é aceita
/// se o carimbo ainda pertencer à geração vigente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carimbo {
    geracao: u64,
    pub escopo: EscopoConsulta,
}

/// Controle de vigência de escopo para o cliente: trocar de loja ou de
/// período invalida todos os carimbos emitidos antes da troca, de modo que
/// respostas atrasadas de um escopo anterior sejam descartadas em vez de
/// exibidas sobre dados do escopo novo.
#[derive(Debug)]
pub struct ControleEscopo {
    geracao: AtomicU64,
    atual: Mutex<EscopoConsulta>,
}

impl ControleEscopo {
    pub fn new(escopo: EscopoConsulta) -> Self {
        Self {
            geracao: AtomicU64::new(0),
            atual: Mutex::new(escopo),
        }
    }

    /// Emite um carimbo amarrado ao escopo vigente.
    pub fn carimbar(&self) -> Carimbo {
        let escopo = *self.atual.lock().expect("lock de escopo envenenado");
        Carimbo {
            geracao: self.geracao.load(Ordering::SeqCst),
            escopo,
        }
    }

    /// Troca o escopo vigente. Qualquer carimbo emitido antes desta chamada
    /// deixa de ser válido, mesmo que o novo escopo seja igual ao antigo.
    pub fn trocar(&self, novo: EscopoConsulta) {
        let mut atual = self.atual.lock().expect("lock de escopo envenenado");
        *atual = novo;
        self.geracao.fetch_add(1, Ordering::SeqCst);
    }

    /// Uma resposta carimbada só deve ser aplicada se `vigente` for true.
    pub fn vigente(&self, carimbo: &Carimbo) -> bool {
        self.geracao.load(Ordering::SeqCst) == carimbo.geracao
    }

    pub fn escopo_atual(&self) -> EscopoConsulta {
        *self.atual.lock().expect("lock de escopo envenenado")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escopo(loja_id: i64, mes: u32, ano: i32) -> EscopoConsulta {
        EscopoConsulta::new(loja_id, Periodo::novo(mes, ano).unwrap())
    }

    #[test]
    fn carimbo_do_escopo_vigente_e_aceito() {
        let controle = ControleEscopo::new(escopo(1, 12, 2025));
        let carimbo = controle.carimbar();
        assert!(controle.vigente(&carimbo));
        assert_eq!(carimbo.escopo, escopo(1, 12, 2025));
    }

    #[test]
    fn trocar_loja_descarta_resposta_em_voo() {
        // Cenário: fechamento da loja 1 em andamento quando o usuário troca
        // para a loja 2. A resposta antiga chega depois e deve ser ignorada.
        let controle = ControleEscopo::new(escopo(1, 12, 2025));
        let em_voo = controle.carimbar();

        controle.trocar(escopo(2, 12, 2025));

        assert!(!controle.vigente(&em_voo));
        let novo = controle.carimbar();
        assert!(controle.vigente(&novo));
        assert_eq!(controle.escopo_atual().loja_id, 2);
    }

    #[test]
    fn trocar_periodo_tambem_invalida() {
        let controle = ControleEscopo::new(escopo(1, 12, 2025));
        let em_voo = controle.carimbar();

        controle.trocar(escopo(1, 1, 2026));

        assert!(!controle.vigente(&em_voo));
    }
}
