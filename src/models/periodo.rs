// src/models/periodo.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// Mesmo rótulo que o frontend obtém de toLocaleDateString('pt-BR').
const MESES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErroPeriodo {
    #[error("Período em formato inválido: {0} (esperado YYYY-MM)")]
    FormatoInvalido(String),

    #[error("Mês fora do intervalo 1..=12: {0}")]
    MesForaIntervalo(u32),
}

/// Competência (mês, ano). Tipo de valor puro: toda consulta periodizada é
/// escopada por um `Periodo` pareado com uma loja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Periodo {
    pub mes: u32,
    pub ano: i32,
}

impl Periodo {
    pub fn novo(mes: u32, ano: i32) -> Result<Self, ErroPeriodo> {
        if !(1..=12).contains(&mes) {
            return Err(ErroPeriodo::MesForaIntervalo(mes));
        }
        Ok(Self { mes, ano })
    }

    /// Avança (+1) ou retrocede (-1) o período, com rolagem de ano:
    /// dezembro + 1 vira janeiro do ano seguinte, janeiro - 1 vira dezembro
    /// do ano anterior. Qualquer estouro é normalizado aritmeticamente.
    pub fn avancar(self, direcao: i32) -> Periodo {
        let total = i64::from(self.ano) * 12 + i64::from(self.mes) - 1 + i64::from(direcao);
        Periodo {
            mes: (total.rem_euclid(12) + 1) as u32,
            ano: total.div_euclid(12) as i32,
        }
    }

    /// Rótulo de exibição, ex.: "dezembro de 2025". Os nomes de mês ficam em
    /// minúsculas conforme a convenção pt-BR; a capitalização é da UI.
    pub fn formatar_exibicao(&self) -> String {
        format!("{} de {}", MESES_PT[(self.mes - 1) as usize], self.ano)
    }

    /// Formato ISO "YYYY-MM" com zero à esquerda, usado em inputs type="month".
    pub fn formatar_iso(&self) -> String {
        format!("{:04}-{:02}", self.ano, self.mes)
    }

    /// Inverso de `formatar_iso`. Meses fora de 1..=12 são rejeitados.
    pub fn parse_iso(valor: &str) -> Result<Periodo, ErroPeriodo> {
        let (ano, mes) = valor
            .split_once('-')
            .ok_or_else(|| ErroPeriodo::FormatoInvalido(valor.to_string()))?;
        let ano: i32 = ano
            .parse()
            .map_err(|_| ErroPeriodo::FormatoInvalido(valor.to_string()))?;
        let mes: u32 = mes
            .parse()
            .map_err(|_| ErroPeriodo::FormatoInvalido(valor.to_string()))?;
        Periodo::novo(mes, ano)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avancar_rola_dezembro_para_janeiro() {
        let p = Periodo::novo(12, 2025).unwrap();
        assert_eq!(p.avancar(1), Periodo { mes: 1, ano: 2026 });
    }

    #[test]
    fn retroceder_rola_janeiro_para_dezembro() {
        let p = Periodo::novo(1, 2026).unwrap();
        assert_eq!(p.avancar(-1), Periodo { mes: 12, ano: 2025 });
    }

    #[test]
    fn avancar_meses_intermediarios_nao_muda_ano() {
        for mes in 1..12 {
            let p = Periodo::novo(mes, 2025).unwrap();
            assert_eq!(p.avancar(1), Periodo { mes: mes + 1, ano: 2025 });
        }
    }

    #[test]
    fn iso_ida_e_volta() {
        for mes in 1..=12 {
            let p = Periodo::novo(mes, 2025).unwrap();
            assert_eq!(Periodo::parse_iso(&p.formatar_iso()).unwrap(), p);
        }
    }

    #[test]
    fn formatar_iso_tem_zero_a_esquerda() {
        let p = Periodo::novo(3, 2026).unwrap();
        assert_eq!(p.formatar_iso(), "2026-03");
    }

    #[test]
    fn parse_iso_rejeita_mes_fora_do_intervalo() {
        assert_eq!(
            Periodo::parse_iso("2026-13"),
            Err(ErroPeriodo::MesForaIntervalo(13))
        );
        assert_eq!(
            Periodo::parse_iso("2026-00"),
            Err(ErroPeriodo::MesForaIntervalo(0))
        );
    }

    #[test]
    fn parse_iso_rejeita_lixo() {
        assert!(matches!(
            Periodo::parse_iso("dezembro/2025"),
            Err(ErroPeriodo::FormatoInvalido(_))
        ));
    }

    #[test]
    fn rotulo_de_exibicao_em_portugues() {
        let p = Periodo::novo(12, 2025).unwrap();
        assert_eq!(p.formatar_exibicao(), "dezembro de 2025");
    }
}
