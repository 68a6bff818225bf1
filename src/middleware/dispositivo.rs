// src/middleware/dispositivo.rs

use axum::http::{HeaderName, HeaderValue};
use axum_extra::headers::{self, Header};
use uuid::Uuid;

static X_DEVICE_ID: HeaderName = HeaderName::from_static("x-device-id");

/// Cabeçalho `X-Device-Id` enviado pelo cliente no login. O valor é o UUID
/// do dispositivo; a liberação fica na tabela `dispositivos_autorizados`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispositivoId(pub Uuid);

impl Header for DispositivoId {
    fn name() -> &'static HeaderName {
        &X_DEVICE_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let texto = value.to_str().map_err(|_| headers::Error::invalid())?;
        let id = Uuid::parse_str(texto).map_err(|_| headers::Error::invalid())?;
        Ok(DispositivoId(id))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0.to_string()) {
            values.extend(std::iter::once(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodifica_uuid_valido() {
        let value = HeaderValue::from_static("550e8400-e29b-41d4-a716-446655440000");
        let header = DispositivoId::decode(&mut [&value].into_iter()).unwrap();
        assert_eq!(
            header.0,
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
        );
    }

    #[test]
    fn recusa_valor_que_nao_e_uuid() {
        let value = HeaderValue::from_static("nao-e-uuid");
        assert!(DispositivoId::decode(&mut [&value].into_iter()).is_err());
    }
}
