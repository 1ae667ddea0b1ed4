//! Wire types served by the mock fila API.
//!
//! # Design
//! These mirror the real backend's JSON schema but are defined
//! independently of the `fila-core` crate, the same way the backend's own
//! handlers own their DTOs. Integration tests in `fila-core` exercise the
//! client against this server, so any drift between the two definitions
//! shows up there. Roles and statuses are plain strings here; the server
//! validates them at the edge instead of through enums.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error envelope used on every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub expira: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pendencia {
    pub slug: String,
    pub titulo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub email_verificado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papel: Option<String>,
    pub pendencias: Vec<Pendencia>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analista {
    pub usuario_id: i64,
    pub orgao: String,
    pub sei_unidade_id: String,
    pub sei_unidade_sigla: String,
    pub afastado: bool,
    pub ultima_atribuicao_em: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processo {
    pub id: Uuid,
    pub numero: String,
    pub status: String,
    pub link_acesso: String,
    pub sei_unidade_id: String,
    pub sei_unidade_sigla: String,
    pub aposentadoria: Option<bool>,
    pub analisado_em: Option<DateTime<Utc>>,
    pub metadados_ia: Option<serde_json::Value>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessoAposentadoria {
    pub id: i64,
    pub processo_id: Uuid,
    pub numero: String,
    pub data_requerimento: DateTime<Utc>,
    pub cpf_requerente: String,
    pub data_nascimento_requerente: DateTime<Utc>,
    pub invalidez: bool,
    pub judicial: bool,
    pub prioridade: bool,
    pub score: i32,
    pub status: String,
    pub analista_id: Option<i64>,
    pub analise_ia: Option<serde_json::Value>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricoStatus {
    pub id: i64,
    pub processo_aposentadoria_id: i64,
    pub status_anterior: Option<String>,
    pub status_novo: String,
    pub usuario_id: Option<i64>,
    pub observacao: Option<String>,
    pub alterado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assinatura {
    pub nome: String,
    pub cpf: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Documento {
    pub id: i64,
    pub numero: String,
    pub tipo: String,
    pub conteudo: String,
    pub link_acesso: String,
    pub data: String,
    pub unidade_geradora: String,
    pub assinaturas: Vec<Assinatura>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnidadeSei {
    pub id: String,
    pub sigla: String,
    pub descricao: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnidadeGeradora {
    pub sigla_unidade: String,
    pub id_unidade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatalakeProcesso {
    pub numero_processo: String,
    pub sigla_unidade: String,
    pub data_recebimento: DateTime<Utc>,
    pub unidade_geradora: UnidadeGeradora,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Servidor {
    pub id_pessoa: i64,
    pub nome: String,
    pub masp: String,
    pub cpf: String,
    pub sexo: String,
    pub data_nascimento: DateTime<Utc>,
    pub possui_deficiencia: bool,
}

// Request payloads the server accepts.

#[derive(Debug, Deserialize)]
pub struct EntrarRequest {
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Deserialize)]
pub struct CadastrarRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub senha: String,
    #[serde(default)]
    pub confirmar_senha: String,
}

#[derive(Debug, Deserialize)]
pub struct RecuperarSenhaRequest {
    #[serde(default)]
    pub cpf: String,
}

#[derive(Debug, Deserialize)]
pub struct RedefinirSenhaRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub senha: String,
    #[serde(default)]
    pub confirmar_senha: String,
}

#[derive(Debug, Deserialize)]
pub struct UsuarioCreateRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub papel: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalistaCreateRequest {
    #[serde(default)]
    pub unidade_id: String,
    #[serde(default)]
    pub orgao: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessoCreateRequest {
    #[serde(default)]
    pub numero: String,
}

/// Page envelope wrapping the paginated listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub limit: u32,
    pub current_page: u32,
    pub total_count: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u32, total_count: u32, limit: u32) -> Self {
        let total_pages = total_count.div_ceil(limit);
        Self {
            data,
            limit,
            current_page: page,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usuario_omits_absent_papel() {
        let usuario = Usuario {
            id: 1,
            nome: "Maria".to_string(),
            cpf: "123.456.789-01".to_string(),
            email: "maria@example.org".to_string(),
            email_verificado: false,
            papel: None,
            pendencias: Vec::new(),
        };
        let json = serde_json::to_value(&usuario).unwrap();
        assert!(json.get("papel").is_none());
        assert_eq!(json["pendencias"], serde_json::json!([]));
    }

    #[test]
    fn error_response_omits_absent_errors() {
        let erro = ErrorResponse {
            message: "O recurso solicitado não foi encontrado".to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&erro).unwrap();
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn entrar_request_defaults_missing_fields() {
        let input: EntrarRequest = serde_json::from_str(r#"{"cpf":"123.456.789-01"}"#).unwrap();
        assert_eq!(input.cpf, "123.456.789-01");
        assert!(input.senha.is_empty());
    }

    #[test]
    fn paginated_envelope_matches_backend_math() {
        let page = Paginated::new(vec![0; 5], 3, 25, 10);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}
