//! Wire types for the fila retirement-process API.
//!
//! # Design
//! These structs mirror the backend's JSON schema field for field and do
//! nothing beyond serde decoding; the backend is the single source of
//! validation. The mock-server crate defines its own copies, so the
//! integration tests catch any drift between the two.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user, controlling what the backend authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Papel {
    Admin,
    Analista,
    Gestor,
    Subsecretario,
}

impl Papel {
    pub fn as_str(self) -> &'static str {
        match self {
            Papel::Admin => "ADMIN",
            Papel::Analista => "ANALISTA",
            Papel::Gestor => "GESTOR",
            Papel::Subsecretario => "SUBSECRETARIO",
        }
    }
}

/// Purpose tag for a one-time token lookup (account setup, password
/// reset). The backend rejects every other value on `/auth/token`, so
/// session tokens are deliberately not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Escopo {
    Setup,
    ResetSenha,
}

impl Escopo {
    pub fn as_str(self) -> &'static str {
        match self {
            Escopo::Setup => "setup",
            Escopo::ResetSenha => "reset-senha",
        }
    }
}

/// Bearer token issued by `entrar`, with its absolute expiry instant.
/// Persisting it (as a cookie or otherwise) is the caller's business;
/// the client never stores or mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub expira: DateTime<Utc>,
}

/// Account action the user still has to complete (finish registration,
/// verify e-mail).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pendencia {
    pub slug: String,
    pub titulo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub email_verificado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papel: Option<Papel>,
    pub pendencias: Vec<Pendencia>,
}

/// Analyst profile attached to a user, tied to a SEI unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analista {
    pub usuario_id: i64,
    pub orgao: String,
    pub sei_unidade_id: String,
    pub sei_unidade_sigla: String,
    pub afastado: bool,
    pub ultima_atribuicao_em: Option<DateTime<Utc>>,
}

/// Verdict the document-intelligence pipeline attached to a process.
/// Dates are calendar days (`YYYY-MM-DD`), not instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnaliseIA {
    pub aposentadoria: bool,
    pub cpf_requerente: String,
    pub data_requerimento: NaiveDate,
    pub data_nascimento_requerente: NaiveDate,
    pub judicial: bool,
    pub invalidez: bool,
    pub cpf_responsavel_diligencia: String,
}

/// A SEI process as tracked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processo {
    pub id: Uuid,
    pub numero: String,
    pub status: String,
    pub link_acesso: String,
    pub sei_unidade_id: String,
    pub sei_unidade_sigla: String,
    pub aposentadoria: Option<bool>,
    pub analisado_em: Option<DateTime<Utc>>,
    pub metadados_ia: Option<AnaliseIA>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Lifecycle status of a retirement case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusProcessoAposentadoria {
    AnalisePendente,
    EmAnalise,
    EmDiligencia,
    RetornoDiligencia,
    LeituraInvalida,
    Concluido,
}

impl StatusProcessoAposentadoria {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusProcessoAposentadoria::AnalisePendente => "ANALISE_PENDENTE",
            StatusProcessoAposentadoria::EmAnalise => "EM_ANALISE",
            StatusProcessoAposentadoria::EmDiligencia => "EM_DILIGENCIA",
            StatusProcessoAposentadoria::RetornoDiligencia => "RETORNO_DILIGENCIA",
            StatusProcessoAposentadoria::LeituraInvalida => "LEITURA_INVALIDA",
            StatusProcessoAposentadoria::Concluido => "CONCLUIDO",
        }
    }
}

/// A retirement-request case, queued and scored for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    pub status: StatusProcessoAposentadoria,
    pub analista_id: Option<i64>,
    pub analise_ia: Option<AnaliseIA>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// One status transition in a retirement case's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricoStatus {
    pub id: i64,
    pub processo_aposentadoria_id: i64,
    pub status_anterior: Option<StatusProcessoAposentadoria>,
    pub status_novo: StatusProcessoAposentadoria,
    pub usuario_id: Option<i64>,
    pub observacao: Option<String>,
    pub alterado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assinatura {
    pub nome: String,
    pub cpf: String,
}

/// A document inside a SEI process, with its extracted text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnidadeSei {
    pub id: String,
    pub sigla: String,
    pub descricao: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnidadeGeradora {
    pub sigla_unidade: String,
    pub id_unidade: String,
}

/// An open process as seen by the datalake, before ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatalakeProcesso {
    pub numero_processo: String,
    pub sigla_unidade: String,
    pub data_recebimento: DateTime<Utc>,
    pub unidade_geradora: UnidadeGeradora,
}

/// Civil-servant record from the datalake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Servidor {
    pub id_pessoa: i64,
    pub nome: String,
    pub masp: String,
    pub cpf: String,
    pub sexo: String,
    pub data_nascimento: DateTime<Utc>,
    pub possui_deficiencia: bool,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Login credentials for `auth.entrar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credenciais {
    pub cpf: String,
    pub senha: String,
}

/// Finishes a registration started by an invitation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadastrarRequest {
    pub token: String,
    pub senha: String,
    pub confirmar_senha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecuperarSenhaRequest {
    pub cpf: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedefinirSenhaRequest {
    pub token: String,
    pub senha: String,
    pub confirmar_senha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioCreateRequest {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub papel: Papel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalistaCreateRequest {
    pub unidade_id: String,
    pub orgao: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessoCreateRequest {
    pub numero: String,
}

// ---------------------------------------------------------------------------
// Listing parameters and the pagination envelope
// ---------------------------------------------------------------------------

/// Filters for `processos.list`. Absent fields are omitted from the query
/// string; the backend applies its own defaults.
#[derive(Debug, Clone, Default)]
pub struct ProcessoListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub numero: Option<String>,
}

/// Filters for `aposentadoria.list`.
#[derive(Debug, Clone, Default)]
pub struct AposentadoriaListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub numero: Option<String>,
    pub status: Option<StatusProcessoAposentadoria>,
}

/// Page envelope wrapping every paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    /// Builds the envelope for one page of data. `limit` must be nonzero.
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
