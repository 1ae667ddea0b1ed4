//! Typed client for the fila retirement-process REST API.
//!
//! # Overview
//! One `FilaClient` per base URL + credential source. Endpoint methods are
//! grouped into resource namespaces (`auth()`, `usuarios()`, `processos()`,
//! `aposentadoria()`, `analistas()`, `unidades()`, `datalake()`); every
//! call funnels through a single request core that injects the bearer
//! token, serializes the JSON body, and maps non-2xx responses into the
//! backend's `{message, errors?}` error envelope.
//!
//! # Design
//! - The network is behind the injectable [`HttpTransport`] trait; the
//!   client itself never performs I/O, retries, or caching, so it can run
//!   against a scripted transport in tests and a request-scoped one in a
//!   server-rendering host.
//! - The client holds only immutable configuration (base URL, token
//!   provider, transport); concurrent calls share nothing mutable.
//! - Decoded response shapes are trusted as-is: a mismatch against the
//!   backend schema surfaces as a `Deserialization` error, not a schema
//!   validation report.

pub mod client;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use client::{ClientOptions, FilaClient, TokenProvider};
pub use error::{ApiError, ErrorBody};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use query::Query;
pub use types::{
    Analista, AnalistaCreateRequest, AnaliseIA, AposentadoriaListParams, Assinatura,
    CadastrarRequest, Credenciais, DatalakeProcesso, Documento, Escopo, HistoricoStatus,
    Paginated, Papel, Pendencia, Processo, ProcessoAposentadoria, ProcessoCreateRequest,
    ProcessoListParams, RecuperarSenhaRequest, RedefinirSenhaRequest, Servidor,
    StatusProcessoAposentadoria, Token, UnidadeGeradora, UnidadeSei, Usuario,
    UsuarioCreateRequest,
};
