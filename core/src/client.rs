//! Request core and resource namespaces for the fila API.
//!
//! # Design
//! `FilaClient` holds only immutable per-instance configuration: the base
//! URL, an optional token provider, and the injected transport. Every
//! endpoint method funnels through `request`/`request_empty`, which attach
//! the bearer token, serialize the body, execute the transport, and map
//! non-2xx responses into [`ApiError::Status`]. Resource namespaces
//! (`auth()`, `usuarios()`, ...) are borrowing views that group one method
//! per backend endpoint and carry no state of their own, so concurrent
//! calls through the same client are independent.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::query::Query;
use crate::types::{
    Analista, AnalistaCreateRequest, AposentadoriaListParams, CadastrarRequest, Credenciais,
    DatalakeProcesso, Documento, Escopo, HistoricoStatus, Paginated, Papel, Processo,
    ProcessoAposentadoria, ProcessoCreateRequest, ProcessoListParams, RecuperarSenhaRequest,
    RedefinirSenhaRequest, Servidor, StatusProcessoAposentadoria, Token, UnidadeSei, Usuario,
    UsuarioCreateRequest,
};

const DEFAULT_BASE_URL: &str = "/api/v1";

/// Zero-argument callback resolving the current bearer token, if any.
/// Hosts typically close over their cookie jar or session store here.
pub type TokenProvider = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Configuration for [`FilaClient::new`].
#[derive(Default)]
pub struct ClientOptions {
    /// Base URL the endpoint paths are appended to. Defaults to `/api/v1`;
    /// trailing slashes are trimmed.
    pub base_url: Option<String>,
    /// Resolves the bearer token before each request. `None`, or a
    /// provider returning `None`, sends the request unauthenticated.
    pub token_provider: Option<TokenProvider>,
}

/// Typed client for the fila retirement-process REST API.
pub struct FilaClient {
    base_url: String,
    token_provider: Option<TokenProvider>,
    transport: Box<dyn HttpTransport + Send + Sync>,
}

impl fmt::Debug for FilaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilaClient")
            .field("base_url", &self.base_url)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl FilaClient {
    /// Creates a client over the given transport.
    pub fn new(transport: impl HttpTransport + Send + Sync + 'static, options: ClientOptions) -> Self {
        let base_url = options
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token_provider: options.token_provider,
            transport: Box::new(transport),
        }
    }

    /// Identity bridge for the hosting layer: resolves the user behind the
    /// configured token provider. Equivalent to `auth().me()`. A result of
    /// [`ApiError::is_unauthenticated`] means the stored token is invalid
    /// or expired and should be discarded by the host.
    pub fn current_user(&self) -> Result<Usuario, ApiError> {
        self.auth().me()
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn usuarios(&self) -> Usuarios<'_> {
        Usuarios { client: self }
    }

    pub fn processos(&self) -> Processos<'_> {
        Processos { client: self }
    }

    pub fn aposentadoria(&self) -> Aposentadoria<'_> {
        Aposentadoria { client: self }
    }

    pub fn analistas(&self) -> Analistas<'_> {
        Analistas { client: self }
    }

    pub fn unidades(&self) -> Unidades<'_> {
        Unidades { client: self }
    }

    pub fn datalake(&self) -> Datalake<'_> {
        Datalake { client: self }
    }

    /// Builds the request, executes it, and maps non-2xx responses to
    /// [`ApiError::Status`], decoding the backend's error envelope and
    /// falling back to a synthetic one when the body is not valid JSON.
    fn send(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<HttpResponse, ApiError> {
        let mut headers = Vec::new();
        if let Some(token) = self.token_provider.as_ref().and_then(|provider| provider()) {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let response = self.transport.execute(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })?;

        if !response.is_success() {
            let body = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| ErrorBody::from_status(response.status));
            return Err(ApiError::Status {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, body)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// For endpoints that answer with no payload. Any 2xx succeeds and the
    /// body is ignored, so 202/204 resolve regardless of what they carry.
    fn request_empty(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<(), ApiError> {
        self.send(method, path, body)?;
        Ok(())
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Option<String>, ApiError> {
    serde_json::to_string(body)
        .map(Some)
        .map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Authentication and account-lifecycle endpoints.
pub struct Auth<'a> {
    client: &'a FilaClient,
}

impl Auth<'_> {
    pub fn entrar(&self, credenciais: &Credenciais) -> Result<Token, ApiError> {
        self.client
            .request(HttpMethod::Post, "/auth/entrar", encode(credenciais)?)
    }

    /// Looks up the owner of a one-time token. Only setup and
    /// password-reset tokens are queryable; session tokens are not.
    pub fn token_info(&self, token: &str, escopo: Escopo) -> Result<Usuario, ApiError> {
        let query = Query::new()
            .param("token", Some(token))
            .param("escopo", Some(escopo.as_str()));
        self.client
            .request(HttpMethod::Get, &format!("/auth/token{}", query.build()), None)
    }

    pub fn cadastrar(&self, data: &CadastrarRequest) -> Result<(), ApiError> {
        self.client
            .request_empty(HttpMethod::Post, "/auth/cadastrar", encode(data)?)
    }

    pub fn recuperar_senha(&self, data: &RecuperarSenhaRequest) -> Result<(), ApiError> {
        self.client
            .request_empty(HttpMethod::Post, "/auth/recuperar-senha", encode(data)?)
    }

    pub fn redefinir_senha(&self, data: &RedefinirSenhaRequest) -> Result<(), ApiError> {
        self.client
            .request_empty(HttpMethod::Post, "/auth/redefinir-senha", encode(data)?)
    }

    pub fn me(&self) -> Result<Usuario, ApiError> {
        self.client.request(HttpMethod::Get, "/auth/me", None)
    }

    pub fn me_analista(&self) -> Result<Analista, ApiError> {
        self.client.request(HttpMethod::Get, "/auth/me/analista", None)
    }
}

/// User administration endpoints.
pub struct Usuarios<'a> {
    client: &'a FilaClient,
}

impl Usuarios<'_> {
    pub fn list(&self, papel: Option<Papel>) -> Result<Vec<Usuario>, ApiError> {
        let query = Query::new().param("papel", papel.map(Papel::as_str));
        self.client
            .request(HttpMethod::Get, &format!("/usuarios{}", query.build()), None)
    }

    pub fn create(&self, data: &UsuarioCreateRequest) -> Result<Usuario, ApiError> {
        self.client
            .request(HttpMethod::Post, "/usuarios", encode(data)?)
    }

    pub fn get(&self, usuario_id: i64) -> Result<Usuario, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/usuarios/{usuario_id}"), None)
    }

    pub fn delete(&self, usuario_id: i64) -> Result<(), ApiError> {
        self.client
            .request_empty(HttpMethod::Delete, &format!("/usuarios/{usuario_id}"), None)
    }

    /// Re-sends the registration invitation e-mail.
    pub fn enviar_cadastro(&self, usuario_id: i64) -> Result<(), ApiError> {
        self.client.request_empty(
            HttpMethod::Post,
            &format!("/usuarios/{usuario_id}/enviar-cadastro"),
            None,
        )
    }

    pub fn get_analista(&self, usuario_id: i64) -> Result<Analista, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/usuarios/{usuario_id}/analista"), None)
    }

    pub fn create_analista(&self, usuario_id: i64, data: &AnalistaCreateRequest) -> Result<Analista, ApiError> {
        self.client.request(
            HttpMethod::Post,
            &format!("/usuarios/{usuario_id}/analista"),
            encode(data)?,
        )
    }

    pub fn afastar_analista(&self, usuario_id: i64) -> Result<(), ApiError> {
        self.client.request_empty(
            HttpMethod::Post,
            &format!("/usuarios/{usuario_id}/analista/afastar"),
            None,
        )
    }

    pub fn retornar_analista(&self, usuario_id: i64) -> Result<(), ApiError> {
        self.client.request_empty(
            HttpMethod::Post,
            &format!("/usuarios/{usuario_id}/analista/retornar"),
            None,
        )
    }
}

/// SEI process endpoints.
pub struct Processos<'a> {
    client: &'a FilaClient,
}

impl Processos<'_> {
    pub fn list(&self, params: &ProcessoListParams) -> Result<Paginated<Processo>, ApiError> {
        let query = Query::new()
            .param("page", params.page)
            .param("limit", params.limit)
            .param("numero", params.numero.as_deref());
        self.client
            .request(HttpMethod::Get, &format!("/processos{}", query.build()), None)
    }

    pub fn create(&self, data: &ProcessoCreateRequest) -> Result<Processo, ApiError> {
        self.client
            .request(HttpMethod::Post, "/processos", encode(data)?)
    }

    pub fn get(&self, processo_id: Uuid) -> Result<Processo, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/processos/{processo_id}"), None)
    }

    pub fn documentos(&self, processo_id: Uuid) -> Result<Vec<Documento>, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/processos/{processo_id}/documentos"), None)
    }
}

/// Retirement-case queue endpoints.
pub struct Aposentadoria<'a> {
    client: &'a FilaClient,
}

impl Aposentadoria<'_> {
    pub fn list(&self, params: &AposentadoriaListParams) -> Result<Paginated<ProcessoAposentadoria>, ApiError> {
        let query = Query::new()
            .param("page", params.page)
            .param("limit", params.limit)
            .param("numero", params.numero.as_deref())
            .param("status", params.status.map(StatusProcessoAposentadoria::as_str));
        self.client
            .request(HttpMethod::Get, &format!("/aposentadoria{}", query.build()), None)
    }

    pub fn get(&self, pa_id: i64) -> Result<ProcessoAposentadoria, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/aposentadoria/{pa_id}"), None)
    }

    pub fn historico(&self, pa_id: i64) -> Result<Vec<HistoricoStatus>, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/aposentadoria/{pa_id}/historico"), None)
    }
}

/// Flat analyst listing.
pub struct Analistas<'a> {
    client: &'a FilaClient,
}

impl Analistas<'_> {
    pub fn list(&self) -> Result<Vec<Analista>, ApiError> {
        self.client.request(HttpMethod::Get, "/analistas", None)
    }
}

/// Flat SEI-unit listing.
pub struct Unidades<'a> {
    client: &'a FilaClient,
}

impl Unidades<'_> {
    pub fn list(&self) -> Result<Vec<UnidadeSei>, ApiError> {
        self.client.request(HttpMethod::Get, "/unidades", None)
    }
}

/// Read-only lookups against the state datalake.
pub struct Datalake<'a> {
    client: &'a FilaClient,
}

impl Datalake<'_> {
    pub fn processos(&self, unidade: &str) -> Result<Vec<DatalakeProcesso>, ApiError> {
        let query = Query::new().param("unidade", Some(unidade));
        self.client
            .request(HttpMethod::Get, &format!("/datalake/processos{}", query.build()), None)
    }

    pub fn unidades_processos(&self) -> Result<Vec<String>, ApiError> {
        self.client
            .request(HttpMethod::Get, "/datalake/processos/unidades", None)
    }

    pub fn servidor(&self, cpf: &str) -> Result<Servidor, ApiError> {
        self.client
            .request(HttpMethod::Get, &format!("/datalake/servidores/{cpf}"), None)
    }
}
