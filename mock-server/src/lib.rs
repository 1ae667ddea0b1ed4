//! In-memory rendition of the fila REST API.
//!
//! # Design
//! A single `Arc<RwLock<AppState>>` holds seeded data plus whatever the
//! handlers mutate; there is no persistence. Every error goes out as the
//! backend's `{message, errors?}` envelope and every route other than the
//! public auth endpoints requires a bearer token issued by `entrar`. The
//! seed is deterministic so client integration tests can assert on it:
//! one GESTOR login (`123.456.789-01` / `password1`), one analyst, one
//! pending account, three processes and a queue of 25 retirement cases.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub mod types;

pub use types::*;

const PAPEIS: [&str; 4] = ["ADMIN", "ANALISTA", "GESTOR", "SUBSECRETARIO"];
const STATUS_CICLO: [&str; 4] = ["ANALISE_PENDENTE", "EM_ANALISE", "EM_DILIGENCIA", "CONCLUIDO"];

pub struct AppState {
    pub usuarios: Vec<Usuario>,
    pub senhas: HashMap<i64, String>,
    /// Session tokens issued by `entrar`, mapping token -> usuario id.
    pub tokens: HashMap<String, i64>,
    /// One-time tokens, mapping token -> (usuario id, escopo).
    pub one_time_tokens: HashMap<String, (i64, String)>,
    pub analistas: Vec<Analista>,
    pub processos: Vec<Processo>,
    pub documentos: HashMap<Uuid, Vec<Documento>>,
    pub aposentadorias: Vec<ProcessoAposentadoria>,
    pub historicos: Vec<HistoricoStatus>,
    pub unidades: Vec<UnidadeSei>,
    pub datalake_processos: Vec<DatalakeProcesso>,
    pub servidores: Vec<Servidor>,
    pub next_usuario_id: i64,
}

impl AppState {
    pub fn seed() -> Self {
        let agora = Utc::now();

        let usuarios = vec![
            Usuario {
                id: 1,
                nome: "Maria Souza".to_string(),
                cpf: "123.456.789-01".to_string(),
                email: "maria.souza@fazenda.mg.gov.br".to_string(),
                email_verificado: true,
                papel: Some("GESTOR".to_string()),
                pendencias: Vec::new(),
            },
            Usuario {
                id: 2,
                nome: "João Lima".to_string(),
                cpf: "987.654.321-00".to_string(),
                email: "joao.lima@fazenda.mg.gov.br".to_string(),
                email_verificado: true,
                papel: Some("ANALISTA".to_string()),
                pendencias: Vec::new(),
            },
            Usuario {
                id: 3,
                nome: "Ana Castro".to_string(),
                cpf: "111.444.777-35".to_string(),
                email: "ana.castro@fazenda.mg.gov.br".to_string(),
                email_verificado: false,
                papel: Some("ANALISTA".to_string()),
                pendencias: vec![Pendencia {
                    slug: "finalizar-cadastro".to_string(),
                    titulo: "Finalizar cadastro".to_string(),
                }],
            },
        ];

        let senhas = HashMap::from([(1, "password1".to_string()), (2, "password2".to_string())]);

        let one_time_tokens = HashMap::from([
            ("tok-setup-ana".to_string(), (3, "setup".to_string())),
            ("tok-reset-maria".to_string(), (1, "reset-senha".to_string())),
        ]);

        let unidades = vec![
            UnidadeSei {
                id: "110000123".to_string(),
                sigla: "SCAP".to_string(),
                descricao: "Superintendência Central de Administração de Pessoal".to_string(),
            },
            UnidadeSei {
                id: "110000456".to_string(),
                sigla: "DCGP".to_string(),
                descricao: "Diretoria Central de Gestão de Pessoas".to_string(),
            },
        ];

        let analistas = vec![Analista {
            usuario_id: 2,
            orgao: "SEPLAG".to_string(),
            sei_unidade_id: "110000123".to_string(),
            sei_unidade_sigla: "SCAP".to_string(),
            afastado: false,
            ultima_atribuicao_em: Some(agora - Duration::days(2)),
        }];

        let mut processos = Vec::new();
        for i in 0..3u32 {
            processos.push(Processo {
                id: Uuid::new_v4(),
                numero: format!("1190.01.{:07}/2024-{:02}", 1000 + i, 10 + i),
                status: "RECEBIDO".to_string(),
                link_acesso: format!("https://sei.mg.gov.br/processos/{}", 1000 + i),
                sei_unidade_id: "110000123".to_string(),
                sei_unidade_sigla: "SCAP".to_string(),
                aposentadoria: if i == 0 { Some(true) } else { None },
                analisado_em: if i == 0 { Some(agora - Duration::days(1)) } else { None },
                metadados_ia: if i == 0 {
                    Some(serde_json::json!({
                        "aposentadoria": true,
                        "cpf_requerente": "11122233344",
                        "data_requerimento": "2024-05-10",
                        "data_nascimento_requerente": "1962-03-28",
                        "judicial": false,
                        "invalidez": false,
                        "cpf_responsavel_diligencia": ""
                    }))
                } else {
                    None
                },
                criado_em: agora - Duration::days(10 + i64::from(i)),
                atualizado_em: agora - Duration::days(i64::from(i)),
            });
        }

        let documentos = HashMap::from([(
            processos[0].id,
            vec![
                Documento {
                    id: 1,
                    numero: "98765432".to_string(),
                    tipo: "Requerimento".to_string(),
                    conteudo: "Requerimento de aposentadoria voluntária".to_string(),
                    link_acesso: "https://sei.mg.gov.br/documentos/98765432".to_string(),
                    data: "10/05/2024".to_string(),
                    unidade_geradora: "SCAP".to_string(),
                    assinaturas: vec![Assinatura {
                        nome: "José Pereira".to_string(),
                        cpf: "111.222.333-44".to_string(),
                    }],
                },
                Documento {
                    id: 2,
                    numero: "98765433".to_string(),
                    tipo: "Contagem de tempo".to_string(),
                    conteudo: "Certidão de contagem de tempo de contribuição".to_string(),
                    link_acesso: "https://sei.mg.gov.br/documentos/98765433".to_string(),
                    data: "11/05/2024".to_string(),
                    unidade_geradora: "SCAP".to_string(),
                    assinaturas: Vec::new(),
                },
            ],
        )]);

        let mut aposentadorias = Vec::new();
        for i in 0..25u32 {
            let status = STATUS_CICLO[(i as usize) % STATUS_CICLO.len()];
            aposentadorias.push(ProcessoAposentadoria {
                id: i64::from(i) + 1,
                processo_id: if i == 0 { processos[0].id } else { Uuid::new_v4() },
                numero: if i == 0 {
                    processos[0].numero.clone()
                } else {
                    format!("1190.01.{:07}/2024-{:02}", 2000 + i, 20 + i)
                },
                data_requerimento: agora - Duration::days(30 + i64::from(i)),
                cpf_requerente: "111.222.333-44".to_string(),
                data_nascimento_requerente: agora - Duration::days(365 * 62),
                invalidez: i % 5 == 0,
                judicial: i % 7 == 0,
                prioridade: i % 3 == 0,
                score: 100 - i as i32,
                status: status.to_string(),
                analista_id: if status == "EM_ANALISE" { Some(2) } else { None },
                analise_ia: None,
                criado_em: agora - Duration::days(30 + i64::from(i)),
                atualizado_em: agora - Duration::days(i64::from(i)),
            });
        }

        let historicos = vec![
            HistoricoStatus {
                id: 1,
                processo_aposentadoria_id: 1,
                status_anterior: None,
                status_novo: "ANALISE_PENDENTE".to_string(),
                usuario_id: None,
                observacao: None,
                alterado_em: agora - Duration::days(30),
            },
            HistoricoStatus {
                id: 2,
                processo_aposentadoria_id: 1,
                status_anterior: Some("ANALISE_PENDENTE".to_string()),
                status_novo: "EM_ANALISE".to_string(),
                usuario_id: Some(2),
                observacao: Some("Distribuído automaticamente".to_string()),
                alterado_em: agora - Duration::days(29),
            },
        ];

        let datalake_processos = vec![
            DatalakeProcesso {
                numero_processo: "1190.01.0009001/2024-90".to_string(),
                sigla_unidade: "SCAP".to_string(),
                data_recebimento: agora - Duration::days(3),
                unidade_geradora: UnidadeGeradora {
                    sigla_unidade: "SCAP".to_string(),
                    id_unidade: "110000123".to_string(),
                },
            },
            DatalakeProcesso {
                numero_processo: "1190.01.0009002/2024-91".to_string(),
                sigla_unidade: "SCAP".to_string(),
                data_recebimento: agora - Duration::days(2),
                unidade_geradora: UnidadeGeradora {
                    sigla_unidade: "SCAP".to_string(),
                    id_unidade: "110000123".to_string(),
                },
            },
            DatalakeProcesso {
                numero_processo: "1190.01.0009003/2024-92".to_string(),
                sigla_unidade: "DCGP".to_string(),
                data_recebimento: agora - Duration::days(1),
                unidade_geradora: UnidadeGeradora {
                    sigla_unidade: "DCGP".to_string(),
                    id_unidade: "110000456".to_string(),
                },
            },
        ];

        let servidores = vec![Servidor {
            id_pessoa: 1001,
            nome: "José Pereira".to_string(),
            masp: "345678-1".to_string(),
            cpf: "111.222.333-44".to_string(),
            sexo: "M".to_string(),
            data_nascimento: agora - Duration::days(365 * 62),
            possui_deficiencia: false,
        }];

        Self {
            usuarios,
            senhas,
            tokens: HashMap::new(),
            one_time_tokens,
            analistas,
            processos,
            documentos,
            aposentadorias,
            historicos,
            unidades,
            datalake_processos,
            servidores,
            next_usuario_id: 4,
        }
    }
}

pub type Db = Arc<RwLock<AppState>>;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(AppState::seed()));
    let api = Router::new()
        .route("/auth/entrar", post(entrar))
        .route("/auth/token", get(token_info))
        .route("/auth/cadastrar", post(cadastrar))
        .route("/auth/recuperar-senha", post(recuperar_senha))
        .route("/auth/redefinir-senha", post(redefinir_senha))
        .route("/auth/me", get(me))
        .route("/auth/me/analista", get(me_analista))
        .route("/usuarios", get(usuario_list).post(usuario_create))
        .route("/usuarios/{id}", get(usuario_get).delete(usuario_delete))
        .route("/usuarios/{id}/enviar-cadastro", post(enviar_cadastro))
        .route("/usuarios/{id}/analista", get(analista_get).post(analista_create))
        .route("/usuarios/{id}/analista/afastar", post(analista_afastar))
        .route("/usuarios/{id}/analista/retornar", post(analista_retornar))
        .route("/processos", get(processo_list).post(processo_create))
        .route("/processos/{id}", get(processo_get))
        .route("/processos/{id}/documentos", get(processo_documentos))
        .route("/aposentadoria", get(aposentadoria_list))
        .route("/aposentadoria/{id}", get(aposentadoria_get))
        .route("/aposentadoria/{id}/historico", get(aposentadoria_historico))
        .route("/analistas", get(analista_list))
        .route("/unidades", get(unidade_list))
        .route("/datalake/processos", get(datalake_processo_list))
        .route("/datalake/processos/unidades", get(datalake_unidade_list))
        .route("/datalake/servidores/{cpf}", get(datalake_servidor))
        .with_state(db);

    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Error helpers
// ---------------------------------------------------------------------------

fn erro(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
            errors: None,
        }),
    )
}

fn validacao(errors: HashMap<String, String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            message: "A validação dos dados falhou".to_string(),
            errors: Some(errors),
        }),
    )
}

fn nao_encontrado() -> ApiError {
    erro(StatusCode::NOT_FOUND, "O recurso solicitado não foi encontrado")
}

fn token_invalido() -> ApiError {
    erro(StatusCode::UNAUTHORIZED, "O token informado é inválido ou expirou.")
}

/// Resolves the bearer session token to a usuario id.
fn autenticar(state: &AppState, headers: &HeaderMap) -> Result<i64, ApiError> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token).copied())
        .ok_or_else(token_invalido)
}

/// Tolerant pagination parsing: invalid values fall back to the defaults,
/// limit is clamped to 1..=50.
fn parse_pagination(params: &HashMap<String, String>) -> (u32, u32) {
    let page = params
        .get("page")
        .and_then(|value| value.parse::<u32>().ok())
        .map_or(1, |page| page.max(1));
    let limit = params
        .get("limit")
        .and_then(|value| value.parse::<u32>().ok())
        .map_or(20, |limit| limit.clamp(1, 50));
    (page, limit)
}

fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Paginated<T> {
    let total_count = items.len() as u32;
    let offset = (page as usize - 1) * limit as usize;
    let data = items.iter().skip(offset).take(limit as usize).cloned().collect();
    Paginated::new(data, page, total_count, limit)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn entrar(State(db): State<Db>, Json(input): Json<EntrarRequest>) -> ApiResult<(StatusCode, Json<Token>)> {
    let mut state = db.write().await;

    let mut errors = HashMap::new();
    if input.cpf.is_empty() {
        errors.insert("cpf".to_string(), "deve ser informado".to_string());
    }
    if input.senha.is_empty() {
        errors.insert("senha".to_string(), "deve ser informada".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let usuario_id = state
        .usuarios
        .iter()
        .find(|usuario| usuario.cpf == input.cpf)
        .map(|usuario| usuario.id)
        .filter(|id| state.senhas.get(id) == Some(&input.senha))
        .ok_or_else(|| {
            debug!(cpf = %input.cpf, "credenciais rejeitadas");
            erro(StatusCode::UNAUTHORIZED, "CPF ou senha incorretos")
        })?;

    let token = Token {
        token: Uuid::new_v4().simple().to_string(),
        expira: Utc::now() + Duration::hours(24),
    };
    state.tokens.insert(token.token.clone(), usuario_id);

    Ok((StatusCode::CREATED, Json(token)))
}

async fn token_info(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Usuario>> {
    let state = db.read().await;

    let token = params.get("token").cloned().unwrap_or_default();
    let escopo = params.get("escopo").cloned().unwrap_or_default();
    if escopo != "setup" && escopo != "reset-senha" {
        return Err(erro(StatusCode::BAD_REQUEST, "Escopo inválido"));
    }

    let usuario_id = state
        .one_time_tokens
        .get(&token)
        .filter(|(_, token_escopo)| *token_escopo == escopo)
        .map(|(id, _)| *id)
        .ok_or_else(token_invalido)?;

    state
        .usuarios
        .iter()
        .find(|usuario| usuario.id == usuario_id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn cadastrar(State(db): State<Db>, Json(input): Json<CadastrarRequest>) -> ApiResult<StatusCode> {
    let mut state = db.write().await;

    let mut errors = HashMap::new();
    if input.senha.len() < 8 {
        errors.insert("senha".to_string(), "deve ter no mínimo 8 caracteres".to_string());
    }
    if input.senha != input.confirmar_senha {
        errors.insert("confirmar_senha".to_string(), "as senhas não coincidem".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let usuario_id = match state.one_time_tokens.get(&input.token) {
        Some((id, escopo)) if escopo == "setup" => *id,
        _ => return Err(token_invalido()),
    };

    state.one_time_tokens.remove(&input.token);
    state.senhas.insert(usuario_id, input.senha);
    if let Some(usuario) = state.usuarios.iter_mut().find(|usuario| usuario.id == usuario_id) {
        usuario.email_verificado = true;
        usuario.pendencias.clear();
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn recuperar_senha(
    State(_db): State<Db>,
    Json(input): Json<RecuperarSenhaRequest>,
) -> ApiResult<StatusCode> {
    if input.cpf.is_empty() {
        return Err(validacao(HashMap::from([(
            "cpf".to_string(),
            "deve ser informado".to_string(),
        )])));
    }

    // The recovery e-mail is queued out of band; unknown CPFs are
    // deliberately indistinguishable from known ones.
    Ok(StatusCode::ACCEPTED)
}

async fn redefinir_senha(
    State(db): State<Db>,
    Json(input): Json<RedefinirSenhaRequest>,
) -> ApiResult<StatusCode> {
    let mut state = db.write().await;

    let mut errors = HashMap::new();
    if input.senha.len() < 8 {
        errors.insert("senha".to_string(), "deve ter no mínimo 8 caracteres".to_string());
    }
    if input.senha != input.confirmar_senha {
        errors.insert("confirmar_senha".to_string(), "as senhas não coincidem".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let usuario_id = match state.one_time_tokens.get(&input.token) {
        Some((id, escopo)) if escopo == "reset-senha" => *id,
        _ => return Err(token_invalido()),
    };

    state.one_time_tokens.remove(&input.token);
    state.senhas.insert(usuario_id, input.senha);

    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Usuario>> {
    let state = db.read().await;
    let usuario_id = autenticar(&state, &headers)?;

    state
        .usuarios
        .iter()
        .find(|usuario| usuario.id == usuario_id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn me_analista(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Analista>> {
    let state = db.read().await;
    let usuario_id = autenticar(&state, &headers)?;

    state
        .analistas
        .iter()
        .find(|analista| analista.usuario_id == usuario_id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

// ---------------------------------------------------------------------------
// Usuários
// ---------------------------------------------------------------------------

async fn usuario_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Usuario>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    let papel = params.get("papel").map(String::as_str).unwrap_or_default();
    let usuarios = state
        .usuarios
        .iter()
        .filter(|usuario| papel.is_empty() || usuario.papel.as_deref() == Some(papel))
        .cloned()
        .collect();

    Ok(Json(usuarios))
}

async fn usuario_create(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UsuarioCreateRequest>,
) -> ApiResult<(StatusCode, Json<Usuario>)> {
    let mut state = db.write().await;
    autenticar(&state, &headers)?;

    let mut errors = HashMap::new();
    if input.nome.is_empty() {
        errors.insert("nome".to_string(), "deve ser informado".to_string());
    }
    if input.cpf.is_empty() {
        errors.insert("cpf".to_string(), "deve ser informado".to_string());
    }
    if input.email.is_empty() || !input.email.contains('@') {
        errors.insert("email".to_string(), "deve ser um endereço válido".to_string());
    }
    if !PAPEIS.contains(&input.papel.as_str()) {
        errors.insert("papel".to_string(), "deve ser um papel válido".to_string());
    }
    if state.usuarios.iter().any(|usuario| usuario.cpf == input.cpf) {
        errors.insert("cpf".to_string(), "já está em uso".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let usuario = Usuario {
        id: state.next_usuario_id,
        nome: input.nome,
        cpf: input.cpf,
        email: input.email,
        email_verificado: false,
        papel: Some(input.papel),
        pendencias: vec![Pendencia {
            slug: "finalizar-cadastro".to_string(),
            titulo: "Finalizar cadastro".to_string(),
        }],
    };
    state.next_usuario_id += 1;
    state.usuarios.push(usuario.clone());

    Ok((StatusCode::CREATED, Json(usuario)))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| nao_encontrado())
}

async fn usuario_get(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Usuario>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    state
        .usuarios
        .iter()
        .find(|usuario| usuario.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn usuario_delete(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut state = db.write().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    let before = state.usuarios.len();
    state.usuarios.retain(|usuario| usuario.id != id);
    if state.usuarios.len() == before {
        return Err(nao_encontrado());
    }
    state.senhas.remove(&id);

    Ok(StatusCode::NO_CONTENT)
}

async fn enviar_cadastro(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    if !state.usuarios.iter().any(|usuario| usuario.id == id) {
        return Err(nao_encontrado());
    }

    Ok(StatusCode::ACCEPTED)
}

async fn analista_get(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Analista>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    state
        .analistas
        .iter()
        .find(|analista| analista.usuario_id == id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn analista_create(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<AnalistaCreateRequest>,
) -> ApiResult<(StatusCode, Json<Analista>)> {
    let mut state = db.write().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    if !state.usuarios.iter().any(|usuario| usuario.id == id) {
        return Err(nao_encontrado());
    }

    let mut errors = HashMap::new();
    if input.orgao.is_empty() {
        errors.insert("orgao".to_string(), "deve ser informado".to_string());
    }
    let unidade = state.unidades.iter().find(|unidade| unidade.id == input.unidade_id);
    if unidade.is_none() {
        errors.insert("unidade_id".to_string(), "deve ser uma unidade conhecida".to_string());
    }
    if state.analistas.iter().any(|analista| analista.usuario_id == id) {
        errors.insert("usuario_id".to_string(), "já possui perfil de analista".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let unidade = unidade.cloned().ok_or_else(nao_encontrado)?;
    let analista = Analista {
        usuario_id: id,
        orgao: input.orgao,
        sei_unidade_id: unidade.id,
        sei_unidade_sigla: unidade.sigla,
        afastado: false,
        ultima_atribuicao_em: None,
    };
    state.analistas.push(analista.clone());

    Ok((StatusCode::CREATED, Json(analista)))
}

async fn analista_afastar(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    set_afastado(db, headers, &id, true).await
}

async fn analista_retornar(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    set_afastado(db, headers, &id, false).await
}

async fn set_afastado(db: Db, headers: HeaderMap, raw_id: &str, afastado: bool) -> ApiResult<StatusCode> {
    let mut state = db.write().await;
    autenticar(&state, &headers)?;
    let id = parse_id(raw_id)?;

    let analista = state
        .analistas
        .iter_mut()
        .find(|analista| analista.usuario_id == id)
        .ok_or_else(nao_encontrado)?;
    analista.afastado = afastado;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Processos
// ---------------------------------------------------------------------------

async fn processo_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Paginated<Processo>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    let (page, limit) = parse_pagination(&params);
    let numero = params.get("numero").map(String::as_str).unwrap_or_default();
    let filtered: Vec<Processo> = state
        .processos
        .iter()
        .filter(|processo| numero.is_empty() || processo.numero.contains(numero))
        .cloned()
        .collect();

    Ok(Json(paginate(&filtered, page, limit)))
}

async fn processo_create(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ProcessoCreateRequest>,
) -> ApiResult<(StatusCode, Json<Processo>)> {
    let mut state = db.write().await;
    autenticar(&state, &headers)?;

    let mut errors = HashMap::new();
    if input.numero.is_empty() {
        errors.insert("numero".to_string(), "deve ser informado".to_string());
    }
    if state.processos.iter().any(|processo| processo.numero == input.numero) {
        errors.insert("numero".to_string(), "já está cadastrado".to_string());
    }
    if !errors.is_empty() {
        return Err(validacao(errors));
    }

    let agora = Utc::now();
    let processo = Processo {
        id: Uuid::new_v4(),
        numero: input.numero,
        status: "RECEBIDO".to_string(),
        link_acesso: String::new(),
        sei_unidade_id: "110000123".to_string(),
        sei_unidade_sigla: "SCAP".to_string(),
        aposentadoria: None,
        analisado_em: None,
        metadados_ia: None,
        criado_em: agora,
        atualizado_em: agora,
    };
    state.processos.push(processo.clone());

    Ok((StatusCode::CREATED, Json(processo)))
}

async fn processo_get(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Processo>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = Uuid::parse_str(&id).map_err(|_| nao_encontrado())?;

    state
        .processos
        .iter()
        .find(|processo| processo.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn processo_documentos(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Documento>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = Uuid::parse_str(&id).map_err(|_| nao_encontrado())?;

    if !state.processos.iter().any(|processo| processo.id == id) {
        return Err(nao_encontrado());
    }

    Ok(Json(state.documentos.get(&id).cloned().unwrap_or_default()))
}

// ---------------------------------------------------------------------------
// Aposentadoria
// ---------------------------------------------------------------------------

async fn aposentadoria_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Paginated<ProcessoAposentadoria>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    let (page, limit) = parse_pagination(&params);
    let numero = params.get("numero").map(String::as_str).unwrap_or_default();
    let status = params.get("status").map(String::as_str).unwrap_or_default();
    let filtered: Vec<ProcessoAposentadoria> = state
        .aposentadorias
        .iter()
        .filter(|pa| numero.is_empty() || pa.numero.contains(numero))
        .filter(|pa| status.is_empty() || pa.status == status)
        .cloned()
        .collect();

    Ok(Json(paginate(&filtered, page, limit)))
}

async fn aposentadoria_get(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<ProcessoAposentadoria>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    state
        .aposentadorias
        .iter()
        .find(|pa| pa.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}

async fn aposentadoria_historico(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<HistoricoStatus>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    let id = parse_id(&id)?;

    if !state.aposentadorias.iter().any(|pa| pa.id == id) {
        return Err(nao_encontrado());
    }

    let historico = state
        .historicos
        .iter()
        .filter(|registro| registro.processo_aposentadoria_id == id)
        .cloned()
        .collect();

    Ok(Json(historico))
}

// ---------------------------------------------------------------------------
// Analistas, unidades, datalake
// ---------------------------------------------------------------------------

async fn analista_list(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<Analista>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    Ok(Json(state.analistas.clone()))
}

async fn unidade_list(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<UnidadeSei>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;
    Ok(Json(state.unidades.clone()))
}

async fn datalake_processo_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<DatalakeProcesso>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    let unidade = params.get("unidade").map(String::as_str).unwrap_or_default();
    if unidade.is_empty() {
        return Err(erro(StatusCode::BAD_REQUEST, "O parâmetro 'unidade' deve ser informado"));
    }

    let processos = state
        .datalake_processos
        .iter()
        .filter(|processo| processo.sigla_unidade == unidade)
        .cloned()
        .collect();

    Ok(Json(processos))
}

async fn datalake_unidade_list(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Vec<String>>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    let mut unidades: Vec<String> = state
        .datalake_processos
        .iter()
        .map(|processo| processo.sigla_unidade.clone())
        .collect();
    unidades.sort();
    unidades.dedup();

    Ok(Json(unidades))
}

async fn datalake_servidor(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(cpf): Path<String>,
) -> ApiResult<Json<Servidor>> {
    let state = db.read().await;
    autenticar(&state, &headers)?;

    state
        .servidores
        .iter()
        .find(|servidor| servidor.cpf == cpf)
        .cloned()
        .map(Json)
        .ok_or_else(nao_encontrado)
}
