use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, ErrorResponse, Paginated, Processo, ProcessoAposentadoria, Token, Usuario};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

/// Logs in with the seeded GESTOR credential and returns the session token.
async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/entrar",
            r#"{"cpf":"123.456.789-01","senha":"password1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let token: Token = body_json(resp).await;
    token.token
}

// --- auth ---

#[tokio::test]
async fn entrar_returns_201_with_token() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/entrar",
            r#"{"cpf":"123.456.789-01","senha":"password1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let token: Token = body_json(resp).await;
    assert!(!token.token.is_empty());
    assert!(token.expira > chrono::Utc::now());
}

#[tokio::test]
async fn entrar_rejects_wrong_credentials() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/entrar",
            r#"{"cpf":"123.456.789-01","senha":"wrong"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let erro: ErrorResponse = body_json(resp).await;
    assert_eq!(erro.message, "CPF ou senha incorretos");
}

#[tokio::test]
async fn entrar_validates_missing_fields() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/api/v1/auth/entrar", r#"{"cpf":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let erro: ErrorResponse = body_json(resp).await;
    let errors = erro.errors.unwrap();
    assert!(errors.contains_key("cpf"));
    assert!(errors.contains_key("senha"));
}

#[tokio::test]
async fn me_requires_token() {
    let app = app();
    let resp = app.oneshot(get_request("/api/v1/auth/me", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_logged_in_usuario() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let usuario: Usuario = body_json(resp).await;
    assert_eq!(usuario.cpf, "123.456.789-01");
    assert_eq!(usuario.papel.as_deref(), Some("GESTOR"));
}

#[tokio::test]
async fn token_info_rejects_unknown_escopo() {
    let app = app();
    let resp = app
        .oneshot(get_request("/api/v1/auth/token?token=tok-setup-ana&escopo=auth", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_info_resolves_setup_token_owner() {
    let app = app();
    let resp = app
        .oneshot(get_request("/api/v1/auth/token?token=tok-setup-ana&escopo=setup", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let usuario: Usuario = body_json(resp).await;
    assert_eq!(usuario.nome, "Ana Castro");
    assert!(!usuario.email_verificado);
}

#[tokio::test]
async fn cadastrar_finishes_pending_account() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/cadastrar",
            r#"{"token":"tok-setup-ana","senha":"novasenha1","confirmar_senha":"novasenha1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The new credential must now log in.
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/entrar",
            r#"{"cpf":"111.444.777-35","senha":"novasenha1"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn cadastrar_rejects_mismatched_passwords() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/cadastrar",
            r#"{"token":"tok-setup-ana","senha":"novasenha1","confirmar_senha":"outra"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let erro: ErrorResponse = body_json(resp).await;
    assert!(erro.errors.unwrap().contains_key("confirmar_senha"));
}

#[tokio::test]
async fn recuperar_senha_is_accepted() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/recuperar-senha",
            r#"{"cpf":"123.456.789-01"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

// --- usuarios ---

#[tokio::test]
async fn usuario_create_validates_papel() {
    let app = app();
    let token = login(&app).await;

    let mut request = json_request(
        "POST",
        "/api/v1/usuarios",
        r#"{"nome":"Novo Usuário","cpf":"222.333.444-55","email":"novo@example.org","papel":"ESTAGIARIO"}"#,
    );
    request
        .headers_mut()
        .insert(http::header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());

    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let erro: ErrorResponse = body_json(resp).await;
    assert!(erro.errors.unwrap().contains_key("papel"));
}

#[tokio::test]
async fn usuario_create_then_get() {
    let app = app();
    let token = login(&app).await;

    let mut request = json_request(
        "POST",
        "/api/v1/usuarios",
        r#"{"nome":"Novo Usuário","cpf":"222.333.444-55","email":"novo@example.org","papel":"ANALISTA"}"#,
    );
    request
        .headers_mut()
        .insert(http::header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());

    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let criado: Usuario = body_json(resp).await;
    assert!(!criado.email_verificado);
    assert_eq!(criado.pendencias[0].slug, "finalizar-cadastro");

    let resp = app
        .oneshot(get_request(&format!("/api/v1/usuarios/{}", criado.id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let buscado: Usuario = body_json(resp).await;
    assert_eq!(buscado.cpf, "222.333.444-55");
}

#[tokio::test]
async fn usuario_list_filters_by_papel() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/usuarios?papel=ANALISTA", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let usuarios: Vec<Usuario> = body_json(resp).await;
    assert!(!usuarios.is_empty());
    assert!(usuarios.iter().all(|u| u.papel.as_deref() == Some("ANALISTA")));
}

// --- processos ---

#[tokio::test]
async fn processos_use_default_pagination() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/processos", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Paginated<Processo> = body_json(resp).await;
    assert_eq!(page.current_page, 1);
    assert_eq!(page.limit, 20);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next);
    assert!(!page.has_previous);
}

// --- aposentadoria ---

#[tokio::test]
async fn aposentadoria_envelope_matches_seeded_queue() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/aposentadoria?page=2&limit=10", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Paginated<ProcessoAposentadoria> = body_json(resp).await;
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.data.len(), 10);
    assert!(page.has_next);
    assert!(page.has_previous);
}

#[tokio::test]
async fn aposentadoria_filters_by_status() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/aposentadoria?status=EM_ANALISE", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Paginated<ProcessoAposentadoria> = body_json(resp).await;
    assert!(!page.data.is_empty());
    assert!(page.data.iter().all(|pa| pa.status == "EM_ANALISE"));
}

// --- datalake ---

#[tokio::test]
async fn datalake_processos_require_unidade() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/datalake/processos", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let erro: ErrorResponse = body_json(resp).await;
    assert_eq!(erro.message, "O parâmetro 'unidade' deve ser informado");
}

#[tokio::test]
async fn datalake_servidor_unknown_cpf_is_404() {
    let app = app();
    let token = login(&app).await;

    let resp = app
        .oneshot(get_request("/api/v1/datalake/servidores/000.000.000-00", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
