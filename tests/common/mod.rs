#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use farmacia_web::{app, config::AppConfig, AppState};

pub const SENHA: &str = "123";
pub const CLIENTE: &str = "ana@farmacia.com";
pub const OUTRO_CLIENTE: &str = "davi@farmacia.com";
pub const FUNCIONARIO: &str = "bruno@farmacia.com";
pub const ADMIN: &str = "carla@farmacia.com";

// ---------------------------------------------------------------------------
// Mock pharmacy API
// ---------------------------------------------------------------------------

/// In-memory records served by the mock API
#[derive(Debug)]
pub struct MockData {
    pub pessoas: Vec<Value>,
    pub produtos: Vec<Value>,
    pub vendas: Vec<Value>,
    /// Answer 401 to every authenticated call
    pub reject_tokens: bool,
    /// Body of the last `/venda/create`
    pub last_venda_request: Option<Value>,
}

impl MockData {
    fn seeded() -> Self {
        let pessoa = |id: i64, nome: &str, email: &str, tipo: &str, cpf: &str| {
            json!({
                "id": id, "nome": nome, "cpf": cpf, "telefone": "(11) 99999-8888",
                "email": email, "senha": SENHA, "tipoUsuario": tipo, "dataExclusao": null
            })
        };
        let mut inativa = pessoa(5, "Eva Inativa", "eva@farmacia.com", "USER", "11144477735");
        inativa["dataExclusao"] = json!("2025-01-15");

        Self {
            pessoas: vec![
                pessoa(1, "Ana Cliente", CLIENTE, "USER", "529.982.247-25"),
                pessoa(2, "Bruno Funcionario", FUNCIONARIO, "EMPLOY", "39053344705"),
                pessoa(3, "Carla Admin", ADMIN, "ADMIN", "15350946056"),
                pessoa(4, "Davi Cliente", OUTRO_CLIENTE, "USER", "86288366757"),
                inativa,
            ],
            produtos: vec![
                json!({"idProduto": 1, "nome": "Dipirona", "preco": 12.5, "descricao": "Analgésico",
                       "linkImagem": null, "dataValidade": "2030-01-01", "fabricante": "EMS", "dataExclusao": null}),
                json!({"idProduto": 2, "nome": "Paracetamol", "preco": 8.9, "descricao": "Antitérmico",
                       "linkImagem": "", "dataValidade": [2030, 6, 1], "fabricante": "Medley", "dataExclusao": null}),
                json!({"idProduto": 3, "nome": "Xarope Antigo", "preco": 20, "descricao": "Fora de linha",
                       "linkImagem": null, "dataValidade": "2024-01-01", "fabricante": "EMS", "dataExclusao": "2024-06-01"}),
            ],
            vendas: Vec::new(),
            reject_tokens: false,
            last_venda_request: None,
        }
        .with_sale(4, "2025-01-10", &[(1, 2)])
        .with_sale(1, "2025-02-20", &[(2, 1)])
    }

    fn with_sale(mut self, id_usuario: i64, data: &str, itens: &[(i64, u32)]) -> Self {
        let id = self.vendas.len() as i64 + 1;
        let venda = self.build_venda(id, id_usuario, data, itens);
        self.vendas.push(venda);
        self
    }

    fn find(list: &[Value], key: &str, id: i64) -> Option<usize> {
        list.iter().position(|v| v[key].as_i64() == Some(id))
    }

    fn build_venda(&self, id: i64, id_usuario: i64, data: &str, itens: &[(i64, u32)]) -> Value {
        let usuario = Self::find(&self.pessoas, "id", id_usuario)
            .map(|i| self.pessoas[i].clone())
            .unwrap_or(Value::Null);
        let itens: Vec<Value> = itens
            .iter()
            .filter_map(|(id_produto, quantidade)| {
                let produto = &self.produtos[Self::find(&self.produtos, "idProduto", *id_produto)?];
                let preco = produto["preco"].as_f64().unwrap_or_default();
                Some(json!({
                    "idProduto": id_produto,
                    "nomeProduto": produto["nome"],
                    "quantidade": quantidade,
                    "precoUnitario": preco,
                    "subTotal": preco * f64::from(*quantidade),
                }))
            })
            .collect();
        json!({"idVenda": id, "usuario": usuario, "dataCompra": data, "dataExclusao": null, "itens": itens})
    }
}

type Shared = Arc<Mutex<MockData>>;

/// Pharmacy API stand-in listening on a free local port
pub struct MockApi {
    pub base_url: String,
    pub data: Shared,
}

impl MockApi {
    pub fn data(&self) -> std::sync::MutexGuard<'_, MockData> {
        self.data.lock().expect("mock data lock")
    }
}

pub async fn spawn_mock_api() -> Result<MockApi> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock API")?;
    let data: Shared = Arc::new(Mutex::new(MockData::seeded()));

    let router = Router::new()
        .route("/login", post(mock_login))
        .route("/register", post(mock_register))
        .route("/pessoa/all", get(|s: State<Shared>, h: HeaderMap| list(s, h, "pessoas")))
        .route("/pessoa/create", post(mock_create_pessoa))
        .route("/pessoa/update/:id", put(mock_update_pessoa))
        .route("/pessoa/delete/:id", delete(|s: State<Shared>, h: HeaderMap, p: Path<i64>| soft_delete(s, h, p, "pessoas")))
        .route("/pessoa/:id", get(|s: State<Shared>, h: HeaderMap, p: Path<i64>| show(s, h, p, "pessoas")))
        .route("/produto/all", get(|s: State<Shared>, h: HeaderMap| list(s, h, "produtos")))
        .route("/produto/create", post(mock_create_produto))
        .route("/produto/update/:id", put(mock_update_produto))
        .route("/produto/delete/:id", delete(|s: State<Shared>, h: HeaderMap, p: Path<i64>| soft_delete(s, h, p, "produtos")))
        .route("/produto/:id", get(|s: State<Shared>, h: HeaderMap, p: Path<i64>| show(s, h, p, "produtos")))
        .route("/venda/all", get(|s: State<Shared>, h: HeaderMap| list(s, h, "vendas")))
        .route("/venda/create", post(mock_create_venda))
        .route("/venda/update/:id", put(mock_update_venda))
        .route("/venda/delete/:id", delete(|s: State<Shared>, h: HeaderMap, p: Path<i64>| soft_delete(s, h, p, "vendas")))
        .route("/venda/:id", get(|s: State<Shared>, h: HeaderMap, p: Path<i64>| show(s, h, p, "vendas")))
        .with_state(data.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(MockApi {
        base_url: format!("http://127.0.0.1:{}", port),
        data,
    })
}

/// Unsigned-looking HS256 token as the pharmacy API would issue it
pub fn token_for(email: &str, expires_in_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    encode(
        &Header::default(),
        &json!({"sub": email, "iat": now, "exp": now + expires_in_secs}),
        &EncodingKey::from_secret(b"mock-secret"),
    )
    .expect("encode token")
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Token inválido"}))).into_response()
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{} não encontrado", what)).into_response()
}

fn authorized(data: &MockData, headers: &HeaderMap) -> bool {
    !data.reject_tokens
        && headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Bearer ") && v.len() > 7)
}

fn collection<'a>(data: &'a mut MockData, name: &str) -> (&'a mut Vec<Value>, &'static str) {
    match name {
        "pessoas" => (&mut data.pessoas, "id"),
        "produtos" => (&mut data.produtos, "idProduto"),
        _ => (&mut data.vendas, "idVenda"),
    }
}

async fn list(State(data): State<Shared>, headers: HeaderMap, name: &'static str) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let (items, _) = collection(&mut data, name);
    Json(items.clone()).into_response()
}

async fn show(State(data): State<Shared>, headers: HeaderMap, Path(id): Path<i64>, name: &'static str) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let (items, key) = collection(&mut data, name);
    match MockData::find(items, key, id) {
        Some(i) => Json(items[i].clone()).into_response(),
        None => not_found(name),
    }
}

async fn soft_delete(State(data): State<Shared>, headers: HeaderMap, Path(id): Path<i64>, name: &'static str) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let (items, key) = collection(&mut data, name);
    match MockData::find(items, key, id) {
        Some(i) => {
            items[i]["dataExclusao"] = json!("2025-11-05");
            "Registro excluído com sucesso".into_response()
        }
        None => not_found(name),
    }
}

async fn mock_login(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let data = data.lock().expect("lock");
    let email = body["email"].as_str().unwrap_or_default();
    let senha = body["senha"].as_str().unwrap_or_default();
    let ok = data
        .pessoas
        .iter()
        .any(|p| p["email"] == email && p["senha"] == senha && p["dataExclusao"].is_null());
    if !ok {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"}))).into_response();
    }
    Json(json!({"token": token_for(email, 3600)})).into_response()
}

fn insert_pessoa(data: &mut MockData, mut body: Value, tipo: Option<&str>) -> Response {
    if data.pessoas.iter().any(|p| p["email"] == body["email"]) {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "Email já cadastrado"}))).into_response();
    }
    let id = data.pessoas.len() as i64 + 1;
    body["id"] = json!(id);
    body["dataExclusao"] = Value::Null;
    if let Some(tipo) = tipo {
        body["tipoUsuario"] = json!(tipo);
    }
    data.pessoas.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn mock_register(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().expect("lock");
    insert_pessoa(&mut data, body, Some("USER"))
}

async fn mock_create_pessoa(State(data): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    insert_pessoa(&mut data, body, None)
}

async fn mock_update_pessoa(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let Some(i) = MockData::find(&data.pessoas, "id", id) else {
        return not_found("pessoas");
    };
    let pessoa = &mut data.pessoas[i];
    for key in ["nome", "cpf", "telefone", "email", "senha", "tipoUsuario"] {
        if let Some(v) = body.get(key) {
            pessoa[key] = v.clone();
        }
    }
    Json(pessoa.clone()).into_response()
}

async fn mock_create_produto(State(data): State<Shared>, headers: HeaderMap, Json(mut body): Json<Value>) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    body["idProduto"] = json!(data.produtos.len() as i64 + 1);
    body["dataExclusao"] = Value::Null;
    data.produtos.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn mock_update_produto(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let Some(i) = MockData::find(&data.produtos, "idProduto", id) else {
        return not_found("produtos");
    };
    let mut produto = body;
    produto["idProduto"] = json!(id);
    produto["dataExclusao"] = Value::Null;
    data.produtos[i] = produto.clone();
    Json(produto).into_response()
}

fn sale_items(body: &Value) -> Vec<(i64, u32)> {
    body["itens"]
        .as_array()
        .map(|itens| {
            itens
                .iter()
                .filter_map(|i| Some((i["idProduto"].as_i64()?, i["quantidade"].as_u64()? as u32)))
                .collect()
        })
        .unwrap_or_default()
}

async fn mock_create_venda(State(data): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let id = data.vendas.len() as i64 + 1;
    let id_usuario = body["idUsuario"].as_i64().unwrap_or_default();
    let venda = data.build_venda(id, id_usuario, "2025-11-05", &sale_items(&body));
    data.vendas.push(venda.clone());
    data.last_venda_request = Some(body);
    (StatusCode::CREATED, Json(venda)).into_response()
}

async fn mock_update_venda(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().expect("lock");
    if !authorized(&data, &headers) {
        return unauthorized();
    }
    let Some(i) = MockData::find(&data.vendas, "idVenda", id) else {
        return not_found("vendas");
    };
    let data_compra = data.vendas[i]["dataCompra"].as_str().unwrap_or("2025-11-05").to_string();
    let id_usuario = body["idUsuario"].as_i64().unwrap_or_default();
    let venda = data.build_venda(id, id_usuario, &data_compra, &sale_items(&body));
    data.vendas[i] = venda.clone();
    Json(venda).into_response()
}

// ---------------------------------------------------------------------------
// Front-end under test
// ---------------------------------------------------------------------------

/// Outcome of one request to the front-end
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: String,
}

impl Page {
    /// `name=value` of the session cookie set by this response, if any
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookies
            .iter()
            .find(|c| c.starts_with("farmacia_sid="))
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }

    pub fn clears_session_cookie(&self) -> bool {
        self.set_cookies
            .iter()
            .any(|c| c.starts_with("farmacia_sid=;") && c.contains("Max-Age=0"))
    }

    pub fn redirects_to(&self, path: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(path)
    }
}

pub struct Front {
    router: Router,
    pub state: AppState,
    pub api: MockApi,
}

impl Front {
    pub async fn start() -> Result<Self> {
        let api = spawn_mock_api().await?;
        Self::with_api(api)
    }

    pub fn with_api(api: MockApi) -> Result<Self> {
        let mut config = AppConfig::development().with_backend_url(&api.base_url);
        config.server.enable_request_logging = false;
        let state = AppState::new(config)?;
        Ok(Self {
            router: app(state.clone()),
            state,
            api,
        })
    }

    async fn send(&self, request: Request<Body>) -> Result<Page> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(Page {
            status,
            location,
            set_cookies,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<Page> {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&self, path: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Result<Page> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    /// Log in and return the session cookie
    pub async fn login(&self, email: &str) -> Result<String> {
        let page = self.post_form("/login", None, &[("email", email), ("senha", SENHA)]).await?;
        anyhow::ensure!(page.status == StatusCode::SEE_OTHER, "login failed: {:?}", page);
        page.session_cookie().context("login did not set a session cookie")
    }
}
