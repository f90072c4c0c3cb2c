use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::BackendError;
use crate::config::BackendConfig;
use crate::models::{
    LoginRequest, LoginResponse, Pessoa, PessoaRequest, Produto, ProdutoRequest,
    Venda, VendaRequest,
};

pub type BackendResult<T> = Result<T, BackendError>;

/// HTTP client for the pharmacy REST API.
///
/// Every call is a single direct request; nothing is cached or retried.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---------------------------------------------------------------------
    // Authentication
    // ---------------------------------------------------------------------

    /// POST /login, returns the bearer token
    pub async fn login(&self, email: &str, senha: &str) -> BackendResult<String> {
        let body = LoginRequest {
            email: email.to_string(),
            senha: senha.to_string(),
        };
        let req = self.http.post(self.url("/login")).json(&body);
        let response: LoginResponse = send_json(req).await?;
        Ok(response.token)
    }

    /// POST /register, public client sign-up
    pub async fn register(&self, pessoa: &PessoaRequest) -> BackendResult<Pessoa> {
        let req = self.http.post(self.url("/register")).json(pessoa);
        send_json(req).await
    }

    // ---------------------------------------------------------------------
    // Pessoa
    // ---------------------------------------------------------------------

    pub async fn list_pessoas(&self, token: &str) -> BackendResult<Vec<Pessoa>> {
        send_json(self.http.get(self.url("/pessoa/all")).bearer_auth(token)).await
    }

    pub async fn get_pessoa(&self, token: &str, id: i64) -> BackendResult<Pessoa> {
        send_json(self.http.get(self.url(&format!("/pessoa/{}", id))).bearer_auth(token)).await
    }

    pub async fn create_pessoa(&self, token: &str, pessoa: &PessoaRequest) -> BackendResult<Pessoa> {
        let req = self.http.post(self.url("/pessoa/create")).bearer_auth(token).json(pessoa);
        send_json(req).await
    }

    pub async fn update_pessoa(&self, token: &str, id: i64, pessoa: &PessoaRequest) -> BackendResult<Pessoa> {
        let req = self
            .http
            .put(self.url(&format!("/pessoa/update/{}", id)))
            .bearer_auth(token)
            .json(pessoa);
        send_json(req).await
    }

    /// Soft delete: the backend only sets `dataExclusao`
    pub async fn delete_pessoa(&self, token: &str, id: i64) -> BackendResult<String> {
        send_text(self.http.delete(self.url(&format!("/pessoa/delete/{}", id))).bearer_auth(token)).await
    }

    // ---------------------------------------------------------------------
    // Produto
    // ---------------------------------------------------------------------

    pub async fn list_produtos(&self, token: &str) -> BackendResult<Vec<Produto>> {
        send_json(self.http.get(self.url("/produto/all")).bearer_auth(token)).await
    }

    pub async fn get_produto(&self, token: &str, id: i64) -> BackendResult<Produto> {
        send_json(self.http.get(self.url(&format!("/produto/{}", id))).bearer_auth(token)).await
    }

    pub async fn create_produto(&self, token: &str, produto: &ProdutoRequest) -> BackendResult<Produto> {
        let req = self.http.post(self.url("/produto/create")).bearer_auth(token).json(produto);
        send_json(req).await
    }

    pub async fn update_produto(&self, token: &str, id: i64, produto: &ProdutoRequest) -> BackendResult<Produto> {
        let req = self
            .http
            .put(self.url(&format!("/produto/update/{}", id)))
            .bearer_auth(token)
            .json(produto);
        send_json(req).await
    }

    pub async fn delete_produto(&self, token: &str, id: i64) -> BackendResult<String> {
        send_text(self.http.delete(self.url(&format!("/produto/delete/{}", id))).bearer_auth(token)).await
    }

    // ---------------------------------------------------------------------
    // Venda
    // ---------------------------------------------------------------------

    pub async fn list_vendas(&self, token: &str) -> BackendResult<Vec<Venda>> {
        send_json(self.http.get(self.url("/venda/all")).bearer_auth(token)).await
    }

    pub async fn get_venda(&self, token: &str, id: i64) -> BackendResult<Venda> {
        send_json(self.http.get(self.url(&format!("/venda/{}", id))).bearer_auth(token)).await
    }

    pub async fn create_venda(&self, token: &str, venda: &VendaRequest) -> BackendResult<Venda> {
        let req = self.http.post(self.url("/venda/create")).bearer_auth(token).json(venda);
        send_json(req).await
    }

    pub async fn update_venda(&self, token: &str, id: i64, venda: &VendaRequest) -> BackendResult<Venda> {
        let req = self
            .http
            .put(self.url(&format!("/venda/update/{}", id)))
            .bearer_auth(token)
            .json(venda);
        send_json(req).await
    }

    pub async fn delete_venda(&self, token: &str, id: i64) -> BackendResult<String> {
        send_text(self.http.delete(self.url(&format!("/venda/delete/{}", id))).bearer_auth(token)).await
    }

    // ---------------------------------------------------------------------
    // Health
    // ---------------------------------------------------------------------

    /// Reachability probe: any HTTP answer, even 401/403, means the API is up
    pub async fn health(&self) -> BackendResult<u16> {
        let response = self.http.get(self.url("/produto/all")).send().await?;
        Ok(response.status().as_u16())
    }
}

async fn ensure_success(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = BackendError::from_status(status, &body);
    tracing::warn!("Backend answered {}: {}", status.as_u16(), err.detail());
    Err(err)
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> BackendResult<T> {
    let response = ensure_success(req.send().await?).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!("Failed to decode backend payload: {}", e);
        BackendError::Decode(e.to_string())
    })
}

async fn send_text(req: RequestBuilder) -> BackendResult<String> {
    let response = ensure_success(req.send().await?).await?;
    Ok(response.text().await?)
}
