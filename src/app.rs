// Router: public pages, then one guarded group per access level

use axum::{
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::handlers::{elevated, elevated::PersonKind, protected, public};
use crate::middleware::{guard, Access, ADMIN_ONLY, STAFF};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let request_logging = state.config.server.enable_request_logging;

    let router = Router::new()
        .merge(public_routes())
        .merge(client_routes(&state))
        .merge(staff_routes(&state))
        .merge(admin_routes(&state))
        .merge(person_routes(&state, PersonKind::Cliente))
        .merge(person_routes(&state, PersonKind::Funcionario))
        .merge(person_routes(&state, PersonKind::Administrador))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive());

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::inicial))
        .route("/login", get(public::login_page).post(public::login))
        .route("/login-adm", get(public::login_adm_page))
        .route("/login-cliente", get(public::login_cliente_page))
        .route("/logout", post(public::logout))
        .route(
            "/cadastro-cliente",
            get(public::cadastro_cliente_page).post(public::cadastro_cliente),
        )
        .route("/health", get(public::health))
        .route("/static/app.css", get(stylesheet))
}

fn client_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/homeCliente", get(protected::home_cliente))
        .route("/produtosCliente", get(protected::produtos_cliente))
        .route(
            "/detalhesProdutoCliente/:id",
            get(protected::produto_cliente).post(protected::adicionar_ao_carrinho),
        )
        .route("/carrinho", get(protected::carrinho))
        .route("/carrinho/atualizar", post(protected::atualizar_item))
        .route("/carrinho/remover", post(protected::remover_item))
        .route("/carrinho/limpar", post(protected::limpar_carrinho))
        .route("/carrinho/comprar", post(protected::comprar_selecionados))
        .route("/simulaPagamento", get(protected::pagamento).post(protected::pagar))
        .route("/minhasCompras", get(protected::minhas_compras))
        .route("/detalhesCompra/:id", get(protected::detalhes_compra))
        .route_layer(from_fn_with_state((state.clone(), Access::Authenticated), guard::require))
}

fn staff_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/homeAdm", get(elevated::home_adm))
        // Products
        .route("/listarProdutos", get(elevated::lista_produtos))
        .route(
            "/cadastrarProduto",
            get(elevated::cadastrar_produto_page).post(elevated::cadastrar_produto),
        )
        .route("/detalhesProduto/:id", get(elevated::detalhes_produto))
        .route(
            "/editarProduto/:id",
            get(elevated::editar_produto_page).post(elevated::editar_produto),
        )
        // Sales
        .route("/listaVendas", get(elevated::lista_vendas))
        .route("/detalhesVenda/:id", get(elevated::detalhes_venda))
        .route(
            "/editarVenda/:id",
            get(elevated::editar_venda_page).post(elevated::editar_venda),
        )
        .route("/excluirVenda/:id", post(elevated::excluir_venda))
        .route_layer(from_fn_with_state((state.clone(), Access::Roles(STAFF)), guard::require))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/excluirProduto/:id", post(elevated::excluir_produto))
        .route_layer(from_fn_with_state((state.clone(), Access::Roles(ADMIN_ONLY)), guard::require))
}

/// List, details, edit, delete (and for staff kinds, sign-up) of one kind of person
fn person_routes(state: &AppState, kind: PersonKind) -> Router<AppState> {
    let with_id = |prefix: &str| format!("{}:id", prefix);

    let mut router = Router::new()
        .route(kind.list_url(), get(elevated::lista_pessoas))
        .route(&with_id(kind.detail_prefix()), get(elevated::detalhes_pessoa))
        .route(
            &with_id(kind.edit_prefix()),
            get(elevated::editar_pessoa_page).post(elevated::editar_pessoa),
        )
        .route(&with_id(kind.delete_prefix()), post(elevated::excluir_pessoa));

    if let Some(new_url) = kind.new_url() {
        router = router.route(new_url, get(elevated::cadastro_pessoa_page).post(elevated::cadastro_pessoa));
    }

    router.route_layer(Extension(kind)).route_layer(from_fn_with_state(
        (state.clone(), Access::Roles(kind.access())),
        guard::require,
    ))
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../static/app.css"),
    )
}

async fn not_found() -> Response {
    AppError::not_found("ERRO: Página não encontrada.").into_response()
}
