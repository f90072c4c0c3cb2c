// handlers/protected/cart.rs - the session's shopping cart

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

use crate::cart::{Cart, CartError};
use crate::handlers::{flash_redirect, page_context, PageResult};
use crate::models::format_brl;
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::parse_selection;
use crate::views::{render, CarrinhoPage, CartLineView};

/// Quantity typed in a number input; anything unparsable counts as zero
pub(crate) fn parse_quantidade(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub id_produto: i64,
    #[serde(default)]
    pub quantidade: String,
}

/// GET /carrinho
pub async fn carrinho(State(state): State<AppState>, Extension(current): Extension<CurrentSession>) -> PageResult {
    let cart = &current.session.cart;
    render(&CarrinhoPage {
        ctx: page_context(&state, &current, "Carrinho").await,
        itens: cart.items().iter().map(CartLineView::from).collect(),
        total: format_brl(cart.total()),
    })
}

/// Apply a cart change, then back to the cart with the outcome in the message box
async fn cart_action<F>(state: &AppState, current: &CurrentSession, change: F, success: &str, failure: &str) -> Response
where
    F: FnOnce(&mut Cart) -> Result<(), CartError>,
{
    match state.sessions.update(&current.id, |s| change(&mut s.cart)).await {
        Some(Ok(())) => flash_redirect(state, current, Flash::success(success), "/carrinho").await,
        Some(Err(e)) => {
            let message = format!("{}: {}", failure, e);
            flash_redirect(state, current, Flash::error(message), "/carrinho").await
        }
        None => Redirect::to("/").into_response(),
    }
}

/// POST /carrinho/atualizar
pub async fn atualizar_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<CartLineForm>,
) -> Response {
    let quantidade = parse_quantidade(&form.quantidade);
    if quantidade < 1 {
        let flash = Flash::error(CartError::InvalidQuantity.to_string());
        return flash_redirect(&state, &current, flash, "/carrinho").await;
    }
    cart_action(
        &state,
        &current,
        |cart| cart.update_quantity(form.id_produto, quantidade),
        "Quantidade atualizada!",
        "Erro ao atualizar quantidade",
    )
    .await
}

/// POST /carrinho/remover
pub async fn remover_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<CartLineForm>,
) -> Response {
    cart_action(
        &state,
        &current,
        |cart| cart.remove(form.id_produto).map(|_| ()),
        "Item removido do carrinho!",
        "Erro ao remover item",
    )
    .await
}

/// POST /carrinho/limpar
pub async fn limpar_carrinho(State(state): State<AppState>, Extension(current): Extension<CurrentSession>) -> Response {
    cart_action(
        &state,
        &current,
        |cart| {
            cart.clear();
            Ok(())
        },
        "Carrinho limpo com sucesso!",
        "Erro ao limpar carrinho",
    )
    .await
}

/// POST /carrinho/comprar - keep the checked lines and go to the payment page
pub async fn comprar_selecionados(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    body: Bytes,
) -> Response {
    let ids = parse_selection(&body);
    let selected = state
        .sessions
        .update(&current.id, |s| {
            s.cart.select(&ids)?;
            s.checkout = Some(ids);
            Ok::<(), CartError>(())
        })
        .await;

    match selected {
        Some(Ok(())) => Redirect::to("/simulaPagamento").into_response(),
        Some(Err(e)) => flash_redirect(&state, &current, Flash::error(e.to_string()), "/carrinho").await,
        None => Redirect::to("/").into_response(),
    }
}
