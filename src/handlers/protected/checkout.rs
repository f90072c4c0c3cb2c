// handlers/protected/checkout.rs - simulated card payment
//
// Nothing is charged: the card form is only checked for shape, then the
// selected cart lines become a sale through `/venda/create`.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Extension, Form,
};

use crate::backend::BackendError;
use crate::cart::CartItem;
use crate::error::AppError;
use crate::handlers::{flash_redirect, page_context, PageResult};
use crate::models::{format_brl, VendaRequest};
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::{validate_payment, PaymentForm};
use crate::views::{render, CartLineView, PagamentoPage};

const MSG_NADA_SELECIONADO: &str = "Nenhum item selecionado para compra";

/// Cart lines picked on the cart page, if any are still in the cart
fn checkout_selection(current: &CurrentSession) -> Option<(Vec<i64>, Vec<CartItem>)> {
    let ids = current.session.checkout.clone()?;
    let itens = current.session.cart.select(&ids).ok()?;
    Some((ids, itens))
}

async fn payment_page(
    state: &AppState,
    current: &CurrentSession,
    itens: &[CartItem],
    form: PaymentForm,
    flash: Option<Flash>,
) -> PageResult {
    let total = itens.iter().map(CartItem::subtotal).sum();
    render(&PagamentoPage {
        ctx: page_context(state, current, "Pagamento").await.with_flash(flash),
        itens: itens.iter().map(CartLineView::from).collect(),
        total: format_brl(total),
        form,
    })
}

/// GET /simulaPagamento
pub async fn pagamento(State(state): State<AppState>, Extension(current): Extension<CurrentSession>) -> PageResult {
    let Some((_, itens)) = checkout_selection(&current) else {
        return Ok(flash_redirect(&state, &current, Flash::error(MSG_NADA_SELECIONADO), "/carrinho").await);
    };
    payment_page(&state, &current, &itens, PaymentForm::default(), None).await
}

/// Buyer's person id: from the session, else looked up by email
async fn resolve_user_id(state: &AppState, current: &CurrentSession) -> Result<Option<i64>, BackendError> {
    if let Some(id) = current.session.user_id {
        return Ok(Some(id));
    }
    let pessoas = state.backend.list_pessoas(current.token()).await?;
    Ok(pessoas.iter().find(|p| p.has_email(current.email())).map(|p| p.id))
}

/// POST /simulaPagamento - check the card, then record the sale
pub async fn pagar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<PaymentForm>,
) -> PageResult {
    let Some((ids, itens)) = checkout_selection(&current) else {
        return Ok(flash_redirect(&state, &current, Flash::error(MSG_NADA_SELECIONADO), "/carrinho").await);
    };

    if let Err(e) = validate_payment(&form) {
        return payment_page(&state, &current, &itens, form.masked(), Some(Flash::error(e.0))).await;
    }

    let id_usuario = match resolve_user_id(&state, &current).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!("No person record for {}, cannot record the purchase", current.email());
            let flash = Flash::error("Não foi possível identificar o usuário");
            return payment_page(&state, &current, &itens, form.masked(), Some(flash)).await;
        }
        Err(e) => return purchase_failed(&state, &current, &itens, &form, e).await,
    };

    let request = VendaRequest {
        id_usuario,
        itens: current
            .session
            .cart
            .sale_items(&ids)
            .map_err(|e| AppError::bad_request(e.to_string()))?,
    };

    let venda = match state.backend.create_venda(current.token(), &request).await {
        Ok(venda) => venda,
        Err(e) => return purchase_failed(&state, &current, &itens, &form, e).await,
    };

    tracing::info!(
        "Sale {} recorded for {} ({} items)",
        venda.id_venda,
        current.email(),
        request.itens.len()
    );

    let done = state
        .sessions
        .update(&current.id, |s| {
            s.cart.remove_purchased(&ids);
            s.checkout = None;
            s.user_id = Some(id_usuario);
            s.flash = Some(Flash::success("Compra realizada com sucesso!"));
        })
        .await;

    Ok(match done {
        Some(()) => Redirect::to("/minhasCompras").into_response(),
        None => Redirect::to("/").into_response(),
    })
}

async fn purchase_failed(
    state: &AppState,
    current: &CurrentSession,
    itens: &[CartItem],
    form: &PaymentForm,
    err: BackendError,
) -> PageResult {
    if err.is_unauthorized() {
        return Err(AppError::backend(err, "realizar compras"));
    }
    tracing::warn!("Purchase failed for {}: {}", current.email(), err);
    let flash = Flash::error(format!("Erro ao processar compra: {}", err.detail()));
    payment_page(state, current, itens, form.masked(), Some(flash)).await
}
