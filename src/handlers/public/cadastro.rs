// handlers/public/cadastro.rs - client sign-up

use axum::{extract::State, Form};

use crate::handlers::PageResult;
use crate::state::AppState;
use crate::types::Flash;
use crate::validation::{validate_cliente, CadastroForm};
use crate::views::{render, CadastroPage, PageContext};

use super::auth::login_form;

fn cadastro_form(form: CadastroForm, flash: Option<Flash>) -> PageResult {
    render(&CadastroPage {
        ctx: PageContext::anonymous("Cadastro de cliente").with_flash(flash),
        heading: "Cadastro de cliente".to_string(),
        action: "/cadastro-cliente".to_string(),
        back_url: "/".to_string(),
        form,
    })
}

/// GET /cadastro-cliente
pub async fn cadastro_cliente_page() -> PageResult {
    cadastro_form(CadastroForm::default(), None)
}

/// POST /cadastro-cliente - public sign-up through `/register`.
///
/// On success the login page is shown with the email filled in.
pub async fn cadastro_cliente(State(state): State<AppState>, Form(form): Form<CadastroForm>) -> PageResult {
    let request = match validate_cliente(&form) {
        Ok(request) => request,
        Err(e) => return cadastro_form(CadastroForm { senha: String::new(), ..form }, Some(Flash::error(e.0))),
    };

    match state.backend.register(&request).await {
        Ok(pessoa) => {
            tracing::info!("Client {} signed up (id {})", pessoa.email, pessoa.id);
            login_form(
                "Login do cliente",
                pessoa.email,
                Some(Flash::success("SUCESSO: Cliente cadastrado com sucesso!")),
            )
        }
        Err(e) => {
            tracing::info!("Sign-up refused for {}: {}", request.email, e);
            let flash = Flash::error(e.user_message("cadastrar clientes"));
            cadastro_form(CadastroForm { senha: String::new(), ..form }, Some(flash))
        }
    }
}
