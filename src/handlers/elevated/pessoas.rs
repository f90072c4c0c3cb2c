// handlers/elevated/pessoas.rs - clients, employees and administrators
//
// The three listings share these handlers. Each route group carries its
// `PersonKind` as a request extension.

use axum::{
    extract::{Path, Query, State},
    Extension, Form,
};

use crate::backend::BackendError;
use crate::error::AppError;
use crate::handlers::{action_failed, flash_redirect, page_context, PageResult, SearchQuery};
use crate::models::Pessoa;
use crate::session::CurrentSession;
use crate::state::AppState;
use crate::types::{Flash, Role};
use crate::validation::{validate_cadastro, validate_pessoa_edit, CadastroForm, PessoaEditForm};
use crate::views::{
    render, CadastroPage, KindView, PageContext, PessoaDetalhesPage, PessoaEditarPage, PessoaView, PessoasListaPage,
};

/// Which people a route group manages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonKind {
    Cliente,
    Funcionario,
    Administrador,
}

impl PersonKind {
    pub fn role(self) -> Role {
        match self {
            PersonKind::Cliente => Role::User,
            PersonKind::Funcionario => Role::Employ,
            PersonKind::Administrador => Role::Admin,
        }
    }

    pub fn singular(self) -> &'static str {
        self.role().label()
    }

    pub fn plural(self) -> &'static str {
        match self {
            PersonKind::Cliente => "Clientes",
            PersonKind::Funcionario => "Funcionários",
            PersonKind::Administrador => "Administradores",
        }
    }

    /// Completes "Você não tem permissão para <verb> ..."
    fn action(self, verb: &str) -> String {
        format!("{} {}", verb, self.plural().to_lowercase())
    }

    pub fn list_url(self) -> &'static str {
        match self {
            PersonKind::Cliente => "/listaClientes",
            PersonKind::Funcionario => "/listaFuncionarios",
            PersonKind::Administrador => "/listaAdministradores",
        }
    }

    /// Staff-side sign-up page; clients sign themselves up
    pub fn new_url(self) -> Option<&'static str> {
        match self {
            PersonKind::Cliente => None,
            PersonKind::Funcionario => Some("/cadastro-funcionario"),
            PersonKind::Administrador => Some("/cadastroAdministrador"),
        }
    }

    pub fn detail_prefix(self) -> &'static str {
        match self {
            PersonKind::Cliente => "/detalhesCliente/",
            PersonKind::Funcionario => "/detalhesFuncionario/",
            PersonKind::Administrador => "/detalhesAdministrador/",
        }
    }

    pub fn edit_prefix(self) -> &'static str {
        match self {
            PersonKind::Cliente => "/editar-cliente/",
            PersonKind::Funcionario => "/editar-funcionario/",
            PersonKind::Administrador => "/editarAdministrador/",
        }
    }

    pub fn delete_prefix(self) -> &'static str {
        match self {
            PersonKind::Cliente => "/excluir-cliente/",
            PersonKind::Funcionario => "/excluir-funcionario/",
            PersonKind::Administrador => "/excluirAdministrador/",
        }
    }

    /// Roles allowed to manage this kind
    pub fn access(self) -> &'static [Role] {
        match self {
            PersonKind::Cliente => crate::middleware::STAFF,
            PersonKind::Funcionario | PersonKind::Administrador => crate::middleware::ADMIN_ONLY,
        }
    }

    fn not_found(self) -> AppError {
        AppError::not_found(format!("ERRO: {} não encontrado.", self.singular()))
    }

    pub fn view(self) -> KindView {
        KindView {
            singular: self.singular().to_string(),
            plural: self.plural().to_string(),
            list_url: self.list_url().to_string(),
            new_url: self.new_url().unwrap_or_default().to_string(),
            detail_prefix: self.detail_prefix().to_string(),
            edit_prefix: self.edit_prefix().to_string(),
            delete_prefix: self.delete_prefix().to_string(),
        }
    }
}

/// One record of this kind; records of another kind are reported as missing
async fn load_pessoa(state: &AppState, current: &CurrentSession, kind: PersonKind, id: i64) -> Result<Pessoa, AppError> {
    let pessoa = match state.backend.get_pessoa(current.token(), id).await {
        Ok(pessoa) => pessoa,
        Err(BackendError::NotFound(_)) => return Err(kind.not_found()),
        Err(e) => return Err(AppError::backend(e, &kind.action("visualizar"))),
    };
    if !pessoa.is_kind(kind.role()) {
        return Err(kind.not_found());
    }
    Ok(pessoa)
}

/// GET /listaClientes, /listaFuncionarios, /listaAdministradores (?busca=)
pub async fn lista_pessoas(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let pessoas = state
        .backend
        .list_pessoas(current.token())
        .await
        .map_err(|e| AppError::backend(e, &kind.action("visualizar")))?;

    let pessoas = pessoas
        .iter()
        .filter(|p| p.is_kind(kind.role()) && p.matches(query.term()))
        .map(PessoaView::from)
        .collect();

    render(&PessoasListaPage {
        ctx: page_context(&state, &current, kind.plural()).await,
        kind: kind.view(),
        busca: query.term().to_string(),
        pessoas,
    })
}

/// GET /detalhesCliente/:id and friends
pub async fn detalhes_pessoa(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<i64>,
) -> PageResult {
    let pessoa = load_pessoa(&state, &current, kind, id).await?;
    render(&PessoaDetalhesPage {
        ctx: page_context(&state, &current, &pessoa.nome).await,
        kind: kind.view(),
        pessoa: PessoaView::from(&pessoa),
    })
}

async fn edit_page(
    state: &AppState,
    current: &CurrentSession,
    kind: PersonKind,
    id: i64,
    form: PessoaEditForm,
    flash: Option<Flash>,
) -> PageResult {
    let title = format!("Editar {}", kind.singular());
    render(&PessoaEditarPage {
        ctx: page_context(state, current, &title).await.with_flash(flash),
        kind: kind.view(),
        id,
        form: PessoaEditForm {
            nova_senha: String::new(),
            ..form
        },
    })
}

/// GET /editar-cliente/:id and friends
pub async fn editar_pessoa_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<i64>,
) -> PageResult {
    let pessoa = load_pessoa(&state, &current, kind, id).await?;
    edit_page(&state, &current, kind, id, PessoaEditForm::from_pessoa(&pessoa), None).await
}

/// POST /editar-cliente/:id and friends.
///
/// A blank "nova senha" keeps the stored password; the record keeps its kind.
pub async fn editar_pessoa(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<i64>,
    Form(form): Form<PessoaEditForm>,
) -> PageResult {
    let existing = load_pessoa(&state, &current, kind, id).await?;

    let request = match validate_pessoa_edit(&form, &existing) {
        Ok(request) => request,
        Err(e) => return edit_page(&state, &current, kind, id, form, Some(Flash::error(e.0))).await,
    };

    match state.backend.update_pessoa(current.token(), id, &request).await {
        Ok(_) => {
            tracing::info!("{} {} updated by {}", kind.singular(), id, current.email());
            let flash = Flash::success(format!("SUCESSO: {} atualizado com sucesso!", kind.singular()));
            let to = format!("{}{}", kind.detail_prefix(), id);
            Ok(flash_redirect(&state, &current, flash, &to).await)
        }
        Err(e) if e.is_unauthorized() => Err(AppError::backend(e, &kind.action("editar"))),
        Err(e) => {
            tracing::warn!("Update of {} {} failed: {}", kind.singular(), id, e);
            let flash = Flash::error(e.user_message(&kind.action("editar")));
            edit_page(&state, &current, kind, id, form, Some(flash)).await
        }
    }
}

/// POST /excluir-cliente/:id and friends - soft delete
pub async fn excluir_pessoa(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Path(id): Path<i64>,
) -> PageResult {
    // Only records of this kind; staff records stay behind the ADMIN-only routes
    match load_pessoa(&state, &current, kind, id).await {
        Ok(_) => {}
        Err(AppError::NotFound(message)) => {
            tracing::warn!("{} refused to delete person {} as {}", current.email(), id, kind.singular());
            return Ok(flash_redirect(&state, &current, Flash::error(message), kind.list_url()).await);
        }
        Err(e) => return Err(e),
    }

    match state.backend.delete_pessoa(current.token(), id).await {
        Ok(_) => {
            tracing::info!("{} {} deactivated by {}", kind.singular(), id, current.email());
            let flash = Flash::success(format!("SUCESSO: {} marcado como inativo!", kind.singular()));
            Ok(flash_redirect(&state, &current, flash, kind.list_url()).await)
        }
        Err(BackendError::NotFound(_)) => {
            let flash = Flash::error(format!("ERRO: {} não encontrado.", kind.singular()));
            Ok(flash_redirect(&state, &current, flash, kind.list_url()).await)
        }
        Err(e) => action_failed(&state, &current, e, &kind.action("excluir"), kind.list_url()).await,
    }
}

fn cadastro_page(kind: PersonKind, ctx: PageContext, form: CadastroForm) -> PageResult {
    let heading = format!("Cadastro de {}", kind.singular().to_lowercase());
    render(&CadastroPage {
        ctx,
        heading,
        action: kind.new_url().unwrap_or_default().to_string(),
        back_url: kind.list_url().to_string(),
        form: CadastroForm {
            senha: String::new(),
            ..form
        },
    })
}

/// GET /cadastro-funcionario, /cadastroAdministrador
pub async fn cadastro_pessoa_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
) -> PageResult {
    let title = format!("Cadastro de {}", kind.singular().to_lowercase());
    let ctx = page_context(&state, &current, &title).await;
    cadastro_page(kind, ctx, CadastroForm::default())
}

/// POST /cadastro-funcionario, /cadastroAdministrador
pub async fn cadastro_pessoa(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Extension(kind): Extension<PersonKind>,
    Form(form): Form<CadastroForm>,
) -> PageResult {
    let title = format!("Cadastro de {}", kind.singular().to_lowercase());

    let request = match validate_cadastro(&form, kind.role()) {
        Ok(request) => request,
        Err(e) => {
            let ctx = page_context(&state, &current, &title).await.with_flash(Some(Flash::error(e.0)));
            return cadastro_page(kind, ctx, form);
        }
    };

    match state.backend.create_pessoa(current.token(), &request).await {
        Ok(pessoa) => {
            tracing::info!("{} {} created by {}", kind.singular(), pessoa.id, current.email());
            let flash = Flash::success(format!("SUCESSO: {} cadastrado com sucesso!", kind.singular()));
            Ok(flash_redirect(&state, &current, flash, kind.list_url()).await)
        }
        Err(e) if e.is_unauthorized() => Err(AppError::backend(e, &kind.action("cadastrar"))),
        Err(e) => {
            let flash = Flash::error(e.user_message(&kind.action("cadastrar")));
            let ctx = page_context(&state, &current, &title).await.with_flash(Some(flash));
            cadastro_page(kind, ctx, form)
        }
    }
}
