mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{Front, ADMIN, CLIENTE, FUNCIONARIO};

#[tokio::test]
async fn anonymous_visitors_go_to_the_landing_page() -> Result<()> {
    let front = Front::start().await?;

    for path in ["/homeCliente", "/carrinho", "/minhasCompras", "/homeAdm", "/listaClientes", "/listaFuncionarios"] {
        let page = front.get(path, None).await?;
        assert!(page.redirects_to("/"), "{} answered {:?}", path, page);
    }

    // A cookie naming no live session is treated the same way
    let page = front
        .get("/homeCliente", Some("farmacia_sid=6f1c1f1e-8d55-4c4e-9a51-2f6f2b4c7a10"))
        .await?;
    assert!(page.redirects_to("/"));

    Ok(())
}

#[tokio::test]
async fn clients_are_sent_home_from_staff_pages() -> Result<()> {
    let front = Front::start().await?;
    let cookie = front.login(CLIENTE).await?;

    let page = front.get("/listaVendas", Some(&cookie)).await?;
    assert!(page.redirects_to("/homeCliente"));

    let home = front.get("/homeCliente", Some(&cookie)).await?;
    assert!(home.body.contains("ERRO: Você não tem permissão para acessar esta página."));

    // The message is shown once
    let again = front.get("/homeCliente", Some(&cookie)).await?;
    assert!(!again.body.contains("Você não tem permissão"));

    Ok(())
}

#[tokio::test]
async fn employees_cannot_manage_staff_or_delete_products() -> Result<()> {
    let front = Front::start().await?;
    let cookie = front.login(FUNCIONARIO).await?;

    assert_eq!(front.get("/listaClientes", Some(&cookie)).await?.status, StatusCode::OK);
    assert_eq!(front.get("/listarProdutos", Some(&cookie)).await?.status, StatusCode::OK);

    for path in ["/listaFuncionarios", "/listaAdministradores", "/cadastro-funcionario", "/detalhesAdministrador/3"] {
        let page = front.get(path, Some(&cookie)).await?;
        assert!(page.redirects_to("/homeAdm"), "{} answered {:?}", path, page);
    }

    let page = front.post_form("/excluirProduto/1", Some(&cookie), &[]).await?;
    assert!(page.redirects_to("/homeAdm"));
    assert!(front.api.data().produtos[0]["dataExclusao"].is_null());

    Ok(())
}

#[tokio::test]
async fn admins_reach_every_back_office_page() -> Result<()> {
    let front = Front::start().await?;
    let cookie = front.login(ADMIN).await?;

    for path in [
        "/homeAdm",
        "/listaClientes",
        "/listaFuncionarios",
        "/listaAdministradores",
        "/cadastro-funcionario",
        "/cadastroAdministrador",
        "/listarProdutos",
        "/listaVendas",
        "/detalhesFuncionario/2",
    ] {
        let page = front.get(path, Some(&cookie)).await?;
        assert_eq!(page.status, StatusCode::OK, "{} answered {:?}", path, page);
    }

    // Staff may also browse the client catalog
    assert_eq!(front.get("/produtosCliente", Some(&cookie)).await?.status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn rejected_token_ends_the_session() -> Result<()> {
    let front = Front::start().await?;
    let cookie = front.login(ADMIN).await?;

    front.api.data().reject_tokens = true;

    let page = front.get("/listaVendas", Some(&cookie)).await?;
    assert!(page.redirects_to("/?expirado=1"), "unexpected answer: {:?}", page);
    assert!(page.clears_session_cookie());
    assert!(front.state.sessions.is_empty().await);

    front.api.data().reject_tokens = false;
    let page = front.get("/listaVendas", Some(&cookie)).await?;
    assert!(page.redirects_to("/"));

    Ok(())
}

#[tokio::test]
async fn unknown_pages_render_not_found() -> Result<()> {
    let front = Front::start().await?;

    let page = front.get("/naoExiste", None).await?;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("ERRO: Página não encontrada."));

    Ok(())
}
