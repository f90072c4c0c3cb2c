mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{Front, ADMIN, CLIENTE, FUNCIONARIO, SENHA};

#[tokio::test]
async fn client_login_lands_on_client_home() -> Result<()> {
    let front = Front::start().await?;

    let page = front
        .post_form("/login", None, &[("email", CLIENTE), ("senha", SENHA)])
        .await?;
    assert!(page.redirects_to("/homeCliente"), "unexpected answer: {:?}", page);
    let cookie = page.session_cookie().expect("session cookie");
    assert!(page.set_cookies[0].contains("HttpOnly"));

    let home = front.get("/homeCliente", Some(&cookie)).await?;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Ana Cliente"));
    assert!(home.body.contains("Dipirona"));
    // Inactive products are not featured
    assert!(!home.body.contains("Xarope Antigo"));

    Ok(())
}

#[tokio::test]
async fn staff_role_comes_from_person_record() -> Result<()> {
    let front = Front::start().await?;

    for email in [FUNCIONARIO, ADMIN] {
        let page = front
            .post_form("/login", None, &[("email", email), ("senha", SENHA)])
            .await?;
        assert!(page.redirects_to("/homeAdm"), "{} got {:?}", email, page);
    }

    let cookie = front.login(FUNCIONARIO).await?;
    let home = front.get("/homeAdm", Some(&cookie)).await?;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Funcionário"));
    assert!(!home.body.contains("listaFuncionarios"));

    let cookie = front.login(ADMIN).await?;
    let home = front.get("/homeAdm", Some(&cookie)).await?;
    assert!(home.body.contains("listaFuncionarios"));
    assert!(home.body.contains("listaAdministradores"));

    Ok(())
}

#[tokio::test]
async fn wrong_password_shows_error() -> Result<()> {
    let front = Front::start().await?;

    let page = front
        .post_form("/login", None, &[("email", CLIENTE), ("senha", "errada")])
        .await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("ERRO: E-mail ou senha incorretos"));
    assert!(page.session_cookie().is_none());
    assert!(front.state.sessions.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn empty_fields_are_refused_before_calling_the_api() -> Result<()> {
    let front = Front::start().await?;

    let page = front.post_form("/login", None, &[("email", CLIENTE), ("senha", "")]).await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("ERRO: você deve preencher todos os campos"));

    Ok(())
}

#[tokio::test]
async fn logout_ends_the_session() -> Result<()> {
    let front = Front::start().await?;
    let cookie = front.login(CLIENTE).await?;
    assert_eq!(front.state.sessions.len().await, 1);

    let page = front.post_form("/logout", Some(&cookie), &[]).await?;
    assert!(page.redirects_to("/"));
    assert!(page.clears_session_cookie());
    assert!(front.state.sessions.is_empty().await);

    let page = front.get("/homeCliente", Some(&cookie)).await?;
    assert!(page.redirects_to("/"));

    Ok(())
}

#[tokio::test]
async fn landing_page_explains_expired_sessions() -> Result<()> {
    let front = Front::start().await?;

    let page = front.get("/", None).await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("login-cliente"));
    assert!(!page.body.contains("Token inválido ou expirado"));

    let page = front.get("/?expirado=1", None).await?;
    assert!(page.body.contains("ERRO: Não autorizado. Token inválido ou expirado."));

    Ok(())
}

#[tokio::test]
async fn client_sign_up_goes_to_login() -> Result<()> {
    let front = Front::start().await?;

    let page = front
        .post_form(
            "/cadastro-cliente",
            None,
            &[
                ("nome", "Fernanda"),
                ("cpf", "111.444.777-35"),
                ("telefone", "(21) 98888-7777"),
                ("email", "fernanda@farmacia.com"),
                ("senha", "abc"),
            ],
        )
        .await?;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("SUCESSO: Cliente cadastrado com sucesso!"));
    assert!(page.body.contains("fernanda@farmacia.com"));

    {
        let data = front.api.data();
        let novo = data
            .pessoas
            .iter()
            .find(|p| p["email"] == "fernanda@farmacia.com")
            .expect("registered");
        assert_eq!(novo["cpf"], "111.444.777-35");
        assert_eq!(novo["telefone"], "(21) 98888-7777");
        assert_eq!(novo["tipoUsuario"], "USER");
    }

    let page = front
        .post_form("/login", None, &[("email", "fernanda@farmacia.com"), ("senha", "abc")])
        .await?;
    assert!(page.redirects_to("/homeCliente"));
    Ok(())
}

#[tokio::test]
async fn sign_up_validation_errors_keep_the_form() -> Result<()> {
    let front = Front::start().await?;

    let page = front
        .post_form(
            "/cadastro-cliente",
            None,
            &[
                ("nome", "Gil"),
                ("cpf", "123"),
                ("telefone", "11999998888"),
                ("email", "gil@farmacia.com"),
                ("senha", "abc"),
            ],
        )
        .await?;
    assert!(page.body.contains("ERRO: CPF deve ter 11 dígitos"));
    assert!(page.body.contains("gil@farmacia.com"));

    let page = front
        .post_form(
            "/cadastro-cliente",
            None,
            &[
                ("nome", "Gil"),
                ("cpf", "52998224725"),
                ("telefone", "11999998888"),
                ("email", CLIENTE),
                ("senha", "abc"),
            ],
        )
        .await?;
    assert!(page.body.contains("ERRO: Email já cadastrado"));

    Ok(())
}
