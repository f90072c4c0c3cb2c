use askama::Template;

use super::rows::{CartLineView, KindView, OptionView, PessoaView, ProdutoView, VendaView};
use super::PageContext;
use crate::validation::{CadastroForm, PaymentForm, PessoaEditForm, ProdutoForm};

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub ctx: PageContext,
    pub status: u16,
    pub code: &'a str,
    pub message: &'a str,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "inicial.html")]
pub struct InicialPage {
    pub ctx: PageContext,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub ctx: PageContext,
    pub heading: String,
    pub email: String,
}

/// Sign-up form for any kind of person
#[derive(Template)]
#[template(path = "cadastro_pessoa.html")]
pub struct CadastroPage {
    pub ctx: PageContext,
    pub heading: String,
    pub action: String,
    pub back_url: String,
    pub form: CadastroForm,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "home_cliente.html")]
pub struct HomeClientePage {
    pub ctx: PageContext,
    pub nome: String,
    pub destaques: Vec<ProdutoView>,
}

#[derive(Template)]
#[template(path = "produtos_cliente.html")]
pub struct ProdutosClientePage {
    pub ctx: PageContext,
    pub busca: String,
    pub produtos: Vec<ProdutoView>,
}

#[derive(Template)]
#[template(path = "produto_cliente.html")]
pub struct ProdutoClientePage {
    pub ctx: PageContext,
    pub produto: ProdutoView,
    pub no_carrinho: u32,
}

#[derive(Template)]
#[template(path = "carrinho.html")]
pub struct CarrinhoPage {
    pub ctx: PageContext,
    pub itens: Vec<CartLineView>,
    pub total: String,
}

#[derive(Template)]
#[template(path = "pagamento.html")]
pub struct PagamentoPage {
    pub ctx: PageContext,
    pub itens: Vec<CartLineView>,
    pub total: String,
    pub form: PaymentForm,
}

#[derive(Template)]
#[template(path = "minhas_compras.html")]
pub struct MinhasComprasPage {
    pub ctx: PageContext,
    pub busca: String,
    pub vendas: Vec<VendaView>,
}

/// Sale details, shared by the client's purchase page and the staff sale page
#[derive(Template)]
#[template(path = "venda_detalhes.html")]
pub struct VendaDetalhesPage {
    pub ctx: PageContext,
    pub venda: VendaView,
    pub staff: bool,
    pub back_url: String,
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "home_adm.html")]
pub struct HomeAdmPage {
    pub ctx: PageContext,
}

#[derive(Template)]
#[template(path = "pessoas_lista.html")]
pub struct PessoasListaPage {
    pub ctx: PageContext,
    pub kind: KindView,
    pub busca: String,
    pub pessoas: Vec<PessoaView>,
}

#[derive(Template)]
#[template(path = "pessoa_detalhes.html")]
pub struct PessoaDetalhesPage {
    pub ctx: PageContext,
    pub kind: KindView,
    pub pessoa: PessoaView,
}

#[derive(Template)]
#[template(path = "pessoa_editar.html")]
pub struct PessoaEditarPage {
    pub ctx: PageContext,
    pub kind: KindView,
    pub id: i64,
    pub form: PessoaEditForm,
}

#[derive(Template)]
#[template(path = "produtos_lista.html")]
pub struct ProdutosListaPage {
    pub ctx: PageContext,
    pub busca: String,
    pub produtos: Vec<ProdutoView>,
    pub can_delete: bool,
}

/// Create and edit share one form
#[derive(Template)]
#[template(path = "produto_form.html")]
pub struct ProdutoFormPage {
    pub ctx: PageContext,
    pub heading: String,
    pub action: String,
    pub back_url: String,
    pub min_date: String,
    pub form: ProdutoForm,
}

#[derive(Template)]
#[template(path = "produto_detalhes.html")]
pub struct ProdutoDetalhesPage {
    pub ctx: PageContext,
    pub produto: ProdutoView,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "vendas_lista.html")]
pub struct VendasListaPage {
    pub ctx: PageContext,
    pub busca: String,
    pub vendas: Vec<VendaView>,
}

/// One editable line of a sale
#[derive(Debug, Clone)]
pub struct ItemEditView {
    pub id_produto: i64,
    pub quantidade: u32,
}

#[derive(Template)]
#[template(path = "venda_editar.html")]
pub struct VendaEditarPage {
    pub ctx: PageContext,
    pub id: i64,
    pub id_usuario: i64,
    pub clientes: Vec<OptionView>,
    pub produtos: Vec<OptionView>,
    pub itens: Vec<ItemEditView>,
}
