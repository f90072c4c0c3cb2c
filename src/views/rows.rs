//! Display-ready rows: every value is already formatted for the templates.

use crate::cart::CartItem;
use crate::models::{dates, format_brl, ItemVenda, Pessoa, Produto, Venda};
use crate::validation::{display_cpf, format_telefone};

fn date_or_na(date: Option<&chrono::NaiveDate>) -> String {
    date.map(dates::format_br).unwrap_or_else(|| "N/A".to_string())
}

#[derive(Debug, Clone)]
pub struct ProdutoView {
    pub id: i64,
    pub nome: String,
    pub preco: String,
    pub descricao: String,
    pub fabricante: String,
    pub validade: String,
    pub imagem: String,
    pub has_imagem: bool,
    pub ativo: bool,
    pub status: String,
}

impl From<&Produto> for ProdutoView {
    fn from(p: &Produto) -> Self {
        let imagem = p.image().unwrap_or_default().to_string();
        Self {
            id: p.id_produto,
            nome: p.nome.clone(),
            preco: format_brl(p.preco),
            descricao: p.descricao.clone().unwrap_or_default(),
            fabricante: p.fabricante.clone().unwrap_or_else(|| "N/A".to_string()),
            validade: date_or_na(p.data_validade.as_ref()),
            has_imagem: !imagem.is_empty(),
            imagem,
            ativo: p.is_active(),
            status: if p.is_active() { "Ativo" } else { "Inativo" }.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PessoaView {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub tipo: String,
    pub ativo: bool,
    pub status: String,
}

impl From<&Pessoa> for PessoaView {
    fn from(p: &Pessoa) -> Self {
        let telefone = p
            .telefone
            .as_deref()
            .map(format_telefone)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "N/A".to_string());
        Self {
            id: p.id,
            nome: p.nome.clone(),
            cpf: display_cpf(p.cpf.as_deref()),
            telefone,
            email: p.email.clone(),
            tipo: p.role().label().to_string(),
            ativo: p.is_active(),
            status: p.status_label().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemView {
    pub id_produto: i64,
    pub nome: String,
    pub quantidade: u32,
    pub preco_unitario: String,
    pub subtotal: String,
}

impl From<&ItemVenda> for ItemView {
    fn from(i: &ItemVenda) -> Self {
        Self {
            id_produto: i.id_produto,
            nome: i.nome_produto.clone(),
            quantidade: i.quantidade,
            preco_unitario: format_brl(i.preco_unitario),
            subtotal: format_brl(i.sub_total),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VendaView {
    pub id: i64,
    pub cliente: String,
    pub cliente_email: String,
    pub data: String,
    pub total: String,
    pub quantidade_itens: u32,
    pub ativo: bool,
    pub status: String,
    pub itens: Vec<ItemView>,
}

impl From<&Venda> for VendaView {
    fn from(v: &Venda) -> Self {
        Self {
            id: v.id_venda,
            cliente: v.customer_name().to_string(),
            cliente_email: v.usuario.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
            data: date_or_na(v.data_compra.as_ref()),
            total: format_brl(v.total()),
            quantidade_itens: v.item_count(),
            ativo: v.is_active(),
            status: v.status_label().to_string(),
            itens: v.itens.iter().map(ItemView::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id_produto: i64,
    pub nome: String,
    pub preco: String,
    pub quantidade: u32,
    pub subtotal: String,
    pub imagem: String,
    pub has_imagem: bool,
}

impl From<&CartItem> for CartLineView {
    fn from(i: &CartItem) -> Self {
        let imagem = i.link_imagem.clone().unwrap_or_default();
        Self {
            id_produto: i.id_produto,
            nome: i.nome.clone(),
            preco: format_brl(i.preco_unitario),
            quantidade: i.quantidade,
            subtotal: format_brl(i.subtotal()),
            has_imagem: !imagem.is_empty(),
            imagem,
        }
    }
}

/// Entry of a `<select>`
#[derive(Debug, Clone)]
pub struct OptionView {
    pub id: i64,
    pub label: String,
}

/// Routes and wording of one person listing (clients, employees, administrators)
#[derive(Debug, Clone)]
pub struct KindView {
    pub singular: String,
    pub plural: String,
    pub list_url: String,
    pub new_url: String,
    pub detail_prefix: String,
    pub edit_prefix: String,
    pub delete_prefix: String,
}
