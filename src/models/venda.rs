use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{dates, Pessoa};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemVenda {
    pub id_produto: i64,
    #[serde(default)]
    pub nome_produto: String,
    pub quantidade: u32,
    #[serde(default)]
    pub preco_unitario: Decimal,
    #[serde(default)]
    pub sub_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venda {
    pub id_venda: i64,
    #[serde(default)]
    pub usuario: Option<Pessoa>,
    #[serde(default, with = "dates::lenient")]
    pub data_compra: Option<NaiveDate>,
    #[serde(default, with = "dates::lenient")]
    pub data_exclusao: Option<NaiveDate>,
    #[serde(default)]
    pub itens: Vec<ItemVenda>,
}

impl Venda {
    pub fn is_active(&self) -> bool {
        self.data_exclusao.is_none()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active() {
            "Concluída"
        } else {
            "Cancelada"
        }
    }

    pub fn total(&self) -> Decimal {
        self.itens.iter().map(|i| i.sub_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.itens.iter().map(|i| i.quantidade).sum()
    }

    pub fn belongs_to(&self, email: &str) -> bool {
        self.usuario.as_ref().is_some_and(|u| u.has_email(email))
    }

    pub fn customer_name(&self) -> &str {
        self.usuario.as_ref().map(|u| u.nome.as_str()).unwrap_or("N/A")
    }

    /// Search on customer name, sale id or the displayed purchase date
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.customer_name().to_lowercase().contains(&term)
            || self.id_venda.to_string() == term
            || self
                .data_compra
                .as_ref()
                .is_some_and(|d| dates::format_br(d).contains(&term))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemVendaRequest {
    pub id_produto: i64,
    pub quantidade: u32,
}

/// Body of `/venda/create` and `/venda/update/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendaRequest {
    pub id_usuario: i64,
    pub itens: Vec<ItemVendaRequest>,
}

/// Most recent purchase first; undated sales go last
pub fn sort_recent_first(vendas: &mut [Venda]) {
    vendas.sort_by(|a, b| b.data_compra.cmp(&a.data_compra).then(b.id_venda.cmp(&a.id_venda)));
}
