use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dates;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id_produto: i64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub preco: Decimal,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub link_imagem: Option<String>,
    #[serde(default, with = "dates::lenient")]
    pub data_validade: Option<NaiveDate>,
    #[serde(default)]
    pub fabricante: Option<String>,
    #[serde(default, with = "dates::lenient")]
    pub data_exclusao: Option<NaiveDate>,
}

impl Produto {
    pub fn is_active(&self) -> bool {
        self.data_exclusao.is_none()
    }

    /// Case-insensitive match on name or manufacturer; a blank term matches everything
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.nome.to_lowercase().contains(&term)
            || self
                .fabricante
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(&term))
    }

    pub fn image(&self) -> Option<&str> {
        self.link_imagem.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Body of `/produto/create` and `/produto/update/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoRequest {
    pub nome: String,
    pub preco: Decimal,
    pub descricao: String,
    pub link_imagem: Option<String>,
    #[serde(with = "dates::lenient")]
    pub data_validade: Option<NaiveDate>,
    pub fabricante: String,
}
