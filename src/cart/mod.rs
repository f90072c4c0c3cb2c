// Shopping cart, kept in memory per session

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{ItemVendaRequest, Produto};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Quantidade deve ser pelo menos 1")]
    InvalidQuantity,

    #[error("Item não encontrado no carrinho")]
    ItemNotFound,

    #[error("Selecione pelo menos um item para comprar")]
    EmptySelection,

    #[error("Produto indisponível")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id_produto: i64,
    pub nome: String,
    pub preco_unitario: Decimal,
    pub quantidade: u32,
    pub link_imagem: Option<String>,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        self.preco_unitario * Decimal::from(self.quantidade)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id_produto: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id_produto == id_produto)
    }

    /// Add a product; a product already in the cart has its quantity increased
    pub fn add(&mut self, produto: &Produto, quantidade: u32) -> Result<(), CartError> {
        if quantidade < 1 {
            return Err(CartError::InvalidQuantity);
        }
        if !produto.is_active() {
            return Err(CartError::Unavailable);
        }

        match self.items.iter_mut().find(|i| i.id_produto == produto.id_produto) {
            Some(existing) => {
                existing.quantidade = existing.quantidade.saturating_add(quantidade);
                existing.preco_unitario = produto.preco;
            }
            None => self.items.push(CartItem {
                id_produto: produto.id_produto,
                nome: produto.nome.clone(),
                preco_unitario: produto.preco,
                quantidade,
                link_imagem: produto.image().map(str::to_string),
            }),
        }
        Ok(())
    }

    pub fn update_quantity(&mut self, id_produto: i64, quantidade: u32) -> Result<(), CartError> {
        if quantidade < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id_produto == id_produto)
            .ok_or(CartError::ItemNotFound)?;
        item.quantidade = quantidade;
        Ok(())
    }

    pub fn remove(&mut self, id_produto: i64) -> Result<CartItem, CartError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id_produto == id_produto)
            .ok_or(CartError::ItemNotFound)?;
        Ok(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all lines, shown in the navigation bar
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantidade).sum()
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Cart lines chosen for checkout, in cart order.
    /// Ids not in the cart are ignored; an empty result is refused.
    pub fn select(&self, ids: &[i64]) -> Result<Vec<CartItem>, CartError> {
        let selected: Vec<CartItem> = self
            .items
            .iter()
            .filter(|i| ids.contains(&i.id_produto))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(CartError::EmptySelection);
        }
        Ok(selected)
    }

    /// Line items of a sale built from the selection
    pub fn sale_items(&self, ids: &[i64]) -> Result<Vec<ItemVendaRequest>, CartError> {
        Ok(self
            .select(ids)?
            .into_iter()
            .map(|i| ItemVendaRequest {
                id_produto: i.id_produto,
                quantidade: i.quantidade,
            })
            .collect())
    }

    /// Drop lines that were just bought
    pub fn remove_purchased(&mut self, ids: &[i64]) {
        self.items.retain(|i| !ids.contains(&i.id_produto));
    }
}
