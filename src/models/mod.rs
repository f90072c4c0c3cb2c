// Wire types of the pharmacy API

pub mod dates;
pub mod pessoa;
pub mod produto;
pub mod venda;

pub use pessoa::{LoginRequest, LoginResponse, Pessoa, PessoaRequest};
pub use produto::{Produto, ProdutoRequest};
pub use venda::{ItemVenda, ItemVendaRequest, Venda, VendaRequest};

pub use crate::types::Role;

use rust_decimal::Decimal;

/// Brazilian currency display: `R$ 1.234,50`
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-R$ {},{}", grouped, frac_part)
    } else {
        format!("R$ {},{}", grouped, frac_part)
    }
}
