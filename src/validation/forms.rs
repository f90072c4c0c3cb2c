use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{is_valid_email, masks, validate_cpf_checksum, validate_url, ValidationError, ValidationResult, EXPIRY_RE};
use crate::models::{ItemVendaRequest, Pessoa, PessoaRequest, ProdutoRequest, VendaRequest};
use crate::types::Role;

const MSG_CAMPOS_OBRIGATORIOS: &str = "ERRO: você deve preencher todos os campos";

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationResult<()> {
        if blank(&self.email) || blank(&self.senha) {
            return Err(ValidationError::new(MSG_CAMPOS_OBRIGATORIOS));
        }
        Ok(())
    }
}

/// Sign-up form shared by clients, employees and administrators
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CadastroForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub senha: String,
}

/// Check a sign-up form and build the request for a person of kind `tipo`.
/// CPF and phone are sent formatted.
pub fn validate_cadastro(form: &CadastroForm, tipo: Role) -> ValidationResult<PessoaRequest> {
    if [&form.nome, &form.cpf, &form.telefone, &form.email, &form.senha]
        .iter()
        .any(|v| blank(v))
    {
        return Err(ValidationError::new(MSG_CAMPOS_OBRIGATORIOS));
    }

    let cpf = masks::only_digits(&form.cpf);
    if cpf.len() != 11 {
        return Err(ValidationError::new("ERRO: CPF deve ter 11 dígitos"));
    }
    if !validate_cpf_checksum(&cpf) {
        return Err(ValidationError::new("ERRO: CPF inválido"));
    }

    let telefone = masks::only_digits(&form.telefone);
    if telefone.len() != 10 && telefone.len() != 11 {
        return Err(ValidationError::new("ERRO: Telefone deve ter 10 ou 11 dígitos"));
    }

    if !is_valid_email(&form.email) {
        return Err(ValidationError::new("ERRO: Email inválido"));
    }

    if form.senha.chars().count() < 3 {
        return Err(ValidationError::new("ERRO: Senha deve ter pelo menos 3 caracteres"));
    }

    Ok(PessoaRequest {
        nome: form.nome.trim().to_string(),
        cpf: masks::format_cpf(&cpf),
        telefone: masks::format_telefone(&telefone),
        email: form.email.trim().to_string(),
        senha: form.senha.clone(),
        tipo_usuario: Some(tipo),
    })
}

pub fn validate_cliente(form: &CadastroForm) -> ValidationResult<PessoaRequest> {
    validate_cadastro(form, Role::User)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PessoaEditForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nova_senha: String,
}

impl PessoaEditForm {
    pub fn from_pessoa(p: &Pessoa) -> Self {
        Self {
            nome: p.nome.clone(),
            cpf: masks::format_cpf(p.cpf.as_deref().unwrap_or_default()),
            telefone: masks::format_telefone(p.telefone.as_deref().unwrap_or_default()),
            email: p.email.clone(),
            nova_senha: String::new(),
        }
    }
}

/// Check an edit form against the stored record.
///
/// An empty "nova senha" resends the stored password and the record keeps
/// its `tipoUsuario`.
pub fn validate_pessoa_edit(form: &PessoaEditForm, existing: &Pessoa) -> ValidationResult<PessoaRequest> {
    if blank(&form.nome) {
        return Err(ValidationError::new("ERRO: Nome é obrigatório"));
    }
    if blank(&form.cpf) {
        return Err(ValidationError::new("ERRO: CPF é obrigatório"));
    }
    if blank(&form.email) {
        return Err(ValidationError::new("ERRO: Email é obrigatório"));
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::new("ERRO: Email inválido"));
    }

    let senha = if blank(&form.nova_senha) {
        existing.senha.clone().unwrap_or_default()
    } else if form.nova_senha.chars().count() < 3 {
        return Err(ValidationError::new("ERRO: Senha deve ter pelo menos 3 caracteres"));
    } else {
        form.nova_senha.clone()
    };

    Ok(PessoaRequest {
        nome: form.nome.trim().to_string(),
        cpf: masks::format_cpf(&form.cpf),
        telefone: masks::format_telefone(&form.telefone),
        email: form.email.trim().to_string(),
        senha,
        tipo_usuario: Some(existing.role()),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProdutoForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub preco: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub link_imagem: String,
    #[serde(default)]
    pub data_validade: String,
    #[serde(default)]
    pub fabricante: String,
}

impl ProdutoForm {
    pub fn from_produto(p: &crate::models::Produto) -> Self {
        Self {
            nome: p.nome.clone(),
            preco: p.preco.round_dp(2).to_string(),
            descricao: p.descricao.clone().unwrap_or_default(),
            link_imagem: p.link_imagem.clone().unwrap_or_default(),
            data_validade: p.data_validade.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            fabricante: p.fabricante.clone().unwrap_or_default(),
        }
    }
}

/// Price typed by a person: `12,50`, `12.50` or `R$ 12,50`
pub fn parse_preco(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().trim_start_matches("R$").trim();
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

pub fn validate_produto(form: &ProdutoForm, today: NaiveDate) -> ValidationResult<ProdutoRequest> {
    if blank(&form.nome) || blank(&form.fabricante) || blank(&form.preco) || blank(&form.data_validade) {
        return Err(ValidationError::new(
            "ERRO: Nome, fabricante, preço e data de validade são obrigatórios",
        ));
    }
    if form.nome.trim().chars().count() > 100 {
        return Err(ValidationError::new("ERRO: O nome não pode exceder 100 caracteres"));
    }

    let preco = parse_preco(&form.preco).ok_or_else(|| ValidationError::new("ERRO: Preço inválido"))?;
    if preco <= Decimal::ZERO {
        return Err(ValidationError::new("ERRO: O preço deve ser maior que zero"));
    }

    if blank(&form.descricao) {
        return Err(ValidationError::new("ERRO: A descrição do produto é obrigatória"));
    }
    if form.descricao.trim().chars().count() > 255 {
        return Err(ValidationError::new("ERRO: A descrição não pode exceder 255 caracteres"));
    }

    let link = form.link_imagem.trim();
    if link.chars().count() > 255 {
        return Err(ValidationError::new("ERRO: O link da imagem não pode exceder 255 caracteres"));
    }
    if !validate_url(link) {
        return Err(ValidationError::new("ERRO: O link da imagem deve ser uma URL válida"));
    }

    let validade = NaiveDate::parse_from_str(form.data_validade.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::new("ERRO: Data de validade inválida"))?;
    if validade < today {
        return Err(ValidationError::new("ERRO: A data de validade deve ser hoje ou futura"));
    }

    Ok(ProdutoRequest {
        nome: form.nome.trim().to_string(),
        preco: preco.round_dp(2),
        descricao: form.descricao.trim().to_string(),
        link_imagem: if link.is_empty() { None } else { Some(link.to_string()) },
        data_validade: Some(validade),
        fabricante: form.fabricante.trim().to_string(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub numero_cartao: String,
    #[serde(default)]
    pub nome_cartao: String,
    #[serde(default)]
    pub validade: String,
    #[serde(default)]
    pub cvv: String,
}

impl PaymentForm {
    /// Same form with every mask applied, for redisplay after an error
    pub fn masked(&self) -> Self {
        Self {
            numero_cartao: masks::format_card_number(&self.numero_cartao),
            nome_cartao: self.nome_cartao.trim().to_string(),
            validade: masks::format_card_expiry(&self.validade),
            cvv: masks::format_cvv(&self.cvv),
        }
    }
}

/// Simulated card check; nothing is charged
pub fn validate_payment(form: &PaymentForm) -> ValidationResult<()> {
    let form = form.masked();
    if masks::only_digits(&form.numero_cartao).len() < 13 {
        return Err(ValidationError::new("Número de cartão inválido"));
    }
    if form.nome_cartao.is_empty() {
        return Err(ValidationError::new("Nome do titular inválido"));
    }
    if !EXPIRY_RE.is_match(&form.validade) {
        return Err(ValidationError::new("Validade inválida (MM/AA)"));
    }
    if form.cvv.len() < 3 {
        return Err(ValidationError::new("CVV inválido"));
    }
    Ok(())
}

/// Sale edit form. Items arrive as repeated `item_produto`/`item_quantidade`
/// pairs, so it is parsed from the raw body instead of through serde.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendaEditForm {
    pub id_usuario: Option<i64>,
    pub itens: Vec<(Option<i64>, Option<u32>)>,
}

impl VendaEditForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        let mut produtos = Vec::new();
        let mut quantidades = Vec::new();

        for (key, value) in url::form_urlencoded::parse(body) {
            let value = value.trim();
            match key.as_ref() {
                "id_usuario" => form.id_usuario = value.parse().ok(),
                "item_produto" => produtos.push(value.parse::<i64>().ok()),
                "item_quantidade" => quantidades.push(value.parse::<u32>().ok()),
                _ => {}
            }
        }

        let len = produtos.len().max(quantidades.len());
        form.itens = (0..len)
            .map(|i| (produtos.get(i).copied().flatten(), quantidades.get(i).copied().flatten()))
            .collect();
        form
    }

    pub fn validate(&self) -> ValidationResult<VendaRequest> {
        let id_usuario = self
            .id_usuario
            .ok_or_else(|| ValidationError::new("ERRO: Selecione o cliente da venda."))?;

        if self.itens.is_empty() {
            return Err(ValidationError::new("ERRO: A venda deve ter pelo menos um item."));
        }

        let mut itens = Vec::with_capacity(self.itens.len());
        for (i, (produto, quantidade)) in self.itens.iter().enumerate() {
            let id_produto = produto.ok_or_else(|| {
                ValidationError::new(format!("ERRO: Item {} deve ter um produto selecionado.", i + 1))
            })?;
            let quantidade = quantidade.filter(|q| *q > 0).ok_or_else(|| {
                ValidationError::new(format!("ERRO: Item {} deve ter quantidade maior que zero.", i + 1))
            })?;
            itens.push(ItemVendaRequest { id_produto, quantidade });
        }

        Ok(VendaRequest { id_usuario, itens })
    }
}

/// Checkbox selection of cart lines (`selecionado` repeated)
pub fn parse_selection(body: &[u8]) -> Vec<i64> {
    url::form_urlencoded::parse(body)
        .filter(|(key, _)| key == "selecionado")
        .filter_map(|(_, value)| value.trim().parse().ok())
        .collect()
}
