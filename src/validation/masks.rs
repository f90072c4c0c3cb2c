//! Input masks applied to submitted form values before display or submission.

pub fn only_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// `12345678901` -> `123.456.789-01`; anything but 11 digits stays as bare digits
pub fn format_cpf(input: &str) -> String {
    let d = only_digits(input);
    if d.len() != 11 {
        return d;
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

/// CPF for listings: formatted, or `N/A` when absent
pub fn display_cpf(cpf: Option<&str>) -> String {
    match cpf.map(str::trim).filter(|s| !s.is_empty()) {
        Some(c) => format_cpf(c),
        None => "N/A".to_string(),
    }
}

/// Mobile `(11) 99999-8888`, landline `(11) 9999-8888`, otherwise bare digits
pub fn format_telefone(input: &str) -> String {
    let d = only_digits(input);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => d,
    }
}

/// Groups of four, at most 16 digits
pub fn format_card_number(input: &str) -> String {
    let d: String = only_digits(input).chars().take(16).collect();
    d.as_bytes()
        .chunks(4)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MMYY` -> `MM/YY`
pub fn format_card_expiry(input: &str) -> String {
    let d: String = only_digits(input).chars().take(4).collect();
    if d.len() > 2 {
        format!("{}/{}", &d[0..2], &d[2..])
    } else {
        d
    }
}

pub fn format_cvv(input: &str) -> String {
    only_digits(input).chars().take(4).collect()
}
