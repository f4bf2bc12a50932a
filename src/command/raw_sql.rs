use crate::types::Params;

/// Best-effort literal SQL for logs.
///
/// Values are substituted without quoting or escaping, so the output is not
/// valid SQL in general and must never be executed.
pub fn render(template: &str, params: &Params) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    match params {
        Params::Named(pairs) => {
            let mut tokens: Vec<(&str, String)> = pairs
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_literal()))
                .collect();
            // Longest token first so `?10` wins over `?1`.
            tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
            replace_tokens(template, &tokens)
        }
        Params::Positional(values) => {
            let mut sql = String::with_capacity(template.len());
            for (i, part) in template.split('?').enumerate() {
                sql.push_str(part);
                if let Some(value) = values.get(i) {
                    sql.push_str(&value.to_literal());
                }
            }
            sql
        }
    }
}

/// Single left-to-right pass; substituted text is never rescanned.
fn replace_tokens(template: &str, tokens: &[(&str, String)]) -> String {
    let mut sql = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(ch) = rest.chars().next() {
        for (token, literal) in tokens {
            if !token.is_empty() && rest.starts_with(token) {
                sql.push_str(literal);
                rest = &rest[token.len()..];
                continue 'scan;
            }
        }
        sql.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    sql
}
