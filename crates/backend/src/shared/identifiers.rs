use std::collections::HashSet;

/// Первый свободный код продукта в последовательности `A, B, C, ...`.
///
/// После `Z` последовательность продолжается следующими символами (`[`, `\`, ...),
/// многобуквенные коды не выдаются. Уникальность всё равно гарантирует
/// ограничение UNIQUE в таблице.
pub fn allocate_product_code(existing_codes: &HashSet<String>) -> String {
    ('A'..=char::MAX)
        .map(String::from)
        .find(|code| !existing_codes.contains(code))
        .unwrap_or_default()
}

/// Составной код партии: код продукта + порядковый номер (с 1)
pub fn compose_unique_code(product_code: &str, position: u64) -> String {
    format!("{}{}", product_code, position)
}
