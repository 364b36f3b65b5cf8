//! 用户语言解析

use crate::storage::document::Language;

/// 找不到匹配语言时使用
pub const FALLBACK_LANGUAGE: &str = "english";

/// 将 Telegram 的 language_code 解析为语言名称
///
/// 多个语言共享同一代码时取最后一个。
pub fn resolve_language(languages: &[Language], code: Option<&str>) -> String {
    code.and_then(|code| languages.iter().rev().find(|language| language.code == code))
        .map(|language| language.name.clone())
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn languages() -> Vec<Language> {
        [("Italian", "it"), ("English", "en"), ("Portuguese", "pt"), ("Brazilian", "pt")]
            .into_iter()
            .map(|(name, code)| Language {
                name: name.to_string(),
                code: code.to_string(),
                native_name: String::new(),
            })
            .collect()
    }

    #[rstest]
    #[case(Some("it"), "Italian")]
    #[case(Some("en"), "English")]
    #[case(Some("pt"), "Brazilian")]
    #[case(Some("it-IT"), "english")]
    #[case(Some(""), "english")]
    #[case(None, "english")]
    fn test_resolve_language(#[case] code: Option<&str>, #[case] expected: &str) {
        assert_eq!(resolve_language(&languages(), code), expected);
    }

    #[test]
    fn test_resolve_language_empty_list() {
        assert_eq!(resolve_language(&[], Some("it")), FALLBACK_LANGUAGE);
    }
}
