// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Catálogo de mensagens de erro: idioma -> código -> texto
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const CATALOG: &[(&str, &str, &str)] = &[
    // --- Português (padrão) ---
    ("pt", "validation_error", "Um ou mais campos são inválidos."),
    ("pt", "email_already_exists", "Este e-mail já está em uso. Tente fazer login."),
    ("pt", "invalid_credentials", "E-mail ou senha incorretos."),
    ("pt", "invalid_token", "Token de autenticação inválido ou ausente."),
    ("pt", "forbidden_importer", "Esta área é exclusiva para importadores."),
    ("pt", "forbidden_exporter", "Esta área é exclusiva para exportadores."),
    ("pt", "not_found_profile", "Perfil não encontrado."),
    ("pt", "not_found_product", "Produto não encontrado."),
    ("pt", "not_found_image", "Imagem não encontrada."),
    ("pt", "not_found_quote_request", "Pedido de cotação não encontrado."),
    ("pt", "not_found_quote", "Cotação não encontrada."),
    ("pt", "not_found_route", "Página não encontrada."),
    ("pt", "internal_error", "Ocorreu um erro inesperado."),
    // --- English ---
    ("en", "validation_error", "One or more fields are invalid."),
    ("en", "email_already_exists", "This e-mail is already in use. Try logging in."),
    ("en", "invalid_credentials", "Incorrect e-mail or password."),
    ("en", "invalid_token", "Invalid or missing authentication token."),
    ("en", "forbidden_importer", "This area is restricted to importers."),
    ("en", "forbidden_exporter", "This area is restricted to exporters."),
    ("en", "not_found_profile", "Profile not found."),
    ("en", "not_found_product", "Product not found."),
    ("en", "not_found_image", "Image not found."),
    ("en", "not_found_quote_request", "Quote request not found."),
    ("en", "not_found_quote", "Quote not found."),
    ("en", "not_found_route", "Page not found."),
    ("en", "internal_error", "An unexpected error occurred."),
];

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for (lang, key, text) in CATALOG {
            messages.entry(*lang).or_default().insert(*key, *text);
        }
        Self { messages }
    }

    /// Traduz um código de mensagem. Idiomas desconhecidos caem no português;
    /// códigos desconhecidos são devolvidos como estão.
    pub fn translate<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key)
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages.get(lang)?.get(key).copied()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_language() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "invalid_credentials"), "Incorrect e-mail or password.");
        assert_eq!(store.translate("pt", "invalid_credentials"), "E-mail ou senha incorretos.");
    }

    #[test]
    fn test_unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("zh", "not_found_quote"), "Cotação não encontrada.");
    }

    #[test]
    fn test_unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "some_new_key"), "some_new_key");
    }

    #[test]
    fn test_every_key_has_both_languages() {
        let store = I18nStore::new();
        for (_, key, _) in CATALOG {
            assert!(store.lookup("pt", key).is_some(), "faltando pt: {}", key);
            assert!(store.lookup("en", key).is_some(), "faltando en: {}", key);
        }
    }
}
