// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::product::PRODUCT_CATEGORIES;

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// Colunas monetárias são NUMERIC(14, 4): 4 casas decimais e 10 dígitos inteiros.
const MONEY_MAX_SCALE: u32 = 4;
const MONEY_LIMIT: i64 = 10_000_000_000;

fn validate_money_column(val: &Decimal) -> Result<(), ValidationError> {
    if val.normalize().scale() > MONEY_MAX_SCALE {
        let mut err = ValidationError::new("scale");
        err.add_param("max".into(), &MONEY_MAX_SCALE);
        err.message = Some("Use no máximo 4 casas decimais.".into());
        return Err(err);
    }
    if val.abs() >= Decimal::from(MONEY_LIMIT) {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_max".into(), &MONEY_LIMIT);
        err.message = Some("O valor excede o máximo permitido.".into());
        return Err(err);
    }
    Ok(())
}

/// Preço unitário da cotação: positivo e dentro da coluna.
pub fn validate_unit_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_positive(val)?;
    validate_money_column(val)
}

/// Preço-alvo do produto: zero é aceito.
pub fn validate_target_price(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    validate_money_column(val)
}

/// Obrigatórios de texto: só espaços conta como vazio.
pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &1);
        err.message = Some("O campo é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_category(val: &str) -> Result<(), ValidationError> {
    if !PRODUCT_CATEGORIES.contains(&val) {
        let mut err = ValidationError::new("category");
        err.message = Some("Categoria inválida.".into());
        return Err(err);
    }
    Ok(())
}

/// Campos opcionais vazios (ou só com espaços) viram `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_not_negative_accepts_zero() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_not_negative(&Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::from_str("-5").unwrap()).is_err());
        assert!(validate_positive(&Decimal::from_str("5.12").unwrap()).is_ok());
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_unit_price_respects_column_scale() {
        assert!(validate_unit_price(&dec("0.0001")).is_ok());
        assert!(validate_unit_price(&dec("1.2346")).is_ok());
        assert!(validate_unit_price(&dec("1.50000")).is_ok());

        let err = validate_unit_price(&dec("0.00004")).unwrap_err();
        assert_eq!(err.code, "scale");
        assert!(validate_unit_price(&dec("1.23456")).is_err());
    }

    #[test]
    fn test_unit_price_respects_column_magnitude() {
        assert!(validate_unit_price(&dec("9999999999.9999")).is_ok());

        let err = validate_unit_price(&dec("10000000000")).unwrap_err();
        assert_eq!(err.code, "range");
        assert!(validate_unit_price(&dec("12345678901.5")).is_err());
    }

    #[test]
    fn test_unit_price_still_rejects_zero() {
        assert!(validate_unit_price(&Decimal::ZERO).is_err());
        assert!(validate_unit_price(&dec("-1")).is_err());
    }

    #[test]
    fn test_target_price_accepts_zero_within_column() {
        assert!(validate_target_price(&Decimal::ZERO).is_ok());
        assert!(validate_target_price(&dec("12.5")).is_ok());
        assert!(validate_target_price(&dec("-0.5")).is_err());
        assert!(validate_target_price(&dec("0.12345")).is_err());
        assert!(validate_target_price(&dec("99999999999")).is_err());
    }

    #[test]
    fn test_blank_required_text_is_rejected() {
        assert!(validate_not_blank("Fábrica Shenzhen").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    #[test]
    fn test_category_must_be_known() {
        assert!(validate_category("Brinquedos").is_ok());
        assert!(validate_category("Armas").is_err());
    }

    #[test]
    fn test_blank_optional_strings_become_none() {
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(Some(" FN-001 ".into())), Some("FN-001".into()));
        assert_eq!(non_empty(None), None);
    }
}
