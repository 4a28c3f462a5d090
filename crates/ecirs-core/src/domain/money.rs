//! 금액 한도와 검사된 산술.
//!
//! 모든 금액 컬럼은 `NUMERIC(18, 2)`이므로 절댓값은 [`MAX_MONEY`] 이하,
//! 소수점 자릿수는 [`MONEY_SCALE`] 이하여야 합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{CoreError, CoreResult};

/// `NUMERIC(18, 2)`에 들어가는 최대 금액.
pub const MAX_MONEY: Decimal = dec!(9999999999999999.99);

/// 금액의 최대 소수점 자릿수.
pub const MONEY_SCALE: u32 = 2;

/// 금액이 저장 가능한 범위와 자릿수인지 확인합니다.
///
/// 뒤쪽 0은 자릿수에 포함하지 않습니다 (`1.500`은 허용).
pub fn check_money(value: Decimal) -> CoreResult<Decimal> {
    if value.abs() > MAX_MONEY {
        return Err(CoreError::AmountOutOfRange(format!(
            "amount must not exceed {}",
            MAX_MONEY
        )));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(CoreError::AmountOutOfRange(format!(
            "amount must have at most {} decimal places",
            MONEY_SCALE
        )));
    }
    Ok(value)
}

/// 오버플로와 컬럼 한도를 검사하는 덧셈.
pub fn checked_money_add(lhs: Decimal, rhs: Decimal) -> CoreResult<Decimal> {
    let sum = lhs
        .checked_add(rhs)
        .ok_or_else(|| CoreError::AmountOutOfRange("amount overflow".to_string()))?;
    check_money(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_money_bounds() {
        assert!(check_money(MAX_MONEY).is_ok());
        assert!(check_money(-MAX_MONEY).is_ok());
        assert!(check_money(MAX_MONEY + dec!(0.01)).is_err());
        assert!(check_money(Decimal::MAX).is_err());
    }

    #[test]
    fn test_check_money_scale() {
        assert!(check_money(dec!(1.01)).is_ok());
        assert!(check_money(dec!(1.500)).is_ok());
        assert!(matches!(
            check_money(dec!(1.005)),
            Err(CoreError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_checked_money_add() {
        assert_eq!(checked_money_add(dec!(500), dec!(-200)).unwrap(), dec!(300));
        assert!(checked_money_add(MAX_MONEY, dec!(0.01)).is_err());
        assert!(checked_money_add(Decimal::MAX, Decimal::MAX).is_err());
        assert!(checked_money_add(-MAX_MONEY, dec!(-1)).is_err());
    }
}
