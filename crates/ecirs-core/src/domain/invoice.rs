//! 청구서 및 VAT 계산.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::check_money;
use super::StationCode;
use crate::error::{CoreError, CoreResult};

/// 기본 VAT 세율 (%).
pub const DEFAULT_VAT_RATE: Decimal = dec!(7.5);

string_enum! {
    /// 청구서 상태.
    ///
    /// draft → sent → paid / overdue / cancelled
    InvoiceStatus as "invoice status" {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// VAT 금액과 총액을 계산합니다.
///
/// VAT는 소수점 둘째 자리로 반올림합니다 (0.5는 0에서 먼 쪽으로).
/// 중간 계산이 넘치거나 총액이 금액 한도를 넘으면 `AmountOutOfRange`.
///
/// # Returns
///
/// `(vat_amount, total_amount)`
pub fn compute_vat(amount: Decimal, vat_rate: Decimal) -> CoreResult<(Decimal, Decimal)> {
    let overflow = || CoreError::AmountOutOfRange("invoice total is too large".to_string());

    let vat_amount = amount
        .checked_mul(vat_rate)
        .and_then(|v| v.checked_div(dec!(100)))
        .ok_or_else(overflow)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total_amount = amount.checked_add(vat_amount).ok_or_else(overflow)?;
    check_money(total_amount).map_err(|_| overflow())?;

    Ok((vat_amount, total_amount))
}

/// 청구서 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Invoice {
    pub id: String,
    pub doc_num: String,
    pub contract_id: String,
    pub client_id: String,
    pub amount: Decimal,
    /// VAT 세율 (%)
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    /// 고객 잔액에 반영되는 금액
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
    pub station_code: StationCode,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 청구서 입력. VAT 및 총액은 저장 전에 계산되어 있어야 합니다.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub doc_num: String,
    pub contract_id: String,
    pub client_id: String,
    pub amount: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
    pub station_code: StationCode,
    pub created_by: String,
}

impl NewInvoice {
    /// 금액과 세율로부터 VAT/총액을 채워 넣습니다.
    #[allow(clippy::too_many_arguments)]
    pub fn priced(
        doc_num: String,
        contract_id: String,
        client_id: String,
        amount: Decimal,
        vat_rate: Decimal,
        status: InvoiceStatus,
        due_date: DateTime<Utc>,
        station_code: StationCode,
        created_by: String,
    ) -> CoreResult<Self> {
        let (vat_amount, total_amount) = compute_vat(amount, vat_rate)?;
        Ok(Self {
            doc_num,
            contract_id,
            client_id,
            amount,
            vat_rate,
            vat_amount,
            total_amount,
            status,
            due_date,
            station_code,
            created_by,
        })
    }
}

/// 청구서 부분 수정. 계약/고객 연결은 변경할 수 없습니다.
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    pub amount: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub status: Option<InvoiceStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub station_code: Option<StationCode>,
}

impl InvoiceUpdate {
    /// 레코드에 수정 사항을 적용하고 VAT/총액을 다시 계산합니다.
    ///
    /// 총액 계산이 실패하면 레코드는 변경되지 않습니다.
    pub fn apply_to(&self, invoice: &mut Invoice) -> CoreResult<()> {
        let amount = self.amount.unwrap_or(invoice.amount);
        let vat_rate = self.vat_rate.unwrap_or(invoice.vat_rate);
        let (vat_amount, total_amount) = compute_vat(amount, vat_rate)?;

        invoice.amount = amount;
        invoice.vat_rate = vat_rate;
        invoice.vat_amount = vat_amount;
        invoice.total_amount = total_amount;
        if let Some(v) = self.status {
            invoice.status = v;
        }
        if let Some(v) = self.due_date {
            invoice.due_date = v;
        }
        if let Some(v) = self.station_code {
            invoice.station_code = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_vat_default_rate() {
        let (vat, total) = compute_vat(dec!(100000), DEFAULT_VAT_RATE).unwrap();
        assert_eq!(vat, dec!(7500));
        assert_eq!(total, dec!(107500));
    }

    #[test]
    fn test_compute_vat_rounds_to_two_places() {
        let (vat, total) = compute_vat(dec!(333.33), dec!(7.5)).unwrap();
        // 24.99975 → 25.00
        assert_eq!(vat, dec!(25.00));
        assert_eq!(total, dec!(358.33));
    }

    #[test]
    fn test_compute_vat_midpoint_rounds_up() {
        // 1.5 * 7.5% = 0.1125 → 0.11, 3.5 * 5% = 0.175 → 0.18
        assert_eq!(compute_vat(dec!(1.5), dec!(7.5)).unwrap().0, dec!(0.11));
        assert_eq!(compute_vat(dec!(3.5), dec!(5)).unwrap().0, dec!(0.18));
    }

    #[test]
    fn test_compute_vat_zero_rate() {
        let (vat, total) = compute_vat(dec!(50), Decimal::ZERO).unwrap();
        assert_eq!(vat, Decimal::ZERO);
        assert_eq!(total, dec!(50));
    }

    #[test]
    fn test_update_recomputes_totals() {
        let now = Utc::now();
        let mut invoice = Invoice {
            id: "i-1".to_string(),
            doc_num: "INV/FR-DUT/20260101/00000001".to_string(),
            contract_id: "k-1".to_string(),
            client_id: "c-1".to_string(),
            amount: dec!(1000),
            vat_rate: dec!(7.5),
            vat_amount: dec!(75),
            total_amount: dec!(1075),
            status: InvoiceStatus::Draft,
            due_date: now,
            station_code: StationCode::FrDut,
            created_by: "u-1".to_string(),
            created_at: now,
            updated_at: now,
        };

        InvoiceUpdate {
            amount: Some(dec!(2000)),
            ..Default::default()
        }
        .apply_to(&mut invoice)
        .unwrap();
        assert_eq!(invoice.vat_amount, dec!(150));
        assert_eq!(invoice.total_amount, dec!(2150));

        InvoiceUpdate {
            vat_rate: Some(dec!(0)),
            status: Some(InvoiceStatus::Sent),
            ..Default::default()
        }
        .apply_to(&mut invoice)
        .unwrap();
        assert_eq!(invoice.total_amount, dec!(2000));
        assert_eq!(invoice.status, InvoiceStatus::Sent);
    }

    #[test]
    fn test_compute_vat_rejects_oversize_amounts() {
        assert!(matches!(
            compute_vat(Decimal::MAX, dec!(7.5)),
            Err(CoreError::AmountOutOfRange(_))
        ));
        let two_e28 = Decimal::from_i128_with_scale(2 * 10_i128.pow(28), 0);
        assert!(compute_vat(two_e28, dec!(100)).is_err());
        // 금액은 한도 안이지만 VAT를 더한 총액이 넘침
        assert!(compute_vat(crate::domain::money::MAX_MONEY, dec!(7.5)).is_err());
    }

    #[test]
    fn test_failed_update_leaves_invoice_untouched() {
        let now = Utc::now();
        let mut invoice = Invoice {
            id: "i-2".to_string(),
            doc_num: "INV/FR-DUT/20260101/00000002".to_string(),
            contract_id: "k-1".to_string(),
            client_id: "c-1".to_string(),
            amount: dec!(1000),
            vat_rate: dec!(7.5),
            vat_amount: dec!(75),
            total_amount: dec!(1075),
            status: InvoiceStatus::Draft,
            due_date: now,
            station_code: StationCode::FrDut,
            created_by: "u-1".to_string(),
            created_at: now,
            updated_at: now,
        };
        let before = invoice.clone();

        let result = InvoiceUpdate {
            amount: Some(Decimal::MAX),
            status: Some(InvoiceStatus::Sent),
            ..Default::default()
        }
        .apply_to(&mut invoice);

        assert!(result.is_err());
        assert_eq!(invoice, before);
    }
}
