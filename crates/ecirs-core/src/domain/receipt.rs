//! 영수증 (수납 기록).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StationCode;

string_enum! {
    /// 결제 수단.
    PaymentMethod as "payment method" {
        Cash => "cash",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        Pos => "pos",
    }
}

/// 영수증 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Receipt {
    pub id: String,
    pub doc_num: String,
    pub invoice_id: String,
    pub client_id: String,
    /// 고객 잔액에서 차감되는 금액
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub station_code: StationCode,
    pub received_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 영수증 입력.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub doc_num: String,
    pub invoice_id: String,
    pub client_id: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub station_code: StationCode,
    pub received_by: String,
}

/// 영수증 부분 수정. 청구서/고객 연결은 변경할 수 없습니다.
#[derive(Debug, Clone, Default)]
pub struct ReceiptUpdate {
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
    pub station_code: Option<StationCode>,
}

impl ReceiptUpdate {
    /// 레코드에 수정 사항을 적용합니다.
    pub fn apply_to(&self, receipt: &mut Receipt) {
        if let Some(v) = self.amount {
            receipt.amount = v;
        }
        if let Some(v) = self.payment_method {
            receipt.payment_method = v;
        }
        if let Some(v) = &self.payment_reference {
            receipt.payment_reference = Some(v.clone());
        }
        if let Some(v) = self.station_code {
            receipt.station_code = v;
        }
    }
}
