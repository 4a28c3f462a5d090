//! 광고 계약.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StationCode;

string_enum! {
    /// 계약 상태.
    ///
    /// draft → pending → approved → active → completed / cancelled
    ContractStatus as "contract status" {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl Default for ContractStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// 계약 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Contract {
    pub id: String,
    pub doc_num: String,
    pub client_id: String,
    /// 생성 시점의 고객 회사명
    pub client_name: String,
    pub campaign: String,
    pub amount: Decimal,
    pub status: ContractStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub station_code: StationCode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 계약 입력.
#[derive(Debug, Clone)]
pub struct NewContract {
    pub doc_num: String,
    pub client_id: String,
    pub client_name: String,
    pub campaign: String,
    pub amount: Decimal,
    pub status: ContractStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub station_code: StationCode,
}

/// 계약 부분 수정. 고객 연결은 변경할 수 없습니다.
#[derive(Debug, Clone, Default)]
pub struct ContractUpdate {
    pub campaign: Option<String>,
    pub amount: Option<Decimal>,
    pub status: Option<ContractStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub station_code: Option<StationCode>,
}

impl ContractUpdate {
    /// 레코드에 수정 사항을 적용합니다.
    pub fn apply_to(&self, contract: &mut Contract) {
        if let Some(v) = &self.campaign {
            contract.campaign = v.clone();
        }
        if let Some(v) = self.amount {
            contract.amount = v;
        }
        if let Some(v) = self.status {
            contract.status = v;
        }
        if let Some(v) = self.start_date {
            contract.start_date = v;
        }
        if let Some(v) = self.end_date {
            contract.end_date = v;
        }
        if let Some(v) = self.station_code {
            contract.station_code = v;
        }
    }
}

impl Contract {
    /// 계약 기간이 유효한지 확인 (종료일 ≥ 시작일).
    pub fn has_valid_period(&self) -> bool {
        self.end_date >= self.start_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_update_and_period() {
        let now = Utc::now();
        let mut contract = Contract {
            id: "k-1".to_string(),
            doc_num: "CTR/FR-KAN/20260101/ABCDEF12".to_string(),
            client_id: "c-1".to_string(),
            client_name: "Kano Foods".to_string(),
            campaign: "Ramadan jingles".to_string(),
            amount: dec!(250000),
            status: ContractStatus::Draft,
            start_date: now,
            end_date: now + Duration::days(30),
            created_by: "u-1".to_string(),
            station_code: StationCode::FrKan,
            created_at: now,
            updated_at: now,
        };
        assert!(contract.has_valid_period());

        ContractUpdate {
            status: Some(ContractStatus::Approved),
            end_date: Some(now - Duration::days(1)),
            ..Default::default()
        }
        .apply_to(&mut contract);

        assert_eq!(contract.status, ContractStatus::Approved);
        assert!(!contract.has_valid_period());
        assert_eq!(contract.client_id, "c-1");
    }
}
