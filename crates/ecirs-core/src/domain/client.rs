//! 고객(청구 대상).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

string_enum! {
    /// 고객 유형.
    ClientType as "client type" {
        /// 직접 광고주
        Direct => "direct",
        /// 대행사
        Agency => "agency",
    }
}

/// 고객 레코드.
///
/// `balance`는 청구서/영수증 및 명시적 잔액 조정으로만 변경되며,
/// 프로필 수정(`ClientUpdate`)으로는 절대 덮어쓰지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Client {
    pub id: String,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    /// 납세자 식별 번호 (고유)
    pub tin: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 고객 입력. 잔액은 항상 0에서 시작합니다.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub tin: String,
    pub client_type: ClientType,
    pub address: Option<String>,
}

/// 고객 프로필 부분 수정.
///
/// `None` 필드는 변경하지 않습니다. 잔액 필드는 의도적으로 없습니다.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tin: Option<String>,
    pub client_type: Option<ClientType>,
    pub address: Option<String>,
}

impl ClientUpdate {
    /// 변경할 필드가 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.contact_person.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.tin.is_none()
            && self.client_type.is_none()
            && self.address.is_none()
    }

    /// 레코드에 수정 사항을 적용합니다. 잔액은 유지됩니다.
    pub fn apply_to(&self, client: &mut Client) {
        if let Some(v) = &self.company_name {
            client.company_name = v.clone();
        }
        if let Some(v) = &self.contact_person {
            client.contact_person = v.clone();
        }
        if let Some(v) = &self.email {
            client.email = v.clone();
        }
        if let Some(v) = &self.phone {
            client.phone = v.clone();
        }
        if let Some(v) = &self.tin {
            client.tin = v.clone();
        }
        if let Some(v) = self.client_type {
            client.client_type = v;
        }
        if let Some(v) = &self.address {
            client.address = Some(v.clone());
        }
    }
}
