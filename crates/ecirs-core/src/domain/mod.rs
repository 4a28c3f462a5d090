//! 도메인 모델.
//!
//! 관계형 저장소에 영속되는 엔티티와 고정 열거형을 정의합니다.
//! 서비스 계층은 엔티티의 권위 있는 사본을 보관하지 않으며, 매 조회마다 저장소에서 다시 읽습니다.

/// 문자열 표현이 고정된 열거형을 정의합니다.
///
/// serde 이름, `as_str`, `Display`, `FromStr`, 전체 목록(`ALL`)을 한 번에 생성합니다.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// 허용되는 모든 값.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// 저장/전송용 문자열 표현.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::error::CoreError::unknown($kind, other)),
                }
            }
        }
    };
}

pub mod client;
pub mod contract;
pub mod document;
pub mod invoice;
pub mod money;
pub mod receipt;
pub mod station;
pub mod user;

pub use client::{Client, ClientType, ClientUpdate, NewClient};
pub use contract::{Contract, ContractStatus, ContractUpdate, NewContract};
pub use document::{generate_doc_num, DocumentFilter, DocumentKind};
pub use invoice::{compute_vat, Invoice, InvoiceStatus, InvoiceUpdate, NewInvoice, DEFAULT_VAT_RATE};
pub use money::{check_money, checked_money_add, MAX_MONEY, MONEY_SCALE};
pub use receipt::{NewReceipt, PaymentMethod, Receipt, ReceiptUpdate};
pub use station::StationCode;
pub use user::{NewUser, Role, User, UserProfile, UserStatus};
