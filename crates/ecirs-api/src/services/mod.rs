//! 리소스 서비스 모듈.
//!
//! 저장소 트레이트 객체를 주입받아 비즈니스 규칙(중복 검사, 참조 확인,
//! 스테이션 범위, 문서 번호 생성)을 적용합니다. 역할 게이트는 라우트에서 처리합니다.

pub mod auth;
pub mod clients;
pub mod contracts;
pub mod invoices;
pub mod receipts;

pub use auth::{AuthService, Registration};
pub use clients::ClientService;
pub use contracts::{ContractDraft, ContractService};
pub use invoices::{InvoiceDraft, InvoiceService};
pub use receipts::{ReceiptDraft, ReceiptService};

use ecirs_core::{visible_stations, DocumentFilter, StationCode};

use crate::auth::{require_station, Claims};
use crate::error::ApiResult;

/// 호출자 범위로 제한된 목록 필터 생성.
///
/// 명시적 `station` 필터는 호출자 범위 안이어야 하며(아니면 403),
/// 지정하지 않으면 호출자가 볼 수 있는 모든 스테이션이 대상입니다.
pub fn scoped_filter<S>(
    claims: &Claims,
    station: Option<StationCode>,
    status: Option<S>,
) -> ApiResult<DocumentFilter<S>> {
    let stations = match station {
        Some(station) => {
            require_station(claims, station)?;
            Some(vec![station])
        }
        None => visible_stations(claims.payload.role, &claims.payload.station_codes),
    };
    Ok(DocumentFilter { stations, status })
}
