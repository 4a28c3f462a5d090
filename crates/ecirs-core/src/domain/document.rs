//! 재무 문서 공통 요소.
//!
//! 문서 번호 생성 및 스테이션 범위 목록 필터.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StationCode;

/// 재무 문서 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Contract,
    Invoice,
    Receipt,
}

impl DocumentKind {
    /// 문서 번호 접두사.
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Contract => "CTR",
            DocumentKind::Invoice => "INV",
            DocumentKind::Receipt => "RCT",
        }
    }
}

/// 문서 번호 생성.
///
/// 형식: `<접두사>/<스테이션>/<YYYYMMDD>/<대문자 16진수 8자리>`
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use ecirs_core::{generate_doc_num, DocumentKind, StationCode};
///
/// let num = generate_doc_num(DocumentKind::Invoice, StationCode::FrKan, Utc::now());
/// assert!(num.starts_with("INV/FR-KAN/"));
/// ```
pub fn generate_doc_num(kind: DocumentKind, station: StationCode, at: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect::<String>()
        .to_uppercase();
    format!(
        "{}/{}/{}/{}",
        kind.prefix(),
        station,
        at.format("%Y%m%d"),
        suffix
    )
}

/// 재무 문서 목록 필터.
///
/// `stations`가 `None`이면 모든 스테이션을 의미합니다 (super_admin).
/// `Some(vec![])`은 아무 문서도 보이지 않음을 의미합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter<S> {
    pub stations: Option<Vec<StationCode>>,
    pub status: Option<S>,
}

impl<S> Default for DocumentFilter<S> {
    fn default() -> Self {
        Self {
            stations: None,
            status: None,
        }
    }
}

impl<S: PartialEq + Copy> DocumentFilter<S> {
    /// 주어진 스테이션/상태의 문서가 필터를 통과하는지 확인.
    pub fn matches(&self, station: StationCode, status: S) -> bool {
        let station_ok = self
            .stations
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&station));
        let status_ok = self.status.map_or(true, |s| s == status);
        station_ok && status_ok
    }
}
