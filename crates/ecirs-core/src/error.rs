//! 도메인 에러 타입.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// 알 수 없는 열거형 값 (예: DB에 저장된 잘못된 역할 문자열)
    #[error("알 수 없는 {kind} 값: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 금액이 저장 가능한 범위/자릿수를 벗어남
    #[error("{0}")]
    AmountOutOfRange(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

impl CoreError {
    /// `UnknownVariant` 생성 헬퍼.
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
