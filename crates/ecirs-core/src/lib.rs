//! # ECIRS Core
//!
//! 계약/청구서/영수증 관리 시스템(ECIRS)의 핵심 도메인 모델 및 공통 인프라.
//!
//! 이 크레이트는 HTTP 계층에 의존하지 않는 기본 타입을 제공합니다:
//! - 사용자, 고객, 계약, 청구서, 영수증 엔티티
//! - 스테이션 코드 및 역할 정의
//! - 역할/스테이션 기반 접근 제어 규칙
//! - 문서 번호 생성 및 VAT 계산
//! - 설정 관리
//! - 로깅 인프라

pub mod access;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use access::{role_allowed, station_allowed, visible_stations};
pub use config::*;
pub use domain::*;
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogFormat};
