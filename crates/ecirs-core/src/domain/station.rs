//! 스테이션 코드.

string_enum! {
    /// 물리적 지점(스테이션) 식별 코드.
    ///
    /// 재무 문서의 소속과 사용자의 접근 범위를 모두 결정합니다.
    StationCode as "station code" {
        /// Freedom Radio Kano
        FrKan => "FR-KAN",
        /// Freedom Radio Dutse
        FrDut => "FR-DUT",
        /// Freedom Radio Kaduna
        FrKad => "FR-KAD",
        /// Dala FM Kano
        DlKan => "DL-KAN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_code_round_trip_through_str() {
        for code in StationCode::ALL {
            assert_eq!(code.as_str().parse::<StationCode>().unwrap(), *code);
        }
        assert!("FR-XYZ".parse::<StationCode>().is_err());
        // 대소문자 구분
        assert!("fr-kan".parse::<StationCode>().is_err());
    }

    #[test]
    fn test_station_code_serialization() {
        let json = serde_json::to_string(&StationCode::DlKan).unwrap();
        assert_eq!(json, "\"DL-KAN\"");

        let parsed: Vec<StationCode> = serde_json::from_str(r#"["FR-KAN","FR-DUT"]"#).unwrap();
        assert_eq!(parsed, vec![StationCode::FrKan, StationCode::FrDut]);

        assert!(serde_json::from_str::<StationCode>("\"KAN\"").is_err());
    }
}
