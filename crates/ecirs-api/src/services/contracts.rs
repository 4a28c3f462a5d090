//! 계약 서비스.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ecirs_core::{
    generate_doc_num, Contract, ContractStatus, ContractUpdate, DocumentKind, NewContract,
    StationCode,
};
use rust_decimal::Decimal;

use super::scoped_filter;
use crate::auth::{require_station, Claims};
use crate::error::{ApiError, ApiResult};
use crate::repository::{ClientStore, ContractStore};

const NOT_FOUND: &str = "Contract not found";
const INVALID_PERIOD: &str = "end_date must not be before start_date";

/// 계약 생성 입력.
#[derive(Debug, Clone)]
pub struct ContractDraft {
    pub client_id: String,
    pub campaign: String,
    pub amount: Decimal,
    pub status: Option<ContractStatus>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub station_code: StationCode,
}

/// 계약 서비스.
#[derive(Clone)]
pub struct ContractService {
    contracts: Arc<dyn ContractStore>,
    clients: Arc<dyn ClientStore>,
}

impl ContractService {
    pub fn new(contracts: Arc<dyn ContractStore>, clients: Arc<dyn ClientStore>) -> Self {
        Self { contracts, clients }
    }

    /// 호출자 범위 안의 계약 목록 (최신순).
    pub async fn list(
        &self,
        claims: &Claims,
        station: Option<StationCode>,
        status: Option<ContractStatus>,
    ) -> ApiResult<Vec<Contract>> {
        let filter = scoped_filter(claims, station, status)?;
        Ok(self.contracts.list(&filter).await?)
    }

    /// 단건 조회. 없으면 404, 범위 밖이면 403.
    pub async fn get(&self, claims: &Claims, id: &str) -> ApiResult<Contract> {
        let contract = self
            .contracts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        require_station(claims, contract.station_code)?;
        Ok(contract)
    }

    pub async fn create(&self, claims: &Claims, draft: ContractDraft) -> ApiResult<Contract> {
        require_station(claims, draft.station_code)?;
        if draft.end_date < draft.start_date {
            return Err(ApiError::validation(INVALID_PERIOD));
        }

        let client = self
            .clients
            .find_by_id(&draft.client_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        let contract = self
            .contracts
            .insert(NewContract {
                doc_num: generate_doc_num(DocumentKind::Contract, draft.station_code, Utc::now()),
                client_id: client.id,
                client_name: client.company_name,
                campaign: draft.campaign,
                amount: draft.amount,
                status: draft.status.unwrap_or_default(),
                start_date: draft.start_date,
                end_date: draft.end_date,
                created_by: claims.payload.user_id.clone(),
                station_code: draft.station_code,
            })
            .await?;

        tracing::info!(
            contract_id = %contract.id,
            doc_num = %contract.doc_num,
            station = %contract.station_code,
            user_id = %claims.payload.user_id,
            "Contract created"
        );
        crate::metrics::record_document_created("contract", contract.station_code.as_str());
        Ok(contract)
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: &str,
        update: ContractUpdate,
    ) -> ApiResult<Contract> {
        let mut preview = self.get(claims, id).await?;
        if let Some(station) = update.station_code {
            require_station(claims, station)?;
        }
        update.apply_to(&mut preview);
        if !preview.has_valid_period() {
            return Err(ApiError::validation(INVALID_PERIOD));
        }

        let contract = self
            .contracts
            .update(id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        tracing::info!(contract_id = %id, status = %contract.status, "Contract updated");
        Ok(contract)
    }

    pub async fn delete(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        self.get(claims, id).await?;
        if !self.contracts.delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(contract_id = %id, user_id = %claims.payload.user_id, "Contract deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtPayload;
    use crate::repository::InMemoryStore;
    use chrono::Duration;
    use ecirs_core::{ClientType, NewClient, Role};
    use rust_decimal_macros::dec;

    fn claims(role: Role, stations: Vec<StationCode>) -> Claims {
        Claims::new(
            JwtPayload {
                user_id: "u-7".to_string(),
                username: "sales".to_string(),
                role,
                station_codes: stations,
            },
            60,
        )
    }

    async fn setup() -> (ContractService, String) {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(
            &store,
            NewClient {
                company_name: "Dala Beverages".to_string(),
                contact_person: "Sani".to_string(),
                email: "sani@dala.ng".to_string(),
                phone: "08061112222".to_string(),
                tin: "TIN-D".to_string(),
                client_type: ClientType::Direct,
                address: None,
            },
        )
        .await
        .unwrap();
        let store = Arc::new(store);
        (ContractService::new(store.clone(), store), client.id)
    }

    fn draft(client_id: &str, station: StationCode) -> ContractDraft {
        let now = Utc::now();
        ContractDraft {
            client_id: client_id.to_string(),
            campaign: "Sallah promo".to_string(),
            amount: dec!(80000),
            status: None,
            start_date: now,
            end_date: now + Duration::days(10),
            station_code: station,
        }
    }

    #[tokio::test]
    async fn test_create_fills_derived_fields() {
        let (contracts, client_id) = setup().await;
        let caller = claims(Role::SalesExecutive, vec![StationCode::FrKan]);

        let contract = contracts
            .create(&caller, draft(&client_id, StationCode::FrKan))
            .await
            .unwrap();
        assert_eq!(contract.client_name, "Dala Beverages");
        assert_eq!(contract.created_by, "u-7");
        assert_eq!(contract.status, ContractStatus::Draft);
        assert!(contract.doc_num.starts_with("CTR/FR-KAN/"));
    }

    #[tokio::test]
    async fn test_station_scope_enforced() {
        let (contracts, client_id) = setup().await;
        let admin = claims(Role::SuperAdmin, vec![]);
        let other = contracts
            .create(&admin, draft(&client_id, StationCode::FrDut))
            .await
            .unwrap();

        let manager = claims(Role::StationManager, vec![StationCode::FrKan]);
        assert!(matches!(
            contracts.create(&manager, draft(&client_id, StationCode::FrDut)).await,
            Err(ApiError::Authorization(_))
        ));
        assert!(matches!(
            contracts.get(&manager, &other.id).await,
            Err(ApiError::Authorization(_))
        ));
        assert!(contracts.list(&manager, None, None).await.unwrap().is_empty());
        assert_eq!(contracts.list(&admin, None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_period_and_missing_client() {
        let (contracts, client_id) = setup().await;
        let admin = claims(Role::SuperAdmin, vec![]);

        let mut backwards = draft(&client_id, StationCode::FrKad);
        backwards.end_date = backwards.start_date - Duration::days(1);
        assert!(matches!(
            contracts.create(&admin, backwards).await,
            Err(ApiError::Validation { .. })
        ));

        assert!(matches!(
            contracts.create(&admin, draft("missing", StationCode::FrKad)).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
