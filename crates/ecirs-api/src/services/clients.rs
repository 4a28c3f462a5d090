//! 고객 서비스.

use std::sync::Arc;

use ecirs_core::{Client, ClientUpdate, NewClient};
use rust_decimal::Decimal;

use crate::error::{ApiError, ApiResult};
use crate::repository::ClientStore;

const NOT_FOUND: &str = "Client not found";
const DUPLICATE_TIN: &str = "Client with this TIN already exists";

/// 고객 서비스.
#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self { clients }
    }

    pub async fn list(&self) -> ApiResult<Vec<Client>> {
        Ok(self.clients.list().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Client> {
        self.clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    /// 고객 생성. 같은 TIN이 있으면 삽입 전에 거부합니다.
    pub async fn create(&self, input: NewClient) -> ApiResult<Client> {
        if self.clients.find_by_tin(&input.tin).await?.is_some() {
            return Err(ApiError::Duplicate(DUPLICATE_TIN.to_string()));
        }

        let client = self.clients.insert(input).await?;
        tracing::info!(client_id = %client.id, tin = %client.tin, "Client created");
        Ok(client)
    }

    /// 프로필 부분 수정. 다른 고객의 TIN으로 바꾸려 하면 거부합니다.
    pub async fn update(&self, id: &str, update: ClientUpdate) -> ApiResult<Client> {
        if let Some(tin) = &update.tin {
            if let Some(owner) = self.clients.find_by_tin(tin).await? {
                if owner.id != id {
                    return Err(ApiError::Duplicate(DUPLICATE_TIN.to_string()));
                }
            }
        }

        let client = self
            .clients
            .update(id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        tracing::info!(client_id = %client.id, "Client updated");
        Ok(client)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.clients.delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(client_id = %id, "Client deleted");
        Ok(())
    }

    /// 잔액에 `delta`를 더합니다 (음수면 차감).
    pub async fn adjust_balance(&self, id: &str, delta: Decimal) -> ApiResult<Client> {
        let client = self
            .clients
            .adjust_balance(id, delta)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        tracing::info!(client_id = %id, delta = %delta, balance = %client.balance, "Client balance adjusted");
        crate::metrics::record_balance_adjustment();
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use ecirs_core::ClientType;
    use rust_decimal_macros::dec;

    fn new_client(tin: &str) -> NewClient {
        NewClient {
            company_name: "Kaduna Textiles".to_string(),
            contact_person: "Halima".to_string(),
            email: "halima@kadtex.ng".to_string(),
            phone: "08091234567".to_string(),
            tin: tin.to_string(),
            client_type: ClientType::Agency,
            address: Some("4 Ahmadu Bello Way".to_string()),
        }
    }

    fn service() -> ClientService {
        ClientService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_duplicate_tin_rejected_before_insert() {
        let clients = service();
        clients.create(new_client("TIN-9")).await.unwrap();

        let err = clients.create(new_client("TIN-9")).await.unwrap_err();
        assert_eq!(err, ApiError::Duplicate(DUPLICATE_TIN.to_string()));
        assert_eq!(clients.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_foreign_tin_rejected() {
        let clients = service();
        clients.create(new_client("TIN-1")).await.unwrap();
        let second = clients.create(new_client("TIN-2")).await.unwrap();

        let err = clients
            .update(
                &second.id,
                ClientUpdate {
                    tin: Some("TIN-1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_balance_adjustments_accumulate() {
        let clients = service();
        let client = clients.create(new_client("TIN-1")).await.unwrap();

        clients.adjust_balance(&client.id, dec!(500)).await.unwrap();
        let after = clients.adjust_balance(&client.id, dec!(-200)).await.unwrap();
        assert_eq!(after.balance, client.balance + dec!(300));
    }

    #[tokio::test]
    async fn test_missing_client_is_not_found() {
        let clients = service();
        assert!(matches!(clients.get("nope").await, Err(ApiError::NotFound(_))));
        assert!(matches!(clients.delete("nope").await, Err(ApiError::NotFound(_))));
        assert!(matches!(
            clients.adjust_balance("nope", dec!(1)).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
