//! 인메모리 저장소.
//!
//! 모든 테이블을 단일 `RwLock` 아래에 둡니다. 문서 쓰기와 잔액 조정이
//! 같은 쓰기 잠금 안에서 일어나므로 PostgreSQL 트랜잭션과 같은 원자성을 가집니다.
//! 테스트와 데이터베이스 없는 로컬 실행에 사용됩니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use ecirs_core::{
    check_money, checked_money_add, Client, ClientUpdate, Contract, ContractStatus, ContractUpdate,
    DocumentFilter, Invoice, InvoiceStatus, InvoiceUpdate, NewClient, NewContract, NewInvoice,
    NewReceipt, NewUser, Receipt, ReceiptUpdate, User, UserStatus,
};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ClientStore, ContractStore, InvoiceStore, ReceiptStore, StoreError, StoreResult, UserStore,
    FOREIGN_KEY_MESSAGE, UNIQUE_MESSAGE,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    clients: Vec<Client>,
    contracts: Vec<Contract>,
    invoices: Vec<Invoice>,
    receipts: Vec<Receipt>,
}

impl Tables {
    fn client_mut(&mut self, id: &str) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    /// 고객 잔액 조정. 고객이 없으면 `Conflict`.
    fn adjust_balance(&mut self, client_id: &str, delta: Decimal) -> StoreResult<()> {
        if delta.is_zero() {
            return Ok(());
        }
        let client = self
            .client_mut(client_id)
            .ok_or_else(|| StoreError::Conflict(format!("Client {} does not exist", client_id)))?;
        client.balance = checked_money_add(client.balance, delta)?;
        client.updated_at = Utc::now();
        Ok(())
    }
}

fn conflict(message: &str) -> StoreError {
    StoreError::Conflict(message.to_string())
}

/// 최신 레코드가 먼저 오도록 필터링된 복사본을 반환합니다.
fn newest_first<T: Clone>(rows: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().rev().filter(|row| keep(row)).cloned().collect()
}

/// 인메모리 저장소.
///
/// 복제본은 같은 테이블을 공유하므로 하나의 인스턴스를 다섯 개의
/// 저장소 트레이트 객체로 나누어 주입할 수 있습니다.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자 상태 변경. 계정 관리 API가 없으므로 운영 도구와 테스트에서 사용합니다.
    pub async fn set_user_status(&self, id: &str, status: UserStatus) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.status = status;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

// ==================== 사용자 ====================

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(conflict(UNIQUE_MESSAGE));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            phone: user.phone,
            role: user.role,
            station_codes: user.station_codes,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

// ==================== 고객 ====================

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Client>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.clients, |_| true))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Client>> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_tin(&self, tin: &str) -> StoreResult<Option<Client>> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().find(|c| c.tin == tin).cloned())
    }

    async fn insert(&self, client: NewClient) -> StoreResult<Client> {
        let mut tables = self.tables.write().await;
        if tables.clients.iter().any(|c| c.tin == client.tin) {
            return Err(conflict(UNIQUE_MESSAGE));
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            company_name: client.company_name,
            contact_person: client.contact_person,
            email: client.email,
            phone: client.phone,
            tin: client.tin,
            client_type: client.client_type,
            balance: Decimal::ZERO,
            address: client.address,
            created_at: now,
            updated_at: now,
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn update(&self, id: &str, update: ClientUpdate) -> StoreResult<Option<Client>> {
        let mut tables = self.tables.write().await;
        if let Some(tin) = &update.tin {
            if tables.clients.iter().any(|c| &c.tin == tin && c.id != id) {
                return Err(conflict(UNIQUE_MESSAGE));
            }
        }

        let Some(client) = tables.client_mut(id) else {
            return Ok(None);
        };
        if !update.is_empty() {
            update.apply_to(client);
            client.updated_at = Utc::now();
        }
        Ok(Some(client.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.contracts.iter().any(|k| k.client_id == id) {
            return Err(conflict("Client still has contracts"));
        }

        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        Ok(tables.clients.len() < before)
    }

    async fn adjust_balance(&self, id: &str, delta: Decimal) -> StoreResult<Option<Client>> {
        let mut tables = self.tables.write().await;
        let Some(client) = tables.client_mut(id) else {
            return Ok(None);
        };
        client.balance = checked_money_add(client.balance, delta)?;
        client.updated_at = Utc::now();
        Ok(Some(client.clone()))
    }
}

// ==================== 계약 ====================

#[async_trait]
impl ContractStore for InMemoryStore {
    async fn list(&self, filter: &DocumentFilter<ContractStatus>) -> StoreResult<Vec<Contract>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.contracts, |k| {
            filter.matches(k.station_code, k.status)
        }))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contract>> {
        let tables = self.tables.read().await;
        Ok(tables.contracts.iter().find(|k| k.id == id).cloned())
    }

    async fn insert(&self, contract: NewContract) -> StoreResult<Contract> {
        let mut tables = self.tables.write().await;
        if !tables.clients.iter().any(|c| c.id == contract.client_id) {
            return Err(conflict(FOREIGN_KEY_MESSAGE));
        }
        if tables.contracts.iter().any(|k| k.doc_num == contract.doc_num) {
            return Err(conflict(UNIQUE_MESSAGE));
        }

        let now = Utc::now();
        let contract = Contract {
            id: Uuid::new_v4().to_string(),
            doc_num: contract.doc_num,
            client_id: contract.client_id,
            client_name: contract.client_name,
            campaign: contract.campaign,
            amount: contract.amount,
            status: contract.status,
            start_date: contract.start_date,
            end_date: contract.end_date,
            created_by: contract.created_by,
            station_code: contract.station_code,
            created_at: now,
            updated_at: now,
        };
        tables.contracts.push(contract.clone());
        Ok(contract)
    }

    async fn update(&self, id: &str, update: ContractUpdate) -> StoreResult<Option<Contract>> {
        let mut tables = self.tables.write().await;
        let Some(contract) = tables.contracts.iter_mut().find(|k| k.id == id) else {
            return Ok(None);
        };
        update.apply_to(contract);
        contract.updated_at = Utc::now();
        Ok(Some(contract.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.invoices.iter().any(|i| i.contract_id == id) {
            return Err(conflict("Contract still has invoices"));
        }

        let before = tables.contracts.len();
        tables.contracts.retain(|k| k.id != id);
        Ok(tables.contracts.len() < before)
    }
}

// ==================== 청구서 ====================

#[async_trait]
impl InvoiceStore for InMemoryStore {
    async fn list(&self, filter: &DocumentFilter<InvoiceStatus>) -> StoreResult<Vec<Invoice>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.invoices, |i| {
            filter.matches(i.station_code, i.status)
        }))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let tables = self.tables.read().await;
        Ok(tables.invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        let mut tables = self.tables.write().await;
        if !tables.contracts.iter().any(|k| k.id == invoice.contract_id) {
            return Err(conflict(FOREIGN_KEY_MESSAGE));
        }
        if tables.invoices.iter().any(|i| i.doc_num == invoice.doc_num) {
            return Err(conflict(UNIQUE_MESSAGE));
        }
        tables.adjust_balance(&invoice.client_id, invoice.total_amount)?;

        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            doc_num: invoice.doc_num,
            contract_id: invoice.contract_id,
            client_id: invoice.client_id,
            amount: invoice.amount,
            vat_rate: invoice.vat_rate,
            vat_amount: invoice.vat_amount,
            total_amount: invoice.total_amount,
            status: invoice.status,
            due_date: invoice.due_date,
            station_code: invoice.station_code,
            created_by: invoice.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, id: &str, update: InvoiceUpdate) -> StoreResult<Option<Invoice>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.invoices.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };

        let mut invoice = current.clone();
        update.apply_to(&mut invoice)?;
        invoice.updated_at = Utc::now();
        tables.adjust_balance(&invoice.client_id, invoice.total_amount - current.total_amount)?;

        if let Some(slot) = tables.invoices.iter_mut().find(|i| i.id == id) {
            *slot = invoice.clone();
        }
        Ok(Some(invoice))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.receipts.iter().any(|r| r.invoice_id == id) {
            return Err(conflict("Invoice still has receipts"));
        }

        let Some(position) = tables.invoices.iter().position(|i| i.id == id) else {
            return Ok(false);
        };
        let (client_id, total_amount) = {
            let invoice = &tables.invoices[position];
            (invoice.client_id.clone(), invoice.total_amount)
        };
        tables.adjust_balance(&client_id, -total_amount)?;
        tables.invoices.remove(position);
        Ok(true)
    }
}

// ==================== 영수증 ====================

#[async_trait]
impl ReceiptStore for InMemoryStore {
    async fn list(&self, filter: &DocumentFilter<()>) -> StoreResult<Vec<Receipt>> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.receipts, |r| {
            filter.matches(r.station_code, ())
        }))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Receipt>> {
        let tables = self.tables.read().await;
        Ok(tables.receipts.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, receipt: NewReceipt) -> StoreResult<Receipt> {
        let mut tables = self.tables.write().await;
        if !tables.invoices.iter().any(|i| i.id == receipt.invoice_id) {
            return Err(conflict(FOREIGN_KEY_MESSAGE));
        }
        if tables.receipts.iter().any(|r| r.doc_num == receipt.doc_num) {
            return Err(conflict(UNIQUE_MESSAGE));
        }
        tables.adjust_balance(&receipt.client_id, -receipt.amount)?;

        let now = Utc::now();
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            doc_num: receipt.doc_num,
            invoice_id: receipt.invoice_id,
            client_id: receipt.client_id,
            amount: receipt.amount,
            payment_method: receipt.payment_method,
            payment_reference: receipt.payment_reference,
            station_code: receipt.station_code,
            received_by: receipt.received_by,
            created_at: now,
            updated_at: now,
        };
        tables.receipts.push(receipt.clone());
        Ok(receipt)
    }

    async fn update(&self, id: &str, update: ReceiptUpdate) -> StoreResult<Option<Receipt>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.receipts.iter().find(|r| r.id == id).cloned() else {
            return Ok(None);
        };

        let mut receipt = current.clone();
        update.apply_to(&mut receipt);
        receipt.updated_at = Utc::now();
        check_money(receipt.amount)?;
        tables.adjust_balance(&receipt.client_id, current.amount - receipt.amount)?;

        if let Some(slot) = tables.receipts.iter_mut().find(|r| r.id == id) {
            *slot = receipt.clone();
        }
        Ok(Some(receipt))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(position) = tables.receipts.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let (client_id, amount) = {
            let receipt = &tables.receipts[position];
            (receipt.client_id.clone(), receipt.amount)
        };
        tables.adjust_balance(&client_id, amount)?;
        tables.receipts.remove(position);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use ecirs_core::{ClientType, PaymentMethod, Role, StationCode};
    use rust_decimal_macros::dec;

    fn new_client(tin: &str) -> NewClient {
        NewClient {
            company_name: "Kano Foods".to_string(),
            contact_person: "Musa".to_string(),
            email: "musa@kanofoods.ng".to_string(),
            phone: "08031234567".to_string(),
            tin: tin.to_string(),
            client_type: ClientType::Direct,
            address: None,
        }
    }

    fn new_contract(client: &Client, station: StationCode) -> NewContract {
        let now = Utc::now();
        NewContract {
            doc_num: format!("CTR/{}/{}", station, Uuid::new_v4()),
            client_id: client.id.clone(),
            client_name: client.company_name.clone(),
            campaign: "Morning drive".to_string(),
            amount: dec!(100000),
            status: ContractStatus::Draft,
            start_date: now,
            end_date: now + Duration::days(30),
            created_by: "u-1".to_string(),
            station_code: station,
        }
    }

    fn new_invoice(contract: &Contract, amount: Decimal) -> NewInvoice {
        NewInvoice::priced(
            format!("INV/{}", Uuid::new_v4()),
            contract.id.clone(),
            contract.client_id.clone(),
            amount,
            dec!(7.5),
            InvoiceStatus::Draft,
            Utc::now() + Duration::days(14),
            contract.station_code,
            "u-1".to_string(),
        )
        .unwrap()
    }

    fn new_receipt(invoice: &Invoice, amount: Decimal) -> NewReceipt {
        NewReceipt {
            doc_num: format!("RCT/{}", Uuid::new_v4()),
            invoice_id: invoice.id.clone(),
            client_id: invoice.client_id.clone(),
            amount,
            payment_method: PaymentMethod::BankTransfer,
            payment_reference: Some("TRX-1".to_string()),
            station_code: invoice.station_code,
            received_by: "u-2".to_string(),
        }
    }

    async fn balance(store: &InMemoryStore, client_id: &str) -> Decimal {
        ClientStore::find_by_id(store, client_id)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    #[tokio::test]
    async fn test_duplicate_username_and_tin_conflict() {
        let store = InMemoryStore::new();
        let user = NewUser {
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "Amina Bello".to_string(),
            phone: "0803".to_string(),
            role: Role::Viewer,
            station_codes: vec![],
        };
        let created = UserStore::insert(&store, user.clone()).await.unwrap();
        assert_eq!(created.status, UserStatus::Active);
        assert!(matches!(
            UserStore::insert(&store, user).await,
            Err(StoreError::Conflict(_))
        ));

        ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        assert!(matches!(
            ClientStore::insert(&store, new_client("TIN-1")).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(ClientStore::list(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_client_tin_update_conflict() {
        let store = InMemoryStore::new();
        ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        let second = ClientStore::insert(&store, new_client("TIN-2")).await.unwrap();

        let update = ClientUpdate {
            tin: Some("TIN-1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ClientStore::update(&store, &second.id, update).await,
            Err(StoreError::Conflict(_))
        ));

        // 자기 자신의 TIN으로 수정하는 것은 허용
        let same = ClientUpdate {
            tin: Some("TIN-2".to_string()),
            ..Default::default()
        };
        assert!(ClientStore::update(&store, &second.id, same)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryStore::new();
        let first = ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        let second = ClientStore::insert(&store, new_client("TIN-2")).await.unwrap();

        let ids: Vec<String> = ClientStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_contract_filter() {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        ContractStore::insert(&store, new_contract(&client, StationCode::FrKan))
            .await
            .unwrap();
        ContractStore::insert(&store, new_contract(&client, StationCode::FrDut))
            .await
            .unwrap();

        let filter = DocumentFilter {
            stations: Some(vec![StationCode::FrDut]),
            status: None,
        };
        let scoped = ContractStore::list(&store, &filter).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].station_code, StationCode::FrDut);

        let approved = DocumentFilter {
            stations: None,
            status: Some(ContractStatus::Approved),
        };
        assert!(ContractStore::list(&store, &approved).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_and_receipt_ledger() {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        let contract = ContractStore::insert(&store, new_contract(&client, StationCode::FrKan))
            .await
            .unwrap();

        let invoice = InvoiceStore::insert(&store, new_invoice(&contract, dec!(1000)))
            .await
            .unwrap();
        assert_eq!(invoice.total_amount, dec!(1075));
        assert_eq!(balance(&store, &client.id).await, dec!(1075));

        let receipt = ReceiptStore::insert(&store, new_receipt(&invoice, dec!(500)))
            .await
            .unwrap();
        assert_eq!(balance(&store, &client.id).await, dec!(575));

        let update = ReceiptUpdate {
            amount: Some(dec!(700)),
            ..Default::default()
        };
        ReceiptStore::update(&store, &receipt.id, update).await.unwrap();
        assert_eq!(balance(&store, &client.id).await, dec!(375));

        assert!(ReceiptStore::delete(&store, &receipt.id).await.unwrap());
        assert_eq!(balance(&store, &client.id).await, dec!(1075));

        let update = InvoiceUpdate {
            amount: Some(dec!(2000)),
            ..Default::default()
        };
        let updated = InvoiceStore::update(&store, &invoice.id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.total_amount, dec!(2150));
        assert_eq!(balance(&store, &client.id).await, dec!(2150));

        assert!(InvoiceStore::delete(&store, &invoice.id).await.unwrap());
        assert_eq!(balance(&store, &client.id).await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_delete_with_dependents_conflicts() {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        let contract = ContractStore::insert(&store, new_contract(&client, StationCode::FrKan))
            .await
            .unwrap();
        let invoice = InvoiceStore::insert(&store, new_invoice(&contract, dec!(100)))
            .await
            .unwrap();
        ReceiptStore::insert(&store, new_receipt(&invoice, dec!(50)))
            .await
            .unwrap();

        assert!(matches!(
            ClientStore::delete(&store, &client.id).await,
            Err(StoreError::Conflict(_))
        ));
        assert!(matches!(
            ContractStore::delete(&store, &contract.id).await,
            Err(StoreError::Conflict(_))
        ));
        let before = balance(&store, &client.id).await;
        assert!(matches!(
            InvoiceStore::delete(&store, &invoice.id).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(balance(&store, &client.id).await, before);
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let store = InMemoryStore::new();
        assert!(!ClientStore::delete(&store, "nope").await.unwrap());
        assert!(ClientStore::adjust_balance(&store, "nope", dec!(1))
            .await
            .unwrap()
            .is_none());
        assert!(InvoiceStore::update(&store, "nope", InvoiceUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.set_user_status("nope", UserStatus::Inactive).await);
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = InMemoryStore::new();
        let other = store.clone();
        ClientStore::insert(&store, new_client("TIN-1")).await.unwrap();
        assert_eq!(ClientStore::list(&other).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_balance_overflow_is_rejected_without_change() {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(&store, new_client("TIN-MAX")).await.unwrap();

        ClientStore::adjust_balance(&store, &client.id, ecirs_core::MAX_MONEY)
            .await
            .unwrap();
        let result = ClientStore::adjust_balance(&store, &client.id, dec!(0.01)).await;
        assert!(matches!(result, Err(StoreError::OutOfRange(_))));

        let result = ClientStore::adjust_balance(&store, &client.id, Decimal::MAX).await;
        assert!(matches!(result, Err(StoreError::OutOfRange(_))));
        assert_eq!(balance(&store, &client.id).await, ecirs_core::MAX_MONEY);
    }

    #[tokio::test]
    async fn test_invoice_pushing_balance_past_limit_is_not_written() {
        let store = InMemoryStore::new();
        let client = ClientStore::insert(&store, new_client("TIN-LIM")).await.unwrap();
        let contract = ContractStore::insert(&store, new_contract(&client, StationCode::FrKan))
            .await
            .unwrap();
        ClientStore::adjust_balance(&store, &client.id, ecirs_core::MAX_MONEY)
            .await
            .unwrap();

        let result = InvoiceStore::insert(&store, new_invoice(&contract, dec!(100))).await;
        assert!(matches!(result, Err(StoreError::OutOfRange(_))));

        let invoices = InvoiceStore::list(&store, &DocumentFilter::default()).await.unwrap();
        assert!(invoices.is_empty());
        assert_eq!(balance(&store, &client.id).await, ecirs_core::MAX_MONEY);
    }
}
