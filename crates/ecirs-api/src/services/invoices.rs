//! 청구서 서비스.
//!
//! VAT와 총액은 서버에서 계산하며, 고객 잔액 반영은 저장소가 같은 트랜잭션에서 처리합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ecirs_core::{
    generate_doc_num, DocumentKind, Invoice, InvoiceStatus, InvoiceUpdate, NewInvoice,
    StationCode, DEFAULT_VAT_RATE,
};
use rust_decimal::Decimal;

use super::scoped_filter;
use crate::auth::{require_station, Claims};
use crate::error::{ApiError, ApiResult};
use crate::repository::{ClientStore, ContractStore, InvoiceStore, StoreError};

const NOT_FOUND: &str = "Invoice not found";

/// 청구서 생성 입력.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub contract_id: String,
    pub client_id: String,
    pub amount: Decimal,
    /// 생략 시 [`DEFAULT_VAT_RATE`]
    pub vat_rate: Option<Decimal>,
    pub status: Option<InvoiceStatus>,
    pub due_date: DateTime<Utc>,
    pub station_code: StationCode,
}

/// 청구서 서비스.
#[derive(Clone)]
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceStore>,
    contracts: Arc<dyn ContractStore>,
    clients: Arc<dyn ClientStore>,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        contracts: Arc<dyn ContractStore>,
        clients: Arc<dyn ClientStore>,
    ) -> Self {
        Self {
            invoices,
            contracts,
            clients,
        }
    }

    pub async fn list(
        &self,
        claims: &Claims,
        station: Option<StationCode>,
        status: Option<InvoiceStatus>,
    ) -> ApiResult<Vec<Invoice>> {
        let filter = scoped_filter(claims, station, status)?;
        Ok(self.invoices.list(&filter).await?)
    }

    pub async fn get(&self, claims: &Claims, id: &str) -> ApiResult<Invoice> {
        let invoice = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        require_station(claims, invoice.station_code)?;
        Ok(invoice)
    }

    /// 청구서 생성.
    ///
    /// 계약과 고객이 모두 존재해야 하며 계약은 해당 고객의 것이어야 합니다.
    pub async fn create(&self, claims: &Claims, draft: InvoiceDraft) -> ApiResult<Invoice> {
        require_station(claims, draft.station_code)?;

        let contract = self
            .contracts
            .find_by_id(&draft.contract_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Contract not found".to_string()))?;
        if self.clients.find_by_id(&draft.client_id).await?.is_none() {
            return Err(ApiError::NotFound("Client not found".to_string()));
        }
        if contract.client_id != draft.client_id {
            return Err(ApiError::validation(
                "Contract does not belong to this client",
            ));
        }

        let new_invoice = NewInvoice::priced(
            generate_doc_num(DocumentKind::Invoice, draft.station_code, Utc::now()),
            contract.id,
            draft.client_id,
            draft.amount,
            draft.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
            draft.status.unwrap_or_default(),
            draft.due_date,
            draft.station_code,
            claims.payload.user_id.clone(),
        )
        .map_err(StoreError::from)?;
        let invoice = self.invoices.insert(new_invoice).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            doc_num = %invoice.doc_num,
            client_id = %invoice.client_id,
            total = %invoice.total_amount,
            "Invoice created"
        );
        crate::metrics::record_document_created("invoice", invoice.station_code.as_str());
        Ok(invoice)
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: &str,
        update: InvoiceUpdate,
    ) -> ApiResult<Invoice> {
        self.get(claims, id).await?;
        if let Some(station) = update.station_code {
            require_station(claims, station)?;
        }

        let invoice = self
            .invoices
            .update(id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        tracing::info!(invoice_id = %id, total = %invoice.total_amount, "Invoice updated");
        Ok(invoice)
    }

    pub async fn delete(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        self.get(claims, id).await?;
        if !self.invoices.delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(invoice_id = %id, user_id = %claims.payload.user_id, "Invoice deleted");
        Ok(())
    }
}
