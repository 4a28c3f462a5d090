//! 영수증 서비스.

use std::sync::Arc;

use chrono::Utc;
use ecirs_core::{
    generate_doc_num, DocumentKind, NewReceipt, PaymentMethod, Receipt, ReceiptUpdate,
    StationCode,
};
use rust_decimal::Decimal;

use super::scoped_filter;
use crate::auth::{require_station, Claims};
use crate::error::{ApiError, ApiResult};
use crate::repository::{InvoiceStore, ReceiptStore};

const NOT_FOUND: &str = "Receipt not found";

/// 영수증 생성 입력.
#[derive(Debug, Clone)]
pub struct ReceiptDraft {
    pub invoice_id: String,
    pub client_id: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub station_code: StationCode,
}

/// 영수증 서비스.
#[derive(Clone)]
pub struct ReceiptService {
    receipts: Arc<dyn ReceiptStore>,
    invoices: Arc<dyn InvoiceStore>,
}

impl ReceiptService {
    pub fn new(receipts: Arc<dyn ReceiptStore>, invoices: Arc<dyn InvoiceStore>) -> Self {
        Self { receipts, invoices }
    }

    /// 영수증에는 상태가 없으므로 스테이션 필터만 적용합니다.
    pub async fn list(
        &self,
        claims: &Claims,
        station: Option<StationCode>,
    ) -> ApiResult<Vec<Receipt>> {
        let filter = scoped_filter(claims, station, None)?;
        Ok(self.receipts.list(&filter).await?)
    }

    pub async fn get(&self, claims: &Claims, id: &str) -> ApiResult<Receipt> {
        let receipt = self
            .receipts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        require_station(claims, receipt.station_code)?;
        Ok(receipt)
    }

    /// 영수증 생성. 고객은 청구서의 고객과 같아야 합니다.
    pub async fn create(&self, claims: &Claims, draft: ReceiptDraft) -> ApiResult<Receipt> {
        require_station(claims, draft.station_code)?;

        let invoice = self
            .invoices
            .find_by_id(&draft.invoice_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;
        if invoice.client_id != draft.client_id {
            return Err(ApiError::validation("Client does not match the invoice"));
        }

        let receipt = self
            .receipts
            .insert(NewReceipt {
                doc_num: generate_doc_num(DocumentKind::Receipt, draft.station_code, Utc::now()),
                invoice_id: invoice.id,
                client_id: invoice.client_id,
                amount: draft.amount,
                payment_method: draft.payment_method,
                payment_reference: draft.payment_reference,
                station_code: draft.station_code,
                received_by: claims.payload.user_id.clone(),
            })
            .await?;

        tracing::info!(
            receipt_id = %receipt.id,
            doc_num = %receipt.doc_num,
            client_id = %receipt.client_id,
            amount = %receipt.amount,
            "Receipt created"
        );
        crate::metrics::record_document_created("receipt", receipt.station_code.as_str());
        Ok(receipt)
    }

    pub async fn update(
        &self,
        claims: &Claims,
        id: &str,
        update: ReceiptUpdate,
    ) -> ApiResult<Receipt> {
        self.get(claims, id).await?;
        if let Some(station) = update.station_code {
            require_station(claims, station)?;
        }

        let receipt = self
            .receipts
            .update(id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
        tracing::info!(receipt_id = %id, amount = %receipt.amount, "Receipt updated");
        Ok(receipt)
    }

    pub async fn delete(&self, claims: &Claims, id: &str) -> ApiResult<()> {
        self.get(claims, id).await?;
        if !self.receipts.delete(id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(receipt_id = %id, user_id = %claims.payload.user_id, "Receipt deleted");
        Ok(())
    }
}
