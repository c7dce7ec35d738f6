use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionFilter, TransactionKind, TransactionStore,
};

use super::super::Engine;

const DEFAULT_PAGE_LIMIT: u64 = 50;
const MAX_PAGE_LIMIT: u64 = 200;

/// What to list and where to resume.
///
/// Results are always scoped to `user_id`. Pagination is newest → older by
/// `(created_at DESC, id DESC)`.
#[derive(Clone, Debug)]
pub struct TransactionListQuery {
    pub user_id: Uuid,
    pub wallet_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    /// If true, includes soft-deleted transactions (default: false).
    pub include_deleted: bool,
    /// Page size, `1..=200`. Defaults to 50.
    pub limit: Option<u64>,
    /// Opaque cursor returned as `next_cursor` by the previous page.
    pub cursor: Option<String>,
}

impl TransactionListQuery {
    #[must_use]
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            wallet_id: None,
            kind: None,
            include_deleted: false,
            limit: None,
            cursor: None,
        }
    }

    #[must_use]
    pub fn wallet(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    /// `None` on the last page.
    pub next_cursor: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    created_at: DateTime<Utc>,
    transaction_id: String,
}

fn invalid_cursor() -> EngineError {
    EngineError::InvalidCursor("invalid transactions cursor".to_string())
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self).map_err(|_| invalid_cursor())?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| invalid_cursor())?;
        serde_json::from_slice::<Self>(&bytes).map_err(|_| invalid_cursor())
    }

    fn position(&self) -> ResultEngine<(DateTime<Utc>, Uuid)> {
        let id = Uuid::parse_str(&self.transaction_id).map_err(|_| invalid_cursor())?;
        Ok((self.created_at, id))
    }
}

fn page_limit(limit: Option<u64>) -> ResultEngine<u64> {
    match limit {
        None => Ok(DEFAULT_PAGE_LIMIT),
        Some(0) => Err(EngineError::Validation(
            "limit must be greater than zero".to_string(),
        )),
        Some(limit) => Ok(limit.min(MAX_PAGE_LIMIT)),
    }
}

impl Engine {
    /// Lists the transactions of a user, optionally narrowed to one wallet
    /// (which the user must own) or one kind.
    pub async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> ResultEngine<TransactionPage> {
        let limit = page_limit(query.limit)?;
        let before = query
            .cursor
            .as_deref()
            .map(TransactionsCursor::decode)
            .transpose()?
            .map(|cursor| cursor.position())
            .transpose()?;

        self.require_user(&self.database, query.user_id).await?;
        if let Some(wallet_id) = query.wallet_id {
            self.require_owned_wallet_any(&self.database, wallet_id, query.user_id)
                .await?;
        }

        let filter = TransactionFilter {
            user_id: Some(query.user_id),
            wallet_id: query.wallet_id,
            kind: query.kind,
            include_deleted: query.include_deleted,
        };
        let mut transactions = self
            .database
            .list_transactions(&filter, before, limit.saturating_add(1))
            .await?;
        let has_more = transactions.len() as u64 > limit;
        transactions.truncate(limit as usize);

        let next_cursor = if has_more {
            transactions
                .last()
                .map(|tx| TransactionsCursor {
                    created_at: tx.created_at,
                    transaction_id: tx.id.to_string(),
                })
                .map(|cursor| cursor.encode())
                .transpose()?
        } else {
            None
        };

        Ok(TransactionPage {
            transactions,
            next_cursor,
        })
    }
}
