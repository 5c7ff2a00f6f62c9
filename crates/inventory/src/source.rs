//! Boundary to the document store holding movement documents.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockroom_core::ProductId;

use crate::movement::{MovementDocument, MovementKind};

/// Failure reported by a [`MovementSource`].
///
/// These are infrastructure errors; reconciliation propagates them unchanged
/// and does not retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MovementSourceError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("query on {collection} failed: {message}")]
    Query {
        collection: &'static str,
        message: String,
    },
}

/// Read-only query capability over movement documents.
///
/// `find_by_product` returns every document of `kind` with at least one line
/// referring to `product`. Filtering happens at document granularity: the
/// returned documents may also hold lines for other products.
#[async_trait]
pub trait MovementSource: Send + Sync {
    async fn find_by_product(
        &self,
        kind: MovementKind,
        product: ProductId,
    ) -> Result<Vec<MovementDocument>, MovementSourceError>;
}

#[async_trait]
impl<S> MovementSource for Arc<S>
where
    S: MovementSource + ?Sized,
{
    async fn find_by_product(
        &self,
        kind: MovementKind,
        product: ProductId,
    ) -> Result<Vec<MovementDocument>, MovementSourceError> {
        (**self).find_by_product(kind, product).await
    }
}
