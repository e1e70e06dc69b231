use allpi_api::LayoutSource;
use allpi_core::{DelegationMode, Layout};
use async_trait::async_trait;
use futures::future::join_all;

use crate::error::LayoutError;
use crate::request::{LayoutDecision, LayoutRequest};

/// A layout strategy maps gallery items to rendering hints.
///
/// Implementations may answer for a subset of the items; filling the gaps is
/// done once by [`crate::apply_layouts`].
#[async_trait]
pub trait LayoutResolver: Send + Sync {
    fn id(&self) -> &'static str;

    /// Outcome reported when this resolver answers for every item.
    fn source(&self) -> LayoutSource;

    async fn resolve(&self, items: &[LayoutRequest]) -> Result<Vec<LayoutDecision>, LayoutError>;
}

/// Fixed rule: images vertical, folders horizontal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResolver;

#[async_trait]
impl LayoutResolver for RuleResolver {
    fn id(&self) -> &'static str {
        "rule"
    }

    fn source(&self) -> LayoutSource {
        LayoutSource::Rule
    }

    async fn resolve(&self, items: &[LayoutRequest]) -> Result<Vec<LayoutDecision>, LayoutError> {
        Ok(items
            .iter()
            .map(|item| LayoutDecision::new(item.id.clone(), Layout::default_for(item.kind)))
            .collect())
    }
}

/// An external service that can pick layouts.
#[async_trait]
pub trait LayoutClassifier: Send + Sync {
    async fn classify_batch(
        &self,
        items: &[LayoutRequest],
    ) -> Result<Vec<LayoutDecision>, LayoutError>;

    /// Single-item call. Defaults to a batch of one.
    async fn classify_item(&self, item: &LayoutRequest) -> Result<LayoutDecision, LayoutError> {
        self.classify_batch(std::slice::from_ref(item))
            .await?
            .into_iter()
            .find(|decision| decision.id == item.id)
            .ok_or_else(|| LayoutError::MissingDecision(item.id.clone()))
    }
}

/// Hands layout decisions to a [`LayoutClassifier`].
pub struct DelegatedResolver<C> {
    classifier: C,
    mode: DelegationMode,
}

impl<C: LayoutClassifier> DelegatedResolver<C> {
    pub fn new(classifier: C, mode: DelegationMode) -> Self {
        Self { classifier, mode }
    }

    pub fn mode(&self) -> DelegationMode {
        self.mode
    }

    async fn resolve_each(
        &self,
        items: &[LayoutRequest],
    ) -> Result<Vec<LayoutDecision>, LayoutError> {
        let results = join_all(items.iter().map(|item| self.classifier.classify_item(item))).await;

        let mut decisions = Vec::with_capacity(items.len());
        let mut failed = 0usize;
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(decision) => decisions.push(decision),
                Err(e) => {
                    failed += 1;
                    tracing::debug!(item = %item.id, kind = e.kind(), "layout call failed: {e}");
                }
            }
        }

        if decisions.is_empty() && failed > 0 {
            return Err(LayoutError::AllItemsFailed(failed));
        }
        if failed > 0 {
            tracing::warn!(
                failed,
                total = items.len(),
                "some per-item layout calls failed; those items use the rule"
            );
        }
        Ok(decisions)
    }
}

#[async_trait]
impl<C: LayoutClassifier> LayoutResolver for DelegatedResolver<C> {
    fn id(&self) -> &'static str {
        "delegated"
    }

    fn source(&self) -> LayoutSource {
        LayoutSource::Delegated
    }

    async fn resolve(&self, items: &[LayoutRequest]) -> Result<Vec<LayoutDecision>, LayoutError> {
        match self.mode {
            DelegationMode::Batch => self.classifier.classify_batch(items).await,
            DelegationMode::PerItem => self.resolve_each(items).await,
        }
    }
}
