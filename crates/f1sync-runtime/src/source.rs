//! Where optimal teams come from.

use async_trait::async_trait;
use f1sync_calculator::{CalculatorClient, CalculatorError, CalculatorResult};

/// Computes the best team for a budget.
#[async_trait]
pub trait TeamSource: Send + Sync {
    /// Short name recorded as the price source of a run.
    fn name(&self) -> &str;

    async fn optimal_team(&self, max_budget: f64) -> Result<CalculatorResult, CalculatorError>;
}

#[async_trait]
impl TeamSource for CalculatorClient {
    fn name(&self) -> &str {
        "f1fantasytools"
    }

    async fn optimal_team(&self, max_budget: f64) -> Result<CalculatorResult, CalculatorError> {
        self.load_optimal(max_budget).await
    }
}
