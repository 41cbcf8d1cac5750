use std::sync::Arc;

use conclave_core::traits::{IPerformanceSource, IPredictionSource, ISettlementFeed};

/// External sources the pipeline reads from.
#[derive(Clone)]
pub struct Collaborators {
    pub predictions: Arc<dyn IPredictionSource>,
    pub performance: Arc<dyn IPerformanceSource>,
    pub settlements: Arc<dyn ISettlementFeed>,
}
