//! Client-side services composing the API façades

pub mod borrowing_workflow;
pub mod dashboard;
pub mod reference_data;

use std::sync::Arc;

use crate::api::Api;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub borrowing_workflow: borrowing_workflow::BorrowingWorkflow,
    pub reference: reference_data::ReferenceDataService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services over the given façades
    pub fn new(api: Api) -> Self {
        Self {
            borrowing_workflow: borrowing_workflow::BorrowingWorkflow::new(
                Arc::new(api.borrowings.clone()),
                Arc::new(api.borrowing_items.clone()),
            ),
            reference: reference_data::ReferenceDataService::new(api.clone()),
            dashboard: dashboard::DashboardService::new(api),
        }
    }
}
