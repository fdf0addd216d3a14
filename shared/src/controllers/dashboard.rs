use std::cell::RefCell;

use crate::DashboardSummary;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::protocol::DashboardSummaryRequest;
use crate::transport::Transport;

#[derive(Debug, Default)]
pub struct DashboardController {
    summary: RefCell<DashboardSummary>,
}

impl DashboardController {
    pub async fn load<T: Transport>(&self, api: &ApiClient<T>) -> ApiResult<()> {
        let resp = api.call(&DashboardSummaryRequest).await?;
        *self.summary.borrow_mut() = resp.summary;
        Ok(())
    }

    pub fn summary(&self) -> DashboardSummary {
        self.summary.borrow().clone()
    }
}
