use std::cell::RefCell;

use crate::Notification;
use crate::client::ApiClient;
use crate::config::NOTIFICATIONS_LIMIT;
use crate::error::ApiResult;
use crate::poll::UnreadTracker;
use crate::protocol::{ListNotifications, MarkNotificationRead};
use crate::transport::Transport;

/// 未读通知
#[derive(Debug, Default)]
pub struct NotificationController {
    unread: RefCell<Vec<Notification>>,
    tracker: UnreadTracker,
}

impl NotificationController {
    /// 刷新未读列表
    ///
    /// 未登录时不发请求。失败时未读数静默归零。
    /// `announce` 为真且未读数增加时返回新增数量。
    pub async fn refresh<T: Transport>(
        &self,
        api: &ApiClient<T>,
        announce: bool,
    ) -> Option<usize> {
        if !api.session().is_authenticated() {
            return None;
        }
        let req = ListNotifications {
            unread_only: true,
            limit: NOTIFICATIONS_LIMIT,
        };
        match api.call(&req).await {
            Ok(resp) => {
                let count = resp.notifications.len();
                *self.unread.borrow_mut() = resp.notifications;
                self.tracker.observe(count, announce)
            }
            Err(e) => {
                log::debug!("notifications refresh failed: {e}");
                self.unread.borrow_mut().clear();
                self.tracker.reset();
                None
            }
        }
    }

    pub fn unread_count(&self) -> usize {
        self.tracker.count()
    }

    pub fn unread(&self) -> Vec<Notification> {
        self.unread.borrow().clone()
    }

    pub async fn mark_read<T: Transport>(&self, api: &ApiClient<T>, id: &str) -> ApiResult<()> {
        api.call(&MarkNotificationRead {
            notification_id: id.to_string(),
        })
        .await?;
        Ok(())
    }

    pub(crate) fn clear(&self) {
        self.unread.borrow_mut().clear();
        self.tracker.reset();
    }
}
