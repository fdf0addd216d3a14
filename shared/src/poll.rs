//! 轮询守卫
//!
//! - `InFlight`: 进行中请求计数，守卫释放时自动递减
//! - `should_poll_items`: 商品轮询的三个前置条件
//! - `UnreadTracker`: 未读通知数变化检测

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    count: Rc<Cell<u32>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.count.get() > 0
    }

    /// 标记一个请求开始；返回的守卫被 drop 时标记结束
    pub fn enter(&self) -> InFlightGuard {
        self.count.set(self.count.get() + 1);
        InFlightGuard {
            count: self.count.clone(),
        }
    }

    /// 空闲时进入，否则返回 None
    pub fn try_enter(&self) -> Option<InFlightGuard> {
        if self.is_busy() {
            None
        } else {
            Some(self.enter())
        }
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    count: Rc<Cell<u32>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}

/// 商品视图可见、没有进行中的加载、页面处于前台
pub fn should_poll_items(view_visible: bool, in_flight: bool, foreground: bool) -> bool {
    view_visible && !in_flight && foreground
}

/// 记录上一次看到的未读数
#[derive(Debug, Default)]
pub struct UnreadTracker {
    last: Cell<usize>,
}

impl UnreadTracker {
    pub fn count(&self) -> usize {
        self.last.get()
    }

    /// 更新未读数；`announce` 为真且数目增加时返回增量
    pub fn observe(&self, count: usize, announce: bool) -> Option<usize> {
        let prev = self.last.replace(count);
        (announce && count > prev).then(|| count - prev)
    }

    pub fn reset(&self) {
        self.last.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let flight = InFlight::new();
        {
            let _a = flight.enter();
            let _b = flight.enter();
            assert!(flight.is_busy());
            assert!(flight.try_enter().is_none());
        }
        assert!(!flight.is_busy());
        assert!(flight.try_enter().is_some());
        assert!(!flight.is_busy());
    }

    #[test]
    fn poll_gate() {
        assert!(should_poll_items(true, false, true));
        assert!(!should_poll_items(false, false, true));
        assert!(!should_poll_items(true, true, true));
        assert!(!should_poll_items(true, false, false));
    }

    #[test]
    fn unread_delta_only_when_growing() {
        let t = UnreadTracker::default();
        assert_eq!(t.observe(3, false), None);
        assert_eq!(t.observe(5, true), Some(2));
        assert_eq!(t.observe(4, true), None);
        assert_eq!(t.count(), 4);
        t.reset();
        assert_eq!(t.observe(1, true), Some(1));
    }
}
