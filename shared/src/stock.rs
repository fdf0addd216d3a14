//! 低库存判定

use crate::config::FALLBACK_LOW_STOCK;
use crate::{Item, Warehouse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Low,
    Warn,
    Ok,
}

impl StockLevel {
    /// 徽标的样式类
    pub fn class(&self) -> &'static str {
        match self {
            Self::Low => "bad",
            Self::Warn => "warn",
            Self::Ok => "ok",
        }
    }
}

/// 商品阈值 → 仓库默认阈值 → 1
pub fn effective_low_limit(item: &Item, warehouse: Option<&Warehouse>) -> i64 {
    item.low_limit
        .or_else(|| warehouse.and_then(|w| w.low_stock_default))
        .unwrap_or(FALLBACK_LOW_STOCK)
}

pub fn stock_level(count: i64, limit: i64) -> StockLevel {
    if count <= limit {
        StockLevel::Low
    } else if count <= limit.saturating_mul(2) {
        StockLevel::Warn
    } else {
        StockLevel::Ok
    }
}

/// 商品卡片上的库存徽标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockBadge {
    pub level: StockLevel,
    pub label: String,
}

impl StockBadge {
    pub fn for_item(item: &Item, warehouse: Option<&Warehouse>) -> Self {
        let limit = effective_low_limit(item, warehouse);
        let level = stock_level(item.count, limit);
        let label = match level {
            StockLevel::Low => format!("low ≤ {limit}"),
            StockLevel::Warn => "warn".to_string(),
            StockLevel::Ok => "ok".to_string(),
        };
        Self { level, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(count: i64, low_limit: Option<i64>) -> Item {
        Item {
            id: "i1".into(),
            warehouse_id: "w1".into(),
            name: "Молоко".into(),
            category: None,
            unit: None,
            count,
            low_limit,
        }
    }

    fn warehouse(low_stock_default: Option<i64>) -> Warehouse {
        Warehouse {
            id: "w1".into(),
            name: "Склад".into(),
            camera_api_key: None,
            notification_emails: vec![],
            low_stock_default,
            blocked_at: None,
        }
    }

    #[test]
    fn thresholds() {
        assert_eq!(stock_level(2, 2), StockLevel::Low);
        assert_eq!(stock_level(3, 2), StockLevel::Warn);
        assert_eq!(stock_level(4, 2), StockLevel::Warn);
        assert_eq!(stock_level(5, 2), StockLevel::Ok);
    }

    #[test]
    fn limit_falls_back_to_warehouse_then_one() {
        let wh = warehouse(Some(10));
        assert_eq!(effective_low_limit(&item(0, Some(3)), Some(&wh)), 3);
        assert_eq!(effective_low_limit(&item(0, None), Some(&wh)), 10);
        assert_eq!(effective_low_limit(&item(0, None), Some(&warehouse(None))), 1);
        assert_eq!(effective_low_limit(&item(0, None), None), 1);
    }

    #[test]
    fn badge_label() {
        let badge = StockBadge::for_item(&item(2, Some(2)), None);
        assert_eq!(badge.label, "low ≤ 2");
        assert_eq!(badge.level.class(), "bad");
        assert_eq!(StockBadge::for_item(&item(9, Some(2)), None).label, "ok");
    }
}
