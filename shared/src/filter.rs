//! 列表筛选参数
//!
//! 加载函数显式接收筛选对象，而不是在调用时读取表单控件。
//! 只有非空参数会进入查询串。

use crate::SupplyStatus;

/// 排序方向，后端接受 `1` / `-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Asc => "1",
            Self::Desc => "-1",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1" | "asc" => Some(Self::Asc),
            "-1" | "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// 商品列表可用的排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSort {
    Name,
    Count,
    Category,
    CreatedAt,
    UpdatedAt,
}

impl ItemSort {
    pub const ALL: [ItemSort; 5] = [
        Self::Name,
        Self::Count,
        Self::Category,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Count => "count",
            Self::Category => "category",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

/// 供货列表可用的排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplySort {
    ExpectedAt,
    CreatedAt,
    UpdatedAt,
    Amount,
    Status,
}

impl SupplySort {
    pub const ALL: [SupplySort; 5] = [
        Self::ExpectedAt,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::Amount,
        Self::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpectedAt => "expected_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: String,
    pub category: String,
    pub sort: Option<ItemSort>,
    pub order: Option<SortOrder>,
    pub low_only: bool,
}

impl ItemFilter {
    /// `?search=..&category=..&sort=..&order=..&low_only=true`，全部为空时返回空串
    pub fn query_string(&self) -> String {
        let mut q = QueryBuilder::default();
        q.push("search", self.search.trim());
        q.push("category", &self.category);
        q.push("sort", self.sort.map(|s| s.as_str()).unwrap_or_default());
        q.push("order", self.order.map(|o| o.as_query()).unwrap_or_default());
        if self.low_only {
            q.push("low_only", "true");
        }
        q.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyFilter {
    pub status: Option<SupplyStatus>,
    pub search: String,
    pub sort: Option<SupplySort>,
    pub order: Option<SortOrder>,
    /// 仅在客户端过滤，不发送给后端
    pub overdue_only: bool,
}

impl SupplyFilter {
    pub fn query_string(&self) -> String {
        let mut q = QueryBuilder::default();
        q.push("status", self.status.map(|s| s.as_str()).unwrap_or_default());
        q.push("search", self.search.trim());
        q.push("sort", self.sort.map(|s| s.as_str()).unwrap_or_default());
        q.push("order", self.order.map(|o| o.as_query()).unwrap_or_default());
        q.finish()
    }
}

/// 查询串构建器，忽略空值
#[derive(Default)]
pub(crate) struct QueryBuilder {
    pairs: Vec<String>,
}

impl QueryBuilder {
    pub(crate) fn push(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        self.pairs.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(value)
        ));
    }

    pub(crate) fn finish(self) -> String {
        if self.pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", self.pairs.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_produces_no_query() {
        assert_eq!(ItemFilter::default().query_string(), "");
        assert_eq!(SupplyFilter::default().query_string(), "");
    }

    #[test]
    fn item_filter_only_sends_set_params() {
        let filter = ItemFilter {
            search: "  шоко ".into(),
            category: String::new(),
            sort: Some(ItemSort::Count),
            order: Some(SortOrder::Desc),
            low_only: true,
        };
        assert_eq!(
            filter.query_string(),
            "?search=%D1%88%D0%BE%D0%BA%D0%BE&sort=count&order=-1&low_only=true"
        );
    }

    #[test]
    fn overdue_only_stays_client_side() {
        let filter = SupplyFilter {
            status: Some(SupplyStatus::Waiting),
            overdue_only: true,
            ..Default::default()
        };
        assert_eq!(filter.query_string(), "?status=waiting");
    }

    #[test]
    fn values_are_percent_encoded() {
        let filter = ItemFilter {
            search: "a&b c".into(),
            ..Default::default()
        };
        assert_eq!(filter.query_string(), "?search=a%26b%20c");
    }
}
