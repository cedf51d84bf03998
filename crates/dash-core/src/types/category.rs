//! 카테고리 테이블.
//!
//! 시가총액 구간과 기업집단 두 종류의 정적 분류를 다룹니다.
//! 테이블은 시작 시 설정에서 로드되며 이후 변경되지 않습니다.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 카테고리 이름 → 소속 심볼 목록.
pub type CategoryMap = BTreeMap<String, Vec<String>>;

/// 심볼 정규화 (공백 제거, 대문자).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn normalize_members(table: &CategoryMap) -> CategoryMap {
    table
        .iter()
        .map(|(name, symbols)| {
            let mut seen = BTreeSet::new();
            let members = symbols
                .iter()
                .map(|s| normalize_symbol(s))
                .filter(|s| !s.is_empty() && seen.insert(s.clone()))
                .collect();
            (name.clone(), members)
        })
        .collect()
}

/// 카테고리 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CategoryType {
    /// 시가총액 기준
    MarketCap,
    /// 기업집단 기준
    Business,
}

impl CategoryType {
    /// 전체 카테고리 종류 (표시 순서).
    pub const ALL: [CategoryType; 2] = [CategoryType::MarketCap, CategoryType::Business];

    /// URL에 쓰이는 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::MarketCap => "market-cap",
            CategoryType::Business => "business",
        }
    }

    /// 화면 표시용 이름.
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryType::MarketCap => "🏆 Market Cap Based",
            CategoryType::Business => "🏢 Business Groups",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CategoryType::MarketCap => "Stocks categorized by market capitalization",
            CategoryType::Business => "Stocks grouped by business conglomerates",
        }
    }

    /// `{id, name, description}` 형태의 설명 정보.
    pub fn info(&self) -> CategoryTypeInfo {
        CategoryTypeInfo {
            id: self.as_str().to_string(),
            name: self.display_name().to_string(),
            description: self.description().to_string(),
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market-cap" => Ok(CategoryType::MarketCap),
            "business" => Ok(CategoryType::Business),
            other => Err(CoreError::InvalidInput(format!(
                "Unknown category type: {}",
                other
            ))),
        }
    }
}

/// 카테고리 종류 설명.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CategoryTypeInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// 두 종류의 카테고리 테이블.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTables {
    /// 시가총액 구간별 (예: "large-cap")
    #[serde(default)]
    pub market_cap: CategoryMap,
    /// 기업집단별 (예: "tata-group")
    #[serde(default)]
    pub business: CategoryMap,
}

impl CategoryTables {
    pub fn new(market_cap: CategoryMap, business: CategoryMap) -> Self {
        Self {
            market_cap,
            business,
        }
    }

    /// 종류에 해당하는 테이블.
    pub fn table(&self, category_type: CategoryType) -> &CategoryMap {
        match category_type {
            CategoryType::MarketCap => &self.market_cap,
            CategoryType::Business => &self.business,
        }
    }

    /// 카테고리 소속 심볼 집합. 카테고리가 없으면 `None`.
    pub fn members(&self, category_type: CategoryType, category: &str) -> Option<BTreeSet<&str>> {
        self.table(category_type)
            .get(category)
            .map(|symbols| symbols.iter().map(String::as_str).collect())
    }

    /// 멤버 심볼을 정규화한 테이블.
    ///
    /// 카테고리 안에서 중복된 심볼과 빈 심볼은 제거됩니다.
    pub fn normalized(&self) -> Self {
        Self::new(
            normalize_members(&self.market_cap),
            normalize_members(&self.business),
        )
    }

    /// 카테고리 종류 목록.
    pub fn category_types() -> Vec<CategoryTypeInfo> {
        CategoryType::ALL.iter().map(CategoryType::info).collect()
    }

    /// 주어진 유니버스에 없는 카테고리 멤버 (종류, 카테고리, 심볼).
    pub fn orphans<'a>(
        &'a self,
        universe: &'a [String],
    ) -> Vec<(CategoryType, &'a str, &'a str)> {
        let known: BTreeSet<String> = universe.iter().map(|s| normalize_symbol(s)).collect();
        CategoryType::ALL
            .iter()
            .flat_map(|&kind| {
                self.table(kind).iter().flat_map(move |(name, symbols)| {
                    symbols.iter().map(move |s| (kind, name.as_str(), s.as_str()))
                })
            })
            .filter(|(_, _, symbol)| !known.contains(&normalize_symbol(symbol)))
            .collect()
    }
}
