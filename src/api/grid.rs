//! Translation of table state (page, sort, filters) into volunteer list
//! query parameters

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    pub field: String,
    pub direction: SortDirection,
}

/// Filter value as entered in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Number(i64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub field: Option<String>,
    pub operator: String,
    pub value: Option<FilterValue>,
}

impl FilterItem {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: Some(field.into()),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }
}

/// Table state: 0-based page, page size, sort model and filter model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: Vec<SortItem>,
    pub filters: Vec<FilterItem>,
}

impl GridQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortItem {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn filter(mut self, item: FilterItem) -> Self {
        self.filters.push(item);
        self
    }

    /// Backend parameters for this state. Pages become 1-based, only the first
    /// sort item is used, and text filters on other columns become `search`.
    pub fn to_params(&self) -> VolunteerListParams {
        let mut params = VolunteerListParams {
            page: self.page + 1,
            page_size: self.page_size,
            ..Default::default()
        };

        if let Some(sort) = self.sort.first() {
            params.ordering = Some(match sort.direction {
                SortDirection::Desc => format!("-{}", sort.field),
                SortDirection::Asc => sort.field.clone(),
            });
        }

        for item in &self.filters {
            let (Some(field), Some(value)) = (&item.field, &item.value) else {
                continue;
            };
            match field.as_str() {
                "gonullu_tipi" => params.gonullu_tipi = Some(value.to_string()),
                "sehir" => params.sehir = Some(value.to_string()),
                "is_active" => params.is_active = Some(value.to_string()),
                _ => match value {
                    FilterValue::Text(text) if item.operator == "contains" => {
                        params.search = Some(text.clone())
                    }
                    _ => {}
                },
            }
        }

        params
    }
}

/// Query parameters of `GET /volunteers/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerListParams {
    pub page: u32,
    pub page_size: u32,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub gonullu_tipi: Option<String>,
    pub sehir: Option<String>,
    pub is_active: Option<String>,
}

impl VolunteerListParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        let optional = [
            ("ordering", &self.ordering),
            ("search", &self.search),
            ("gonullu_tipi", &self.gonullu_tipi),
            ("sehir", &self.sehir),
            ("is_active", &self.is_active),
        ];
        query.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.clone().map(|value| (key, value))),
        );
        query
    }
}
