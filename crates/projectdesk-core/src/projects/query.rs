//! Query parameters for the project listing.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the list screen.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// Columns the listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Value,
    StartDate,
    EndDate,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        &[
            SortField::Id,
            SortField::Name,
            SortField::Value,
            SortField::StartDate,
            SortField::EndDate,
        ]
    }

    /// Property name understood by the server.
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Value => "value",
            SortField::StartDate => "startDate",
            SortField::EndDate => "endDate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Id => "ID",
            SortField::Name => "Name",
            SortField::Value => "Value",
            SortField::StartDate => "Start",
            SortField::EndDate => "End",
        }
    }

    /// Next column in the cycle, for the sort hotkey.
    pub fn next(&self) -> SortField {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// `property,direction`, serialized as the `sort` query parameter.
/// Defaults to `id,desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field.api_name(), self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.split_once(',').unwrap_or((s, "asc"));
        let field = SortField::all()
            .iter()
            .copied()
            .find(|f| f.api_name().eq_ignore_ascii_case(field.trim()))
            .ok_or_else(|| format!("Unknown sort field: {}", field))?;
        let direction = match direction.trim().to_lowercase().as_str() {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            other => return Err(format!("Unknown sort direction: {}", other)),
        };
        Ok(SortSpec { field, direction })
    }
}

/// Filters and paging for `GET /projects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProjectsParams {
    /// `None` lists active and inactive projects.
    pub active: Option<bool>,
    /// Free-text search; omitted when empty.
    pub q: String,
    /// Zero-based.
    pub page: u32,
    pub size: u32,
    pub sort: SortSpec,
}

impl Default for ListProjectsParams {
    fn default() -> Self {
        Self {
            active: None,
            q: String::new(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortSpec::default(),
        }
    }
}

impl ListProjectsParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(5);
        if let Some(active) = self.active {
            query.push(("active", active.to_string()));
        }
        let q = self.q.trim();
        if !q.is_empty() {
            query.push(("q", q.to_string()));
        }
        query.push(("page", self.page.to_string()));
        query.push(("size", self.size.to_string()));
        query.push(("sort", self.sort.to_string()));
        query
    }

    /// Cycle the active filter: all, active only, inactive only.
    pub fn cycle_active_filter(&mut self) {
        self.active = match self.active {
            None => Some(true),
            Some(true) => Some(false),
            Some(false) => None,
        };
        self.page = 0;
    }

    pub fn active_filter_label(&self) -> &'static str {
        match self.active {
            None => "All",
            Some(true) => "Active",
            Some(false) => "Inactive",
        }
    }

    /// Step to the next page size option, resetting to the first page.
    pub fn cycle_page_size(&mut self) {
        let idx = PAGE_SIZE_OPTIONS.iter().position(|s| *s == self.size);
        self.size = match idx {
            Some(i) => PAGE_SIZE_OPTIONS[(i + 1) % PAGE_SIZE_OPTIONS.len()],
            None => DEFAULT_PAGE_SIZE,
        };
        self.page = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_query() {
        let query = ListProjectsParams::default().to_query();
        assert_eq!(
            query,
            vec![
                ("page", "0".to_string()),
                ("size", "10".to_string()),
                ("sort", "id,desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_full_query() {
        let params = ListProjectsParams {
            active: Some(false),
            q: "  bridge ".to_string(),
            page: 2,
            size: 20,
            sort: SortSpec {
                field: SortField::StartDate,
                direction: SortDirection::Ascending,
            },
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("active", "false".to_string()),
                ("q", "bridge".to_string()),
                ("page", "2".to_string()),
                ("size", "20".to_string()),
                ("sort", "startDate,asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let params = ListProjectsParams {
            q: "   ".to_string(),
            ..Default::default()
        };
        assert!(params.to_query().iter().all(|(k, _)| *k != "q"));
    }

    #[test]
    fn test_parse_sort_spec() {
        assert_eq!("id,desc".parse::<SortSpec>(), Ok(SortSpec::default()));
        assert_eq!(
            "name".parse::<SortSpec>().map(|s| s.to_string()),
            Ok("name,asc".to_string())
        );
        assert!("owner,asc".parse::<SortSpec>().is_err());
        assert!("name,up".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_cycles_reset_page() {
        let mut params = ListProjectsParams {
            page: 3,
            ..Default::default()
        };
        params.cycle_active_filter();
        assert_eq!(params.active, Some(true));
        assert_eq!(params.page, 0);
        params.cycle_active_filter();
        params.cycle_active_filter();
        assert_eq!(params.active, None);

        params.page = 1;
        params.cycle_page_size();
        assert_eq!(params.size, 20);
        assert_eq!(params.page, 0);
        params.size = 7;
        params.cycle_page_size();
        assert_eq!(params.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_sort_field_cycle_wraps() {
        assert_eq!(SortField::Id.next(), SortField::Name);
        assert_eq!(SortField::EndDate.next(), SortField::Id);
        assert_eq!(SortDirection::Descending.toggle(), SortDirection::Ascending);
    }
}
