use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortInfo {
    #[serde(default)]
    pub sorted: bool,
    #[serde(default)]
    pub unsorted: bool,
    #[serde(default)]
    pub empty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub paged: bool,
    #[serde(default)]
    pub unpaged: bool,
    #[serde(default)]
    pub sort: Option<SortInfo>,
}

/// One page of a paginated listing, in the server's page format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub pageable: Option<Pageable>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub sort: Option<SortInfo>,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(default)]
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        !self.last && self.number.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        !self.first && self.number > 0
    }

    /// "start-end of total" for a status line, 1-based.
    pub fn range_display(&self) -> String {
        if self.content.is_empty() {
            return format!("0 of {}", self.total_elements);
        }
        let start = (self.number as u64)
            .saturating_mul(self.size as u64)
            .saturating_add(1);
        let end = start.saturating_add(self.content.len() as u64 - 1);
        format!("{}-{} of {}", start, end, self.total_elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spring_page() {
        let json = r#"{"content":[1,2],"pageable":{"pageNumber":1,"pageSize":2,"offset":2,
            "paged":true,"unpaged":false,"sort":{"sorted":true,"unsorted":false,"empty":false}},
            "totalElements":5,"totalPages":3,"size":2,"number":1,
            "sort":{"sorted":true,"unsorted":false,"empty":false},
            "first":false,"last":false,"numberOfElements":2,"empty":false}"#;
        let page: Page<u32> = serde_json::from_str(json).expect("parse");
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.range_display(), "3-4 of 5");
    }

    #[test]
    fn test_minimal_page() {
        let page: Page<u32> = serde_json::from_str(r#"{"content":[]}"#).expect("parse");
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.range_display(), "0 of 0");
    }

    #[test]
    fn test_extreme_page_numbers_do_not_overflow() {
        let page: Page<u32> = serde_json::from_str(&format!(
            r#"{{"content":[1,2],"number":{},"size":{},"totalPages":{},"totalElements":9}}"#,
            u32::MAX,
            u32::MAX,
            u32::MAX
        ))
        .expect("parse");
        assert!(!page.has_next());
        assert!(page.has_previous());
        let expected_start = u32::MAX as u64 * u32::MAX as u64 + 1;
        assert_eq!(
            page.range_display(),
            format!("{}-{} of 9", expected_start, expected_start + 1)
        );
    }
}
