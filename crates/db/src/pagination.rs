use serde::Deserialize;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        self.number * self.size
    }
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        let size = match query.size {
            None => 20,
            Some(size) if size < 1 => 20,
            Some(size) if size < 40 => size,
            _ => 40,
        };

        Page {
            number: query.page.unwrap_or(0).max(0),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageQuery};

    #[test]
    fn defaults_and_clamps() {
        let page: Page = PageQuery {
            page: None,
            size: None,
        }
        .into();
        assert_eq!(page, Page { number: 0, size: 20 });

        let page: Page = PageQuery {
            page: Some(3),
            size: Some(100),
        }
        .into();
        assert_eq!(page, Page { number: 3, size: 40 });

        let page: Page = PageQuery {
            page: Some(-1),
            size: Some(0),
        }
        .into();
        assert_eq!(page, Page { number: 0, size: 20 });
    }

    #[test]
    fn offset_is_page_times_size() {
        let page = Page { number: 4, size: 25 };
        assert_eq!(page.offset(), 100);
    }
}
