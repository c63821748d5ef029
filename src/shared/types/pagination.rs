/// Paginated result wrapper returned by the service layer
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let r = PaginatedResult::new(vec![1, 2, 3], 7, 1, 3);
        assert_eq!(r.total_pages, 3);
    }

    #[test]
    fn exact_division() {
        let r: PaginatedResult<i32> = PaginatedResult::new(vec![], 10, 1, 5);
        assert_eq!(r.total_pages, 2);
    }

    #[test]
    fn zero_limit_yields_zero_pages() {
        let r: PaginatedResult<i32> = PaginatedResult::new(vec![], 10, 1, 0);
        assert_eq!(r.total_pages, 0);
    }
}
