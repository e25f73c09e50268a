/// 分页结果
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    /// 当前页的条目
    pub items: &'a [T],
    /// 钳制后的页码（从 1 开始）
    pub page: usize,
    /// 总页数，至少为 1
    pub total_pages: usize,
    /// 筛选结果总数
    pub total: usize,
}

/// 总页数，空列表也算一页
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 将页码钳制到 1..=total_pages
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// 切出指定页；越界页码会被钳制，不会报错
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let limit = page_size.max(1);
    let total = items.len();
    let total_pages = total_pages(total, limit);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * limit).min(total);
    let end = (start + limit).min(total);

    Page {
        items: &items[start..end],
        page,
        total_pages,
        total,
    }
}
