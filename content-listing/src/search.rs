/// 规范化搜索词：转为小写；首尾空白保留，只含空白的搜索词视为空
pub fn normalize_term(term: &str) -> String {
    if term.trim().is_empty() {
        return String::new();
    }
    term.to_lowercase()
}

/// 任一字段包含搜索词即匹配（不区分大小写）；`needle` 须已规范化
pub fn matches_any(fields: &[&str], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| field.to_lowercase().contains(needle))
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 高亮标题中的搜索词，返回转义后的 HTML
pub fn highlight(title: &str, term: &str) -> String {
    let needle = normalize_term(term);
    if title.is_empty() || needle.is_empty() {
        return escape_html(title);
    }

    let title_lower = title.to_lowercase();

    // 小写转换改变了字节长度时，位置无法对应回原标题
    if title_lower.len() != title.len() {
        return escape_html(title);
    }

    // 查找所有匹配位置
    let mut positions = Vec::new();
    let mut start_idx = 0;
    while start_idx < title_lower.len() {
        match title_lower[start_idx..].find(&needle) {
            Some(found) => {
                let abs_idx = find_char_boundary(title, start_idx + found);
                let match_end = find_char_boundary(title, start_idx + found + needle.len());
                if match_end > abs_idx {
                    positions.push((abs_idx, match_end));
                }
                start_idx += found + needle.len();
            }
            None => break,
        }
    }

    if positions.is_empty() {
        return escape_html(title);
    }

    let mut highlighted = String::with_capacity(title.len() + positions.len() * 13);
    let mut last_pos = 0;
    for (start, end) in positions {
        if start < last_pos {
            continue;
        }
        highlighted.push_str(&escape_html(&title[last_pos..start]));
        highlighted.push_str("<mark>");
        highlighted.push_str(&escape_html(&title[start..end]));
        highlighted.push_str("</mark>");
        last_pos = end;
    }
    highlighted.push_str(&escape_html(&title[last_pos..]));

    highlighted
}

/// 确保索引位于有效的字符边界上，取最近的边界
fn find_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if s.is_char_boundary(index) {
        return index;
    }

    let mut previous = index;
    while previous > 0 && !s.is_char_boundary(previous) {
        previous -= 1;
    }
    let mut next = index;
    while next < s.len() && !s.is_char_boundary(next) {
        next += 1;
    }

    if index - previous <= next - index {
        previous
    } else {
        next
    }
}
