use serde::Deserialize;

/// 列表页配置 - 宿主页面可通过选项对象覆盖
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingConfig {
    /// 每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 博客缺少缩略图时使用的图片
    #[serde(default = "default_blog_placeholder")]
    pub blog_placeholder: String,
    /// 成功案例缺少缩略图时使用的图片
    #[serde(default = "default_story_placeholder")]
    pub story_placeholder: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            blog_placeholder: default_blog_placeholder(),
            story_placeholder: default_story_placeholder(),
        }
    }
}

/// 默认每页条数
fn default_page_size() -> usize {
    6
}

fn default_blog_placeholder() -> String {
    "/images/placeholder-blog.jpg".to_string()
}

fn default_story_placeholder() -> String {
    "/images/placeholder-story.jpg".to_string()
}
