//! Manga Commands

/// 分析漫画页命令
#[derive(Debug, Clone)]
pub struct AnalyzeMangaPage {
    pub title: String,
    /// base64 或 data-URI 形式的图片
    pub image_data: String,
}
