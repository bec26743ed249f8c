// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};

/// 主内容选择器，按优先级排列
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".main-content",
    "#main-content",
    ".content",
    "#content",
    ".post-content",
    ".entry-content",
];

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// 从页面中提取出的标题和主内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub content: String,
}

/// 提取页面标题和主内容
///
/// 依次尝试 `MAIN_CONTENT_SELECTORS`，取第一个有可见文本的元素；
/// 都不匹配时退回到整个 `body` 的文本。结果按字符数截断到 `max_chars`。
pub fn extract(html: &str, max_chars: usize) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title")
        .or_else(|| first_text(&document, "h1"))
        .unwrap_or_default();

    let content = MAIN_CONTENT_SELECTORS
        .iter()
        .find_map(|sel| first_text(&document, sel))
        .or_else(|| first_text(&document, "body"))
        .unwrap_or_else(|| visible_text(document.root_element()));

    ExtractedPage {
        title: truncate_chars(&title, max_chars),
        content: truncate_chars(&content, max_chars),
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(visible_text)
        .find(|text| !text.is_empty())
}

fn visible_text(element: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }
    normalize_whitespace(&parts.join(" "))
}

/// 合并连续空白为单个空格并去掉首尾空白
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按字符（而非字节）截断
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
