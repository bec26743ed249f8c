// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeResult;

/// 从提示词中提取关键词：小写后按空白切分
pub fn keywords(prompt: &str) -> Vec<String> {
    prompt
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 判断单个结果是否与关键词相关
///
/// 这是一个词法近似：只要标题或正文（小写）包含任意一个关键词即视为相关，
/// 不做任何语义匹配。失败结果永远不相关。
pub fn is_relevant(result: &ScrapeResult, keywords: &[String]) -> bool {
    let Some(data) = result.data.as_ref().filter(|_| result.success) else {
        return false;
    };
    if keywords.is_empty() {
        return true;
    }

    let field = |name: &str| {
        data.get(name)
            .and_then(|v| v.as_str())
            .map(str::to_lowercase)
            .unwrap_or_default()
    };
    let title = field("title");
    let content = field("content");

    keywords
        .iter()
        .any(|kw| title.contains(kw.as_str()) || content.contains(kw.as_str()))
}

/// 按提示词过滤结果，仅保留成功且词法相关的条目
pub fn filter_by_prompt(results: Vec<ScrapeResult>, prompt: &str) -> Vec<ScrapeResult> {
    let keywords = keywords(prompt);
    results
        .into_iter()
        .filter(|r| is_relevant(r, &keywords))
        .collect()
}
