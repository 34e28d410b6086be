//! HTML fragments for the search results panel.
//!
//! Every value taken from the search response is escaped with
//! `ammonia::clean_text` before it is placed in markup.

use crate::types::{ProductHit, SearchResponse};
use ammonia::clean_text;

pub const LOADING_HTML: &str = concat!(
    r#"<div class="search-loading">"#,
    r#"<i class="fa-solid fa-spinner fa-spin"></i>"#,
    r#"<span>Searching...</span>"#,
    r#"</div>"#,
);

pub const UNAVAILABLE_HTML: &str = concat!(
    r#"<div class="search-error">"#,
    r#"<i class="fa-solid fa-exclamation-triangle"></i>"#,
    r#"<span>Search temporarily unavailable</span>"#,
    r#"</div>"#,
);

pub fn no_results(query: &str) -> String {
    format!(
        concat!(
            r#"<div class="search-no-results">"#,
            r#"<i class="fa-solid fa-search"></i>"#,
            r#"<span>No products found for "{}"</span>"#,
            r#"</div>"#,
        ),
        clean_text(query)
    )
}

fn result_item(product: &ProductHit) -> String {
    let name = clean_text(&product.name);
    let image = match product.image_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => format!(r#"<img src="{}" alt="{}" />"#, clean_text(url), name),
        None => r#"<div class="image-placeholder"><i class="fa-solid fa-image"></i></div>"#
            .to_string(),
    };
    let category = product
        .category
        .as_deref()
        .filter(|category| !category.is_empty())
        .map(|category| format!(r#"<span class="result-category">{}</span>"#, clean_text(category)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<a class="search-result-item" href="{url}">"#,
            r#"<div class="result-image">{image}</div>"#,
            r#"<div class="result-details">"#,
            r#"<h4 class="result-name">{name}</h4>"#,
            r#"<p class="result-description">{description}</p>"#,
            r#"<div class="result-meta">{category}"#,
            r#"<span class="result-price">{symbol}{price}</span></div>"#,
            r#"</div>"#,
            r#"<div class="result-action"><i class="fa-solid fa-arrow-right"></i></div>"#,
            r#"</a>"#,
        ),
        url = clean_text(&product.product_url),
        image = image,
        name = name,
        description = clean_text(&product.description),
        category = category,
        symbol = clean_text(&product.currency_symbol),
        price = clean_text(&product.price.to_string()),
    )
}

/// Render a full response: the result list, or the "no products" message.
pub fn results(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return no_results(&response.query);
    }
    response.results.iter().map(result_item).collect()
}
