//! HTML extraction for follower listings and profile pages
//!
//! Pure functions over raw markup. Two pages matter to the crawler:
//! - the follower listing, which yields follower identifiers plus an
//!   optional "next page" link
//! - the profile page, which yields a single email string (possibly empty)

use scraper::{Html, Selector};

/// Extracted content of one follower listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtract {
    /// Follower identifiers, in document order
    pub items: Vec<String>,

    /// Link to the next listing page, when the pagination layout exposes one
    pub next_url: Option<String>,
}

/// Extracts follower identifiers and the next-page link from a listing page
///
/// Followers are the text of `.d-table-cell span.link-gray` elements, in
/// document order. The next-page link is found purely by position: the
/// second element inside the `.paginate-container`, and only if that element
/// is an `<a>` with an `href`. Any other pagination layout means "no more
/// pages" rather than an error; that heuristic is deliberately preserved
/// from the site layout this crawler targets.
pub fn extract_followers(html: &str) -> PageExtract {
    let document = Html::parse_document(html);

    let mut items = Vec::new();
    if let Ok(selector) = Selector::parse(".d-table-cell span.link-gray") {
        for element in document.select(&selector) {
            let name = element.text().collect::<String>().trim().to_string();
            if !name.is_empty() {
                items.push(name);
            }
        }
    }

    PageExtract {
        items,
        next_url: extract_next_link(&document),
    }
}

/// Positional next-link lookup: second element of the pagination container
fn extract_next_link(document: &Html) -> Option<String> {
    let selector = Selector::parse(".paginate-container *:nth-child(2)").ok()?;

    let element = document.select(&selector).next()?;
    if element.value().name() != "a" {
        return None;
    }

    element.value().attr("href").map(str::to_string)
}

/// Extracts the email string from a profile page
///
/// Returns the concatenated text of every `.u-email` element, which may be
/// empty when the profile has no public email.
pub fn extract_email(html: &str) -> String {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(".u-email") else {
        return String::new();
    };

    document
        .select(&selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}
