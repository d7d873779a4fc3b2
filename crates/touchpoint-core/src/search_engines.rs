//! Known search engine hosts

/// Reference search engine domains.
///
/// A referrer host matches an entry when it is the domain itself, a
/// subdomain of it, or, for brands with country sites, the same brand
/// under another country/generic TLD (`www.google.de` matches `google.com`).
pub const SEARCH_ENGINES: &[&str] = &[
    "google.com",
    "googlesyndication.com",
    "googleadservices.com",
    "naver.com",
    "bing.com",
    "yahoo.com",
    "yahoo.co.jp",
    "yandex.ru",
    "daum.net",
    "baidu.com",
    "myway.com",
    "ecosia.org",
    "ask.jp",
    "ask.com",
    "dogpile.com",
    "sogou.com",
    "seznam.cz",
    "aolsvc.de",
    "altavista.co",
    "altavista.de",
    "mywebsearch.com",
    "webcrawler.com",
    "wow.com",
    "infospace.com",
    "blekko.com",
    "docomo.ne.jp",
];

/// Brands that run country-specific search sites (`google.de`,
/// `yahoo.co.jp`). Only these match under a foreign TLD; the remaining
/// entries match their listed domain and its subdomains only.
const COUNTRY_BRANDS: &[&str] = &["google", "yahoo", "bing", "yandex", "baidu", "naver", "altavista"];

// TLD labels are short ("de", "com", "co.jp"); anything longer is a real
// domain label and must not count as a suffix.
const MAX_TLD_LABEL_LEN: usize = 3;
const MAX_TLD_LABELS: usize = 2;

/// Whether `host` belongs to a known search engine
pub fn is_search_engine_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    SEARCH_ENGINES
        .iter()
        .any(|domain| matches_domain(&host, domain) || matches_brand(&host, domain))
}

fn matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn matches_brand(host: &str, domain: &str) -> bool {
    let brand = domain.split('.').next().unwrap_or(domain);
    if !COUNTRY_BRANDS.contains(&brand) {
        return false;
    }
    let labels: Vec<&str> = host.split('.').collect();

    labels.iter().enumerate().any(|(i, label)| {
        let suffix = &labels[i + 1..];
        *label == brand
            && !suffix.is_empty()
            && suffix.len() <= MAX_TLD_LABELS
            && suffix
                .iter()
                .all(|tld| !tld.is_empty() && tld.len() <= MAX_TLD_LABEL_LEN)
    })
}
