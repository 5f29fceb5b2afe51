use rand::seq::SliceRandom;

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Firefox/102.0",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Header set of a Chromium browser talking to the web app at `origin`.
///
/// `accept-encoding` is left to the HTTP client so it can decode what it asks for.
pub fn browser_headers(origin: &str, cookies: Option<&str>) -> Vec<(&'static str, String)> {
    let origin = origin.trim_end_matches('/');
    let mut headers = vec![
        ("accept", "*/*".to_string()),
        ("accept-language", "en-US,en;q=0.9,id;q=0.8".to_string()),
        ("cache-control", "no-cache".to_string()),
        ("content-type", "application/json".to_string()),
        ("origin", origin.to_string()),
        ("pragma", "no-cache".to_string()),
        ("priority", "u=1, i".to_string()),
        ("referer", format!("{}/", origin)),
        (
            "sec-ch-ua",
            "\"Chromium\";v=\"134\", \"Not:A-Brand\";v=\"24\", \"Google Chrome\";v=\"134\""
                .to_string(),
        ),
        ("sec-ch-ua-mobile", "?0".to_string()),
        ("sec-ch-ua-platform", "\"Windows\"".to_string()),
        ("sec-fetch-dest", "empty".to_string()),
        ("sec-fetch-mode", "cors".to_string()),
        ("sec-fetch-site", "same-site".to_string()),
        ("user-agent", random_user_agent().to_string()),
    ];
    if let Some(cookies) = cookies.filter(|c| !c.is_empty()) {
        headers.push(("cookie", cookies.to_string()));
    }
    headers
}
