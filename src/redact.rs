use url::Url;

const MASK: &str = "xxxxx";

/// The connection string with its password masked, for logging.
pub fn redact_url(raw: &str) -> String {
    if let Ok(mut url) = Url::parse(raw) {
        if url.password().is_some() && url.set_password(Some(MASK)).is_ok() {
            return url.to_string();
        }
        if url.password().is_none() {
            return url.to_string();
        }
    }
    redact_userinfo(raw)
}

/// Fallback for seed lists such as `mongodb://u:p@a:27017,b:27017/db`, which are not valid URLs.
fn redact_userinfo(raw: &str) -> String {
    let Some((scheme, rest)) = raw.split_once("://") else {
        return raw.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return raw.to_string();
    };
    match rest[..at].split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:{MASK}{}", &rest[at..]),
        None => raw.to_string(),
    }
}
