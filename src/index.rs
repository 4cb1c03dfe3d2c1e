use chrono::Utc;
use std::sync::Arc;

/// Produces the destination index name at call time.
pub type IndexNameFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Always resolves to `name`.
pub fn fixed_index(name: impl Into<String>) -> IndexNameFn {
    let name = name.into();
    Arc::new(move || name.clone())
}

/// Rolls over daily: `<prefix>-YYYY.MM.DD`, using the UTC date.
pub fn daily_index(prefix: impl Into<String>) -> IndexNameFn {
    let prefix = prefix.into();
    Arc::new(move || format!("{}-{}", prefix, Utc::now().format("%Y.%m.%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_index_is_stable() {
        let index = fixed_index("app-logs");
        assert_eq!(index(), "app-logs");
        assert_eq!(index(), "app-logs");
    }

    #[test]
    fn daily_index_appends_utc_date() {
        let index = daily_index("app");
        let name = index();
        let expected = format!("app-{}", Utc::now().format("%Y.%m.%d"));
        // The date may roll over between the two calls; only check shape then.
        if name != expected {
            assert!(name.starts_with("app-"));
        }
        assert_eq!(name.len(), "app-".len() + "YYYY.MM.DD".len());
    }
}
