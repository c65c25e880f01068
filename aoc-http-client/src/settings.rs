use regex::Regex;

use crate::error::AocError;

/// Reads the user id off the account settings page
#[derive(Clone, Debug)]
pub(crate) struct SettingsPage {
    user_id: Regex,
}

impl SettingsPage {
    pub fn new() -> Result<Self, AocError> {
        let user_id = Regex::new(r"\(anonymous user #(\d+)\)")
            .map_err(|e| AocError::ClientInit(e.to_string()))?;
        Ok(Self { user_id })
    }

    pub fn user_id(&self, html: &str) -> Option<u64> {
        self.user_id.captures(html)?.get(1)?.as_str().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_user_id() {
        let page = SettingsPage::new().unwrap();
        assert_eq!(page.user_id("<html><body>Log in</body></html>"), None);
        assert_eq!(page.user_id("(anonymous user #)"), None);
    }

    #[test]
    fn user_id_too_large() {
        let page = SettingsPage::new().unwrap();
        assert_eq!(page.user_id("(anonymous user #99999999999999999999999)"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_user_id_extraction(
            user_id in 1u64..10_000_000u64,
            before in "[a-zA-Z <>/]{0,40}",
            after in "[a-zA-Z <>/]{0,40}",
        ) {
            let page = SettingsPage::new().unwrap();
            let html = format!("{before}(anonymous user #{user_id}){after}");
            prop_assert_eq!(page.user_id(&html), Some(user_id));
        }
    }
}
