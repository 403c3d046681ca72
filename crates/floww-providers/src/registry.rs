//! Static dispatch from [`ProviderKind`] to its [`Adapter`] implementation.

use floww_postgres::types::ProviderKind;

use crate::adapter::Adapter;
use crate::providers::{builtin, discord, github, gitlab, google_calendar, jira, kvstore, slack};

/// Returns the adapter for a provider type.
///
/// Every variant of [`ProviderKind`] has exactly one adapter; this is a
/// total function, not a lookup that can fail.
pub fn adapter_for(kind: ProviderKind) -> &'static dyn Adapter {
    match kind {
        ProviderKind::Gitlab => &gitlab::GitlabAdapter,
        ProviderKind::Slack => &slack::SlackAdapter,
        ProviderKind::Discord => &discord::DiscordAdapter,
        ProviderKind::Github => &github::GithubAdapter,
        ProviderKind::Jira => &jira::JiraAdapter,
        ProviderKind::GoogleCalendar => &google_calendar::GoogleCalendarAdapter,
        ProviderKind::Builtin => &builtin::BuiltinAdapter,
        ProviderKind::Kvstore => &kvstore::KvstoreAdapter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_provider_kind_resolves_to_its_own_adapter() {
        for kind in ProviderKind::iter() {
            assert_eq!(adapter_for(kind).kind(), kind);
        }
    }
}
