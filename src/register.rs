//! Engine assembly from configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use mailquill_config::{Config, ProbeOverrides};
use mailquill_dom::{ContentAgent, Page, ProbeKind, ProbeTable, ProviderIdentity, WaitPolicy};

/// Map a `[probes.<key>]` key to the table scope it extends.
///
/// `Some(None)` is the generic scope; `None` means the key is not recognized.
fn probe_scope(key: &str) -> Option<Option<ProviderIdentity>> {
    match key {
        "generic" => Some(None),
        _ => ProviderIdentity::KNOWN
            .into_iter()
            .find(|p| p.as_str() == key)
            .map(Some),
    }
}

/// Built-in probes with the configured selectors prepended.
pub(crate) fn build_probe_table(overrides: &BTreeMap<String, ProbeOverrides>) -> ProbeTable {
    let mut table = ProbeTable::builtin();
    for (key, lists) in overrides {
        let Some(scope) = probe_scope(key) else {
            warn!(key = %key, "Ignoring probes for unknown provider key");
            continue;
        };
        let added = table.prepend(scope, ProbeKind::Editor, lists.editors.as_slice())
            + table.prepend(scope, ProbeKind::Reply, lists.replies.as_slice())
            + table.prepend(scope, ProbeKind::Compose, lists.composes.as_slice())
            + table.prepend(scope, ProbeKind::Thread, lists.threads.as_slice());
        debug!(key = %key, added, "Registered configured probes");
    }
    table
}

pub(crate) fn wait_policy(config: &Config) -> WaitPolicy {
    WaitPolicy::new(config.opener.timeout(), config.opener.poll_interval())
}

/// Content agent for `page` using the configured probes and wait policy.
pub(crate) fn build_agent(page: Page, config: &Config) -> ContentAgent {
    let probes = Arc::new(build_probe_table(&config.probes));
    ContentAgent::new(page, probes, wait_policy(config))
}
