//! Decides which diagnostics are reported.

use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::diagnostics::Code;

/// Filters optional codes against the configured selection.
///
/// Decisions are memoized, so each optional code is logged at most once per
/// run.
pub struct Gate<'s> {
    select: Option<&'s BTreeSet<String>>,
    memo: HashMap<Code, bool>,
}

impl<'s> Gate<'s> {
    pub fn new(select: Option<&'s BTreeSet<String>>) -> Self {
        Self {
            select,
            memo: HashMap::new(),
        }
    }

    pub fn admit(&mut self, code: Code) -> bool {
        if let Some(&decision) = self.memo.get(&code) {
            return decision;
        }
        let decision = self.decide(code);
        self.memo.insert(code, decision);
        decision
    }

    fn decide(&self, code: Code) -> bool {
        if !code.is_optional() {
            return true;
        }

        let Some(select) = self.select else {
            info!(
                %code,
                "optional warning reported because no selection was configured"
            );
            return true;
        };

        let name = code.as_str();
        let selected = (2..=name.len()).any(|i| select.contains(&name[..i]));
        if !selected {
            info!(%code, "optional warning not selected");
        }
        selected
    }
}
