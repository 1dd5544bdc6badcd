use crate::preference::PreferenceProfile;
use crate::types::{Allocation, bundle_string};

#[macro_export]
macro_rules! alloc_info {
    ($($arg:tt)+) => {
        tracing::info!(target: "allocation", $($arg)+)
    }
}

#[macro_export]
macro_rules! alloc_debug {
    ($($arg:tt)+) => {
        tracing::debug!(target: "allocation", $($arg)+)
    }
}

/// Log every agent's ranking
pub fn log_profile(profile: &PreferenceProfile) {
    alloc_info!(
        "Profile with {} agents and {} items:",
        profile.agent_count(),
        profile.item_count()
    );
    for (agent, pref) in profile.iter() {
        alloc_info!("  {}: {}", agent, pref);
    }
}

/// Log the bundles of an allocation, or its absence
pub fn log_allocation(label: &str, allocation: Option<&Allocation>) {
    match allocation {
        Some(allocation) => {
            alloc_info!("{} allocation:", label);
            for (agent, bundle) in allocation.iter() {
                alloc_info!("  {} gets {}", agent, bundle_string(bundle));
            }
        }
        None => alloc_info!("{}: no allocation", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::Preference;

    #[test]
    fn test_log_helpers_without_subscriber() {
        let profile = PreferenceProfile::new([
            ("Alice", Preference::from_order([2, 1]).unwrap()),
            ("Bob", Preference::from_order([1, 2]).unwrap()),
        ])
        .unwrap();
        let allocation = Allocation::from([
            ("Alice", crate::types::Item::list([2])),
            ("Bob", crate::types::Item::list([1])),
        ]);
        log_profile(&profile);
        log_allocation("draft", Some(&allocation));
        log_allocation("search", None);
    }
}
