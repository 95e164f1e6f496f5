use std::collections::BTreeSet;

use crate::naming::slug::SlugLedger;

fn is_valid_slug(slug: &str) -> bool {
  slug.len() == 6
    && slug.starts_with(|c: char| c.is_ascii_lowercase())
    && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[test]
fn test_slug_shape() {
  let mut ledger = SlugLedger::new();
  for seed in ["system", "interfaces", "", "ntp-servers", "日本"] {
    let slug = ledger.assign(seed);
    assert!(is_valid_slug(&slug), "invalid slug {slug:?} for seed {seed:?}");
  }
}

#[test]
fn test_first_slug_is_stable_across_ledgers() {
  let first = SlugLedger::new().assign("system");
  let second = SlugLedger::new().assign("system");
  assert_eq!(first, second);

  let mut ledger = SlugLedger::new();
  ledger.assign("interfaces");
  assert_eq!(ledger.assign("system"), first);
}

#[test]
fn test_repeated_seed_yields_distinct_slugs() {
  let mut ledger = SlugLedger::new();
  let slugs: BTreeSet<String> = (0..50).map(|_| ledger.assign("system")).collect();

  assert_eq!(slugs.len(), 50);
  assert_eq!(ledger.len(), 50);
  assert!(slugs.iter().all(|slug| ledger.contains(slug)));
}

#[test]
fn test_distinct_seeds_differ() {
  let mut ledger = SlugLedger::new();
  let system = ledger.assign("system");
  let interfaces = ledger.assign("interfaces");
  assert_ne!(system, interfaces);
  assert!(!ledger.is_empty());
}
