//! End-to-end reconciliation: catalog files on disk, a scraped match page,
//! and the grouped channel list written back to the match record

use matchday_digest::catalog::ChannelCatalog;
use matchday_digest::models::MatchRecord;
use matchday_digest::reconcile::{group_channels, ReconcileOutcome, Reconciler};
use matchday_digest::sources::livesoccertv::extract_channel_mentions;
use std::sync::Arc;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_PAGE: &str = r#"
<html><body><table class="broadcasters">
  <tr><td><span class="flag">MENA</span></td>
      <td><a class="black" href="/channels/bein-2/">beIN Sports 2</a></td></tr>
  <tr><td><span class="flag">MENA</span></td>
      <td><a class="black" href="/channels/bein-1/">beIN Sports 1</a>
          <a class="nou" href="/channels/bein-connect/">beIN Sports Connect</a></td></tr>
  <tr><td><span class="flag">USA</span></td>
      <td><a class="black" href="/channels/espn/">ESPN</a>
          <a class="black" href="/channels/random/">Random Channel X</a></td></tr>
</table></body></html>
"#;

    fn write_catalog(dir: &TempDir, current: &str, original: Option<&str>) -> ChannelCatalog {
        let current_path = dir.path().join("channel.txt");
        std::fs::write(&current_path, current).expect("Failed to write channel.txt");

        let original_path = original.map(|contents| {
            let path = dir.path().join("OG_channel.txt");
            std::fs::write(&path, contents).expect("Failed to write OG_channel.txt");
            path
        });

        ChannelCatalog::load(&current_path, original_path.as_deref()).expect("Failed to load catalog")
    }

    #[test]
    fn test_match_page_to_grouped_channels() {
        let dir = TempDir::new().unwrap();
        let catalog = write_catalog(
            &dir,
            "beIN Sports 1 (MENA)\nbeIN Sports 2 (MENA)\nESPN\n",
            None,
        );
        let reconciler = Reconciler::with_default_leagues(Arc::new(catalog));

        let mentions = extract_channel_mentions(MATCH_PAGE).unwrap();
        let mut record = MatchRecord::new("UEFA Champions League", "02:00", "Real Madrid vs Arsenal")
            .with_url("https://www.livesoccertv.com/match/1/")
            .with_channels("Movistar+, CBS Sports");

        let outcome = reconciler.reconcile_match(&mut record, &mentions);

        assert_eq!(outcome, ReconcileOutcome::Updated(3));
        assert_eq!(
            record.channels.as_deref(),
            Some("beIN Sports 1-2 (MENA), ESPN")
        );
    }

    #[test]
    fn test_original_names_replace_current_names() {
        let dir = TempDir::new().unwrap();
        let catalog = write_catalog(
            &dir,
            "beIN Sports 1 (MENA)\n\nbeIN Sports 2 (MENA)\nESPN\n",
            Some("beIN SPORTS 1 HD\n\nbeIN SPORTS 2 HD\nESPN US\n"),
        );
        let reconciler = Reconciler::with_default_leagues(Arc::new(catalog));

        let mentions = extract_channel_mentions(MATCH_PAGE).unwrap();
        let resolved = reconciler.resolve(&mentions);

        let resolved: Vec<&str> = resolved.iter().map(String::as_str).collect();
        assert_eq!(resolved, ["beIN SPORTS 2 HD", "beIN SPORTS 1 HD", "ESPN US"]);
    }

    #[test]
    fn test_missing_original_file_falls_back_to_current_names() {
        let dir = TempDir::new().unwrap();
        let current_path = dir.path().join("channel.txt");
        std::fs::write(&current_path, "ESPN\n").unwrap();

        let catalog =
            ChannelCatalog::load(&current_path, Some(dir.path().join("missing.txt").as_path())).unwrap();

        assert_eq!(catalog.lookup("espn", None), Some("ESPN"));
    }

    #[test]
    fn test_catalog_build_is_deterministic() {
        let current = ["Sky Sport 1 (Italy)", "DAZN 1 (Spain)", "ESPN"];

        let first = ChannelCatalog::build(&current, None);
        let second = ChannelCatalog::build(&current, None);

        assert_eq!(first, second);
    }

    #[test]
    fn test_non_target_league_is_untouched() {
        let dir = TempDir::new().unwrap();
        let catalog = write_catalog(&dir, "ESPN\n", None);
        let reconciler = Reconciler::with_default_leagues(Arc::new(catalog));

        let mentions = extract_channel_mentions(MATCH_PAGE).unwrap();
        let mut record =
            MatchRecord::new("USA - MLS", "07:30", "LA Galaxy vs LAFC").with_channels("Apple TV");
        let before = record.clone();

        assert_eq!(
            reconciler.reconcile_match(&mut record, &mentions),
            ReconcileOutcome::Skipped
        );
        assert_eq!(record, before);
    }

    #[test]
    fn test_grouping_is_not_reapplied_to_ranges() {
        let grouped = group_channels(["Sport 1", "Sport 2", "Sport 3"]);
        assert_eq!(grouped, vec!["Sport 1-3"]);

        // A range string has no plain numeric suffix and passes through verbatim
        assert_eq!(group_channels(grouped.iter()), vec!["Sport 1-3"]);
    }
}
