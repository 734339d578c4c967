//! Tests for the command handlers.

#[cfg(test)]
mod tests {
    use crate::commands::PlanArgs;
    use crate::config::CliConfig;
    use crate::declarations::TEMPLATE;
    use crate::handlers::{compute_plan, init, load_declarations, raw_event, render_rows};
    use railyard_core::runner::Backend;
    use railyard_core::trigger::TriggerKind;
    use railyard_core::version::{BumpRequest, VersionPart};
    use railyard_core::{AppId, Error};
    use semver::Version;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_template(dir: &TempDir) -> String {
        let path: PathBuf = dir.path().join("railyard.yaml");
        std::fs::write(&path, TEMPLATE).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn args(path: &str) -> PlanArgs {
        PlanArgs {
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_raw_event_merges_flags_and_commit_directives() {
        let mut plan_args = args("railyard.yaml");
        plan_args.branch = Some("main".to_string());
        plan_args.bumps = vec![BumpRequest::increment("app", VersionPart::Patch)];
        plan_args.message = Some("Ship it [bump web:minor@1]".to_string());
        plan_args.commit_range = Some("a1b2c3..d4e5f6".to_string());

        let event = raw_event(&plan_args).unwrap();
        assert_eq!(event.commit_range.as_deref(), Some("a1b2c3..d4e5f6"));
        assert!(event.bump);
        assert_eq!(event.bump_requests.len(), 2);
        assert_eq!(event.bump_requests[1].app_id.as_str(), "web");
        assert_eq!(event.bump_requests[1].rank, 1);
    }

    #[test]
    fn test_raw_event_without_bumps_is_not_a_bump() {
        let mut plan_args = args("railyard.yaml");
        plan_args.local = true;
        plan_args.targets = vec!["app-publish".to_string()];
        let event = raw_event(&plan_args).unwrap();
        assert!(!event.bump);
        assert_eq!(event.targets.len(), 1);
    }

    #[tokio::test]
    async fn test_init_writes_template_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("railyard.yaml");
        let path = path.to_str().unwrap();

        init(path).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), TEMPLATE);

        std::fs::write(path, "entries: []\n").unwrap();
        init(path).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "entries: []\n");
    }

    #[tokio::test]
    async fn test_commit_plan_from_template() {
        let dir = TempDir::new().unwrap();
        let path = write_template(&dir);
        let mut plan_args = args(&path);
        plan_args.branch = Some("main".to_string());

        let plan = compute_plan(&CliConfig::default(), &plan_args).await.unwrap();
        assert_eq!(plan.trigger.kind, TriggerKind::Commit);
        let ids: Vec<_> = plan.rows.iter().map(|r| r.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["unit", "unit", "app-build"]);
        assert_eq!(plan.rows[2].concurrency_group, "app:app");
    }

    #[tokio::test]
    async fn test_feature_branch_skips_branch_limited_build() {
        let dir = TempDir::new().unwrap();
        let path = write_template(&dir);
        let mut plan_args = args(&path);
        plan_args.branch = Some("feature/login".to_string());

        let plan = compute_plan(&CliConfig::default(), &plan_args).await.unwrap();
        assert_eq!(plan.rows_for("app-build").count(), 0);
        assert_eq!(plan.rows_for("unit").count(), 2);
    }

    #[tokio::test]
    async fn test_bump_plan_uses_config_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_template(&dir);
        let mut plan_args = args(&path);
        plan_args.branch = Some("main".to_string());
        plan_args.bumps = vec!["app:minor".parse().unwrap()];

        let config = CliConfig {
            backend: Backend::Azure,
            default_environment: "production".to_string(),
            ..Default::default()
        };
        let plan = compute_plan(&config, &plan_args).await.unwrap();

        let app = &plan.apps[&AppId::new("app")];
        assert_eq!(app.version, Version::new(0, 2, 0));
        assert_eq!(app.environment, "production");
        let ids: Vec<_> = plan.rows.iter().map(|r| r.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["app-build", "app-publish"]);
        assert!(plan.rows.iter().all(|r| r.runner_name == "ubuntu-latest"));
    }

    #[tokio::test]
    async fn test_bump_of_undeclared_app_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_template(&dir);
        let mut plan_args = args(&path);
        plan_args.branch = Some("main".to_string());
        plan_args.bumps = vec!["ghost:patch".parse().unwrap()];

        let err = compute_plan(&CliConfig::default(), &plan_args)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownApplication { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let err = load_declarations("/nonexistent/railyard.yaml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/railyard.yaml"));
    }

    #[tokio::test]
    async fn test_render_rows_aligns_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_template(&dir);
        let mut plan_args = args(&path);
        plan_args.local = true;

        let plan = compute_plan(&CliConfig::default(), &plan_args).await.unwrap();
        let table = render_rows(&plan.rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("RANK  KIND  ENTRY"));
        assert!(lines[1].contains("ubuntu-latest"));
        assert!(lines[2].contains("windows-2022"));
    }
}
